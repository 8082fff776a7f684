use std::process::ExitStatus;
use thiserror::Error;

/// Failure taxonomy for user-triggered actions
/// Silent variants abort the action without a modal; the rest surface in
/// the error overlay. No variant is fatal to the process, no action is
/// retried, and every failure leaves prior state unchanged.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A dialog was dismissed without an answer
    #[error("cancelled")]
    Cancelled,

    /// A file or capture output could not be decoded as an image
    #[error("Cannot load {path}.")]
    Decode { path: String },

    /// Buffer content is neither text nor image
    #[error("no inspectable content")]
    Unclassified,

    /// An external helper command failed
    #[error("`{command}` failed with {status}")]
    External { command: String, status: ExitStatus },

    /// The print destination list came back empty
    #[error("no print destinations found (is CUPS running?)")]
    NoPrinters,

    /// The clipboard backend rejected an operation
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl ActionError {
    /// Silent failures abort their action without surfacing a modal
    pub fn is_silent(&self) -> bool {
        matches!(self, ActionError::Cancelled | ActionError::Unclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_variants() {
        assert!(ActionError::Cancelled.is_silent());
        assert!(ActionError::Unclassified.is_silent());
        assert!(
            !ActionError::Decode {
                path: "/tmp/x.png".to_string()
            }
            .is_silent()
        );
        assert!(!ActionError::NoPrinters.is_silent());
    }

    #[test]
    fn test_decode_message_names_the_path() {
        let err = ActionError::Decode {
            path: "/home/user/броken.png".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot load /home/user/броken.png.");
    }
}
