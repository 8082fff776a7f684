use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use super::content::Target;
use crate::event::AppEvent;

/// Handle for one running `wl-paste --watch` child
/// Owns the child process and the thread draining its notifications;
/// dropping the handle kills the child
pub struct ClipboardWatcher {
    target: Target,
    child: Child,
    reader: Option<JoinHandle<()>>,
}

/// Start change watchers for both clipboard buffers
/// Each spawns `wl-paste [--primary] --watch echo`: wl-paste runs `echo` on
/// every change of its buffer, and the newline echo prints reaches us
/// through the child's stdout pipe. One line in, one ClipboardChanged out.
/// No payload travels this way; the monitor re-reads the buffer.
pub fn start_watchers(events_tx: &Sender<AppEvent>) -> Result<Vec<ClipboardWatcher>> {
    Target::ALL
        .iter()
        .map(|&target| start_watcher(target, events_tx.clone()))
        .collect()
}

/// Command line for one buffer's watcher child
fn watch_command(target: Target) -> Command {
    let mut cmd = Command::new("wl-paste");
    if let Some(flag) = target.primary_flag() {
        cmd.arg(flag);
    }
    cmd.arg("--watch").arg("echo");
    cmd
}

fn start_watcher(target: Target, events_tx: Sender<AppEvent>) -> Result<ClipboardWatcher> {
    log::info!("Starting {} watcher", target.label());

    let mut child = watch_command(target)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {} watcher", target.label()))?;

    let stdout = child
        .stdout
        .take()
        .context("Watcher child has no stdout pipe")?;
    let reader = pump_notifications(target, stdout, events_tx);

    Ok(ClipboardWatcher {
        target,
        child,
        reader: Some(reader),
    })
}

/// Turn each line the watcher child emits into a ClipboardChanged event
/// Exits when the child dies (EOF) or the app side hangs up
fn pump_notifications<R>(target: Target, source: R, events_tx: Sender<AppEvent>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            if line.is_err() {
                break;
            }
            if events_tx.send(AppEvent::ClipboardChanged(target)).is_err() {
                break;
            }
        }
        log::debug!("{} watcher reader exiting", target.label());
    })
}

impl ClipboardWatcher {
    /// Kill the wl-paste child and join the reader thread
    pub fn stop(self) {
        log::info!("Stopping {} watcher", self.target.label());
        // Drop does the work
    }
}

impl Drop for ClipboardWatcher {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            log::warn!("Failed to kill {} watcher: {}", self.target.label(), e);
        }
        let _ = self.child.wait();
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn test_watch_command_addresses_buffer() {
        let cmd = watch_command(Target::Clipboard);
        assert_eq!(cmd.get_program(), "wl-paste");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["--watch", "echo"]);

        let cmd = watch_command(Target::Selection);
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["--primary", "--watch", "echo"]);
    }

    #[test]
    fn test_one_event_per_notification_line() {
        let (tx, rx) = mpsc::channel();
        let handle = pump_notifications(Target::Selection, Cursor::new(b"\n\n\n".to_vec()), tx);
        handle.join().unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(
            events
                .iter()
                .all(|e| *e == AppEvent::ClipboardChanged(Target::Selection))
        );
    }

    #[test]
    fn test_pump_stops_when_receiver_hangs_up() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let handle = pump_notifications(Target::Clipboard, Cursor::new(b"\n\n".to_vec()), tx);
        // Must terminate instead of spinning on a dead channel
        handle.join().unwrap();
    }
}
