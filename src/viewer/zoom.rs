/// Multiplier applied by one zoom-in step
pub const ZOOM_IN_STEP: f64 = 1.25;
/// Multiplier applied by one zoom-out step
pub const ZOOM_OUT_STEP: f64 = 0.8;
/// Zoom-in stays enabled while the scale is below this
pub const MAX_SCALE: f64 = 3.0;
/// Zoom-out stays enabled while the scale is above this
pub const MIN_SCALE: f64 = 0.333;

/// Current zoom factor plus the enablement of the two zoom actions
/// Enablement is re-evaluated after each scale change, so one step may
/// land past a threshold and then disables further steps in that
/// direction. The scale itself is never hard-clamped; fit-to-window and
/// normal-size set it directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    scale: f64,
    can_zoom_in: bool,
    can_zoom_out: bool,
}

impl Default for ZoomState {
    fn default() -> Self {
        ZoomState::at(1.0)
    }
}

impl ZoomState {
    /// Zoom state at an explicit scale
    pub fn at(scale: f64) -> Self {
        ZoomState {
            scale,
            can_zoom_in: scale < MAX_SCALE,
            can_zoom_out: scale > MIN_SCALE,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn can_zoom_in(&self) -> bool {
        self.can_zoom_in
    }

    pub fn can_zoom_out(&self) -> bool {
        self.can_zoom_out
    }

    /// Multiply the scale by one zoom-in step
    /// Returns the factor so callers can rescale their scrollbars
    pub fn zoom_in(&mut self) -> f64 {
        self.apply(ZOOM_IN_STEP)
    }

    /// Multiply the scale by one zoom-out step
    pub fn zoom_out(&mut self) -> f64 {
        self.apply(ZOOM_OUT_STEP)
    }

    /// Reset to 1:1
    pub fn reset(&mut self) {
        *self = ZoomState::at(1.0);
    }

    fn apply(&mut self, factor: f64) -> f64 {
        *self = ZoomState::at(self.scale * factor);
        factor
    }
}

/// Scrollbar model mirrored by the shell's scrollbar widgets
/// `value` is the offset of the visible window into the content,
/// `page_step` the viewport extent, `maximum` the largest allowed offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollBar {
    pub value: i64,
    pub page_step: i64,
    pub maximum: i64,
}

impl ScrollBar {
    /// Rescale the offset after a zoom step, keeping the viewport center
    /// on the same content point:
    /// new = round(factor * value + (factor - 1) * page_step / 2)
    pub fn adjust(&mut self, factor: f64) {
        let new = factor * self.value as f64 + (factor - 1.0) * self.page_step as f64 / 2.0;
        self.value = (new.round() as i64).clamp(0, self.maximum);
    }

    /// Update the range for new content and viewport extents
    pub fn set_range(&mut self, content: i64, viewport: i64) {
        self.page_step = viewport;
        self.maximum = (content - viewport).max(0);
        self.value = self.value.clamp(0, self.maximum);
    }

    pub fn scroll_by(&mut self, delta: i64) {
        self.value = (self.value + delta).clamp(0, self.maximum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_steps_are_inverse() {
        let mut zoom = ZoomState::default();
        zoom.zoom_in();
        zoom.zoom_out();
        assert!((zoom.scale() - 1.0).abs() < 1e-9);

        let mut zoom = ZoomState::at(1.6);
        zoom.zoom_out();
        zoom.zoom_in();
        assert!((zoom.scale() - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_in_disables_past_max() {
        let mut zoom = ZoomState::default();
        for _ in 0..4 {
            zoom.zoom_in();
            assert!(zoom.can_zoom_in(), "scale {} should allow more", zoom.scale());
        }
        // Fifth step lands at ~3.05 and shuts the door behind itself
        zoom.zoom_in();
        assert!(zoom.scale() > MAX_SCALE);
        assert!(!zoom.can_zoom_in());
        assert!(zoom.can_zoom_out());
    }

    #[test]
    fn test_zoom_out_disables_past_min() {
        let mut zoom = ZoomState::default();
        for _ in 0..4 {
            zoom.zoom_out();
            assert!(zoom.can_zoom_out(), "scale {} should allow more", zoom.scale());
        }
        // 0.8^5 = 0.32768, just below the threshold
        zoom.zoom_out();
        assert!(zoom.scale() < MIN_SCALE);
        assert!(!zoom.can_zoom_out());
        assert!(zoom.can_zoom_in());
    }

    #[test]
    fn test_reset_restores_both_actions() {
        let mut zoom = ZoomState::at(3.2);
        assert!(!zoom.can_zoom_in());
        zoom.reset();
        assert_eq!(zoom.scale(), 1.0);
        assert!(zoom.can_zoom_in());
        assert!(zoom.can_zoom_out());
    }

    #[test]
    fn test_scrollbar_adjust_keeps_center() {
        let mut bar = ScrollBar {
            value: 100,
            page_step: 40,
            maximum: 10_000,
        };
        bar.adjust(1.25);
        assert_eq!(bar.value, 130);
    }

    #[test]
    fn test_scrollbar_adjust_rounds() {
        // 0.8 * 100 + (-0.2) * 41 / 2 = 75.9, rounds to 76
        let mut bar = ScrollBar {
            value: 100,
            page_step: 41,
            maximum: 10_000,
        };
        bar.adjust(0.8);
        assert_eq!(bar.value, 76);
    }

    #[test]
    fn test_scrollbar_adjust_clamps_at_zero() {
        let mut bar = ScrollBar {
            value: 0,
            page_step: 40,
            maximum: 10_000,
        };
        bar.adjust(0.8);
        assert_eq!(bar.value, 0);
    }

    #[test]
    fn test_scrollbar_range_update() {
        let mut bar = ScrollBar {
            value: 500,
            page_step: 100,
            maximum: 900,
        };
        bar.set_range(400, 100);
        assert_eq!(bar.maximum, 300);
        assert_eq!(bar.value, 300);

        bar.set_range(50, 100);
        assert_eq!(bar.maximum, 0);
        assert_eq!(bar.value, 0);
    }
}
