pub const DEFAULT_DEBOUNCE_MS: i64 = 3_000;
pub const DEFAULT_REEL_MARKER: &str = "Reels";

/// Suppresses the burst of content-change events a single item produces while
/// it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceGate {
    window_ms: i64,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl DebounceGate {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms: window_ms.max(0),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    pub fn should_process(&self, now_ms: i64, last_detection_ms: i64) -> bool {
        now_ms.saturating_sub(last_detection_ms) >= self.window_ms
    }
}

/// Case-insensitive presence check for the text that marks the reel viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelMarker {
    needle: String,
}

impl Default for ReelMarker {
    fn default() -> Self {
        Self::new(DEFAULT_REEL_MARKER)
    }
}

impl ReelMarker {
    pub fn new(marker: &str) -> Self {
        Self {
            needle: marker.to_lowercase(),
        }
    }

    pub fn is_present(&self, flattened: &str) -> bool {
        flattened.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_inclusive_at_the_boundary() {
        let gate = DebounceGate::default();
        assert!(!gate.should_process(10_000, 8_000));
        assert!(!gate.should_process(10_999, 8_000));
        assert!(gate.should_process(11_000, 8_000));
        assert!(gate.should_process(5_000, 0));
    }

    #[test]
    fn clock_going_backwards_is_debounced() {
        let gate = DebounceGate::default();
        assert!(!gate.should_process(1_000, 9_000));
    }

    #[test]
    fn marker_ignores_case() {
        let marker = ReelMarker::default();
        assert!(marker.is_present("home REELS tab"));
        assert!(marker.is_present("reels"));
        assert!(!marker.is_present("Home Search Profile"));
    }
}
