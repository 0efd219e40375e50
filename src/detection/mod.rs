pub mod ads;
pub mod debounce;
pub mod fingerprint;
pub mod tracker;

pub use ads::{is_ad, AdSignal};
pub use debounce::{DebounceGate, ReelMarker, DEFAULT_DEBOUNCE_MS, DEFAULT_REEL_MARKER};
pub use fingerprint::{extract_fingerprint, Fingerprint, FingerprintRule, ReelSignals};
pub use tracker::{DetectionStats, DetectionTracker};
