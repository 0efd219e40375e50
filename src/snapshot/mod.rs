pub mod flatten;
pub mod node;

pub use flatten::flatten;
pub use node::{SnapshotEvent, UiNode};
