//! Circular-gesture detection over a stream of luma frames.

pub mod confirm;
pub mod detector;
pub mod path;
pub mod report;

pub use confirm::{ConfirmationGate, GateState};
pub use detector::CircleGestureDetector;
pub use path::{square_normalize, PathAccumulator, PathUpdate};
pub use report::{Diagnostics, FitStatus, FrameReport, Observation};
