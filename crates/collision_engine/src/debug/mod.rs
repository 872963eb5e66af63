//! Debug drawing hooks
//!
//! The collision core never renders; it emits wireframe draw requests to a
//! [`DebugDraw`] sink supplied by the host application.

mod draw;

pub use draw::{colors, DebugDraw, DebugShape, LogDraw, RecordingDraw};
