//! # State
//!
//! The data the isolate toggle works on: the scene's objects, and the record of what isolation hid.

pub mod scene;
pub mod visibility;

pub use scene::{ObjectID, Scene};
pub use visibility::VisibilityStore;
