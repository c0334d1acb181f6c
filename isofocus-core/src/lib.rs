#![warn(clippy::pedantic)]

pub mod commands;
pub mod host;
pub mod id;
pub mod isolate;
pub mod queue;
pub mod state;

pub use id::StableID;
