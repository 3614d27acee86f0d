#![warn(clippy::uninlined_format_args)]

pub mod id_source;

pub use id_source::{SequentialIdSource, UuidIdSource};
