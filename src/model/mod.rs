//! Model definitions
//!
//! A model is an ordered list of parts, each pointing at one geometry asset
//! and carrying its assembled and exploded reference positions. Definitions
//! are immutable for the lifetime of a viewing session.

mod catalog;
mod definition;

pub use catalog::{builtin_model, builtin_model_ids};
pub use definition::*;
