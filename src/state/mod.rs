//! Shared application state.
//!
//! - The local mark set mirroring the persisted marks of the open image
//! - The decoded image the renderer composites onto

mod types;

pub use types::*;
