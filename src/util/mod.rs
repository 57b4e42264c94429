//! Utility types for FBX.
//!
//! - [`Error`] / [`Result`] - Error handling

mod error;

pub use error::*;
