//! Shared primitives for the micella workspace.
//!
//! - **Error types**: [`MicellaError`], [`ErrorKind`] and [`Result`]
//! - **Traits**: [`ContentAddressable`], [`Annotated`], [`Summarizable`]

pub mod error;
pub mod traits;

pub use error::{ErrorKind, MicellaError, Result};
pub use traits::*;
