//! Common test utilities and helpers.
//!
//! - A scripted in-memory portal standing in for the browser
//! - Builders for clinical report PDFs
//! - Redaction assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod portal;

pub use assertions::*;
pub use fixtures::*;
pub use portal::*;
