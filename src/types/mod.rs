//! Shared types for the problems store

pub mod error;

pub use error::{Result, StoreError};
