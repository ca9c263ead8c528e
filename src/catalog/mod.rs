//! Problem catalog
//!
//! The catalog is decoded once at startup and never mutated afterward. It is
//! shared read-only by every request through an `Arc`, so no locking is needed.

pub mod loader;
pub mod model;

pub use loader::load_catalog;
pub use model::Problem;

use std::io::Read;

use crate::types::Result;

/// Ordered, immutable collection of problems in load order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    problems: Vec<Problem>,
}

impl Catalog {
    /// Create a catalog from already decoded problems
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    /// Decode a catalog from a JSON array of problem objects
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let problems: Vec<Problem> = serde_json::from_reader(reader)?;
        Ok(Self::new(problems))
    }

    /// Decode a catalog from an in-memory JSON array
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let problems: Vec<Problem> = serde_json::from_slice(bytes)?;
        Ok(Self::new(problems))
    }

    /// All problems in load order
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// First problem whose id equals `id`
    ///
    /// Ids are not checked for uniqueness at load time; when two problems
    /// share an id the one loaded first wins.
    pub fn find(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|problem| problem.id == id)
    }
}
