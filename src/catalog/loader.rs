//! Startup catalog loading
//!
//! Loading happens exactly once, before the listener is bound. Any failure
//! here is fatal: serving an empty catalog would be indistinguishable from a
//! catalog that simply has no matches.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use super::Catalog;
use crate::types::{Result, StoreError};

/// Load the catalog from a JSON file on disk
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    debug!(path = %path.display(), "Opening problems file");

    let file = File::open(path)
        .map_err(|e| StoreError::CatalogLoad(format!("{}: {}", path.display(), e)))?;

    let catalog = Catalog::from_reader(BufReader::new(file)).map_err(|e| match e {
        StoreError::CatalogLoad(msg) => {
            StoreError::CatalogLoad(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    info!(
        path = %path.display(),
        problems = catalog.len(),
        "Problem catalog loaded"
    );

    Ok(catalog)
}
