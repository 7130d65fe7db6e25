//! JSON input for the CLI.
//!
//! The persistence layer is out of scope, so the CLI reads what it would
//! have supplied from a manifest file:
//!
//! ```json
//! {
//!   "source": { "id": 1, "width": 4000, "height": 3000, "format": "jpeg" },
//!   "candidates": [
//!     {
//!       "modification": {
//!         "image_id": 1, "context_id": 2, "resolution_id": 5,
//!         "modifier": { "width": 1024, "height": 768,
//!                       "crop": { "x": 400, "y": 300, "width": 3200, "height": 2400 } }
//!       },
//!       "resolution": { "id": 5, "width": 1024, "height": 768 }
//!     }
//!   ],
//!   "requests": [ { "id": 9, "width": 800, "height": 600 } ]
//! }
//! ```
//!
//! `source` may be omitted when the CLI is given the image file instead.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::{Plan, plan};
use crate::selection::{Candidate, ImageModificationResolver, Resolution, SourceImage};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest has no source image and none was given")]
    MissingSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceImage>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub requests: Vec<Resolution>,
}

impl Manifest {
    /// The manifest's source, unless `override_source` replaces it.
    pub fn source_or(
        &self,
        override_source: Option<SourceImage>,
    ) -> Result<SourceImage, ManifestError> {
        override_source
            .or(self.source)
            .ok_or(ManifestError::MissingSource)
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&content)?;
    tracing::debug!(
        candidates = manifest.candidates.len(),
        requests = manifest.requests.len(),
        "loaded manifest {}",
        path.display()
    );
    Ok(manifest)
}

/// Plan every request in parallel. Output order follows `requests`.
pub fn plan_all(
    resolver: &ImageModificationResolver,
    source: &SourceImage,
    candidates: &[Candidate],
    requests: &[Resolution],
) -> Vec<Plan> {
    requests
        .par_iter()
        .map(|requested| plan(resolver, source, candidates, requested))
        .collect()
}
