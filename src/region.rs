use crate::enums::ScanRef;

use serde::Deserialize;
use std::{
    collections::{HashMap, hash_map::Entry},
    fs,
    path::Path,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegionCatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid region metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons the marker is hidden for a slice.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegionMiss {
    #[error("No finding for {key}")]
    LookupMiss { key: String },

    #[error("Finding for {key} is on slice {expected:?}, not {actual}")]
    SliceMismatch {
        key: String,
        expected: Option<usize>,
        actual: usize,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Clinically relevant region the user has to locate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finding {
    pub center: Point,
    pub radius: f32,
    /// 1-based slice the finding is on; only set for slice-specific modalities
    pub slice_id: Option<usize>,
}

/// Where the host puts the marker, in the viewer's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPlacement {
    pub anchor: [f32; 2],
    pub pivot: [f32; 2],
    pub position: [f32; 2],
    pub radius: f32,
}

impl MarkerPlacement {
    const CENTER: [f32; 2] = [0.5, 0.5];

    fn centered_on(finding: &Finding) -> Self {
        Self {
            anchor: Self::CENTER,
            pivot: Self::CENTER,
            position: [finding.center.x, finding.center.y],
            radius: finding.radius,
        }
    }
}

#[derive(Deserialize)]
struct RegionDocument {
    images: Vec<RegionEntry>,
}

#[derive(Deserialize)]
struct RegionEntry {
    image_name: String,
    #[serde(default)]
    id: Option<usize>,
    altered_region: AlteredRegion,
}

#[derive(Deserialize)]
struct AlteredRegion {
    center: Point,
    radius: f32,
}

/// Findings keyed by image name. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct RegionCatalog {
    findings: HashMap<String, Finding>,
}

impl RegionCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, RegionCatalogError> {
        let mut catalog = Self::default();
        catalog.extend_from_json(json)?;
        Ok(catalog)
    }

    /// Load and merge metadata files in order
    pub fn load_from_files(paths: &[impl AsRef<Path>]) -> Result<Self, RegionCatalogError> {
        let mut catalog = Self::default();
        for path in paths {
            let json = fs::read_to_string(path.as_ref())?;
            catalog.extend_from_json(&json)?;
            log::info!(
                "Loaded region metadata from {} ({} findings total)",
                path.as_ref().display(),
                catalog.len()
            );
        }
        Ok(catalog)
    }

    fn extend_from_json(&mut self, json: &str) -> Result<(), RegionCatalogError> {
        let document: RegionDocument = serde_json::from_str(json)?;
        for entry in document.images {
            let finding = Finding {
                center: entry.altered_region.center,
                radius: entry.altered_region.radius,
                slice_id: entry.id,
            };
            match self.findings.entry(entry.image_name) {
                Entry::Vacant(vacant) => {
                    vacant.insert(finding);
                }
                // First entry in source order wins
                Entry::Occupied(occupied) => {
                    log::warn!("Ignoring duplicate finding for {}", occupied.key());
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn get(&self, image_key: &str) -> Option<&Finding> {
        self.findings.get(image_key)
    }

    /// Locate the marker for a slice of a scan
    ///
    /// # Errors
    ///
    /// `LookupMiss` if the catalog has no entry for the scan, `SliceMismatch`
    /// if the scan's finding is on a different slice
    pub fn resolve(&self, scan: ScanRef, slice_index: usize) -> Result<MarkerPlacement, RegionMiss> {
        let key = scan.image_key();
        let finding = self
            .get(&key)
            .ok_or_else(|| RegionMiss::LookupMiss { key: key.clone() })?;

        if scan.scan_type.requires_slice_specific_findings() && finding.slice_id != Some(slice_index) {
            return Err(RegionMiss::SliceMismatch {
                key,
                expected: finding.slice_id,
                actual: slice_index,
            });
        }

        Ok(MarkerPlacement::centered_on(finding))
    }
}
