use crate::{
    enums::ScanRef,
    slice_set::{Slice, SliceSet},
};

use dicom::object::open_file;
use dicom_dictionary_std::tags;
use rayon::prelude::*;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SliceLoaderError {
    #[error("No images found for {0}")]
    EmptySliceSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of named images for a scan.
///
/// Implementations return the images in any order; [`SliceLoader`] sorts them.
pub trait ImageProvider {
    fn list(&self, folder_key: &str) -> Result<Vec<Slice>, SliceLoaderError>;
}

/// Reads images from `<root>/<folder_key>/`.
///
/// PNG and JPEG headers are probed with `image`, DICOM files are opened and
/// their Rows/Columns read. Files that cannot be probed are skipped.
#[derive(Clone, Debug)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn probe(path: &Path) -> Option<Slice> {
        let name = path.file_name()?.to_str()?.to_owned();
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        let dimensions = match extension.as_str() {
            "dcm" => Self::probe_dicom(path),
            _ => image::image_dimensions(path)
                .map_err(|err| log::warn!("Skipping {}: {err}", path.display()))
                .ok(),
        };
        let (width, height) = dimensions?;
        Some(Slice::new(name, path, width, height))
    }

    fn probe_dicom(path: &Path) -> Option<(u32, u32)> {
        let dicom_object = open_file(path)
            .map_err(|err| log::warn!("Skipping {}: {err}", path.display()))
            .ok()?;
        let rows = dicom_object.element(tags::ROWS).ok()?.to_int::<u32>().ok()?;
        let columns = dicom_object
            .element(tags::COLUMNS)
            .ok()?
            .to_int::<u32>()
            .ok()?;
        Some((columns, rows))
    }

    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                ["png", "jpg", "jpeg", "dcm"]
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
    }
}

impl ImageProvider for DirectoryProvider {
    fn list(&self, folder_key: &str) -> Result<Vec<Slice>, SliceLoaderError> {
        let folder = self.root.join(folder_key);
        let entries = match fs::read_dir(&folder) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("Image folder {} does not exist", folder.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let paths: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && Self::is_supported(path))
            .collect();

        Ok(paths
            .par_iter()
            .filter_map(|path| Self::probe(path))
            .collect())
    }
}

pub struct SliceLoader;

impl SliceLoader {
    /// Load the ordered slice set of a scan
    ///
    /// # Arguments
    ///
    /// * `provider` - Where the images are discovered
    /// * `scan` - Modality and scan id to load
    ///
    /// # Errors
    ///
    /// Returns `EmptySliceSet` if the provider reports no images
    pub fn load(
        provider: &impl ImageProvider,
        scan: ScanRef,
    ) -> Result<SliceSet, SliceLoaderError> {
        let mut slices = provider.list(&scan.folder_key())?;

        if slices.is_empty() {
            return Err(SliceLoaderError::EmptySliceSet(scan.folder_key()));
        }

        Self::sort_slices(&mut slices);
        log::info!("Loaded {} slices for {scan}", slices.len());

        Ok(SliceSet::new(slices))
    }

    fn sort_slices(slices: &mut [Slice]) {
        slices.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_case_sensitive() {
        let mut slices = vec![
            Slice::new("b.png", "b.png", 1, 1),
            Slice::new("B.png", "B.png", 1, 1),
            Slice::new("a.png", "a.png", 1, 1),
        ];
        SliceLoader::sort_slices(&mut slices);
        let names: Vec<_> = slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B.png", "a.png", "b.png"]);
    }

    #[test]
    fn supported_extensions_ignore_case() {
        assert!(DirectoryProvider::is_supported(Path::new("x/slice.PNG")));
        assert!(DirectoryProvider::is_supported(Path::new("x/slice.dcm")));
        assert!(!DirectoryProvider::is_supported(Path::new("x/notes.txt")));
        assert!(!DirectoryProvider::is_supported(Path::new("x/noext")));
    }
}
