use std::path::PathBuf;

/// One image of a scan, as reported by an image provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub name: String,
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Slice {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            width,
            height,
        }
    }

    /// Width over height; a degenerate image is treated as square
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Non-empty, name-ordered slices of one scan.
#[derive(Clone, Debug)]
pub struct SliceSet {
    slices: Vec<Slice>,
}

impl SliceSet {
    /// Caller guarantees `slices` is non-empty and already ordered
    pub(crate) fn new(slices: Vec<Slice>) -> Self {
        debug_assert!(!slices.is_empty());
        Self { slices }
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Get the slice at a 1-based index
    pub fn get(&self, index: usize) -> Option<&Slice> {
        if !self.is_valid_index(index) {
            return None;
        }
        self.slices.get(index - 1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|slice| slice.name.as_str())
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        (1..=self.slices.len()).contains(&index)
    }
}
