use std::fmt;

/// Imaging modality of a scan group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanType {
    XRay,
    CTScan,
}

impl ScanType {
    /// Short modality code used in image keys and the session log
    pub fn modality(&self) -> &'static str {
        match self {
            ScanType::XRay => "XR",
            ScanType::CTScan => "CT",
        }
    }

    /// Whether a finding belongs to one specific slice of the set
    pub fn requires_slice_specific_findings(&self) -> bool {
        matches!(self, ScanType::CTScan)
    }

    /// Top-level folder holding this modality's image collections
    pub fn folder_name(&self) -> &'static str {
        match self {
            ScanType::XRay => "XRay",
            ScanType::CTScan => "CTScan",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.modality())
    }
}

/// A scan group within one modality, e.g. `CT1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanRef {
    pub scan_type: ScanType,
    /// 1-based scan id
    pub scan_id: u32,
}

impl ScanRef {
    pub fn new(scan_type: ScanType, scan_id: u32) -> Self {
        Self { scan_type, scan_id }
    }

    /// Key under which the image collection is discovered, e.g. `CTScan/CT1`
    pub fn folder_key(&self) -> String {
        format!("{}/{}", self.scan_type.folder_name(), self)
    }

    /// Key under which the finding is stored in the region catalog, e.g. `CT1.png`
    pub fn image_key(&self) -> String {
        format!("{self}.png")
    }
}

impl fmt::Display for ScanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.scan_type.modality(), self.scan_id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewerState {
    #[default]
    Selecting,
    Viewing,
}

/// Panels the host shows; exactly one is visible at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    MainMenu,
    Selection(ScanType),
    Viewer,
}

/// How the user left the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitAction {
    Back,
    StopTracking,
}
