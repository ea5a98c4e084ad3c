//! # Scan viewer session
//!
//! This crate holds the stateful core of an immersive X-ray/CT viewer. The
//! host application (scene graph, input, rendering) stays outside and talks
//! to a [`Session`] through the [`ViewerHost`] trait.
//!
//! A session covers:
//!  - Loading the slices of a scan, ordered by file name
//!  - Mapping the slice slider onto a 1-based slice index and resizing the
//!    image container to the slice's aspect ratio
//!  - Placing the finding marker from the region metadata, or hiding it when
//!    the finding is not on the current slice
//!  - Timing how long each scan is inspected and appending it to a log file
//!  - Restoring the image to its rest pose when the viewer closes
//!  - Optionally recording every user action to a CSV interaction log
//!
//! Images are discovered below a root folder as `XRay/XR<n>/` and
//! `CTScan/CT<n>/`. PNG/JPEG and DICOM slices are accepted; only their
//! dimensions are read. Discovery probes the files in parallel using rayon.
//!
//! Region metadata is JSON:
//!
//! ```json
//! { "images": [ { "image_name": "CT1.png", "id": 2,
//!     "altered_region": { "center": { "x": 10, "y": -5 }, "radius": 3 } } ] }
//! ```
//!
//! `id` is only meaningful for CT, where a finding belongs to one slice.
//!
//! # Examples
//!
//! ## Opening a CT scan and scrolling through it
//!
//! ```no_run
//! # use scan_viewer::{ExitAction, ScanRef, ScanType, Session, ViewerConfig, ViewerHost};
//! # fn run(host: &mut impl ViewerHost) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ViewerConfig::load("viewer.json")?;
//! let mut session = Session::from_config(&config)?;
//!
//! session.open_selection(ScanType::CTScan, host)?;
//! let range = session.enter_viewer(ScanRef::new(ScanType::CTScan, 1), host)?;
//! session.on_control_changed(range.max as f32, host)?;
//! if let Some(record) = session.exit_viewer(ExitAction::StopTracking, host) {
//!     println!("{}", record.log_line());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod enums;
pub mod interaction;
pub mod navigator;
pub mod region;
pub mod session;
pub mod slice_loader;
pub mod slice_set;
pub mod timer;

pub use config::{ConfigError, ViewerConfig};
pub use enums::{ExitAction, Panel, ScanRef, ScanType, ViewerState};
pub use interaction::{Interaction, InteractionLog};
pub use navigator::{ControlRange, DisplaySize, NavigationError, SliceNavigator};
pub use region::{Finding, MarkerPlacement, Point, RegionCatalog, RegionCatalogError, RegionMiss};
pub use session::{Session, SessionError, Transform, ViewerHost};
pub use slice_loader::{DirectoryProvider, ImageProvider, SliceLoader, SliceLoaderError};
pub use slice_set::{Slice, SliceSet};
pub use timer::{FileSessionLog, SessionLog, SessionTimer, TimerRecord};
