use crate::{
    config::ViewerConfig,
    enums::{ExitAction, Panel, ScanRef, ScanType, ViewerState},
    interaction::{Interaction, InteractionLog},
    navigator::{ControlRange, DisplaySize, NavigationError, SliceNavigator},
    region::{MarkerPlacement, RegionCatalog, RegionCatalogError, RegionMiss},
    slice_loader::{DirectoryProvider, ImageProvider, SliceLoader, SliceLoaderError},
    slice_set::{Slice, SliceSet},
    timer::{FileSessionLog, SessionLog, SessionTimer, TimerRecord},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not load slices: {0}")]
    Load(#[from] SliceLoaderError),

    #[error("Could not load region metadata: {0}")]
    Region(#[from] RegionCatalogError),

    #[error("Unknown scan {0}")]
    UnknownScan(ScanRef),

    #[error("Viewer is already open")]
    NotSelecting,
}

/// Position, rotation (quaternion, xyzw) and scale of the interactable image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

/// UI layer driven by the session.
///
/// The host renders whatever the session pushes and never keeps its own copy
/// of the navigation or marker state.
pub trait ViewerHost {
    fn show_panel(&mut self, panel: Panel);
    fn set_control_range(&mut self, range: ControlRange);
    fn display_slice(&mut self, slice: &Slice, size: DisplaySize);
    fn place_marker(&mut self, placement: &MarkerPlacement);
    fn hide_marker(&mut self);
    fn interactable_transform(&self) -> Transform;
    fn set_interactable_transform(&mut self, transform: Transform);
}

/// One user's viewer session: selection, navigation, findings and timing.
pub struct Session<P: ImageProvider, L: SessionLog> {
    provider: P,
    catalog: RegionCatalog,
    navigator: SliceNavigator,
    timer: SessionTimer<L>,
    interactions: Option<InteractionLog<L>>,
    state: ViewerState,
    panel: Panel,
    current: Option<ScanRef>,
    rest_pose: Option<Transform>,
    scans_per_type: u32,
}

impl Session<DirectoryProvider, FileSessionLog> {
    /// Build a session reading images, metadata and the log from disk
    pub fn from_config(config: &ViewerConfig) -> Result<Self, SessionError> {
        let catalog = RegionCatalog::load_from_files(&config.region_metadata)?;
        let log = FileSessionLog::open(&config.session_log);
        let mut session = Self::new(DirectoryProvider::new(&config.image_root), catalog, log)
            .with_display_width(config.display_width)
            .with_scans_per_type(config.scans_per_type);
        if let Some(path) = &config.interaction_log {
            session = session.with_interaction_log(FileSessionLog::open(path));
        }
        Ok(session)
    }
}

impl<P: ImageProvider, L: SessionLog> Session<P, L> {
    pub fn new(provider: P, catalog: RegionCatalog, log: L) -> Self {
        let defaults = ViewerConfig::default();
        Self {
            provider,
            catalog,
            navigator: SliceNavigator::new(defaults.display_width),
            timer: SessionTimer::new(log),
            interactions: None,
            state: ViewerState::Selecting,
            panel: Panel::MainMenu,
            current: None,
            rest_pose: None,
            scans_per_type: defaults.scans_per_type,
        }
    }

    pub fn with_display_width(mut self, display_width: f32) -> Self {
        self.navigator = SliceNavigator::new(display_width);
        self
    }

    pub fn with_scans_per_type(mut self, scans_per_type: u32) -> Self {
        self.scans_per_type = scans_per_type;
        self
    }

    /// Record every user action to `log` as CSV rows
    pub fn with_interaction_log(mut self, log: L) -> Self {
        self.interactions = Some(InteractionLog::new(log));
        self
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn current_scan(&self) -> Option<ScanRef> {
        self.current
    }

    pub fn slice_set(&self) -> Option<&SliceSet> {
        self.navigator.slice_set()
    }

    pub fn active_index(&self) -> usize {
        self.navigator.active_index()
    }

    pub fn active_slice(&self) -> Option<&Slice> {
        self.navigator.active_slice()
    }

    pub fn rest_pose(&self) -> Option<Transform> {
        self.rest_pose
    }

    pub fn timer(&self) -> &SessionTimer<L> {
        &self.timer
    }

    pub fn interactions(&self) -> Option<&InteractionLog<L>> {
        self.interactions.as_ref()
    }

    /// Marker placement for the active slice; `None` while no scan is open
    pub fn marker(&self) -> Option<Result<MarkerPlacement, RegionMiss>> {
        let scan = self.current?;
        Some(self.catalog.resolve(scan, self.navigator.active_index()))
    }

    /// Show the scan list of one modality
    pub fn open_selection(
        &mut self,
        scan_type: ScanType,
        host: &mut impl ViewerHost,
    ) -> Result<(), SessionError> {
        self.record(Interaction::OpenSelection, scan_type.modality());
        self.ensure_selecting()?;
        self.set_panel(Panel::Selection(scan_type), host);
        Ok(())
    }

    pub fn close_selection(&mut self, host: &mut impl ViewerHost) -> Result<(), SessionError> {
        self.record(Interaction::CloseSelection, "");
        self.ensure_selecting()?;
        self.set_panel(Panel::MainMenu, host);
        Ok(())
    }

    /// Open the viewer on a scan
    ///
    /// # Errors
    ///
    /// Returns an error and stays on the selection panel if the scan id is
    /// unknown, the viewer is already open, or no slices could be loaded
    pub fn enter_viewer(
        &mut self,
        scan: ScanRef,
        host: &mut impl ViewerHost,
    ) -> Result<ControlRange, SessionError> {
        self.record(Interaction::EnterViewer, &scan.to_string());
        self.ensure_selecting()?;
        if !(1..=self.scans_per_type).contains(&scan.scan_id) {
            return Err(SessionError::UnknownScan(scan));
        }

        let slice_set = SliceLoader::load(&self.provider, scan).map_err(|err| {
            log::error!("Cannot open viewer for {scan}: {err}");
            err
        })?;

        self.rest_pose = Some(host.interactable_transform());
        self.current = Some(scan);

        let range = self.navigator.initialize(slice_set);
        host.set_control_range(range);
        self.show_active_slice(host);
        self.update_marker(host);

        self.timer.start(scan);
        self.state = ViewerState::Viewing;
        self.set_panel(Panel::Viewer, host);
        log::info!("Viewing {scan} ({} slices)", range.max);

        Ok(range)
    }

    /// Handle a value from the host's slice control
    pub fn on_control_changed(
        &mut self,
        value: f32,
        host: &mut impl ViewerHost,
    ) -> Result<usize, NavigationError> {
        self.record(Interaction::Navigate, &value.to_string());
        self.navigator.on_control_changed(value)?;
        self.after_navigation(host);
        Ok(self.navigator.active_index())
    }

    pub fn step_forward(&mut self, host: &mut impl ViewerHost) -> Result<usize, NavigationError> {
        self.record(Interaction::StepForward, &self.active_index().to_string());
        self.navigator.step(1)?;
        self.after_navigation(host);
        Ok(self.navigator.active_index())
    }

    pub fn step_back(&mut self, host: &mut impl ViewerHost) -> Result<usize, NavigationError> {
        self.record(Interaction::StepBack, &self.active_index().to_string());
        self.navigator.step(-1)?;
        self.after_navigation(host);
        Ok(self.navigator.active_index())
    }

    /// Leave the viewer and return to the scan list
    ///
    /// Both exit actions finish the running track so no interval is lost.
    /// Returns the finished record, if one was written.
    pub fn exit_viewer(
        &mut self,
        action: ExitAction,
        host: &mut impl ViewerHost,
    ) -> Option<TimerRecord> {
        let event = match action {
            ExitAction::Back => Interaction::Back,
            ExitAction::StopTracking => Interaction::StopTracking,
        };
        let target = self.current.map(|scan| scan.to_string()).unwrap_or_default();
        self.record(event, &target);

        if self.state != ViewerState::Viewing {
            log::debug!("Ignoring {action:?}: viewer is not open");
            return None;
        }

        let record = self.timer.stop();
        if let Some(record) = &record {
            log::info!("{action:?} after {}", record.log_line());
        }

        if let Some(rest_pose) = self.rest_pose.take() {
            host.set_interactable_transform(rest_pose);
        }
        host.hide_marker();
        self.navigator.clear();
        self.state = ViewerState::Selecting;

        let panel = match self.current.take() {
            Some(scan) => Panel::Selection(scan.scan_type),
            None => Panel::MainMenu,
        };
        self.set_panel(panel, host);

        record
    }

    fn record(&mut self, event: Interaction, target: &str) {
        if let Some(interactions) = &mut self.interactions {
            interactions.record(event, target);
        }
    }

    fn ensure_selecting(&self) -> Result<(), SessionError> {
        match self.state {
            ViewerState::Selecting => Ok(()),
            ViewerState::Viewing => Err(SessionError::NotSelecting),
        }
    }

    fn set_panel(&mut self, panel: Panel, host: &mut impl ViewerHost) {
        self.panel = panel;
        host.show_panel(panel);
    }

    fn after_navigation(&mut self, host: &mut impl ViewerHost) {
        self.show_active_slice(host);
        self.update_marker(host);
    }

    fn show_active_slice(&self, host: &mut impl ViewerHost) {
        if let (Some(slice), Some(size)) = (self.navigator.active_slice(), self.navigator.display_size()) {
            host.display_slice(slice, size);
        }
    }

    fn update_marker(&self, host: &mut impl ViewerHost) {
        match self.marker() {
            Some(Ok(placement)) => host.place_marker(&placement),
            Some(Err(miss @ RegionMiss::LookupMiss { .. })) => {
                log::warn!("{miss}");
                host.hide_marker();
            }
            Some(Err(miss @ RegionMiss::SliceMismatch { .. })) => {
                log::debug!("{miss}");
                host.hide_marker();
            }
            None => host.hide_marker(),
        }
    }
}
