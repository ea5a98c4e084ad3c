#![allow(dead_code)]

use scan_viewer::{
    ControlRange, DisplaySize, ImageProvider, MarkerPlacement, Panel, Slice, SliceLoaderError,
    Transform, ViewerHost,
};
use std::collections::HashMap;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Provider serving fixed slice lists per folder key
#[derive(Default)]
pub struct MemoryProvider {
    folders: HashMap<String, Vec<Slice>>,
}

impl MemoryProvider {
    pub fn with_folder(mut self, folder_key: &str, names: &[&str]) -> Self {
        let slices = names
            .iter()
            .map(|name| Slice::new(*name, format!("{folder_key}/{name}"), 400, 200))
            .collect();
        self.folders.insert(folder_key.to_owned(), slices);
        self
    }
}

impl ImageProvider for MemoryProvider {
    fn list(&self, folder_key: &str) -> Result<Vec<Slice>, SliceLoaderError> {
        Ok(self.folders.get(folder_key).cloned().unwrap_or_default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    Panel(Panel),
    Range(ControlRange),
    Slice(String, DisplaySize),
    Marker(MarkerPlacement),
    HideMarker,
    SetTransform(Transform),
}

/// Host that records everything the session pushes to it
#[derive(Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    pub transform: Transform,
}

impl RecordingHost {
    pub fn displayed_slice(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            HostEvent::Slice(name, _) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Marker as last set by the session; `None` when hidden
    pub fn marker(&self) -> Option<MarkerPlacement> {
        self.events.iter().rev().find_map(|event| match event {
            HostEvent::Marker(placement) => Some(Some(*placement)),
            HostEvent::HideMarker => Some(None),
            _ => None,
        })?
    }

    pub fn visible_panel(&self) -> Option<Panel> {
        self.events.iter().rev().find_map(|event| match event {
            HostEvent::Panel(panel) => Some(*panel),
            _ => None,
        })
    }
}

impl ViewerHost for RecordingHost {
    fn show_panel(&mut self, panel: Panel) {
        self.events.push(HostEvent::Panel(panel));
    }

    fn set_control_range(&mut self, range: ControlRange) {
        self.events.push(HostEvent::Range(range));
    }

    fn display_slice(&mut self, slice: &Slice, size: DisplaySize) {
        self.events.push(HostEvent::Slice(slice.name.clone(), size));
    }

    fn place_marker(&mut self, placement: &MarkerPlacement) {
        self.events.push(HostEvent::Marker(*placement));
    }

    fn hide_marker(&mut self) {
        self.events.push(HostEvent::HideMarker);
    }

    fn interactable_transform(&self) -> Transform {
        self.transform
    }

    fn set_interactable_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.events.push(HostEvent::SetTransform(transform));
    }
}
