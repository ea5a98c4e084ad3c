use crate::slice_set::{Slice, SliceSet};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    #[error("Slice index {value} outside of [1, {max}]")]
    IndexOutOfRange { value: f32, max: usize },

    #[error("No slice set is loaded")]
    NotLoaded,
}

/// Bounds pushed to the host's navigation control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlRange {
    pub min: usize,
    pub max: usize,
    pub whole_numbers: bool,
}

/// Size of the image container, keeping the slice's aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn fit_width(width: f32, slice: &Slice) -> Self {
        Self {
            width,
            height: width / slice.aspect_ratio(),
        }
    }
}

/// Maps the navigation control onto a 1-based slice index.
#[derive(Debug)]
pub struct SliceNavigator {
    slice_set: Option<SliceSet>,
    active: usize,
    display_width: f32,
}

impl SliceNavigator {
    pub fn new(display_width: f32) -> Self {
        Self {
            slice_set: None,
            active: 1,
            display_width,
        }
    }

    /// Take ownership of a freshly loaded set and show its first slice
    pub fn initialize(&mut self, slice_set: SliceSet) -> ControlRange {
        let range = ControlRange {
            min: 1,
            max: slice_set.len(),
            whole_numbers: true,
        };
        self.slice_set = Some(slice_set);
        self.active = 1;
        range
    }

    pub fn clear(&mut self) {
        self.slice_set = None;
        self.active = 1;
    }

    pub fn slice_set(&self) -> Option<&SliceSet> {
        self.slice_set.as_ref()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slice(&self) -> Option<&Slice> {
        self.slice_set.as_ref()?.get(self.active)
    }

    pub fn display_size(&self) -> Option<DisplaySize> {
        self.active_slice()
            .map(|slice| DisplaySize::fit_width(self.display_width, slice))
    }

    /// Handle a new control value
    ///
    /// Values outside the slice range are rejected and the active slice is
    /// kept; values inside it are snapped to the nearest whole number.
    pub fn on_control_changed(&mut self, value: f32) -> Result<&Slice, NavigationError> {
        let slice_set = self.slice_set.as_ref().ok_or(NavigationError::NotLoaded)?;
        let max = slice_set.len();

        if !value.is_finite() || value < 1.0 || value > max as f32 {
            log::warn!("Invalid slider index {value}");
            return Err(NavigationError::IndexOutOfRange { value, max });
        }

        self.active = value.round() as usize;
        slice_set
            .get(self.active)
            .ok_or(NavigationError::IndexOutOfRange { value, max })
    }

    /// Move by `delta` slices, stopping at either end of the set
    pub fn step(&mut self, delta: isize) -> Result<&Slice, NavigationError> {
        let slice_set = self.slice_set.as_ref().ok_or(NavigationError::NotLoaded)?;
        let max = slice_set.len();
        self.active = self.active.saturating_add_signed(delta).clamp(1, max);
        slice_set
            .get(self.active)
            .ok_or(NavigationError::IndexOutOfRange {
                value: self.active as f32,
                max,
            })
    }
}
