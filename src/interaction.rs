use crate::timer::SessionLog;

use std::fmt;
use web_time::Instant;

/// User actions recorded in the interaction log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    OpenSelection,
    CloseSelection,
    EnterViewer,
    Navigate,
    StepForward,
    StepBack,
    Back,
    StopTracking,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interaction::OpenSelection => "OpenSelection",
            Interaction::CloseSelection => "CloseSelection",
            Interaction::EnterViewer => "EnterViewer",
            Interaction::Navigate => "Navigate",
            Interaction::StepForward => "StepForward",
            Interaction::StepBack => "StepBack",
            Interaction::Back => "Back",
            Interaction::StopTracking => "StopTracking",
        };
        f.write_str(name)
    }
}

/// CSV log of every user action, one row per event:
/// `Index,Time(ms),Event,Target`.
///
/// Time is measured from the creation of the log. The index only advances
/// on rows that were written.
#[derive(Debug)]
pub struct InteractionLog<L: SessionLog> {
    log: L,
    started: Instant,
    written: usize,
}

impl<L: SessionLog> InteractionLog<L> {
    pub const HEADER: &'static str = "Index,Time(ms),Event,Target";

    pub fn new(log: L) -> Self {
        Self::new_at(log, Instant::now())
    }

    pub fn new_at(mut log: L, now: Instant) -> Self {
        if let Err(err) = log.append(Self::HEADER) {
            log::error!("Failed to write interaction log header: {err}");
        }
        Self {
            log,
            started: now,
            written: 0,
        }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn record(&mut self, event: Interaction, target: &str) {
        self.record_at(event, target, Instant::now());
    }

    pub fn record_at(&mut self, event: Interaction, target: &str, now: Instant) {
        let millis = now.saturating_duration_since(self.started).as_millis();
        let row = format!("{},{millis},{event},{target}", self.written);
        match self.log.append(&row) {
            Ok(()) => self.written += 1,
            Err(err) => log::error!("Failed to write interaction log: {err}"),
        }
    }
}
