use crate::enums::ScanRef;

use chrono::{DateTime, Local};
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};
use web_time::Instant;

/// Append-only sink for finished inspection intervals.
pub trait SessionLog {
    fn append(&mut self, line: &str) -> io::Result<()>;
}

impl SessionLog for Vec<String> {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_owned());
        Ok(())
    }
}

/// Session log backed by a text file, one line per record.
///
/// Every line is flushed and synced before `append` returns. A missing file
/// is created.
#[derive(Debug)]
pub struct FileSessionLog {
    path: PathBuf,
}

impl FileSessionLog {
    /// Open the log and mark the start of a new session in it
    ///
    /// A header that cannot be written is logged; later appends retry the
    /// file on their own.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut log = Self { path: path.into() };
        let header = format!("Log {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        if let Err(err) = log.append(&header) {
            log::error!("Failed to write log header to {}: {err}", log.path.display());
        }
        log
    }

    fn open_for_append(&self) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl SessionLog for FileSessionLog {
    fn append(&mut self, line: &str) -> io::Result<()> {
        let mut file = self.open_for_append()?;
        writeln!(file, "{line}")?;
        file.flush()?;
        file.sync_data()
    }
}

/// A finished inspection interval.
#[derive(Clone, Debug, PartialEq)]
pub struct TimerRecord {
    pub scan: ScanRef,
    pub started_at: DateTime<Local>,
    pub elapsed: Duration,
}

impl TimerRecord {
    /// Line written to the session log, e.g. `CT1\t2.500 seconds`
    pub fn log_line(&self) -> String {
        format!("{}\t{:.3} seconds", self.scan, self.elapsed.as_secs_f64())
    }
}

#[derive(Debug)]
struct ActiveTrack {
    scan: ScanRef,
    started: Instant,
    started_at: DateTime<Local>,
}

/// Stopwatch for the image currently being inspected.
///
/// At most one image is tracked; starting again replaces the running track
/// without writing it.
#[derive(Debug)]
pub struct SessionTimer<L: SessionLog> {
    log: L,
    active: Option<ActiveTrack>,
}

impl<L: SessionLog> SessionTimer<L> {
    pub fn new(log: L) -> Self {
        Self { log, active: None }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, scan: ScanRef) {
        self.start_at(scan, Instant::now());
    }

    pub fn start_at(&mut self, scan: ScanRef, now: Instant) {
        if let Some(previous) = &self.active {
            log::debug!("Discarding unfinished track of {}", previous.scan);
        }
        self.active = Some(ActiveTrack {
            scan,
            started: now,
            started_at: Local::now(),
        });
    }

    pub fn stop(&mut self) -> Option<TimerRecord> {
        self.stop_at(Instant::now())
    }

    /// Finish the running track and append it to the log
    ///
    /// Returns `None` when nothing is tracked. A failed append is logged and
    /// the record is still returned.
    pub fn stop_at(&mut self, now: Instant) -> Option<TimerRecord> {
        let track = self.active.take()?;
        let record = TimerRecord {
            scan: track.scan,
            started_at: track.started_at,
            elapsed: now.saturating_duration_since(track.started),
        };

        if let Err(err) = self.log.append(&record.log_line()) {
            log::error!("Failed to write session log: {err}");
        }

        Some(record)
    }
}
