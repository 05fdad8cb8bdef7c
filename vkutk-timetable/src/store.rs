use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::timetable::TimetableData;

/// How many saved timetables are kept, newest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retention {
  Capped(usize),
  Unlimited,
}

impl Retention {
  pub const WEB: Retention = Retention::Capped(3);
  pub const MOBILE: Retention = Retention::Unlimited;

  fn apply(&self, timetables: &mut Vec<SavedTimetable>) {
    if let Retention::Capped(limit) = *self {
      timetables.truncate(limit);
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTimetable {
  /// Milliseconds since the Unix epoch at import time.
  pub id: i64,
  #[serde(with = "time::serde::rfc3339")]
  pub timestamp: OffsetDateTime,
  pub data: TimetableData,
}

/// JSON file holding saved timetables, newest first.
pub struct TimetableStore {
  path: PathBuf,
  retention: Retention,
}

impl TimetableStore {
  pub fn new(path: impl Into<PathBuf>, retention: Retention) -> Self {
    Self {
      path: path.into(),
      retention,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Reads all saved timetables. A missing or unreadable store reads as empty.
  pub fn load(&self) -> Vec<SavedTimetable> {
    let text = match fs::read_to_string(&self.path) {
      Ok(text) => text,
      Err(err) if err.kind() == ErrorKind::NotFound => return Vec::new(),
      Err(err) => {
        warn!("Unable to read {}: {}", self.path.display(), err);
        return Vec::new();
      }
    };

    match serde_json::from_str(&text) {
      Ok(timetables) => timetables,
      Err(err) => {
        warn!("Ignoring corrupt store {}: {}", self.path.display(), err);
        Vec::new()
      }
    }
  }

  pub fn latest(&self) -> Option<SavedTimetable> {
    self.load().into_iter().next()
  }

  pub fn get(&self, id: i64) -> Option<SavedTimetable> {
    self.load().into_iter().find(|timetable| timetable.id == id)
  }

  pub fn import(&self, data: TimetableData, now: OffsetDateTime) -> anyhow::Result<SavedTimetable> {
    if data.scheduled_sessions.is_empty() {
      return Err(anyhow!("Timetable has no scheduled sessions to save"));
    }

    let saved = SavedTimetable {
      id: (now.unix_timestamp_nanos() / 1_000_000) as i64,
      timestamp: now,
      data,
    };

    let mut timetables = self.load();
    timetables.insert(0, saved.clone());
    self.retention.apply(&mut timetables);
    self.write(&timetables)?;

    info!(
      "Saved timetable {} with {} sessions, {} kept",
      saved.id,
      saved.data.scheduled_sessions.len(),
      timetables.len()
    );

    Ok(saved)
  }

  /// Returns whether a timetable with this id existed.
  pub fn delete(&self, id: i64) -> anyhow::Result<bool> {
    let mut timetables = self.load();
    let count = timetables.len();
    timetables.retain(|timetable| timetable.id != id);

    if timetables.len() == count {
      return Ok(false);
    }

    self.write(&timetables)?;
    info!("Deleted timetable {}", id);

    Ok(true)
  }

  fn write(&self, timetables: &[SavedTimetable]) -> anyhow::Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)
        .with_context(|| format!("Unable to create {}", parent.display()))?;
    }

    let mut tmp = self.path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, serde_json::to_vec_pretty(timetables)?)
      .with_context(|| format!("Unable to write {}", tmp.display()))?;
    fs::rename(&tmp, &self.path)
      .with_context(|| format!("Unable to replace {}", self.path.display()))?;

    Ok(())
  }
}
