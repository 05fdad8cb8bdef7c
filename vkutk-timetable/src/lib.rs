use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::{ColorMap, Palette};
use crate::grid::Grid;
use crate::timetable::{days, NormalizedSession, Periods, RawSession, TimetableData};

static PERIOD_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)tiết\s*").unwrap());
const RANGE_SEPARATORS: [&str; 2] = ["->", "-"];

pub mod color;
pub mod grid;
pub mod store;
#[cfg(test)]
mod test;
pub mod timetable;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("unknown day label {0:?}")]
  UnknownDay(String),
  #[error("unparseable time slots {0:?}")]
  InvalidPeriod(String),
  /// Well-formed digits that do not fit a period number (above 255).
  #[error("period number out of range in {0:?}")]
  PeriodOutOfRange(String),
  #[error("period range {start}-{end} is empty")]
  EmptyRange { start: u8, end: u8 },
}

/// What to do with a session whose day label is not in the lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DayPolicy {
  /// Place it on Monday.
  #[default]
  Lenient,
  /// Skip it like any other unparseable session.
  Strict,
}

#[derive(Clone, Debug)]
pub struct Skipped {
  pub session: RawSession,
  pub error: ParseError,
}

/// Result of one normalization pass.
#[derive(Clone, Debug)]
pub struct Timetable {
  sessions: Vec<NormalizedSession>,
  colors: ColorMap,
  skipped: Vec<Skipped>,
}

impl Timetable {
  pub fn sessions(&self) -> &[NormalizedSession] {
    &self.sessions
  }

  pub fn colors(&self) -> &ColorMap {
    &self.colors
  }

  pub fn skipped(&self) -> &[Skipped] {
    &self.skipped
  }

  pub fn grid(&self) -> Grid<'_> {
    Grid::new(&self.sessions)
  }
}

#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
  palette: Palette,
  day_policy: DayPolicy,
}

impl Default for Normalizer {
  fn default() -> Self {
    Self::new(Palette::WEB)
  }
}

impl Normalizer {
  pub fn new(palette: Palette) -> Self {
    Self {
      palette,
      day_policy: DayPolicy::default(),
    }
  }

  pub fn with_day_policy(mut self, day_policy: DayPolicy) -> Self {
    self.day_policy = day_policy;
    self
  }

  /// Normalizes the scheduled sessions of a command result.
  pub fn normalize_data(&self, data: &TimetableData) -> Timetable {
    self.normalize(&data.scheduled_sessions)
  }

  /// Runs a full pass with a fresh color map. Sessions that fail to parse are
  /// kept aside in [`Timetable::skipped`] and never reach the grid.
  pub fn normalize(&self, raw_sessions: &[RawSession]) -> Timetable {
    let mut colors = ColorMap::new(self.palette);
    let mut sessions = Vec::with_capacity(raw_sessions.len());
    let mut skipped = Vec::new();

    for raw in raw_sessions {
      match self.normalize_session(raw, &mut colors) {
        Ok(session) => {
          debug!(
            "Session {}, day {:?} -> {}, time slots {:?} -> {}",
            session.course_name, raw.day, session.day_index, raw.time_slots, session.periods
          );
          sessions.push(session);
        }
        Err(error) => {
          warn!("Skipping session {}: {}", raw.course_name, error);
          skipped.push(Skipped {
            session: raw.clone(),
            error,
          });
        }
      }
    }

    let timetable = Timetable {
      sessions,
      colors,
      skipped,
    };

    for conflict in timetable.grid().conflicts() {
      warn!(
        "{} shadows {} on day {} period {}",
        conflict.shown.course_name,
        conflict.shadowed.course_name,
        conflict.day_index,
        conflict.period
      );
    }

    timetable
  }

  /// Normalizes a single session, assigning its color from `colors` only
  /// when it parses.
  pub fn normalize_session(
    &self,
    raw: &RawSession,
    colors: &mut ColorMap,
  ) -> Result<NormalizedSession, ParseError> {
    let day_index = match (parse_day(&raw.day), self.day_policy) {
      (Ok(day_index), _) => day_index,
      (Err(err), DayPolicy::Lenient) => {
        debug!("{err}, placing {} on Monday", raw.course_name);
        0
      }
      (Err(err), DayPolicy::Strict) => return Err(err),
    };

    let periods = parse_periods(&raw.time_slots)?;

    Ok(NormalizedSession {
      course_name: raw.course_name.clone(),
      classroom: raw.classroom.clone(),
      day_index,
      periods,
      color: colors.color_for(&raw.course_name),
    })
  }
}

/// Normalizes with the web palette and lenient day handling.
pub fn normalize(raw_sessions: &[RawSession]) -> Timetable {
  Normalizer::default().normalize(raw_sessions)
}

pub fn parse_day(label: &str) -> Result<u8, ParseError> {
  days::weekday(label)
    .map(days::index)
    .ok_or_else(|| ParseError::UnknownDay(label.to_string()))
}

/// Parses `"1-3"`, `"Tiết 1->4"` or `"6"` into a run of periods.
///
/// A string with more than one separator falls through to the single number
/// case, which only looks at its leading digits.
pub fn parse_periods(time_slots: &str) -> Result<Periods, ParseError> {
  let cleaned = clean(time_slots);
  for separator in RANGE_SEPARATORS {
    if !cleaned.contains(separator) {
      continue;
    }

    if let [start, end] = cleaned.split(separator).collect::<Vec<&str>>()[..] {
      let start = leading_number(start, time_slots)?;
      let end = leading_number(end, time_slots)?;

      return Periods::new(start, end).ok_or(ParseError::EmptyRange { start, end });
    }
  }

  leading_number(&cleaned, time_slots).map(Periods::single)
}

/// Removes every `Tiết` prefix and surrounding whitespace.
fn clean(value: &str) -> String {
  PERIOD_PREFIX_REGEX
    .replace_all(value, "")
    .trim()
    .to_string()
}

/// Reads the leading run of digits, ignoring leading whitespace and anything
/// after the digits. No digits at all is unparseable; digits that overflow a
/// period number are out of range.
fn leading_number(value: &str, time_slots: &str) -> Result<u8, ParseError> {
  let value = value.trim_start();
  let end = value
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(value.len());

  let digits = &value[..end];
  if digits.is_empty() {
    return Err(ParseError::InvalidPeriod(time_slots.to_string()));
  }

  digits
    .parse()
    .map_err(|_| ParseError::PeriodOutOfRange(time_slots.to_string()))
}
