use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::macros::time;
use time::Time;

use crate::color::Color;

pub mod days;

pub const FIRST_PERIOD: u8 = 1;
pub const LAST_PERIOD: u8 = 10;
pub const DAYS_PER_WEEK: u8 = 7;

/// Last period of the morning half, everything after it is afternoon.
const LAST_MORNING_PERIOD: u8 = 5;

const PERIOD_START: [Time; LAST_PERIOD as usize] = [
  time!(7:30),
  time!(8:30),
  time!(9:30),
  time!(10:30),
  time!(11:30),
  time!(13:00),
  time!(14:00),
  time!(15:00),
  time!(16:00),
  time!(17:00),
];

/// The backend hands out `stt_id` either as a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
  Integer(i64),
  String(String),
}

impl Display for SessionId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      SessionId::Integer(id) => write!(f, "{id}"),
      SessionId::String(id) => f.write_str(id),
    }
  }
}

/// One course meeting as produced by the timetable command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSession {
  #[serde(
    rename = "stt_id",
    alias = "id",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<SessionId>,
  pub course_name: String,
  #[serde(default)]
  pub day: String,
  #[serde(default)]
  pub time_slots: String,
  #[serde(default)]
  pub classroom: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason_not_selected: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableData {
  pub scheduled_sessions: Vec<RawSession>,
  #[serde(default)]
  pub unscheduled_sessions: Vec<RawSession>,
}

/// Inclusive, non-empty run of consecutive periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Periods {
  start: u8,
  end: u8,
}

impl Periods {
  pub fn new(start: u8, end: u8) -> Option<Self> {
    if end < start {
      return None;
    }

    Some(Self { start, end })
  }

  pub fn single(period: u8) -> Self {
    Self {
      start: period,
      end: period,
    }
  }

  pub fn start(&self) -> u8 {
    self.start
  }

  pub fn end(&self) -> u8 {
    self.end
  }

  pub fn len(&self) -> usize {
    (self.end - self.start) as usize + 1
  }

  /// Always false, a run holds at least one period.
  pub fn is_empty(&self) -> bool {
    false
  }

  pub fn contains(&self, period: u8) -> bool {
    (self.start..=self.end).contains(&period)
  }

  pub fn overlaps(&self, other: &Periods) -> bool {
    self.start <= other.end && other.start <= self.end
  }

  pub fn iter(&self) -> impl Iterator<Item = u8> {
    self.start..=self.end
  }

  pub fn to_vec(&self) -> Vec<u8> {
    self.iter().collect()
  }
}

impl Display for Periods {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.start == self.end {
      write!(f, "{}", self.start)
    } else {
      write!(f, "{}-{}", self.start, self.end)
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedSession {
  pub course_name: String,
  pub classroom: String,
  /// Monday is 0, Sunday is 6.
  pub day_index: u8,
  pub periods: Periods,
  pub color: Color,
}

impl NormalizedSession {
  pub fn span(&self) -> usize {
    self.periods.len()
  }

  pub fn covers(&self, day_index: u8, period: u8) -> bool {
    self.day_index == day_index && self.periods.contains(period)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
  Morning,
  Afternoon,
}

pub fn half(period: u8) -> Half {
  if period <= LAST_MORNING_PERIOD {
    Half::Morning
  } else {
    Half::Afternoon
  }
}

pub fn start_time(period: u8) -> Option<Time> {
  if !(FIRST_PERIOD..=LAST_PERIOD).contains(&period) {
    return None;
  }

  Some(PERIOD_START[(period - FIRST_PERIOD) as usize])
}

pub fn periods() -> impl Iterator<Item = u8> {
  FIRST_PERIOD..=LAST_PERIOD
}
