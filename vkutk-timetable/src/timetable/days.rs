use std::collections::HashMap;

use once_cell::sync::Lazy;
use time::Weekday;
use time::Weekday::{Friday, Monday, Saturday, Sunday, Thursday, Tuesday, Wednesday};

/// Every spelling of a weekday the backend and the apps are known to emit.
pub static DAY_LABELS: Lazy<HashMap<&'static str, Weekday>> = Lazy::new(|| {
  HashMap::from([
    ("Thứ 2", Monday),
    ("Thứ 3", Tuesday),
    ("Thứ 4", Wednesday),
    ("Thứ 5", Thursday),
    ("Thứ 6", Friday),
    ("Thứ 7", Saturday),
    ("Thứ Hai", Monday),
    ("Thứ Ba", Tuesday),
    ("Thứ Tư", Wednesday),
    ("Thứ Năm", Thursday),
    ("Thứ Sáu", Friday),
    ("Thứ Bảy", Saturday),
    ("Chủ nhật", Sunday),
    ("Chủ Nhật", Sunday),
    ("CN", Sunday),
    ("T2", Monday),
    ("T3", Tuesday),
    ("T4", Wednesday),
    ("T5", Thursday),
    ("T6", Friday),
    ("T7", Saturday),
    ("Monday", Monday),
    ("Tuesday", Tuesday),
    ("Wednesday", Wednesday),
    ("Thursday", Thursday),
    ("Friday", Friday),
    ("Saturday", Saturday),
    ("Sunday", Sunday),
  ])
});

pub fn weekday(label: &str) -> Option<Weekday> {
  DAY_LABELS.get(label.trim()).copied()
}

pub fn index(weekday: Weekday) -> u8 {
  weekday.number_days_from_monday()
}

pub fn from_index(index: u8) -> Option<Weekday> {
  if index >= super::DAYS_PER_WEEK {
    return None;
  }

  Some(Monday.nth_next(index))
}

/// Spelling the backend's timetable command expects in day preferences.
pub fn label(weekday: Weekday) -> &'static str {
  match weekday {
    Monday => "Thứ 2",
    Tuesday => "Thứ 3",
    Wednesday => "Thứ 4",
    Thursday => "Thứ 5",
    Friday => "Thứ 6",
    Saturday => "Thứ 7",
    Sunday => "Chủ nhật",
  }
}

pub fn display_name(weekday: Weekday) -> &'static str {
  match weekday {
    Monday => "THỨ HAI",
    Tuesday => "THỨ BA",
    Wednesday => "THỨ TƯ",
    Thursday => "THỨ NĂM",
    Friday => "THỨ SÁU",
    Saturday => "THỨ BẢY",
    Sunday => "CHỦ NHẬT",
  }
}

pub fn short_name(weekday: Weekday) -> &'static str {
  match weekday {
    Monday => "T2",
    Tuesday => "T3",
    Wednesday => "T4",
    Thursday => "T5",
    Friday => "T6",
    Saturday => "T7",
    Sunday => "CN",
  }
}

/// Day navigation in the list view wraps around the week.
pub fn next(index: u8) -> u8 {
  (index + 1) % super::DAYS_PER_WEEK
}

pub fn previous(index: u8) -> u8 {
  (index + super::DAYS_PER_WEEK - 1) % super::DAYS_PER_WEEK
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_variant_of_a_day_has_the_same_index() {
    let week: [(u8, &[&str]); 7] = [
      (0, &["Thứ 2", "Thứ Hai", "T2", "Monday"]),
      (1, &["Thứ 3", "Thứ Ba", "T3", "Tuesday"]),
      (2, &["Thứ 4", "Thứ Tư", "T4", "Wednesday"]),
      (3, &["Thứ 5", "Thứ Năm", "T5", "Thursday"]),
      (4, &["Thứ 6", "Thứ Sáu", "T6", "Friday"]),
      (5, &["Thứ 7", "Thứ Bảy", "T7", "Saturday"]),
      (6, &["Chủ nhật", "Chủ Nhật", "CN", "Sunday"]),
    ];

    for (expected, labels) in week {
      for label in labels {
        assert_eq!(weekday(label).map(index), Some(expected), "{label}");
      }
    }

    let covered = week.iter().map(|(_, labels)| labels.len()).sum::<usize>();
    assert_eq!(covered, DAY_LABELS.len());

    assert_eq!(weekday("Thứ 2").map(index), Some(0));
    assert_eq!(weekday("Sunday").map(index), Some(6));
    assert_eq!(weekday("  T3 ").map(index), Some(1));
    assert_eq!(weekday("Thu 2"), None);
  }

  #[test]
  fn navigation_wraps() {
    assert_eq!(next(6), 0);
    assert_eq!(previous(0), 6);
    assert_eq!(from_index(6).map(short_name), Some("CN"));
    assert_eq!(from_index(7), None);
  }
}
