use std::fmt::{Display, Formatter};

use time::macros::format_description;
use time::Weekday;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use vkutk_timetable::grid::Cell;
use vkutk_timetable::store::SavedTimetable;
use vkutk_timetable::timetable::{days, half, periods, start_time, Half, RawSession};
use vkutk_timetable::Timetable;

const COLUMN_WIDTH: usize = 16;
const PERIOD_WIDTH: usize = 9;
const SLOT_WIDTH: usize = 10;

/// Pads or cuts `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
  let mut out = String::with_capacity(width);
  let mut used = 0;

  if text.width() <= width {
    out.push_str(text);
    used = text.width();
  } else {
    for c in text.chars() {
      let char_width = c.width().unwrap_or(0);
      if used + char_width + 1 > width {
        break;
      }
      out.push(c);
      used += char_width;
    }
    out.push('…');
    used += 1;
  }

  out.push_str(&" ".repeat(width.saturating_sub(used)));
  out
}

fn time_label(period: u8) -> String {
  start_time(period)
    .map(|time| format!("{:02}:{:02}", time.hour(), time.minute()))
    .unwrap_or_default()
}

fn half_title(half: Half) -> &'static str {
  match half {
    Half::Morning => "Buổi sáng",
    Half::Afternoon => "Buổi chiều",
  }
}

/// List mode: one day, one block per session, `span` lines tall.
pub struct DayView<'a> {
  pub timetable: &'a Timetable,
  pub weekday: Weekday,
}

impl Display for DayView<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let grid = self.timetable.grid();
    let day_index = days::index(self.weekday);

    writeln!(
      f,
      "{} ({})",
      days::display_name(self.weekday),
      days::short_name(self.weekday)
    )?;

    let mut current_half = None;
    for (period, cell) in grid.day(day_index) {
      if current_half != Some(half(period)) {
        current_half = Some(half(period));
        writeln!(f, "{}", half_title(half(period)))?;
      }

      let blank = format!("  {:5} {}│", "", fit("", SLOT_WIDTH));

      match cell {
        Cell::Start { session, span } => {
          let slot = fit(&format!("Tiết {}", session.periods), SLOT_WIDTH);
          let head = format!("  {} {}│", time_label(period), slot);

          if span == 1 {
            writeln!(f, "{} {} · {}", head, session.course_name, session.classroom)?;
          } else {
            writeln!(f, "{} {}", head, session.course_name)?;
            writeln!(f, "{} {}", blank, session.classroom)?;
            for _ in 2..span {
              writeln!(f, "{}", blank)?;
            }
          }
        }
        Cell::Empty => {
          let slot = fit(&format!("Tiết {}", period), SLOT_WIDTH);
          writeln!(f, "  {} {}│", time_label(period), slot)?;
        }
        Cell::Continuation(_) => {}
      }
    }

    Ok(())
  }
}

/// Grid mode: periods down, days across.
pub struct WeekView<'a> {
  pub timetable: &'a Timetable,
}

impl Display for WeekView<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let week = self.timetable.grid().week();

    write!(f, "{}", fit("", PERIOD_WIDTH))?;
    for weekday in (0..7).filter_map(days::from_index) {
      write!(f, "│{}", fit(days::short_name(weekday), COLUMN_WIDTH))?;
    }
    writeln!(f)?;

    for (period, row) in periods().zip(week) {
      if period > 1 && half(period) != half(period - 1) {
        writeln!(
          f,
          "{}",
          "─".repeat(PERIOD_WIDTH + 7 * (COLUMN_WIDTH + 1))
        )?;
      }

      write!(
        f,
        "{}",
        fit(&format!("{:>2} {}", period, time_label(period)), PERIOD_WIDTH)
      )?;

      for cell in row {
        let text = match cell {
          Cell::Start { session, .. } => session.course_name.clone(),
          Cell::Continuation(session) if period == session.periods.start() + 1 => {
            session.classroom.clone()
          }
          Cell::Continuation(_) => "┆".to_string(),
          Cell::Empty => String::new(),
        };
        write!(f, "│{}", fit(&text, COLUMN_WIDTH))?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

pub struct SavedList<'a>(pub &'a [SavedTimetable]);

impl Display for SavedList<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");

    for (i, saved) in self.0.iter().enumerate() {
      let timestamp = saved
        .timestamp
        .format(&format)
        .map_err(|_| std::fmt::Error)?;

      write!(
        f,
        "{}  {}  {} môn đã xếp, {} môn chưa xếp",
        saved.id,
        timestamp,
        saved.data.scheduled_sessions.len(),
        saved.data.unscheduled_sessions.len()
      )?;
      if i == 0 {
        write!(f, "  (mới nhất)")?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

pub struct Unscheduled<'a>(pub &'a [RawSession]);

impl Display for Unscheduled<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.0.is_empty() {
      return Ok(());
    }

    writeln!(f, "Chưa xếp được ({} môn):", self.0.len())?;
    for session in self.0 {
      match &session.reason_not_selected {
        Some(reason) => writeln!(f, "- {}: {}", session.course_name, reason)?,
        None => writeln!(f, "- {}", session.course_name)?,
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod test {
  use time::Weekday::{Monday, Tuesday};

  use vkutk_timetable::normalize;
  use vkutk_timetable::timetable::RawSession;

  use super::*;

  fn raw(course_name: &str, day: &str, time_slots: &str, classroom: &str) -> RawSession {
    RawSession {
      id: None,
      course_name: course_name.to_string(),
      day: day.to_string(),
      time_slots: time_slots.to_string(),
      classroom: classroom.to_string(),
      reason_not_selected: None,
    }
  }

  #[test]
  fn fit_pads_and_cuts_by_display_width() {
    assert_eq!(fit("Web", 5), "Web  ");
    assert_eq!(fit("Lập trình Web", 6), "Lập t…");
    assert_eq!(fit("Lập trình Web", 6).width(), 6);
  }

  #[test]
  fn day_view_renders_spans_as_tall_blocks() {
    let timetable = normalize(&[
      raw("Mạng máy tính", "Thứ 3", "1-2", "K.A101"),
      raw("Cơ sở dữ liệu", "Thứ 3", "Tiết 3->4", "K.A102"),
    ]);

    let text = DayView {
      timetable: &timetable,
      weekday: Tuesday,
    }
    .to_string();
    let lines = text.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "THỨ BA (T3)");
    assert_eq!(lines[1], "Buổi sáng");
    assert!(lines[2].starts_with("  07:30 Tiết 1-2"));
    assert!(lines[2].ends_with("Mạng máy tính"));
    assert!(lines[3].ends_with("K.A101"));
    assert!(lines[4].starts_with("  09:30 Tiết 3-4"));
    assert!(lines[4].ends_with("Cơ sở dữ liệu"));
    assert!(lines[5].ends_with("K.A102"));
    assert!(lines[6].starts_with("  11:30 Tiết 5"));
    assert_eq!(lines[7], "Buổi chiều");
    // header, two halves, two 2-line blocks, six empty periods
    assert_eq!(lines.len(), 1 + 2 + 4 + 6);
  }

  #[test]
  fn day_view_of_a_free_day_lists_every_period() {
    let timetable = normalize(&[raw("Mạng máy tính", "Thứ 3", "1-2", "K.A101")]);

    let text = DayView {
      timetable: &timetable,
      weekday: Monday,
    }
    .to_string();

    assert!(!text.contains("Mạng máy tính"));
    assert_eq!(text.matches("Tiết").count(), 10);
  }

  #[test]
  fn week_view_places_sessions_in_their_column() {
    let timetable = normalize(&[raw("Toán", "CN", "6->8", "B11")]);

    let text = WeekView {
      timetable: &timetable,
    }
    .to_string();
    let lines = text.lines().collect::<Vec<_>>();

    // header, five morning rows, separator, then period 6
    assert!(lines[0].contains("│CN"));
    assert!(lines[6].starts_with('─'));
    let columns = lines[7].split('│').collect::<Vec<_>>();
    assert_eq!(columns.len(), 8);
    assert_eq!(columns[7].trim_end(), "Toán");
    assert_eq!(lines[8].split('│').nth(7).map(str::trim_end), Some("B11"));
    assert_eq!(lines[9].split('│').nth(7).map(str::trim_end), Some("┆"));
    assert_eq!(lines[10].split('│').nth(7).map(str::trim_end), Some(""));
  }

  #[test]
  fn unscheduled_sessions_show_their_reason() {
    let mut session = raw("Triết học", "", "", "");
    session.reason_not_selected = Some("Trùng lịch".to_string());

    assert_eq!(
      Unscheduled(&[session]).to_string(),
      "Chưa xếp được (1 môn):\n- Triết học: Trùng lịch\n"
    );
    assert_eq!(Unscheduled(&[]).to_string(), "");
  }
}
