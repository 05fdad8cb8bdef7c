use crate::color::Palette;
use crate::timetable::{Periods, RawSession, TimetableData};
use crate::{normalize, parse_periods, DayPolicy, Normalizer, ParseError};

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
fn web_programming_on_monday_morning() {
  let timetable = normalize(&[raw("Lập trình Web", "Thứ 2", "Tiết 1->3", "A201")]);

  let session = &timetable.sessions()[0];
  assert_eq!(session.course_name, "Lập trình Web");
  assert_eq!(session.classroom, "A201");
  assert_eq!(session.day_index, 0);
  assert_eq!(session.periods.to_vec(), vec![1, 2, 3]);

  let grid = timetable.grid();
  assert_eq!(grid.session_at(0, 2), Some(session));
  assert!(grid.is_span_start(0, 1));
  assert!(!grid.is_span_start(0, 2));
}

#[test]
fn ranges_expand_to_every_period() {
  for (start, end) in [(1, 1), (1, 3), (4, 6), (7, 10)] {
    for text in [format!("{start}-{end}"), format!("Tiết {start}->{end}")] {
      let periods = parse_periods(&text).unwrap();
      assert_eq!(periods.to_vec(), (start..=end).collect::<Vec<u8>>(), "{text}");
      assert_eq!(periods.len(), (end - start + 1) as usize);
      assert!(!periods.is_empty());
    }
  }
}

#[test]
fn period_text_variants() {
  assert_eq!(parse_periods("6"), Ok(Periods::single(6)));
  assert_eq!(parse_periods("  tiết 7 - 9 "), Ok(Periods::new(7, 9).unwrap()));
  assert_eq!(parse_periods("TIẾT 2"), Ok(Periods::single(2)));
  assert_eq!(parse_periods("3abc"), Ok(Periods::single(3)));
  // more than one separator: only the leading number counts
  assert_eq!(parse_periods("1-2-3"), Ok(Periods::single(1)));
}

#[test]
fn unparseable_periods_are_rejected() {
  assert_eq!(
    parse_periods("Tiết x->3"),
    Err(ParseError::InvalidPeriod("Tiết x->3".to_string()))
  );
  assert_eq!(parse_periods(""), Err(ParseError::InvalidPeriod(String::new())));
  assert_eq!(
    parse_periods("5-2"),
    Err(ParseError::EmptyRange { start: 5, end: 2 })
  );
}

#[test]
fn oversized_period_numbers_are_out_of_range() {
  assert_eq!(
    parse_periods("Tiết 1->300"),
    Err(ParseError::PeriodOutOfRange("Tiết 1->300".to_string()))
  );
  assert_eq!(
    parse_periods("256"),
    Err(ParseError::PeriodOutOfRange("256".to_string()))
  );
  assert_eq!(parse_periods("255"), Ok(Periods::single(255)));
}

#[test]
fn malformed_sessions_never_reach_the_grid() {
  let timetable = normalize(&[
    raw("Giải tích", "Thứ 3", "abc", "B105"),
    raw("Vật lý", "Thứ 3", "1-2", "B106"),
  ]);

  assert_eq!(timetable.sessions().len(), 1);
  assert_eq!(timetable.skipped().len(), 1);
  assert_eq!(timetable.skipped()[0].session.course_name, "Giải tích");
  assert_eq!(timetable.grid().session_at(1, 1).unwrap().course_name, "Vật lý");
  // skipped sessions do not use up a color
  assert_eq!(timetable.sessions()[0].color, Palette::WEB.get(0));
}

#[test]
fn unknown_day_policy() {
  let sessions = [raw("Triết học", "Thu 9", "1-2", "C201")];

  let lenient = normalize(&sessions);
  assert_eq!(lenient.sessions()[0].day_index, 0);

  let strict = Normalizer::default()
    .with_day_policy(DayPolicy::Strict)
    .normalize(&sessions);
  assert!(strict.sessions().is_empty());
  assert_eq!(
    strict.skipped()[0].error,
    ParseError::UnknownDay("Thu 9".to_string())
  );
}

#[test]
fn colors_follow_course_names_within_a_pass() {
  let timetable = Normalizer::new(Palette::MOBILE).normalize(&[
    raw("Lập trình Web", "T2", "1-3", "A201"),
    raw("Cơ sở dữ liệu", "T3", "4-5", "A202"),
    raw("Lập trình Web", "T5", "6-8", "A201"),
  ]);

  let sessions = timetable.sessions();
  assert_eq!(sessions[0].color, sessions[2].color);
  assert_ne!(sessions[0].color, sessions[1].color);
  assert_eq!(sessions[0].color, Palette::MOBILE.get(0));
  assert_eq!(timetable.colors().len(), 2);
}

#[test]
fn command_result_parses_from_json() {
  let data: TimetableData = serde_json::from_str(
    r#"{
      "scheduled_sessions": [
        {"stt_id": 12, "course_name": "Lập trình Web", "day": "Thứ Hai", "time_slots": "Tiết 1->3", "classroom": "A201"},
        {"stt_id": "13", "course_name": "Mạng máy tính", "day": "Thứ 4", "time_slots": "6-7", "classroom": "K.A101"}
      ]
    }"#,
  )
  .unwrap();

  assert!(data.unscheduled_sessions.is_empty());

  let timetable = Normalizer::default().normalize_data(&data);
  assert_eq!(timetable.sessions().len(), 2);
  assert_eq!(timetable.sessions()[1].day_index, 2);
  assert_eq!(timetable.sessions()[1].periods.to_vec(), vec![6, 7]);
}
