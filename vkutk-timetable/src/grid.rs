use crate::timetable::{periods, NormalizedSession, DAYS_PER_WEEK};

/// What a single (day, period) cell shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell<'a> {
  /// First period of a session, rendered `span` periods tall.
  Start {
    session: &'a NormalizedSession,
    span: usize,
  },
  /// Covered by a session that started in an earlier period.
  Continuation(&'a NormalizedSession),
  Empty,
}

impl<'a> Cell<'a> {
  pub fn session(&self) -> Option<&'a NormalizedSession> {
    match self {
      Cell::Start { session, .. } | Cell::Continuation(session) => Some(session),
      Cell::Empty => None,
    }
  }
}

/// Two sessions claiming the same cell. Only `shown` is ever rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conflict<'a> {
  pub day_index: u8,
  pub period: u8,
  pub shown: &'a NormalizedSession,
  pub shadowed: &'a NormalizedSession,
}

pub struct Grid<'a> {
  sessions: &'a [NormalizedSession],
}

impl<'a> Grid<'a> {
  pub fn new(sessions: &'a [NormalizedSession]) -> Self {
    Self { sessions }
  }

  /// First session in input order covering the cell.
  pub fn session_at(&self, day_index: u8, period: u8) -> Option<&'a NormalizedSession> {
    self
      .sessions
      .iter()
      .find(|session| session.covers(day_index, period))
  }

  pub fn is_span_start(&self, day_index: u8, period: u8) -> bool {
    self
      .session_at(day_index, period)
      .is_some_and(|session| session.periods.start() == period)
  }

  pub fn cell(&self, day_index: u8, period: u8) -> Cell<'a> {
    match self.session_at(day_index, period) {
      None => Cell::Empty,
      Some(session) if session.periods.start() == period => Cell::Start {
        session,
        span: session.span(),
      },
      Some(session) => Cell::Continuation(session),
    }
  }

  /// List mode: one day, periods in order, continuations left out.
  pub fn day(&self, day_index: u8) -> Vec<(u8, Cell<'a>)> {
    periods()
      .map(|period| (period, self.cell(day_index, period)))
      .filter(|(_, cell)| !matches!(cell, Cell::Continuation(_)))
      .collect()
  }

  /// Grid mode: `week[period - 1][day_index]`, continuations included so the
  /// caller can skip them.
  pub fn week(&self) -> Vec<Vec<Cell<'a>>> {
    periods()
      .map(|period| {
        (0..DAYS_PER_WEEK)
          .map(|day_index| self.cell(day_index, period))
          .collect()
      })
      .collect()
  }

  pub fn conflicts(&self) -> Vec<Conflict<'a>> {
    let mut conflicts = Vec::new();

    for (i, shown) in self.sessions.iter().enumerate() {
      for shadowed in &self.sessions[i + 1..] {
        if shown.day_index != shadowed.day_index || !shown.periods.overlaps(&shadowed.periods) {
          continue;
        }

        for period in shadowed.periods.iter().filter(|p| shown.periods.contains(*p)) {
          // a third session earlier in the list may already own this cell
          if !self
            .session_at(shown.day_index, period)
            .is_some_and(|owner| std::ptr::eq(owner, shown))
          {
            continue;
          }

          conflicts.push(Conflict {
            day_index: shown.day_index,
            period,
            shown,
            shadowed,
          });
        }
      }
    }

    conflicts
  }
}
