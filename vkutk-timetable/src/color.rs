use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
  pub fn as_str(&self) -> &'static str {
    self.0
  }
}

impl Display for Color {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.0)
  }
}

/// Fixed, ordered set of course colors. Never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette(&'static [Color]);

impl Palette {
  /// Tailwind gradients used by the web client.
  pub const WEB: Palette = Palette(&[
    Color("from-blue-600 to-blue-700"),
    Color("from-cyan-600 to-cyan-700"),
    Color("from-sky-600 to-sky-700"),
    Color("from-indigo-600 to-indigo-700"),
    Color("from-teal-600 to-teal-700"),
    Color("from-blue-500 to-blue-600"),
    Color("from-cyan-500 to-cyan-600"),
    Color("from-sky-500 to-sky-600"),
    Color("from-indigo-500 to-indigo-600"),
    Color("from-teal-500 to-teal-600"),
    Color("from-blue-700 to-blue-800"),
    Color("from-cyan-700 to-cyan-800"),
    Color("from-sky-700 to-sky-800"),
    Color("from-indigo-700 to-indigo-800"),
    Color("from-teal-700 to-teal-800"),
  ]);

  /// Hex colors used by the mobile app.
  pub const MOBILE: Palette = Palette(&[
    Color("#6366F1"),
    Color("#EC4899"),
    Color("#10B981"),
    Color("#F59E0B"),
    Color("#8B5CF6"),
    Color("#3B82F6"),
    Color("#EF4444"),
  ]);

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, index: usize) -> Color {
    self.0[index % self.0.len()]
  }
}

/// Course name to color assignments for one displayed timetable.
///
/// Colors are handed out round-robin in first-seen order, so the same input
/// order always yields the same colors.
#[derive(Clone, Debug)]
pub struct ColorMap {
  palette: Palette,
  assigned: HashMap<String, Color>,
  next: usize,
}

impl ColorMap {
  pub fn new(palette: Palette) -> Self {
    Self {
      palette,
      assigned: HashMap::new(),
      next: 0,
    }
  }

  pub fn color_for(&mut self, course_name: &str) -> Color {
    match self.assigned.entry(course_name.to_string()) {
      Entry::Occupied(entry) => *entry.get(),
      Entry::Vacant(entry) => {
        let color = self.palette.get(self.next);
        self.next += 1;
        *entry.insert(color)
      }
    }
  }

  pub fn get(&self, course_name: &str) -> Option<Color> {
    self.assigned.get(course_name).copied()
  }

  pub fn palette(&self) -> Palette {
    self.palette
  }

  pub fn len(&self) -> usize {
    self.assigned.len()
  }

  pub fn is_empty(&self) -> bool {
    self.assigned.is_empty()
  }
}
