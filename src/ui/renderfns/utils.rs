use crate::candidates::ExperienceLevel;
use ratatui::prelude::Color;

/// Truncate to `max_len` characters, ending in "..." when shortened
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    return s.to_string();
  }
  let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
  format!("{}...", kept)
}

/// Badge color for an experience level
pub fn experience_color(level: ExperienceLevel) -> Color {
  match level {
    ExperienceLevel::Senior => Color::Green,
    ExperienceLevel::Mid => Color::Cyan,
    ExperienceLevel::Junior => Color::Yellow,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars() {
    assert_eq!(truncate("Zoë Müller-Lüdenscheidt", 10), "Zoë Mül...");
  }

  #[test]
  fn test_experience_colors_are_distinct() {
    let colors: Vec<Color> = ExperienceLevel::ALL.iter().map(|l| experience_color(*l)).collect();
    assert_eq!(colors, vec![Color::Yellow, Color::Cyan, Color::Green]);
  }
}
