//! Journaling prompts, chosen by day of month.

use chrono::{Datelike, NaiveDate};

use crate::{
  block::BlockKind,
  content::ContentLine,
  request::AppendRequest,
};

pub const MONTHLY_TITLE: &str = "Monthly Course Correction";

pub const MONTHLY_QUESTIONS: [&str; 3] = [
  "What really matters right now in my life? Am I dedicating the necessary \
   energy towards those things?",
  "Are my current systems and habits aligned with my long-term goals?",
  "What do I need to cut out of my life?",
];

pub const DAILY_TITLE: &str = "What's on your mind?";

/// The reflection questions posted on the first of each month.
pub fn monthly_course_correction() -> AppendRequest {
  AppendRequest::new(
    MONTHLY_TITLE,
    BlockKind::Heading3,
    MONTHLY_QUESTIONS.iter().copied().map(ContentLine::plain).collect(),
    true,
  )
}

/// The open prompt posted every day.
pub fn daily_thoughts() -> AppendRequest {
  AppendRequest::new(DAILY_TITLE, BlockKind::Paragraph, Vec::new(), true)
}

/// The prompts to post on `today`, in posting order.
pub fn select_prompts(today: NaiveDate) -> Vec<AppendRequest> {
  let mut prompts = Vec::with_capacity(2);
  if today.day() == 1 {
    prompts.push(monthly_course_correction());
  }
  prompts.push(daily_thoughts());
  prompts
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::content::Body;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn first_of_month_gets_monthly_then_daily() {
    let prompts = select_prompts(date("2024-03-01"));
    let titles: Vec<_> = prompts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, [MONTHLY_TITLE, DAILY_TITLE]);
  }

  #[test]
  fn other_days_get_only_daily() {
    for d in ["2024-03-02", "2024-03-31", "2024-02-29"] {
      let prompts = select_prompts(date(d));
      assert_eq!(prompts, vec![daily_thoughts()], "{d}");
    }
  }

  #[test]
  fn monthly_prompt_shape() {
    let prompt = monthly_course_correction();
    assert_eq!(prompt.kind, BlockKind::Heading3);
    assert!(prompt.divider);
    let Body::Lines(lines) = &prompt.body else {
      panic!("expected structured body");
    };
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2].text(), "What do I need to cut out of my life?");
    // Heading + three questions + spacer + divider.
    assert_eq!(prompt.to_blocks().unwrap().len(), 6);
  }

  #[test]
  fn daily_prompt_is_an_empty_paragraph_group() {
    let prompt = daily_thoughts();
    assert_eq!(prompt.kind, BlockKind::Paragraph);
    assert_eq!(prompt.body, Body::Lines(vec![]));
    assert!(prompt.divider);
  }
}
