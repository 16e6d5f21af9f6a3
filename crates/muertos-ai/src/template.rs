//! Prompt-template rendering.
//!
//! Templates carry `[Bracketed Placeholder]` markers; rendering substitutes
//! each named value everywhere it appears. Placeholders with no supplied
//! value are left in place so a missing substitution is visible in the
//! output rather than silently blanked.

use std::collections::BTreeMap;

/// Substitute `[name]` markers in `template` with the supplied values.
pub fn render(template: &str, values: &BTreeMap<String, String>) -> String {
  let mut rendered = template.to_string();
  for (name, value) in values {
    rendered = rendered.replace(&format!("[{name}]"), value);
  }
  rendered
}

#[cfg(test)]
mod tests {
  use super::*;

  fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  #[test]
  fn substitutes_every_occurrence() {
    let out = render(
      "A tale of [Magical Item] and again [Magical Item].",
      &values(&[("Magical Item", "the silver bell")]),
    );
    assert_eq!(out, "A tale of the silver bell and again the silver bell.");
  }

  #[test]
  fn substitutes_multiple_names() {
    let out = render(
      "[Mortal Antagonist] seeks [Cryptic Clue].",
      &values(&[
        ("Mortal Antagonist", "the collector"),
        ("Cryptic Clue", "a torn map"),
      ]),
    );
    assert_eq!(out, "the collector seeks a torn map.");
  }

  #[test]
  fn unknown_placeholders_are_left_visible() {
    let out = render("[Secret Society] endures.", &values(&[]));
    assert_eq!(out, "[Secret Society] endures.");
  }
}
