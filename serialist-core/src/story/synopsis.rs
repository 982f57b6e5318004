//! Three-episode synopsis and its parser

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Matches "Episode 1:", "**Episode 2**:", "## 第3話：" and similar line-leading labels
static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*[#*_>\-\s]*(?:episode[ \t]*([1-3])|第[ \t]*([1-3１-３])[ \t]*話)[ \t*_]*[:：][ \t*_]*",
    )
    .expect("valid synopsis label pattern")
});

/// Synopsis slots for the first three episodes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Synopsis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode3: Option<String>,
}

impl Synopsis {
    /// Split labelled provider output into the three slots.
    ///
    /// Text before the first label is dropped. Output without any label goes
    /// whole into slot 1. When a label repeats, the first occurrence wins.
    pub fn parse(text: &str) -> Self {
        let mut synopsis = Self::default();
        let labels: Vec<(usize, usize, u32)> = LABEL_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let digit = caps.get(1).or_else(|| caps.get(2))?.as_str();
                Some((whole.start(), whole.end(), parse_digit(digit)?))
            })
            .collect();

        if labels.is_empty() {
            synopsis.set(1, text);
            return synopsis;
        }

        for (i, (_, body_start, number)) in labels.iter().enumerate() {
            let body_end = labels.get(i + 1).map_or(text.len(), |next| next.0);
            if synopsis.slot(*number).is_none() {
                synopsis.set(*number, &text[*body_start..body_end]);
            }
        }
        synopsis
    }

    /// Slot for episode `number`, if present and non-blank
    pub fn slot(&self, number: u32) -> Option<&str> {
        let slot = match number {
            1 => &self.episode1,
            2 => &self.episode2,
            3 => &self.episode3,
            _ => return None,
        };
        slot.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Store trimmed text in slot `number` (1-3); blank text clears the slot
    pub fn set(&mut self, number: u32, text: &str) {
        let trimmed = text.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        match number {
            1 => self.episode1 = value,
            2 => self.episode2 = value,
            3 => self.episode3 = value,
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        (1..=3).all(|n| self.slot(n).is_none())
    }
}

fn parse_digit(digit: &str) -> Option<u32> {
    match digit {
        "1" | "１" => Some(1),
        "2" | "２" => Some(2),
        "3" | "３" => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_labels() {
        let text = "Episode 1: They meet.\nEpisode 2: They argue.\nEpisode 3: They reconcile.";
        let synopsis = Synopsis::parse(text);
        assert_eq!(synopsis.slot(1), Some("They meet."));
        assert_eq!(synopsis.slot(2), Some("They argue."));
        assert_eq!(synopsis.slot(3), Some("They reconcile."));
    }

    #[test]
    fn test_parse_markdown_and_preamble() {
        let text = "Here is your synopsis.\n\n**Episode 1:** A rainy night.\nStill raining.\n\n## Episode 2:\nMorning after.\n\n**Episode 3**: Departure.";
        let synopsis = Synopsis::parse(text);
        assert_eq!(synopsis.slot(1), Some("A rainy night.\nStill raining."));
        assert_eq!(synopsis.slot(2), Some("Morning after."));
        assert_eq!(synopsis.slot(3), Some("Departure."));
    }

    #[test]
    fn test_parse_japanese_labels() {
        let text = "第1話：出会い\n第2話: 葛藤\n第３話：決断";
        let synopsis = Synopsis::parse(text);
        assert_eq!(synopsis.slot(1), Some("出会い"));
        assert_eq!(synopsis.slot(2), Some("葛藤"));
        assert_eq!(synopsis.slot(3), Some("決断"));
    }

    #[test]
    fn test_parse_without_labels() {
        let synopsis = Synopsis::parse("  Error: 500 - upstream failure  ");
        assert_eq!(synopsis.slot(1), Some("Error: 500 - upstream failure"));
        assert_eq!(synopsis.slot(2), None);
    }

    #[test]
    fn test_missing_and_repeated_labels() {
        let synopsis = Synopsis::parse("Episode 1: first\nEpisode 1: again\nEpisode 3: last");
        assert_eq!(synopsis.slot(1), Some("first"));
        assert_eq!(synopsis.slot(2), None);
        assert_eq!(synopsis.slot(3), Some("last"));
        assert_eq!(synopsis.slot(4), None);
    }
}
