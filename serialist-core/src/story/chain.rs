//! The episode chain
//!
//! Episodes are numbered by position: the n-th episode appended is number n,
//! and nothing ever removes or renumbers one. The next episode's prompt reads
//! only [`EpisodeChain::latest_summary`], which keeps each request's context
//! bounded however long the story runs.

use crate::story::error::{StoryError, StoryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// 1-based position in the chain
    pub number: u32,
    pub text: String,
    /// Bounded recap handed to the next episode's prompt
    pub summary: String,
    pub created_at: DateTime<Utc>,
    /// Name of the writing style used
    pub style_label: String,
    #[serde(default)]
    pub edited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

/// Ordered episodes of one story
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Episode>", into = "Vec<Episode>")]
pub struct EpisodeChain {
    episodes: Vec<Episode>,
}

impl EpisodeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Number the next appended episode will get
    pub fn next_number(&self) -> u32 {
        self.episodes.len() as u32 + 1
    }

    /// Append an episode numbered `len + 1`
    pub fn append(
        &mut self,
        text: impl Into<String>,
        summary: impl Into<String>,
        style_label: impl Into<String>,
    ) -> &Episode {
        let number = self.next_number();
        self.episodes.push(Episode {
            number,
            text: text.into(),
            summary: summary.into(),
            created_at: Utc::now(),
            style_label: style_label.into(),
            edited: false,
            edited_at: None,
        });
        &self.episodes[self.episodes.len() - 1]
    }

    /// Summary of the last episode, if any
    pub fn latest_summary(&self) -> Option<&str> {
        self.episodes.last().map(|e| e.summary.as_str())
    }

    pub fn latest(&self) -> Option<&Episode> {
        self.episodes.last()
    }

    /// Episode `number` (1-based)
    pub fn episode(&self, number: u32) -> StoryResult<&Episode> {
        let index = self.index_of(number)?;
        Ok(&self.episodes[index])
    }

    /// Rewrite an episode's text; number and summary are left alone
    pub fn edit(&mut self, number: u32, text: impl Into<String>) -> StoryResult<&Episode> {
        let index = self.index_of(number)?;
        let episode = &mut self.episodes[index];
        episode.text = text.into();
        episode.edited = true;
        episode.edited_at = Some(Utc::now());
        Ok(episode)
    }

    /// Replace an episode's summary
    pub fn replace_summary(
        &mut self,
        number: u32,
        summary: impl Into<String>,
    ) -> StoryResult<&Episode> {
        let index = self.index_of(number)?;
        let episode = &mut self.episodes[index];
        episode.summary = summary.into();
        Ok(episode)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Episode> {
        self.episodes.iter()
    }

    /// Drop every episode
    pub fn clear(&mut self) {
        self.episodes.clear();
    }

    fn index_of(&self, number: u32) -> StoryResult<usize> {
        let len = self.episodes.len();
        if number == 0 || number as usize > len {
            return Err(StoryError::EpisodeNotFound { number, len });
        }
        Ok(number as usize - 1)
    }
}

impl<'a> IntoIterator for &'a EpisodeChain {
    type Item = &'a Episode;
    type IntoIter = std::slice::Iter<'a, Episode>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}

impl TryFrom<Vec<Episode>> for EpisodeChain {
    type Error = StoryError;

    fn try_from(episodes: Vec<Episode>) -> Result<Self, Self::Error> {
        for (position, episode) in episodes.iter().enumerate() {
            let expected = position as u32 + 1;
            if episode.number != expected {
                return Err(StoryError::BrokenNumbering {
                    position,
                    expected,
                    found: episode.number,
                });
            }
        }
        Ok(Self { episodes })
    }
}

impl From<EpisodeChain> for Vec<Episode> {
    fn from(chain: EpisodeChain) -> Self {
        chain.episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_numbers_by_position() {
        let mut chain = EpisodeChain::new();
        assert_eq!(chain.latest_summary(), None);

        assert_eq!(chain.append("one", "s1", "plain").number, 1);
        assert_eq!(chain.append("two", "s2", "noir").number, 2);
        assert_eq!(chain.latest_summary(), Some("s2"));
        assert_eq!(chain.episode(1).unwrap().text, "one");
    }

    #[test]
    fn test_missing_episode() {
        let mut chain = EpisodeChain::new();
        chain.append("one", "s1", "plain");
        assert_eq!(
            chain.episode(0).unwrap_err(),
            StoryError::EpisodeNotFound { number: 0, len: 1 }
        );
        assert_eq!(
            chain.episode(2).unwrap_err(),
            StoryError::EpisodeNotFound { number: 2, len: 1 }
        );
    }

    #[test]
    fn test_edit_keeps_number_and_summary() {
        let mut chain = EpisodeChain::new();
        chain.append("one", "s1", "plain");
        chain.append("two", "s2", "plain");

        let edited = chain.edit(1, "one, revised").unwrap();
        assert_eq!(edited.number, 1);
        assert_eq!(edited.summary, "s1");
        assert!(edited.edited);
        assert!(edited.edited_at.is_some());
        assert_eq!(chain.len(), 2);
        assert!(!chain.episode(2).unwrap().edited);
    }

    #[test]
    fn test_replace_summary_only_touches_summary() {
        let mut chain = EpisodeChain::new();
        chain.append("one", "s1", "plain");
        let episode = chain.replace_summary(1, "new recap").unwrap();
        assert_eq!(episode.summary, "new recap");
        assert_eq!(episode.text, "one");
        assert!(!episode.edited);
    }

    #[test]
    fn test_serde_rejects_broken_numbering() {
        let mut chain = EpisodeChain::new();
        chain.append("one", "s1", "plain");
        chain.append("two", "s2", "plain");

        let mut value = serde_json::to_value(&chain).unwrap();
        value[1]["number"] = serde_json::json!(5);
        let result: Result<EpisodeChain, _> = serde_json::from_value(value);
        assert!(result.is_err());

        let round_trip: EpisodeChain =
            serde_json::from_value(serde_json::to_value(&chain).unwrap()).unwrap();
        assert_eq!(round_trip, chain);
    }
}
