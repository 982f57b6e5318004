//! Explicit story state owned by one session

use crate::protocol::GenerationRequest;
use crate::providers::DEFAULT_MODEL_ID;
use crate::story::chain::EpisodeChain;
use crate::story::synopsis::Synopsis;
use serde::{Deserialize, Serialize};

/// A named character, rendered as `name: description`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
}

impl Character {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Three 0-100 percentages rendered into prompts as instructions
///
/// Deserializing clamps like [`IntensityKnobs::new`], so no path yields a
/// value over 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawKnobs")]
pub struct IntensityKnobs {
    explicit: u8,
    detail: u8,
    psychological: u8,
}

#[derive(Deserialize)]
struct RawKnobs {
    explicit: u8,
    detail: u8,
    psychological: u8,
}

impl From<RawKnobs> for IntensityKnobs {
    fn from(raw: RawKnobs) -> Self {
        Self::new(raw.explicit, raw.detail, raw.psychological)
    }
}

impl IntensityKnobs {
    /// Values above 100 are clamped
    pub fn new(explicit: u8, detail: u8, psychological: u8) -> Self {
        Self {
            explicit: explicit.min(100),
            detail: detail.min(100),
            psychological: psychological.min(100),
        }
    }

    pub fn explicit(&self) -> u8 {
        self.explicit
    }

    pub fn detail(&self) -> u8 {
        self.detail
    }

    pub fn psychological(&self) -> u8 {
        self.psychological
    }
}

impl Default for IntensityKnobs {
    fn default() -> Self {
        Self::new(70, 80, 60)
    }
}

/// A writing style the caller wants the prose rendered in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WritingStyle {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Short passage written in the style; omitted from prompts when empty
    #[serde(default)]
    pub sample: String,
}

impl WritingStyle {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            sample: String::new(),
        }
    }

    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = sample.into();
        self
    }
}

/// Narrative structure guide used when drafting the synopsis
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoryStructure {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

/// Caller steering for the next episode
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EpisodeDirection {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}

impl EpisodeDirection {
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.request = Some(request.into());
        self
    }

    /// Tags joined for display, or `None` when there are no non-blank tags
    pub fn joined_tags(&self) -> Option<String> {
        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        (!tags.is_empty()).then(|| tags.join(", "))
    }

    /// The free-text request, or `None` when blank
    pub fn request(&self) -> Option<&str> {
        self.request
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// Everything one story session knows
///
/// Passed by `&mut` into every generation call, so a session can never have
/// two generations in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryState {
    #[serde(default)]
    pub genre: String,
    pub main_prompt: String,
    #[serde(default)]
    pub essential_settings: String,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub intensity: IntensityKnobs,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub synopsis: Synopsis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<StoryStructure>,
    #[serde(default)]
    pub chain: EpisodeChain,
}

impl Default for StoryState {
    fn default() -> Self {
        Self {
            genre: String::new(),
            main_prompt: String::new(),
            essential_settings: String::new(),
            characters: Vec::new(),
            intensity: IntensityKnobs::default(),
            model_id: default_model_id(),
            synopsis: Synopsis::default(),
            structure: None,
            chain: EpisodeChain::default(),
        }
    }
}

impl StoryState {
    pub fn new(main_prompt: impl Into<String>) -> Self {
        Self {
            main_prompt: main_prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_essential_settings(mut self, settings: impl Into<String>) -> Self {
        self.essential_settings = settings.into();
        self
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    pub fn with_intensity(mut self, intensity: IntensityKnobs) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_structure(mut self, structure: StoryStructure) -> Self {
        self.structure = Some(structure);
        self
    }

    /// A request for this story's model
    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(prompt, self.model_id.clone())
    }

    /// Start over: drop the synopsis and every episode, keep the settings
    pub fn reset(&mut self) {
        self.synopsis = Synopsis::default();
        self.chain.clear();
    }
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}
