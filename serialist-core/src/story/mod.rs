//! Story orchestration
//!
//! Explicit per-session [`StoryState`], the [`EpisodeChain`] with its
//! continuity rule, prompt assembly, summary compression and the
//! [`StoryGenerator`] facade that drives them.

pub mod chain;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod state;
pub mod summary;
pub mod synopsis;

pub use chain::{Episode, EpisodeChain};
pub use error::{StoryError, StoryResult};
pub use generator::StoryGenerator;
pub use prompt::{PromptBuilder, PromptFields, PromptKind};
pub use state::{
    Character, EpisodeDirection, IntensityKnobs, StoryState, StoryStructure, WritingStyle,
};
pub use summary::SummaryCompressor;
pub use synopsis::Synopsis;
