//! Prompt assembly
//!
//! Prompts are built from structured fields in a fixed section order. Building
//! is pure: the same fields always produce byte-identical text.

use crate::story::state::{
    Character, EpisodeDirection, IntensityKnobs, StoryState, StoryStructure, WritingStyle,
};
use crate::story::synopsis::Synopsis;
use serde::{Deserialize, Serialize};

const ROLE_LINE: &str = "You are a writer of serialized adult fiction.";

/// Closing line for the first episode
pub const INTRODUCTORY_HOOK: &str =
    "- Open the story with an introductory hook that draws the reader in";

/// Closing line for every later episode
pub const CONTINUE_PRIOR_FLOW: &str =
    "- Continue from the prior flow of the story so the transition feels natural";

/// Kinds of prompt the builder can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Synopsis,
    SynopsisRevision,
    Episode,
    Summary,
    StyleConversion,
}

/// Inputs to [`PromptBuilder::build`]
///
/// Borrowed from the caller's story state; fields a kind does not use are
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptFields<'a> {
    pub main_prompt: &'a str,
    pub genre: &'a str,
    pub essential_settings: &'a str,
    pub characters: &'a [Character],
    pub intensity: IntensityKnobs,
    pub style: Option<&'a WritingStyle>,
    pub structure: Option<&'a StoryStructure>,

    /// Episode being written (1-based)
    pub episode_number: u32,
    /// Synopsis slot for this episode
    pub episode_synopsis: Option<&'a str>,
    pub direction: Option<&'a EpisodeDirection>,
    /// Summary of the episode immediately before this one
    pub previous_summary: Option<&'a str>,

    /// Current synopsis, for revisions
    pub synopsis: Option<&'a Synopsis>,
    pub revision_instructions: Option<&'a str>,

    /// Text to summarize or convert
    pub source_text: &'a str,
}

impl<'a> PromptFields<'a> {
    /// Story-level fields taken from `state`
    pub fn from_state(state: &'a StoryState) -> Self {
        Self {
            main_prompt: &state.main_prompt,
            genre: &state.genre,
            essential_settings: &state.essential_settings,
            characters: &state.characters,
            intensity: state.intensity,
            structure: state.structure.as_ref(),
            synopsis: Some(&state.synopsis),
            ..Default::default()
        }
    }

    /// Fields for the next episode of `state`.
    ///
    /// Only the latest episode's summary is read from the chain.
    pub fn for_next_episode(
        state: &'a StoryState,
        style: &'a WritingStyle,
        direction: &'a EpisodeDirection,
    ) -> Self {
        let number = state.chain.next_number();
        Self {
            style: Some(style),
            episode_number: number,
            episode_synopsis: state.synopsis.slot(number),
            direction: Some(direction),
            previous_summary: state.chain.latest_summary(),
            ..Self::from_state(state)
        }
    }

    /// Fields for kinds that work on a standalone text
    pub fn for_text(text: &'a str) -> Self {
        Self {
            source_text: text,
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: &'a WritingStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_revision_instructions(mut self, instructions: &'a str) -> Self {
        self.revision_instructions = Some(instructions);
        self
    }
}

/// Renders prompts from [`PromptFields`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, kind: PromptKind, fields: &PromptFields<'_>) -> String {
        let mut out = String::with_capacity(2048);
        match kind {
            PromptKind::Synopsis => self.synopsis(&mut out, fields),
            PromptKind::SynopsisRevision => self.synopsis_revision(&mut out, fields),
            PromptKind::Episode => self.episode(&mut out, fields),
            PromptKind::Summary => self.summary(&mut out, fields),
            PromptKind::StyleConversion => self.style_conversion(&mut out, fields),
        }
        out
    }

    fn synopsis(&self, out: &mut String, fields: &PromptFields<'_>) {
        out.push_str(ROLE_LINE);
        out.push_str(
            " Draft a three-episode synopsis for a serialized erotic novel based on the settings below.\n\n",
        );
        main_prompt(out, fields);
        if let Some(style) = fields.style {
            style_section(out, style, false);
        }
        characters(out, fields.characters);
        essential_settings(out, fields.essential_settings);
        intensity(out, fields.intensity);
        if let Some(structure) = fields.structure {
            structure_section(out, structure);
        }
        synopsis_rules(out, "Write a synopsis covering exactly three episodes");
    }

    fn synopsis_revision(&self, out: &mut String, fields: &PromptFields<'_>) {
        out.push_str(ROLE_LINE);
        out.push_str(
            " Rewrite the three-episode synopsis below according to the revision instructions.\n\n",
        );

        out.push_str("### Current synopsis:\n\n");
        let current = fields.synopsis.cloned().unwrap_or_default();
        for number in 1..=3 {
            out.push_str(&format!(
                "Episode {}:\n{}\n\n",
                number,
                current.slot(number).unwrap_or("")
            ));
        }

        section(
            out,
            "Revision instructions",
            fields.revision_instructions.unwrap_or(""),
        );
        section(out, "Original settings", fields.main_prompt);
        if !fields.genre.trim().is_empty() {
            section(out, "Genre", fields.genre);
        }
        if let Some(style) = fields.style {
            style_section(out, style, false);
        }
        characters(out, fields.characters);
        essential_settings(out, fields.essential_settings);
        intensity(out, fields.intensity);
        synopsis_rules(
            out,
            "Rewrite the synopsis for all three episodes following the revision instructions",
        );
    }

    fn episode(&self, out: &mut String, fields: &PromptFields<'_>) {
        let number = fields.episode_number.max(1);

        out.push_str(ROLE_LINE);
        out.push_str(&format!(
            " Write episode {} of a serialized erotic novel based on the settings and information below.\n\n",
            number
        ));
        main_prompt(out, fields);

        match fields.episode_synopsis.filter(|s| !s.trim().is_empty()) {
            Some(synopsis) if number <= 3 => {
                section(out, &format!("Episode {} synopsis", number), synopsis);
            }
            _ if number > 1 => section(
                out,
                "Continuation",
                &format!(
                    "Building on the story so far, write episode {} as a natural development.",
                    number
                ),
            ),
            _ => {}
        }

        let direction = fields.direction.cloned().unwrap_or_default();
        if let Some(tags) = direction.joined_tags() {
            section(out, "Direction tags for this episode", &tags);
        }
        if let Some(request) = direction.request() {
            section(out, "Direction request", request);
        }

        let previous_summary = fields
            .previous_summary
            .filter(|s| !s.trim().is_empty());
        if let Some(summary) = previous_summary {
            section(out, "Summary of the previous episode", summary);
        }

        if let Some(style) = fields.style {
            style_section(out, style, true);
        }
        characters(out, fields.characters);
        essential_settings(out, fields.essential_settings);
        intensity(out, fields.intensity);

        if number > 1 && previous_summary.is_some() {
            out.push_str(concat!(
                "### Continuity:\n",
                "- Maintain the characters' relationships and situation from the previous episode\n",
                "- Develop the story begun in earlier episodes naturally\n",
                "- Portray the characters' emotional changes as growth from the previous episode\n",
                "- Keep the plot consistent with the previous episode\n\n",
            ));
        }

        out.push_str(concat!(
            "### Writing instructions:\n",
            "- Write vivid, detailed prose with sensual appeal\n",
            "- Aim for roughly 800 to 1000 characters\n",
            "- Indent the first line of each paragraph and put dialogue in quotation marks\n",
            "- Break lines where it helps readability\n",
        ));
        out.push_str(if number == 1 {
            INTRODUCTORY_HOOK
        } else {
            CONTINUE_PRIOR_FLOW
        });
        out.push('\n');
    }

    fn summary(&self, out: &mut String, fields: &PromptFields<'_>) {
        out.push_str(concat!(
            "Summarize the following episode of erotic fiction in about 200 characters.\n",
            "Include the key events and the characters' relationships so the flow of the story stays clear.\n\n",
        ));
        section(out, "Text to summarize", fields.source_text);
        out.push_str(concat!(
            "### Instructions:\n",
            "- Keep the summary to about 200 characters\n",
            "- Preserve the characters' names and relationships\n",
            "- Include the story's major turning points\n",
            "- Reference intimacy obliquely (\"they spent the night together\") rather than explicitly\n",
        ));
    }

    fn style_conversion(&self, out: &mut String, fields: &PromptFields<'_>) {
        let style = fields.style.cloned().unwrap_or_default();
        out.push_str(&format!(
            "You are an expert at rewriting prose in a different voice. Convert the text below into the style of \"{}\".\n\n",
            style.name
        ));
        section(out, "Text to convert", fields.source_text);
        section(out, "Target style", &style.description);
        if !style.sample.trim().is_empty() {
            section(out, "Style sample", &style.sample);
        }
        out.push_str(concat!(
            "### Instructions:\n",
            "- Keep the content and change only the style\n",
            "- Keep the paragraph and dialogue structure\n",
            "- Keep the nuance of sensual expressions and descriptions\n",
            "- Keep roughly the same length as the original\n",
        ));
    }
}

fn section(out: &mut String, heading: &str, body: &str) {
    out.push_str("### ");
    out.push_str(heading);
    out.push_str(":\n");
    out.push_str(body.trim_end());
    out.push_str("\n\n");
}

fn main_prompt(out: &mut String, fields: &PromptFields<'_>) {
    section(out, "Main prompt", fields.main_prompt);
    if !fields.genre.trim().is_empty() {
        section(out, "Genre", fields.genre);
    }
}

fn style_section(out: &mut String, style: &WritingStyle, with_sample: bool) {
    let mut body = format!("Write in the style of {}.", style.name);
    if !style.description.trim().is_empty() {
        body.push(' ');
        body.push_str(style.description.trim());
    }
    if with_sample && !style.sample.trim().is_empty() {
        body.push_str("\nSample: ");
        body.push_str(style.sample.trim());
    }
    section(out, "Writing style", &body);
}

fn characters(out: &mut String, characters: &[Character]) {
    if characters.is_empty() {
        return;
    }
    let body: Vec<String> = characters
        .iter()
        .map(|c| format!("{}: {}", c.name, c.description))
        .collect();
    section(out, "Characters", &body.join("\n"));
}

fn essential_settings(out: &mut String, settings: &str) {
    if !settings.trim().is_empty() {
        section(out, "Essential settings (must be respected)", settings);
    }
}

fn intensity(out: &mut String, knobs: IntensityKnobs) {
    out.push_str(&format!(
        concat!(
            "### Intensity:\n",
            "- Explicitness: {}% (higher values use more direct language)\n",
            "- Descriptive detail: {}% (higher values describe scenes more closely)\n",
            "- Psychological depth: {}% (higher values explore the characters' inner lives)\n\n",
        ),
        knobs.explicit(),
        knobs.detail(),
        knobs.psychological()
    ));
}

fn structure_section(out: &mut String, structure: &StoryStructure) {
    let mut body = format!("## {}\n{}", structure.name, structure.description.trim());
    if let Some(guide) = structure.guide.as_deref().filter(|g| !g.trim().is_empty()) {
        body.push_str("\n\nDevelopment guide:\n");
        body.push_str(guide.trim());
    }
    if !structure.milestones.is_empty() {
        body.push_str("\n\nKey milestones:");
        for (i, milestone) in structure.milestones.iter().enumerate() {
            body.push_str(&format!("\n{}. {}", i + 1, milestone));
        }
    }
    section(out, "Story structure", &body);
}

fn synopsis_rules(out: &mut String, first_rule: &str) {
    out.push_str("### Instructions:\n- ");
    out.push_str(first_rule);
    out.push('\n');
    out.push_str(concat!(
        "- Label the sections exactly \"Episode 1:\", \"Episode 2:\" and \"Episode 3:\"\n",
        "- Keep each section to roughly 200 to 300 characters\n",
        "- Episode 1 is the introduction, episode 2 the development and episode 3 the climax\n",
        "- Reference intimate scenes obliquely (\"they spent the night together\")\n",
    ));
}
