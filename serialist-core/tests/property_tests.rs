//! Property-based tests for the episode chain, prompts and summaries

mod common;

use common::ScriptedAdapter;
use proptest::prelude::*;
use serialist_core::config::SummarySettings;
use serialist_core::protocol::GenerationResult;
use serialist_core::providers::{ModelRouter, ProviderKind, RetryPolicy};
use serialist_core::story::{
    EpisodeChain, EpisodeDirection, PromptBuilder, PromptFields, PromptKind, StoryState,
    SummaryCompressor, WritingStyle,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum ChainOp {
    Append(String),
    Edit(u32, String),
    ReplaceSummary(u32, String),
}

fn chain_op() -> impl Strategy<Value = ChainOp> {
    prop_oneof![
        "[a-z ]{0,20}".prop_map(ChainOp::Append),
        (1u32..8, "[a-z ]{0,20}").prop_map(|(n, t)| ChainOp::Edit(n, t)),
        (1u32..8, "[a-z ]{0,20}").prop_map(|(n, s)| ChainOp::ReplaceSummary(n, s)),
    ]
}

fn compressor(reply: GenerationResult) -> (SummaryCompressor, Arc<ScriptedAdapter>) {
    let adapter = Arc::new(ScriptedAdapter::new(ProviderKind::XAi).with_fallback(reply));
    let router = ModelRouter::builder().adapter(adapter.clone()).build().unwrap();
    let compressor = SummaryCompressor::new(
        Arc::new(router),
        RetryPolicy::no_retry(),
        SummarySettings::default(),
    );
    (compressor, adapter)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// Episode numbers always equal position + 1, whatever the edits
    #[test]
    fn prop_chain_numbering_is_contiguous(ops in prop::collection::vec(chain_op(), 0..40)) {
        let mut chain = EpisodeChain::new();
        for op in ops {
            match op {
                ChainOp::Append(text) => {
                    let expected = chain.len() as u32 + 1;
                    let summary = text.clone();
                    prop_assert_eq!(chain.append(text, summary, "plain").number, expected);
                }
                ChainOp::Edit(n, text) => {
                    let in_range = (n as usize) <= chain.len();
                    prop_assert_eq!(chain.edit(n, text).is_ok(), in_range);
                }
                ChainOp::ReplaceSummary(n, summary) => {
                    let in_range = (n as usize) <= chain.len();
                    prop_assert_eq!(chain.replace_summary(n, summary).is_ok(), in_range);
                }
            }
        }
        for (i, episode) in chain.iter().enumerate() {
            prop_assert_eq!(episode.number as usize, i + 1);
        }
        prop_assert_eq!(chain.next_number() as usize, chain.len() + 1);
    }

    /// Building the same prompt twice yields identical text
    #[test]
    fn prop_prompt_building_is_deterministic(
        main in "\\PC{0,80}",
        genre in "\\PC{0,20}",
        tags in prop::collection::vec("[a-z]{1,8}", 0..4),
        summaries in prop::collection::vec("[a-z ]{1,30}", 0..4),
    ) {
        let mut state = StoryState::new(main).with_genre(genre);
        for summary in &summaries {
            state.chain.append("text", summary.clone(), "plain");
        }
        let style = WritingStyle::new("plain", "Plain", "");
        let direction = EpisodeDirection::default().with_tags(tags);
        let fields = PromptFields::for_next_episode(&state, &style, &direction);

        let builder = PromptBuilder::new();
        prop_assert_eq!(
            builder.build(PromptKind::Episode, &fields),
            builder.build(PromptKind::Episode, &fields)
        );
    }

    /// An episode prompt mentions the latest summary and no earlier one
    #[test]
    fn prop_prompt_reads_only_latest_summary(count in 1usize..12) {
        let mut state = StoryState::new("premise");
        for i in 1..=count {
            state.chain.append(format!("[text-{}]", i), format!("[summary-{}]", i), "plain");
        }
        let style = WritingStyle::new("plain", "Plain", "");
        let direction = EpisodeDirection::default();
        let prompt = PromptBuilder::new().build(
            PromptKind::Episode,
            &PromptFields::for_next_episode(&state, &style, &direction),
        );

        let latest = format!("[summary-{}]", count);
        prop_assert!(prompt.contains(&latest));
        for i in 1..=count {
            let text_marker = format!("[text-{}]", i);
            prop_assert!(!prompt.contains(&text_marker));
            if i < count {
                let stale_summary = format!("[summary-{}]", i);
                prop_assert!(!prompt.contains(&stale_summary));
            }
        }
    }

    /// Texts within the threshold are their own summary and cost no call
    #[test]
    fn prop_short_text_summary_is_identity(text in "\\PC{0,300}") {
        prop_assume!(text.chars().count() <= 300);
        let (compressor, adapter) = compressor(GenerationResult::success("unused"));

        let summary = block_on(compressor.summarize(&text, "xai"));

        prop_assert_eq!(summary, text);
        prop_assert_eq!(adapter.calls(), 0);
    }

    /// Summaries never exceed the bound, even when the provider fails or rambles
    #[test]
    fn prop_summary_is_bounded(
        text in "\\PC{301,600}",
        reply_len in 0usize..1200,
        fail in any::<bool>(),
    ) {
        let reply = if fail {
            GenerationResult::failure(
                serialist_core::ErrorKind::ProviderTransport,
                "API call error: timed out",
            )
        } else {
            GenerationResult::success("s".repeat(reply_len))
        };
        let (compressor, _) = compressor(reply);

        let summary = block_on(compressor.summarize(&text, "xai"));

        prop_assert!(summary.chars().count() <= compressor.settings().max_summary_chars());
        prop_assert!(!summary.is_empty());
    }
}
