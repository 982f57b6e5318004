//! Episode Chain Demo
//!
//! Drafts a synopsis and two episodes with whichever provider keys are set in
//! the environment (XAI_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY,
//! GEMINI_API_KEY, DEEPSEEK_API_KEY). Without a key for the chosen model the
//! generated "text" is the failure message, which is the point: nothing here
//! ever returns an error for a provider problem.
//!
//! Run with: RUST_LOG=serialist_core=debug cargo run --example episode_chain [model-id]

use anyhow::Result;
use serialist_core::config::GeneratorConfig;
use serialist_core::providers::RetryPolicy;
use serialist_core::story::{Character, EpisodeDirection, StoryGenerator, StoryState, WritingStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let model_id = std::env::args().nth(1).unwrap_or_else(|| "xai".to_string());
    let config = GeneratorConfig::from_env();

    println!("\n📚 Serialist Episode Chain Demo\n");
    println!("Configured providers: {:?}", config.configured_providers());

    let generator = StoryGenerator::from_config(&config)?
        .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(500)));
    println!(
        "Model: {} ({})\n",
        model_id,
        generator.router().display_name(&model_id)
    );

    let mut state = StoryState::new("Two rival bakers are snowed in above the same shop")
        .with_genre("romantic comedy")
        .with_character(Character::new("Hana", "owner of the bakery downstairs"))
        .with_character(Character::new("Jun", "pastry chef from across the street"))
        .with_model(model_id);
    let style = WritingStyle::new("warm", "Warm", "Gentle humour, close third person");

    let synopsis = generator.generate_synopsis(&mut state, &style).await;
    for number in 1..=3 {
        println!("Episode {} plan: {}", number, synopsis.slot(number).unwrap_or("-"));
    }
    println!();

    let directions = [
        EpisodeDirection::default().with_tags(["meet-cute"]),
        EpisodeDirection::default().with_request("The power goes out"),
    ];
    for direction in &directions {
        let episode = generator.generate_episode(&mut state, &style, direction).await;
        println!("── Episode {} ──", episode.number);
        println!("{}\n", episode.text);
        println!("Summary carried forward: {}\n", episode.summary);
    }

    println!(
        "Requests made: {} (summaries are not counted)",
        generator.counter().count()
    );
    Ok(())
}
