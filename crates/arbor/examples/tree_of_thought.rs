//! Tree of Thought example.
//!
//! Solves a small arithmetic puzzle (reach 24 from 3 with `+4`, `*2` and
//! `-1`) in both reasoning modes, with hybrid expert feedback attached to
//! the tree run.

use anyhow::Result;
use arbor::prelude::*;
use std::sync::Arc;

const TARGET: i64 = 24;

/// A partial solution: current value and the moves taken so far.
type Step = (i64, String);

fn expand(state: &Step) -> arbor::Result<Vec<Step>> {
    let (value, moves) = state;
    Ok(vec![
        (value + 4, format!("{moves} +4")),
        (value * 2, format!("{moves} *2")),
        (value - 1, format!("{moves} -1")),
    ])
}

fn closeness(state: &Step) -> arbor::Result<f64> {
    Ok(1.0 / (1.0 + (TARGET - state.0).abs() as f64))
}

/// Stand-in for a human reviewer: prefers short move lists.
fn review(candidate: &Candidate<Step>) -> arbor::Result<Feedback> {
    let score = 1.0 / (1.0 + candidate.depth() as f64);
    Ok(Feedback::human(
        score,
        format!("{} moves so far", candidate.depth()),
        vec!["Try doubling earlier".to_string()],
    ))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ArborConfig {
        explorer: ExplorerConfig {
            max_branches: 3,
            max_depth: 4,
        },
        feedback: FeedbackConfig {
            strategy: FeedbackStrategy::Hybrid,
            threshold: 0.2,
            ..Default::default()
        },
        ..Default::default()
    };

    let expert = Arc::new(ExpertFeedback::with_reviewer(config.feedback.clone(), closeness, review)?);

    let mut reasoner = Reasoner::builder()
        .config(config)
        .expander(expand)
        .scorer(closeness)
        .shared_feedback(expert.clone())
        .build()?;

    let start: Step = (3, "3".to_string());

    for mode in [ReasoningMode::Tree, ReasoningMode::Beam] {
        let result = reasoner.reason(start.clone(), mode)?;
        println!("{mode:?} mode (confidence {:.3}):", result.confidence);
        for (value, moves) in &result.reasoning_path {
            println!("  {moves} = {value}");
        }
    }

    if let Some(tree) = reasoner.tree() {
        println!("\nTree held {} thoughts", tree.len());
    }
    if let Some(stats) = reasoner.beam_statistics() {
        println!("Beam: {}", serde_json::to_string(&stats)?);
    }
    if let Some(stats) = expert.statistics() {
        println!("Feedback: {}", serde_json::to_string(&stats)?);
    }

    Ok(())
}
