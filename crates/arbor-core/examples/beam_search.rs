//! Adaptive beam search example.
//!
//! Builds short sentences from a toy bigram model. Each state is the token
//! sequence so far; the scorer is the mean log-probability of the sequence
//! and the diversity bonus rewards sequences that differ from the beam.
//!
//! Run with `RUST_LOG=arbor_core=debug` to see every beam step.

use arbor_core::search::{AdaptiveBeamSearch, BeamConfig, MetricDiversity};
use arbor_core::Result;
use tracing_subscriber::EnvFilter;

type Sentence = Vec<&'static str>;

/// Follow-up tokens and their probabilities.
fn bigrams(last: &str) -> &'static [(&'static str, f64)] {
    match last {
        "<s>" => &[("the", 0.6), ("a", 0.4)],
        "the" | "a" => &[("cat", 0.5), ("dog", 0.3), ("quick", 0.15), ("lazy", 0.05)],
        "quick" | "lazy" => &[("cat", 0.5), ("dog", 0.5)],
        "cat" | "dog" => &[("sat", 0.55), ("ran", 0.35), ("</s>", 0.1)],
        "sat" | "ran" => &[("on", 0.8), ("</s>", 0.2)],
        "on" => &[("the", 0.5), ("mat", 0.4), ("a", 0.1)],
        "mat" => &[("</s>", 1.0)],
        _ => &[],
    }
}

fn expand(sentence: &Sentence) -> Result<Vec<Sentence>> {
    let last = sentence.last().copied().unwrap_or("<s>");
    Ok(bigrams(last)
        .iter()
        .map(|&(token, _)| {
            let mut next = sentence.clone();
            next.push(token);
            next
        })
        .collect())
}

/// Mean log-probability, mapped into `(0, 1]`.
fn score(sentence: &Sentence) -> Result<f64> {
    if sentence.len() < 2 {
        return Ok(1.0);
    }
    let log_prob: f64 = sentence
        .windows(2)
        .map(|pair| {
            bigrams(pair[0])
                .iter()
                .find(|(token, _)| *token == pair[1])
                .map_or(f64::NEG_INFINITY, |(_, p)| p.ln())
        })
        .sum();
    Ok((log_prob / (sentence.len() - 1) as f64).exp())
}

/// Share of positions where two sentences differ.
fn distance(a: &Sentence, b: &Sentence) -> f64 {
    let len = a.len().max(b.len());
    if len == 0 {
        return 0.0;
    }
    let same = a.iter().zip(b).filter(|(x, y)| x == y).count();
    (len - same) as f64 / len as f64
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BeamConfig {
        initial_width: 3,
        min_width: 2,
        max_width: 6,
        adaptation_rate: 0.5,
        diversity_weight: 0.2,
        max_steps: 6,
        ..Default::default()
    };
    let mut search = AdaptiveBeamSearch::with_diversity(config, MetricDiversity::new(distance))?;

    let outcome = search.search(vec!["<s>"], &score, &expand)?;

    println!("Best sentence ({} steps, score {:.3}):", outcome.steps, outcome.score);
    if let Some(best) = outcome.best() {
        println!("  {}", best[1..].join(" "));
    }

    println!("\nBeam history:");
    for snapshot in search.history() {
        println!(
            "  step {:>2}: width {:.1}, {} kept, best {:.3}",
            snapshot.step,
            snapshot.beam_width,
            snapshot.scores.len(),
            snapshot.scores.first().copied().unwrap_or_default()
        );
    }

    if let Some(stats) = search.statistics() {
        println!("\n{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(())
}
