//! Scores sleep descriptions from the command line.
//!
//! `quality_probe "kept waking up" "deep and peaceful"` scores each argument;
//! with no arguments, every stdin line is scored.
//! Output: `score<TAB>category<TAB>text`.

use std::io::{self, BufRead, Write};

use sleep_disorder_predictor::quality;

fn line_for(text: &str) -> String {
    match quality::explain(text) {
        Some(m) => format!("{}\t{}\t{}", m.score, m.category.as_str(), text),
        None => format!("{}\tdefault\t{}", quality::DEFAULT_QUALITY_SCORE, text),
    }
}

fn main() -> anyhow::Result<()> {
    // logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.is_empty() {
        tracing::debug!("reading descriptions from stdin");
        for line in io::stdin().lock().lines() {
            writeln!(out, "{}", line_for(&line?))?;
        }
    } else {
        for text in &args {
            writeln!(out, "{}", line_for(text))?;
        }
    }
    Ok(())
}
