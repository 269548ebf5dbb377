//! Parses its own arguments against a git-like command tree.
//!
//! ```text
//! cargo run -p argweave-demos --example git_like -- -v commit -m "first commit" src
//! RUST_LOG=argweave_core=trace cargo run -p argweave-demos --example git_like -- remote add origin url
//! ```
//!
//! Without arguments a few canned inputs are parsed instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use argweave_core::{ArgumentParser, ParseReport};
use argweave_demos::git_command;
use tracing_subscriber::EnvFilter;

const SAMPLES: &[&str] = &[
    "-v commit -m 'initial import' src docs",
    "remote add origin https://example.com/repo.git --env (\"user=me\" \"mode=ssh\")",
    "log -n ten --format oneline",
    "commit --amend [unclosed",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let verbose_hits = Arc::new(AtomicUsize::new(0));
    let parser = ArgumentParser::new(git_command(Arc::clone(&verbose_hits))?);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        for sample in SAMPLES {
            println!("$ git {sample}");
            show(&parser.parse(sample));
        }
    } else {
        show(&parser.parse_args(&args));
    }

    println!("verbose accepted {} time(s)", verbose_hits.load(Ordering::SeqCst));
    Ok(())
}

fn show(report: &ParseReport) {
    println!("  matched: {}", report.arguments().matched_path().join(" "));
    let mut level = Some(report.arguments());
    while let Some(args) = level {
        for (name, value) in args.iter() {
            if args.was_used(name) {
                println!("  {}.{name} = {value:?}", args.command());
            }
        }
        level = args.subcommand();
    }
    if let Some(forward) = report.arguments().forward_value() {
        println!("  forwarded: {forward}");
    }
    for message in report.messages() {
        println!("  {message}");
    }
    println!("  exit code: {}\n", report.error_code());
}
