//! Squares a small batch of tokens and prints one line per outcome.
//!
//! Run with: cargo run --example squares -- 4 9 a 16
//! Set RUST_LOG=splitweld=debug to watch the stages.

use tracing_subscriber::EnvFilter;

fn main() -> splitweld::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let items = if args.is_empty() {
        vec!["4", "9", "a", "16"]
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        args
    };

    let summary = splitweld::run(items)?;
    eprintln!(
        "{} processed, {} failed",
        summary.processed, summary.failed
    );
    Ok(())
}
