use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Write a Markdown index of the current directory to README.md.
///
/// Every immediate subdirectory gets a section (dot-prefixed ones are
/// skipped) listing the files directly inside it as relative links.
#[derive(Parser)]
#[command(name = "make-index", version)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("notekit=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {} = Cli::parse();

    let base = std::env::current_dir()?;
    notekit::index::make_index(&base)?;

    Ok(())
}
