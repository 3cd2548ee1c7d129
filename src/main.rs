use clap::Parser;
use schemaform::cli::Cli;
use schemaform::config::{watcher::DocumentWatcher, FormSettings};
use schemaform::preview::{preview, PreviewReport};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; output goes to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let report = render(&cli)?;
    if report.has_fault() {
        anyhow::bail!("Validation of '{}' failed with an integration fault", cli.path);
    }

    if !cli.watch {
        return Ok(());
    }

    let watched = cli.watched_paths();
    let cli_for_watcher = cli.clone();
    let _watcher = DocumentWatcher::new(watched, move || {
        if let Err(e) = render(&cli_for_watcher) {
            error!("Failed to re-render preview: {:#}", e);
        }
    })?;

    info!("Watching for changes, press Ctrl-C to stop");
    loop {
        std::thread::park();
    }
}

/// Load settings, render the field and print the report
fn render(cli: &Cli) -> anyhow::Result<PreviewReport> {
    let settings = FormSettings::new_with_cli(cli)?;
    let report = preview(cli, &settings)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report)
}
