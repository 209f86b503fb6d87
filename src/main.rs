use anyhow::{bail, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tmark::commands;
use tmark::config::{bookmarks_file, merge_cli, Config};
use tmark_core::api::{current_host, TmarkCore};
use tmark_core::config::Settings;
use tmark_core::store::BookmarkStore;
use tmark_core::tmux::TmuxClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    merge_cli(&mut settings, &cli);

    let store = BookmarkStore::new(bookmarks_file(&settings, &cli));
    tracing::debug!(path = %store.path().display(), "Using bookmarks file");

    let client = TmuxClient::with_command(settings.tmux_command.clone());
    if cli.command.needs_tmux() && !client.is_available().await {
        bail!("tmux is not running (tried '{}')", settings.tmux_command);
    }

    let host = if settings.record_host {
        current_host()
    } else {
        None
    };
    let core = TmarkCore::new(store, client).with_host(host);

    let output = commands::execute(&core, &cli.command, settings.default_kind).await?;
    println!("{}", output);
    Ok(())
}

fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("tmark=debug,tmark_core=debug")
        } else {
            EnvFilter::new("tmark=info,tmark_core=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
