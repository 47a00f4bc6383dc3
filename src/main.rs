use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, WriteLogger};

use pinboard::api::HttpBoard;
use pinboard::core::config::{self, CliOverrides, PinboardConfig, ResolvedConfig};
use pinboard::core::controller::Controller;
use pinboard::core::prompt::LogPrompt;
use pinboard::tui;

#[derive(Parser)]
#[command(name = "pinboard", about = "Terminal client for a threaded message board")]
struct Args {
    /// Board server base URL (overrides config and PINBOARD_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds between list refreshes (overrides config and PINBOARD_POLL_SECS)
    #[arg(long)]
    poll_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in, fetch the board once, and print it as HTML
    Snapshot {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {e}");
        PinboardConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            poll_secs: args.poll_secs,
        },
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }
    log::info!("Pinboard starting up against {}", resolved.base_url);

    match args.command {
        Some(Command::Snapshot {
            username,
            password,
            output,
        }) => snapshot(&resolved, &username, &password, output).await,
        None => tui::run(resolved).await,
    }
}

/// Non-interactive login + single fetch, printing the rendered list.
async fn snapshot(
    config: &ResolvedConfig,
    username: &str,
    password: &str,
    output: Option<PathBuf>,
) -> std::io::Result<()> {
    let api = HttpBoard::new(&config.base_url, config.timeout).map_err(std::io::Error::other)?;
    let mut controller = Controller::new(Arc::new(api), LogPrompt { answer: false });

    controller.login(username, password).await;
    if !controller.view().is_logged_in() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("login as '{username}' failed, see {}", config.log_file),
        ));
    }

    let html = controller.view().to_html();
    match output {
        Some(path) => std::fs::write(&path, html)?,
        None => println!("{html}"),
    }

    controller.logout().await;
    Ok(())
}
