mod admin;
mod api;
mod config;
mod error;
mod logging;
mod models;
mod mutation;
mod pipeline;
mod ui;
mod viewer;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::admin::AdminApp;
use crate::api::{ApiClient, FeedSource, NominatimGeocoder};
use crate::mutation::Services;
use crate::viewer::MapApp;

#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(about = "Map and admin console for infrastructure projects")]
struct Cli {
    /// Append logs to this file instead of the configured one
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage projects, companies and assignments (default)
    Admin,
    /// Show projects on a map
    Map {
        /// Project feed: a JSON file or an http(s) URL
        #[arg(long)]
        feed: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::init()?;
    if let Some(path) = cli.log_file {
        config.log_file = path.display().to_string();
    }
    logging::setup(&config.log_file)?;

    let client = api::http_client(&config)?;
    let command = cli.command.unwrap_or(Commands::Admin);
    info!(?command, api_url = config.api_url(), "starting atlas");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match command {
        Commands::Admin => {
            let services = Services {
                store: Arc::new(ApiClient::with_client(client.clone(), config.api_url())),
                geocoder: Arc::new(NominatimGeocoder::new(client, config.geocoder_url())),
                country: config.country.clone(),
            };
            let mut app = AdminApp::new(services);
            admin::run_app(&mut terminal, &mut app).await
        }
        Commands::Map { feed } => {
            let source = feed.unwrap_or_else(|| config.feed.clone());
            let mut app = MapApp::new(Arc::new(FeedSource::parse(&source, client)));
            viewer::run_app(&mut terminal, &mut app).await
        }
    };

    restore_terminal(&mut terminal)?;

    // Show any error message
    if let Err(err) = &result {
        error!(error = %err, "atlas exited with an error");
        println!("Error: {}", err);
    }

    Ok(())
}

fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
