//! book-admin - edit and delete library books from the command line

use anyhow::{ensure, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_admin::{
    client::HttpBookApi,
    config::{AppConfig, LoggingConfig},
    models::BookField,
    pages::{EditBookPage, PageState},
    terminal::{self, TerminalNavigator, TerminalPrompt},
};

#[derive(Parser)]
#[command(name = "book-admin", version, about = "Edit and delete books in the library catalog")]
struct Cli {
    /// Root URL of the library API (overrides configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a book
    Show { id: String },
    /// Change fields of a book and save it
    Edit {
        id: String,
        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment, required = true)]
        set: Vec<(BookField, String)>,
    },
    /// Delete a book after confirmation
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

impl Command {
    fn id(&self) -> &str {
        match self {
            Command::Show { id } | Command::Edit { id, .. } | Command::Delete { id, .. } => id,
        }
    }
}

fn parse_assignment(s: &str) -> Result<(BookField, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {:?}", s))?;
    let field = name.parse::<BookField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("book_admin={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    init_tracing(&config.logging);
    tracing::info!(
        "book-admin v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let api = HttpBookApi::new(&config.api)?;
    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let page = EditBookPage::new(api, TerminalPrompt::new(assume_yes), TerminalNavigator::default());

    let id = cli.command.id().to_string();
    let state = page.enter(&id).await;
    ensure!(state == PageState::Ready, "book {} could not be loaded", id);

    match cli.command {
        Command::Show { .. } => {
            print!("{}", terminal::render(&page.view()));
        }
        Command::Edit { set, .. } => {
            for (field, value) in set {
                page.input(field, value)?;
            }
            let state = page.click_update().await;
            ensure!(state == PageState::Navigated, "book {} was not updated", id);
        }
        Command::Delete { .. } => {
            let state = page.click_delete().await;
            ensure!(state == PageState::Navigated, "book {} was not deleted", id);
        }
    }

    Ok(())
}
