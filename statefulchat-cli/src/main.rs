//! CLI entry point for statefulchat

mod display;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::{style, Term};
use dialoguer::{Confirm, Input};
use statefulchat_agent::{
    ChatDisplay, ConversationSession, ModelSettings, Notice, SelectionMachine, SelectionOutcome,
    SessionEnd,
};
use statefulchat_core::config::{Config, ConfigLoader};
use statefulchat_core::logging::init_logging;
use statefulchat_core::session::{RecordStore, SessionRepository};
use statefulchat_core::utils::expand_tilde;
use statefulchat_providers::{LLMProvider, OpenAICompatClient};
use std::path::PathBuf;
use tracing::info;

use display::{PlainDisplay, RichDisplay};
use prompt::TerminalPrompter;

#[derive(Parser)]
#[command(name = "statefulchat")]
#[command(about = "Terminal chat client with saved, resumable conversations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding conversation records and audit logs
    #[arg(short, long, global = true)]
    storage_dir: Option<String>,

    /// Model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Plain output without colors or spinner
    #[arg(long, global = true)]
    plain: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse saved conversations and chat (default)
    Chat,
    /// Print the saved conversations and exit
    List,
    /// Write a configuration file interactively
    Onboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config_loader = if let Some(dir) = &cli.config_dir {
        ConfigLoader::with_dir(dir)
    } else {
        ConfigLoader::new()
    };

    let command = cli.command.as_ref().unwrap_or(&Commands::Chat);
    if let Commands::Onboard = command {
        return run_onboard(&config_loader);
    }

    let mut config = config_loader.load()?;
    apply_cli_overrides(&mut config, &cli);
    let _log_guard = init_logging(&config.logging);
    info!(
        "statefulchat starting, storage at {}",
        expand_tilde(&config.storage.dir).display()
    );

    match command {
        Commands::Chat => run_chat(&config).await,
        Commands::List => run_list(&config),
        Commands::Onboard => Ok(()),
    }
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.storage_dir {
        config.storage.dir = dir.clone();
    }
    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }
    if cli.plain {
        config.display.style = "plain".to_string();
    }
}

fn open_repository(config: &Config) -> SessionRepository {
    let store = RecordStore::new(expand_tilde(&config.storage.dir));
    SessionRepository::new(store, config.session.system_prompt.clone())
}

async fn run_chat(config: &Config) -> Result<()> {
    let repo = open_repository(config);
    let provider = OpenAICompatClient::from_config(&config.provider);
    let settings = ModelSettings {
        model: Some(provider.get_default_model()),
        max_tokens: config.provider.max_tokens,
        temperature: config.provider.temperature,
    };

    let interactive = config.display.style == "rich" && Term::stdout().is_term();
    let display: Box<dyn ChatDisplay> = if interactive {
        println!("{}", style("statefulchat").bold().cyan());
        Box::new(RichDisplay::new())
    } else {
        Box::new(PlainDisplay)
    };
    let mut prompter = TerminalPrompter::new(interactive);

    loop {
        let machine = SelectionMachine::new(&repo, display.as_ref());
        let selected = match machine.run(&mut prompter) {
            SelectionOutcome::Open(selected) => selected,
            SelectionOutcome::Exit => break,
        };

        let mut session = ConversationSession::new(
            selected,
            repo.store(),
            &provider,
            display.as_ref(),
            settings.clone(),
        );
        if session.run(&mut prompter).await == SessionEnd::InputClosed {
            break;
        }
    }

    display.render_notice(Notice::Goodbye);
    info!("statefulchat exiting");
    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let repo = open_repository(config);
    let summaries = repo.summaries();
    if summaries.is_empty() {
        println!("No saved conversations in {}", repo.store().dir().display());
        return Ok(());
    }

    for (index, summary) in summaries.iter().enumerate() {
        println!("{}", display::summary_line(index, summary));
    }
    Ok(())
}

fn run_onboard(loader: &ConfigLoader) -> Result<()> {
    println!("{}", style("Welcome to statefulchat!").bold().cyan());
    println!("Let's set up your configuration.\n");

    let config_path = loader.config_dir().join("config.json");
    if config_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt("Configuration already exists. Overwrite?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Onboard cancelled.");
            return Ok(());
        }
    }

    let mut config = Config::default();

    config.provider.api_base = Input::new()
        .with_prompt("API base URL")
        .default(config.provider.api_base.clone())
        .interact_text()?;
    config.provider.api_key = Input::new()
        .with_prompt("API key (leave empty to use OPENAI_API_KEY)")
        .allow_empty(true)
        .interact_text()?;
    config.provider.model = Input::new()
        .with_prompt("Model")
        .default(config.provider.model.clone())
        .interact_text()?;
    config.storage.dir = Input::new()
        .with_prompt("Conversation directory")
        .default(config.storage.dir.clone())
        .interact_text()?;

    loader.save(&config)?;

    println!(
        "\n{}",
        style("Configuration saved successfully!").green().bold()
    );
    println!("  Config file: {}", config_path.display());
    println!("\nNext steps:");
    println!("  {} - Start chatting", style("statefulchat").cyan());
    println!(
        "  {} - See saved conversations",
        style("statefulchat list").cyan()
    );
    Ok(())
}
