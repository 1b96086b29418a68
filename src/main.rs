use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::{BotError, ConfigError};
use application::messaging::LeaderboardParser;
use application::services::{AnnounceService, TrackerService};
use domain::traits::Bot;
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::discord::DiscordAdapter;
use infrastructure::config::Config;
use infrastructure::scheduler::Scheduler;
use infrastructure::webcrawler::WebCrawler;

#[derive(Parser)]
#[command(name = "steam-ladder-bot")]
#[command(about = "Posts Steam leaderboard movements of one player to Discord", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Discord bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Locate the player once and print the announcement `run` would post, without sending it
    Check,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => load_config(&cli.config, cli.token).and_then(run_bot),
        Commands::Check => load_config(&cli.config, cli.token).and_then(check),
        Commands::Version => {
            println!("steam-ladder-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    };

    if let Some(token) = token_override {
        config.discord.token = Some(token);
    }

    config.validate()?;
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))
}

fn build_tracker(config: &Config) -> Result<TrackerService, BotError> {
    let crawler = WebCrawler::new(config.leaderboard.url.clone(), &config.crawler)?;
    let parser = LeaderboardParser::new(config.leaderboard.player.clone())?;
    Ok(TrackerService::new(Arc::new(crawler), parser, config.scan()))
}

/// Discord adapter when a token is configured, console otherwise
fn build_bot(config: &Config) -> Result<(Arc<dyn Bot>, String), BotError> {
    match &config.discord.token {
        Some(token) => {
            let channel_id = config
                .discord
                .channel_id
                .clone()
                .ok_or_else(|| ConfigError::MissingField("discord.channel-id".to_string()))?;
            let bot: Arc<dyn Bot> = Arc::new(DiscordAdapter::new(token.clone(), config.discord_timeout())?);
            Ok((bot, channel_id))
        }
        None => {
            tracing::warn!("No Discord token configured, announcements go to stdout");
            let bot: Arc<dyn Bot> = Arc::new(ConsoleAdapter::new());
            Ok((bot, "console".to_string()))
        }
    }
}

/// Connect the bot and seed the announcer from channel history
async fn connect_announcer(config: &Config, bot: Arc<dyn Bot>, channel_id: String) -> Result<AnnounceService, BotError> {
    bot.start().await?;

    let mut announcer = AnnounceService::new(bot, channel_id, config.leaderboard.player.clone());
    announcer.restore(config.discord.history_limit).await;
    Ok(announcer)
}

fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!(
        "Starting {}: tracking {} every {}s",
        config.bot.name,
        config.leaderboard.player,
        config.leaderboard.poll_interval_secs
    );

    let tracker = build_tracker(&config)?;
    let (bot, channel_id) = build_bot(&config)?;

    runtime()?.block_on(async {
        let mut announcer = connect_announcer(&config, bot, channel_id).await?;

        let scheduler = Scheduler::new(config.poll_interval());
        scheduler
            .run(&tracker, &mut announcer, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await;

        Ok::<(), BotError>(())
    })
}

fn check(config: Config) -> Result<(), BotError> {
    let tracker = build_tracker(&config)?;
    let (bot, channel_id) = build_bot(&config)?;

    runtime()?.block_on(async {
        let announcer = connect_announcer(&config, bot, channel_id).await?;

        let standing = tracker.locate().await?;
        println!("{}: {}", tracker.player(), standing);

        match announcer.preview(standing) {
            Some(text) => println!("\n{}", text),
            None => println!("\nNo change since the last announcement, nothing would be posted"),
        }
        Ok::<(), BotError>(())
    })
}

fn init_config(path: &str) -> Result<(), BotError> {
    if std::path::Path::new(path).exists() {
        return Err(ConfigError::InvalidValue(format!("{} already exists", path)).into());
    }

    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)
        .map_err(|e| BotError::Internal(format!("Failed to write {}: {}", path, e)))?;
    println!("Wrote default config to {}", path);
    Ok(())
}
