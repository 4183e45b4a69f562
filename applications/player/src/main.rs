/// Story Player - terminal story player and admin statistics
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use story_player::{AppConfig, Host};
use story_playback::ViewMode;
use story_server_client::{
    tooltip_label, AdminSession, Credentials, FileCredentialStore, ServerConfig, StatsPeriod,
    StatsView, StoryServerClient,
};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "story-player")]
#[command(about = "Children's audio story player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Story server URL (overrides the config file)
    #[arg(short, long, global = true, env = "STORY_SERVER_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play stories interactively (default)
    Play {
        /// Theme layout: grid or carousel
        #[arg(short, long)]
        layout: Option<String>,
    },
    /// List themes and stories
    Themes,
    /// Download a story's audio file
    Download {
        theme: String,
        title: String,
        /// Output file (default: "<title>.mp3")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Playtime statistics
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Log in and cache the credentials
    Login {
        #[arg(short, long, default_value = "admin")]
        username: String,
        #[arg(short, long, env = "STORY_ADMIN_PASSWORD")]
        password: String,
    },
    /// Show statistics for a period (24h, 7d, 30d, alltime)
    Stats {
        #[arg(default_value = "24h")]
        period: StatsPeriod,
        /// Print the dashboard data as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the cached credentials
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "story_player=info,story_server_client=info,story_playback=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.server {
        config.server.url = url;
    }

    match cli.command.unwrap_or(Commands::Play { layout: None }) {
        Commands::Play { layout } => {
            if let Some(layout) = layout {
                config.player.layout = parse_layout(&layout)?;
            }
            config.validate()?;
            play(&config).await?;
        }
        Commands::Themes => {
            config.validate()?;
            list_themes(&config).await?;
        }
        Commands::Download {
            theme,
            title,
            output,
        } => {
            config.validate()?;
            download(&config, &theme, &title, output).await?;
        }
        Commands::Admin { command } => {
            config.validate()?;
            admin(&config, command).await?;
        }
    }

    Ok(())
}

fn parse_layout(layout: &str) -> anyhow::Result<ViewMode> {
    match layout.to_lowercase().as_str() {
        "grid" => Ok(ViewMode::Grid),
        "carousel" => Ok(ViewMode::Carousel),
        other => anyhow::bail!("Unknown layout '{}' (expected grid or carousel)", other),
    }
}

fn client(config: &AppConfig) -> anyhow::Result<StoryServerClient> {
    StoryServerClient::new(ServerConfig::new(config.server.url.clone()))
        .context("Invalid server URL")
}

async fn play(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Story Player");
    tracing::info!("Server: {}", config.server.url);
    tracing::info!("Layout: {:?}", config.player.layout);

    let mut host = Host::new(config, client(config)?, std::io::stdout());
    host.start().await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let result = host.run(stdin).await;

    // Report what was played even if the loop failed
    host.shutdown().await?;
    result?;
    Ok(())
}

async fn list_themes(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = client(config)?.catalog().fetch_themes().await?;

    if catalog.is_empty() {
        println!("Keine Themen");
        return Ok(());
    }

    for theme in catalog.theme_names() {
        let stories = catalog.stories(&theme).unwrap_or_default();
        println!("{} ({})", theme, stories.len());
        for story in stories {
            println!("  - {}", story.title);
        }
    }

    Ok(())
}

async fn download(
    config: &AppConfig,
    theme: &str,
    title: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dest = output.unwrap_or_else(|| PathBuf::from(format!("{}.mp3", title)));
    let client = client(config)?;

    let bytes = client
        .audio()
        .download_story(theme, title, &dest, |progress| {
            tracing::debug!(
                received = progress.bytes_received,
                total = ?progress.bytes_total,
                "Downloading"
            );
        })
        .await
        .with_context(|| format!("Failed to download {}/{}", theme, title))?;

    println!("{} ({} bytes)", dest.display(), bytes);
    Ok(())
}

async fn admin(config: &AppConfig, command: AdminCommands) -> anyhow::Result<()> {
    let store = match &config.admin.credential_dir {
        Some(dir) => FileCredentialStore::new(dir),
        None => FileCredentialStore::in_config_dir()
            .context("No config directory for the credential cache")?,
    };
    let mut session = AdminSession::new(client(config)?, store);

    match command {
        AdminCommands::Login { username, password } => {
            session.login(&Credentials::new(username, password)).await?;
            println!("Angemeldet");
        }
        AdminCommands::Stats { period, json } => {
            if !session.restore().await {
                anyhow::bail!("Not logged in (run 'story-player admin login')");
            }
            let stats = session.stats(period).await?;
            let view = StatsView::from_stats(period, &stats);

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_stats(&view);
            }
        }
        AdminCommands::Logout => {
            session.logout();
            println!("Abgemeldet");
        }
    }

    Ok(())
}

fn print_stats(view: &StatsView) {
    println!("Gesamt ({}): {}", view.period, view.total);
    println!();

    for point in &view.chart {
        let bar = "#".repeat(point.minutes.min(60) as usize);
        println!("{:>6} {:<60} {}", point.label, bar, tooltip_label(point.minutes));
    }
    println!();

    if let Some(placeholder) = view.placeholder {
        println!("{}", placeholder);
        return;
    }
    for row in &view.ranking {
        println!("{:>4} {:<20} {:>9} {}", row.rank, row.theme, row.time, row.plays);
    }
}
