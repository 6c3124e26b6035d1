//! Pitchside: live football match feed with AI betting predictions.
//!
//! Holds the authoritative match list, simulates live odds movement, and
//! asks the Gemini API for a betting recommendation on a selected match.

mod api;
mod app;
mod db;
mod error;
mod feed;
mod models;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{FeedClient, FeedSource, GeminiClient};
use crate::app::App;
use crate::db::SessionStore;
use crate::feed::{team_form, SampleFeed, View, TICK_INTERVAL};
use crate::models::{Match, UserSession};

/// Pitchside match feed CLI.
#[derive(Parser)]
#[command(name = "pitchside")]
#[command(about = "Live football match feed with AI betting predictions", long_about = None)]
struct Cli {
    /// Session database file path
    #[arg(short, long, default_value = "sqlite:./pitchside.db?mode=rwc")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a display name and email (remembered across restarts)
    Login {
        /// Display name
        name: String,

        /// Email address
        email: String,
    },

    /// Forget the remembered session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List matches with filtering and pagination
    Matches {
        /// Free-text search over teams and league
        #[arg(short, long, default_value = "")]
        query: String,

        /// Exact league name, or "all"
        #[arg(short = 'L', long, default_value = "all")]
        league: String,

        /// Top-level view
        #[arg(short, long, value_enum, default_value_t = View::Dashboard)]
        view: View,

        /// Page number (1-based, 6 matches per page)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Use the bundled fixtures instead of the configured feed
        #[arg(long)]
        offline: bool,
    },

    /// List the leagues present in the feed
    Leagues {
        /// Use the bundled fixtures instead of the configured feed
        #[arg(long)]
        offline: bool,
    },

    /// Ask the AI engine for a betting prediction on one match
    Predict {
        /// Match id, e.g. m2
        match_id: String,

        /// Use the bundled fixtures instead of the configured feed
        #[arg(long)]
        offline: bool,
    },

    /// Watch the live feed with simulated odds movement (Ctrl+C to stop)
    Watch {
        /// Top-level view for the initial listing
        #[arg(short, long, value_enum, default_value_t = View::Dashboard)]
        view: View,

        /// Exact league name, or "all"
        #[arg(short = 'L', long, default_value = "all")]
        league: String,

        /// Use the bundled fixtures instead of the configured feed
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let sessions = SessionStore::new(&cli.database).await?;

    match cli.command {
        Commands::Login { name, email } => {
            let session = UserSession::new(name, email);
            sessions.save(&session).await?;
            println!("Signed in as {} <{}>.", session.name, session.email);
        }

        Commands::Logout => {
            sessions.clear().await?;
            println!("Signed out.");
        }

        Commands::Whoami => match sessions.load().await? {
            Some(session) => println!("{} <{}>", session.name, session.email),
            None => println!("No active session. Run 'pitchside login <name> <email>' first."),
        },

        Commands::Matches {
            query,
            league,
            view,
            page,
            offline,
        } => {
            require_session(&sessions).await?;

            let source = feed_source(offline)?;
            let mut app = App::new();
            if !app.load_feed(source.as_ref()).await {
                println!("Could not load the live match feed. Try again later.");
                return Ok(());
            }

            app.set_view(view);
            app.set_league(league);
            app.set_query(query);
            app.set_page(page);

            print_page(&app);
        }

        Commands::Leagues { offline } => {
            require_session(&sessions).await?;

            let source = feed_source(offline)?;
            let mut app = App::new();
            if !app.load_feed(source.as_ref()).await {
                println!("Could not load the live match feed. Try again later.");
                return Ok(());
            }

            println!("\nLeagues in today's feed:");
            for league in app.leagues() {
                println!("  {}", league);
            }
        }

        Commands::Predict { match_id, offline } => {
            require_session(&sessions).await?;

            let source = feed_source(offline)?;
            let mut app = App::new();
            if !app.load_feed(source.as_ref()).await {
                println!("Could not load the live match feed. Try again later.");
                return Ok(());
            }

            let provider = GeminiClient::from_env()?;
            if !provider.is_configured() {
                warn!("GEMINI_API_KEY not set; showing the baseline fallback prediction");
            }

            let selected = app.request_prediction(&provider, &match_id).await?;
            if !selected {
                println!("Match {} deselected.", match_id);
                return Ok(());
            }

            let m = app
                .get_match(&match_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("match {} missing after selection", match_id))?;
            let prediction = app
                .prediction()
                .ok_or_else(|| anyhow::anyhow!("prediction missing after request"))?;

            println!("\n=== AI Prediction: {} ===", m.title());
            println!("League:          {}", m.league);
            println!("Status:          {}", m.status);
            if let Some(score) = m.score {
                println!("Current Score:   {}", score);
            }
            println!(
                "Odds:            1: {}  X: {}  2: {}",
                m.odds.home, m.odds.draw, m.odds.away
            );
            println!();
            println!(
                "Probability:     Home {:.1}%  Draw {:.1}%  Away {:.1}%",
                prediction.probability.home_win,
                prediction.probability.draw,
                prediction.probability.away_win
            );
            println!("Recommended Bet: {}", prediction.recommended_bet);
            println!("Confidence:      {:.0}/100", prediction.confidence_score);
            println!("Predicted Score: {}", prediction.predicted_score);
            println!("Risk Level:      {}", prediction.risk_level);
            println!("\nAnalysis:\n  {}", prediction.ai_analysis);

            for team in [&m.home_team, &m.away_team] {
                println!("\n--- Recent form: {} ---", team);
                for stat in team_form(team) {
                    println!(
                        "  {}  {} {} vs {}",
                        stat.date,
                        stat.result.letter(),
                        stat.score,
                        stat.opponent
                    );
                }
            }
        }

        Commands::Watch {
            view,
            league,
            offline,
        } => {
            require_session(&sessions).await?;

            let source = feed_source(offline)?;
            let mut app = App::new();
            if !app.load_feed(source.as_ref()).await {
                println!("Could not load the live match feed. Try again later.");
                return Ok(());
            }

            app.set_view(view);
            app.set_league(league);

            println!("\n=== Pitchside Live Feed ===");
            print_page(&app);
            println!(
                "\nWatching odds movement every {}s. Press Ctrl+C to stop.\n",
                TICK_INTERVAL.as_secs()
            );

            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            ticker.tick().await; // the first activation fires immediately; skip it
            let mut rng = StdRng::from_entropy();

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        for id in app.tick(&mut rng) {
                            if let Some(m) = app.get_match(&id) {
                                print_movement(m);
                            }
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        println!("\nStopping live feed...");
                        break;
                    }
                }
            }

            info!("Live feed stopped");
        }
    }

    Ok(())
}

/// Commands past the login screen require a remembered session.
async fn require_session(sessions: &SessionStore) -> Result<UserSession> {
    sessions.load().await?.ok_or_else(|| {
        anyhow::anyhow!("No active session. Run 'pitchside login <name> <email>' first.")
    })
}

/// The configured HTTP feed, or the bundled fixtures when offline was asked
/// for or no feed is configured.
fn feed_source(offline: bool) -> Result<Box<dyn FeedSource>> {
    if offline {
        return Ok(Box::new(SampleFeed));
    }

    match FeedClient::from_env()? {
        Some(client) => Ok(Box::new(client)),
        None => {
            info!("FEED_API_URL not set; using bundled fixtures");
            Ok(Box::new(SampleFeed))
        }
    }
}

/// Print the currently visible page as a table.
fn print_page(app: &App) {
    let page = app.visible();

    if page.matches.is_empty() {
        println!("\nNo matches available right now.");
        return;
    }

    println!(
        "\n{:<5} {:<9} {:<34} {:<24} {:>6} {:>6} {:>6}  {}",
        "ID", "STATUS", "MATCH", "LEAGUE", "1", "X", "2", "SCORE"
    );
    println!("{}", "-".repeat(104));

    for m in &page.matches {
        let score = m.score.map(|s| s.to_string()).unwrap_or_default();
        println!(
            "{:<5} {:<9} {:<34} {:<24} {:>6} {:>6} {:>6}  {}",
            m.id,
            m.status.to_string(),
            truncate(&m.title(), 32),
            truncate(&m.league, 22),
            m.odds.home,
            m.odds.draw,
            m.odds.away,
            score
        );
    }

    println!(
        "\nPage {} of {} ({} matches)",
        page.page, page.total_pages, page.total_matches
    );
}

/// One odds-movement line for a moved match.
fn print_movement(m: &Match) {
    let Some(prev) = m.previous_odds else { return };

    println!(
        "[{}] {:<5} {:<34} 1: {}->{} {}  X: {}->{} {}  2: {}->{} {}",
        chrono::Local::now().format("%H:%M:%S"),
        m.id,
        truncate(&m.title(), 32),
        prev.home,
        m.odds.home,
        direction(prev.home, m.odds.home),
        prev.draw,
        m.odds.draw,
        direction(prev.draw, m.odds.draw),
        prev.away,
        m.odds.away,
        direction(prev.away, m.odds.away),
    );
}

fn direction(prev: Decimal, current: Decimal) -> char {
    if current > prev {
        '+'
    } else if current < prev {
        '-'
    } else {
        '='
    }
}

/// Truncate a string with ellipsis if too long. Counts chars, not bytes, so
/// feed-supplied names like "Atlético Madrid" never split mid-character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
