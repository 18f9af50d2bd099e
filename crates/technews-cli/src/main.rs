use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use technews_core::models::{ListParams, LoginRequest, PostsQuery, RegisterRequest};
use technews_core::utils::{format_date, read_time, truncate};
use technews_core::{ApiClient, ApiRequest, AuthSession, Config, SessionEvent};

/// Width of the title column in `posts` output
const TITLE_WIDTH: usize = 48;

#[derive(Parser)]
#[command(name = "technews", version, about = "Command-line client for TechNews")]
struct Cli {
    /// API base URL (overrides the config file)
    #[arg(long, env = "TECHNEWS_API_BASE_URL", global = true)]
    api_url: Option<String>,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, env = "TECHNEWS_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the token pair
    Login {
        /// Username or email address
        identifier: Option<String>,
        /// Treat the identifier as an email address even without an `@`
        #[arg(long)]
        email: bool,
    },
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Sign out and delete stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List posts
    Posts {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Only posts written by the signed-in user
        #[arg(long)]
        mine: bool,
    },
    /// Send an authenticated GET request and print the response body
    Get { path: String },
}

fn init_tracing(log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "technews.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_ref());

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ref url) = cli.api_url {
        config.api_base_url = url.clone();
    }
    info!(api = %config.api_base_url, "TechNews CLI starting");

    let client = ApiClient::from_config(&config)?;
    let mut events = client.subscribe();

    let result = run(cli.command, client, &mut config).await;

    report_session_events(&mut events);
    if let Err(ref e) = result {
        error!(error = %e, "Command failed");
    }
    result
}

async fn run(command: Command, client: ApiClient, config: &mut Config) -> Result<()> {
    let mut session = AuthSession::new(client.clone());

    match command {
        Command::Login { identifier, email } => {
            let identifier = match identifier.or_else(|| config.last_username.clone()) {
                Some(id) => id,
                None => prompt("Username or email: ")?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            let credentials = if email {
                LoginRequest::with_email(identifier.clone(), password)
            } else {
                LoginRequest::from_identifier(identifier.clone(), password)
            };

            if let Err(e) = session.login(&credentials).await {
                anyhow::bail!(
                    "{}",
                    session.error.clone().unwrap_or_else(|| e.to_string())
                );
            }

            config.last_username = Some(identifier);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Logged in as {}", session.full_name());
        }

        Command::Register {
            username,
            email,
            first_name,
            last_name,
        } => {
            let password = rpassword::prompt_password("Password: ")?;
            let confirmation = rpassword::prompt_password("Confirm password: ")?;
            let request = RegisterRequest {
                username,
                email,
                password,
                password_confirmation: confirmation,
                first_name,
                last_name,
            };

            match session.register(&request).await {
                Ok(response) => {
                    if let Some(msg) = response.msg {
                        println!("{}", msg);
                    }
                    if session.is_authenticated() {
                        println!("Logged in as {}", session.full_name());
                    } else {
                        println!("Run `technews login` to sign in.");
                    }
                }
                Err(e) => anyhow::bail!(
                    "{}",
                    session.error.clone().unwrap_or_else(|| e.to_string())
                ),
            }
        }

        Command::Logout => {
            let response = session.logout().await;
            println!("{}", response.msg.unwrap_or_else(|| "Logged out".to_string()));
        }

        Command::Whoami => {
            session.initialize().await;
            match session.user {
                Some(ref user) => {
                    println!("{} <{}>", session.full_name(), user.email);
                    println!("Posts: {}  Comments: {}", user.posts_count, user.comments_count);
                    if let Some(ref joined) = user.created {
                        println!("Member since {}", format_date(Some(joined.as_str())));
                    }
                }
                None => println!("Not logged in"),
            }
        }

        Command::Posts {
            page,
            search,
            category,
            mine,
        } => {
            let query = PostsQuery {
                list: ListParams {
                    page,
                    search,
                    ..Default::default()
                },
                category,
                ..Default::default()
            };
            let posts = if mine {
                client.my_posts(&query).await?
            } else {
                client.posts(&query).await?
            };

            for post in &posts.results {
                println!(
                    "{:<width$}  {:<16}  {:<18}  {} min",
                    truncate(&post.title, TITLE_WIDTH),
                    post.author.as_deref().unwrap_or("-"),
                    format_date(post.created.as_deref()),
                    read_time(&post.content),
                    width = TITLE_WIDTH
                );
            }
            println!(
                "{} of {} posts{}",
                posts.results.len(),
                posts.count,
                if posts.has_next() { " (more with --page)" } else { "" }
            );
        }

        Command::Get { path } => {
            let response = client.send(&ApiRequest::get(path)).await?;
            match serde_json::from_slice::<serde_json::Value>(response.bytes()) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(_) => println!("{}", response.text()),
            }
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    if drain_session_events(events) {
        eprintln!("Your session has expired. Run `technews login` to sign in again.");
    }
}

/// Consume every queued event; true if any of them invalidated the session.
fn drain_session_events(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    let mut invalidated = false;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Invalidated) => invalidated = true,
            Ok(SessionEvent::Renewed) => info!("Session renewed"),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    invalidated
}
