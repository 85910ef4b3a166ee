use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use lumina::actions::{self, ActionError, ChangePasswordForm, ProfileForm, ResetForm, SignupForm};
use lumina::api::types::{DEFAULT_PER_PAGE, Favorite, VideoSearch};
use lumina::auth::{AuthState, AuthWatcher, nav_links};
use lumina::session::FileSessionStore;
use lumina::{ApiClient, ApiError, ClientConfig, ConfigError, SessionStore};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no search query or terms given")]
    EmptySearch,
    #[error("signal handler failed: {0}")]
    Signal(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "lumina", about = "Lumina account and video catalog client")]
struct Cli {
    /// Backend base URL; falls back to LUMINA_API_BASE_URL, then the default.
    #[arg(long, env = "LUMINA_API")]
    base_url: Option<String>,

    #[arg(long, env = "LUMINA_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup(SignupArgs),
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Me,
    UpdateProfile(ProfileArgs),
    DeleteAccount,
    Forgot {
        #[arg(long)]
        email: String,
    },
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    ChangePassword {
        #[arg(long)]
        current_password: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Videos(VideosCommand),
    Favorites(FavoritesCommand),
    /// Show whether a session is present and which navigation applies.
    Status,
    /// Print auth changes made by other processes until interrupted.
    Watch,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct VideosCommand {
    #[command(subcommand)]
    command: VideosSubcommand,
}

#[derive(Subcommand, Debug)]
enum VideosSubcommand {
    Popular,
    Search {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        terms: Option<String>,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    Get {
        id: String,
    },
    Health,
}

#[derive(Args, Debug)]
struct FavoritesCommand {
    #[command(subcommand)]
    command: FavoritesSubcommand,
}

#[derive(Subcommand, Debug)]
enum FavoritesSubcommand {
    List,
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        thumbnail: String,
    },
    Remove {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(&config.session_file, config.session_poll));
    let client = ApiClient::new(&config, Arc::clone(&session))?;
    tracing::debug!(base_url = client.base_url(), "lumina client ready");

    let output = run(cli.command, &client).await?;
    if let Some(output) = output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(session_file) = &cli.session_file {
        config.session_file.clone_from(session_file);
    }
    Ok(config)
}

async fn run(command: Command, client: &ApiClient) -> Result<Option<Value>, CliError> {
    let output = match command {
        Command::Signup(args) => {
            let form = SignupForm {
                first_name: args.first_name,
                last_name: args.last_name,
                age: args.age,
                email: args.email,
                password: args.password,
                confirm_password: args.confirm_password,
            };
            actions::submit_signup(client, &form).await?
        }
        Command::Login { email, password } => actions::submit_login(client, &email, &password).await?,
        Command::Logout => client.logout(),
        Command::Me => client.me().await?,
        Command::UpdateProfile(args) => {
            let form = ProfileForm { first_name: args.first_name, last_name: args.last_name, age: args.age, email: args.email };
            actions::submit_profile(client, &form).await?
        }
        Command::DeleteAccount => actions::delete_account(client).await?,
        Command::Forgot { email } => actions::submit_forgot(client, &email).await?,
        Command::Reset { token, password, confirm_password } => {
            actions::submit_reset(client, &ResetForm { token, password, confirm_password }).await?
        }
        Command::ChangePassword { current_password, new_password, confirm_password } => {
            let form = ChangePasswordForm { current_password, new_password, confirm_password };
            actions::submit_change_password(client, &form).await?
        }
        Command::Videos(videos) => run_videos(videos.command, client).await?,
        Command::Favorites(favorites) => run_favorites(favorites.command, client).await?,
        Command::Status => status_json(AuthState::from_store(client.session().as_ref())),
        Command::Watch => {
            watch(client).await?;
            return Ok(None);
        }
    };
    Ok(Some(output))
}

async fn run_videos(command: VideosSubcommand, client: &ApiClient) -> Result<Value, CliError> {
    let value = match command {
        VideosSubcommand::Popular => client.popular_videos().await?,
        VideosSubcommand::Search { query, terms, per_page } => {
            let search = VideoSearch { query, terms, per_page };
            if search.is_empty() {
                return Err(CliError::EmptySearch);
            }
            client.search_videos(&search).await?
        }
        VideosSubcommand::Get { id } => client.video(&id).await?,
        VideosSubcommand::Health => client.catalog_health().await?,
    };
    Ok(value)
}

async fn run_favorites(command: FavoritesSubcommand, client: &ApiClient) -> Result<Value, CliError> {
    let value = match command {
        FavoritesSubcommand::List => client.favorites().await?,
        FavoritesSubcommand::Add { id, title, url, thumbnail } => {
            client.add_favorite(&Favorite { id, title, url, thumbnail }).await?
        }
        FavoritesSubcommand::Remove { id } => client.remove_favorite(&id).await?,
    };
    Ok(value)
}

fn status_json(state: AuthState) -> Value {
    let links: Vec<Value> = nav_links(&state)
        .into_iter()
        .map(|link| json!({ "label": link.label(), "path": link.path() }))
        .collect();
    json!({ "authenticated": state.authenticated, "nav": links })
}

async fn watch(client: &ApiClient) -> Result<(), CliError> {
    let watcher = AuthWatcher::new(Arc::clone(client.session()));
    let mut changes = watcher.changes();
    println!("{}", serde_json::to_string(&status_json(watcher.state()))?);
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = *changes.borrow_and_update();
                println!("{}", serde_json::to_string(&status_json(state))?);
            }
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
