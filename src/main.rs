use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use configuration::{LoggingSettings, ServerOverrides, Settings};
use core_types::NewUser;
use database::{DataComponents, DbRepository};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The main entry point for the Foresee crime data service.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (DATABASE_URL, RUST_LOG) from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let mut settings = configuration::load_config(&args.config)?;
            settings.apply_overrides(&args.server);
            let _guard = init_tracing(&settings.logging);
            web_server::run_server(settings).await?;
        }
        Commands::CreateUser(args) => {
            let settings = configuration::load_config(&args.config)?;
            let _guard = init_tracing(&settings.logging);
            handle_create_user(args, &settings).await?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Crime statistics API with role-scoped access and forecasting.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Create a user directly in the database, e.g. the first administrator.
    CreateUser(CreateUserArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Path to the TOML configuration file (the extension may be omitted).
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(flatten)]
    server: ServerOverrides,
}

#[derive(Parser)]
struct CreateUserArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    full_name: String,

    /// The area the user may always see.
    #[arg(long)]
    area: String,

    #[arg(long)]
    password: String,

    /// One of the seeded roles, e.g. "admin" or "SEE_LOCAL".
    #[arg(long, default_value = "admin")]
    role: String,

    #[arg(long, default_value = "config.toml")]
    config: String,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber: stdout always, plus a daily-rolling file
/// when `logging.directory` is set. The returned guard must outlive the
/// program or buffered file output is lost.
fn init_tracing(logging: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

// ==============================================================================
// create-user Command Logic
// ==============================================================================

async fn handle_create_user(args: CreateUserArgs, settings: &Settings) -> Result<()> {
    let db_pool = database::connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    database::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    let db_repo = DbRepository::new(db_pool);

    if !db_repo.role_exists(&args.role).await? {
        bail!("Unknown role '{}'", args.role);
    }
    if db_repo.get_user(&args.email).await?.is_some() {
        bail!("A user with email '{}' already exists", args.email);
    }

    let user = db_repo
        .create_user(&NewUser {
            email: args.email,
            full_name: args.full_name,
            area: args.area,
            password: args.password,
            role: args.role,
        })
        .await?;

    tracing::info!(email = %user.email, role = %user.role, id = %user.id, "User created.");
    println!("Created user {} ({})", user.email, user.role);
    Ok(())
}
