//! Chat Server - anonymous chat identity service
use chat_core::UserId;
use chat_identity::{IdentityCache, IdentityService, RandomIdentityGenerator};
use chat_server::{config::ServerConfig, create_router, state::AppState};
use chat_storage::SqliteUserStore;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chat-server")]
#[command(about = "Anonymous chat identity server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Soft-disable a chat user
    DisableUser {
        /// User id
        #[arg(short, long)]
        id: String,
    },
    /// List registered chat users
    ListUsers {
        /// Maximum number of users to print
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
        /// Number of users to skip
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chat_server=info,chat_identity=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::DisableUser { id } => {
            disable_user(&id).await?;
        }
        Commands::ListUsers { limit, offset } => {
            list_users(limit, offset).await?;
        }
    }

    Ok(())
}

/// Open the configured database and make sure the schema exists
///
/// Schema preparation failures abort startup.
async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteUserStore> {
    ensure_database_dir(&config.storage.database_url)?;

    let pool = chat_storage::create_pool_with(
        &config.storage.database_url,
        config.storage.max_connections,
    )
    .await?;
    chat_storage::create_schema(&pool).await?;

    Ok(SqliteUserStore::new(pool))
}

/// SQLite creates the database file but not its parent directory
fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();

    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

fn identity_service(config: &ServerConfig, store: Arc<SqliteUserStore>) -> IdentityService {
    IdentityService::new(
        Arc::new(IdentityCache::new(config.cache.capacity)),
        store,
        Arc::new(RandomIdentityGenerator::new()),
    )
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load_from(config_path)?;
    config.validate()?;

    tracing::info!("Starting Chat Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let store = Arc::new(open_store(&config).await?);
    tracing::info!("Database connected");

    // Initialize identity service
    let identity = Arc::new(identity_service(&config, Arc::clone(&store)));
    tracing::info!(
        "Identity cache initialized (capacity: {})",
        match config.cache.capacity {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        }
    );

    // Build application state
    let mut app_state = AppState::new(identity, store);
    if let Some(token) = config.admin.token.clone() {
        app_state = app_state.with_admin_token(token);
    }

    // Build router
    let app = create_router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn disable_user(id: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    config.validate()?;

    let store = Arc::new(open_store(&config).await?);
    let identity = identity_service(&config, store);

    let id = UserId::new(id);
    let Some(user) = identity.resolve_by_id(&id).await else {
        anyhow::bail!("No user with id {}", id);
    };

    let disabled = identity.disable(&user).await?;
    if let Some(at) = disabled.disabled_at {
        println!(
            "Disabled {} ({}) at {}",
            disabled.id,
            disabled.display_name,
            at.to_rfc3339()
        );
    }

    Ok(())
}

async fn list_users(limit: u32, offset: u32) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    config.validate()?;

    let store = open_store(&config).await?;
    let users = store.list(limit, offset).await?;
    let total = store.count().await?;

    println!("Users ({} total):", total);
    for user in users {
        let state = if user.is_disabled() { "disabled" } else { "active" };
        println!("  {} - {} [{}]", user.id, user.display_name, state);
    }

    Ok(())
}
