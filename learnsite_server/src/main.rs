use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use learnsite::{AppState, SiteConfig, SiteDb, SiteDbBuilder};

#[derive(Parser, Debug)]
#[command(name = "learnsite", version, about = "App catalog and todo list web site")]
struct Cli {
    #[command(flatten)]
    db: DbArgs,

    /// Log every SQL statement
    #[arg(long, global = true)]
    sql_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DbArgs {
    /// SeaORM connection string
    #[arg(long, global = true, env = "DATABASE_URL", default_value = SiteConfig::DEFAULT_DATABASE_URL)]
    database_url: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the site over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "LEARNSITE_LISTEN", default_value = SiteConfig::DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Directory served under /media/
        #[arg(long, env = "LEARNSITE_MEDIA_ROOT", default_value = SiteConfig::DEFAULT_MEDIA_ROOT)]
        media_root: PathBuf,
    },
    /// Insert catalog entries from a JSON fixture
    LoadCatalog {
        /// Path to a JSON array of app varieties
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let db = connect(&cli.db.database_url, cli.sql_log).await?;

    match cli.command {
        Command::Serve { listen, media_root } => {
            let config = SiteConfig {
                database_url: cli.db.database_url,
                listen_addr: listen,
                media_root,
            };
            serve(db, config).await
        }
        Command::LoadCatalog { file } => {
            let loaded = learnsite::loader::load_catalog_file(db.inner(), &file)
                .await
                .with_context(|| format!("loading {}", file.display()))?;
            log::info!("Loaded {} app varieties", loaded.len());
            Ok(())
        }
    }
}

async fn connect(database_url: &str, sql_log: bool) -> anyhow::Result<SiteDb> {
    let db = SiteDbBuilder::new(database_url)
        .with_sqlx_logging(sql_log)
        .build()
        .await
        .with_context(|| format!("connecting to {database_url}"))?;
    learnsite::entity::migrate(&db)
        .await
        .context("creating tables")?;
    log::info!("{} tables ready", db.registry().all_tables().len());
    Ok(db)
}

async fn serve(db: SiteDb, config: SiteConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    log::info!("Serving media from {}", config.media_root.display());

    let app = learnsite::routes::router(AppState::new(db, config)?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
