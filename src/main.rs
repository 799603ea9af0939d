use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use taskd::config::ServerConfig;
use taskd::tasks::store::{MemoryTaskStore, SqliteTaskStore, TaskStore};
use taskd::tasks::TaskService;
use taskd::{rest, AppContext};

#[derive(Parser)]
#[command(name = "taskd", about = "taskd — small task-management REST daemon", version)]
struct Args {
    /// REST server port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for config and the SQLite database
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Store backing: "memory" (ephemeral) or "sqlite" (durable)
    #[arg(long, env = "TASKD_STORE")]
    store: Option<String>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "TASKD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Arc::new(ServerConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.store,
        args.bind_address,
    ));

    let _log_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    info!(
        store = %config.store,
        environment = %config.environment,
        "starting taskd v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = build_store(&config).await?;
    let ctx = Arc::new(AppContext {
        config,
        tasks: Arc::new(TaskService::new(store)),
        started_at: std::time::Instant::now(),
    });

    rest::start_rest_server(ctx).await
}

/// Pick the store backing from config. Unknown values fall back to the
/// ephemeral store with a warning rather than refusing to start.
async fn build_store(config: &ServerConfig) -> Result<Arc<dyn TaskStore>> {
    match config.store.as_str() {
        "sqlite" => {
            let auto_create_schema = config.environment != "production";
            let store = SqliteTaskStore::new(
                &config.data_dir,
                config.slow_query_threshold_ms,
                auto_create_schema,
            )
            .await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryTaskStore::new())),
        other => {
            warn!("unknown store backing '{other}', falling back to memory");
            Ok(Arc::new(MemoryTaskStore::new()))
        }
    }
}

fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("taskd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
        }
        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
