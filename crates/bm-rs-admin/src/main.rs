mod config;
mod console;

use bm_rs_catalog::{load_file, Catalog, SharedCatalog};
use config::AdminConfig;
use console::Console;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};

const DEFAULT_CONFIG: &str = "beastmaster.toml";

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = match AdminConfig::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("BM-RS Admin v{} starting", env!("CARGO_PKG_VERSION"));

    let catalog_path = config.catalog.path.clone();
    let catalog = if catalog_path.exists() {
        match load_file(&catalog_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", catalog_path.display());
                std::process::exit(1);
            }
        }
    } else {
        info!(
            "No catalog at {}, starting with predefined mob types",
            catalog_path.display()
        );
        Catalog::new()
    };

    let rng = match config.random.seed {
        Some(seed) => {
            info!("Using fixed random seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut console = Console::new(SharedCatalog::new(catalog), catalog_path, rng);

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    info!("Type help for a list of commands");
    loop {
        tokio::select! {
            line = console_rx.recv() => {
                match line {
                    Some(line) => {
                        if console.handle_line(&line) {
                            break;
                        }
                    }
                    None => break, // stdin closed
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    if config.catalog.save_on_stop {
        if let Err(e) = console.save() {
            error!(
                "Could not save catalog to {}: {e}",
                console.catalog_path().display()
            );
        }
    }
    info!("Admin console shut down.");
}
