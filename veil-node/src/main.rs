use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
#[cfg(not(feature = "rocksdb"))]
use tracing::warn;
use tracing_subscriber::FmtSubscriber;
use veil_node::genesis::create_genesis_state;
use veil_node::{LedgerApp, LedgerService, NodeConfig};
use veil_storage::Storage;
use veil_types::keys::WalletKey;

#[derive(Parser, Debug)]
#[command(author, version, about = "Veil lending ledger node", long_about = None)]
struct Args {
    /// JSON config file. Defaults are used when it does not exist.
    #[arg(short, long, default_value = "veil-node.json")]
    config: PathBuf,
    /// Overrides `data_dir` from the config.
    #[arg(short, long)]
    data_dir: Option<String>,
    /// Hex wallet key of the genesis admin. Overrides the config.
    #[arg(long)]
    admin: Option<String>,
    /// Depth of the submission queue.
    #[arg(long, default_value_t = 1024)]
    queue_depth: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = NodeConfig::load(&args.config)?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder().with_max_level(config.level()?).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;
    info!("Starting Veil node...");

    let admin_override = args
        .admin
        .as_deref()
        .map(WalletKey::from_hex)
        .transpose()
        .context("decoding --admin")?;
    let contract_address = config.contract_address_bytes()?;

    // 2. Init Storage
    #[cfg(feature = "rocksdb")]
    let backend = veil_storage::RocksStore::open(&config.data_dir).context("Failed to initialize storage")?;
    #[cfg(not(feature = "rocksdb"))]
    let backend = {
        warn!("Built without rocksdb; ledger state is kept in memory only");
        veil_storage::MemoryStore::new()
    };
    info!("Storage initialized at {}", config.data_dir);

    // 3. Load or Create State
    let genesis = config.genesis.clone();
    let storage = Storage::with_retention(backend, config.snapshot_retention);
    let app = LedgerApp::open(storage, contract_address, move || {
        create_genesis_state(&genesis, admin_override)
    })?;
    info!(
        "Ledger at height {} (root {}, admin {})",
        app.height(),
        hex::encode(app.state().root_hash()),
        app.state().admin
    );

    // 4. Run the single-writer service
    let (service, handle) = LedgerService::new(app, args.queue_depth);
    let task = tokio::spawn(service.run());

    info!("Node running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;

    drop(handle);
    let app = task.await.context("ledger service panicked")?;
    info!("Shut down at height {}", app.height());
    Ok(())
}
