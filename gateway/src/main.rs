use admin_schema::UserStore;
use admin_server::{Engine, ServerConfig};
use clap::crate_version;
use mimalloc::MiMalloc;
use tokio::runtime;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod args;
mod config;
mod telemetry;

const THREAD_NAME: &str = "admin-gateway";

fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("a crypto provider was already installed"))?;

    let args = self::args::parse();
    let config = self::config::load(&args)?;

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name(THREAD_NAME)
        .build()?;

    runtime.block_on(async move {
        telemetry::init(&args)?;

        let crate_version = crate_version!();
        tracing::info!("Admin Gateway {crate_version}");

        let schema = admin_schema::build(&config, UserStore::default());

        let config = ServerConfig {
            listen_addr: args.listen_address,
            config,
            engine: Engine::new(schema),
        };

        admin_server::serve(config).await?;

        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
