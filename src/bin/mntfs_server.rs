//! Server binary (spec §6): binds an address and exports a directory
//! subtree until killed. Flags override an optional TOML config file,
//! which overrides built-in defaults (SPEC_FULL.md §6).

use std::path::PathBuf;

use clap::Parser;

use mntfs::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "mntfs-server", about = "Serve a directory subtree over the mntfs wire protocol")]
struct Args {
    /// Optional TOML config file.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Override the listen address (host:port).
    #[arg(long = "bind")]
    bind: Option<String>,

    /// Override the exported directory.
    #[arg(long = "root")]
    root: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .init();

    let bind_addr = args.bind.unwrap_or_else(|| config.bind_addr());
    let root = args.root.unwrap_or_else(|| config.export_root());

    let addr = bind_addr.parse()?;
    let root = PathBuf::from(root);

    tokio::runtime::Runtime::new()?.block_on(mntfs::server::run(addr, root))
}
