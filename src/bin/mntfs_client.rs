//! Client binary (spec §6): mounts a remote export over FUSE.
//!
//! `-r host:dir` and `-l mountpoint` are required; `-p port` defaults to
//! [`mntfs::DEFAULT_PORT`]. Exit code 1 on a usage/argument error; any
//! other non-zero code originates in the bridge runtime.

use std::sync::Arc;

use clap::Parser;

use mntfs::client::{Client, MountFs};

#[derive(Parser, Debug)]
#[command(name = "mntfs-client", about = "Mount a remote export over FUSE")]
struct Args {
    /// Remote host and exported directory, as `host:dir`.
    #[arg(short = 'r', long = "remote")]
    remote: String,

    /// Remote server port.
    #[arg(short = 'p', long = "port", default_value_t = mntfs::DEFAULT_PORT)]
    port: u16,

    /// Local mountpoint.
    #[arg(short = 'l', long = "local")]
    local: String,
}

fn split_remote(remote: &str) -> anyhow::Result<(String, String)> {
    let (host, dir) = remote
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("-r must be host:dir, got {remote:?}"))?;
    if host.is_empty() || dir.is_empty() {
        anyhow::bail!("-r must be host:dir, got {remote:?}");
    }
    Ok((host.to_string(), dir.to_string()))
}

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let (host, remote_dir) = match split_remote(&args.remote) {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let remote_addr = format!("{host}:{}", args.port);
    let client = runtime.block_on(async { Arc::new(Client::connect(remote_addr.clone())?) })?;

    println!("mounting {remote_addr}:{remote_dir} at {}", args.local);

    let bridge = MountFs::new(client, runtime.handle().clone());
    let options = vec![fuser::MountOption::FSName("mntfs".to_string())];
    fuser::mount2(bridge, &args.local, &options)?;

    Ok(())
}
