//! rift-ctl - command-line front end for the imposter Admin API
//!
//! # Usage
//!
//! ```bash
//! # List imposters on localhost:2525
//! rift-ctl list
//!
//! # Create an imposter from a JSON file on another server
//! rift-ctl --admin-url http://server:2525 create imposter.json
//!
//! # Fetch the last log entries
//! rift-ctl logs --start 10
//! ```

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rift_client::{codec, Client, ClientConfig, Context, Imposter};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rift-ctl")]
#[command(author, version, about = "Manage imposters through the Admin API")]
struct Args {
    /// Admin API URL
    #[arg(
        short,
        long,
        default_value = "http://localhost:2525",
        env = "RIFT_ADMIN_URL"
    )]
    admin_url: String,

    /// Give up on a call after this many seconds
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Ask for the replayable projection (no recorded requests)
    #[arg(short, long)]
    replayable: bool,

    /// Log requests to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all imposters
    List,
    /// Show one imposter
    Get { port: u16 },
    /// Create an imposter from a JSON document
    Create { file: PathBuf },
    /// Delete one imposter
    Delete { port: u16 },
    /// Delete every imposter
    DeleteAll,
    /// Clear the recorded requests of an imposter
    ClearRequests { port: u16 },
    /// Show the server configuration
    Config,
    /// Show the server log buffer
    Logs {
        #[arg(long)]
        start: Option<usize>,
        #[arg(long)]
        end: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let base_url = ClientConfig::parse_url(&args.admin_url)
        .with_context(|| format!("invalid admin URL '{}'", args.admin_url))?;
    let client = Client::new(ClientConfig::default().with_base_url(base_url))?;

    let mut ctx = Context::background();
    if let Some(secs) = args.timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    debug!("running {:?} against {}", args.command, client.base_url());
    run(&client, &ctx, args.command, args.replayable).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(client: &Client, ctx: &Context, command: Command, replayable: bool) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let imposters = client.imposters(ctx, replayable).await?;
            let list = imposters.iter().map(imposter_json).collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&list)
        }
        Command::Get { port } => {
            let imposter = client
                .imposter(ctx, port, replayable)
                .await
                .with_context(|| format!("failed to fetch imposter on port {}", port))?;
            print_json(&imposter_json(&imposter)?)
        }
        Command::Create { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let imposter = codec::decode_imposter(&bytes)
                .with_context(|| format!("{} is not a valid imposter", file.display()))?;
            let created = client.create(ctx, &imposter).await?;
            print_json(&imposter_json(&created)?)
        }
        Command::Delete { port } => match client.delete(ctx, port, replayable).await? {
            Some(imposter) => print_json(&imposter_json(&imposter)?),
            None => anyhow::bail!("no imposter on port {}", port),
        },
        Command::DeleteAll => {
            let removed = client.delete_all(ctx, replayable).await?;
            let list = removed.iter().map(imposter_json).collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&list)
        }
        Command::ClearRequests { port } => match client.delete_requests(ctx, port).await? {
            Some(imposter) => print_json(&imposter_json(&imposter)?),
            None => anyhow::bail!("no imposter on port {}", port),
        },
        Command::Config => print_json(&client.config(ctx).await?),
        Command::Logs { start, end } => print_json(&client.logs(ctx, start, end).await?),
    }
}

/// The wire form of an imposter plus the server-owned fields it leaves out.
fn imposter_json(imposter: &Imposter) -> anyhow::Result<Value> {
    let mut value = serde_json::to_value(imposter)?;
    if let Value::Object(map) = &mut value {
        map.insert("numberOfRequests".into(), imposter.request_count.into());
        if !imposter.requests.is_empty() {
            map.insert("requests".into(), serde_json::to_value(&imposter.requests)?);
        }
    }
    Ok(value)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
