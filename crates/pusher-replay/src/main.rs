//! pusher-replay: run a recorded Pusher frame log through a presence channel.
//!
//! Each line of the frames file is one inbound envelope. Membership events
//! are logged as they are dispatched and the final membership is printed.

mod replay;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pusher_channel::{Channel, ChannelKind, TokioEventQueue};
use pusher_common::PusherConfig;

use crate::replay::{replay_frames, LoggingListener};

#[derive(Parser)]
#[command(name = "pusher-replay", about = "Replay recorded Pusher frames through a presence channel")]
struct Args {
    /// Channel to replay into.
    #[arg(short, long, default_value = "presence-replay")]
    channel: String,

    /// Authorizer response (JSON) used to build the subscribe message.
    #[arg(long)]
    auth: Option<PathBuf>,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames file, one envelope per line.
    frames: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match PusherConfig::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("pusher-replay: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => PusherConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .init();

    // The loader's own log line fires before the subscriber exists.
    if let Some(path) = &args.config {
        tracing::info!(path = %path.display(), filter = %config.log.filter, "Loaded config");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Replay failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> pusher_common::Result<()> {
    let (queue, worker) = TokioEventQueue::spawn();
    let channel = Channel::new(ChannelKind::for_name(&args.channel), args.channel, Arc::new(queue))?;
    channel.bind("*", Arc::new(LoggingListener))?;

    let auth = args.auth.as_deref().map(std::fs::read_to_string).transpose()?;
    if auth.is_some() || channel.kind() == ChannelKind::Public {
        let message = channel.subscribe_message(auth.as_deref())?;
        println!("{message}");
    }

    let frames = std::fs::read_to_string(&args.frames)?;
    let stats = replay_frames(&channel, &frames);
    tracing::info!(applied = stats.applied, dropped = stats.dropped, "Replay finished");

    for member in channel.members() {
        println!("{member}");
    }
    if let Some(me) = channel.me() {
        println!("me: {me}");
    }

    // Dropping the channel releases the last queue handle; wait for listeners to drain.
    drop(channel);
    if let Err(e) = worker.await {
        tracing::warn!(error = %e, "Event queue worker ended abnormally");
    }
    Ok(())
}
