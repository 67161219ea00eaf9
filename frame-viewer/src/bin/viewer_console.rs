use anyhow::Context;
use clap::Parser;
use frame_viewer::display_loop::{ConsoleSurface, DisplayLoop, LoopConfig};
use frame_viewer::stats_server::shutdown_signal;
use std::time::Duration;
use tracing::{info, warn};
use viewer_shared::viewer_client::ViewerClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Console preview of the frame display loop")]
struct Args {
    #[arg(
        long,
        default_value = "100",
        help = "Milliseconds between ticks",
        long_help = "Nominal delay between display ticks in milliseconds. Actual spacing \
            is this delay plus the time spent in each tick. Default: 100 (~10 FPS)."
    )]
    interval_ms: u64,

    #[arg(
        long,
        help = "Stop after this many seconds",
        long_help = "Run the loop for a fixed number of seconds and exit. Without this \
            option the loop runs until Ctrl+C."
    )]
    duration: Option<u64>,

    #[arg(
        long,
        help = "Stub server to connect to before streaming (e.g. http://localhost:3000)"
    )]
    server: Option<String>,

    #[arg(long, default_value = "10", help = "Log statistics every N frames")]
    report_every: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frame_viewer::logging::init_tracing();

    let args = Args::parse();
    anyhow::ensure!(args.interval_ms > 0, "--interval-ms must be positive");

    let config = LoopConfig {
        tick_interval: Duration::from_millis(args.interval_ms),
        ..LoopConfig::default()
    };
    let viewer = DisplayLoop::new(ConsoleSurface::new(args.report_every), config);

    let client = args.server.as_deref().map(ViewerClient::new);
    if let Some(client) = &client {
        viewer
            .connect(client)
            .await
            .with_context(|| format!("Could not reach {}", client.base_url()))?;
    }

    viewer.start();

    match args.duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = shutdown_signal() => {}
            }
        }
        None => shutdown_signal().await,
    }

    viewer.stop();
    let snapshot = viewer.snapshot();
    info!(
        "Displayed {} frames, final FPS {}",
        snapshot.stream.frame_count,
        snapshot.stats.fps_label()
    );

    if client.is_some() {
        viewer.disconnect().await;
    }
    viewer.dispose().await;

    if snapshot.stream.frame_count == 0 {
        warn!("No frames were displayed");
    }
    Ok(())
}
