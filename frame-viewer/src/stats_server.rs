//! HTTP stub that serves the viewer page and synthetic pipeline data.
//!
//! Routes:
//! - `GET /api/frame`: metadata for the latest processed frame
//! - `GET /api/stats`: processing statistics
//! - `GET /health`: liveness probe
//! - everything else: static files (from `--static-dir`, or the embedded page)

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use clap::Args;
use rand::Rng;
use std::net::SocketAddr;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::services::ServeDir;
use tracing::{info, warn};
use viewer_shared::{FrameInfo, HealthInfo, PipelineStats};

use crate::display_loop::Resolution;
use crate::embedded_assets::serve_viewer_frontend;

/// Command-line arguments for the stub server.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value = "3000",
        help = "HTTP server port",
        long_help = "TCP port for the HTTP server. Falls back to the PORT environment \
            variable, then to 3000."
    )]
    pub port: u16,

    #[arg(
        short = 'b',
        long,
        default_value = "0.0.0.0",
        help = "HTTP server bind address",
        long_help = "IP address to bind the HTTP server to. Use '0.0.0.0' to listen on all \
            interfaces, or '127.0.0.1' for localhost-only access."
    )]
    pub bind_address: String,

    #[arg(
        long,
        default_value = "public",
        help = "Directory of static files to serve",
        long_help = "Directory whose files are served for every path outside /api and \
            /health. When the directory does not exist the viewer page compiled into \
            the binary is served instead."
    )]
    pub static_dir: PathBuf,
}

/// Provider of frame metadata and statistics for the JSON routes.
///
/// The stub ships with [`SyntheticPipeline`]; a real pipeline can be plugged
/// in without changing the response shapes.
pub trait PipelineSource: Send + Sync {
    fn latest_frame(&self) -> FrameInfo;
    fn stats(&self) -> PipelineStats;
}

/// Payload reported for every synthetic frame.
pub const PLACEHOLDER_FRAME_DATA: &str = "base64-encoded-frame-data-placeholder";

/// Synthetic frame rate range, frames per second.
pub const SYNTHETIC_FPS: Range<f64> = 10.0..40.0;

/// Synthetic processing time range, milliseconds.
pub const SYNTHETIC_PROCESSING_MS: Range<u32> = 10..60;

/// Random statistics for a fixed-resolution pipeline that does not exist.
#[derive(Debug, Clone)]
pub struct SyntheticPipeline {
    resolution: Resolution,
}

impl SyntheticPipeline {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }
}

impl Default for SyntheticPipeline {
    fn default() -> Self {
        Self::new(Resolution::VGA)
    }
}

impl PipelineSource for SyntheticPipeline {
    fn latest_frame(&self) -> FrameInfo {
        FrameInfo {
            timestamp: Utc::now(),
            frame_data: PLACEHOLDER_FRAME_DATA.to_string(),
            width: self.resolution.width,
            height: self.resolution.height,
        }
    }

    fn stats(&self) -> PipelineStats {
        let mut rng = rand::rng();
        PipelineStats {
            fps: rng.random_range(SYNTHETIC_FPS),
            processing_time: rng.random_range(SYNTHETIC_PROCESSING_MS),
            resolution_label: self.resolution.to_string(),
        }
    }
}

pub struct AppState<P: PipelineSource> {
    pub pipeline: P,
}

async fn frame_endpoint<P: PipelineSource + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<FrameInfo> {
    Json(state.pipeline.latest_frame())
}

async fn stats_endpoint<P: PipelineSource + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<PipelineStats> {
    Json(state.pipeline.stats())
}

async fn health_endpoint() -> Json<HealthInfo> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Json(HealthInfo {
        status: "healthy".to_string(),
        service: "frame-viewer".to_string(),
        timestamp,
    })
}

/// Build the router. Static files come from `static_dir` when it exists,
/// otherwise from the embedded viewer page.
pub fn create_router<P: PipelineSource + 'static>(
    state: Arc<AppState<P>>,
    static_dir: Option<&Path>,
) -> Router {
    let router = Router::new()
        .route("/api/frame", get(frame_endpoint::<P>))
        .route("/api/stats", get(stats_endpoint::<P>))
        .route("/health", get(health_endpoint))
        .with_state(state);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving static files from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            warn!(
                "Static directory {} not found, serving embedded viewer page",
                dir.display()
            );
            router.fallback(serve_viewer_frontend)
        }
        None => router.fallback(serve_viewer_frontend),
    }
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn run_server<P: PipelineSource + 'static>(
    args: &ServerArgs,
    pipeline: P,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let state = Arc::new(AppState { pipeline });
    let app = create_router(state, Some(args.static_dir.as_path()));

    let addr: SocketAddr = format!("{}:{}", args.bind_address, args.port)
        .parse()
        .context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(
        "Frame viewer server is running on http://localhost:{}",
        args.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};
    use std::ffi::OsStr;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        server: ServerArgs,
    }

    #[test]
    fn test_server_args_defaults() {
        let cli = TestCli::try_parse_from(["viewer_server"]).unwrap();
        assert_eq!(cli.server.port, 3000);
        assert_eq!(cli.server.bind_address, "0.0.0.0");
        assert_eq!(cli.server.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_port_flag_overrides_default() {
        let cli = TestCli::try_parse_from(["viewer_server", "-p", "8080"]).unwrap();
        assert_eq!(cli.server.port, 8080);

        let cli = TestCli::try_parse_from(["viewer_server", "--port", "9090"]).unwrap();
        assert_eq!(cli.server.port, 9090);
    }

    #[test]
    fn test_port_reads_port_env_var() {
        let command = TestCli::command();
        let port = command
            .get_arguments()
            .find(|arg| arg.get_id() == "port")
            .unwrap();
        assert_eq!(port.get_env(), Some(OsStr::new("PORT")));
    }

    #[test]
    fn test_synthetic_frame_shape() {
        let frame = SyntheticPipeline::default().latest_frame();
        assert_eq!((frame.width, frame.height), (640, 480));
        assert_eq!(frame.frame_data, PLACEHOLDER_FRAME_DATA);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_synthetic_stats_ranges() {
        let pipeline = SyntheticPipeline::default();
        for _ in 0..1000 {
            let stats = pipeline.stats();
            assert!(SYNTHETIC_FPS.contains(&stats.fps), "fps {}", stats.fps);
            assert!(SYNTHETIC_PROCESSING_MS.contains(&stats.processing_time));
            assert_eq!(stats.resolution_label, "640x480");
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let Json(health) = health_endpoint().await;
        assert_eq!(health.status, "healthy");
        assert!(health.timestamp > 0);
    }
}
