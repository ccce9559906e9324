//! Sports matrix service.
//!
//! Wires the configured league boards onto a simulated display, serves
//! status commands over stdin/stdout and shuts down on Ctrl-C or a
//! `Shutdown` command.

mod commands;
mod config;
mod display;
mod fixture;
mod transport;

use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, bail, Context as _};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matrix_engine::{Board, Context, Matrix, MatrixScheduler, Rect, TextWriter};
use matrix_ipc::{command_channel, event_channel};
use sportboard::{Api as _, SportBoard, SportConfig, StatusServer};

pub use commands::CommandRouter;
pub use config::{AppConfig, LeagueConfig, DEFAULT_CONFIG_PATH};
pub use display::{BlockTextWriter, SimulatedMatrix};
pub use fixture::{FixtureApi, FixtureData};

/// Initialize logging.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sportsmatrix=info,matrix_engine=info,sportboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Cancel `root` on Ctrl-C.
fn spawn_signal_handler(root: Context) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || match runtime.block_on(tokio::signal::ctrl_c()) {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                root.cancel();
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        })
        .context("failed to start signal thread")?;
    Ok(())
}

/// Build one board per configured league.
fn build_boards(
    config: &AppConfig,
    root: &Context,
    bounds: Rect,
) -> anyhow::Result<(Vec<Arc<dyn Board>>, Vec<StatusServer>)> {
    let text: Arc<dyn TextWriter> = Arc::new(BlockTextWriter);
    let mut boards: Vec<Arc<dyn Board>> = Vec::new();
    let mut servers = Vec::new();

    for sport in &config.sports {
        let api = FixtureApi::load(&sport.fixture)
            .with_context(|| format!("failed to load {} fixture", sport.league))?;
        if !api.league().eq_ignore_ascii_case(&sport.league) {
            bail!(
                "fixture {} is for {}, not {}",
                sport.fixture.display(),
                api.league(),
                sport.league
            );
        }

        let board = SportBoard::new(
            root,
            Arc::new(api),
            text.clone(),
            bounds,
            Arc::new(SportConfig::from(sport.board.clone())),
        )
        .with_context(|| format!("failed to create {} board", sport.league))?;

        let board = Arc::new(board);
        servers.push(StatusServer::new(board.clone()));
        boards.push(board);
    }

    Ok((boards, servers))
}

/// Run the service until shutdown.
pub fn run(config_path: &Path) -> anyhow::Result<()> {
    init_logging();
    info!(config = %config_path.display(), "Sports matrix starting");

    let config = AppConfig::load(config_path)?;
    let root = Context::new();

    let matrix = SimulatedMatrix::new(&config.matrix.hardware);
    let (width, height) = matrix.geometry();
    let (boards, servers) = build_boards(&config, &root, Rect::sized(width, height))?;

    let scheduler = Arc::new(
        MatrixScheduler::new(Box::new(matrix), boards)?
            .with_min_pass_duration(config.matrix.min_pass_duration),
    );

    let (command_tx, command_rx) = command_channel();
    let (event_tx, event_rx) = event_channel();
    transport::spawn_event_writer(event_rx).context("failed to start event writer")?;
    transport::spawn_stdin_reader(command_tx, event_tx.clone())
        .context("failed to start command reader")?;

    let router = CommandRouter::new(command_rx, event_tx, servers, root.clone());
    let router_thread = thread::Builder::new()
        .name("router".to_string())
        .spawn(move || router.run())
        .context("failed to start router")?;

    spawn_signal_handler(root.clone())?;

    let serve_thread = {
        let scheduler = scheduler.clone();
        let ctx = root.clone();
        thread::Builder::new()
            .name("matrix".to_string())
            .spawn(move || scheduler.serve(&ctx))
            .context("failed to start matrix thread")?
    };

    let served = serve_thread
        .join()
        .map_err(|_| anyhow!("matrix thread panicked"))?;

    root.cancel();
    scheduler.close();
    if router_thread.join().is_err() {
        error!("Router thread panicked");
    }

    served?;
    info!("Sports matrix stopped");
    Ok(())
}
