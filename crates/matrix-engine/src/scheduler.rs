//! Board rotation loop.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument};

use crate::board::Board;
use crate::canvas::{Canvas, Matrix};
use crate::context::Context;
use crate::error::MatrixError;
use crate::MatrixResult;

/// Rotates registered boards onto a shared display.
pub struct MatrixScheduler {
    boards: Vec<Arc<dyn Board>>,
    canvas: Mutex<Canvas>,
    min_pass_duration: Duration,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

impl MatrixScheduler {
    /// Create a scheduler that owns `matrix` and rotates `boards` in order.
    pub fn new(matrix: Box<dyn Matrix>, boards: Vec<Arc<dyn Board>>) -> MatrixResult<Self> {
        let canvas = Canvas::new(matrix)?;
        let bounds = canvas.bounds();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);

        info!(
            width = bounds.width(),
            height = bounds.height(),
            boards = boards.len(),
            "Matrix initialized"
        );

        Ok(Self {
            boards,
            canvas: Mutex::new(canvas),
            min_pass_duration: Duration::ZERO,
            done_tx,
            done_rx,
        })
    }

    /// Set the shortest time a full rotation may take.
    pub fn with_min_pass_duration(mut self, duration: Duration) -> Self {
        self.min_pass_duration = duration;
        self
    }

    /// Receiver signalled once shutdown cleanup has completed.
    pub fn done(&self) -> Receiver<()> {
        self.done_rx.clone()
    }

    /// Rotate boards until `ctx` is cancelled.
    #[instrument(name = "matrix_serve", skip_all)]
    pub fn serve(&self, ctx: &Context) -> MatrixResult<()> {
        if self.boards.is_empty() {
            return Err(MatrixError::NoBoards);
        }

        info!("Serving boards");

        loop {
            if ctx.is_cancelled() {
                info!("Got context cancel, cleaning up boards");
                self.cleanup_all();
                let _ = self.done_tx.try_send(());
                return Ok(());
            }

            let pass_start = Instant::now();

            match self.priority_board() {
                Some(board) => {
                    info!(board = %board.name(), "Rendering board as priority");
                    self.render_board(ctx, board.as_ref());
                }
                None => {
                    for board in &self.boards {
                        if ctx.is_cancelled() {
                            break;
                        }
                        debug!(board = %board.name(), "Rendering board");
                        self.render_board(ctx, board.as_ref());
                        board.cleanup();
                    }
                }
            }

            let elapsed = pass_start.elapsed();
            if elapsed < self.min_pass_duration {
                let _ = ctx.sleep(self.min_pass_duration - elapsed);
            }
        }
    }

    /// First board in registration order currently asserting priority.
    fn priority_board(&self) -> Option<&Arc<dyn Board>> {
        self.boards.iter().find(|b| b.has_priority())
    }

    fn render_board(&self, ctx: &Context, board: &dyn Board) {
        let mut canvas = self.canvas.lock();

        match board.render(ctx, &mut canvas) {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {
                debug!(board = %board.name(), "Render cancelled");
            }
            Err(e) => {
                error!(board = %board.name(), "Render failed: {:#}", e);
            }
        }

        if let Err(e) = canvas.commit() {
            error!(board = %board.name(), "Failed to commit frame: {}", e);
        }
    }

    /// Run every board's cleanup concurrently and wait for all of them.
    fn cleanup_all(&self) {
        thread::scope(|s| {
            for board in &self.boards {
                s.spawn(move || board.cleanup());
            }
        });
        debug!("All boards cleaned up");
    }

    /// Wait for shutdown cleanup (when rotating more than one board), then
    /// release the display.
    pub fn close(&self) {
        if self.boards.len() > 1 {
            info!("Waiting for boards to clean up");
            let _ = self.done_rx.recv();
        }

        info!("Closing matrix");
        if let Err(e) = self.canvas.lock().close() {
            error!("Failed to close matrix: {}", e);
        }
    }
}
