//! Board rotation engine for the sports matrix.
//!
//! This crate owns the output surface and rotates registered boards onto
//! it, honoring priority pre-emption and orderly shutdown.

mod board;
mod canvas;
mod config;
mod context;
mod error;
mod scheduler;

pub use board::Board;
pub use canvas::{Canvas, Fragment, Matrix, Rect, Rgb, TextWriter};
pub use config::{HardwareConfig, SchedulerConfig};
pub use context::{Cancelled, Context};
pub use error::{BoardError, MatrixError};
pub use scheduler::MatrixScheduler;

/// Result type for engine operations.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Result type for a board render.
pub type BoardResult<T> = Result<T, BoardError>;
