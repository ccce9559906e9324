//! The board capability.

use crate::canvas::Canvas;
use crate::context::Context;
use crate::BoardResult;

/// A unit of display content rotated onto the matrix.
///
/// Boards are owned by the scheduler for the process lifetime and are
/// shared with reconfiguration endpoints, so every method takes `&self`.
pub trait Board: Send + Sync {
    /// Display name used in logs and command routing.
    fn name(&self) -> String;

    /// Draw onto `canvas`, committing frames as needed, until done or
    /// `ctx` is cancelled.
    fn render(&self, ctx: &Context, canvas: &mut Canvas) -> BoardResult<()>;

    /// While true, all boards without priority are skipped.
    fn has_priority(&self) -> bool;

    /// Release per-render state.
    fn cleanup(&self);
}
