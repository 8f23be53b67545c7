//! Rendering surfaces: the slots charts are drawn on, one per chart identifier.
//!
//! A slot is mounted empty, receives at most one live chart, and is
//! destroyed as a whole. Drawing onto an occupied slot retires the old chart
//! before the new one is bound.

use crate::charts::ChartSpec;
use crate::error::Result;

mod json_dir;
mod memory;

pub use json_dir::JsonDirSurface;
pub use memory::{MemorySurface, Slot};

pub trait RenderSurface: Send + Sync {
    /// Mount an empty slot for `id`, replacing any existing one.
    fn mount(&self, id: &str) -> Result<()>;

    /// Draw `spec` on the slot mounted for `id`.
    fn create(&self, id: &str, spec: ChartSpec) -> Result<()>;

    /// Remove the slot for `id` and whatever is drawn on it. Idempotent.
    fn destroy(&self, id: &str) -> Result<()>;
}
