//! Draw batching module
//!
//! Pass dispatch table, draw sink and material-override collaborators,
//! and the batcher that walks the grid buckets.

mod pass_table;
mod draw_sink;
mod material_override;
mod batcher;

#[cfg(test)]
pub mod mock_draw_sink;

pub use pass_table::{disposition, Disposition, EmitPass};
pub use draw_sink::FeatureDrawSink;
pub use material_override::{MaterialOverride, NoMaterialOverride};
pub use batcher::{DrawBatcher, EmitContext, PassStats};
