/// Which draw categories each emit pass consumes.
///
/// One table replaces per-pass switch statements: a pass looks up the
/// feature's category and either draws it, hands it to the impostor
/// queue or skips it.

use crate::feature::DrawCategory;

/// Batched draw pass over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitPass {
    Opaque,
    Alpha,
    Shadow,
}

impl EmitPass {
    pub const COUNT: usize = 3;

    pub const fn index(self) -> usize {
        match self {
            EmitPass::Opaque => 0,
            EmitPass::Alpha => 1,
            EmitPass::Shadow => 2,
        }
    }
}

/// What a pass does with a feature of a given category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Draw,
    QueueImpostor,
    Skip,
}

use Disposition::{Draw, QueueImpostor, Skip};

/// Rows: `EmitPass::index()`. Columns: `DrawCategory::index()`
/// (None, Opaque, AlphaFade, Shadow, Impostor).
const PASS_TABLE: [[Disposition; DrawCategory::COUNT]; EmitPass::COUNT] = [
    [Skip, Draw, Skip, Draw, QueueImpostor],
    [Skip, Skip, Draw, Skip, Skip],
    [Skip, Draw, Skip, Draw, Skip],
];

/// Look up the disposition of `category` in `pass`.
pub const fn disposition(pass: EmitPass, category: DrawCategory) -> Disposition {
    PASS_TABLE[pass.index()][category.index()]
}

#[cfg(test)]
#[path = "pass_table_tests.rs"]
mod tests;
