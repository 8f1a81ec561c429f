/*!
# Feature Drawer

Visibility culling and draw batching for static scene features.

The crate decides, each frame, which features are drawn in which pass and
submits them grouped so that every texture is bound once per grid cell.
Rendering itself goes through a backend-supplied `FeatureDrawSink`.

## Architecture

- **SpatialGrid**: Quad partition of the map, features binned by model type and texture
- **VisibilityClassifier**: Per-pass draw categories for the features of visible cells
- **FadeCalculator**: Distance-based opacity for fading features
- **DrawBatcher**: Opaque, alpha and shadow submission through a `FeatureDrawSink`
- **LifecycleManager**: Keeps grid membership in step with the feature registry
- **FeatureDrawer**: Per-frame entry points tying the above together
*/

// Internal modules
mod error;
mod config;
mod drawer;
pub mod log;
pub mod camera;
pub mod feature;
pub mod grid;
pub mod visibility;
pub mod batch;
pub mod lifecycle;

// Main fdraw namespace module
pub mod fdraw {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{FeatureDrawerConfig, DRAW_QUAD_SQUARES, SQUARE_SIZE};

    // Frame entry points
    pub use crate::drawer::{DrawContext, FeatureDrawer, WaterPass};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod feature {
        pub use crate::feature::*;
    }

    pub mod grid {
        pub use crate::grid::*;
    }

    pub mod visibility {
        pub use crate::visibility::*;
    }

    pub mod batch {
        pub use crate::batch::*;
    }

    pub mod lifecycle {
        pub use crate::lifecycle::*;
    }
}

// Re-export math library at crate root
pub use glam;
