// THEORY:
// This file is the main entry point for the `chroma_slice` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API exposed to external consumers (the windowing/audio/menu glue
// that owns the actual camera and display).
//
// The crate splits into two halves joined by `FrameReport`:
// - `pipeline`: raw BGR frame in, one smoothed cursor per tracked color out.
// - `game`: cursors in, slicing-game state (targets, particles, score) out.
// The `core_modules` stages underneath are exported for direct use, but the
// two facade types - `TrackingPipeline` and `GameSession` - are the intended
// surface.

pub mod core_modules;
pub mod game;
pub mod pipeline;
pub mod settings;

pub use game::{GameConfig, GameSession};
pub use pipeline::{FrameReport, PipelineConfig, TrackingPipeline};
pub use settings::Settings;
