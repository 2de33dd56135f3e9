//! ArkStorm Video Builder
//!
//! Assembles downloaded view frames into videos.
//!
//! # Pipeline Architecture
//!
//! ```text
//! assets/<view>/NNN.png ──┐
//!                         ├── Timeline (frame count × 0.04 s × speed)
//! video clips ────────────┘         │
//!                                   ├── Per-clip chain (setpts, drawtext, fit/pad)
//!                                   │
//!                                   ├── Concat + final scale
//!                                   ▼
//!                              ffmpeg (H.264)
//!                                   │
//!                                   ▼
//!                           videos/<filename>.mp4 + chapter times
//! ```

pub mod chapters;
pub mod compositor;
pub mod export;
pub mod timeline;

pub use compositor::{compose, RenderJob};
pub use export::*;
pub use timeline::build_timeline;
