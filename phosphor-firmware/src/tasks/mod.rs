//! Embassy tasks
//!
//! The refresh consumer runs on the high-priority interrupt executor;
//! drawing runs on the thread executor and can take as long as it likes.

mod demo;
mod refresh;

pub use demo::demo_task;
pub use refresh::{pulse_refresh_task, streaming_refresh_task, PulseRefresher, StreamingRefresher};

/// Samples per frame buffer
pub const FRAME_CAPACITY: usize = 4096;
