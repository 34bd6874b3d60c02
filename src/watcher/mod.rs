//! The monitoring core: parse → pool/window → cooldown → dispatch,
//! driven by a crash-supervised file tailer.

pub mod cooldown;
pub mod parser;
pub mod pipeline;
pub mod pool;
pub mod tailer;
pub mod window;

pub use cooldown::CooldownGate;
pub use parser::{LineParser, RequestRecord};
pub use pipeline::{Monitor, MonitorConfig};
pub use pool::{PoolChange, PoolTracker};
pub use tailer::{LogTailer, TailerConfig};
pub use window::{SlidingWindow, MIN_SAMPLE_SIZE};
