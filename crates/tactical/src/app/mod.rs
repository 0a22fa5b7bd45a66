//! Window host: runs a [`Display`](crate::Display) inside a winit event loop
//! and presents its surface through `pixels`.

mod input;
mod loop_runner;
mod metrics;

pub use input::InputCollector;
pub use loop_runner::{run_app, run_app_with_metrics, AppError, TacticalGame, SLOW_FRAME_ENV_VAR};
pub use winit::keyboard::KeyCode;
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
