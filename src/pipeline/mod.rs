//! Conversion pipeline: orchestration, bounded pool and per-file worker

pub mod cancel;
pub mod orchestrator;
pub mod pool;
pub mod worker;

pub use cancel::CancelFlag;
pub use orchestrator::{run, run_with_cancel};
pub use pool::WorkerPool;
