//! Built-in processors, one per feature domain

mod logs;
mod rum;
mod sdk;

pub use logs::LogsProcessor;
pub use rum::{ActiveView, PendingResource, RumProcessor, RumSession};
pub use sdk::SdkProcessor;
