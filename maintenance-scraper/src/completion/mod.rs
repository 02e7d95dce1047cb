mod client;
mod observer;
mod retry;
mod wire;

pub use client::CompletionClient;
pub use observer::{RetryObserver, TracingObserver};
pub use retry::{run_with_retry, RetryPolicy};
