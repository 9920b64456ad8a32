//! Alt-text generation pipeline.
//!
//! - **stage**: The states a single run moves through
//! - **processor**: Orchestrates acquire → encode → request → aggregate

pub mod processor;
pub mod stage;

pub use processor::AltTextPipeline;
pub use stage::Stage;
