pub mod metrics;
pub mod pipeline;
