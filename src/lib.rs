pub mod config;
pub mod dataset;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
