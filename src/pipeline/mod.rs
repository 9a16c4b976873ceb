//! Render entry point and the worker pool that runs independent renders side by side.

pub mod pool;
pub mod render;
