//! Process-backed implementations of the core's executor seam

pub mod pacmd;

pub use pacmd::PacmdExecutor;
