//! `pacmd` control shell backend
//!
//! PulseAudio's `pacmd` accepts one command per invocation as its arguments
//! and prints the result on standard output.

pub mod executor;

pub use executor::*;
