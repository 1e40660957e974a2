//! Core of volumecontrol: parsing `pacmd` dumps into sinks and applications,
//! and the volume arithmetic built on top of them.

pub mod domain;
