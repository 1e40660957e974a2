//! Sinks and applications projected from parsed `pacmd` dumps
//!
//! Both are snapshots: they are rebuilt from scratch on every query and never
//! updated in place.

use crate::domain::command::ExecutorError;
use crate::domain::parser::{IndexedList, Record};
use crate::domain::volume::{global_volume, parse_volume, percent_of, ChannelVolume};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while building or acting on devices
#[derive(Debug, Error)]
pub enum DeviceError {
    /// A field the model needs was not in the dump
    #[error("Field missing: {field} (item {id})")]
    FieldMissing { id: i64, field: String },

    /// A field was present but could not be interpreted
    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },

    /// No sink is flagged as the default
    #[error("No sink is selected")]
    NoActiveSink,

    #[error("Sink not found: {0}")]
    SinkNotFound(u32),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

pub type Result<T> = std::result::Result<T, DeviceError>;

/// An output device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sink {
    pub id: u32,
    pub name: String,
    pub muted: bool,
    pub channels: Vec<ChannelVolume>,
    /// Reported volume steps minus one
    pub max_volume: u32,
    pub is_active: bool,
}

impl Sink {
    /// Build a sink from one `list-sinks` item
    pub fn from_record(id: i64, record: &Record, is_active: bool) -> Result<Self> {
        let name = lookup(record, id, &["properties", "device.description"])?;
        let muted = lookup(record, id, &["muted"])? == "yes";
        let channels = parse_volume(lookup(record, id, &["volume"])?)?;

        let steps = lookup(record, id, &["volume steps"])?;
        let max_volume = steps
            .parse::<u32>()
            .ok()
            .and_then(|steps| steps.checked_sub(1))
            .ok_or_else(|| DeviceError::InvalidField {
                field: "volume steps".to_string(),
                value: steps.to_string(),
            })?;

        Ok(Self {
            id: item_id(id)?,
            name: name.to_string(),
            muted,
            channels,
            max_volume,
            is_active,
        })
    }

    /// Loudest channel's raw value
    pub fn global_volume(&self) -> u32 {
        global_volume(&self.channels)
    }

    /// Global volume as a percentage of `max_volume`, truncated.
    /// Can exceed 100 when the sink was pushed past its ceiling.
    pub fn global_percent(&self) -> u32 {
        percent_of(self.global_volume(), self.max_volume)
    }
}

/// A playback stream (sink-input) and the sink it is routed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: u32,
    pub name: String,
    /// May be stale by the time it is used
    pub sink_id: u32,
}

impl Application {
    /// Build an application from one `list-sink-inputs` item
    pub fn from_record(id: i64, record: &Record) -> Result<Self> {
        let name = lookup(record, id, &["properties", "application.name"])?;

        // `sink: 0 <alsa_output.pci-0000_00_1f.3.analog-stereo>`
        let sink = lookup(record, id, &["sink"])?;
        let sink_id = sink
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| DeviceError::InvalidField {
                field: "sink".to_string(),
                value: sink.to_string(),
            })?;

        Ok(Self {
            id: item_id(id)?,
            name: name.to_string(),
            sink_id,
        })
    }
}

fn lookup<'a>(record: &'a Record, id: i64, path: &[&str]) -> Result<&'a str> {
    let missing = || DeviceError::FieldMissing {
        id,
        field: path.join("."),
    };

    let (last, parents) = path.split_last().ok_or_else(missing)?;
    let mut current = record;
    for key in parents {
        current = current.record(key).ok_or_else(missing)?;
    }
    current.scalar(last).ok_or_else(missing)
}

fn item_id(id: i64) -> Result<u32> {
    u32::try_from(id).map_err(|_| DeviceError::InvalidField {
        field: "index".to_string(),
        value: id.to_string(),
    })
}

/// Project a parsed `list-sinks` dump into sinks keyed by id
pub fn sinks_from_list(list: &IndexedList) -> Result<BTreeMap<u32, Sink>> {
    if list.is_empty_marker() {
        return Ok(BTreeMap::new());
    }

    let active = list.active_id();
    list.iter()
        .map(|(id, record)| {
            let sink = Sink::from_record(id, record, Some(id) == active)?;
            Ok((sink.id, sink))
        })
        .collect()
}

/// Project a parsed `list-sink-inputs` dump into applications keyed by id
pub fn applications_from_list(list: &IndexedList) -> Result<BTreeMap<u32, Application>> {
    if list.is_empty_marker() {
        return Ok(BTreeMap::new());
    }

    list.iter()
        .map(|(id, record)| {
            let app = Application::from_record(id, record)?;
            Ok((app.id, app))
        })
        .collect()
}
