//! Multi-channel volume fields
//!
//! `pacmd` prints a device volume as comma-separated channel groups, each
//! `name: RAW / PCT% / DB dB`. The device is represented by its loudest
//! channel (the global volume).

use crate::domain::device::{DeviceError, Result};
use serde::{Deserialize, Serialize};

/// Volume of one channel as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelVolume {
    pub name: String,
    /// Device-level volume unit
    pub raw: u32,
    /// Percentage as printed, not recomputed
    pub percent: u32,
    /// Gain in dB; `None` when the segment is absent or unreadable
    pub decibels: Option<f64>,
}

impl ChannelVolume {
    pub fn new(name: impl Into<String>, raw: u32, percent: u32) -> Self {
        Self {
            name: name.into(),
            raw,
            percent,
            decibels: None,
        }
    }
}

fn invalid(value: &str) -> DeviceError {
    DeviceError::InvalidField {
        field: "volume".to_string(),
        value: value.to_string(),
    }
}

fn parse_channel(group: &str) -> Option<ChannelVolume> {
    let mut segments = group.split('/').map(str::trim);

    let (name, raw) = segments.next()?.split_once(':')?;
    let raw = raw.trim().parse().ok()?;
    let percent = segments
        .next()?
        .trim_end_matches('%')
        .trim()
        .parse()
        .ok()?;
    let decibels = segments
        .next()
        .and_then(|db| db.strip_suffix("dB"))
        .and_then(|db| db.trim().parse().ok());

    Some(ChannelVolume {
        name: name.trim().to_string(),
        raw,
        percent,
        decibels,
    })
}

/// Parse a `volume:` field into its channels, in source order.
///
/// A field with no channel group at all is invalid: a device always has at
/// least one channel.
pub fn parse_volume(value: &str) -> Result<Vec<ChannelVolume>> {
    let channels = value
        .split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(|group| parse_channel(group).ok_or_else(|| invalid(value)))
        .collect::<Result<Vec<_>>>()?;

    if channels.is_empty() {
        return Err(invalid(value));
    }
    Ok(channels)
}

/// Loudest raw value across channels, `0` when there are none
pub fn global_volume(channels: &[ChannelVolume]) -> u32 {
    channels.iter().map(|channel| channel.raw).max().unwrap_or(0)
}

/// `100 * raw / max_volume`, truncating; `0` when `max_volume` is `0`
pub fn percent_of(raw: u32, max_volume: u32) -> u32 {
    if max_volume == 0 {
        return 0;
    }
    let percent = u64::from(raw) * 100 / u64::from(max_volume);
    u32::try_from(percent).unwrap_or(u32::MAX)
}
