//! Step-based volume arithmetic
//!
//! Volume moves in a fixed number of steps across the device's raw range,
//! whatever that range is. Adjustments start from the global (loudest channel)
//! volume and are floored at zero. There is no ceiling: repeated "up" can push
//! a sink past its reported maximum, as the server itself allows.

use crate::domain::volume::{global_volume, ChannelVolume};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Number of up/down presses spanning a device's full range
pub const DEFAULT_VOLUME_STEPS: NonZeroU32 = match NonZeroU32::new(100) {
    Some(steps) => steps,
    None => unreachable!(),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Outcome of one adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeAdjustment {
    pub direction: Direction,
    /// Global volume before the adjustment
    pub current: u32,
    pub step: u32,
    /// New raw volume, floored at zero
    pub result: u32,
}

pub fn step_size(max_volume: u32, steps: NonZeroU32) -> u32 {
    max_volume / steps
}

pub fn adjust(
    direction: Direction,
    channels: &[ChannelVolume],
    max_volume: u32,
    steps: NonZeroU32,
) -> VolumeAdjustment {
    let current = global_volume(channels);
    let step = step_size(max_volume, steps);
    let result = match direction {
        Direction::Up => current.saturating_add(step),
        Direction::Down => current.saturating_sub(step),
    };

    VolumeAdjustment {
        direction,
        current,
        step,
        result,
    }
}
