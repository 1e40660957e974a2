//! Non-interactive actions on the default sink

use anyhow::Context;
use std::io::Write;
use std::process::ExitCode;
use volumecontrol_core::domain::device::Result;
use volumecontrol_core::domain::{percent_of, CommandExecutor, DeviceError, Mixer};

const NO_ACTIVE_SINK: &str = "No sink is selected";

/// Actions that run once and exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShot {
    VolumeUp,
    VolumeDown,
    ShowVolume,
    Mute,
}

/// Run `action` against the active sink.
///
/// Returns the percentage to print, if the action has one.
pub fn run<E: CommandExecutor>(mixer: &Mixer<E>, action: OneShot) -> Result<Option<u32>> {
    let sink = mixer.active_sink()?;

    match action {
        OneShot::VolumeUp => {
            let adjustment = mixer.volume_up(sink.id)?;
            Ok(Some(percent_of(adjustment.result, sink.max_volume)))
        }
        OneShot::VolumeDown => {
            let adjustment = mixer.volume_down(sink.id)?;
            Ok(Some(percent_of(adjustment.result, sink.max_volume)))
        }
        OneShot::ShowVolume => Ok(Some(sink.global_percent())),
        OneShot::Mute => {
            mixer.toggle_mute(sink.id)?;
            Ok(None)
        }
    }
}

/// How a one-shot run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    NoActiveSink,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::NoActiveSink => 1,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}

/// Run `action` and report it: the percentage goes to `out`, a missing default
/// sink is a message on `err` and a failing status. Other errors propagate.
pub fn report<E, O, W>(
    mixer: &Mixer<E>,
    action: OneShot,
    out: &mut O,
    err: &mut W,
) -> anyhow::Result<Status>
where
    E: CommandExecutor,
    O: Write,
    W: Write,
{
    match run(mixer, action) {
        Ok(Some(percent)) => writeln!(out, "{percent}")?,
        Ok(None) => {}
        Err(DeviceError::NoActiveSink) => {
            writeln!(err, "{NO_ACTIVE_SINK}")?;
            return Ok(Status::NoActiveSink);
        }
        Err(e) => return Err(e).context("Command failed"),
    }
    Ok(Status::Success)
}
