//! Mixer operations over a command executor
//!
//! Every call is a blocking round-trip: queries re-run `list-*` and rebuild
//! the device snapshots, mutations issue a single command. Read-modify-write
//! operations (mute toggle, volume steps) are last-writer-wins; another client
//! may change the sink between the read and the write.

use crate::domain::command::{CommandExecutor, PacmdCommand};
use crate::domain::controller::{adjust, Direction, VolumeAdjustment, DEFAULT_VOLUME_STEPS};
use crate::domain::device::{
    applications_from_list, sinks_from_list, Application, DeviceError, Result, Sink,
};
use crate::domain::parser::parse;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use tracing::{debug, instrument};

/// Sink and application control backed by an executor
#[derive(Debug)]
pub struct Mixer<E> {
    executor: E,
    volume_steps: NonZeroU32,
}

impl<E: CommandExecutor> Mixer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            volume_steps: DEFAULT_VOLUME_STEPS,
        }
    }

    /// Number of up/down steps spanning a sink's range
    pub fn with_volume_steps(mut self, steps: NonZeroU32) -> Self {
        self.volume_steps = steps;
        self
    }

    pub fn volume_steps(&self) -> NonZeroU32 {
        self.volume_steps
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn run(&self, command: PacmdCommand) -> Result<String> {
        debug!(%command, mutation = command.is_mutation(), "Running pacmd command");
        Ok(self.executor.run(&command.to_string())?)
    }

    #[instrument(skip(self))]
    pub fn list_sinks(&self) -> Result<BTreeMap<u32, Sink>> {
        let output = self.run(PacmdCommand::ListSinks)?;
        sinks_from_list(&parse(&output))
    }

    #[instrument(skip(self))]
    pub fn list_applications(&self) -> Result<BTreeMap<u32, Application>> {
        let output = self.run(PacmdCommand::ListSinkInputs)?;
        applications_from_list(&parse(&output))
    }

    /// Fresh snapshot of one sink
    pub fn sink(&self, id: u32) -> Result<Sink> {
        self.list_sinks()?
            .remove(&id)
            .ok_or(DeviceError::SinkNotFound(id))
    }

    /// Fresh snapshot of the default sink
    pub fn active_sink(&self) -> Result<Sink> {
        self.list_sinks()?
            .into_values()
            .find(|sink| sink.is_active)
            .ok_or(DeviceError::NoActiveSink)
    }

    #[instrument(skip(self))]
    pub fn set_default_sink(&self, id: u32) -> Result<()> {
        self.run(PacmdCommand::SetDefaultSink { sink: id })?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_sink_volume(&self, id: u32, volume: u32) -> Result<()> {
        self.run(PacmdCommand::SetSinkVolume { sink: id, volume })?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_application_sink(&self, app: u32, sink: u32) -> Result<()> {
        self.run(PacmdCommand::MoveSinkInput { input: app, sink })?;
        Ok(())
    }

    /// Flip the mute flag of a sink, returning the new state
    #[instrument(skip(self))]
    pub fn toggle_mute(&self, id: u32) -> Result<bool> {
        let muted = !self.sink(id)?.muted;
        self.run(PacmdCommand::SetSinkMute { sink: id, muted })?;
        Ok(muted)
    }

    pub fn volume_up(&self, id: u32) -> Result<VolumeAdjustment> {
        self.change_volume(id, Direction::Up)
    }

    pub fn volume_down(&self, id: u32) -> Result<VolumeAdjustment> {
        self.change_volume(id, Direction::Down)
    }

    #[instrument(skip(self))]
    fn change_volume(&self, id: u32, direction: Direction) -> Result<VolumeAdjustment> {
        let sink = self.sink(id)?;
        let adjustment = adjust(direction, &sink.channels, sink.max_volume, self.volume_steps);
        self.set_sink_volume(id, adjustment.result)?;
        debug!(
            sink = id,
            from = adjustment.current,
            to = adjustment.result,
            "Volume changed"
        );
        Ok(adjustment)
    }
}
