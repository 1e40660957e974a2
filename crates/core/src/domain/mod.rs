//! Domain entities and business rules

pub mod command;
pub mod config;
pub mod controller;
pub mod device;
pub mod mixer;
pub mod parser;
pub mod volume;

pub use command::{CommandExecutor, ExecutorError, PacmdCommand};
pub use config::{
    ConfigError, ConfigManager, ExecutorConfig, MenuConfig, VolumeConfig, VolumeControlConfig,
};
pub use controller::{adjust, step_size, Direction, VolumeAdjustment, DEFAULT_VOLUME_STEPS};
pub use device::{Application, DeviceError, Sink};
pub use mixer::Mixer;
pub use parser::{parse, IndexedList, ParsedNode, Record};
pub use volume::{global_volume, parse_volume, percent_of, ChannelVolume};
