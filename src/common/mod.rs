// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, CommandBuffer, GateSelect};

// From error.rs
pub use error::Ld2410Error;

// From frame.rs
pub use frame::{FrameFamily, HeadWindow, RawFrame};

// From hal_traits.rs
pub use hal_traits::{Ld2410Instant, Ld2410Serial, Ld2410Timer, Millis};

// From response/mod.rs
pub use response::{parse_ack, parse_data, Ack, AckFrame, ResponseParseError, SensorFrame};

// From types.rs
pub use types::{
    AutoStatus, AuxConfig, BaudRate, FirmwareVersion, GateParameters, GateValues, LightControl,
    MacAddress, OutputControl, Resolution, StreamFormat, TargetStatus,
};

// Native HAL integration (from hal_traits.rs)
#[cfg(feature = "impl-native")]
pub use hal_traits::HalInterface;
