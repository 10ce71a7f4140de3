// src/lib.rs

#![cfg_attr(not(test), no_std)] // Tests run on the host with std

pub mod common;
pub mod config;
pub mod device;
pub mod driver;

// Re-export key types for convenience
pub use common::{
    BaudRate, GateSelect, GateValues, Ld2410Error, Ld2410Serial, Ld2410Timer, Millis, Resolution,
    SensorFrame, TargetStatus,
};
pub use config::DriverConfig;
pub use driver::Ld2410;
