// src/common/types.rs

use core::fmt::{self, Write};

use super::constants::{GATE_COUNT, MAX_GATE};

// --- Per-gate Values ---

/// Per-gate byte values (thresholds or signal strengths), gates `0..len`.
///
/// The device describes these sets by their highest gate index `N`, so a
/// non-empty set always holds `N + 1` values. Values past `len` are not part of
/// the set and are never exposed.
#[derive(Debug, Copy, Clone, Default)]
pub struct GateValues {
    values: [u8; GATE_COUNT],
    len: u8,
}

impl GateValues {
    /// An empty set (basic telemetry carries no per-gate values).
    pub const fn new() -> Self {
        GateValues {
            values: [0; GATE_COUNT],
            len: 0,
        }
    }

    /// Copies up to nine values; returns `None` if `values` is longer.
    pub fn from_slice(values: &[u8]) -> Option<Self> {
        if values.len() > GATE_COUNT {
            return None;
        }
        let mut set = Self::new();
        set.values[..values.len()].copy_from_slice(values);
        set.len = values.len() as u8;
        Some(set)
    }

    /// Builds the set for gates `0..=highest_gate` from `source`, clamping the
    /// gate index to 8. Returns `None` if `source` is too short.
    pub fn with_highest_gate(highest_gate: u8, source: &[u8]) -> Option<Self> {
        let count = usize::from(highest_gate.min(MAX_GATE)) + 1;
        Self::from_slice(source.get(..count)?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest gate index held, or 0 for an empty set.
    #[inline]
    pub fn highest_gate(&self) -> u8 {
        self.len.saturating_sub(1)
    }

    pub fn get(&self, gate: usize) -> Option<u8> {
        self.as_slice().get(gate).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values[..self.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_slice().iter().copied()
    }
}

impl PartialEq for GateValues {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for GateValues {}

/// Gate configuration as reported by the read-parameters reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GateParameters {
    /// Farthest gate the device supports (usually 8).
    pub max_gate: u8,
    /// Moving-target thresholds; `highest_gate()` is the max moving gate.
    pub moving_thresholds: GateValues,
    /// Stationary-target thresholds; `highest_gate()` is the max stationary gate.
    pub stationary_thresholds: GateValues,
    /// Seconds without detection before the device reports absence.
    pub no_one_window: u16,
}

// --- Telemetry ---

/// Which telemetry layout the device is streaming.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StreamFormat {
    /// Summary distances and signals only.
    #[default]
    Basic,
    /// Adds per-gate signals, light level and output level.
    Enhanced,
}

/// Decoded target status byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum TargetStatus {
    NoTarget = 0,
    Moving = 1,
    Stationary = 2,
    Both = 3,
    AutoThresholdsInProgress = 4,
    AutoThresholdsSuccessful = 5,
    AutoThresholdsFailed = 6,
}

impl TargetStatus {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::NoTarget),
            1 => Some(Self::Moving),
            2 => Some(Self::Stationary),
            3 => Some(Self::Both),
            4 => Some(Self::AutoThresholdsInProgress),
            5 => Some(Self::AutoThresholdsSuccessful),
            6 => Some(Self::AutoThresholdsFailed),
            _ => None,
        }
    }

    pub const fn has_moving(self) -> bool {
        matches!(self, Self::Moving | Self::Both)
    }

    pub const fn has_stationary(self) -> bool {
        matches!(self, Self::Stationary | Self::Both)
    }

    /// True for the four presence states, false while auto-thresholds report.
    pub const fn has_target(self) -> bool {
        self.has_moving() || self.has_stationary()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTarget => "No target",
            Self::Moving => "Moving only",
            Self::Stationary => "Stationary only",
            Self::Both => "Both moving and stationary",
            Self::AutoThresholdsInProgress => "Auto thresholds in progress",
            Self::AutoThresholdsSuccessful => "Auto thresholds successful",
            Self::AutoThresholdsFailed => "Auto thresholds failed",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Device Settings ---

/// Gate width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 20 cm per gate.
    Fine,
    /// 75 cm per gate (factory default).
    Coarse,
}

impl Resolution {
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::Coarse),
            1 => Some(Self::Fine),
            _ => None,
        }
    }

    pub const fn raw(self) -> u16 {
        match self {
            Self::Coarse => 0,
            Self::Fine => 1,
        }
    }

    pub const fn gate_width_cm(self) -> u16 {
        match self {
            Self::Fine => 20,
            Self::Coarse => 75,
        }
    }
}

/// Serial baud rates, by the index the device expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum BaudRate {
    B9600 = 1,
    B19200 = 2,
    B38400 = 3,
    B57600 = 4,
    B115200 = 5,
    B230400 = 6,
    B256000 = 7,
    B460800 = 8,
}

impl BaudRate {
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::B9600),
            2 => Some(Self::B19200),
            3 => Some(Self::B38400),
            4 => Some(Self::B57600),
            5 => Some(Self::B115200),
            6 => Some(Self::B230400),
            7 => Some(Self::B256000),
            8 => Some(Self::B460800),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn bits_per_second(self) -> u32 {
        match self {
            Self::B9600 => 9_600,
            Self::B19200 => 19_200,
            Self::B38400 => 38_400,
            Self::B57600 => 57_600,
            Self::B115200 => 115_200,
            Self::B230400 => 230_400,
            Self::B256000 => 256_000,
            Self::B460800 => 460_800,
        }
    }
}

impl Default for BaudRate {
    /// The factory rate.
    fn default() -> Self {
        Self::B256000
    }
}

/// Auxiliary light-sensor gating of the OUT pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum LightControl {
    NoLightControl = 0,
    LightBelowThreshold = 1,
    LightAboveThreshold = 2,
}

impl LightControl {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::NoLightControl),
            1 => Some(Self::LightBelowThreshold),
            2 => Some(Self::LightAboveThreshold),
            _ => None,
        }
    }
}

/// Idle level of the OUT pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputControl {
    DefaultLow = 0,
    DefaultHigh = 1,
}

impl OutputControl {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::DefaultLow),
            1 => Some(Self::DefaultHigh),
            _ => None,
        }
    }
}

/// Auxiliary I/O configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuxConfig {
    pub light_control: LightControl,
    pub light_threshold: u8,
    pub output_control: OutputControl,
}

/// State of the automatic threshold routine (firmware >= 2.44).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutoStatus {
    NotInProgress,
    InProgress,
    Completed,
}

impl AutoStatus {
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::NotInProgress),
            1 => Some(Self::InProgress),
            2 => Some(Self::Completed),
            _ => None,
        }
    }
}

// --- Identification ---

/// Bluetooth MAC address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Colon-separated upper-case hex, e.g. `8F:27:2E:B8:0F:65`.
    pub fn to_text(&self) -> heapless::String<17> {
        let mut text = heapless::String::new();
        let written = write!(text, "{}", self);
        // 17 characters always fit
        debug_assert!(written.is_ok());
        text
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Firmware version as reported by the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u32,
}

impl FirmwareVersion {
    /// Dotted form, e.g. `2.04.23022511`.
    pub fn to_text(&self) -> heapless::String<16> {
        let mut text = heapless::String::new();
        let written = write!(text, "{}", self);
        // Longest form is "FF.FF.FFFFFFFF"
        debug_assert!(written.is_ok());
        text
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}.{:02X}.{:08X}", self.major, self.minor, self.build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_values_highest_gate() {
        let set = GateValues::with_highest_gate(3, &[50, 40, 30, 20, 10, 0]).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.highest_gate(), 3);
        assert_eq!(set.as_slice(), &[50, 40, 30, 20]);
        assert_eq!(set.get(3), Some(20));
        assert_eq!(set.get(4), None);

        // Gate index is clamped to 8
        let source = [1u8; 12];
        let clamped = GateValues::with_highest_gate(0xFF, &source).unwrap();
        assert_eq!(clamped.len(), 9);

        // Too little source data
        assert!(GateValues::with_highest_gate(5, &[1, 2]).is_none());
    }

    #[test]
    fn test_gate_values_empty_and_equality() {
        let empty = GateValues::new();
        assert!(empty.is_empty());
        assert_eq!(empty.highest_gate(), 0);
        assert_eq!(empty.iter().count(), 0);

        assert!(GateValues::from_slice(&[0; 10]).is_none());

        // Equality ignores the unused tail
        let mut a = GateValues::from_slice(&[1, 2, 3, 4]).unwrap();
        a.len = 2;
        let b = GateValues::from_slice(&[1, 2]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_status() {
        assert_eq!(TargetStatus::from_raw(3), Some(TargetStatus::Both));
        assert_eq!(TargetStatus::from_raw(7), None);
        assert!(TargetStatus::Both.has_moving());
        assert!(TargetStatus::Both.has_stationary());
        assert!(!TargetStatus::Moving.has_stationary());
        assert!(!TargetStatus::AutoThresholdsSuccessful.has_target());
        assert_eq!(TargetStatus::Stationary.as_str(), "Stationary only");
    }

    #[test]
    fn test_resolution_and_baud() {
        assert_eq!(Resolution::from_raw(1), Some(Resolution::Fine));
        assert_eq!(Resolution::from_raw(0), Some(Resolution::Coarse));
        assert_eq!(Resolution::from_raw(2), None);
        assert_eq!(Resolution::Fine.gate_width_cm(), 20);
        assert_eq!(Resolution::Coarse.gate_width_cm(), 75);

        assert_eq!(BaudRate::from_index(0), None);
        assert_eq!(BaudRate::from_index(9), None);
        assert_eq!(BaudRate::from_index(5), Some(BaudRate::B115200));
        assert_eq!(BaudRate::default().index(), 7);
        assert_eq!(BaudRate::B460800.bits_per_second(), 460_800);
    }

    #[test]
    fn test_mac_formatting() {
        let mac = MacAddress([0x8F, 0x27, 0x2E, 0xB8, 0x0F, 0x65]);
        assert_eq!(mac.to_text().as_str(), "8F:27:2E:B8:0F:65");
    }

    #[test]
    fn test_firmware_formatting() {
        let fw = FirmwareVersion {
            major: 2,
            minor: 4,
            build: 0x2302_2511,
        };
        assert_eq!(fw.to_text().as_str(), "2.04.23022511");

        let wide = FirmwareVersion {
            major: 0xFF,
            minor: 0xFF,
            build: u32::MAX,
        };
        assert_eq!(wide.to_text().as_str(), "FF.FF.FFFFFFFF");
    }
}
