//! Station payload types.
//!
//! Every frame carries a 2-byte type code directly after the magic header.
//! Codes are fixed by the VLF/LF station protocol and must match the
//! producers bit-for-bit. Codes without a variant resolve to
//! [`DataType::Unknown`].

use std::fmt;

/// Semantic kind of a frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Fallback for codes outside the registry.
    Unknown,
    /// Station status report.
    StatusData,
    /// Electric-field time-domain waveform.
    ElectricTimeDomain,
    /// Magnetic-field time-domain waveform.
    MagneticTimeDomain,
    /// Electric-field frequency-domain waveform.
    ElectricFrequencyDomain,
    /// Magnetic-field frequency-domain waveform.
    MagneticFrequencyDomain,
    /// Feature vector extracted from the time-domain waveform.
    TimeDomainFeature,
}

impl DataType {
    /// All registry entries, `Unknown` first.
    pub const ALL: [DataType; 7] = [
        DataType::Unknown,
        DataType::StatusData,
        DataType::ElectricTimeDomain,
        DataType::MagneticTimeDomain,
        DataType::ElectricFrequencyDomain,
        DataType::MagneticFrequencyDomain,
        DataType::TimeDomainFeature,
    ];

    /// Resolve a wire code. Never fails; unmapped codes yield `Unknown`.
    pub fn from_code(code: u16) -> Self {
        match code {
            0x00A0 => DataType::StatusData,
            0x00A1 => DataType::ElectricTimeDomain,
            0x00A2 => DataType::MagneticTimeDomain,
            0x00A3 => DataType::ElectricFrequencyDomain,
            0x00A4 => DataType::MagneticFrequencyDomain,
            0x00B1 => DataType::TimeDomainFeature,
            _ => DataType::Unknown,
        }
    }

    /// Wire code. Informational only for `Unknown`.
    pub fn code(self) -> u16 {
        match self {
            DataType::Unknown => 0x1000,
            DataType::StatusData => 0x00A0,
            DataType::ElectricTimeDomain => 0x00A1,
            DataType::MagneticTimeDomain => 0x00A2,
            DataType::ElectricFrequencyDomain => 0x00A3,
            DataType::MagneticFrequencyDomain => 0x00A4,
            DataType::TimeDomainFeature => 0x00B1,
        }
    }

    /// Protocol name, e.g. `ELECTRIC_TIME_DOMAIN`.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Unknown => "UNKNOWN",
            DataType::StatusData => "STATUS_DATA",
            DataType::ElectricTimeDomain => "ELECTRIC_TIME_DOMAIN",
            DataType::MagneticTimeDomain => "MAGNETIC_TIME_DOMAIN",
            DataType::ElectricFrequencyDomain => "ELECTRIC_FREQUENCY_DOMAIN",
            DataType::MagneticFrequencyDomain => "MAGNETIC_FREQUENCY_DOMAIN",
            DataType::TimeDomainFeature => "TIME_DOMAIN_FEATURE",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            DataType::Unknown => "unknown data",
            DataType::StatusData => "status data",
            DataType::ElectricTimeDomain => "electric-field time-domain waveform",
            DataType::MagneticTimeDomain => "magnetic-field time-domain waveform",
            DataType::ElectricFrequencyDomain => "electric-field frequency-domain waveform",
            DataType::MagneticFrequencyDomain => "magnetic-field frequency-domain waveform",
            DataType::TimeDomainFeature => "time-domain waveform feature data",
        }
    }

    /// Returns true for the `Unknown` fallback.
    pub fn is_unknown(self) -> bool {
        self == DataType::Unknown
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
