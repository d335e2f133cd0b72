//! Option register (REG1)
//!
//! | Bits | Field                  |
//! |------|------------------------|
//! | 7:6  | Sub-packet size        |
//! | 5    | Ambient RSSI enable    |
//! | 4:2  | Reserved               |
//! | 1:0  | Transmission power     |

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

const TRANSMISSION_POWER_MASK: u8 = 0b0000_0011;
const SUB_PACKET_SHIFT: u8 = 6;
const SUB_PACKET_MASK: u8 = 0b1100_0000;

/// Output power of the 22dBm module variants
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransmissionPower {
    #[default]
    Dbm22 = 0b00,
    Dbm17 = 0b01,
    Dbm13 = 0b10,
    Dbm10 = 0b11,
}

impl TransmissionPower {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & TRANSMISSION_POWER_MASK {
            0b00 => Self::Dbm22,
            0b01 => Self::Dbm17,
            0b10 => Self::Dbm13,
            _ => Self::Dbm10,
        }
    }

    pub const fn dbm(self) -> i8 {
        match self {
            Self::Dbm22 => 22,
            Self::Dbm17 => 17,
            Self::Dbm13 => 13,
            Self::Dbm10 => 10,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Dbm22 => "22dBm (default)",
            Self::Dbm17 => "17dBm",
            Self::Dbm13 => "13dBm",
            Self::Dbm10 => "10dBm",
        }
    }
}

/// Maximum size of a single air packet
///
/// Data longer than the sub-packet size is split by the module.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubPacketSetting {
    #[default]
    Bytes200 = 0b00,
    Bytes128 = 0b01,
    Bytes64 = 0b10,
    Bytes32 = 0b11,
}

impl SubPacketSetting {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Bytes200,
            0b01 => Self::Bytes128,
            0b10 => Self::Bytes64,
            _ => Self::Bytes32,
        }
    }

    pub const fn bytes(self) -> usize {
        match self {
            Self::Bytes200 => 200,
            Self::Bytes128 => 128,
            Self::Bytes64 => 64,
            Self::Bytes32 => 32,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bytes200 => "200bytes (default)",
            Self::Bytes128 => "128bytes",
            Self::Bytes64 => "64bytes",
            Self::Bytes32 => "32bytes",
        }
    }
}

bitflags! {
    /// Option register value
    ///
    /// Unnamed bits are retained so a register read from the module is
    /// written back unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OptionFlags: u8 {
        /// Enables the ambient noise RSSI query
        const AMBIENT_RSSI = 1 << 5;

        const _ = !0;
    }
}

impl Default for OptionFlags {
    /// 200 byte sub-packets, ambient RSSI disabled, 22dBm
    fn default() -> Self {
        Self::empty()
    }
}

impl OptionFlags {
    pub const fn transmission_power(self) -> TransmissionPower {
        TransmissionPower::from_bits(self.bits())
    }

    pub fn set_transmission_power(&mut self, power: TransmissionPower) {
        *self = Self::from_bits_retain(
            (self.bits() & !TRANSMISSION_POWER_MASK) | (power as u8 & TRANSMISSION_POWER_MASK),
        );
    }

    pub const fn sub_packet_setting(self) -> SubPacketSetting {
        SubPacketSetting::from_bits((self.bits() & SUB_PACKET_MASK) >> SUB_PACKET_SHIFT)
    }

    pub fn set_sub_packet_setting(&mut self, setting: SubPacketSetting) {
        *self = Self::from_bits_retain(
            (self.bits() & !SUB_PACKET_MASK) | (((setting as u8) << SUB_PACKET_SHIFT) & SUB_PACKET_MASK),
        );
    }

    pub const fn ambient_rssi_enabled(self) -> bool {
        self.contains(Self::AMBIENT_RSSI)
    }

    pub fn set_ambient_rssi_enabled(&mut self, enabled: bool) {
        self.set(Self::AMBIENT_RSSI, enabled);
    }
}

impl FromByteArray for OptionFlags {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self::from_bits_retain(bytes[0]))
    }
}

impl ToByteArray for OptionFlags {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.bits()])
    }
}
