//! Transmission mode register (REG3)
//!
//! | Bits | Field                     |
//! |------|---------------------------|
//! | 7    | Append RSSI byte          |
//! | 6    | Fixed transmission        |
//! | 5    | Reserved                  |
//! | 4    | Listen before talk        |
//! | 3    | Reserved                  |
//! | 2:0  | Wake-on-radio period      |

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

const WOR_PERIOD_MASK: u8 = 0b0000_0111;

/// Wake-on-radio cycle
///
/// Only used in WOR modes. Transmitter and receiver must agree; the
/// transmitter precedes each packet with a preamble as long as the period.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorPeriod {
    Ms500 = 0b000,
    Ms1000 = 0b001,
    Ms1500 = 0b010,
    #[default]
    Ms2000 = 0b011,
    Ms2500 = 0b100,
    Ms3000 = 0b101,
    Ms3500 = 0b110,
    Ms4000 = 0b111,
}

impl WorPeriod {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & WOR_PERIOD_MASK {
            0b000 => Self::Ms500,
            0b001 => Self::Ms1000,
            0b010 => Self::Ms1500,
            0b011 => Self::Ms2000,
            0b100 => Self::Ms2500,
            0b101 => Self::Ms3000,
            0b110 => Self::Ms3500,
            _ => Self::Ms4000,
        }
    }

    /// Period length, `(1 + n) * 500ms`
    pub const fn millis(self) -> u32 {
        (self as u32 + 1) * 500
    }
}

bitflags! {
    /// Transmission mode register value
    ///
    /// The wake-on-radio period occupies the low three bits and is exposed
    /// through [`TransmissionMode::wor_period`]. Unnamed bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TransmissionMode: u8 {
        /// Module monitors channel noise before transmitting
        const LISTEN_BEFORE_TALK = 1 << 4;
        /// First three bytes of every payload are `[ADDH, ADDL, CHAN]`
        const FIXED_TRANSMISSION = 1 << 6;
        /// Module appends one RSSI byte to every received payload
        const RSSI_BYTE = 1 << 7;

        const _ = !0;
    }
}

impl Default for TransmissionMode {
    /// Transparent transmission, no RSSI byte, no LBT, 2000ms WOR period
    fn default() -> Self {
        Self::from_bits_retain(WorPeriod::Ms2000 as u8)
    }
}

impl TransmissionMode {
    pub const fn wor_period(self) -> WorPeriod {
        WorPeriod::from_bits(self.bits())
    }

    pub fn set_wor_period(&mut self, period: WorPeriod) {
        *self = Self::from_bits_retain((self.bits() & !WOR_PERIOD_MASK) | (period as u8 & WOR_PERIOD_MASK));
    }

    pub const fn listen_before_talk(self) -> bool {
        self.contains(Self::LISTEN_BEFORE_TALK)
    }

    pub fn set_listen_before_talk(&mut self, enabled: bool) {
        self.set(Self::LISTEN_BEFORE_TALK, enabled);
    }

    pub const fn fixed_transmission(self) -> bool {
        self.contains(Self::FIXED_TRANSMISSION)
    }

    pub fn set_fixed_transmission(&mut self, enabled: bool) {
        self.set(Self::FIXED_TRANSMISSION, enabled);
    }

    pub const fn rssi_byte(self) -> bool {
        self.contains(Self::RSSI_BYTE)
    }

    pub fn set_rssi_byte(&mut self, enabled: bool) {
        self.set(Self::RSSI_BYTE, enabled);
    }
}

impl FromByteArray for TransmissionMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self::from_bits_retain(bytes[0]))
    }
}

impl ToByteArray for TransmissionMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.bits()])
    }
}
