//! RSSI query
//!
//! The module reports the current channel noise and the strength of the last
//! received packet when sent `C0 C1 C2 C3` followed by a register window.
//! It only answers when [`OptionFlags::AMBIENT_RSSI`] is set.
//!
//! [`OptionFlags::AMBIENT_RSSI`]: crate::registers::OptionFlags::AMBIENT_RSSI

use core::convert::Infallible;

use regiface::FromByteArray;

use crate::registers::PROGRAM_HEADER_SIZE;

/// Prefix of an RSSI query
pub const RSSI_COMMAND_PREFIX: [u8; 4] = [0xC0, 0xC1, 0xC2, 0xC3];
/// First RSSI register (ambient noise)
pub const RSSI_REGISTER: u8 = 0x00;
/// Number of RSSI registers read (ambient noise, last packet)
pub const RSSI_LENGTH: u8 = 0x02;

/// Returned by [`Device::read_rssi_ambient`] when no reading is available
///
/// [`Device::read_rssi_ambient`]: crate::Device::read_rssi_ambient
pub const RSSI_AMBIENT_ERROR_RESPONSE: u16 = 0xFFFF;

/// Converts a raw RSSI register value to dBm, `-(256 - raw)`
pub const fn rssi_to_dbm(raw: u8) -> i16 {
    raw as i16 - 256
}

/// RSSI query response
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RssiReading {
    /// Current channel noise
    pub ambient: u8,
    /// Strength of the last received packet
    pub last_packet: u8,
}

impl RssiReading {
    pub const fn ambient_dbm(&self) -> i16 {
        rssi_to_dbm(self.ambient)
    }

    pub const fn last_packet_dbm(&self) -> i16 {
        rssi_to_dbm(self.last_packet)
    }
}

impl FromByteArray for RssiReading {
    type Error = Infallible;
    type Array = [u8; PROGRAM_HEADER_SIZE + RSSI_LENGTH as usize];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            ambient: bytes[3],
            last_packet: bytes[4],
        })
    }
}
