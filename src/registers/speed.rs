//! Speed register (REG0)
//!
//! Packs the UART and air data rate settings into a single byte:
//!
//! | Bits | Field          |
//! |------|----------------|
//! | 7:5  | UART baud rate |
//! | 4:3  | UART parity    |
//! | 2:0  | Air data rate  |

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

const AIR_DATA_RATE_MASK: u8 = 0b0000_0111;
const PARITY_SHIFT: u8 = 3;
const PARITY_MASK: u8 = 0b0001_1000;
const BAUD_RATE_SHIFT: u8 = 5;
const BAUD_RATE_MASK: u8 = 0b1110_0000;

/// Air data rate
///
/// Patterns `000` and `001` are accepted by the module and behave as 2.4kbps.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirDataRate {
    Bps2400Alt0 = 0b000,
    Bps2400Alt1 = 0b001,
    Bps2400 = 0b010,
    Bps4800 = 0b011,
    Bps9600 = 0b100,
    Bps19200 = 0b101,
    Bps38400 = 0b110,
    Bps62500 = 0b111,
}

impl AirDataRate {
    /// Maps the low three bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Bps2400Alt0,
            0b001 => Self::Bps2400Alt1,
            0b010 => Self::Bps2400,
            0b011 => Self::Bps4800,
            0b100 => Self::Bps9600,
            0b101 => Self::Bps19200,
            0b110 => Self::Bps38400,
            _ => Self::Bps62500,
        }
    }

    /// Rate over the air in bits per second
    pub const fn bps(self) -> u32 {
        match self {
            Self::Bps2400Alt0 | Self::Bps2400Alt1 | Self::Bps2400 => 2_400,
            Self::Bps4800 => 4_800,
            Self::Bps9600 => 9_600,
            Self::Bps19200 => 19_200,
            Self::Bps38400 => 38_400,
            Self::Bps62500 => 62_500,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bps2400Alt0 | Self::Bps2400Alt1 | Self::Bps2400 => "2.4kbps (default)",
            Self::Bps4800 => "4.8kbps",
            Self::Bps9600 => "9.6kbps",
            Self::Bps19200 => "19.2kbps",
            Self::Bps38400 => "38.4kbps",
            Self::Bps62500 => "62.5kbps",
        }
    }
}

/// UART frame format
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UartParity {
    #[default]
    Mode8N1 = 0b00,
    Mode8O1 = 0b01,
    Mode8E1 = 0b10,
    /// Same framing as [`UartParity::Mode8N1`]
    Mode8N1Alt = 0b11,
}

impl UartParity {
    /// Maps the low two bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Mode8N1,
            0b01 => Self::Mode8O1,
            0b10 => Self::Mode8E1,
            _ => Self::Mode8N1Alt,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Mode8N1 => "8N1 (default)",
            Self::Mode8O1 => "8O1",
            Self::Mode8E1 => "8E1",
            Self::Mode8N1Alt => "8N1 (equal to 00)",
        }
    }
}

/// UART baud rate
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UartBpsRate {
    Bps1200 = 0b000,
    Bps2400 = 0b001,
    Bps4800 = 0b010,
    #[default]
    Bps9600 = 0b011,
    Bps19200 = 0b100,
    Bps38400 = 0b101,
    Bps57600 = 0b110,
    Bps115200 = 0b111,
}

impl UartBpsRate {
    /// Maps the low three bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Bps1200,
            0b001 => Self::Bps2400,
            0b010 => Self::Bps4800,
            0b011 => Self::Bps9600,
            0b100 => Self::Bps19200,
            0b101 => Self::Bps38400,
            0b110 => Self::Bps57600,
            _ => Self::Bps115200,
        }
    }

    /// Baud rate to open the host UART with
    pub const fn baud(self) -> u32 {
        match self {
            Self::Bps1200 => 1_200,
            Self::Bps2400 => 2_400,
            Self::Bps4800 => 4_800,
            Self::Bps9600 => 9_600,
            Self::Bps19200 => 19_200,
            Self::Bps38400 => 38_400,
            Self::Bps57600 => 57_600,
            Self::Bps115200 => 115_200,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bps1200 => "1200bps",
            Self::Bps2400 => "2400bps",
            Self::Bps4800 => "4800bps",
            Self::Bps9600 => "9600bps (default)",
            Self::Bps19200 => "19200bps",
            Self::Bps38400 => "38400bps",
            Self::Bps57600 => "57600bps",
            Self::Bps115200 => "115200bps",
        }
    }
}

/// Speed register value
///
/// Stored as the raw register byte; the accessors mask and shift the
/// individual fields so any byte read from the module is kept verbatim.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(u8);

impl Default for Speed {
    /// 9600bps, 8N1, 2.4kbps air data rate
    fn default() -> Self {
        Self(0x62)
    }
}

impl Speed {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn air_data_rate(self) -> AirDataRate {
        AirDataRate::from_bits(self.0 & AIR_DATA_RATE_MASK)
    }

    pub fn set_air_data_rate(&mut self, rate: AirDataRate) {
        self.0 = (self.0 & !AIR_DATA_RATE_MASK) | (rate as u8 & AIR_DATA_RATE_MASK);
    }

    pub const fn uart_parity(self) -> UartParity {
        UartParity::from_bits((self.0 & PARITY_MASK) >> PARITY_SHIFT)
    }

    pub fn set_uart_parity(&mut self, parity: UartParity) {
        self.0 = (self.0 & !PARITY_MASK) | (((parity as u8) << PARITY_SHIFT) & PARITY_MASK);
    }

    pub const fn uart_baud_rate(self) -> UartBpsRate {
        UartBpsRate::from_bits((self.0 & BAUD_RATE_MASK) >> BAUD_RATE_SHIFT)
    }

    pub fn set_uart_baud_rate(&mut self, rate: UartBpsRate) {
        self.0 = (self.0 & !BAUD_RATE_MASK) | (((rate as u8) << BAUD_RATE_SHIFT) & BAUD_RATE_MASK);
    }
}

impl FromByteArray for Speed {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for Speed {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_default_fields() {
        let speed = Speed::default();
        assert_eq!(speed.uart_baud_rate(), UartBpsRate::Bps9600);
        assert_eq!(speed.uart_parity(), UartParity::Mode8N1);
        assert_eq!(speed.air_data_rate(), AirDataRate::Bps2400);
    }

    #[test]
    fn fields_round_trip_every_byte() {
        for raw in 0..=u8::MAX {
            let speed = Speed::from_bytes([raw]).unwrap();

            let mut rebuilt = Speed::from_bits(0);
            rebuilt.set_uart_baud_rate(speed.uart_baud_rate());
            rebuilt.set_uart_parity(speed.uart_parity());
            rebuilt.set_air_data_rate(speed.air_data_rate());

            assert_eq!(rebuilt.to_bytes().unwrap(), [raw]);
        }
    }

    #[test]
    fn setters_touch_only_their_field() {
        let mut speed = Speed::from_bits(0xFF);
        speed.set_uart_parity(UartParity::Mode8N1);
        assert_eq!(speed.bits(), 0b1110_0111);

        speed.set_uart_baud_rate(UartBpsRate::Bps1200);
        assert_eq!(speed.bits(), 0b0000_0111);

        speed.set_air_data_rate(AirDataRate::Bps9600);
        assert_eq!(speed.bits(), 0b0000_0100);
    }
}
