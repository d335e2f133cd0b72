//! Configuration and product information blocks
//!
//! These are the structures exchanged in configuration mode. Both carry the
//! three byte program header followed by the register contents, with no
//! padding between fields.

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

use super::{
    OptionFlags, ProgramCommand, RegisterAddress, Speed, TransmissionMode, PROGRAM_HEADER_SIZE,
    RETURNED_COMMAND,
};

/// Number of configuration register bytes following the header
pub const CONFIGURATION_PAYLOAD_SIZE: usize = 8;
/// Serialized size of a [`Configuration`], header included
pub const CONFIGURATION_SIZE: usize = PROGRAM_HEADER_SIZE + CONFIGURATION_PAYLOAD_SIZE;
/// Serialized size of a [`ModuleInformation`], header included
pub const MODULE_INFORMATION_SIZE: usize = PROGRAM_HEADER_SIZE + 3;

/// Frequency band of the module variant
///
/// The channel register is an offset in 1MHz steps from the band base.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyBand {
    /// E220-400 series, 410.125MHz + CHAN
    Band400,
    /// E220-900 series, 850.125MHz + CHAN
    Band900,
}

impl FrequencyBand {
    pub const fn base_khz(self) -> u32 {
        match self {
            Self::Band400 => 410_125,
            Self::Band900 => 850_125,
        }
    }
}

/// Crypto key registers (0x06, 0x07)
///
/// Write only: the module always reads them back as zero.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CryptKey {
    pub high: u8,
    pub low: u8,
}

impl FromByteArray for CryptKey {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            high: bytes[0],
            low: bytes[1],
        })
    }
}

impl ToByteArray for CryptKey {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.high, self.low])
    }
}

fn decode<T: FromByteArray<Error = Infallible>>(bytes: T::Array) -> T {
    match T::from_bytes(bytes) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn encode<T: ToByteArray<Error = Infallible>>(value: T) -> T::Array {
    match value.to_bytes() {
        Ok(bytes) => bytes,
        Err(never) => match never {},
    }
}

/// Full configuration block
///
/// # Layout
/// | Offset | Field             |
/// |--------|-------------------|
/// | 0      | Command           |
/// | 1      | Starting address  |
/// | 2      | Length            |
/// | 3      | Address high      |
/// | 4      | Address low       |
/// | 5      | Speed             |
/// | 6      | Option            |
/// | 7      | Channel           |
/// | 8      | Transmission mode |
/// | 9      | Crypt high        |
/// | 10     | Crypt low         |
///
/// # Important Notes
/// - When written, the header is rebuilt from the requested [`SaveMode`]
///   and the header fields stored here are ignored
/// - A block read from the module always carries the `0xC1 0x00 0x08`
///   echo header
///
/// [`SaveMode`]: super::SaveMode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub command: u8,
    pub starting_address: u8,
    pub length: u8,

    pub address_high: u8,
    pub address_low: u8,
    pub speed: Speed,
    pub option: OptionFlags,
    pub channel: u8,
    pub transmission_mode: TransmissionMode,
    pub crypt: CryptKey,
}

impl Default for Configuration {
    /// Factory settings as shipped by the manufacturer
    fn default() -> Self {
        Self {
            command: RETURNED_COMMAND,
            starting_address: RegisterAddress::Configuration as u8,
            length: RegisterAddress::Configuration.length(),
            address_high: 0x00,
            address_low: 0x00,
            speed: Speed::default(),
            option: OptionFlags::default(),
            channel: 0x17,
            transmission_mode: TransmissionMode::default(),
            crypt: CryptKey::default(),
        }
    }
}

impl Configuration {
    /// Module address as a single 16 bit value
    pub const fn address(&self) -> u16 {
        u16::from_be_bytes([self.address_high, self.address_low])
    }

    pub fn set_address(&mut self, address: u16) {
        [self.address_high, self.address_low] = address.to_be_bytes();
    }

    /// Carrier frequency of the configured channel
    pub const fn channel_frequency_khz(&self, band: FrequencyBand) -> u32 {
        band.base_khz() + self.channel as u32 * 1_000
    }

    /// Register bytes following the header
    pub fn payload(&self) -> [u8; CONFIGURATION_PAYLOAD_SIZE] {
        let [speed] = encode(self.speed);
        let [option] = encode(self.option);
        let [transmission_mode] = encode(self.transmission_mode);
        let [crypt_high, crypt_low] = encode(self.crypt);
        [
            self.address_high,
            self.address_low,
            speed,
            option,
            self.channel,
            transmission_mode,
            crypt_high,
            crypt_low,
        ]
    }

    /// Copy of this block with the header of a write request
    pub fn with_write_header(mut self, command: ProgramCommand) -> Self {
        self.command = command as u8;
        self.starting_address = RegisterAddress::Configuration as u8;
        self.length = RegisterAddress::Configuration.length();
        self
    }
}

impl FromByteArray for Configuration {
    type Error = Infallible;
    type Array = [u8; CONFIGURATION_SIZE];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            command: bytes[0],
            starting_address: bytes[1],
            length: bytes[2],
            address_high: bytes[3],
            address_low: bytes[4],
            speed: decode([bytes[5]]),
            option: decode([bytes[6]]),
            channel: bytes[7],
            transmission_mode: decode([bytes[8]]),
            crypt: decode([bytes[9], bytes[10]]),
        })
    }
}

impl ToByteArray for Configuration {
    type Error = Infallible;
    type Array = [u8; CONFIGURATION_SIZE];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut arr = Self::Array::default();
        arr[0] = self.command;
        arr[1] = self.starting_address;
        arr[2] = self.length;
        arr[PROGRAM_HEADER_SIZE..].copy_from_slice(&self.payload());
        Ok(arr)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Configuration {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Configuration {{ header: [{=u8:#x}, {=u8:#x}, {=u8:#x}], address: {=u16:#x}, speed: {=u8:#x}, option: {=u8:#x}, channel: {=u8}, transmission_mode: {=u8:#x}, crypt: {} }}",
            self.command,
            self.starting_address,
            self.length,
            self.address(),
            self.speed.bits(),
            self.option.bits(),
            self.channel,
            self.transmission_mode.bits(),
            self.crypt
        )
    }
}

/// Product information block (register 0x08)
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleInformation {
    pub command: u8,
    pub starting_address: u8,
    pub length: u8,

    pub model: u8,
    pub version: u8,
    pub features: u8,
}

impl FromByteArray for ModuleInformation {
    type Error = Infallible;
    type Array = [u8; MODULE_INFORMATION_SIZE];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            command: bytes[0],
            starting_address: bytes[1],
            length: bytes[2],
            model: bytes[3],
            version: bytes[4],
            features: bytes[5],
        })
    }
}

impl ToByteArray for ModuleInformation {
    type Error = Infallible;
    type Array = [u8; MODULE_INFORMATION_SIZE];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.command,
            self.starting_address,
            self.length,
            self.model,
            self.version,
            self.features,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{SubPacketSetting, TransmissionPower, UartBpsRate, WorPeriod};

    const FACTORY: [u8; CONFIGURATION_SIZE] =
        [0xC1, 0x00, 0x08, 0x00, 0x00, 0x62, 0x00, 0x17, 0x03, 0x00, 0x00];

    #[test]
    fn default_matches_factory_block() {
        assert_eq!(Configuration::default().to_bytes().unwrap(), FACTORY);
    }

    #[test]
    fn decodes_fields_in_wire_order() {
        let bytes = [0xC1, 0x00, 0x08, 0x12, 0x34, 0xE4, 0xA1, 0x41, 0xC5, 0x56, 0x78];
        let config = Configuration::from_bytes(bytes).unwrap();

        assert_eq!(config.address(), 0x1234);
        assert_eq!(config.speed.uart_baud_rate(), UartBpsRate::Bps115200);
        assert_eq!(config.option.sub_packet_setting(), SubPacketSetting::Bytes64);
        assert!(config.option.ambient_rssi_enabled());
        assert_eq!(config.option.transmission_power(), TransmissionPower::Dbm17);
        assert_eq!(config.channel, 0x41);
        assert!(config.transmission_mode.rssi_byte());
        assert!(config.transmission_mode.fixed_transmission());
        assert_eq!(config.transmission_mode.wor_period(), WorPeriod::Ms3000);
        assert_eq!(config.crypt, CryptKey { high: 0x56, low: 0x78 });

        assert_eq!(config.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn register_bytes_use_register_codecs() {
        let bytes = [0xC1, 0x00, 0x08, 0x00, 0x01, 0x7A, 0x23, 0x05, 0x91, 0xAA, 0x55];
        let config = Configuration::from_bytes(bytes).unwrap();

        assert_eq!(config.speed, Speed::from_bytes([0x7A]).unwrap());
        assert_eq!(config.option, OptionFlags::from_bytes([0x23]).unwrap());
        assert_eq!(config.transmission_mode, TransmissionMode::from_bytes([0x91]).unwrap());
        assert_eq!(config.crypt, CryptKey::from_bytes([0xAA, 0x55]).unwrap());

        let payload = config.payload();
        assert_eq!(payload[2..4], [0x7A, 0x23]);
        assert_eq!(payload[5..], [0x91, 0xAA, 0x55]);
    }

    #[test]
    fn write_header_replaces_echo_header() {
        let config = Configuration::default().with_write_header(ProgramCommand::WritePersistent);
        let bytes = config.to_bytes().unwrap();
        assert_eq!(&bytes[..3], &[0xC0, 0x00, 0x08]);
        assert_eq!(&bytes[3..], &FACTORY[3..]);
    }

    #[test]
    fn set_address_splits_bytes() {
        let mut config = Configuration::default();
        config.set_address(0xBEEF);
        assert_eq!((config.address_high, config.address_low), (0xBE, 0xEF));
    }

    #[test]
    fn channel_frequency() {
        let config = Configuration::default();
        assert_eq!(config.channel_frequency_khz(FrequencyBand::Band400), 433_125);
        assert_eq!(config.channel_frequency_khz(FrequencyBand::Band900), 873_125);
    }

    #[cfg(feature = "defmt")]
    #[test]
    fn blocks_are_defmt_formattable() {
        fn assert_format<T: defmt::Format>() {}
        assert_format::<Configuration>();
        assert_format::<ModuleInformation>();
    }

    #[test]
    fn module_information_layout() {
        let bytes = [0xC1, 0x08, 0x03, 0x20, 0x0B, 0x16];
        let info = ModuleInformation::from_bytes(bytes).unwrap();
        assert_eq!(info.model, 0x20);
        assert_eq!(info.version, 0x0B);
        assert_eq!(info.features, 0x16);
        assert_eq!(info.to_bytes().unwrap(), bytes);
    }
}
