//! Program command opcodes and the module register map
//!
//! Every configuration-mode exchange starts with a three byte header:
//! `[opcode, starting register, length]`. The module answers with the same
//! header, except that the opcode is always echoed as [`RETURNED_COMMAND`].
//! A request the module cannot parse is answered with `0xFF 0xFF 0xFF`.

use core::convert::Infallible;

use regiface::ToByteArray;

/// Size of the `[opcode, register, length]` program header
pub const PROGRAM_HEADER_SIZE: usize = 3;

/// Opcode the module echoes in the header of every program response
pub const RETURNED_COMMAND: u8 = 0xC1;

/// Program command opcodes
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProgramCommand {
    /// Write registers and keep them across power cycles
    WritePersistent = 0xC0,
    /// Read registers
    Read = 0xC1,
    /// Write registers, lost on power down
    WriteVolatile = 0xC2,
    /// Marker preceding a configuration sent over the air to a peer
    RemoteConfiguration = 0xCF,
    /// Returned by the module when the request was malformed
    WrongFormat = 0xFF,
}

impl From<ProgramCommand> for u8 {
    fn from(command: ProgramCommand) -> Self {
        command as u8
    }
}

/// Register addresses
///
/// | Register             | Address | Length |
/// |----------------------|---------|--------|
/// | Configuration block  | 0x00    | 8      |
/// | Speed                | 0x02    | 1      |
/// | Transmission mode    | 0x03    | 1      |
/// | Channel              | 0x04    | 1      |
/// | Option               | 0x05    | 1      |
/// | Crypto key           | 0x06    | 2      |
/// | Product information  | 0x08    | 3      |
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegisterAddress {
    Configuration = 0x00,
    Speed = 0x02,
    TransmissionMode = 0x03,
    Channel = 0x04,
    Option = 0x05,
    Crypt = 0x06,
    ProductInformation = 0x08,
}

impl RegisterAddress {
    /// Number of bytes held at this address
    pub const fn length(self) -> u8 {
        match self {
            Self::Configuration => 0x08,
            Self::Speed | Self::TransmissionMode | Self::Channel | Self::Option => 0x01,
            Self::Crypt => 0x02,
            Self::ProductInformation => 0x03,
        }
    }
}

impl From<RegisterAddress> for u8 {
    fn from(address: RegisterAddress) -> Self {
        address as u8
    }
}

/// Persistence of a configuration write
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Survives a power cycle (`0xC0`)
    Persistent,
    /// Lost on power down (`0xC2`)
    #[default]
    Volatile,
}

impl SaveMode {
    pub const fn opcode(self) -> ProgramCommand {
        match self {
            Self::Persistent => ProgramCommand::WritePersistent,
            Self::Volatile => ProgramCommand::WriteVolatile,
        }
    }
}

/// Register window addressed by a read request
///
/// Serializes to the `[register, length]` part of the program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWindow {
    pub address: RegisterAddress,
}

impl RegisterWindow {
    pub const fn new(address: RegisterAddress) -> Self {
        Self { address }
    }
}

impl ToByteArray for RegisterWindow {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address as u8, self.address.length()])
    }
}
