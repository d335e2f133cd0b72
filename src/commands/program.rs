//! Program commands
//!
//! Commands accepted in configuration mode. Each one is sent as
//! `[opcode, register, length, payload...]` and answered with
//! `[0xC1, register, length, data...]`.
//!
//! # Important Notes
//! - The module must be in configuration mode (M0 = M1 = 1)
//! - The UART must run at 9600bps 8N1 while in configuration mode
//! - A write answers with the registers as stored, so the echo can be
//!   compared against what was sent

use core::convert::Infallible;

use regiface::{Command, ToByteArray};

use crate::registers::{
    Configuration, ModuleInformation, ProgramCommand, RegisterAddress, RegisterWindow,
    CONFIGURATION_PAYLOAD_SIZE,
};

/// Reset request understood by the module in configuration mode
pub const RESET_COMMAND: [u8; 3] = [0xC4, 0xC4, 0xC4];

/// Read configuration command (0xC1, register 0x00, length 8)
///
/// Returns the complete configuration block. The crypto key always reads as
/// zero.
#[derive(Debug, Clone)]
pub struct ReadConfiguration;

impl Command for ReadConfiguration {
    type IdType = u8;
    type CommandParameters = RegisterWindow;
    type ResponseParameters = Configuration;

    fn id() -> Self::IdType {
        ProgramCommand::Read as u8
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        RegisterWindow::new(RegisterAddress::Configuration)
    }
}

/// Read product information command (0xC1, register 0x08, length 3)
#[derive(Debug, Clone)]
pub struct ReadModuleInformation;

impl Command for ReadModuleInformation {
    type IdType = u8;
    type CommandParameters = RegisterWindow;
    type ResponseParameters = ModuleInformation;

    fn id() -> Self::IdType {
        ProgramCommand::Read as u8
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        RegisterWindow::new(RegisterAddress::ProductInformation)
    }
}

/// Register window and contents of a configuration write
///
/// Serializes to `[0x00, 0x08, payload...]`; the header stored in the
/// configuration itself is not sent.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationParameters(pub Configuration);

impl ToByteArray for ConfigurationParameters {
    type Error = Infallible;
    type Array = [u8; 2 + CONFIGURATION_PAYLOAD_SIZE];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut arr = Self::Array::default();
        arr[0] = RegisterAddress::Configuration as u8;
        arr[1] = RegisterAddress::Configuration.length();
        arr[2..].copy_from_slice(&self.0.payload());
        Ok(arr)
    }
}

/// Write configuration command (0xC0)
///
/// The written configuration is kept across power cycles.
#[derive(Debug, Clone)]
pub struct WriteConfiguration {
    pub configuration: Configuration,
}

impl Command for WriteConfiguration {
    type IdType = u8;
    type CommandParameters = ConfigurationParameters;
    type ResponseParameters = Configuration;

    fn id() -> Self::IdType {
        ProgramCommand::WritePersistent as u8
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        ConfigurationParameters(self.configuration)
    }
}

/// Write temporary configuration command (0xC2)
///
/// The written configuration is lost when the module powers down.
#[derive(Debug, Clone)]
pub struct WriteVolatileConfiguration {
    pub configuration: Configuration,
}

impl Command for WriteVolatileConfiguration {
    type IdType = u8;
    type CommandParameters = ConfigurationParameters;
    type ResponseParameters = Configuration;

    fn id() -> Self::IdType {
        ProgramCommand::WriteVolatile as u8
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        ConfigurationParameters(self.configuration)
    }
}
