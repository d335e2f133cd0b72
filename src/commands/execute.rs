//! Program command execution
//!
//! Requires the module in configuration mode; the driver never switches
//! modes on its own here. Use [`Device::set_mode`] first, or wrap the calls
//! in [`Device::in_mode`].

use core::convert::Infallible;

use regiface::{ByteArray, Command, FromByteArray, ToByteArray};

use super::{
    ReadConfiguration, ReadModuleInformation, RssiReading, WriteConfiguration,
    WriteVolatileConfiguration, RESET_COMMAND, RSSI_AMBIENT_ERROR_RESPONSE, RSSI_COMMAND_PREFIX,
    RSSI_LENGTH, RSSI_REGISTER,
};
use crate::{
    mode::OperatingMode,
    registers::{
        Configuration, ModuleInformation, ProgramCommand, SaveMode, UartBpsRate, UartParity,
        PROGRAM_HEADER_SIZE, RETURNED_COMMAND,
    },
    status::Error,
    Device,
};

impl<UART, M0, M1, AUX, D> Device<UART, M0, M1, AUX, D>
where
    UART: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
    M0: embedded_hal::digital::OutputPin,
    M1: embedded_hal::digital::OutputPin,
    AUX: embedded_hal::digital::InputPin,
    D: embedded_hal::delay::DelayNs,
{
    /// Reads the complete configuration block.
    ///
    /// # Errors
    /// * `Error::Timeout` - Fewer than 11 bytes arrived
    /// * `Error::WrongFormat` - The module rejected the request
    /// * `Error::HeaderMismatch` - The echoed header is not `C1 00 08`
    pub fn get_configuration(&mut self) -> Result<Configuration, Error> {
        self.execute_command(ReadConfiguration)
    }

    /// Writes `configuration` and returns the registers as stored by the module.
    ///
    /// The header fields of `configuration` are ignored; the opcode comes from `save`.
    /// On error the state of the module is unknown and should be read back.
    pub fn set_configuration(
        &mut self,
        configuration: Configuration,
        save: SaveMode,
    ) -> Result<Configuration, Error> {
        match save {
            SaveMode::Persistent => self.execute_command(WriteConfiguration { configuration }),
            SaveMode::Volatile => self.execute_command(WriteVolatileConfiguration { configuration }),
        }
    }

    /// Reads model, firmware version and feature bytes.
    pub fn get_module_information(&mut self) -> Result<ModuleInformation, Error> {
        self.execute_command(ReadModuleInformation)
    }

    /// Asks the module to restart.
    ///
    /// No response is expected; returns once AUX reports ready again.
    pub fn reset_module(&mut self) -> Result<(), Error> {
        let [command, address, length] = RESET_COMMAND;
        self.write_program_command(command, address, length)?;
        log::debug!("resetting module");

        self.wait_complete_response(self.config.aux_timeout_ms)?;
        self.clean_uart_buffer()
    }

    /// Reads the ambient noise and last packet RSSI registers.
    ///
    /// Sent in whatever mode the module is in; the module answers in normal mode and only if
    /// ambient RSSI is enabled in its option register.
    pub fn read_rssi(&mut self) -> Result<RssiReading, Error> {
        self.write_all(&RSSI_COMMAND_PREFIX)?;
        self.write_all(&[RSSI_REGISTER, RSSI_LENGTH])?;
        self.read_program_response(RSSI_REGISTER, RSSI_LENGTH)
    }

    /// Reads the ambient noise RSSI.
    ///
    /// Returns [`RSSI_AMBIENT_ERROR_RESPONSE`] when there is no reading, so it is never
    /// confused with a reading of zero. A module with ambient RSSI disabled does not answer
    /// at all, so that case costs a full [`Config::read_timeout_ms`] before the sentinel is
    /// returned.
    ///
    /// [`Config::read_timeout_ms`]: crate::Config::read_timeout_ms
    pub fn read_rssi_ambient(&mut self) -> u16 {
        match self.read_rssi() {
            Ok(reading) => u16::from(reading.ambient),
            Err(err) => {
                log::debug!("no ambient RSSI reading: {:?}", err);
                RSSI_AMBIENT_ERROR_RESPONSE
            }
        }
    }

    /// Executes a program command on the module.
    ///
    /// # Type Parameters
    /// * `C` - Command whose parameters serialize to `[register, length, payload...]`
    ///
    /// # Returns
    /// The decoded response, echo header included
    ///
    /// # Errors
    /// * `Error::WrongUartConfig` - UART not at 9600bps 8N1
    /// * `Error::NotInConfigurationMode` - Mode lines not in configuration mode
    /// * `Error::Timeout` - Response incomplete
    /// * `Error::WrongFormat` / `Error::HeaderMismatch` - Response rejected
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, Error>
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
        C::ResponseParameters: FromByteArray<Error = Infallible>,
    {
        let request = match command.invoking_parameters().to_bytes() {
            Ok(request) => request,
            Err(never) => match never {},
        };
        let &[address, length, ref payload @ ..] = request.as_ref() else {
            return Err(Error::InvalidParameter);
        };

        self.write_program_command(C::id(), address, length)?;
        self.write_all(payload)?;
        self.read_program_response(address, length)
    }

    /// Sends a `[command, address, length]` program header.
    ///
    /// Nothing is written unless the module is in configuration mode with the UART at 9600bps
    /// 8N1. Any payload must follow with a separate write, and the caller reads the response
    /// before issuing anything else.
    pub(crate) fn write_program_command(
        &mut self,
        command: u8,
        address: u8,
        length: u8,
    ) -> Result<(), Error> {
        self.check_program_mode()?;
        log::debug!(
            "program command {:#04x} register {:#04x} length {}",
            command,
            address,
            length
        );
        self.write_all(&[command, address, length])
    }

    /// Reads a program response and checks its echo header against `address` and `length`.
    ///
    /// The header is read on its own so a `FF FF FF` rejection is reported without waiting for
    /// the rest of the block.
    fn read_program_response<R>(&mut self, address: u8, length: u8) -> Result<R, Error>
    where
        R: FromByteArray<Error = Infallible>,
    {
        let mut raw = R::Array::new();
        let buf = raw.as_mut();
        if buf.len() < PROGRAM_HEADER_SIZE {
            return Err(Error::InvalidParameter);
        }

        self.read_exactly(&mut buf[..PROGRAM_HEADER_SIZE])?;
        let received = [buf[0], buf[1], buf[2]];

        if received[0] == ProgramCommand::WrongFormat as u8 {
            log::warn!("module rejected the request as malformed");
            self.clean_uart_buffer()?;
            return Err(Error::WrongFormat);
        }

        let expected = [RETURNED_COMMAND, address, length];
        if received != expected {
            log::warn!(
                "response header {:02X?} does not match {:02X?}",
                received,
                expected
            );
            self.clean_uart_buffer()?;
            return Err(Error::HeaderMismatch { expected, received });
        }

        self.read_exactly(&mut buf[PROGRAM_HEADER_SIZE..])?;
        self.clean_uart_buffer()?;

        match R::from_bytes(raw) {
            Ok(response) => Ok(response),
            Err(never) => match never {},
        }
    }

    fn check_program_mode(&self) -> Result<(), Error> {
        if self.config.uart_baud != UartBpsRate::Bps9600 {
            log::warn!(
                "configuration mode needs 9600bps, UART is at {}",
                self.config.uart_baud.baud()
            );
            return Err(Error::WrongUartConfig);
        }
        if !matches!(self.config.uart_parity, UartParity::Mode8N1 | UartParity::Mode8N1Alt) {
            log::warn!(
                "configuration mode needs 8N1, UART is {}",
                self.config.uart_parity.description()
            );
            return Err(Error::WrongUartConfig);
        }
        if self.mode != OperatingMode::Configuration {
            return Err(Error::NotInConfigurationMode(self.mode));
        }
        Ok(())
    }
}
