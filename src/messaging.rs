//! Payload transmission and reception
//!
//! Used with the module in normal (or WOR transmitter) mode. The module
//! forwards whatever arrives on its UART over the air, so sending is a plain
//! UART write. In fixed transmission mode the first three bytes of each
//! payload select the destination:
//!
//! ```text
//! [ADDH][ADDL][CHAN][payload...]
//! ```
//!
//! `ADDH = ADDL = 0xFF` broadcasts to every module on the channel. The fixed
//! transmission bit of the transmission mode register must be set through
//! [`Device::set_configuration`] beforehand; the driver does not set it.
//!
//! Nothing here retries. Each call returns once the module has taken the
//! data, or once the read timeout expires.

use heapless::Vec;
use regiface::ToByteArray;

use crate::{
    commands::rssi_to_dbm,
    registers::{Configuration, ProgramCommand, SaveMode, CONFIGURATION_SIZE},
    status::{Error, ResponseStatus},
    Device,
};

/// Largest payload accepted by a single send
pub const MAX_SIZE_TX_PACKET: usize = 200;
/// Capacity of a received payload
pub const MAX_SIZE_RX_PACKET: usize = 256;
/// Address bytes selecting every module on a channel
pub const BROADCAST_ADDRESS: u8 = 0xFF;
/// Conventional terminator for [`Device::receive_message_until`]
pub const MESSAGE_DELIMITER: u8 = b'\0';
/// Marker preceding a configuration block sent to a peer over the air
pub const REMOTE_CONFIGURATION_MARKER: [u8; 2] = [ProgramCommand::RemoteConfiguration as u8; 2];

const FIXED_HEADER_SIZE: usize = 3;

/// Received payload
pub type Payload = Vec<u8, MAX_SIZE_RX_PACKET>;

/// A received message and, if the module appended one, its RSSI byte
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseContainer {
    pub data: Payload,
    pub rssi: Option<u8>,
}

impl ResponseContainer {
    pub fn status(&self) -> ResponseStatus {
        if self.data.is_empty() {
            ResponseStatus::Success
        } else {
            ResponseStatus::SuccessWithData
        }
    }

    /// The payload as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.data).ok()
    }

    pub fn rssi_dbm(&self) -> Option<i16> {
        self.rssi.map(rssi_to_dbm)
    }
}

impl<UART, M0, M1, AUX, D> Device<UART, M0, M1, AUX, D>
where
    UART: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
    M0: embedded_hal::digital::OutputPin,
    M1: embedded_hal::digital::OutputPin,
    AUX: embedded_hal::digital::InputPin,
    D: embedded_hal::delay::DelayNs,
{
    /// Sends `message` as is.
    ///
    /// # Errors
    /// * `Error::PacketTooBig` - `message` is longer than [`MAX_SIZE_TX_PACKET`]
    /// * `Error::Timeout` - AUX did not report the data as sent
    pub fn send_message(&mut self, message: &[u8]) -> Result<(), Error> {
        check_payload_size(message)?;
        self.send_frame(message)
    }

    /// Sends `message` to the module at `address_high:address_low` on `channel`.
    ///
    /// Only meaningful with fixed transmission enabled on the sending module.
    pub fn send_fixed_message(
        &mut self,
        address_high: u8,
        address_low: u8,
        channel: u8,
        message: &[u8],
    ) -> Result<(), Error> {
        check_payload_size(message)?;

        let mut frame: Vec<u8, { FIXED_HEADER_SIZE + MAX_SIZE_TX_PACKET }> = Vec::new();
        frame
            .extend_from_slice(&[address_high, address_low, channel])
            .map_err(|_| Error::PacketTooBig(message.len()))?;
        frame
            .extend_from_slice(message)
            .map_err(|_| Error::PacketTooBig(message.len()))?;

        log::debug!(
            "fixed message to {:02X}{:02X} channel {} ({} bytes)",
            address_high,
            address_low,
            channel,
            message.len()
        );
        self.send_frame(&frame)
    }

    /// Sends `message` to every module listening on `channel`.
    pub fn send_broadcast_fixed_message(&mut self, channel: u8, message: &[u8]) -> Result<(), Error> {
        self.send_fixed_message(BROADCAST_ADDRESS, BROADCAST_ADDRESS, channel, message)
    }

    /// Sends `configuration` over the air to reconfigure a peer module.
    ///
    /// The payload is `CF CF` followed by the configuration block with the write header for
    /// `save`.
    pub fn send_configuration_message(
        &mut self,
        address_high: u8,
        address_low: u8,
        channel: u8,
        configuration: &Configuration,
        save: SaveMode,
    ) -> Result<(), Error> {
        let block = match configuration.with_write_header(save.opcode()).to_bytes() {
            Ok(block) => block,
            Err(never) => match never {},
        };

        let mut message = [0u8; REMOTE_CONFIGURATION_MARKER.len() + CONFIGURATION_SIZE];
        message[..REMOTE_CONFIGURATION_MARKER.len()].copy_from_slice(&REMOTE_CONFIGURATION_MARKER);
        message[REMOTE_CONFIGURATION_MARKER.len()..].copy_from_slice(&block);

        self.send_fixed_message(address_high, address_low, channel, &message)
    }

    /// Receives exactly `size` bytes, followed by one RSSI byte when `rssi` is set.
    ///
    /// Set `rssi` only when the module's RSSI byte option is enabled, or the byte
    /// will never arrive and the call times out.
    ///
    /// # Errors
    /// * `Error::Timeout` - Fewer bytes arrived
    /// * `Error::BufferTooSmall` - `size` exceeds [`MAX_SIZE_RX_PACKET`]
    pub fn receive(&mut self, size: usize, rssi: bool) -> Result<ResponseContainer, Error> {
        let mut data = Payload::new();
        data.resize_default(size).map_err(|_| Error::BufferTooSmall)?;
        self.read_exactly(&mut data)?;

        let rssi = if rssi {
            let mut byte = [0u8; 1];
            self.read_exactly(&mut byte)?;
            Some(byte[0])
        } else {
            None
        };

        self.clean_uart_buffer()?;
        Ok(ResponseContainer { data, rssi })
    }

    /// Receives exactly `size` bytes.
    pub fn receive_message(&mut self, size: usize) -> Result<ResponseContainer, Error> {
        self.receive(size, false)
    }

    /// Receives exactly `size` bytes and the RSSI byte appended by the module.
    pub fn receive_message_rssi(&mut self, size: usize) -> Result<ResponseContainer, Error> {
        self.receive(size, true)
    }

    /// Receives a message terminated by `delimiter`.
    ///
    /// The delimiter is not included. When the line goes quiet before the delimiter, the data
    /// received so far is returned.
    pub fn receive_message_until(&mut self, delimiter: u8) -> Result<ResponseContainer, Error> {
        let mut data = Payload::new();
        self.read_until(delimiter, &mut data)?;
        Ok(ResponseContainer { data, rssi: None })
    }

    /// Receives everything until the line goes quiet.
    ///
    /// With `rssi` set the last byte received is split off as the RSSI byte.
    pub fn receive_text(&mut self, rssi: bool) -> Result<ResponseContainer, Error> {
        let mut data = Payload::new();
        self.read_until_idle(&mut data)?;

        let rssi = if rssi { data.pop() } else { None };
        self.clean_uart_buffer()?;
        Ok(ResponseContainer { data, rssi })
    }

    /// Receives the first `size` bytes of a message, leaving the rest in the UART.
    pub fn receive_initial_message(&mut self, size: usize) -> Result<ResponseContainer, Error> {
        let mut data = Payload::new();
        data.resize_default(size).map_err(|_| Error::BufferTooSmall)?;
        self.read_exactly(&mut data)?;
        Ok(ResponseContainer { data, rssi: None })
    }

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), Error> {
        self.write_all(frame)?;
        self.wait_complete_response(self.config.transmit_timeout_ms)
    }
}

fn check_payload_size(message: &[u8]) -> Result<(), Error> {
    if message.len() > MAX_SIZE_TX_PACKET {
        log::warn!(
            "payload of {} bytes exceeds {} byte limit",
            message.len(),
            MAX_SIZE_TX_PACKET
        );
        return Err(Error::PacketTooBig(message.len()));
    }
    Ok(())
}
