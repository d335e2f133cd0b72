//! E220 Device Interface
//!
//! This module provides the [`Device`] type, which owns everything needed to talk to an
//! E220 module:
//! - the UART the module is wired to
//! - the M0 and M1 mode select lines
//! - the optional AUX (busy/ready) line
//! - a delay provider used for every timed wait
//!
//! It also hosts the byte level UART primitives the command and messaging layers are
//! built on. All reads are bounded by [`Config::read_timeout_ms`], counted in whole
//! milliseconds of delay while polling the UART for data.
//!
//! # Example
//! ```ignore
//! use e220::{Config, Device, NoAux};
//!
//! // UART, M0 and M1 pins and the delay come from your HAL
//! let mut device = Device::new(uart, m0, m1, None::<NoAux>, delay, Config::default());
//! device.init()?;
//! device.send_message(b"hello")?;
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use heapless::Vec;

use crate::{config::Config, mode::OperatingMode, status::Error};

/// Main device interface for the E220 module.
///
/// The UART must implement the `embedded-io` `Read`, `Write` and `ReadReady` traits, the mode
/// lines `embedded_hal::digital::OutputPin`, the AUX line `InputPin` and the delay
/// `embedded_hal::delay::DelayNs`. The driver assumes exclusive, single threaded use of all of
/// them.
pub struct Device<UART, M0, M1, AUX, D> {
    pub(crate) uart: UART,
    pub(crate) m0: M0,
    pub(crate) m1: M1,
    pub(crate) aux: Option<AUX>,
    pub(crate) delay: D,
    pub(crate) config: Config,
    pub(crate) mode: OperatingMode,
}

/// Placeholder for boards without an AUX line
///
/// Pass `None::<NoAux>` to [`Device::new`]; the driver then waits
/// [`Config::no_aux_wait_ms`] wherever it would have polled AUX.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAux;

impl ErrorType for NoAux {
    type Error = Infallible;
}

impl InputPin for NoAux {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

impl<UART, M0, M1, AUX, D> Device<UART, M0, M1, AUX, D> {
    /// Creates a new Device instance.
    ///
    /// No pin is touched until the first mode change; the module is considered
    /// [`OperatingMode::Uninitialized`] until then.
    ///
    /// # Arguments
    /// * `uart` - UART opened with `config.uart_baud` and `config.uart_parity`
    /// * `m0`, `m1` - Mode select outputs
    /// * `aux` - AUX input, if wired
    /// * `delay` - Delay provider
    /// * `config` - Timing parameters
    pub fn new(uart: UART, m0: M0, m1: M1, aux: Option<AUX>, delay: D, config: Config) -> Self {
        Self {
            uart,
            m0,
            m1,
            aux,
            delay,
            config,
            mode: OperatingMode::Uninitialized,
        }
    }

    /// Releases the underlying peripherals.
    ///
    /// This method consumes the Device instance and returns the UART, both mode lines, the AUX
    /// line and the delay provider.
    pub fn release(self) -> (UART, M0, M1, Option<AUX>, D) {
        (self.uart, self.m0, self.m1, self.aux, self.delay)
    }

    /// Returns the timing and UART parameters given to [`Device::new`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the last mode successfully applied.
    ///
    /// This does not query the module.
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }
}

impl<UART, M0, M1, AUX, D> Device<UART, M0, M1, AUX, D>
where
    UART: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
    D: embedded_hal::delay::DelayNs,
{
    /// Returns `true` when the UART holds unread bytes.
    pub fn available(&mut self) -> Result<bool, Error> {
        self.uart.read_ready().map_err(Error::transport)
    }

    /// Writes every byte of `bytes` to the UART and flushes it.
    ///
    /// # Errors
    /// * `Error::DataSizeMismatch` - The UART stopped accepting data
    /// * `Error::Transport` - UART communication failed
    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let mut remaining = bytes;
        while !remaining.is_empty() {
            match self.uart.write(remaining).map_err(Error::transport)? {
                0 => {
                    log::warn!(
                        "uart accepted {} of {} bytes",
                        bytes.len() - remaining.len(),
                        bytes.len()
                    );
                    return Err(Error::DataSizeMismatch);
                }
                n => remaining = &remaining[n..],
            }
        }
        self.uart.flush().map_err(Error::transport)
    }

    /// Reads one byte, or `None` when nothing arrives within `timeout_ms`.
    fn read_byte(&mut self, timeout_ms: u32) -> Result<Option<u8>, Error> {
        let mut waited = 0;
        loop {
            if self.uart.read_ready().map_err(Error::transport)? {
                let mut byte = [0u8; 1];
                if self.uart.read(&mut byte).map_err(Error::transport)? == 1 {
                    return Ok(Some(byte[0]));
                }
            }
            if waited >= timeout_ms {
                return Ok(None);
            }
            self.delay.delay_ms(1);
            waited += 1;
        }
    }

    /// Fills `buf` completely.
    ///
    /// # Errors
    /// * `Error::Timeout` - The line went quiet before `buf` was full
    /// * `Error::Transport` - UART communication failed
    pub(crate) fn read_exactly(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let timeout = self.config.read_timeout_ms;
        for received in 0..buf.len() {
            match self.read_byte(timeout)? {
                Some(byte) => buf[received] = byte,
                None => {
                    log::debug!("read timed out after {} of {} bytes", received, buf.len());
                    return Err(Error::Timeout);
                }
            }
        }
        Ok(())
    }

    /// Appends bytes to `out` until `delimiter` is seen or the line goes quiet.
    ///
    /// The delimiter itself is consumed but not stored. Running out of time after some data
    /// arrived is not an error; the partial message is kept.
    ///
    /// # Errors
    /// * `Error::Timeout` - Nothing arrived at all
    /// * `Error::BufferTooSmall` - `out` filled up before the delimiter
    pub(crate) fn read_until<const N: usize>(
        &mut self,
        delimiter: u8,
        out: &mut Vec<u8, N>,
    ) -> Result<(), Error> {
        let timeout = self.config.read_timeout_ms;
        while let Some(byte) = self.read_byte(timeout)? {
            if byte == delimiter {
                return Ok(());
            }
            out.push(byte).map_err(|_| Error::BufferTooSmall)?;
        }
        if out.is_empty() {
            Err(Error::Timeout)
        } else {
            Ok(())
        }
    }

    /// Appends bytes to `out` until the line stays quiet for a full read timeout.
    pub(crate) fn read_until_idle<const N: usize>(&mut self, out: &mut Vec<u8, N>) -> Result<(), Error> {
        let timeout = self.config.read_timeout_ms;
        while let Some(byte) = self.read_byte(timeout)? {
            out.push(byte).map_err(|_| Error::BufferTooSmall)?;
        }
        if out.is_empty() {
            Err(Error::Timeout)
        } else {
            Ok(())
        }
    }

    /// Discards whatever is waiting in the UART receive buffer.
    pub(crate) fn clean_uart_buffer(&mut self) -> Result<(), Error> {
        let mut scratch = [0u8; 16];
        let mut discarded = 0usize;
        while self.uart.read_ready().map_err(Error::transport)? {
            match self.uart.read(&mut scratch).map_err(Error::transport)? {
                0 => break,
                n => discarded += n,
            }
        }
        if discarded > 0 {
            log::trace!("discarded {} stray bytes", discarded);
        }
        Ok(())
    }
}
