//! Runtime driver configuration
//!
//! Resolved once when the [`Device`](crate::Device) is created. Which
//! optional lines exist is decided by the pins handed to the constructor;
//! everything else lives here.

use crate::registers::{UartBpsRate, UartParity};

/// Timing and UART parameters used by the driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Baud rate the host UART was opened with
    pub uart_baud: UartBpsRate,
    /// Frame format the host UART was opened with
    pub uart_parity: UartParity,
    /// Inactivity window for UART reads, restarted by every received byte
    pub read_timeout_ms: u32,
    /// Bound on waiting for AUX to report ready after a mode change or command
    pub aux_timeout_ms: u32,
    /// Delay applied before and after driving the mode lines
    pub mode_switch_delay_ms: u32,
    /// Extra delay after AUX goes high before the module accepts commands
    pub aux_settle_ms: u32,
    /// Fixed wait used in place of AUX polling when no AUX line is wired
    pub no_aux_wait_ms: u32,
    /// Bound on waiting for AUX after handing a payload to the module
    pub transmit_timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uart_baud: UartBpsRate::Bps9600,
            uart_parity: UartParity::Mode8N1,
            read_timeout_ms: 500,
            aux_timeout_ms: 1000,
            mode_switch_delay_ms: 40,
            aux_settle_ms: 20,
            no_aux_wait_ms: 100,
            transmit_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Sets the UART parameters the host opened its port with.
    ///
    /// # Arguments
    /// * `baud` - UART baud rate; configuration mode only works at 9600bps
    /// * `parity` - Frame format; configuration mode only works with 8N1
    pub fn with_uart(mut self, baud: UartBpsRate, parity: UartParity) -> Self {
        self.uart_baud = baud;
        self.uart_parity = parity;
        self
    }

    /// Sets how long a read waits for the next byte before giving up.
    ///
    /// # Arguments
    /// * `timeout` - Inactivity window in milliseconds, restarted by every byte
    pub fn with_read_timeout_ms(mut self, timeout: u32) -> Self {
        self.read_timeout_ms = timeout;
        self
    }

    /// Sets the bound on waiting for AUX after a mode change or command.
    ///
    /// # Arguments
    /// * `timeout` - Milliseconds before [`Error::Timeout`](crate::Error::Timeout) is returned
    pub fn with_aux_timeout_ms(mut self, timeout: u32) -> Self {
        self.aux_timeout_ms = timeout;
        self
    }

    /// Sets the delay applied before and after driving M0 and M1.
    ///
    /// # Arguments
    /// * `delay` - Milliseconds, applied twice per mode change
    pub fn with_mode_switch_delay_ms(mut self, delay: u32) -> Self {
        self.mode_switch_delay_ms = delay;
        self
    }

    /// Sets the extra delay after AUX reports ready.
    ///
    /// # Arguments
    /// * `delay` - Milliseconds
    pub fn with_aux_settle_ms(mut self, delay: u32) -> Self {
        self.aux_settle_ms = delay;
        self
    }

    /// Sets the fixed wait used instead of AUX polling when no AUX line is wired.
    ///
    /// # Arguments
    /// * `delay` - Milliseconds
    pub fn with_no_aux_wait_ms(mut self, delay: u32) -> Self {
        self.no_aux_wait_ms = delay;
        self
    }

    /// Sets the bound on waiting for AUX after a payload was handed to the module.
    ///
    /// # Arguments
    /// * `timeout` - Milliseconds before a send returns [`Error::Timeout`](crate::Error::Timeout)
    pub fn with_transmit_timeout_ms(mut self, timeout: u32) -> Self {
        self.transmit_timeout_ms = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_their_field_only() {
        let config = Config::default()
            .with_uart(UartBpsRate::Bps115200, UartParity::Mode8E1)
            .with_read_timeout_ms(10)
            .with_aux_timeout_ms(20)
            .with_mode_switch_delay_ms(30)
            .with_aux_settle_ms(40)
            .with_no_aux_wait_ms(50)
            .with_transmit_timeout_ms(60);

        assert_eq!(
            config,
            Config {
                uart_baud: UartBpsRate::Bps115200,
                uart_parity: UartParity::Mode8E1,
                read_timeout_ms: 10,
                aux_timeout_ms: 20,
                mode_switch_delay_ms: 30,
                aux_settle_ms: 40,
                no_aux_wait_ms: 50,
                transmit_timeout_ms: 60,
            }
        );
    }
}
