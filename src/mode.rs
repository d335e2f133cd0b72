//! Operating mode control
//!
//! The module's mode is selected by the M0 and M1 lines:
//!
//! | Mode                 | M1 | M0 |
//! |----------------------|----|----|
//! | Normal               | 0  | 0  |
//! | WOR transmitter      | 0  | 1  |
//! | WOR receiver         | 1  | 0  |
//! | Configuration/sleep  | 1  | 1  |
//!
//! The module takes a few milliseconds to act on a new pattern and signals
//! completion by raising AUX. Every transition is applied to the pins, even
//! when the requested mode equals the current one, so a transition can be
//! used to resynchronize with the module.

use embedded_hal::digital::PinState;

use crate::{status::Error, Device};

/// Operating mode of the module
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Transparent or fixed transmission (mode 0)
    Normal = 0,
    /// Transmits with a wake-on-radio preamble (mode 1)
    WorTransmitter = 1,
    /// Power saving, wakes periodically to listen (mode 2)
    WorReceiver = 2,
    /// Accepts program commands, radio off (mode 3)
    Configuration = 3,
    /// No mode has been applied yet
    Uninitialized = 0xFF,
}

impl OperatingMode {
    pub const TRANSMISSION: Self = Self::Normal;
    pub const POWER_SAVING: Self = Self::WorReceiver;
    pub const PROGRAM: Self = Self::Configuration;
    pub const SLEEP: Self = Self::Configuration;

    /// Levels for (M0, M1), `None` for [`OperatingMode::Uninitialized`]
    pub const fn pin_states(self) -> Option<(PinState, PinState)> {
        match self {
            Self::Normal => Some((PinState::Low, PinState::Low)),
            Self::WorTransmitter => Some((PinState::High, PinState::Low)),
            Self::WorReceiver => Some((PinState::Low, PinState::High)),
            Self::Configuration => Some((PinState::High, PinState::High)),
            Self::Uninitialized => None,
        }
    }
}

impl<UART, M0, M1, AUX, D> Device<UART, M0, M1, AUX, D>
where
    M0: embedded_hal::digital::OutputPin,
    M1: embedded_hal::digital::OutputPin,
    AUX: embedded_hal::digital::InputPin,
    D: embedded_hal::delay::DelayNs,
{
    /// Puts the module in normal mode, ready to transmit and receive.
    pub fn init(&mut self) -> Result<(), Error> {
        self.set_mode(OperatingMode::Normal)
    }

    /// Switches the module to `mode`.
    ///
    /// Drives M0 and M1 once each, then waits for AUX to report ready.
    /// [`Device::mode`] only reflects `mode` once this returns `Ok`.
    ///
    /// # Errors
    /// * `Error::InvalidParameter` - `mode` is [`OperatingMode::Uninitialized`]
    /// * `Error::Timeout` - AUX stayed low for longer than [`Config::aux_timeout_ms`]
    /// * `Error::Pin` - A GPIO operation failed
    ///
    /// [`Config::aux_timeout_ms`]: crate::Config::aux_timeout_ms
    pub fn set_mode(&mut self, mode: OperatingMode) -> Result<(), Error> {
        let (m0, m1) = mode.pin_states().ok_or(Error::InvalidParameter)?;
        log::debug!("switching mode {:?} -> {:?}", self.mode, mode);

        self.delay.delay_ms(self.config.mode_switch_delay_ms);
        self.m0.set_state(m0).map_err(Error::pin)?;
        self.m1.set_state(m1).map_err(Error::pin)?;
        self.delay.delay_ms(self.config.mode_switch_delay_ms);

        self.wait_complete_response(self.config.aux_timeout_ms)?;
        self.mode = mode;
        log::trace!("mode {:?} applied", mode);
        Ok(())
    }

    /// Runs `f` with the module in `mode`, then restores the previous mode.
    ///
    /// The previous mode is restored even if `f` fails; the error of `f` takes precedence over
    /// an error while restoring. Nothing is restored when the device was uninitialized.
    pub fn in_mode<R>(
        &mut self,
        mode: OperatingMode,
        f: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let previous = self.mode;
        self.set_mode(mode)?;

        let result = f(self);
        let restored = match previous {
            OperatingMode::Uninitialized => Ok(()),
            previous => self.set_mode(previous),
        };

        let value = result?;
        restored?;
        Ok(value)
    }

    /// Waits for AUX to go high, or a fixed delay when AUX is not wired.
    pub(crate) fn wait_complete_response(&mut self, timeout_ms: u32) -> Result<(), Error> {
        match self.aux.as_mut() {
            Some(aux) => {
                let mut waited = 0;
                while aux.is_low().map_err(Error::pin)? {
                    if waited >= timeout_ms {
                        log::warn!("AUX still low after {}ms", waited);
                        return Err(Error::Timeout);
                    }
                    self.delay.delay_ms(1);
                    waited += 1;
                }
            }
            None => self.delay.delay_ms(self.config.no_aux_wait_ms),
        }
        self.delay.delay_ms(self.config.aux_settle_ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_patterns() {
        assert_eq!(
            OperatingMode::Configuration.pin_states(),
            Some((PinState::High, PinState::High))
        );
        assert_eq!(
            OperatingMode::WorTransmitter.pin_states(),
            Some((PinState::High, PinState::Low))
        );
        assert_eq!(
            OperatingMode::WorReceiver.pin_states(),
            Some((PinState::Low, PinState::High))
        );
        assert_eq!(OperatingMode::Uninitialized.pin_states(), None);
    }

    #[test]
    fn aliases() {
        assert_eq!(OperatingMode::SLEEP, OperatingMode::PROGRAM);
        assert_eq!(OperatingMode::TRANSMISSION, OperatingMode::Normal);
        assert_eq!(OperatingMode::POWER_SAVING, OperatingMode::WorReceiver);
    }
}
