#![cfg_attr(not(test), no_std)]
//! EBYTE E220 LoRa Module Driver
//!
//! This crate provides a type-safe interface for the EBYTE E220 series of UART LoRa
//! transceiver modules (LLCC68 based). The module handles the radio on its own; the host
//! talks to it over a UART and selects its operating mode with two GPIO lines.
//!
//! # Features
//! - Four operating modes selected by M0/M1, with AUX busy/ready tracking
//! - Configuration read and write, persistent or volatile
//! - Product information and ambient RSSI queries
//! - Transparent, fixed address and broadcast transmission
//! - Reception with optional per-packet RSSI byte
//! - Over the air reconfiguration of a peer module
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface for hardware interaction
//!   - Owns the UART, mode lines, AUX line and delay
//!   - Provides bounded UART reads and writes
//!
//! - [`mode`]: Operating mode control through M0/M1 and AUX
//!
//! - [`registers`]: Register definitions
//!   - [`registers::speed`]: UART and air data rate
//!   - [`registers::option`]: Sub-packet size, ambient RSSI and power
//!   - [`registers::transmission`]: Fixed transmission, RSSI byte, LBT and WOR period
//!   - [`registers::block`]: Configuration and product information blocks
//!
//! - [`commands`]: Configuration mode commands
//!   - [`commands::program`]: Register reads and writes, reset
//!   - [`commands::rssi`]: Ambient and last packet RSSI
//!
//! - [`messaging`]: Sending and receiving payloads
//!
//! - [`obfuscation`]: Reversible scrambling of WOR addressing data
//!
//! # Usage
//! Program commands are described with the `regiface` crate's `Command` trait and executed by
//! [`Device`]. Operations return `Result<_, Error>`; [`Error::status`] classifies a failure as
//! a [`ResponseStatus`].
//!
//! A typical session:
//!
//! 1. Create a [`Device`] with your UART (9600bps 8N1), M0, M1 and optionally AUX
//! 2. Enter configuration mode
//! 3. Read the configuration, change it and write it back
//! 4. Return to normal mode
//! 5. Send and receive messages
//!
//! # Important Notes
//! - Configuration mode only works with the UART at 9600bps 8N1
//! - The driver never changes mode on its own; see [`Device::in_mode`]
//! - Fixed and broadcast sends need fixed transmission enabled in the configuration
//! - The driver is blocking and assumes exclusive use of its peripherals
//!
//! # Example
//! ```no_run
//! use e220::{Device, Error, OperatingMode, SaveMode};
//!
//! fn set_channel<UART, M0, M1, AUX, D>(
//!     device: &mut Device<UART, M0, M1, AUX, D>,
//!     channel: u8,
//! ) -> Result<(), Error>
//! where
//!     UART: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
//!     M0: embedded_hal::digital::OutputPin,
//!     M1: embedded_hal::digital::OutputPin,
//!     AUX: embedded_hal::digital::InputPin,
//!     D: embedded_hal::delay::DelayNs,
//! {
//!     device.in_mode(OperatingMode::Configuration, |device| {
//!         let mut configuration = device.get_configuration()?;
//!         configuration.channel = channel;
//!         device.set_configuration(configuration, SaveMode::Persistent)?;
//!         Ok(())
//!     })
//! }
//! ```

pub mod commands;
pub mod config;
pub mod device;
pub mod messaging;
pub mod mode;
pub mod obfuscation;
pub mod registers;
pub mod status;

pub use commands::*;
pub use config::Config;
pub use device::{Device, NoAux};
pub use messaging::*;
pub use mode::OperatingMode;
pub use obfuscation::AddressObfuscator;
pub use registers::*;
pub use status::{Error, ResponseStatus};
