//! Program command implementations
//!
//! This module contains the commands the E220 accepts in configuration mode,
//! and the [`Device`](crate::Device) methods that execute them.
//!
//! # Command Categories
//! - [`program`]: Register access
//!   - Read and write the configuration block
//!   - Read the product information block
//!   - Reset the module
//!
//! - [`rssi`]: Signal strength
//!   - Ambient channel noise
//!   - Strength of the last received packet
//!
//! # Command Execution
//! 1. Put the module in configuration mode (UART at 9600bps)
//! 2. Send `[opcode, register, length]` and any payload
//! 3. Read back `[0xC1, register, length, data...]`
//! 4. Compare the echoed header with the request
//!
//! A response is always taken to belong to the most recent request; there is
//! no pipelining. Failures are never retried by the driver.

mod execute;
pub mod program;
pub mod rssi;

pub use program::*;
pub use rssi::*;
