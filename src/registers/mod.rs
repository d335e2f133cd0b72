//! Register definitions for the E220 module
//!
//! The module exposes eight configuration registers and a read only product
//! information block. Sub-byte fields are kept inside their raw register
//! byte and reached through accessor methods, so every value read from the
//! module is written back bit for bit.
//!
//! - [`map`]: opcodes, register addresses and lengths
//! - [`speed`]: UART and air data rate (REG0)
//! - [`option`]: sub-packet size, ambient RSSI and power (REG1)
//! - [`transmission`]: RSSI byte, fixed transmission, LBT and WOR period (REG3)
//! - [`block`]: complete configuration and product information blocks

pub mod block;
pub mod map;
pub mod option;
pub mod speed;
pub mod transmission;

pub use block::*;
pub use map::*;
pub use option::*;
pub use speed::*;
pub use transmission::*;
