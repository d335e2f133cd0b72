//! Operation outcomes
//!
//! Every driver operation returns `Result<_, Error>`. [`ResponseStatus`] is
//! the coarse classification of an outcome, shared by successful and failed
//! calls, for callers that only need to know what kind of thing happened.

use core::fmt;

use embedded_hal::digital::ErrorKind as PinErrorKind;
use embedded_io::ErrorKind as TransportErrorKind;

use crate::mode::OperatingMode;

/// Coarse outcome of an operation
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    /// Operation succeeded and returned a payload
    SuccessWithData,
    NotSupported,
    NotImplemented,
    /// The module rejected the request or echoed an unexpected header
    ParameterError,
    UnknownError,
    Timeout,
    /// Attempted before the module was put in a known mode
    Uninitialized,
}

impl ResponseStatus {
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::SuccessWithData => "Success with data",
            Self::NotSupported => "Not supported",
            Self::NotImplemented => "Not implemented",
            Self::ParameterError => "Parameter error",
            Self::UnknownError => "Unknown error",
            Self::Timeout => "Timeout",
            Self::Uninitialized => "Not initialized",
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::SuccessWithData)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl<T> From<&Result<T, Error>> for ResponseStatus {
    fn from(result: &Result<T, Error>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => err.status(),
        }
    }
}

/// Driver error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The UART reported an error
    Transport(TransportErrorKind),
    /// A mode or AUX line reported an error
    Pin(PinErrorKind),
    /// No data, or AUX never went high, within the configured window
    Timeout,
    /// The module answered a program request with `0xFF 0xFF 0xFF`
    WrongFormat,
    /// The echoed program header differs from the request
    HeaderMismatch { expected: [u8; 3], received: [u8; 3] },
    /// The UART accepted fewer bytes than were sent
    DataSizeMismatch,
    /// Payload exceeds the transmit ceiling
    PacketTooBig(usize),
    /// Configuration mode requires the UART at 9600bps
    WrongUartConfig,
    /// Argument outside the accepted range
    InvalidParameter,
    /// A program command was issued outside configuration mode
    NotInConfigurationMode(OperatingMode),
    /// The receive buffer cannot hold the requested data
    BufferTooSmall,
}

impl Error {
    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Timeout => ResponseStatus::Timeout,
            Self::NotInConfigurationMode(OperatingMode::Uninitialized) => {
                ResponseStatus::Uninitialized
            }
            Self::WrongFormat
            | Self::HeaderMismatch { .. }
            | Self::WrongUartConfig
            | Self::InvalidParameter
            | Self::NotInConfigurationMode(_)
            | Self::PacketTooBig(_)
            | Self::BufferTooSmall => ResponseStatus::ParameterError,
            Self::Transport(TransportErrorKind::Unsupported) => ResponseStatus::NotSupported,
            Self::Transport(_) | Self::Pin(_) | Self::DataSizeMismatch => {
                ResponseStatus::UnknownError
            }
        }
    }

    pub(crate) fn transport<E: embedded_io::Error>(err: E) -> Self {
        Self::Transport(err.kind())
    }

    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(kind) => write!(f, "Transport({kind:?})"),
            Self::Pin(kind) => write!(f, "Pin({kind:?})"),
            Self::Timeout => write!(f, "Timeout"),
            Self::WrongFormat => write!(f, "WrongFormat"),
            Self::HeaderMismatch { expected, received } => write!(
                f,
                "HeaderMismatch {{ expected: {expected:02X?}, received: {received:02X?} }}"
            ),
            Self::DataSizeMismatch => write!(f, "DataSizeMismatch"),
            Self::PacketTooBig(size) => write!(f, "PacketTooBig({size})"),
            Self::WrongUartConfig => write!(f, "WrongUartConfig"),
            Self::InvalidParameter => write!(f, "InvalidParameter"),
            Self::NotInConfigurationMode(mode) => write!(f, "NotInConfigurationMode({mode:?})"),
            Self::BufferTooSmall => write!(f, "BufferTooSmall"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(kind) => write!(f, "UART error: {kind:?}"),
            Self::Pin(kind) => write!(f, "GPIO error: {kind:?}"),
            Self::Timeout => f.write_str("timeout waiting for the module"),
            Self::WrongFormat => f.write_str("module reported a malformed request"),
            Self::HeaderMismatch { expected, received } => write!(
                f,
                "response header {received:02X?} does not match request {expected:02X?}"
            ),
            Self::DataSizeMismatch => f.write_str("UART accepted fewer bytes than sent"),
            Self::PacketTooBig(size) => write!(f, "packet of {size} bytes exceeds the limit"),
            Self::WrongUartConfig => f.write_str("configuration mode requires 9600bps"),
            Self::InvalidParameter => f.write_str("invalid parameter"),
            Self::NotInConfigurationMode(mode) => {
                write!(f, "module is in {mode:?} mode, not configuration")
            }
            Self::BufferTooSmall => f.write_str("receive buffer too small"),
        }
    }
}
