//! The error taxonomy of the driver core.
//!
//! Every error is returned from the operation that detected it. Errors that
//! originate in the hardware collaborator are wrapped (as `Hardware(E)`) so the
//! caller still sees the collaborator's own error value.

use core::fmt::{Display, Formatter, Result};

/// A caller mistake in addressing or configuration. Never retried internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The address width is outside the supported range [3, 5].
    AddressWidth(u8),
    /// The address width cannot change after an address was explicitly set.
    AddressWidthLocked,
    /// The given address does not have the configured width.
    AddressLength { expected: u8, actual: usize },
    /// The pipe index is outside the range [0, 5].
    PipeIndex(u8),
    /// The retry count is outside the range [0, 15].
    RetryCount(u8),
    /// The retry delay is outside the range [0, 15].
    RetryDelay(u8),
    /// The channel is outside the range [0, 125].
    Channel(u8),
    /// The static payload length is outside the range [1, 32].
    PayloadLength(u8),
    /// A blocking transmit needs at least one poll per attempt.
    PollLimit,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::AddressWidth(w) => defmt::write!(fmt, "invalid address width {=u8}", w),
            ConfigError::AddressWidthLocked => defmt::write!(fmt, "address width is locked"),
            ConfigError::AddressLength { expected, actual } => defmt::write!(
                fmt,
                "address has {=usize} bytes, expected {=u8}",
                actual,
                expected
            ),
            ConfigError::PipeIndex(p) => defmt::write!(fmt, "invalid pipe {=u8}", p),
            ConfigError::RetryCount(c) => defmt::write!(fmt, "invalid retry count {=u8}", c),
            ConfigError::RetryDelay(d) => defmt::write!(fmt, "invalid retry delay {=u8}", d),
            ConfigError::Channel(c) => defmt::write!(fmt, "invalid channel {=u8}", c),
            ConfigError::PayloadLength(l) => {
                defmt::write!(fmt, "invalid payload length {=u8}", l)
            }
            ConfigError::PollLimit => defmt::write!(fmt, "poll limit must be non-zero"),
        }
    }
}

impl Display for ChannelBusy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "channel busy")
    }
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FrameError::PayloadTooLong { length, max } => {
                write!(f, "payload too long ({length} > {max} bytes)")
            }
            FrameError::FrameCorrupt { declared } => {
                write!(f, "corrupt frame (declared {declared} bytes)")
            }
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ConfigError::AddressWidth(w) => write!(f, "invalid address width {w}"),
            ConfigError::AddressWidthLocked => write!(f, "address width is locked"),
            ConfigError::AddressLength { expected, actual } => {
                write!(f, "address has {actual} bytes, expected {expected}")
            }
            ConfigError::PipeIndex(p) => write!(f, "invalid pipe {p}"),
            ConfigError::RetryCount(c) => write!(f, "invalid retry count {c}"),
            ConfigError::RetryDelay(d) => write!(f, "invalid retry delay {d}"),
            ConfigError::Channel(c) => write!(f, "invalid channel {c}"),
            ConfigError::PayloadLength(l) => write!(f, "invalid payload length {l}"),
            ConfigError::PollLimit => write!(f, "poll limit must be non-zero"),
        }
    }
}

/// The radio channel is engaged by another operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelBusy;

/// Errors found by the [`FrameCodec`](struct@crate::radio::FrameCodec).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The payload exceeds the maximum frame size.
    PayloadTooLong { length: usize, max: u8 },
    /// The declared length does not fit the raw buffer (or is zero).
    FrameCorrupt { declared: u8 },
}

/// Failure of [`Transceiver::begin()`](fn@crate::radio::Transceiver::begin).
///
/// Fatal to startup. The driver never retries initialization on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InitError<E> {
    /// The radio did not answer at all (read-back was all ones or all zeros).
    NoResponse { code: u8 },
    /// A register read back a different value than what was written.
    ReadBackMismatch { expected: u8, actual: u8 },
    /// The given [`RadioConfig`](struct@crate::radio::RadioConfig) was rejected.
    InvalidConfig(ConfigError),
    /// The hardware collaborator failed.
    Hardware(E),
}

impl<E> InitError<E> {
    /// The numeric hardware code (register read-back value), if any.
    pub fn code(&self) -> Option<u8> {
        match self {
            InitError::NoResponse { code } => Some(*code),
            InitError::ReadBackMismatch { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

impl<E> From<ConfigError> for InitError<E> {
    fn from(value: ConfigError) -> Self {
        InitError::InvalidConfig(value)
    }
}

impl<E> Display for InitError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            InitError::NoResponse { code } => write!(f, "radio not responding (read 0x{code:02X})"),
            InitError::ReadBackMismatch { expected, actual } => write!(
                f,
                "register read-back mismatch: wrote 0x{expected:02X}, read 0x{actual:02X}"
            ),
            InitError::InvalidConfig(e) => write!(f, "invalid configuration: {e}"),
            InitError::Hardware(_) => write!(f, "hardware collaborator error"),
        }
    }
}

/// Failures of the transmit path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TxError<E> {
    /// The payload exceeds the maximum frame size. Rejected before touching hardware.
    PacketTooLong { length: usize, max: u8 },
    /// Another operation owns the channel, or [`finish_transmit()`](fn@crate::radio::Transceiver::finish_transmit)
    /// was not called after the last non-blocking transmission.
    ChannelBusy,
    /// No acknowledgment arrived within the configured retry budget.
    AckNotReceived { attempts: u8 },
    /// The hardware did not report any outcome within the polling budget.
    Timeout,
    /// The hardware collaborator failed.
    Hardware(E),
}

impl<E> From<ChannelBusy> for TxError<E> {
    fn from(_: ChannelBusy) -> Self {
        TxError::ChannelBusy
    }
}

impl<E> From<FrameError> for TxError<E> {
    fn from(value: FrameError) -> Self {
        match value {
            FrameError::PayloadTooLong { length, max } => TxError::PacketTooLong { length, max },
            // only decoding finds corrupt frames
            FrameError::FrameCorrupt { declared } => TxError::PacketTooLong {
                length: declared as usize,
                max: super::frame::MAX_PAYLOAD_SIZE,
            },
        }
    }
}

impl<E> Display for TxError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TxError::PacketTooLong { length, max } => {
                write!(f, "packet too long ({length} > {max} bytes)")
            }
            TxError::ChannelBusy => write!(f, "channel busy"),
            TxError::AckNotReceived { attempts } => {
                write!(f, "ACK not received after {attempts} attempt(s)")
            }
            TxError::Timeout => write!(f, "transmit timed out"),
            TxError::Hardware(_) => write!(f, "hardware collaborator error"),
        }
    }
}

/// Failures of the receive path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RxError<E> {
    /// No frame is pending.
    NoData,
    /// The caller's buffer is shorter than the pending frame.
    BufferTooSmall { needed: u8 },
    /// The pending frame declared an impossible length. The frame is discarded.
    FrameCorrupt { declared: u8 },
    /// A transmission owns the channel.
    ChannelBusy,
    /// The hardware collaborator failed.
    Hardware(E),
}

impl<E> From<ChannelBusy> for RxError<E> {
    fn from(_: ChannelBusy) -> Self {
        RxError::ChannelBusy
    }
}

impl<E> From<FrameError> for RxError<E> {
    fn from(value: FrameError) -> Self {
        match value {
            FrameError::FrameCorrupt { declared } => RxError::FrameCorrupt { declared },
            FrameError::PayloadTooLong { length, .. } => RxError::FrameCorrupt {
                declared: length.min(u8::MAX as usize) as u8,
            },
        }
    }
}

impl<E> Display for RxError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            RxError::NoData => write!(f, "no data available"),
            RxError::BufferTooSmall { needed } => {
                write!(f, "buffer too small ({needed} bytes needed)")
            }
            RxError::FrameCorrupt { declared } => {
                write!(f, "corrupt frame (declared {declared} bytes)")
            }
            RxError::ChannelBusy => write!(f, "channel busy"),
            RxError::Hardware(_) => write!(f, "hardware collaborator error"),
        }
    }
}

/// Failures of the operations that only configure or park the radio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverError<E> {
    Config(ConfigError),
    /// A transmission owns the channel.
    ChannelBusy,
    /// The hardware collaborator failed.
    Hardware(E),
}

impl<E> From<ConfigError> for DriverError<E> {
    fn from(value: ConfigError) -> Self {
        DriverError::Config(value)
    }
}

impl<E> From<ChannelBusy> for DriverError<E> {
    fn from(_: ChannelBusy) -> Self {
        DriverError::ChannelBusy
    }
}

impl<E> Display for DriverError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DriverError::Config(e) => write!(f, "{e}"),
            DriverError::ChannelBusy => write!(f, "channel busy"),
            DriverError::Hardware(_) => write!(f, "hardware collaborator error"),
        }
    }
}

#[cfg(feature = "std")]
mod std_impls {
    extern crate std;
    use super::{ChannelBusy, ConfigError, DriverError, FrameError, InitError, RxError, TxError};
    use core::fmt::Debug;

    impl std::error::Error for ChannelBusy {}
    impl std::error::Error for ConfigError {}
    impl std::error::Error for FrameError {}
    impl<E: Debug> std::error::Error for InitError<E> {}
    impl<E: Debug> std::error::Error for TxError<E> {}
    impl<E: Debug> std::error::Error for RxError<E> {}
    impl<E: Debug> std::error::Error for DriverError<E> {}
}
