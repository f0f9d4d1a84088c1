//! This module defines types shared by the driver core and any
//! [`RadioHal`](trait@crate::radio::prelude::RadioHal) implementation.
//!
//! The numeric encodings used here are chip-agnostic. A hardware collaborator
//! translates them into whatever its register map expects.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
///
/// The exact output power of each level is defined by the hardware collaborator.
/// For nRF24L01-class radios the levels map to -18, -12, -6, and 0 dBm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaLevel {
    Min,
    Low,
    High,
    Max,
}

impl PaLevel {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 1,
            PaLevel::High => 2,
            PaLevel::Max => 3,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0 => PaLevel::Min,
            1 => PaLevel::Low,
            2 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PaLevel::Min => defmt::write!(fmt, "Min"),
            PaLevel::Low => defmt::write!(fmt, "Low"),
            PaLevel::High => defmt::write!(fmt, "High"),
            PaLevel::Max => defmt::write!(fmt, "Max"),
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PaLevel::Min => write!(f, "Min"),
            PaLevel::Low => write!(f, "Low"),
            PaLevel::High => write!(f, "High"),
            PaLevel::Max => write!(f, "Max"),
        }
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

impl DataRate {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 1,
            DataRate::Kbps250 => 2,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            1 => DataRate::Mbps2,
            2 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The length of a CRC checksum that is used (if any).
///
/// Cyclical Redundancy Checking (CRC) is commonly used to ensure data integrity.
/// The hardware drops frames that fail the check, so they never reach the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrcLength {
    /// represents no CRC checksum is used
    Disabled,
    /// represents CRC 8 bit checksum is used
    Bit8,
    /// represents CRC 16 bit checksum is used
    Bit16,
}

impl CrcLength {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 1,
            CrcLength::Bit16 => 2,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0 => CrcLength::Disabled,
            1 => CrcLength::Bit8,
            _ => CrcLength::Bit16,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CrcLength {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CrcLength::Disabled => defmt::write!(fmt, "disabled"),
            CrcLength::Bit8 => defmt::write!(fmt, "8 bit"),
            CrcLength::Bit16 => defmt::write!(fmt, "16 bit"),
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CrcLength::Disabled => write!(f, "disabled"),
            CrcLength::Bit8 => write!(f, "8 bit"),
            CrcLength::Bit16 => write!(f, "16 bit"),
        }
    }
}

/// The state of the (single) radio channel.
///
/// Only the [`ChannelArbiter`](struct@crate::radio::ChannelArbiter) mutates this.
/// Interrupt context never touches it; it only raises flags on the
/// [`CompletionSignal`](struct@crate::radio::CompletionSignal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransceiverState {
    /// Not transmitting nor listening (standby).
    #[default]
    Idle,
    /// A frame is being clocked out over the air.
    Transmitting,
    /// The frame was sent and the radio waits for an acknowledgment.
    AwaitingAck,
    /// The receiver is armed.
    Listening,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransceiverState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TransceiverState::Idle => defmt::write!(fmt, "Idle"),
            TransceiverState::Transmitting => defmt::write!(fmt, "Transmitting"),
            TransceiverState::AwaitingAck => defmt::write!(fmt, "AwaitingAck"),
            TransceiverState::Listening => defmt::write!(fmt, "Listening"),
        }
    }
}

impl Display for TransceiverState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TransceiverState::Idle => write!(f, "Idle"),
            TransceiverState::Transmitting => write!(f, "Transmitting"),
            TransceiverState::AwaitingAck => write!(f, "AwaitingAck"),
            TransceiverState::Listening => write!(f, "Listening"),
        }
    }
}

/// An event reported by the hardware collaborator from interrupt context.
///
/// See [`CompletionSignal::on_hardware_event()`](fn@crate::radio::CompletionSignal::on_hardware_event).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareEvent<'a> {
    /// The transmitted frame left the radio (and was acknowledged, if auto-ack is enabled).
    PacketSent,
    /// A frame arrived. The slice holds the raw payload as read from the radio.
    PacketReceived(&'a [u8]),
    /// One transmission attempt ended without receiving an acknowledgment.
    AckTimeout,
}

impl Display for HardwareEvent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            HardwareEvent::PacketSent => write!(f, "PacketSent"),
            HardwareEvent::PacketReceived(buf) => write!(f, "PacketReceived({} bytes)", buf.len()),
            HardwareEvent::AckTimeout => write!(f, "AckTimeout"),
        }
    }
}

/// The terminal outcome of a transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    /// The frame was delivered after the given number of attempts.
    Success { attempts: u8 },
    /// Every attempt went unacknowledged.
    AckTimeout { attempts: u8 },
}

impl TxOutcome {
    /// How many times the frame went over the air.
    pub const fn attempts(&self) -> u8 {
        match self {
            TxOutcome::Success { attempts } | TxOutcome::AckTimeout { attempts } => *attempts,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, TxOutcome::Success { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TxOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TxOutcome::Success { attempts } => {
                defmt::write!(fmt, "Success after {=u8} attempt(s)", attempts)
            }
            TxOutcome::AckTimeout { attempts } => {
                defmt::write!(fmt, "AckTimeout after {=u8} attempt(s)", attempts)
            }
        }
    }
}

impl Display for TxOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TxOutcome::Success { attempts } => write!(f, "Success after {attempts} attempt(s)"),
            TxOutcome::AckTimeout { attempts } => {
                write!(f, "AckTimeout after {attempts} attempt(s)")
            }
        }
    }
}
