//! Logical registers and the values written to them.
//!
//! A [`RadioHal`](trait@crate::radio::prelude::RadioHal) maps each logical
//! [`Register`] onto its own chip. The data passed along with a register is
//! described by each variant.

use bitfield_struct::bitfield;

use crate::types::{CrcLength, DataRate, PaLevel};

/// A logical radio register (or a register-like command).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// A single [`Mode`] byte.
    Mode,
    /// A single byte in range [3, 5].
    AddressWidth,
    /// The transmit address (`AddressWidth` bytes).
    TxAddress,
    /// The address of a receive pipe (`AddressWidth` bytes).
    RxAddress(u8),
    /// A single byte; bit N enables pipe N.
    PipeEnable,
    /// A single byte; bit N enables auto-ack on pipe N.
    AutoAck,
    /// Two bytes: `[delay, count]`.
    ///
    /// The delay is in units of 250 microseconds (plus 250 microseconds).
    AutoRetry,
    /// A single byte in range [0, 125].
    Channel,
    /// A single [`RfSetup`] byte.
    RfSetup,
    /// The static payload length of a receive pipe (a single byte).
    PayloadLength(u8),
    /// A single byte: `1` enables dynamic payloads on all pipes, `0` disables them.
    DynamicPayloads,
    /// The bytes of a frame to transmit.
    TxPayload,
    /// The bytes of the oldest received frame (read only).
    RxPayload,
    /// The length of the oldest received frame (a single byte, read only).
    RxPayloadLength,
    /// Discard all frames queued for transmission. Written with no data.
    FlushTx,
    /// Discard all received frames. Written with no data.
    FlushRx,
    /// Send the last transmitted frame again. Written with no data.
    ReuseTxPayload,
    /// Acknowledge all pending hardware events. Written with no data.
    ClearEvents,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Register {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Register::RxAddress(pipe) => defmt::write!(fmt, "RxAddress({=u8})", pipe),
            Register::PayloadLength(pipe) => defmt::write!(fmt, "PayloadLength({=u8})", pipe),
            _ => defmt::write!(fmt, "{}", defmt::Debug2Format(self)),
        }
    }
}

/// The operating mode of the radio.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Mode {
    /// Primary receiver (`false` means primary transmitter).
    pub rx: bool,

    /// Powered up (`false` means powered down).
    pub powered: bool,

    #[bits(2, default = CrcLength::Bit16)]
    pub crc_length: CrcLength,

    #[bits(4)]
    _padding: u8,
}

impl Mode {
    pub fn as_rx(self) -> Self {
        self.with_rx(true).with_powered(true)
    }

    pub fn as_tx(self) -> Self {
        self.with_rx(false).with_powered(true)
    }
}

/// RF output settings.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct RfSetup {
    #[bits(2, default = DataRate::Mbps1)]
    pub data_rate: DataRate,

    #[bits(2, default = PaLevel::Max)]
    pub pa_level: PaLevel,

    /// Low Noise Amplifier (only used by some older chips).
    #[bits(1, default = true)]
    pub lna_enable: bool,

    #[bits(3)]
    _padding: u8,
}
