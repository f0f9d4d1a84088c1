//! This module defines the generic trait a hardware collaborator implements
//! to be driven by a [`Transceiver`](struct@crate::radio::Transceiver).
//!
//! ```
//! use txrx::radio::prelude::*;
//! ```

pub use super::register::{Mode, Register, RfSetup};
use super::signal::CompletionSignal;

/// A trait to represent the register-level access to a packet radio.
///
/// The driver core never assumes a register map or a bus protocol. Everything
/// chip-specific lives behind this trait.
///
/// Hardware events are reported through
/// [`CompletionSignal::on_hardware_event()`](fn@crate::radio::CompletionSignal::on_hardware_event),
/// either from an interrupt handler that has its own access to the radio, or
/// from [`RadioHal::service_events()`] which the driver calls while it waits.
/// See [`Nrf24Hal::dispatch_irq()`](fn@crate::radio::nrf24::Nrf24Hal::dispatch_irq)
/// for an example.
pub trait RadioHal {
    type Error;

    /// Write `data` to a logical `register`.
    ///
    /// See [`Register`] for the data each register expects. Command-like
    /// registers (like [`Register::FlushTx`]) are written with an empty slice.
    fn write_register(&mut self, register: Register, data: &[u8]) -> Result<(), Self::Error>;

    /// Read a logical `register` into `buf`.
    ///
    /// The length of `buf` determines how many bytes are read.
    fn read_register(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Activate the radio (start transmitting a queued frame or start listening).
    fn assert_chip_enable(&mut self) -> Result<(), Self::Error>;

    /// Return the radio to standby.
    fn deassert_chip_enable(&mut self) -> Result<(), Self::Error>;

    /// Report any pending hardware events through `signal`.
    ///
    /// The driver calls this whenever it checks for an event, so a collaborator
    /// owned by the [`Transceiver`](struct@crate::radio::Transceiver) can still
    /// be serviced. The default does nothing, for collaborators whose events
    /// are reported elsewhere.
    fn service_events(&mut self, _signal: &CompletionSignal) -> Result<(), Self::Error> {
        Ok(())
    }
}
