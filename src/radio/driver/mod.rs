use embedded_hal::delay::DelayNs;

mod rx;
mod tx;

use super::{
    address::{AddressTable, AddressTarget, PIPE_COUNT},
    arbiter::ChannelArbiter,
    config::RadioConfig,
    error::{DriverError, InitError},
    frame::FrameCodec,
    prelude::RadioHal,
    register::{Mode, Register},
    signal::CompletionSignal,
};
use crate::{
    log::{debug, warn},
    types::TransceiverState,
};

/// The time a radio needs to settle after its supply came up (in milliseconds).
const SETTLE_DELAY_MS: u32 = 5;
/// The time a radio needs to leave power-down (in microseconds).
const POWER_UP_DELAY_US: u32 = 1500;
/// The minimum chip-enable pulse that starts a transmission (in microseconds).
const CE_PULSE_US: u32 = 10;

/// The half-duplex, acknowledged packet transceiver.
///
/// This composes an [`AddressTable`], a [`FrameCodec`], a [`ChannelArbiter`],
/// and a [`CompletionSignal`] on top of a hardware collaborator (any
/// [`RadioHal`] implementation).
///
/// The [`CompletionSignal`] is borrowed because the interrupt handler needs it
/// too; usually it lives in a `static`.
///
/// ```ignore
/// static SIGNAL: CompletionSignal = CompletionSignal::new();
///
/// let mut radio = Transceiver::new(hal, delay, &SIGNAL);
/// radio.begin(&RadioConfig::default())?;
/// radio.configure_address(AddressTarget::Transmit, b"1Node", 5)?;
/// radio.transmit(b"Hello World!")?;
/// ```
pub struct Transceiver<'s, HAL, DELAY> {
    hal: HAL,
    delay: DELAY,
    signal: &'s CompletionSignal,
    arbiter: ChannelArbiter,
    addresses: AddressTable,
    codec: FrameCodec,
    config: RadioConfig,
    mode: Mode,
}

impl<'s, HAL, DELAY> Transceiver<'s, HAL, DELAY>
where
    HAL: RadioHal,
    DELAY: DelayNs,
{
    /// Instantiate a [`Transceiver`] for the given hardware collaborator.
    ///
    /// Nothing is written to the radio until [`Transceiver::begin()`] is called.
    pub fn new(hal: HAL, delay: DELAY, signal: &'s CompletionSignal) -> Self {
        Self {
            hal,
            delay,
            signal,
            arbiter: ChannelArbiter::default(),
            addresses: AddressTable::default(),
            codec: FrameCodec::default(),
            config: RadioConfig::default(),
            mode: Mode::new(),
        }
    }

    /// Consume the driver and hand back the hardware collaborator and the delay.
    pub fn release(self) -> (HAL, DELAY) {
        (self.hal, self.delay)
    }

    pub fn hal(&self) -> &HAL {
        &self.hal
    }

    /// Direct access to the hardware collaborator.
    ///
    /// Writing registers behind the driver's back can desynchronize it from
    /// the radio.
    pub fn hal_mut(&mut self) -> &mut HAL {
        &mut self.hal
    }

    pub fn state(&self) -> TransceiverState {
        self.arbiter.state()
    }

    pub fn addresses(&self) -> &AddressTable {
        &self.addresses
    }

    /// The configuration applied by the last successful [`Transceiver::begin()`].
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    pub fn signal(&self) -> &'s CompletionSignal {
        self.signal
    }

    /// Let the hardware collaborator report its pending events
    /// (see [`RadioHal::service_events()`]).
    ///
    /// The transmit and receive operations already do this while they wait.
    /// Call it from the radio's interrupt handler (or a main loop) to report
    /// events between those calls.
    pub fn service_irq(&mut self) -> Result<(), DriverError<HAL::Error>> {
        self.hal
            .service_events(self.signal)
            .map_err(DriverError::Hardware)
    }

    fn write(&mut self, register: Register, data: &[u8]) -> Result<(), HAL::Error> {
        self.hal.write_register(register, data)
    }

    fn write_mode(&mut self, mode: Mode) -> Result<(), HAL::Error> {
        self.mode = mode;
        self.hal.write_register(Register::Mode, &[mode.into_bits()])
    }

    /// Initialize the radio with the given `config`.
    ///
    /// All pipe addresses are reset to their defaults
    /// (see [`AddressTable`]), the channel returns to
    /// [`TransceiverState::Idle`], and any pending event is dropped.
    ///
    /// The radio's [`Register::Mode`] is read back to verify the hardware
    /// collaborator works. A read-back of all zeros or all ones means the radio
    /// did not respond.
    pub fn begin(&mut self, config: &RadioConfig) -> Result<(), InitError<HAL::Error>> {
        config.validate()?;
        let addresses = AddressTable::new(config.address_width())?;

        self.hal.deassert_chip_enable().map_err(InitError::Hardware)?;
        self.signal.reset();
        self.arbiter.standby();
        // Must allow the radio time to settle else configuration bits will not necessarily stick.
        self.delay.delay_ms(SETTLE_DELAY_MS);

        let mode = config.mode.with_rx(false).with_powered(false);
        self.write_mode(mode).map_err(InitError::Hardware)?;
        let mut read_back = [0u8];
        self.hal
            .read_register(Register::Mode, &mut read_back)
            .map_err(InitError::Hardware)?;
        let (expected, actual) = (mode.into_bits(), read_back[0]);
        if actual != expected {
            warn!("Mode read back 0x{=u8:X}, expected 0x{=u8:X}", actual, expected);
            if actual == 0 || actual == 0xFF {
                return Err(InitError::NoResponse { code: actual });
            }
            return Err(InitError::ReadBackMismatch { expected, actual });
        }

        self.apply(config, &addresses)
            .map_err(InitError::Hardware)?;

        self.addresses = addresses;
        self.codec = FrameCodec::new(config.dynamic_payloads(), config.payload_length());
        self.arbiter = ChannelArbiter::new(config.auto_ack(), config.retry_count());
        self.config = *config;
        debug!(
            "radio ready on channel {=u8} at {}",
            config.channel(),
            config.data_rate()
        );
        Ok(())
    }

    fn apply(&mut self, config: &RadioConfig, addresses: &AddressTable) -> Result<(), HAL::Error> {
        self.write(Register::AddressWidth, &[addresses.address_width()])?;
        self.write(
            Register::AutoRetry,
            &[config.retry_delay(), config.retry_count()],
        )?;
        self.write(Register::AutoAck, &[0x3F * config.auto_ack() as u8])?;
        self.write(
            Register::DynamicPayloads,
            &[config.dynamic_payloads() as u8],
        )?;
        self.write(Register::RfSetup, &[config.rf_setup.into_bits()])?;
        self.write(Register::Channel, &[config.channel()])?;

        for pipe in 0..PIPE_COUNT {
            self.write(Register::PayloadLength(pipe), &[config.payload_length()])?;
            if let Some(address) = addresses.receive_address(pipe) {
                self.hal.write_register(Register::RxAddress(pipe), address)?;
            }
        }
        self.write(Register::PipeEnable, &[addresses.enabled_mask()])?;
        self.hal
            .write_register(Register::TxAddress, addresses.transmit_address())?;

        self.write(Register::FlushRx, &[])?;
        self.write(Register::FlushTx, &[])?;
        self.write(Register::ClearEvents, &[])?;

        // Do not assert the chip enable, so the radio remains in standby.
        self.write_mode(self.mode.as_tx())?;
        self.delay.delay_us(POWER_UP_DELAY_US);
        Ok(())
    }

    /// Set the transmit address or the address of a receive pipe.
    ///
    /// If `width` differs from the current address width, the width is changed
    /// first; this fails with [`ConfigError::AddressWidthLocked`](crate::radio::ConfigError::AddressWidthLocked)
    /// once any address was set. Setting a receive address also enables the pipe.
    ///
    /// Nothing changes (in the driver or in the radio) if this fails.
    pub fn configure_address(
        &mut self,
        target: AddressTarget,
        address: &[u8],
        width: u8,
    ) -> Result<(), DriverError<HAL::Error>> {
        if self.arbiter.is_engaged() {
            return Err(DriverError::ChannelBusy);
        }
        let mut table = self.addresses;
        let width_changed = width != table.address_width();
        if width_changed {
            table.set_address_width(width)?;
        }
        match target {
            AddressTarget::Transmit => table.set_transmit_address(address)?,
            AddressTarget::Receive(pipe) => table.set_receive_address(pipe, address)?,
        }

        if width_changed {
            self.write(Register::AddressWidth, &[width])
                .map_err(DriverError::Hardware)?;
        }
        let written = match target {
            AddressTarget::Transmit => self.write(Register::TxAddress, address),
            AddressTarget::Receive(pipe) => self
                .write(Register::RxAddress(pipe), address)
                .and_then(|_| self.write(Register::PipeEnable, &[table.enabled_mask()])),
        };
        written.map_err(DriverError::Hardware)?;
        self.addresses = table;
        Ok(())
    }

    /// Stop a receive `pipe` from receiving.
    pub fn disable_pipe(&mut self, pipe: u8) -> Result<(), DriverError<HAL::Error>> {
        let mut table = self.addresses;
        table.disable_pipe(pipe)?;
        self.write(Register::PipeEnable, &[table.enabled_mask()])
            .map_err(DriverError::Hardware)?;
        self.addresses = table;
        Ok(())
    }

    /// Force the channel back to [`TransceiverState::Idle`] (standby).
    ///
    /// Always permitted. A frame in flight is discarded, not gracefully
    /// aborted. A received frame that was not read yet remains readable, but
    /// no new frames are accepted until [`Transceiver::start_receive()`].
    pub fn standby(&mut self) -> Result<(), DriverError<HAL::Error>> {
        self.hal
            .deassert_chip_enable()
            .map_err(DriverError::Hardware)?;
        self.signal.disarm_receive();
        if self.arbiter.is_engaged() {
            self.write(Register::FlushTx, &[])
                .map_err(DriverError::Hardware)?;
            self.signal.clear_tx();
        }
        self.write_mode(self.mode.as_tx())
            .map_err(DriverError::Hardware)?;
        self.arbiter.standby();
        Ok(())
    }

    /// Like [`Transceiver::standby()`], but also powers the radio down.
    ///
    /// The next operation powers it up again.
    pub fn sleep(&mut self) -> Result<(), DriverError<HAL::Error>> {
        self.standby()?;
        self.write_mode(self.mode.with_powered(false))
            .map_err(DriverError::Hardware)
    }

    /// Hand the radio's frame to the air.
    fn pulse_chip_enable(&mut self) -> Result<(), HAL::Error> {
        self.hal.assert_chip_enable()?;
        self.delay.delay_us(CE_PULSE_US);
        Ok(())
    }
}
