//! A [`RadioHal`] implementation for the nRF24L01 transceiver (and its clones).
//!
//! The chip's own auto-retransmit count is always programmed as zero, because
//! the [`Transceiver`](struct@crate::radio::Transceiver) counts retries itself.
//! Only the retry delay (the time to wait for an ACK) is forwarded.
use embedded_hal::{digital::OutputPin, spi::SpiDevice};

pub(crate) mod bit_fields;
mod constants;
use bit_fields::{Config, RfSetupReg, SetupRetry, Status};
pub use constants::{commands, mnemonics, registers};

use super::{
    frame::MAX_PAYLOAD_SIZE,
    prelude::{Mode, RadioHal, Register, RfSetup},
    signal::CompletionSignal,
};
use crate::{
    log::{trace, warn},
    types::HardwareEvent,
};

/// An collection of error types to describe hardware malfunctions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
}

/// This struct implements [`RadioHal`] for the nRF24L01 transceiver.
pub struct Nrf24Hal<SPI, DO> {
    _spi: SPI,
    /// The CE pin for the radio.
    ///
    /// It is strongly recommended to only drive this through
    /// [`RadioHal::assert_chip_enable()`] and [`RadioHal::deassert_chip_enable()`].
    pub ce_pin: DO,
    _buf: [u8; 33],
    _status: Status,
    _dynamic_payloads: bool,
    _payload_length: u8,
}

impl<SPI, DO> Nrf24Hal<SPI, DO>
where
    SPI: SpiDevice,
    DO: OutputPin,
{
    /// Instantiate a [`Nrf24Hal`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    pub fn new(ce_pin: DO, spi: SPI) -> Nrf24Hal<SPI, DO> {
        Nrf24Hal {
            _spi: spi,
            ce_pin,
            _buf: [0u8; 33],
            _status: Status::from_bits(0),
            _dynamic_payloads: false,
            _payload_length: MAX_PAYLOAD_SIZE,
        }
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = Status::from_bits(self._buf[0]);
        Ok(())
    }

    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..(len as usize + 1)].fill(0);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        command: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    /// Write `buf` after a raw `command` byte (no [`commands::W_REGISTER`] is added).
    fn spi_command_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let buf_len = buf.len().min(MAX_PAYLOAD_SIZE as usize);
        self._buf[0] = command;
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    fn spi_write_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_command_buf(command | commands::W_REGISTER, buf)
    }

    /// Handle the radio's IRQ.
    ///
    /// Call this from the interrupt handler of the pin connected to the
    /// radio's IRQ pin. Once the [`Nrf24Hal`] is owned by a
    /// [`Transceiver`](struct@crate::radio::Transceiver), the driver calls it
    /// on its own (see [`RadioHal::service_events()`]) and the interrupt
    /// handler can use
    /// [`Transceiver::service_irq()`](fn@crate::radio::Transceiver::service_irq)
    /// instead. It reads the STATUS byte, copies an arrived payload,
    /// clears the handled events, and reports them through the given `signal`.
    ///
    /// A payload whose reported width exceeds 32 bytes is flushed (as the
    /// datasheet requires) and not reported.
    pub fn dispatch_irq(
        &mut self,
        signal: &CompletionSignal,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(0, commands::NOP)?;
        let status = self._status;
        trace!("IRQ status 0x{=u8:X}", status.into_bits());
        if status.rx_dr() {
            let width = if self._dynamic_payloads {
                self.spi_read(1, commands::R_RX_PL_WID)?;
                self._buf[1]
            } else {
                self._payload_length
            };
            if width > MAX_PAYLOAD_SIZE {
                warn!("flushing an RX payload of width {=u8}", width);
                self.spi_read(0, commands::FLUSH_RX)?;
            } else {
                self.spi_read(width, commands::R_RX_PAYLOAD)?;
                signal.on_hardware_event(HardwareEvent::PacketReceived(
                    &self._buf[1..(width as usize + 1)],
                ));
            }
        }
        if status.irq_flags() != 0 {
            self.spi_write_byte(registers::STATUS, status.irq_flags())?;
        }
        if status.tx_ds() {
            signal.on_hardware_event(HardwareEvent::PacketSent);
        }
        if status.max_rt() {
            signal.on_hardware_event(HardwareEvent::AckTimeout);
        }
        Ok(())
    }

    /// The offset of a logical register that maps onto a single chip register.
    const fn register_offset(register: Register) -> Option<u8> {
        match register {
            Register::Mode => Some(registers::CONFIG),
            Register::AddressWidth => Some(registers::SETUP_AW),
            Register::TxAddress => Some(registers::TX_ADDR),
            Register::RxAddress(pipe) if pipe < 6 => Some(registers::RX_ADDR_P0 + pipe),
            Register::PipeEnable => Some(registers::EN_RXADDR),
            Register::AutoAck => Some(registers::EN_AA),
            Register::AutoRetry => Some(registers::SETUP_RETR),
            Register::Channel => Some(registers::RF_CH),
            Register::RfSetup => Some(registers::RF_SETUP),
            Register::PayloadLength(pipe) if pipe < 6 => Some(registers::RX_PW_P0 + pipe),
            Register::DynamicPayloads => Some(registers::FEATURE),
            _ => None,
        }
    }
}

impl<SPI, DO> RadioHal for Nrf24Hal<SPI, DO>
where
    SPI: SpiDevice,
    DO: OutputPin,
{
    type Error = Nrf24Error<SPI::Error, DO::Error>;

    fn write_register(&mut self, register: Register, data: &[u8]) -> Result<(), Self::Error> {
        let byte = data.first().copied().unwrap_or_default();
        match register {
            Register::Mode => self.spi_write_byte(
                registers::CONFIG,
                Config::from_mode(Mode::from_bits(byte)).into_bits(),
            ),
            Register::AddressWidth => self.spi_write_byte(registers::SETUP_AW, byte.clamp(3, 5) - 2),
            Register::TxAddress => self.spi_write_buf(registers::TX_ADDR, data),
            // pipes 2 - 5 only store the LSByte; the rest is borrowed from pipe 1
            Register::RxAddress(pipe @ 0..=1) => {
                self.spi_write_buf(registers::RX_ADDR_P0 + pipe, data)
            }
            Register::RxAddress(pipe @ 2..=5) => {
                self.spi_write_byte(registers::RX_ADDR_P0 + pipe, byte)
            }
            Register::PipeEnable => self.spi_write_byte(registers::EN_RXADDR, byte & 0x3F),
            Register::AutoAck => self.spi_write_byte(registers::EN_AA, byte & 0x3F),
            Register::AutoRetry => {
                let retries = SetupRetry::new().with_ard(byte.min(15)).with_arc(0);
                self.spi_write_byte(registers::SETUP_RETR, retries.into_bits())
            }
            Register::Channel => self.spi_write_byte(registers::RF_CH, byte.min(125)),
            Register::RfSetup => self.spi_write_byte(
                registers::RF_SETUP,
                RfSetupReg::from_setup(RfSetup::from_bits(byte)).into_bits(),
            ),
            Register::PayloadLength(pipe @ 0..=5) => {
                let len = byte.clamp(1, MAX_PAYLOAD_SIZE);
                self._payload_length = len;
                self.spi_write_byte(registers::RX_PW_P0 + pipe, len)
            }
            Register::DynamicPayloads => {
                let enable = byte != 0;
                self._dynamic_payloads = enable;
                self.spi_write_byte(registers::FEATURE, mnemonics::EN_DPL * enable as u8)?;
                self.spi_write_byte(registers::DYNPD, 0x3F * enable as u8)
            }
            Register::TxPayload => self.spi_command_buf(commands::W_TX_PAYLOAD, data),
            Register::FlushTx => self.spi_read(0, commands::FLUSH_TX),
            Register::FlushRx => self.spi_read(0, commands::FLUSH_RX),
            Register::ReuseTxPayload => self.spi_read(0, commands::REUSE_TX_PL),
            Register::ClearEvents => self.spi_write_byte(registers::STATUS, Status::IRQ_MASK),
            // read-only (or out of range)
            _ => Ok(()),
        }
    }

    fn read_register(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Self::Error> {
        let len = buf.len().min(MAX_PAYLOAD_SIZE as usize);
        let command = match register {
            Register::RxPayload => commands::R_RX_PAYLOAD,
            Register::RxPayloadLength => commands::R_RX_PL_WID,
            _ => match Self::register_offset(register) {
                Some(offset) => offset,
                None => {
                    // commands have nothing to read
                    buf.fill(0);
                    return Ok(());
                }
            },
        };
        self.spi_read(len as u8, command)?;
        buf[..len].copy_from_slice(&self._buf[1..(len + 1)]);
        let Some(first) = buf.first_mut() else {
            return Ok(());
        };
        match register {
            Register::Mode => *first = Config::from_bits(*first).into_mode_bits(),
            Register::AddressWidth => *first += 2,
            Register::RfSetup => *first = RfSetupReg::from_bits(*first).into_setup_bits(),
            Register::DynamicPayloads => *first = (*first & mnemonics::EN_DPL != 0) as u8,
            Register::AutoRetry => {
                let retries = SetupRetry::from_bits(*first);
                *first = retries.ard();
                if let Some(count) = buf.get_mut(1) {
                    *count = retries.arc();
                }
            }
            _ => (),
        }
        Ok(())
    }

    fn assert_chip_enable(&mut self) -> Result<(), Self::Error> {
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)
    }

    fn deassert_chip_enable(&mut self) -> Result<(), Self::Error> {
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)
    }

    /// Polls the STATUS byte through [`Nrf24Hal::dispatch_irq()`].
    fn service_events(&mut self, signal: &CompletionSignal) -> Result<(), Self::Error> {
        self.dispatch_irq(signal)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers};
    use crate::{
        radio::{prelude::*, CompletionSignal},
        spi_test_expects,
        test::mk_hal,
        types::{CrcLength, DataRate, PaLevel},
    };
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::vec;

    #[test]
    fn write_mode() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x0Eu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x03u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mode = Mode::new().as_tx();
        hal.write_register(Register::Mode, &[mode.into_bits()])
            .unwrap();
        let mode = mode.with_crc_length(CrcLength::Disabled).as_rx();
        hal.write_register(Register::Mode, &[mode.into_bits()])
            .unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn read_mode() {
        let spi_expectations = spi_test_expects![
            (vec![registers::CONFIG, 0u8], vec![0xEu8, 0x0Eu8]),
            // floating MISO
            (vec![registers::CONFIG, 0u8], vec![0xFFu8, 0xFFu8]),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut buf = [0u8];
        hal.read_register(Register::Mode, &mut buf).unwrap();
        assert_eq!(buf[0], Mode::new().as_tx().into_bits());
        hal.read_register(Register::Mode, &mut buf).unwrap();
        assert_eq!(buf[0], 0xFF);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn write_config_registers() {
        let spi_expectations = spi_test_expects![
            // address width of 5 bytes
            (
                vec![registers::SETUP_AW | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
            // only the delay is forwarded
            (
                vec![registers::SETUP_RETR | commands::W_REGISTER, 0x50u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RF_CH | commands::W_REGISTER, 125u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RF_SETUP | commands::W_REGISTER, 0x22u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::FEATURE | commands::W_REGISTER, 4u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0x3Fu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![(registers::RX_PW_P0 + 3) | commands::W_REGISTER, 32u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.write_register(Register::AddressWidth, &[5]).unwrap();
        hal.write_register(Register::AutoRetry, &[5, 15]).unwrap();
        hal.write_register(Register::Channel, &[200]).unwrap();
        let setup = RfSetup::new()
            .with_data_rate(DataRate::Kbps250)
            .with_pa_level(PaLevel::Low)
            .with_lna_enable(false);
        hal.write_register(Register::RfSetup, &[setup.into_bits()])
            .unwrap();
        hal.write_register(Register::DynamicPayloads, &[1]).unwrap();
        hal.write_register(Register::PayloadLength(3), &[40])
            .unwrap();
        hal.write_register(Register::ClearEvents, &[]).unwrap();
        // read-only registers are ignored
        hal.write_register(Register::RxPayload, &[1, 2, 3]).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn write_addresses() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::TX_ADDR | commands::W_REGISTER, 0x31, 0x4E, 0x6F, 0x64, 0x65],
                vec![0xEu8, 0, 0, 0, 0, 0],
            ),
            (
                vec![(registers::RX_ADDR_P0 + 1) | commands::W_REGISTER, 0x32, 0x4E, 0x6F],
                vec![0xEu8, 0, 0, 0],
            ),
            (
                vec![(registers::RX_ADDR_P0 + 4) | commands::W_REGISTER, 0x34u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0x12u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.write_register(Register::TxAddress, b"1Node").unwrap();
        hal.write_register(Register::RxAddress(1), b"2No").unwrap();
        hal.write_register(Register::RxAddress(4), b"4No").unwrap();
        hal.write_register(Register::PipeEnable, &[0x12]).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn payload_commands() {
        let mut expected = vec![commands::W_TX_PAYLOAD];
        expected.extend_from_slice(b"Hello");
        let spi_expectations = spi_test_expects![
            (expected, vec![0xEu8, 0, 0, 0, 0, 0]),
            (vec![commands::REUSE_TX_PL], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::R_RX_PL_WID, 0u8], vec![0xEu8, 3u8]),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.write_register(Register::TxPayload, b"Hello").unwrap();
        hal.write_register(Register::ReuseTxPayload, &[]).unwrap();
        hal.write_register(Register::FlushTx, &[]).unwrap();
        hal.write_register(Register::FlushRx, &[]).unwrap();
        let mut len = [0u8];
        hal.read_register(Register::RxPayloadLength, &mut len)
            .unwrap();
        assert_eq!(len[0], 3);
        // commands have nothing to read
        let mut buf = [0xAAu8; 2];
        hal.read_register(Register::FlushTx, &mut buf).unwrap();
        assert_eq!(buf, [0u8; 2]);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn read_config_registers() {
        let spi_expectations = spi_test_expects![
            (vec![registers::SETUP_AW, 0u8], vec![0xEu8, 1u8]),
            (vec![registers::SETUP_RETR, 0u8], vec![0xEu8, 0x5Fu8]),
            (vec![registers::RF_SETUP, 0u8], vec![0xEu8, 0x07u8]),
            (vec![registers::FEATURE, 0u8], vec![0xEu8, 0x04u8]),
            (vec![registers::RX_ADDR_P0, 0u8, 0u8, 0u8], vec![0xEu8, 1u8, 2u8, 3u8]),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut byte = [0u8];
        hal.read_register(Register::AddressWidth, &mut byte).unwrap();
        assert_eq!(byte[0], 3);
        let mut retries = [0u8; 2];
        hal.read_register(Register::AutoRetry, &mut retries).unwrap();
        assert_eq!(retries, [5, 15]);
        hal.read_register(Register::RfSetup, &mut byte).unwrap();
        assert_eq!(byte[0], RfSetup::new().into_bits());
        hal.read_register(Register::DynamicPayloads, &mut byte)
            .unwrap();
        assert_eq!(byte[0], 1);
        let mut address = [0u8; 3];
        hal.read_register(Register::RxAddress(0), &mut address)
            .unwrap();
        assert_eq!(address, [1, 2, 3]);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn chip_enable() {
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mocks = mk_hal(&ce_expectations, &[]);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.assert_chip_enable().unwrap();
        hal.deassert_chip_enable().unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn irq_dynamic_payload() {
        let spi_expectations = spi_test_expects![
            // enable dynamic payloads
            (
                vec![registers::FEATURE | commands::W_REGISTER, 4u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0x3Fu8],
                vec![0xEu8, 0u8],
            ),
            // RX_DR on pipe 1
            (vec![commands::NOP], vec![0x42u8]),
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x42u8, 4u8]),
            (
                vec![commands::R_RX_PAYLOAD, 0u8, 0u8, 0u8, 0u8],
                vec![0x42u8, 0x70u8, 0x69u8, 0x6Eu8, 0x67u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x42u8, 0u8],
            ),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.write_register(Register::DynamicPayloads, &[1]).unwrap();
        let signal = CompletionSignal::new();
        signal.arm_receive();
        hal.dispatch_irq(&signal).unwrap();
        assert!(signal.is_received());
        assert!(!signal.is_sent());
        assert_eq!(signal.pending_length(), Some(4));
        let payload = signal.peek_frame(|raw, len| raw[..len as usize].to_vec());
        assert_eq!(payload, Some(b"ping".to_vec()));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn irq_static_payload() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::RX_PW_P0 | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::NOP], vec![0x40u8]),
            (
                vec![commands::R_RX_PAYLOAD, 0u8, 0u8],
                vec![0x40u8, 0xABu8, 0xCDu8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x40u8, 0u8],
            ),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.write_register(Register::PayloadLength(0), &[2]).unwrap();
        let signal = CompletionSignal::new();
        signal.arm_receive();
        hal.dispatch_irq(&signal).unwrap();
        assert_eq!(signal.pending_length(), Some(2));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn irq_oversized_payload_is_flushed() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::FEATURE | commands::W_REGISTER, 4u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0x3Fu8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::NOP], vec![0x40u8]),
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x40u8, 33u8]),
            (vec![commands::FLUSH_RX], vec![0x40u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x40u8, 0u8],
            ),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        hal.write_register(Register::DynamicPayloads, &[1]).unwrap();
        let signal = CompletionSignal::new();
        signal.arm_receive();
        hal.dispatch_irq(&signal).unwrap();
        assert!(!signal.is_received());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn irq_tx_events() {
        let spi_expectations = spi_test_expects![
            // TX_DS
            (vec![commands::NOP], vec![0x2Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
            // MAX_RT
            (vec![commands::NOP], vec![0x1Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Eu8, 0u8],
            ),
            // spurious
            (vec![commands::NOP], vec![0x0Eu8]),
        ];
        let mocks = mk_hal(&[], &spi_expectations);
        let (mut hal, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let signal = CompletionSignal::new();
        hal.dispatch_irq(&signal).unwrap();
        assert_eq!(
            signal.take_tx_event(),
            Some(crate::radio::signal::TxEvent::Sent)
        );
        hal.dispatch_irq(&signal).unwrap();
        assert_eq!(
            signal.take_tx_event(),
            Some(crate::radio::signal::TxEvent::AckTimeout)
        );
        hal.dispatch_irq(&signal).unwrap();
        assert!(!signal.is_sent());
        spi.done();
        ce_pin.done();
    }
}
