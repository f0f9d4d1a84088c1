#![doc = include_str!("../README.md")]
//!
//! ## Basic API
//!
//! - [`Transceiver::new()`](fn@crate::radio::Transceiver::new)
//! - [`Transceiver::begin()`](fn@crate::radio::Transceiver::begin)
//! - [`Transceiver::configure_address()`](fn@crate::radio::Transceiver::configure_address)
//! - [`Transceiver::transmit()`](fn@crate::radio::Transceiver::transmit)
//! - [`Transceiver::start_receive()`](fn@crate::radio::Transceiver::start_receive)
//! - [`Transceiver::read_data()`](fn@crate::radio::Transceiver::read_data)
//! - [`Transceiver::read_frame()`](fn@crate::radio::Transceiver::read_frame)
//! - [`Transceiver::standby()`](fn@crate::radio::Transceiver::standby)
//! - [`CompletionSignal::on_hardware_event()`](fn@crate::radio::CompletionSignal::on_hardware_event)
//! - [`CompletionSignal::is_sent()`](fn@crate::radio::CompletionSignal::is_sent)
//! - [`CompletionSignal::is_received()`](fn@crate::radio::CompletionSignal::is_received)
//!
//! ## Advanced API
//!
//! - [`Transceiver::start_transmit()`](fn@crate::radio::Transceiver::start_transmit)
//! - [`Transceiver::poll_transmit()`](fn@crate::radio::Transceiver::poll_transmit)
//! - [`Transceiver::finish_transmit()`](fn@crate::radio::Transceiver::finish_transmit)
//! - [`Transceiver::packet_length()`](fn@crate::radio::Transceiver::packet_length)
//! - [`Transceiver::service_irq()`](fn@crate::radio::Transceiver::service_irq)
//! - [`Transceiver::disable_pipe()`](fn@crate::radio::Transceiver::disable_pipe)
//! - [`Transceiver::sleep()`](fn@crate::radio::Transceiver::sleep)
//! - [`Transceiver::state()`](fn@crate::radio::Transceiver::state)
//! - [`Transceiver::release()`](fn@crate::radio::Transceiver::release)
//! - [`CompletionSignal::overruns()`](fn@crate::radio::CompletionSignal::overruns)
//! - [`Nrf24Hal::dispatch_irq()`](fn@crate::radio::nrf24::Nrf24Hal::dispatch_irq)
//!
//! ## Configuration API
//!
//! - [`RadioConfig::default()`](struct@crate::radio::RadioConfig)
//! - [`RadioConfig::with_channel()`](fn@crate::radio::RadioConfig::with_channel)
//! - [`RadioConfig::with_data_rate()`](fn@crate::radio::RadioConfig::with_data_rate)
//! - [`RadioConfig::with_pa_level()`](fn@crate::radio::RadioConfig::with_pa_level)
//! - [`RadioConfig::with_crc_length()`](fn@crate::radio::RadioConfig::with_crc_length)
//! - [`RadioConfig::with_address_width()`](fn@crate::radio::RadioConfig::with_address_width)
//! - [`RadioConfig::with_auto_ack()`](fn@crate::radio::RadioConfig::with_auto_ack)
//! - [`RadioConfig::with_retry_count()`](fn@crate::radio::RadioConfig::with_retry_count)
//! - [`RadioConfig::with_retry_delay()`](fn@crate::radio::RadioConfig::with_retry_delay)
//! - [`RadioConfig::with_payload_length()`](fn@crate::radio::RadioConfig::with_payload_length)
//! - [`RadioConfig::with_dynamic_payloads()`](fn@crate::radio::RadioConfig::with_dynamic_payloads)
//! - [`RadioConfig::with_tx_poll_interval_us()`](fn@crate::radio::RadioConfig::with_tx_poll_interval_us)
//! - [`RadioConfig::with_tx_poll_limit()`](fn@crate::radio::RadioConfig::with_tx_poll_limit)
//!
#![no_std]

mod log;
mod types;
pub use types::{CrcLength, DataRate, HardwareEvent, PaLevel, TransceiverState, TxOutcome};
pub mod radio;
