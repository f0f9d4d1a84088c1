use super::{
    address::{MAX_ADDRESS_WIDTH, MIN_ADDRESS_WIDTH},
    error::ConfigError,
    frame::MAX_PAYLOAD_SIZE,
    register::{Mode, RfSetup},
};
use crate::types::{CrcLength, DataRate, PaLevel};

/// The highest channel a radio can tune to.
pub const MAX_CHANNEL: u8 = 125;
/// The highest value accepted for the retry count and the retry delay.
pub const MAX_RETRY_SETTING: u8 = 15;

/// An object to configure the radio at
/// [`Transceiver::begin()`](fn@crate::radio::Transceiver::begin).
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use txrx::radio::RadioConfig;
///
/// let config = RadioConfig::default().with_channel(42).with_retry_count(5);
/// assert_eq!(config.channel(), 42);
/// assert!(config.validate().is_ok());
/// ```
///
/// Values are not clamped. Out-of-range values are rejected by
/// [`RadioConfig::validate()`], which `begin()` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadioConfig {
    pub(crate) mode: Mode,
    pub(crate) rf_setup: RfSetup,
    address_width: u8,
    auto_ack: bool,
    retry_count: u8,
    retry_delay: u8,
    channel: u8,
    payload_length: u8,
    dynamic_payloads: bool,
    tx_poll_interval_us: u32,
    tx_poll_limit: u16,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `76` |
    /// | [`RadioConfig::address_width()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps1`] |
    /// | [`RadioConfig::payload_length()`] | `32` |
    /// | [`RadioConfig::dynamic_payloads()`] | `true` |
    /// | [`RadioConfig::auto_ack()`] | `true` |
    /// | [`RadioConfig::retry_count()`] | `15` |
    /// | [`RadioConfig::retry_delay()`] | `5` |
    /// | [`RadioConfig::tx_poll_interval_us()`] | `100` |
    /// | [`RadioConfig::tx_poll_limit()`] | `200` |
    fn default() -> Self {
        Self {
            // 16 bit CRC, powered down as TX
            mode: Mode::new(),
            // 1 Mbps, max PA level, LNA enabled
            rf_setup: RfSetup::new(),
            address_width: MAX_ADDRESS_WIDTH,
            auto_ack: true,
            retry_count: 15,
            // 5 * 250 + 250 = 1500 us between attempts
            retry_delay: 5,
            channel: 76,
            payload_length: MAX_PAYLOAD_SIZE,
            dynamic_payloads: true,
            tx_poll_interval_us: 100,
            tx_poll_limit: 200,
        }
    }
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.mode.crc_length()
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self {
            mode: self.mode.with_crc_length(length),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.rf_setup.data_rate()
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self {
            rf_setup: self.rf_setup.with_data_rate(data_rate),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.rf_setup.pa_level()
    }

    /// The Power Amplitude (PA) level.
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        Self {
            rf_setup: self.rf_setup.with_pa_level(level),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_lna_enable()`].
    pub const fn lna_enable(&self) -> bool {
        self.rf_setup.lna_enable()
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) feature.
    ///
    /// This value may not be respected depending on the radio module used.
    pub fn with_lna_enable(self, enable: bool) -> Self {
        Self {
            rf_setup: self.rf_setup.with_lna_enable(enable),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_address_width()`].
    pub const fn address_width(&self) -> u8 {
        self.address_width
    }

    /// The width (in bytes) of all addresses. Must be in range [3, 5].
    pub fn with_address_width(self, width: u8) -> Self {
        Self {
            address_width: width,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the channel (over the air frequency). Must be in range [0, 125].
    ///
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_auto_ack()`].
    pub const fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    /// Enable or disable hardware acknowledgment (for all pipes).
    ///
    /// Without it, a transmission succeeds as soon as the frame left the radio.
    pub fn with_auto_ack(self, enable: bool) -> Self {
        Self {
            auto_ack: enable,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_retry_count()`].
    pub const fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// How many attempts a frame gets before the transmission counts as
    /// unacknowledged. Must be in range [0, 15].
    ///
    /// A count of 0 still allows a single attempt.
    pub fn with_retry_count(self, count: u8) -> Self {
        Self {
            retry_count: count,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_retry_delay()`].
    pub const fn retry_delay(&self) -> u8 {
        self.retry_delay
    }

    /// The wait before declaring an attempt unacknowledged. Must be in range [0, 15].
    ///
    /// ```text
    /// delay (in microseconds) = value * 250 + 250
    /// ```
    pub fn with_retry_delay(self, delay: u8) -> Self {
        Self {
            retry_delay: delay,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_payload_length()`].
    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// The static payload length. Must be in range [1, 32].
    ///
    /// Ignored while dynamic payloads are enabled.
    pub fn with_payload_length(self, length: u8) -> Self {
        Self {
            payload_length: length,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_dynamic_payloads()`].
    pub const fn dynamic_payloads(&self) -> bool {
        self.dynamic_payloads
    }

    /// Let each frame carry its own length (up to 32 bytes).
    pub fn with_dynamic_payloads(self, enable: bool) -> Self {
        Self {
            dynamic_payloads: enable,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_tx_poll_interval_us()`].
    pub const fn tx_poll_interval_us(&self) -> u32 {
        self.tx_poll_interval_us
    }

    /// The delay between polls of a blocking
    /// [`Transceiver::transmit()`](fn@crate::radio::Transceiver::transmit).
    pub fn with_tx_poll_interval_us(self, micros: u32) -> Self {
        Self {
            tx_poll_interval_us: micros,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_tx_poll_limit()`].
    pub const fn tx_poll_limit(&self) -> u16 {
        self.tx_poll_limit
    }

    /// The number of polls (per attempt) after which a blocking
    /// [`Transceiver::transmit()`](fn@crate::radio::Transceiver::transmit)
    /// gives up with [`TxError::Timeout`](crate::radio::TxError::Timeout).
    ///
    /// Must not be zero.
    pub fn with_tx_poll_limit(self, polls: u16) -> Self {
        Self {
            tx_poll_limit: polls,
            ..self
        }
    }

    /// Check every value against its supported range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ADDRESS_WIDTH..=MAX_ADDRESS_WIDTH).contains(&self.address_width) {
            return Err(ConfigError::AddressWidth(self.address_width));
        }
        if self.retry_count > MAX_RETRY_SETTING {
            return Err(ConfigError::RetryCount(self.retry_count));
        }
        if self.retry_delay > MAX_RETRY_SETTING {
            return Err(ConfigError::RetryDelay(self.retry_delay));
        }
        if self.channel > MAX_CHANNEL {
            return Err(ConfigError::Channel(self.channel));
        }
        if !(1..=MAX_PAYLOAD_SIZE).contains(&self.payload_length) {
            return Err(ConfigError::PayloadLength(self.payload_length));
        }
        if self.tx_poll_limit == 0 {
            return Err(ConfigError::PollLimit);
        }
        Ok(())
    }
}
