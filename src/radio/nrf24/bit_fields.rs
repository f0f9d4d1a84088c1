use bitfield_struct::bitfield;

use super::mnemonics;
use crate::{
    radio::register::{Mode, RfSetup},
    types::{CrcLength, DataRate, PaLevel},
};

/// The CONFIG register.
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    /// Must be 0 on a working radio.
    pub reserved: bool,

    pub mask_rx_dr: bool,

    pub mask_tx_ds: bool,

    pub mask_max_rt: bool,

    pub en_crc: bool,

    /// 2 byte CRC (1 byte if `false`).
    pub crco: bool,

    pub pwr_up: bool,

    pub prim_rx: bool,
}

impl Config {
    /// Translate a logical [`Mode`]. All IRQ events stay enabled.
    pub fn from_mode(mode: Mode) -> Self {
        let crc = mode.crc_length();
        Self::new()
            .with_en_crc(crc != CrcLength::Disabled)
            .with_crco(crc == CrcLength::Bit16)
            .with_pwr_up(mode.powered())
            .with_prim_rx(mode.rx())
    }

    /// Translate back to a logical [`Mode`] byte.
    ///
    /// A set reserved bit means the SPI bus is not driven (reads all ones), so
    /// `0xFF` is passed through.
    pub fn into_mode_bits(self) -> u8 {
        if self.reserved() {
            return 0xFF;
        }
        let crc = match (self.en_crc(), self.crco()) {
            (false, _) => CrcLength::Disabled,
            (true, false) => CrcLength::Bit8,
            (true, true) => CrcLength::Bit16,
        };
        Mode::new()
            .with_crc_length(crc)
            .with_powered(self.pwr_up())
            .with_rx(self.prim_rx())
            .into_bits()
    }
}

/// The STATUS byte (clocked out with every SPI transaction).
#[bitfield(u8, order = Msb)]
pub(crate) struct Status {
    #[bits(1)]
    _padding: u8,

    /// RX Data Ready.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// Maximum number of retransmits reached.
    #[bits(1, access = RO)]
    pub max_rt: bool,

    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    #[bits(1, access = RO)]
    pub tx_full: bool,
}

impl Status {
    /// A mask to isolate only the IRQ flags.
    pub const IRQ_MASK: u8 = mnemonics::MASK_RX_DR | mnemonics::MASK_TX_DS | mnemonics::MASK_MAX_RT;

    /// The IRQ flags that are set (to clear them by writing them back).
    pub const fn irq_flags(&self) -> u8 {
        self.into_bits() & Self::IRQ_MASK
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4)]
    pub arc: u8,
}

/// The RF_SETUP register.
#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetupReg {
    pub cont_wave: bool,

    #[bits(1)]
    _padding: u8,

    pub rf_dr_low: bool,

    pub pll_lock: bool,

    pub rf_dr_high: bool,

    #[bits(2)]
    pub rf_pwr: u8,

    pub lna_hcurr: bool,
}

impl RfSetupReg {
    pub fn from_setup(setup: RfSetup) -> Self {
        let (low, high) = match setup.data_rate() {
            DataRate::Mbps1 => (false, false),
            DataRate::Mbps2 => (false, true),
            DataRate::Kbps250 => (true, false),
        };
        Self::new()
            .with_rf_dr_low(low)
            .with_rf_dr_high(high)
            .with_rf_pwr(setup.pa_level().into_bits())
            .with_lna_hcurr(setup.lna_enable())
    }

    pub fn into_setup_bits(self) -> u8 {
        let data_rate = match (self.rf_dr_low(), self.rf_dr_high()) {
            (true, _) => DataRate::Kbps250,
            (false, true) => DataRate::Mbps2,
            (false, false) => DataRate::Mbps1,
        };
        RfSetup::new()
            .with_data_rate(data_rate)
            .with_pa_level(PaLevel::from_bits(self.rf_pwr()))
            .with_lna_enable(self.lna_hcurr())
            .into_bits()
    }
}
