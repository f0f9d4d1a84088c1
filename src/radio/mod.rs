//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod address;
pub use address::{AddressTable, AddressTarget, MAX_ADDRESS_WIDTH, MIN_ADDRESS_WIDTH, PIPE_COUNT};

mod arbiter;
pub use arbiter::{AckStep, ChannelArbiter};

mod config;
pub use config::{RadioConfig, MAX_CHANNEL, MAX_RETRY_SETTING};

mod driver;
pub use driver::Transceiver;

mod error;
pub use error::{
    ChannelBusy, ConfigError, DriverError, FrameError, InitError, RxError, TxError,
};

mod frame;
pub use frame::{Frame, FrameCodec, MAX_PAYLOAD_SIZE};

mod register;
pub use register::{Mode, Register, RfSetup};

mod signal;
pub use signal::CompletionSignal;

pub mod nrf24;
