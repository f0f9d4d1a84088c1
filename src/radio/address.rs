use super::error::ConfigError;

/// The number of receive pipes a radio exposes.
pub const PIPE_COUNT: u8 = 6;
/// The narrowest supported address (in bytes).
pub const MIN_ADDRESS_WIDTH: u8 = 3;
/// The widest supported address (in bytes).
pub const MAX_ADDRESS_WIDTH: u8 = 5;

/// Which address [`Transceiver::configure_address()`](fn@crate::radio::Transceiver::configure_address) sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressTarget {
    /// The address frames are sent to.
    Transmit,
    /// The address a receive pipe listens on.
    Receive(u8),
}

/// The transmit address and the receive pipes' addresses.
///
/// All addresses share one width. The width may only change while the table
/// still holds its default addresses; once an address is set explicitly the
/// width is locked.
///
/// ## Default configuration
///
/// | pipe | state  | address     |
/// |------|--------|-------------|
/// | TX   | -      | `[0xE7; 5]` |
/// | 0    | closed | `[0xE7; 5]` |
/// | 1    | open   | `[0xC2; 5]` |
/// | 2    | closed | `0xC3` + 4 bytes of pipe 1 |
/// | 3    | closed | `0xC4` + 4 bytes of pipe 1 |
/// | 4    | closed | `0xC5` + 4 bytes of pipe 1 |
/// | 5    | closed | `0xC6` + 4 bytes of pipe 1 |
///
/// Default addresses narrower than 5 bytes use the leading bytes of the above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTable {
    width: u8,
    tx: [u8; MAX_ADDRESS_WIDTH as usize],
    rx: [[u8; MAX_ADDRESS_WIDTH as usize]; PIPE_COUNT as usize],
    enabled: u8,
    locked: bool,
}

impl Default for AddressTable {
    fn default() -> Self {
        let mut rx = [[0xC2; MAX_ADDRESS_WIDTH as usize]; PIPE_COUNT as usize];
        rx[0] = [0xE7; MAX_ADDRESS_WIDTH as usize];
        for (pipe, address) in rx.iter_mut().enumerate().skip(2) {
            address[0] = 0xC1 + pipe as u8;
        }
        Self {
            width: MAX_ADDRESS_WIDTH,
            tx: [0xE7; MAX_ADDRESS_WIDTH as usize],
            rx,
            enabled: 1 << 1,
            locked: false,
        }
    }
}

impl AddressTable {
    /// A table of default addresses with the given `width`.
    pub fn new(width: u8) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        table.set_address_width(width)?;
        Ok(table)
    }

    pub const fn address_width(&self) -> u8 {
        self.width
    }

    /// Has any address been set explicitly?
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Change the width used by all addresses.
    ///
    /// Fails if `width` is outside [3, 5], or if an address was already set.
    pub fn set_address_width(&mut self, width: u8) -> Result<(), ConfigError> {
        if !(MIN_ADDRESS_WIDTH..=MAX_ADDRESS_WIDTH).contains(&width) {
            return Err(ConfigError::AddressWidth(width));
        }
        if self.locked && width != self.width {
            return Err(ConfigError::AddressWidthLocked);
        }
        self.width = width;
        Ok(())
    }

    fn check_length(&self, address: &[u8]) -> Result<(), ConfigError> {
        if address.len() != self.width as usize {
            return Err(ConfigError::AddressLength {
                expected: self.width,
                actual: address.len(),
            });
        }
        Ok(())
    }

    fn check_pipe(pipe: u8) -> Result<(), ConfigError> {
        if pipe >= PIPE_COUNT {
            return Err(ConfigError::PipeIndex(pipe));
        }
        Ok(())
    }

    /// Set the address used for transmissions.
    ///
    /// During a transmission, pipe 0 is borrowed to receive the auto-ack
    /// packet at this same address.
    pub fn set_transmit_address(&mut self, address: &[u8]) -> Result<(), ConfigError> {
        self.check_length(address)?;
        self.tx[..address.len()].copy_from_slice(address);
        self.locked = true;
        Ok(())
    }

    /// Set the address of a receive `pipe` and enable it.
    pub fn set_receive_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), ConfigError> {
        Self::check_pipe(pipe)?;
        self.check_length(address)?;
        self.rx[pipe as usize][..address.len()].copy_from_slice(address);
        self.enabled |= 1 << pipe;
        self.locked = true;
        Ok(())
    }

    /// Stop a `pipe` from receiving. Its address is kept.
    pub fn disable_pipe(&mut self, pipe: u8) -> Result<(), ConfigError> {
        Self::check_pipe(pipe)?;
        self.enabled &= !(1 << pipe);
        Ok(())
    }

    pub fn transmit_address(&self) -> &[u8] {
        &self.tx[..self.width as usize]
    }

    /// The address of a receive `pipe`, or `None` if `pipe` is out of range.
    pub fn receive_address(&self, pipe: u8) -> Option<&[u8]> {
        self.rx
            .get(pipe as usize)
            .map(|address| &address[..self.width as usize])
    }

    pub fn is_enabled(&self, pipe: u8) -> bool {
        pipe < PIPE_COUNT && self.enabled & (1 << pipe) != 0
    }

    /// One bit per pipe; bit 0 is pipe 0.
    pub const fn enabled_mask(&self) -> u8 {
        self.enabled
    }
}

#[cfg(test)]
mod test {
    use super::{AddressTable, PIPE_COUNT};
    use crate::radio::ConfigError;

    #[test]
    fn defaults() {
        let table = AddressTable::default();
        assert_eq!(table.address_width(), 5);
        assert_eq!(table.transmit_address(), &[0xE7; 5]);
        assert_eq!(table.receive_address(1), Some(&[0xC2u8; 5][..]));
        assert_eq!(table.receive_address(4), Some(&[0xC5, 0xC2, 0xC2, 0xC2, 0xC2][..]));
        assert_eq!(table.receive_address(PIPE_COUNT), None);
        assert!(!table.is_enabled(0));
        assert!(table.is_enabled(1));
        assert_eq!(table.enabled_mask(), 2);
        assert!(!table.is_locked());
    }

    #[test]
    fn width_range() {
        for width in 0..10 {
            let result = AddressTable::new(width);
            if (3..=5).contains(&width) {
                assert_eq!(result.unwrap().transmit_address().len(), width as usize);
            } else {
                assert_eq!(result, Err(ConfigError::AddressWidth(width)));
            }
        }
    }

    #[test]
    fn width_locks_after_address_set() {
        let mut table = AddressTable::new(4).unwrap();
        table.set_transmit_address(&[1, 2, 3, 4]).unwrap();
        assert!(table.is_locked());
        assert_eq!(
            table.set_address_width(3),
            Err(ConfigError::AddressWidthLocked)
        );
        // re-asserting the same width is harmless
        table.set_address_width(4).unwrap();
    }

    #[test]
    fn address_length_must_match() {
        let mut table = AddressTable::default();
        assert_eq!(
            table.set_transmit_address(&[1, 2, 3]),
            Err(ConfigError::AddressLength {
                expected: 5,
                actual: 3
            })
        );
        assert_eq!(
            table.set_receive_address(2, &[1, 2, 3, 4, 5, 6]),
            Err(ConfigError::AddressLength {
                expected: 5,
                actual: 6
            })
        );
        // nothing was mutated
        assert!(!table.is_locked());
    }

    #[test]
    fn receive_pipes() {
        let mut table = AddressTable::default();
        assert_eq!(
            table.set_receive_address(6, &[0; 5]),
            Err(ConfigError::PipeIndex(6))
        );
        let address = [0x01, 0x23, 0x45, 0x67, 0x89];
        table.set_receive_address(0, &address).unwrap();
        assert!(table.is_enabled(0));
        assert_eq!(table.receive_address(0), Some(&address[..]));

        table.disable_pipe(1).unwrap();
        assert!(!table.is_enabled(1));
        assert_eq!(table.enabled_mask(), 1);
        assert_eq!(table.disable_pipe(9), Err(ConfigError::PipeIndex(9)));
        assert!(!table.is_enabled(9));
    }
}
