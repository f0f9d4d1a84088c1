//! Two transceivers talking through an in-memory "air".
use core::convert::Infallible;

use embedded_hal_mock::eh1::delay::NoopDelay;
use txrx::{
    radio::{
        prelude::*, AddressTarget, CompletionSignal, RadioConfig, RxError, Transceiver, TxError,
    },
    HardwareEvent, TransceiverState, TxOutcome,
};

/// Delivers every transmitted frame to the peer's signal.
struct LoopbackHal<'s> {
    own: &'s CompletionSignal,
    peer: &'s CompletionSignal,
    mode: u8,
    payload: Option<Vec<u8>>,
    link_up: bool,
}

impl<'s> LoopbackHal<'s> {
    fn new(own: &'s CompletionSignal, peer: &'s CompletionSignal) -> Self {
        Self {
            own,
            peer,
            mode: 0,
            payload: None,
            link_up: true,
        }
    }
}

impl RadioHal for LoopbackHal<'_> {
    type Error = Infallible;

    fn write_register(&mut self, register: Register, data: &[u8]) -> Result<(), Self::Error> {
        match register {
            Register::Mode => self.mode = data[0],
            Register::TxPayload => self.payload = Some(data.to_vec()),
            Register::FlushTx => self.payload = None,
            _ => (),
        }
        Ok(())
    }

    fn read_register(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Self::Error> {
        buf.fill(0);
        if register == Register::Mode {
            buf[0] = self.mode;
        }
        Ok(())
    }

    fn assert_chip_enable(&mut self) -> Result<(), Self::Error> {
        let mode = Mode::from_bits(self.mode);
        let Some(payload) = self.payload.as_deref() else {
            return Ok(());
        };
        if mode.rx() {
            return Ok(());
        }
        if self.link_up {
            self.peer
                .on_hardware_event(HardwareEvent::PacketReceived(payload));
            self.own.on_hardware_event(HardwareEvent::PacketSent);
        } else {
            self.own.on_hardware_event(HardwareEvent::AckTimeout);
        }
        Ok(())
    }

    fn deassert_chip_enable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn mk_pair<'s>(
    a: &'s CompletionSignal,
    b: &'s CompletionSignal,
    config: &RadioConfig,
) -> (
    Transceiver<'s, LoopbackHal<'s>, NoopDelay>,
    Transceiver<'s, LoopbackHal<'s>, NoopDelay>,
) {
    let mut tx = Transceiver::new(LoopbackHal::new(a, b), NoopDelay::new(), a);
    let mut rx = Transceiver::new(LoopbackHal::new(b, a), NoopDelay::new(), b);
    tx.begin(config).unwrap();
    rx.begin(config).unwrap();
    tx.configure_address(AddressTarget::Transmit, b"1Node", 5)
        .unwrap();
    rx.configure_address(AddressTarget::Receive(1), b"1Node", 5)
        .unwrap();
    (tx, rx)
}

#[test]
fn ping_over_the_air() {
    let (a, b) = (CompletionSignal::new(), CompletionSignal::new());
    let (mut tx, mut rx) = mk_pair(&a, &b, &RadioConfig::default());
    rx.start_receive().unwrap();

    for count in 0..3u8 {
        let mut payload = *b"Hello World! #0";
        payload[14] += count;
        tx.transmit(&payload).unwrap();
        assert_eq!(tx.state(), TransceiverState::Idle);

        assert!(b.is_received());
        let mut buf = [0u8; 32];
        let len = rx.read_data(&mut buf).unwrap();
        assert_eq!(&buf[..len as usize], &payload);
    }
    assert_eq!(rx.state(), TransceiverState::Listening);
    assert_eq!(b.overruns(), 0);
}

#[test]
fn unread_frames_overrun() {
    let (a, b) = (CompletionSignal::new(), CompletionSignal::new());
    let (mut tx, mut rx) = mk_pair(&a, &b, &RadioConfig::default());
    rx.start_receive().unwrap();
    tx.transmit(b"first").unwrap();
    tx.transmit(b"second").unwrap();
    assert_eq!(b.overruns(), 1);
    assert_eq!(rx.read_frame().unwrap().as_str(), Ok("first"));
    assert_eq!(rx.read_frame(), Err(RxError::NoData));
}

#[test]
fn nobody_listening() {
    let (a, b) = (CompletionSignal::new(), CompletionSignal::new());
    let config = RadioConfig::default().with_retry_count(3);
    let (mut tx, _rx) = mk_pair(&a, &b, &config);
    tx.hal_mut().link_up = false;
    assert_eq!(
        tx.transmit(b"hello?"),
        Err(TxError::AckNotReceived { attempts: 3 })
    );
    assert_eq!(tx.state(), TransceiverState::Idle);
}

#[test]
fn empty_payload_over_the_air() {
    let (a, b) = (CompletionSignal::new(), CompletionSignal::new());
    let (mut tx, mut rx) = mk_pair(&a, &b, &RadioConfig::default());
    rx.start_receive().unwrap();
    tx.transmit(&[]).unwrap();
    assert_eq!(rx.packet_length(), Ok(Some(0)));
    assert!(rx.read_frame().unwrap().is_empty());
}

#[test]
fn non_blocking_transmit() {
    let (a, b) = (CompletionSignal::new(), CompletionSignal::new());
    let config = RadioConfig::default().with_dynamic_payloads(false);
    let (mut tx, mut rx) = mk_pair(&a, &b, &config);
    rx.start_receive().unwrap();
    tx.start_transmit(b"async").unwrap();
    assert!(a.is_sent());
    let outcome = tx.poll_transmit().unwrap();
    assert_eq!(outcome, Some(TxOutcome::Success { attempts: 1 }));
    assert_eq!(tx.finish_transmit(), Ok(outcome));

    // static payloads arrive padded
    let frame = rx.read_frame().unwrap();
    assert_eq!(frame.len(), 32);
    assert_eq!(&frame.as_bytes()[..5], b"async");
}
