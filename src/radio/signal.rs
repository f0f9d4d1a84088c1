use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering},
};

use super::frame::MAX_PAYLOAD_SIZE;
use crate::{log::warn, types::HardwareEvent};

const TX_SENT: u8 = 1;
const TX_ACK_TIMEOUT: u8 = 2;

/// A transmit-side event taken from the [`CompletionSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TxEvent {
    Sent,
    /// The last attempt went unacknowledged.
    AckTimeout,
    /// An attempt went unacknowledged and more attempts remain.
    Retry,
}

/// The bridge between the hardware-event callback (interrupt context) and the
/// application's polling loop.
///
/// It holds two one-shot flags:
///
/// - `sentFlag`: a transmission resolved ([`HardwareEvent::PacketSent`], or the
///   [`HardwareEvent::AckTimeout`] of the last allowed attempt). An
///   [`HardwareEvent::AckTimeout`] while attempts remain only requests a
///   retransmission; it does not raise this flag.
/// - `receivedFlag`: a frame was copied into the receive slot.
///
/// Interrupt context only ever sets a flag (after writing the event code or the
/// receive slot); the application clears it after acting on the event. The
/// receive slot is written by interrupt context only while `receivedFlag` is
/// clear and read by the application only while it is set, so the slot never
/// has two writers nor a reader racing a writer.
///
/// The callback does not block, allocate, or loop. This assumes the usual
/// single-core model where the interrupt preempts the application and runs to
/// completion.
///
/// ```
/// use txrx::radio::CompletionSignal;
/// use txrx::HardwareEvent;
///
/// static SIGNAL: CompletionSignal = CompletionSignal::new();
///
/// // inside the radio's IRQ handler
/// SIGNAL.on_hardware_event(HardwareEvent::PacketSent);
/// assert!(SIGNAL.is_sent());
/// ```
pub struct CompletionSignal {
    sent: AtomicBool,
    tx_event: AtomicU8,
    received: AtomicBool,
    rx_armed: AtomicBool,
    rx_length: AtomicU8,
    rx_slot: UnsafeCell<[u8; MAX_PAYLOAD_SIZE as usize]>,
    overruns: AtomicU16,
    tx_budget: AtomicU8,
    retry_pending: AtomicBool,
}

// SAFETY: the receive slot is the only non-atomic field. Its accesses are
// serialized by the `received` flag (see the struct's documentation).
unsafe impl Sync for CompletionSignal {}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSignal {
    pub const fn new() -> Self {
        Self {
            sent: AtomicBool::new(false),
            tx_event: AtomicU8::new(0),
            received: AtomicBool::new(false),
            rx_armed: AtomicBool::new(false),
            rx_length: AtomicU8::new(0),
            rx_slot: UnsafeCell::new([0; MAX_PAYLOAD_SIZE as usize]),
            overruns: AtomicU16::new(0),
            tx_budget: AtomicU8::new(0),
            retry_pending: AtomicBool::new(false),
        }
    }

    /// The single invocation point for the hardware collaborator's interrupt handler.
    ///
    /// A received frame is only stored while the receiver is armed and the
    /// previous frame was consumed; otherwise it is dropped (and counted by
    /// [`CompletionSignal::overruns()`] if the slot was occupied).
    pub fn on_hardware_event(&self, event: HardwareEvent<'_>) {
        match event {
            HardwareEvent::PacketSent => self.raise_tx(TX_SENT),
            HardwareEvent::AckTimeout => self.raise_ack_timeout(),
            HardwareEvent::PacketReceived(raw) => self.deliver(raw),
        }
    }

    fn raise_tx(&self, code: u8) {
        self.tx_event.store(code, Ordering::Relaxed);
        self.sent.store(true, Ordering::Release);
    }

    fn raise_ack_timeout(&self) {
        // only interrupt context writes the budget while a transmission is armed
        let left = self.tx_budget.load(Ordering::Relaxed);
        if left > 1 {
            self.tx_budget.store(left - 1, Ordering::Relaxed);
            self.retry_pending.store(true, Ordering::Release);
        } else {
            self.raise_tx(TX_ACK_TIMEOUT);
        }
    }

    fn deliver(&self, raw: &[u8]) {
        if !self.rx_armed.load(Ordering::Acquire) {
            return;
        }
        if self.received.load(Ordering::Acquire) {
            // single writer, so a plain load/store pair is enough
            let count = self.overruns.load(Ordering::Relaxed);
            self.overruns
                .store(count.saturating_add(1), Ordering::Relaxed);
            return;
        }
        let len = raw.len().min(MAX_PAYLOAD_SIZE as usize);
        // SAFETY: `received` is clear, so the application is not reading the slot.
        unsafe {
            (&mut *self.rx_slot.get())[..len].copy_from_slice(&raw[..len]);
        }
        self.rx_length
            .store(raw.len().min(u8::MAX as usize) as u8, Ordering::Relaxed);
        self.received.store(true, Ordering::Release);
    }

    /// Has the current transmission resolved (delivered, or out of attempts)?
    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    /// Is a received frame pending?
    pub fn is_received(&self) -> bool {
        self.received.load(Ordering::Acquire)
    }

    /// The length reported for the pending frame (if any).
    pub fn pending_length(&self) -> Option<u8> {
        if self.is_received() {
            Some(self.rx_length.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Frames dropped because the previous one was not consumed yet.
    pub fn overruns(&self) -> u16 {
        self.overruns.load(Ordering::Relaxed)
    }

    /// Allow `attempts` attempts for the next transmission.
    ///
    /// Must be called before the first attempt starts.
    pub(crate) fn arm_transmit(&self, attempts: u8) {
        self.retry_pending.store(false, Ordering::Relaxed);
        self.tx_budget.store(attempts, Ordering::Release);
    }

    /// Read and clear the pending transmit-side event.
    pub(crate) fn take_tx_event(&self) -> Option<TxEvent> {
        if !self.sent.load(Ordering::Acquire) {
            if self.retry_pending.load(Ordering::Acquire) {
                // nothing else is raised until the driver retransmits
                self.retry_pending.store(false, Ordering::Release);
                return Some(TxEvent::Retry);
            }
            return None;
        }
        let code = self.tx_event.load(Ordering::Relaxed);
        self.sent.store(false, Ordering::Release);
        match code {
            TX_SENT => Some(TxEvent::Sent),
            TX_ACK_TIMEOUT => Some(TxEvent::AckTimeout),
            _ => None,
        }
    }

    /// Drop any pending transmit-side event.
    pub(crate) fn clear_tx(&self) {
        self.retry_pending.store(false, Ordering::Release);
        self.sent.store(false, Ordering::Release);
    }

    /// Run `f` on the pending frame's raw slot and declared length.
    ///
    /// The frame stays pending; see [`CompletionSignal::consume_received()`].
    pub(crate) fn peek_frame<R>(&self, f: impl FnOnce(&[u8], u8) -> R) -> Option<R> {
        if !self.received.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: interrupt context does not write the slot while `received` is set.
        let slot = unsafe { &*self.rx_slot.get() };
        Some(f(slot, self.rx_length.load(Ordering::Relaxed)))
    }

    pub(crate) fn consume_received(&self) {
        self.received.store(false, Ordering::Release);
    }

    /// Start accepting received frames.
    pub(crate) fn arm_receive(&self) {
        self.rx_armed.store(true, Ordering::Release);
    }

    /// Stop accepting received frames. A pending frame stays readable.
    pub(crate) fn disarm_receive(&self) {
        self.rx_armed.store(false, Ordering::Release);
    }

    /// Drop the pending frame (if any).
    ///
    /// Returns `true` if a frame was discarded.
    pub(crate) fn discard_received(&self) -> bool {
        let discarded = self.received.load(Ordering::Acquire);
        if discarded {
            warn!("discarding an unread frame");
            self.received.store(false, Ordering::Release);
        }
        discarded
    }

    /// Return to the state of [`CompletionSignal::new()`].
    pub(crate) fn reset(&self) {
        self.disarm_receive();
        self.discard_received();
        self.clear_tx();
        self.tx_budget.store(0, Ordering::Relaxed);
        self.overruns.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{CompletionSignal, TxEvent};
    use crate::types::HardwareEvent;
    use std::vec::Vec;

    #[test]
    fn sent_flag_is_one_shot() {
        let signal = CompletionSignal::new();
        assert_eq!(signal.take_tx_event(), None);
        signal.on_hardware_event(HardwareEvent::PacketSent);
        assert!(signal.is_sent());
        assert_eq!(signal.take_tx_event(), Some(TxEvent::Sent));
        assert!(!signal.is_sent());
        assert_eq!(signal.take_tx_event(), None);

        signal.on_hardware_event(HardwareEvent::AckTimeout);
        assert_eq!(signal.take_tx_event(), Some(TxEvent::AckTimeout));
    }

    #[test]
    fn retries_do_not_raise_sent() {
        let signal = CompletionSignal::new();
        signal.arm_transmit(3);
        for _ in 0..2 {
            signal.on_hardware_event(HardwareEvent::AckTimeout);
            assert!(!signal.is_sent());
            assert_eq!(signal.take_tx_event(), Some(TxEvent::Retry));
            assert_eq!(signal.take_tx_event(), None);
        }
        // the last attempt resolves the transmission
        signal.on_hardware_event(HardwareEvent::AckTimeout);
        assert!(signal.is_sent());
        assert_eq!(signal.take_tx_event(), Some(TxEvent::AckTimeout));

        signal.arm_transmit(3);
        signal.on_hardware_event(HardwareEvent::AckTimeout);
        signal.on_hardware_event(HardwareEvent::PacketSent);
        assert!(signal.is_sent());
        assert_eq!(signal.take_tx_event(), Some(TxEvent::Sent));
        signal.clear_tx();
        assert_eq!(signal.take_tx_event(), None);
    }

    #[test]
    fn receive_requires_arming() {
        let signal = CompletionSignal::new();
        signal.on_hardware_event(HardwareEvent::PacketReceived(b"dropped"));
        assert!(!signal.is_received());
        signal.arm_receive();
        signal.on_hardware_event(HardwareEvent::PacketReceived(b"kept"));
        assert!(signal.is_received());
        assert_eq!(signal.pending_length(), Some(4));
        let copy = signal.peek_frame(|raw, len| raw[..len as usize].to_vec());
        assert_eq!(copy, Some(b"kept".to_vec()));
        // peeking does not consume
        assert!(signal.is_received());
        signal.consume_received();
        assert_eq!(signal.pending_length(), None);
        assert_eq!(signal.peek_frame(|_, _| ()), None);
    }

    #[test]
    fn overrun_keeps_first_frame() {
        let signal = CompletionSignal::new();
        signal.arm_receive();
        signal.on_hardware_event(HardwareEvent::PacketReceived(&[1, 2, 3]));
        signal.on_hardware_event(HardwareEvent::PacketReceived(&[4, 5, 6]));
        assert_eq!(signal.overruns(), 1);
        let copy: Option<Vec<u8>> = signal.peek_frame(|raw, len| raw[..len as usize].to_vec());
        assert_eq!(copy, Some([1u8, 2, 3].to_vec()));
    }

    #[test]
    fn oversized_frame_keeps_declared_length() {
        let signal = CompletionSignal::new();
        signal.arm_receive();
        let raw = [0x55u8; 40];
        signal.on_hardware_event(HardwareEvent::PacketReceived(&raw));
        assert_eq!(signal.pending_length(), Some(40));
        assert_eq!(signal.peek_frame(|raw, _| raw.len()), Some(32));
    }

    #[test]
    fn disarm_then_discard() {
        let signal = CompletionSignal::new();
        signal.arm_receive();
        assert!(!signal.discard_received());
        signal.on_hardware_event(HardwareEvent::PacketReceived(&[9]));
        signal.disarm_receive();
        // disarming keeps the pending frame
        assert_eq!(signal.pending_length(), Some(1));
        assert!(signal.discard_received());
        assert!(!signal.is_received());
        signal.on_hardware_event(HardwareEvent::PacketReceived(&[9]));
        assert!(!signal.is_received());
        assert_eq!(signal.overruns(), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let signal = CompletionSignal::new();
        signal.arm_receive();
        signal.on_hardware_event(HardwareEvent::PacketReceived(&[1]));
        signal.on_hardware_event(HardwareEvent::PacketReceived(&[2]));
        signal.on_hardware_event(HardwareEvent::PacketSent);
        signal.reset();
        assert!(!signal.is_sent());
        assert!(!signal.is_received());
        assert_eq!(signal.overruns(), 0);
    }

    #[test]
    fn usable_as_static() {
        static SIGNAL: CompletionSignal = CompletionSignal::new();
        let handle = std::thread::spawn(|| SIGNAL.on_hardware_event(HardwareEvent::PacketSent));
        handle.join().unwrap();
        assert_eq!(SIGNAL.take_tx_event(), Some(TxEvent::Sent));
    }
}
