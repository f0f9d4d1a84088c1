use super::error::ChannelBusy;
use crate::{
    log::{debug, trace},
    types::{TransceiverState, TxOutcome},
};

/// What to do after an attempt went unacknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStep {
    /// Send the same frame again; this is attempt number `attempt`.
    Retry { attempt: u8 },
    /// The retry budget is spent.
    Exhausted(TxOutcome),
}

/// The half-duplex state machine.
///
/// ```text
///            start_transmit            clocked out (auto-ack)
///   Idle ─────────────────> Transmitting ─────────────> AwaitingAck
///    ^ ^ <──── PacketSent (auto-ack disabled) ───┘          │
///    │ └──────── PacketSent / retries exhausted ────────────┘
///    │  start_receive
///    └───────────────> Listening   (standby() returns any state to Idle)
/// ```
///
/// A frame arriving while listening pauses the receiver (`Listening -> Idle`)
/// until it is read, then listening resumes.
/// A transmit request while listening (or paused) quiesces the receiver first. Once a
/// transmission starts the channel stays engaged until
/// [`ChannelArbiter::finish()`] is called, even after the outcome is known.
///
/// Every method runs on the application thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelArbiter {
    state: TransceiverState,
    auto_ack: bool,
    retry_count: u8,
    attempts: u8,
    outcome: Option<TxOutcome>,
    engaged: bool,
    rx_paused: bool,
}

impl Default for ChannelArbiter {
    fn default() -> Self {
        Self::new(true, 15)
    }
}

impl ChannelArbiter {
    /// A new arbiter in the [`TransceiverState::Idle`] state.
    ///
    /// `retry_count` is the number of attempts a transmission may make
    /// (see [`ChannelArbiter::max_attempts()`]).
    pub const fn new(auto_ack: bool, retry_count: u8) -> Self {
        Self {
            state: TransceiverState::Idle,
            auto_ack,
            retry_count,
            attempts: 0,
            outcome: None,
            engaged: false,
            rx_paused: false,
        }
    }

    pub const fn state(&self) -> TransceiverState {
        self.state
    }

    pub const fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    pub const fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// The attempt budget of a transmission: `retry_count`, but at least one.
    pub const fn max_attempts(&self) -> u8 {
        if self.retry_count == 0 {
            1
        } else {
            self.retry_count
        }
    }

    /// Is the receiver paused because a frame arrived and was not read yet?
    pub const fn is_receive_paused(&self) -> bool {
        self.rx_paused
    }

    /// Attempts made by the current (or last) transmission.
    pub const fn attempts(&self) -> u8 {
        self.attempts
    }

    /// The resolved outcome of a transmission that was not finished yet.
    pub const fn outcome(&self) -> Option<TxOutcome> {
        self.outcome
    }

    /// Is a transmission started and not yet finished?
    pub const fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Is a frame on its way (not resolved yet)?
    pub const fn is_in_flight(&self) -> bool {
        matches!(
            self.state,
            TransceiverState::Transmitting | TransceiverState::AwaitingAck
        )
    }

    fn transition(&mut self, to: TransceiverState) {
        trace!("channel {} -> {}", self.state, to);
        self.state = to;
    }

    /// Check whether a transmission may start.
    ///
    /// Returns `true` when the receiver must be quiesced first
    /// (see [`ChannelArbiter::quiesce()`]).
    pub fn request_transmit(&self) -> Result<bool, ChannelBusy> {
        if self.engaged {
            return Err(ChannelBusy);
        }
        match self.state {
            TransceiverState::Idle => Ok(self.rx_paused),
            TransceiverState::Listening => Ok(true),
            _ => Err(ChannelBusy),
        }
    }

    /// Leave [`TransceiverState::Listening`] (or a paused receiver) so a
    /// transmission can take over.
    pub fn quiesce(&mut self) {
        self.rx_paused = false;
        if self.state == TransceiverState::Listening {
            debug!("quiescing receiver for transmit");
            self.transition(TransceiverState::Idle);
        }
    }

    /// `Idle -> Transmitting`. Fails if the channel is not idle.
    pub fn enter_transmitting(&mut self) -> Result<(), ChannelBusy> {
        if self.engaged || self.rx_paused || self.state != TransceiverState::Idle {
            return Err(ChannelBusy);
        }
        self.attempts = 1;
        self.outcome = None;
        self.engaged = true;
        self.transition(TransceiverState::Transmitting);
        Ok(())
    }

    /// The frame was clocked out. With auto-ack this moves to `AwaitingAck`.
    pub fn frame_clocked_out(&mut self) {
        if self.auto_ack && self.state == TransceiverState::Transmitting {
            self.transition(TransceiverState::AwaitingAck);
        }
    }

    /// The hardware reported the frame as sent (and acknowledged).
    ///
    /// Returns `None` if no transmission was in flight.
    pub fn on_sent(&mut self) -> Option<TxOutcome> {
        if !self.is_in_flight() {
            return None;
        }
        let outcome = TxOutcome::Success {
            attempts: self.attempts,
        };
        self.outcome = Some(outcome);
        self.transition(TransceiverState::Idle);
        Some(outcome)
    }

    /// The hardware reported an attempt without acknowledgment.
    ///
    /// Returns `None` if no transmission was in flight.
    pub fn on_ack_timeout(&mut self) -> Option<AckStep> {
        if !self.is_in_flight() {
            return None;
        }
        if self.attempts < self.max_attempts() {
            self.attempts += 1;
            debug!("no ACK, retrying (attempt {=u8})", self.attempts);
            self.transition(TransceiverState::Transmitting);
            return Some(AckStep::Retry {
                attempt: self.attempts,
            });
        }
        let outcome = TxOutcome::AckTimeout {
            attempts: self.attempts,
        };
        self.outcome = Some(outcome);
        self.transition(TransceiverState::Idle);
        Some(AckStep::Exhausted(outcome))
    }

    /// Drop an in-flight transmission without an outcome (hardware stall).
    pub fn abort(&mut self) {
        if self.is_in_flight() {
            self.outcome = None;
            self.transition(TransceiverState::Idle);
        }
    }

    /// Release the channel after a transmission and hand back its outcome.
    pub fn finish(&mut self) -> Option<TxOutcome> {
        self.engaged = false;
        if self.is_in_flight() {
            self.transition(TransceiverState::Idle);
        }
        self.outcome.take()
    }

    /// Check whether the receiver may be armed.
    ///
    /// Returns `true` if it is already armed.
    pub fn request_listen(&self) -> Result<bool, ChannelBusy> {
        if self.engaged {
            return Err(ChannelBusy);
        }
        match self.state {
            TransceiverState::Idle => Ok(false),
            TransceiverState::Listening => Ok(true),
            _ => Err(ChannelBusy),
        }
    }

    /// `Idle -> Listening`. Fails unless idle (or already listening).
    pub fn enter_listening(&mut self) -> Result<(), ChannelBusy> {
        if self.request_listen()? {
            return Ok(());
        }
        self.rx_paused = false;
        self.transition(TransceiverState::Listening);
        Ok(())
    }

    /// `Listening -> Idle` because a frame arrived.
    ///
    /// The receiver stays paused until [`ChannelArbiter::resume_listening()`].
    /// Returns `true` if the receiver was armed.
    pub fn frame_arrived(&mut self) -> bool {
        if self.state == TransceiverState::Listening {
            self.rx_paused = true;
            self.transition(TransceiverState::Idle);
            return true;
        }
        false
    }

    /// Re-arm after the application consumed an arrived frame.
    ///
    /// Does nothing unless the receiver was paused by
    /// [`ChannelArbiter::frame_arrived()`].
    pub fn resume_listening(&mut self) {
        if self.rx_paused && self.state == TransceiverState::Idle && !self.engaged {
            self.rx_paused = false;
            self.transition(TransceiverState::Listening);
        }
    }

    /// Force [`TransceiverState::Idle`], dropping anything in flight.
    pub fn standby(&mut self) {
        self.rx_paused = false;
        self.engaged = false;
        self.outcome = None;
        self.attempts = 0;
        if self.state != TransceiverState::Idle {
            self.transition(TransceiverState::Idle);
        }
    }

    /// Apply new acknowledgment settings. Only allowed while idle.
    pub fn configure(&mut self, auto_ack: bool, retry_count: u8) -> Result<(), ChannelBusy> {
        if self.engaged || self.state != TransceiverState::Idle {
            return Err(ChannelBusy);
        }
        self.auto_ack = auto_ack;
        self.retry_count = retry_count;
        Ok(())
    }
}
