use embedded_hal::delay::DelayNs;

use super::Transceiver;
use crate::{
    log::{debug, warn},
    radio::{
        arbiter::AckStep, error::TxError, prelude::RadioHal, register::Register,
        signal::TxEvent,
    },
    types::TxOutcome,
};

impl<HAL, DELAY> Transceiver<'_, HAL, DELAY>
where
    HAL: RadioHal,
    DELAY: DelayNs,
{
    /// Transmit a `payload` and block until the transmission is resolved.
    ///
    /// This polls the [`CompletionSignal`](struct@crate::radio::CompletionSignal)
    /// every [`RadioConfig::tx_poll_interval_us()`](fn@crate::radio::RadioConfig::tx_poll_interval_us)
    /// and gives up after
    /// [`RadioConfig::tx_poll_limit()`](fn@crate::radio::RadioConfig::tx_poll_limit)
    /// polls without any event for the current attempt.
    ///
    /// [`Transceiver::finish_transmit()`] is called before returning, so the
    /// channel is free again afterwards (even on failure).
    ///
    /// If the receiver was listening, it is quiesced and an unread frame is discarded.
    ///
    /// Returns
    /// - [`TxError::PacketTooLong`] if the `payload` does not fit a frame (nothing is sent),
    /// - [`TxError::AckNotReceived`] if every attempt went unacknowledged,
    /// - [`TxError::Timeout`] if the hardware never reported an outcome.
    pub fn transmit(&mut self, payload: &[u8]) -> Result<(), TxError<HAL::Error>> {
        self.start_transmit(payload)?;
        let resolved = self.await_outcome();
        let finished = self.finish_transmit();
        let outcome = resolved?;
        finished?;
        match outcome {
            TxOutcome::Success { .. } => Ok(()),
            TxOutcome::AckTimeout { attempts } => Err(TxError::AckNotReceived { attempts }),
        }
    }

    fn await_outcome(&mut self) -> Result<TxOutcome, TxError<HAL::Error>> {
        let limit = self.config.tx_poll_limit();
        let interval = self.config.tx_poll_interval_us();
        let mut attempt = self.arbiter.attempts();
        let mut polls = 0u16;
        loop {
            if let Some(outcome) = self.poll_transmit()? {
                return Ok(outcome);
            }
            if self.arbiter.attempts() != attempt {
                // the polling budget is per attempt
                attempt = self.arbiter.attempts();
                polls = 0;
            }
            polls += 1;
            if polls >= limit {
                warn!("no TX event after {=u16} polls", polls);
                self.arbiter.abort();
                return Err(TxError::Timeout);
            }
            self.delay.delay_us(interval);
        }
    }

    /// Start transmitting a `payload` and return without waiting for the outcome.
    ///
    /// The channel enters [`TransceiverState::Transmitting`](crate::TransceiverState::Transmitting).
    /// Call [`Transceiver::poll_transmit()`] (for example, whenever
    /// [`CompletionSignal::is_sent()`](fn@crate::radio::CompletionSignal::is_sent)
    /// is `true`) until it returns an outcome, then call
    /// [`Transceiver::finish_transmit()`].
    ///
    /// Fails with [`TxError::ChannelBusy`] if the last transmission was not
    /// finished. A `payload` that does not fit a frame is rejected before any
    /// hardware interaction, leaving the channel state unchanged.
    pub fn start_transmit(&mut self, payload: &[u8]) -> Result<(), TxError<HAL::Error>> {
        let frame = self.codec.encode(payload)?;
        if self.arbiter.request_transmit()? {
            self.quiesce_receiver().map_err(TxError::Hardware)?;
        }

        self.write_mode(self.mode.as_tx())
            .map_err(TxError::Hardware)?;
        let addresses = self.addresses;
        if self.arbiter.auto_ack() {
            // pipe 0 receives the ACK packet at the TX address
            self.hal
                .write_register(Register::RxAddress(0), addresses.transmit_address())
                .map_err(TxError::Hardware)?;
            self.write(Register::PipeEnable, &[addresses.enabled_mask() | 1])
                .map_err(TxError::Hardware)?;
        }
        self.write(Register::FlushTx, &[])
            .map_err(TxError::Hardware)?;
        self.write(Register::ClearEvents, &[])
            .map_err(TxError::Hardware)?;
        self.signal.clear_tx();
        self.signal.arm_transmit(self.arbiter.max_attempts());
        let codec = self.codec;
        self.hal
            .write_register(Register::TxPayload, codec.wire_bytes(&frame))
            .map_err(TxError::Hardware)?;

        self.arbiter.enter_transmitting()?;
        self.pulse_chip_enable().map_err(TxError::Hardware)
    }

    fn quiesce_receiver(&mut self) -> Result<(), HAL::Error> {
        self.hal.deassert_chip_enable()?;
        self.signal.disarm_receive();
        self.write(Register::FlushRx, &[])?;
        if self.signal.discard_received() {
            debug!("transmit preempted an unread frame");
        }
        self.arbiter.quiesce();
        Ok(())
    }

    /// Act on the latest transmit-side hardware event (if any).
    ///
    /// The hardware collaborator is serviced first (see
    /// [`RadioHal::service_events()`]). An unacknowledged attempt is
    /// retransmitted here while attempts remain.
    /// Returns the outcome once the transmission is resolved; `None` while it
    /// is in flight (or if no transmission was started).
    pub fn poll_transmit(&mut self) -> Result<Option<TxOutcome>, TxError<HAL::Error>> {
        if !self.arbiter.is_engaged() {
            return Ok(None);
        }
        if let Some(outcome) = self.arbiter.outcome() {
            return Ok(Some(outcome));
        }
        // polled after the chip-enable pulse, so the frame has left the radio
        self.arbiter.frame_clocked_out();
        self.hal
            .service_events(self.signal)
            .map_err(TxError::Hardware)?;
        match self.signal.take_tx_event() {
            None => Ok(None),
            Some(TxEvent::Sent) => Ok(self.arbiter.on_sent()),
            // both sides were armed with the same attempt budget
            Some(TxEvent::Retry | TxEvent::AckTimeout) => match self.arbiter.on_ack_timeout() {
                Some(AckStep::Retry { .. }) => {
                    self.retransmit().map_err(TxError::Hardware)?;
                    Ok(None)
                }
                Some(AckStep::Exhausted(outcome)) => Ok(Some(outcome)),
                None => Ok(None),
            },
        }
    }

    fn retransmit(&mut self) -> Result<(), HAL::Error> {
        self.hal.deassert_chip_enable()?;
        self.write(Register::ClearEvents, &[])?;
        self.write(Register::ReuseTxPayload, &[])?;
        self.pulse_chip_enable()
    }

    /// Release the channel after a transmission.
    ///
    /// This must be called once per [`Transceiver::start_transmit()`] before
    /// starting another operation. It returns the radio to standby and hands
    /// back the outcome (`None` if the transmission never resolved).
    /// Calling it without a started transmission does nothing.
    pub fn finish_transmit(&mut self) -> Result<Option<TxOutcome>, TxError<HAL::Error>> {
        if !self.arbiter.is_engaged() {
            return Ok(None);
        }
        self.hal
            .deassert_chip_enable()
            .map_err(TxError::Hardware)?;
        self.write(Register::FlushTx, &[])
            .map_err(TxError::Hardware)?;
        self.write(Register::ClearEvents, &[])
            .map_err(TxError::Hardware)?;
        self.signal.clear_tx();
        let outcome = self.arbiter.finish();
        debug!("TX finished: {}", outcome);
        Ok(outcome)
    }
}
