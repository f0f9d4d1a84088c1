use embedded_hal::delay::DelayNs;

use super::Transceiver;
use crate::{
    log::warn,
    radio::{
        error::{FrameError, RxError},
        frame::Frame,
        prelude::RadioHal,
        register::Register,
    },
    types::TransceiverState,
};

impl<HAL, DELAY> Transceiver<'_, HAL, DELAY>
where
    HAL: RadioHal,
    DELAY: DelayNs,
{
    /// Arm the receiver (enter [`TransceiverState::Listening`](crate::TransceiverState::Listening)).
    ///
    /// This is idempotent; calling it while already listening does nothing.
    /// Fails with [`RxError::ChannelBusy`] while a transmission is not finished.
    ///
    /// If pipe 0 is enabled, its address is restored here because transmissions
    /// borrow pipe 0 to receive ACK packets.
    pub fn start_receive(&mut self) -> Result<(), RxError<HAL::Error>> {
        if self.arbiter.request_listen()? {
            return Ok(());
        }
        self.write_mode(self.mode.as_rx())
            .map_err(RxError::Hardware)?;
        self.write(Register::ClearEvents, &[])
            .map_err(RxError::Hardware)?;
        let addresses = self.addresses;
        if addresses.is_enabled(0) {
            if let Some(address) = addresses.receive_address(0) {
                self.hal
                    .write_register(Register::RxAddress(0), address)
                    .map_err(RxError::Hardware)?;
            }
        }
        self.write(Register::PipeEnable, &[addresses.enabled_mask()])
            .map_err(RxError::Hardware)?;
        self.signal.arm_receive();
        self.hal.assert_chip_enable().map_err(RxError::Hardware)?;
        self.arbiter.enter_listening()?;
        Ok(())
    }

    /// The length of the frame waiting to be read, if any.
    ///
    /// Once a frame has arrived, the channel leaves
    /// [`TransceiverState::Listening`] for [`TransceiverState::Idle`] and the
    /// receiver stays paused until the frame is read.
    pub fn packet_length(&mut self) -> Result<Option<u8>, RxError<HAL::Error>> {
        self.poll_receive().map_err(RxError::Hardware)?;
        Ok(self.signal.pending_length())
    }

    /// Service the hardware collaborator while listening, and note an arrived frame.
    fn poll_receive(&mut self) -> Result<(), HAL::Error> {
        if !self.signal.is_received() && self.arbiter.state() == TransceiverState::Listening {
            self.hal.service_events(self.signal)?;
        }
        if self.signal.is_received() {
            self.arbiter.frame_arrived();
        }
        Ok(())
    }

    /// Copy the pending frame's payload into `buf` and return its length.
    ///
    /// Returns
    /// - [`RxError::NoData`] if no frame arrived since the last read,
    /// - [`RxError::BufferTooSmall`] if `buf` is shorter than the payload
    ///   (the frame stays pending, so it can be read with a larger buffer),
    /// - [`RxError::FrameCorrupt`] if the radio reported an impossible length
    ///   (the frame is dropped).
    ///
    /// Reading a frame re-arms the receiver unless [`Transceiver::standby()`]
    /// was called in between.
    pub fn read_data(&mut self, buf: &mut [u8]) -> Result<u8, RxError<HAL::Error>> {
        let frame = self.pending_frame()?;
        let len = frame.len();
        if buf.len() < len as usize {
            return Err(RxError::BufferTooSmall { needed: len });
        }
        buf[..len as usize].copy_from_slice(frame.as_bytes());
        self.frame_consumed();
        Ok(len)
    }

    /// Like [`Transceiver::read_data()`], but returns an owned [`Frame`].
    ///
    /// Use [`Frame::as_str()`] for payloads sent as text.
    pub fn read_frame(&mut self) -> Result<Frame, RxError<HAL::Error>> {
        let frame = self.pending_frame()?;
        self.frame_consumed();
        Ok(frame)
    }

    fn pending_frame(&mut self) -> Result<Frame, RxError<HAL::Error>> {
        self.poll_receive().map_err(RxError::Hardware)?;
        let codec = self.codec;
        let decoded = self
            .signal
            .peek_frame(|raw, declared| codec.decode(raw, declared))
            .ok_or(RxError::NoData)?;
        decoded.map_err(|err: FrameError| {
            warn!("dropping a corrupt frame");
            self.frame_consumed();
            err.into()
        })
    }

    fn frame_consumed(&mut self) {
        self.signal.consume_received();
        // no-op unless the receiver was paused by this frame
        self.arbiter.resume_listening();
    }
}
