use core::str::{from_utf8, Utf8Error};

use super::error::FrameError;

/// The largest payload a single frame can carry.
pub const MAX_PAYLOAD_SIZE: u8 = 32;

/// A payload of up to [`MAX_PAYLOAD_SIZE`] bytes.
///
/// Created by [`FrameCodec::encode()`] for transmitting, or by
/// [`FrameCodec::decode()`] when a frame is received. The storage past
/// [`Frame::len()`] is always zeroed, which doubles as padding for statically
/// sized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_PAYLOAD_SIZE as usize],
    len: u8,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            buf: [0; MAX_PAYLOAD_SIZE as usize],
            len: 0,
        }
    }
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// The payload as text, for payloads sent as strings.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        from_utf8(self.as_bytes())
    }

    pub const fn len(&self) -> u8 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn from_slice(payload: &[u8]) -> Self {
        let mut frame = Self::default();
        frame.buf[..payload.len()].copy_from_slice(payload);
        frame.len = payload.len() as u8;
        frame
    }
}

/// Validates outgoing payloads and parses incoming raw frames.
///
/// In static payload mode every frame occupies `payload_length` bytes over the
/// air; shorter payloads are padded with zeros. The receiver cannot tell the
/// padding from the payload, so it gets the padded frame back. In dynamic
/// payload mode (the default) a frame is exactly as long as its payload, which
/// may be empty.
///
/// Neither direction touches hardware state or blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    dynamic_payloads: bool,
    payload_length: u8,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            dynamic_payloads: true,
            payload_length: MAX_PAYLOAD_SIZE,
        }
    }
}

impl FrameCodec {
    /// `payload_length` is clamped to [1, 32]. It is ignored with `dynamic_payloads`.
    pub fn new(dynamic_payloads: bool, payload_length: u8) -> Self {
        Self {
            dynamic_payloads,
            payload_length: payload_length.clamp(1, MAX_PAYLOAD_SIZE),
        }
    }

    pub const fn dynamic_payloads(&self) -> bool {
        self.dynamic_payloads
    }

    /// The largest payload [`FrameCodec::encode()`] accepts.
    pub const fn max_payload_size(&self) -> u8 {
        if self.dynamic_payloads {
            MAX_PAYLOAD_SIZE
        } else {
            self.payload_length
        }
    }

    /// Wrap a `payload` into a [`Frame`].
    pub fn encode(&self, payload: &[u8]) -> Result<Frame, FrameError> {
        let max = self.max_payload_size();
        if payload.len() > max as usize {
            return Err(FrameError::PayloadTooLong {
                length: payload.len(),
                max,
            });
        }
        Ok(Frame::from_slice(payload))
    }

    /// The bytes that go over the air for a `frame` (padded in static payload mode).
    pub fn wire_bytes<'f>(&self, frame: &'f Frame) -> &'f [u8] {
        if self.dynamic_payloads {
            frame.as_bytes()
        } else {
            &frame.buf[..(frame.len.max(self.payload_length)) as usize]
        }
    }

    /// The length the radio reports for a frame received in static payload mode.
    pub const fn static_length(&self) -> Option<u8> {
        if self.dynamic_payloads {
            None
        } else {
            Some(self.payload_length)
        }
    }

    /// Extract the payload of a received frame.
    ///
    /// `raw` holds the bytes copied from the radio and `declared_length` is the
    /// length the radio reported. A declared length that exceeds `raw` (or
    /// [`MAX_PAYLOAD_SIZE`]) marks the frame as corrupt. So does a declared
    /// length of zero in static payload mode, where frames are never empty.
    pub fn decode(&self, raw: &[u8], declared_length: u8) -> Result<Frame, FrameError> {
        if (declared_length == 0 && !self.dynamic_payloads)
            || declared_length > MAX_PAYLOAD_SIZE
            || declared_length as usize > raw.len()
        {
            return Err(FrameError::FrameCorrupt {
                declared: declared_length,
            });
        }
        Ok(Frame::from_slice(&raw[..declared_length as usize]))
    }
}
