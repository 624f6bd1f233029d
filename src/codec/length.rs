//! Variable-width length header
//!
//! The header encodes the frame length (encoded body plus one identifier
//! byte) in one byte for lengths below 160 and two bytes otherwise. The
//! protocol is dominated by small frames, so the common case pays a single
//! header byte and the reserved high range of the first byte carries the
//! length extension.
//!
//! ```text
//! length < 160:   [length]
//! length >= 160:  [160 + length / 256] [length % 256]
//! ```

use super::{Error, LENGTH_EXTENSION, MAX_FRAME_LEN, Result};

/// Append a length header to the output buffer.
pub(crate) fn encode_length(length: usize, out: &mut Vec<u8>) -> Result<()> {
    if length > MAX_FRAME_LEN {
        return Err(Error::FrameTooLarge {
            length,
            max: MAX_FRAME_LEN,
        });
    }

    if length < LENGTH_EXTENSION {
        out.push(length as u8);
    } else {
        out.push((LENGTH_EXTENSION + length / 256) as u8);
        out.push((length % 256) as u8);
    }

    Ok(())
}

/// Read a length header without consuming it.
///
/// Returns `(length, header_len)`, or `None` when fewer than two bytes are
/// available. That is a normal streaming condition, not a failure: callers
/// wait for more input and retry.
///
/// Non-canonical two-byte encodings of small lengths are accepted; the frame
/// layout downstream branches on the decoded value, not on the header form.
pub(crate) fn peek_length(buf: &[u8]) -> Option<(usize, usize)> {
    if buf.len() < 2 {
        return None;
    }

    let b0 = usize::from(buf[0]);
    if b0 < LENGTH_EXTENSION {
        Some((b0, 1))
    } else {
        Some(((b0 - LENGTH_EXTENSION) * 256 + usize::from(buf[1]), 2))
    }
}
