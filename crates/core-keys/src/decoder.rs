//! Byte-stream decoder (spec §4.C): turns raw tty bytes into `DecodedEvent`s.
//!
//! Decoding is a pure function of the bytes read (spec §8), so the same
//! `decode_one` runs against a live terminal and against a fixed slice in
//! tests and the fuzz harness; only the `ByteSource` differs.

use crate::error::DecodeError;
use crate::event::{Codepoint, DecodedEvent, EventType, KeyEvent, ModMask, PasteEvent};
use crate::source::ByteSource;
use crate::tables;

const ESC: u8 = 0x1b;
const PASTE_TERMINATOR: &[u8] = b"\x1b[201~";
/// Upper bound on a CSI payload's length before it is declared malformed;
/// keeps a garbled stream from stalling the reader indefinitely (fuzz
/// requirement: the decoder must always make progress).
const MAX_CSI_PAYLOAD: usize = 64;

fn is_csi_final(b: u8) -> bool {
    matches!(b, b'A'..=b'H' | b'P' | b'Q' | b'S' | b'Z' | b'u' | b'~')
}

pub struct Decoder {
    /// One-byte lookahead, filled when a byte was read to decide an ESC
    /// was not the start of a CSI sequence and needs to be reconsidered on
    /// the next call.
    pending: Option<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder { pending: None }
    }

    fn next_byte<S: ByteSource>(&mut self, src: &mut S) -> std::io::Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        src.read_byte()
    }

    /// Decode the next event, or `Ok(None)` if the read timed out with no
    /// byte available (spec §4.C step 1).
    pub fn decode_one<S: ByteSource>(
        &mut self,
        src: &mut S,
    ) -> Result<Option<DecodedEvent>, DecodeError> {
        let b0 = match self.next_byte(src).map_err(|e| DecodeError::MalformedCsi(e.to_string()))? {
            Some(b) => b,
            None => return Ok(None),
        };

        if b0 != ESC {
            return self.decode_literal(b0, src).map(Some);
        }

        let b1 = match self.next_byte(src).map_err(|e| DecodeError::MalformedCsi(e.to_string()))? {
            Some(b) => b,
            None => return Ok(Some(DecodedEvent::Key(KeyEvent::simple(Codepoint::Named(
                crate::event::NamedKey::Esc,
            ))))),
        };

        if b1 != b'[' {
            // Not a CSI sequence: ESC is its own key (spec §4.C step 2).
            // The byte after it did not belong to this event; buffer it
            // for the next call instead of dropping it.
            self.pending = Some(b1);
            return Ok(Some(DecodedEvent::Key(KeyEvent::simple(Codepoint::Named(
                crate::event::NamedKey::Esc,
            )))));
        }

        let mut payload = Vec::new();
        let final_byte = loop {
            let b = match self.next_byte(src).map_err(|e| DecodeError::MalformedCsi(e.to_string()))? {
                Some(b) => b,
                None => return Ok(None),
            };
            if is_csi_final(b) {
                break b;
            }
            payload.push(b);
            if payload.len() > MAX_CSI_PAYLOAD {
                let payload = String::from_utf8_lossy(&payload).into_owned();
                tracing::debug!(payload, "CSI payload exceeded bound, resyncing");
                return Err(DecodeError::MalformedCsi(payload));
            }
        };

        let payload_str = String::from_utf8_lossy(&payload).into_owned();

        // Bracketed paste (spec §4.C step 4): accumulate until the
        // terminator sequence, handled atomically within this one call.
        if final_byte == b'~' && payload_str == "200" {
            return self.decode_paste(src).map(Some);
        }

        self.decode_csi_payload(&payload_str, final_byte).map(Some)
    }

    fn decode_literal<S: ByteSource>(
        &mut self,
        b0: u8,
        src: &mut S,
    ) -> Result<DecodedEvent, DecodeError> {
        let width = utf8_len(b0);
        let mut buf = vec![b0];
        for _ in 1..width {
            match self.next_byte(src).map_err(|e| DecodeError::MalformedCsi(e.to_string()))? {
                Some(b) => buf.push(b),
                None => break,
            }
        }
        let s = String::from_utf8_lossy(&buf);
        let ch = s.chars().next().unwrap_or('\u{fffd}');
        Ok(DecodedEvent::Key(KeyEvent::simple(Codepoint::Char(ch))))
    }

    fn decode_paste<S: ByteSource>(&mut self, src: &mut S) -> Result<DecodedEvent, DecodeError> {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let b = match self.next_byte(src).map_err(|e| DecodeError::MalformedCsi(e.to_string()))? {
                Some(b) => b,
                None => break,
            };
            buf.push(b);
            if buf.ends_with(PASTE_TERMINATOR) {
                buf.truncate(buf.len() - PASTE_TERMINATOR.len());
                break;
            }
        }
        Ok(DecodedEvent::Paste(PasteEvent {
            text: String::from_utf8_lossy(&buf).into_owned(),
        }))
    }

    fn decode_csi_payload(
        &self,
        payload: &str,
        final_byte: u8,
    ) -> Result<DecodedEvent, DecodeError> {
        let mut parts = payload.splitn(2, ';');
        let codepoint_part = parts.next().unwrap_or("");
        let rest = parts.next();

        let mut segs = codepoint_part.split(':');
        let code: Option<u32> = segs.next().filter(|s| !s.is_empty()).and_then(|s| s.parse().ok());
        let shifted_raw: Option<u32> = segs.next().filter(|s| !s.is_empty()).and_then(|s| s.parse().ok());
        let base_raw: Option<u32> = segs.next().filter(|s| !s.is_empty()).and_then(|s| s.parse().ok());

        let (mods_raw, event_raw) = match rest {
            Some(r) => {
                let mut segs = r.split(':');
                let mods = segs.next().and_then(|s| s.parse().ok()).unwrap_or(1);
                let event = segs.next().and_then(|s| s.parse().ok()).unwrap_or(1);
                (mods, event)
            }
            None => (1, 1),
        };

        let mods = ModMask::from_kkbp_raw(mods_raw);
        let event = EventType::from_kkbp_raw(event_raw);

        let malformed = || {
            tracing::debug!(payload, final_byte = final_byte as char, "malformed CSI payload");
            DecodeError::MalformedCsi(payload.to_string())
        };

        let codepoint = match final_byte {
            b'~' => {
                let n = code.ok_or_else(malformed)?;
                tables::named_key_from_legacy_tilde(n)
                    .map(Codepoint::Named)
                    .ok_or_else(malformed)?
            }
            b'u' => {
                let n = code.ok_or_else(malformed)?;
                tables::named_key_from_kkbp_codepoint(n)
                    .map(Codepoint::Named)
                    .unwrap_or_else(|| codepoint_from_numeric(n))
            }
            _ => tables::named_key_from_final_byte(final_byte)
                .map(Codepoint::Named)
                .ok_or_else(malformed)?,
        };

        let shifted = shifted_raw.map(codepoint_from_numeric);
        let base = base_raw.map(codepoint_from_numeric);

        Ok(DecodedEvent::Key(KeyEvent {
            codepoint,
            mods,
            event,
            shifted,
            base,
        }))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn codepoint_from_numeric(n: u32) -> Codepoint {
    if is_private_use(n) {
        return Codepoint::Tbd;
    }
    char::from_u32(n).map(Codepoint::Char).unwrap_or(Codepoint::Tbd)
}

/// Private-use-area codepoints carry no standard mapping and decode to
/// `Tbd` rather than a literal `Char` (spec §4.C step 6).
fn is_private_use(n: u32) -> bool {
    matches!(n, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}

fn utf8_len(b0: u8) -> usize {
    if b0 & 0x80 == 0 {
        1
    } else if b0 & 0xE0 == 0xC0 {
        2
    } else if b0 & 0xF0 == 0xE0 {
        3
    } else if b0 & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NamedKey;
    use crate::source::SliceSource;

    fn decode(bytes: &[u8]) -> DecodedEvent {
        let mut dec = Decoder::new();
        let mut src = SliceSource::new(bytes);
        dec.decode_one(&mut src).unwrap().unwrap()
    }

    #[test]
    fn plain_ascii_char() {
        assert_eq!(
            decode(b"a"),
            DecodedEvent::Key(KeyEvent::simple(Codepoint::Char('a')))
        );
    }

    #[test]
    fn lone_esc_is_esc_key() {
        assert_eq!(
            decode(&[ESC]),
            DecodedEvent::Key(KeyEvent::simple(Codepoint::Named(NamedKey::Esc)))
        );
    }

    #[test]
    fn modified_left_arrow() {
        let ev = decode(b"\x1b[1;5D");
        match ev {
            DecodedEvent::Key(k) => {
                assert_eq!(k.codepoint, Codepoint::Named(NamedKey::Left));
                assert_eq!(k.mods, ModMask::CTRL);
            }
            _ => panic!("expected key event"),
        }
    }

    #[test]
    fn kkbp_left_ctrl_numeric() {
        let ev = decode(b"\x1b[57442u");
        match ev {
            DecodedEvent::Key(k) => {
                assert_eq!(k.codepoint, Codepoint::Named(NamedKey::LeftCtrl));
            }
            _ => panic!("expected key event"),
        }
    }

    #[test]
    fn unmapped_private_use_codepoint_is_tbd() {
        let ev = decode(b"\x1b[57344u");
        match ev {
            DecodedEvent::Key(k) => assert_eq!(k.codepoint, Codepoint::Tbd),
            _ => panic!("expected key event"),
        }
    }

    #[test]
    fn legacy_tilde_f5() {
        let ev = decode(b"\x1b[15~");
        match ev {
            DecodedEvent::Key(k) => {
                assert_eq!(k.codepoint, Codepoint::Named(NamedKey::F(5)));
            }
            _ => panic!("expected key event"),
        }
    }

    #[test]
    fn bracketed_paste() {
        let ev = decode(b"\x1b[200~abc\x1b[201~");
        assert_eq!(
            ev,
            DecodedEvent::Paste(PasteEvent {
                text: "abc".to_string()
            })
        );
    }

    #[test]
    fn esc_followed_by_non_bracket_buffers_next_byte() {
        let mut dec = Decoder::new();
        let mut src = SliceSource::new(b"\x1bxa");
        let first = dec.decode_one(&mut src).unwrap().unwrap();
        assert_eq!(
            first,
            DecodedEvent::Key(KeyEvent::simple(Codepoint::Named(NamedKey::Esc)))
        );
        let second = dec.decode_one(&mut src).unwrap().unwrap();
        assert_eq!(
            second,
            DecodedEvent::Key(KeyEvent::simple(Codepoint::Char('x')))
        );
    }

    #[test]
    fn malformed_csi_reports_error_without_hanging() {
        let long: Vec<u8> = std::iter::repeat(b'9').take(200).collect();
        let mut bytes = vec![ESC, b'['];
        bytes.extend(long);
        let mut dec = Decoder::new();
        let mut src = SliceSource::new(&bytes);
        assert!(dec.decode_one(&mut src).is_err());
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..128)) {
            let mut dec = Decoder::new();
            let mut src = SliceSource::new(&bytes);
            loop {
                match dec.decode_one(&mut src) {
                    Ok(Some(_)) => continue,
                    Ok(None) => break,
                    Err(_) => break,
                }
            }
        }
    }
}
