//! KKBP support detection (spec §4.C): query the terminal and see whether
//! it answers the Kitty Keyboard Protocol status query.

use crate::source::ByteSource;

const QUERY: &[u8] = b"\x1b[?u\x1b[c";

/// Writes the detection query to `write` and reads from `src` until a
/// terminal's reply ends in `u` (KKBP supported) or `c` (primary device
/// attributes only, no KKBP) is seen.
pub fn detect<S: ByteSource>(
    src: &mut S,
    mut write: impl FnMut(&[u8]) -> std::io::Result<()>,
) -> std::io::Result<bool> {
    write(QUERY)?;
    let mut buf = Vec::new();
    loop {
        match src.read_byte()? {
            Some(b) => {
                buf.push(b);
                if b == b'u' {
                    return Ok(true);
                }
                if b == b'c' {
                    return Ok(false);
                }
                if buf.len() > 128 {
                    return Ok(false);
                }
            }
            None => return Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn reply_ending_in_u_means_supported() {
        let mut src = SliceSource::new(b"\x1b[?15u");
        let supported = detect(&mut src, |_| Ok(())).unwrap();
        assert!(supported);
    }

    #[test]
    fn reply_ending_in_c_means_unsupported() {
        let mut src = SliceSource::new(b"\x1b[?1;2c");
        let supported = detect(&mut src, |_| Ok(())).unwrap();
        assert!(!supported);
    }

    #[test]
    fn no_reply_means_unsupported() {
        let mut src = SliceSource::new(b"");
        let supported = detect(&mut src, |_| Ok(())).unwrap();
        assert!(!supported);
    }
}
