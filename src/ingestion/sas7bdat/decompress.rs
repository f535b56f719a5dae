//! Row decompression for compressed SAS7BDAT datasets.
//!
//! Compressed datasets store each row as a data subheader whose payload is shorter than the
//! row length. Two schemes exist: RLE (`SASYZCRL`), a byte-oriented run-length code, and RDC
//! (`SASYZCR2`), Ross Data Compression, which adds back-references.

use crate::error::{ReadError, ReadResult};

use super::FORMAT;

/// Decompression scheme named in the first column-text subheader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Rows are stored verbatim.
    #[default]
    None,
    /// Run-length encoding.
    Rle,
    /// Ross Data Compression.
    Rdc,
}

impl Compression {
    const RLE_LITERAL: &'static [u8] = b"SASYZCRL";
    const RDC_LITERAL: &'static [u8] = b"SASYZCR2";

    /// Detect the scheme from the text of the first column-text block.
    pub fn detect(text_block: &[u8]) -> Self {
        let has = |lit: &[u8]| text_block.windows(lit.len()).any(|w| w == lit);
        if has(Self::RDC_LITERAL) {
            Self::Rdc
        } else if has(Self::RLE_LITERAL) {
            Self::Rle
        } else {
            Self::None
        }
    }

    /// Expand a compressed row to exactly `row_length` bytes.
    pub fn decompress(self, input: &[u8], row_length: usize) -> ReadResult<Vec<u8>> {
        match self {
            Self::None => Ok(input.to_vec()),
            Self::Rle => rle_decompress(input, row_length),
            Self::Rdc => rdc_decompress(input, row_length),
        }
    }
}

fn byte_at(input: &[u8], pos: usize, scheme: &str) -> ReadResult<u8> {
    input
        .get(pos)
        .copied()
        .ok_or_else(|| ReadError::malformed(FORMAT, format!("{scheme}: input ends mid-command")))
}

fn check_length(out: &[u8], expected: usize, scheme: &str) -> ReadResult<()> {
    if out.len() == expected {
        Ok(())
    } else {
        Err(ReadError::malformed(
            FORMAT,
            format!("{scheme}: decompressed {} bytes, expected {expected}", out.len()),
        ))
    }
}

/// Decode an RLE-compressed row.
///
/// Each command byte splits into a high nibble (the command) and a low nibble (part of the
/// length). Commands either copy literal bytes from the input or emit a run of one byte.
pub fn rle_decompress(input: &[u8], row_length: usize) -> ReadResult<Vec<u8>> {
    const SCHEME: &str = "RLE";
    let mut out: Vec<u8> = Vec::with_capacity(row_length);
    let mut ipos = 0;

    let copy = |out: &mut Vec<u8>, ipos: &mut usize, n: usize| -> ReadResult<()> {
        let chunk = input.get(*ipos..*ipos + n).ok_or_else(|| {
            ReadError::malformed(FORMAT, format!("{SCHEME}: literal run past end of input"))
        })?;
        out.extend_from_slice(chunk);
        *ipos += n;
        Ok(())
    };

    while ipos < input.len() {
        let control = input[ipos] & 0xF0;
        let low = usize::from(input[ipos] & 0x0F);
        ipos += 1;

        match control {
            0x00 => {
                let n = usize::from(byte_at(input, ipos, SCHEME)?) + 64 + low * 256;
                ipos += 1;
                copy(&mut out, &mut ipos, n)?;
            }
            0x40 => {
                let n = usize::from(byte_at(input, ipos, SCHEME)?) + 18 + low * 256;
                let b = byte_at(input, ipos + 1, SCHEME)?;
                ipos += 2;
                out.resize(out.len() + n, b);
            }
            0x60 => {
                let n = low * 256 + usize::from(byte_at(input, ipos, SCHEME)?) + 17;
                ipos += 1;
                out.resize(out.len() + n, b' ');
            }
            0x70 => {
                let n = low * 256 + usize::from(byte_at(input, ipos, SCHEME)?) + 17;
                ipos += 1;
                out.resize(out.len() + n, 0x00);
            }
            0x80 => copy(&mut out, &mut ipos, low + 1)?,
            0x90 => copy(&mut out, &mut ipos, low + 17)?,
            0xA0 => copy(&mut out, &mut ipos, low + 33)?,
            0xB0 => copy(&mut out, &mut ipos, low + 49)?,
            0xC0 => {
                let b = byte_at(input, ipos, SCHEME)?;
                ipos += 1;
                out.resize(out.len() + low + 3, b);
            }
            0xD0 => out.resize(out.len() + low + 2, b'@'),
            0xE0 => out.resize(out.len() + low + 2, b' '),
            0xF0 => out.resize(out.len() + low + 2, 0x00),
            other => {
                return Err(ReadError::malformed(
                    FORMAT,
                    format!("{SCHEME}: unknown control byte {other:#04x}"),
                ));
            }
        }

        if out.len() > row_length {
            break;
        }
    }

    check_length(&out, row_length, SCHEME)?;
    Ok(out)
}

/// Decode an RDC-compressed row.
///
/// A 16-bit control word precedes every group of 16 items; a clear bit means "copy one literal
/// byte", a set bit means "run a command": short/long runs of one byte, or short/long copies of
/// earlier output.
pub fn rdc_decompress(input: &[u8], row_length: usize) -> ReadResult<Vec<u8>> {
    const SCHEME: &str = "RDC";
    let mut out: Vec<u8> = Vec::with_capacity(row_length);
    let mut ipos = 0;
    let mut ctrl_bits: u16 = 0;
    let mut ctrl_mask: u16 = 0;

    let back_copy = |out: &mut Vec<u8>, ofs: usize, cnt: usize| -> ReadResult<()> {
        let start = out.len().checked_sub(ofs).ok_or_else(|| {
            ReadError::malformed(FORMAT, format!("{SCHEME}: back-reference before start of row"))
        })?;
        for k in 0..cnt {
            let b = out[start + k];
            out.push(b);
        }
        Ok(())
    };

    while ipos < input.len() {
        ctrl_mask >>= 1;
        if ctrl_mask == 0 {
            let hi = byte_at(input, ipos, SCHEME)?;
            let lo = byte_at(input, ipos + 1, SCHEME)?;
            ctrl_bits = u16::from_be_bytes([hi, lo]);
            ipos += 2;
            ctrl_mask = 0x8000;
        }

        if ctrl_bits & ctrl_mask == 0 {
            out.push(byte_at(input, ipos, SCHEME)?);
            ipos += 1;
            continue;
        }

        let command = byte_at(input, ipos, SCHEME)?;
        let cmd = usize::from((command >> 4) & 0x0F);
        let cnt = usize::from(command & 0x0F);
        ipos += 1;

        match cmd {
            // short run
            0 => {
                let b = byte_at(input, ipos, SCHEME)?;
                ipos += 1;
                out.resize(out.len() + cnt + 3, b);
            }
            // long run
            1 => {
                let n = cnt + (usize::from(byte_at(input, ipos, SCHEME)?) << 4) + 19;
                let b = byte_at(input, ipos + 1, SCHEME)?;
                ipos += 2;
                out.resize(out.len() + n, b);
            }
            // long pattern
            2 => {
                let ofs = cnt + 3 + (usize::from(byte_at(input, ipos, SCHEME)?) << 4);
                let n = usize::from(byte_at(input, ipos + 1, SCHEME)?) + 16;
                ipos += 2;
                back_copy(&mut out, ofs, n)?;
            }
            // short pattern; the command itself is the length
            _ => {
                let ofs = cnt + 3 + (usize::from(byte_at(input, ipos, SCHEME)?) << 4);
                ipos += 1;
                back_copy(&mut out, ofs, cmd)?;
            }
        }

        if out.len() > row_length {
            break;
        }
    }

    check_length(&out, row_length, SCHEME)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rle_literals_and_runs() {
        let input = [0x82, b'a', b'b', b'c', 0xC1, b'x', 0xE0, 0xF0];
        let out = rle_decompress(&input, 11).unwrap();
        assert_eq!(out, b"abcxxxx  \0\0");
    }

    #[test]
    fn rle_long_blank_run() {
        // 0x60: low * 256 + next + 17 blanks
        let out = rle_decompress(&[0x60, 0x03], 20).unwrap();
        assert_eq!(out, vec![b' '; 20]);
    }

    #[test]
    fn rle_length_mismatch_is_an_error() {
        let err = rle_decompress(&[0x80, b'a'], 4).unwrap_err();
        assert!(err.to_string().contains("decompressed 1 bytes, expected 4"));
    }

    #[test]
    fn rle_unknown_command_is_an_error() {
        assert!(rle_decompress(&[0x10], 4).is_err());
    }

    #[test]
    fn rdc_literals_only() {
        let out = rdc_decompress(&[0x00, 0x00, b'a', b'b'], 2).unwrap();
        assert_eq!(out, b"ab");
    }

    #[test]
    fn rdc_short_run() {
        let out = rdc_decompress(&[0x40, 0x00, b'a', 0x02, b'z'], 6).unwrap();
        assert_eq!(out, b"azzzzz");
    }

    #[test]
    fn rdc_short_pattern_copies_earlier_output() {
        let out = rdc_decompress(&[0x10, 0x00, b'a', b'b', b'c', 0x30, 0x00], 6).unwrap();
        assert_eq!(out, b"abcabc");
    }

    #[test]
    fn rdc_back_reference_before_start_fails() {
        assert!(rdc_decompress(&[0x80, 0x00, 0x30, 0x00], 3).is_err());
    }

    #[test]
    fn detects_scheme_from_text_block() {
        assert_eq!(Compression::detect(b"..SASYZCRL.."), Compression::Rle);
        assert_eq!(Compression::detect(b"..SASYZCR2.."), Compression::Rdc);
        assert_eq!(Compression::detect(b"DATASTEP"), Compression::None);
    }
}
