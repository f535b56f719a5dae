//! SAS7BDAT dataset reader.
//!
//! A dataset is a header followed by fixed-size pages. The header gives the word size (32 or 64
//! bit), the byte order, and the header and page sizes. Each page starts with a small page header
//! and a table of subheader pointers:
//!
//! - **meta** pages carry subheaders only: column metadata and, in compressed datasets, one data
//!   subheader per (compressed) row
//! - **data** pages carry `block_count` uncompressed rows right after the page header
//! - **mix** pages carry subheaders followed by uncompressed rows
//!
//! Column metadata (row size, names, offsets and widths) is collected up to and including the
//! first page that carries rows; later meta pages are only scanned for data subheaders.
//! Numeric columns are (possibly truncated) IEEE doubles in file byte order; character columns
//! are blank- or NUL-padded UTF-8.

mod decompress;

use std::borrow::Cow;
use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::types::{DataType, Field, Schema, Table, Value};

pub use decompress::{Compression, rdc_decompress, rle_decompress};

const FORMAT: &str = "sas7bdat";

const MAGIC: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc2, 0xea, 0x81, 0x60,
    0xb3, 0x14, 0x11, 0xcf, 0xbd, 0x92, 0x08, 0x00, 0x09, 0xc7, 0x31, 0x8c, 0x18, 0x1f, 0x10, 0x11,
];
const MIN_HEADER_LEN: usize = 288;

const PAGE_TYPE_MASK: u64 = 0xFF00;
const PAGE_META: u64 = 0x0000;
const PAGE_DATA: u64 = 0x0100;
const PAGE_MIX: u64 = 0x0200;
const PAGE_AMD: u64 = 0x0400;
const PAGE_META2: u64 = 0x4000;
const PAGE_COMP: u64 = 0x9000;

const SUBHEADER_POINTERS_OFFSET: usize = 8;
const TRUNCATED_SUBHEADER_ID: u8 = 1;
const COMPRESSED_SUBHEADER_ID: u8 = 4;
const COMPRESSED_SUBHEADER_TYPE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubheaderKind {
    RowSize,
    ColumnSize,
    SubheaderCounts,
    ColumnText,
    ColumnName,
    ColumnAttributes,
    FormatAndLabel,
    ColumnList,
}

/// Known subheader signatures, 4-byte (32-bit files) and 8-byte (64-bit files) forms.
const SIGNATURES: &[(&[u8], SubheaderKind)] = &[
    (b"\xF7\xF7\xF7\xF7", SubheaderKind::RowSize),
    (b"\x00\x00\x00\x00\xF7\xF7\xF7\xF7", SubheaderKind::RowSize),
    (b"\xF7\xF7\xF7\xF7\x00\x00\x00\x00", SubheaderKind::RowSize),
    (b"\xF7\xF7\xF7\xF7\xFF\xFF\xFB\xFE", SubheaderKind::RowSize),
    (b"\xF6\xF6\xF6\xF6", SubheaderKind::ColumnSize),
    (b"\x00\x00\x00\x00\xF6\xF6\xF6\xF6", SubheaderKind::ColumnSize),
    (b"\xF6\xF6\xF6\xF6\x00\x00\x00\x00", SubheaderKind::ColumnSize),
    (b"\xF6\xF6\xF6\xF6\xFF\xFF\xFB\xFE", SubheaderKind::ColumnSize),
    (b"\x00\xFC\xFF\xFF", SubheaderKind::SubheaderCounts),
    (b"\xFF\xFF\xFC\x00", SubheaderKind::SubheaderCounts),
    (b"\x00\xFC\xFF\xFF\xFF\xFF\xFF\xFF", SubheaderKind::SubheaderCounts),
    (b"\xFF\xFF\xFF\xFF\xFF\xFF\xFC\x00", SubheaderKind::SubheaderCounts),
    (b"\xFD\xFF\xFF\xFF", SubheaderKind::ColumnText),
    (b"\xFF\xFF\xFF\xFD", SubheaderKind::ColumnText),
    (b"\xFD\xFF\xFF\xFF\xFF\xFF\xFF\xFF", SubheaderKind::ColumnText),
    (b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFD", SubheaderKind::ColumnText),
    (b"\xFF\xFF\xFF\xFF", SubheaderKind::ColumnName),
    (b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF", SubheaderKind::ColumnName),
    (b"\xFC\xFF\xFF\xFF", SubheaderKind::ColumnAttributes),
    (b"\xFF\xFF\xFF\xFC", SubheaderKind::ColumnAttributes),
    (b"\xFC\xFF\xFF\xFF\xFF\xFF\xFF\xFF", SubheaderKind::ColumnAttributes),
    (b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFC", SubheaderKind::ColumnAttributes),
    (b"\xFE\xFB\xFF\xFF", SubheaderKind::FormatAndLabel),
    (b"\xFF\xFF\xFB\xFE", SubheaderKind::FormatAndLabel),
    (b"\xFE\xFB\xFF\xFF\xFF\xFF\xFF\xFF", SubheaderKind::FormatAndLabel),
    (b"\xFF\xFF\xFF\xFF\xFF\xFF\xFB\xFE", SubheaderKind::FormatAndLabel),
    (b"\xFE\xFF\xFF\xFF", SubheaderKind::ColumnList),
    (b"\xFF\xFF\xFF\xFE", SubheaderKind::ColumnList),
    (b"\xFE\xFF\xFF\xFF\xFF\xFF\xFF\xFF", SubheaderKind::ColumnList),
    (b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFE", SubheaderKind::ColumnList),
];

fn classify(signature: &[u8]) -> Option<SubheaderKind> {
    SIGNATURES
        .iter()
        .find(|(sig, _)| *sig == signature)
        .map(|(_, kind)| *kind)
}

/// Read a SAS7BDAT dataset into a raw (not yet normalized) [`Table`].
///
/// The whole file is read into memory and the handle is released before parsing.
pub fn read_sas7bdat_from_path(path: impl AsRef<Path>) -> ReadResult<Table> {
    let bytes = std::fs::read(path)?;
    read_sas7bdat(&bytes)
}

/// Parse an in-memory SAS7BDAT dataset.
pub fn read_sas7bdat(bytes: &[u8]) -> ReadResult<Table> {
    let header = Header::parse(bytes)?;
    log::debug!(
        "sas7bdat: {}-bit {}, header {} bytes, page {} bytes, {} pages",
        if header.layout.u64 { 64 } else { 32 },
        if header.layout.little_endian {
            "little-endian"
        } else {
            "big-endian"
        },
        header.header_length,
        header.page_length,
        header.page_count
    );

    let mut parser = Parser::new(header.layout);
    let pages = &bytes[header.header_length..];
    for (page_idx, page) in pages.chunks(header.page_length).enumerate() {
        if page.len() != header.page_length {
            return Err(ReadError::malformed(
                FORMAT,
                format!("page {page_idx} is truncated ({} bytes)", page.len()),
            ));
        }
        parser.process_page(page, page_idx)?;
        if parser.has_all_rows() {
            break;
        }
    }
    parser.finish()
}

/// Word size and byte order of a dataset.
#[derive(Debug, Clone, Copy)]
struct Layout {
    u64: bool,
    little_endian: bool,
}

impl Layout {
    fn int_len(self) -> usize {
        if self.u64 { 8 } else { 4 }
    }

    fn page_bit_offset(self) -> usize {
        if self.u64 { 32 } else { 16 }
    }

    fn subheader_pointer_len(self) -> usize {
        if self.u64 { 24 } else { 12 }
    }

    fn read_uint(self, bytes: &[u8], offset: usize, width: usize) -> ReadResult<u64> {
        let raw = slice(bytes, offset, width, "integer field")?;
        let mut word = [0u8; 8];
        Ok(if self.little_endian {
            word[..width].copy_from_slice(raw);
            u64::from_le_bytes(word)
        } else {
            word[8 - width..].copy_from_slice(raw);
            u64::from_be_bytes(word)
        })
    }

    fn read_usize(self, bytes: &[u8], offset: usize, width: usize) -> ReadResult<usize> {
        let v = self.read_uint(bytes, offset, width)?;
        usize::try_from(v)
            .map_err(|_| ReadError::malformed(FORMAT, format!("offset {v} does not fit in memory")))
    }

    /// Decode a numeric cell: an IEEE double with its low-order bytes truncated.
    fn double(self, raw: &[u8]) -> Option<f64> {
        let mut word = [0u8; 8];
        let v = if self.little_endian {
            word[8 - raw.len()..].copy_from_slice(raw);
            f64::from_le_bytes(word)
        } else {
            word[..raw.len()].copy_from_slice(raw);
            f64::from_be_bytes(word)
        };
        (!v.is_nan()).then_some(v)
    }
}

fn slice<'a>(bytes: &'a [u8], offset: usize, len: usize, what: &str) -> ReadResult<&'a [u8]> {
    let range = offset.checked_add(len).map(|end| offset..end);
    range.and_then(|r| bytes.get(r)).ok_or_else(|| {
        ReadError::malformed(
            FORMAT,
            format!("{what} at offset {offset} (+{len}) runs past the end of its block"),
        )
    })
}

fn byte(bytes: &[u8], offset: usize) -> ReadResult<u8> {
    slice(bytes, offset, 1, "flag byte").map(|b| b[0])
}

struct Header {
    layout: Layout,
    header_length: usize,
    page_length: usize,
    page_count: usize,
}

impl Header {
    fn parse(bytes: &[u8]) -> ReadResult<Self> {
        if bytes.len() < MIN_HEADER_LEN {
            return Err(ReadError::malformed(
                FORMAT,
                format!("file is {} bytes, shorter than the header", bytes.len()),
            ));
        }
        if bytes[..MAGIC.len()] != MAGIC {
            return Err(ReadError::malformed(
                FORMAT,
                "magic number mismatch (not a SAS7BDAT file)",
            ));
        }

        let layout = Layout {
            u64: bytes[32] == b'3',
            little_endian: bytes[37] == 0x01,
        };
        let align = if bytes[35] == b'3' { 4 } else { 0 };

        let header_length = layout.read_usize(bytes, 196 + align, 4)?;
        let page_length = layout.read_usize(bytes, 200 + align, 4)?;
        let page_count = layout.read_usize(bytes, 204 + align, layout.int_len())?;

        if header_length < MIN_HEADER_LEN || bytes.len() < header_length {
            return Err(ReadError::malformed(
                FORMAT,
                "the file appears to be truncated inside its header",
            ));
        }
        if page_length == 0 {
            return Err(ReadError::malformed(FORMAT, "page size is zero"));
        }

        Ok(Self {
            layout,
            header_length,
            page_length,
            page_count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Character,
}

#[derive(Debug, Clone, Copy)]
struct ColumnAttributes {
    offset: usize,
    length: usize,
    kind: ColumnKind,
}

#[derive(Debug, Default)]
struct Metadata {
    row_size_seen: bool,
    row_length: usize,
    row_count: usize,
    col_count_p1: usize,
    col_count_p2: usize,
    mix_page_row_count: usize,
    column_count: usize,
    compression: Compression,
    text_blocks: Vec<Vec<u8>>,
    column_names: Vec<String>,
    attributes: Vec<ColumnAttributes>,
}

struct Parser<'a> {
    layout: Layout,
    meta: Metadata,
    metadata_done: bool,
    /// Row payloads in file order; compressed ones are shorter than the row length.
    rows: Vec<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            meta: Metadata::default(),
            metadata_done: false,
            rows: Vec::new(),
        }
    }

    fn has_all_rows(&self) -> bool {
        self.metadata_done && self.rows.len() >= self.meta.row_count
    }

    fn process_page(&mut self, page: &'a [u8], page_idx: usize) -> ReadResult<()> {
        let l = self.layout;
        let bit = l.page_bit_offset();
        let page_type = l.read_uint(page, bit, 2)? & PAGE_TYPE_MASK;
        let block_count = l.read_usize(page, bit + 2, 2)?;
        let subheader_count = l.read_usize(page, bit + 4, 2)?;
        log::trace!(
            "sas7bdat page {page_idx}: type {page_type:#06x}, {block_count} blocks, {subheader_count} subheaders"
        );

        let is_meta = page_type == PAGE_META || page_type == PAGE_META2;
        let rows_before = self.rows.len();

        if !self.metadata_done && (is_meta || page_type == PAGE_MIX || page_type == PAGE_AMD) {
            self.process_subheaders(page, subheader_count, true)?;
        } else if is_meta {
            self.process_subheaders(page, subheader_count, false)?;
        }

        match page_type {
            PAGE_META | PAGE_META2 | PAGE_AMD | PAGE_COMP => {}
            PAGE_MIX => {
                let start = bit
                    + SUBHEADER_POINTERS_OFFSET
                    + subheader_count * l.subheader_pointer_len();
                let start = start + start % 8;
                let count = self.meta.row_count.min(self.meta.mix_page_row_count);
                self.push_plain_rows(page, start, count)?;
            }
            PAGE_DATA => {
                self.push_plain_rows(page, bit + SUBHEADER_POINTERS_OFFSET, block_count)?;
            }
            other => {
                return Err(ReadError::malformed(
                    FORMAT,
                    format!("page {page_idx} has unknown type {other:#06x}"),
                ));
            }
        }

        if page_type == PAGE_MIX || page_type == PAGE_DATA || self.rows.len() > rows_before {
            self.metadata_done = true;
        }
        Ok(())
    }

    fn push_plain_rows(&mut self, page: &'a [u8], start: usize, count: usize) -> ReadResult<()> {
        let row_length = self.meta.row_length;
        if !self.meta.row_size_seen || row_length == 0 {
            return Err(ReadError::malformed(
                FORMAT,
                "rows found before the row size subheader",
            ));
        }
        let remaining = self.meta.row_count.saturating_sub(self.rows.len());
        for i in 0..count.min(remaining) {
            let at = i
                .checked_mul(row_length)
                .and_then(|ofs| ofs.checked_add(start))
                .ok_or_else(|| {
                    ReadError::malformed(FORMAT, format!("row {i} offset overflows the page"))
                })?;
            self.rows.push(slice(page, at, row_length, "row")?);
        }
        Ok(())
    }

    fn process_subheaders(
        &mut self,
        page: &'a [u8],
        count: usize,
        collect_metadata: bool,
    ) -> ReadResult<()> {
        let l = self.layout;
        let int_len = l.int_len();
        for i in 0..count {
            let base =
                l.page_bit_offset() + SUBHEADER_POINTERS_OFFSET + i * l.subheader_pointer_len();
            let offset = l.read_usize(page, base, int_len)?;
            let length = l.read_usize(page, base + int_len, int_len)?;
            let compression = byte(page, base + 2 * int_len)?;
            let subheader_type = byte(page, base + 2 * int_len + 1)?;

            if length == 0 || compression == TRUNCATED_SUBHEADER_ID {
                continue;
            }

            let body = slice(page, offset, length, "subheader")?;
            let signature = slice(body, 0, int_len, "subheader signature")?;
            match classify(signature) {
                Some(kind) if collect_metadata => self.process_subheader(kind, body)?,
                Some(_) => {}
                None => {
                    let is_data = self.meta.compression != Compression::None
                        && (compression == COMPRESSED_SUBHEADER_ID || compression == 0)
                        && subheader_type == COMPRESSED_SUBHEADER_TYPE;
                    if !is_data {
                        return Err(ReadError::malformed(
                            FORMAT,
                            format!("unknown subheader signature {signature:02x?}"),
                        ));
                    }
                    self.rows.push(body);
                }
            }
        }
        Ok(())
    }

    fn process_subheader(&mut self, kind: SubheaderKind, body: &[u8]) -> ReadResult<()> {
        let l = self.layout;
        let int_len = l.int_len();
        match kind {
            SubheaderKind::RowSize => {
                let m = &mut self.meta;
                m.row_length = l.read_usize(body, 5 * int_len, int_len)?;
                m.row_count = l.read_usize(body, 6 * int_len, int_len)?;
                m.col_count_p1 = l.read_usize(body, 9 * int_len, int_len)?;
                m.col_count_p2 = l.read_usize(body, 10 * int_len, int_len)?;
                m.mix_page_row_count = l.read_usize(body, 15 * int_len, int_len)?;
                m.row_size_seen = true;
                log::debug!(
                    "sas7bdat rows: {} of {} bytes",
                    m.row_count,
                    m.row_length
                );
            }
            SubheaderKind::ColumnSize => {
                let m = &mut self.meta;
                m.column_count = l.read_usize(body, int_len, int_len)?;
                if m.col_count_p1.checked_add(m.col_count_p2) != Some(m.column_count) {
                    log::warn!(
                        "sas7bdat: column count mismatch ({} + {} != {})",
                        m.col_count_p1,
                        m.col_count_p2,
                        m.column_count
                    );
                }
            }
            SubheaderKind::ColumnText => {
                let size = l.read_usize(body, int_len, 2)?;
                let block = slice(body, int_len, size, "column text block")?;
                if self.meta.text_blocks.is_empty() {
                    self.meta.compression = Compression::detect(block);
                    log::debug!("sas7bdat compression: {:?}", self.meta.compression);
                }
                self.meta.text_blocks.push(block.to_vec());
            }
            SubheaderKind::ColumnName => self.process_column_names(body)?,
            SubheaderKind::ColumnAttributes => self.process_column_attributes(body)?,
            SubheaderKind::SubheaderCounts
            | SubheaderKind::FormatAndLabel
            | SubheaderKind::ColumnList => {}
        }
        Ok(())
    }

    fn vector_count(&self, body: &[u8], entry_len: usize, what: &str) -> ReadResult<usize> {
        body.len()
            .checked_sub(2 * self.layout.int_len() + 12)
            .map(|n| n / entry_len)
            .ok_or_else(|| ReadError::malformed(FORMAT, format!("{what} subheader is too short")))
    }

    fn process_column_names(&mut self, body: &[u8]) -> ReadResult<()> {
        let l = self.layout;
        let count = self.vector_count(body, 8, "column name")?;
        for i in 0..count {
            let base = l.int_len() + 8 * (i + 1);
            let block_idx = l.read_usize(body, base, 2)?;
            let name_offset = l.read_usize(body, base + 2, 2)?;
            let name_length = l.read_usize(body, base + 4, 2)?;

            let block = self.meta.text_blocks.get(block_idx).ok_or_else(|| {
                ReadError::malformed(FORMAT, format!("column name refers to text block {block_idx}"))
            })?;
            let raw = slice(block, name_offset, name_length, "column name")?;
            let name = std::str::from_utf8(trim_padding(raw)).map_err(|source| {
                ReadError::Encoding {
                    context: format!("column name {}", self.meta.column_names.len() + 1),
                    source,
                }
            })?;
            self.meta.column_names.push(name.to_owned());
        }
        Ok(())
    }

    fn process_column_attributes(&mut self, body: &[u8]) -> ReadResult<()> {
        let l = self.layout;
        let int_len = l.int_len();
        let stride = int_len + 8;
        let count = self.vector_count(body, stride, "column attributes")?;
        for i in 0..count {
            let offset = l.read_usize(body, int_len + 8 + i * stride, int_len)?;
            let length = l.read_usize(body, 2 * int_len + 8 + i * stride, 4)?;
            let kind = match byte(body, 2 * int_len + 14 + i * stride)? {
                1 => ColumnKind::Numeric,
                _ => ColumnKind::Character,
            };
            self.meta.attributes.push(ColumnAttributes {
                offset,
                length,
                kind,
            });
        }
        Ok(())
    }

    fn finish(self) -> ReadResult<Table> {
        let m = &self.meta;
        if !m.row_size_seen {
            return Err(ReadError::malformed(FORMAT, "row size subheader not found"));
        }
        if m.attributes.len() < m.column_names.len() {
            return Err(ReadError::malformed(
                FORMAT,
                format!(
                    "{} column names but only {} column attribute entries",
                    m.column_names.len(),
                    m.attributes.len()
                ),
            ));
        }
        if m.column_names.len() != m.column_count {
            log::warn!(
                "sas7bdat: header declares {} columns, found {} names",
                m.column_count,
                m.column_names.len()
            );
        }
        if self.rows.len() < m.row_count {
            log::warn!(
                "sas7bdat: header declares {} rows, found {}",
                m.row_count,
                self.rows.len()
            );
        }

        let columns: Vec<(&str, ColumnAttributes)> = m
            .column_names
            .iter()
            .map(String::as_str)
            .zip(m.attributes.iter().copied())
            .collect();

        let mut rows = Vec::with_capacity(self.rows.len().min(m.row_count));
        for (row_idx, payload) in self.rows.iter().take(m.row_count).enumerate() {
            let row = if m.compression != Compression::None && payload.len() < m.row_length {
                Cow::Owned(m.compression.decompress(payload, m.row_length)?)
            } else {
                Cow::Borrowed(*payload)
            };
            rows.push(self.decode_row(&row, &columns, row_idx)?);
        }

        let schema = Schema::new(
            columns
                .iter()
                .map(|(name, attrs)| {
                    let data_type = match attrs.kind {
                        ColumnKind::Numeric => DataType::Float64,
                        ColumnKind::Character => DataType::Utf8,
                    };
                    Field::new(*name, data_type)
                })
                .collect(),
        );
        Ok(Table::new(schema, rows))
    }

    fn decode_row(
        &self,
        row: &[u8],
        columns: &[(&str, ColumnAttributes)],
        row_idx: usize,
    ) -> ReadResult<Vec<Value>> {
        let mut out = Vec::with_capacity(columns.len());
        for (name, attrs) in columns {
            let raw = slice(row, attrs.offset, attrs.length, "cell")?;
            let value = match attrs.kind {
                ColumnKind::Numeric => {
                    if raw.is_empty() || raw.len() > 8 {
                        return Err(ReadError::malformed(
                            FORMAT,
                            format!("numeric column '{name}' has width {}", raw.len()),
                        ));
                    }
                    self.layout.double(raw).map_or(Value::Null, Value::Float64)
                }
                ColumnKind::Character => {
                    let text = std::str::from_utf8(trim_padding(raw)).map_err(|source| {
                        ReadError::Encoding {
                            context: format!("column '{name}' row {}", row_idx + 1),
                            source,
                        }
                    })?;
                    Value::Utf8(text.to_owned())
                }
            };
            out.push(value);
        }
        Ok(out)
    }
}

/// Strip trailing blanks and NULs.
fn trim_padding(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|b| *b != b' ' && *b != 0)
        .map_or(0, |p| p + 1);
    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_cover_both_word_sizes() {
        assert_eq!(classify(b"\xF7\xF7\xF7\xF7"), Some(SubheaderKind::RowSize));
        assert_eq!(
            classify(b"\x00\x00\x00\x00\xF7\xF7\xF7\xF7"),
            Some(SubheaderKind::RowSize)
        );
        assert_eq!(classify(b"\xFF\xFF\xFF\xFF"), Some(SubheaderKind::ColumnName));
        assert_eq!(classify(b"\x12\x34\x56\x78"), None);
    }

    #[test]
    fn truncated_doubles_are_padded_at_the_low_end() {
        let le = Layout {
            u64: false,
            little_endian: true,
        };
        let full = 98.5f64.to_le_bytes();
        // 98.5 needs only the top bytes of its mantissa.
        assert_eq!(le.double(&full[5..]), Some(98.5));

        let be = Layout {
            u64: false,
            little_endian: false,
        };
        let full = 98.5f64.to_be_bytes();
        assert_eq!(be.double(&full[..3]), Some(98.5));
        assert_eq!(be.double(&f64::NAN.to_be_bytes()), None);
    }

    #[test]
    fn padding_is_trimmed() {
        assert_eq!(trim_padding(b"Ada  \0\0"), b"Ada");
        assert_eq!(trim_padding(b"   "), b"");
    }

    #[test]
    fn slice_rejects_overflowing_ranges() {
        let err = slice(b"abc", usize::MAX, 8, "subheader").unwrap_err();
        assert!(matches!(err, ReadError::Malformed { .. }));
        assert_eq!(slice(b"abc", 1, 2, "cell").unwrap(), b"bc");
    }

    #[test]
    fn rejects_bad_magic() {
        let err = read_sas7bdat(&[0u8; 1024]).unwrap_err();
        assert!(err.to_string().contains("magic number mismatch"));
    }

    #[test]
    fn rejects_short_files() {
        let err = read_sas7bdat(&MAGIC).unwrap_err();
        assert!(err.to_string().contains("shorter than the header"));
    }
}
