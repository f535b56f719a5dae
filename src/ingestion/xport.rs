//! SAS transport (XPORT version 5) reader.
//!
//! A transport file is a sequence of 80-byte cards:
//!
//! - library header, two cards of library info
//! - member header (its last digits give the namestr record size, 140 or 136)
//! - descriptor header, two cards of member info
//! - namestr header (gives the variable count), then one namestr record per variable,
//!   padded to a card boundary
//! - observation header, then fixed-length observation records, padded with blanks to a card
//!   boundary
//!
//! Numeric variables are big-endian IBM System/360 hexadecimal floats, truncated to 2-8 bytes.
//! Character variables are blank-padded text. Only the first member of a library is read.

use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::types::{DataType, Field, Schema, Table, Value};

const FORMAT: &str = "xport";
const CARD: usize = 80;

const LIBRARY_HEADER: &[u8] =
    b"HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!000000000000000000000000000000  ";
const MEMBER_HEADER_PREFIX: &[u8] =
    b"HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!000000000000000001600000000";
const DESCRIPTOR_HEADER: &[u8] =
    b"HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!000000000000000000000000000000  ";
const NAMESTR_HEADER_PREFIX: &[u8] = b"HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!000000";
const OBS_HEADER: &[u8] =
    b"HEADER RECORD*******OBS     HEADER RECORD!!!!!!!000000000000000000000000000000  ";
const NEXT_MEMBER_MARKER: &[u8] = b"HEADER RECORD*******MEMBER  HEADER RECORD";

const NAMESTR_LEN: usize = 140;
const BLANK_WORD: [u8; 8] = [b' '; 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VariableKind {
    Numeric,
    Character,
}

/// One variable as described by its namestr record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Variable {
    name: String,
    kind: VariableKind,
    length: usize,
}

/// Read a transport file into a raw (not yet normalized) [`Table`].
///
/// The whole file is read into memory and the handle is released before parsing.
pub fn read_xport_from_path(path: impl AsRef<Path>) -> ReadResult<Table> {
    let bytes = std::fs::read(path)?;
    read_xport(&bytes)
}

/// Parse an in-memory transport file.
pub fn read_xport(bytes: &[u8]) -> ReadResult<Table> {
    let mut cards = Cards::new(bytes);

    let library = cards.next_card("library header")?;
    if library != LIBRARY_HEADER {
        if contains(library, b"**COMPRESSED**") {
            return Err(ReadError::malformed(
                FORMAT,
                "header record indicates a CPORT file, which is not readable",
            ));
        }
        return Err(ReadError::malformed(FORMAT, "header record is not an XPORT file"));
    }
    cards.next_card("library info")?;
    cards.next_card("library modified date")?;

    let member = cards.next_card("member header")?;
    let descriptor = cards.next_card("descriptor header")?;
    if !member.starts_with(MEMBER_HEADER_PREFIX) || descriptor != DESCRIPTOR_HEADER {
        return Err(ReadError::malformed(FORMAT, "member header not found"));
    }
    let namestr_len = parse_ascii_number(&member[75..78], "namestr length")?;
    if namestr_len == 0 || namestr_len > NAMESTR_LEN {
        return Err(ReadError::malformed(
            FORMAT,
            format!("unsupported namestr length {namestr_len}"),
        ));
    }

    let member_info = cards.next_card("member info")?;
    log::debug!(
        "xport member {:?}",
        String::from_utf8_lossy(&member_info[8..16]).trim()
    );
    cards.next_card("member label")?;

    let namestr_header = cards.next_card("namestr header")?;
    if !namestr_header.starts_with(NAMESTR_HEADER_PREFIX) {
        return Err(ReadError::malformed(FORMAT, "namestr header not found"));
    }
    let variable_count = parse_ascii_number(&namestr_header[54..58], "variable count")?;

    let mut namestr_bytes = namestr_len * variable_count;
    if namestr_bytes % CARD != 0 {
        namestr_bytes += CARD - namestr_bytes % CARD;
    }
    let namestrs = cards.take(namestr_bytes, "namestr records")?;
    let variables = namestrs
        .chunks(namestr_len)
        .take(variable_count)
        .map(parse_namestr)
        .collect::<ReadResult<Vec<_>>>()?;

    if cards.next_card("observation header")? != OBS_HEADER {
        return Err(ReadError::malformed(FORMAT, "observation header not found"));
    }

    let records = member_records(cards.rest());
    let record_length: usize = variables.iter().map(|v| v.length).sum();
    let row_count = record_count(records, record_length);

    let mut rows = Vec::with_capacity(row_count);
    if record_length > 0 {
        for (row_idx, record) in records.chunks_exact(record_length).take(row_count).enumerate() {
            rows.push(decode_record(record, &variables, row_idx)?);
        }
    }

    let schema = Schema::new(
        variables
            .iter()
            .map(|v| {
                let data_type = match v.kind {
                    VariableKind::Numeric => DataType::Float64,
                    VariableKind::Character => DataType::Utf8,
                };
                Field::new(v.name.clone(), data_type)
            })
            .collect(),
    );
    Ok(Table::new(schema, rows))
}

struct Cards<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cards<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize, what: &str) -> ReadResult<&'a [u8]> {
        let end = self.pos + len;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| ReadError::malformed(FORMAT, format!("file ends before {what}")))?;
        self.pos = end;
        Ok(slice)
    }

    fn next_card(&mut self, what: &str) -> ReadResult<&'a [u8]> {
        self.take(CARD, what)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn parse_ascii_number(bytes: &[u8], what: &str) -> ReadResult<usize> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            ReadError::malformed(
                FORMAT,
                format!("invalid {what} {:?}", String::from_utf8_lossy(bytes)),
            )
        })
}

fn parse_namestr(raw: &[u8]) -> ReadResult<Variable> {
    let mut record = [0u8; NAMESTR_LEN];
    record[..raw.len()].copy_from_slice(raw);

    let ntype = i16::from_be_bytes([record[0], record[1]]);
    let length = i16::from_be_bytes([record[4], record[5]]);
    let name = decode_text(record[8..16].trim_ascii(), "variable name")?;

    let kind = match ntype {
        1 => VariableKind::Numeric,
        2 => VariableKind::Character,
        other => {
            return Err(ReadError::malformed(
                FORMAT,
                format!("variable '{name}' has unknown type code {other}"),
            ));
        }
    };
    let length = usize::try_from(length).unwrap_or(0);
    if kind == VariableKind::Numeric && !(2..=8).contains(&length) {
        return Err(ReadError::malformed(
            FORMAT,
            format!("floating field width {length} of '{name}' is not between 2 and 8"),
        ));
    }
    if length == 0 {
        return Err(ReadError::malformed(
            FORMAT,
            format!("variable '{name}' has zero length"),
        ));
    }

    Ok(Variable {
        name: name.to_owned(),
        kind,
        length,
    })
}

/// Observation bytes of the first member: everything up to the next member header.
fn member_records(rest: &[u8]) -> &[u8] {
    let next_member = rest
        .chunks(CARD)
        .position(|card| card.starts_with(NEXT_MEMBER_MARKER))
        .map(|idx| idx * CARD);
    match next_member {
        Some(end) => {
            log::debug!("xport library has more than one member; reading the first");
            &rest[..end]
        }
        None => rest,
    }
}

fn record_count(records: &[u8], record_length: usize) -> usize {
    if record_length == 0 {
        return 0;
    }
    if records.len() % CARD != 0 {
        log::warn!(
            "xport observation area is {} bytes, not a multiple of {CARD}; file may be corrupted",
            records.len()
        );
    }
    if record_length > CARD {
        return records.len() / record_length;
    }

    // Short records: the last card may end in blank padding that is not an observation.
    let tail_pad = if records.len() >= CARD {
        let last = &records[records.len() - CARD..];
        8 * last
            .chunks_exact(8)
            .filter(|word| *word == BLANK_WORD)
            .count()
    } else {
        0
    };
    records.len().saturating_sub(tail_pad) / record_length
}

fn decode_record(record: &[u8], variables: &[Variable], row_idx: usize) -> ReadResult<Vec<Value>> {
    let mut row = Vec::with_capacity(variables.len());
    let mut offset = 0;
    for v in variables {
        let raw = &record[offset..offset + v.length];
        offset += v.length;
        let value = match v.kind {
            VariableKind::Numeric => {
                let mut word = [0u8; 8];
                word[..raw.len()].copy_from_slice(raw);
                ibm_to_f64(word).map_or(Value::Null, Value::Float64)
            }
            VariableKind::Character => {
                let text = std::str::from_utf8(raw.trim_ascii_end()).map_err(|source| {
                    ReadError::Encoding {
                        context: format!("column '{}' row {}", v.name, row_idx + 1),
                        source,
                    }
                })?;
                Value::Utf8(text.to_owned())
            }
        };
        row.push(value);
    }
    Ok(row)
}

fn decode_text<'a>(bytes: &'a [u8], context: &str) -> ReadResult<&'a str> {
    std::str::from_utf8(bytes).map_err(|source| ReadError::Encoding {
        context: context.to_string(),
        source,
    })
}

/// Convert a big-endian IBM hexadecimal double to IEEE 754.
///
/// Returns `None` for SAS missing values: `.`, `_` or `A`-`Z` followed by seven zero bytes.
pub fn ibm_to_f64(bytes: [u8; 8]) -> Option<f64> {
    let first = bytes[0];
    if (first == b'.' || first == b'_' || first.is_ascii_uppercase())
        && bytes[1..].iter().all(|b| *b == 0)
    {
        return None;
    }

    let mantissa = bytes[1..]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    if mantissa == 0 {
        return Some(0.0);
    }

    // value = 0.mantissa (56 bits) * 16^(exponent - 64)
    let exponent = i32::from(first & 0x7f) - 64;
    let magnitude = mantissa as f64 * 2f64.powi(4 * exponent - 56);
    Some(if first & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    })
}
