//! Delimiter sniffing for delimited text.
//!
//! [`sniff_delimiter`] infers a delimiter from a text sample in two passes:
//!
//! 1. **Quote pass**: quoted text that is bracketed by the same non-word character on both sides
//!    (`,"text",`) names that character as the delimiter. The most frequent bracketing character
//!    wins.
//! 2. **Frequency pass**: a delimiter should occur the same number of times on every line. For
//!    each 7-bit ASCII character, count its occurrences per line, take the most common count (the
//!    mode) and measure how many lines agree with it. Characters whose mode is met on (close to)
//!    every line are candidates; ties are broken by a fixed preference order, then by the
//!    highest `(count, agreement, character)`.
//!
//! Loaders sniff only the first line of a file. With a single line every character that occurs
//! at all is a candidate, so the preference order decides most real headers.
//!
//! [`resolve_delimiter`] applies the loader policy on top of the raw guess: a sniffed space
//! becomes `$`, so space-padded text is read as one column instead of being split on blanks.

/// Tie-break order when several characters are equally consistent.
pub const PREFERRED_DELIMITERS: [char; 5] = [',', '\t', ';', ' ', ':'];

/// Delimiter used in place of a sniffed space.
pub const SPACE_SUBSTITUTE: char = '$';

const CHUNK_LINES: usize = 10;
const MIN_CONSISTENCY: f64 = 0.9;

/// Infer the delimiter of a text sample, or `None` if no candidate exists.
///
/// ```
/// use table_loader::ingestion::sniffer::sniff_delimiter;
///
/// assert_eq!(sniff_delimiter("id,name,score\n"), Some(','));
/// assert_eq!(sniff_delimiter("id;name;score\n"), Some(';'));
/// assert_eq!(sniff_delimiter(""), None);
/// ```
pub fn sniff_delimiter(sample: &str) -> Option<char> {
    let sample = sample.strip_prefix('\u{feff}').unwrap_or(sample);
    guess_from_quotes(sample).or_else(|| guess_from_frequencies(sample))
}

/// Map a sniffed delimiter to the one the CSV reader uses.
///
/// ```
/// use table_loader::ingestion::sniffer::resolve_delimiter;
///
/// assert_eq!(resolve_delimiter(','), ',');
/// assert_eq!(resolve_delimiter(' '), '$');
/// ```
pub fn resolve_delimiter(sniffed: char) -> char {
    if sniffed == ' ' {
        SPACE_SUBSTITUTE
    } else {
        sniffed
    }
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn is_delimiter_candidate(c: char) -> bool {
    !(c.is_alphanumeric() || c == '_' || c == '\n' || is_quote(c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteShape {
    /// `d"..."d`
    Bracketed,
    /// line start `"..."d`
    Leading,
    /// `d"..."` line end
    Trailing,
    /// line start `"..."` line end
    Bare,
}

#[derive(Debug, Clone, Copy)]
struct QuoteMatch {
    quote: char,
    delim: Option<char>,
    end: usize,
}

/// Ordered tally; `max` returns the earliest key among equal counts.
#[derive(Debug, Default)]
struct Tally(Vec<(char, usize)>);

impl Tally {
    fn bump(&mut self, key: char) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => self.0.push((key, 1)),
        }
    }

    fn max(&self) -> Option<char> {
        let mut best: Option<(char, usize)> = None;
        for &(k, n) in &self.0 {
            if best.is_none_or(|(_, b)| n > b) {
                best = Some((k, n));
            }
        }
        best.map(|(k, _)| k)
    }
}

fn guess_from_quotes(sample: &str) -> Option<char> {
    let chars: Vec<char> = sample.chars().collect();
    let matches = [
        QuoteShape::Bracketed,
        QuoteShape::Leading,
        QuoteShape::Trailing,
        QuoteShape::Bare,
    ]
    .into_iter()
    .map(|shape| find_quoted(&chars, shape))
    .find(|m| !m.is_empty())?;

    let mut quotes = Tally::default();
    let mut delims = Tally::default();
    for m in &matches {
        quotes.bump(m.quote);
        if let Some(d) = m.delim {
            delims.bump(d);
        }
    }
    log::trace!("quote pass: quotes={:?} delims={:?}", quotes.0, delims.0);
    delims.max().filter(|d| *d != '\n')
}

/// Non-overlapping left-to-right matches, like a regex `findall`.
fn find_quoted(chars: &[char], shape: QuoteShape) -> Vec<QuoteMatch> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        match match_at(chars, pos, shape) {
            Some(m) => {
                pos = m.end.max(pos + 1);
                out.push(m);
            }
            None => pos += 1,
        }
    }
    out
}

fn match_at(chars: &[char], i: usize, shape: QuoteShape) -> Option<QuoteMatch> {
    let at = |idx: usize| chars.get(idx).copied();
    match shape {
        QuoteShape::Bracketed | QuoteShape::Trailing => {
            let d = at(i).filter(|c| is_delimiter_candidate(*c))?;
            let open = if at(i + 1) == Some(' ') { i + 2 } else { i + 1 };
            let quote = at(open).filter(|c| is_quote(*c))?;
            let close = (open + 1..chars.len()).find(|&k| {
                chars[k] == quote
                    && match shape {
                        QuoteShape::Bracketed => at(k + 1) == Some(d),
                        _ => matches!(at(k + 1), None | Some('\n')),
                    }
            })?;
            let end = if shape == QuoteShape::Bracketed {
                close + 2
            } else {
                close + 1
            };
            Some(QuoteMatch {
                quote,
                delim: Some(d),
                end,
            })
        }
        QuoteShape::Leading | QuoteShape::Bare => {
            let open = if i == 0 || at(i - 1) == Some('\n') {
                i
            } else if at(i) == Some('\n') {
                i + 1
            } else {
                return None;
            };
            let quote = at(open).filter(|c| is_quote(*c))?;
            let close = (open + 1..chars.len()).find(|&k| {
                chars[k] == quote
                    && match shape {
                        QuoteShape::Leading => at(k + 1).is_some_and(is_delimiter_candidate),
                        _ => matches!(at(k + 1), None | Some('\n')),
                    }
            })?;
            if shape == QuoteShape::Leading {
                let delim = chars[close + 1];
                let end = if at(close + 2) == Some(' ') {
                    close + 3
                } else {
                    close + 2
                };
                Some(QuoteMatch {
                    quote,
                    delim: Some(delim),
                    end,
                })
            } else {
                Some(QuoteMatch {
                    quote,
                    delim: None,
                    end: close + 1,
                })
            }
        }
    }
}

/// `(expected count per line, lines agreeing minus lines disagreeing)`
type Mode = (usize, isize);

fn guess_from_frequencies(sample: &str) -> Option<char> {
    let lines: Vec<&str> = sample.split('\n').filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return None;
    }

    let chunk = lines.len().min(CHUNK_LINES);
    // Per ASCII code: (count-per-line, number of lines) in first-seen order.
    let mut frequencies: Vec<Vec<(usize, usize)>> = vec![Vec::new(); 127];
    let mut modes: Vec<Option<Mode>> = vec![None; 127];
    let mut candidates: Vec<(char, Mode)> = Vec::new();

    let mut start = 0;
    let mut iteration = 0;
    while start < lines.len() {
        iteration += 1;
        let end = (start + chunk).min(lines.len());
        for line in &lines[start..end] {
            for (code, meta) in frequencies.iter_mut().enumerate() {
                let c = char::from(code as u8);
                let count = line.matches(c).count();
                match meta.iter_mut().find(|(f, _)| *f == count) {
                    Some((_, n)) => *n += 1,
                    None => meta.push((count, 1)),
                }
            }
        }

        for (code, meta) in frequencies.iter().enumerate() {
            if meta.len() == 1 && meta[0].0 == 0 {
                continue;
            }
            modes[code] = mode_of(meta);
        }

        let total = (chunk * iteration).min(lines.len()) as f64;
        let mut consistency = 1.0_f64;
        while candidates.is_empty() && consistency >= MIN_CONSISTENCY {
            for (code, mode) in modes.iter().enumerate() {
                if let Some((count, agree)) = *mode {
                    if count > 0 && agree > 0 && agree as f64 / total >= consistency {
                        candidates.push((char::from(code as u8), (count, agree)));
                    }
                }
            }
            consistency -= 0.01;
        }

        if !candidates.is_empty() {
            break;
        }
        start = end;
    }

    log::trace!("frequency pass candidates: {candidates:?}");
    match candidates.as_slice() {
        [] => None,
        [(only, _)] => Some(*only),
        many => PREFERRED_DELIMITERS
            .iter()
            .copied()
            .find(|p| many.iter().any(|(c, _)| c == p))
            .or_else(|| {
                many.iter()
                    .max_by_key(|(c, mode)| (*mode, *c))
                    .map(|(c, _)| *c)
            }),
    }
}

/// Most common per-line count, with its support reduced by the lines that disagree.
fn mode_of(meta: &[(usize, usize)]) -> Option<Mode> {
    match meta {
        [] => None,
        [(count, lines)] => Some((*count, *lines as isize)),
        _ => {
            let mut best = 0;
            for (idx, &(_, lines)) in meta.iter().enumerate() {
                if lines > meta[best].1 {
                    best = idx;
                }
            }
            let others: usize = meta
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != best)
                .map(|(_, (_, lines))| lines)
                .sum();
            let (count, lines) = meta[best];
            Some((count, lines as isize - others as isize))
        }
    }
}
