//! Header-row cleanup shared by the text and spreadsheet readers.

use std::collections::{HashMap, HashSet};

/// Turn raw header cells into unique column names.
///
/// - blank cells become `Unnamed: {index}`
/// - repeated names get `.1`, `.2`, ... appended, skipping suffixes already taken
pub(crate) fn unique_column_names<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell.as_ref().trim_end_matches(['\r', '\n']);
            if name.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name.to_owned()
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        while taken.contains(&candidate) {
            let n = repeats.entry(name.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{name}.{n}");
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
