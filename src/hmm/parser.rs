//! Parser for HMMER3 text profiles as written by `jackhmmer --chkhmm`.
//!
//! Only the match-state emission rows are kept: one [`ProfileVector`] per
//! model node, which for a single-query jackhmmer run is one per residue of
//! the query.
//!
use super::{ProfileMap, ProfileVector, ALPHABET_SIZE};
use crate::utils::{open_input_reader, Error, Result};
use std::collections::hash_map::Entry;
use std::io::BufRead;
use std::path::Path;

/// Lines between the `HMM` header and the first match-state row: the
/// transition header, `COMPO`, and the node-0 insert and transition rows.
const FIRST_MATCH_ROW_OFFSET: usize = 5;
/// Each node spans a match emission row, an insert emission row and a transition row.
const ROWS_PER_NODE: usize = 3;
/// Marker HMMER writes for a zero probability.
const NO_DATA_MARKER: &str = "*";

#[derive(Debug, Default)]
struct BlockState {
    name: Option<String>,
    length: Option<usize>,
    has_compo: bool,
    body_start: Option<usize>,
}

impl BlockState {
    fn start(name: String) -> Self {
        Self {
            name: Some(name),
            ..Default::default()
        }
    }
}

/// Strips the `-i<N>` suffix jackhmmer appends to checkpoint model names.
pub fn strip_iteration_suffix(name: &str) -> &str {
    match name.rfind("-i") {
        Some(pos) => {
            let suffix = &name[pos + 2..];
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                &name[..pos]
            } else {
                name
            }
        }
        None => name,
    }
}

pub fn parse_profile_file(path: &Path) -> Result<ProfileMap> {
    let reader = open_input_reader(path).map_err(|e| match e {
        Error::NotFound(_) => Error::NotFound(format!("HMM profile {}", path.display())),
        other => other,
    })?;
    parse_profiles(reader, &path.display().to_string())
}

pub fn parse_profiles<R: BufRead>(reader: R, source: &str) -> Result<ProfileMap> {
    let mut profiles = ProfileMap::new();
    let mut state = BlockState::default();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_idx + 1;
        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or("");

        match first {
            "NAME" => {
                let name = tokens.next().ok_or_else(|| {
                    Error::Parse(format!("{}:{}: NAME without a value", source, line_number))
                })?;
                let name = strip_iteration_suffix(name).to_string();
                match profiles.entry(name.clone()) {
                    Entry::Occupied(_) => {
                        return Err(Error::Parse(format!(
                            "{}:{}: duplicate profile for protein {}",
                            source, line_number, name
                        )))
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(Vec::new());
                    }
                }
                state = BlockState::start(name);
            }
            "LENG" => {
                let value = tokens.next().unwrap_or("");
                let length = value.parse::<usize>().map_err(|_| {
                    Error::Parse(format!(
                        "{}:{}: invalid LENG value '{}'",
                        source, line_number, value
                    ))
                })?;
                state.length = Some(length);
            }
            "HMM" => state.body_start = Some(line_idx + FIRST_MATCH_ROW_OFFSET),
            "//" => state.body_start = None,
            _ if line.contains("COMPO") => state.has_compo = true,
            _ => {
                let Some(start) = state.body_start else {
                    continue;
                };
                if line_idx < start {
                    continue;
                }
                let name = state.name.as_deref().ok_or_else(|| {
                    Error::Parse(format!(
                        "{}:{}: profile rows found before any NAME line",
                        source, line_number
                    ))
                })?;
                if !state.has_compo {
                    return Err(Error::Parse(format!(
                        "{}:{}: no COMPO line was found for protein {}",
                        source, line_number, name
                    )));
                }
                let length = match state.length {
                    Some(length) if length > 0 => length,
                    _ => {
                        return Err(Error::Parse(format!(
                            "{}:{}: no LENG line was found for protein {}",
                            source, line_number, name
                        )))
                    }
                };

                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() <= 3 || (line_idx - start) % ROWS_PER_NODE != 0 {
                    continue;
                }
                let vectors = profiles.get_mut(name).ok_or_else(|| {
                    Error::Inconsistent(format!("profile for {} was not initialized", name))
                })?;
                if vectors.len() >= length {
                    continue;
                }
                vectors.push(parse_match_row(&fields, source, line_number)?);
            }
        }
    }

    log::debug!("Parsed {} profiles from {}", profiles.len(), source);
    Ok(profiles)
}

fn parse_match_row(fields: &[&str], source: &str, line_number: usize) -> Result<ProfileVector> {
    if fields.len() < ALPHABET_SIZE + 1 {
        return Err(Error::Parse(format!(
            "{}:{}: expected {} emission values, found {}",
            source,
            line_number,
            ALPHABET_SIZE,
            fields.len() - 1
        )));
    }
    let mut vector = [0.0; ALPHABET_SIZE];
    for (slot, value) in vector.iter_mut().zip(&fields[1..=ALPHABET_SIZE]) {
        *slot = if *value == NO_DATA_MARKER {
            f64::INFINITY
        } else {
            value.parse::<f64>().map_err(|_| {
                Error::Parse(format!(
                    "{}:{}: invalid emission value '{}'",
                    source, line_number, value
                ))
            })?
        };
    }
    Ok(vector)
}
