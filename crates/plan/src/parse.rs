//! Reader for the sort plan text format.
//!
//! ```text
//! 30/06/26
//! STATE: VIC
//! 022 3000-3006 3008 ;
//! 023 3010 3011-3013 ;
//! STATE: WA
//! 049 6000-6012 ;
//! ```
//!
//! The first non-blank line is the expiry date. `STATE:` headers switch the
//! state for the indicator lines that follow. Ranges are inclusive and
//! postcodes are zero-padded to four digits.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::PlanError;
use crate::lookup::LookupTable;
use crate::state::StateCode;

const EXPIRY_FORMAT: &str = "%d/%m/%y";

/// Read and parse a sort plan file.
pub fn load_sort_plan(path: impl AsRef<Path>) -> Result<LookupTable, PlanError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| PlanError::Io(format!("{}: {e}", path.display())))?;
    parse_sort_plan(&text)
}

/// Parse sort plan text into a [`LookupTable`].
pub fn parse_sort_plan(text: &str) -> Result<LookupTable, PlanError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let expiry = match lines.next() {
        Some((_, first)) => NaiveDate::parse_from_str(first, EXPIRY_FORMAT)
            .map_err(|_| PlanError::InvalidExpiry(first.to_string()))?,
        None => return Err(PlanError::InvalidExpiry(String::new())),
    };

    let mut postcode_to_indicator: HashMap<String, String> = HashMap::new();
    let mut indicator_to_state: HashMap<String, StateCode> = HashMap::new();
    let mut state: Option<StateCode> = None;

    for (line_no, line) in lines {
        if let Some(rest) = state_header(line) {
            let parsed = rest.parse::<StateCode>().map_err(|_| PlanError::UnknownState {
                line: line_no,
                value: rest.to_string(),
            })?;
            state = Some(parsed);
            continue;
        }

        let current = state.ok_or(PlanError::MissingState { line: line_no })?;

        let body = line.replace(';', " ");
        let mut tokens = body.split_whitespace();
        let indicator = match tokens.next() {
            Some(tok) => tok.to_string(),
            None => continue,
        };

        let mut listed = 0usize;
        for token in tokens {
            for postcode in expand_token(token, line_no)? {
                if let Some(previous) = postcode_to_indicator.insert(postcode.clone(), indicator.clone()) {
                    if previous != indicator {
                        log::debug!(
                            "postcode {postcode} moved from indicator {previous} to {indicator} (line {line_no})"
                        );
                    }
                }
                listed += 1;
            }
        }

        if listed == 0 {
            return Err(PlanError::MissingIndicator { line: line_no });
        }

        indicator_to_state.insert(indicator, current);
    }

    log::debug!(
        "sort plan: {} postcodes across {} indicators, expires {expiry}",
        postcode_to_indicator.len(),
        indicator_to_state.len()
    );

    LookupTable::new(postcode_to_indicator, indicator_to_state, Some(expiry))
}

fn state_header(line: &str) -> Option<&str> {
    let (head, rest) = line.split_once(':')?;
    head.trim().eq_ignore_ascii_case("STATE").then(|| rest.trim())
}

/// A single postcode or an inclusive `lo-hi` range.
fn expand_token(token: &str, line: usize) -> Result<Vec<String>, PlanError> {
    let number = |value: &str| -> Result<u32, PlanError> {
        value.parse::<u32>().map_err(|_| PlanError::InvalidPostcode {
            line,
            value: value.to_string(),
        })
    };

    match token.split_once('-') {
        Some((lo, hi)) => {
            let (lo, hi) = (number(lo)?, number(hi)?);
            if lo > hi {
                return Err(PlanError::DescendingRange {
                    line,
                    range: token.to_string(),
                });
            }
            Ok((lo..=hi).map(pad_postcode).collect())
        }
        None => Ok(vec![pad_postcode(number(token)?)]),
    }
}

fn pad_postcode(value: u32) -> String {
    format!("{value:04}")
}
