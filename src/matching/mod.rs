//! Bilateral shift swap matching.
//!
//! Pure functions over a snapshot of swap requests. Nothing here touches the
//! store, so callers can run it on whatever snapshot they last read.

use crate::models::{ShiftCategory, ShiftSwapRequest, SwapMatch, SwapRecord};

/// Well-formed requests taken from a store snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub requests: Vec<ShiftSwapRequest>,
    /// Records dropped because they could not be parsed.
    pub skipped: usize,
}

/// Convert raw store records into requests, skipping malformed ones.
///
/// A corrupt record is logged and left out; it never prevents matches among
/// the remaining records.
pub fn parse_records(records: Vec<SwapRecord>) -> Snapshot {
    let mut snapshot = Snapshot {
        requests: Vec::with_capacity(records.len()),
        skipped: 0,
    };

    for record in records {
        let employee = record.employee_name.clone().unwrap_or_default();
        let date = record.date.clone().unwrap_or_default();
        match ShiftSwapRequest::try_from(record) {
            Ok(request) => snapshot.requests.push(request),
            Err(e) => {
                tracing::warn!(
                    employee = %employee,
                    date = %date,
                    "Skipping malformed swap record: {}",
                    e
                );
                snapshot.skipped += 1;
            }
        }
    }

    snapshot
}

/// `offer` is something `taker` would accept in exchange.
fn offer_accepted(offer: Option<ShiftCategory>, taker: &ShiftSwapRequest) -> Option<ShiftCategory> {
    offer.filter(|category| taker.can_take.accepts(*category))
}

/// Test one unordered pair, reporting the match from `first`'s side.
fn match_pair(first: &ShiftSwapRequest, second: &ShiftSwapRequest) -> Option<SwapMatch> {
    if first.date != second.date || first.employee_name == second.employee_name {
        return None;
    }

    let given_by_a = offer_accepted(first.give_away, second)?;
    let given_by_b = offer_accepted(second.give_away, first)?;

    Some(SwapMatch {
        employee_a: first.employee_name.clone(),
        employee_b: second.employee_name.clone(),
        date: first.date,
        given_by_a,
        given_by_b,
    })
}

/// Find every mutually compatible pair of requests.
///
/// Each unordered pair `(i, j)` with `i < j` is tested exactly once and matches
/// come back in scan order. A request may take part in any number of matches.
pub fn find_matches(requests: &[ShiftSwapRequest]) -> Vec<SwapMatch> {
    let mut matches = Vec::new();

    for (i, first) in requests.iter().enumerate() {
        for second in &requests[i + 1..] {
            if let Some(found) = match_pair(first, second) {
                matches.push(found);
            }
        }
    }

    tracing::debug!(
        requests = requests.len(),
        matches = matches.len(),
        "Computed swap matches"
    );
    matches
}

/// Matches in which `employee_name` is either party.
pub fn find_matches_for(requests: &[ShiftSwapRequest], employee_name: &str) -> Vec<SwapMatch> {
    find_matches(requests)
        .into_iter()
        .filter(|m| m.involves(employee_name))
        .collect()
}
