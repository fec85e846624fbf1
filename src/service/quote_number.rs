//! Quote number allocation.
//!
//! Quote numbers are `Q<year>-<seq>` where the sequence restarts at 001 each
//! calendar year and is zero-padded to at least [`QUOTE_NUMBER_PAD`] digits.
//! Allocation reads every number issued under the current year's prefix,
//! takes the numeric maximum of the suffixes, and adds one. The comparison is
//! numeric rather than lexicographic on purpose: once the sequence passes 999
//! the padded width grows (`Q2025-999` is followed by `Q2025-1000`), and a
//! string sort would rank `999` above `1000`.
//!
//! Allocation alone does not reserve the number; reservation happens when the
//! quote row is inserted under the unique index on the number. Two concurrent
//! creations can therefore compute the same candidate, in which case exactly
//! one insert succeeds and the loser re-reads and retries (see the quote
//! service).

/// Minimum digit width of the sequence suffix.
pub const QUOTE_NUMBER_PAD: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// A persisted number under the active prefix has a non-numeric suffix.
    /// Treated as a hard failure: guessing a sequence value here could
    /// reintroduce a uniqueness collision.
    #[error("Existing quote number '{0}' has a malformed sequence suffix")]
    MalformedNumber(String),
}

/// The year prefix scoping a quote-number sequence, e.g. `Q2025-`.
pub fn quote_number_prefix(year: i32) -> String {
    format!("Q{}-", year)
}

/// Compute the next quote number for `prefix` given every number currently
/// issued. Numbers under other prefixes are ignored, so a new year always
/// starts back at `001` regardless of how many quotes the old year holds.
pub fn next_quote_number(prefix: &str, existing: &[String]) -> Result<String, AllocationError> {
    let mut highest: Option<u64> = None;

    for number in existing {
        let Some(suffix) = number.strip_prefix(prefix) else {
            continue;
        };
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AllocationError::MalformedNumber(number.clone()));
        }
        let value: u64 = suffix
            .parse()
            .map_err(|_| AllocationError::MalformedNumber(number.clone()))?;
        highest = Some(highest.map_or(value, |h| h.max(value)));
    }

    let next = highest.map_or(1, |h| h + 1);
    Ok(format!("{}{:0width$}", prefix, next, width = QUOTE_NUMBER_PAD))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_allocation_of_year() {
        let next = next_quote_number("Q2025-", &[]).unwrap();
        assert_eq!(next, "Q2025-001");
    }

    #[test]
    fn test_increments_highest_existing() {
        let existing = numbers(&["Q2025-001", "Q2025-041", "Q2025-017"]);
        let next = next_quote_number("Q2025-", &existing).unwrap();
        assert_eq!(next, "Q2025-042");
    }

    #[test]
    fn test_pad_growth_past_999() {
        let existing = numbers(&["Q2025-999"]);
        let next = next_quote_number("Q2025-", &existing).unwrap();
        assert_eq!(next, "Q2025-1000");
    }

    #[test]
    fn test_numeric_max_beats_lexicographic_max() {
        // "Q2025-999" sorts above "Q2025-1000" as a string; the allocator
        // must still pick 1001 next.
        let existing = numbers(&["Q2025-999", "Q2025-1000"]);
        let next = next_quote_number("Q2025-", &existing).unwrap();
        assert_eq!(next, "Q2025-1001");
    }

    #[test]
    fn test_year_rollover_ignores_old_prefix() {
        let existing = numbers(&["Q2024-017", "Q2024-016", "Q2024-001"]);
        let next = next_quote_number("Q2025-", &existing).unwrap();
        assert_eq!(next, "Q2025-001");
    }

    #[test]
    fn test_sequential_allocation_is_unique_and_monotonic() {
        let mut existing: Vec<String> = Vec::new();
        for _ in 0..10 {
            let next = next_quote_number("Q2025-", &existing).unwrap();
            assert!(!existing.contains(&next));
            if let Some(last) = existing.last() {
                let last_seq: u64 = last.strip_prefix("Q2025-").unwrap().parse().unwrap();
                let next_seq: u64 = next.strip_prefix("Q2025-").unwrap().parse().unwrap();
                assert!(next_seq > last_seq);
            }
            existing.push(next);
        }
        assert_eq!(existing.last().unwrap(), "Q2025-010");
    }

    #[test]
    fn test_malformed_suffix_is_rejected() {
        let existing = numbers(&["Q2025-001", "Q2025-0x7"]);
        let result = next_quote_number("Q2025-", &existing);
        assert!(matches!(result, Err(AllocationError::MalformedNumber(_))));
    }

    #[test]
    fn test_empty_suffix_is_rejected() {
        let existing = numbers(&["Q2025-"]);
        let result = next_quote_number("Q2025-", &existing);
        assert!(matches!(result, Err(AllocationError::MalformedNumber(_))));
    }

    #[test]
    fn test_prefix_format() {
        assert_eq!(quote_number_prefix(2025), "Q2025-");
        assert_eq!(quote_number_prefix(2026), "Q2026-");
    }
}
