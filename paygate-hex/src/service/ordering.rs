//! Parser for the ordering request mini-language.
//!
//! An ordering request mixes two spellings, `asc_<field>`/`desc_<field>` and
//! `ASC(<field>)`/`DESC(<field>)`, joined by commas or plain concatenation.
//! The parser is deliberately forgiving: it scans left to right for the next
//! direction marker of either spelling, prefix-matches the following text
//! against the sortable-field allow-list, and silently drops anything it
//! cannot place. Trailing garbage after a recognized field name is skipped
//! until the next marker.

use paygate_types::{SortDirection, SortField};

/// Parses an ordering request against the allow-list.
///
/// Returns `default` when nothing resolves. A field named more than once
/// keeps its first position but takes the direction of its last mention.
pub fn parse_order_by(
    input: &str,
    allowed: &[SortField],
    default: &[(SortField, SortDirection)],
) -> Vec<(SortField, SortDirection)> {
    let mut criteria: Vec<(SortField, SortDirection)> = Vec::new();
    let mut rest = input;

    while let Some((pos, marker_len, direction)) = find_marker(rest) {
        rest = &rest[pos + marker_len..];
        for field in allowed {
            if rest.starts_with(field.api_name()) {
                match criteria.iter_mut().find(|(seen, _)| seen == field) {
                    Some((_, seen_direction)) => *seen_direction = direction,
                    None => criteria.push((*field, direction)),
                }
            }
        }
    }

    if criteria.is_empty() {
        default.to_vec()
    } else {
        criteria
    }
}

/// Finds the earliest direction marker: `asc` or `desc` (any case) followed
/// immediately by `_` or `(`. Returns its byte position, total length
/// including the delimiter, and the direction.
fn find_marker(s: &str) -> Option<(usize, usize, SortDirection)> {
    // Byte-wise scan; the keywords are ASCII, so a match can only start on a
    // character boundary and the returned offsets are always safe to slice at.
    let bytes = s.as_bytes();
    for pos in 0..bytes.len() {
        let rest = &bytes[pos..];
        for (keyword, direction) in
            [(b"desc".as_slice(), SortDirection::Desc), (b"asc".as_slice(), SortDirection::Asc)]
        {
            if rest.len() > keyword.len()
                && rest[..keyword.len()].eq_ignore_ascii_case(keyword)
                && matches!(rest[keyword.len()], b'_' | b'(')
            {
                return Some((pos, keyword.len() + 1, direction));
            }
        }
    }
    None
}
