//! Value tokenizer for the legacy line-oriented environment file.
//!
//! Lines look like `irodsHost 'data.example.org'` or `irodsPort=1247`. Items
//! may be quoted with `"` or `'`; a quoted item ends at the matching quote only
//! when that quote is followed by a space, a newline or the end of the line, so
//! embedded quotes are kept as content. An item whose closing quote never
//! appears is returned with its opening quote restored instead of failing.

/// How a token was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Token,
    /// The item opened a quote that was never closed; the token starts with
    /// that quote character.
    RecoveredUnterminatedQuote,
}

/// Result of scanning one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub token: String,
    /// Byte offset just past the consumed token.
    pub next: usize,
    pub outcome: ScanOutcome,
}

/// Scan the next value token of `line`, starting at byte offset `cursor`.
///
/// Leading spaces and `=` are skipped. Never fails: malformed quoting degrades
/// to a best-effort token. A cursor past the end is clamped to it; one inside a
/// multi-byte character moves forward to the next character boundary.
pub fn next_token(line: &str, cursor: usize) -> Scan {
    let bytes = line.as_bytes();
    let mut cursor = cursor.min(line.len());
    while !line.is_char_boundary(cursor) {
        cursor += 1;
    }
    // A newline terminates the buffer wherever it appears.
    let end = line[cursor..].find('\n').map_or(line.len(), |i| cursor + i);

    let mut pos = cursor;
    while pos < end && (bytes[pos] == b' ' || bytes[pos] == b'=') {
        pos += 1;
    }

    if pos < end && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
        return scan_quoted(line, pos, end);
    }

    let start = pos;
    while pos < end && !bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    Scan {
        token: line[start..pos].to_string(),
        next: pos,
        outcome: ScanOutcome::Token,
    }
}

fn scan_quoted(line: &str, open: usize, end: usize) -> Scan {
    let bytes = line.as_bytes();
    let quote = bytes[open];
    let start = open + 1;

    let mut pos = start;
    while pos < end {
        if bytes[pos] == quote {
            let after = pos + 1;
            if after >= end || bytes[after] == b' ' || bytes[after] == b'\n' {
                return Scan {
                    token: line[start..pos].to_string(),
                    next: after,
                    outcome: ScanOutcome::Token,
                };
            }
        }
        pos += 1;
    }

    // No valid closing quote: keep the opening one as part of the token.
    Scan {
        token: line[open..end].to_string(),
        next: end,
        outcome: ScanOutcome::RecoveredUnterminatedQuote,
    }
}

/// Split one legacy line into its key and value.
///
/// Returns `None` for blank lines and `#` comments. A key without a value
/// yields an empty value.
pub fn parse_line(line: &str) -> Option<(String, Scan)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let offset = line.len() - trimmed.len();
    let key_len = trimmed
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(trimmed.len());
    let key = trimmed[..key_len].to_string();
    let value = next_token(line, offset + key_len);
    Some((key, value))
}
