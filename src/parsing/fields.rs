
/// A text record that does not have enough fields for positional access
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[error("expected at least {expected} fields but found {found}: {line:?}")]
pub struct MalformedRecord {
    /// Minimum number of fields required
    pub expected: usize,
    /// Number of fields actually found
    pub found: usize,
    /// The offending line, surrounding whitespace removed
    pub line: String
}

/// Splits a line on runs of whitespace (spaces, tabs), ignoring leading and trailing whitespace.
/// A blank line yields no fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Splits a line and checks that at least `expected` fields are present before anyone indexes into it.
/// # Arguments
/// * `line` - the raw text line
/// * `expected` - the minimum number of fields
/// # Errors
/// * if the line has fewer than `expected` fields
pub fn require_fields(line: &str, expected: usize) -> Result<Vec<&str>, MalformedRecord> {
    let fields = split_fields(line);
    if fields.len() < expected {
        return Err(MalformedRecord {
            expected,
            found: fields.len(),
            line: line.trim().to_string()
        });
    }
    Ok(fields)
}
