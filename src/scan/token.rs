//! Classifies raw scanner input.
//!
//! A student's QR code carries an embedded token (`STUDENT:<payload>`); the
//! printed short code (e.g. `S1024`) is typed by hand when a badge will not
//! scan. Both end up as a token before the student is fetched.

/// Literal prefix of every embedded student token.
pub const TOKEN_PREFIX: &str = "STUDENT:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanInput<'a> {
    /// Used as the student's token directly.
    EmbeddedToken(&'a str),
    /// Looked up to obtain the token.
    StudentCode(&'a str),
    /// Nothing usable was scanned.
    Empty,
}

pub fn is_embedded_token(input: &str) -> bool {
    input
        .strip_prefix(TOKEN_PREFIX)
        .is_some_and(|payload| !payload.trim().is_empty())
}

impl<'a> ScanInput<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let input = raw.trim();

        if input.is_empty() {
            ScanInput::Empty
        } else if is_embedded_token(input) {
            ScanInput::EmbeddedToken(input)
        } else {
            ScanInput::StudentCode(input)
        }
    }
}
