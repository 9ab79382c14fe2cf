/// Declared storage type of a display option.
///
/// Every stored or submitted value is cleaned to its declared type before it
/// is used, so a value is never rejected here, only narrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Leading integer; anything unparseable becomes `0`.
    Int,
    /// Letters only.
    Alpha,
    /// Letters, `_` and `-`.
    AlphaExt,
    /// Letters, digits, `_` and `-`.
    AlphaNumExt,
    /// Stored as given.
    Raw,
}

impl ParamType {
    #[must_use]
    pub fn clean(self, value: &str) -> String {
        match self {
            Self::Int => clean_int(value).to_string(),
            Self::Alpha => value.chars().filter(char::is_ascii_alphabetic).collect(),
            Self::AlphaExt => value
                .chars()
                .filter(|c| c.is_ascii_alphabetic() || *c == '_' || *c == '-')
                .collect(),
            Self::AlphaNumExt => value
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect(),
            Self::Raw => value.to_owned(),
        }
    }
}

/// Integer conversion with the host's lenient semantics: optional leading
/// whitespace and sign, then as many digits as are present.
#[must_use]
pub fn clean_int(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative { -magnitude } else { magnitude }
}
