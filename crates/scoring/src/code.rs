use std::fmt;

use serde::{Deserialize, Serialize};

/// Short competitor code as published by the standings provider ("VER", "MCL").
///
/// Codes are trimmed and upper-cased on construction so that user input and
/// provider data compare equal regardless of formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CompetitorCode(String);

impl CompetitorCode {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns `None` for blank input, which is how an untouched form field arrives.
    pub fn parse(value: &str) -> Option<Self> {
        let code = Self::new(value);
        (!code.0.is_empty()).then_some(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CompetitorCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CompetitorCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CompetitorCode> for String {
    fn from(code: CompetitorCode) -> Self {
        code.0
    }
}

impl fmt::Display for CompetitorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalized() {
        assert_eq!(CompetitorCode::new(" ver "), CompetitorCode::new("VER"));
        assert_eq!(CompetitorCode::new("lec").as_str(), "LEC");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(CompetitorCode::parse("   "), None);
        assert_eq!(CompetitorCode::parse("ham"), Some(CompetitorCode::new("HAM")));
    }
}
