//! Currency codes and integer-cent formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every monetary value in Wayfare is an `i64` count of minor units (cents).

use serde::{Deserialize, Serialize};

/// An ISO 4217 currency code (three uppercase ASCII letters).
///
/// Parsing normalizes to uppercase, so `"cad"` and `"CAD"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(format!("Invalid currency code: {s}"))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Formats a cent amount as a dollar string, e.g. `12345` -> `"$123.45"`.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("USD", "USD")]
    #[case("cad", "CAD")]
    #[case(" eur ", "EUR")]
    fn test_currency_code_parses(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(CurrencyCode::from_str(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("US")]
    #[case("USDX")]
    #[case("U5D")]
    fn test_currency_code_rejects(#[case] input: &str) {
        assert!(CurrencyCode::from_str(input).is_err());
    }

    #[test]
    fn test_currency_code_serde_roundtrip() {
        let code: CurrencyCode = serde_json::from_str("\"cad\"").unwrap();
        assert_eq!(code.to_string(), "CAD");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"CAD\"");
        assert!(serde_json::from_str::<CurrencyCode>("\"dollars\"").is_err());
    }

    #[rstest]
    #[case(0, "$0.00")]
    #[case(99, "$0.99")]
    #[case(100, "$1.00")]
    #[case(1_234_567, "$12345.67")]
    #[case(-250, "-$2.50")]
    fn test_format_cents(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(format_cents(cents), expected);
    }
}
