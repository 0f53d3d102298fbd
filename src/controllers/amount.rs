//! Decimal amounts carried as JSON strings.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative decimal amount, `"0.5"` on the wire.
///
/// Deserialization only accepts plain decimal strings:
/// - rejects `.5` and `5.`
/// - rejects scientific notation and a `+` prefix
/// - rejects negative numbers and JSON numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// `mantissa * 10^-scale`, for seed data.
    pub(crate) fn new(mantissa: u32, scale: u32) -> Self {
        Self(Decimal::new(i64::from(mantissa), scale))
    }

    pub fn from_decimal(d: Decimal) -> Option<Self> {
        (!d.is_sign_negative()).then_some(Self(d.normalize()))
    }

    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for Amount {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("Amount cannot be empty".into());
        }
        if s.starts_with('.') {
            return Err("Invalid format: use 0.5 not .5".into());
        }
        if s.ends_with('.') {
            return Err("Invalid format: use 5.0 not 5.".into());
        }
        if s.contains(['e', 'E']) {
            return Err("Invalid format: scientific notation not allowed".into());
        }
        if s.starts_with('+') {
            return Err("Invalid format: + prefix not allowed".into());
        }
        let d = Decimal::from_str(s).map_err(|e| format!("Invalid decimal: {}", e))?;
        if d.is_sign_negative() {
            return Err("Amount cannot be negative".into());
        }
        Ok(Self(d))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_format() {
        for bad in ["", ".5", "5.", "1e3", "+1", "-1", "abc"] {
            assert!(bad.parse::<Amount>().is_err(), "{:?} accepted", bad);
        }
        assert_eq!("0.5".parse::<Amount>().unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_json_numbers_rejected() {
        assert!(serde_json::from_str::<Amount>("1.5").is_err());
        let a: Amount = serde_json::from_str("\"1.50\"").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"1.50\"");
    }

    #[test]
    fn test_from_decimal_normalizes() {
        let a = Amount::from_decimal(Decimal::new(1500, 3)).unwrap();
        assert_eq!(a.to_string(), "1.5");
        assert!(Amount::from_decimal(Decimal::new(-1, 0)).is_none());
    }
}
