//! Fixed-scale monetary amount.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A payment amount with a fixed two-decimal scale.
///
/// Stored as minor units (hundredths) in an `i64` to avoid floating-point
/// precision issues. Bounded by the persisted NUMERIC(8,2) column, so the
/// largest representable value is 999999.99. Serialized as a decimal string
/// (`"149.99"`), which is also the wire format of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Largest storable value in minor units (999999.99).
    pub const MAX_MINOR_UNITS: i64 = 99_999_999;

    /// Creates an Amount from minor units (hundredths).
    pub fn from_minor_units(minor: i64) -> Result<Self, DomainError> {
        if minor < 0 {
            return Err(DomainError::NegativeAmount);
        }
        if minor > Self::MAX_MINOR_UNITS {
            return Err(DomainError::AmountRange);
        }
        Ok(Self(minor))
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(DomainError::NegativeAmount);
        }
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DomainError::AmountFormat(s.to_string()));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(DomainError::AmountFormat(s.to_string()));
        }
        if frac_part.len() > 2 {
            return Err(DomainError::AmountScale);
        }

        let int: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| DomainError::AmountRange)?
        };
        let frac: i64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().unwrap_or(0) * 10,
            _ => frac_part.parse::<i64>().unwrap_or(0),
        };

        let minor = int
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .ok_or(DomainError::AmountRange)?;
        Self::from_minor_units(minor)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!("149.99".parse::<Amount>().unwrap().minor_units(), 14999);
        assert_eq!("100".parse::<Amount>().unwrap().minor_units(), 10000);
        assert_eq!("0.5".parse::<Amount>().unwrap().minor_units(), 50);
        assert_eq!(".25".parse::<Amount>().unwrap().minor_units(), 25);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "-3.00".parse::<Amount>(),
            Err(DomainError::NegativeAmount)
        ));
        assert!(matches!(
            "1.234".parse::<Amount>(),
            Err(DomainError::AmountScale)
        ));
        assert!(matches!(
            "12,50".parse::<Amount>(),
            Err(DomainError::AmountFormat(_))
        ));
        assert!(matches!(
            "".parse::<Amount>(),
            Err(DomainError::AmountFormat(_))
        ));
    }

    #[test]
    fn test_numeric_8_2_bound() {
        assert!("999999.99".parse::<Amount>().is_ok());
        assert!(matches!(
            "1000000.00".parse::<Amount>(),
            Err(DomainError::AmountRange)
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let amount: Amount = "7.05".parse().unwrap();
        assert_eq!(amount.to_string(), "7.05");
        let amount: Amount = "30".parse().unwrap();
        assert_eq!(amount.to_string(), "30.00");
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let amount: Amount = "12.30".parse().unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"12.30\"");
        let back: Amount = serde_json::from_str("\"12.30\"").unwrap();
        assert_eq!(back, amount);
    }
}
