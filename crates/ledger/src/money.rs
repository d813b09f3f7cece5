use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub},
    str::FromStr,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use crate::LedgerError;

/// Largest major-unit magnitude accepted from a document; keeps the cent
/// value inside the range where `f64` holds integers exactly.
const MAX_MAJOR_UNITS: f64 = 1e13;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the ledger (prices, shares,
/// balances) to avoid floating-point drift.
///
/// In the backing documents the amount is stored as a decimal number of
/// major units (`100.5` means 100 major units and 50 cents), so the serde
/// implementations convert at the boundary.
///
/// # Examples
///
/// ```rust
/// use ledger::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use ledger::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Splits the amount into `parts` equal shares, rounded half-up to the
    /// cent. Fails when `parts` is 0.
    pub fn split_among(self, parts: u32) -> Result<MoneyCents, LedgerError> {
        if parts == 0 {
            return Err(LedgerError::Configuration(
                "cannot split among zero slots".to_string(),
            ));
        }
        let parts = u64::from(parts);
        let share = (self.0.unsigned_abs() + parts / 2) / parts;
        let share = share as i64;
        Ok(MoneyCents(if self.0 < 0 { -share } else { share }))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl Mul<i64> for MoneyCents {
    type Output = MoneyCents;

    fn mul(self, rhs: i64) -> Self::Output {
        MoneyCents(self.0 * rhs)
    }
}

impl Serialize for MoneyCents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = MoneyCents;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal amount in major units")
    }

    fn visit_i64<E>(self, value: i64) -> Result<MoneyCents, E>
    where
        E: de::Error,
    {
        value
            .checked_mul(100)
            .map(MoneyCents)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E>(self, value: u64) -> Result<MoneyCents, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(MoneyCents)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_f64<E>(self, value: f64) -> Result<MoneyCents, E>
    where
        E: de::Error,
    {
        if !value.is_finite() || value.abs() > MAX_MAJOR_UNITS {
            return Err(E::custom("amount out of range"));
        }
        Ok(MoneyCents((value * 100.0).round() as i64))
    }
}

impl<'de> Deserialize<'de> for MoneyCents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_f64(MoneyVisitor)
    }
}

impl FromStr for MoneyCents {
    type Err = LedgerError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || LedgerError::InvalidAmount("empty amount".to_string());
        let invalid = || LedgerError::InvalidAmount("invalid amount".to_string());
        let overflow = || LedgerError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None => 0,
            Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(LedgerError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyCents(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_decimal() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
        assert!(MoneyCents::new(0).is_zero());
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<MoneyCents>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("0.001".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn split_rounds_half_up() {
        assert_eq!(MoneyCents::new(100_00).split_among(4).unwrap().cents(), 25_00);
        assert_eq!(MoneyCents::new(100_00).split_among(3).unwrap().cents(), 33_33);
        assert_eq!(MoneyCents::new(1_00).split_among(8).unwrap().cents(), 13);
        assert_eq!(MoneyCents::new(25).split_among(10).unwrap().cents(), 3);
    }

    #[test]
    fn split_rejects_zero_parts() {
        assert_eq!(
            MoneyCents::new(100_00).split_among(0),
            Err(LedgerError::Configuration(
                "cannot split among zero slots".to_string()
            ))
        );
    }

    #[test]
    fn serde_uses_major_units() {
        let json = serde_json::to_string(&MoneyCents::new(100_50)).unwrap();
        assert_eq!(json, "100.5");

        let back: MoneyCents = serde_json::from_str("100.5").unwrap();
        assert_eq!(back.cents(), 100_50);
        let whole: MoneyCents = serde_json::from_str("100").unwrap();
        assert_eq!(whole.cents(), 100_00);
        let fractional: MoneyCents = serde_json::from_str("99.99").unwrap();
        assert_eq!(fractional.cents(), 99_99);
        assert!(serde_json::from_str::<MoneyCents>("\"x\"").is_err());
    }
}
