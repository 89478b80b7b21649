// src/record.rs
//! Monster record: one monster's statistics as parsed from its page.
//!
//! A record is plain data. It is built by `specs::monster`, checked once by
//! [`MonsterRecord::validate`], and consumed by the dataset writers.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{ParseError, ValidationError};

/// Keys every record in the final dataset carries (besides name and CR).
pub const CORE_KEYS: [&str; 8] = [
    "hp",
    "ac",
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

#[derive(Clone, Debug, PartialEq)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl StatValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StatValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Int(v) => Some(*v as f64),
            StatValue::Float(v) => Some(*v),
            StatValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StatValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Int(v) => write!(f, "{v}"),
            // Whole floats keep one decimal so the column reads as real-valued
            StatValue::Float(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            StatValue::Float(v) => write!(f, "{v}"),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self { StatValue::Int(v) }
}
impl From<f64> for StatValue {
    fn from(v: f64) -> Self { StatValue::Float(v) }
}
impl From<&str> for StatValue {
    fn from(v: &str) -> Self { StatValue::Text(s!(v)) }
}
impl From<String> for StatValue {
    fn from(v: String) -> Self { StatValue::Text(v) }
}

/// Challenge rating as a reduced fraction: `1/8`, `1/2`, `16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChallengeRating {
    numer: u32,
    denom: u32,
}

impl ChallengeRating {
    pub fn new(numer: u32, denom: u32) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let g = gcd(numer, denom);
        Some(Self { numer: numer / g, denom: denom / g })
    }

    pub fn whole(v: u32) -> Self {
        Self { numer: v, denom: 1 }
    }

    pub fn as_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a.max(1) } else { gcd(b, a % b) }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl FromStr for ChallengeRating {
    type Err = ParseError;

    /// Accepts `16`, `1/2`, and the decimal `0.5` form used in exported CSVs
    /// of other tools.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let bad = || ParseError::InvalidCr(s!(t));

        if let Some((n, d)) = t.split_once('/') {
            let n: u32 = n.trim().parse().map_err(|_| bad())?;
            let d: u32 = d.trim().parse().map_err(|_| bad())?;
            return ChallengeRating::new(n, d).ok_or_else(bad);
        }
        if let Ok(v) = t.parse::<u32>() {
            return Ok(ChallengeRating::whole(v));
        }
        // Decimal fallback, limited to the fractions the game uses
        let v: f64 = t.parse().map_err(|_| bad())?;
        for denom in [1u32, 2, 3, 4, 6, 8] {
            let numer = v * denom as f64;
            if numer >= 0.0 && (numer - numer.round()).abs() < 1e-9 {
                return ChallengeRating::new(numer.round() as u32, denom).ok_or_else(bad);
            }
        }
        Err(bad())
    }
}

/// One monster. Stats keep insertion order, which fixes the column order
/// of the exported dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterRecord {
    pub name: String,
    pub cr: ChallengeRating,
    pub source_url: String,
    pub stats: IndexMap<String, StatValue>,
}

impl MonsterRecord {
    pub fn new(name: impl Into<String>, cr: ChallengeRating, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cr,
            source_url: source_url.into(),
            stats: IndexMap::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<StatValue>) {
        self.stats.insert(s!(key), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.stats.get(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(StatValue::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(StatValue::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StatValue::as_text)
    }

    /// Name must be non-empty and the core subset present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        for key in CORE_KEYS {
            if !self.stats.contains_key(key) {
                return Err(ValidationError::MissingCore { name: self.name.clone(), key });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cr_parses_fractions_and_wholes() {
        assert_eq!("1/2".parse::<ChallengeRating>().unwrap().to_string(), "1/2");
        assert_eq!("2/4".parse::<ChallengeRating>().unwrap().to_string(), "1/2");
        assert_eq!("16".parse::<ChallengeRating>().unwrap().as_f64(), 16.0);
        assert_eq!("0.125".parse::<ChallengeRating>().unwrap().to_string(), "1/8");
        assert!(matches!("x".parse::<ChallengeRating>(), Err(ParseError::InvalidCr(_))));
        assert!("1/0".parse::<ChallengeRating>().is_err());
    }

    #[test]
    fn float_display_keeps_a_decimal() {
        assert_eq!(StatValue::Float(27.0).to_string(), "27.0");
        assert_eq!(StatValue::Float(4.5).to_string(), "4.5");
        assert_eq!(StatValue::Int(-1).to_string(), "-1");
    }

    #[test]
    fn validate_requires_core_keys() {
        let mut r = MonsterRecord::new("Goblin", ChallengeRating::new(1, 3).unwrap(), "u");
        for k in CORE_KEYS.iter().skip(1) {
            r.set(k, 10i64);
        }
        assert_eq!(
            r.validate(),
            Err(ValidationError::MissingCore { name: s!("Goblin"), key: "hp" })
        );
        r.set("hp", 6i64);
        assert_eq!(r.validate(), Ok(()));

        r.name = s!("  ");
        assert_eq!(r.validate(), Err(ValidationError::EmptyName));
    }
}
