//! Finite numeric values stored in trees

use std::cmp::Ordering;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::DomainError;

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A finite number.
///
/// Construction rejects NaN and infinities, so comparisons between two
/// `Value`s are always total.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Value(f64);

impl Value {
    /// Wrap a number, returning `None` if it is not finite.
    pub fn new(n: f64) -> Option<Self> {
        n.is_finite().then_some(Self(n))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// True if the value has no fractional part and fits an i64 exactly.
    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER
    }

    /// JSON number, integral values as integers.
    pub fn to_json(self) -> serde_json::Value {
        if self.is_integral() {
            serde_json::Value::from(self.0 as i64)
        } else {
            serde_json::Number::from_f64(self.0)
                .map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
    }

    /// Three-way comparison. `-0` and `0` compare equal.
    pub fn compare(self, other: Value) -> Ordering {
        if self.0 < other.0 {
            Ordering::Less
        } else if self.0 > other.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl TryFrom<f64> for Value {
    type Error = DomainError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        Value::new(n).ok_or(DomainError::InvalidValue(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self(f64::from(n))
    }
}

impl From<Value> for f64 {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            // normalizes -0 to 0
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integral() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let n = f64::deserialize(deserializer)?;
        Value::new(n).ok_or_else(|| de::Error::custom(format!("non-finite number: {n}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_non_finite_when_constructing_then_rejects() {
        assert!(Value::new(f64::NAN).is_none());
        assert!(Value::new(f64::INFINITY).is_none());
        assert!(Value::new(f64::NEG_INFINITY).is_none());
        assert!(Value::try_from(f64::NAN).is_err());
    }

    #[test]
    fn given_integral_value_when_serializing_then_writes_integer() {
        let json = serde_json::to_string(&Value::from(8)).unwrap();
        assert_eq!(json, "8");
        let json = serde_json::to_string(&Value::new(2.5).unwrap()).unwrap();
        assert_eq!(json, "2.5");
    }

    #[test]
    fn given_value_when_converting_to_json_then_matches_serialized_form() {
        for n in [8.0, -3.0, 2.5, -0.0, 1e300] {
            let v = Value::new(n).unwrap();
            assert_eq!(v.to_json(), serde_json::to_value(v).unwrap());
        }
    }

    #[test]
    fn given_negative_zero_when_displaying_then_prints_zero() {
        let v = Value::new(-0.0).unwrap();
        assert_eq!(v.to_string(), "0");
        assert_eq!(v.compare(Value::from(0)), Ordering::Equal);
    }

    #[test]
    fn given_json_number_when_deserializing_then_accepts_ints_and_floats() {
        let vs: Vec<Value> = serde_json::from_str("[1, -2.5, 1e3]").unwrap();
        assert_eq!(vs, vec![Value::from(1), Value::new(-2.5).unwrap(), Value::from(1000)]);
    }
}
