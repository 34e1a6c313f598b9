use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scalar model parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    /// Unsigned values beyond `i64::MAX`
    UInt(u64),
    Float(f64),
}

impl ParamValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            ParamValue::Int(v) => v as f64,
            ParamValue::UInt(v) => v as f64,
            ParamValue::Float(v) => v,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::UInt(v) => write!(f, "{}", v),
            // Debug keeps the decimal point on whole floats (1.0, not 1)
            ParamValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(ParamValue::UInt(v as u64), ParamValue::Int)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(ParamValue::UInt(v), ParamValue::Int)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

/// Model parameters keyed by name, always iterated in sorted key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Params(BTreeMap<&'static str, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object with sorted keys, e.g. `{"depth":3,"seed":0}`
    pub fn to_json(&self) -> String {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| {
                let value = match *v {
                    ParamValue::Int(i) => Value::from(i),
                    ParamValue::UInt(u) => Value::from(u),
                    ParamValue::Float(x) => Value::from(x),
                };
                (k.to_string(), value)
            })
            .collect();
        Value::Object(map).to_string()
    }
}

/// `name(k1=v1, k2=v2)` with sorted keys, or `name()` without params
pub fn describe(name: &str, params: &Params) -> String {
    let assignments: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("{}({})", name, assignments.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_sorted() {
        let params = Params::new()
            .with("seed", 0u64)
            .with("ntrees", 100usize)
            .with("depth", 3usize);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["depth", "ntrees", "seed"]);
    }

    #[test]
    fn test_to_json_sorted_keys() {
        let params = Params::new().with("b", 1.5).with("a", 2i64);
        assert_eq!(params.to_json(), r#"{"a":2,"b":1.5}"#);
        assert_eq!(Params::new().to_json(), "{}");
    }

    #[test]
    fn test_describe() {
        let params = Params::new().with("inverse_l2", 0.0001);
        assert_eq!(describe("logistic", &params), "logistic(inverse_l2=0.0001)");
        assert_eq!(describe("fifty", &Params::new()), "fifty()");

        let params = Params::new().with("seed", 0u64).with("depth", 3usize).with("rate", 1.0);
        assert_eq!(describe("m", &params), "m(depth=3, rate=1.0, seed=0)");
    }

    #[test]
    fn test_param_value_conversions() {
        assert_eq!(ParamValue::from(3usize), ParamValue::Int(3));
        assert_eq!(ParamValue::from(0.5).as_f64(), 0.5);
        assert_eq!(ParamValue::Int(4).as_f64(), 4.0);
        assert_eq!(ParamValue::from(i64::MAX as u64), ParamValue::Int(i64::MAX));
    }

    #[test]
    fn test_large_unsigned_keeps_its_value() {
        let params = Params::new().with("seed", u64::MAX).with("n", usize::MAX);
        assert_eq!(params.get("seed"), Some(ParamValue::UInt(u64::MAX)));
        assert_eq!(
            describe("m", &params),
            format!("m(n={}, seed=18446744073709551615)", usize::MAX)
        );
        assert_eq!(
            params.to_json(),
            format!(r#"{{"n":{},"seed":18446744073709551615}}"#, usize::MAX)
        );
    }
}
