//! Positional argument codec.
//!
//! A dynamically-typed caller in the embedded runtime invokes statically-known
//! native operations by packing its argument list into a JSON object whose
//! keys are `"param1"`, `"param2"`, ... in positional order. Position 1 is
//! reserved for the correlation token; `0` means fire-and-forget. The reader
//! knows per-operation how many parameters to expect and of which type, so
//! the wire carries no arity or type schema - absent keys decode to empty
//! sentinels rather than erroring.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifies one outstanding child-side expectation of a reply.
///
/// Assigned by the child at call-issue time, unique among currently
/// outstanding calls. Reuse after consumption is permitted.
pub type CorrelationToken = u32;

/// Reserved token meaning "no reply expected".
pub const FIRE_AND_FORGET: CorrelationToken = 0;

/// One positional argument as supplied by the embedded runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

impl Arg {
    fn to_value(&self) -> Value {
        match self {
            Arg::Null => Value::Null,
            Arg::Bool(b) => Value::Bool(*b),
            Arg::Int(i) => Value::from(*i),
            Arg::Double(d) => Value::from(*d),
            Arg::Str(s) => Value::from(s.clone()),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Double(value)
    }
}

/// Encodes the token and the ordered argument list as the wire object.
///
/// The token always lands in `"param1"`; arguments fill `"param2"` onward in
/// list order.
pub fn encode_args(token: CorrelationToken, args: &[Arg]) -> Value {
    let mut object = Map::with_capacity(args.len() + 1);
    object.insert("param1".to_string(), Value::from(token));
    for (index, arg) in args.iter().enumerate() {
        object.insert(format!("param{}", index + 2), arg.to_value());
    }
    Value::Object(object)
}

/// Read-side view over a decoded parameter object.
///
/// Typed positional getters return the type's empty sentinel when the key is
/// absent or of the wrong JSON type. Non-object input decodes to an empty
/// parameter set, which the dispatcher then drops for its missing token.
#[derive(Debug, Clone, Default)]
pub struct Params {
    object: Map<String, Value>,
}

impl Params {
    /// Parses a raw JSON string. Fails only on invalid JSON.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let object = match value {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        Ok(Self { object })
    }

    fn get(&self, position: usize) -> Option<&Value> {
        self.object.get(&format!("param{position}"))
    }

    /// The correlation token from `"param1"`, or `None` when the reserved
    /// field is absent or not an integer. Zero and negative values are
    /// returned as-is so the dispatcher can apply its `> 0` reply rule.
    pub fn token(&self) -> Option<i64> {
        self.get(1).and_then(Value::as_i64)
    }

    pub fn str(&self, position: usize) -> &str {
        self.get(position).and_then(Value::as_str).unwrap_or("")
    }

    pub fn int(&self, position: usize) -> i64 {
        self.get(position).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn bool(&self, position: usize) -> bool {
        self.get(position).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn double(&self, position: usize) -> f64 {
        self.get(position).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// The raw JSON value at a position, `Null` when absent.
    pub fn value(&self, position: usize) -> Value {
        self.get(position).cloned().unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_places_token_first() {
        let encoded = encode_args(7, &["url".into(), Arg::Int(3)]);
        assert_eq!(encoded["param1"], 7);
        assert_eq!(encoded["param2"], "url");
        assert_eq!(encoded["param3"], 3);
    }

    #[test]
    fn round_trip_preserves_all_value_kinds() {
        let args = vec![
            Arg::Str("hello".to_string()),
            Arg::Int(-42),
            Arg::Bool(true),
            Arg::Double(2.5),
            Arg::Null,
        ];

        let raw = encode_args(9, &args).to_string();
        let params = Params::parse(&raw).unwrap();

        assert_eq!(params.token(), Some(9));
        assert_eq!(params.str(2), "hello");
        assert_eq!(params.int(3), -42);
        assert!(params.bool(4));
        assert_eq!(params.double(5), 2.5);
        assert_eq!(params.value(6), Value::Null);
    }

    #[test]
    fn absent_keys_decode_to_sentinels() {
        let params = Params::parse(r#"{"param1": 1}"#).unwrap();
        assert_eq!(params.str(2), "");
        assert_eq!(params.int(3), 0);
        assert!(!params.bool(4));
        assert_eq!(params.double(5), 0.0);
        assert_eq!(params.value(6), Value::Null);
    }

    #[test]
    fn fire_and_forget_token_is_zero() {
        let raw = encode_args(FIRE_AND_FORGET, &[]).to_string();
        let params = Params::parse(&raw).unwrap();
        assert_eq!(params.token(), Some(0));
    }

    #[test]
    fn missing_token_is_none() {
        let params = Params::parse(r#"{"param2": "x"}"#).unwrap();
        assert_eq!(params.token(), None);

        // Non-object JSON parses but exposes nothing.
        let params = Params::parse("[1, 2, 3]").unwrap();
        assert_eq!(params.token(), None);

        assert!(Params::parse("not json").is_err());
    }
}
