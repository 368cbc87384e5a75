use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A mapping from string keys to claim values.
///
/// Keys are kept sorted, so a mapping always serializes to the same bytes.
pub type ClaimMap = BTreeMap<String, ClaimValue>;

/// The body of a token.
pub type Claims = ClaimMap;

/// The JOSE header of a token.
pub type Header = ClaimMap;

/// A value that can appear in a token header or body.
///
/// JSON `null` and non-integral numbers are deliberately absent: a segment
/// containing them does not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    String(String),
    List(Vec<ClaimValue>),
    Map(ClaimMap),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ClaimMap> {
        match self {
            ClaimValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Integer(value.into())
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<ClaimMap> for ClaimValue {
    fn from(value: ClaimMap) -> Self {
        ClaimValue::Map(value)
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(value: Vec<T>) -> Self {
        ClaimValue::List(value.into_iter().map(Into::into).collect())
    }
}

/// Build a [`ClaimMap`] from `key => value` pairs.
///
/// ```
/// use accesstoken_jwt::{claims, ClaimValue};
///
/// let body = claims! {
///     "sub" => "accountSid",
///     "exp" => 1_700_000_000i64,
///     "grants" => claims! { "identity" => "alice" },
/// };
/// assert_eq!(body["sub"], ClaimValue::from("accountSid"));
/// ```
#[macro_export]
macro_rules! claims {
    () => {
        $crate::ClaimMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ClaimMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::ClaimValue::from($value));
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_json() {
        let value = ClaimValue::from(claims! {
            "b" => true,
            "i" => 42i64,
            "l" => vec!["x", "y"],
            "s" => "text",
        });
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"b":true,"i":42,"l":["x","y"],"s":"text"}"#);
    }

    #[test]
    fn test_deserializes_each_variant() {
        let map: ClaimMap =
            serde_json::from_str(r#"{"n":-7,"t":false,"s":"x","l":[1,"a"],"m":{"k":"v"}}"#)
                .unwrap();
        assert_eq!(map["n"].as_i64(), Some(-7));
        assert_eq!(map["t"].as_bool(), Some(false));
        assert_eq!(map["s"].as_str(), Some("x"));
        assert_eq!(
            map["l"].as_list(),
            Some(&[ClaimValue::Integer(1), ClaimValue::from("a")][..])
        );
        assert_eq!(map["m"].as_map().unwrap()["k"].as_str(), Some("v"));
    }

    #[test]
    fn test_rejects_values_outside_the_closed_set() {
        assert!(serde_json::from_str::<ClaimMap>(r#"{"x":null}"#).is_err());
        assert!(serde_json::from_str::<ClaimMap>(r#"{"x":1.5}"#).is_err());
        assert!(serde_json::from_str::<ClaimMap>(r#"["not","a","map"]"#).is_err());
    }

    #[test]
    fn test_key_order_is_stable() {
        let a = claims! { "z" => 1i64, "a" => 2i64 };
        let b = claims! { "a" => 2i64, "z" => 1i64 };
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }
}
