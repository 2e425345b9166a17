//! Configuration value model
//!
//! Values arrive as loosely typed JSON/YAML and are converted once into the
//! tagged [`ConfigValue`], so the reconciler can match on shape exhaustively.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ValueError;

/// Ordered mapping of configuration keys to values
///
/// Insertion order is kept so operations come out in declared order.
pub type ConfigTree = IndexMap<String, ConfigValue>;

/// Scalar configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Text
    String(String),
    /// Signed integer
    Integer(i64),
    /// Boolean
    Boolean(bool),
    /// Floating point number
    Float(f64),
}

/// Runtime kind of a scalar, carried by set operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// Text
    String,
    /// Signed integer
    Integer,
    /// Boolean
    Boolean,
    /// Floating point number
    Float,
}

impl ScalarValue {
    /// Kind of this scalar
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::String(_) => ScalarKind::String,
            Self::Integer(_) => ScalarKind::Integer,
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::Float(_) => ScalarKind::Float,
        }
    }

    /// Whether this is the empty string
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// Compare against an observed scalar
    ///
    /// Integers and floats compare numerically. Strings, booleans and
    /// numbers never equal each other.
    #[must_use]
    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                *a as f64 == *b
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for ScalarValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Configuration value
///
/// `Empty` is an explicit null, distinct from a key that is not present.
/// `List` only exists so list input can be represented and rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Scalar leaf
    Scalar(ScalarValue),
    /// Nested mapping
    Map(ConfigTree),
    /// Sequence
    List(Vec<ConfigValue>),
    /// Explicit null
    Empty,
}

impl ConfigValue {
    /// Nested map, if this is one
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&ConfigTree> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Scalar, if this is one
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value is empty: null, `""` or `{}`
    ///
    /// An empty list is still a list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Scalar(s) => s.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::List(_) => false,
        }
    }

    /// Short name of the value's shape, for messages
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Empty => "null",
        }
    }
}

impl From<ScalarValue> for ConfigValue {
    fn from(s: ScalarValue) -> Self {
        Self::Scalar(s)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(map: ConfigTree) -> Self {
        Self::Map(map)
    }
}

impl From<JsonValue> for ConfigValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Empty,
            JsonValue::Bool(b) => Self::Scalar(ScalarValue::Boolean(b)),
            JsonValue::Number(n) => match (n.as_i64(), n.is_u64()) {
                (Some(i), _) => Self::Scalar(ScalarValue::Integer(i)),
                // beyond i64: keep the exact digits instead of rounding to a float
                (None, true) => Self::Scalar(ScalarValue::String(n.to_string())),
                (None, false) => Self::Scalar(ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            JsonValue::String(s) => Self::Scalar(ScalarValue::String(s)),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Self::from)
    }
}

/// Convert a JSON document into a configuration tree
///
/// # Errors
/// Returns [`ValueError::NotAMapping`] if the top level is not an object
pub fn tree_from_json(value: JsonValue) -> Result<ConfigTree, ValueError> {
    match ConfigValue::from(value) {
        ConfigValue::Map(tree) => Ok(tree),
        other => Err(ValueError::NotAMapping {
            found: other.shape_name(),
        }),
    }
}
