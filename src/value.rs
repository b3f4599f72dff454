//! Dynamic value representation for JSON data.
//!
//! This module provides the [`JsonValue`] enum which represents any valid JSON
//! value. It's useful for working with JSON data when the structure isn't known
//! at compile time.
//!
//! ## Core Types
//!
//! - [`JsonValue`]: An enum representing any JSON value (null, bool, number,
//!   string, array, object)
//! - [`Number`]: Represents numeric values, preserving the integral/floating
//!   classification of the source lexeme
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use jsonbind::{JsonValue, Number};
//!
//! // From primitives
//! let null = JsonValue::Null;
//! let boolean = JsonValue::from(true);
//! let number = JsonValue::from(42);
//! let text = JsonValue::from("hello");
//!
//! // Using the json! macro
//! use jsonbind::json;
//! let obj = json!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! ```
//!
//! ### Type Checking
//!
//! ```rust
//! use jsonbind::JsonValue;
//!
//! let value = JsonValue::from(42);
//! assert!(value.is_number());
//! assert!(!value.is_string());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use jsonbind::JsonValue;
//!
//! let value = JsonValue::from(42);
//! assert_eq!(value.as_i64(), Some(42));
//! ```

use crate::JsonMap;
use std::fmt;

/// A dynamically-typed representation of any valid JSON value.
///
/// This enum can represent any JSON value. It's particularly useful when:
///
/// - The structure isn't known at compile time
/// - You need to manipulate JSON data generically
/// - Building JSON structures programmatically
///
/// Objects preserve key insertion order (see [`JsonMap`]), so a parse-then-emit
/// round trip keeps members in their source order.
///
/// # Examples
///
/// ```rust
/// use jsonbind::{JsonValue, Number};
///
/// let null = JsonValue::Null;
/// let num = JsonValue::Number(Number::Integer(42));
/// let text = JsonValue::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonValue>),
    Object(JsonMap),
}

/// A numeric value that is either integral or floating.
///
/// The distinction follows the source lexeme: a number containing a decimal
/// point or an exponent marker is floating, anything else is integral. The
/// classification survives a round trip because floating values always emit
/// with a `.0` or exponent form.
///
/// # Examples
///
/// ```rust
/// use jsonbind::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::Number;
    ///
    /// assert!(Number::Integer(42).is_integer());
    /// assert!(!Number::Float(3.5).is_integer());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::Number;
    ///
    /// assert!(Number::Float(3.5).is_float());
    /// assert!(!Number::Integer(42).is_float());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Returns `Some(i64)` for integers and floats with no fractional part
    /// that fit in i64 range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to an `f64`. Always succeeds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_f64(), 42.0);
    /// assert_eq!(Number::Float(3.5).as_f64(), 3.5);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => {
                let mut buf = String::new();
                crate::bind::write_f64(&mut buf, *fl);
                f.write_str(&buf)
            }
        }
    }
}

impl From<i8> for Number {
    fn from(value: i8) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i16> for Number {
    fn from(value: i16) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u8> for Number {
    fn from(value: u8) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u16> for Number {
    fn from(value: u16) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl JsonValue {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::JsonValue;
    ///
    /// assert_eq!(JsonValue::Bool(true).as_bool(), Some(true));
    /// assert_eq!(JsonValue::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::JsonValue;
    ///
    /// assert_eq!(JsonValue::from("hello").as_str(), Some("hello"));
    /// assert_eq!(JsonValue::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an i64 integer or a whole-number float, returns it.
    /// Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::{JsonValue, Number};
    ///
    /// assert_eq!(JsonValue::Number(Number::Integer(42)).as_i64(), Some(42));
    /// assert_eq!(JsonValue::Number(Number::Float(42.0)).as_i64(), Some(42));
    /// assert_eq!(JsonValue::Number(Number::Float(42.5)).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as an `f64`. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&JsonMap> {
        match self {
            JsonValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Navigates to an object member by key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::json;
    ///
    /// let value = json!({"a": {"b": 1}});
    /// let inner = value.get("a").and_then(|v| v.get("b"));
    /// assert_eq!(inner.and_then(|v| v.as_i64()), Some(1));
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(obj) => obj.get(key),
            _ => None,
        }
    }
}

/// Emits compact JSON text.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => write!(f, "{}", b),
            JsonValue::Number(n) => write!(f, "{}", n),
            JsonValue::String(s) => {
                let mut buf = String::with_capacity(s.len() + 2);
                crate::bind::write_json_string(&mut buf, s);
                f.write_str(&buf)
            }
            JsonValue::Array(arr) => {
                f.write_str("[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            JsonValue::Object(obj) => {
                f.write_str("{")?;
                for (i, (k, v)) in obj.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    let mut key = String::with_capacity(k.len() + 2);
                    crate::bind::write_json_string(&mut key, k);
                    write!(f, "{}:{}", key, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

// From implementations for creating JsonValue from primitives
impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i8> for JsonValue {
    fn from(value: i8) -> Self {
        JsonValue::Number(Number::Integer(value as i64))
    }
}

impl From<i16> for JsonValue {
    fn from(value: i16) -> Self {
        JsonValue::Number(Number::Integer(value as i64))
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(Number::Integer(value))
    }
}

impl From<u8> for JsonValue {
    fn from(value: u8) -> Self {
        JsonValue::Number(Number::Integer(value as i64))
    }
}

impl From<u16> for JsonValue {
    fn from(value: u16) -> Self {
        JsonValue::Number(Number::Integer(value as i64))
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Number(Number::Integer(value as i64))
    }
}

impl From<f32> for JsonValue {
    fn from(value: f32) -> Self {
        JsonValue::Number(Number::Float(value as f64))
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(Number::Float(value))
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        JsonValue::Array(value)
    }
}

impl From<JsonMap> for JsonValue {
    fn from(value: JsonMap) -> Self {
        JsonValue::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(JsonValue::from(true), JsonValue::Bool(true));
        assert_eq!(
            JsonValue::from(42i32),
            JsonValue::Number(Number::Integer(42))
        );
        assert_eq!(
            JsonValue::from(42i64),
            JsonValue::Number(Number::Integer(42))
        );
        assert_eq!(
            JsonValue::from(3.5f64),
            JsonValue::Number(Number::Float(3.5))
        );
        assert_eq!(
            JsonValue::from("test"),
            JsonValue::String("test".to_string())
        );
        assert_eq!(
            JsonValue::from("test".to_string()),
            JsonValue::String("test".to_string())
        );
    }

    #[test]
    fn test_from_collections() {
        let vec = vec![JsonValue::from(1i32), JsonValue::from(2i32)];
        let value = JsonValue::from(vec.clone());
        assert_eq!(value, JsonValue::Array(vec));

        let mut map = JsonMap::new();
        map.insert("key".to_string(), JsonValue::from(42i32));
        let value = JsonValue::from(map.clone());
        assert_eq!(value, JsonValue::Object(map));
    }

    #[test]
    fn test_number_classification() {
        let num = Number::Integer(42);
        assert!(num.is_integer());
        assert!(!num.is_float());
        assert_eq!(num.as_i64(), Some(42));
        assert_eq!(num.as_f64(), 42.0);

        let num = Number::Float(42.5);
        assert!(num.is_float());
        assert_eq!(num.as_i64(), None);
    }

    #[test]
    fn test_display_compact() {
        let mut map = JsonMap::new();
        map.insert("a".to_string(), JsonValue::from(1));
        map.insert(
            "b".to_string(),
            JsonValue::Array(vec![JsonValue::Null, JsonValue::from("x")]),
        );
        let value = JsonValue::Object(map);
        assert_eq!(value.to_string(), r#"{"a":1,"b":[null,"x"]}"#);
    }

    #[test]
    fn test_display_preserves_float_form() {
        assert_eq!(JsonValue::from(1.0f64).to_string(), "1.0");
        assert_eq!(JsonValue::from(1i64).to_string(), "1");
    }

    #[test]
    fn test_const_is_methods() {
        const fn check_null(v: &JsonValue) -> bool {
            v.is_null()
        }

        let null_value = JsonValue::Null;
        assert!(check_null(&null_value));
    }
}
