//! # jsonbind
//!
//! A self-contained JSON data-binding engine: a hand-written streaming
//! tokenizer, a type-metadata cache with pre-built invocation handles, a
//! pluggable converter registry, and a recursive binding engine that maps
//! JSON text to and from typed Rust values.
//!
//! ## Key Features
//!
//! - **Streaming tokenizer**: single-pass lexing with lenient comma handling
//!   and precise byte-offset error reporting
//! - **Descriptor-driven binding**: types opt in with the [`bindable!`] macro;
//!   field, constructor, and method handles are built once per type and cached
//!   process-wide
//! - **Pluggable converters**: register by exact generic type or raw
//!   type-constructor name, then freeze the registry for safe concurrent reads
//! - **Dynamic values**: a [`JsonValue`] tree with insertion-ordered objects
//!   and a [`json!`] literal macro for structure not known at compile time
//! - **No Unsafe Code**: written entirely in safe Rust with zero unsafe blocks
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonbind::{bindable, from_json, to_json};
//!
//! bindable! {
//!     #[derive(Default, Debug, PartialEq)]
//!     pub struct User {
//!         pub id: u32,
//!         pub name: String,
//!         pub active: bool,
//!     }
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let text = to_json(&user).unwrap();
//! assert_eq!(text, r#"{"active":true,"id":123,"name":"Alice"}"#);
//!
//! let back: User = from_json(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Custom Converters
//!
//! A converter owns the full encoding of the values it claims. Exact
//! registrations key on the complete generic type, so a converter for
//! `Vec<String>` never touches `Vec<i64>`:
//!
//! ```rust
//! use jsonbind::convert::CsvListConverter;
//! use jsonbind::{ConverterRegistry, JsonConfig, JsonMapper, TypeRef};
//!
//! let registry = ConverterRegistry::new();
//! registry
//!     .register_ref(&TypeRef::<Vec<String>>::new(), CsvListConverter)
//!     .unwrap();
//! registry.freeze();
//!
//! let mapper = JsonMapper::new(JsonConfig::new().with_converters(registry));
//! let tags = vec!["a".to_string(), "b".to_string()];
//! assert_eq!(mapper.to_json(&tags).unwrap(), "\"a,b\"");
//! assert_eq!(mapper.to_json(&vec![1i64, 2]).unwrap(), "[1,2]");
//! ```
//!
//! ### Dynamic Values with the json! Macro
//!
//! ```rust
//! use jsonbind::{json, JsonValue};
//!
//! let data = json!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "json"]
//! });
//!
//! if let JsonValue::Object(obj) = data {
//!     assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```
//!
//! ## Leniency
//!
//! Parsing is lenient by default: extraneous and trailing commas are skipped,
//! so `[1,2,3,]` and `{"a":1,}` decode the same as their strict forms. Switch
//! it off with [`JsonConfig::with_lenient`].
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All array indexing is bounds-checked
//! - Proper error propagation with `Result` types
//! - No panics in the public API

pub mod bind;
pub mod convert;
pub mod error;
pub mod macros;
pub mod map;
pub mod mapper;
pub mod meta;
pub mod reader;
pub mod registry;
pub mod typeref;
pub mod value;

pub use bind::{write_json_string, BindValue};
pub use error::{Error, Result};
pub use map::JsonMap;
pub use mapper::{
    skip_value, DefaultKeyMapper, JsonConfig, JsonMapper, KeyMapper, ReadCtx, WriteCtx,
    DEFAULT_MAX_DEPTH,
};
pub use meta::{
    ConstructorDescriptor, Describe, DescriptorBuilder, FieldDescriptor, MetaCache,
    MethodDescriptor, TypeDescriptor, TypeKey,
};
pub use reader::{JsonReader, Token};
pub use registry::{ConverterRegistry, DynConverter, JsonConverter};
pub use typeref::TypeRef;
pub use value::{JsonValue, Number};

use std::sync::OnceLock;

fn default_mapper() -> &'static JsonMapper {
    static MAPPER: OnceLock<JsonMapper> = OnceLock::new();
    MAPPER.get_or_init(JsonMapper::default)
}

/// Encodes `value` as compact JSON text using a shared default mapper.
///
/// # Examples
///
/// ```rust
/// use jsonbind::to_json;
///
/// assert_eq!(to_json(&vec![1i64, 2, 3]).unwrap(), "[1,2,3]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be encoded (depth limit, converter
/// failure).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json<T: BindValue>(value: &T) -> Result<String> {
    default_mapper().to_json(value)
}

/// Decodes a `T` from JSON text using a shared default mapper.
///
/// # Examples
///
/// ```rust
/// use jsonbind::from_json;
///
/// let nums: Vec<i64> = from_json("[1,2,3,]").unwrap();
/// assert_eq!(nums, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns a lexical, structural, or binding error describing the failure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_json<T: BindValue>(text: &str) -> Result<T> {
    default_mapper().from_json(text)
}

/// Decodes JSON text into the dynamic [`JsonValue`] tree using a shared
/// default mapper.
///
/// # Examples
///
/// ```rust
/// use jsonbind::from_json_value;
///
/// let value = from_json_value(r#"{"a": 1}"#).unwrap();
/// assert_eq!(value.get("a").and_then(|v| v.as_i64()), Some(1));
/// ```
///
/// # Errors
///
/// Returns a lexical or structural error for malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_json_value(text: &str) -> Result<JsonValue> {
    default_mapper().from_json_value(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    bindable! {
        #[derive(Default, Debug, PartialEq)]
        struct Point {
            x: i64,
            y: i64,
        }
    }

    bindable! {
        #[derive(Default, Debug, PartialEq)]
        struct User {
            id: u32,
            name: String,
            active: bool,
            tags: Vec<i64>,
        }
    }

    #[test]
    fn test_round_trip_point() {
        let point = Point { x: 1, y: -2 };
        let text = to_json(&point).unwrap();
        let back: Point = from_json(&text).unwrap();
        assert_eq!(point, back);
    }

    #[test]
    fn test_round_trip_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec![1, 2, 3],
        };
        let text = to_json(&user).unwrap();
        let back: User = from_json(&text).unwrap();
        assert_eq!(user, back);
    }

    #[test]
    fn test_round_trip_scalars() {
        assert_eq!(from_json::<i64>(&to_json(&-5i64).unwrap()).unwrap(), -5);
        assert_eq!(from_json::<bool>(&to_json(&true).unwrap()).unwrap(), true);
        assert_eq!(
            from_json::<String>(&to_json(&"hi\n".to_string()).unwrap()).unwrap(),
            "hi\n"
        );
        assert_eq!(from_json::<f64>(&to_json(&2.5f64).unwrap()).unwrap(), 2.5);
    }

    #[test]
    fn test_dynamic_value_round_trip() {
        let text = r#"{"a":1,"b":[true,null],"c":"s"}"#;
        let value = from_json_value(text).unwrap();
        assert_eq!(to_json(&value).unwrap(), text);
    }

    #[test]
    fn test_option_round_trip() {
        assert_eq!(to_json(&Option::<i64>::None).unwrap(), "null");
        assert_eq!(from_json::<Option<i64>>("null").unwrap(), None);
        assert_eq!(from_json::<Option<i64>>("7").unwrap(), Some(7));
    }
}
