//! The value-binding trait and its implementations for scalars, collections,
//! maps, and the dynamic value tree.
//!
//! [`BindValue`] is the contract between the binding engine and every
//! encodable/decodable type: a [`TypeKey`] identifying the type to the
//! converter registry, a structural default writer, and a structural default
//! reader. The engine consults the registry first and falls back to these
//! defaults, so implementations here define what a value looks like when no
//! converter claims it.
//!
//! Reader convention: `read_default` is invoked with the reader already
//! positioned **on** the value's first token. Scalars consume nothing further;
//! containers advance through their elements and leave the reader on their
//! closing token.
//!
//! Numeric targets accept either integral or floating tokens and narrow or
//! widen as needed; `null` coerces to zero for bare numerics, `false` for
//! `bool`, and `None` for `Option`. Strings and collections reject `null` —
//! wrap them in `Option` when absence is meaningful.

use crate::mapper::{ReadCtx, WriteCtx};
use crate::meta::TypeKey;
use crate::reader::{JsonReader, Token};
use crate::{Error, JsonMap, JsonValue, Number, Result};
use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::Write as _;
use std::hash::Hash;

/// A type the binding engine can encode and decode.
///
/// Most scalar and collection types implement this already; structs opt in
/// through the [`bindable!`](crate::bindable) macro, which also supplies the
/// descriptor used by the metadata cache.
pub trait BindValue: Any + Sized {
    /// The registry/lookup key for this type.
    fn type_key() -> TypeKey;

    /// Writes the structural default encoding, used when no converter is
    /// registered for the type.
    fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()>;

    /// Reads the structural default encoding. The reader is positioned on the
    /// value's first token.
    fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self>;
}

/// Appends `s` as a quoted JSON string, escaping as required.
pub fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Appends a float so that its classification survives a round trip: whole
/// values keep a `.0` (or exponent form for large magnitudes) and non-finite
/// values become `null`.
pub(crate) fn write_f64(out: &mut String, f: f64) {
    if !f.is_finite() {
        out.push_str("null");
    } else if f == f.trunc() {
        if f.abs() < 1e16 {
            let _ = write!(out, "{:.1}", f);
        } else {
            let _ = write!(out, "{:e}", f);
        }
    } else {
        let _ = write!(out, "{}", f);
    }
}

impl BindValue for bool {
    fn type_key() -> TypeKey {
        TypeKey::of::<bool>("bool", &[])
    }

    fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
        out.push_str(if *self { "true" } else { "false" });
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
        match r.token() {
            Token::Bool => Ok(r.bool_val()),
            Token::Null => Ok(false),
            other => Err(Error::binding(format!("cannot bind {other:?} to bool"))),
        }
    }
}

macro_rules! impl_bind_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl BindValue for $ty {
            fn type_key() -> TypeKey {
                TypeKey::of::<$ty>(stringify!($ty), &[])
            }

            fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
                let _ = write!(out, "{}", self);
                Ok(())
            }

            fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
                match r.token() {
                    Token::Num if r.is_double() => Ok(r.double_val() as $ty),
                    Token::Num => Ok(r.long_val() as $ty),
                    Token::Null => Ok(0),
                    other => Err(Error::binding(format!(
                        "cannot bind {other:?} to {}",
                        stringify!($ty)
                    ))),
                }
            }
        }
    )*};
}

impl_bind_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_bind_float {
    ($($ty:ty),* $(,)?) => {$(
        impl BindValue for $ty {
            fn type_key() -> TypeKey {
                TypeKey::of::<$ty>(stringify!($ty), &[])
            }

            fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
                write_f64(out, *self as f64);
                Ok(())
            }

            fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
                match r.token() {
                    Token::Num if r.is_double() => Ok(r.double_val() as $ty),
                    Token::Num => Ok(r.long_val() as $ty),
                    Token::Null => Ok(0.0),
                    other => Err(Error::binding(format!(
                        "cannot bind {other:?} to {}",
                        stringify!($ty)
                    ))),
                }
            }
        }
    )*};
}

impl_bind_float!(f32, f64);

impl BindValue for String {
    fn type_key() -> TypeKey {
        TypeKey::of::<String>("String", &[])
    }

    fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
        write_json_string(out, self);
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
        match r.token() {
            Token::Str => Ok(r.take_string()),
            Token::Null => Err(Error::binding(
                "cannot bind null to String; use Option<String>",
            )),
            other => Err(Error::binding(format!("cannot bind {other:?} to String"))),
        }
    }
}

impl<T: BindValue> BindValue for Option<T> {
    fn type_key() -> TypeKey {
        TypeKey::of::<Option<T>>("Option", &[])
    }

    fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
        match self {
            None => {
                out.push_str("null");
                Ok(())
            }
            Some(v) => ctx.write_value(out, v),
        }
    }

    fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
        match r.token() {
            Token::Null => Ok(None),
            _ => Ok(Some(ctx.read_value(r)?)),
        }
    }
}

// Boxing is transparent: converters registered for T apply to Box<T>'s
// contents.
impl<T: BindValue> BindValue for Box<T> {
    fn type_key() -> TypeKey {
        TypeKey::of::<Box<T>>("Box", &[])
    }

    fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
        ctx.write_value(out, &**self)
    }

    fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
        Ok(Box::new(ctx.read_value(r)?))
    }
}

macro_rules! impl_bind_seq {
    ($ty:ident, $raw:literal, $push:ident $(, $bound:path)*) => {
        impl<T: BindValue $(+ $bound)*> BindValue for $ty<T> {
            fn type_key() -> TypeKey {
                TypeKey::of::<$ty<T>>($raw, &["Collection"])
            }

            fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
                out.push('[');
                for (i, item) in self.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    ctx.write_value(out, item)?;
                }
                out.push(']');
                Ok(())
            }

            fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
                match r.token() {
                    Token::StartArray => {
                        let mut items = Self::default();
                        loop {
                            match r.next()? {
                                Token::EndArray => return Ok(items),
                                Token::Eof => {
                                    return Err(Error::structural("unterminated array"))
                                }
                                _ => {
                                    items.$push(ctx.read_value(r)?);
                                }
                            }
                        }
                    }
                    other => Err(Error::binding(format!(
                        "cannot bind {other:?} to {}",
                        $raw
                    ))),
                }
            }
        }
    };
}

impl_bind_seq!(Vec, "Vec", push);
impl_bind_seq!(VecDeque, "VecDeque", push_back);
impl_bind_seq!(IndexSet, "IndexSet", insert, Hash, Eq);
impl_bind_seq!(BTreeSet, "BTreeSet", insert, Ord);

impl<T: BindValue, const N: usize> BindValue for [T; N] {
    fn type_key() -> TypeKey {
        TypeKey::of::<[T; N]>("array", &["Collection"])
    }

    fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
        out.push('[');
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            ctx.write_value(out, item)?;
        }
        out.push(']');
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
        match r.token() {
            Token::StartArray => {
                let mut items = Vec::with_capacity(N);
                loop {
                    match r.next()? {
                        Token::EndArray => break,
                        Token::Eof => return Err(Error::structural("unterminated array")),
                        _ => items.push(ctx.read_value(r)?),
                    }
                }
                let found = items.len();
                items.try_into().map_err(|_| {
                    Error::binding(format!("expected {N} array elements, found {found}"))
                })
            }
            other => Err(Error::binding(format!("cannot bind {other:?} to array"))),
        }
    }
}

// Map keys must be strings; there is intentionally no impl for other key
// types.
macro_rules! impl_bind_map {
    ($ty:ident, $raw:literal) => {
        impl<V: BindValue> BindValue for $ty<String, V> {
            fn type_key() -> TypeKey {
                TypeKey::of::<$ty<String, V>>($raw, &["Map"])
            }

            fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
                out.push('{');
                for (i, (key, value)) in self.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_json_string(out, key);
                    out.push(':');
                    ctx.write_value(out, value)?;
                }
                out.push('}');
                Ok(())
            }

            fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
                match r.token() {
                    Token::StartObject => {
                        let mut map = Self::default();
                        loop {
                            match r.next()? {
                                Token::EndObject => return Ok(map),
                                Token::FieldName | Token::Str => {
                                    let key = r.take_string();
                                    r.next()?;
                                    map.insert(key, ctx.read_value(r)?);
                                }
                                Token::Eof => {
                                    return Err(Error::structural("unterminated object"))
                                }
                                other => {
                                    return Err(Error::structural(format!(
                                        "expected object key, found {other:?}"
                                    )))
                                }
                            }
                        }
                    }
                    other => Err(Error::binding(format!(
                        "cannot bind {other:?} to {}",
                        $raw
                    ))),
                }
            }
        }
    };
}

impl_bind_map!(IndexMap, "IndexMap");
impl_bind_map!(HashMap, "HashMap");
impl_bind_map!(BTreeMap, "BTreeMap");

/// The dynamic value tree binds any token shape. The runtime variant is what
/// drives the registry on write, so a converter registered for e.g. `String`
/// does not intercept `JsonValue::String`.
impl BindValue for JsonValue {
    fn type_key() -> TypeKey {
        TypeKey::of::<JsonValue>("JsonValue", &[])
    }

    fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
        match self {
            JsonValue::Null => {
                out.push_str("null");
                Ok(())
            }
            JsonValue::Bool(b) => {
                out.push_str(if *b { "true" } else { "false" });
                Ok(())
            }
            JsonValue::Number(Number::Integer(i)) => {
                let _ = write!(out, "{}", i);
                Ok(())
            }
            JsonValue::Number(Number::Float(f)) => {
                write_f64(out, *f);
                Ok(())
            }
            JsonValue::String(s) => {
                write_json_string(out, s);
                Ok(())
            }
            JsonValue::Array(arr) => {
                out.push('[');
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    ctx.write_value(out, v)?;
                }
                out.push(']');
                Ok(())
            }
            JsonValue::Object(obj) => {
                out.push('{');
                for (i, (key, v)) in obj.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_json_string(out, key);
                    out.push(':');
                    ctx.write_value(out, v)?;
                }
                out.push('}');
                Ok(())
            }
        }
    }

    fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
        match r.token() {
            Token::Null => Ok(JsonValue::Null),
            Token::Bool => Ok(JsonValue::Bool(r.bool_val())),
            Token::Num if r.is_double() => {
                Ok(JsonValue::Number(Number::Float(r.double_val())))
            }
            Token::Num => Ok(JsonValue::Number(Number::Integer(r.long_val()))),
            Token::Str => Ok(JsonValue::String(r.take_string())),
            Token::StartArray => {
                let mut arr = Vec::new();
                loop {
                    match r.next()? {
                        Token::EndArray => return Ok(JsonValue::Array(arr)),
                        Token::Eof => return Err(Error::structural("unterminated array")),
                        _ => arr.push(ctx.read_value(r)?),
                    }
                }
            }
            Token::StartObject => {
                let mut obj = JsonMap::new();
                loop {
                    match r.next()? {
                        Token::EndObject => return Ok(JsonValue::Object(obj)),
                        Token::FieldName | Token::Str => {
                            let key = r.take_string();
                            r.next()?;
                            obj.insert(key, ctx.read_value(r)?);
                        }
                        Token::Eof => return Err(Error::structural("unterminated object")),
                        other => {
                            return Err(Error::structural(format!(
                                "expected object key, found {other:?}"
                            )))
                        }
                    }
                }
            }
            other => Err(Error::structural(format!("unexpected token {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_string_escapes() {
        let mut out = String::new();
        write_json_string(&mut out, "a\"b\\c\nd\te\u{0001}");
        assert_eq!(out, "\"a\\\"b\\\\c\\nd\\te\\u0001\"");
    }

    #[test]
    fn test_write_json_string_multibyte() {
        let mut out = String::new();
        write_json_string(&mut out, "héllo 😀");
        assert_eq!(out, "\"héllo 😀\"");
    }

    #[test]
    fn test_write_f64_whole_keeps_point() {
        let mut out = String::new();
        write_f64(&mut out, 1.0);
        assert_eq!(out, "1.0");
    }

    #[test]
    fn test_write_f64_fractional() {
        let mut out = String::new();
        write_f64(&mut out, 42.5);
        assert_eq!(out, "42.5");
    }

    #[test]
    fn test_write_f64_large_whole_uses_exponent() {
        let mut out = String::new();
        write_f64(&mut out, 1e20);
        assert!(out.contains('e'), "{out}");
    }

    #[test]
    fn test_write_f64_non_finite_is_null() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut out = String::new();
            write_f64(&mut out, f);
            assert_eq!(out, "null");
        }
    }

    #[test]
    fn test_type_keys_distinguish_parameterizations() {
        assert_ne!(Vec::<String>::type_key(), Vec::<i64>::type_key());
        assert_eq!(Vec::<String>::type_key().raw(), Vec::<i64>::type_key().raw());
    }

    #[test]
    fn test_collection_group_membership() {
        assert_eq!(Vec::<i64>::type_key().groups(), &["Collection"]);
        assert_eq!(
            IndexMap::<String, i64>::type_key().groups(),
            &["Map"]
        );
    }
}
