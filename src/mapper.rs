//! The binding engine: configuration, recursion contexts, and the mapper
//! facade.
//!
//! [`JsonMapper`] orchestrates the tokenizer, metadata cache, and converter
//! registry. There is no stored parse state machine; state is the reader's
//! position plus the call stack, with [`WriteCtx`] / [`ReadCtx`] carrying the
//! depth counter along.
//!
//! Converter selection per value of declared type `F`: exact converter for
//! `F`, then a raw converter for `F`'s type-constructor name, then `F`'s
//! groups in declaration order, then the structural default.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbind::{bindable, JsonMapper};
//!
//! bindable! {
//!     #[derive(Default, Debug, PartialEq)]
//!     pub struct User {
//!         pub name: String,
//!         pub age: u32,
//!     }
//! }
//!
//! let mapper = JsonMapper::default();
//! let user = User { name: "Alice".to_string(), age: 30 };
//! let text = mapper.to_json(&user).unwrap();
//! assert_eq!(text, r#"{"age":30,"name":"Alice"}"#);
//! let back: User = mapper.from_json(&text).unwrap();
//! assert_eq!(back, user);
//! ```

use crate::bind::{write_json_string, BindValue};
use crate::meta::{Describe, FieldDescriptor, MetaCache, TypeDescriptor};
use crate::reader::{JsonReader, Token};
use crate::registry::ConverterRegistry;
use crate::typeref::TypeRef;
use crate::{Error, JsonValue, Result};
use std::fmt;
use std::sync::Arc;

/// Default recursion depth limit for both read and write paths.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resolves an incoming object key to a field of the target descriptor.
///
/// The default strategy tries the exact name first, then a
/// camelCase→snake_case convention fallback, so `"firstName"` finds a
/// `first_name` field.
pub trait KeyMapper: Send + Sync {
    /// Returns the matching field, or `None` to have the value skipped.
    fn resolve<'d>(&self, key: &str, descriptor: &'d TypeDescriptor)
        -> Option<&'d FieldDescriptor>;
}

/// Exact-name lookup with a camelCase→snake_case fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyMapper;

impl KeyMapper for DefaultKeyMapper {
    fn resolve<'d>(
        &self,
        key: &str,
        descriptor: &'d TypeDescriptor,
    ) -> Option<&'d FieldDescriptor> {
        if let Some(fd) = descriptor.field_opt(key) {
            return Some(fd);
        }
        let snake = to_snake_case(key);
        if snake != key {
            descriptor.field_opt(&snake)
        } else {
            None
        }
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Configuration for a [`JsonMapper`].
///
/// # Examples
///
/// ```rust
/// use jsonbind::{JsonConfig, JsonMapper};
///
/// let config = JsonConfig::new().with_lenient(false).with_max_depth(32);
/// let mapper = JsonMapper::new(config);
/// assert!(mapper.from_json::<Vec<i64>>("[1,2,]").is_err());
/// ```
#[derive(Clone)]
pub struct JsonConfig {
    pub lenient: bool,
    pub max_depth: usize,
    pub converters: Arc<ConverterRegistry>,
    pub key_mapper: Arc<dyn KeyMapper>,
    pub meta: Arc<MetaCache>,
}

impl Default for JsonConfig {
    fn default() -> Self {
        JsonConfig {
            lenient: true,
            max_depth: DEFAULT_MAX_DEPTH,
            converters: Arc::new(ConverterRegistry::with_defaults()),
            key_mapper: Arc::new(DefaultKeyMapper),
            meta: MetaCache::global(),
        }
    }
}

impl JsonConfig {
    /// Creates the default configuration: lenient parsing, depth limit
    /// [`DEFAULT_MAX_DEPTH`], default converter profile, default key mapper,
    /// shared metadata cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables lenient parsing (extraneous/trailing commas).
    #[must_use]
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Sets the recursion depth limit for both reads and writes.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replaces the converter registry.
    #[must_use]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = Arc::new(converters);
        self
    }

    /// Replaces the key resolution strategy.
    #[must_use]
    pub fn with_key_mapper(mut self, key_mapper: impl KeyMapper + 'static) -> Self {
        self.key_mapper = Arc::new(key_mapper);
        self
    }

    /// Replaces the metadata cache, e.g. with an isolated one in tests.
    #[must_use]
    pub fn with_meta_cache(mut self, meta: Arc<MetaCache>) -> Self {
        self.meta = meta;
        self
    }
}

impl fmt::Debug for JsonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonConfig")
            .field("lenient", &self.lenient)
            .field("max_depth", &self.max_depth)
            .field("converters", &self.converters)
            .finish_non_exhaustive()
    }
}

/// The binding engine facade.
#[derive(Debug, Default)]
pub struct JsonMapper {
    config: JsonConfig,
}

impl JsonMapper {
    /// Creates a mapper with the given configuration.
    #[must_use]
    pub fn new(config: JsonConfig) -> Self {
        JsonMapper { config }
    }

    /// The mapper's configuration.
    #[must_use]
    pub fn config(&self) -> &JsonConfig {
        &self.config
    }

    /// Encodes `value` as compact JSON text.
    pub fn to_json<T: BindValue>(&self, value: &T) -> Result<String> {
        let mut out = String::with_capacity(128);
        let mut ctx = WriteCtx::new(self);
        ctx.write_value(&mut out, value)?;
        Ok(out)
    }

    /// Decodes a `T` from JSON text.
    pub fn from_json<T: BindValue>(&self, text: &str) -> Result<T> {
        let mut r = JsonReader::new(text, self.config.lenient);
        r.next()?;
        let mut ctx = ReadCtx::new(self);
        ctx.read_value(&mut r)
    }

    /// Decodes a `T`, with the target type named by a [`TypeRef`] witness.
    pub fn from_json_ref<T: BindValue>(&self, text: &str, _type_ref: &TypeRef<T>) -> Result<T> {
        self.from_json(text)
    }

    /// Decodes into the dynamic value tree.
    pub fn from_json_value(&self, text: &str) -> Result<JsonValue> {
        self.from_json(text)
    }
}

/// Recursion context for the write path.
pub struct WriteCtx<'a> {
    mapper: &'a JsonMapper,
    depth: usize,
}

impl<'a> WriteCtx<'a> {
    pub(crate) fn new(mapper: &'a JsonMapper) -> Self {
        WriteCtx { mapper, depth: 0 }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.mapper.config.max_depth {
            return Err(Error::structural(format!(
                "depth limit {} exceeded while writing",
                self.mapper.config.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Encodes one value of declared type `F`, consulting the converter
    /// registry before falling back to the structural default.
    pub fn write_value<F: BindValue>(&mut self, out: &mut String, value: &F) -> Result<()> {
        self.enter()?;
        let key = F::type_key();
        let result = match self.mapper.config.converters.lookup(&key) {
            Some(converter) => converter.write_dyn(out, value, &key, self),
            None => value.write_default(out, self),
        };
        self.depth -= 1;
        result
    }

    /// Encodes a described struct: `{` fields in descriptor order `}`.
    pub fn write_struct<T: Describe>(&mut self, out: &mut String, value: &T) -> Result<()> {
        let desc = self.mapper.config.meta.get::<T>()?;
        out.push('{');
        for (i, fd) in desc.fields().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_json_string(out, fd.name());
            out.push(':');
            fd.write_into(value, out, self)?;
        }
        out.push('}');
        Ok(())
    }
}

/// Recursion context for the read path.
pub struct ReadCtx<'a> {
    mapper: &'a JsonMapper,
    depth: usize,
}

impl<'a> ReadCtx<'a> {
    pub(crate) fn new(mapper: &'a JsonMapper) -> Self {
        ReadCtx { mapper, depth: 0 }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.mapper.config.max_depth {
            return Err(Error::structural(format!(
                "depth limit {} exceeded while reading",
                self.mapper.config.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Decodes one value of declared type `F`. The reader must be positioned
    /// on the value's first token.
    pub fn read_value<F: BindValue>(&mut self, r: &mut JsonReader<'_>) -> Result<F> {
        self.enter()?;
        let key = F::type_key();
        let result = match self.mapper.config.converters.lookup(&key) {
            Some(converter) => converter.read_dyn(r, &key, self).and_then(|boxed| {
                boxed.downcast::<F>().map(|v| *v).map_err(|_| {
                    Error::binding(format!(
                        "converter for {} produced an unexpected type",
                        key.name()
                    ))
                })
            }),
            None => F::read_default(r, self),
        };
        self.depth -= 1;
        result
    }

    /// Decodes a described struct: instantiate via the zero-argument
    /// constructor, resolve each key through the key mapper, and structurally
    /// skip unmatched keys.
    pub fn read_struct<T: Describe>(&mut self, r: &mut JsonReader<'_>) -> Result<T> {
        let desc = self.mapper.config.meta.get::<T>()?;
        match r.token() {
            Token::StartObject => {}
            Token::Null => {
                return Err(Error::binding(format!(
                    "cannot bind null to {}",
                    desc.key().name()
                )))
            }
            other => {
                return Err(Error::structural(format!(
                    "expected object start for {}, found {other:?}",
                    desc.key().name()
                )))
            }
        }
        let ctor = desc.constructor(&[]).map_err(|_| {
            Error::binding(format!(
                "no zero-argument constructor on {}",
                desc.key().name()
            ))
        })?;
        let mut instance = ctor.instance(&[])?;
        loop {
            match r.next()? {
                Token::EndObject => break,
                Token::FieldName | Token::Str => {
                    let key = r.take_string();
                    r.next()?;
                    match self.mapper.config.key_mapper.resolve(&key, &desc) {
                        Some(fd) => fd.read_into(instance.as_mut(), r, self)?,
                        None => skip_value(r)?,
                    }
                }
                Token::Eof => return Err(Error::structural("unterminated object")),
                other => {
                    return Err(Error::structural(format!(
                        "expected object key, found {other:?}"
                    )))
                }
            }
        }
        instance.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            Error::binding(format!(
                "constructor for {} produced an unexpected type",
                desc.key().name()
            ))
        })
    }
}

/// Structurally skips the value whose first token is current, however deep.
/// Containers leave the reader on their closing token; scalars consume
/// nothing further.
pub fn skip_value(r: &mut JsonReader<'_>) -> Result<()> {
    match r.token() {
        Token::StartObject | Token::StartArray => {
            let mut depth = 1usize;
            while depth > 0 {
                match r.next()? {
                    Token::StartObject | Token::StartArray => depth += 1,
                    Token::EndObject | Token::EndArray => depth -= 1,
                    Token::Eof => {
                        return Err(Error::structural("unterminated container while skipping"))
                    }
                    _ => {}
                }
            }
            Ok(())
        }
        Token::FieldName => {
            r.next()?;
            skip_value(r)
        }
        _ => Ok(()),
    }
}
