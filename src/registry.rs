//! Pluggable bidirectional converters and their registry.
//!
//! A converter owns the entire encoding of the values it claims: when the
//! binding engine selects one, the structural default never runs for that
//! subtree. Converters receive the recursion context so they can delegate
//! nested values back to the engine.
//!
//! Registration is keyed two ways:
//!
//! - **exact**: the `TypeId` of a fully parameterized type (`Vec<String>`,
//!   not every `Vec<T>`), registered with [`ConverterRegistry::register`] or
//!   [`ConverterRegistry::register_ref`];
//! - **raw**: the type-constructor name (`"Vec"`) or a group name
//!   (`"Collection"`, `"Map"`), registered with
//!   [`ConverterRegistry::register_raw`].
//!
//! Lookup tries exact, then raw, then the key's groups in declaration order;
//! the first match wins. After [`ConverterRegistry::freeze`] all further
//! registration fails, which makes lookups safely lock-free in spirit:
//! reads never observe a half-registered converter.

use crate::bind::BindValue;
use crate::mapper::{ReadCtx, WriteCtx};
use crate::meta::TypeKey;
use crate::reader::JsonReader;
use crate::typeref::TypeRef;
use crate::{convert, Error, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A typed bidirectional converter for values of `T`.
///
/// `declared` carries the full key of the slot being converted, which is the
/// declared field type during struct binding; converters registered raw can
/// inspect it to vary behavior per parameterization.
pub trait JsonConverter<T: BindValue>: Send + Sync + 'static {
    /// Decodes a `T`. The reader is positioned on the value's first token.
    fn read(&self, r: &mut JsonReader<'_>, declared: &TypeKey, ctx: &mut ReadCtx<'_>)
        -> Result<T>;

    /// Encodes `value` onto `out`.
    fn write(
        &self,
        out: &mut String,
        value: &T,
        declared: &TypeKey,
        ctx: &mut WriteCtx<'_>,
    ) -> Result<()>;
}

/// The erased form stored in the registry. Raw registrations implement this
/// directly; typed converters are wrapped by [`Erased`].
pub trait DynConverter: Send + Sync + 'static {
    /// Decodes a value, type-erased.
    fn read_dyn(
        &self,
        r: &mut JsonReader<'_>,
        declared: &TypeKey,
        ctx: &mut ReadCtx<'_>,
    ) -> Result<Box<dyn Any>>;

    /// Encodes an erased value.
    ///
    /// Fails with a binding error when `value` is not the converter's type.
    fn write_dyn(
        &self,
        out: &mut String,
        value: &dyn Any,
        declared: &TypeKey,
        ctx: &mut WriteCtx<'_>,
    ) -> Result<()>;
}

/// Adapts a typed [`JsonConverter`] to the erased registry interface.
struct Erased<T, C> {
    inner: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T: BindValue, C: JsonConverter<T>> DynConverter for Erased<T, C> {
    fn read_dyn(
        &self,
        r: &mut JsonReader<'_>,
        declared: &TypeKey,
        ctx: &mut ReadCtx<'_>,
    ) -> Result<Box<dyn Any>> {
        Ok(Box::new(self.inner.read(r, declared, ctx)?))
    }

    fn write_dyn(
        &self,
        out: &mut String,
        value: &dyn Any,
        declared: &TypeKey,
        ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        let Some(typed) = value.downcast_ref::<T>() else {
            return Err(Error::binding(format!(
                "converter for {} received a value of another type",
                std::any::type_name::<T>()
            )));
        };
        self.inner.write(out, typed, declared, ctx)
    }
}

/// A freezable store of converters, consulted before structural defaults.
///
/// # Examples
///
/// ```rust
/// use jsonbind::{ConverterRegistry, TypeRef};
/// use jsonbind::convert::CsvListConverter;
///
/// let registry = ConverterRegistry::new();
/// registry
///     .register_ref(&TypeRef::<Vec<String>>::new(), CsvListConverter)
///     .unwrap();
/// registry.freeze();
/// assert!(registry
///     .register_ref(&TypeRef::<Vec<String>>::new(), CsvListConverter)
///     .is_err());
/// ```
pub struct ConverterRegistry {
    exact: RwLock<HashMap<TypeId, Arc<dyn DynConverter>>>,
    raw: RwLock<HashMap<&'static str, Arc<dyn DynConverter>>>,
    frozen: AtomicBool,
}

impl ConverterRegistry {
    /// Creates an empty, unfrozen registry.
    #[must_use]
    pub fn new() -> Self {
        ConverterRegistry {
            exact: RwLock::new(HashMap::new()),
            raw: RwLock::new(HashMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// Creates a registry pre-loaded with the default converter profile
    /// (dates, big integers, comma-delimited `Vec<String>`).
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = ConverterRegistry::new();
        // a fresh registry cannot be frozen yet
        let _ = convert::install_defaults(&registry);
        registry
    }

    /// Registers an exact converter for `T`, keyed by its `TypeId`.
    ///
    /// # Errors
    ///
    /// Fails with a metadata error once the registry is frozen.
    pub fn register<T: BindValue>(&self, converter: impl JsonConverter<T>) -> Result<()> {
        self.check_open()?;
        let erased: Arc<dyn DynConverter> = Arc::new(Erased {
            inner: converter,
            _marker: PhantomData::<fn() -> T>,
        });
        self.exact
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), erased);
        Ok(())
    }

    /// Registers an exact converter through a [`TypeRef`] witness, for call
    /// sites that want the parameterized type spelled out.
    pub fn register_ref<T: BindValue>(
        &self,
        _type_ref: &TypeRef<T>,
        converter: impl JsonConverter<T>,
    ) -> Result<()> {
        self.register(converter)
    }

    /// Registers an erased converter under a raw type-constructor or group
    /// name.
    ///
    /// # Errors
    ///
    /// Fails with a metadata error once the registry is frozen.
    pub fn register_raw(&self, name: &'static str, converter: impl DynConverter) -> Result<()> {
        self.check_open()?;
        self.raw
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(converter));
        Ok(())
    }

    /// Finds a converter for `key`: exact match, then raw name, then groups
    /// in declaration order. Never mutates.
    #[must_use]
    pub fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn DynConverter>> {
        {
            let exact = self.exact.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(c) = exact.get(&key.id()) {
                return Some(Arc::clone(c));
            }
        }
        let raw = self.raw.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(c) = raw.get(key.raw()) {
            return Some(Arc::clone(c));
        }
        for group in key.groups() {
            if let Some(c) = raw.get(group) {
                return Some(Arc::clone(c));
            }
        }
        None
    }

    /// Marks the registry immutable. Idempotent.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    fn check_open(&self) -> Result<()> {
        if self.is_frozen() {
            Err(Error::metadata("converter registry is frozen"))
        } else {
            Ok(())
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exact = self
            .exact
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let raw = self.raw.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("ConverterRegistry")
            .field("exact", &exact)
            .field("raw", &raw)
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl JsonConverter<String> for Upper {
        fn read(
            &self,
            r: &mut JsonReader<'_>,
            _declared: &TypeKey,
            ctx: &mut ReadCtx<'_>,
        ) -> Result<String> {
            let s: String = ctx.read_value(r)?;
            Ok(s.to_uppercase())
        }

        fn write(
            &self,
            out: &mut String,
            value: &String,
            _declared: &TypeKey,
            _ctx: &mut WriteCtx<'_>,
        ) -> Result<()> {
            crate::bind::write_json_string(out, &value.to_uppercase());
            Ok(())
        }
    }

    #[test]
    fn test_exact_lookup_hits_only_registered_type() {
        let registry = ConverterRegistry::new();
        registry.register::<String>(Upper).unwrap();
        assert!(registry.lookup(&String::type_key()).is_some());
        assert!(registry.lookup(&i64::type_key()).is_none());
    }

    #[test]
    fn test_frozen_registry_rejects_registration() {
        let registry = ConverterRegistry::new();
        registry.freeze();
        assert!(registry.is_frozen());
        assert!(matches!(
            registry.register::<String>(Upper),
            Err(Error::Metadata { .. })
        ));
    }

    #[test]
    fn test_frozen_registry_still_serves_lookups() {
        let registry = ConverterRegistry::new();
        registry.register::<String>(Upper).unwrap();
        registry.freeze();
        assert!(registry.lookup(&String::type_key()).is_some());
    }

    struct NullWriter;

    impl DynConverter for NullWriter {
        fn read_dyn(
            &self,
            _r: &mut JsonReader<'_>,
            _declared: &TypeKey,
            _ctx: &mut ReadCtx<'_>,
        ) -> Result<Box<dyn Any>> {
            Err(Error::binding("write-only converter"))
        }

        fn write_dyn(
            &self,
            out: &mut String,
            _value: &dyn Any,
            _declared: &TypeKey,
            _ctx: &mut WriteCtx<'_>,
        ) -> Result<()> {
            out.push_str("null");
            Ok(())
        }
    }

    #[test]
    fn test_raw_lookup_by_constructor_name() {
        let registry = ConverterRegistry::new();
        registry.register_raw("Vec", NullWriter).unwrap();
        assert!(registry.lookup(&Vec::<i64>::type_key()).is_some());
        assert!(registry.lookup(&Vec::<String>::type_key()).is_some());
        assert!(registry.lookup(&i64::type_key()).is_none());
    }

    #[test]
    fn test_group_fallback_in_declaration_order() {
        let registry = ConverterRegistry::new();
        registry.register_raw("Collection", NullWriter).unwrap();
        // Vec<i64> has raw "Vec" and group "Collection"
        assert!(registry.lookup(&Vec::<i64>::type_key()).is_some());
    }

    #[test]
    fn test_exact_beats_raw() {
        let registry = ConverterRegistry::new();
        registry.register_raw("String", NullWriter).unwrap();
        registry.register::<String>(Upper).unwrap();
        let found = registry.lookup(&String::type_key()).unwrap();
        // the exact converter reads; the raw one cannot
        let mut out = String::new();
        let mapper = crate::JsonMapper::new(crate::JsonConfig::new().with_converters(registry));
        let mut ctx = WriteCtx::new(&mapper);
        found
            .write_dyn(&mut out, &"abc".to_string(), &String::type_key(), &mut ctx)
            .unwrap();
        assert_eq!(out, "\"ABC\"");
    }
}
