//! Type metadata: keys, descriptors, and the process-wide descriptor cache.
//!
//! Instead of runtime reflection, types opt in by implementing [`Describe`]
//! (normally through the [`bindable!`](crate::bindable) macro). `describe()`
//! assembles a [`TypeDescriptor`]: the ordered field table plus constructor
//! and method tables, each entry carrying a pre-built erased invocation
//! handle. Descriptors are built once per type and shared immutably behind
//! `Arc` through a [`MetaCache`].
//!
//! Field ordering follows the declaration rules: embedded (ancestor) fields
//! come first; within each declaration level, fields with an explicit numeric
//! order sort before the rest, ties breaking lexicographically by name. When a
//! level redeclares an ancestor's field name, the newer handle replaces the
//! older one but the field keeps the ancestor's position.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbind::{bindable, MetaCache};
//!
//! bindable! {
//!     #[derive(Default)]
//!     pub struct Point {
//!         pub x: i64,
//!         pub y: i64,
//!     }
//! }
//!
//! let cache = MetaCache::new();
//! let desc = cache.get::<Point>().unwrap();
//! let names: Vec<_> = desc.fields().map(|f| f.name()).collect();
//! assert_eq!(names, vec!["x", "y"]);
//! ```

use crate::bind::BindValue;
use crate::mapper::{ReadCtx, WriteCtx};
use crate::reader::JsonReader;
use crate::{Error, JsonValue, Result};
use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Identifies a type to the converter registry and metadata cache.
///
/// Equality and hashing use only the [`TypeId`], so two keys for the same
/// monomorphized type always compare equal. The raw name (`"Vec"` for
/// `Vec<String>`) and the group list exist for registry fallback lookups.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    raw: &'static str,
    groups: &'static [&'static str],
}

impl TypeKey {
    /// Builds the key for `T` with the given raw type-constructor name and
    /// fallback groups. Groups are consulted in the order given here.
    #[must_use]
    pub fn of<T: 'static>(raw: &'static str, groups: &'static [&'static str]) -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            raw,
            groups,
        }
    }

    // Overrides the full name; only tests need a key whose path differs from
    // the real type path.
    #[cfg(test)]
    pub(crate) fn named<T: 'static>(
        name: &'static str,
        raw: &'static str,
        groups: &'static [&'static str],
    ) -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name,
            raw,
            groups,
        }
    }

    /// The `TypeId` of the fully parameterized type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type path, e.g. `alloc::vec::Vec<alloc::string::String>`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type-constructor name with parameters erased, e.g. `Vec`.
    #[must_use]
    pub fn raw(&self) -> &'static str {
        self.raw
    }

    /// Fallback group names, in declaration order.
    #[must_use]
    pub fn groups(&self) -> &'static [&'static str] {
        self.groups
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A type with a registered descriptor; implemented by the
/// [`bindable!`](crate::bindable) macro.
pub trait Describe: BindValue {
    /// Builds this type's descriptor. Called at most a handful of times per
    /// process; the result is cached.
    fn describe() -> TypeDescriptor;
}

type FieldWriteFn = Box<dyn Fn(&dyn Any, &mut String, &mut WriteCtx<'_>) -> Result<()> + Send + Sync>;
type FieldReadFn =
    Box<dyn Fn(&mut dyn Any, &mut JsonReader<'_>, &mut ReadCtx<'_>) -> Result<()> + Send + Sync>;
type ConstructFn = Box<dyn Fn(&[JsonValue]) -> Result<Box<dyn Any>> + Send + Sync>;
type InvokeFn = Box<dyn Fn(&mut dyn Any, &[JsonValue]) -> Result<JsonValue> + Send + Sync>;

/// One field of a described type: its name, ordering hint, declared type key,
/// and pre-built erased read/write handles.
pub struct FieldDescriptor {
    name: &'static str,
    order: Option<u32>,
    ty: TypeKey,
    write: FieldWriteFn,
    read: FieldReadFn,
}

impl FieldDescriptor {
    /// The field's declared name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The explicit ordering index, if one was declared.
    #[must_use]
    pub fn order(&self) -> Option<u32> {
        self.order
    }

    /// The field's declared type key, parameters included.
    #[must_use]
    pub fn ty(&self) -> &TypeKey {
        &self.ty
    }

    /// Writes this field of `value` through the invocation handle.
    ///
    /// Fails with a binding error when `value` is not the described type.
    pub fn write_into(
        &self,
        value: &dyn Any,
        out: &mut String,
        ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        (self.write)(value, out, ctx)
    }

    /// Reads a value from `r` and stores it into this field of `target`.
    pub fn read_into(
        &self,
        target: &mut dyn Any,
        r: &mut JsonReader<'_>,
        ctx: &mut ReadCtx<'_>,
    ) -> Result<()> {
        (self.read)(target, r, ctx)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("ty", &self.ty.name())
            .finish_non_exhaustive()
    }
}

/// A constructor entry: parameter signature plus an erased invocation handle
/// over dynamic arguments.
pub struct ConstructorDescriptor {
    signature: String,
    construct: ConstructFn,
}

impl ConstructorDescriptor {
    /// The parameter signature, e.g. `"(i64,String)"`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Invokes the constructor, returning the instance type-erased.
    pub fn instance(&self, args: &[JsonValue]) -> Result<Box<dyn Any>> {
        (self.construct)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A method entry: name, signature key, and an erased invocation handle.
pub struct MethodDescriptor {
    name: &'static str,
    signature: String,
    invoke: InvokeFn,
}

impl MethodDescriptor {
    /// The method name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The lookup key, e.g. `"scale(i64)"`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Invokes the method on an erased receiver.
    ///
    /// Fails with a binding error when `receiver` is not the described type.
    pub fn invoke(&self, receiver: &mut dyn Any, args: &[JsonValue]) -> Result<JsonValue> {
        (self.invoke)(receiver, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

fn ctor_signature(params: &[&str]) -> String {
    format!("({})", params.join(","))
}

fn method_signature(name: &str, params: &[&str]) -> String {
    format!("{}({})", name, params.join(","))
}

/// The complete metadata for one type: ordered fields plus constructor and
/// method tables. Immutable once built; at most one instance per type is
/// externally visible through a cache.
pub struct TypeDescriptor {
    key: TypeKey,
    fields: IndexMap<&'static str, FieldDescriptor>,
    constructors: HashMap<String, ConstructorDescriptor>,
    methods: HashMap<String, MethodDescriptor>,
}

impl TypeDescriptor {
    /// The described type's key.
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// All fields, in binding order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Looks up a field by name, or `None`.
    #[must_use]
    pub fn field_opt(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Looks up a field by name, failing with a metadata error when absent.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.field_opt(name).ok_or_else(|| {
            Error::metadata(format!("no field `{name}` on {}", self.key.name()))
        })
    }

    /// Looks up a constructor by parameter signature.
    pub fn constructor(&self, params: &[&str]) -> Result<&ConstructorDescriptor> {
        let sig = ctor_signature(params);
        self.constructors.get(&sig).ok_or_else(|| {
            Error::metadata(format!("no constructor {sig} on {}", self.key.name()))
        })
    }

    /// Looks up a method by name and parameter signature.
    pub fn method(&self, name: &str, params: &[&str]) -> Result<&MethodDescriptor> {
        let sig = method_signature(name, params);
        self.methods.get(&sig).ok_or_else(|| {
            Error::metadata(format!("no method {sig} on {}", self.key.name()))
        })
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key.name())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("constructors", &self.constructors.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Assembles a [`TypeDescriptor`] for `T`. Used inside
/// [`Describe::describe`]; the [`bindable!`](crate::bindable) macro drives it
/// for plain structs, and a handwritten `describe` can add embeds,
/// constructors, and methods.
pub struct DescriptorBuilder<T> {
    key: TypeKey,
    own: Vec<FieldDescriptor>,
    inherited: IndexMap<&'static str, FieldDescriptor>,
    constructors: HashMap<String, ConstructorDescriptor>,
    methods: HashMap<String, MethodDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: BindValue + Default> DescriptorBuilder<T> {
    /// Starts a builder. The zero-argument constructor is derived from
    /// `T::default()`.
    #[must_use]
    pub fn new() -> Self {
        let mut constructors = HashMap::new();
        let nullary: ConstructFn = Box::new(|_args| Ok(Box::new(T::default()) as Box<dyn Any>));
        constructors.insert(
            ctor_signature(&[]),
            ConstructorDescriptor {
                signature: ctor_signature(&[]),
                construct: nullary,
            },
        );
        DescriptorBuilder {
            key: T::type_key(),
            own: Vec::new(),
            inherited: IndexMap::new(),
            constructors,
            methods: HashMap::new(),
            _marker: PhantomData,
        }
    }
}

impl<T: BindValue + Default> Default for DescriptorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BindValue> DescriptorBuilder<T> {
    /// Declares a field with getter and setter accessors.
    #[must_use]
    pub fn field<F: BindValue>(
        self,
        name: &'static str,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        self.field_inner(name, None, get, set)
    }

    /// Declares a field with an explicit ordering index. Ordered fields sort
    /// before unordered ones within their declaration level.
    #[must_use]
    pub fn field_at<F: BindValue>(
        self,
        order: u32,
        name: &'static str,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        self.field_inner(name, Some(order), get, set)
    }

    fn field_inner<F: BindValue>(
        mut self,
        name: &'static str,
        order: Option<u32>,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        let write: FieldWriteFn = Box::new(move |value, out, ctx| {
            let Some(v) = value.downcast_ref::<T>() else {
                return Err(Error::binding(format!(
                    "field `{name}`: receiver is not {}",
                    std::any::type_name::<T>()
                )));
            };
            ctx.write_value(out, get(v))
        });
        let read: FieldReadFn = Box::new(move |target, r, ctx| {
            let Some(t) = target.downcast_mut::<T>() else {
                return Err(Error::binding(format!(
                    "field `{name}`: receiver is not {}",
                    std::any::type_name::<T>()
                )));
            };
            set(t, ctx.read_value(r)?);
            Ok(())
        });
        self.own.push(FieldDescriptor {
            name,
            order,
            ty: F::type_key(),
            write,
            read,
        });
        self
    }

    /// Embeds the fields of a described component, projecting its handles
    /// through the given accessors. Embedded fields precede this level's own
    /// fields; redeclaring a name later replaces the handle in place.
    #[must_use]
    pub fn embed<P: Describe>(mut self, get: fn(&T) -> &P, get_mut: fn(&mut T) -> &mut P) -> Self {
        let parent = P::describe();
        for (name, fd) in parent.fields {
            let FieldDescriptor {
                name: _,
                order,
                ty,
                write,
                read,
            } = fd;
            let write2: FieldWriteFn = Box::new(move |value, out, ctx| {
                let Some(v) = value.downcast_ref::<T>() else {
                    return Err(Error::binding(format!(
                        "field `{name}`: receiver is not {}",
                        std::any::type_name::<T>()
                    )));
                };
                write(get(v) as &dyn Any, out, ctx)
            });
            let read2: FieldReadFn = Box::new(move |target, r, ctx| {
                let Some(t) = target.downcast_mut::<T>() else {
                    return Err(Error::binding(format!(
                        "field `{name}`: receiver is not {}",
                        std::any::type_name::<T>()
                    )));
                };
                read(get_mut(t) as &mut dyn Any, r, ctx)
            });
            self.inherited.insert(
                name,
                FieldDescriptor {
                    name,
                    order,
                    ty,
                    write: write2,
                    read: read2,
                },
            );
        }
        self
    }

    /// Declares an additional constructor under the given parameter
    /// signature.
    #[must_use]
    pub fn ctor(
        mut self,
        params: &[&str],
        f: impl Fn(&[JsonValue]) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        let signature = ctor_signature(params);
        self.constructors.insert(
            signature.clone(),
            ConstructorDescriptor {
                signature,
                construct: Box::new(move |args| Ok(Box::new(f(args)?) as Box<dyn Any>)),
            },
        );
        self
    }

    /// Declares an invokable method under `name(params)`.
    #[must_use]
    pub fn method(
        mut self,
        name: &'static str,
        params: &[&str],
        f: impl Fn(&mut T, &[JsonValue]) -> Result<JsonValue> + Send + Sync + 'static,
    ) -> Self {
        let signature = method_signature(name, params);
        self.methods.insert(
            signature.clone(),
            MethodDescriptor {
                name,
                signature,
                invoke: Box::new(move |receiver, args| {
                    let Some(t) = receiver.downcast_mut::<T>() else {
                        return Err(Error::binding(format!(
                            "method `{name}`: receiver is not {}",
                            std::any::type_name::<T>()
                        )));
                    };
                    f(t, args)
                }),
            },
        );
        self
    }

    /// Finalizes the descriptor. This level's fields sort by explicit order
    /// then name and are appended after embedded fields; a name collision
    /// keeps the embedded position but takes the newer handle.
    #[must_use]
    pub fn finish(mut self) -> TypeDescriptor {
        self.own.sort_by(|a, b| {
            (a.order.unwrap_or(u32::MAX), a.name).cmp(&(b.order.unwrap_or(u32::MAX), b.name))
        });
        let mut fields = self.inherited;
        for fd in self.own {
            fields.insert(fd.name, fd);
        }
        TypeDescriptor {
            key: self.key,
            fields,
            constructors: self.constructors,
            methods: self.methods,
        }
    }
}

fn is_platform_type(name: &str) -> bool {
    name.starts_with("core::") || name.starts_with("alloc::") || name.starts_with("std::")
}

/// A read-mostly cache of type descriptors, keyed by `TypeId`.
///
/// `get` builds on first access with insert-if-absent semantics: concurrent
/// first callers may race to build, but construction is pure and all callers
/// observe the same winning instance. Platform/built-in types are rejected.
///
/// Most code shares the process-wide instance from [`MetaCache::global`];
/// tests that need isolation construct their own.
pub struct MetaCache {
    types: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

impl MetaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        MetaCache {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide shared cache.
    #[must_use]
    pub fn global() -> Arc<MetaCache> {
        static GLOBAL: OnceLock<Arc<MetaCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(MetaCache::new())).clone()
    }

    /// Returns `T`'s descriptor, building and caching it on first access.
    ///
    /// # Errors
    ///
    /// Fails with a metadata error when `T` is a platform/built-in type.
    pub fn get<T: Describe>(&self) -> Result<Arc<TypeDescriptor>> {
        let key = T::type_key();
        if is_platform_type(key.name()) {
            return Err(Error::metadata(format!(
                "refusing to describe platform type {}",
                key.name()
            )));
        }
        {
            let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(desc) = types.get(&key.id()) {
                return Ok(Arc::clone(desc));
            }
        }
        // Built outside the lock; a racing builder's copy is identical and
        // the loser is discarded.
        let built = Arc::new(T::describe());
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(types.entry(key.id()).or_insert(built)))
    }

    /// The number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MetaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaCache").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindable;
    use crate::mapper::{ReadCtx, WriteCtx};

    bindable! {
        #[derive(Default, Debug, PartialEq)]
        pub struct Point {
            pub x: i64,
            pub y: i64,
        }
    }

    #[test]
    fn test_unordered_fields_sort_by_name() {
        let desc = Point::describe();
        let names: Vec<_> = desc.fields().map(|f| f.name()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[derive(Default)]
    struct Ordered {
        alpha: i64,
        zeta: i64,
        first: i64,
    }

    impl BindValue for Ordered {
        fn type_key() -> TypeKey {
            TypeKey::of::<Ordered>("Ordered", &[])
        }
        fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
            ctx.write_struct(out, self)
        }
        fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
            ctx.read_struct(r)
        }
    }

    impl Describe for Ordered {
        fn describe() -> TypeDescriptor {
            DescriptorBuilder::<Ordered>::new()
                .field("zeta", |v: &Ordered| &v.zeta, |v, x| v.zeta = x)
                .field("alpha", |v: &Ordered| &v.alpha, |v, x| v.alpha = x)
                .field_at(0, "first", |v: &Ordered| &v.first, |v, x| v.first = x)
                .finish()
        }
    }

    #[test]
    fn test_explicit_order_before_name_order() {
        let desc = Ordered::describe();
        let names: Vec<_> = desc.fields().map(|f| f.name()).collect();
        assert_eq!(names, vec!["first", "alpha", "zeta"]);
    }

    #[derive(Default)]
    struct Derived {
        base: Point,
        y: i64,
        z: i64,
    }

    impl BindValue for Derived {
        fn type_key() -> TypeKey {
            TypeKey::of::<Derived>("Derived", &[])
        }
        fn write_default(&self, out: &mut String, ctx: &mut WriteCtx<'_>) -> Result<()> {
            ctx.write_struct(out, self)
        }
        fn read_default(r: &mut JsonReader<'_>, ctx: &mut ReadCtx<'_>) -> Result<Self> {
            ctx.read_struct(r)
        }
    }

    impl Describe for Derived {
        fn describe() -> TypeDescriptor {
            DescriptorBuilder::<Derived>::new()
                .embed(|v: &Derived| &v.base, |v| &mut v.base)
                .field("z", |v: &Derived| &v.z, |v, x| v.z = x)
                .field("y", |v: &Derived| &v.y, |v, x| v.y = x)
                .finish()
        }
    }

    #[test]
    fn test_embed_ancestors_first_and_collision_keeps_position() {
        let desc = Derived::describe();
        let names: Vec<_> = desc.fields().map(|f| f.name()).collect();
        // "y" collides with the embedded field and keeps its embedded slot
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_nullary_constructor_from_default() {
        let desc = Point::describe();
        let boxed = desc.constructor(&[]).unwrap().instance(&[]).unwrap();
        let point = boxed.downcast::<Point>().unwrap();
        assert_eq!(*point, Point::default());
    }

    #[test]
    fn test_constructor_not_found() {
        let desc = Point::describe();
        assert!(matches!(
            desc.constructor(&["i64"]),
            Err(Error::Metadata { .. })
        ));
    }

    #[test]
    fn test_field_not_found() {
        let desc = Point::describe();
        assert!(matches!(desc.field("nope"), Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_method_invoke() {
        let desc = DescriptorBuilder::<Point>::new()
            .method("sum", &[], |p, _args| Ok(JsonValue::from(p.x + p.y)))
            .finish();
        let mut point = Point { x: 2, y: 3 };
        let result = desc
            .method("sum", &[])
            .unwrap()
            .invoke(&mut point, &[])
            .unwrap();
        assert_eq!(result.as_i64(), Some(5));
    }

    #[test]
    fn test_method_wrong_receiver_is_binding_error() {
        let desc = DescriptorBuilder::<Point>::new()
            .method("sum", &[], |p, _args| Ok(JsonValue::from(p.x + p.y)))
            .finish();
        let mut not_a_point = 7i64;
        assert!(matches!(
            desc.method("sum", &[]).unwrap().invoke(&mut not_a_point, &[]),
            Err(Error::Binding { .. })
        ));
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let cache = MetaCache::new();
        let a = cache.get::<Point>().unwrap();
        let b = cache.get::<Point>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_identity_under_concurrency() {
        let cache = Arc::new(MetaCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get::<Point>().unwrap())
            })
            .collect();
        let descs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for desc in &descs[1..] {
            assert!(Arc::ptr_eq(&descs[0], desc));
        }
        assert_eq!(cache.len(), 1);
    }

    #[derive(Default)]
    struct FakePlatform;

    impl BindValue for FakePlatform {
        fn type_key() -> TypeKey {
            TypeKey::named::<FakePlatform>("std::fake::FakePlatform", "FakePlatform", &[])
        }
        fn write_default(&self, _out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
            Ok(())
        }
        fn read_default(_r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
            Ok(FakePlatform)
        }
    }

    impl Describe for FakePlatform {
        fn describe() -> TypeDescriptor {
            DescriptorBuilder::<FakePlatform>::new().finish()
        }
    }

    #[test]
    fn test_platform_type_rejected() {
        let cache = MetaCache::new();
        assert!(matches!(
            cache.get::<FakePlatform>(),
            Err(Error::Metadata { .. })
        ));
        assert!(cache.is_empty());
    }
}
