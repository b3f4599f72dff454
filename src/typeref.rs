//! Call-site capture of fully-parameterized generic types.
//!
//! A bare turbofish works for most registrations, but some call sites want a
//! value that *names* a generic type, such as registering a converter for
//! `Vec<String>` without letting it apply to every `Vec<T>`. [`TypeRef`] is a
//! zero-sized witness for exactly one parameterized type.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbind::TypeRef;
//!
//! let list_of_string = TypeRef::<Vec<String>>::new();
//! let list_of_i64 = TypeRef::<Vec<i64>>::new();
//! assert_ne!(list_of_string.key(), list_of_i64.key());
//! assert_eq!(list_of_string.key().raw(), "Vec");
//! ```

use crate::bind::BindValue;
use crate::meta::TypeKey;
use std::fmt;
use std::marker::PhantomData;

/// A zero-sized, immutable reference to a fully-parameterized type.
///
/// `PhantomData<fn() -> T>` keeps the marker covariant without implying
/// ownership of a `T`, so `TypeRef` is `Send + Sync` regardless of `T`.
pub struct TypeRef<T: ?Sized>(PhantomData<fn() -> T>);

impl<T: ?Sized> TypeRef<T> {
    /// Creates the witness. Free at runtime.
    #[must_use]
    pub const fn new() -> Self {
        TypeRef(PhantomData)
    }
}

impl<T: BindValue> TypeRef<T> {
    /// Reifies the full generic type as a registry and lookup key.
    #[must_use]
    pub fn key(&self) -> TypeKey {
        T::type_key()
    }
}

impl<T: ?Sized> Clone for TypeRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for TypeRef<T> {}

impl<T: ?Sized> Default for TypeRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for TypeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef<{}>", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_parameterizations_have_distinct_keys() {
        assert_ne!(
            TypeRef::<Vec<String>>::new().key(),
            TypeRef::<Vec<i64>>::new().key()
        );
    }

    #[test]
    fn test_same_parameterization_same_key() {
        assert_eq!(
            TypeRef::<Vec<String>>::new().key(),
            TypeRef::<Vec<String>>::new().key()
        );
    }

    #[test]
    fn test_raw_name_ignores_parameters() {
        assert_eq!(TypeRef::<Vec<String>>::new().key().raw(), "Vec");
        assert_eq!(TypeRef::<Vec<i64>>::new().key().raw(), "Vec");
    }
}
