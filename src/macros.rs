/// Builds a [`JsonValue`](crate::JsonValue) from a JSON-like literal.
///
/// ```rust
/// use jsonbind::json;
///
/// let value = json!({
///     "name": "Alice",
///     "tags": ["a", "b"],
///     "active": true,
///     "score": null
/// });
/// assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
#[macro_export]
macro_rules! json {
    // Handle null
    (null) => {
        $crate::JsonValue::Null
    };

    // Handle true
    (true) => {
        $crate::JsonValue::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::JsonValue::Bool(false)
    };

    // Handle empty array
    ([]) => {
        $crate::JsonValue::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::JsonValue::Array(vec![$($crate::json!($elem)),*])
    };

    // Handle empty object
    ({}) => {
        $crate::JsonValue::Object($crate::JsonMap::new())
    };

    // Handle non-empty object
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::JsonMap::new();
        $(
            object.insert($key.to_string(), $crate::json!($value));
        )*
        $crate::JsonValue::Object(object)
    }};

    // Fallback for any expression with a From conversion
    ($s:expr) => {
        $crate::JsonValue::from($s)
    };
}

/// Defines a struct and wires it into the binding engine.
///
/// Expands to the struct definition plus `BindValue` and `Describe` impls:
/// the descriptor declares every field with getter/setter handles (binding
/// order sorts by name; use
/// [`DescriptorBuilder::field_at`](crate::DescriptorBuilder::field_at) in a
/// handwritten `Describe` impl for explicit ordering), and the zero-argument
/// constructor comes from `Default`, which the struct must derive (or
/// implement).
///
/// For embedded components, extra constructors, or invokable methods, write
/// the `Describe` impl by hand with
/// [`DescriptorBuilder`](crate::DescriptorBuilder) instead.
///
/// ```rust
/// use jsonbind::{bindable, to_json};
///
/// bindable! {
///     #[derive(Default, Debug, PartialEq)]
///     pub struct Point {
///         pub x: i64,
///         pub y: i64,
///     }
/// }
///
/// let text = to_json(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
/// ```
#[macro_export]
macro_rules! bindable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field : $fty,
            )*
        }

        impl $crate::BindValue for $name {
            fn type_key() -> $crate::TypeKey {
                $crate::TypeKey::of::<$name>(stringify!($name), &[])
            }

            fn write_default(
                &self,
                out: &mut String,
                ctx: &mut $crate::WriteCtx<'_>,
            ) -> $crate::Result<()> {
                ctx.write_struct(out, self)
            }

            fn read_default(
                r: &mut $crate::JsonReader<'_>,
                ctx: &mut $crate::ReadCtx<'_>,
            ) -> $crate::Result<Self> {
                ctx.read_struct(r)
            }
        }

        impl $crate::Describe for $name {
            fn describe() -> $crate::TypeDescriptor {
                $crate::DescriptorBuilder::<$name>::new()
                    $(
                        .field(
                            stringify!($field),
                            |v: &$name| &v.$field,
                            |v: &mut $name, value: $fty| v.$field = value,
                        )
                    )*
                    .finish()
            }
        }
    };
}

/// Defines a unit-variant enum that binds as its variant name.
///
/// ```rust
/// use jsonbind::{bindable_enum, from_json, to_json};
///
/// bindable_enum! {
///     #[derive(Default, Debug, PartialEq, Clone, Copy)]
///     pub enum Color {
///         #[default]
///         Red,
///         Green,
///         Blue,
///     }
/// }
///
/// assert_eq!(to_json(&Color::Green).unwrap(), "\"Green\"");
/// assert_eq!(from_json::<Color>("\"Blue\"").unwrap(), Color::Blue);
/// ```
#[macro_export]
macro_rules! bindable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $crate::BindValue for $name {
            fn type_key() -> $crate::TypeKey {
                $crate::TypeKey::of::<$name>(stringify!($name), &[])
            }

            fn write_default(
                &self,
                out: &mut String,
                _ctx: &mut $crate::WriteCtx<'_>,
            ) -> $crate::Result<()> {
                let name = match self {
                    $( $name::$variant => stringify!($variant), )*
                };
                $crate::write_json_string(out, name);
                Ok(())
            }

            fn read_default(
                r: &mut $crate::JsonReader<'_>,
                _ctx: &mut $crate::ReadCtx<'_>,
            ) -> $crate::Result<Self> {
                match r.token() {
                    $crate::Token::Str => match r.string() {
                        $( stringify!($variant) => Ok($name::$variant), )*
                        other => Err($crate::Error::binding(format!(
                            "unknown {} variant `{}`",
                            stringify!($name),
                            other
                        ))),
                    },
                    other => Err($crate::Error::binding(format!(
                        "cannot bind {other:?} to {}",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{JsonMap, JsonValue, Number};

    #[test]
    fn test_json_macro_primitives() {
        assert_eq!(json!(null), JsonValue::Null);
        assert_eq!(json!(true), JsonValue::Bool(true));
        assert_eq!(json!(false), JsonValue::Bool(false));
        assert_eq!(json!(42), JsonValue::Number(Number::Integer(42)));
        assert_eq!(json!(3.5), JsonValue::Number(Number::Float(3.5)));
        assert_eq!(json!("hello"), JsonValue::String("hello".to_string()));
    }

    #[test]
    fn test_json_macro_arrays() {
        assert_eq!(json!([]), JsonValue::Array(vec![]));

        let arr = json!([1, 2, 3]);
        match arr {
            JsonValue::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], JsonValue::Number(Number::Integer(1)));
                assert_eq!(vec[1], JsonValue::Number(Number::Integer(2)));
                assert_eq!(vec[2], JsonValue::Number(Number::Integer(3)));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_json_macro_objects() {
        assert_eq!(json!({}), JsonValue::Object(JsonMap::new()));

        let obj = json!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            JsonValue::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(
                    map.get("name"),
                    Some(&JsonValue::String("Alice".to_string()))
                );
                assert_eq!(
                    map.get("age"),
                    Some(&JsonValue::Number(Number::Integer(30)))
                );
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_json_macro_nested() {
        let value = json!({
            "outer": {
                "inner": [1, true, null]
            }
        });
        let inner = value
            .get("outer")
            .and_then(|v| v.get("inner"))
            .and_then(|v| v.as_array())
            .unwrap();
        assert_eq!(inner.len(), 3);
    }

    bindable_enum! {
        #[derive(Default, Debug, PartialEq, Clone, Copy)]
        pub enum Status {
            #[default]
            Active,
            Suspended,
        }
    }

    #[test]
    fn test_bindable_enum_round_trip() {
        let mapper = crate::JsonMapper::default();
        assert_eq!(mapper.to_json(&Status::Suspended).unwrap(), "\"Suspended\"");
        assert_eq!(
            mapper.from_json::<Status>("\"Active\"").unwrap(),
            Status::Active
        );
        assert!(mapper.from_json::<Status>("\"Retired\"").is_err());
    }
}
