//! Property-based tests for binding round trips across generated inputs.

use proptest::prelude::*;

use jsonbind::{from_json, to_json, BindValue};

fn roundtrip<T: BindValue + PartialEq + std::fmt::Debug>(value: &T) -> bool {
    match to_json(value) {
        Ok(encoded) => match from_json::<T>(&encoded) {
            Ok(decoded) => *value == decoded,
            Err(e) => {
                eprintln!("decode failed: {}", e);
                eprintln!("encoded was: {}", encoded);
                false
            }
        },
        Err(e) => {
            eprintln!("encode failed: {}", e);
            false
        }
    }
}

proptest! {
    // Primitive types
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    // Strings exercise the full escape path both ways
    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    // Collections
    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_nested_vec(v in prop::collection::vec(prop::collection::vec(any::<i32>(), 0..5), 0..5)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_string_map(m in prop::collection::hash_map(any::<String>(), any::<i64>(), 0..8)) {
        prop_assert!(roundtrip(&m));
    }

    // Float classification: a whole float must come back floating
    #[test]
    fn prop_whole_float_stays_float(n in -1_000_000i64..1_000_000) {
        let f = n as f64;
        let encoded = to_json(&f).unwrap();
        prop_assert!(encoded.contains('.') || encoded.contains('e'), "{}", encoded);
        prop_assert_eq!(from_json::<f64>(&encoded).unwrap(), f);
    }
}
