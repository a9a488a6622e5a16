//! Round-trip tests for the value codec

use chrono::{DateTime, TimeZone, Utc};
use mapping_core::{FieldCodec, FieldKind, Value};
use proptest::prelude::*;
use uuid::Uuid;

fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970-01-01 .. 2100-01-01, microsecond precision like PostgreSQL
    (0i64..4_102_444_800i64, 0u32..1_000_000u32)
        .prop_map(|(secs, micros)| Utc.timestamp_opt(secs, micros * 1_000).unwrap())
}

fn roundtrip<T: FieldCodec>(value: &T) -> T {
    T::decode(value.encode()).expect("decode of encoded value")
}

proptest! {
    #[test]
    fn prop_text_roundtrip(s in ".*") {
        prop_assert_eq!(roundtrip(&s), s);
    }

    #[test]
    fn prop_i64_roundtrip(n in any::<i64>()) {
        prop_assert_eq!(roundtrip(&n), n);
    }

    #[test]
    fn prop_i32_roundtrip(n in any::<i32>()) {
        prop_assert_eq!(roundtrip(&n), n);
    }

    #[test]
    fn prop_i16_roundtrip(n in any::<i16>()) {
        prop_assert_eq!(roundtrip(&n), n);
    }

    #[test]
    fn prop_bool_roundtrip(b in any::<bool>()) {
        prop_assert_eq!(roundtrip(&b), b);
    }

    #[test]
    fn prop_text_array_roundtrip(items in prop::collection::vec("[a-z_]{0,12}", 0..8)) {
        prop_assert_eq!(roundtrip(&items), items);
    }

    #[test]
    fn prop_uuid_roundtrip(bytes in any::<[u8; 16]>()) {
        let id = Uuid::from_bytes(bytes);
        prop_assert_eq!(roundtrip(&id), id);
    }

    #[test]
    fn prop_timestamp_roundtrip(ts in timestamp_strategy()) {
        prop_assert_eq!(roundtrip(&ts), ts);
    }

    #[test]
    fn prop_integer_decodes_from_decimal_text(n in any::<i64>()) {
        prop_assert_eq!(i64::decode(Value::Text(n.to_string())).unwrap(), n);
    }

    #[test]
    fn prop_array_decode_drops_only_nulls(items in prop::collection::vec(prop::option::of("[a-z]{1,6}"), 0..10)) {
        let expected: Vec<String> = items.iter().flatten().cloned().collect();
        let decoded = Vec::<String>::decode(Value::TextArray(items)).unwrap();
        prop_assert_eq!(decoded, expected);
    }
}

#[test]
fn test_codec_kinds() {
    assert_eq!(<String as FieldCodec>::KIND, FieldKind::Text);
    assert_eq!(<i32 as FieldCodec>::KIND, FieldKind::Integer);
    assert_eq!(<Vec<String> as FieldCodec>::KIND, FieldKind::TextArray);
    assert_eq!(<Option<Uuid> as FieldCodec>::KIND, FieldKind::Pointer);
}
