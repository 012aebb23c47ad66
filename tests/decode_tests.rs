use benspan::{
    bencode, decode, decode_prefix, decode_with_options, BenMap, DecodeOptions, Decoder, Error,
    ErrorKind, Integer, Span, Trailing, Value, ValueKind,
};
use num_bigint::BigInt;

/// A single-file torrent with the `info` dictionary in the middle.
const TORRENT: &[u8] = b"d8:announce35:http://tracker.example.com/announce\
4:infod6:lengthi1024e4:name8:file.txt12:piece lengthi16384e6:pieces20:AAAAAAAAAAAAAAAAAAAAe\
7:comment4:teste";

/// Asserts that every node's raw bytes decode back to an equal value.
fn assert_spans_redecode(value: &Value, input: &[u8]) {
    let raw = value.raw(input).expect("span inside input");
    assert_eq!(&decode(raw).expect("raw span decodes"), value);

    match value.kind() {
        ValueKind::List(items) => {
            for item in items {
                assert_spans_redecode(item, input);
            }
        }
        ValueKind::Map(map) => {
            for item in map.values() {
                assert_spans_redecode(item, input);
            }
        }
        ValueKind::Str(_) | ValueKind::Int(_) => {}
    }
}

#[test]
fn test_strings() {
    assert_eq!(decode(b"4:spam").unwrap(), Value::str("spam"));
    assert_eq!(decode(b"0:").unwrap(), Value::str(""));
    assert_eq!(decode(b"3:a:b").unwrap(), Value::str("a:b"));
    assert_eq!(decode(b"2:\x00\xff").unwrap().as_bytes(), Some(&b"\x00\xff"[..]));
    assert_eq!(decode(b"03:abc").unwrap(), Value::str("abc"));
}

#[test]
fn test_integers() {
    assert_eq!(decode(b"i3e").unwrap(), Value::int(3));
    assert_eq!(decode(b"i-3e").unwrap(), Value::int(-3));
    assert_eq!(decode(b"i0e").unwrap(), Value::int(0));
    assert_eq!(decode(b"i9223372036854775807e").unwrap().as_i64(), Some(i64::MAX));
    assert_eq!(decode(b"i-9223372036854775808e").unwrap().as_i64(), Some(i64::MIN));

    let big = decode(b"i9223372036854775808e").unwrap();
    let expected: BigInt = "9223372036854775808".parse().unwrap();
    assert_eq!(big.as_integer(), Some(&Integer::Big(expected)));
    assert_eq!(big.as_i64(), None);
}

#[test]
fn test_non_canonical_integers() {
    for input in [&b"i03e"[..], b"i-0e", b"ie", b"i-e", b"i+3e", b"i3.0e", b"i 3e", b"i00e"] {
        let err = decode(input).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::InvalidInteger,
            "{}",
            String::from_utf8_lossy(input)
        );
        assert_eq!(err.offset(), Some(1));
    }
}

#[test]
fn test_lists() {
    assert_eq!(decode(b"le").unwrap(), Value::list(vec![]));
    assert_eq!(decode(b"l4:spam4:eggse").unwrap(), bencode!(["spam", "eggs"]));
    assert_eq!(
        decode(b"li3ei-3e4:spam4:eggse").unwrap(),
        bencode!([3, -3, "spam", "eggs"])
    );
    assert_eq!(decode(b"llelee").unwrap(), bencode!([[], []]));
}

#[test]
fn test_maps() {
    assert_eq!(decode(b"de").unwrap(), Value::map(BenMap::new()));
    assert_eq!(
        decode(b"d3:cow3:moo4:spam4:eggse").unwrap(),
        bencode!({ "cow": "moo", "spam": "eggs" })
    );
    assert_eq!(
        decode(b"d4:spaml1:a1:be3:numi3ee").unwrap(),
        bencode!({ "num": 3, "spam": ["a", "b"] })
    );
}

#[test]
fn test_map_keeps_input_order() {
    let value = decode(b"d1:zi1e1:ai2e1:mi3ee").unwrap();
    let keys: Vec<&[u8]> = value
        .as_map()
        .unwrap()
        .keys()
        .map(Vec::as_slice)
        .collect();
    assert_eq!(keys, vec![&b"z"[..], b"a", b"m"]);
}

#[test]
fn test_duplicate_key_last_wins() {
    let input = b"d1:ai1e1:bi2e1:ai3ee";
    let value = decode(input).unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(b"a").and_then(Value::as_i64), Some(3));
    assert_eq!(map.get(b"a").unwrap().span(), Span::new(16, 19));
    assert_eq!(map.keys().next().map(Vec::as_slice), Some(&b"a"[..]));
}

#[test]
fn test_spans() {
    let input = b"d3:cow3:moo4:spaml1:a1:bee";
    let value = decode(input).unwrap();
    assert_eq!(value.span(), Span::new(0, input.len()));

    let cow = value.get(b"cow").unwrap();
    assert_eq!(cow.span(), Span::new(6, 11));
    assert_eq!(cow.raw(input), Some(&b"3:moo"[..]));

    let spam = value.get(b"spam").unwrap();
    assert_eq!(spam.raw(input), Some(&b"l1:a1:be"[..]));
    let items = spam.as_list().unwrap();
    assert_eq!(items[0].span(), Span::new(18, 21));
    assert_eq!(items[1].span(), Span::new(21, 24));
}

#[test]
fn test_info_dictionary_raw_bytes() {
    let value = decode(TORRENT).unwrap();
    let info = value.get(b"info").unwrap();
    let raw = info.raw(TORRENT).unwrap();
    assert!(raw.starts_with(b"d6:length"));
    assert!(raw.ends_with(b"AAAAe"));
    assert_eq!(info.get(b"name").and_then(Value::as_str), Some("file.txt"));
    assert_eq!(value.get(b"comment").and_then(Value::as_str), Some("test"));
}

#[test]
fn test_every_span_redecodes() {
    let inputs: [&[u8]; 6] = [
        b"4:spam",
        b"i-42e",
        b"li3ei-3e4:spam4:eggse",
        b"d4:spaml1:a1:be3:numi3ee",
        b"lld1:xle1:yi1eeee",
        TORRENT,
    ];
    for input in inputs {
        assert_spans_redecode(&decode(input).unwrap(), input);
    }
}

#[test]
fn test_rejected_inputs() {
    let cases: [(&[u8], Error); 14] = [
        (b"", Error::unexpected_token(0, None)),
        (b"x", Error::unexpected_token(0, Some(b'x'))),
        (b"l4:spamxe", Error::unexpected_token(7, Some(b'x'))),
        (b"4:spams", Error::trailing_data(6, 1)),
        (b"0gg", Error::missing_delimiter(1, ':')),
        (b"1x:ab", Error::invalid_length(0, b"1x")),
        (b"d1x:ai1ee", Error::invalid_length(1, b"1x")),
        (b"5:ab", Error::truncated(2, 5, 2)),
        (b"i12", Error::missing_delimiter(3, 'e')),
        (b"l", Error::truncated(1, 1, 0)),
        (b"li1e", Error::truncated(4, 1, 0)),
        (b"d3:cow", Error::unexpected_token(6, None)),
        (b"di1ei2ee", Error::invalid_length(1, b"i1ei2ee")),
        (b"d1:a", Error::unexpected_token(4, None)),
    ];
    for (input, expected) in cases {
        assert_eq!(
            decode(input).unwrap_err(),
            expected,
            "{}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_huge_length_is_truncated_not_panic() {
    let err = decode(b"99999999999999999999999999:a").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
}

#[test]
fn test_nesting_limit() {
    let deep = format!("{}{}", "l".repeat(300), "e".repeat(300));
    let err = decode(deep.as_bytes()).unwrap_err();
    assert_eq!(err, Error::nesting_too_deep(256, 256));

    let options = DecodeOptions::new().with_max_depth(400);
    assert!(decode_with_options(deep.as_bytes(), options).is_ok());

    let options = DecodeOptions::new().with_max_depth(0);
    assert!(decode_with_options(b"i1e", options.clone()).is_ok());
    assert_eq!(
        decode_with_options(b"le", options).unwrap_err().kind(),
        ErrorKind::NestingTooDeep
    );
}

#[test]
fn test_trailing_policy() {
    let options = DecodeOptions::new().with_trailing(Trailing::Allow);
    let value = decode_with_options(b"4:spams", options).unwrap();
    assert_eq!(value.as_str(), Some("spam"));
    assert_eq!(value.span(), Span::new(0, 6));

    let (value, consumed) = decode_prefix(b"0:gg").unwrap();
    assert_eq!(value, Value::str(""));
    assert_eq!(consumed, 2);
}

#[test]
fn test_decoder_reads_consecutive_values() {
    let input = b"i1e4:spamle";
    let mut decoder = Decoder::new(input);
    let mut values = Vec::new();
    while !decoder.is_at_end() {
        values.push(decoder.decode_one().unwrap());
    }
    assert_eq!(values, vec![Value::int(1), Value::str("spam"), Value::list(vec![])]);
    assert_eq!(values[1].span(), Span::new(3, 9));
    assert!(decoder.finish().is_ok());
}

#[test]
fn test_equality_ignores_spans() {
    let a = decode(b"li1ee").unwrap();
    let b = decode_prefix(b"li1eeXX").unwrap().0;
    let c = Value::new(ValueKind::List(vec![Value::int(1)]), Span::new(40, 45));
    assert_eq!(a, b);
    assert_eq!(a, c);
}
