use notemark_babel::metadata::{decode, embed_marker, encode, extract_marker, Decoded};
use proptest::prelude::*;
use serde_json::{json, Value};

#[test]
fn marker_round_trip_through_html() {
    let html = embed_marker("<div></div>", &encode(&json!({"a": "one"})));
    assert_eq!(html, "<div></div><!----SBAdata:eyJhIjoib25lIn0=---->");
    assert_eq!(decode(extract_marker(&html)), Decoded::Data(json!({"a": "one"})));
}

#[test]
fn truncated_marker_reads_as_no_metadata() {
    let html = "<div></div><!----SBAdata:eyJhIjoib25lIn0=";
    assert_eq!(extract_marker(html), "");
    assert_eq!(decode(extract_marker(html)), Decoded::Empty);
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".*".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(payload in json_value()) {
        prop_assert_eq!(decode(&encode(&payload)), Decoded::Data(payload.clone()));
    }

    #[test]
    fn encode_is_deterministic(payload in json_value()) {
        prop_assert_eq!(encode(&payload), encode(&payload.clone()));
    }

    #[test]
    fn embedded_payload_survives_any_body(body in "[^<>]{0,40}", payload in json_value()) {
        let html = embed_marker(&format!("<div>{body}</div>"), &encode(&payload));
        prop_assert_eq!(decode(extract_marker(&html)), Decoded::Data(payload));
    }
}
