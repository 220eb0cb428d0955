//! Property-based tests for door defaults and document serialization.
//!
//! Uses proptest to generate payloads and documents, checking invariants that must
//! hold for every input rather than a handful of examples.

use doorstore::storage::{parse_document, serialize_document};
use doorstore::{Document, NewDoor};
use proptest::prelude::*;
use serde_json::{Value, json};

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(("[a-z]{1,8}", json_value()), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    /// A create payload without a status always yields a closed door
    #[test]
    fn missing_status_defaults_to_closed(
        name in ".{0,20}",
        description in ".{0,20}",
        null_status in any::<bool>(),
    ) {
        let mut payload = json!({"name": name, "description": description});
        if null_status {
            payload["status"] = Value::Null;
        }

        let door = NewDoor::from_payload(payload).unwrap().into_door("1".to_string());

        prop_assert_eq!(door.status(), Some("closed"));
        prop_assert_eq!(door.name(), Some(name.as_str()));
        prop_assert_eq!(door.description(), Some(description.as_str()));
    }

    /// A client-supplied id never reaches the stored door, whatever its type
    #[test]
    fn client_id_is_ignored(id in json_leaf()) {
        let payload = json!({"id": id, "name": "Front", "description": "Main"});

        let door = NewDoor::from_payload(payload).unwrap().into_door("42".to_string());

        prop_assert_eq!(door.id(), "42");
        prop_assert_eq!(door.get("id"), Some(&json!("42")));
    }

    /// Serializing a reloaded document reproduces the same bytes
    #[test]
    fn serialization_is_byte_stable(document in document()) {
        let first = serialize_document(&document).unwrap();
        let reloaded = parse_document(first.as_bytes()).unwrap();
        let second = serialize_document(&reloaded).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(reloaded, document);
    }
}
