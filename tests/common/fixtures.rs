//! Door payloads and documents shared across tests.

use serde_json::{Value, json};

pub fn front_door() -> Value {
    json!({"name": "Front", "description": "Main entrance"})
}

pub fn back_door() -> Value {
    json!({"name": "Back", "description": "Garden", "status": "open"})
}

/// A document as it might have been edited by hand: numeric ids, extra fields and an
/// unrelated collection.
pub fn legacy_document() -> &'static str {
    r#"{
  "doors": [
    {"id": 1, "name": "Front", "description": "Main entrance", "status": "closed"},
    {"id": "2", "name": "Back", "description": "Garden", "status": "open", "floor": 0}
  ],
  "windows": {"count": 4}
}"#
}
