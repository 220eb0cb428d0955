//! The door record and the payloads that create and modify it.
//!
//! A [`Door`] is a stored entry with typed access to `id`, `name`, `description` and
//! `status`. Anything else a client sends is kept and returned as-is.
//! Client payloads are validated into a [`NewDoor`] (create) or a [`DoorPatch`]
//! (update) before they touch the collection. Neither can carry an `id`.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_OPEN: &str = "open";
pub const STATUS_CLOSED: &str = "closed";

/// Status given to a door created without one.
pub const DEFAULT_STATUS: &str = STATUS_CLOSED;

const ID: &str = "id";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const STATUS: &str = "status";

/// A stored door.
///
/// Holds the stored JSON object as it is. Fields a door was stored without stay
/// absent, so serializing a door reproduces its entry in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Door {
    id: String,
    fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Door {
    type Error = ValidationError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match fields.get(ID) {
            Some(id) => id_string(id).ok_or_else(|| ValidationError::invalid_type(ID, "string"))?,
            None => return Err(ValidationError::missing_field(ID)),
        };
        Ok(Self { id, fields })
    }
}

impl From<Door> for Map<String, Value> {
    fn from(door: Door) -> Self {
        door.fields
    }
}

// Hand-edited documents sometimes carry numeric ids; they compare as strings.
fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Id of a stored entry, if it is an object with a string or numeric `id`.
pub fn entry_id(entry: &Value) -> Option<String> {
    entry.get(ID).and_then(id_string)
}

impl Door {
    /// System-assigned identifier, unique within the collection
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.string_field(NAME)
    }

    pub fn description(&self) -> Option<&str> {
        self.string_field(DESCRIPTION)
    }

    /// Client-controlled, conventionally `"open"` or `"closed"`
    pub fn status(&self) -> Option<&str> {
        self.string_field(STATUS)
    }

    /// Any stored field, typed or not.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the door reports itself as open.
    pub fn is_open(&self) -> bool {
        self.status() == Some(STATUS_OPEN)
    }

    /// The stored entry.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Shallow merge of `patch` over this door.
    ///
    /// Fields present in the patch overwrite, absent fields are kept and unknown
    /// fields are added. The id never changes.
    pub fn merged(&self, patch: DoorPatch) -> Door {
        let mut door = self.clone();
        for (field, value) in [
            (NAME, patch.name),
            (DESCRIPTION, patch.description),
            (STATUS, patch.status),
        ] {
            if let Some(value) = value {
                door.fields.insert(field.to_string(), Value::String(value));
            }
        }
        door.fields.extend(patch.extra);
        door
    }

    fn string_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

/// A validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoor {
    pub name: String,
    pub description: String,
    /// `None` when the client sent no status (or `null`)
    pub status: Option<String>,
    pub extra: Map<String, Value>,
}

impl NewDoor {
    /// Validate a client payload for creation.
    ///
    /// `name` and `description` must be strings. `status` may be absent or null, and
    /// an explicit empty string is kept as given. A client `id` is discarded.
    pub fn from_payload(payload: Value) -> Result<Self, ValidationError> {
        let mut fields = into_object(payload)?;
        fields.remove(ID);

        let name = required_string(&mut fields, NAME)?;
        let description = required_string(&mut fields, DESCRIPTION)?;
        let status = optional_string(&mut fields, STATUS)?;

        Ok(Self {
            name,
            description,
            status,
            extra: fields,
        })
    }

    /// Build the stored door under `id`, defaulting a missing status.
    pub fn into_door(self, id: String) -> Door {
        let mut fields = Map::new();
        fields.insert(ID.to_string(), Value::String(id.clone()));
        fields.insert(NAME.to_string(), Value::String(self.name));
        fields.insert(DESCRIPTION.to_string(), Value::String(self.description));
        fields.insert(
            STATUS.to_string(),
            Value::String(self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
        );
        fields.extend(self.extra);
        Door { id, fields }
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoorPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub extra: Map<String, Value>,
}

impl DoorPatch {
    /// Validate a client payload for update, dropping any `id` it carries.
    pub fn from_payload(payload: Value) -> Result<Self, ValidationError> {
        let mut fields = into_object(payload)?;
        fields.remove(ID);

        Ok(Self {
            name: patch_string(&mut fields, NAME)?,
            description: patch_string(&mut fields, DESCRIPTION)?,
            status: patch_string(&mut fields, STATUS)?,
            extra: fields,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.extra.is_empty()
    }
}

fn into_object(payload: Value) -> Result<Map<String, Value>, ValidationError> {
    match payload {
        Value::Object(fields) => Ok(fields),
        _ => Err(ValidationError::NotAnObject),
    }
}

fn required_string(fields: &mut Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match fields.remove(field) {
        Some(Value::String(value)) => Ok(value),
        None | Some(Value::Null) => Err(ValidationError::missing_field(field)),
        Some(_) => Err(ValidationError::invalid_type(field, "string")),
    }
}

fn optional_string(
    fields: &mut Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match fields.remove(field) {
        Some(Value::String(value)) => Ok(Some(value)),
        None | Some(Value::Null) => Ok(None),
        Some(_) => Err(ValidationError::invalid_type(field, "string")),
    }
}

// Unlike create, an update cannot clear a typed field with null.
fn patch_string(
    fields: &mut Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match fields.remove(field) {
        Some(Value::String(value)) => Ok(Some(value)),
        None => Ok(None),
        Some(_) => Err(ValidationError::invalid_type(field, "string")),
    }
}
