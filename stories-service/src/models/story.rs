//! Stories are schemaless: whatever the pipeline wrote is what we return.

use bson::{Bson, Document};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub const STORIES_COLLECTION: &str = "stories";

/// A raw document from the `stories` collection.
///
/// Serializes to plain JSON: ObjectIds as hex strings, datetimes as
/// RFC 3339, everything else as relaxed extended JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Story(Document);

impl Story {
    pub fn to_json(&self) -> Value {
        document_to_json(&self.0)
    }
}

impl From<Document> for Story {
    fn from(doc: Document) -> Self {
        Story(doc)
    }
}

impl Serialize for Story {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn document_to_json(doc: &Document) -> Value {
    Value::Object(
        doc.iter()
            .map(|(key, value)| (key.clone(), bson_to_json(value)))
            .collect::<Map<String, Value>>(),
    )
}

fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            // Outside the RFC 3339 range; fall back to canonical form
            Err(_) => value.clone().into_relaxed_extjson(),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        other => other.clone().into_relaxed_extjson(),
    }
}
