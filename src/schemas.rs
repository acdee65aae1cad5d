//! Request bodies accepted by the meme endpoints.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Metadata for a new meme.
///
/// Multipart clients usually send the metadata as a JSON-encoded string
/// inside the `meme` form field, so both `{"title": ...}` and
/// `"{\"title\": ...}"` deserialize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct MemeIn {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct MemeInFields {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<Value> for MemeIn {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let object = match value {
            Value::String(raw) => {
                serde_json::from_str::<Value>(&raw).map_err(|e| format!("meme metadata is not valid JSON: {}", e))?
            }
            other => other,
        };
        if !object.is_object() {
            return Err("meme metadata must be a JSON object".to_string());
        }
        let fields = serde_json::from_value::<MemeInFields>(object).map_err(|e| e.to_string())?;
        Ok(MemeIn {
            title: fields.title,
            description: fields.description,
        })
    }
}

/// Partial update for an existing meme.
///
/// `title: null` means "leave unchanged". `description` is tri-state:
/// absent leaves it unchanged, `null` clears it, a string replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemeUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl MemeUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

// Only called when the key is present, so a JSON null becomes Some(None).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
