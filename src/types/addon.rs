use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const UNNAMED_ADDON: &str = "(unnamed addon)";
const UNNAMED_CATALOG: &str = "(unnamed catalog)";

/// One catalog slot of a manifest (e.g. "Popular movies"), read in place.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    fields: &'a Value,
}

impl<'a> Catalog<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn display_name(&self) -> String {
        self.name()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.fields.get("id").and_then(Value::as_str))
            .unwrap_or(UNNAMED_CATALOG)
            .to_string()
    }
}

/// A single member of the user's addon collection, held as the JSON object the collection
/// API sent.
///
/// Known fields (`manifest.name`, `manifest.catalogs`, `flags.protected`, ...) are read
/// through accessors and only written when the user edits them. Everything else, nulls and
/// unexpected types included, goes back to the server in the order it arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonEntry {
    fields: Map<String, Value>,
}

impl AddonEntry {
    fn manifest(&self) -> Option<&Map<String, Value>> {
        self.fields.get("manifest").and_then(Value::as_object)
    }

    fn manifest_str(&self, key: &str) -> Option<&str> {
        self.manifest()?.get(key)?.as_str()
    }

    pub fn manifest_id(&self) -> Option<&str> {
        self.manifest_str("id")
    }

    /// The manifest name as sent, if it is a string.
    pub fn manifest_name(&self) -> Option<&str> {
        self.manifest_str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.manifest_str("description")
    }

    pub fn logo(&self) -> Option<&str> {
        self.manifest_str("logo")
    }

    pub fn background(&self) -> Option<&str> {
        self.manifest_str("background")
    }

    /// Display name: the manifest name, else its id.
    pub fn name(&self) -> &str {
        self.manifest_name()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.manifest_id())
            .unwrap_or(UNNAMED_ADDON)
    }

    pub fn catalogs(&self) -> Vec<Catalog<'_>> {
        self.manifest()
            .and_then(|m| m.get("catalogs"))
            .and_then(Value::as_array)
            .map(|slots| slots.iter().map(|fields| Catalog { fields }).collect())
            .unwrap_or_default()
    }

    pub fn catalogs_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.fields
            .get_mut("manifest")?
            .get_mut("catalogs")?
            .as_array_mut()
    }

    pub fn is_protected(&self) -> bool {
        self.fields
            .get("flags")
            .and_then(|flags| flags.get("protected"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn transport_url(&self) -> Option<&str> {
        self.fields.get("transportUrl").and_then(Value::as_str)
    }

    /// Writes one manifest field, keeping its position if it already exists.
    pub fn set_manifest_field(&mut self, key: &str, value: String) {
        let manifest = self
            .fields
            .entry("manifest")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(fields) = manifest.as_object_mut() {
            fields.insert(key.to_string(), Value::String(value));
            return;
        }
        let mut fields = Map::new();
        fields.insert(key.to_string(), Value::String(value));
        *manifest = Value::Object(fields);
    }
}

/// Field set accepted by the manifest editor. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub background: Option<String>,
}

impl ManifestEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.logo.is_none()
            && self.background.is_none()
    }

    pub fn apply_to(self, entry: &mut AddonEntry) {
        let fields = [
            ("name", self.name),
            ("description", self.description),
            ("logo", self.logo),
            ("background", self.background),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                entry.set_manifest_field(key, value);
            }
        }
    }
}
