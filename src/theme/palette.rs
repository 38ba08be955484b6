//! `settings.color.palette` access and theme.json formatting.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::settings::colors::{ColorsOptions, Slot};

/// One palette record of theme.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub slug: String,
    pub color: String,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            color: color.into(),
        }
    }
}

/// The palette array, when present and non-empty.
pub fn palette(doc: &Value) -> Option<&Vec<Value>> {
    doc.pointer("/settings/color/palette")?
        .as_array()
        .filter(|items| !items.is_empty())
}

pub fn palette_mut(doc: &mut Value) -> Option<&mut Vec<Value>> {
    doc.pointer_mut("/settings/color/palette")?
        .as_array_mut()
        .filter(|items| !items.is_empty())
}

/// Records with a string `slug`; missing `name`/`color` read as `""`.
pub fn entries(items: &[Value]) -> Vec<PaletteEntry> {
    let text = |item: &Value, key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    items
        .iter()
        .filter(|item| item.get("slug").is_some_and(Value::is_string))
        .map(|item| PaletteEntry {
            name: text(item, "name"),
            slug: text(item, "slug"),
            color: text(item, "color"),
        })
        .collect()
}

/// Overwrite `color` of every record with a known slug.
///
/// Other records and every other field are left as they are. Returns the
/// number of records written.
pub fn apply(items: &mut [Value], colors: &ColorsOptions) -> usize {
    let mut updated = 0;
    for item in items.iter_mut() {
        let Some(record) = item.as_object_mut() else {
            continue;
        };
        let Some(slot) = record
            .get("slug")
            .and_then(Value::as_str)
            .and_then(Slot::from_slug)
        else {
            continue;
        };
        record.insert("color".to_string(), Value::String(colors.get(slot).to_string()));
        updated += 1;
    }
    updated
}

/// Serialize with 4-space indentation, no trailing newline.
///
/// Slashes and non-ASCII characters are written as is.
pub fn to_theme_json(doc: &Value) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4096);
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_palette_shape() {
        assert!(palette(&json!({})).is_none());
        assert!(palette(&json!({"settings": {"color": {"palette": []}}})).is_none());
        assert!(palette(&json!({"settings": {"color": {"palette": {}}}})).is_none());
        assert_eq!(
            palette(&json!({"settings": {"color": {"palette": [{"slug": "text"}]}}})).map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn test_entries_skip_records_without_slug() {
        let items = vec![
            json!({"slug": "text", "color": "#000"}),
            json!({"name": "No slug"}),
            json!("scalar"),
        ];
        assert_eq!(entries(&items), vec![PaletteEntry::new("", "text", "#000")]);
    }

    #[test]
    fn test_apply_known_slugs_only() {
        let mut items = vec![
            json!({"slug": "background", "color": "#fff", "name": "Bg"}),
            json!({"slug": "custom-extra", "color": "#111"}),
            json!({"slug": "links"}),
        ];
        let updated = apply(&mut items, &ColorsOptions::default());
        assert_eq!(updated, 2);
        assert_eq!(items[0], json!({"slug": "background", "color": "#b22222", "name": "Bg"}));
        assert_eq!(items[1], json!({"slug": "custom-extra", "color": "#111"}));
        assert_eq!(items[2]["color"], "#1e73be");
    }

    #[test]
    fn test_theme_json_format() {
        let doc = json!({"b": {"url": "https://x.test/a/b", "name": "Фон"}, "a": []});
        let text = String::from_utf8(to_theme_json(&doc).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n    \"b\": {\n        \"url\": \"https://x.test/a/b\",\n        \"name\": \"Фон\"\n    },\n    \"a\": []\n}"
        );
    }
}
