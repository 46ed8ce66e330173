//! Custom fields of a post

use serde_json::{json, Value};
use tracing::debug;

use super::PostView;
use crate::error::ViewResult;
use crate::hooks::hook_names;
use crate::host::Host;
use crate::models::MetaMap;

/// Field read by [`PostView::meta`] when no name is given
const DEFAULT_META_FIELD: &str = "meta";

/// Meta field holding the last editor's user ID
pub(crate) const EDIT_LAST_META_KEY: &str = "_edit_last";

/// Decode one stored value
///
/// Stored JSON objects and arrays come back structured; anything else stays a string.
fn decode_value(raw: String) -> Value {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str(&raw) {
            return value;
        }
    }
    Value::String(raw)
}

/// Collapse the stored values of a field
///
/// No values is `Null`, a single value is unwrapped, several become an array.
fn collapse_values(mut values: Vec<String>) -> Value {
    match values.len() {
        0 => Value::Null,
        1 => decode_value(values.remove(0)),
        _ => Value::Array(values.into_iter().map(decode_value).collect()),
    }
}

/// Encode a value for the store
fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Load every custom field of a post
///
/// `post_get_meta_pre` may supply the whole map as an object in `meta`;
/// `post_get_meta` sees the final map and may replace it.
pub(crate) async fn load_custom(host: &Host, post_id: i64) -> ViewResult<MetaMap> {
    let pre = host.hooks.filter_value(
        hook_names::POST_GET_META_PRE,
        json!({ "meta": Value::Null, "post_id": post_id }),
        "meta",
    );

    let custom: MetaMap = match pre {
        Value::Object(map) => map.into_iter().collect(),
        _ => host
            .meta
            .all(post_id)
            .await?
            .into_iter()
            .map(|(key, values)| (key, collapse_values(values)))
            .collect(),
    };

    let filtered = host.hooks.filter_value(
        hook_names::POST_GET_META,
        json!({ "meta": custom, "post_id": post_id }),
        "meta",
    );

    match filtered {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => {
            debug!("Hook '{}' dropped the meta map of post {}", hook_names::POST_GET_META, post_id);
            Ok(custom)
        }
    }
}

impl PostView {
    /// Read a custom field
    ///
    /// `post_get_meta_field_pre` may answer first. Otherwise the value comes from
    /// the store, except for fields written by [`PostView::update`], which are
    /// served from the view. `post_get_meta_field` filters the result. A field
    /// without values reads as `Null`.
    pub async fn field(&self, name: &str) -> ViewResult<Value> {
        let post_id = self.id();

        let mut value = self.host.hooks.filter_value(
            hook_names::POST_GET_META_FIELD_PRE,
            json!({ "value": Value::Null, "post_id": post_id, "field": name }),
            "value",
        );

        if value.is_null() && self.exists() {
            value = match self.custom.get(name).filter(|_| self.written.contains(name)) {
                Some(written) => written.clone(),
                None => collapse_values(self.host.meta.get(post_id, name).await?),
            };
        }

        Ok(self.host.hooks.filter_value(
            hook_names::POST_GET_META_FIELD,
            json!({ "value": value, "post_id": post_id, "field": name }),
            "value",
        ))
    }

    /// Read a custom field, `"meta"` when no name is given
    pub async fn meta(&self, name: Option<&str>) -> ViewResult<Value> {
        self.field(name.unwrap_or(DEFAULT_META_FIELD)).await
    }

    /// Read a field and keep it on the view
    pub async fn import_field(&mut self, name: &str) -> ViewResult<()> {
        let value = self.field(name).await?;
        self.custom.insert(name.to_string(), value);
        Ok(())
    }

    /// Write a custom field through to the store
    ///
    /// The view keeps the new value so later reads see it without another
    /// store round trip. Does nothing on an unresolved view.
    pub async fn update(&mut self, field: &str, value: impl Into<Value>) -> ViewResult<()> {
        let Some(post_id) = self.record().map(|r| r.id) else {
            return Ok(());
        };
        let value = value.into();

        self.host.meta.set(post_id, field, &encode_value(&value)).await?;
        self.custom.insert(field.to_string(), value);
        self.written.insert(field.to_string());
        Ok(())
    }

    /// Custom fields loaded with the post
    pub fn custom(&self) -> &MetaMap {
        &self.custom
    }
}
