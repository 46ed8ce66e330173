//! Content filter pipeline
//!
//! Host-registered transformations that run at named points before a value
//! reaches a template: titles, content, dates and metadata reads. Handlers receive
//! a JSON object describing the value and may modify it in place or return a
//! replacement.

#[cfg(feature = "markdown")]
pub mod markdown;

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Hook callback type
pub type HookCallback = Arc<dyn Fn(&mut Value) -> Option<Value> + Send + Sync>;

/// Hook priority (lower = earlier)
pub const PRIORITY_EARLY: i32 = -100;
pub const PRIORITY_DEFAULT: i32 = 0;
pub const PRIORITY_LATE: i32 = 100;

/// Registered hook handler
struct HookHandler {
    callback: HookCallback,
    priority: i32,
    owner: Option<String>,
}

/// Hook manager holding every registered filter
pub struct HookManager {
    /// Registered hooks (hook_name -> handlers, sorted by priority)
    hooks: RwLock<HashMap<String, Vec<HookHandler>>>,
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks = self.hooks.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<&String> = hooks.keys().collect();
        names.sort();
        f.debug_struct("HookManager").field("hooks", &names).finish()
    }
}

impl HookManager {
    /// Create a new hook manager
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Register a hook handler
    ///
    /// Handlers with equal priority run in registration order.
    pub fn register<F>(&self, name: &str, callback: F, priority: i32, owner: Option<String>)
    where
        F: Fn(&mut Value) -> Option<Value> + Send + Sync + 'static,
    {
        let mut hooks = self.hooks.write().unwrap_or_else(|e| e.into_inner());
        let handlers = hooks.entry(name.to_string()).or_insert_with(Vec::new);

        handlers.push(HookHandler {
            callback: Arc::new(callback),
            priority,
            owner,
        });

        // Stable sort keeps registration order within a priority
        handlers.sort_by_key(|h| h.priority);

        debug!("Registered hook handler for '{}' with priority {}", name, priority);
    }

    /// Unregister all hooks registered by an owner
    pub fn unregister_owner(&self, owner: &str) {
        let mut hooks = self.hooks.write().unwrap_or_else(|e| e.into_inner());
        for handlers in hooks.values_mut() {
            handlers.retain(|h| h.owner.as_deref() != Some(owner));
        }
    }

    /// Trigger a hook and return the modified data
    pub fn trigger(&self, name: &str, mut data: Value) -> Value {
        // Clone the handler list so callbacks may register hooks themselves
        let handlers: Vec<HookCallback> = {
            let hooks = self.hooks.read().unwrap_or_else(|e| e.into_inner());
            match hooks.get(name) {
                Some(handlers) => handlers.iter().map(|h| h.callback.clone()).collect(),
                None => return data,
            }
        };

        for callback in handlers {
            if let Some(result) = callback(&mut data) {
                data = result;
            }
        }

        data
    }

    /// Run a filter over a single string field of `data`
    ///
    /// Returns the filtered field, or `fallback` when a handler removed it or
    /// replaced it with a non-string.
    pub fn filter_string(&self, name: &str, data: Value, field: &str, fallback: &str) -> String {
        let filtered = self.trigger(name, data);
        match filtered.get(field).and_then(|v| v.as_str()) {
            Some(value) => value.to_string(),
            None => {
                debug!("Hook '{}' dropped field '{}', using unfiltered value", name, field);
                fallback.to_string()
            }
        }
    }

    /// Run a filter over an arbitrary JSON field of `data`
    ///
    /// A missing field reads as `Value::Null`.
    pub fn filter_value(&self, name: &str, data: Value, field: &str) -> Value {
        let mut filtered = self.trigger(name, data);
        filtered
            .get_mut(field)
            .map(Value::take)
            .unwrap_or(Value::Null)
    }

    /// Check if a hook has any handlers
    pub fn has_handlers(&self, name: &str) -> bool {
        let hooks = self.hooks.read().unwrap_or_else(|e| e.into_inner());
        hooks.get(name).map_or(false, |h| !h.is_empty())
    }
}

/// Hook points called by the view layer
pub mod hook_names {
    // Post fields - triggered in src/view/post.rs
    pub const THE_TITLE: &str = "the_title";
    pub const THE_CONTENT: &str = "the_content";
    pub const GET_THE_DATE: &str = "get_the_date";
    pub const GET_THE_MODIFIED_DATE: &str = "get_the_modified_date";
    pub const GET_THE_MODIFIED_TIME: &str = "get_the_modified_time";

    // Metadata - triggered in src/view/meta.rs
    pub const POST_GET_META_PRE: &str = "post_get_meta_pre";
    pub const POST_GET_META: &str = "post_get_meta";
    pub const POST_GET_META_FIELD_PRE: &str = "post_get_meta_field_pre";
    pub const POST_GET_META_FIELD: &str = "post_get_meta_field";

    // Comments - triggered in src/view/comment.rs
    pub const COMMENT_TEXT: &str = "comment_text";
}
