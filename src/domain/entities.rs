//! Domain entities: core data structures

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The persisted root object of the resolution store.
///
/// `settings` is optional in the model so that a hand-edited document which
/// dropped the key can be told apart from an empty settings map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Free-form settings (interpreter override, limits, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    /// Alias name -> absolute script path, in insertion order
    pub resolve: IndexMap<String, String>,
    /// Any other top-level keys, carried through saves untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            settings: Some(Map::new()),
            resolve: IndexMap::new(),
            extra: Map::new(),
        }
    }
}

impl StoreDocument {
    /// Look up the path registered for `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.resolve.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve.contains_key(name)
    }

    /// Insert or replace an alias. Replacing keeps the alias at its position.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.resolve.insert(name.into(), path.into());
    }

    /// Remove an alias, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.resolve.shift_remove(name)
    }

    /// Move the value of `old` to `new`, at the position `old` occupied.
    ///
    /// Returns the moved path, or `None` if `old` is not registered.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> Option<String> {
        let (index, _, path) = self.resolve.shift_remove_full(old)?;
        let new = new.into();
        // Drop a stale entry under the new name so the index stays valid
        self.resolve.shift_remove(&new);
        let index = index.min(self.resolve.len());
        self.resolve.shift_insert(index, new, path.clone());
        Some(path)
    }

    /// Setting value by key, if settings are present.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.as_ref().and_then(|s| s.get(key))
    }

    /// The configured interpreter, if the `interpreter` setting is a non-empty string.
    pub fn interpreter(&self) -> Option<&str> {
        self.setting(INTERPRETER_SETTING)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Settings key holding the optional interpreter prefix for `run`.
pub const INTERPRETER_SETTING: &str = "interpreter";

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Normal termination with an exit code
    Code(i32),
    /// Terminated by a signal (Unix)
    Signal(i32),
}

impl ChildExit {
    /// Exit code this tool should terminate with.
    ///
    /// Signals map to `128 + signal`, the shell convention.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChildExit::Code(code) => *code,
            ChildExit::Signal(signal) => crate::exitcode::SIGNAL_BASE + signal,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ChildExit::Code(0))
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildExit::Code(code) => write!(f, "exit code {}", code),
            ChildExit::Signal(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// `null`, `""` and whitespace-only strings count as "no value".
pub fn is_blank_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Expand environment variables and tilde in a path string.
///
/// Handles `~`, `$VAR`, and `${VAR}` syntax. Unknown variables leave the
/// input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(names: &[(&str, &str)]) -> StoreDocument {
        let mut doc = StoreDocument::default();
        for (name, path) in names {
            doc.insert(*name, *path);
        }
        doc
    }

    #[test]
    fn given_default_document_when_serialized_then_has_empty_sections() {
        let json = serde_json::to_string(&StoreDocument::default()).unwrap();
        assert_eq!(json, r#"{"settings":{},"resolve":{}}"#);
    }

    #[test]
    fn given_document_without_settings_when_parsed_then_settings_absent() {
        let doc: StoreDocument = serde_json::from_str(r#"{"resolve":{"a":"/a"}}"#).unwrap();
        assert!(doc.settings.is_none());
        assert_eq!(doc.resolve("a"), Some("/a"));
    }

    #[test]
    fn given_document_without_resolve_when_parsed_then_fails() {
        let result = serde_json::from_str::<StoreDocument>(r#"{"settings":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn given_unknown_top_level_key_when_round_tripping_then_kept() {
        let doc: StoreDocument =
            serde_json::from_str(r#"{"version":2,"settings":{},"resolve":{"a":"/a"}}"#).unwrap();

        assert_eq!(doc.extra.get("version"), Some(&Value::from(2)));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["version"], Value::from(2));
        assert_eq!(json["resolve"]["a"], Value::from("/a"));
    }

    #[test]
    fn given_aliases_when_renaming_middle_then_position_is_kept() {
        let mut doc = doc_with(&[("a", "/a"), ("b", "/b"), ("c", "/c")]);

        let moved = doc.rename("b", "z");

        assert_eq!(moved.as_deref(), Some("/b"));
        let keys: Vec<_> = doc.resolve.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "z", "c"]);
    }

    #[test]
    fn given_unknown_alias_when_renaming_then_returns_none() {
        let mut doc = doc_with(&[("a", "/a")]);
        assert!(doc.rename("missing", "x").is_none());
        assert_eq!(doc.resolve.len(), 1);
    }

    #[test]
    fn given_removal_when_listing_then_order_of_rest_is_stable() {
        let mut doc = doc_with(&[("a", "/a"), ("b", "/b"), ("c", "/c")]);
        doc.remove("a");
        let keys: Vec<_> = doc.resolve.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn given_interpreter_setting_when_blank_then_ignored() {
        let mut doc = StoreDocument::default();
        doc.settings
            .as_mut()
            .unwrap()
            .insert(INTERPRETER_SETTING.into(), Value::from("  "));
        assert_eq!(doc.interpreter(), None);

        doc.settings
            .as_mut()
            .unwrap()
            .insert(INTERPRETER_SETTING.into(), Value::from("node"));
        assert_eq!(doc.interpreter(), Some("node"));
    }

    #[test]
    fn given_values_when_checking_blank_then_only_null_and_empty_strings() {
        use serde_json::json;

        assert!(is_blank_value(&Value::Null));
        assert!(is_blank_value(&json!("")));
        assert!(is_blank_value(&json!("  ")));
        assert!(!is_blank_value(&json!(0)));
        assert!(!is_blank_value(&json!("node")));
        assert!(!is_blank_value(&json!({})));
    }

    #[test]
    fn given_signal_exit_when_mapping_then_uses_shell_convention() {
        assert_eq!(ChildExit::Code(7).exit_code(), 7);
        assert_eq!(ChildExit::Signal(2).exit_code(), 130);
        assert!(!ChildExit::Signal(9).success());
        assert!(ChildExit::Code(0).success());
    }
}
