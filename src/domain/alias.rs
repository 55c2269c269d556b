//! Alias naming rules

use regex::Regex;

use crate::domain::DomainError;

/// Built-in command names. None of these can be registered as an alias,
/// otherwise `tb <name>` would be shadowed by the command itself.
pub const RESERVED_NAMES: [&str; 13] = [
    "create",
    "list",
    "search",
    "update-path",
    "update-name",
    "remove",
    "run",
    "set",
    "get",
    "use",
    "store",
    "completion",
    "help",
];

/// Check whether `name` collides with a built-in command.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Validate a name before it is written into the resolve table.
///
/// Rejects reserved names, empty names and names the CLI could not reach
/// (leading `-` would be parsed as a flag).
pub fn validate_alias_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: "name is empty".into(),
        });
    }
    if name.starts_with('-') {
        return Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: "name must not start with '-'".into(),
        });
    }
    if is_reserved(name) {
        return Err(DomainError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Filter applied to alias names by `search`.
#[derive(Debug, Clone)]
pub enum AliasQuery {
    /// Empty query: everything matches
    All,
    /// Query compiled as a regular expression
    Pattern(Regex),
    /// Query that is not a valid pattern, matched as plain text
    Substring(String),
}

impl AliasQuery {
    pub fn parse(query: &str) -> Self {
        if query.is_empty() {
            return AliasQuery::All;
        }
        match Regex::new(query) {
            Ok(re) => AliasQuery::Pattern(re),
            Err(_) => AliasQuery::Substring(query.to_string()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            AliasQuery::All => true,
            AliasQuery::Pattern(re) => re.is_match(name),
            AliasQuery::Substring(s) => name.contains(s.as_str()),
        }
    }
}
