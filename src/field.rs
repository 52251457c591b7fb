use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Closed vocabulary of field kinds a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    BlockBucket,
    Integer,
    Boolean,
    Text,
}

impl FieldKind {
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::BlockBucket => "BLOCK_BUCKET",
            FieldKind::Integer => "INTEGER",
            FieldKind::Boolean => "BOOLEAN",
            FieldKind::Text => "TEXT",
        }
    }

    /// Whether `raw` is an acceptable value for this kind.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            FieldKind::Integer => raw.trim().parse::<i64>().is_ok(),
            FieldKind::Boolean => {
                raw.trim().eq_ignore_ascii_case("true") || raw.trim().eq_ignore_ascii_case("false")
            }
            FieldKind::BlockBucket => is_valid_pattern(raw),
            FieldKind::Text => true,
        }
    }
}

/// Validates patterns like "stone" or "60%stone,40%cobblestone".
fn is_valid_pattern(raw: &str) -> bool {
    // Each entry: optional 1-100 weight prefix, then a (namespaced) block id
    let entry = Regex::new(r"^(?:(?:[1-9][0-9]?|100)%)?[a-z0-9_]+(?::[a-z0-9_]+)?$").unwrap();

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.split(',').all(|part| entry.is_match(part.trim()))
}

/// One named, typed configuration value with a default, a validation rule
/// and a list of suggested inputs. Shared between the step that commits
/// into it and the build target that reads it back out.
#[derive(Debug, Clone)]
pub struct ConfigField {
    name: String,
    description: String,
    kind: FieldKind,
    default: Option<String>,
    value: Option<String>,
    suggestions: Vec<String>,
}

impl ConfigField {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: FieldKind,
        default: Option<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            default,
            value: None,
            suggestions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_valid(&self, raw: &str) -> bool {
        self.kind.accepts(raw)
    }

    /// Commits a raw value. Booleans are normalized to lowercase, integers
    /// are trimmed so the stored text parses back cleanly.
    pub fn set_value(&mut self, raw: &str) {
        let stored = match self.kind {
            FieldKind::Boolean => raw.trim().to_ascii_lowercase(),
            FieldKind::Integer => raw.trim().to_string(),
            _ => raw.to_string(),
        };
        self.value = Some(stored);
    }

    /// The committed value, if any input has been accepted.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn default_text(&self) -> Option<String> {
        self.default.clone()
    }

    /// Committed value, falling back to the default.
    pub fn effective_value(&self) -> Option<String> {
        self.value.clone().or_else(|| self.default.clone())
    }

    /// Renders the effective value as typed JSON for the build target.
    pub fn render_json(&self) -> Value {
        let Some(text) = self.effective_value() else {
            return Value::Null;
        };
        match self.kind {
            FieldKind::Integer => text
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(text)),
            FieldKind::Boolean => match text.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(text),
            },
            _ => Value::String(text),
        }
    }
}
