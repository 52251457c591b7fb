use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::field::FieldKind;

#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    pub target: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Schema {
    pub fn load(name: &str) -> Result<Schema, SchemaError> {
        // Try loading from each location in order
        let paths = schema_paths(name);

        for path in &paths {
            if path.exists() {
                let content = fs::read_to_string(path)
                    .map_err(|e| SchemaError::ReadError(path.clone(), e.to_string()))?;
                let schema: Schema = serde_json::from_str(&content)
                    .map_err(|e| SchemaError::ParseError(path.clone(), e.to_string()))?;
                schema
                    .validate()
                    .map_err(|e| SchemaError::ParseError(path.clone(), e))?;
                return Ok(schema);
            }
        }

        Err(SchemaError::NotFound(name.to_string(), paths))
    }

    /// Structural checks serde cannot express: unique field names and
    /// defaults that the declared kind actually accepts.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(format!("duplicate field name '{}'", spec.name));
            }
            if let Some(default) = &spec.default {
                if !spec.kind.accepts(default) {
                    return Err(format!(
                        "default '{}' is not a valid {} for field '{}'",
                        default,
                        spec.kind.tag(),
                        spec.name
                    ));
                }
            }
        }
        Ok(())
    }
}

fn schema_paths(name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Project-local: ./.cfgwiz/<name>.json
    paths.push(PathBuf::from(format!(".cfgwiz/{}.json", name)));

    // 2. User config: ~/.config/cfgwiz/<name>.json
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cfgwiz").join(format!("{}.json", name)));
    }

    // 3. Alongside the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("cfgwiz").join(format!("{}.json", name)));
        }
    }

    paths
}

#[derive(Debug)]
pub enum SchemaError {
    NotFound(String, Vec<PathBuf>),
    ReadError(PathBuf, String),
    ParseError(PathBuf, String),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::NotFound(name, paths) => {
                writeln!(f, "No schema found for '{}'", name)?;
                writeln!(f)?;
                writeln!(f, "Create a schema file at one of:")?;
                for path in paths {
                    writeln!(f, "  {}", path.display())?;
                }
                writeln!(f)?;
                write!(f, "See README.md for the schema format")
            }
            SchemaError::ReadError(path, err) => {
                write!(f, "Failed to read {}: {}", path.display(), err)
            }
            SchemaError::ParseError(path, err) => {
                write!(f, "Failed to parse {}: {}", path.display(), err)
            }
        }
    }
}
