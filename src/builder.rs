use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::field::ConfigField;
use crate::schema::Schema;

/// The object the wizard is configuring. Holds the same field handles the
/// steps commit into; once the chain is done, `render` reads them back out
/// as a typed JSON document.
#[derive(Debug)]
pub struct TargetBuilder {
    target: String,
    fields: Vec<Rc<RefCell<ConfigField>>>,
}

impl TargetBuilder {
    pub fn new(target: impl Into<String>, fields: Vec<Rc<RefCell<ConfigField>>>) -> Self {
        Self {
            target: target.into(),
            fields,
        }
    }

    pub fn from_schema(schema: &Schema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|spec| {
                Rc::new(RefCell::new(ConfigField::new(
                    spec.name.clone(),
                    spec.description.clone(),
                    spec.kind,
                    spec.default.clone(),
                    spec.suggestions.clone(),
                )))
            })
            .collect();
        Self::new(schema.target.clone(), fields)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn fields(&self) -> &[Rc<RefCell<ConfigField>>] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Final configuration, keyed by field name with typed values.
    pub fn render(&self) -> Value {
        let mut map = Map::new();
        for field in &self.fields {
            let field = field.borrow();
            map.insert(field.name().to_string(), field.render_json());
        }
        Value::Object(map)
    }

    pub fn render_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.render()).unwrap_or_else(|_| "{}".to_string())
    }
}
