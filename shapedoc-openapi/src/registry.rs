use serde_json::{Map, Value};

/// The document's `components.schemas` pool.
///
/// Definitions are merged by name in discovery order. A later definition
/// under an existing name replaces the earlier one; a warning is logged when
/// the two differ, since that usually means two distinct shapes share a name.
#[derive(Debug, Clone, Default)]
pub struct ComponentsRegistry {
    schemas: Map<String, Value>,
}

impl ComponentsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema definition under the given name.
    pub fn register(&mut self, name: &str, schema: Value) {
        match self.schemas.get_mut(name) {
            Some(existing) => {
                if *existing != schema {
                    tracing::warn!(
                        schema = %name,
                        "conflicting definitions share a component name; keeping the latest"
                    );
                }
                *existing = schema;
            }
            None => {
                self.schemas.insert(name.to_string(), schema);
            }
        }
    }

    /// Register every entry of a definitions mapping.
    pub fn merge(&mut self, definitions: Map<String, Value>) {
        for (name, schema) in definitions {
            self.register(&name, schema);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Consume the registry and return the schemas map for embedding
    /// in the document.
    pub fn into_schemas(self) -> Map<String, Value> {
        self.schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_discovery_order() {
        let mut registry = ComponentsRegistry::new();
        let mut defs = Map::new();
        defs.insert("Owner".into(), json!({"type": "object"}));
        defs.insert("Address".into(), json!({"type": "object"}));
        registry.merge(defs);
        registry.register("Collar", json!({"type": "string"}));
        let names: Vec<String> = registry.into_schemas().keys().cloned().collect();
        assert_eq!(names, vec!["Owner", "Address", "Collar"]);
    }

    #[test]
    fn last_write_wins() {
        let mut registry = ComponentsRegistry::new();
        registry.register("Pet", json!({"type": "object"}));
        registry.register("Pet", json!({"type": "string"}));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Pet"), Some(&json!({"type": "string"})));
    }

    #[test]
    fn identical_redefinition_is_a_no_op() {
        let mut registry = ComponentsRegistry::new();
        registry.register("Pet", json!({"type": "object"}));
        registry.register("Pet", json!({"type": "object"}));
        assert!(registry.contains("Pet"));
        assert!(!registry.is_empty());
    }
}
