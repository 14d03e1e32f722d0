use std::collections::HashMap;

use crate::error::{CompileError, CompileResult};
use crate::semantic::SemanticType;

/// Read-only access to an entity's declared field types.
///
/// Implementations must be deterministic: the same field name always yields
/// the same type for a given entity.
pub trait FieldTypeResolver: Send + Sync {
    /// Declared type of `field`, or `None` if the entity has no such field.
    fn semantic_type(&self, field: &str) -> Option<SemanticType>;

    /// Field used as default sort key.
    fn identity_field(&self) -> &str;

    fn resolve(&self, field: &str) -> CompileResult<SemanticType> {
        self.semantic_type(field)
            .ok_or_else(|| CompileError::unknown_field(field))
    }
}

/// Static `{field: type}` descriptor of one entity.
#[derive(Clone, Debug)]
pub struct EntitySchema {
    name: String,
    identity: String,
    fields: HashMap<String, SemanticType>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: identity.into(),
            fields: HashMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }
}

impl FieldTypeResolver for EntitySchema {
    fn semantic_type(&self, field: &str) -> Option<SemanticType> {
        self.fields.get(field).copied()
    }

    fn identity_field(&self) -> &str {
        &self.identity
    }
}

/// Startup-built `{entity: schema}` map, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, schema: EntitySchema) -> Self {
        self.entities.insert(schema.name.clone(), schema);
        self
    }

    pub fn entity(&self, name: &str) -> CompileResult<&EntitySchema> {
        self.entities
            .get(name)
            .ok_or_else(|| CompileError::UnknownEntity(name.to_string()))
    }

    pub fn resolve(&self, entity: &str, field: &str) -> CompileResult<SemanticType> {
        self.entity(entity)?.resolve(field)
    }
}
