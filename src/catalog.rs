//! Table schemas, predicate edges and the dataset that owns them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

const BUNDLED_TABLE_SCHEMAS: &str = include_str!("../data/table_schemas.json");
const BUNDLED_PREDICATES: &str = include_str!("../data/predicates.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid bundled {0} catalog: {1}")]
    Bundled(&'static str, #[source] serde_json::Error),
}

/// One entity type of the vocabulary. `name` is the graph node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub examples: String,
    #[serde(default)]
    pub url: String,
    /// Only populated for schemas synthesized from an uploaded descriptor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
}

/// A field as declared in an uploaded descriptor. Properties other than
/// `name` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Directed, labeled relationship from a foreign-key field to the field it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateEdge {
    pub subject_table: String,
    pub subject_field: String,
    pub predicate: String,
    pub related_table: String,
    pub related_field: String,
}

impl TableSchema {
    /// Schema with every documentation field empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            description: String::new(),
            comments: String::new(),
            examples: String::new(),
            url: String::new(),
            fields: Vec::new(),
        }
    }
}

impl PredicateEdge {
    pub fn new(
        subject_table: impl Into<String>,
        subject_field: impl Into<String>,
        predicate: impl Into<String>,
        related_table: impl Into<String>,
        related_field: impl Into<String>,
    ) -> Self {
        Self {
            subject_table: subject_table.into(),
            subject_field: subject_field.into(),
            predicate: predicate.into(),
            related_table: related_table.into(),
            related_field: related_field.into(),
        }
    }
}

/// The schema catalog and predicate catalog currently in effect.
///
/// A dataset is always replaced as a whole; nothing patches its records in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub schemas: Vec<TableSchema>,
    pub predicates: Vec<PredicateEdge>,
}

impl Dataset {
    pub fn new(schemas: Vec<TableSchema>, predicates: Vec<PredicateEdge>) -> Self {
        Self {
            schemas,
            predicates,
        }
    }

    /// The DwC-DP catalogs compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        let schemas: Vec<TableSchema> = serde_json::from_str(BUNDLED_TABLE_SCHEMAS)
            .map_err(|e| CatalogError::Bundled("table schema", e))?;
        let predicates: Vec<PredicateEdge> = serde_json::from_str(BUNDLED_PREDICATES)
            .map_err(|e| CatalogError::Bundled("predicate", e))?;

        log::debug!(
            "Loaded bundled catalog: {} tables, {} predicates",
            schemas.len(),
            predicates.len()
        );

        Ok(Self::new(schemas, predicates))
    }

    pub fn table_names(&self) -> HashSet<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.iter().any(|s| s.name == name)
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn first_table(&self) -> Option<&str> {
        self.schemas.first().map(|s| s.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Keep only the tables named in `names`, in catalog order, and the
    /// predicates whose subject and related tables both survive.
    pub fn retain_tables(&self, names: &HashSet<&str>) -> Dataset {
        let schemas = self
            .schemas
            .iter()
            .filter(|s| names.contains(s.name.as_str()))
            .cloned()
            .collect();

        let predicates = self
            .predicates
            .iter()
            .filter(|p| {
                names.contains(p.subject_table.as_str()) && names.contains(p.related_table.as_str())
            })
            .cloned()
            .collect();

        Dataset::new(schemas, predicates)
    }

    /// Predicates whose both endpoints name a table of this dataset.
    pub fn renderable_predicates(&self) -> Vec<PredicateEdge> {
        let names = self.table_names();
        self.predicates
            .iter()
            .filter(|p| {
                names.contains(p.subject_table.as_str()) && names.contains(p.related_table.as_str())
            })
            .cloned()
            .collect()
    }
}
