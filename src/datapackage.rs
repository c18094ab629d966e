//! Import of an uploaded `datapackage.json` descriptor.
//!
//! Two import modes exist. [`ImportMode::Filter`] narrows the bundled catalogs
//! down to the resources the package declares, keeping their curated
//! documentation and predicate labels. [`ImportMode::Resynthesize`] rebuilds the
//! catalogs from the package's own table schemas and foreign keys.

use crate::catalog::{Dataset, FieldDescriptor, PredicateEdge, TableSchema};
use crate::graph::focal_table;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Could not parse datapackage.json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid datapackage.json: missing 'resources'")]
    MissingResources,
    #[error("Invalid datapackage.json: resource {index} is malformed: {source}")]
    InvalidResource {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ImportError {
    /// Well-formed JSON that does not have the shape of a data package.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Keep bundled tables and predicates named by the package
    #[default]
    Filter,
    /// Build tables and predicates from the package's own schemas
    Resynthesize,
}

impl ImportMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "filter" => Some(Self::Filter),
            "resynthesize" | "resynth" => Some(Self::Resynthesize),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Resynthesize => "resynthesize",
        }
    }
}

/// Parsed descriptor. Only the parts the explorer reads are modelled.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    pub name: Option<String>,
    pub resources: Vec<Resource>,
}

// Members below read null or a value of the wrong shape as absent. A
// resource entry only fails when it is not an object.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    /// Absent when the descriptor points at an external schema by path or URL.
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<ResourceSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSchema {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, rename = "foreignKeys", deserialize_with = "lenient")]
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForeignKey {
    #[serde(default, deserialize_with = "lenient")]
    pub fields: FieldNames,
    #[serde(default, deserialize_with = "lenient")]
    pub reference: Option<Reference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
    /// Empty means the owning resource itself.
    #[serde(default, deserialize_with = "lenient")]
    pub resource: String,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: FieldNames,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("Ignoring descriptor member of unexpected shape: {}", e);
        T::default()
    }))
}

/// A single field name or a composite key's list of names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldNames {
    One(String),
    Many(Vec<String>),
}

impl Default for FieldNames {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl FieldNames {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

/// Field pair of a foreign key, local side first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair<'a> {
    pub field: &'a str,
    pub related_table: &'a str,
    pub related_field: &'a str,
}

impl ForeignKey {
    /// Local and referenced fields paired by position.
    pub fn pairs<'a>(&'a self, owner: &'a str) -> Vec<KeyPair<'a>> {
        let Some(reference) = &self.reference else {
            log::warn!("Foreign key on '{}' has no reference, skipped", owner);
            return Vec::new();
        };

        let related_table = if reference.resource.is_empty() {
            owner
        } else {
            reference.resource.as_str()
        };

        let local = self.fields.as_slice();
        let remote = reference.fields.as_slice();
        if local.len() != remote.len() {
            log::warn!(
                "Foreign key on '{}' pairs {} fields with {} referenced fields",
                owner,
                local.len(),
                remote.len()
            );
        }

        local
            .iter()
            .zip(remote)
            .map(|(field, related_field)| KeyPair {
                field: field.as_str(),
                related_table,
                related_field: related_field.as_str(),
            })
            .collect()
    }
}

impl Resource {
    fn schema(&self) -> ResourceSchema {
        self.schema.clone().unwrap_or_default()
    }

    /// Table schema built from the resource's own metadata.
    pub fn table_schema(&self) -> TableSchema {
        let schema = self.schema();
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());

        TableSchema {
            name: self.name.clone(),
            title: non_empty(schema.title).unwrap_or_else(|| self.name.clone()),
            description: schema.description.unwrap_or_default(),
            comments: String::new(),
            examples: String::new(),
            url: schema.url.unwrap_or_default(),
            fields: schema.fields,
        }
    }

    /// One predicate per foreign-key field pair, labeled `field → refField`.
    pub fn predicates(&self) -> Vec<PredicateEdge> {
        let Some(schema) = &self.schema else {
            return Vec::new();
        };

        schema
            .foreign_keys
            .iter()
            .flat_map(|fk| fk.pairs(&self.name))
            .map(|pair| {
                PredicateEdge::new(
                    self.name.as_str(),
                    pair.field,
                    format!("{} → {}", pair.field, pair.related_field),
                    pair.related_table,
                    pair.related_field,
                )
            })
            .collect()
    }

    /// Position of a field in the resource schema's declared field list.
    pub fn field_position(&self, field: &str) -> Option<usize> {
        self.schema
            .as_ref()
            .and_then(|s| s.fields.iter().position(|f| f.name == field))
    }
}

impl Descriptor {
    pub fn parse(raw: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(raw)?;

        let entries = value
            .get("resources")
            .and_then(Value::as_array)
            .ok_or(ImportError::MissingResources)?;

        let mut resources: Vec<Resource> = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let resource = Resource::deserialize(entry)
                .map_err(|source| ImportError::InvalidResource { index, source })?;
            if resource.name.is_empty() {
                log::warn!("Resource {} has no name, skipped", index);
                continue;
            }
            if resources.iter().any(|r| r.name == resource.name) {
                log::warn!("Resource {} repeats name '{}', skipped", index, resource.name);
                continue;
            }
            resources.push(resource);
        }

        let name = value.get("name").and_then(Value::as_str).map(str::to_string);

        Ok(Self { name, resources })
    }

    pub fn resource_names(&self) -> HashSet<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub dataset: Dataset,
    pub focal_table: String,
}

pub fn import_datapackage(
    raw: &str,
    mode: ImportMode,
    bundled: &Dataset,
) -> Result<Import, ImportError> {
    let descriptor = Descriptor::parse(raw)?;

    let dataset = match mode {
        ImportMode::Filter => filter(&descriptor, bundled),
        ImportMode::Resynthesize => resynthesize(&descriptor),
    };
    let focal_table = focal_table(&dataset.schemas);

    log::debug!(
        "Imported {} ({}): {} tables, {} predicates, focal '{}'",
        descriptor.name.as_deref().unwrap_or("datapackage"),
        mode.as_str(),
        dataset.schemas.len(),
        dataset.predicates.len(),
        focal_table
    );

    Ok(Import {
        dataset,
        focal_table,
    })
}

fn filter(descriptor: &Descriptor, bundled: &Dataset) -> Dataset {
    let names = descriptor.resource_names();

    let known = bundled.table_names();
    let mut unknown: Vec<&str> = names.difference(&known).copied().collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        log::debug!("Resources without bundled documentation dropped: {}", unknown.join(", "));
    }

    bundled.retain_tables(&names)
}

fn resynthesize(descriptor: &Descriptor) -> Dataset {
    let schemas = descriptor
        .resources
        .iter()
        .map(Resource::table_schema)
        .collect();
    let predicates = descriptor
        .resources
        .iter()
        .flat_map(Resource::predicates)
        .collect();

    Dataset::new(schemas, predicates)
}
