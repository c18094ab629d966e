//! Enablement state for the page's table links and category checkboxes.
//!
//! Both signals are functions of the current table names only, so syncing
//! twice against the same dataset gives the same state.

use crate::catalog::Dataset;
use serde::Serialize;
use std::fmt;

/// Coarse table grouping, decided by the category word appearing in a table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Agent,
    Assertion,
    Identifier,
    Media,
    Protocol,
    Reference,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Agent,
        Self::Assertion,
        Self::Identifier,
        Self::Media,
        Self::Protocol,
        Self::Reference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Assertion => "assertion",
            Self::Identifier => "identifier",
            Self::Media => "media",
            Self::Protocol => "protocol",
            Self::Reference => "reference",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Case-insensitive substring test on the table name.
    pub fn matches(self, table: &str) -> bool {
        table.to_lowercase().contains(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkState {
    pub table: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryState {
    pub category: Category,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub links: Vec<LinkState>,
    pub categories: Vec<CategoryState>,
}

impl UiState {
    pub fn enabled_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.enabled)
            .map(|c| c.category)
            .collect()
    }

    pub fn link_enabled(&self, table: &str) -> Option<bool> {
        self.links.iter().find(|l| l.table == table).map(|l| l.enabled)
    }
}

/// `link_targets` are the table names the page links to, in page order.
pub fn sync<S: AsRef<str>>(dataset: &Dataset, link_targets: &[S]) -> UiState {
    let names = dataset.table_names();

    let links = link_targets
        .iter()
        .map(|target| LinkState {
            table: target.as_ref().to_string(),
            enabled: names.contains(target.as_ref()),
        })
        .collect();

    let categories = Category::ALL
        .into_iter()
        .map(|category| CategoryState {
            category,
            enabled: names.iter().any(|name| category.matches(name)),
        })
        .collect();

    UiState { links, categories }
}
