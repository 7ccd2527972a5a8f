//! Template catalog: read-only categories of prebuilt field trees.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::doc::FieldNode;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("template id {0} appears more than once")]
    DuplicateTemplate(String),
    #[error("template {template} claims category {claimed} but is listed under {category}")]
    CategoryMismatch { template: String, claimed: String, category: String },
}

/// A named, prebuilt field tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: String,
    pub fields: Vec<FieldNode>,
}

impl Template {
    /// A fresh copy of the template's fields, with new node ids.
    #[must_use]
    pub fn instantiate(&self) -> Vec<FieldNode> {
        let mut fields = self.fields.clone();
        for node in &mut fields {
            node.regenerate_ids();
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub templates: Vec<Template>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    categories: Vec<TemplateCategory>,
}

impl Catalog {
    /// The catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only if the bundled catalog is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog document: a JSON array of categories.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON, `DuplicateTemplate` when a template
    /// id repeats, and `CategoryMismatch` when a template's `categoryId` does
    /// not name the category it is listed under.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let categories: Vec<TemplateCategory> = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for category in &categories {
            for template in &category.templates {
                if !seen.insert(template.id.as_str()) {
                    return Err(CatalogError::DuplicateTemplate(template.id.clone()));
                }
                if template.category_id != category.id {
                    return Err(CatalogError::CategoryMismatch {
                        template: template.id.clone(),
                        claimed: template.category_id.clone(),
                        category: category.id.clone(),
                    });
                }
            }
        }
        tracing::debug!(categories = categories.len(), templates = seen.len(), "catalog loaded");
        Ok(Self { categories })
    }

    #[must_use]
    pub fn categories(&self) -> &[TemplateCategory] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, id: &str) -> Option<&TemplateCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// All templates, in category order.
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.categories.iter().flat_map(|c| c.templates.iter())
    }

    /// Look up a template by id across all categories.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates().find(|t| t.id == id)
    }
}
