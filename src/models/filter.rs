//! Filter input and facet option models.

use serde::{Deserialize, Serialize};

use super::Cost;

/// A categorical dimension badges can be narrowed by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FacetField {
    Cost,
    Level,
    TypeCategory,
}

impl FacetField {
    pub const ALL: [FacetField; 3] = [FacetField::Cost, FacetField::Level, FacetField::TypeCategory];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetField::Cost => "cost",
            FacetField::Level => "level",
            FacetField::TypeCategory => "type_category",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cost" => Some(FacetField::Cost),
            "level" => Some(FacetField::Level),
            "type_category" => Some(FacetField::TypeCategory),
            _ => None,
        }
    }

    /// Label of the placeholder option that leaves the facet unset.
    pub fn placeholder(&self) -> &'static str {
        match self {
            FacetField::Cost => "Select cost",
            FacetField::Level => "Select level",
            FacetField::TypeCategory => "Select type category",
        }
    }
}

/// Search text plus the three facet selections. `None` leaves a facet unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub type_category: Option<String>,
}

impl FilterState {
    /// Set a facet selection. The empty string is the placeholder option and clears it.
    pub fn set_facet(&mut self, field: FacetField, value: &str) {
        let selection = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        match field {
            FacetField::Cost => self.cost = selection,
            FacetField::Level => self.level = selection,
            FacetField::TypeCategory => self.type_category = selection,
        }
    }

    pub fn facet(&self, field: FacetField) -> Option<&str> {
        match field {
            FacetField::Cost => self.cost.as_deref(),
            FacetField::Level => self.level.as_deref(),
            FacetField::TypeCategory => self.type_category.as_deref(),
        }
    }
}

/// Query parameters accepted by the listing routes and the gallery page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub type_category: Option<String>,
}

impl From<FilterQuery> for FilterState {
    fn from(query: FilterQuery) -> Self {
        let mut filter = FilterState {
            search: query.q,
            ..FilterState::default()
        };
        filter.set_facet(FacetField::Cost, query.cost.as_deref().unwrap_or_default());
        filter.set_facet(FacetField::Level, query.level.as_deref().unwrap_or_default());
        filter.set_facet(
            FacetField::TypeCategory,
            query.type_category.as_deref().unwrap_or_default(),
        );
        filter
    }
}

/// Distinct values observed for each facet, in order of first appearance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FacetOptions {
    pub costs: Vec<Cost>,
    pub levels: Vec<String>,
    pub type_categories: Vec<String>,
}

impl FacetOptions {
    /// Option values for a facet in the text form selections use.
    pub fn values(&self, field: FacetField) -> Vec<String> {
        match field {
            FacetField::Cost => self.costs.iter().map(Cost::to_string).collect(),
            FacetField::Level => self.levels.clone(),
            FacetField::TypeCategory => self.type_categories.clone(),
        }
    }
}
