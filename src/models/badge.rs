//! Badge model matching the records published by the badge source.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Price of a badge as published by the source.
///
/// Facet values and filter selections compare costs by their text form, so
/// `Display` prints integral values without a fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost(pub f64);

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Cost)
    }
}

/// Badge artwork reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeImage {
    pub id: String,
    pub url: String,
}

/// Organization details behind an issuer entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDetails {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub vanity_url: Option<String>,
    #[serde(default)]
    pub internationalize_badge_templates: bool,
    #[serde(default)]
    pub share_to_ziprecruiter: bool,
    #[serde(default)]
    pub verified: bool,
}

/// One organization credited on a badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuerEntity {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub primary: bool,
    pub entity: EntityDetails,
}

/// Issuer block: a human-readable summary plus the credited entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issuer {
    pub summary: String,
    pub entities: Vec<IssuerEntity>,
}

/// A skill a badge attests to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vanity_slug: Option<String>,
}

/// An activity required to earn a badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeTemplateActivity {
    pub id: String,
    pub activity_type: String,
    #[serde(default)]
    pub required_badge_template_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A digital badge credential.
///
/// Required fields have no serde default, so a record missing one is rejected
/// when the source document is parsed rather than failing later at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image: BadgeImage,
    pub issuer: Issuer,
    pub skills: Vec<Skill>,
    pub badge_template_activities: Vec<BadgeTemplateActivity>,

    #[serde(default)]
    pub cost: Option<Cost>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub type_category: Option<String>,
    #[serde(default)]
    pub global_activity_url: Option<String>,
    #[serde(default)]
    pub earn_this_badge_url: Option<String>,
    #[serde(default)]
    pub vanity_slug: Option<String>,
    #[serde(default)]
    pub time_to_earn: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub enable_earn_this_badge: bool,
    #[serde(default)]
    pub enable_detail_attribute_visibility: bool,
    #[serde(default)]
    pub show_badge_lmi: bool,
    #[serde(default)]
    pub show_skill_tag_links: bool,
    #[serde(default)]
    pub translatable: bool,

    #[serde(default)]
    pub alignments: Vec<serde_json::Value>,
    #[serde(default)]
    pub endorsements: Vec<serde_json::Value>,
}

impl Badge {
    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("badge id is empty".to_string());
        }
        if self.url.trim().is_empty() {
            return Err(format!("badge {} has an empty url", self.id));
        }
        Ok(())
    }

    /// Cost in the text form used by facet options and filter selections.
    pub fn cost_text(&self) -> Option<String> {
        self.cost.map(|c| c.to_string())
    }

    /// Link target for the call to action: the global activity page when
    /// published, else the badge's own page.
    pub fn call_to_action_url(&self) -> &str {
        match self.global_activity_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => &self.url,
        }
    }
}
