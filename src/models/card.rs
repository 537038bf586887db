//! Card view model: the display-ready projection of a badge.

use serde::Serialize;

use super::Badge;

/// Everything a gallery card shows for one badge.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCard {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub image_alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_category: Option<String>,
    pub issuer: String,
    pub skills: String,
    pub call_to_action_url: String,
}

impl From<&Badge> for BadgeCard {
    fn from(badge: &Badge) -> Self {
        Self {
            id: badge.id.clone(),
            name: badge.name.clone(),
            image_url: badge.image.url.clone(),
            image_alt: badge.name.clone(),
            description: badge.description.clone(),
            level: non_empty(badge.level.as_deref()),
            type_category: non_empty(badge.type_category.as_deref()),
            issuer: capitalize_first(&badge.issuer.summary),
            skills: badge
                .skills
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            call_to_action_url: badge.call_to_action_url().to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::badge;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("issued by Example Org"), "Issued by Example Org");
        assert_eq!(capitalize_first("ébadge"), "Ébadge");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_card_projection() {
        let b = badge("b1", "Cloud Fundamentals", Some(0.0), Some("Foundational"), None);
        let card = BadgeCard::from(&b);

        assert_eq!(card.image_url, "https://images.example.com/b1.png");
        assert_eq!(card.image_alt, "Cloud Fundamentals");
        assert_eq!(card.issuer, "Issued by Example Org");
        assert_eq!(card.skills, "Networking, Security");
        assert_eq!(card.level.as_deref(), Some("Foundational"));
        assert!(card.type_category.is_none());
    }

    #[test]
    fn test_card_links_to_badge_url_without_activity_url() {
        let b = badge("b2", "Linked", None, None, None);
        let card = BadgeCard::from(&b);
        assert_eq!(card.call_to_action_url, "https://badges.example.com/org/badge/b2");
    }
}
