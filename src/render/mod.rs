//! Server-side HTML for badge cards and the gallery page.

use maud::{html, Markup, DOCTYPE};

use crate::models::{BadgeCard, FacetField, FacetOptions, FilterState, LoadStatus};

/// Everything the gallery page needs.
pub struct GalleryPage<'a> {
    pub status: LoadStatus,
    pub facets: &'a FacetOptions,
    pub filter: &'a FilterState,
    pub cards: &'a [BadgeCard],
    /// Form target; the catalog root or a view page.
    pub action: &'a str,
    /// `get` filters statelessly; `post` submits changes to a view.
    pub method: &'a str,
}

pub fn render_card(card: &BadgeCard) -> Markup {
    html! {
        div class="badge-card" data-badge-id=(card.id) {
            img src=(card.image_url) alt=(card.image_alt) class="badge-image" loading="lazy";
            div class="badge-body" {
                h5 class="badge-name" { (card.name) }
                @if let Some(description) = &card.description {
                    p { (description) }
                }
                @if let Some(level) = &card.level {
                    p { strong { "Level: " } (level) }
                }
                @if let Some(type_category) = &card.type_category {
                    p { strong { "Type Category: " } (type_category) }
                }
                p { strong { "Issuer: " } (card.issuer) }
                p { strong { "Skills: " } (card.skills) }
                a class="badge-cta" href=(card.call_to_action_url) target="_blank" rel="noopener noreferrer" {
                    "Read more"
                }
            }
        }
    }
}

fn facet_select(field: FacetField, options: &[String], selected: Option<&str>) -> Markup {
    html! {
        label for=(field.as_str()) class="sr-only" { (field.placeholder()) }
        select id=(field.as_str()) name=(field.as_str()) {
            option value="" selected[selected.is_none()] { (field.placeholder()) }
            @for value in options {
                option value=(value) selected[selected == Some(value.as_str())] { (value) }
            }
        }
    }
}

fn filter_form(page: &GalleryPage<'_>) -> Markup {
    html! {
        form class="badge-filters" method=(page.method) action=(page.action) {
            label for="search" class="sr-only" { "Search" }
            input type="search" id="search" name="q" placeholder="Search..." value=(page.filter.search);
            @for field in FacetField::ALL {
                (facet_select(field, &page.facets.values(field), page.filter.facet(field)))
            }
            button type="submit" { "Filter" }
        }
    }
}

/// Full gallery document. A failed load adds a short notice; a pending load
/// renders no cards and no notice.
pub fn render_gallery(page: &GalleryPage<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Badges" }
            }
            body {
                (filter_form(page))
                @if page.status == LoadStatus::Failed {
                    p class="badge-notice" { "Badges could not be loaded." }
                }
                div class="badge-list" {
                    @for card in page.cards {
                        (render_card(card))
                    }
                }
            }
        }
    }
}

/// Standalone page for a missing resource.
pub fn render_not_found(message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Not found" }
            }
            body {
                p class="badge-notice" { (message) }
                a href="/" { "Back to all badges" }
            }
        }
    }
}
