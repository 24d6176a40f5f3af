//! Static fallback catalog served when the database is unreachable.
//!
//! A small fixed set of well-known entries keeps public pages rendering
//! with plausible content during an outage. Only non-premium images are
//! included, so the degraded path can never leak paywalled content.

use chrono::{DateTime, Utc};
use dapparchive_core::taxonomy::{Category, DappKind};

use crate::models::dapp::{Dapp, DappSummary, DappWithImages};
use crate::models::image::Image;

/// Fixed timestamp for fallback rows so degraded responses are stable.
fn fallback_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_433_600, 0).expect("valid fallback timestamp")
}

fn dapp(id: i64, slug: &str, name: &str, description: &str, website: &str) -> Dapp {
    Dapp {
        id,
        slug: slug.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        website: Some(website.to_string()),
        logo_url: None,
        featured: true,
        kind: Some(DappKind::Defi),
        category: Some(Category::Exchange),
        created_at: fallback_time(),
        updated_at: fallback_time(),
    }
}

fn image(id: i64, dapp_id: i64, title: &str, category: Category, order: i32) -> Image {
    Image {
        id,
        dapp_id,
        url: format!("https://static.dapparchive.example/fallback/{id}.png"),
        title: Some(title.to_string()),
        description: None,
        category: Some(category),
        version: None,
        flow: None,
        ui_element: None,
        tags: Vec::new(),
        is_premium: false,
        display_order: order,
        captured_at: None,
        created_at: fallback_time(),
        updated_at: fallback_time(),
    }
}

/// The fallback dapps with their images, in listing order.
pub fn sample_catalog() -> Vec<DappWithImages> {
    vec![
        DappWithImages {
            dapp: dapp(
                1,
                "gmx-v2",
                "GMX V2",
                "The largest Perp DEX on Arbitrum, trade with up to 100x leverage",
                "https://gmx.io",
            ),
            images: vec![
                image(1, 1, "Limit Order", Category::Exchange, 0),
                image(2, 1, "Market Order", Category::Exchange, 1),
                image(3, 1, "Dashboard", Category::Analytics, 2),
            ],
        },
        DappWithImages {
            dapp: dapp(
                2,
                "jupiter",
                "Jupiter",
                "The key liquidity aggregator for Solana, providing the best swap rates",
                "https://jup.ag",
            ),
            images: vec![
                image(4, 2, "Swap Interface", Category::Exchange, 0),
                image(5, 2, "Settings", Category::Other, 1),
            ],
        },
    ]
}

/// Fallback value for dapp listings.
pub fn sample_dapp_summaries() -> Vec<DappSummary> {
    sample_catalog()
        .into_iter()
        .map(|entry| DappSummary {
            id: entry.dapp.id,
            slug: entry.dapp.slug,
            name: entry.dapp.name,
            description: entry.dapp.description,
            logo_url: entry.dapp.logo_url,
            featured: entry.dapp.featured,
            kind: entry.dapp.kind,
            category: entry.dapp.category,
            image_count: entry.images.len() as i64,
            created_at: entry.dapp.created_at,
        })
        .collect()
}

/// Fallback value for dapp detail lookups by slug.
pub fn sample_dapp_by_slug(slug: &str) -> Option<DappWithImages> {
    sample_catalog().into_iter().find(|entry| entry.dapp.slug == slug)
}

/// Fallback value for image listings.
pub fn sample_images() -> Vec<Image> {
    sample_catalog()
        .into_iter()
        .flat_map(|entry| entry.images)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_images_are_never_premium() {
        assert!(sample_images().iter().all(|img| !img.is_premium));
    }

    #[test]
    fn summaries_count_their_images() {
        let summaries = sample_dapp_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].image_count, 3);
        assert_eq!(summaries[1].image_count, 2);
    }

    #[test]
    fn lookup_by_slug_finds_known_entries_only() {
        assert!(sample_dapp_by_slug("gmx-v2").is_some());
        assert!(sample_dapp_by_slug("not-a-dapp").is_none());
    }
}
