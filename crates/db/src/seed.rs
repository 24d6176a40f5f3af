//! Idempotent demo-data seeding.
//!
//! Dapps are inserted with `ON CONFLICT (slug) DO NOTHING`; images are
//! only inserted when the owning dapp row was newly created, so running
//! the seed repeatedly (or concurrently across instances) never
//! duplicates content.

use dapparchive_core::taxonomy::{Category, DappKind};
use dapparchive_core::types::DbId;
use sqlx::PgPool;

struct SeedImage {
    url: &'static str,
    title: &'static str,
    category: Category,
    version: &'static str,
    order: i32,
}

struct SeedDapp {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    website: &'static str,
    category: Category,
    kind: DappKind,
    images: &'static [SeedImage],
}

const SEED_DAPPS: &[SeedDapp] = &[
    SeedDapp {
        name: "GMX V2",
        slug: "gmx-v2",
        description: "The largest Perp DEX on Arbitrum, trade with up to 100x leverage",
        website: "https://gmx.io",
        category: Category::Exchange,
        kind: DappKind::Defi,
        images: &[
            SeedImage {
                url: "https://res.cloudinary.com/dgxzqy4kl/image/upload/v1709433600/gmx-limit.png",
                title: "Limit Order",
                category: Category::Exchange,
                version: "v2",
                order: 0,
            },
            SeedImage {
                url: "https://res.cloudinary.com/dgxzqy4kl/image/upload/v1709433600/gmx-market.png",
                title: "Market Order",
                category: Category::Exchange,
                version: "v2",
                order: 1,
            },
            SeedImage {
                url: "https://res.cloudinary.com/dgxzqy4kl/image/upload/v1709433600/gmx-dashboard.png",
                title: "Dashboard",
                category: Category::Analytics,
                version: "v2",
                order: 2,
            },
        ],
    },
    SeedDapp {
        name: "Jupiter",
        slug: "jupiter",
        description: "The key liquidity aggregator for Solana, providing the best swap rates",
        website: "https://jup.ag",
        category: Category::Exchange,
        kind: DappKind::Defi,
        images: &[
            SeedImage {
                url: "https://res.cloudinary.com/dgxzqy4kl/image/upload/v1709433600/jupiter-swap.png",
                title: "Swap Interface",
                category: Category::Exchange,
                version: "v6",
                order: 0,
            },
            SeedImage {
                url: "https://res.cloudinary.com/dgxzqy4kl/image/upload/v1709433600/jupiter-settings.png",
                title: "Settings",
                category: Category::Other,
                version: "v6",
                order: 1,
            },
        ],
    },
];

/// Insert the demo catalog. Safe to call on every startup.
pub async fn seed_demo_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    for entry in SEED_DAPPS {
        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO dapps (name, slug, description, website, category, kind, featured)
             VALUES ($1, $2, $3, $4, $5, $6, true)
             ON CONFLICT (slug) DO NOTHING
             RETURNING id",
        )
        .bind(entry.name)
        .bind(entry.slug)
        .bind(entry.description)
        .bind(entry.website)
        .bind(entry.category)
        .bind(entry.kind)
        .fetch_optional(pool)
        .await?;

        let Some((dapp_id,)) = inserted else {
            tracing::debug!(slug = entry.slug, "Seed dapp already present, skipping");
            continue;
        };

        for img in entry.images {
            sqlx::query(
                "INSERT INTO images (dapp_id, url, title, category, version, display_order)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(dapp_id)
            .bind(img.url)
            .bind(img.title)
            .bind(img.category)
            .bind(img.version)
            .bind(img.order)
            .execute(pool)
            .await?;
        }

        tracing::info!(
            slug = entry.slug,
            images = entry.images.len(),
            "Seeded demo dapp",
        );
    }

    Ok(())
}
