//! Starter data seeding
//!
//! Idempotent: categories are inserted if missing, and cafés are
//! matched by their unique `(title, city)` pair; existing cafés get
//! their columns and association set replaced, new ones are created.
//! Records with invalid categories are skipped with a warning rather
//! than aborting the whole run.

use anyhow::Result;
use sqlx::SqlitePool;

use cafelist_core::{plan_associations, CafeTitle, CityName};
use cafelist_server::db::repos::{CafeRepo, CategoryRepo, NewCafe};

const CATEGORIES: &[&str] = &[
    "wifi", "quiet", "coffee", "brunch", "workspace", "pastry", "vegan",
];

struct SeedCafe {
    title: &'static str,
    city: &'static str,
    description: &'static str,
    best_for: &'static str,
    also_good_for: &'static [&'static str],
}

const CAFES: &[SeedCafe] = &[
    SeedCafe {
        title: "Cozy Corner",
        city: "Paris",
        description: "Quiet back-street spot with fast wifi and window seats",
        best_for: "wifi",
        also_good_for: &["quiet", "coffee"],
    },
    SeedCafe {
        title: "Bean There",
        city: "Paris",
        description: "Specialty roastery, pour over bar and single origin espresso",
        best_for: "coffee",
        also_good_for: &["pastry"],
    },
    SeedCafe {
        title: "The Reading Room",
        city: "Lyon",
        description: "Library vibes, silent tables and long afternoons",
        best_for: "quiet",
        also_good_for: &["wifi", "coffee"],
    },
    SeedCafe {
        title: "Green Fork",
        city: "Lyon",
        description: "Plant based brunch plates and oat milk flat whites",
        best_for: "vegan",
        also_good_for: &["brunch"],
    },
    SeedCafe {
        title: "Laptop Harbor",
        city: "Berlin",
        description: "Desks, plugs everywhere, fast wifi and bottomless filter coffee",
        best_for: "workspace",
        also_good_for: &["wifi", "coffee"],
    },
];

pub async fn run(pool: &SqlitePool) -> Result<()> {
    let categories = CategoryRepo::new(pool);
    for name in CATEGORIES {
        categories.insert_if_missing(name).await?;
    }
    tracing::info!(count = CATEGORIES.len(), "Categories seeded");

    let known = categories.resolve(CATEGORIES).await?;

    let repo = CafeRepo::new(pool);
    let mut created = 0;
    let mut updated = 0;

    for seed in CAFES {
        let also: Vec<String> = seed.also_good_for.iter().map(|s| s.to_string()).collect();
        let plan = match plan_associations(seed.best_for, &also, &known) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(title = seed.title, error = %e, "Skipping seed cafe");
                continue;
            }
        };

        let (title, city) = match (CafeTitle::new(seed.title), CityName::new(seed.city)) {
            (Ok(title), Ok(city)) => (title, city),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(title = seed.title, error = %e, "Skipping seed cafe");
                continue;
            }
        };
        let cafe = NewCafe {
            title,
            city,
            description: seed.description.to_owned(),
            image_url: None,
        };

        match repo
            .find_id_by_title_city(seed.title, seed.city)
            .await?
        {
            Some(id) => {
                repo.update(id, &cafe, &plan).await?;
                updated += 1;
            }
            None => {
                repo.create(&cafe, &plan).await?;
                created += 1;
            }
        }
    }

    tracing::info!(created, updated, "Cafés seeded");
    Ok(())
}
