//! Café repository
//!
//! Handles café CRUD plus the association set. Writes are
//! transactional: a café and its category rows land together or not at
//! all, and updates replace the whole association set
//! (delete-all-then-reinsert, correctness over efficiency).

use std::collections::HashMap;

use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};

use cafelist_core::{AssociationPlan, CafeTitle, CityName, ImageUrl};

use super::DbError;

const DUPLICATE_CAFE: &str = "cafe with this title and city already exists";

/// Café scalar columns
#[derive(Debug, Clone, FromRow)]
struct CafeRow {
    id: i64,
    title: String,
    city: String,
    description: String,
    image_url: Option<String>,
}

/// Café with its derived category view
#[derive(Debug, Clone)]
pub struct CafeWithCategories {
    pub id: i64,
    pub title: String,
    pub city: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Category flagged `is_best = true` (zero or one)
    pub best_for: Option<String>,
    /// Categories flagged `is_best = false`, in association order
    pub also_good_for: Vec<String>,
}

/// Validated input for create/update
#[derive(Debug, Clone)]
pub struct NewCafe {
    pub title: CafeTitle,
    pub city: CityName,
    pub description: String,
    pub image_url: Option<ImageUrl>,
}

/// Optional list filters; all supplied conditions must hold
#[derive(Debug, Clone, Default)]
pub struct CafeFilter {
    /// Case-insensitive city substring
    pub city: Option<String>,
    /// Name of the required best category
    pub best_for: Option<String>,
    /// At least one of these must appear among the also-good-for set
    pub also_good_for: Vec<String>,
}

impl CafeFilter {
    /// Every category name this filter mentions.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(best) = &self.best_for {
            names.push(best);
        }
        for name in &self.also_good_for {
            names.push(name);
        }
        names
    }
}

/// Café repository
pub struct CafeRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CafeRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a café with its association set (atomic).
    ///
    /// A duplicate `(title, city)` pair rolls the transaction back and
    /// surfaces a conflict.
    pub async fn create(
        &self,
        cafe: &NewCafe,
        plan: &AssociationPlan,
    ) -> Result<CafeWithCategories, DbError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO cafes (title, city, description, image_url)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(cafe.title.as_str())
        .bind(cafe.city.as_str())
        .bind(&cafe.description)
        .bind(cafe.image_url.as_ref().map(ImageUrl::as_str))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::from_unique(e, DUPLICATE_CAFE))?;
        let id: i64 = row.get("id");

        insert_associations(&mut tx, id, plan).await?;
        tx.commit().await?;

        self.get(id).await
    }

    /// Replace a café's columns and entire association set (atomic).
    pub async fn update(
        &self,
        id: i64,
        cafe: &NewCafe,
        plan: &AssociationPlan,
    ) -> Result<CafeWithCategories, DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE cafes
            SET title = ?, city = ?, description = ?, image_url = ?
            WHERE id = ?
            "#,
        )
        .bind(cafe.title.as_str())
        .bind(cafe.city.as_str())
        .bind(&cafe.description)
        .bind(cafe.image_url.as_ref().map(ImageUrl::as_str))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from_unique(e, DUPLICATE_CAFE))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "cafe",
                id: id.to_string(),
            });
        }

        sqlx::query("DELETE FROM cafe_categories WHERE cafe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_associations(&mut tx, id, plan).await?;
        tx.commit().await?;

        self.get(id).await
    }

    /// Delete a café; association rows cascade.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM cafes WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "cafe",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Look up a café id by its unique `(title, city)` pair.
    /// Used by the seeder to make reseeding idempotent.
    pub async fn find_id_by_title_city(
        &self,
        title: &str,
        city: &str,
    ) -> Result<Option<i64>, DbError> {
        let row = sqlx::query("SELECT id FROM cafes WHERE title = ? AND city = ?")
            .bind(title)
            .bind(city)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|r| r.get("id")))
    }

    /// Get a single café with its categories.
    pub async fn get(&self, id: i64) -> Result<CafeWithCategories, DbError> {
        let row: CafeRow = sqlx::query_as(
            "SELECT id, title, city, description, image_url FROM cafes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "cafe",
            id: id.to_string(),
        })?;

        let mut categories = self.load_categories(&[id]).await?;
        let (best_for, also_good_for) = categories.remove(&id).unwrap_or_default();

        Ok(assemble(row, best_for, also_good_for))
    }

    /// List cafés matching the filter, ordered by id.
    ///
    /// Each filter condition is an independent `EXISTS` subquery, so a
    /// café never repeats because of multiple matching associations.
    /// Filter category names are assumed already validated against the
    /// category table.
    pub async fn list(&self, filter: &CafeFilter) -> Result<Vec<CafeWithCategories>, DbError> {
        let mut builder = sqlx::QueryBuilder::<Sqlite>::new(
            "SELECT id, title, city, description, image_url FROM cafes WHERE 1=1",
        );

        if let Some(city) = &filter.city {
            builder
                .push(" AND LOWER(city) LIKE '%' || LOWER(")
                .push_bind(city)
                .push(") || '%'");
        }

        if let Some(best) = &filter.best_for {
            builder
                .push(
                    " AND EXISTS (SELECT 1 FROM cafe_categories cc \
                     JOIN categories c ON c.id = cc.category_id \
                     WHERE cc.cafe_id = cafes.id AND cc.is_best = 1 AND c.name = ",
                )
                .push_bind(best)
                .push(")");
        }

        if !filter.also_good_for.is_empty() {
            builder.push(
                " AND EXISTS (SELECT 1 FROM cafe_categories cc \
                 JOIN categories c ON c.id = cc.category_id \
                 WHERE cc.cafe_id = cafes.id AND cc.is_best = 0 AND c.name IN (",
            );
            let mut separated = builder.separated(", ");
            for name in &filter.also_good_for {
                separated.push_bind(name);
            }
            separated.push_unseparated("))");
        }

        builder.push(" ORDER BY id");

        let rows: Vec<CafeRow> = builder.build_query_as().fetch_all(self.pool).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut categories = self.load_categories(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (best_for, also_good_for) = categories.remove(&row.id).unwrap_or_default();
                assemble(row, best_for, also_good_for)
            })
            .collect())
    }

    /// Category names for a batch of cafés, one query.
    async fn load_categories(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<i64, (Option<String>, Vec<String>)>, DbError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder = sqlx::QueryBuilder::<Sqlite>::new(
            "SELECT cc.cafe_id, c.name, cc.is_best FROM cafe_categories cc \
             JOIN categories c ON c.id = cc.category_id WHERE cc.cafe_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY cc.id");

        let rows = builder.build().fetch_all(self.pool).await?;
        let mut map: HashMap<i64, (Option<String>, Vec<String>)> = HashMap::new();
        for row in rows {
            let cafe_id: i64 = row.get("cafe_id");
            let name: String = row.get("name");
            let is_best: bool = row.get("is_best");
            let entry = map.entry(cafe_id).or_default();
            if is_best {
                entry.0 = Some(name);
            } else {
                entry.1.push(name);
            }
        }
        Ok(map)
    }
}

/// Insert one `is_best` row plus the also-good-for rows for a café.
async fn insert_associations(
    tx: &mut Transaction<'_, Sqlite>,
    cafe_id: i64,
    plan: &AssociationPlan,
) -> Result<(), DbError> {
    sqlx::query("INSERT INTO cafe_categories (cafe_id, category_id, is_best) VALUES (?, ?, 1)")
        .bind(cafe_id)
        .bind(plan.best_id)
        .execute(&mut **tx)
        .await?;

    for category_id in &plan.also_ids {
        sqlx::query(
            "INSERT INTO cafe_categories (cafe_id, category_id, is_best) VALUES (?, ?, 0)",
        )
        .bind(cafe_id)
        .bind(category_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

fn assemble(
    row: CafeRow,
    best_for: Option<String>,
    also_good_for: Vec<String>,
) -> CafeWithCategories {
    CafeWithCategories {
        id: row.id,
        title: row.title,
        city: row.city,
        description: row.description,
        image_url: row.image_url,
        best_for,
        also_good_for,
    }
}
