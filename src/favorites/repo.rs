use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Favorite row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub planet_id: Option<i32>,
    pub people_id: Option<i32>,
    pub created_at: OffsetDateTime,
}

/// Favorite joined with whichever target it references. The LEFT JOINs make
/// every target column nullable; the dto layer reassembles nested payloads.
#[derive(Debug, FromRow)]
pub struct FavoriteJoinRow {
    pub id: i32,
    pub user_id: i32,
    pub planet_id: Option<i32>,
    pub planet_name: Option<String>,
    pub planet_climate: Option<String>,
    pub planet_population: Option<i64>,
    pub person_id: Option<i32>,
    pub person_name: Option<String>,
    pub person_height: Option<String>,
    pub person_mass: Option<String>,
}

impl Favorite {
    /// Insert a favorite for one target; the handler guarantees exactly one
    /// of the two ids is set.
    pub async fn create(
        db: &PgPool,
        user_id: i32,
        planet_id: Option<i32>,
        people_id: Option<i32>,
    ) -> anyhow::Result<Favorite> {
        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, planet_id, people_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, planet_id, people_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(planet_id)
        .bind(people_id)
        .fetch_one(db)
        .await?;
        Ok(favorite)
    }

    /// Delete keyed on id AND owner, so another user's favorite is
    /// indistinguishable from a missing one. Returns whether a row matched.
    pub async fn delete_by_user(db: &PgPool, id: i32, user_id: i32) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All of a user's favorites with their targets resolved in one query.
    pub async fn list_with_targets(
        db: &PgPool,
        user_id: i32,
    ) -> anyhow::Result<Vec<FavoriteJoinRow>> {
        let rows = sqlx::query_as::<_, FavoriteJoinRow>(
            r#"
            SELECT f.id, f.user_id,
                   pl.id AS planet_id, pl.name AS planet_name,
                   pl.climate AS planet_climate, pl.population AS planet_population,
                   pe.id AS person_id, pe.name AS person_name,
                   pe.height AS person_height, pe.mass AS person_mass
            FROM favorites f
            LEFT JOIN planets pl ON pl.id = f.planet_id
            LEFT JOIN people pe ON pe.id = f.people_id
            WHERE f.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
