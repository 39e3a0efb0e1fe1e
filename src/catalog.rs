//! Reference data: planets and people. The API never writes these; rows are
//! seeded by migration and looked up when favorites are created or listed.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Planet row; doubles as the payload nested in a favorite.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Planet {
    pub id: i32,
    pub name: String,
    pub climate: Option<String>,
    pub population: Option<i64>,
}

impl Planet {
    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<Planet>> {
        let planet = sqlx::query_as::<_, Planet>(
            r#"
            SELECT id, name, climate, population
            FROM planets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(planet)
    }
}

/// Person row ("people" on the wire, matching the favorites payload key).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
}

impl Person {
    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, name, height, mass
            FROM people
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(person)
    }
}
