use serde::{Deserialize, Serialize};

use crate::catalog::{Person, Planet};
use crate::favorites::repo::FavoriteJoinRow;

/// Body for adding a favorite. Exactly one of the two ids must be set;
/// the handler rejects everything else.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub planet_id: Option<i32>,
    pub people_id: Option<i32>,
}

/// One favorite on the wire. Whichever target is unset serializes as null.
#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: i32,
    pub user_id: i32,
    pub planet: Option<Planet>,
    pub people: Option<Person>,
}

impl From<FavoriteJoinRow> for FavoriteResponse {
    fn from(row: FavoriteJoinRow) -> Self {
        let planet = match (row.planet_id, row.planet_name) {
            (Some(id), Some(name)) => Some(Planet {
                id,
                name,
                climate: row.planet_climate,
                population: row.planet_population,
            }),
            _ => None,
        };
        let people = match (row.person_id, row.person_name) {
            (Some(id), Some(name)) => Some(Person {
                id,
                name,
                height: row.person_height,
                mass: row.person_mass,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            user_id: row.user_id,
            planet,
            people,
        }
    }
}
