use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::auth::repo::User;
use crate::catalog::{Person, Planet};
use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::favorites::dto::{AddFavoriteRequest, FavoriteResponse};
use crate::favorites::repo::Favorite;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/:id", delete(delete_favorite))
}

/// GET /favorites: every favorite of the authenticated user, targets resolved.
#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FavoriteResponse>>, ApiError> {
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        warn!(user_id = %user_id, "favorites requested for unknown user");
        return Err(ApiError::UserNotFound);
    }

    let rows = Favorite::list_with_targets(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(FavoriteResponse::from).collect()))
}

/// POST /favorites: record one favorite, for a planet or a person.
#[instrument(skip(state, payload))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let favorite = match (payload.planet_id, payload.people_id) {
        (None, None) => {
            warn!(user_id = %user_id, "favorite payload names no target");
            return Err(ApiError::Validation("provide a planet_id or a people_id"));
        }
        (Some(_), Some(_)) => {
            warn!(user_id = %user_id, "favorite payload names both targets");
            return Err(ApiError::Validation(
                "provide either planet_id or people_id, not both",
            ));
        }
        (Some(planet_id), None) => {
            if Planet::find_by_id(&state.db, planet_id).await?.is_none() {
                warn!(planet_id = %planet_id, "favorite requested for unknown planet");
                return Err(ApiError::PlanetNotFound);
            }
            Favorite::create(&state.db, user_id, Some(planet_id), None).await?
        }
        (None, Some(people_id)) => {
            if Person::find_by_id(&state.db, people_id).await?.is_none() {
                warn!(people_id = %people_id, "favorite requested for unknown person");
                return Err(ApiError::PersonNotFound);
            }
            Favorite::create(&state.db, user_id, None, Some(people_id)).await?
        }
    };

    info!(favorite_id = %favorite.id, user_id = %user_id, "favorite added");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("favorite added successfully")),
    ))
}

/// DELETE /favorites/:id: remove a favorite the authenticated user owns.
#[instrument(skip(state))]
pub async fn delete_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Favorite::delete_by_user(&state.db, id, user_id).await? {
        warn!(favorite_id = %id, user_id = %user_id, "favorite missing or not owned");
        return Err(ApiError::FavoriteNotFound);
    }

    info!(favorite_id = %id, user_id = %user_id, "favorite deleted");
    Ok(Json(MessageResponse::new("favorite deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_favorite_rejects_empty_payload() {
        let state = AppState::fake();
        let payload = AddFavoriteRequest {
            planet_id: None,
            people_id: None,
        };

        let err = add_favorite(State(state), AuthUser(1), ApiJson(payload))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_favorite_rejects_both_targets() {
        let state = AppState::fake();
        let payload = AddFavoriteRequest {
            planet_id: Some(1),
            people_id: Some(1),
        };

        let err = add_favorite(State(state), AuthUser(1), ApiJson(payload))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    // Storage-backed tests. Each gets its own database provisioned from
    // DATABASE_URL; run them with `cargo test -- --ignored`.
    use sqlx::PgPool;

    async fn seeded_user(pool: &PgPool, name: &str, email: &str) -> User {
        User::create(pool, name, email, "unused-hash")
            .await
            .expect("create user")
    }

    #[sqlx::test]
    #[ignore = "needs a live postgres via DATABASE_URL"]
    async fn deleting_another_users_favorite_is_not_found_and_keeps_the_row(pool: PgPool) {
        let state = AppState::with_pool(pool.clone());
        let ana = seeded_user(&pool, "Ana", "ana@x.com").await;
        let ben = seeded_user(&pool, "Ben", "ben@x.com").await;
        let favorite = Favorite::create(&pool, ben.id, Some(1), None)
            .await
            .expect("create favorite");

        let err = delete_favorite(State(state.clone()), AuthUser(ana.id), ApiPath(favorite.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::FavoriteNotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let kept = Favorite::list_with_targets(&pool, ben.id)
            .await
            .expect("list favorites");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, favorite.id);

        let Json(message) = delete_favorite(State(state), AuthUser(ben.id), ApiPath(favorite.id))
            .await
            .expect("owner delete");
        assert_eq!(message.message, "favorite deleted successfully");
    }

    #[sqlx::test]
    #[ignore = "needs a live postgres via DATABASE_URL"]
    async fn favorite_for_missing_planet_is_not_found_and_writes_nothing(pool: PgPool) {
        let state = AppState::with_pool(pool.clone());
        let ana = seeded_user(&pool, "Ana", "ana@x.com").await;

        let err = add_favorite(
            State(state),
            AuthUser(ana.id),
            ApiJson(AddFavoriteRequest {
                planet_id: Some(999_999),
                people_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::PlanetNotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let rows = Favorite::list_with_targets(&pool, ana.id)
            .await
            .expect("list favorites");
        assert!(rows.is_empty());
    }

    #[sqlx::test]
    #[ignore = "needs a live postgres via DATABASE_URL"]
    async fn added_planet_favorite_round_trips_through_listing(pool: PgPool) {
        let state = AppState::with_pool(pool.clone());
        let ana = seeded_user(&pool, "Ana", "ana@x.com").await;

        let (status, _) = add_favorite(
            State(state.clone()),
            AuthUser(ana.id),
            ApiJson(AddFavoriteRequest {
                planet_id: Some(1),
                people_id: None,
            }),
        )
        .await
        .expect("add favorite");
        assert_eq!(status, StatusCode::CREATED);

        let Json(favorites) = list_favorites(State(state), AuthUser(ana.id))
            .await
            .expect("list favorites");
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].user_id, ana.id);
        let planet = favorites[0].planet.as_ref().expect("planet payload");
        assert_eq!(planet.id, 1);
        assert_eq!(planet.name, "Tatooine");
        assert!(favorites[0].people.is_none());
    }
}
