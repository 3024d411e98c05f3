//! Route definitions for the `/recipes` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// Routes mounted at `/recipes`.
///
/// ```text
/// GET    /                                  -> list_recipes (?q=&limit=&offset=)
/// POST   /                                  -> create_recipe
/// GET    /{id}                              -> get_recipe
/// PUT    /{id}                              -> update_recipe
/// DELETE /{id}                              -> delete_recipe
/// POST   /{id}/ingredients                  -> add_line
/// PUT    /{id}/ingredients/{ingredient_id}  -> edit_line
/// DELETE /{id}/ingredients/{ingredient_id}  -> remove_line
/// GET    /{id}/portions                     -> scale_recipe (?portions=N)
/// POST   /{id}/image                        -> upload_image (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list_recipes).post(recipes::create_recipe))
        .route(
            "/{id}",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/{id}/ingredients", post(recipes::add_line))
        .route(
            "/{id}/ingredients/{ingredient_id}",
            put(recipes::edit_line).delete(recipes::remove_line),
        )
        .route("/{id}/portions", get(recipes::scale_recipe))
        .route("/{id}/image", post(recipes::upload_image))
}
