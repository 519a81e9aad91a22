//! Category Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use scoops_app::domain::categories::records::CategoryRecord;

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(category: CategoryRecord) -> Self {
        CategoryResponse {
            id: category.id.into_i64(),
            name: category.name,
            created_at: category.created_at.to_string(),
        }
    }
}

/// Category Index Handler
///
/// Returns active categories ordered by name.
#[endpoint(tags("categories"), summary = "List Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<CategoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .categories
        .list_categories()
        .await
        .or_500("failed to fetch categories")?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}
