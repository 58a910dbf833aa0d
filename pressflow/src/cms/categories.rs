//! Category lookup.

use std::sync::Arc;
use tracing::debug;

use super::client::CmsApi;
use crate::core::{Category, CategoryId};
use crate::errors::CategoryError;

/// Maps a category name to its CMS identifier.
///
/// Only the first page is consulted; sites with more categories than the page
/// size cannot resolve the ones beyond it.
#[derive(Clone)]
pub struct CategoryResolver {
    api: Arc<dyn CmsApi>,
    per_page: usize,
}

impl CategoryResolver {
    /// Creates a resolver reading `per_page` categories.
    #[must_use]
    pub fn new(api: Arc<dyn CmsApi>, per_page: usize) -> Self {
        Self { api, per_page }
    }

    /// Lists the first page of categories.
    pub async fn list(&self) -> Result<Vec<Category>, CategoryError> {
        Ok(self.api.list_categories(self.per_page).await?)
    }

    /// Resolves a name by exact, case-sensitive match.
    pub async fn resolve(&self, name: &str) -> Result<CategoryId, CategoryError> {
        let categories = self.list().await?;
        debug!(count = categories.len(), name, "Resolving category");
        find_category(&categories, name)
            .map(|category| category.id)
            .ok_or_else(|| CategoryError::NotFound(name.to_string()))
    }
}

impl std::fmt::Debug for CategoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryResolver")
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|category| category.name == name)
}
