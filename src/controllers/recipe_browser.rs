// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use super::{Outcome, RequestSequencer, Served};
use crate::constants::{defaults, messages};
use crate::demo::demo_recipes;
use crate::errors::DietResult;
use crate::logging::AppLogger;
use crate::models::{Pagination, RecipeDetails, RecipeSearchFilters, RecipeSearchPage, RecipeSummary};
use crate::providers::RecipeProvider;
use crate::validation::ValidationError;

#[derive(Debug, Default)]
struct BrowserState {
    filters: RecipeSearchFilters,
    pagination: Pagination,
    results: Vec<RecipeSummary>,
}

/// Paged recipe search with demo fallback
pub struct RecipeBrowser {
    provider: Arc<dyn RecipeProvider>,
    sequencer: RequestSequencer,
    state: RwLock<BrowserState>,
}

impl RecipeBrowser {
    pub fn new(provider: Arc<dyn RecipeProvider>) -> Self {
        Self {
            provider,
            sequencer: RequestSequencer::new(),
            state: RwLock::new(BrowserState::default()),
        }
    }

    /// New search from page 1
    pub async fn search(&self, filters: RecipeSearchFilters) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        self.fetch(filters, 1).await
    }

    /// Featured list shown before any search
    pub async fn load_featured(&self) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        self.search(RecipeSearchFilters::with_query(defaults::FEATURED_QUERY)).await
    }

    /// Drop all filters and show the featured list again
    pub async fn clear_filters(&self) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        self.load_featured().await
    }

    /// Category shortcut: the category name becomes the query
    pub async fn search_category(&self, category: &str) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        self.search(RecipeSearchFilters::with_query(category.trim().to_lowercase())).await
    }

    /// Re-run the current search on another page
    pub async fn go_to_page(&self, page: u32) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        let (filters, pagination) = {
            let state = self.state.read().await;
            (state.filters.clone(), state.pagination)
        };

        if page == 0 || page > pagination.total_pages.max(1) {
            return Err(ValidationError::PageOutOfRange {
                page,
                total_pages: pagination.total_pages,
            }
            .into());
        }

        self.fetch(filters, page).await
    }

    pub async fn next_page(&self) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        let current = self.pagination().await.current_page;
        self.go_to_page(current.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        let current = self.pagination().await.current_page;
        self.go_to_page(current.saturating_sub(1)).await
    }

    /// Page links around the current page, `None` when there is one page
    pub async fn page_window(&self) -> Option<(u32, u32)> {
        self.pagination().await.window()
    }

    pub async fn pagination(&self) -> Pagination {
        self.state.read().await.pagination
    }

    pub async fn filters(&self) -> RecipeSearchFilters {
        self.state.read().await.filters.clone()
    }

    pub async fn results(&self) -> Vec<RecipeSummary> {
        self.state.read().await.results.clone()
    }

    /// Full recipe; there is no demo substitute for a failed lookup
    pub async fn recipe_details(&self, id: u64) -> DietResult<RecipeDetails> {
        match self.provider.get_recipe_information(id).await {
            Ok(details) => Ok(details),
            Err(e) => {
                warn!(
                    recipe.id = id,
                    service_unavailable = e.is_service_unavailable(),
                    error = %e,
                    "{}",
                    messages::RECIPE_DETAILS_FAILED
                );
                Err(e.into())
            }
        }
    }

    async fn fetch(
        &self,
        filters: RecipeSearchFilters,
        page: u32,
    ) -> DietResult<Outcome<Served<RecipeSearchPage>>> {
        let token = self.sequencer.next();

        let served = match self.provider.search_recipes(&filters, page).await {
            Ok(found) => Served::live(found),
            Err(e) => {
                AppLogger::log_fallback("search_recipes", &e.to_string());
                let results = demo_recipes(&filters);
                let total_results = results.len() as u32;
                Served::demo(
                    RecipeSearchPage {
                        results,
                        total_results,
                    },
                    messages::RECIPE_SEARCH_FALLBACK,
                )
            }
        };

        if !self.sequencer.is_current(token) {
            AppLogger::log_stale_response("search_recipes", token.value(), self.sequencer.latest());
            return Ok(Outcome::Superseded);
        }

        let mut state = self.state.write().await;
        // fallback data always fits on a single page
        let current_page = if served.is_fallback() { 1 } else { page };
        state.pagination = Pagination::new(current_page, served.data.total_results);
        state.results = served.data.results.clone();
        state.filters = filters;

        Ok(Outcome::Fresh(served))
    }
}
