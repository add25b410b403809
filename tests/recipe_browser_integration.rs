// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the recipe browser against a mocked recipe API
//!
//! Verifies pagination over live results, the demo fallback when the API
//! fails and the absence of a fallback for recipe details.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use diet_tracker::constants::messages;
use diet_tracker::controllers::{DataSource, RecipeBrowser};
use diet_tracker::errors::DietError;
use diet_tracker::models::{Diet, RecipeSearchFilters};
use diet_tracker::providers::{RecipeApiError, SpoonacularProvider};
use mockito::{Matcher, Server};
use serde_json::json;

fn browser(server: &Server) -> Result<RecipeBrowser> {
    let provider = SpoonacularProvider::new(server.url(), "test_key", Duration::from_secs(5))?;
    Ok(RecipeBrowser::new(Arc::new(provider)))
}

/// Helper to create a search page with `count` results
fn mock_search_response(first_id: u64, count: u64, total: u32) -> serde_json::Value {
    let results: Vec<_> = (first_id..first_id + count)
        .map(|id| json!({ "id": id, "title": format!("Recipe {id}"), "readyInMinutes": 20 }))
        .collect();
    json!({ "results": results, "totalResults": total })
}

#[tokio::test]
async fn test_paging_through_live_results() -> Result<()> {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(mock_search_response(1, 12, 100).to_string())
        .create_async()
        .await;
    let second = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("offset".into(), "12".into()),
        ]))
        .with_status(200)
        .with_body(mock_search_response(13, 12, 100).to_string())
        .create_async()
        .await;

    let browser = browser(&server)?;
    let served = browser
        .search(RecipeSearchFilters::with_query("pasta"))
        .await?
        .into_fresh()
        .expect("fresh");
    assert_eq!(served.source, DataSource::Live);
    assert!(served.notice.is_none());

    let pagination = browser.pagination().await;
    assert_eq!(pagination.current_page, 1);
    assert_eq!(pagination.total_pages, 9);
    assert_eq!(browser.page_window().await, Some((1, 3)));

    browser.next_page().await?;
    first.assert_async().await;
    second.assert_async().await;

    assert_eq!(browser.pagination().await.current_page, 2);
    assert_eq!(browser.results().await[0].id, 13);
    assert_eq!(browser.page_window().await, Some((1, 4)));

    let err = browser.go_to_page(10).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(browser.pagination().await.current_page, 2);

    Ok(())
}

#[tokio::test]
async fn test_failed_search_shows_demo_recipes() -> Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let browser = browser(&server)?;
    let filters = RecipeSearchFilters {
        diet: Some(Diet::Vegetarian),
        ..RecipeSearchFilters::default()
    };
    let served = browser.search(filters.clone()).await?.into_fresh().expect("fresh");

    assert_eq!(served.source, DataSource::Demo);
    assert_eq!(served.notice, Some(messages::RECIPE_SEARCH_FALLBACK));
    assert!(!served.data.results.is_empty());
    assert!(served.data.results.iter().all(|r| r.vegetarian));

    assert_eq!(browser.filters().await, filters);
    assert_eq!(browser.pagination().await.current_page, 1);
    assert!(browser.page_window().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_featured_list_falls_back_to_all_demo_recipes() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("query".into(), "healthy".into()))
        .with_status(402)
        .with_body(json!({ "status": "failure", "code": 402 }).to_string())
        .create_async()
        .await;

    let browser = browser(&server)?;
    let served = browser.load_featured().await?.into_fresh().expect("fresh");
    mock.assert_async().await;

    assert_eq!(served.source, DataSource::Demo);
    assert_eq!(served.notice, Some(messages::RECIPE_SEARCH_FALLBACK));
    assert_eq!(served.data.results.len(), 3);
    assert_eq!(browser.results().await.len(), 3);
    assert_eq!(browser.filters().await.query, "healthy");

    Ok(())
}

#[tokio::test]
async fn test_recipe_details_failure_has_no_fallback() -> Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/recipes/1/information")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let browser = browser(&server)?;
    let err = browser.recipe_details(1).await.unwrap_err();
    assert!(matches!(
        err,
        DietError::ServiceUnavailable(RecipeApiError::Status { status: 500, .. })
    ));

    Ok(())
}
