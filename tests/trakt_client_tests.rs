mod auth_support;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use trakt_list_sync::auth::{Authenticator, Clock, SystemClock, TokenStore};
use trakt_list_sync::error::SyncError;
use trakt_list_sync::trakt::TraktClient;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{seed_credential, InMemoryTokenStore, ScriptedTransport};

fn client(server: &MockServer) -> (TraktClient, Arc<InMemoryTokenStore>, Arc<ScriptedTransport>) {
    let store = Arc::new(InMemoryTokenStore::new());
    seed_credential(&store, "live-token", "refresh", SystemClock.now() + 3600.0);
    let transport = Arc::new(ScriptedTransport::new());
    let auth = Arc::new(Authenticator::new(
        "client-id",
        store.clone(),
        transport.clone(),
    ));
    let trakt = TraktClient::new(auth)
        .with_api_url(server.uri())
        .with_settle_delay(Duration::ZERO);
    (trakt, store, transport)
}

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn list_id_is_resolved_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/lists"))
        .and(header("authorization", "Bearer live-token"))
        .and(header("trakt-api-key", "client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Other", "ids": {"trakt": 7}},
            {"name": "My Collection", "ids": {"trakt": 55}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (trakt, store, transport) = client(&server);

    assert_eq!(trakt.list_id("My Collection").await.unwrap(), 55);
    assert_eq!(trakt.list_id("My Collection").await.unwrap(), 55);
    assert_eq!(store.get("list-id:My Collection"), Some(json!(55)));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn missing_list_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/me/lists"))
        .and(body_json(json!({"name": "Radarr Watchlist"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "Radarr Watchlist", "ids": {"trakt": 9}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Radarr Watchlist", "ids": {"trakt": 9}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (trakt, store, _) = client(&server);

    assert_eq!(trakt.list_id("Radarr Watchlist").await.unwrap(), 9);
    assert_eq!(store.get("list-id:Radarr Watchlist"), Some(json!(9)));
}

#[tokio::test]
async fn list_that_never_appears_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/me/lists"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let (trakt, _, _) = client(&server);

    let err = trakt.list_id("Ghost").await.unwrap_err();
    assert!(matches!(err, SyncError::ListNotFound(name) if name == "Ghost"));
}

#[tokio::test]
async fn list_movies_collects_imdb_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/lists/55/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "movie", "movie": {"ids": {"imdb": "tt0111161", "trakt": 1}}},
            {"type": "movie", "movie": {"ids": {"trakt": 2}}},
            {"type": "show", "show": {"ids": {"trakt": 3}}}
        ])))
        .mount(&server)
        .await;

    let (trakt, _, _) = client(&server);

    assert_eq!(trakt.list_movies(55).await.unwrap(), ids(&["tt0111161"]));
}

#[tokio::test]
async fn add_and_remove_post_movie_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/me/lists/55/items"))
        .and(body_json(json!({"movies": [
            {"ids": {"imdb": "tt1"}},
            {"ids": {"imdb": "tt2"}}
        ]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"added": {"movies": 2}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/me/lists/55/items/remove"))
        .and(body_json(json!({"movies": [{"ids": {"imdb": "tt9"}}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": {"movies": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let (trakt, _, _) = client(&server);

    let added = trakt.add_movies(55, &ids(&["tt2", "tt1"])).await.unwrap();
    let removed = trakt.remove_movies(55, &ids(&["tt9"])).await.unwrap();
    assert_eq!(added["added"]["movies"], 2);
    assert_eq!(removed["deleted"]["movies"], 1);
}

#[tokio::test]
async fn description_update_uses_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/me/lists/55"))
        .and(body_json(json!({"description": "Updated at 2026-10-19"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (trakt, _, _) = client(&server);

    trakt
        .update_description(55, "Updated at 2026-10-19")
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_api_call_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/lists/55/items"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let (trakt, _, _) = client(&server);

    let err = trakt.list_movies(55).await.unwrap_err();
    assert!(matches!(err, SyncError::Api { status: 401, ref body } if body == "unauthorized"));
}
