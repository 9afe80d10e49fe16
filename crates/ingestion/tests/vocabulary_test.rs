//! Vocabulary resolution against a mock catalog provider

mod common;

use common::{fast_policy, genre_body, tmdb_client};
use media_catalog_ingestion::provider::SearchKind;
use media_catalog_ingestion::vocabulary::VocabularyCache;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_vocabulary_resolved_once_per_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(genre_body(&[(18, "드라마"), (35, "코미디")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = tmdb_client(&server);
    let policy = fast_policy();
    let mut cache = VocabularyCache::new();

    let first_len = cache.resolve(&client, SearchKind::Movie, &policy).await.len();
    let vocabulary = cache.resolve(&client, SearchKind::Movie, &policy).await;

    assert_eq!(first_len, 2);
    assert_eq!(vocabulary.name_of(18), Some("드라마"));
    assert_eq!(vocabulary.name_of(35), Some("코미디"));
}

#[tokio::test]
async fn test_movie_and_tv_vocabularies_are_separate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genre_body(&[(28, "액션")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/tv/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genre_body(&[(10759, "액션 어드벤처")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = tmdb_client(&server);
    let policy = fast_policy();
    let mut cache = VocabularyCache::new();

    let movie_name = cache
        .resolve(&client, SearchKind::Movie, &policy)
        .await
        .name_of(28)
        .map(str::to_string);
    let tv = cache.resolve(&client, SearchKind::Tv, &policy).await;

    assert_eq!(movie_name.as_deref(), Some("액션"));
    assert_eq!(tv.name_of(10759), Some("액션 어드벤처"));
    assert_eq!(tv.name_of(28), None);
}

#[tokio::test]
async fn test_duplicate_genre_ids_keep_first_name() {
    let server = MockServer::start().await;
    let body = json!({
        "genres": [
            {"id": 18, "name": "드라마"},
            {"id": 18, "name": "Drama"},
        ]
    });
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = tmdb_client(&server);
    let policy = fast_policy();
    let mut cache = VocabularyCache::new();
    let vocabulary = cache.resolve(&client, SearchKind::Movie, &policy).await;

    assert_eq!(vocabulary.len(), 1);
    assert_eq!(vocabulary.name_of(18), Some("드라마"));
}

#[tokio::test]
async fn test_empty_genre_list_is_a_valid_vocabulary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/tv/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genre_body(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let client = tmdb_client(&server);
    let policy = fast_policy();
    let mut cache = VocabularyCache::new();
    let vocabulary = cache.resolve(&client, SearchKind::Tv, &policy).await;

    assert!(vocabulary.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_degrades_to_empty_vocabulary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = tmdb_client(&server);
    let policy = fast_policy();
    let mut cache = VocabularyCache::new();
    let vocabulary = cache.resolve(&client, SearchKind::Movie, &policy).await;

    assert!(vocabulary.is_empty());
}

#[tokio::test]
async fn test_rate_limited_fetch_retries_then_resolves() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genre_body(&[(18, "드라마")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = tmdb_client(&server);
    let policy = fast_policy();
    let mut cache = VocabularyCache::new();
    let vocabulary = cache.resolve(&client, SearchKind::Movie, &policy).await;

    assert_eq!(vocabulary.name_of(18), Some("드라마"));
}
