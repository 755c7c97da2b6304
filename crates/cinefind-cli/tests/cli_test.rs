#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::process::Output;

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::{PredicateBooleanExt, predicate};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: [&str; 6] = [
    "TMDB_API_KEY",
    "TMDB_BASE_URL",
    "APPWRITE_ENDPOINT",
    "APPWRITE_PROJECT_ID",
    "APPWRITE_DATABASE_ID",
    "APPWRITE_COLLECTION_ID",
];

/// Command with a private config dir and no inherited cinefind variables.
fn isolated_cmd(dir: &tempfile::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cinefind");
    for key in ENV_VARS {
        cmd.env_remove(key);
    }
    cmd.env("RUST_LOG", "info").arg("--dir").arg(dir.path());
    cmd
}

/// Runs `cmd` off the async runtime so the mock server keeps serving.
async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("popular"))
        .stdout(predicate::str::contains("trending"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("top-searches"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--no-record"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_missing_api_key_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    isolated_cmd(&dir)
        .arg("popular")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is required"));
}

#[test]
fn test_api_key_from_config_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_key = \"from-file\"\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    // Act & Assert (key accepted, then the bad base URL is reported)
    isolated_cmd(&dir)
        .arg("popular")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid TMDB base URL"));
}

#[test]
fn test_top_searches_requires_store() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    isolated_cmd(&dir)
        .env("TMDB_API_KEY", "test-key")
        .arg("top-searches")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Appwrite is not configured"));
}

#[tokio::test]
async fn test_popular_lists_movies() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("api_key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                include_str!("../../../fixtures/tmdb/movie_popular.json"),
                "application/json",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.env("TMDB_API_KEY", "test-key")
        .env("TMDB_BASE_URL", format!("{}/3", server.uri()))
        .arg("popular");

    // Act
    let output = run(cmd).await;

    // Assert
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("The Wild Robot"))
        .stdout(predicate::str::contains("Total: 6 movies"));
}

#[tokio::test]
async fn test_trending_lists_top_five() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/trending/movie/day"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                include_str!("../../../fixtures/tmdb/trending_movie_day.json"),
                "application/json",
            ),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.env("TMDB_API_KEY", "test-key")
        .env("TMDB_BASE_URL", format!("{}/3/", server.uri()))
        .arg("trending");

    // Act
    let output = run(cmd).await;

    // Assert
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("War of the Worlds"))
        .stdout(predicate::str::contains("KPop Demon Hunters").not())
        .stdout(predicate::str::contains("Total: 5 movies"));
}

#[tokio::test]
async fn test_search_failure_reports_fixed_message() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.env("TMDB_API_KEY", "test-key")
        .env("TMDB_BASE_URL", format!("{}/3", server.uri()))
        .args(["search", "--query", "dune"]);

    // Act
    let output = run(cmd).await;

    // Assert
    output
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error fetching movies, please try again later",
        ));
}

#[tokio::test]
async fn test_search_without_results() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "zzzz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                include_str!("../../../fixtures/tmdb/search_movie_empty.json"),
                "application/json",
            ),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.env("TMDB_API_KEY", "test-key")
        .env("TMDB_BASE_URL", format!("{}/3", server.uri()))
        .args(["search", "--query", "zzzz"]);

    // Act
    let output = run(cmd).await;

    // Assert
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("No movies found!"));
}
