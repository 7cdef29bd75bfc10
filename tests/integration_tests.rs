//! Integration tests for devscout
//!
//! These tests drive the public API end to end against a mocked GitHub.

use devscout::config::{Config, PacingConfig};
use devscout::github::GitHubClient;
use devscout::models::{ScoreDetails, SearchCriteria};
use devscout::scoring::ScoreCalculator;
use devscout::search::Orchestrator;
use devscout::sources::{ExtractionChain, SourceError};
use mockito::{Matcher, ServerGuard};

// "Contact: maintainer@proj.dev\n"
const README_WITH_EMAIL: &str = "Q29udGFjdDogbWFpbnRhaW5lckBw\ncm9qLmRldgo=\n";

fn config_for(server: &ServerGuard) -> Config {
    Config::default()
        .with_base_urls(&server.url(), &server.url())
        .with_token(None)
        .with_pacing(PacingConfig::disabled())
}

async fn mock_user(server: &mut ServerGuard, login: &str, public_repos: u64, followers: u64) {
    server
        .mock("GET", format!("/users/{}", login).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"login": "{}", "public_repos": {}, "followers": {}}}"#,
            login, public_repos, followers
        ))
        .create_async()
        .await;
}

async fn mock_repos(server: &mut ServerGuard, login: &str, body: &str) {
    server
        .mock("GET", format!("/users/{}/repos", login).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
}

async fn mock_profile(server: &mut ServerGuard, login: &str, status: usize, html: &str) {
    server
        .mock("GET", format!("/{}", login).as_str())
        .with_status(status)
        .with_header("content-type", "text/html")
        .with_body(html)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_search_keeps_only_users_with_email() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/search/users")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "language:rust location:seoul".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"total_count": 2, "items": [
                {"login": "alice", "html_url": "https://github.com/alice"},
                {"login": "bob"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    // alice: no profile page, README of the top repository has an address
    mock_profile(&mut server, "alice", 404, "").await;
    mock_repos(
        &mut server,
        "alice",
        r#"[
            {"name": "other", "stargazers_count": 1, "forks_count": 0},
            {"name": "proj", "stargazers_count": 10, "forks_count": 2}
        ]"#,
    )
    .await;
    server
        .mock("GET", "/repos/alice/proj/readme")
        .with_status(200)
        .with_body(format!(
            r#"{{"name": "README.md", "encoding": "base64", "content": {:?}}}"#,
            README_WITH_EMAIL
        ))
        .create_async()
        .await;
    mock_user(&mut server, "alice", 2, 3).await;

    // bob: nothing on the profile, no repositories
    mock_profile(&mut server, "bob", 200, "<html><body><p>Hello</p></body></html>").await;
    mock_repos(&mut server, "bob", "[]").await;

    let orchestrator = Orchestrator::from_config(&config_for(&server)).unwrap();
    let results = orchestrator
        .search(&SearchCriteria::new("rust", "seoul"))
        .await;

    search.assert_async().await;
    assert_eq!(results.len(), 1);

    let alice = &results[0];
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.email.as_ref().unwrap().as_str(), "maintainer@proj.dev");
    // 2 repos + 3*2 followers + 11*3 stars + 2*1.5 forks
    assert_eq!(alice.score, 44.0);
    assert_eq!(alice.total_stars, 11);
    assert_eq!(alice.total_forks, 2);
    assert_eq!(alice.html_url(), Some("https://github.com/alice"));
}

#[tokio::test]
async fn test_search_ranks_by_score() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/users")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"total_count": 2, "items": [{"login": "quiet"}, {"login": "star"}]}"#)
        .create_async()
        .await;

    for login in ["quiet", "star"] {
        mock_profile(
            &mut server,
            login,
            200,
            &format!(
                r#"<html><body><ul><li itemprop="email"><a href="mailto:{0}@dev.io">{0}@dev.io</a></li></ul></body></html>"#,
                login
            ),
        )
        .await;
    }

    mock_user(&mut server, "quiet", 1, 0).await;
    mock_repos(&mut server, "quiet", r#"[{"name": "a", "stargazers_count": 0, "forks_count": 0}]"#).await;
    mock_user(&mut server, "star", 4, 10).await;
    mock_repos(&mut server, "star", r#"[{"name": "b", "stargazers_count": 50, "forks_count": 6}]"#).await;

    let orchestrator = Orchestrator::from_config(&config_for(&server)).unwrap();
    let results = orchestrator
        .search(&SearchCriteria::new("go", "lisbon"))
        .await;

    let order: Vec<&str> = results.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(order, vec!["star", "quiet"]);
    assert_eq!(results[0].score, 183.0);
    assert_eq!(results[1].score, 1.0);
    assert_eq!(results[0].email.as_ref().unwrap().as_str(), "star@dev.io");
}

#[tokio::test]
async fn test_search_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/users")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("x-ratelimit-remaining", "0")
        .create_async()
        .await;

    let orchestrator = Orchestrator::from_config(&config_for(&server)).unwrap();
    let criteria = SearchCriteria::new("rust", "seoul");

    assert!(matches!(
        orchestrator.try_search(&criteria, |_| {}).await,
        Err(SourceError::RateLimit)
    ));
    assert!(orchestrator.search(&criteria).await.is_empty());
}

#[tokio::test]
async fn test_extract_email_falls_back_to_readme() {
    let mut server = mockito::Server::new_async().await;
    mock_profile(
        &mut server,
        "dana",
        200,
        "<html><body><p>commits as 4242+dana@users.noreply.github.com</p></body></html>",
    )
    .await;
    mock_repos(&mut server, "dana", r#"[{"name": "proj", "stargazers_count": 3, "forks_count": 0}]"#).await;
    server
        .mock("GET", "/repos/dana/proj/readme")
        .with_status(200)
        .with_body(format!(
            r#"{{"name": "README.md", "encoding": "base64", "content": {:?}}}"#,
            README_WITH_EMAIL
        ))
        .create_async()
        .await;

    let client = GitHubClient::new(&config_for(&server)).unwrap();
    let chain = ExtractionChain::github(client);

    let outcome = chain.lookup("dana").await;
    let discovery = outcome.discovery.as_ref().unwrap();
    assert_eq!(discovery.email.as_str(), "maintainer@proj.dev");
    assert_eq!(discovery.source, "readme");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].source, "profile");

    assert_eq!(
        chain.extract_email("dana").await.map(|e| e.to_string()),
        Some("maintainer@proj.dev".to_string())
    );
}

#[tokio::test]
async fn test_extract_email_absent_everywhere() {
    let mut server = mockito::Server::new_async().await;
    mock_profile(&mut server, "ghost", 404, "").await;
    server
        .mock("GET", "/users/ghost/repos")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let chain = ExtractionChain::github(GitHubClient::new(&config_for(&server)).unwrap());
    assert!(chain.extract_email("ghost").await.is_none());
}

#[tokio::test]
async fn test_score_user_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    mock_user(&mut server, "octo", 10, 5).await;
    mock_repos(
        &mut server,
        "octo",
        r#"[
            {"name": "a", "stargazers_count": 15, "forks_count": 3},
            {"name": "b", "stargazers_count": 5, "forks_count": 1}
        ]"#,
    )
    .await;

    let config = config_for(&server);
    let scorer = ScoreCalculator::from_config(GitHubClient::new(&config).unwrap(), &config);
    let card = scorer.score_user("octo").await;

    assert_eq!(card.score, 86.0);
    assert_eq!(card.details, Some(ScoreDetails::new(5, 10, 20, 4)));
}

#[tokio::test]
async fn test_score_user_missing_is_zero() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users/nobody")
        .with_status(404)
        .create_async()
        .await;

    let config = config_for(&server);
    let scorer = ScoreCalculator::from_config(GitHubClient::new(&config).unwrap(), &config);
    let card = scorer.score_user("nobody").await;

    assert_eq!(card.score, 0.0);
    assert!(card.details.is_none());
}
