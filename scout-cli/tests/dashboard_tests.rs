//! End-to-end tests of the dashboard over a temporary data directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use scout_cli::{Action, ConfigOverrides, Dashboard, OutputFormat, ScoutConfig};
use scout_rag::{EmbeddingProvider, ExtractiveGenerator, NO_DOCUMENTS_MESSAGE, RagError};

const STATS: &str = "\
Player,Squad,Age,Gls,Ast,xG
Bukayo Saka,Arsenal,22-010,16,9,14.3
Cole Palmer,Chelsea,21-310,22,11,16.0
Bukayo Smith,Hull City,19-001,0,0,0.1
";

fn write_data(root: &Path) {
    fs::write(root.join("stats.csv"), STATS).unwrap();
    let articles = root.join("articles");
    fs::create_dir(&articles).unwrap();
    fs::write(
        articles.join("palmer.txt"),
        "Cole Palmer is a composed left-footed playmaker who takes penalties for Chelsea.",
    )
    .unwrap();
    fs::write(
        articles.join("saka.txt"),
        "Bukayo Saka stretches defences from the right wing and creates chances for Arsenal.",
    )
    .unwrap();
}

fn config(root: &Path) -> ScoutConfig {
    ScoutConfig {
        stats_path: root.join("stats.csv"),
        reports_dir: root.join("articles"),
        offline: true,
        ..ScoutConfig::default()
    }
}

#[tokio::test]
async fn player_lookup_reports_other_matches() {
    let temp = tempfile::tempdir().unwrap();
    write_data(temp.path());
    let dashboard = Dashboard::build(&config(temp.path())).await;

    let text = dashboard
        .run(&Action::Player { name: "bukayo".into() }, OutputFormat::Text)
        .await;
    assert!(text.starts_with("Stats for Bukayo Saka"));
    assert!(text.contains("1 other player also matches"));

    let json = dashboard
        .run(&Action::Player { name: "palmer".into() }, OutputFormat::Json)
        .await;
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["player"]["Player"], "Cole Palmer");
    assert_eq!(value["player"]["xG"], 16);
    assert_eq!(value["other_matches"], 0);
}

#[tokio::test]
async fn ranking_and_errors_render() {
    let temp = tempfile::tempdir().unwrap();
    write_data(temp.path());
    let dashboard = Dashboard::build(&config(temp.path())).await;

    let json = dashboard
        .run(&Action::Top { metric: "Gls".into(), top_n: 2 }, OutputFormat::Json)
        .await;
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["player"], "Cole Palmer");
    assert_eq!(rows[1]["player"], "Bukayo Saka");

    let text = dashboard
        .run(&Action::Top { metric: "NotAColumn".into(), top_n: 5 }, OutputFormat::Text)
        .await;
    assert!(text.starts_with("[invalid input]"));
    assert!(text.contains("Gls, Ast, xG"));
}

#[tokio::test]
async fn questions_are_answered_from_reports() {
    let temp = tempfile::tempdir().unwrap();
    write_data(temp.path());
    let dashboard = Dashboard::build(&config(temp.path())).await;
    assert_eq!(dashboard.reports().unwrap().document_count(), 2);

    let question = Action::Ask { question: "Who takes penalties for Chelsea?".into() };
    let answer = dashboard.run(&question, OutputFormat::Text).await;
    assert!(answer.contains("From palmer.txt"));
}

#[tokio::test]
async fn missing_reports_give_the_fixed_answer() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("stats.csv"), STATS).unwrap();
    let dashboard = Dashboard::build(&config(temp.path())).await;

    let answer = dashboard
        .run(&Action::Ask { question: "Who is quick?".into() }, OutputFormat::Text)
        .await;
    assert_eq!(answer, NO_DOCUMENTS_MESSAGE);
    assert!(dashboard.stats().is_loaded());
}

#[tokio::test]
async fn reports_path_that_is_a_file_leaves_stats_working() {
    let temp = tempfile::tempdir().unwrap();
    write_data(temp.path());
    let config = ScoutConfig { reports_dir: temp.path().join("stats.csv"), ..config(temp.path()) };
    let dashboard = Dashboard::build(&config).await;

    assert!(dashboard.reports().is_none());
    assert!(dashboard.reports_failure().unwrap().contains("is not a directory"));
    assert!(dashboard.is_usable());

    let text = dashboard.run(&Action::Player { name: "palmer".into() }, OutputFormat::Text).await;
    assert!(text.starts_with("Stats for Cole Palmer"));

    let answer =
        dashboard.run(&Action::Ask { question: "Who is quick?".into() }, OutputFormat::Text).await;
    assert!(answer.starts_with("[unavailable] Retrieval unavailable:"));

    let status = dashboard.run(&Action::Status, OutputFormat::Text).await;
    assert!(status.contains("Stats:   3 players"));
    assert!(status.contains("Reports: unavailable ("));

    let status: serde_json::Value =
        serde_json::from_str(&dashboard.run(&Action::Status, OutputFormat::Json).await).unwrap();
    assert_eq!(status["reports"], 0);
    assert!(status["reports_error"].as_str().unwrap().contains("is not a directory"));
}

struct UnreachableEmbedder;

#[async_trait]
impl EmbeddingProvider for UnreachableEmbedder {
    async fn embed(&self, _text: &str) -> scout_rag::Result<Vec<f32>> {
        Err(RagError::Embedding {
            provider: "unreachable".into(),
            message: "connection refused".into(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

#[tokio::test]
async fn failing_embedder_disables_only_the_reports_panel() {
    let temp = tempfile::tempdir().unwrap();
    write_data(temp.path());
    let dashboard = Dashboard::build_with(
        &config(temp.path()),
        Arc::new(UnreachableEmbedder),
        Arc::new(ExtractiveGenerator::default()),
    )
    .await;

    assert!(dashboard.stats().is_loaded());
    assert!(dashboard.reports().is_none());

    let json = dashboard
        .run(&Action::Top { metric: "Gls".into(), top_n: 1 }, OutputFormat::Json)
        .await;
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(rows[0]["player"], "Cole Palmer");

    let json = dashboard
        .run(&Action::Ask { question: "Who creates chances?".into() }, OutputFormat::Json)
        .await;
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "unavailable");
    assert!(value["error"].as_str().unwrap().contains("connection refused"));

    let status = dashboard.run(&Action::Status, OutputFormat::Text).await;
    assert!(status.contains("Backend: custom"));
}

#[tokio::test]
async fn nothing_usable_when_both_panels_fail() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("reports.txt"), "not a directory").unwrap();
    let config = ScoutConfig {
        stats_path: temp.path().join("absent.csv"),
        reports_dir: temp.path().join("reports.txt"),
        offline: true,
        ..ScoutConfig::default()
    };
    let dashboard = Dashboard::build(&config).await;
    assert!(!dashboard.stats().is_loaded());
    assert!(dashboard.reports_failure().is_some());
    assert!(!dashboard.is_usable());
}

#[test]
fn flags_beat_environment_beat_file() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("scout.json");
    fs::write(
        &file,
        r#"{ "stats_path": "file.csv", "reports_dir": "file-reports", "rag": { "top_k": 2 } }"#,
    )
    .unwrap();

    let env = ConfigOverrides {
        stats_path: Some("env.csv".into()),
        reports_dir: Some("env-reports".into()),
        ..ConfigOverrides::default()
    };
    let flags =
        ConfigOverrides { stats_path: Some("flag.csv".into()), ..ConfigOverrides::default() };

    let config = ScoutConfig::resolve(Some(&file), env, flags).unwrap();
    assert_eq!(config.stats_path, Path::new("flag.csv"));
    assert_eq!(config.reports_dir, Path::new("env-reports"));
    assert_eq!(config.rag.top_k, 2);
    assert_eq!(config.rag.chunk_size, 1000);
}

#[test]
fn invalid_config_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("scout.json");

    let resolve = || {
        ScoutConfig::resolve(Some(&file), ConfigOverrides::default(), ConfigOverrides::default())
    };

    fs::write(&file, "{ not json").unwrap();
    let err = resolve().unwrap_err();
    assert!(err.to_string().starts_with("invalid config file"));

    fs::write(&file, r#"{ "rag": { "chunk_size": 100, "chunk_overlap": 100 } }"#).unwrap();
    let err = resolve().unwrap_err();
    assert!(err.to_string().starts_with("invalid retrieval settings"));

    let missing = ScoutConfig::resolve(
        Some(&temp.path().join("absent.json")),
        ConfigOverrides::default(),
        ConfigOverrides::default(),
    );
    assert!(missing.is_err());
}
