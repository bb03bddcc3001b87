//! The two-panel dashboard: stats on one side, scouting reports on the other.

use std::sync::Arc;

use scout_rag::{
    EmbeddingProvider, ExtractiveGenerator, HashEmbeddingProvider, InMemoryVectorStore,
    QualitativeAgent, RagError, RagPipeline, TextGenerator,
};
use scout_stats::StatsService;
use serde_json::json;
use tracing::{error, info};

use crate::config::ScoutConfig;
use crate::render;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned plain text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// One user action. Each action calls exactly one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Look a player up by (partial) name.
    Player { name: String },
    /// Rank players by a metric.
    Top { metric: String, top_n: usize },
    /// Ask the scouting reports a question.
    Ask { question: String },
    /// List the metrics the loaded table can be ranked by.
    Metrics,
    /// Show what was loaded at startup.
    Status,
}

/// The reports side of the dashboard. Indexing failures at startup leave the
/// panel unavailable instead of stopping the program.
enum ReportsPanel {
    Ready(QualitativeAgent),
    Unavailable(String),
}

/// Both services, constructed once and then only read.
pub struct Dashboard {
    stats: StatsService,
    reports: ReportsPanel,
    backend: &'static str,
}

impl Dashboard {
    /// Assemble a dashboard from already built services.
    pub fn new(stats: StatsService, reports: QualitativeAgent) -> Self {
        Self { stats, reports: ReportsPanel::Ready(reports), backend: "custom" }
    }

    /// Load the stats table and index the report corpus described by `config`.
    ///
    /// Startup never fails because of data. A missing stats file leaves the
    /// stats panel unloaded, a missing report directory gives an empty corpus,
    /// and any other indexing failure (a reports path that is a file, a
    /// backend that cannot be created or reached) is logged and leaves the
    /// reports panel unavailable while the stats panel keeps working.
    pub async fn build(config: &ScoutConfig) -> Self {
        let stats = StatsService::load(&config.stats_path, config.schema.clone());
        let (reports, backend) = match backends(config) {
            Ok((embedder, generator, backend)) => {
                (index_reports(config, embedder, generator).await, backend)
            }
            Err(e) => (unavailable(config, &e), "none"),
        };
        Self::ready(stats, reports, backend)
    }

    /// Like [`build`](Self::build), but with caller-supplied backends.
    pub async fn build_with(
        config: &ScoutConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let stats = StatsService::load(&config.stats_path, config.schema.clone());
        let reports = index_reports(config, embedder, generator).await;
        Self::ready(stats, reports, "custom")
    }

    fn ready(stats: StatsService, reports: ReportsPanel, backend: &'static str) -> Self {
        let (report_count, reports_available) = match &reports {
            ReportsPanel::Ready(agent) => (agent.document_count(), true),
            ReportsPanel::Unavailable(_) => (0, false),
        };
        info!(
            stats_rows = stats.row_count(),
            report_count,
            reports_available,
            backend,
            "dashboard ready"
        );
        Self { stats, reports, backend }
    }

    /// The stats panel's service.
    pub fn stats(&self) -> &StatsService {
        &self.stats
    }

    /// The reports panel's agent, or `None` if indexing failed at startup.
    pub fn reports(&self) -> Option<&QualitativeAgent> {
        match &self.reports {
            ReportsPanel::Ready(agent) => Some(agent),
            ReportsPanel::Unavailable(_) => None,
        }
    }

    /// Whether at least one panel can serve requests. A report index that
    /// built from an empty directory still counts.
    pub fn is_usable(&self) -> bool {
        self.stats.is_loaded() || self.reports().is_some()
    }

    /// Why the reports panel is unavailable, if it is.
    pub fn reports_failure(&self) -> Option<&str> {
        match &self.reports {
            ReportsPanel::Ready(_) => None,
            ReportsPanel::Unavailable(reason) => Some(reason),
        }
    }

    /// Perform `action` and render its outcome. Service errors are rendered,
    /// not returned.
    pub async fn run(&self, action: &Action, format: OutputFormat) -> String {
        match action {
            Action::Player { name } => match self.stats.find_players(name) {
                Ok(mut matches) => {
                    let others = matches.len() - 1;
                    let record = matches.swap_remove(0);
                    render::player(&record, others, format)
                }
                Err(e) => render::stats_error(&e, format),
            },
            Action::Top { metric, top_n } => match self.stats.find_top_players(metric, *top_n) {
                Ok(rows) => render::ranking(metric, &rows, format),
                Err(e) => render::stats_error(&e, format),
            },
            Action::Ask { question } => match &self.reports {
                ReportsPanel::Ready(agent) => match agent.answer_question(question).await {
                    Ok(answer) => render::answer(question, &answer, format),
                    Err(e) => render::rag_error(&e, format),
                },
                ReportsPanel::Unavailable(reason) => {
                    render::rag_error(&RagError::Unavailable(reason.clone()), format)
                }
            },
            Action::Metrics => match self.stats.available_metrics() {
                Ok(metrics) => render::metrics(&metrics, format),
                Err(e) => render::stats_error(&e, format),
            },
            Action::Status => self.status(format),
        }
    }

    fn status(&self, format: OutputFormat) -> String {
        let agent = self.reports();
        match format {
            OutputFormat::Json => render::pretty(&json!({
                "stats_loaded": self.stats.is_loaded(),
                "stats_rows": self.stats.row_count(),
                "reports": agent.map_or(0, QualitativeAgent::document_count),
                "chunks": agent.map_or(0, QualitativeAgent::chunk_count),
                "reports_error": self.reports_failure(),
                "backend": self.backend,
            })),
            OutputFormat::Text => {
                let stats = if self.stats.is_loaded() {
                    format!("{} players", self.stats.row_count())
                } else {
                    "not loaded".to_string()
                };
                let reports = match &self.reports {
                    ReportsPanel::Ready(agent) if agent.is_ready() => format!(
                        "{} reports in {} chunks",
                        agent.document_count(),
                        agent.chunk_count()
                    ),
                    ReportsPanel::Ready(_) => "no reports loaded".to_string(),
                    ReportsPanel::Unavailable(reason) => format!("unavailable ({reason})"),
                };
                format!("Stats:   {stats}\nReports: {reports}\nBackend: {}", self.backend)
            }
        }
    }
}

async fn index_reports(
    config: &ScoutConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn TextGenerator>,
) -> ReportsPanel {
    match try_index_reports(config, embedder, generator).await {
        Ok(agent) => ReportsPanel::Ready(agent),
        Err(e) => unavailable(config, &e),
    }
}

async fn try_index_reports(
    config: &ScoutConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn TextGenerator>,
) -> Result<QualitativeAgent, RagError> {
    let pipeline = RagPipeline::builder()
        .config(config.rag.clone())
        .embedding_provider(embedder)
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()?;
    QualitativeAgent::from_directory(&config.reports_dir, pipeline, generator).await
}

fn unavailable(config: &ScoutConfig, err: &RagError) -> ReportsPanel {
    error!(
        error = %err,
        path = %config.reports_dir.display(),
        "scouting reports could not be indexed; the reports panel is unavailable"
    );
    ReportsPanel::Unavailable(err.to_string())
}

type Backends = (Arc<dyn EmbeddingProvider>, Arc<dyn TextGenerator>, &'static str);

#[cfg(feature = "gemini")]
fn backends(config: &ScoutConfig) -> Result<Backends, RagError> {
    use scout_rag::{GeminiEmbeddingProvider, GeminiGenerator};

    match (&config.api_key, config.wants_remote_backends()) {
        (Some(key), true) => Ok((
            Arc::new(GeminiEmbeddingProvider::new(key.clone())?),
            Arc::new(GeminiGenerator::new(key.clone())?),
            "gemini",
        )),
        _ => Ok(offline_backends()),
    }
}

#[cfg(not(feature = "gemini"))]
fn backends(config: &ScoutConfig) -> Result<Backends, RagError> {
    if config.wants_remote_backends() {
        tracing::warn!(
            "an API key is set but this build lacks the `gemini` feature; using offline backends"
        );
    }
    Ok(offline_backends())
}

fn offline_backends() -> Backends {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbeddingProvider::default());
    (embedder, Arc::new(ExtractiveGenerator::default()), "offline")
}
