//! Analysis Orchestrator
//!
//! Runs one analysis end to end: load the batch, make exactly one bounded
//! AI attempt, merge its verdicts or fall back to local scoring, persist
//! every evaluation behind a join barrier, then draft and persist the three
//! outbound messages. A failed AI call is recovered; a failed message
//! generation only trims the result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use procura_models::{
    AnalysisStatus, Category, GeneratedMessage, MessageType, NewMessage, SupplierRecord,
};

use crate::analyzer::{AiAnalysis, AiAnalyzer};
use crate::message_generator::MessageGenerator;
use crate::scoring;
use crate::store::{AnalysisStore, MessageStore, SupplierStore};

/// Description recorded when the local fallback completes a run.
const FALLBACK_DESCRIPTION: &str = "Basic analysis performed (AI unavailable)";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Analysis not found")]
    NotFound,

    #[error("No suppliers to analyze")]
    NoSuppliers,

    #[error("No valid supplier data to analyze")]
    NoValidData,

    /// AI failed and the fallback could not be persisted either
    #[error("AI analysis failed: {0}")]
    Ai(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Where a supplier's evaluation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Ai,
    Local,
}

/// Final per-supplier result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierOutcome {
    pub supplier_id: Uuid,
    pub name: String,
    pub performance: f64,
    pub category: Category,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub source: ScoreSource,
}

/// Everything a completed run produced.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub analysis_id: Uuid,
    pub status: AnalysisStatus,
    pub fallback: bool,
    pub summary: String,
    pub suppliers: Vec<SupplierOutcome>,
    pub messages: Option<Vec<GeneratedMessage>>,
    pub suppliers_updated: usize,
    pub messages_created: usize,
}

/// Orchestrates analysis runs over injected collaborators.
pub struct AnalysisEngine {
    analyses: Arc<dyn AnalysisStore>,
    suppliers: Arc<dyn SupplierStore>,
    messages: Arc<dyn MessageStore>,
    analyzer: Arc<dyn AiAnalyzer>,
    generator: Arc<dyn MessageGenerator>,
    ai_timeout: Duration,
}

impl AnalysisEngine {
    pub fn new(
        analyses: Arc<dyn AnalysisStore>,
        suppliers: Arc<dyn SupplierStore>,
        messages: Arc<dyn MessageStore>,
        analyzer: Arc<dyn AiAnalyzer>,
        generator: Arc<dyn MessageGenerator>,
        ai_timeout: Duration,
    ) -> Self {
        Self {
            analyses,
            suppliers,
            messages,
            analyzer,
            generator,
            ai_timeout,
        }
    }

    /// Execute one run. Re-running an already evaluated analysis simply
    /// overwrites the previous evaluations.
    pub async fn run(&self, analysis_id: Uuid, owner_id: Uuid) -> Result<RunResult, EngineError> {
        let analysis = self
            .analyses
            .find_for_owner(analysis_id, owner_id)
            .await?
            .ok_or(EngineError::NotFound)?;

        let records = self.suppliers.find_by_analysis(analysis_id).await?;
        if records.is_empty() {
            // Precondition failure, no state transition
            return Err(EngineError::NoSuppliers);
        }

        // Records may arrive through import paths that skip validation
        let valid: Vec<SupplierRecord> =
            records.into_iter().filter(|r| is_analyzable(r)).collect();
        if valid.is_empty() {
            return Err(EngineError::NoValidData);
        }

        self.analyses
            .set_status(analysis_id, AnalysisStatus::Processing)
            .await?;
        info!(%analysis_id, suppliers = valid.len(), "Analysis run started");

        // Exactly one AI attempt; a timeout counts as a failure
        let ai_result = match timeout(self.ai_timeout, self.analyzer.analyze(&valid)).await {
            Ok(Ok(ai)) => Ok(ai),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "analyzer timed out after {}s",
                self.ai_timeout.as_secs()
            )),
        };

        let (outcomes, summary, fallback) = match ai_result {
            Ok(ai) => {
                let outcomes = merge_ai_results(&valid, &ai);
                self.persist_evaluations(&outcomes).await?;
                self.analyses.complete(analysis_id, &ai.summary, false).await?;
                (outcomes, ai.summary, false)
            }
            Err(ai_error) => {
                warn!(%analysis_id, error = %ai_error, "AI analysis failed, attempting local fallback");
                self.analyses
                    .set_status(analysis_id, AnalysisStatus::Failed)
                    .await?;

                let outcomes = local_outcomes(&valid);
                let summary = fallback_summary(&valid, &outcomes);
                match self.persist_fallback(analysis_id, &outcomes).await {
                    Ok(()) => (outcomes, summary, true),
                    Err(e) => {
                        error!(%analysis_id, error = %e, "Fallback failed, analysis stays FAILED");
                        return Err(EngineError::Ai(ai_error));
                    }
                }
            }
        };

        // Evaluations are committed; message failure only trims the result
        let messages = match self
            .generate_messages(analysis_id, &outcomes, &summary, &analysis.title)
            .await
        {
            Ok(messages) => Some(messages),
            Err(e) => {
                warn!(%analysis_id, error = %e, "Message generation failed, returning partial result");
                None
            }
        };

        let suppliers_updated = outcomes.len();
        let messages_created = messages.as_ref().map(Vec::len).unwrap_or(0);
        info!(%analysis_id, suppliers_updated, messages_created, fallback, "Analysis run finished");

        Ok(RunResult {
            analysis_id,
            status: AnalysisStatus::Completed,
            fallback,
            summary,
            suppliers: outcomes,
            messages,
            suppliers_updated,
            messages_created,
        })
    }

    /// Concurrent per-supplier writes; all must land before messages start.
    async fn persist_evaluations(&self, outcomes: &[SupplierOutcome]) -> Result<()> {
        let updates = outcomes.iter().map(|outcome| {
            self.suppliers
                .set_evaluation(outcome.supplier_id, outcome.performance, outcome.category)
        });
        futures::future::try_join_all(updates).await?;
        Ok(())
    }

    async fn persist_fallback(&self, analysis_id: Uuid, outcomes: &[SupplierOutcome]) -> Result<()> {
        self.persist_evaluations(outcomes).await?;
        self.analyses
            .complete(analysis_id, FALLBACK_DESCRIPTION, true)
            .await
    }

    async fn generate_messages(
        &self,
        analysis_id: Uuid,
        outcomes: &[SupplierOutcome],
        summary: &str,
        title: &str,
    ) -> Result<Vec<GeneratedMessage>> {
        let set = self.generator.generate(outcomes, summary, title).await?;

        let drafts = [
            (MessageType::Supplier, set.supplier_message),
            (MessageType::Buyer, set.buyer_message),
            (MessageType::Management, set.management_message),
        ];

        let mut persisted = Vec::with_capacity(drafts.len());
        for (message_type, draft) in drafts {
            let message = self
                .messages
                .create(NewMessage::new(
                    analysis_id,
                    message_type,
                    draft.subject,
                    draft.content,
                ))
                .await?;
            persisted.push(message);
        }

        Ok(persisted)
    }
}

/// The five core fields present and in range.
fn is_analyzable(record: &SupplierRecord) -> bool {
    !record.name.trim().is_empty()
        && record.quantity > 0
        && (0.0..=10.0).contains(&record.quality)
        && record.delivery_delay >= 0
        && record.price > 0.0
}

/// Adopt AI verdicts by exact name match; score omissions locally so no
/// record leaves a successful run unevaluated.
fn merge_ai_results(records: &[SupplierRecord], ai: &AiAnalysis) -> Vec<SupplierOutcome> {
    records
        .iter()
        .map(|record| {
            match ai
                .supplier_analysis
                .iter()
                .find(|assessment| assessment.name == record.name)
            {
                Some(assessment) => SupplierOutcome {
                    supplier_id: record.id,
                    name: record.name.clone(),
                    performance: assessment.performance_score,
                    category: assessment.category,
                    strengths: assessment.strengths.clone(),
                    weaknesses: assessment.weaknesses.clone(),
                    recommendations: assessment.recommendations.clone(),
                    source: ScoreSource::Ai,
                },
                None => {
                    warn!(supplier = %record.name, "AI response omitted supplier, scoring locally");
                    local_outcome(record)
                }
            }
        })
        .collect()
}

fn local_outcome(record: &SupplierRecord) -> SupplierOutcome {
    let score = scoring::score(record);
    SupplierOutcome {
        supplier_id: record.id,
        name: record.name.clone(),
        performance: score as f64,
        category: scoring::categorize(score),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        recommendations: Vec::new(),
        source: ScoreSource::Local,
    }
}

fn local_outcomes(records: &[SupplierRecord]) -> Vec<SupplierOutcome> {
    records.iter().map(local_outcome).collect()
}

fn fallback_summary(records: &[SupplierRecord], outcomes: &[SupplierOutcome]) -> String {
    let count = records.len();
    let avg_quality = records.iter().map(|r| r.quality).sum::<f64>() / count as f64;
    let avg_delay =
        records.iter().map(|r| r.delivery_delay as f64).sum::<f64>() / count as f64;
    let tally =
        |category: Category| outcomes.iter().filter(|o| o.category == category).count();

    format!(
        "{} suppliers analyzed. Average quality: {:.1}/10, average delivery delay: {:.1} days. \
         Categories: {} excellent, {} good, {} average, {} poor, {} critical.",
        count,
        avg_quality,
        avg_delay,
        tally(Category::Excellent),
        tally(Category::Good),
        tally(Category::Average),
        tally(Category::Poor),
        tally(Category::Critical),
    )
}
