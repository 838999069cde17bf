use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const FALLBACK_SUMMARY: &str = "Unable to generate AI insights at this moment.";
pub const FALLBACK_RECOMMENDATION: &str =
    "Ensure all students mark attendance via the verified protocol.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub summary: String,
    #[serde(default)]
    pub at_risk_students: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("insight generator is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, stats: &serde_json::Value) -> Result<InsightReport, InsightError>;
}

pub fn fallback_report() -> InsightReport {
    InsightReport {
        summary: FALLBACK_SUMMARY.to_string(),
        at_risk_students: Vec::new(),
        recommendations: vec![FALLBACK_RECOMMENDATION.to_string()],
    }
}

/// Runs `generator`, substituting [`fallback_report`] on any failure.
pub async fn generate_or_fallback(
    generator: &dyn InsightGenerator,
    stats: &serde_json::Value,
) -> InsightReport {
    match generator.generate(stats).await {
        Ok(report) => report,
        Err(InsightError::NotConfigured) => {
            tracing::debug!("Insight generator not configured, returning fallback report");
            fallback_report()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Insight generation failed, returning fallback report");
            fallback_report()
        }
    }
}
