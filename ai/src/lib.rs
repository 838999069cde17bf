//! Best-effort attendance insights.
//!
//! An [`InsightGenerator`] turns an arbitrary statistics object into an
//! [`InsightReport`]. Callers go through [`generate_or_fallback`], which never
//! fails: when the generator is unconfigured or unreachable a fixed fallback
//! report is returned instead.

mod gemini;
pub mod insights;

pub use gemini::GeminiInsights;
pub use insights::{
    InsightError, InsightGenerator, InsightReport, fallback_report, generate_or_fallback,
};
