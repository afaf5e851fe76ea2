//! Request and response payloads for the analysis service.
//!
//! The client treats the domain-specific fields as opaque JSON: it
//! serializes what it is given and deserializes what it receives, without
//! re-scoring or re-validating anything. Only the envelope structure is
//! typed.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Analysis request sent to `POST /analyze`.
///
/// Assembled by the caller; classification hints, organization scoring
/// configuration, and analysis options pass through untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Extracted document text.
    pub document_content: String,
    /// Document format hint, e.g. `"pdf"`.
    pub document_type: String,
    /// Classification hints (type/category/confidence), opaque here.
    pub classification: JsonValue,
    /// Organization scoring configuration (weights, custom rules,
    /// templates), opaque here.
    pub organization_config: JsonValue,
    /// Analysis options (depth, report detail), opaque here.
    pub analysis_options: JsonValue,
    pub metadata: RequestMetadata,
}

/// Document bookkeeping attached to an [`AnalysisRequest`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub document_id: String,
    pub file_size: u64,
    /// RFC 3339 timestamp of the original upload.
    pub upload_date: String,
}

/// Remote processing status reported in an [`AnalysisResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

/// Analysis result returned by `POST /analyze`, unmodified by this client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: String,
    pub document_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub status: AnalysisStatus,
    pub results: AnalysisFindings,
    /// Server-side processing time in milliseconds.
    #[serde(default)]
    pub processing_time: Option<f64>,
    /// Error description when `status` is `Failed`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Scores and findings produced by the remote analysis engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisFindings {
    pub conformity_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub problems: Vec<JsonValue>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub metrics: JsonValue,
    #[serde(default)]
    pub categories: JsonValue,
    #[serde(default)]
    pub ai_used: bool,
}

/// Service health report from `GET /health`.
///
/// The service has reported two shapes over time (with and without the
/// per-subsystem flags), so everything beyond `status` is optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` or `"unhealthy"`.
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Service uptime in seconds.
    #[serde(default)]
    pub uptime: Option<f64>,
    /// Per-subsystem readiness flags (ocr/classification/analysis).
    #[serde(default)]
    pub services: Option<JsonValue>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Classification result from `POST /classify`, opaque to this client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentClassification(pub JsonValue);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn analysis_result_decodes_full_payload() {
        let body = json!({
            "analysis_id": "an-1",
            "document_id": "doc-9",
            "organization_id": "org-2",
            "status": "completed",
            "results": {
                "conformity_score": 87.5,
                "confidence": 0.92,
                "problems": [{"severity": "high", "clause": "4.2"}],
                "recommendations": ["review clause 4.2"],
                "metrics": {"rules_evaluated": 120},
                "categories": {"legal": 80},
                "ai_used": true
            },
            "processing_time": 1523.0
        });

        let result: AnalysisResult =
            serde_json::from_value(body).expect("full payload must decode");
        assert_eq!(result.status, AnalysisStatus::Completed);
        assert_eq!(result.results.conformity_score, 87.5);
        assert_eq!(result.results.recommendations.len(), 1);
        assert!(result.results.ai_used);
        assert!(result.error.is_none());
    }

    #[test]
    fn analysis_result_tolerates_sparse_findings() {
        let body = json!({
            "analysis_id": "an-2",
            "document_id": "doc-1",
            "status": "failed",
            "results": {"conformity_score": 0.0, "confidence": 0.0},
            "error": "OCR stage crashed"
        });

        let result: AnalysisResult =
            serde_json::from_value(body).expect("sparse payload must decode");
        assert_eq!(result.status, AnalysisStatus::Failed);
        assert!(result.results.problems.is_empty());
        assert_eq!(result.error.as_deref(), Some("OCR stage crashed"));
    }

    #[test]
    fn health_status_accepts_both_historical_shapes() {
        let with_uptime: HealthStatus = serde_json::from_value(json!({
            "status": "healthy",
            "version": "1.0.0",
            "timestamp": "2026-08-27T00:00:00Z",
            "uptime": 3600.0
        }))
        .expect("uptime shape must decode");
        assert!(with_uptime.is_healthy());

        let with_services: HealthStatus = serde_json::from_value(json!({
            "status": "unhealthy",
            "services": {"ocr": true, "classification": false, "analysis": true}
        }))
        .expect("services shape must decode");
        assert!(!with_services.is_healthy());
        assert!(with_services.services.is_some());
    }

    #[test]
    fn request_round_trips_opaque_fields_untouched() {
        let request = AnalysisRequest {
            document_content: "EDITAL DE LICITAÇÃO...".to_owned(),
            document_type: "pdf".to_owned(),
            classification: json!({"type": "edital", "confidence": 0.95}),
            organization_config: json!({"weights": {"legal": 25, "clarity": 25}}),
            analysis_options: json!({"analysisDepth": "comprehensive"}),
            metadata: RequestMetadata {
                document_id: "doc-1".to_owned(),
                file_size: 1_024_000,
                upload_date: "2026-08-27T00:00:00Z".to_owned(),
            },
        };

        let encoded = serde_json::to_value(&request).expect("request must serialize");
        assert_eq!(encoded["classification"]["confidence"], 0.95);
        assert_eq!(encoded["organization_config"]["weights"]["legal"], 25);
        assert_eq!(encoded["metadata"]["file_size"], 1_024_000);
    }
}
