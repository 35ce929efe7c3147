use std::fmt;

use serde::{Deserialize, Serialize};

/// Attached to every analysis. Never taken from the model reply.
pub const DISCLAIMER: &str = "This AI analysis is for educational/demonstration purposes only. \
It is not a medical diagnosis. Always consult qualified healthcare professionals for medical decisions.";

/// Placeholder used in reports when no patient name is supplied.
pub const REDACTED_NAME: &str = "[REDACTED]";

/// Scan category derived from a caller-supplied hint. Only drives prompt selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Breast,
    Pcos,
    General,
}

impl ScanType {
    /// Case-insensitive substring match. Breast is checked before PCOS.
    pub fn from_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
            return Self::General;
        };
        let lower = hint.to_lowercase();
        if lower.contains("breast") {
            Self::Breast
        } else if ["pcos", "ovarian", "pelvic"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Self::Pcos
        } else {
            Self::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breast => "breast",
            Self::Pcos => "pcos",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized analysis. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scan_type: String,
    pub classification: String,
    pub confidence: String,
    pub findings: Vec<String>,
    pub report: String,
    pub recommendations: Vec<String>,
    /// UTC, RFC 3339.
    pub timestamp: String,
    pub disclaimer: String,
}

/// An uploaded scan as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    /// Content type declared by the client, not sniffed.
    pub content_type: Option<String>,
}

/// Patient identifiers printed on a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub patient_id: String,
    pub patient_name: Option<String>,
}

impl PatientInfo {
    pub fn display_name(&self) -> &str {
        self.patient_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(REDACTED_NAME)
    }
}
