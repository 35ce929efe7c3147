use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::types::{AnalysisResult, DISCLAIMER};

const DEFAULT_SCAN_TYPE: &str = "unknown";
const DEFAULT_CLASSIFICATION: &str = "inconclusive";
const DEFAULT_CONFIDENCE: &str = "low";
const DEFAULT_REPORT: &str = "Analysis completed. Please review findings.";
const DEFAULT_RECOMMENDATIONS: &[&str] = &["Consult a medical professional for definitive diagnosis"];

pub const FAILED_CLASSIFICATION: &str = "analysis_failed";
const FAILED_FINDINGS: &[&str] = &["Unable to parse AI response"];
const FAILED_RECOMMENDATIONS: &[&str] = &["Please try again or consult a medical professional"];

/// Ways of pulling a JSON object out of a model reply, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// The whole reply is JSON.
    Direct,
    /// JSON inside a ```json fenced block.
    FencedBlock,
    /// From the first `{` to the last `}`. Greedy: trailing prose with braces
    /// is swallowed and makes the span invalid.
    BraceSpan,
}

impl ParseStrategy {
    pub fn all() -> &'static [ParseStrategy] {
        &[Self::Direct, Self::FencedBlock, Self::BraceSpan]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::FencedBlock => "fenced_block",
            Self::BraceSpan => "brace_span",
        }
    }

    /// Apply this strategy. `None` unless it yields a JSON object.
    pub fn apply(&self, reply: &str) -> Option<Map<String, Value>> {
        match self {
            Self::Direct => parse_object(reply),
            Self::FencedBlock => fenced_json_block(reply).and_then(parse_object),
            Self::BraceSpan => brace_span(reply).and_then(parse_object),
        }
    }
}

/// Run the strategies in order and return the first object found.
pub fn extract_json_object(reply: &str) -> Option<(ParseStrategy, Map<String, Value>)> {
    ParseStrategy::all()
        .iter()
        .find_map(|strategy| strategy.apply(reply).map(|obj| (*strategy, obj)))
}

/// Normalize a raw model reply into a fully populated `AnalysisResult`.
///
/// Total: never fails. Unparseable replies produce the `analysis_failed`
/// record carrying the raw text as its report. `now` becomes the timestamp.
pub fn normalize_reply(reply: &str, now: DateTime<Utc>) -> AnalysisResult {
    let timestamp = format_timestamp(now);

    match extract_json_object(reply) {
        Some((strategy, object)) => {
            tracing::debug!(strategy = strategy.as_str(), "Model reply parsed");
            from_object(&object, timestamp)
        }
        None => {
            tracing::warn!(
                reply_len = reply.len(),
                "Model reply is not parseable JSON, returning fallback analysis"
            );
            fallback(reply, timestamp)
        }
    }
}

/// RFC 3339 in UTC with a `Z` suffix.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn fenced_json_block(reply: &str) -> Option<&str> {
    const OPEN: &str = "```json";
    let content_start = reply.find(OPEN)? + OPEN.len();
    let content_len = reply[content_start..].find("```")?;
    if content_len == 0 {
        return None;
    }
    Some(reply[content_start..content_start + content_len].trim())
}

fn brace_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn from_object(object: &Map<String, Value>, timestamp: String) -> AnalysisResult {
    AnalysisResult {
        scan_type: text_field(object, "scan_type", DEFAULT_SCAN_TYPE),
        classification: text_field(object, "classification", DEFAULT_CLASSIFICATION),
        confidence: text_field(object, "confidence", DEFAULT_CONFIDENCE),
        findings: list_field(object, "findings", &[]),
        report: text_field(object, "report", DEFAULT_REPORT),
        recommendations: list_field(object, "recommendations", DEFAULT_RECOMMENDATIONS),
        timestamp,
        disclaimer: DISCLAIMER.to_string(),
    }
}

fn fallback(reply: &str, timestamp: String) -> AnalysisResult {
    AnalysisResult {
        scan_type: DEFAULT_SCAN_TYPE.to_string(),
        classification: FAILED_CLASSIFICATION.to_string(),
        confidence: DEFAULT_CONFIDENCE.to_string(),
        findings: to_strings(FAILED_FINDINGS),
        report: reply.to_string(),
        recommendations: to_strings(FAILED_RECOMMENDATIONS),
        timestamp,
        disclaimer: DISCLAIMER.to_string(),
    }
}

/// Strings are copied verbatim; other scalars keep their JSON text.
fn text_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(value) => value_to_text(value),
    }
}

/// Arrays map item-wise; a lone scalar becomes a one-element list.
fn list_field(object: &Map<String, Value>, key: &str, default: &[&str]) -> Vec<String> {
    match object.get(key) {
        None | Some(Value::Null) => to_strings(default),
        Some(Value::Array(items)) => items.iter().map(value_to_text).collect(),
        Some(value) => vec![value_to_text(value)],
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn assert_fully_populated(result: &AnalysisResult) {
        assert!(!result.scan_type.is_empty());
        assert!(!result.classification.is_empty());
        assert!(!result.confidence.is_empty());
        assert!(!result.recommendations.is_empty());
        assert!(!result.timestamp.is_empty());
        assert_eq!(result.disclaimer, DISCLAIMER);
    }

    #[test]
    fn exact_json_round_trips_verbatim() {
        let reply = r#"{
            "scan_type": "breast ultrasound",
            "classification": "benign",
            "confidence": "high",
            "findings": ["Oval mass", "Circumscribed margins"],
            "report": "Well-defined hypoechoic lesion at 10 o'clock.",
            "recommendations": ["Short-interval follow-up", "Compare with priors"]
        }"#;
        let result = normalize_reply(reply, fixed_now());
        assert_eq!(result.scan_type, "breast ultrasound");
        assert_eq!(result.classification, "benign");
        assert_eq!(result.confidence, "high");
        assert_eq!(result.findings, vec!["Oval mass", "Circumscribed margins"]);
        assert_eq!(result.report, "Well-defined hypoechoic lesion at 10 o'clock.");
        assert_eq!(
            result.recommendations,
            vec!["Short-interval follow-up", "Compare with priors"]
        );
        assert_eq!(result.timestamp, "2026-03-14T09:26:53.000000Z");
    }

    #[test]
    fn plain_text_falls_back() {
        let result = normalize_reply("not json at all", fixed_now());
        assert_eq!(result.scan_type, "unknown");
        assert_eq!(result.classification, "analysis_failed");
        assert_eq!(result.confidence, "low");
        assert_eq!(result.findings, vec!["Unable to parse AI response"]);
        assert_eq!(result.report, "not json at all");
        assert_eq!(
            result.recommendations,
            vec!["Please try again or consult a medical professional"]
        );
        assert_fully_populated(&result);
    }

    #[test]
    fn fenced_block_with_defaults() {
        let reply = "```json\n{\"scan_type\":\"x-ray\",\"classification\":\"normal\"}\n```";
        let result = normalize_reply(reply, fixed_now());
        assert_eq!(result.scan_type, "x-ray");
        assert_eq!(result.classification, "normal");
        assert_eq!(result.confidence, "low");
        assert!(result.findings.is_empty());
        assert_eq!(result.report, "Analysis completed. Please review findings.");
        assert_eq!(
            result.recommendations,
            vec!["Consult a medical professional for definitive diagnosis"]
        );
    }

    #[test]
    fn fenced_block_surrounded_by_prose() {
        let reply = "Here is my analysis:\n```json\n{\"classification\": \"suspicious\"}\n```\nLet me know {if} you need more.";
        let (strategy, object) = extract_json_object(reply).unwrap();
        assert_eq!(strategy, ParseStrategy::FencedBlock);
        assert_eq!(object["classification"], "suspicious");
    }

    #[test]
    fn prose_wrapped_object_uses_brace_span() {
        let reply = "Sure! {\"scan_type\": \"MRI\", \"confidence\": \"medium\"} Hope this helps.";
        let (strategy, _) = extract_json_object(reply).unwrap();
        assert_eq!(strategy, ParseStrategy::BraceSpan);
        let result = normalize_reply(reply, fixed_now());
        assert_eq!(result.scan_type, "MRI");
        assert_eq!(result.confidence, "medium");
        assert_eq!(result.classification, "inconclusive");
    }

    #[test]
    fn direct_parse_wins_first() {
        let (strategy, _) = extract_json_object("{\"scan_type\":\"ct\"}").unwrap();
        assert_eq!(strategy, ParseStrategy::Direct);
    }

    #[test]
    fn greedy_brace_span_swallows_trailing_braces() {
        let reply = "Result {\"classification\": \"benign\"} note: {see above}";
        let result = normalize_reply(reply, fixed_now());
        assert_eq!(result.classification, "analysis_failed");
        assert_eq!(result.report, reply);
    }

    #[test]
    fn unclosed_fence_falls_through_to_brace_span() {
        let reply = "```json\n{\"classification\": \"normal\"}";
        let (strategy, object) = extract_json_object(reply).unwrap();
        assert_eq!(strategy, ParseStrategy::BraceSpan);
        assert_eq!(object["classification"], "normal");
    }

    #[test]
    fn non_object_json_is_not_accepted() {
        let result = normalize_reply("[1, 2, 3]", fixed_now());
        assert_eq!(result.classification, "analysis_failed");
        let result = normalize_reply("\"just a string\"", fixed_now());
        assert_eq!(result.classification, "analysis_failed");
    }

    #[test]
    fn type_mismatches_are_coerced() {
        let reply = r#"{
            "scan_type": null,
            "classification": "normal",
            "confidence": 0.85,
            "findings": "Single finding as string",
            "recommendations": ["Follow up", 3, true]
        }"#;
        let result = normalize_reply(reply, fixed_now());
        assert_eq!(result.scan_type, "unknown");
        assert_eq!(result.confidence, "0.85");
        assert_eq!(result.findings, vec!["Single finding as string"]);
        assert_eq!(result.recommendations, vec!["Follow up", "3", "true"]);
    }

    #[test]
    fn empty_lists_stay_empty() {
        let result = normalize_reply(r#"{"findings": [], "recommendations": []}"#, fixed_now());
        assert!(result.findings.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let reply = r#"{"scan_type":"breast ultrasound","birads_category":"3"}"#;
        let result = normalize_reply(reply, fixed_now());
        assert_eq!(result.scan_type, "breast ultrasound");
    }

    #[test]
    fn normalizer_is_total() {
        let inputs = [
            "",
            "   ",
            "{",
            "}",
            "}{",
            "```json",
            "```json\n```",
            "```json\n{broken\n```",
            "{\"findings\": [",
            "null",
            "42",
            "ünïcödé {\"scan_type\": \"échographie\"} ✓",
            "{{{{}}}}",
            "\u{0}\u{1}binary-ish",
        ];
        for input in inputs {
            let result = normalize_reply(input, fixed_now());
            assert_fully_populated(&result);
        }
    }

    #[test]
    fn unicode_inside_brace_span() {
        let result = normalize_reply("ünïcödé {\"scan_type\": \"échographie\"} ✓", fixed_now());
        assert_eq!(result.scan_type, "échographie");
    }

    #[test]
    fn empty_reply_falls_back_with_empty_report() {
        let result = normalize_reply("", fixed_now());
        assert_eq!(result.classification, "analysis_failed");
        assert_eq!(result.report, "");
    }
}
