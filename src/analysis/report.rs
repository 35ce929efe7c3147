//! Fixed-layout plain-text imaging report.

use chrono::{DateTime, Utc};

use super::types::{AnalysisResult, PatientInfo};

const RULE: &str = "================================================================================";

/// Render `analysis` for `patient`. Deterministic for fixed inputs and `now`.
pub fn format_report(analysis: &AnalysisResult, patient: &PatientInfo, now: DateTime<Utc>) -> String {
    let findings: String = analysis
        .findings
        .iter()
        .map(|finding| format!("• {finding}\n"))
        .collect();
    let recommendations: String = analysis
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| format!("{}. {rec}\n", i + 1))
        .collect();

    format!(
        "\n{RULE}\n\
         {title:>42}\n\
         {subtitle:>45}\n\
         {RULE}\n\
         \n\
         {patient_section}\
         Patient ID: {patient_id}\n\
         Patient Name: {patient_name}\n\
         Report Date: {report_date}\n\
         \n\
         {exam_section}\
         Scan Type: {scan_type}\n\
         \n\
         {findings_section}\
         {findings}\
         \n\
         {impression_section}\
         Classification: {classification}\n\
         Confidence Level: {confidence}\n\
         \n\
         {detail_section}\
         {report}\n\
         \n\
         {rec_section}\
         {recommendations}\
         \n\
         {RULE}\n\
         DISCLAIMER: {disclaimer}\n\
         {RULE}\n\
         AI Analysis Timestamp: {timestamp}\n\
         Report Generated By: Smart Medical Card AI System\n\
         {RULE}\n",
        title = "MEDICAL IMAGING REPORT",
        subtitle = "Smart Medical Card System",
        patient_section = section("PATIENT INFORMATION"),
        patient_id = patient.patient_id,
        patient_name = patient.display_name(),
        report_date = now.format("%Y-%m-%d %H:%M UTC"),
        exam_section = section("EXAMINATION"),
        scan_type = analysis.scan_type,
        findings_section = section("FINDINGS"),
        impression_section = section("IMPRESSION"),
        classification = analysis.classification.to_uppercase(),
        confidence = analysis.confidence,
        detail_section = section("DETAILED REPORT"),
        report = analysis.report,
        rec_section = section("RECOMMENDATIONS"),
        disclaimer = analysis.disclaimer,
        timestamp = analysis.timestamp,
    )
}

/// Section title underlined with dashes of the same width.
fn section(title: &str) -> String {
    format!("{title}\n{}\n", "-".repeat(title.chars().count()))
}
