//! Prompt templates for the vision model.
//!
//! Three fixed user prompts, one per `ScanType`. All of them ask for a single
//! JSON object; the reply is normalized by `parser`, which tolerates prose and
//! fences around it.

use super::types::ScanType;

// ═══════════════════════════════════════════════════════════
// System instruction
// ═══════════════════════════════════════════════════════════

pub const SYSTEM_INSTRUCTION: &str =
    "You are a medical imaging AI assistant. Always respond in valid JSON format.";

// ═══════════════════════════════════════════════════════════
// User prompts
// ═══════════════════════════════════════════════════════════

pub const GENERAL_PROMPT: &str = r#"You are an expert medical imaging AI assistant helping radiologists analyze medical scans.

Analyze this medical scan image and provide a structured analysis.

IMPORTANT GUIDELINES:
1. This is for educational/demonstration purposes
2. Provide analysis that would help a radiologist, not replace them
3. Always recommend professional medical consultation
4. Be specific about what you observe in the image

Based on the image, provide your analysis in the following JSON format:
{
    "scan_type": "detected type of scan (e.g., breast ultrasound, pelvic ultrasound, X-ray, MRI, CT)",
    "classification": "your assessment (e.g., benign, malignant, normal, suspicious, infected, not infected, or needs further evaluation)",
    "confidence": "low/medium/high - how confident you are in this assessment",
    "findings": [
        "Finding 1: specific observation",
        "Finding 2: specific observation",
        "Finding 3: specific observation"
    ],
    "report": "A detailed radiologist-style report paragraph describing what you observe, the characteristics of any lesions or abnormalities, their location, size estimation, and relevant features",
    "recommendations": [
        "Recommendation 1",
        "Recommendation 2"
    ]
}

Analyze the image now and respond ONLY with the JSON object, no additional text."#;

pub const BREAST_ULTRASOUND_PROMPT: &str = r#"You are an expert breast imaging radiologist AI assistant.

Analyze this breast ultrasound image using BI-RADS criteria.

Look for:
- Mass characteristics (shape, margins, orientation, echo pattern)
- Calcifications
- Architectural distortion
- Skin/nipple changes
- Lymph node appearance

Classify as:
- BENIGN: Well-defined margins, oval shape, parallel orientation, homogeneous
- MALIGNANT: Irregular margins, non-parallel orientation, posterior shadowing, microcalcifications
- NORMAL: No suspicious findings

Provide your analysis in JSON format:
{
    "scan_type": "breast ultrasound",
    "classification": "benign/malignant/normal/suspicious",
    "confidence": "low/medium/high",
    "birads_category": "0-6",
    "findings": ["finding 1", "finding 2"],
    "report": "detailed radiologist report",
    "recommendations": ["recommendation 1", "recommendation 2"]
}

Respond ONLY with JSON."#;

pub const PCOS_ULTRASOUND_PROMPT: &str = r#"You are an expert gynecological imaging AI assistant.

Analyze this pelvic/ovarian ultrasound image for signs of Polycystic Ovary Syndrome (PCOS) using the Rotterdam criteria.

Look for:
- Ovarian volume (>10 mL suggests PCOS)
- Follicle count (>=12 follicles of 2-9mm suggests PCOS)
- Peripheral follicle distribution ("string of pearls" pattern)
- Stromal echogenicity
- Ovarian morphology

Classify as:
- PCOS_POSITIVE: Multiple peripheral follicles, enlarged ovary, increased stroma
- PCOS_NEGATIVE: Normal ovarian appearance
- INCONCLUSIVE: Unclear findings, needs further evaluation

Provide your analysis in JSON format:
{
    "scan_type": "pelvic ultrasound - ovarian assessment",
    "classification": "PCOS_positive/PCOS_negative/inconclusive",
    "confidence": "low/medium/high",
    "findings": ["finding 1", "finding 2"],
    "ovarian_volume_assessment": "normal/enlarged",
    "follicle_pattern": "description of follicle distribution",
    "report": "detailed radiologist report",
    "recommendations": ["recommendation 1", "recommendation 2"]
}

Respond ONLY with JSON."#;

/// Get the user prompt for a scan type.
pub fn prompt_for(scan_type: ScanType) -> &'static str {
    match scan_type {
        ScanType::Breast => BREAST_ULTRASOUND_PROMPT,
        ScanType::Pcos => PCOS_ULTRASOUND_PROMPT,
        ScanType::General => GENERAL_PROMPT,
    }
}

/// Select the user prompt for an optional free-text hint.
pub fn select_prompt(hint: Option<&str>) -> &'static str {
    prompt_for(ScanType::from_hint(hint))
}
