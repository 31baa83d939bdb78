use crate::i18n::Language;
use crate::prediction::{Label, Prediction};
use serde::Serialize;

/// Everything the result card shows, already in the page language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub label: Label,
    pub heading: &'static str,
    pub headline: &'static str,
    pub confidence: Option<String>,
    pub guidance: &'static str,
    pub recommendation: Option<&'static str>,
    pub reset_action: &'static str,
}

impl ResultView {
    pub fn new(prediction: &Prediction, language: Language) -> Self {
        let t = language.translations();
        let confidence = prediction
            .confidence
            .map(|c| format!("{} {}", format_confidence(c), t.confidence));

        match prediction.label {
            Label::Normal => Self {
                label: Label::Normal,
                heading: t.result,
                headline: t.normal,
                confidence,
                guidance: t.normal_guidance,
                recommendation: None,
                reset_action: t.analyze_another,
            },
            Label::Tumor => Self {
                label: Label::Tumor,
                heading: t.result,
                headline: t.tumor,
                confidence,
                guidance: t.tumor_guidance,
                recommendation: Some(t.consult_clinician),
                reset_action: t.analyze_another,
            },
        }
    }
}

/// `0.912` becomes `91.2%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}
