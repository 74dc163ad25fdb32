use crate::lexicon::CompiledLexicon;

/// "High" on urgency keywords, "Low" on deferral keywords, else "Medium"
pub fn fallback_priority(text: &str, lexicon: &CompiledLexicon) -> String {
    let lower = text.to_lowercase();
    let mentions = |keywords: &[String]| keywords.iter().any(|k| lower.contains(&k.to_lowercase()));

    if mentions(&lexicon.lexicon.urgency_keywords) {
        "High".to_string()
    } else if mentions(&lexicon.lexicon.deferral_keywords) {
        "Low".to_string()
    } else {
        "Medium".to_string()
    }
}
