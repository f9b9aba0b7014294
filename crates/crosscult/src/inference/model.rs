//! Canonical model names.

use crate::schema::Value;

use super::filename::ModelFamily;

/// Classify a raw model name into a known family by substring rules.
pub fn model_family(name: &str) -> Option<ModelFamily> {
    let low = name.to_lowercase();
    if low.contains("claude") && low.contains('4') {
        Some(ModelFamily::Claude4)
    } else if low.contains("gpt") && low.contains('4') {
        Some(ModelFamily::Gpt4)
    } else if low.contains("deepseek") && (low.contains("v3") || low.contains("v-3")) {
        Some(ModelFamily::DeepSeekV3)
    } else if low.contains("gemini") && (low.contains("2.5") || low.contains("2_5")) {
        Some(ModelFamily::Gemini25)
    } else {
        None
    }
}

/// Standardize a model cell.
///
/// Strings naming a known family collapse to its canonical label. Anything
/// else, including nulls and non-string cells, is returned unchanged.
pub fn standardize_model(value: &Value) -> Value {
    match value.as_str().and_then(model_family) {
        Some(family) => Value::from(family.as_str()),
        None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_families() {
        assert_eq!(standardize_model(&"claude-4-sonnet".into()), Value::from("Claude-4"));
        assert_eq!(standardize_model(&"GPT-4o".into()), Value::from("GPT-4"));
        assert_eq!(standardize_model(&"gpt-4.1-mini".into()), Value::from("GPT-4"));
        assert_eq!(standardize_model(&"DeepSeek-V3".into()), Value::from("DeepSeek-V3"));
        assert_eq!(standardize_model(&"deepseek-v-3".into()), Value::from("DeepSeek-V3"));
        assert_eq!(standardize_model(&"gemini_2_5_pro".into()), Value::from("Gemini-2.5"));
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(standardize_model(&"llama-3".into()), Value::from("llama-3"));
        assert_eq!(standardize_model(&"claude-3".into()), Value::from("claude-3"));
        assert_eq!(standardize_model(&Value::Null), Value::Null);
        assert_eq!(standardize_model(&Value::Int(4)), Value::Int(4));
    }
}
