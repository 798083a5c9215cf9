use serde_json::Value;

/// The structured final answer the model is prompted to produce: a narrative
/// reply plus an enumerated list of actions the user can take next.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub response: String,
    pub actions: Vec<String>,
}

impl Recommendation {
    /// Lenient decode of the model's JSON reply. Accepts the capitalized and
    /// lowercase key spellings the model alternates between, and `Description`
    /// as a synonym for the narrative field. Returns None for anything that
    /// is not a JSON object with a recognizable narrative.
    pub fn parse(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text.trim()).ok()?;
        let object = value.as_object()?;

        let response = ["Response", "response", "Description", "description"]
            .iter()
            .find_map(|key| object.get(*key).and_then(|v| v.as_str()))?
            .to_string();

        let actions = ["Actions", "actions"]
            .iter()
            .find_map(|key| object.get(*key).and_then(|v| v.as_array()))
            .map(|items| {
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Recommendation { response, actions })
    }
}
