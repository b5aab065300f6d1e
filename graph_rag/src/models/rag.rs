use serde::{Deserialize, Serialize};

use super::value::Value;

/// Sentinel for "no query produced" and "answer not attempted"
pub const NOT_AVAILABLE: &str = "N/A";

/// Distinct query values in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlattenedContext {
    values: Vec<Value>,
}

impl FlattenedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` unless an equal value is already present.
    ///
    /// Returns `true` when the value was added.
    pub fn push_distinct(&mut self, value: Value) -> bool {
        if self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<Value> for FlattenedContext {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut context = FlattenedContext::new();
        for value in iter {
            context.push_distinct(value);
        }
        context
    }
}

/// How a question's run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Answered,
    TranslationEmpty,
    ExecutionFailed,
}

/// Outcome of one question through the graph pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorResult {
    pub question: String,
    pub cypher: String,
    pub answer: String,
    pub status: ResultStatus,
    /// Store error for `execution_failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrchestratorResult {
    pub fn answered(question: impl Into<String>, cypher: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            cypher: cypher.into(),
            answer: answer.into(),
            status: ResultStatus::Answered,
            error: None,
        }
    }

    pub fn translation_empty(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            cypher: NOT_AVAILABLE.to_string(),
            answer: NOT_AVAILABLE.to_string(),
            status: ResultStatus::TranslationEmpty,
            error: None,
        }
    }

    pub fn execution_failed(question: impl Into<String>, cypher: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            cypher: cypher.into(),
            answer: NOT_AVAILABLE.to_string(),
            status: ResultStatus::ExecutionFailed,
            error: Some(error.into()),
        }
    }

    pub fn is_answered(&self) -> bool {
        self.status == ResultStatus::Answered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_distinct_keeps_first_seen_order() {
        let mut context = FlattenedContext::new();
        assert!(context.push_distinct(Value::from("b")));
        assert!(context.push_distinct(Value::from("a")));
        assert!(!context.push_distinct(Value::from("b")));

        assert_eq!(context.values(), &[Value::from("b"), Value::from("a")]);
    }

    #[test]
    fn test_empty_answer_is_not_sentinel() {
        let result = OrchestratorResult::answered("q", "MATCH (n) RETURN n.name", "");
        assert!(result.is_answered());
        assert_eq!(result.answer, "");
    }

    #[test]
    fn test_translation_empty_shape() {
        let result = OrchestratorResult::translation_empty("Who is the patient?");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["cypher"], "N/A");
        assert_eq!(json["answer"], "N/A");
        assert_eq!(json["status"], "translation_empty");
        assert!(json.get("error").is_none());
    }
}
