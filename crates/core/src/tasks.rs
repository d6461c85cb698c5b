//! Task lists recorded in weekly progress entries.
//!
//! The list-valued fields are persisted as serialized JSON text:
//!
//! - `completed_this_week`, `planned_for_next_week`: `["task", ...]`
//! - `task_delays`: `[{"task", "isCompleted", "delayReasons"?, "delayReasonText"?}, ...]`
//!
//! Empty text decodes to an empty list. Task strings are trimmed and blank
//! entries dropped on every construction path.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("Malformed serialized task list: {0}")]
pub struct TaskDecodeError(#[from] serde_json::Error);

/// Accepts either a JSON array or a string holding a serialized array, so
/// clients that pre-serialize their task lists keep working.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText<T> {
    List(Vec<T>),
    Text(String),
}

fn decode_text<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, TaskDecodeError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text)?)
}

fn encode_text<T: Serialize>(items: &[T]) -> String {
    // Vec<String> and plain derive structs cannot fail to serialize.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

// ---------------------------------------------------------------------------
// TaskList
// ---------------------------------------------------------------------------

/// An ordered list of task descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList(Vec<String>);

impl TaskList {
    pub fn new<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tasks
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Decode the persisted text form.
    pub fn decode(text: &str) -> Result<Self, TaskDecodeError> {
        let raw: Vec<String> = decode_text(text)?;
        Ok(Self::new(raw))
    }

    /// Encode to the persisted text form.
    pub fn to_text(&self) -> String {
        encode_text(&self.0)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for TaskList {
    type Error = TaskDecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl<'de> Deserialize<'de> for TaskList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ListOrText::<String>::deserialize(deserializer)? {
            ListOrText::List(items) => Ok(Self::new(items)),
            ListOrText::Text(text) => Self::decode(&text).map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Task delays
// ---------------------------------------------------------------------------

/// Who caused a task to slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayReason {
    Client,
    Developer,
    Other,
}

/// Delay record for a task that was not completed this week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDelay {
    pub task: String,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delay_reasons: Vec<DelayReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_reason_text: Option<String>,
}

impl TaskDelay {
    /// Trim text fields and collapse repeated reasons, keeping first-seen order.
    fn normalized(mut self) -> Option<Self> {
        self.task = self.task.trim().to_string();
        if self.task.is_empty() || self.is_completed {
            return None;
        }
        let mut seen = Vec::with_capacity(self.delay_reasons.len());
        for reason in self.delay_reasons {
            if !seen.contains(&reason) {
                seen.push(reason);
            }
        }
        self.delay_reasons = seen;
        self.delay_reason_text = self
            .delay_reason_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Some(self)
    }
}

/// Delay records of a weekly progress entry. Only incomplete tasks are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskDelays(Vec<TaskDelay>);

impl TaskDelays {
    pub fn new(delays: impl IntoIterator<Item = TaskDelay>) -> Self {
        Self(delays.into_iter().filter_map(TaskDelay::normalized).collect())
    }

    pub fn decode(text: &str) -> Result<Self, TaskDecodeError> {
        let raw: Vec<TaskDelay> = decode_text(text)?;
        Ok(Self::new(raw))
    }

    pub fn to_text(&self) -> String {
        encode_text(&self.0)
    }

    pub fn as_slice(&self) -> &[TaskDelay] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for TaskDelays {
    type Error = TaskDecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl<'de> Deserialize<'de> for TaskDelays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ListOrText::<TaskDelay>::deserialize(deserializer)? {
            ListOrText::List(items) => Ok(Self::new(items)),
            ListOrText::Text(text) => Self::decode(&text).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tasks_are_dropped_and_trimmed() {
        let list = TaskList::new(["  ship login ", "", "   ", "write docs"]);
        assert_eq!(list.as_slice(), ["ship login", "write docs"]);
    }

    #[test]
    fn empty_text_decodes_to_empty_list() {
        assert!(TaskList::decode("").unwrap().is_empty());
        assert!(TaskList::decode("  ").unwrap().is_empty());
        assert!(TaskDelays::decode("").unwrap().is_empty());
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(TaskList::decode("not json").is_err());
        assert!(TaskList::decode("{\"a\":1}").is_err());
    }

    #[test]
    fn persisted_text_is_a_json_array() {
        let list = TaskList::new(["a", "b"]);
        assert_eq!(list.to_text(), r#"["a","b"]"#);
        assert_eq!(TaskList::decode(&list.to_text()).unwrap(), list);
    }

    #[test]
    fn deserializes_from_array_or_serialized_string() {
        let from_array: TaskList = serde_json::from_str(r#"["x", " "]"#).unwrap();
        let from_text: TaskList = serde_json::from_str(r#""[\"x\"]""#).unwrap();
        assert_eq!(from_array, from_text);
        assert_eq!(from_array.len(), 1);
    }

    #[test]
    fn delay_shape_uses_camel_case_keys() {
        let text = r#"[{"task":"API","isCompleted":false,"delayReasons":["client","client","other"],"delayReasonText":" waiting on specs "}]"#;
        let delays = TaskDelays::decode(text).unwrap();
        let delay = &delays.as_slice()[0];
        assert_eq!(delay.delay_reasons, vec![DelayReason::Client, DelayReason::Other]);
        assert_eq!(delay.delay_reason_text.as_deref(), Some("waiting on specs"));

        let encoded = delays.to_text();
        assert!(encoded.contains("\"isCompleted\":false"));
        assert!(encoded.contains("\"delayReasons\""));
    }

    #[test]
    fn completed_tasks_carry_no_delay_record() {
        let delays = TaskDelays::new([
            TaskDelay {
                task: "done".into(),
                is_completed: true,
                delay_reasons: vec![],
                delay_reason_text: None,
            },
            TaskDelay {
                task: "late".into(),
                is_completed: false,
                delay_reasons: vec![DelayReason::Developer],
                delay_reason_text: None,
            },
        ]);
        assert_eq!(delays.as_slice().len(), 1);
        assert_eq!(delays.as_slice()[0].task, "late");
    }

    #[test]
    fn optional_delay_fields_may_be_absent() {
        let delays = TaskDelays::decode(r#"[{"task":"t","isCompleted":false}]"#).unwrap();
        assert!(delays.as_slice()[0].delay_reasons.is_empty());
        assert!(delays.as_slice()[0].delay_reason_text.is_none());
    }
}
