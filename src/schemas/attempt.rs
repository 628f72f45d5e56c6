use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::AttemptStatus;
use crate::repositories::attempts::AttemptListRow;

/// Question id to selected choice id; `null` or a missing key clears the selection.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SaveAnswersRequest {
    #[serde(default)]
    pub(crate) answers: HashMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttemptListQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
    #[serde(default)]
    pub(crate) status: Option<AttemptStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChoiceOption {
    pub(crate) id: String,
    pub(crate) text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TakeQuestion {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) mark: i32,
    pub(crate) position: i32,
    pub(crate) choices: Vec<ChoiceOption>,
    pub(crate) selected_choice_id: Option<String>,
}

/// In-progress attempt as presented to the student; carries no correctness data.
#[derive(Debug, Serialize)]
pub(crate) struct AttemptTakeResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) full_mark: i32,
    pub(crate) questions: Vec<TakeQuestion>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultQuestion {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) mark: i32,
    pub(crate) selected_choice: Option<ChoiceOption>,
    pub(crate) is_correct: bool,
    pub(crate) earned_mark: i32,
    pub(crate) correct_choice: Option<ChoiceOption>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResultResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) full_mark: i32,
    pub(crate) user_mark: i32,
    pub(crate) questions: Vec<ResultQuestion>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptListItem {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) full_mark: i32,
    pub(crate) user_mark: i32,
}

impl AttemptListItem {
    pub(crate) fn from_row(row: AttemptListRow) -> Self {
        Self {
            id: row.id,
            exam_id: row.exam_id,
            exam_title: row.exam_title,
            status: row.status,
            started_at: format_primitive(row.started_at),
            submitted_at: row.submitted_at.map(format_primitive),
            full_mark: row.full_mark,
            user_mark: row.user_mark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_keeps_null_selections() {
        let payload: SaveAnswersRequest = serde_json::from_value(serde_json::json!({
            "answers": {"q1": "c1", "q2": null}
        }))
        .unwrap();
        assert_eq!(payload.answers.get("q1"), Some(&Some("c1".to_string())));
        assert_eq!(payload.answers.get("q2"), Some(&None));
    }

    #[test]
    fn list_query_parses_status() {
        let query: AttemptListQuery =
            serde_json::from_value(serde_json::json!({"status": "in_progress"})).unwrap();
        assert_eq!(query.status, Some(AttemptStatus::InProgress));
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, 100);
    }
}
