//! Task DTOs shared by the list, editor and action flows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Workflow state of a task.
///
/// `Pending` is what the server assigns when a create request carries no
/// status; the dashboard only aggregates the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ];

    /// Human-readable label for selects and table cells.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Priority of a task. The server defaults to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] =
        [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Human-readable label for selects and table cells.
    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

/// A task as the server returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Owner of the task.
    pub user_id: i64,
    /// Owner's display name, denormalized for the list view.
    pub user_name: String,
    /// Server-local timestamp without zone information.
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Create/update payload for a task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_response_deserialization() {
        let json = r#"{
            "id": 3,
            "title": "Write release notes",
            "description": null,
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "userId": 7,
            "userName": "Test User",
            "createdAt": "2026-01-15T09:30:00",
            "updatedAt": "2026-01-16T11:00:00"
        }"#;
        let task: TaskResponse = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(task.id, 3);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.description.is_none());
        assert_eq!(task.user_name, "Test User");
    }

    #[test]
    fn test_task_request_serialization_uses_wire_names() {
        let request = TaskRequest {
            title: "Write release notes".to_string(),
            description: Some("v2.1".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::Low,
        };

        let json = serde_json::to_string(&request).expect("Should serialize");
        assert!(json.contains("\"status\":\"TODO\""));
        assert!(json.contains("\"priority\":\"LOW\""));
        assert!(json.contains("\"title\":\"Write release notes\""));
    }

    #[test]
    fn test_status_default_matches_server_default() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_priority_orders_low_to_high() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::Medium < TaskPriority::High);
    }
}
