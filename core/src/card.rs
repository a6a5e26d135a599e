//! Card presenter for a single todo.

use uuid::Uuid;

use crate::error::WriteError;
use crate::presentation::{format_due_date, priority_badge, type_icon, BadgeColors, BadgeContext, DateStyle};
use crate::service::{Severity, Toast, ToastSink, WriteService};
use crate::types::{Todo, TodoChanges};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardModel {
    pub id: Uuid,
    pub title: String,
    pub due_label: String,
    pub description: String,
    pub priority_label: String,
    pub priority_badge: BadgeColors,
    pub type_label: String,
    pub icon: &'static str,
    pub completed: bool,
}

impl CardModel {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            due_label: format_due_date(&todo.due_date, DateStyle::Short),
            description: todo.description.clone(),
            priority_label: todo.priority.clone(),
            priority_badge: priority_badge(&todo.priority, BadgeContext::Card),
            type_label: todo.todo_type.clone(),
            icon: type_icon(&todo.todo_type),
            completed: todo.completed,
        }
    }

    /// The write that flips the completion flag.
    pub fn toggle_completion(&self) -> TodoChanges {
        TodoChanges {
            completed: Some(!self.completed),
            ..TodoChanges::default()
        }
    }

    /// Apply the outcome of a `toggle_completion` write. State only changes
    /// once the write is confirmed.
    pub fn finish_toggle<S: ToastSink + ?Sized>(&mut self, result: Result<Todo, WriteError>, toasts: &mut S) -> bool {
        match result {
            Ok(todo) => {
                let was_completed = self.completed;
                self.completed = todo.completed;
                let verb = if was_completed { "unmarked" } else { "marked" };
                toasts.notify(Toast::new(
                    "Success",
                    format!("To-Do {verb} as completed."),
                    Severity::Success,
                ));
                true
            }
            Err(err) => {
                tracing::error!(id = %self.id, error = %err, "completion toggle failed");
                toasts.notify(Toast::new(
                    "Error",
                    "An error occurred while updating the record.",
                    Severity::Error,
                ));
                false
            }
        }
    }

    pub fn toggle_with<W, S>(&mut self, writer: &mut W, toasts: &mut S) -> bool
    where
        W: WriteService + ?Sized,
        S: ToastSink + ?Sized,
    {
        let changes = self.toggle_completion();
        let result = writer.update_record(self.id, &changes);
        self.finish_toggle(result, toasts)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::service::ToastLog;
    use crate::types::RecordEdit;

    fn todo(completed: bool) -> Todo {
        Todo {
            id: Uuid::from_u128(7),
            title: "Read chapter 4".to_string(),
            todo_type: "Academic".to_string(),
            priority: "Medium".to_string(),
            due_date: Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(),
            description: "Before the seminar".to_string(),
            completed,
        }
    }

    struct Writer {
        fail: bool,
        current: Todo,
    }

    impl WriteService for Writer {
        fn write_batch(&mut self, _edits: &[RecordEdit]) -> Result<(), WriteError> {
            unreachable!("cards write single records")
        }

        fn update_record(&mut self, _id: Uuid, changes: &TodoChanges) -> Result<Todo, WriteError> {
            if self.fail {
                return Err(WriteError::Transport("offline".to_string()));
            }
            changes.apply_to(&mut self.current);
            Ok(self.current.clone())
        }
    }

    #[test]
    fn model_maps_presentation_fields() {
        let card = CardModel::from_todo(&todo(false));
        assert_eq!(card.due_label, "Mar 5, 9:00 AM");
        assert_eq!(card.icon, "utility:knowledge_base");
        assert_eq!(card.priority_badge.text, "rgb(140, 140, 0)");
        assert!(!card.completed);
    }

    #[test]
    fn toggle_marks_and_unmarks() {
        let mut writer = Writer {
            fail: false,
            current: todo(false),
        };
        let mut toasts = ToastLog::default();
        let mut card = CardModel::from_todo(&writer.current);

        assert!(card.toggle_with(&mut writer, &mut toasts));
        assert!(card.completed);
        assert!(card.toggle_with(&mut writer, &mut toasts));
        assert!(!card.completed);

        let messages: Vec<&str> = toasts.toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["To-Do marked as completed.", "To-Do unmarked as completed."]);
    }

    #[test]
    fn failed_toggle_keeps_state() {
        let mut writer = Writer {
            fail: true,
            current: todo(false),
        };
        let mut toasts = ToastLog::default();
        let mut card = CardModel::from_todo(&writer.current);

        assert!(!card.toggle_with(&mut writer, &mut toasts));
        assert!(!card.completed);
        assert_eq!(toasts.toasts[0].severity, Severity::Error);
    }
}
