//! Per-field presentation lookups: type icons, priority badge colors and
//! due-date labels.
//!
//! Record fields are picklist strings, so lookups parse them first. Anything
//! outside the known set is logged and rendered with a fallback.

use chrono::{DateTime, TimeZone};
use uuid::Uuid;

use crate::types::Todo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoType {
    Personal,
    Work,
    Academic,
    Health,
    Social,
    Household,
    Hobbies,
    SelfImprovement,
    Other,
}

const TYPE_NAMES: [(&str, TodoType); 9] = [
    ("Personal", TodoType::Personal),
    ("Work", TodoType::Work),
    ("Academic", TodoType::Academic),
    ("Health", TodoType::Health),
    ("Social", TodoType::Social),
    ("Household", TodoType::Household),
    ("Hobbies", TodoType::Hobbies),
    ("Self-Improvement", TodoType::SelfImprovement),
    ("Other", TodoType::Other),
];

pub const FALLBACK_ICON: &str = "utility:task";

impl TodoType {
    pub fn parse(value: &str) -> Option<Self> {
        TYPE_NAMES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, todo_type)| *todo_type)
    }

    pub fn icon(self) -> &'static str {
        match self {
            TodoType::Personal => "utility:socialshare",
            TodoType::Work => "utility:company",
            TodoType::Academic => "utility:knowledge_base",
            TodoType::Health => "utility:center_align",
            TodoType::Social => "utility:groups",
            TodoType::Household => "utility:home",
            TodoType::Hobbies => "utility:brush",
            TodoType::SelfImprovement => "utility:trending",
            TodoType::Other => "utility:task",
        }
    }
}

/// Icon name for a record's type picklist value.
pub fn type_icon(value: &str) -> &'static str {
    match TodoType::parse(value) {
        Some(todo_type) => todo_type.icon(),
        None => {
            tracing::warn!(todo_type = value, "unexpected todo type, using default icon");
            FALLBACK_ICON
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "High" => Some(Priority::High),
            "Medium" => Some(Priority::Medium),
            "Low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Where a badge is drawn; the card uses a stronger High background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeContext {
    TableCell,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeColors {
    pub background: &'static str,
    pub text: &'static str,
}

impl BadgeColors {
    /// CSS custom properties consumed by the badge component.
    pub fn style(&self) -> String {
        format!(
            "--slds-c-badge-color-background: {}; --slds-c-badge-text-color: {};",
            self.background, self.text
        )
    }
}

pub const FALLBACK_BADGE: BadgeColors = BadgeColors {
    background: "rgb(236, 235, 234)",
    text: "rgb(68, 68, 68)",
};

impl Priority {
    pub fn badge(self, context: BadgeContext) -> BadgeColors {
        match (self, context) {
            (Priority::High, BadgeContext::TableCell) => BadgeColors {
                background: "rgb(255, 221, 221)",
                text: "red",
            },
            (Priority::High, BadgeContext::Card) => BadgeColors {
                background: "rgb(255, 200, 200)",
                text: "red",
            },
            (Priority::Medium, _) => BadgeColors {
                background: "rgb(255, 255, 181)",
                text: "rgb(140, 140, 0)",
            },
            (Priority::Low, _) => BadgeColors {
                background: "rgb(181, 255, 181)",
                text: "green",
            },
        }
    }
}

pub fn priority_badge(value: &str, context: BadgeContext) -> BadgeColors {
    match Priority::parse(value) {
        Some(priority) => priority.badge(context),
        None => {
            tracing::warn!(priority = value, "unexpected todo priority, using neutral badge");
            FALLBACK_BADGE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Mar 5, 2024, 3:04 PM`
    Long,
    /// `Mar 5, 3:04 PM`
    Short,
}

pub fn format_due_date<Tz>(due: &DateTime<Tz>, style: DateStyle) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let pattern = match style {
        DateStyle::Long => "%b %-d, %Y, %-I:%M %p",
        DateStyle::Short => "%b %-d, %-I:%M %p",
    };
    due.format(pattern).to_string()
}

/// A table row with its cells formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based across pages.
    pub number: usize,
    pub id: Uuid,
    pub title: String,
    pub due_label: String,
    pub priority_label: String,
    pub priority_badge: BadgeColors,
    pub type_label: String,
    pub icon: &'static str,
    pub completed: bool,
}

impl TableRow {
    pub fn from_todo(number: usize, todo: &Todo) -> Self {
        Self {
            number,
            id: todo.id,
            title: todo.title.clone(),
            due_label: format_due_date(&todo.due_date, DateStyle::Long),
            priority_label: todo.priority.clone(),
            priority_badge: priority_badge(&todo.priority, BadgeContext::TableCell),
            type_label: todo.todo_type.clone(),
            icon: type_icon(&todo.todo_type),
            completed: todo.completed,
        }
    }
}
