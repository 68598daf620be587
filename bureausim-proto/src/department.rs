//! The fixed directory of government departments.
//!
//! Every player sees all six departments in the office sidebar; only the
//! ones matching a task in their to-do list count toward completion.

use crate::task::TaskType;

/// One office the player can walk into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Department {
    /// Stable department number (the backend reuses it as the task id).
    pub id: u32,
    /// Display name.
    pub name: &'static str,
    /// Routing key matched against [`crate::task::Task::page_name`].
    pub page_name: &'static str,
    /// Flow served by this department.
    pub task_type: TaskType,
}

/// All departments, in sidebar order.
pub const DEPARTMENTS: [Department; 6] = [
    Department {
        id: 1,
        name: "Secretary of Bored and Shady Individuals",
        page_name: "puzzle-task",
        task_type: TaskType::Puzzle,
    },
    Department {
        id: 2,
        name: "Department of Unreadable Forms",
        page_name: "form-task",
        task_type: TaskType::Form,
    },
    Department {
        id: 3,
        name: "CAPTCHA Complaints Unit",
        page_name: "captcha-task",
        task_type: TaskType::Captcha,
    },
    Department {
        id: 4,
        name: "Secretariat of Drowsiness",
        page_name: "coffee-task",
        task_type: TaskType::Coffee,
    },
    Department {
        id: 5,
        name: "Serious Headquarters of Seriousness",
        page_name: "signature-task",
        task_type: TaskType::Signature,
    },
    Department {
        id: 6,
        name: "Unjustified Audit Office",
        page_name: "display-task",
        task_type: TaskType::Display,
    },
];

/// Look up a department by its routing key.
#[must_use]
pub fn by_page_name(page_name: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|d| d.page_name == page_name)
}

/// Look up a department by id.
#[must_use]
pub fn by_id(id: u32) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|d| d.id == id)
}
