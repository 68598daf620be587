//! Property tests for the completion gate and task marking.
//!
//! Uses proptest to verify:
//! 1. `all_completed` holds exactly for non-empty, fully completed lists.
//! 2. Marking every assigned id opens the gate, whatever the order.
//! 3. Unknown ids and the sentinel never change a task list.
//! 4. Nickname validation accepts exactly the trimmed names of 1..=20 chars.

use bureausim::session::{GameSession, MAX_NICKNAME_LEN, all_completed, validate_nickname};
use bureausim_proto::department::DEPARTMENTS;
use bureausim_proto::task::{Task, TaskId};
use proptest::prelude::*;

/// A subset of the department directory as a task list, with random flags.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((0..DEPARTMENTS.len(), any::<bool>()), 0..=DEPARTMENTS.len()).prop_map(
        |picks| {
            let mut seen = Vec::new();
            picks
                .into_iter()
                .filter(|(i, _)| {
                    let fresh = !seen.contains(i);
                    seen.push(*i);
                    fresh
                })
                .map(|(i, completed)| {
                    let d = &DEPARTMENTS[i];
                    let mut task = Task::new(d.id, d.task_type, d.page_name);
                    task.completed = completed;
                    task
                })
                .collect()
        },
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn gate_matches_definition(tasks in arb_tasks()) {
        let expected = !tasks.is_empty() && tasks.iter().all(|t| t.completed);
        prop_assert_eq!(all_completed(&tasks), expected);
    }

    #[test]
    fn marking_everything_opens_gate(
        tasks in arb_tasks().prop_filter("needs a task", |t| !t.is_empty()),
        order in any::<prop::sample::Index>(),
    ) {
        let rt = runtime();
        let _guard = rt.enter();
        let mut ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
        let pivot = order.index(ids.len());
        ids.rotate_left(pivot);

        let mut session = GameSession::default();
        let fresh = tasks
            .into_iter()
            .map(|mut t| {
                t.completed = false;
                t
            })
            .collect();
        session.start("prop", fresh, Vec::new());
        for (done, id) in ids.iter().enumerate() {
            prop_assert!(!session.all_tasks_completed(), "gate open after {} of {}", done, ids.len());
            prop_assert!(session.mark_task_complete(*id));
        }
        prop_assert!(session.all_tasks_completed());
        session.stop();
    }

    #[test]
    fn foreign_ids_change_nothing(tasks in arb_tasks(), id in prop_oneof![Just(0u32), 7u32..1000]) {
        let rt = runtime();
        let _guard = rt.enter();
        let mut session = GameSession::default();
        session.start("prop", tasks.clone(), Vec::new());
        prop_assert!(!session.mark_task_complete(TaskId(id)));
        prop_assert_eq!(session.tasks(), tasks.as_slice());
        session.stop();
    }

    #[test]
    fn nickname_rule(raw in "[ \t]{0,3}[a-zA-Z0-9 ]{0,30}[ \t]{0,3}") {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        match validate_nickname(&raw) {
            Ok(name) => {
                prop_assert_eq!(name.as_str(), trimmed);
                prop_assert!((1..=MAX_NICKNAME_LEN).contains(&len));
            }
            Err(_) => prop_assert!(len == 0 || len > MAX_NICKNAME_LEN),
        }
    }
}
