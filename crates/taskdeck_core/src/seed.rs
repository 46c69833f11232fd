//! Deterministic demo data for local development.
//!
//! # Responsibility
//! - Fill an empty database with labels, tasks, subtasks and notes so
//!   list views and the dashboard have something to show.
//! - Reuse labels by exact name on repeated runs instead of piling up
//!   duplicates.
//!
//! # Invariants
//! - Output depends only on [`SeedOptions::seed`]; the same seed yields
//!   the same data on every machine.
//! - Everything goes through the repositories, so seeded rows pass the
//!   same validation as user input.

use crate::model::{LabelDraft, LabelKind, NoteDraft, SubTaskDraft, TaskDraft, TaskStatus};
use crate::repo::label_repo::{LabelRepository, SqliteLabelRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::subtask_repo::{SqliteSubTaskRepository, SubTaskRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use crate::service::note_service::derive_note_preview;
use log::info;
use rusqlite::Connection;
use uuid::Uuid;

pub const SEED_PRIORITIES: [&str; 5] = ["High", "Medium", "Low", "Critical", "Optional"];
pub const SEED_CATEGORIES: [&str; 5] = ["Work", "School", "Personal", "Finance", "Projects"];

pub const SEED_TASK_COUNT: u32 = 10;
pub const SUBTASKS_PER_TASK: u32 = 3;
pub const NOTES_PER_TASK: u32 = 2;

/// 2025-01-01T00:00:00Z; seeded deadlines spread out from here.
const BASE_DEADLINE_EPOCH_MS: i64 = 1_735_689_600_000;
const DAY_MS: i64 = 86_400_000;

const TASK_VERBS: [&str; 8] = [
    "Review", "Draft", "Plan", "Finish", "Schedule", "Organize", "Prepare", "Email",
];
const TASK_TOPICS: [&str; 8] = [
    "quarterly budget",
    "team retro",
    "grocery list",
    "lecture notes",
    "tax paperwork",
    "portfolio site",
    "reading backlog",
    "apartment lease",
];
const SUBTASK_ACTIONS: [&str; 6] = [
    "collect the materials",
    "write the first pass",
    "ask for feedback",
    "book the slot",
    "double-check the numbers",
    "send the follow-up",
];
const NOTE_SNIPPETS: [&str; 6] = [
    "Remember to sync with [the wiki](https://wiki.example.com) before starting.",
    "## Key points\n- timing\n- budget\n- who signs off",
    "Waiting on approval from finance, ping them again on Monday.",
    "![whiteboard](whiteboard.jpg)\nPhoto from the planning session.",
    "Draft is due **Friday**, leave a buffer day for review.",
    "Split this up if it takes longer than an afternoon.",
];
const STATUS_POOL: [TaskStatus; 3] = [
    TaskStatus::Pending,
    TaskStatus::InProgress,
    TaskStatus::Completed,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub seed: u64,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

/// What a seeding run actually inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: u32,
    pub priorities_created: u32,
    pub tasks_created: u32,
    pub subtasks_created: u32,
    pub notes_created: u32,
}

/// SplitMix64 generator; small, seedable and stable across platforms.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn range(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.range(items.len() as u64) as usize]
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.range(100) < percent
    }
}

/// Seeds demo data through the regular repositories.
///
/// Labels are matched by exact name first, so a second run only adds
/// tasks and their children.
pub fn seed_demo_data(conn: &mut Connection, options: &SeedOptions) -> RepoResult<SeedReport> {
    let mut rng = SplitMix64::new(options.seed);
    let mut report = SeedReport::default();

    let mut priority_ids: Vec<Uuid> = Vec::new();
    let mut category_ids: Vec<Uuid> = Vec::new();
    {
        let repo = SqliteLabelRepository::try_new(conn)?;
        for name in SEED_PRIORITIES {
            match repo.find_label_by_name(LabelKind::Priority, name)? {
                Some(label) => priority_ids.push(label.uuid),
                None => {
                    let label = repo.create_label(LabelKind::Priority, &LabelDraft::new(name))?;
                    report.priorities_created += 1;
                    priority_ids.push(label.uuid);
                }
            }
        }
        for name in SEED_CATEGORIES {
            match repo.find_label_by_name(LabelKind::Category, name)? {
                Some(label) => category_ids.push(label.uuid),
                None => {
                    let label = repo.create_label(LabelKind::Category, &LabelDraft::new(name))?;
                    report.categories_created += 1;
                    category_ids.push(label.uuid);
                }
            }
        }
    }

    let mut task_ids: Vec<Uuid> = Vec::new();
    {
        let repo = SqliteTaskRepository::try_new(conn)?;
        for index in 0..SEED_TASK_COUNT {
            let mut draft = TaskDraft::new(format!(
                "{} {}",
                rng.pick(&TASK_VERBS),
                rng.pick(&TASK_TOPICS)
            ));
            draft.status = *rng.pick(&STATUS_POOL);
            if rng.chance(50) {
                draft.description = Some(format!("Demo item {} for local use.", index + 1));
            }
            if rng.chance(80) {
                draft.deadline = Some(BASE_DEADLINE_EPOCH_MS + rng.range(30) as i64 * DAY_MS);
            }
            if rng.chance(80) {
                draft.priority_uuid = Some(*rng.pick(&priority_ids));
            }
            if rng.chance(80) {
                draft.category_uuid = Some(*rng.pick(&category_ids));
            }
            let task = repo.create_task(&draft)?;
            task_ids.push(task.uuid);
            report.tasks_created += 1;
        }
    }

    {
        let repo = SqliteSubTaskRepository::try_new(conn)?;
        for &task_id in &task_ids {
            for step in 0..SUBTASKS_PER_TASK {
                let mut draft = SubTaskDraft::new(
                    task_id,
                    format!("Step {}: {}", step + 1, rng.pick(&SUBTASK_ACTIONS)),
                );
                draft.status = *rng.pick(&STATUS_POOL);
                repo.create_subtask(&draft)?;
                report.subtasks_created += 1;
            }
        }
    }

    {
        let repo = SqliteNoteRepository::try_new(conn)?;
        for &task_id in &task_ids {
            for _ in 0..NOTES_PER_TASK {
                let draft = NoteDraft::new(task_id, *rng.pick(&NOTE_SNIPPETS));
                let preview = derive_note_preview(&draft.content);
                repo.create_note(&draft, preview.as_deref())?;
                report.notes_created += 1;
            }
        }
    }

    info!(
        "event=seed_demo_data module=seed status=ok seed={} categories={} priorities={} tasks={} subtasks={} notes={}",
        options.seed,
        report.categories_created,
        report.priorities_created,
        report.tasks_created,
        report.subtasks_created,
        report.notes_created
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::SplitMix64;

    #[test]
    fn same_seed_yields_the_same_sequence() {
        let mut a = SplitMix64::new(7);
        let mut b = SplitMix64::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn pick_stays_inside_the_slice() {
        let mut rng = SplitMix64::new(99);
        let items = ["a", "b", "c"];
        for _ in 0..100 {
            assert!(items.contains(rng.pick(&items)));
        }
    }
}
