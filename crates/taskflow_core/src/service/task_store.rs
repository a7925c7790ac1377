//! Task list use-case service.
//!
//! # Responsibility
//! - Hold the canonical task collection, newest first.
//! - Apply add/toggle/delete and persist the full collection after each one.
//! - Derive filtered lists and progress stats.
//!
//! # Invariants
//! - Task ids are unique within the collection.
//! - Every mutation is followed by exactly one `save`, in call order.
//! - A failed save never rolls back the in-memory mutation.
//! - `initialize` never replaces state that a mutation already advanced.

use crate::model::category::{fallback_category, is_known_category};
use crate::model::task::{Task, TaskValidationError};
use crate::model::view::{filter_tasks, TaskFilter, TaskStats};
use crate::storage::task_storage::TaskPersistence;
use log::{debug, info, warn};
use uuid::Uuid;

/// In-memory task list backed by a persistence adapter.
pub struct TaskStore<P: TaskPersistence> {
    persistence: P,
    tasks: Vec<Task>,
    initialized: bool,
    mutations: u64,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Creates an empty, not yet initialized store.
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            tasks: Vec::new(),
            initialized: false,
            mutations: 0,
        }
    }

    /// Creates a store and loads persisted tasks before returning it.
    pub fn open(persistence: P) -> Self {
        let mut store = Self::new(persistence);
        store.initialize();
        store
    }

    /// Replaces the collection with persisted tasks.
    ///
    /// Runs once; later calls are no-ops. If a mutation happened first, the
    /// loaded list is dropped because the mutation's save already superseded
    /// it.
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!("event=store_init module=service status=skip reason=already_initialized");
            return;
        }

        let loaded = self.persistence.load();
        self.initialized = true;

        if self.mutations > 0 {
            warn!(
                "event=store_init module=service status=skip reason=state_advanced mutations={} discarded={}",
                self.mutations,
                loaded.len()
            );
            return;
        }

        self.tasks = loaded;
        info!(
            "event=store_init module=service status=ok count={}",
            self.tasks.len()
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Creates a task and prepends it to the collection.
    ///
    /// Unknown category ids are stored as the fallback category.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when `title` trims to empty; the
    ///   collection is left untouched and nothing is saved.
    pub fn add(
        &mut self,
        title: &str,
        details: &str,
        category: &str,
    ) -> Result<Task, TaskValidationError> {
        let category = category.trim();
        let category = if is_known_category(category) {
            category
        } else {
            debug!("event=task_add module=service category=fallback");
            fallback_category().id
        };

        let task = match Task::with_id(self.fresh_id(), title, details, category) {
            Ok(task) => task,
            Err(err) => {
                info!("event=task_add module=service status=rejected error_code=empty_title");
                return Err(err);
            }
        };

        self.tasks.insert(0, task.clone());
        info!(
            "event=task_add module=service status=ok id={} total={}",
            task.id,
            self.tasks.len()
        );
        self.commit();
        Ok(task)
    }

    /// Flips `completed` on the matching task.
    ///
    /// Returns whether a task matched. A miss changes nothing but still saves.
    pub fn toggle(&mut self, id: &str) -> bool {
        let found = match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.toggle();
                info!(
                    "event=task_toggle module=service status=ok id={id} completed={}",
                    task.completed
                );
                true
            }
            None => {
                debug!("event=task_toggle module=service status=miss id={id}");
                false
            }
        };
        self.commit();
        found
    }

    /// Removes the matching task permanently.
    ///
    /// Returns whether a task was removed. Like `toggle`, only the first
    /// match is affected. Confirmation is the caller's job.
    pub fn delete(&mut self, id: &str) -> bool {
        let position = self.tasks.iter().position(|task| task.id == id);
        let removed = match position {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        };
        if removed {
            info!(
                "event=task_delete module=service status=ok id={id} total={}",
                self.tasks.len()
            );
        } else {
            debug!("event=task_delete module=service status=miss id={id}");
        }
        self.commit();
        removed
    }

    /// Returns tasks visible under `filter`, in collection order.
    pub fn filtered(&self, filter: TaskFilter) -> Vec<Task> {
        filter_tasks(&self.tasks, filter)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Full collection, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self) {
        self.mutations += 1;
        self.persistence.save(&self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::model::task::{Task, TaskValidationError};
    use crate::model::view::TaskFilter;
    use crate::storage::task_storage::TaskPersistence;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;

    /// Records saves and serves a fixed load result.
    #[derive(Default)]
    struct RecordingPersistence {
        stored: Vec<Task>,
        loads: Cell<usize>,
        saves: RefCell<Vec<Vec<Task>>>,
    }

    impl TaskPersistence for RecordingPersistence {
        fn load(&self) -> Vec<Task> {
            self.loads.set(self.loads.get() + 1);
            self.stored.clone()
        }

        fn save(&self, tasks: &[Task]) {
            self.saves.borrow_mut().push(tasks.to_vec());
        }
    }

    fn stored(titles: &[(&str, bool)]) -> Vec<Task> {
        titles
            .iter()
            .enumerate()
            .map(|(index, (title, completed))| {
                let mut task = Task::with_id(format!("t{index}"), title, "", "work").unwrap();
                task.completed = *completed;
                task
            })
            .collect()
    }

    #[test]
    fn add_prepends_and_saves_full_collection() {
        let mut store = TaskStore::open(RecordingPersistence::default());

        let first = store.add("first", "", "work").unwrap();
        let second = store.add("Buy milk", "", "personal").unwrap();

        let all = store.filtered(TaskFilter::All);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[0].title, "Buy milk");
        assert!(!all[0].completed);
        assert_eq!(all[1].id, first.id);

        let saves = store.persistence().saves.borrow();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[1], all);
    }

    #[test]
    fn add_with_blank_title_neither_mutates_nor_saves() {
        let mut store = TaskStore::open(RecordingPersistence::default());

        assert_eq!(
            store.add("", "x", "work").unwrap_err(),
            TaskValidationError::EmptyTitle
        );
        assert_eq!(
            store.add("   ", "x", "work").unwrap_err(),
            TaskValidationError::EmptyTitle
        );
        assert!(store.tasks().is_empty());
        assert!(store.persistence().saves.borrow().is_empty());
    }

    #[test]
    fn add_replaces_unknown_category_with_fallback() {
        let mut store = TaskStore::open(RecordingPersistence::default());

        let task = store.add("misc", "", "groceries").unwrap();
        assert_eq!(task.category, "other");
        let task = store.add("job", "", " urgent ").unwrap();
        assert_eq!(task.category, "urgent");
    }

    #[test]
    fn toggle_twice_restores_task() {
        let mut store = TaskStore::open(RecordingPersistence::default());
        let original = store.add("flip", "details", "work").unwrap();

        assert!(store.toggle(&original.id));
        assert!(store.get(&original.id).unwrap().completed);
        assert!(store.toggle(&original.id));
        assert_eq!(store.get(&original.id).unwrap(), &original);
    }

    #[test]
    fn misses_leave_collection_unchanged_but_still_save() {
        let mut store = TaskStore::open(RecordingPersistence {
            stored: stored(&[("a", false), ("b", true)]),
            ..RecordingPersistence::default()
        });
        let before = store.tasks().to_vec();

        assert!(!store.toggle("missing"));
        assert!(!store.delete("missing"));

        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(store.persistence().saves.borrow().len(), 2);
    }

    #[test]
    fn delete_removes_only_matching_task() {
        let mut store = TaskStore::open(RecordingPersistence {
            stored: stored(&[("a", false), ("b", true), ("c", false)]),
            ..RecordingPersistence::default()
        });

        assert!(store.delete("t1"));
        let ids: Vec<_> = store.tasks().iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, ["t0", "t2"]);
        assert!(!store.delete("t1"));
    }

    #[test]
    fn duplicate_stored_ids_are_handled_one_at_a_time() {
        let mut duplicated = stored(&[("first", false), ("second", false)]);
        duplicated[1].id = "t0".to_string();
        let mut store = TaskStore::open(RecordingPersistence {
            stored: duplicated,
            ..RecordingPersistence::default()
        });

        assert!(store.toggle("t0"));
        assert!(store.tasks()[0].completed);
        assert!(!store.tasks()[1].completed);

        assert!(store.delete("t0"));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].title, "second");
        assert!(store.delete("t0"));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn initialize_keeps_stored_order_and_runs_once() {
        let mut store = TaskStore::new(RecordingPersistence {
            stored: stored(&[("newest", false), ("older", true)]),
            ..RecordingPersistence::default()
        });
        assert!(store.tasks().is_empty());
        assert!(!store.is_initialized());

        store.initialize();
        store.initialize();

        assert_eq!(store.persistence().loads.get(), 1);
        assert_eq!(store.tasks()[0].title, "newest");
        assert_eq!(store.tasks()[1].title, "older");
    }

    #[test]
    fn initialize_after_mutation_keeps_newer_state() {
        let mut store = TaskStore::new(RecordingPersistence {
            stored: stored(&[("stale", false)]),
            ..RecordingPersistence::default()
        });

        let fresh = store.add("fresh", "", "work").unwrap();
        store.initialize();

        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, fresh.id);
    }

    #[test]
    fn stats_and_filters_partition_the_collection() {
        let mut store = TaskStore::open(RecordingPersistence {
            stored: stored(&[("a", true), ("b", false), ("c", false), ("d", false)]),
            ..RecordingPersistence::default()
        });

        let stats = store.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.active_count, 3);
        assert_eq!(stats.progress_percent, 25);

        store.toggle("t2");
        let active: HashSet<_> = store
            .filtered(TaskFilter::Active)
            .into_iter()
            .map(|task| task.id)
            .collect();
        let completed: HashSet<_> = store
            .filtered(TaskFilter::Completed)
            .into_iter()
            .map(|task| task.id)
            .collect();
        let all: HashSet<_> = store
            .filtered(TaskFilter::All)
            .into_iter()
            .map(|task| task.id)
            .collect();

        assert!(active.is_disjoint(&completed));
        assert_eq!(&active | &completed, all);
        assert_eq!(store.stats().progress_percent, 50);
    }

    #[test]
    fn empty_store_reports_zero_progress() {
        let store = TaskStore::open(RecordingPersistence::default());
        let stats = store.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.progress_percent, 0);
    }
}
