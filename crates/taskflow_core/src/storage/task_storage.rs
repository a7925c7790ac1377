//! Task list persistence over a key-value repository.

use crate::model::task::Task;
use crate::repo::kv_repo::KeyValueRepository;
use log::{debug, error, info};
use serde_json::error::Category as JsonErrorCategory;
use std::time::Instant;

/// Key holding the serialized task list.
pub const TASKS_STORAGE_KEY: &str = "@taskflow_tasks";

/// Total load/save contract used by `TaskStore`.
///
/// Implementations log failures instead of returning them.
pub trait TaskPersistence {
    /// Reads the stored list; absent or unreadable data yields an empty list.
    fn load(&self) -> Vec<Task>;
    /// Overwrites the stored list with `tasks`.
    fn save(&self, tasks: &[Task]);
}

/// JSON blob storage of the task list on top of any key-value repository.
pub struct KvTaskStorage<R: KeyValueRepository> {
    repo: R,
}

impl<R: KeyValueRepository> KvTaskStorage<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl<R: KeyValueRepository> TaskPersistence for KvTaskStorage<R> {
    fn load(&self) -> Vec<Task> {
        let started_at = Instant::now();
        let raw = match self.repo.get(TASKS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=tasks_load module=storage status=ok source=empty count=0");
                return Vec::new();
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=storage status=error error_code=read_failed error={err}"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=storage status=ok source=stored count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                tasks
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=storage status=error error_code=decode_failed bytes={} {}",
                    raw.len(),
                    json_error_fields(&err)
                );
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) {
        let started_at = Instant::now();
        let raw = match serde_json::to_string(tasks) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=tasks_save module=storage status=error error_code=encode_failed count={} {}",
                    tasks.len(),
                    json_error_fields(&err)
                );
                return;
            }
        };

        match self.repo.set(TASKS_STORAGE_KEY, &raw) {
            Ok(()) => debug!(
                "event=tasks_save module=storage status=ok count={} bytes={} duration_ms={}",
                tasks.len(),
                raw.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=tasks_save module=storage status=error error_code=write_failed count={} error={err}",
                tasks.len()
            ),
        }
    }
}

// serde_json messages quote offending values, so only class and position go
// to the log.
fn json_error_fields(err: &serde_json::Error) -> String {
    let class = match err.classify() {
        JsonErrorCategory::Io => "io",
        JsonErrorCategory::Syntax => "syntax",
        JsonErrorCategory::Data => "data",
        JsonErrorCategory::Eof => "eof",
    };
    format!(
        "error_class={class} line={} column={}",
        err.line(),
        err.column()
    )
}

#[cfg(test)]
mod tests {
    use super::json_error_fields;
    use crate::model::task::Task;

    #[test]
    fn decode_error_fields_omit_stored_text() {
        let blob = r#"[{"id":"1","title":"t","details":"","category":"work","completed":"my secret diagnosis","createdAt":"2026-02-13T10:00:00.000Z"}]"#;
        let err = serde_json::from_str::<Vec<Task>>(blob).unwrap_err();

        let fields = json_error_fields(&err);
        assert!(!fields.contains("secret"), "{fields}");
        assert!(fields.starts_with("error_class=data line=1 column="), "{fields}");
    }

    #[test]
    fn syntax_errors_are_classified() {
        let err = serde_json::from_str::<Vec<Task>>("{not json").unwrap_err();
        assert!(json_error_fields(&err).starts_with("error_class=syntax"));
    }
}
