//! Database checkpoints: dump files plus their tracking rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: i32,
    pub checkpoint_name: String,
    pub description: Option<String>,
    /// Bare file name, resolved under the checkpoint directory
    pub file_name: String,
    pub file_size: Option<i64>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckpoint {
    pub checkpoint_name: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CheckpointInput {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// `checkpoint_20240102_030405.sql`
pub fn checkpoint_file_name(at: DateTime<Utc>) -> String {
    format!("checkpoint_{}.sql", at.format("%Y%m%d_%H%M%S"))
}

/// `checkpoint_20240102_030405_2.sql`, used when two dumps land in the same second.
pub fn numbered_file_name(at: DateTime<Utc>, n: u32) -> String {
    format!("checkpoint_{}_{}.sql", at.format("%Y%m%d_%H%M%S"), n)
}

pub fn default_checkpoint_name(at: DateTime<Utc>) -> String {
    format!("Checkpoint {}", at.format("%Y-%m-%d %H:%M:%S"))
}

/// A stored file name must never reach outside the checkpoint directory.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name.ends_with(".sql")
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Checkpoints beyond the newest `keep`, oldest last.
pub fn select_for_pruning(checkpoints: &[Checkpoint], keep: usize) -> Vec<&Checkpoint> {
    let mut ordered: Vec<&Checkpoint> = checkpoints.iter().collect();
    ordered.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    ordered.into_iter().skip(keep).collect()
}

/// Human readable size for the checkpoint list.
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes.max(0) as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes.max(0), UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
