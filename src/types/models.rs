use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BRANCH_NAME: &str = "main";
pub const DEFAULT_BRANCH_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_commit_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A commit names its branch by string rather than by branch id, so it
/// outlives renames and removals of the branch row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub project_id: String,
    pub message: String,
    pub author: String,
    pub branch_name: String,
    pub parent_commit_id: Option<String>,
    pub graph_x: i64,
    pub graph_y: i64,
    pub created_at: DateTime<Utc>,
}

/// Content-addressed file metadata. `content_hash` is unique across the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub content_hash: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFile {
    pub id: String,
    pub commit_id: String,
    pub file_id: String,
    pub file_path: String,
    pub is_main_assembly: bool,
}

/// A file to attach to a commit being created. The `file` row is resolved by
/// content hash, so an existing row may be reused.
#[derive(Debug, Clone)]
pub struct NewCommitFile {
    pub file: File,
    pub assembly_path: String,
    pub is_main_assembly: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFileEntry {
    #[serde(flatten)]
    pub link: CommitFile,
    pub file: File,
}
