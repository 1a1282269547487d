//! Project lifecycle: validation and orchestration of every write, and
//! assembly of the views returned to clients.

mod commits;
mod projects;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::Error;
use crate::files::FileManifest;
use crate::graph::BranchSummary;
use crate::store::Store;
use crate::types::{Commit, CommitFileEntry, DEFAULT_BRANCH_NAME};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBranch {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommit {
    pub message: String,
    pub author: String,
    #[serde(default = "default_branch_name")]
    pub branch_name: String,
    #[serde(default)]
    pub parent_commit_id: Option<String>,
    #[serde(default)]
    pub graph_x: i64,
    #[serde(default)]
    pub graph_y: i64,
    #[serde(default)]
    pub files: Vec<CommitFileInput>,
}

fn default_branch_name() -> String {
    DEFAULT_BRANCH_NAME.to_string()
}

/// A manifest entry plus where the file sits in the committed assembly.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitFileInput {
    #[serde(flatten)]
    pub manifest: FileManifest,
    /// Path within the assembly. Defaults to the file name.
    #[serde(default)]
    pub assembly_path: Option<String>,
    #[serde(default)]
    pub is_main_assembly: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub branches: Vec<BranchSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitDetail {
    #[serde(flatten)]
    pub commit: Commit,
    pub files: Vec<CommitFileEntry>,
}

/// Entry point for every project, branch and commit operation. Borrows the
/// store handle owned by the caller.
pub struct ProjectService<'a> {
    store: &'a dyn Store,
    config: &'a ServerConfig,
}

impl<'a> ProjectService<'a> {
    pub fn new(store: &'a dyn Store, config: &'a ServerConfig) -> Self {
        Self { store, config }
    }
}

fn invalid(message: String) -> Error {
    Error::Validation(message)
}
