mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Operations that write more than one row are atomic: they either commit
/// every write or leave the store untouched.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Project operations
    /// Persists a project together with its default branch.
    fn create_project(&self, project: &Project, default_branch: &Branch) -> Result<()>;
    fn get_project(&self, id: &str) -> Result<Option<Project>>;
    /// All projects, oldest first.
    fn list_projects(&self) -> Result<Vec<Project>>;
    /// Removes the project with its branches, commits and commit file links.
    /// Files left without any link are removed as well.
    fn delete_project(&self, id: &str) -> Result<bool>;

    // Branch operations
    fn create_branch(&self, branch: &Branch) -> Result<()>;
    fn get_branch(&self, project_id: &str, name: &str) -> Result<Option<Branch>>;
    fn list_branches(&self, project_id: &str) -> Result<Vec<Branch>>;

    // Commit operations
    /// Inserts the commit, resolves and links its files, and moves the head
    /// of the branch named by `commit.branch_name`.
    fn create_commit(&self, commit: &Commit, files: &[NewCommitFile])
    -> Result<Vec<CommitFileEntry>>;
    fn get_commit(&self, id: &str) -> Result<Option<Commit>>;
    /// Commits of a project, oldest first.
    fn list_commits(&self, project_id: &str) -> Result<Vec<Commit>>;
    /// The commit followed by its parent chain back to the root commit.
    fn commit_ancestry(&self, id: &str) -> Result<Vec<Commit>>;

    // File operations
    /// Inserts the file unless a row with the same content hash exists, in
    /// which case the existing row is returned.
    fn get_or_create_file(&self, file: &File) -> Result<File>;
    fn get_file_by_hash(&self, content_hash: &str) -> Result<Option<File>>;
    fn list_commit_files(&self, commit_id: &str) -> Result<Vec<CommitFileEntry>>;
}
