use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use super::validation::{
    validate_author, validate_branch_name, validate_color, validate_commit_message,
};
use super::{CommitDetail, CommitFileInput, CreateBranch, CreateCommit, ProjectService, invalid};
use crate::error::{Error, Result};
use crate::files::{is_valid_content_hash, storage_path};
use crate::graph::{BranchSummary, GraphNode, branch_summaries, graph_nodes};
use crate::types::{Branch, Commit, CommitFileEntry, DEFAULT_BRANCH_COLOR, File, NewCommitFile};

impl ProjectService<'_> {
    pub fn create_branch(&self, project_id: &str, req: CreateBranch) -> Result<BranchSummary> {
        self.require_project(project_id)?;

        validate_branch_name(&req.name).map_err(invalid)?;
        let color = req
            .color
            .unwrap_or_else(|| DEFAULT_BRANCH_COLOR.to_string());
        validate_color(&color).map_err(invalid)?;

        let branch = Branch {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            name: req.name,
            color,
            head_commit_id: None,
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.store.create_branch(&branch)?;
        tracing::info!("Created branch {} in project {}", branch.name, project_id);

        // A fresh branch may already match commits made under its name.
        let commits = self.store.list_commits(project_id)?;
        let mut summaries = branch_summaries(std::slice::from_ref(&branch), &commits);
        Ok(summaries.remove(0))
    }

    pub fn list_branches(&self, project_id: &str) -> Result<Vec<BranchSummary>> {
        self.require_project(project_id)?;
        let branches = self.store.list_branches(project_id)?;
        let commits = self.store.list_commits(project_id)?;
        Ok(branch_summaries(&branches, &commits))
    }

    /// Records a commit on an existing branch of the project. The parent, if
    /// any, must be a commit of the same project.
    pub fn create_commit(&self, project_id: &str, req: CreateCommit) -> Result<CommitDetail> {
        self.require_project(project_id)?;

        validate_commit_message(&req.message).map_err(invalid)?;
        validate_author(&req.author).map_err(invalid)?;
        validate_branch_name(&req.branch_name).map_err(invalid)?;

        if self
            .store
            .get_branch(project_id, &req.branch_name)?
            .is_none()
        {
            return Err(Error::not_found(format!("branch '{}'", req.branch_name)));
        }

        if let Some(parent_id) = req.parent_commit_id.as_deref() {
            let parent = self
                .store
                .get_commit(parent_id)?
                .ok_or_else(|| Error::not_found(format!("parent commit {parent_id}")))?;
            if parent.project_id != project_id {
                return Err(Error::validation(format!(
                    "parent commit {parent_id} belongs to another project"
                )));
            }
        }

        let now = Utc::now().trunc_subsecs(6);
        let files = self.resolve_files(req.files, now)?;

        let commit = Commit {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            message: req.message,
            author: req.author,
            branch_name: req.branch_name,
            parent_commit_id: req.parent_commit_id,
            graph_x: req.graph_x,
            graph_y: req.graph_y,
            created_at: now,
        };

        let files = self.store.create_commit(&commit, &files)?;
        tracing::info!(
            "Created commit {} on {} in project {} ({} files)",
            commit.id,
            commit.branch_name,
            project_id,
            files.len()
        );

        Ok(CommitDetail { commit, files })
    }

    /// Commits of the project in creation order, shaped for the graph view.
    pub fn list_commits(&self, project_id: &str) -> Result<Vec<GraphNode>> {
        self.require_project(project_id)?;
        let commits = self.store.list_commits(project_id)?;
        Ok(graph_nodes(&commits))
    }

    pub fn get_commit(&self, id: &str) -> Result<CommitDetail> {
        let commit = self.require_commit(id)?;
        let files = self.store.list_commit_files(id)?;
        Ok(CommitDetail { commit, files })
    }

    /// The commit and its ancestors, newest first.
    pub fn commit_history(&self, id: &str) -> Result<Vec<GraphNode>> {
        let ancestry = self.store.commit_ancestry(id)?;
        if ancestry.is_empty() {
            return Err(Error::not_found(format!("commit {id}")));
        }
        Ok(graph_nodes(&ancestry))
    }

    pub fn commit_files(&self, id: &str) -> Result<Vec<CommitFileEntry>> {
        self.require_commit(id)?;
        self.store.list_commit_files(id)
    }

    fn require_commit(&self, id: &str) -> Result<Commit> {
        self.store
            .get_commit(id)?
            .ok_or_else(|| Error::not_found(format!("commit {id}")))
    }

    fn resolve_files(
        &self,
        inputs: Vec<CommitFileInput>,
        now: chrono::DateTime<Utc>,
    ) -> Result<Vec<NewCommitFile>> {
        if inputs.iter().filter(|f| f.is_main_assembly).count() > 1 {
            return Err(Error::validation(
                "only one file can be the main assembly",
            ));
        }

        inputs
            .into_iter()
            .map(|input| {
                let manifest = input.manifest;
                if !is_valid_content_hash(&manifest.content_hash) {
                    return Err(Error::validation(format!(
                        "{}: content hash must be 64 lowercase hex characters",
                        manifest.filename
                    )));
                }
                if manifest.file_size < 0 || manifest.file_size > self.config.max_file_size {
                    return Err(Error::validation(format!(
                        "{}: size {} is outside 0..={}",
                        manifest.filename, manifest.file_size, self.config.max_file_size
                    )));
                }
                if !self.config.allows_extension(&manifest.file_type) {
                    return Err(Error::validation(format!(
                        "{}: file type '{}' is not allowed",
                        manifest.filename, manifest.file_type
                    )));
                }

                let assembly_path = input
                    .assembly_path
                    .unwrap_or_else(|| manifest.filename.clone());
                Ok(NewCommitFile {
                    file: File {
                        id: Uuid::new_v4().to_string(),
                        storage_path: storage_path(&manifest.content_hash)?,
                        filename: manifest.filename,
                        file_path: manifest.file_path,
                        file_size: manifest.file_size,
                        file_type: manifest.file_type,
                        content_hash: manifest.content_hash,
                        created_at: now,
                    },
                    assembly_path,
                    is_main_assembly: input.is_main_assembly,
                })
            })
            .collect()
    }
}
