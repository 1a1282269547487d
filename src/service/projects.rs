use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use super::validation::{validate_description, validate_project_name};
use super::{CreateProject, ProjectDetail, ProjectService, invalid};
use crate::error::{Error, Result};
use crate::graph::{ProjectGraph, ProjectSummary};
use crate::types::{Branch, DEFAULT_BRANCH_COLOR, DEFAULT_BRANCH_NAME, Project};

impl ProjectService<'_> {
    /// Creates a project with its `main` branch. Nothing is written when
    /// validation fails.
    pub fn create(&self, req: CreateProject) -> Result<ProjectDetail> {
        validate_project_name(&req.name).map_err(invalid)?;
        validate_description(req.description.as_deref()).map_err(invalid)?;

        let now = Utc::now().trunc_subsecs(6);
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            description: req.description,
            created_at: now,
            updated_at: now,
        };
        let main = Branch {
            id: Uuid::new_v4().to_string(),
            project_id: project.id.clone(),
            name: DEFAULT_BRANCH_NAME.to_string(),
            color: DEFAULT_BRANCH_COLOR.to_string(),
            head_commit_id: None,
            created_at: now,
        };

        self.store.create_project(&project, &main)?;
        tracing::info!("Created project {} ({})", project.id, project.name);

        let graph = ProjectGraph {
            project,
            branches: vec![main],
            commits: Vec::new(),
        };
        Ok(detail(&graph))
    }

    /// Every project with its derived aggregates, oldest first.
    pub fn list(&self) -> Result<Vec<ProjectSummary>> {
        self.store
            .list_projects()?
            .into_iter()
            .map(|project| -> Result<ProjectSummary> {
                Ok(ProjectGraph::load(self.store, project)?.summary())
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<ProjectDetail> {
        let project = self.require_project(id)?;
        let graph = ProjectGraph::load(self.store, project)?;
        Ok(detail(&graph))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_project(id)? {
            return Err(Error::not_found(format!("project {id}")));
        }
        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    pub(super) fn require_project(&self, id: &str) -> Result<Project> {
        self.store
            .get_project(id)?
            .ok_or_else(|| Error::not_found(format!("project {id}")))
    }
}

fn detail(graph: &ProjectGraph) -> ProjectDetail {
    ProjectDetail {
        id: graph.project.id.clone(),
        name: graph.project.name.clone(),
        description: graph.project.description.clone(),
        branches: graph.branch_summaries(),
        created_at: graph.project.created_at,
        updated_at: graph.project.updated_at,
    }
}
