//! Read-only aggregates over a project's commit graph.
//!
//! Nothing here writes to the store. Per-branch counts join commits to
//! branches by name, since commits only carry the name of the branch they
//! were made on.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::types::{Branch, Commit, Project};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub id: String,
    pub name: String,
    pub commit_count: usize,
    pub color: String,
}

/// A commit as the client graph renders it. Coordinates are returned exactly
/// as they were stored.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub message: String,
    pub author: String,
    pub branch: String,
    pub timestamp: DateTime<Utc>,
    pub x: i64,
    pub y: i64,
    pub parents: Vec<String>,
}

impl From<&Commit> for GraphNode {
    fn from(commit: &Commit) -> Self {
        Self {
            id: commit.id.clone(),
            message: commit.message.clone(),
            author: commit.author.clone(),
            branch: commit.branch_name.clone(),
            timestamp: commit.created_at,
            x: commit.graph_x,
            y: commit.graph_y,
            parents: commit.parent_commit_id.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub branches: Vec<BranchSummary>,
    pub total_commits: usize,
    pub contributors: Vec<String>,
}

/// One summary per branch. Branches sharing a name each count every commit
/// made on that name.
pub fn branch_summaries(branches: &[Branch], commits: &[Commit]) -> Vec<BranchSummary> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for commit in commits {
        *counts.entry(commit.branch_name.as_str()).or_default() += 1;
    }

    branches
        .iter()
        .map(|branch| BranchSummary {
            id: branch.id.clone(),
            name: branch.name.clone(),
            commit_count: counts.get(branch.name.as_str()).copied().unwrap_or(0),
            color: branch.color.clone(),
        })
        .collect()
}

/// Distinct authors in the order they first appear.
pub fn contributors(commits: &[Commit]) -> Vec<String> {
    let mut seen = HashSet::new();
    commits
        .iter()
        .filter(|c| seen.insert(c.author.as_str()))
        .map(|c| c.author.clone())
        .collect()
}

pub fn last_modified(project: &Project, commits: &[Commit]) -> DateTime<Utc> {
    commits
        .iter()
        .map(|c| c.created_at)
        .max()
        .unwrap_or(project.created_at)
}

pub fn total_commits(commits: &[Commit]) -> usize {
    commits.len()
}

pub fn graph_nodes(commits: &[Commit]) -> Vec<GraphNode> {
    commits.iter().map(GraphNode::from).collect()
}

/// A project together with its branches and commits, read once from the store.
pub struct ProjectGraph {
    pub project: Project,
    pub branches: Vec<Branch>,
    pub commits: Vec<Commit>,
}

impl ProjectGraph {
    pub fn load(store: &dyn Store, project: Project) -> Result<Self> {
        let branches = store.list_branches(&project.id)?;
        let commits = store.list_commits(&project.id)?;
        Ok(Self {
            project,
            branches,
            commits,
        })
    }

    pub fn branch_summaries(&self) -> Vec<BranchSummary> {
        branch_summaries(&self.branches, &self.commits)
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.project.id.clone(),
            name: self.project.name.clone(),
            description: self.project.description.clone(),
            last_modified: last_modified(&self.project, &self.commits),
            branches: self.branch_summaries(),
            total_commits: total_commits(&self.commits),
            contributors: contributors(&self.commits),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::types::DEFAULT_BRANCH_COLOR;

    fn project() -> Project {
        let created = "2025-08-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        Project {
            id: "proj-1".to_string(),
            name: "Robotic Arm Assembly".to_string(),
            description: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn branch(id: &str, name: &str) -> Branch {
        Branch {
            id: id.to_string(),
            project_id: "proj-1".to_string(),
            name: name.to_string(),
            color: DEFAULT_BRANCH_COLOR.to_string(),
            head_commit_id: None,
            created_at: Utc::now(),
        }
    }

    fn commit(id: &str, branch: &str, author: &str, hours: i64) -> Commit {
        Commit {
            id: id.to_string(),
            project_id: "proj-1".to_string(),
            message: format!("commit {id}"),
            author: author.to_string(),
            branch_name: branch.to_string(),
            parent_commit_id: None,
            graph_x: 50 * hours,
            graph_y: 50,
            created_at: project().created_at + Duration::hours(hours),
        }
    }

    #[test]
    fn test_empty_project() {
        let branches = vec![branch("b-1", "main")];
        let summaries = branch_summaries(&branches, &[]);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].commit_count, 0);
        assert!(contributors(&[]).is_empty());
        assert_eq!(total_commits(&[]), 0);
        assert_eq!(last_modified(&project(), &[]), project().created_at);
    }

    #[test]
    fn test_counts_sum_to_total_with_unique_names() {
        let branches = vec![branch("b-1", "main"), branch("b-2", "variant")];
        let commits = vec![
            commit("c-1", "main", "John Smith", 1),
            commit("c-2", "main", "John Smith", 2),
            commit("c-3", "variant", "Mike Chen", 3),
            commit("c-4", "main", "Sarah Johnson", 4),
            commit("c-5", "variant", "Mike Chen", 5),
        ];

        let summaries = branch_summaries(&branches, &commits);
        assert_eq!(summaries[0].commit_count, 3);
        assert_eq!(summaries[1].commit_count, 2);

        let sum: usize = summaries.iter().map(|s| s.commit_count).sum();
        assert_eq!(sum, total_commits(&commits));
    }

    #[test]
    fn test_duplicate_branch_names_count_independently() {
        let branches = vec![branch("b-1", "main"), branch("b-2", "main")];
        let commits = vec![
            commit("c-1", "main", "John Smith", 1),
            commit("c-2", "main", "John Smith", 2),
        ];

        let summaries = branch_summaries(&branches, &commits);
        assert!(summaries.iter().all(|s| s.commit_count == 2));

        let sum: usize = summaries.iter().map(|s| s.commit_count).sum();
        assert_ne!(sum, total_commits(&commits));
    }

    #[test]
    fn test_commits_on_unknown_branch_are_total_only() {
        let branches = vec![branch("b-1", "main")];
        let commits = vec![
            commit("c-1", "main", "John Smith", 1),
            commit("c-2", "deleted-branch", "John Smith", 2),
        ];

        assert_eq!(branch_summaries(&branches, &commits)[0].commit_count, 1);
        assert_eq!(total_commits(&commits), 2);
    }

    #[test]
    fn test_contributors_are_distinct() {
        let commits = vec![
            commit("c-1", "main", "John Smith", 1),
            commit("c-2", "main", "Sarah Johnson", 2),
            commit("c-3", "main", "John Smith", 3),
            commit("c-4", "main", "Mike Chen", 4),
        ];

        assert_eq!(
            contributors(&commits),
            vec!["John Smith", "Sarah Johnson", "Mike Chen"]
        );
    }

    #[test]
    fn test_last_modified_is_latest_commit() {
        let commits = vec![
            commit("c-1", "main", "John Smith", 5),
            commit("c-2", "main", "John Smith", 9),
            commit("c-3", "main", "John Smith", 2),
        ];

        assert_eq!(
            last_modified(&project(), &commits),
            project().created_at + Duration::hours(9)
        );
    }

    #[test]
    fn test_graph_nodes_keep_layout_and_parent() {
        let mut child = commit("c-2", "main", "John Smith", 2);
        child.parent_commit_id = Some("c-1".to_string());
        child.graph_x = -17;
        child.graph_y = 180;

        let nodes = graph_nodes(&[commit("c-1", "main", "John Smith", 1), child]);
        assert!(nodes[0].parents.is_empty());
        assert_eq!(nodes[1].parents, vec!["c-1"]);
        assert_eq!((nodes[1].x, nodes[1].y), (-17, 180));
        assert_eq!(nodes[1].branch, "main");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let graph = ProjectGraph {
            project: project(),
            branches: vec![branch("b-1", "main")],
            commits: vec![commit("c-1", "main", "John Smith", 1)],
        };

        let json = serde_json::to_value(graph.summary()).unwrap();
        assert_eq!(json["totalCommits"], 1);
        assert_eq!(json["branches"][0]["commitCount"], 1);
        assert_eq!(json["branches"][0]["color"], "#3b82f6");
        assert_eq!(json["contributors"][0], "John Smith");
        assert!(json.get("lastModified").is_some());
    }
}
