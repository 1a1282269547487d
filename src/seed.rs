//! Demo project for trying out the commit graph front-end.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::service::{CreateBranch, CreateCommit, CreateProject, ProjectDetail, ProjectService};

const BRANCHES: &[(&str, &str)] = &[("lightweight", "#10b981"), ("extended", "#f59e0b")];

struct DemoCommit {
    key: &'static str,
    message: &'static str,
    author: &'static str,
    branch: &'static str,
    x: i64,
    y: i64,
    parent: Option<&'static str>,
}

const COMMITS: &[DemoCommit] = &[
    DemoCommit {
        key: "c1",
        message: "Initial robotic arm concept",
        author: "John Smith",
        branch: "main",
        x: 50,
        y: 50,
        parent: None,
    },
    DemoCommit {
        key: "c2",
        message: "Added base plate design",
        author: "Sarah Johnson",
        branch: "main",
        x: 150,
        y: 50,
        parent: Some("c1"),
    },
    DemoCommit {
        key: "c3",
        message: "Integrated motor mount system",
        author: "Mike Chen",
        branch: "main",
        x: 250,
        y: 50,
        parent: Some("c2"),
    },
    DemoCommit {
        key: "c4",
        message: "Added arm segments with joints",
        author: "John Smith",
        branch: "main",
        x: 350,
        y: 50,
        parent: Some("c3"),
    },
    DemoCommit {
        key: "c5",
        message: "Lightweight materials exploration",
        author: "Sarah Johnson",
        branch: "lightweight",
        x: 450,
        y: 120,
        parent: Some("c4"),
    },
    DemoCommit {
        key: "c6",
        message: "Extended reach prototype",
        author: "Mike Chen",
        branch: "extended",
        x: 450,
        y: 180,
        parent: Some("c4"),
    },
    DemoCommit {
        key: "c7",
        message: "Optimized joint bearings",
        author: "Sarah Johnson",
        branch: "main",
        x: 450,
        y: 50,
        parent: Some("c4"),
    },
    DemoCommit {
        key: "c8",
        message: "Added gripper mechanism",
        author: "John Smith",
        branch: "main",
        x: 550,
        y: 50,
        parent: Some("c7"),
    },
    DemoCommit {
        key: "c9",
        message: "Carbon fiber arm segments",
        author: "Sarah Johnson",
        branch: "lightweight",
        x: 550,
        y: 120,
        parent: Some("c5"),
    },
    DemoCommit {
        key: "c10",
        message: "Extended base for stability",
        author: "Mike Chen",
        branch: "extended",
        x: 550,
        y: 180,
        parent: Some("c6"),
    },
];

/// Creates the "Robotic Arm Assembly" demo project with three branches and
/// ten commits.
pub fn seed_demo_project(service: &ProjectService<'_>) -> Result<ProjectDetail> {
    let project = service.create(CreateProject {
        name: "Robotic Arm Assembly".to_string(),
        description: Some("6-DOF robotic arm for manufacturing automation".to_string()),
    })?;

    for (name, color) in BRANCHES {
        service.create_branch(
            &project.id,
            CreateBranch {
                name: (*name).to_string(),
                color: Some((*color).to_string()),
            },
        )?;
    }

    load_commits(service, &project.id, COMMITS)?;

    service.get(&project.id)
}

/// Creates the commits in order. A parent key must name an earlier commit.
fn load_commits(
    service: &ProjectService<'_>,
    project_id: &str,
    commits: &[DemoCommit],
) -> Result<()> {
    let mut ids: HashMap<&str, String> = HashMap::new();
    for demo in commits {
        let parent_commit_id = demo
            .parent
            .map(|key| {
                ids.get(key)
                    .cloned()
                    .ok_or_else(|| Error::not_found(format!("demo commit {key}")))
            })
            .transpose()?;

        let created = service.create_commit(
            project_id,
            CreateCommit {
                message: demo.message.to_string(),
                author: demo.author.to_string(),
                branch_name: demo.branch.to_string(),
                parent_commit_id,
                graph_x: demo.x,
                graph_y: demo.y,
                files: Vec::new(),
            },
        )?;
        ids.insert(demo.key, created.commit.id);
    }
    Ok(())
}
