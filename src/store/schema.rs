pub const SCHEMA: &str = r#"
-- Projects own branches and commits
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Branch names are unique per project, not globally
CREATE TABLE IF NOT EXISTS branches (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT '#3b82f6',
    head_commit_id TEXT REFERENCES commits(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(project_id, name)
);

-- Commits reference their branch by name only (no foreign key)
CREATE TABLE IF NOT EXISTS commits (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    message TEXT NOT NULL,
    author TEXT NOT NULL,
    branch_name TEXT NOT NULL,
    parent_commit_id TEXT REFERENCES commits(id),

    -- Layout position supplied by the client graph renderer
    graph_x INTEGER NOT NULL DEFAULT 0,
    graph_y INTEGER NOT NULL DEFAULT 0,

    created_at TEXT DEFAULT (datetime('now'))
);

-- Content-addressed file metadata, one row per distinct content
CREATE TABLE IF NOT EXISTS files (
    id TEXT PRIMARY KEY,
    filename TEXT NOT NULL,
    file_path TEXT NOT NULL,     -- original path on the author's machine
    file_size INTEGER NOT NULL DEFAULT 0,
    file_type TEXT NOT NULL,     -- .SLDPRT, .SLDASM, .SLDDRW, ...
    content_hash TEXT NOT NULL UNIQUE,
    storage_path TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Files making up the assembly at a commit
CREATE TABLE IF NOT EXISTS commit_files (
    id TEXT PRIMARY KEY,
    commit_id TEXT NOT NULL REFERENCES commits(id) ON DELETE CASCADE,
    file_id TEXT NOT NULL REFERENCES files(id),
    file_path TEXT NOT NULL,     -- path within the assembly structure
    is_main_assembly INTEGER NOT NULL DEFAULT 0
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_projects_created ON projects(created_at);
CREATE INDEX IF NOT EXISTS idx_branches_project ON branches(project_id);
CREATE INDEX IF NOT EXISTS idx_commits_project ON commits(project_id);
CREATE INDEX IF NOT EXISTS idx_commits_parent ON commits(parent_commit_id);
CREATE INDEX IF NOT EXISTS idx_commit_files_commit ON commit_files(commit_id);
CREATE INDEX IF NOT EXISTS idx_commit_files_file ON commit_files(file_id);
"#;
