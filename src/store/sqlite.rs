use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const PROJECT_COLUMNS: &str = "id, name, description, created_at, updated_at";
const BRANCH_COLUMNS: &str = "id, project_id, name, color, head_commit_id, created_at";
const COMMIT_COLUMNS: &str = "id, project_id, message, author, branch_name, parent_commit_id, \
                              graph_x, graph_y, created_at";
const FILE_COLUMNS: &str =
    "id, filename, file_path, file_size, file_type, content_hash, storage_path, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
}

/// Reads a timestamp column. Unparseable text fails the row.
fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

// Fixed-width so that text ordering in SQL matches chronological ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: datetime_column(row, 3)?,
        updated_at: datetime_column(row, 4)?,
    })
}

fn branch_from_row(row: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        color: row.get(3)?,
        head_commit_id: row.get(4)?,
        created_at: datetime_column(row, 5)?,
    })
}

fn commit_from_row(row: &Row<'_>) -> rusqlite::Result<Commit> {
    Ok(Commit {
        id: row.get(0)?,
        project_id: row.get(1)?,
        message: row.get(2)?,
        author: row.get(3)?,
        branch_name: row.get(4)?,
        parent_commit_id: row.get(5)?,
        graph_x: row.get(6)?,
        graph_y: row.get(7)?,
        created_at: datetime_column(row, 8)?,
    })
}

fn file_from_row(row: &Row<'_>) -> rusqlite::Result<File> {
    Ok(File {
        id: row.get(0)?,
        filename: row.get(1)?,
        file_path: row.get(2)?,
        file_size: row.get(3)?,
        file_type: row.get(4)?,
        content_hash: row.get(5)?,
        storage_path: row.get(6)?,
        created_at: datetime_column(row, 7)?,
    })
}

fn insert_branch(conn: &Connection, branch: &Branch) -> Result<()> {
    let result = conn.execute(
        "INSERT INTO branches (id, project_id, name, color, head_commit_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            branch.id,
            branch.project_id,
            branch.name,
            branch.color,
            branch.head_commit_id,
            format_datetime(&branch.created_at),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(Error::Conflict(format!(
            "branch '{}' already exists",
            branch.name
        ))),
        Err(e) => Err(Error::from(e)),
    }
}

fn select_file_by_hash(conn: &Connection, content_hash: &str) -> Result<Option<File>> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM files WHERE content_hash = ?1"),
        params![content_hash],
        file_from_row,
    )
    .optional()
    .map_err(Error::from)
}

fn insert_or_get_file(conn: &Connection, file: &File) -> Result<File> {
    let result = conn.execute(
        "INSERT INTO files (id, filename, file_path, file_size, file_type, content_hash, storage_path, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            file.id,
            file.filename,
            file.file_path,
            file.file_size,
            file.file_type,
            file.content_hash,
            file.storage_path,
            format_datetime(&file.created_at),
        ],
    );

    match result {
        Ok(_) => Ok(file.clone()),
        // Same content already stored: the first row wins.
        Err(e) if is_unique_violation(&e) => select_file_by_hash(conn, &file.content_hash)?
            .ok_or_else(|| Error::not_found(format!("file {}", file.content_hash))),
        Err(e) => Err(Error::from(e)),
    }
}

fn touch_project(conn: &Connection, project_id: &str, at: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
        params![format_datetime(at), project_id],
    )?;
    Ok(())
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Project operations

    fn create_project(&self, project: &Project, default_branch: &Branch) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO projects (id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                project.id,
                project.name,
                project.description,
                format_datetime(&project.created_at),
                format_datetime(&project.updated_at),
            ],
        )?;
        insert_branch(&tx, default_branch)?;

        tx.commit()?;
        Ok(())
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at, rowid"
        ))?;

        let rows = stmt.query_map([], project_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_project(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM projects WHERE id = ?1", params![id], |_| {
                Ok(())
            })
            .optional()?
            .is_some();
        if !exists {
            return Ok(false);
        }

        tx.execute(
            "DELETE FROM commit_files
             WHERE commit_id IN (SELECT id FROM commits WHERE project_id = ?1)",
            params![id],
        )?;
        tx.execute(
            "UPDATE branches SET head_commit_id = NULL WHERE project_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM commits WHERE project_id = ?1", params![id])?;
        tx.execute("DELETE FROM branches WHERE project_id = ?1", params![id])?;
        let rows = tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;

        let collected = tx.execute(
            "DELETE FROM files WHERE id NOT IN (SELECT file_id FROM commit_files)",
            [],
        )?;
        if collected > 0 {
            tracing::debug!("Removed {} unreferenced files", collected);
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    // Branch operations

    fn create_branch(&self, branch: &Branch) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        insert_branch(&tx, branch)?;
        touch_project(&tx, &branch.project_id, &branch.created_at)?;

        tx.commit()?;
        Ok(())
    }

    fn get_branch(&self, project_id: &str, name: &str) -> Result<Option<Branch>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {BRANCH_COLUMNS} FROM branches WHERE project_id = ?1 AND name = ?2"),
            params![project_id, name],
            branch_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_branches(&self, project_id: &str) -> Result<Vec<Branch>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branches WHERE project_id = ?1 ORDER BY created_at, rowid"
        ))?;

        let rows = stmt.query_map(params![project_id], branch_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Commit operations

    fn create_commit(
        &self,
        commit: &Commit,
        files: &[NewCommitFile],
    ) -> Result<Vec<CommitFileEntry>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO commits (id, project_id, message, author, branch_name, parent_commit_id, graph_x, graph_y, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                commit.id,
                commit.project_id,
                commit.message,
                commit.author,
                commit.branch_name,
                commit.parent_commit_id,
                commit.graph_x,
                commit.graph_y,
                format_datetime(&commit.created_at),
            ],
        )?;

        let mut entries = Vec::with_capacity(files.len());
        for new_file in files {
            let file = insert_or_get_file(&tx, &new_file.file)?;
            let link = CommitFile {
                id: Uuid::new_v4().to_string(),
                commit_id: commit.id.clone(),
                file_id: file.id.clone(),
                file_path: new_file.assembly_path.clone(),
                is_main_assembly: new_file.is_main_assembly,
            };
            tx.execute(
                "INSERT INTO commit_files (id, commit_id, file_id, file_path, is_main_assembly)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    link.id,
                    link.commit_id,
                    link.file_id,
                    link.file_path,
                    link.is_main_assembly,
                ],
            )?;
            entries.push(CommitFileEntry { link, file });
        }

        tx.execute(
            "UPDATE branches SET head_commit_id = ?1 WHERE project_id = ?2 AND name = ?3",
            params![commit.id, commit.project_id, commit.branch_name],
        )?;
        touch_project(&tx, &commit.project_id, &commit.created_at)?;

        tx.commit()?;
        Ok(entries)
    }

    fn get_commit(&self, id: &str) -> Result<Option<Commit>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {COMMIT_COLUMNS} FROM commits WHERE id = ?1"),
            params![id],
            commit_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_commits(&self, project_id: &str) -> Result<Vec<Commit>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMMIT_COLUMNS} FROM commits WHERE project_id = ?1 ORDER BY created_at, rowid"
        ))?;

        let rows = stmt.query_map(params![project_id], commit_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn commit_ancestry(&self, id: &str) -> Result<Vec<Commit>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "WITH RECURSIVE ancestry(id, depth) AS (
                 SELECT id, 0 FROM commits WHERE id = ?1
                 UNION ALL
                 SELECT c.parent_commit_id, a.depth + 1
                 FROM commits c JOIN ancestry a ON c.id = a.id
                 WHERE c.parent_commit_id IS NOT NULL
             )
             SELECT c.id, c.project_id, c.message, c.author, c.branch_name, c.parent_commit_id,
                    c.graph_x, c.graph_y, c.created_at
             FROM ancestry a JOIN commits c ON c.id = a.id
             ORDER BY a.depth",
        )?;

        let rows = stmt.query_map(params![id], commit_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // File operations

    fn get_or_create_file(&self, file: &File) -> Result<File> {
        let conn = self.conn();
        insert_or_get_file(&conn, file)
    }

    fn get_file_by_hash(&self, content_hash: &str) -> Result<Option<File>> {
        let conn = self.conn();
        select_file_by_hash(&conn, content_hash)
    }

    fn list_commit_files(&self, commit_id: &str) -> Result<Vec<CommitFileEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT cf.id, cf.commit_id, cf.file_id, cf.file_path, cf.is_main_assembly,
                    f.id, f.filename, f.file_path, f.file_size, f.file_type, f.content_hash,
                    f.storage_path, f.created_at
             FROM commit_files cf
             JOIN files f ON f.id = cf.file_id
             WHERE cf.commit_id = ?1
             ORDER BY cf.is_main_assembly DESC, cf.file_path",
        )?;

        let rows = stmt.query_map(params![commit_id], |row| {
            Ok(CommitFileEntry {
                link: CommitFile {
                    id: row.get(0)?,
                    commit_id: row.get(1)?,
                    file_id: row.get(2)?,
                    file_path: row.get(3)?,
                    is_main_assembly: row.get(4)?,
                },
                file: File {
                    id: row.get(5)?,
                    filename: row.get(6)?,
                    file_path: row.get(7)?,
                    file_size: row.get(8)?,
                    file_type: row.get(9)?,
                    content_hash: row.get(10)?,
                    storage_path: row.get(11)?,
                    created_at: datetime_column(row, 12)?,
                },
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
