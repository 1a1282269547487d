const MAX_PROJECT_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_COMMIT_MESSAGE_LEN: usize = 200;
const MAX_AUTHOR_LEN: usize = 100;
const MAX_BRANCH_NAME_LEN: usize = 100;

// Lengths are counted in characters, not bytes.
fn validate_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if value.chars().count() > max_len {
        return Err(format!("{field} cannot exceed {max_len} characters"));
    }
    Ok(())
}

pub fn validate_project_name(name: &str) -> Result<(), String> {
    validate_text(name, "Project name", MAX_PROJECT_NAME_LEN)
}

pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )),
        _ => Ok(()),
    }
}

pub fn validate_commit_message(message: &str) -> Result<(), String> {
    validate_text(message, "Commit message", MAX_COMMIT_MESSAGE_LEN)
}

pub fn validate_author(author: &str) -> Result<(), String> {
    validate_text(author, "Author", MAX_AUTHOR_LEN)
}

pub fn validate_branch_name(name: &str) -> Result<(), String> {
    validate_text(name, "Branch name", MAX_BRANCH_NAME_LEN)?;
    if name.chars().any(char::is_whitespace) {
        return Err("Branch name cannot contain whitespace".to_string());
    }
    Ok(())
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn validate_color(color: &str) -> Result<(), String> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(format!("Color '{color}' is not a hex color like #3b82f6"));
    }
    Ok(())
}
