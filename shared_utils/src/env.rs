use thiserror::Error;

/// A credential or setting could not be read from the process environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvVarError {
    /// The variable is not set (or is not valid unicode).
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// The variable is set but holds only whitespace.
    #[error("Environment variable {0} is set but empty")]
    Empty(String),
}

/// Reads an environment variable, returning a structured error if it's missing
/// or blank.
///
/// Surrounding whitespace is trimmed, since API keys pasted into `.env` files
/// frequently pick up a trailing newline or space.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvVarError> {
    let raw = std::env::var(name).map_err(|_| EnvVarError::Missing(name.to_string()))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvVarError::Empty(name.to_string()));
    }
    Ok(trimmed.to_string())
}
