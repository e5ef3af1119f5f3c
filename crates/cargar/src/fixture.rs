//! Fixture loading for load runs.
//!
//! A run is parameterized by three CSV files in the data directory:
//! `credentials.csv` (`username,password`), `stream_ids.csv` (one id per
//! row), and `category_slugs.csv` (one slug per row). All three are loaded
//! exactly once, before any session starts; a missing or malformed file
//! aborts the run.

use crate::result::{CargarError, CargarResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A username/password pair consumed by at most one session per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credential {
    /// Create a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Opaque stream identifier, shared read-only across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamId(pub String);

impl StreamId {
    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque category slug, shared read-only across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySlug(pub String);

impl CategorySlug {
    /// The slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three record sets a run is parameterized by, in file order.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    /// Login credentials, one per simulated authenticated user
    pub credentials: Vec<Credential>,
    /// Stream ids for the detail/open/like actions
    pub stream_ids: Vec<StreamId>,
    /// Category slugs for the filter action
    pub category_slugs: Vec<CategorySlug>,
}

impl FixtureSet {
    /// Load all three fixture files from `dir`.
    ///
    /// # Errors
    ///
    /// Returns a `CargarError::Fixture` if any file is missing or any row
    /// has the wrong arity. Rows are not validated beyond arity.
    pub fn load(dir: &Path) -> CargarResult<Self> {
        Ok(Self {
            credentials: load_credentials(&dir.join("credentials.csv"))?,
            stream_ids: load_single_column(&dir.join("stream_ids.csv"))?
                .into_iter()
                .map(StreamId)
                .collect(),
            category_slugs: load_single_column(&dir.join("category_slugs.csv"))?
                .into_iter()
                .map(CategorySlug)
                .collect(),
        })
    }
}

/// Load `username,password` rows from a credentials CSV.
pub fn load_credentials(path: &Path) -> CargarResult<Vec<Credential>> {
    let mut reader = open_reader(path)?;
    let mut credentials = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| row_error(path, line, &e))?;
        match (record.get(0), record.get(1)) {
            (Some(username), Some(password)) => {
                credentials.push(Credential::new(username, password));
            }
            _ => {
                return Err(CargarError::fixture(format!(
                    "{}: row {} needs two fields (username,password)",
                    path.display(),
                    line + 1
                )))
            }
        }
    }
    Ok(credentials)
}

/// Load single-field rows (stream ids, category slugs).
fn load_single_column(path: &Path) -> CargarResult<Vec<String>> {
    let mut reader = open_reader(path)?;
    let mut values = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| row_error(path, line, &e))?;
        match record.get(0) {
            Some(value) => values.push(value.to_string()),
            None => {
                return Err(CargarError::fixture(format!(
                    "{}: row {} is empty",
                    path.display(),
                    line + 1
                )))
            }
        }
    }
    Ok(values)
}

fn open_reader(path: &Path) -> CargarResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| CargarError::fixture(format!("{}: {e}", path.display())))
}

fn row_error(path: &Path, line: usize, err: &csv::Error) -> CargarError {
    CargarError::fixture(format!("{}: row {}: {err}", path.display(), line + 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn full_fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "credentials.csv", "alice,secret1\nbob,secret2\n");
        write_file(dir.path(), "stream_ids.csv", "s1\ns2\n");
        write_file(dir.path(), "category_slugs.csv", "nature\ntech\n");
        dir
    }

    #[test]
    fn test_load_full_set() {
        let dir = full_fixture_dir();
        let fixtures = FixtureSet::load(dir.path()).unwrap();
        assert_eq!(fixtures.credentials.len(), 2);
        assert_eq!(fixtures.stream_ids.len(), 2);
        assert_eq!(fixtures.category_slugs.len(), 2);
    }

    #[test]
    fn test_load_preserves_file_order() {
        let dir = full_fixture_dir();
        let fixtures = FixtureSet::load(dir.path()).unwrap();
        assert_eq!(fixtures.credentials[0], Credential::new("alice", "secret1"));
        assert_eq!(fixtures.credentials[1], Credential::new("bob", "secret2"));
        assert_eq!(fixtures.stream_ids[0].as_str(), "s1");
        assert_eq!(fixtures.category_slugs[1].as_str(), "tech");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = FixtureSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, CargarError::Fixture { .. }));
        assert!(err.to_string().contains("credentials.csv"));
    }

    #[test]
    fn test_credentials_wrong_arity() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "credentials.csv", "only_username\n");
        let err = load_credentials(&dir.path().join("credentials.csv")).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_empty_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "credentials.csv", "");
        write_file(dir.path(), "stream_ids.csv", "");
        write_file(dir.path(), "category_slugs.csv", "");
        let fixtures = FixtureSet::load(dir.path()).unwrap();
        assert!(fixtures.credentials.is_empty());
        assert!(fixtures.stream_ids.is_empty());
        assert!(fixtures.category_slugs.is_empty());
    }

    #[test]
    fn test_stream_id_display() {
        let id = StreamId("abc123".to_string());
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_category_slug_display() {
        let slug = CategorySlug("wildlife".to_string());
        assert_eq!(slug.to_string(), "wildlife");
    }

    #[test]
    fn test_no_validation_beyond_arity() {
        // Whitespace and odd characters pass through untouched.
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "credentials.csv", " spacey , pa ss \n");
        let creds = load_credentials(&dir.path().join("credentials.csv")).unwrap();
        assert_eq!(creds[0].username, " spacey ");
        assert_eq!(creds[0].password, " pa ss ");
    }
}
