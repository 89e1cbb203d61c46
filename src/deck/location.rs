//! Where a deck document lives, and how extension references resolve against it

use std::fmt;
use std::path::{Component, Path, PathBuf};

use reqwest::Url;

use super::errors::FetchError;

/// A deck document's location: a local file or an http(s) URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

fn is_remote_reference(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

impl Location {
    /// Interpret a standalone reference (URL or path)
    pub fn parse(reference: &str) -> Result<Self, FetchError> {
        if is_remote_reference(reference) {
            let url = Url::parse(reference)
                .map_err(|e| FetchError::InvalidLocation(format!("{}: {}", reference, e)))?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::File(normalize(Path::new(reference))))
        }
    }

    /// Resolve an extension reference found in the document at `self`.
    ///
    /// Absolute references are used as-is; relative ones are taken from the
    /// directory containing this document, after dropping one leading `./`.
    pub fn join(&self, reference: &str) -> Result<Self, FetchError> {
        if is_remote_reference(reference) {
            return Self::parse(reference);
        }

        let relative = reference.strip_prefix("./").unwrap_or(reference);
        match self {
            Self::File(path) => {
                let candidate = Path::new(relative);
                if candidate.is_absolute() {
                    return Ok(Self::File(normalize(candidate)));
                }
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Self::File(normalize(&dir.join(candidate))))
            }
            Self::Remote(url) => url
                .join(relative)
                .map(Self::Remote)
                .map_err(|e| FetchError::InvalidLocation(format!("{}: {}", reference, e))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Self::File(normalize(&path))
    }
}

/// Lexically collapse `.` and `..` so equal files compare equal
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
