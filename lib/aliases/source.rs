use std::path::{Path, PathBuf};

use include_dir::{Dir, include_dir};
use tokio::fs::{read_dir, read_to_string};
use tracing::{debug, trace};

pub const LIST_EXTENSION: &str = "list";
pub const NO_NAMESPACE: &str = "_";

static EMBEDDED_LISTS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/lists");

/**
    A named list of alias definitions, one per line.

    The name is the file stem of the list, and becomes the namespace
    of every alias in it, except for the special `_` name.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSource {
    pub(crate) name: String,
    pub(crate) contents: String,
}

impl AliasSource {
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /**
        Creates a new source from a list file name and its contents.

        Returns `None` if the file name does not end with `.list`.
    */
    #[must_use]
    pub fn from_file_name(file_name: &str, contents: impl Into<String>) -> Option<Self> {
        let name = file_name.strip_suffix(&format!(".{LIST_EXTENSION}"))?;
        Some(Self::new(name, contents))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /**
        Returns the namespace for aliases in this source, which is
        empty for the special `_` source and the source name otherwise.
    */
    #[must_use]
    pub fn namespace(&self) -> &str {
        if self.name == NO_NAMESPACE {
            ""
        } else {
            &self.name
        }
    }

    /**
        Returns all alias lists that were compiled into this binary.
    */
    #[must_use]
    pub fn embedded() -> Vec<Self> {
        let mut sources = EMBEDDED_LISTS
            .files()
            .filter_map(|file| {
                let file_name = file.path().file_name()?.to_str()?;
                let contents = file.contents_utf8()?;
                Self::from_file_name(file_name, contents)
            })
            .collect::<Vec<_>>();
        sources.sort_by(|a, b| a.name.cmp(&b.name));
        sources
    }

    /**
        Reads all alias lists in the given directory.

        Files that do not end with `.list` are skipped,
        and a missing directory contains no lists.

        # Errors

        - If the directory exists but could not be read.
        - If any list file could not be read as UTF-8 text.
    */
    pub async fn read_dir(dir: impl AsRef<Path>) -> std::io::Result<Vec<Self>> {
        let dir = dir.as_ref();

        let mut reader = match read_dir(dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(?dir, "alias list directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut paths = Vec::<PathBuf>::new();
        while let Some(entry) = reader.next_entry().await? {
            if entry.file_type().await?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut sources = Vec::new();
        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.ends_with(&format!(".{LIST_EXTENSION}")) {
                trace!(?path, "skipping non-list file");
                continue;
            }
            let contents = read_to_string(&path).await?;
            debug!(?path, "read alias list");
            sources.extend(Self::from_file_name(file_name, contents));
        }

        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_name_requires_extension() {
        let source = AliasSource::from_file_name("go.list", "").unwrap();
        assert_eq!(source.name(), "go");
        assert!(AliasSource::from_file_name("go.txt", "").is_none());
        assert!(AliasSource::from_file_name("go", "").is_none());
    }

    #[test]
    fn namespace_of_underscore_is_empty() {
        assert_eq!(AliasSource::new("_", "").namespace(), "");
        assert_eq!(AliasSource::new("x", "").namespace(), "x");
    }

    #[test]
    fn embedded_lists_are_present() {
        let sources = AliasSource::embedded();
        assert!(sources.iter().any(|s| s.name() == NO_NAMESPACE));
        assert!(sources.windows(2).all(|w| w[0].name <= w[1].name));
    }

    #[tokio::test]
    async fn read_dir_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("b.list"), "b example.com/b@latest")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("_.list"), "a example.com/a@latest")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "not a list")
            .await
            .unwrap();
        tokio::fs::create_dir(dir.path().join("nested.list"))
            .await
            .unwrap();

        let sources = AliasSource::read_dir(dir.path()).await.unwrap();
        let names = sources.iter().map(AliasSource::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["_", "b"]);
        assert_eq!(sources[1].contents(), "b example.com/b@latest");
    }

    #[tokio::test]
    async fn read_dir_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sources = AliasSource::read_dir(dir.path().join("missing"))
            .await
            .unwrap();
        assert!(sources.is_empty());
    }
}
