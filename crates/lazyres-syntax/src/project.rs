//! In-memory projects and their JSON fixture format.
//!
//! ```json
//! { "files": [ { "path": "shapes.kt", "package": "demo",
//!                "declarations": [ { "decl": "class", "name": "Point" } ] } ] }
//! ```

use crate::ast::Declaration;
use lazyres_common::FqName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One source file: a package fragment plus its top-level declarations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: Arc<str>,
    #[serde(default = "FqName::root")]
    pub package: FqName,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl SourceFile {
    pub fn new(path: &str, package: FqName, declarations: Vec<Declaration>) -> Self {
        let mut file = Self {
            path: Arc::from(path),
            package,
            declarations,
        };
        file.assign_anchors();
        file
    }

    /// Give every anchor without a file this file's path.
    fn assign_anchors(&mut self) {
        let path = Arc::clone(&self.path);
        for decl in &mut self.declarations {
            decl.assign_file(&path);
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl Project {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ProjectError> {
        let mut project: Project = serde_json::from_str(text)?;
        for file in &mut project.files {
            file.assign_anchors();
        }
        debug!(files = project.files.len(), "loaded project fixture");
        Ok(project)
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn push_file(&mut self, file: SourceFile) {
        self.files.push(file);
    }

    /// Packages in first-appearance order, without duplicates.
    pub fn packages(&self) -> Vec<FqName> {
        let mut seen = Vec::new();
        for file in &self.files {
            if !seen.contains(&file.package) {
                seen.push(file.package.clone());
            }
        }
        seen
    }
}
