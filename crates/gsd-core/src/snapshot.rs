//! A single read of `.planning/project/`.
//!
//! Everything the resolver needs is captured here up front so that routing
//! and status assignment are pure functions of one filesystem snapshot.

use crate::frontmatter::SkipMarker;
use crate::{io, paths, plan};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ProjectSnapshot {
    pub dir: PathBuf,
    pub exists: bool,
    pub files: BTreeSet<String>,
    pub plan: Option<String>,
    pub summary: String,
    pub markers: BTreeMap<String, SkipMarker>,
}

fn carries_marker(name: &str) -> bool {
    name.ends_with("-DISCUSSION.md") || name.ends_with("-RESEARCH.md")
}

impl ProjectSnapshot {
    pub fn load(root: &Path) -> Self {
        let dir = paths::project_dir(root);
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "project directory absent");
            return Self {
                dir,
                ..Self::default()
            };
        }

        let files = io::list_names(&dir);
        let read = |name: &str| {
            if files.contains(name) {
                io::read_lenient(&dir.join(name))
            } else {
                None
            }
        };
        let plan = read(paths::PROJECT_PLAN);
        let summary = read(paths::PROJECT_SUMMARY).unwrap_or_default();
        let markers = files
            .iter()
            .filter(|name| carries_marker(name))
            .map(|name| {
                let marker = read(name)
                    .map(|c| SkipMarker::from_content(&c))
                    .unwrap_or_default();
                (name.clone(), marker)
            })
            .collect();

        Self {
            dir,
            exists: true,
            files,
            plan,
            summary,
            markers,
        }
    }

    /// Build a snapshot from in-memory contents. File names map to contents.
    pub fn from_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut snap = Self {
            exists: true,
            ..Self::default()
        };
        for (name, content) in files {
            snap.files.insert(name.to_string());
            if name == paths::PROJECT_PLAN {
                snap.plan = Some(content.to_string());
            } else if name == paths::PROJECT_SUMMARY {
                snap.summary = content.to_string();
            }
            if carries_marker(name) {
                snap.markers
                    .insert(name.to_string(), SkipMarker::from_content(content));
            }
        }
        snap
    }

    pub fn has(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    /// A project exists once the directory is non-empty and holds PROJECT.md.
    pub fn has_project(&self) -> bool {
        self.exists && !self.files.is_empty() && self.has(paths::PROJECT_MD)
    }

    /// Highest declared phase, or `None` when there is no plan or it declares
    /// no phases.
    pub fn total_phases(&self) -> Option<u32> {
        self.plan.as_deref().and_then(plan::max_phase)
    }

    pub fn phase_executed(&self, n: u32) -> bool {
        plan::summary_has_phase(&self.summary, n)
    }

    pub fn marker(&self, name: &str) -> SkipMarker {
        self.markers.get(name).copied().unwrap_or_default()
    }
}
