//! Injected collaborator interfaces.
//!
//! The store never performs I/O. An async runner owns a [`ContentProvider`]
//! and a [`KernelTransport`], awaits their results, and feeds the outcome
//! back in as fulfilled/failed actions. Which transport sits behind these
//! traits (HTTP contents API, local filesystem, a test double) is invisible
//! to the core.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::actions::{DirectoryItem, FetchedContent, LaunchedKernel};
use crate::state::contents::ContentKind;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Asynchronous access to documents by filepath.
#[allow(async_fn_in_trait)]
pub trait ContentProvider {
    async fn fetch(&self, filepath: &str) -> Result<FetchedContent, ProviderError>;
    async fn save(&self, filepath: &str, model: &FetchedContent) -> Result<(), ProviderError>;
    async fn list(&self, path: &str) -> Result<Vec<DirectoryItem>, ProviderError>;
}

/// Lifecycle controls for an execution backend. The duplex message channel
/// itself stays with the runner; the core only sees the actions it produces.
#[allow(async_fn_in_trait)]
pub trait KernelTransport {
    async fn start(
        &self,
        kernelspec_name: &str,
        cwd: &str,
    ) -> Result<LaunchedKernel, ProviderError>;
    async fn interrupt(&self, session_id: &str) -> Result<(), ProviderError>;
    async fn shutdown(&self, session_id: &str) -> Result<(), ProviderError>;
}

/// A contents backend over an in-memory map. Primarily a test double, also
/// useful for scratch notebooks that never touch disk.
#[derive(Debug, Default)]
pub struct InMemoryContentProvider {
    entries: Mutex<HashMap<String, FetchedContent>>,
}

impl InMemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, filepath: impl Into<String>, content: FetchedContent) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(filepath.into(), content);
        }
    }

    pub fn contains(&self, filepath: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(filepath))
            .unwrap_or(false)
    }
}

impl ContentProvider for InMemoryContentProvider {
    async fn fetch(&self, filepath: &str) -> Result<FetchedContent, ProviderError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ProviderError::NotFound(filepath.to_string()))?;
        entries
            .get(filepath)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(filepath.to_string()))
    }

    async fn save(&self, filepath: &str, model: &FetchedContent) -> Result<(), ProviderError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ProviderError::NotFound(filepath.to_string()))?;
        entries.insert(filepath.to_string(), model.clone());
        Ok(())
    }

    async fn list(&self, path: &str) -> Result<Vec<DirectoryItem>, ProviderError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ProviderError::NotFound(path.to_string()))?;
        let prefix = if path.is_empty() || path == "/" {
            String::new()
        } else {
            format!("{}/", path.trim_end_matches('/'))
        };
        let mut items: Vec<DirectoryItem> = entries
            .iter()
            .filter(|(filepath, _)| {
                filepath.starts_with(&prefix) && !filepath[prefix.len()..].contains('/')
            })
            .map(|(filepath, content)| DirectoryItem {
                name: filepath[prefix.len()..].to_string(),
                path: filepath.clone(),
                kind: match content {
                    FetchedContent::Notebook { .. } => ContentKind::Notebook,
                    FetchedContent::File { .. } => ContentKind::File,
                    FetchedContent::Directory { .. } => ContentKind::Directory,
                },
                last_modified: None,
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::contents::NotebookDocument;

    #[tokio::test]
    async fn test_fetch_returns_not_found_for_missing_paths() {
        let provider = InMemoryContentProvider::new();
        let err = provider.fetch("missing.ipynb").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_then_fetch_round_trips() {
        let provider = InMemoryContentProvider::new();
        let content = FetchedContent::Notebook {
            content: NotebookDocument::default(),
        };
        provider.save("nb.ipynb", &content).await.unwrap();
        let fetched = provider.fetch("nb.ipynb").await.unwrap();
        assert!(matches!(fetched, FetchedContent::Notebook { .. }));
    }

    #[tokio::test]
    async fn test_list_returns_direct_children_only() {
        let provider = InMemoryContentProvider::new();
        provider.insert(
            "project/a.ipynb",
            FetchedContent::Notebook {
                content: NotebookDocument::default(),
            },
        );
        provider.insert(
            "project/data.csv",
            FetchedContent::File {
                content: "a,b".to_string(),
                mimetype: Some("text/csv".to_string()),
            },
        );
        provider.insert(
            "project/nested/deep.ipynb",
            FetchedContent::Notebook {
                content: NotebookDocument::default(),
            },
        );

        let items = provider.list("project").await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.ipynb", "data.csv"]);
        assert_eq!(items[0].kind, ContentKind::Notebook);
        assert_eq!(items[1].kind, ContentKind::File);
    }
}
