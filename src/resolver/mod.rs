use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigSource, ResolverOptions};
use crate::host::{FileProbe, WarningSink, WorkspaceFolder};
use crate::model::{IncludeFolderTable, ResolvedLink, Selection, TableError, UnresolvedLink};

pub mod heuristics;
pub mod selector;
pub mod uri;

#[cfg(test)]
pub(crate) mod test_support;

pub use heuristics::Heuristic;
pub use selector::ShaderConfigSelector;

/// Warning shown when an include cannot be found anywhere.
pub const NOT_FOUND_MESSAGE: &str = "Couldn't find the file";

/// Errors that abort a resolution.
///
/// A missing file is not an error: [`LinkResolver::resolve`] returns `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The selected game or shader config is not in the include folder table.
    #[error("include folder table lookup failed: {0}")]
    Table(#[from] TableError),
}

/// Outcome of one lookup stage.
enum Lookup {
    Found(ResolvedLink),
    Missing,
    Cancelled,
}

/// Resolves include links to the files they refer to.
///
/// Resolution order, first hit wins:
/// 1. The referencing document's own folder, if the link asks for it.
/// 2. Each include folder of the selected (game, shader config), in order.
///
/// Configuration is re-read and the selection re-derived on every call.
pub struct LinkResolver {
    table: Arc<IncludeFolderTable>,
    config: Arc<dyn ConfigSource>,
    probe: Arc<dyn FileProbe>,
    workspace: Arc<dyn WorkspaceFolder>,
    warnings: Arc<dyn WarningSink>,
    selector: ShaderConfigSelector,
    options: ResolverOptions,
}

impl LinkResolver {
    pub fn new(
        table: Arc<IncludeFolderTable>,
        config: Arc<dyn ConfigSource>,
        probe: Arc<dyn FileProbe>,
        workspace: Arc<dyn WorkspaceFolder>,
        warnings: Arc<dyn WarningSink>,
    ) -> Self {
        LinkResolver {
            table,
            config,
            probe,
            workspace,
            warnings,
            selector: ShaderConfigSelector::default(),
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_selector(mut self, selector: ShaderConfigSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn table(&self) -> &IncludeFolderTable {
        &self.table
    }

    /// Select the (game, shader config) pair from the current configuration.
    ///
    /// Returns `Ok(None)` if cancelled.
    pub async fn select(&self, cancel: &CancellationToken) -> Result<Option<Selection>, ResolveError> {
        let selection = self
            .selector
            .select(&self.table, self.config.as_ref(), cancel)
            .await?;

        if let Some(ref selection) = selection {
            tracing::debug!(%selection, "include folders selected");
            if self.options.log_selection {
                tracing::info!("selected game: {}", selection.game);
                tracing::info!("selected shader config: {}", selection.shader_config);
            }
        }
        Ok(selection)
    }

    /// Resolve one include link.
    ///
    /// Returns `Ok(None)` when the file is not found (after showing a single
    /// warning) or when `cancel` fires (silently).
    pub async fn resolve(
        &self,
        link: &UnresolvedLink,
        cancel: &CancellationToken,
    ) -> Result<Option<ResolvedLink>, ResolveError> {
        match self.lookup(link, cancel).await? {
            Lookup::Found(resolved) => Ok(Some(resolved)),
            Lookup::Missing => {
                tracing::debug!(
                    name = %link.data.name,
                    uri = %link.data.uri,
                    range = %link.range,
                    "include not found"
                );
                self.warnings.show_warning(NOT_FOUND_MESSAGE);
                Ok(None)
            }
            Lookup::Cancelled => {
                tracing::debug!(name = %link.data.name, "resolution cancelled");
                Ok(None)
            }
        }
    }

    async fn lookup(
        &self,
        link: &UnresolvedLink,
        cancel: &CancellationToken,
    ) -> Result<Lookup, ResolveError> {
        if link.data.search_in_local_folder {
            match self.local_file_link(link, cancel).await {
                Lookup::Missing => {}
                done => return Ok(done),
            }
        }
        self.include_file_link(link, cancel).await
    }

    /// Look next to the referencing document.
    async fn local_file_link(&self, link: &UnresolvedLink, cancel: &CancellationToken) -> Lookup {
        let folder = uri::containing_folder(&link.data.uri);
        // Probe the on-disk form, but hand back a target in the document's URI form
        let candidate = uri::to_fs_path(folder).join(&link.data.name);

        match self.probe(&candidate, cancel).await {
            Some(true) => Lookup::Found(ResolvedLink {
                range: link.range,
                target: uri::join(folder, &link.data.name),
            }),
            Some(false) => Lookup::Missing,
            None => Lookup::Cancelled,
        }
    }

    /// Search the include folders of the selected shader config.
    async fn include_file_link(
        &self,
        link: &UnresolvedLink,
        cancel: &CancellationToken,
    ) -> Result<Lookup, ResolveError> {
        let Some(selection) = self.select(cancel).await? else {
            return Ok(Lookup::Cancelled);
        };
        let folders = self
            .table
            .include_folders(&selection.game, &selection.shader_config)?;

        for folder in folders {
            let relative = uri::join(folder, &link.data.name);
            match self.probe(Path::new(&relative), cancel).await {
                Some(true) => {
                    let root = self.workspace.workspace_folder();
                    return Ok(Lookup::Found(ResolvedLink {
                        range: link.range,
                        target: format!("{}/{}", root, relative),
                    }));
                }
                Some(false) => {}
                None => return Ok(Lookup::Cancelled),
            }
        }

        Ok(Lookup::Missing)
    }

    /// Probe one candidate; `None` if cancelled first.
    async fn probe(&self, candidate: &Path, cancel: &CancellationToken) -> Option<bool> {
        let found = until_cancelled(cancel, self.probe.exists(candidate)).await?;
        tracing::debug!(candidate = %candidate.display(), found, "probed include candidate");
        Some(found)
    }
}

/// Run `future` unless `cancel` fires first. Cancellation wins ties.
pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    future: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        output = future => Some(output),
    }
}
