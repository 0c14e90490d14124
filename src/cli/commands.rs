use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio_util::sync::CancellationToken;

use crate::config::{
    find_table_path, settings_path, LayeredConfig, ResolverOptions, SettingsFile, StaticConfig,
};
use crate::directives::find_includes;
use crate::discovery::{discover_shader_files, is_shader_file, DiscoveryConfig};
use crate::host::{LocalFileProbe, WarningSink, WorkspaceRoot};
use crate::model::{IncludeFolderTable, Range, UnresolvedLink};
use crate::resolver::uri::file_uri;
use crate::resolver::LinkResolver;

use super::output::{
    format_link_reports, format_resolved, format_selection, LinkReport, SelectionReport,
};
use super::OutputFormat;

/// Everything needed to assemble a resolver for a workspace.
#[derive(Debug, Clone, Default)]
pub struct ResolverSetup {
    pub workspace: PathBuf,
    pub table: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    /// `KEY=VALUE` assignments taking precedence over the settings file.
    pub overrides: Vec<String>,
    pub options: ResolverOptions,
}

/// Build a resolver backed by the local filesystem and the workspace settings file.
pub fn build_resolver(setup: &ResolverSetup, warnings: Arc<dyn WarningSink>) -> Result<LinkResolver> {
    let table_path = match find_table_path(&setup.workspace, setup.table.as_deref()) {
        Some(path) => path,
        None => match &setup.table {
            Some(path) => bail!("Include folder table not found: {}", path.display()),
            None => bail!(
                "No include folder table found. Create .shaderlink/include_folders.toml or pass --table."
            ),
        },
    };
    let table = IncludeFolderTable::load(&table_path)?;

    let overrides = StaticConfig::from_assignments(&setup.overrides)?;
    let settings = SettingsFile::new(settings_path(&setup.workspace, setup.settings.as_deref()));
    let config = LayeredConfig::new()
        .layer(Arc::new(overrides))
        .layer(Arc::new(settings));

    Ok(LinkResolver::new(
        Arc::new(table),
        Arc::new(config),
        Arc::new(LocalFileProbe::new(&setup.workspace)),
        Arc::new(WorkspaceRoot::new(&setup.workspace)),
        warnings,
    )
    .with_options(setup.options))
}

/// Turn a `--document` argument into a document URI.
///
/// URIs pass through unchanged; paths are made absolute against `base`.
pub fn document_uri(document: &str, base: &Path) -> String {
    if document.contains("://") {
        return document.to_string();
    }
    let path = Path::new(document);
    if path.is_absolute() {
        file_uri(path)
    } else {
        file_uri(&base.join(path))
    }
}

/// Resolve a single include. Returns the output and whether it was found.
pub async fn run_resolve(
    resolver: &LinkResolver,
    name: &str,
    document: &str,
    search_in_local_folder: bool,
    cancel: &CancellationToken,
    format: &OutputFormat,
) -> Result<(String, bool)> {
    let link = UnresolvedLink::new(Range::default(), document, name, search_in_local_folder);
    let resolved = resolver.resolve(&link, cancel).await?;
    Ok((format_resolved(resolved.as_ref(), format), resolved.is_some()))
}

/// Show the current selection and its include folders.
pub async fn run_select(
    resolver: &LinkResolver,
    cancel: &CancellationToken,
    format: &OutputFormat,
) -> Result<String> {
    let Some(selection) = resolver.select(cancel).await? else {
        bail!("Selection cancelled");
    };
    let folders = resolver
        .table()
        .include_folders(&selection.game, &selection.shader_config)?;

    let report = SelectionReport {
        selection: &selection,
        include_folders: folders,
    };
    Ok(format_selection(&report, format))
}

/// Resolve every include directive in the shader files under `path`.
///
/// Returns the output and the number of unresolved includes. Stops early,
/// with the reports gathered so far, once `cancel` fires.
pub async fn run_links(
    resolver: &LinkResolver,
    workspace: &Path,
    path: &Path,
    discovery: &DiscoveryConfig,
    cancel: &CancellationToken,
    format: &OutputFormat,
) -> Result<(String, usize)> {
    let files = if path.is_file() {
        if !is_shader_file(path) {
            bail!("Not a shader file: {}", path.display());
        }
        vec![path.to_path_buf()]
    } else {
        discover_shader_files(path, discovery)?
    };

    let mut reports = Vec::new();
    'files: for file in &files {
        let source = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let uri = file_uri(file);
        let display = file
            .strip_prefix(workspace)
            .unwrap_or(file.as_path())
            .to_string_lossy()
            .replace('\\', "/");

        for directive in find_includes(&source) {
            if cancel.is_cancelled() {
                break 'files;
            }
            let line = directive.range.start.line;
            let name = directive.name.clone();
            let resolved = resolver.resolve(&directive.into_link(&uri), cancel).await?;
            // Cancelled mid-resolution, not missing
            if resolved.is_none() && cancel.is_cancelled() {
                break 'files;
            }

            reports.push(LinkReport {
                file: display.clone(),
                line,
                name,
                target: resolved.map(|link| link.target),
            });
        }
    }

    let unresolved = reports.iter().filter(|r| r.target.is_none()).count();
    Ok((format_link_reports(&reports, format), unresolved))
}
