use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// File extensions treated as shader sources or shader headers.
pub const SHADER_EXTENSIONS: &[&str] = &[
    "hlsl", "hlsli", "fx", "fxh", "glsl", "vert", "frag", "comp", "geom", "usf", "ush", "cginc",
    "inc", "h",
];

/// Configuration for file discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Glob patterns to include (empty means include all).
    pub include: Vec<String>,
    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

/// Default exclude patterns for build output and VCS directories.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[".git/", "Intermediate/", "Binaries/", "build/"];

/// Whether a path has one of the shader extensions (case-insensitive).
pub fn is_shader_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SHADER_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Discover shader files under `root`, respecting .gitignore. Sorted by path.
pub fn discover_shader_files(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false) // don't skip dot-prefixed dirs entirely (let gitignore decide)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .parents(true);

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in DEFAULT_EXCLUDE_PATTERNS {
        overrides
            .add(&format!("!{}", pattern))
            .context("invalid default exclude pattern")?;
    }
    for pattern in &config.exclude {
        overrides
            .add(&format!("!{}", pattern))
            .context("invalid exclude pattern")?;
    }
    for pattern in &config.include {
        overrides.add(pattern).context("invalid include pattern")?;
    }
    builder.overrides(overrides.build().context("failed to build overrides")?);

    for entry in builder.build() {
        let entry = entry.context("error reading directory entry")?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if is_shader_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("Shaders/Common")).unwrap();
        fs::write(root.join("Shaders/main.hlsl"), "#include \"Common/brdf.hlsli\"").unwrap();
        fs::write(root.join("Shaders/Common/brdf.hlsli"), "float brdf();").unwrap();
        fs::write(root.join("Shaders/post.FX"), "technique T {}").unwrap();
        fs::write(root.join("Shaders/readme.md"), "# shaders").unwrap();

        // Initialize a git repo so the ignore crate respects .gitignore
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".gitignore"), "ShaderCache/\n").unwrap();

        fs::create_dir_all(root.join("ShaderCache")).unwrap();
        fs::write(root.join("ShaderCache/main.hlsl"), "// cached").unwrap();

        fs::create_dir_all(root.join("Intermediate")).unwrap();
        fs::write(root.join("Intermediate/generated.hlsl"), "// generated").unwrap();

        dir
    }

    #[test]
    fn test_discovers_shader_files() {
        let dir = setup_test_project();
        let files = discover_shader_files(dir.path(), &DiscoveryConfig::default()).unwrap();

        assert!(files.iter().any(|p| p.ends_with("Shaders/main.hlsl")));
        assert!(files.iter().any(|p| p.ends_with("Shaders/Common/brdf.hlsli")));
        assert!(files.iter().any(|p| p.ends_with("Shaders/post.FX")));
        assert!(!files.iter().any(|p| p.ends_with("readme.md")));
    }

    #[test]
    fn test_respects_gitignore_and_default_excludes() {
        let dir = setup_test_project();
        let files = discover_shader_files(dir.path(), &DiscoveryConfig::default()).unwrap();

        assert!(!files
            .iter()
            .any(|p| p.to_string_lossy().contains("ShaderCache")));
        assert!(!files
            .iter()
            .any(|p| p.to_string_lossy().contains("Intermediate")));
    }

    #[test]
    fn test_exclude_pattern_filters_files() {
        let dir = setup_test_project();
        let config = DiscoveryConfig {
            exclude: vec!["*.hlsli".to_string()],
            ..Default::default()
        };
        let files = discover_shader_files(dir.path(), &config).unwrap();

        assert!(!files.iter().any(|p| p.to_string_lossy().ends_with(".hlsli")));
        assert!(files.iter().any(|p| p.ends_with("Shaders/main.hlsl")));
    }

    #[test]
    fn test_results_are_sorted_by_path() {
        let dir = setup_test_project();
        let files = discover_shader_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        for window in files.windows(2) {
            assert!(window[0] <= window[1], "files should be sorted by path");
        }
    }

    #[test]
    fn test_is_shader_file() {
        assert!(is_shader_file(Path::new("a/b.hlsl")));
        assert!(is_shader_file(Path::new("a/b.USH")));
        assert!(!is_shader_file(Path::new("a/b.rs")));
        assert!(!is_shader_file(Path::new("Makefile")));
    }

    #[test]
    fn test_nonexistent_directory_returns_error() {
        let result = discover_shader_files(
            Path::new("/nonexistent/path/that/surely/doesnt/exist"),
            &DiscoveryConfig::default(),
        );
        assert!(result.is_err(), "should error on nonexistent directory");
    }
}
