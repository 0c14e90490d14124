use serde::{Deserialize, Serialize};
use std::fmt;

pub mod table;

pub use table::{GameEntry, IncludeFolderTable, ShaderConfigEntry, TableError};

/// A zero-based position in a text document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A half-open span in a text document, `start..end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    /// A range covering `start..end` characters on a single line.
    pub fn on_line(line: u32, start: u32, end: u32) -> Self {
        Range::new(Position::new(line, start), Position::new(line, end))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line + 1,
            self.start.character + 1,
            self.end.line + 1,
            self.end.character + 1
        )
    }
}

/// Payload attached to an include link while it is still unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeData {
    /// URI of the document containing the include directive.
    pub uri: String,
    /// The file name as written in the directive, e.g. `common/lighting.hlsli`.
    pub name: String,
    /// Try the referencing document's own folder before the include folders.
    pub search_in_local_folder: bool,
}

/// An include reference waiting to be resolved to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedLink {
    pub range: Range,
    pub data: IncludeData,
}

impl UnresolvedLink {
    pub fn new(
        range: Range,
        uri: impl Into<String>,
        name: impl Into<String>,
        search_in_local_folder: bool,
    ) -> Self {
        UnresolvedLink {
            range,
            data: IncludeData {
                uri: uri.into(),
                name: name.into(),
                search_in_local_folder,
            },
        }
    }
}

/// A resolved include: the source range paired with the target it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub range: Range,
    pub target: String,
}

/// The (game, shader config) pair chosen for one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub game: String,
    pub shader_config: String,
    /// Name of the heuristic that picked the shader config, `None` for the default.
    pub matched_by: Option<&'static str>,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.game, self.shader_config)?;
        match self.matched_by {
            Some(heuristic) => write!(f, " (matched by {})", heuristic),
            None => write!(f, " (default)"),
        }
    }
}
