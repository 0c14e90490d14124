//! Detection of `#include` directives in shader sources.
//!
//! Only the directive line itself is inspected: no preprocessing, no
//! conditional compilation, no macro expansion.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Range, UnresolvedLink};

static INCLUDE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#).expect("include pattern is valid")
});

/// One `#include` found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub name: String,
    /// Range of the name, without the quotes or angle brackets.
    pub range: Range,
    /// `"name"` includes search the document's folder first; `<name>` ones do not.
    pub quoted: bool,
}

impl IncludeDirective {
    pub fn into_link(self, document_uri: &str) -> UnresolvedLink {
        UnresolvedLink::new(self.range, document_uri, self.name, self.quoted)
    }
}

/// Find the include directives of a document, in source order.
///
/// Character offsets are counted in UTF-16 code units, as editors expect.
pub fn find_includes(source: &str) -> Vec<IncludeDirective> {
    let mut directives = Vec::new();
    let mut in_block_comment = false;

    for (line_no, line) in source.lines().enumerate() {
        if in_block_comment {
            // A directive cannot follow the comment end on the same line
            if let Some(close) = line.find("*/") {
                in_block_comment = opens_block_comment(&line[close + 2..]);
            }
            continue;
        }

        if let Some(caps) = INCLUDE_DIRECTIVE.captures(line) {
            let (m, quoted) = match (caps.get(1), caps.get(2)) {
                (Some(m), _) => (m, true),
                (None, Some(m)) => (m, false),
                (None, None) => continue,
            };
            directives.push(IncludeDirective {
                name: m.as_str().trim().to_string(),
                range: Range::on_line(
                    line_no as u32,
                    utf16_len(&line[..m.start()]),
                    utf16_len(&line[..m.end()]),
                ),
                quoted,
            });
        }

        if opens_block_comment(line) {
            in_block_comment = true;
        }
    }

    directives
}

/// Whether `line` leaves a `/* ... ` comment open.
fn opens_block_comment(line: &str) -> bool {
    let code = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    match code.rfind("/*") {
        Some(open) => !code[open..].contains("*/"),
        None => false,
    }
}

fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}
