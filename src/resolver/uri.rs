use std::borrow::Cow;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// The folder part of a document URI: everything before the last `/`.
///
/// `file:///c%3A/game/main.hlsl` -> `file:///c%3A/game`
pub fn containing_folder(uri: &str) -> &str {
    match uri.rfind('/') {
        Some(0) => "/",
        Some(pos) => &uri[..pos],
        None => "",
    }
}

/// Convert a document URI (or plain path) to a filesystem path.
///
/// Strips the `file://` scheme, percent-decodes (`%3A` -> `:`) and drops the
/// slash in front of a Windows drive letter (`/c:/game` -> `c:/game`).
pub fn to_fs_path(uri: &str) -> PathBuf {
    let rest = uri.strip_prefix(FILE_SCHEME).unwrap_or(uri);
    let decoded = urlencoding::decode(rest).unwrap_or(Cow::Borrowed(rest));

    let bytes = decoded.as_bytes();
    let is_drive = bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':';
    if is_drive {
        PathBuf::from(&decoded[1..])
    } else {
        PathBuf::from(decoded.into_owned())
    }
}

/// Join a folder and an include name with `/`, keeping the folder's form.
pub fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder.trim_end_matches('/'), name)
    }
}

/// Build a `file://` URI for a path, percent-encoding each segment.
///
/// `C:\game\main.hlsl` -> `file:///C%3A/game/main.hlsl`
pub fn file_uri(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let encoded = normalized
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    if encoded.starts_with('/') {
        format!("{}{}", FILE_SCHEME, encoded)
    } else {
        format!("{}/{}", FILE_SCHEME, encoded)
    }
}
