//! Path joining for route groups
//!
//! All functions are **pure**: same input → same output, no side effects.

use std::borrow::Cow;

/// Whether `path` is already in clean absolute form
///
/// # Rules
///
/// - Must start with `/`
/// - No empty, `.` or `..` segments
/// - Must not end with `/` (except root `/`)
pub fn is_clean_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }

    path.strip_prefix('/')
        .filter(|rest| !rest.ends_with('/'))
        .map(|rest| rest.split('/').all(|segment| !matches!(segment, "" | "." | "..")))
        .unwrap_or(false)
}

/// Clean a path to absolute canonical form
///
/// Returns `Cow::Borrowed` when the input is already clean.
///
/// - Double slashes: `/path//to` → `/path/to`
/// - Dot segments: `/a/./b/../c` → `/a/c`
/// - Trailing slashes: `/path/` → `/path`
/// - Relative input is made absolute: `about` → `/about`
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if is_clean_path(path) {
        return Cow::Borrowed(path);
    }

    let segments = path.split('/').fold(Vec::new(), |mut acc, segment| {
        match segment {
            "" | "." => {}
            ".." => {
                acc.pop();
            }
            segment => acc.push(segment),
        }
        acc
    });

    Cow::Owned(format!("/{}", segments.join("/")))
}

/// Join a group's base path with a relative route path
///
/// An empty relative path is the group root. A trailing slash on the
/// relative path is kept, so `/users/` and `/users` stay distinct routes.
pub fn join_paths(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }

    let joined = clean_path(&format!("{base}/{relative}")).into_owned();
    if relative.ends_with('/') && !joined.ends_with('/') {
        joined + "/"
    } else {
        joined
    }
}
