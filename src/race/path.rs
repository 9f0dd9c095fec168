//! Target URL construction.
//!
//! Joins a mirror's base path with the requested path so that exactly one
//! `/` separates them and the result never contains an empty segment.

use url::Url;

/// Build the target URL for `request_path` on the mirror at `base`.
///
/// Trailing slashes and whitespace are stripped from the base path, leading
/// slashes and whitespace from the request path. Empty segments inside the
/// request path are dropped, and so are `.` and `..` segments (percent-encoded
/// or not), so the target always stays under the base path.
pub fn join_target(base: &Url, request_path: &str) -> Url {
    let base_path = base.path().trim().trim_end_matches('/');
    // `url` treats `\` as a separator in http(s) paths.
    let segments: Vec<&str> = request_path
        .trim()
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && !is_dot_segment(segment))
        .collect();

    let mut target = base.clone();
    target.set_path(&format!("{}/{}", base_path, segments.join("/")));
    target
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}
