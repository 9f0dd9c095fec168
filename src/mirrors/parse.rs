//! Mirror list parsing.
//!
//! One base URL per line. Blank lines and `#` comments are skipped; lines
//! that are not absolute `http`/`https` URLs are dropped with a warning.

use url::Url;

use crate::race::Candidate;

/// Parse a newline-delimited mirror list, keeping list order.
pub fn parse_mirror_list(text: &str) -> Vec<Candidate> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

fn parse_line(line_no: usize, line: &str) -> Option<Candidate> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    match Url::parse(line) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Some(Candidate::new(url))
        }
        Ok(url) => {
            tracing::warn!(line = line_no, scheme = %url.scheme(), "Skipping mirror with unsupported URL");
            None
        }
        Err(e) => {
            tracing::warn!(line = line_no, error = %e, "Skipping unparseable mirror URL");
            None
        }
    }
}
