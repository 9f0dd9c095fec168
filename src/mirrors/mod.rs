//! Mirror list subsystem.
//!
//! # Data Flow
//! ```text
//! mirrors.list_url
//!     → list.rs (HTTP GET or file read, once per request)
//!     → parse.rs (one URL per line, bad lines dropped with a warning)
//!     → Vec<Candidate> in list order
//! ```

pub mod list;
pub mod parse;

pub use list::{MirrorList, MirrorListError};
pub use parse::parse_mirror_list;
