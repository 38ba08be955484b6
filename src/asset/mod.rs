//! Plugin assets served next to the rendered output.

pub mod version;
