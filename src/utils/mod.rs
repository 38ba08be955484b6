//! Shared helpers with no knowledge of settings modules.

pub mod date;
pub mod hash;
pub mod html;
pub mod slug;
pub mod url;
