//! Configuration section definitions.
//!
//! | Section    | Purpose                                         |
//! |------------|-------------------------------------------------|
//! | `[site]`   | Site name and URL                               |
//! | `[paths]`  | Option store, theme.json, backup, assets        |
//! | `[media]`  | Upload locations for favicon generation         |
//! | `[render]` | Inline style handle and public asset URL        |

mod media;
mod paths;
mod render;
mod site;

pub use media::MediaConfig;
pub use paths::PathsConfig;
pub use render::RenderConfig;
pub use site::SiteConfig;
