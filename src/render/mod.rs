//! Ordered render pipeline.
//!
//! Output is produced in fixed stages, each holding named renderers that
//! run in registration order:
//!
//! ```text
//! <head>   head-import → head-analytics → head-meta → inline-styles → head-main
//! </body>  footer
//! ```
//!
//! `inline-styles` fragments are joined into one
//! `<style id="{handle}-inline-css">` block attached to the theme stylesheet
//! handle; every other stage is emitted as is.

pub mod blocks;
pub mod toc;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::debug;
use crate::settings::{self, SettingsModule};
use crate::store::OptionStore;

// ============================================================================
// Stages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    HeadImport,
    HeadAnalytics,
    HeadMeta,
    InlineStyles,
    HeadMain,
    Footer,
}

impl Stage {
    /// All stages in emission order.
    pub const ALL: [Stage; 6] = [
        Stage::HeadImport,
        Stage::HeadAnalytics,
        Stage::HeadMeta,
        Stage::InlineStyles,
        Stage::HeadMain,
        Stage::Footer,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Stage::HeadImport => "head-import",
            Stage::HeadAnalytics => "head-analytics",
            Stage::HeadMeta => "head-meta",
            Stage::InlineStyles => "inline-styles",
            Stage::HeadMain => "head-main",
            Stage::Footer => "footer",
        }
    }

    pub const fn is_head(self) -> bool {
        !matches!(self, Stage::Footer)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
                format!("unknown stage `{s}` (expected one of: {})", names.join(", "))
            })
    }
}

// ============================================================================
// Context
// ============================================================================

/// What is being rendered.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Site name for fallback copyright lines.
    pub site_name: String,
    pub year: i32,
    /// Rendering a single post or page.
    pub singular: bool,
    pub post_type: Option<String>,
    /// Category ids of the current post.
    pub categories: Vec<String>,
}

impl RenderContext {
    pub fn new(site_name: impl Into<String>, year: i32) -> Self {
        Self {
            site_name: site_name.into(),
            year,
            ..Self::default()
        }
    }

    /// A single post of type `post`.
    pub fn is_single_post(&self) -> bool {
        self.singular && self.post_type.as_deref() == Some("post")
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// A named render callback.
pub type Renderer<'a> = Box<dyn Fn(&RenderContext) -> Result<Option<String>> + 'a>;

pub struct Pipeline<'a> {
    style_handle: String,
    stages: [Vec<(&'static str, Renderer<'a>)>; 6],
}

impl<'a> Pipeline<'a> {
    pub fn new(style_handle: impl Into<String>) -> Self {
        Self {
            style_handle: style_handle.into(),
            stages: Default::default(),
        }
    }

    /// Append a renderer to `stage`.
    pub fn register<F>(&mut self, stage: Stage, name: &'static str, renderer: F) -> &mut Self
    where
        F: Fn(&RenderContext) -> Result<Option<String>> + 'a,
    {
        self.stages[stage.index()].push((name, Box::new(renderer)));
        self
    }

    /// Register `module` for every stage it declares, reading its options
    /// from `store` at render time.
    pub fn register_module<M: SettingsModule>(
        &mut self,
        module: &'a M,
        store: &'a dyn OptionStore,
    ) -> &mut Self {
        for &stage in M::STAGES {
            self.register(stage, M::OPTION_NAME, move |ctx| {
                let options = settings::load::<M>(store)
                    .with_context(|| format!("failed to load `{}`", M::OPTION_NAME))?;
                Ok(module.render_output(&options, stage, ctx))
            });
        }
        self
    }

    /// Renderer names registered for `stage`, in order.
    pub fn renderers(&self, stage: Stage) -> Vec<&'static str> {
        self.stages[stage.index()].iter().map(|(name, _)| *name).collect()
    }

    /// Run every renderer of one stage.
    pub fn render_stage(&self, stage: Stage, ctx: &RenderContext) -> Result<String> {
        let mut fragments = Vec::new();
        for (name, renderer) in &self.stages[stage.index()] {
            if let Some(fragment) = renderer(ctx)?
                && !fragment.trim().is_empty()
            {
                debug!("render"; "{} <- {}", stage, name);
                fragments.push(fragment);
            }
        }
        if fragments.is_empty() {
            return Ok(String::new());
        }

        Ok(match stage {
            Stage::InlineStyles => format!(
                "<style id=\"{}-inline-css\">\n{}</style>\n",
                self.style_handle,
                fragments.concat()
            ),
            _ => fragments
                .into_iter()
                .map(|mut fragment| {
                    if !fragment.ends_with('\n') {
                        fragment.push('\n');
                    }
                    fragment
                })
                .collect(),
        })
    }

    /// All head stages in order.
    pub fn render_head(&self, ctx: &RenderContext) -> Result<String> {
        Stage::ALL
            .into_iter()
            .filter(|stage| stage.is_head())
            .map(|stage| self.render_stage(stage, ctx))
            .collect()
    }

    pub fn render_footer(&self, ctx: &RenderContext) -> Result<String> {
        self.render_stage(Stage::Footer, ctx)
    }

    /// Insert head output before `</head>` and footer output before `</body>`.
    pub fn inject(&self, page: &str, ctx: &RenderContext) -> Result<String> {
        let head = self.render_head(ctx)?;
        let footer = self.render_footer(ctx)?;
        let page = insert_before(page, "</head>", &head, Position::First);
        Ok(insert_before(&page, "</body>", &footer, Position::Last))
    }
}

enum Position {
    First,
    Last,
}

/// Insert `fragment` before a closing tag, matched case-insensitively.
/// A page without the tag gets the fragment appended.
fn insert_before(page: &str, tag: &str, fragment: &str, position: Position) -> String {
    if fragment.is_empty() {
        return page.to_string();
    }
    let lower = page.to_ascii_lowercase();
    let found = match position {
        Position::First => lower.find(tag),
        Position::Last => lower.rfind(tag),
    };

    let mut result = String::with_capacity(page.len() + fragment.len());
    match found {
        Some(pos) => {
            result.push_str(&page[..pos]);
            result.push_str(fragment);
            result.push_str(&page[pos..]);
        }
        None => {
            result.push_str(page);
            result.push_str(fragment);
        }
    }
    result
}
