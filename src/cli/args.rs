//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::render::Stage;
use crate::render::blocks::Block;
use crate::settings::page::Tab;

/// Theme settings manager: colors, branding, cookies, custom CSS
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: embo.toml)
    #[arg(short = 'C', long, global = true, default_value = "embo.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the stored options of a module as JSON
    Show {
        /// colors, branding, cookies or custom-css
        #[arg(value_parser = parse_tab)]
        module: Tab,
    },

    /// Sanitize and save options of a module
    Save {
        /// colors, branding, cookies or custom-css
        #[arg(value_parser = parse_tab)]
        module: Tab,

        /// Field value, repeatable (applied after --input)
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,

        /// JSON object with the submitted fields
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Reset colors to their defaults
    Reset,

    /// Pull colors from the theme.json palette
    Pull,

    /// Manage theme.json and its backup
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Render public output for a page
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Render the settings page
    Admin {
        /// Tab slug (default: colors)
        #[arg(short, long)]
        tab: Option<String>,
    },

    /// Print the block editor palette as JSON
    Palette,

    /// Show or change the page navigation flag of a category
    Category {
        /// Category id; without one the add-category field is printed
        id: Option<String>,

        /// Turn page navigation on
        #[arg(long, requires = "id", conflicts_with = "disable")]
        enable: bool,

        /// Turn page navigation off
        #[arg(long, requires = "id")]
        disable: bool,

        /// Submitted category form as a JSON object
        #[arg(short, long, requires = "id", conflicts_with_all = ["enable", "disable"], value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Add heading anchors to post content
    Toc {
        /// HTML file with the post content
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Print the table of contents instead of the content
        #[arg(short, long)]
        list: bool,
    },

    /// Render a server-side block
    Block {
        /// footer-note or load-toggle
        #[arg(value_parser = parse_block)]
        block: Block,

        #[command(flatten)]
        pagination: PaginationArgs,
    },
}

/// theme.json actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    /// Create the one-time backup if missing
    Backup,
    /// Write stored colors into the palette
    Sync,
    /// Copy the backup over theme.json
    Restore,
    /// Show paths and palette state
    Status,
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Render a single stage only
    #[arg(short, long)]
    pub stage: Option<Stage>,

    /// Category id of the current post, repeatable
    #[arg(short, long = "category", value_name = "ID")]
    pub categories: Vec<String>,

    /// Rendering a single post or page
    #[arg(long)]
    pub singular: bool,

    /// Post type of the current entry
    #[arg(long, default_value = "post")]
    pub post_type: String,

    /// HTML page to inject the output into
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub page: Option<PathBuf>,

    /// Post content to filter (heading anchors, shortcodes)
    #[arg(long, conflicts_with = "page", value_hint = clap::ValueHint::FilePath)]
    pub content: Option<PathBuf>,
}

/// Archive position for the load-toggle block.
#[derive(clap::Args, Debug, Clone)]
pub struct PaginationArgs {
    /// Current page number
    #[arg(long, default_value_t = 1)]
    pub current: u32,

    /// Number of pages; pagination links need it
    #[arg(long)]
    pub total: Option<u32>,

    /// Page URL pattern, `%#%` is the page number
    #[arg(long, default_value = "/page/%#%/")]
    pub base: String,
}

fn parse_tab(s: &str) -> Result<Tab, String> {
    Tab::from_slug(s).ok_or_else(|| {
        let slugs: Vec<_> = Tab::ALL.iter().map(|tab| tab.slug()).collect();
        format!("unknown module `{s}` (expected one of: {})", slugs.join(", "))
    })
}

fn parse_block(s: &str) -> Result<Block, String> {
    s.parse()
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save() {
        let cli = Cli::parse_from(["embo", "save", "colors", "--set", "text_color=#fff", "-s", "a=b=c"]);
        let Commands::Save { module, set, input } = cli.command else {
            panic!("expected save");
        };
        assert_eq!(module, Tab::Colors);
        assert_eq!(set[0], ("text_color".to_string(), "#fff".to_string()));
        assert_eq!(set[1], ("a".to_string(), "b=c".to_string()));
        assert!(input.is_none());
        assert_eq!(cli.config, PathBuf::from("embo.toml"));
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from([
            "embo", "-v", "render", "--stage", "footer", "-c", "3", "-c", "4", "--singular",
        ]);
        assert!(cli.verbose);
        let Commands::Render { args } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.stage, Some(Stage::Footer));
        assert_eq!(args.categories, ["3", "4"]);
        assert!(args.singular);
        assert_eq!(args.post_type, "post");
    }

    #[test]
    fn test_rejects_unknown_module() {
        assert!(Cli::try_parse_from(["embo", "show", "fonts"]).is_err());
        assert!(Cli::try_parse_from(["embo", "save", "colors", "--set", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["embo", "category", "3", "--enable", "--disable"]).is_err());
        assert!(Cli::try_parse_from(["embo", "category", "--enable"]).is_err());
        assert!(Cli::try_parse_from(["embo", "render", "--page", "a.html", "--content", "b.html"]).is_err());
    }

    #[test]
    fn test_parse_category_form() {
        let cli = Cli::parse_from(["embo", "category", "7", "-i", "form.json"]);
        let Commands::Category { id, input, enable, disable } = cli.command else {
            panic!("expected category");
        };
        assert_eq!(id.as_deref(), Some("7"));
        assert_eq!(input, Some(PathBuf::from("form.json")));
        assert!(!enable && !disable);

        let cli = Cli::parse_from(["embo", "category"]);
        assert!(matches!(cli.command, Commands::Category { id: None, .. }));
    }

    #[test]
    fn test_parse_block() {
        let cli = Cli::parse_from(["embo", "block", "load-toggle", "--total", "5"]);
        let Commands::Block { block, pagination } = cli.command else {
            panic!("expected block");
        };
        assert_eq!(block, Block::LoadToggle);
        assert_eq!(pagination.total, Some(5));
        assert_eq!(pagination.current, 1);
    }
}
