//! The plugin: option store, settings modules and the Config Manager.
//!
//! Built once per invocation from `PluginConfig` and passed around by
//! reference. Admin actions are methods; public output goes through
//! [`Plugin::pipeline`].

use anyhow::{Context, Result};
use serde_json::Value;

use crate::asset::version::asset_version;
use crate::config::PluginConfig;
use crate::media::UploadsFavicons;
use crate::render::blocks::{self, Block, Pagination};
use crate::render::{Pipeline, RenderContext, Stage};
use crate::settings::branding::Branding;
use crate::settings::colors::{Colors, ColorsOptions};
use crate::settings::cookie::CookieAnalytics;
use crate::settings::custom_css::CustomCss;
use crate::settings::navigation::{CategoryToc, TOC_SCRIPT};
use crate::settings::page::{self, Notice, Tab};
use crate::settings::{self, SettingsModule, Warning};
use crate::store::{Document, JsonFileStore, OptionStore};
use crate::theme::{
    BackupStatus, ConfigManager, PaletteEntry, RestoreOutcome, SyncOutcome, ThemeStatus,
};
use crate::utils::date::current_year;

pub const RESET_NOTICE: &str = "Settings reset to defaults.";
pub const PULL_NOTICE: &str = "Settings updated from the config file.";

/// Result of an admin action: the notice to show and any sanitizer warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub notice: Notice,
    pub warnings: Vec<Warning>,
}

pub struct Plugin {
    store: Box<dyn OptionStore>,
    theme: ConfigManager,
    colors: Colors,
    branding: Branding,
    cookie: CookieAnalytics,
    custom_css: CustomCss,
    toc: CategoryToc,
    site_name: String,
    style_handle: String,
}

impl Plugin {
    /// Wire everything from configuration. Creates the theme backup when
    /// there is none yet.
    pub fn new(config: &PluginConfig) -> Result<Self> {
        let store = JsonFileStore::new(&config.paths.store);
        let theme = ConfigManager::new(&config.paths.theme_config, &config.paths.backup)
            .context("failed to prepare the theme config backup")?;
        let branding = Branding::new(UploadsFavicons::from_config(config));
        let toc = CategoryToc::new(
            config.render.assets_base(),
            asset_version(&config.paths.assets, TOC_SCRIPT),
        );

        let mut plugin = Self::with_parts(Box::new(store), theme, branding, toc);
        plugin.site_name = config.site.name.clone();
        plugin.style_handle = config.render.style_handle.clone();
        Ok(plugin)
    }

    pub fn with_parts(
        store: Box<dyn OptionStore>,
        theme: ConfigManager,
        branding: Branding,
        toc: CategoryToc,
    ) -> Self {
        Self {
            store,
            theme,
            colors: Colors,
            branding,
            cookie: CookieAnalytics,
            custom_css: CustomCss,
            toc,
            site_name: String::new(),
            style_handle: "myblocktheme-style".to_string(),
        }
    }

    pub fn store(&self) -> &dyn OptionStore {
        self.store.as_ref()
    }

    pub fn theme(&self) -> &ConfigManager {
        &self.theme
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Stored options of one module, merged over defaults.
    pub fn show(&self, tab: Tab) -> Result<Value> {
        match tab {
            Tab::Colors => self.options_value::<Colors>(),
            Tab::Branding => self.options_value::<Branding>(),
            Tab::Cookies => self.options_value::<CookieAnalytics>(),
            Tab::CustomCss => self.options_value::<CustomCss>(),
        }
    }

    fn options_value<M: SettingsModule>(&self) -> Result<Value> {
        let options = settings::load::<M>(self.store())?;
        serde_json::to_value(options).with_context(|| format!("failed to encode `{}`", M::OPTION_NAME))
    }

    /// Sanitize and persist a submission for one module.
    pub fn save(&self, tab: Tab, raw: &Document) -> Result<Vec<Warning>> {
        let store = self.store();
        let warnings = match tab {
            Tab::Colors => settings::save(&self.colors, store, raw)?.warnings,
            Tab::Branding => settings::save(&self.branding, store, raw)?.warnings,
            Tab::Cookies => settings::save(&self.cookie, store, raw)?.warnings,
            Tab::CustomCss => settings::save(&self.custom_css, store, raw)?.warnings,
        };
        Ok(warnings)
    }

    pub fn reset_colors(&self) -> Result<ActionReport> {
        settings::reset::<Colors>(self.store())?;
        Ok(ActionReport {
            notice: Notice::success(RESET_NOTICE),
            warnings: Vec::new(),
        })
    }

    /// Copy the theme palette into the colors option.
    ///
    /// `None` when theme.json has no palette or no recognised slug; the
    /// stored colors are left alone in that case.
    pub fn pull_colors(&self) -> Result<Option<ActionReport>> {
        let Some(palette) = self.theme.read_palette()? else {
            return Ok(None);
        };
        let Some(pulled) = self.colors.from_palette(&palette) else {
            return Ok(None);
        };
        settings::persist::<Colors>(self.store(), &pulled.value)?;
        Ok(Some(ActionReport {
            notice: Notice::success(PULL_NOTICE),
            warnings: pulled.warnings,
        }))
    }

    pub fn colors(&self) -> Result<ColorsOptions> {
        Ok(settings::load::<Colors>(self.store())?)
    }

    /// Block editor palette built from the stored colors.
    pub fn editor_palette(&self) -> Result<Vec<PaletteEntry>> {
        Ok(self.colors()?.editor_palette())
    }

    // ========================================================================
    // Theme config
    // ========================================================================

    /// Write the stored colors into theme.json.
    pub fn sync_palette(&self) -> Result<SyncOutcome> {
        let colors = self.colors()?;
        Ok(self.theme.sync_palette(&colors)?)
    }

    pub fn restore_theme(&self) -> Result<RestoreOutcome> {
        Ok(self.theme.restore()?)
    }

    pub fn ensure_backup(&self) -> Result<BackupStatus> {
        Ok(self.theme.ensure_backup()?)
    }

    pub fn theme_status(&self) -> Result<ThemeStatus> {
        Ok(self.theme.status()?)
    }

    // ========================================================================
    // Admin views
    // ========================================================================

    /// The tabbed settings page.
    pub fn settings_page(&self, tab: Option<&str>, notices: &[Notice]) -> Result<String> {
        page::render_page(tab, notices, |tab| -> Result<String> {
            let store = self.store();
            Ok(match tab {
                Tab::Colors => self.colors.render_admin_form(&settings::load::<Colors>(store)?),
                Tab::Branding => self
                    .branding
                    .render_admin_form(&settings::load::<Branding>(store)?),
                Tab::Cookies => self
                    .cookie
                    .render_admin_form(&settings::load::<CookieAnalytics>(store)?),
                Tab::CustomCss => self
                    .custom_css
                    .render_admin_form(&settings::load::<CustomCss>(store)?),
            })
        })
    }

    /// Checkbox field of the category form; `None` renders the add form.
    pub fn category_field(&self, category: Option<&str>) -> Result<String> {
        Ok(match category {
            Some(id) => CategoryToc::render_edit_field(CategoryToc::is_enabled(self.store(), id)?),
            None => CategoryToc::render_add_field(),
        })
    }

    pub fn set_category_toc(&self, category: &str, enabled: bool) -> Result<()> {
        Ok(CategoryToc::set_enabled(self.store(), category, enabled)?)
    }

    pub fn save_category_field(&self, category: &str, submitted: &Document) -> Result<bool> {
        Ok(CategoryToc::save_category_field(self.store(), category, submitted)?)
    }

    // ========================================================================
    // Public output
    // ========================================================================

    /// Context for the current year and the configured site name.
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(self.site_name.clone(), current_year())
    }

    /// All renderers in stage order.
    pub fn pipeline(&self) -> Pipeline<'_> {
        let store = self.store();
        let mut pipeline = Pipeline::new(self.style_handle.clone());
        pipeline
            .register_module(&self.custom_css, store)
            .register_module(&self.cookie, store)
            .register_module(&self.branding, store)
            .register_module(&self.colors, store);

        for stage in [Stage::InlineStyles, Stage::Footer] {
            pipeline.register(stage, "embo_category_toc", move |ctx| {
                if !CategoryToc::should_load(store, ctx)? {
                    return Ok(None);
                }
                Ok(self.toc.render_assets(stage))
            });
        }
        pipeline
    }

    /// Page HTML with every stage injected.
    pub fn render_page(&self, html: &str, ctx: &RenderContext) -> Result<String> {
        self.pipeline().inject(html, ctx)
    }

    /// Post content with heading anchors and expanded shortcodes.
    pub fn render_content(&self, content: &str, ctx: &RenderContext) -> Result<String> {
        let content = CategoryToc::prepare_content(content, ctx);
        self.expand_shortcodes(&content, ctx)
    }

    pub fn render_block(
        &self,
        block: Block,
        pagination: Option<&Pagination>,
        ctx: &RenderContext,
    ) -> Result<String> {
        let store = self.store();
        Ok(match block {
            Block::FooterNote => self
                .branding
                .render_footer_note(&settings::load::<Branding>(store)?, ctx),
            Block::LoadToggle => {
                CustomCss::render_load_toggle(&settings::load::<CustomCss>(store)?, pagination)
            }
        })
    }

    /// Replace block shortcodes in `content`.
    pub fn expand_shortcodes(&self, content: &str, ctx: &RenderContext) -> Result<String> {
        let Some(tag) = Block::FooterNote.shortcode() else {
            return Ok(content.to_string());
        };
        if !content.contains(tag) {
            return Ok(content.to_string());
        }
        let note = self.render_block(Block::FooterNote, None, ctx)?;
        Ok(blocks::expand_shortcodes(content, |name| {
            (name == tag).then(|| note.clone())
        }))
    }
}
