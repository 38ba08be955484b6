//! Theme colors.
//!
//! Sixteen color slots. Each one has an option key, a theme palette slug,
//! a default and the CSS rule it drives.
//!
//! ```json
//! { "background_color": "#b22222", "text_color": "#000000", ... }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::FormBuilder;
use super::page::SETTINGS_PAGE;
use super::sanitize::{self, FieldSanitizer};
use super::{Sanitized, SettingsModule, Warning, WarningKind};
use crate::render::{RenderContext, Stage};
use crate::store::Document;
use crate::theme::PaletteEntry;
use crate::utils::html::{escape, escape_url};

// ============================================================================
// Slots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Background,
    Text,
    Link,
    Button,
    HeaderBackground,
    FooterBackground,
    AsideBackground,
    HeaderMenuLink,
    HeaderMenuHover,
    FooterMenuLink,
    FooterMenuHover,
    TabsLink,
    TabsActiveLink,
    CommentButton,
    ReadmoreButton,
    LoadmoreButton,
}

/// Static description of a slot.
struct SlotInfo {
    key: &'static str,
    slug: &'static str,
    default: &'static str,
    label: &'static str,
    palette_name: &'static str,
    selector: &'static str,
    property: &'static str,
    /// Declarations appended after the color.
    extra: &'static str,
}

impl Slot {
    pub const ALL: [Slot; 16] = [
        Slot::Background,
        Slot::Text,
        Slot::Link,
        Slot::Button,
        Slot::HeaderBackground,
        Slot::FooterBackground,
        Slot::AsideBackground,
        Slot::HeaderMenuLink,
        Slot::HeaderMenuHover,
        Slot::FooterMenuLink,
        Slot::FooterMenuHover,
        Slot::TabsLink,
        Slot::TabsActiveLink,
        Slot::CommentButton,
        Slot::ReadmoreButton,
        Slot::LoadmoreButton,
    ];

    #[rustfmt::skip]
    const fn info(self) -> SlotInfo {
        const BG: &str = "background-color";
        const FG: &str = "color";
        let (key, slug, default, label, palette_name, selector, property, extra) = match self {
            Slot::Background => ("background_color", "background", "#b22222", "Background color", "Background", "body", BG, ""),
            Slot::Text => ("text_color", "text", "#000000", "Text color", "Text", "body", FG, ""),
            Slot::Link => ("link_color", "links", "#1e73be", "Link color", "Links", "a", FG, ""),
            Slot::Button => ("button_color", "button", "#32373c", "Button color", "Buttons", ".wp-block-button__link, .button", BG, " color: #fff;"),
            Slot::HeaderBackground => ("header_background_color", "header-bg", "#485fc7", "Header background color", "Header background", ".navbar.is-primary", BG, ""),
            Slot::FooterBackground => ("footer_background_color", "footer-bg", "#333333", "Footer background color", "Footer background", "footer.footer", BG, ""),
            Slot::AsideBackground => ("aside_background_color", "aside-bg", "#f1f1f1", "Sidebar background color", "Sidebar background", ".global-aside", BG, ""),
            Slot::HeaderMenuLink => ("header_menu_link_color", "header-menu-link", "#ffffff", "Header menu link color", "Menu (header)", ".navbar .navbar-item a", FG, ""),
            Slot::HeaderMenuHover => ("header_menu_hover_color", "header-menu-hover", "#dddddd", "Header menu hover color", "Menu hover (header)", ".navbar .navbar-item a:hover", FG, ""),
            Slot::FooterMenuLink => ("footer_menu_link_color", "footer-menu-link", "#ffffff", "Footer menu link color", "Menu (footer)", "footer.footer .navbar-item a", FG, ""),
            Slot::FooterMenuHover => ("footer_menu_hover_color", "footer-menu-hover", "#dddddd", "Footer menu hover color", "Menu hover (footer)", "footer.footer .navbar-item a:hover", FG, ""),
            Slot::TabsLink => ("tabs_link_color", "tabs-link", "#000000", "Tabs link color", "Tabs", ".tabs a", FG, ""),
            Slot::TabsActiveLink => ("tabs_active_link_color", "tabs-active-link", "#485fc7", "Active tab link color", "Active tabs", ".tabs .is-active a", FG, ""),
            Slot::CommentButton => ("comment_button_color", "comment-button", "#3273dc", "Comment button color", "Comment button", "#submit.wp-block-button__link", BG, " color: #fff !important;"),
            Slot::ReadmoreButton => ("readmore_button_color", "readmore-button", "#32373c", "\u{ab}Read more\u{bb} button color", "Read more button", ".wp-block-button.is-link .button.is-link", BG, ""),
            Slot::LoadmoreButton => ("loadmore_button_color", "loadmore-button", "#485fc7", "\u{ab}Load older posts\u{bb} button color", "Load more button", "#loadMoreButton.button.is-primary", BG, ""),
        };
        SlotInfo { key, slug, default, label, palette_name, selector, property, extra }
    }

    /// Option key (`background_color`).
    pub const fn key(self) -> &'static str {
        self.info().key
    }

    /// Theme palette slug (`background`).
    pub const fn slug(self) -> &'static str {
        self.info().slug
    }

    pub const fn default_color(self) -> &'static str {
        self.info().default
    }

    pub const fn label(self) -> &'static str {
        self.info().label
    }

    /// Name shown in the block editor palette.
    pub const fn palette_name(self) -> &'static str {
        self.info().palette_name
    }

    pub fn from_slug(slug: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.slug() == slug)
    }

    /// The CSS rule for `color`, newline terminated.
    pub fn css_rule(self, color: &str) -> String {
        let info = self.info();
        format!(
            "{} {{ {}: {};{} }}\n",
            info.selector, info.property, color, info.extra
        )
    }
}

// ============================================================================
// Options
// ============================================================================

/// `embo_colors_options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsOptions {
    pub background_color: String,
    pub text_color: String,
    pub link_color: String,
    pub button_color: String,
    pub header_background_color: String,
    pub footer_background_color: String,
    pub aside_background_color: String,
    pub header_menu_link_color: String,
    pub header_menu_hover_color: String,
    pub footer_menu_link_color: String,
    pub footer_menu_hover_color: String,
    pub tabs_link_color: String,
    pub tabs_active_link_color: String,
    pub comment_button_color: String,
    pub readmore_button_color: String,
    pub loadmore_button_color: String,
}

impl Default for ColorsOptions {
    fn default() -> Self {
        let d = |slot: Slot| slot.default_color().to_string();
        Self {
            background_color: d(Slot::Background),
            text_color: d(Slot::Text),
            link_color: d(Slot::Link),
            button_color: d(Slot::Button),
            header_background_color: d(Slot::HeaderBackground),
            footer_background_color: d(Slot::FooterBackground),
            aside_background_color: d(Slot::AsideBackground),
            header_menu_link_color: d(Slot::HeaderMenuLink),
            header_menu_hover_color: d(Slot::HeaderMenuHover),
            footer_menu_link_color: d(Slot::FooterMenuLink),
            footer_menu_hover_color: d(Slot::FooterMenuHover),
            tabs_link_color: d(Slot::TabsLink),
            tabs_active_link_color: d(Slot::TabsActiveLink),
            comment_button_color: d(Slot::CommentButton),
            readmore_button_color: d(Slot::ReadmoreButton),
            loadmore_button_color: d(Slot::LoadmoreButton),
        }
    }
}

impl ColorsOptions {
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Background => &self.background_color,
            Slot::Text => &self.text_color,
            Slot::Link => &self.link_color,
            Slot::Button => &self.button_color,
            Slot::HeaderBackground => &self.header_background_color,
            Slot::FooterBackground => &self.footer_background_color,
            Slot::AsideBackground => &self.aside_background_color,
            Slot::HeaderMenuLink => &self.header_menu_link_color,
            Slot::HeaderMenuHover => &self.header_menu_hover_color,
            Slot::FooterMenuLink => &self.footer_menu_link_color,
            Slot::FooterMenuHover => &self.footer_menu_hover_color,
            Slot::TabsLink => &self.tabs_link_color,
            Slot::TabsActiveLink => &self.tabs_active_link_color,
            Slot::CommentButton => &self.comment_button_color,
            Slot::ReadmoreButton => &self.readmore_button_color,
            Slot::LoadmoreButton => &self.loadmore_button_color,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Background => &mut self.background_color,
            Slot::Text => &mut self.text_color,
            Slot::Link => &mut self.link_color,
            Slot::Button => &mut self.button_color,
            Slot::HeaderBackground => &mut self.header_background_color,
            Slot::FooterBackground => &mut self.footer_background_color,
            Slot::AsideBackground => &mut self.aside_background_color,
            Slot::HeaderMenuLink => &mut self.header_menu_link_color,
            Slot::HeaderMenuHover => &mut self.header_menu_hover_color,
            Slot::FooterMenuLink => &mut self.footer_menu_link_color,
            Slot::FooterMenuHover => &mut self.footer_menu_hover_color,
            Slot::TabsLink => &mut self.tabs_link_color,
            Slot::TabsActiveLink => &mut self.tabs_active_link_color,
            Slot::CommentButton => &mut self.comment_button_color,
            Slot::ReadmoreButton => &mut self.readmore_button_color,
            Slot::LoadmoreButton => &mut self.loadmore_button_color,
        }
    }

    /// Non-empty slots in declaration order.
    fn filled(&self) -> impl Iterator<Item = (Slot, &str)> {
        Slot::ALL
            .into_iter()
            .map(|slot| (slot, self.get(slot)))
            .filter(|(_, color)| !color.is_empty())
    }

    /// One CSS rule per non-empty slot.
    pub fn inline_css(&self) -> String {
        self.filled().map(|(slot, color)| slot.css_rule(color)).collect()
    }

    /// Block editor palette built from the current colors.
    pub fn editor_palette(&self) -> Vec<PaletteEntry> {
        self.filled()
            .map(|(slot, color)| PaletteEntry {
                name: slot.palette_name().to_string(),
                slug: slot.slug().to_string(),
                color: color.to_string(),
            })
            .collect()
    }
}

// ============================================================================
// Module
// ============================================================================

pub struct Colors;

impl Colors {
    /// Colors taken from a theme palette.
    ///
    /// Only recognised slugs are read; their values pass the hex rule and
    /// everything else keeps its default. `None` when no slug is recognised.
    pub fn from_palette(&self, palette: &[PaletteEntry]) -> Option<Sanitized<ColorsOptions>> {
        let mut options = ColorsOptions::default();
        let mut warnings = Vec::new();
        let mut recognised = false;

        for entry in palette {
            let Some(slot) = Slot::from_slug(&entry.slug) else {
                continue;
            };
            recognised = true;
            match sanitize::hex_color(&entry.color) {
                Some(color) => *options.get_mut(slot) = color,
                None => {
                    let fallback = slot.default_color().to_string();
                    warnings.push(Warning {
                        field: slot.key(),
                        kind: WarningKind::InvalidColor {
                            input: entry.color.clone(),
                            fallback: fallback.clone(),
                        },
                    });
                    *options.get_mut(slot) = fallback;
                }
            }
        }

        recognised.then_some(Sanitized {
            value: options,
            warnings,
        })
    }

    fn action_links() -> String {
        let link = |param: &str, label: &str| {
            format!(
                "<a href=\"{}\" class=\"button button-secondary\" style=\"margin-left:10px;\">{}</a>\n",
                escape_url(&format!("{SETTINGS_PAGE}&tab=colors&{param}=1")),
                escape(label)
            )
        };
        format!(
            "{}{}",
            link("reset_embo_colors", "Reset settings"),
            link("pull_embo_colors", "Pull from config")
        )
    }
}

impl SettingsModule for Colors {
    type Options = ColorsOptions;

    const OPTION_NAME: &'static str = "embo_colors_options";
    const STAGES: &'static [Stage] = &[Stage::InlineStyles];

    fn sanitize(&self, raw: &Document) -> Sanitized<ColorsOptions> {
        let mut fields = FieldSanitizer::new(raw);
        let mut options = ColorsOptions::default();
        for slot in Slot::ALL {
            *options.get_mut(slot) = fields.hex_color(slot.key(), slot.default_color());
        }
        fields.finish(options)
    }

    fn clean_stored(_key: &str, value: &Value) -> Option<Value> {
        value.as_str().and_then(sanitize::hex_color).map(Value::String)
    }

    fn render_admin_form(&self, current: &ColorsOptions) -> String {
        Slot::ALL
            .into_iter()
            .fold(FormBuilder::new(Self::OPTION_NAME), |form, slot| {
                form.text(slot.key(), slot.label(), current.get(slot), "embo-color-field")
            })
            .finish_with(&Self::action_links())
    }

    fn render_output(&self, current: &ColorsOptions, stage: Stage, _: &RenderContext) -> Option<String> {
        match stage {
            Stage::InlineStyles => Some(current.inline_css()).filter(|css| !css.is_empty()),
            _ => None,
        }
    }
}
