//! Tabbed settings page.
//!
//! Pure routing: the page picks the active tab and wraps whatever form the
//! caller renders for it. It holds no state.

use std::fmt;

use crate::utils::html::escape;

/// Base query of the settings page.
pub const SETTINGS_PAGE: &str = "?page=embo-colors";

/// Where the extra "Menu" tab points.
pub const MENUS_URL: &str = "nav-menus.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Colors,
    Branding,
    Cookies,
    CustomCss,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Colors, Tab::Branding, Tab::Cookies, Tab::CustomCss];

    pub const fn slug(self) -> &'static str {
        match self {
            Tab::Colors => "colors",
            Tab::Branding => "branding",
            Tab::Cookies => "cookies",
            Tab::CustomCss => "custom-css",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Tab::Colors => "Theme colors",
            Tab::Branding => "Branding",
            Tab::Cookies => "Cookies & Analytics",
            Tab::CustomCss => "Custom CSS & Other",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.slug() == slug)
    }
}

/// Success notice shown above the tabs after an admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn render(&self) -> String {
        format!(
            "<div class=\"notice notice-success settings-error is-dismissible\"><p><strong>{}</strong></p></div>\n",
            escape(&self.message)
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Render the page for the tab named by `requested` (`colors` when absent).
///
/// `body` renders the form of the active tab. An unknown tab shows the tab
/// bar with no body.
pub fn render_page<E>(
    requested: Option<&str>,
    notices: &[Notice],
    body: impl FnOnce(Tab) -> Result<String, E>,
) -> Result<String, E> {
    let active_slug = requested.unwrap_or(Tab::Colors.slug());
    let active = Tab::from_slug(active_slug);

    let mut html = String::from("<div class=\"wrap\">\n<h1>Customization</h1>\n");
    for notice in notices {
        html.push_str(&notice.render());
    }

    html.push_str("<h2 class=\"nav-tab-wrapper\">\n");
    for tab in Tab::ALL {
        let class = if Some(tab) == active {
            "nav-tab nav-tab-active"
        } else {
            "nav-tab"
        };
        html.push_str(&format!(
            "<a href=\"{SETTINGS_PAGE}&amp;tab={}\" class=\"{class}\">{}</a>\n",
            tab.slug(),
            escape(tab.title())
        ));
    }
    html.push_str(&format!("<a href=\"{MENUS_URL}\" class=\"nav-tab\">Menu</a>\n"));
    html.push_str("</h2>\n");

    if let Some(tab) = active {
        html.push_str(&body(tab)?);
    }
    html.push_str("</div>\n");
    Ok(html)
}
