//! Admin form markup.
//!
//! Values are escaped for their context as they are added; callers pass
//! raw stored values.

use crate::utils::html::{escape, escape_attr, escape_textarea, escape_url};

/// Builder for one settings form posting a single option.
pub struct FormBuilder {
    option: &'static str,
    html: String,
}

impl FormBuilder {
    pub fn new(option: &'static str) -> Self {
        let mut html = String::with_capacity(2048);
        html.push_str("<form method=\"post\" action=\"options.php\">\n");
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"option_page\" value=\"{}_group\" />\n",
            option
        ));
        html.push_str("<table class=\"form-table\" role=\"presentation\"><tbody>\n");
        Self { option, html }
    }

    fn field_name(&self, key: &str) -> String {
        format!("{}[{}]", self.option, key)
    }

    fn row(&mut self, id: &str, label: &str, control: &str) {
        self.html.push_str(&format!(
            "<tr><th scope=\"row\"><label for=\"{}\">{}</label></th><td>{}</td></tr>\n",
            escape_attr(id),
            escape(label),
            control
        ));
    }

    /// Text input. `class` is added verbatim.
    pub fn text(mut self, key: &str, label: &str, value: &str, class: &str) -> Self {
        let control = format!(
            "<input type=\"text\" id=\"{}\" name=\"{}\" value=\"{}\" class=\"{}\" />",
            escape_attr(key),
            escape_attr(&self.field_name(key)),
            escape_attr(value),
            escape_attr(class)
        );
        self.row(key, label, &control);
        self
    }

    /// URL input; the value is escaped as a URL.
    pub fn url(mut self, key: &str, label: &str, value: &str) -> Self {
        let control = format!(
            "<input type=\"url\" id=\"{}\" name=\"{}\" value=\"{}\" class=\"regular-text\" />",
            escape_attr(key),
            escape_attr(&self.field_name(key)),
            escape_url(value)
        );
        self.row(key, label, &control);
        self
    }

    pub fn checkbox(mut self, key: &str, label: &str, checked: bool) -> Self {
        let control = format!(
            "<input type=\"checkbox\" id=\"{}\" name=\"{}\" value=\"1\"{} />",
            escape_attr(key),
            escape_attr(&self.field_name(key)),
            if checked { " checked=\"checked\"" } else { "" }
        );
        self.row(key, label, &control);
        self
    }

    pub fn textarea(mut self, key: &str, label: &str, value: &str, rows: u8) -> Self {
        let control = format!(
            "<textarea id=\"{}\" name=\"{}\" rows=\"{}\" class=\"large-text code\">{}</textarea>",
            escape_attr(key),
            escape_attr(&self.field_name(key)),
            rows,
            escape_textarea(value)
        );
        self.row(key, label, &control);
        self
    }

    /// Radio group; `choices` are `(value, label)` pairs.
    pub fn radio(mut self, key: &str, label: &str, choices: &[(&str, &str)], current: &str) -> Self {
        let name = self.field_name(key);
        let control: Vec<String> = choices
            .iter()
            .map(|(value, text)| {
                format!(
                    "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{} /> {}</label>",
                    escape_attr(&name),
                    escape_attr(value),
                    if *value == current { " checked=\"checked\"" } else { "" },
                    escape(text)
                )
            })
            .collect();
        self.row(key, label, &control.join("<br />"));
        self
    }

    pub fn finish(self) -> String {
        self.finish_with("")
    }

    /// Close the form, placing `actions` after the submit button.
    pub fn finish_with(mut self, actions: &str) -> String {
        self.html.push_str("</tbody></table>\n");
        self.html.push_str(
            "<p class=\"submit\"><input type=\"submit\" name=\"submit\" id=\"submit\" \
             class=\"button button-primary\" value=\"Save settings\" /></p>\n",
        );
        self.html.push_str(actions);
        self.html.push_str("</form>\n");
        self.html
    }
}
