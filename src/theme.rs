use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Green used for the home country regardless of scheme.
pub const HOME_COLOR: &str = "#4caf50";

pub const BACKGROUND_ACCENTED: &str = "--background-accented";
pub const BOX_BORDER: &str = "--box-border";
pub const LINK: &str = "--link";
pub const LINK_HOVER: &str = "--link-hover";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Colours the renderer needs, resolved for one scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub background_accented: String,
    pub box_border: String,
    pub link: String,
    pub link_hover: String,
    pub home: String,
}

/// Anything that can answer "what is `--name` under this scheme".
pub trait ThemeSource {
    fn custom_property(&self, scheme: ColorScheme, name: &str) -> Option<String>;
}

fn fallback(scheme: ColorScheme, name: &str) -> &'static str {
    match (scheme, name) {
        (ColorScheme::Light, BACKGROUND_ACCENTED) => "#f0f0f0",
        (ColorScheme::Light, BOX_BORDER) => "#cccccc",
        (ColorScheme::Light, LINK) => "#0366d6",
        (ColorScheme::Light, LINK_HOVER) => "#024ea4",
        (ColorScheme::Dark, BACKGROUND_ACCENTED) => "#2a2a2a",
        (ColorScheme::Dark, BOX_BORDER) => "#444444",
        (ColorScheme::Dark, LINK) => "#58a6ff",
        (ColorScheme::Dark, LINK_HOVER) => "#79b8ff",
        _ => "#888888",
    }
}

impl ThemeColors {
    pub fn resolve(source: &dyn ThemeSource, scheme: ColorScheme) -> Self {
        let get = |name: &str| {
            source
                .custom_property(scheme, name)
                .unwrap_or_else(|| fallback(scheme, name).to_string())
        };
        Self {
            background_accented: get(BACKGROUND_ACCENTED),
            box_border: get(BOX_BORDER),
            link: get(LINK),
            link_hover: get(LINK_HOVER),
            home: HOME_COLOR.to_string(),
        }
    }
}

/// Built-in palette only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTheme;

impl ThemeSource for DefaultTheme {
    fn custom_property(&self, _scheme: ColorScheme, _name: &str) -> Option<String> {
        None
    }
}

/// Custom properties scraped from a stylesheet.
///
/// Declarations in a top-level `:root` block are the light values; a `:root`
/// block nested in `@media (prefers-color-scheme: dark)` overrides them for dark.
#[derive(Debug, Clone, Default)]
pub struct CssVariables {
    light: HashMap<String, String>,
    dark: HashMap<String, String>,
}

impl CssVariables {
    pub fn parse(css: &str) -> Self {
        let mut vars = Self::default();
        let css = strip_comments(css);
        let bytes = css.as_bytes();

        // (selector text, is inside a dark media query)
        let mut stack: Vec<(String, bool)> = Vec::new();
        let mut prelude_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => {
                    let prelude = css[prelude_start..i].trim().to_string();
                    let dark = stack.last().map(|(_, d)| *d).unwrap_or(false)
                        || (prelude.starts_with("@media")
                            && prelude.replace(' ', "").contains("prefers-color-scheme:dark"));
                    stack.push((prelude, dark));
                    prelude_start = i + 1;
                }
                b'}' | b';' => {
                    // The last declaration of a block may omit its semicolon
                    if let Some((selector, dark)) = stack.last() {
                        if selector.split(',').any(|s| s.trim() == ":root") {
                            vars.declare(&css[prelude_start..i], *dark);
                        }
                    }
                    if bytes[i] == b'}' {
                        stack.pop();
                    }
                    prelude_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        vars
    }

    fn declare(&mut self, decl: &str, dark: bool) {
        let Some((name, value)) = decl.split_once(':') else {
            return;
        };
        let name = name.trim();
        if !name.starts_with("--") {
            return;
        }
        let target = if dark { &mut self.dark } else { &mut self.light };
        target.insert(name.to_string(), value.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.light.len() + self.dark.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ThemeSource for CssVariables {
    fn custom_property(&self, scheme: ColorScheme, name: &str) -> Option<String> {
        match scheme {
            ColorScheme::Dark => self.dark.get(name).or_else(|| self.light.get(name)).cloned(),
            ColorScheme::Light => self.light.get(name).cloned(),
        }
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
