//! Built-in colour themes, one per context type.

use std::fmt::Write as _;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Shade steps of a palette, lightest first.
pub const SHADES: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

/// Ten shades of one colour. Serializes as `{"50": "#…", …, "900": "#…"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [&'static str; 10]);

impl Palette {
    /// Colour of the given shade step, if it is one of [`SHADES`].
    #[must_use]
    pub fn shade(&self, step: u16) -> Option<&'static str> {
        SHADES
            .iter()
            .position(|s| *s == step)
            .map(|index| self.0[index])
    }

    fn steps(&self) -> impl Iterator<Item = (u16, &'static str)> + '_ {
        SHADES.into_iter().zip(self.0.iter().copied())
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SHADES.len()))?;
        for (step, colour) in self.steps() {
            map.serialize_entry(&step.to_string(), colour)?;
        }
        map.end()
    }
}

/// Look and wording for one context type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: &'static str,
    pub primary: Palette,
    pub secondary: Palette,
    pub accent: &'static str,
    /// Tailwind gradient classes for the page background.
    pub background: &'static str,
    pub card_background: &'static str,
    pub gradient: &'static str,
    pub icon: &'static str,
    pub welcome_message: &'static str,
    pub description: &'static str,
}

pub const HOME: Theme = Theme {
    name: "Home",
    primary: Palette([
        "#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1",
        "#075985", "#0c4a6e",
    ]),
    secondary: Palette([
        "#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d",
        "#166534", "#14532d",
    ]),
    accent: "#f59e0b",
    background: "from-blue-50 via-cyan-50 to-teal-100",
    card_background: "bg-white/90",
    gradient: "from-blue-500 to-cyan-600",
    icon: "🏠",
    welcome_message: "Welcome to Your Home Finance Hub",
    description: "Manage your personal finances and family budget",
};

pub const WORK: Theme = Theme {
    name: "Work",
    primary: Palette([
        "#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155",
        "#1e293b", "#0f172a",
    ]),
    secondary: Palette([
        "#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c",
        "#991b1b", "#7f1d1d",
    ]),
    accent: "#3b82f6",
    background: "from-slate-50 via-gray-50 to-zinc-100",
    card_background: "bg-white/95",
    gradient: "from-slate-600 to-gray-700",
    icon: "💼",
    welcome_message: "Professional Finance Management",
    description: "Track your work expenses and professional finances",
};

pub const BUSINESS: Theme = Theme {
    name: "Business",
    primary: Palette([
        "#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7c3aed",
        "#6b21a8", "#581c87",
    ]),
    secondary: Palette([
        "#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207",
        "#854d0e", "#713f12",
    ]),
    accent: "#10b981",
    background: "from-purple-50 via-violet-50 to-indigo-100",
    card_background: "bg-white/90",
    gradient: "from-purple-600 to-indigo-700",
    icon: "🏢",
    welcome_message: "Business Finance Command Center",
    description: "Manage your business finances and growth metrics",
};

/// Every built-in theme.
pub static THEMES: [Theme; 3] = [HOME, WORK, BUSINESS];

/// Theme for a context type, `Home` for anything unknown.
#[must_use]
pub fn theme_for(context_type: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.name == context_type)
        .unwrap_or(&THEMES[0])
}

/// CSS custom properties exposing a theme's colours.
#[must_use]
pub fn css_variables(theme: &Theme) -> String {
    let mut css = String::from(":root {\n");
    for (palette, name) in [(&theme.primary, "primary"), (&theme.secondary, "secondary")] {
        for (step, colour) in palette.steps() {
            let _ = writeln!(css, "  --theme-{name}-{step}: {colour};");
        }
    }
    let _ = writeln!(css, "  --theme-accent: {};", theme.accent);
    css.push_str("}\n");
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup_falls_back_to_home() {
        assert_eq!(theme_for("Work").name, "Work");
        assert_eq!(theme_for("Business").icon, "🏢");
        assert_eq!(theme_for("Holiday").name, "Home");
        assert_eq!(theme_for("").name, "Home");
    }

    #[test]
    fn test_palette_shades() {
        assert_eq!(HOME.primary.shade(50), Some("#f0f9ff"));
        assert_eq!(HOME.primary.shade(900), Some("#0c4a6e"));
        assert_eq!(HOME.primary.shade(550), None);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(theme_for("Business")).unwrap();

        assert_eq!(value["name"], "Business");
        assert_eq!(value["primary"]["500"], "#a855f7");
        assert_eq!(value["secondary"]["50"], "#fefce8");
        assert_eq!(value["welcomeMessage"], "Business Finance Command Center");
        assert_eq!(value["cardBackground"], "bg-white/90");
    }

    #[test]
    fn test_css_variables() {
        let css = css_variables(&WORK);

        assert!(css.starts_with(":root {"));
        assert!(css.contains("--theme-primary-50: #f8fafc;"));
        assert!(css.contains("--theme-secondary-900: #7f1d1d;"));
        assert!(css.contains("--theme-accent: #3b82f6;"));
        assert_eq!(css.matches("--theme-").count(), 21);
    }
}
