//! Rendering context supplied by the UI layer.

/// Color theme. Carried through for renderers; estimation math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Read-only rendering parameters used by the height heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderContext {
    /// Width of one column in pixels
    pub container_width: f64,
    /// Base font size in pixels
    pub font_size: f64,
    /// Active color theme
    pub theme: Theme,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            container_width: 600.0,
            font_size: 16.0,
            theme: Theme::Light,
        }
    }
}

impl RenderContext {
    /// Create a context with the given column width.
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            ..Default::default()
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let ctx = RenderContext::default();
        assert!((ctx.container_width - 600.0).abs() < 0.001);
        assert!((ctx.font_size - 16.0).abs() < 0.001);
        assert_eq!(ctx.theme, Theme::Light);
    }

    #[test]
    fn test_context_builder() {
        let ctx = RenderContext::new(800.0).with_font_size(14.0).with_theme(Theme::Dark);
        assert!((ctx.container_width - 800.0).abs() < 0.001);
        assert!((ctx.font_size - 14.0).abs() < 0.001);
        assert_eq!(ctx.theme, Theme::Dark);
    }
}
