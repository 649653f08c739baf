//! Built-in height heuristics per block kind.
//!
//! These are character-based estimates, not pixel-exact layout. Every
//! function is total: missing or malformed content yields a finite value
//! and the estimator clamps it into the rule's bounds afterwards.

use colflow_core::{Block, RenderContext, TypeRule};

/// Line height as a multiple of the font size for body text.
const LINE_HEIGHT_FACTOR: f64 = 1.6;

/// Average character width as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Assumed characters per line when no width context applies.
const FALLBACK_CHARS_PER_LINE: usize = 80;

/// Wrapped body text: line count from character count and column width.
pub fn paragraph(block: &Block, ctx: &RenderContext, rule: &TypeRule) -> f64 {
    let char_width = (ctx.font_size * CHAR_WIDTH_FACTOR).max(1.0);
    let chars_per_line = ((ctx.container_width / char_width).floor() as usize).max(1);
    let lines = block.text_len().div_ceil(chars_per_line).max(1);
    lines as f64 * (ctx.font_size * LINE_HEIGHT_FACTOR) + 2.0 * rule.padding
}

/// Single-line heading scaled by level; h1 is largest, h6 smallest.
pub fn heading(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    let level = block
        .number_property("level")
        .map(|l| l as i64)
        .unwrap_or(2)
        .clamp(1, 6);
    let multiplier = match level {
        1 => 2.0,
        2 => 1.6,
        3 => 1.3,
        4 => 1.15,
        5 => 1.05,
        _ => 1.0,
    };
    rule.line_height * multiplier + 2.0 * rule.padding
}

/// One line per item; an empty list still renders one placeholder item.
pub fn list(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    let items = block.children.len().max(1);
    items as f64 * rule.line_height + rule.padding
}

/// Explicit dimensions from properties when present, type default otherwise.
pub fn image(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    if let Some(height) = block.number_property("height") {
        return height;
    }
    match (
        block.number_property("width"),
        block.number_property("aspectRatio"),
    ) {
        (Some(width), Some(ratio)) => width * ratio,
        _ => rule.base_height,
    }
}

/// Code renders line-for-line; padding covers the block chrome.
pub fn code(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    let lines = block.text.lines().count().max(1);
    lines as f64 * rule.line_height + rule.padding
}

/// Header row plus one line-height per data row.
pub fn table(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    let rows = block
        .number_property("rows")
        .map(|r| r.max(0.0) as usize)
        .unwrap_or(block.children.len());
    rule.base_height + rows as f64 * rule.line_height
}

/// Fixed lookup by embed sub-type.
pub fn embed(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    match block.text_property("embedType") {
        Some("video") => 315.0,
        Some("audio") => 80.0,
        Some("map") => 400.0,
        Some("pdf") => 600.0,
        _ => rule.base_height,
    }
}

/// Fallback for kinds with no dedicated measurer: base height plus extra
/// lines estimated from the textual content.
pub fn default_measurer(block: &Block, _ctx: &RenderContext, rule: &TypeRule) -> f64 {
    let lines = block.text_len().div_ceil(FALLBACK_CHARS_PER_LINE).max(1);
    rule.base_height + (lines - 1) as f64 * rule.line_height
}
