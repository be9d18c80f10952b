//! Light and dark palettes.

use hearth_core::Color;

use crate::ResolvedTheme;

/// Design tokens for one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    // Backgrounds
    pub background: Color,
    pub surface: Color,
    pub surface_hover: Color,

    // Text
    pub foreground: Color,
    pub foreground_muted: Color,
    pub foreground_subtle: Color,

    // Interactive
    pub primary: Color,
    pub primary_hover: Color,
    pub primary_foreground: Color,

    // Semantic
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Structural
    pub border: Color,
    pub border_focus: Color,
    pub shadow: Color,
}

pub const LIGHT: ThemeColors = ThemeColors {
    background: Color::from_rgb(0xff, 0xff, 0xff),
    surface: Color::from_rgb(0xf8, 0xfa, 0xfc),
    surface_hover: Color::from_rgb(0xf1, 0xf5, 0xf9),

    foreground: Color::from_rgb(0x0f, 0x17, 0x2a),
    foreground_muted: Color::from_rgb(0x47, 0x55, 0x69),
    foreground_subtle: Color::from_rgb(0x94, 0xa3, 0xb8),

    primary: Color::from_rgb(0x25, 0x63, 0xeb),
    primary_hover: Color::from_rgb(0x1d, 0x4e, 0xd8),
    primary_foreground: Color::from_rgb(0xff, 0xff, 0xff),

    success: Color::from_rgb(0x16, 0xa3, 0x4a),
    warning: Color::from_rgb(0xca, 0x8a, 0x04),
    error: Color::from_rgb(0xdc, 0x26, 0x26),
    info: Color::from_rgb(0x02, 0x84, 0xc7),

    border: Color::from_rgb(0xe2, 0xe8, 0xf0),
    border_focus: Color::from_rgb(0x3b, 0x82, 0xf6),
    shadow: Color::from_rgba(0, 0, 0, 26),
};

pub const DARK: ThemeColors = ThemeColors {
    background: Color::from_rgb(0x0f, 0x17, 0x2a),
    surface: Color::from_rgb(0x1e, 0x29, 0x3b),
    surface_hover: Color::from_rgb(0x33, 0x41, 0x55),

    foreground: Color::from_rgb(0xf8, 0xfa, 0xfc),
    foreground_muted: Color::from_rgb(0xcb, 0xd5, 0xe1),
    foreground_subtle: Color::from_rgb(0x64, 0x74, 0x8b),

    primary: Color::from_rgb(0x3b, 0x82, 0xf6),
    primary_hover: Color::from_rgb(0x60, 0xa5, 0xfa),
    primary_foreground: Color::from_rgb(0xff, 0xff, 0xff),

    success: Color::from_rgb(0x22, 0xc5, 0x5e),
    warning: Color::from_rgb(0xea, 0xb3, 0x08),
    error: Color::from_rgb(0xef, 0x44, 0x44),
    info: Color::from_rgb(0x0e, 0xa5, 0xe9),

    border: Color::from_rgb(0x33, 0x41, 0x55),
    border_focus: Color::from_rgb(0x60, 0xa5, 0xfa),
    shadow: Color::from_rgba(0, 0, 0, 102),
};

pub fn palette(mode: ResolvedTheme) -> &'static ThemeColors {
    match mode {
        ResolvedTheme::Light => &LIGHT,
        ResolvedTheme::Dark => &DARK,
    }
}
