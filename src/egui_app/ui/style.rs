use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::records::SeriesColor;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub neutral: Color32,
    pub danger: Color32,
    pub warning: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(247, 247, 247),
        bg_secondary: Color32::from_rgb(255, 255, 255),
        bg_tertiary: Color32::from_rgb(236, 238, 241),
        panel_outline: Color32::from_rgb(204, 204, 204),
        text_primary: Color32::from_rgb(51, 51, 51),
        text_muted: Color32::from_rgb(128, 128, 128),
        accent: Color32::from_rgb(0, 123, 255),
        neutral: Color32::from_rgb(204, 204, 204),
        danger: Color32::from_rgb(220, 53, 69),
        warning: Color32::from_rgb(230, 145, 56),
        success: Color32::from_rgb(40, 167, 69),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_primary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_secondary;
    visuals.faint_bg_color = palette.bg_tertiary;
    visuals.error_fg_color = palette.danger;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.accent.gamma_multiply(0.25);
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    rounded(&mut visuals.widgets.inactive, palette);
    rounded(&mut visuals.widgets.hovered, palette);
    rounded(&mut visuals.widgets.active, palette);
    visuals.window_corner_radius = CornerRadius::same(8);
    visuals.popup_shadow = Shadow::NONE;
}

fn rounded(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(5);
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
}

/// Tone of the status bar message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusTone {
    #[default]
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

pub fn status_badge_label(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Idle => "Idle",
        StatusTone::Busy => "Working",
        StatusTone::Info => "Info",
        StatusTone::Warning => "Warning",
        StatusTone::Error => "Error",
    }
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    let palette = palette();
    match tone {
        StatusTone::Idle => palette.neutral,
        StatusTone::Busy => palette.accent,
        StatusTone::Info => palette.success,
        StatusTone::Warning => palette.warning,
        StatusTone::Error => palette.danger,
    }
}

/// Colors for a form toggle button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleButtonStyle {
    pub fill: Color32,
    pub text: Color32,
}

/// Style of a form toggle button, derived from its selected/hovered state.
pub fn toggle_button_style(selected: bool, hovered: bool) -> ToggleButtonStyle {
    let palette = palette();
    ToggleButtonStyle {
        fill: if selected || hovered {
            palette.accent
        } else {
            palette.neutral
        },
        text: Color32::WHITE,
    }
}

pub fn series_color(color: SeriesColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn verdict_color(is_unicorn: bool) -> Color32 {
    if is_unicorn {
        palette().success
    } else {
        palette().danger
    }
}

pub fn delete_button_fill() -> Color32 {
    palette().danger
}
