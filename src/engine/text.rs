//! Text measurement for sizing label areas (plotters has no text metrics of its own).

/// Heuristic: estimate pixel width of text.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}");
        if estimate_text_width_px(&next, font_px) > max_px {
            if !out.is_empty() {
                if estimate_text_width_px(&(out.clone() + "…"), font_px) <= max_px {
                    out.push('…');
                } else if out.chars().count() > 1 {
                    out.pop();
                    out.push('…');
                }
            }
            return out;
        }
        out = next;
    }
    out
}

/// Width of the y label area: widest tick label plus room for tick marks and the axis title.
pub fn y_label_area_px<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    font_px: u32,
    has_desc: bool,
) -> u32 {
    let widest = labels
        .into_iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    let desc = if has_desc { font_px + 8 } else { 0 };
    (widest + 12 + desc).clamp(32, 220)
}

/// Height of the x label area; a rotated label needs up to its full width.
pub fn x_label_area_px<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    font_px: u32,
    rotation_deg: f64,
    has_desc: bool,
) -> u32 {
    let widest = labels
        .into_iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    let rotated = (widest as f64 * rotation_deg.to_radians().sin().abs()).ceil() as u32;
    let desc = if has_desc { font_px + 8 } else { 0 };
    (font_px.max(rotated) + 12 + desc).clamp(24, 240)
}
