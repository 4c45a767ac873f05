//! Render a [`Figure`] with plotters: one grid cell per panel, SVG or bitmap output.

use super::coord::PinnedAxis;
use super::figure::{Artist, ArtistKind, Colorbar, Figure, Panel};
use super::scale::{TARGET_TICKS, log_ticks, nice_ticks};
use super::text::{truncate_to_width, x_label_area_px, y_label_area_px};
use super::{Axes, Axis, AxisScale};
use crate::error::{Result, engine_err};
use crate::options::LegendLoc;
use crate::style::{LineDash, MarkerShape, Rgb8, Theme, ensure_font_registered};
use crate::ticks::format_number;

use plotters::backend::DrawingBackend;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, LineSeries};
use plotters::style::{FontFamily, FontTransform};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

/// Points to pixels at the figure's dpi.
#[derive(Clone, Copy)]
struct Scale(f64);

impl Scale {
    fn px(self, points: f64) -> u32 {
        (points * self.0).round().max(1.0) as u32
    }
}

/// Share of a panel cell given to the plot when a colorbar sits beside it.
const COLORBAR_SPLIT_PCT: u32 = 85;
const COLORBAR_STEPS: usize = 64;

fn font(theme: &Theme, px: u32) -> (FontFamily<'_>, f64) {
    (FontFamily::from(theme.font_family.as_str()), px as f64)
}

fn rgba(c: Rgb8, alpha: f64) -> RGBAColor {
    RGBColor(c.r, c.g, c.b).mix(alpha.clamp(0.0, 1.0))
}

/// Render `figure` to `path`; the extension picks SVG (`.svg`) or a bitmap format.
pub fn render_to_file(figure: &Figure, path: &Path) -> Result<()> {
    ensure_font_registered(FontFamily::from(figure.theme.font_family.as_str()).as_str());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let size = figure.size_px();
    let is_svg = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_figure(root, figure)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_figure(root, figure)?;
    }
    log::debug!("rendered {}x{} px to {}", size.0, size.1, path.display());
    Ok(())
}

/// Draw every panel of `figure` onto `root`.
pub fn draw_figure<DB>(root: DrawingArea<DB, Shift>, figure: &Figure) -> Result<()>
where
    DB: DrawingBackend,
{
    let theme = &figure.theme;
    let scale = Scale(figure.dpi() / 72.0);
    let face = figure.facecolor().rgb();
    root.fill(&RGBColor(face.r, face.g, face.b))
        .map_err(engine_err)?;

    let Some(spec) = figure.spec() else {
        return root.present().map_err(engine_err);
    };
    if figure.panels().is_empty() || spec.layout.rows == 0 {
        return root.present().map_err(engine_err);
    }

    let area = match figure.panels().iter().find_map(|p| p.figure_title.as_deref()) {
        Some(title) => root
            .titled(title, font(theme, scale.px(theme.title_pt() * 1.2)))
            .map_err(engine_err)?,
        None => root.clone(),
    };
    let cells = area.split_evenly((spec.layout.rows, spec.layout.columns));
    for panel in figure.panels() {
        let idx = panel.position.row * spec.layout.columns + panel.position.col;
        if let Some(cell) = cells.get(idx) {
            draw_panel(cell, panel, theme, scale)?;
        }
    }

    root.present().map_err(engine_err)?;
    Ok(())
}

/// Plotters only turns text in quarter turns, so angles snap to the nearest one.
/// Positive angles turn counter-clockwise.
fn tick_transform(degrees: f64) -> FontTransform {
    let mut d = degrees.rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    match d {
        d if d.abs() > 135.0 => FontTransform::Rotate180,
        d if d >= 45.0 => FontTransform::Rotate270,
        d if d <= -45.0 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

fn legend_position(loc: LegendLoc) -> SeriesLabelPosition {
    match loc {
        LegendLoc::Best | LegendLoc::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLoc::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLoc::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLoc::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLoc::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLoc::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLoc::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLoc::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLoc::Center => SeriesLabelPosition::MiddleMiddle,
    }
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    theme: &Theme,
    scale: Scale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let Some(colorbar) = &panel.colorbar else {
        return draw_chart(area, panel, theme, scale).map(|_| ());
    };
    let (cell_w, _) = area.dim_in_pixel();
    let (plot_area, bar_area) = area.split_horizontally(cell_w * COLORBAR_SPLIT_PCT / 100);
    let insets = draw_chart(&plot_area, panel, theme, scale)?;
    draw_colorbar(&bar_area, colorbar, theme, scale, insets)
}

fn panel_axis(panel: &Panel, axis: Axis) -> PinnedAxis {
    let (lo, hi) = match axis {
        Axis::X => panel.xlim(),
        Axis::Y => panel.ylim(),
    };
    PinnedAxis::new(lo, hi, panel.scale(axis), panel.ticks(axis))
}

/// Draw the panel's chart; returns the `(top, bottom)` insets of its plotting area in
/// pixels so a colorbar can line up with it.
fn draw_chart<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    theme: &Theme,
    scale: Scale,
) -> Result<(u32, u32)>
where
    DB: DrawingBackend,
{
    let x_axis = panel_axis(panel, Axis::X);
    let y_axis = panel_axis(panel, Axis::Y);
    let (x0, x1) = x_axis.bounds();
    let (y0, y1) = y_axis.bounds();
    let x_labels: Vec<String> = x_axis
        .ticks()
        .iter()
        .map(|t| panel.tick_label(Axis::X, *t))
        .collect();
    let y_labels: Vec<String> = y_axis
        .ticks()
        .iter()
        .map(|t| panel.tick_label(Axis::Y, *t))
        .collect();

    let x_tick_px = scale.px(panel.x_ticks.fontsize.unwrap_or(theme.tick_pt()));
    let y_tick_px = scale.px(panel.y_ticks.fontsize.unwrap_or(theme.tick_pt()));
    let label_px = scale.px(theme.label_pt());
    let title_px = scale.px(theme.title_pt());
    let margin = scale.px(6.0);

    let bottom = x_label_area_px(
        x_labels.iter().map(String::as_str),
        x_tick_px,
        panel.x_ticks.rotation,
        panel.xlabel.is_some(),
    );
    let side = y_label_area_px(
        y_labels.iter().map(String::as_str),
        y_tick_px,
        panel.ylabel.is_some(),
    );
    let (cell_w, _) = area.dim_in_pixel();

    let mut builder = ChartBuilder::on(area);
    builder.margin(margin).x_label_area_size(bottom);
    if panel.y_ticks_right {
        builder.right_y_label_area_size(side);
    } else {
        builder.y_label_area_size(side);
    }
    let mut top = margin;
    if let Some(title) = &panel.title {
        builder.caption(
            truncate_to_width(title, title_px, cell_w),
            font(theme, title_px),
        );
        top += title_px + margin;
    }
    let mut chart = builder
        .build_cartesian_2d(x_axis, y_axis)
        .map_err(engine_err)?;

    let x_fmt = |v: &f64| panel.tick_label(Axis::X, *v);
    let y_fmt = |v: &f64| panel.tick_label(Axis::Y, *v);
    let x_style = TextStyle::from(font(theme, x_tick_px))
        .transform(tick_transform(panel.x_ticks.rotation));
    let y_style = TextStyle::from(font(theme, y_tick_px))
        .transform(tick_transform(panel.y_ticks.rotation));

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style(x_style)
        .y_label_style(y_style)
        .axis_desc_style(font(theme, label_px));
    if let Some(xlabel) = &panel.xlabel {
        mesh.x_desc(xlabel.as_str());
    }
    if let Some(ylabel) = &panel.ylabel {
        mesh.y_desc(ylabel.as_str());
    }
    mesh.draw().map_err(engine_err)?;

    let mut artists: Vec<&Artist> = panel.artists.iter().collect();
    artists.sort_by(|a, b| a.zorder.total_cmp(&b.zorder));
    for artist in artists {
        draw_artist(&mut chart, artist, (x0, x1), (y0, y1), scale)?;
    }

    if let Some(opts) = &panel.legend
        && panel.legend_entries().next().is_some()
    {
        let frame = opts.frameon.unwrap_or(true);
        let mut labels = chart.configure_series_labels();
        labels
            .position(legend_position(opts.loc.unwrap_or_default()))
            .label_font(font(
                theme,
                scale.px(opts.fontsize.unwrap_or(theme.legend_pt())),
            ));
        if frame {
            labels
                .background_style(WHITE.mix(opts.framealpha.unwrap_or(0.8)))
                .border_style(BLACK);
        } else {
            labels
                .background_style(TRANSPARENT)
                .border_style(TRANSPARENT);
        }
        labels.draw().map_err(engine_err)?;
    }
    Ok((top, bottom + margin))
}

/// Vertical color scale with value ticks on its right.
fn draw_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    colorbar: &Colorbar,
    theme: &Theme,
    scale: Scale,
    (top, bottom): (u32, u32),
) -> Result<()>
where
    DB: DrawingBackend,
{
    let norm = colorbar.norm;
    let axis = if norm.log {
        PinnedAxis::new(
            norm.vmin,
            norm.vmax,
            AxisScale::Log,
            log_ticks(norm.vmin, norm.vmax),
        )
    } else {
        PinnedAxis::new(
            norm.vmin,
            norm.vmax,
            AxisScale::Linear,
            nice_ticks(norm.vmin, norm.vmax, TARGET_TICKS),
        )
    };
    let fmt = colorbar.format.clone().unwrap_or_default();
    let labels: Vec<String> = axis.ticks().iter().map(|t| format_number(*t, &fmt)).collect();
    let tick_px = scale.px(theme.tick_pt());
    let side = y_label_area_px(
        labels.iter().map(String::as_str),
        tick_px,
        colorbar.label.is_some(),
    );

    let mut chart = ChartBuilder::on(area)
        .margin_top(top)
        .margin_bottom(bottom)
        .margin_right(scale.px(6.0))
        .right_y_label_area_size(side)
        .build_cartesian_2d(0.0..1.0, axis)
        .map_err(engine_err)?;

    let y_fmt = |v: &f64| format_number(*v, &fmt);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .disable_x_axis()
        .y_label_formatter(&y_fmt)
        .y_label_style(font(theme, tick_px))
        .axis_desc_style(font(theme, scale.px(theme.label_pt())));
    if let Some(label) = &colorbar.label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw().map_err(engine_err)?;

    let steps = COLORBAR_STEPS as f64;
    chart
        .draw_series((0..COLORBAR_STEPS).map(|k| {
            let (t0, t1) = (k as f64 / steps, (k + 1) as f64 / steps);
            let c = colorbar.cmap.map((t0 + t1) / 2.0);
            Rectangle::new(
                [(0.0, norm.value_at(t0)), (1.0, norm.value_at(t1))],
                rgba(c, 1.0).filled(),
            )
        }))
        .map_err(engine_err)?;
    Ok(())
}

fn dash_pattern(dash: LineDash, width_px: u32) -> (u32, u32) {
    match dash {
        LineDash::Solid => (0, 0),
        LineDash::Dash => (width_px * 4, width_px * 2),
        LineDash::Dot => (width_px, width_px * 2),
        LineDash::DashDot => (width_px * 6, width_px * 3),
        LineDash::Blank => (0, 0),
    }
}

/// Draw a polyline, solid or dashed, with an optional legend entry.
fn draw_path<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    points: &[(f64, f64)],
    dash: LineDash,
    style: ShapeStyle,
    label: Option<&str>,
) -> Result<()>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let anno = match dash {
        LineDash::Blank => return Ok(()),
        LineDash::Solid => chart.draw_series(LineSeries::new(points.iter().copied(), style)),
        dash => {
            let (size, spacing) = dash_pattern(dash, style.stroke_width);
            chart.draw_series(DashedLineSeries::new(
                points.iter().copied(),
                size,
                spacing,
                style,
            ))
        }
    }
    .map_err(engine_err)?;
    if let Some(label) = label {
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }
    Ok(())
}

/// Markers at `points`; labelled when the series has no line to carry the legend entry.
fn draw_markers<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    points: &[(f64, f64)],
    shape: MarkerShape,
    radius: i32,
    color: RGBAColor,
    label: Option<&str>,
) -> Result<()>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let fill = color.filled();
    let r = radius.max(1);
    let anno = match shape {
        MarkerShape::Point => {
            let r = (r / 3).max(1);
            chart.draw_series(points.iter().map(|p| Circle::new(*p, r, fill)))
        }
        MarkerShape::Circle => chart.draw_series(points.iter().map(|p| Circle::new(*p, r, fill))),
        MarkerShape::Square => chart.draw_series(
            points
                .iter()
                .map(|p| EmptyElement::at(*p) + Rectangle::new([(-r, -r), (r, r)], fill)),
        ),
        MarkerShape::Triangle => {
            chart.draw_series(points.iter().map(|p| TriangleMarker::new(*p, r, fill)))
        }
        MarkerShape::Diamond => chart.draw_series(points.iter().map(|p| {
            EmptyElement::at(*p) + Polygon::new(vec![(0, -r), (r, 0), (0, r), (-r, 0)], fill)
        })),
        MarkerShape::Cross => chart.draw_series(points.iter().map(|p| {
            EmptyElement::at(*p)
                + PathElement::new(vec![(-r, 0), (r, 0)], color.stroke_width(2))
                + PathElement::new(vec![(0, -r), (0, r)], color.stroke_width(2))
        })),
        MarkerShape::X => {
            chart.draw_series(points.iter().map(|p| Cross::new(*p, r, color.stroke_width(2))))
        }
    }
    .map_err(engine_err)?;
    if let Some(label) = label {
        anno.label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), r, fill));
    }
    Ok(())
}

fn draw_artist<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    artist: &Artist,
    (x0, x1): (f64, f64),
    (y0, y1): (f64, f64),
    scale: Scale,
) -> Result<()>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let color = rgba(artist.color, artist.alpha);
    let label = artist.label.as_deref();
    match &artist.kind {
        ArtistKind::Line {
            points,
            stroke,
            marker,
        } => {
            let style = color.stroke_width(scale.px(stroke.width));
            draw_path(chart, points, stroke.dash, style, label)?;
            if let Some((shape, size)) = marker {
                let radius = (scale.px(*size) / 2) as i32;
                let marker_label = label.filter(|_| stroke.dash == LineDash::Blank);
                draw_markers(chart, points, *shape, radius, color, marker_label)?;
            }
        }
        ArtistKind::Band { lower, upper } => {
            let mut poly: Vec<(f64, f64)> = Vec::with_capacity(lower.len() + upper.len());
            poly.extend(lower.iter().copied());
            poly.extend(upper.iter().rev().copied());
            let fill = color.filled();
            let anno = chart
                .draw_series(std::iter::once(Polygon::new(poly, fill)))
                .map_err(engine_err)?;
            if let Some(label) = label {
                anno.label(label).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill)
                });
            }
            chart
                .draw_series(std::iter::once(PathElement::new(
                    upper.clone(),
                    color.stroke_width(1),
                )))
                .map_err(engine_err)?;
        }
        ArtistKind::Bars { edges, heights } => {
            let fill = color.filled();
            let anno = chart
                .draw_series(
                    edges
                        .windows(2)
                        .zip(heights)
                        .map(|(w, h)| Rectangle::new([(w[0], 0.0), (w[1], *h)], fill)),
                )
                .map_err(engine_err)?;
            if let Some(label) = label {
                anno.label(label).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill)
                });
            }
        }
        ArtistKind::Rects { rects, colors } => {
            let alpha = artist.alpha;
            let anno = chart
                .draw_series(
                    rects
                        .iter()
                        .zip(colors)
                        .map(|(&(lo, hi), c)| Rectangle::new([lo, hi], rgba(*c, alpha).filled())),
                )
                .map_err(engine_err)?;
            if let Some(label) = label {
                let fill = color.filled();
                anno.label(label).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill)
                });
            }
        }
        ArtistKind::Image { grid, cmap, norm } => {
            let alpha = artist.alpha;
            let cells = grid.iter().enumerate().flat_map(|(row, values)| {
                values.iter().enumerate().filter_map(move |(col, v)| {
                    norm.fraction(*v).map(|t| (row as f64, col as f64, t))
                })
            });
            chart
                .draw_series(cells.map(|(row, col, t)| {
                    Rectangle::new(
                        [(col - 0.5, row - 0.5), (col + 0.5, row + 0.5)],
                        rgba(cmap.map(t), alpha).filled(),
                    )
                }))
                .map_err(engine_err)?;
        }
        ArtistKind::HLine { y, stroke } => {
            let style = color.stroke_width(scale.px(stroke.width));
            draw_path(chart, &[(x0, *y), (x1, *y)], stroke.dash, style, label)?;
        }
        ArtistKind::VLine { x, stroke } => {
            let style = color.stroke_width(scale.px(stroke.width));
            draw_path(chart, &[(*x, y0), (*x, y1)], stroke.dash, style, label)?;
        }
    }
    Ok(())
}
