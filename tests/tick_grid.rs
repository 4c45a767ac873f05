use toolplot::engine::{Axes, Axis, DrawCall, Figure, Panel, RecordingAxes};
use toolplot::engine::{Canvas, FigureSpec, GridLayout, GridPosition};
use toolplot::options::{LineOptions, TickGridOptions, TickOverrides, XTickFormat, YTickFormat};
use toolplot::style::{Color, LineDash};
use toolplot::ticks::{LabelOptions, add_tick_grid, format_x_ticks, format_y_ticks, set_labels};

fn panel_with_data() -> Panel {
    let mut panel = Panel::new(GridPosition { row: 0, col: 0 }, 1.5);
    panel
        .plot(None, &[3.0, 7.5, -2.0, 11.0], &LineOptions::default())
        .unwrap();
    panel
}

#[test]
fn tick_grid_keeps_autoscaled_limits() {
    let mut panel = panel_with_data();
    let before = (panel.xlim(), panel.ylim());
    add_tick_grid(&mut panel, &TickGridOptions::default()).unwrap();
    assert_eq!((panel.xlim(), panel.ylim()), before);
}

#[test]
fn tick_grid_keeps_explicit_limits() {
    for (lo, hi) in [(0.0, 1.0), (-50.0, 3.0), (1e6, 1e9)] {
        let mut panel = panel_with_data();
        panel.set_xlim(lo, hi);
        panel.set_ylim(lo, hi);
        add_tick_grid(&mut panel, &TickGridOptions::default()).unwrap();
        assert_eq!(panel.xlim(), (lo, hi));
        assert_eq!(panel.ylim(), (lo, hi));
    }
}

#[test]
fn tick_grid_lines_use_faint_defaults() {
    let mut axes = RecordingAxes::new();
    add_tick_grid(&mut axes, &TickGridOptions::default()).unwrap();
    let grid: Vec<_> = axes
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::AxVLine(l) | DrawCall::AxHLine(l) => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(grid.len(), axes.ticks(Axis::X).len() + axes.ticks(Axis::Y).len());
    for line in grid {
        assert_eq!(line.alpha, Some(0.1));
        assert_eq!(line.color, Some(Color::BLACK));
        assert_eq!(line.linestyle, Some(LineDash::Dash));
        assert_eq!(line.linewidth, Some(1.0));
        assert_eq!(line.zorder, Some(-999.0));
    }
}

#[test]
fn tick_grid_can_skip_an_axis() {
    let mut axes = RecordingAxes::new();
    let opts = TickGridOptions {
        xtick_grid: Some(false),
        ..Default::default()
    };
    add_tick_grid(&mut axes, &opts).unwrap();
    assert!(!axes.calls.iter().any(|c| matches!(c, DrawCall::AxVLine(_))));
    assert!(axes.calls.iter().any(|c| matches!(c, DrawCall::AxHLine(_))));
}

#[test]
fn overrides_win_over_rotation() {
    let mut panel = panel_with_data();
    let opts = XTickFormat {
        rotation: Some(-25.0),
        overrides: Some(TickOverrides {
            rotation: Some(90.0),
            ticks: Some(vec![0.0, 1.5, 3.0]),
            labels: Some(vec!["start".into(), "mid".into(), "end".into()]),
            ..Default::default()
        }),
        ..Default::default()
    };
    format_x_ticks(&mut panel, &opts).unwrap();
    assert_eq!(panel.x_ticks.rotation, 90.0);
    assert_eq!(panel.ticks(Axis::X), vec![0.0, 1.5, 3.0]);
    assert_eq!(panel.tick_label(Axis::X, 1.5), "mid");
}

#[test]
fn override_labels_must_match_ticks() {
    let mut panel = panel_with_data();
    let opts = YTickFormat {
        overrides: Some(TickOverrides {
            ticks: Some(vec![0.0, 1.0]),
            labels: Some(vec!["only one".into()]),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(format_y_ticks(&mut panel, &opts).is_err());
}

#[test]
fn timestamps_shorthand_formats_dates() {
    let mut panel = panel_with_data();
    let opts: XTickFormat = serde_json::from_str(r#"{"timestamps": "date"}"#).unwrap();
    format_x_ticks(&mut panel, &opts).unwrap();
    assert_eq!(panel.tick_label(Axis::X, 86_400.0), "1970-01-02");
}

#[test]
fn set_labels_formats_and_grids() {
    let mut figure = Figure::default();
    figure
        .create_figure(&FigureSpec {
            size: (6.0, 4.0),
            layout: GridLayout::new(1, 1).unwrap(),
            options: Default::default(),
        })
        .unwrap();
    let panel = figure.select_panel(GridPosition { row: 0, col: 0 }).unwrap();
    panel.plot(None, &[0.1, 0.5], &LineOptions::default()).unwrap();
    set_labels(
        panel,
        &LabelOptions {
            title: Some("share".into()),
            y_percentage: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(panel.title.as_deref(), Some("share"));
    assert_eq!(panel.tick_label(Axis::Y, 0.25), "25%");
    assert!(panel.artists.iter().any(|a| a.zorder == -999.0));
}
