use toolplot::engine::{Axis, DrawCall, HAlign, RecordingAxes};
use toolplot::options::{LineOptions, TickFn, XTickFormat};
use toolplot::ticks::TickLabeler;
use toolplot::{PlotDatum, PlotError, plot};

fn render(json: &str) -> RecordingAxes {
    let datum = PlotDatum::from_json_str(json).expect("valid datum");
    let mut axes = RecordingAxes::new();
    plot(&mut axes, &datum).expect("renders");
    axes
}

#[test]
fn only_y_draws_one_line_with_implicit_x() {
    let axes = render(r#"{"y": [1, 2, 3]}"#);
    assert_eq!(
        axes.calls,
        vec![DrawCall::Plot {
            x: None,
            y: vec![1.0, 2.0, 3.0],
            opts: LineOptions::default(),
        }]
    );
}

#[test]
fn secondary_series_resolve_their_x() {
    let axes = render(
        r#"{"x": [10, 20], "ys": [
            {"y": [1, 2]},
            {"x": [5, 6], "y": [3, 4]}
        ]}"#,
    );
    let xs: Vec<Option<Vec<f64>>> = axes
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Plot { x, .. } => Some(x.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(xs, vec![Some(vec![10.0, 20.0]), Some(vec![5.0, 6.0])]);
}

#[test]
fn name_as_ylabel_moves_ticks_right() {
    let axes = render(r#"{"y": [1], "name": "rate", "name_position": "ylabel"}"#);
    assert!(axes.calls.contains(&DrawCall::YLabel("rate".into())));
    assert!(axes.calls.contains(&DrawCall::YTicksRight));
    assert!(!axes.calls.iter().any(|c| matches!(c, DrawCall::Title(_))));
}

#[test]
fn name_as_title_and_explicit_title_both_fire() {
    let axes = render(r#"{"y": [1], "name": "n", "name_position": "title", "title": "t"}"#);
    let titles = axes.calls_where(|c| matches!(c, DrawCall::Title(_)));
    assert_eq!(
        titles,
        [&DrawCall::Title("n".into()), &DrawCall::Title("t".into())]
    );
}

#[test]
fn unknown_name_position_is_rejected_with_the_value() {
    let err = PlotDatum::from_json_str(r#"{"name": "n", "name_position": "legend"}"#)
        .unwrap_err();
    match err {
        PlotError::Json(e) => assert!(e.to_string().contains("unknown position for name: legend")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn legend_follows_labels_and_kwargs() {
    let cases = [
        (r#"{"y": [1]}"#, false),
        (r#"{"y": [1], "legend_kwargs": {}}"#, true),
        (r#"{"ys": [{"y": [1], "y_kwargs": {"label": "a"}}]}"#, true),
        (r#"{"ys": [{"y": [1]}]}"#, false),
        (r#"{"stacks": [[1, 2]], "stacks_kwargs": {"labels": ["a"]}}"#, true),
        (r#"{"stacks": [[1, 2]]}"#, false),
        (r#"{"hist": [1, 2], "hist_kwargs": {"label": "h"}}"#, true),
        (r#"{"hist": [1, 2]}"#, false),
    ];
    for (json, expected) in cases {
        assert_eq!(render(json).legend_requested(), expected, "{json}");
    }
}

#[test]
fn steps_run_in_fixed_order() {
    let axes = render(
        r#"{
            "y": [1, 2], "stacks": [[1, 1]], "hist": [1],
            "hlines": [{"y": 1}], "vlines": [{"x": 0.5, "color": "red"}],
            "name": "n", "name_position": "title",
            "xtick_format": {}, "title": "t", "legend_kwargs": {},
            "xlim": [0, 2], "ylim": [0, 3], "tickgrid": true,
            "xlabel": "x", "ylabel": "y"
        }"#,
    );
    let kind = |c: &DrawCall| match c {
        DrawCall::Plot { .. } => "plot",
        DrawCall::Stackplot { .. } => "stack",
        DrawCall::Hist { .. } => "hist",
        DrawCall::AxHLine(l) if l.zorder == Some(-999.0) => "grid",
        DrawCall::AxVLine(l) if l.zorder == Some(-999.0) => "grid",
        DrawCall::AxHLine(_) => "hline",
        DrawCall::AxVLine(_) => "vline",
        DrawCall::Title(_) => "title",
        DrawCall::TickLabeler(..) | DrawCall::TickRotation(..) => "ticks",
        DrawCall::Legend(_) => "legend",
        DrawCall::XLim(..) | DrawCall::YLim(..) => "lim",
        DrawCall::XLabel(_) => "xlabel",
        DrawCall::YLabel(_) => "ylabel",
        _ => "other",
    };
    let mut seq: Vec<&str> = axes.calls.iter().map(kind).collect();
    seq.dedup();
    assert_eq!(
        seq,
        [
            "plot", "stack", "hist", "hline", "vline", "title", "ticks", "title", "legend",
            "lim", "grid", "lim", "xlabel", "ylabel"
        ]
    );
}

#[test]
fn vlines_use_their_own_options() {
    let axes = render(r#"{"hlines": [{"y": 1, "color": "black"}], "vlines": [{"x": 2}]}"#);
    match axes.calls.last() {
        Some(DrawCall::AxVLine(line)) => {
            assert_eq!(line.x, Some(2.0));
            assert_eq!(line.color, None);
        }
        other => panic!("expected a vertical line, got {other:?}"),
    }
}

#[test]
fn categorical_x_pins_category_ticks() {
    let axes = render(r#"{"x": ["a", "b"], "y": [1, 2]}"#);
    assert!(axes.calls.contains(&DrawCall::Plot {
        x: Some(vec![0.0, 1.0]),
        y: vec![1.0, 2.0],
        opts: LineOptions::default(),
    }));
    assert!(
        axes.calls
            .contains(&DrawCall::Categories(vec!["a".into(), "b".into()]))
    );
}

#[test]
fn mismatched_lengths_surface_the_engine_error() {
    let datum = PlotDatum::from_json_str(r#"{"x": [1, 2, 3], "y": [1, 2]}"#).unwrap();
    let mut axes = RecordingAxes::new();
    let err = plot(&mut axes, &datum).unwrap_err();
    assert!(matches!(err, PlotError::Engine(_)));
}

#[test]
fn custom_formatter_beats_tick_map() {
    let f = TickFn::new(|v| format!("<{v}>"));
    let datum = PlotDatum {
        y: Some(vec![1.0]),
        xtick_format: Some(XTickFormat {
            formatter: Some(f.clone()),
            tickmap: Some(toolplot::options::TickLabelMap::new([(0.0, "zero")])),
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut axes = RecordingAxes::new();
    plot(&mut axes, &datum).unwrap();
    assert!(axes.calls.contains(&DrawCall::TickLabeler(Axis::X, TickLabeler::Custom(f))));
    assert!(
        axes.calls
            .contains(&DrawCall::TickRotation(Axis::X, -25.0, HAlign::Left))
    );
}

#[test]
fn secondary_series_without_any_x_use_the_implicit_index() {
    let axes = render(r#"{"ys": [{"y": [4, 5, 6]}]}"#);
    assert_eq!(
        axes.calls,
        vec![DrawCall::Plot {
            x: None,
            y: vec![4.0, 5.0, 6.0],
            opts: LineOptions::default(),
        }]
    );
}

#[test]
fn categorical_x_on_a_secondary_series_labels_the_axis() {
    let axes = render(r#"{"ys": [{"y": [1]}, {"x": ["q1", "q2"], "y": [3, 4]}]}"#);
    assert!(axes.calls.contains(&DrawCall::Plot {
        x: Some(vec![0.0, 1.0]),
        y: vec![3.0, 4.0],
        opts: LineOptions::default(),
    }));
    assert!(
        axes.calls
            .contains(&DrawCall::Categories(vec!["q1".into(), "q2".into()]))
    );
}

#[test]
fn shared_categories_win_over_series_categories() {
    let axes = render(r#"{"x": ["a", "b"], "ys": [{"x": ["c", "d"], "y": [1, 2]}]}"#);
    let categories = axes.calls_where(|c| matches!(c, DrawCall::Categories(_)));
    assert_eq!(
        categories,
        [&DrawCall::Categories(vec!["a".into(), "b".into()])]
    );
}
