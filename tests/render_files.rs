use std::fs;
use toolplot::engine::Figure;
use toolplot::export::{SaveOptions, save_figure};
use toolplot::style::ensure_font_registered;
use toolplot::{PlotData, Theme, plot_subplots};

const SPEC: &str = r#"{
    "plots": {
        "lines": {
            "x": [2019, 2020, 2021], "y": [1, 2, 3],
            "y_kwargs": {"label": "primary", "linestyle": "--", "marker": "o"},
            "ys": [{"y": [2, 2.5, 3.5], "y_kwargs": {"label": "second"}}],
            "hlines": [{"y": 2, "color": "gray"}],
            "xtick_format": {"number": {"decimals": 0}}
        },
        "stack": {
            "x": ["a", "b", "c"],
            "stacks": [[1, 2, 3], [1, 1, 1]],
            "stacks_kwargs": {"labels": ["low", "high"]},
            "name": "Stacked", "name_position": "ylabel"
        },
        "hist": {"hist": [1, 2, 2, 3, 3, 3], "tickgrid": true}
    },
    "common": {"tickgrid": true},
    "subplots": {"n_columns": 2},
    "title": "Overview"
}"#;

fn rendered() -> Option<Figure> {
    if !ensure_font_registered("sans-serif") {
        eprintln!("skipping: no font available");
        return None;
    }
    let data = PlotData::from_json_str(SPEC).unwrap();
    let mut figure = Figure::new(Theme::default());
    plot_subplots(&mut figure, &data).unwrap();
    Some(figure)
}

#[test]
fn svg_file_is_written() {
    let Some(figure) = rendered() else { return };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("overview.svg");
    figure.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("<svg"));
    assert!(text.contains("Overview"));
}

#[test]
fn named_figures_are_written_per_format_and_archived() {
    let Some(figure) = rendered() else { return };
    let dir = tempfile::tempdir().unwrap();
    let opts = SaveOptions {
        name: Some("overview".into()),
        figure_dir: Some(dir.path().join("figs")),
        formats: vec!["svg".into(), "png".into()],
        historical_dir: Some(dir.path().join("history")),
        ..Default::default()
    };
    let written = save_figure(&figure, &opts).unwrap();
    assert_eq!(written.len(), 4);
    assert!(dir.path().join("figs/svg/overview.svg").exists());
    assert!(dir.path().join("figs/png/overview.png").exists());
    for path in &written[2..] {
        let file = path.file_name().unwrap().to_string_lossy();
        assert!(file.ends_with("__overview.svg") || file.ends_with("__overview.png"));
        assert!(fs::metadata(path).unwrap().len() > 0);
    }
}

#[test]
fn missing_destination_is_an_error() {
    let Some(figure) = rendered() else { return };
    let err = save_figure(&figure, &SaveOptions::default()).unwrap_err();
    assert!(err.to_string().contains("must specify path or (name and figure dir)"));
}
