use toolplot::engine::figure::ArtistKind;
use toolplot::engine::{Figure, GridPosition};
use toolplot::histogram::{BinSpec2d, LogAxes, create_2d_bins, histogram_2d};
use toolplot::{PlotData, PlotError, plot_subplots};

fn bars_of(json: &str) -> (Vec<f64>, Vec<f64>) {
    let data = PlotData::from_json_str(json).unwrap();
    let mut figure = Figure::default();
    plot_subplots(&mut figure, &data).unwrap();
    let panel = figure.panel(GridPosition { row: 0, col: 0 }).unwrap();
    panel
        .artists
        .iter()
        .find_map(|a| match &a.kind {
            ArtistKind::Bars { edges, heights } => Some((edges.clone(), heights.clone())),
            _ => None,
        })
        .expect("histogram bars")
}

#[test]
fn panel_histogram_uses_requested_bins() {
    let (edges, heights) =
        bars_of(r#"{"plots": {"h": {"hist": [0, 1, 1, 2, 3, 4], "hist_kwargs": {"bins": 4}}}}"#);
    assert_eq!(edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(heights, vec![1.0, 2.0, 1.0, 2.0]);
}

#[test]
fn merged_hist_kwargs_reach_the_panel() {
    let (edges, _) = bars_of(
        r#"{"plots": {"h": {"hist": [1, 2, 3]}},
            "common": {"merge": {"hist_kwargs": {"bins": [0, 2, 4]}}}}"#,
    );
    assert_eq!(edges, vec![0.0, 2.0, 4.0]);
}

#[test]
fn log_histogram_edges_are_geometric() {
    let (edges, heights) = bars_of(
        r#"{"plots": {"h": {"hist": [1, 10, 100, 1000], "hist_kwargs": {"bins": 3, "log_bins": true}}}}"#,
    );
    assert_eq!(edges.len(), 4);
    for (got, want) in edges.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
        assert!((got - want).abs() / want < 1e-9, "{got} vs {want}");
    }
    assert_eq!(heights.iter().sum::<f64>(), 4.0);
}

#[test]
fn two_dimensional_counts_land_in_their_cells() {
    let x = [0.5, 1.5, 1.5, 0.5];
    let y = [0.5, 0.5, 1.5, 1.5];
    let h = histogram_2d(
        &x,
        &y,
        &BinSpec2d::Edges([vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]]),
        &LogAxes::default(),
    )
    .unwrap();
    assert_eq!(h.counts, vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
}

#[test]
fn two_dimensional_bin_specs() {
    let x = [1.0, 10.0, 100.0];
    let y = [0.0, 5.0, 10.0];
    let log = LogAxes {
        log_x: true,
        ..Default::default()
    };
    let (xe, ye) = create_2d_bins(&x, &y, &BinSpec2d::Pair([3, 3]), &log).unwrap();
    assert_eq!(xe.len(), 3);
    assert!((xe[1] - 10.0).abs() < 1e-9);
    assert_eq!(ye, vec![0.0, 5.0, 10.0]);

    let err = create_2d_bins(&x, &y, &BinSpec2d::Edges([vec![], vec![]]), &log).unwrap_err();
    assert!(matches!(err, PlotError::InvalidBins(_)));
}
