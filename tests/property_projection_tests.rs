use chart_motion::core::{
    CanvasGeometry, Series, TransitionState, project_curve_points, project_histogram_bars,
    project_volume_bars,
};
use proptest::prelude::*;

fn state_strategy() -> impl Strategy<Value = TransitionState> {
    proptest::collection::btree_map(-50_000i64..50_000, -500.0f64..500.0, 1..40).prop_map(|map| {
        let series = Series::from_pairs(map);
        let start = series.first().map(|(key, _)| key).unwrap_or_default();
        let end = series.last().map(|(key, _)| key).unwrap_or_default();
        let min = series.min_value().unwrap_or_default();
        let max = series.max_value().unwrap_or_default();
        TransitionState::new(series, start, end, min, max)
    })
}

fn geometry_strategy() -> impl Strategy<Value = CanvasGeometry> {
    (100.0f64..2000.0, 100.0f64..1200.0, 0.0f64..20.0, 0.0f64..20.0).prop_map(
        |(width, height, horizontal, vertical)| {
            CanvasGeometry::new(width, height).with_offsets(horizontal, vertical, vertical)
        },
    )
}

proptest! {
    #[test]
    fn curve_points_are_finite_and_ordered(
        state in state_strategy(),
        geometry in geometry_strategy(),
    ) {
        let points = project_curve_points(&state, geometry).expect("projection");
        prop_assert_eq!(points.len(), state.values().len());

        for point in &points {
            prop_assert!(point.x.is_finite());
            prop_assert!(point.y.is_finite());
        }
        for pair in points.windows(2) {
            prop_assert!(pair[0].x <= pair[1].x);
        }
    }

    #[test]
    fn curve_round_trip_stays_within_relative_tolerance(
        state in state_strategy(),
        geometry in geometry_strategy(),
    ) {
        let points = project_curve_points(&state, geometry).expect("projection");

        let x_ratio = (state.end_key() - state.start_key()) as f64 / geometry.plot_width();
        let y_ratio = (state.max_value() - state.min_value()) / geometry.plot_height();

        for (mapped, (key, value)) in points.iter().zip(state.values().iter()) {
            let recovered_key =
                (mapped.x - geometry.horizontal_offset) * x_ratio + state.start_key() as f64;
            let y_raw = geometry.height - mapped.y;
            let recovered_value =
                (y_raw - geometry.bottom_offset - geometry.extra_vertical_offset) * y_ratio
                    + state.min_value();

            let key_scale = (key as f64).abs().max(1.0);
            prop_assert!((recovered_key - key as f64).abs() <= key_scale * 1e-4);
            let value_scale = value.abs().max(1.0);
            prop_assert!((recovered_value - value).abs() <= value_scale * 1e-4);
        }
    }

    #[test]
    fn histogram_bars_straddle_the_baseline(
        state in state_strategy(),
        geometry in geometry_strategy(),
        max_bar_width in 1.0f64..32.0,
    ) {
        let bars = project_histogram_bars(&state, geometry, max_bar_width).expect("bars");
        let baseline = geometry.height / 2.0;

        for bar in &bars {
            prop_assert!(bar.y_top <= bar.y_bottom);
            prop_assert!(bar.y_top <= baseline + 1e-9);
            prop_assert!(bar.y_bottom >= baseline - 1e-9);
            prop_assert!(bar.x_left < bar.x_right);
            prop_assert!(bar.x_right - bar.x_left <= max_bar_width + 1e-9);
        }
    }

    #[test]
    fn volume_bars_never_leave_the_canvas_bottom(
        state in state_strategy(),
        geometry in geometry_strategy(),
        height_fraction in 0.05f64..1.0,
    ) {
        prop_assume!(state.max_value() > 0.0);

        let bars = project_volume_bars(&state, geometry, height_fraction, 8.0).expect("bars");
        for bar in &bars {
            prop_assert!((bar.y_bottom - geometry.height).abs() <= 1e-9);
            prop_assert!(bar.y_top <= bar.y_bottom + 1e-9);
            prop_assert!(bar.y_top >= geometry.height * (1.0 - height_fraction) - 1e-9);
        }
    }
}
