use approx::assert_relative_eq;
use chart_motion::MotionError;
use chart_motion::core::{
    BarDirection, CanvasGeometry, Series, TransitionState, project_curve_points,
    project_histogram_bars, project_volume_bars, range_band,
};

fn state(values: &[(i64, f64)], start: i64, end: i64, min: f64, max: f64) -> TransitionState {
    TransitionState::new(Series::from_pairs(values.iter().copied()), start, end, min, max)
}

#[test]
fn known_point_maps_to_expected_pixel() {
    let state = state(&[(0, 0.0), (50, 5.0), (100, 10.0)], 0, 100, 0.0, 10.0);
    let geometry = CanvasGeometry::new(300.0, 100.0);

    let points = project_curve_points(&state, geometry).expect("projection");
    assert_eq!(points.len(), 3);
    assert!((points[1].x - 150.0).abs() <= 1e-9);
    assert!((points[1].y - 50.0).abs() <= 1e-9);
}

#[test]
fn offsets_shift_the_plot_area() {
    let state = state(&[(0, 0.0), (100, 10.0)], 0, 100, 0.0, 10.0);
    let geometry = CanvasGeometry::new(320.0, 140.0)
        .with_offsets(10.0, 15.0, 25.0)
        .with_extra_vertical_offset(5.0);

    let points = project_curve_points(&state, geometry).expect("projection");
    // First point sits at the left plot edge, bottom of the curve area.
    assert!((points[0].x - 10.0).abs() <= 1e-9);
    assert!((points[0].y - (140.0 - 25.0 - 5.0)).abs() <= 1e-9);
    // Last point sits at the right plot edge, top of the curve area.
    assert!((points[1].x - 310.0).abs() <= 1e-9);
    assert!((points[1].y - (15.0 + 5.0)).abs() <= 1e-9);
}

#[test]
fn pixel_round_trip_recovers_domain_coordinates() {
    let state = state(
        &[(1_650_000_000, 102.5), (1_650_043_200, 98.75), (1_650_086_400, 110.0)],
        1_650_000_000,
        1_650_086_400,
        98.75,
        110.0,
    );
    let geometry = CanvasGeometry::new(1080.0, 400.0)
        .with_offsets(12.0, 8.0, 16.0)
        .with_extra_vertical_offset(4.0);

    let points = project_curve_points(&state, geometry).expect("projection");

    let x_ratio = (state.end_key() - state.start_key()) as f64 / geometry.plot_width();
    let y_ratio = (state.max_value() - state.min_value()) / geometry.plot_height();

    for (mapped, (key, value)) in points.iter().zip(state.values().iter()) {
        let recovered_key =
            (mapped.x - geometry.horizontal_offset) * x_ratio + state.start_key() as f64;
        let y_raw = geometry.height - mapped.y;
        let recovered_value = (y_raw - geometry.bottom_offset - geometry.extra_vertical_offset)
            * y_ratio
            + state.min_value();

        assert_relative_eq!(recovered_key, key as f64, max_relative = 1e-4);
        assert_relative_eq!(recovered_value, value, max_relative = 1e-4);
    }
}

#[test]
fn output_preserves_ascending_key_order() {
    let state = state(
        &[(0, 1.0), (7, 3.0), (13, 2.0), (40, 9.0), (41, 8.5)],
        0,
        41,
        1.0,
        9.0,
    );
    let geometry = CanvasGeometry::new(500.0, 200.0);

    let points = project_curve_points(&state, geometry).expect("projection");
    for pair in points.windows(2) {
        assert!(pair[0].x < pair[1].x);
    }
}

#[test]
fn degenerate_geometry_is_rejected() {
    let state = state(&[(0, 0.0), (100, 10.0)], 0, 100, 0.0, 10.0);

    let zero_canvas = CanvasGeometry::new(0.0, 0.0);
    assert!(matches!(
        project_curve_points(&state, zero_canvas),
        Err(MotionError::InvalidGeometry { .. })
    ));

    // Offsets that swallow the whole plot area are just as invalid.
    let swallowed = CanvasGeometry::new(100.0, 100.0).with_offsets(50.0, 0.0, 0.0);
    assert!(matches!(
        project_curve_points(&state, swallowed),
        Err(MotionError::InvalidGeometry { .. })
    ));
}

#[test]
fn histogram_bars_anchor_on_mid_height_baseline() {
    let state = state(&[(0, -4.0), (50, 4.0), (100, 0.0)], 0, 100, -4.0, 4.0);
    let geometry = CanvasGeometry::new(300.0, 100.0);

    let bars = project_histogram_bars(&state, geometry, 8.0).expect("bars");
    assert_eq!(bars.len(), 3);

    // Negative value renders below the baseline, positive above.
    assert_eq!(bars[0].direction, BarDirection::Below);
    assert_eq!(bars[1].direction, BarDirection::Above);
    assert_eq!(bars[2].direction, BarDirection::Above);

    for bar in &bars {
        assert!(bar.y_top <= 50.0 + 1e-9);
        assert!(bar.y_bottom >= 50.0 - 1e-9);
        assert!((bar.y_top - 50.0).abs() <= 1e-9 || (bar.y_bottom - 50.0).abs() <= 1e-9);
    }
}

#[test]
fn bar_width_is_minimum_gap_shared_by_all_bars() {
    // Key gaps 10 and 40 over a 100-wide key span on a 200px canvas:
    // min pixel gap is 20, under the 32px clamp.
    let state = state(&[(0, 1.0), (10, 2.0), (50, 3.0)], 0, 100, 0.0, 4.0);
    let geometry = CanvasGeometry::new(200.0, 100.0);

    let bars = project_histogram_bars(&state, geometry, 32.0).expect("bars");
    for bar in &bars {
        assert!((bar.x_right - bar.x_left - 20.0).abs() <= 1e-9);
    }
}

#[test]
fn bar_width_is_clamped_to_configured_maximum() {
    let state = state(&[(0, 1.0), (100, 2.0)], 0, 100, 0.0, 4.0);
    let geometry = CanvasGeometry::new(400.0, 100.0);

    let bars = project_histogram_bars(&state, geometry, 6.0).expect("bars");
    for bar in &bars {
        assert!((bar.x_right - bar.x_left - 6.0).abs() <= 1e-9);
    }
}

#[test]
fn single_bar_uses_the_maximum_width() {
    let state = state(&[(50, 2.0)], 0, 100, 0.0, 4.0);
    let geometry = CanvasGeometry::new(400.0, 100.0);

    let bars = project_histogram_bars(&state, geometry, 6.0).expect("bars");
    assert_eq!(bars.len(), 1);
    assert!((bars[0].x_right - bars[0].x_left - 6.0).abs() <= 1e-9);
}

#[test]
fn invalid_bar_width_is_rejected() {
    let state = state(&[(0, 1.0), (100, 2.0)], 0, 100, 0.0, 4.0);
    let geometry = CanvasGeometry::new(400.0, 100.0);

    assert!(project_histogram_bars(&state, geometry, 0.0).is_err());
    assert!(project_histogram_bars(&state, geometry, f64::NAN).is_err());
}

#[test]
fn volume_bars_rise_from_the_canvas_bottom() {
    let state = state(&[(0, 10.0), (50, 40.0), (100, 20.0)], 0, 100, 10.0, 40.0);
    let geometry = CanvasGeometry::new(300.0, 200.0);

    let bars = project_volume_bars(&state, geometry, 0.4, 8.0).expect("bars");
    for bar in &bars {
        assert!((bar.y_bottom - 200.0).abs() <= 1e-9);
        assert!(bar.y_top <= bar.y_bottom);
    }

    // The frame maximum occupies 40% of the canvas height.
    assert!((bars[1].y_top - (200.0 - 0.4 * 200.0)).abs() <= 1e-9);
    // Other bars scale against that maximum, not the full height.
    assert!((bars[0].y_top - (200.0 - 0.25 * 0.4 * 200.0)).abs() <= 1e-9);
}

#[test]
fn volume_height_fraction_is_validated() {
    let state = state(&[(0, 10.0), (100, 20.0)], 0, 100, 10.0, 20.0);
    let geometry = CanvasGeometry::new(300.0, 200.0);

    assert!(project_volume_bars(&state, geometry, 0.0, 8.0).is_err());
    assert!(project_volume_bars(&state, geometry, 1.5, 8.0).is_err());
}

#[test]
fn range_band_derives_from_offsets_and_labels_extrema() {
    let state = state(&[(0, 2.0), (100, 8.0)], 0, 100, 2.0, 8.0);
    let geometry = CanvasGeometry::new(300.0, 200.0).with_offsets(0.0, 20.0, 30.0);

    let band = range_band(&state, geometry, 5.0).expect("band");
    assert!((band.top_y - 25.0).abs() <= 1e-9);
    assert!((band.bottom_y - 165.0).abs() <= 1e-9);
    assert_eq!(band.max_label, 8.0);
    assert_eq!(band.min_label, 2.0);
}

#[test]
fn range_band_rejects_margin_without_vertical_room() {
    let state = state(&[(0, 2.0), (100, 8.0)], 0, 100, 2.0, 8.0);
    let geometry = CanvasGeometry::new(300.0, 100.0);

    assert!(range_band(&state, geometry, 60.0).is_err());
}
