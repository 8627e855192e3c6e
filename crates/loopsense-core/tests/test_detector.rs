mod common;

use approx::assert_abs_diff_eq;

use common::circle_blobs;
use loopsense_core::config::DetectorConfig;
use loopsense_core::detection::Blob;
use loopsense_core::fit::check_circle;
use loopsense_core::frame::{LumaFrame, Point2};
use loopsense_core::gesture::{CircleGestureDetector, FitStatus, FrameReport, Observation};
use loopsense_core::synth::{render_trace, TraceParams};

const SHORT_SIDE: usize = 60;

fn detector() -> CircleGestureDetector {
    CircleGestureDetector::new(DetectorConfig::default()).unwrap()
}

fn feed(detector: &mut CircleGestureDetector, blobs: &[Blob], short_side: usize) -> Vec<FrameReport> {
    blobs
        .iter()
        .map(|b| detector.observe(Some(*b), short_side))
        .collect()
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn test_circle_confirmed_once_history_is_sufficient() {
    let blobs = circle_blobs(0.5, 0.5, 0.25, 18.0, 20, SHORT_SIDE);
    let mut det = detector();
    let reports = feed(&mut det, &blobs, SHORT_SIDE);

    for (i, report) in reports.iter().enumerate().take(15) {
        assert!(!report.detected, "frame {i} detected too early");
        assert!(matches!(report.fit, FitStatus::InsufficientHistory { .. }));
    }
    // 16 points span 15 * 18 = 270 degrees.
    assert!(reports[15].detected);
    assert!(reports[15..].iter().all(|r| r.detected));

    let diag = det.diagnostics();
    assert_abs_diff_eq!(diag.radius, 0.25, epsilon = 1e-6);
    assert!(diag.residual_ratio < 0.05);
    assert_abs_diff_eq!(diag.center.x, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(diag.center.y, 0.5, epsilon = 1e-6);
    assert_eq!(diag.path_len, 20);
}

#[test]
fn test_rendered_trace_is_detected() {
    let params = TraceParams::default();
    let frames = render_trace(&params);
    let mut det = detector();

    let mut first_detection = None;
    for (i, data) in frames.iter().enumerate() {
        let frame = LumaFrame::packed(data, params.width, params.height);
        let report = det.process(&frame);
        if i == 0 {
            assert_eq!(report.observation, Observation::NoReference);
        }
        if report.detected && first_detection.is_none() {
            first_detection = Some(i);
            let diag = det.diagnostics();
            assert_abs_diff_eq!(diag.radius, 0.25, epsilon = 0.02);
            assert!(diag.residual_ratio < 0.05, "residual {}", diag.residual_ratio);
            // 320x240 downsampled to 80x60: center (40, 30) / 60.
            assert_abs_diff_eq!(diag.center.x, 40.0 / 60.0, epsilon = 0.01);
            assert_abs_diff_eq!(diag.center.y, 0.5, epsilon = 0.01);
            assert!(diag.arc_degrees >= 260.0);
        }
    }

    // Frame 0 has no reference, frames 1..=16 give the 16 points needed.
    assert_eq!(first_detection, Some(16));
}

#[test]
fn test_clockwise_trace_is_detected() {
    let params = TraceParams {
        step_deg: -18.0,
        ..TraceParams::default()
    };
    let mut det = detector();
    let detected = render_trace(&params)
        .iter()
        .map(|data| det.process_frame(&LumaFrame::packed(data, params.width, params.height)))
        .any(|d| d);
    assert!(detected);
}

#[test]
fn test_static_scene_never_detects() {
    let data = vec![120u8; 320 * 240];
    let mut det = detector();
    for _ in 0..50 {
        assert!(!det.process_frame(&LumaFrame::packed(&data, 320, 240)));
    }
    assert_eq!(det.path_len(), 0);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn test_reset_matches_fresh_detector() {
    let params = TraceParams::default();
    let frames = render_trace(&params);

    let run = |det: &mut CircleGestureDetector| {
        frames
            .iter()
            .map(|data| {
                let report = det.process(&LumaFrame::packed(data, params.width, params.height));
                (report, *det.diagnostics())
            })
            .collect::<Vec<_>>()
    };

    let mut fresh = detector();
    let expected = run(&mut fresh);

    let mut reused = detector();
    let other = TraceParams {
        center: (0.4, 0.6),
        step_deg: 25.0,
        ..TraceParams::default()
    };
    for data in render_trace(&other) {
        reused.process(&LumaFrame::packed(&data, other.width, other.height));
    }
    reused.reset();
    assert_eq!(reused.path_len(), 0);
    assert_eq!(reused.miss_count(), 0);

    assert_eq!(run(&mut reused), expected);
}

// ---------------------------------------------------------------------------
// Path bounds and decay
// ---------------------------------------------------------------------------

#[test]
fn test_path_never_exceeds_capacity() {
    let config = DetectorConfig::default();
    let capacity = config.path_buffer_size;
    let mut det = CircleGestureDetector::new(config).unwrap();

    for (i, blob) in circle_blobs(0.5, 0.5, 0.25, 12.0, 300, SHORT_SIDE)
        .into_iter()
        .enumerate()
    {
        det.observe(Some(blob), SHORT_SIDE);
        if i % 7 == 0 {
            det.observe(None, SHORT_SIDE);
        }
        assert!(det.path_len() <= capacity);
    }
    assert_eq!(det.path_len(), capacity);
}

#[test]
fn test_misses_below_limit_preserve_path() {
    let config = DetectorConfig::default();
    let max_miss = config.max_miss_frames as usize;
    let mut det = CircleGestureDetector::new(config).unwrap();

    let blobs = circle_blobs(0.5, 0.5, 0.25, 18.0, 6, SHORT_SIDE);
    feed(&mut det, &blobs[..5], SHORT_SIDE);
    let before: Vec<Point2> = det.path().copied().collect();

    for _ in 0..max_miss - 1 {
        let report = det.observe(None, SHORT_SIDE);
        assert!(!report.path_cleared);
    }
    det.observe(Some(blobs[5]), SHORT_SIDE);

    let after: Vec<Point2> = det.path().copied().collect();
    assert_eq!(after.len(), 6);
    assert_eq!(&after[..5], &before[..]);
    assert_eq!(det.miss_count(), 0);
}

#[test]
fn test_miss_limit_clears_path() {
    let config = DetectorConfig::default();
    let max_miss = config.max_miss_frames as usize;
    let mut det = CircleGestureDetector::new(config).unwrap();

    feed(&mut det, &circle_blobs(0.5, 0.5, 0.25, 18.0, 5, SHORT_SIDE), SHORT_SIDE);

    let reports: Vec<FrameReport> = (0..max_miss).map(|_| det.observe(None, SHORT_SIDE)).collect();
    assert!(reports[..max_miss - 1].iter().all(|r| !r.path_cleared));
    assert!(reports[max_miss - 1].path_cleared);
    assert_eq!(det.path_len(), 0);
    assert_eq!(det.miss_count(), 0);
}

// ---------------------------------------------------------------------------
// Jump filter
// ---------------------------------------------------------------------------

#[test]
fn test_outlier_does_not_change_fit() {
    let blobs = circle_blobs(0.5, 0.5, 0.25, 18.0, 20, SHORT_SIDE);

    let mut clean = detector();
    feed(&mut clean, &blobs, SHORT_SIDE);

    let mut noisy = detector();
    feed(&mut noisy, &blobs[..10], SHORT_SIDE);
    let misses_before = noisy.miss_count();
    let outlier = Blob {
        pixel_count: 80,
        cx: 0.95 * SHORT_SIDE as f64,
        cy: 0.05 * SHORT_SIDE as f64,
    };
    let report = noisy.observe(Some(outlier), SHORT_SIDE);
    assert_eq!(report.observation, Observation::TrackingGlitch(outlier));
    assert_eq!(noisy.miss_count(), misses_before);
    assert_eq!(noisy.path_len(), 10);
    feed(&mut noisy, &blobs[10..], SHORT_SIDE);

    let a = clean.diagnostics();
    let b = noisy.diagnostics();
    assert_abs_diff_eq!(a.center.x, b.center.x, epsilon = 1e-12);
    assert_abs_diff_eq!(a.center.y, b.center.y, epsilon = 1e-12);
    assert_abs_diff_eq!(a.radius, b.radius, epsilon = 1e-12);
    assert_abs_diff_eq!(a.arc_degrees, b.arc_degrees, epsilon = 1e-9);
    assert_abs_diff_eq!(a.residual_ratio, b.residual_ratio, epsilon = 1e-12);
}

#[test]
fn test_glitch_updates_live_point() {
    let mut det = detector();
    det.observe(Some(Blob { pixel_count: 30, cx: 10.0, cy: 10.0 }), SHORT_SIDE);
    det.observe(Some(Blob { pixel_count: 30, cx: 50.0, cy: 50.0 }), SHORT_SIDE);
    assert_eq!(det.path_len(), 1);
    assert_eq!(det.diagnostics().current_point, Some(Point2::new(50.0, 50.0)));

    det.observe(None, SHORT_SIDE);
    assert_eq!(det.diagnostics().current_point, None);
}

// ---------------------------------------------------------------------------
// Fit accuracy and ordering
// ---------------------------------------------------------------------------

#[test]
fn test_recovers_known_circle() {
    let short = 100;
    let blobs = circle_blobs(0.6, 0.45, 0.2, 18.0, 20, short);
    let mut det = detector();
    let reports = feed(&mut det, &blobs, short);

    assert!(reports.last().unwrap().detected);
    let diag = det.diagnostics();
    assert_abs_diff_eq!(diag.center.x, 0.6, epsilon = 1e-4);
    assert_abs_diff_eq!(diag.center.y, 0.45, epsilon = 1e-4);
    assert_abs_diff_eq!(diag.radius, 0.2, epsilon = 1e-4);
    assert!(diag.residual_ratio < 1e-6);
    assert!(diag.arc_degrees >= 300.0);
}

fn ring_points(n: usize) -> Vec<Point2> {
    (0..n)
        .map(|i| {
            let t = (i as f64 * 18.0).to_radians();
            Point2::new(0.5 + 0.25 * t.cos(), 0.5 + 0.25 * t.sin())
        })
        .collect()
}

#[test]
fn test_shuffled_order_fails_sweep_only() {
    let ring = ring_points(20);
    let order = [19, 4, 13, 18, 5, 1, 11, 10, 6, 7, 3, 16, 15, 9, 17, 2, 0, 12, 8, 14];
    let shuffled: Vec<Point2> = order.iter().map(|&i| ring[i]).collect();

    let check = check_circle(&shuffled, &DetectorConfig::default()).unwrap();
    assert!(check.radius_ok);
    assert!(check.residual_ok);
    assert!(!check.arc_ok);
    assert!(check.arc_degrees < 180.0, "sweep {}", check.arc_degrees);
}

#[test]
fn test_back_and_forth_scribble_fails_sweep() {
    let ring = ring_points(20);
    let scribble: Vec<Point2> = ring.iter().chain(ring.iter().rev()).copied().collect();

    let check = check_circle(&scribble, &DetectorConfig::default()).unwrap();
    assert!(check.radius_ok && check.residual_ok);
    assert!(check.arc_degrees < 1e-6);
    assert!(!check.is_circle());
}

#[test]
fn test_collinear_path_is_degenerate() {
    let mut det = detector();
    let blobs: Vec<Blob> = (0..20)
        .map(|i| Blob {
            pixel_count: 30,
            cx: 10.0 + i as f64,
            cy: 30.0,
        })
        .collect();
    let reports = feed(&mut det, &blobs, SHORT_SIDE);
    assert_eq!(reports.last().unwrap().fit, FitStatus::Degenerate);
    assert!(!reports.last().unwrap().detected);
}

#[test]
fn test_diagnostics_survive_path_clearing() {
    let mut det = detector();
    feed(&mut det, &circle_blobs(0.5, 0.5, 0.25, 18.0, 18, SHORT_SIDE), SHORT_SIDE);
    let fitted = *det.diagnostics();
    assert!(fitted.radius > 0.0);

    // Drop below the fit threshold by clearing, then check diagnostics stay.
    for _ in 0..DetectorConfig::default().max_miss_frames {
        det.observe(None, SHORT_SIDE);
    }
    let after = det.diagnostics();
    assert_eq!(after.path_len, 0);
    assert_eq!(after.center, fitted.center);
    assert_eq!(after.radius, fitted.radius);
    assert_eq!(after.arc_degrees, fitted.arc_degrees);
}

#[test]
fn test_diagnostics_survive_degenerate_fit() {
    let config = DetectorConfig {
        path_buffer_size: 16,
        min_fit_points: 16,
        ..DetectorConfig::default()
    };
    let mut det = CircleGestureDetector::new(config).unwrap();
    let reports = feed(&mut det, &circle_blobs(0.5, 0.5, 0.25, 18.0, 16, SHORT_SIDE), SHORT_SIDE);
    assert!(reports.last().unwrap().detected);

    // Leave the circle along the horizontal line through its lowest point
    // until the whole path is collinear.
    let line: Vec<Blob> = (1..=16)
        .map(|k| Blob {
            pixel_count: 30,
            cx: (0.5 + 0.01 * k as f64) * SHORT_SIDE as f64,
            cy: 0.25 * SHORT_SIDE as f64,
        })
        .collect();

    let mut degenerate = 0;
    for blob in line {
        let before = *det.diagnostics();
        let report = det.observe(Some(blob), SHORT_SIDE);
        assert!(matches!(report.observation, Observation::Accepted(_)));
        if report.fit == FitStatus::Degenerate {
            degenerate += 1;
            let after = det.diagnostics();
            assert_eq!(after.center, before.center);
            assert_eq!(after.radius, before.radius);
            assert_eq!(after.arc_degrees, before.arc_degrees);
            assert_eq!(after.residual_ratio, before.residual_ratio);
            assert!(!report.detected);
        }
    }
    assert_eq!(det.path_len(), 16);
    assert!(degenerate >= 1);
}

// ---------------------------------------------------------------------------
// Aspect correction
// ---------------------------------------------------------------------------

#[test]
fn test_square_normalization_is_aspect_independent() {
    // Downsampled frame sizes: 3:4 portrait and 32:9 ultra-wide.
    let mut raw_residual_ok = Vec::new();

    for (w, h) in [(60usize, 80usize), (320, 90)] {
        let short = w.min(h) as f64;
        let physical: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let t = (i as f64 * 18.0).to_radians();
                (w as f64 / 2.0 + 0.25 * short * t.cos(), h as f64 / 2.0 + 0.25 * short * t.sin())
            })
            .collect();

        let mut det = detector();
        let detected = physical
            .iter()
            .map(|&(x, y)| det.observe(Some(Blob { pixel_count: 40, cx: x, cy: y }), w.min(h)))
            .last()
            .unwrap()
            .detected;
        assert!(detected, "square-normalized circle rejected for {w}x{h}");
        assert_abs_diff_eq!(det.diagnostics().radius, 0.25, epsilon = 1e-6);

        let per_axis: Vec<Point2> = physical
            .iter()
            .map(|&(x, y)| Point2::new(x / w as f64, y / h as f64))
            .collect();
        let check = check_circle(&per_axis, &DetectorConfig::default()).unwrap();
        raw_residual_ok.push(check.residual_ok);
    }

    assert!(
        raw_residual_ok.iter().any(|ok| !ok),
        "per-axis normalization should fail the residual check for some aspect"
    );
}
