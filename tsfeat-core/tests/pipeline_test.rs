//! End-to-end pipeline tests over synthetic multi-year series.

use chrono::{Datelike, NaiveDate};
use tsfeat_core::{
    Bar, FeatureConfig, FeatureExtractor, FeatureMode, Steps, TrendDirection, TrendOracle,
};

/// Synthetic daily bars over `[start, end]`, weekdays only, with a gentle
/// upward drift and periodic wobble.
fn make_bars(start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut date = start;
    let mut i = 0u32;
    while date <= end {
        if date.weekday().number_from_monday() <= 5 {
            let close = 100.0 + i as f64 * 0.05 + (i as f64 * 0.3).sin() * 2.0;
            let open = close - 0.4;
            bars.push(Bar {
                date,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000_000.0 + (i as f64 * 0.7).cos() * 50_000.0,
            });
            i += 1;
        }
        date += chrono::Duration::days(1);
    }
    bars
}

fn three_years() -> Vec<Bar> {
    make_bars(
        NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
    )
}

#[test]
fn full_pipeline_emits_all_column_families() {
    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.fit_transform(&three_years()).unwrap();

    for name in [
        "open",
        "high",
        "low",
        "close",
        "volume",
        "close_intraday",
        "op_cl_intraday",
        "open_close",
        "low_high",
        "vol_year",
        "vol_month",
        "vol_slice_year",
        "vol_slice_month",
        "trd_year",
        "trd_month",
        "trd_slice_month",
        "trd_slice_year",
        "seas_month",
        "seas_slice_month",
        "seas_slice_year",
        "lvl_year",
        "lvl_month",
        "lvl_slice_year",
        "lvl_slice_month",
    ] {
        assert!(frame.has_column(name), "missing column {name}");
    }
}

#[test]
fn finalized_frame_is_finite_and_has_no_key_columns() {
    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.fit_transform(&three_years()).unwrap();

    for name in ["year", "month", "slice_year", "slice_month"] {
        assert!(!frame.has_column(name), "working column {name} leaked");
    }
    for name in frame.names() {
        let column = frame.column(name).unwrap();
        assert!(
            column.iter().all(|v| v.is_finite()),
            "non-finite value in {name}"
        );
    }
}

#[test]
fn reduced_pipeline_skips_volume_and_daily_columns() {
    let config = FeatureConfig {
        mult: false,
        ..Default::default()
    };
    let extractor = FeatureExtractor::new(config);
    let frame = extractor.fit_transform(&three_years()).unwrap();

    assert!(frame.has_column("close_intraday"));
    assert!(frame.has_column("lvl_year"));
    assert!(frame.has_column("trd_year"));
    assert!(frame.has_column("seas_month"));
    assert!(!frame.has_column("open_close"));
    assert!(!frame.has_column("low_high"));
    assert!(!frame.has_column("vol_year"));
}

#[test]
fn steps_y_produces_only_year_columns() {
    let config = FeatureConfig {
        steps: Steps::Y,
        ..Default::default()
    };
    let extractor = FeatureExtractor::new(config);
    let frame = extractor.fit_transform(&three_years()).unwrap();

    assert!(frame.has_column("lvl_year"));
    assert!(frame.has_column("vol_year"));
    assert!(frame.has_column("trd_year"));
    for name in frame.names() {
        assert!(
            !name.contains("month") && !name.contains("slice"),
            "unexpected sub-year column {name}"
        );
    }
    // Year has no seasonality.
    assert!(!frame.has_column("seas_year"));
}

#[test]
fn single_row_input_normalizes_oscillations_to_zero() {
    let bars = make_bars(
        NaiveDate::from_ymd_opt(2021, 6, 7).unwrap(),
        NaiveDate::from_ymd_opt(2021, 6, 7).unwrap(),
    );
    assert_eq!(bars.len(), 1);

    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.fit_transform(&bars).unwrap();
    assert_eq!(frame.get("close_intraday", 0), Some(0.0));
    assert_eq!(frame.get("op_cl_intraday", 0), Some(0.0));
}

#[test]
fn transform_is_idempotent_and_leaves_input_untouched() {
    let bars = three_years();
    let original = bars.clone();
    let extractor = FeatureExtractor::new(FeatureConfig::default());

    let a = extractor.fit_transform(&bars).unwrap();
    let b = extractor.fit_transform(&bars).unwrap();

    for (bar, orig) in bars.iter().zip(&original) {
        assert_eq!(bar.date, orig.date);
        assert_eq!(bar.close, orig.close);
        assert_eq!(bar.volume, orig.volume);
    }
    let names_a: Vec<&str> = a.names().collect();
    let names_b: Vec<&str> = b.names().collect();
    assert_eq!(names_a, names_b);
    for name in names_a {
        assert_eq!(a.column(name), b.column(name), "column {name} differs");
    }
}

#[test]
fn label_mode_level_is_sign_of_perc_mode() {
    let bars = three_years();
    let label = FeatureExtractor::new(FeatureConfig {
        feature: FeatureMode::Label,
        ..Default::default()
    })
    .fit_transform(&bars)
    .unwrap();
    let perc = FeatureExtractor::new(FeatureConfig::default())
        .fit_transform(&bars)
        .unwrap();

    let label_col = label.column("lvl_month").unwrap();
    let perc_col = perc.column("lvl_month").unwrap();
    for (l, p) in label_col.iter().zip(perc_col) {
        if *p > 0.0 {
            assert_eq!(*l, 1.0);
        } else if *p < 0.0 {
            assert_eq!(*l, -1.0);
        }
    }
}

#[test]
fn trend_columns_are_three_way() {
    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.fit_transform(&three_years()).unwrap();
    for name in ["trd_year", "trd_month", "trd_slice_month", "trd_slice_year"] {
        let column = frame.column(name).unwrap();
        assert!(
            column.iter().all(|v| *v == -1.0 || *v == 0.0 || *v == 1.0),
            "{name} holds a non-label value"
        );
    }
}

#[test]
fn seasonality_scores_stay_in_percentage_range() {
    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.fit_transform(&three_years()).unwrap();
    for name in ["seas_month", "seas_slice_month", "seas_slice_year"] {
        let column = frame.column(name).unwrap();
        assert!(column.iter().all(|v| (0.0..=100.0).contains(v)), "{name}");
    }
}

#[test]
fn seasonality_first_year_scores_zero() {
    let bars = three_years();
    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.fit_transform(&bars).unwrap();
    let seas = frame.column("seas_month").unwrap();
    for (bar, score) in bars.iter().zip(seas) {
        if bar.date.year() == 2019 {
            assert_eq!(*score, 0.0, "first-year row {} scored", bar.date);
        }
    }
}

/// Oracle pinning every sequence to Increasing, to make seasonality
/// deterministic from the calendar alone.
struct AlwaysUp;

impl TrendOracle for AlwaysUp {
    fn test(&self, _values: &[f64]) -> TrendDirection {
        TrendDirection::Increasing
    }
}

#[test]
fn seasonality_with_constant_trends_reaches_full_recurrence() {
    let bars = three_years();
    let extractor = FeatureExtractor::with_oracle(FeatureConfig::default(), Box::new(AlwaysUp));
    let frame = extractor.fit_transform(&bars).unwrap();
    let seas = frame.column("seas_month").unwrap();
    for (bar, score) in bars.iter().zip(seas) {
        // Every later year repeats the direction of every prior year.
        if bar.date.year() > 2019 {
            assert_eq!(*score, 100.0, "row {}", bar.date);
        }
    }
}

/// Gap-free bars (open = previous close) with moves far from the 0.1%
/// intraday dead-band boundary, so every label column is strictly binary.
fn gapless_bars() -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
    let mut close = 100.0;
    let mut i = 0u32;
    while date <= end {
        if date.weekday().number_from_monday() <= 5 {
            let open = close;
            let step = if i % 3 == 0 { -0.008 } else { 0.012 };
            close *= 1.0 + step;
            bars.push(Bar {
                date,
                open,
                high: open.max(close) * 1.002,
                low: open.min(close) * 0.998,
                close,
                volume: 1_000_000.0 + (i % 7) as f64 * 40_000.0,
            });
            i += 1;
        }
        date += chrono::Duration::days(1);
    }
    bars
}

#[test]
fn extract_label_emits_binary_columns_and_majority_vote() {
    let bars = gapless_bars();
    let extractor = FeatureExtractor::new(FeatureConfig::default());
    let frame = extractor.extract_label(&bars).unwrap();

    for name in ["open", "high", "low", "close", "volume"] {
        assert!(!frame.has_column(name), "raw column {name} kept");
    }
    assert!(frame.has_column("label"));
    assert!(!frame.has_column("trd_year"));
    assert!(!frame.has_column("seas_month"));

    for name in frame.names() {
        let column = frame.column(name).unwrap();
        assert!(
            column.iter().all(|v| *v == 0.0 || *v == 1.0),
            "{name} is not binary"
        );
    }

    // The vote matches recomputing it from the emitted columns.
    let width = frame.width() - 1; // excluding `label` itself
    for row in 0..frame.len() {
        let sum: f64 = frame
            .names()
            .filter(|n| *n != "label")
            .map(|n| frame.get(n, row).unwrap())
            .sum();
        let expected = if sum > width as f64 / 2.0 { 1.0 } else { 0.0 };
        assert_eq!(frame.get("label", row), Some(expected), "row {row}");
    }
}
