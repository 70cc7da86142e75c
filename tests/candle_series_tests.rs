use band_watch::model::candle::{CandleSeries, FoldOutcome};

const MINUTE: u64 = 60_000;

#[test]
fn ticks_within_window_fold_into_one_candle() {
    let mut s = CandleSeries::new(MINUTE, 100);
    assert!(s.is_empty());
    let start = 1_700_000_000_000;
    let prices = [2600.0, 2650.0, 2400.0];
    for (i, p) in prices.iter().enumerate() {
        s.fold(*p, start + i as u64 * 1000);
    }

    assert_eq!(s.len(), 1);
    let c = s.last().unwrap();
    assert_eq!(c.open_time, start);
    assert!((c.open - 2600.0).abs() < f64::EPSILON);
    assert!((c.high - 2650.0).abs() < f64::EPSILON);
    assert!((c.low - 2400.0).abs() < f64::EPSILON);
    assert!((c.close - 2400.0).abs() < f64::EPSILON);
}

#[test]
fn window_extremes_bound_every_tick() {
    let mut s = CandleSeries::new(MINUTE, 100);
    let prices = [10.0, 12.5, 9.75, 11.0, 11.0, 8.0, 13.25, 10.5];
    for (i, p) in prices.iter().enumerate() {
        s.fold(*p, i as u64 * 5_000);
    }

    let c = s.last().unwrap();
    for p in prices {
        assert!(c.high >= p);
        assert!(c.low <= p);
    }
    assert!(c.low <= c.open && c.open <= c.high);
    assert!(c.low <= c.close && c.close <= c.high);
    assert!((c.open - 10.0).abs() < f64::EPSILON);
    assert!((c.close - 10.5).abs() < f64::EPSILON);
}

#[test]
fn tick_at_or_after_window_opens_new_candle() {
    let mut s = CandleSeries::new(MINUTE, 100);
    assert_eq!(s.fold(100.0, 0), FoldOutcome::Opened);
    assert_eq!(s.fold(101.0, MINUTE - 1), FoldOutcome::Updated);
    assert_eq!(s.fold(102.0, MINUTE), FoldOutcome::Opened);
    assert_eq!(s.fold(103.0, 10 * MINUTE), FoldOutcome::Opened);

    let opens: Vec<u64> = s.candles().iter().map(|c| c.open_time).collect();
    assert_eq!(opens, vec![0, MINUTE, 10 * MINUTE]);
    // The earlier candle is left untouched.
    assert!((s.candles()[0].close - 101.0).abs() < f64::EPSILON);
}

#[test]
fn series_never_exceeds_capacity_and_evicts_oldest() {
    let mut s = CandleSeries::new(MINUTE, 100);
    for i in 0..250u64 {
        s.fold(1000.0 + i as f64, i * MINUTE);
        assert!(s.len() <= 100);
    }
    assert_eq!(s.len(), 100);
    assert_eq!(s.candles().first().unwrap().open_time, 150 * MINUTE);
    assert_eq!(s.candles().last().unwrap().open_time, 249 * MINUTE);
}

#[test]
fn small_capacity_keeps_latest_only() {
    let mut s = CandleSeries::new(1_000, 1);
    s.fold(1.0, 0);
    s.fold(2.0, 1_000);
    assert_eq!(s.len(), 1);
    assert!((s.last().unwrap().open - 2.0).abs() < f64::EPSILON);
}
