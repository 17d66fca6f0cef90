//! 밸브 조합 탐색 엔진의 경계/포화/최적성 회귀 테스트.
use gas_dilution_toolbox::generator::{
    bounds, concentration_for_subset, select_for_target, CoefficientSet, RangeStatus,
    ValveSubset,
};
use proptest::prelude::*;

const SAMPLE: [f64; 10] = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];

fn sample() -> CoefficientSet {
    CoefficientSet::load(&SAMPLE).expect("valid sample")
}

fn subset_from_mask(mask: u16) -> ValveSubset {
    ValveSubset::from_valves((0..10).filter(|i| mask & (1 << i) != 0).map(|i| i + 1))
        .expect("mask within 10 valves")
}

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.9} got {actual:.9} (diff {diff:.3e})"
    );
}

#[test]
fn sample_bounds_match_reference_values() {
    let set = sample();
    assert_eq!(set.min(), 2.0);
    assert_eq!(set.sum(), 65.0);
    let b = bounds(&set, 10_000.0).expect("bounds");
    assert_close("min", b.min, 6_666.666_666_7, 1e-6);
    assert_close("max", b.max, 9_848.484_848_5, 1e-6);
    assert!(b.min <= b.max);
}

#[test]
fn bounds_are_achieved_by_min_valve_and_all_valves() {
    let set = sample();
    let b = bounds(&set, 10_000.0).unwrap();
    let single = ValveSubset::single(set.min_valve()).unwrap();
    assert_eq!(concentration_for_subset(&set, 10_000.0, single), b.min);
    assert_eq!(concentration_for_subset(&set, 10_000.0, ValveSubset::all()), b.max);
}

#[test]
fn target_9000_finds_ratio_nine() {
    let set = sample();
    let sel = select_for_target(&set, 10_000.0, 9_000.0).expect("select");
    assert_eq!(sel.range, RangeStatus::Ok);
    assert_eq!(sel.combined_ratio, 9.0);
    assert_eq!(set.combined_ratio(sel.subset), 9.0);
    assert_close("conc", sel.concentration, 9_000.0, 1e-9);
}

#[test]
fn above_max_saturates_to_all_valves() {
    let set = sample();
    let b = bounds(&set, 10_000.0).unwrap();
    let sel = select_for_target(&set, 10_000.0, b.max + 1_000.0).unwrap();
    assert_eq!(sel.subset, ValveSubset::all());
    assert_eq!(sel.concentration, b.max);
    assert_eq!(sel.range, RangeStatus::AboveMax);
}

#[test]
fn below_min_saturates_to_single_min_valve() {
    let set = sample();
    let b = bounds(&set, 10_000.0).unwrap();
    let sel = select_for_target(&set, 10_000.0, b.min - 1_000.0).unwrap();
    assert_eq!(sel.subset.to_vec(), vec![1]);
    assert_eq!(sel.concentration, b.min);
    assert_eq!(sel.range, RangeStatus::BelowMin);
}

#[test]
fn below_min_uses_actual_minimum_not_valve_one() {
    let mut raw = SAMPLE;
    raw.swap(0, 4);
    let set = CoefficientSet::load(&raw).unwrap();
    let sel = select_for_target(&set, 10_000.0, 1.0).unwrap();
    assert_eq!(sel.subset.to_vec(), vec![5]);
}

#[test]
fn empty_subset_is_zero_for_any_source() {
    let set = sample();
    for source in [0.0, 1.0, 10_000.0, 1e9] {
        assert_eq!(concentration_for_subset(&set, source, ValveSubset::empty()), 0.0);
    }
}

#[test]
fn equidistant_candidates_prefer_larger_ratio() {
    let set =
        CoefficientSet::load(&[3.0, 5.0, 7.0, 11.0, 13.0, 17.0, 19.0, 23.0, 29.0, 31.0]).unwrap();
    // k = 8000 / 2000 = 4: 3 과 5 가 같은 거리
    let sel = select_for_target(&set, 10_000.0, 8_000.0).unwrap();
    assert_eq!(sel.combined_ratio, 5.0);
    assert_eq!(sel.subset.to_vec(), vec![2]);
    // k = 6000 / 1000 = 6: 5 와 7 이 같은 거리
    let sel = select_for_target(&set, 7_000.0, 6_000.0).unwrap();
    assert_eq!(sel.combined_ratio, 7.0);
    assert_eq!(sel.subset.to_vec(), vec![3]);
}

#[test]
fn round_trip_is_bit_exact_across_targets() {
    let set = sample();
    let mut target = 5_000.0;
    while target < 10_500.0 {
        let sel = select_for_target(&set, 10_000.0, target).unwrap();
        assert_eq!(
            concentration_for_subset(&set, 10_000.0, sel.subset),
            sel.concentration,
            "target {target}"
        );
        target += 37.5;
    }
}

proptest! {
    #[test]
    fn selection_is_globally_optimal(
        coeffs in prop::collection::vec(1.01f64..200.0, 10),
        source in 1.0f64..100_000.0,
        t in 0.0f64..1.0,
    ) {
        let set = CoefficientSet::load(&coeffs).unwrap();
        let b = bounds(&set, source).unwrap();
        prop_assert!(b.min <= b.max);
        let target = b.min + t * (b.max - b.min);
        let sel = select_for_target(&set, source, target).unwrap();
        prop_assume!(sel.range == RangeStatus::Ok);

        let k = target / (source - target);
        let best = (sel.combined_ratio - k).abs();
        for mask in 0..1024u16 {
            let other = set.combined_ratio(subset_from_mask(mask));
            prop_assert!((other - k).abs() >= best, "mask {:#b} beats selection", mask);
        }
        prop_assert_eq!(concentration_for_subset(&set, source, sel.subset), sel.concentration);
    }

    #[test]
    fn every_subset_stays_within_bounds(
        coeffs in prop::collection::vec(1.01f64..200.0, 10),
        source in 1.0f64..100_000.0,
        mask in 1u16..1024,
    ) {
        let set = CoefficientSet::load(&coeffs).unwrap();
        let b = bounds(&set, source).unwrap();
        let conc = concentration_for_subset(&set, source, subset_from_mask(mask));
        prop_assert!(conc >= b.min && conc <= b.max);
    }
}
