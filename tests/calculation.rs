//! 단위 환산부터 보정까지 이어지는 계산 흐름 테스트.
use gas_dilution_toolbox::{
    app::AppError,
    calculation::{
        calculate, recalculate, valves_from_numbers, CalcError, CalculationRequest, ManualRequest,
    },
    config::Config,
    generator::{concentration_for_subset, DomainError, RangeStatus, ValveSubset},
    safety::{SafetyWarning, H2S_CORRECTION_PPM},
    units::ConcentrationUnit,
};

fn request(component: &str, source: f64, source_unit: ConcentrationUnit, target: f64) -> CalculationRequest {
    CalculationRequest {
        diluent: "air".into(),
        component: component.into(),
        source_conc: source,
        source_unit,
        target_conc: target,
        target_unit: ConcentrationUnit::Ppm,
    }
}

#[test]
fn percent_source_is_converted_before_search() {
    let cfg = Config::default();
    let report = calculate(&request("CO", 1.0, ConcentrationUnit::Percent, 500.0), &cfg)
        .expect("calculate");
    assert_eq!(report.source_ppm, 10_000.0);
    assert_eq!(report.range, RangeStatus::Ok);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let rel = (report.conc_ppm - 500.0).abs() / 500.0;
    assert!(rel < 0.02, "conc {} too far from 500", report.conc_ppm);

    let set = cfg.coefficient_set("air").unwrap();
    assert_eq!(
        concentration_for_subset(&set, report.source_ppm, report.valves),
        report.conc_ppm
    );
}

#[test]
fn unreachable_target_is_clamped_and_warned() {
    let cfg = Config::default();
    let report = calculate(&request("CO", 10_000.0, ConcentrationUnit::Ppm, 9_999.0), &cfg)
        .unwrap();
    assert_eq!(report.valves, ValveSubset::all());
    assert_eq!(report.range, RangeStatus::AboveMax);
    assert_eq!(report.conc_ppm, report.bounds.max);
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, SafetyWarning::TargetOutOfRange { .. })));
}

#[test]
fn methane_above_half_lel_still_calculates() {
    let cfg = Config::default();
    let report = calculate(&request("CH4", 2.5, ConcentrationUnit::Percent, 1_000.0), &cfg)
        .unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, SafetyWarning::SourceAboveHalfLel { .. })));
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, SafetyWarning::SourceAboveLimit { .. })));
}

#[test]
fn low_h2s_result_gets_additive_correction() {
    let cfg = Config::default();
    let report = calculate(&request("H2S", 0.5, ConcentrationUnit::Ppm, 0.008), &cfg).unwrap();
    assert!((0.005..=0.01).contains(&report.conc_ppm), "conc {}", report.conc_ppm);
    assert_eq!(report.correction_ppm, H2S_CORRECTION_PPM);
    assert_eq!(report.result, report.conc_ppm + H2S_CORRECTION_PPM);

    let report = calculate(&request("CO", 0.5, ConcentrationUnit::Ppm, 0.008), &cfg).unwrap();
    assert_eq!(report.correction_ppm, 0.0);
}

#[test]
fn manual_empty_selection_is_zero_and_flagged() {
    let cfg = Config::default();
    let report = recalculate(
        &ManualRequest {
            diluent: "n2".into(),
            component: "NO".into(),
            source_conc: 1_000.0,
            source_unit: ConcentrationUnit::Ppm,
            valves: ValveSubset::empty(),
            result_unit: ConcentrationUnit::Ppm,
        },
        &cfg,
    )
    .unwrap();
    assert_eq!(report.result, 0.0);
    assert_eq!(report.range, RangeStatus::BelowMin);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.target_ppm, None);
}

#[test]
fn manual_all_valves_reaches_max() {
    let cfg = Config::default();
    let report = recalculate(
        &ManualRequest {
            diluent: "air".into(),
            component: "SO2".into(),
            source_conc: 1_000.0,
            source_unit: ConcentrationUnit::Ppm,
            valves: ValveSubset::all(),
            result_unit: ConcentrationUnit::Ppm,
        },
        &cfg,
    )
    .unwrap();
    assert_eq!(report.conc_ppm, report.bounds.max);
    assert_eq!(report.range, RangeStatus::Ok);
}

#[test]
fn unknown_diluent_is_an_error() {
    let cfg = Config::default();
    let mut req = request("CO", 1_000.0, ConcentrationUnit::Ppm, 100.0);
    req.diluent = "ar".into();
    assert!(calculate(&req, &cfg).is_err());
}

#[test]
fn negative_source_is_a_domain_error() {
    let cfg = Config::default();
    let err = calculate(&request("CO", -5.0, ConcentrationUnit::Ppm, 1.0), &cfg).unwrap_err();
    assert!(err.to_string().contains("-5"), "{err}");
}

#[test]
fn valve_eleven_is_reported_as_input_error() {
    let err = valves_from_numbers([1, 11]).unwrap_err();
    assert!(matches!(err, CalcError::Domain(DomainError::InvalidValve(11))));
    let err = AppError::from(err);
    assert!(matches!(err, AppError::Calc(_)));
    assert!(err.to_string().contains("11"), "{err}");
    assert!(!err.to_string().contains("입출력"), "{err}");

    assert_eq!(valves_from_numbers([3, 1, 3]).unwrap().to_vec(), vec![1, 3]);
    assert!(matches!(
        valves_from_numbers([0]),
        Err(CalcError::Domain(DomainError::InvalidValve(0)))
    ));
}

#[test]
fn unrated_component_warns_but_still_calculates() {
    let cfg = Config::default();
    let report = calculate(&request("XYZ", 1_000.0, ConcentrationUnit::Ppm, 100.0), &cfg).unwrap();
    assert_eq!(report.range, RangeStatus::Ok);
    assert_eq!(
        report.warnings,
        vec![SafetyWarning::UnratedComponent {
            component: "XYZ".into()
        }]
    );

    let report = calculate(&request("methane", 2.5, ConcentrationUnit::Percent, 1_000.0), &cfg)
        .unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, SafetyWarning::UnratedComponent { .. })));
}

#[test]
fn manual_mode_flags_unrated_component() {
    let cfg = Config::default();
    let report = recalculate(
        &ManualRequest {
            diluent: "air".into(),
            component: "Xe".into(),
            source_conc: 1_000.0,
            source_unit: ConcentrationUnit::Ppm,
            valves: ValveSubset::all(),
            result_unit: ConcentrationUnit::Ppm,
        },
        &cfg,
    )
    .unwrap();
    assert_eq!(
        report.warnings,
        vec![SafetyWarning::UnratedComponent {
            component: "Xe".into()
        }]
    );
}
