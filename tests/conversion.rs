//! 농도 단위 환산 회귀 테스트.
use gas_dilution_toolbox::config::Config;
use gas_dilution_toolbox::conversion::{
    convert, convert_concentration, Conditions, ConversionContext, ConversionError,
};
use gas_dilution_toolbox::units::{ConcentrationUnit, PressureUnit, TemperatureUnit};

fn co_in_air(conditions: Conditions) -> ConversionContext {
    ConversionContext::for_gas("CO", "air", conditions).expect("known gas")
}

#[test]
fn percent_to_ppm() {
    let ctx = co_in_air(Conditions::default());
    let ppm = convert(0.25, "%", "ppm", &ctx).unwrap();
    assert!((ppm - 2_500.0).abs() < 1e-9);
}

#[test]
fn ppm_to_mg_per_m3_at_reference_conditions() {
    // 1 ppm CO = 28.01 / 24.06 mg/m³
    let ctx = co_in_air(Conditions::default());
    let mg = convert_concentration(
        1.0,
        ConcentrationUnit::Ppm,
        ConcentrationUnit::MgPerM3,
        &ctx,
    )
    .unwrap();
    assert!((mg - 28.01 / 24.06).abs() < 1e-9, "mg={mg}");
}

#[test]
fn warmer_gas_has_lower_mass_concentration() {
    let warm = co_in_air(Conditions::from_units(
        104.0,
        TemperatureUnit::Fahrenheit,
        101.3,
        PressureUnit::KiloPascal,
    ));
    let reference = co_in_air(Conditions::default());
    let mg_warm = convert(100.0, "ppm", "mg/m3", &warm).unwrap();
    let mg_ref = convert(100.0, "ppm", "mg/m3", &reference).unwrap();
    assert!(mg_warm < mg_ref);
    assert!((mg_ref / mg_warm - 313.0 / 293.0).abs() < 1e-9);
}

#[test]
fn unknown_gas_only_fails_for_mass_units() {
    let ctx = ConversionContext::for_gas("XYZ", "n2", Conditions::default()).unwrap();
    assert!((convert(1.0, "%", "ppm", &ctx).unwrap() - 10_000.0).abs() < 1e-9);
    assert_eq!(
        convert(1.0, "ppm", "mg/m3", &ctx),
        Err(ConversionError::UnknownGas("XYZ".into()))
    );
}

#[test]
fn bad_unit_and_bad_conditions_are_reported() {
    let ctx = co_in_air(Conditions::default());
    assert!(matches!(
        convert(1.0, "ppb", "ppm", &ctx),
        Err(ConversionError::UnknownUnit(_))
    ));
    let vacuum = co_in_air(Conditions {
        temperature_c: 20.0,
        pressure_kpa: 0.0,
    });
    assert!(matches!(
        convert(1.0, "ppm", "mg/m3", &vacuum),
        Err(ConversionError::InvalidConditions(_))
    ));
}

#[test]
fn config_molar_volume_override_is_used() {
    let mut cfg = Config::default();
    cfg.diluents.get_mut("n2").unwrap().molar_volume_l = Some(22.4);
    let ctx = cfg.conversion_context("CO", "n2").unwrap();
    assert_eq!(ctx.molar_volume_l, 22.4);
    assert!(cfg.conversion_context("CO", "he").is_err());
}
