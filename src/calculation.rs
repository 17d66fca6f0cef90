//! 사용자 단위의 입력을 받아 밸브 조합을 계산하고 결과를 다시 사용자 단위로 돌려준다.
//!
//! CLI와 GUI가 공유하는 계층으로, 단위 환산 → 입력 점검 → 조합 탐색 → H2S 보정 →
//! 결과 환산 순서로 처리한다.

use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::conversion::{self, ConversionError};
use crate::generator::{self, Bounds, DomainError, RangeStatus, ValveSubset};
use crate::safety::{self, SafetyWarning};
use crate::units::ConcentrationUnit;

/// 계산 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// 목표 농도 기준 계산 요청.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub diluent: String,
    pub component: String,
    pub source_conc: f64,
    pub source_unit: ConcentrationUnit,
    pub target_conc: f64,
    pub target_unit: ConcentrationUnit,
}

/// 밸브를 직접 고른 경우의 재계산 요청.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualRequest {
    pub diluent: String,
    pub component: String,
    pub source_conc: f64,
    pub source_unit: ConcentrationUnit,
    pub valves: ValveSubset,
    pub result_unit: ConcentrationUnit,
}

/// 계산 결과 보고서.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationReport {
    pub diluent: String,
    pub component: String,
    pub source_ppm: f64,
    /// 요청 목표 농도. 수동 계산이면 `None`.
    pub target_ppm: Option<f64>,
    pub valves: ValveSubset,
    pub combined_ratio: f64,
    /// 조합 결과 농도(보정 전) [ppm]
    pub conc_ppm: f64,
    /// H2S 저농도 보정값 [ppm]
    pub correction_ppm: f64,
    pub bounds: Bounds,
    pub range: RangeStatus,
    /// 보정 후 결과를 사용자 단위로 표시한 값
    pub result: f64,
    pub result_unit: ConcentrationUnit,
    pub warnings: Vec<SafetyWarning>,
}

impl CalculationReport {
    /// 보정을 포함한 최종 농도 [ppm].
    pub fn corrected_ppm(&self) -> f64 {
        self.conc_ppm + self.correction_ppm
    }

    /// 표시용으로 반올림한 결과 값.
    pub fn rounded_result(&self) -> f64 {
        round_for_display(self.result)
    }
}

/// 목표 농도에 가장 가까운 밸브 조합을 계산한다.
pub fn calculate(req: &CalculationRequest, cfg: &Config) -> Result<CalculationReport, CalcError> {
    let set = cfg.coefficient_set(&req.diluent)?;
    let ctx = cfg.conversion_context(&req.component, &req.diluent)?;
    let source_ppm = conversion::to_ppm(req.source_conc, req.source_unit, &ctx)?;
    let target_ppm = conversion::to_ppm(req.target_conc, req.target_unit, &ctx)?;

    let bounds = generator::bounds(&set, source_ppm)?;
    let warnings = safety::check_inputs(&req.component, source_ppm, target_ppm, bounds);
    let selection = generator::select_for_target(&set, source_ppm, target_ppm)?;
    log::info!(
        "{} in {}: {source_ppm} -> {target_ppm} ppm, valves [{}], {} ppm",
        req.component,
        req.diluent,
        selection.subset,
        selection.concentration
    );

    let correction_ppm = safety::h2s_correction(&req.component, selection.concentration);
    let result = conversion::from_ppm(
        selection.concentration + correction_ppm,
        req.target_unit,
        &ctx,
    )?;
    Ok(CalculationReport {
        diluent: req.diluent.clone(),
        component: req.component.clone(),
        source_ppm,
        target_ppm: Some(target_ppm),
        valves: selection.subset,
        combined_ratio: selection.combined_ratio,
        conc_ppm: selection.concentration,
        correction_ppm,
        bounds,
        range: selection.range,
        result,
        result_unit: req.target_unit,
        warnings,
    })
}

/// 직접 선택한 밸브 조합의 출구 농도를 계산한다. 구간 밖이어도 값은 포화시키지 않는다.
pub fn recalculate(req: &ManualRequest, cfg: &Config) -> Result<CalculationReport, CalcError> {
    let set = cfg.coefficient_set(&req.diluent)?;
    let ctx = cfg.conversion_context(&req.component, &req.diluent)?;
    let source_ppm = conversion::to_ppm(req.source_conc, req.source_unit, &ctx)?;

    let eval = generator::evaluate_subset(&set, source_ppm, req.valves)?;
    let mut warnings: Vec<SafetyWarning> =
        safety::check_component(&req.component).into_iter().collect();
    if eval.range != RangeStatus::Ok {
        warnings.push(SafetyWarning::TargetOutOfRange {
            target_ppm: eval.concentration,
            status: eval.range,
            bounds: eval.bounds,
        });
    }
    for w in &warnings {
        log::warn!("{w}");
    }
    let correction_ppm = safety::h2s_correction(&req.component, eval.concentration);
    let result = conversion::from_ppm(eval.concentration + correction_ppm, req.result_unit, &ctx)?;
    log::info!(
        "manual valves [{}] -> {} ppm ({:?})",
        req.valves,
        eval.concentration,
        eval.range
    );
    Ok(CalculationReport {
        diluent: req.diluent.clone(),
        component: req.component.clone(),
        source_ppm,
        target_ppm: None,
        valves: req.valves,
        combined_ratio: set.combined_ratio(req.valves),
        conc_ppm: eval.concentration,
        correction_ppm,
        bounds: eval.bounds,
        range: eval.range,
        result,
        result_unit: req.result_unit,
        warnings,
    })
}

/// 밸브 번호 목록을 조합으로 바꾼다. 범위 밖 번호는 입력(도메인) 오류이다.
pub fn valves_from_numbers<I>(valves: I) -> Result<ValveSubset, CalcError>
where
    I: IntoIterator<Item = u32>,
{
    ValveSubset::from_valves(valves).map_err(|e| CalcError::Domain(e.into()))
}

/// 결과를 발생기 오차보다 약 두 자릿수 정밀하게 반올림한다.
///
/// 1 이상이면 유효숫자 5자리, 1 미만이면 첫 유효 자릿수 아래로 소수 3자리를 더 남긴다.
pub fn round_for_display(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let mut exp = value.abs().log10();
    exp = if exp > 0.0 { exp.ceil() } else { exp.floor() };
    let exp = if exp < 0.0 { exp - 3.0 } else { exp - 5.0 };
    if exp < 0.0 {
        let scale = 10f64.powi(-exp as i32);
        // 1e-305 미만에서는 배율이 inf 로 넘친다.
        if !scale.is_finite() {
            return value;
        }
        (value * scale).round() / scale
    } else {
        value.round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rounding_matches_generator_resolution() {
        assert_eq!(round_for_display(0.0), 0.0);
        assert_eq!(round_for_display(1234.56789), 1234.6);
        assert_eq!(round_for_display(123_456.7), 123_457.0);
        assert_eq!(round_for_display(0.012_345_6), 0.01235);
    }

    #[test]
    fn tiny_values_pass_through_unchanged() {
        for tiny in [1e-310, f64::MIN_POSITIVE, 1e-306] {
            assert_eq!(round_for_display(tiny), tiny);
            assert_eq!(round_for_display(-tiny), -tiny);
        }
        let r = round_for_display(1.234_567e-300);
        assert!((r / 1.235e-300 - 1.0).abs() < 1e-12, "r={r}");
    }
}
