//! 사용 설명서 및 형식 승인 문서상의 입력 제한과 보정 규칙.

use serde::Serialize;
use std::fmt;

use crate::gas_db;
use crate::generator::{Bounds, RangeStatus};

/// 원료 가스 혼합물 중 목표 성분의 허용 최대 농도 [ppm] (2 %).
pub const MAX_SOURCE_PPM: f64 = 20_000.0;

/// 원료 농도는 LEL의 이 비율을 넘으면 안 된다.
pub const LEL_FRACTION: f64 = 0.5;

/// 저농도 H2S 보정 구간 [ppm]과 보정값.
pub const H2S_CORRECTION_BAND_PPM: (f64, f64) = (0.005, 0.01);
pub const H2S_CORRECTION_PPM: f64 = 0.000_25;

/// 입력 점검에서 나온 경고. 계산은 계속 진행된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SafetyWarning {
    /// 발생기 희석 성분 목록에 없는 성분. LEL 점검을 할 수 없다.
    UnratedComponent { component: String },
    /// 원료 농도가 2 % 초과
    SourceAboveLimit { source_ppm: f64 },
    /// 원료 농도가 LEL의 50 % 초과
    SourceAboveHalfLel { source_ppm: f64, limit_ppm: f64 },
    /// 목표 농도가 달성 가능한 구간 밖
    TargetOutOfRange {
        target_ppm: f64,
        status: RangeStatus,
        bounds: Bounds,
    },
}

impl fmt::Display for SafetyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyWarning::UnratedComponent { component } => write!(
                f,
                "'{component}'은(는) 발생기 희석 성분 목록에 없습니다 (LEL 점검 불가)"
            ),
            SafetyWarning::SourceAboveLimit { source_ppm } => write!(
                f,
                "원료 가스 중 목표 성분 농도({source_ppm} ppm)는 2 % ({MAX_SOURCE_PPM} ppm)를 넘으면 안 됩니다"
            ),
            SafetyWarning::SourceAboveHalfLel {
                source_ppm,
                limit_ppm,
            } => write!(
                f,
                "원료 가스 중 목표 성분 농도({source_ppm} ppm)는 LEL의 50 % ({} % vol)를 넘으면 안 됩니다",
                limit_ppm / 10_000.0
            ),
            SafetyWarning::TargetOutOfRange { status, bounds, .. } => match status {
                RangeStatus::AboveMax => {
                    write!(f, "출구 농도는 {} ppm보다 클 수 없습니다", bounds.max)
                }
                _ => write!(f, "출구 농도는 {} ppm보다 작을 수 없습니다", bounds.min),
            },
        }
    }
}

/// 성분이 발생기 희석 성분 목록에 있는지 확인한다.
pub fn check_component(component: &str) -> Option<SafetyWarning> {
    if gas_db::is_generator_component(component) {
        None
    } else {
        Some(SafetyWarning::UnratedComponent {
            component: component.trim().to_string(),
        })
    }
}

/// 성분과 원료/목표 농도를 점검해 경고 목록을 만든다.
pub fn check_inputs(
    component: &str,
    source_ppm: f64,
    target_ppm: f64,
    bounds: Bounds,
) -> Vec<SafetyWarning> {
    let mut warnings: Vec<SafetyWarning> = check_component(component).into_iter().collect();
    if source_ppm > MAX_SOURCE_PPM {
        warnings.push(SafetyWarning::SourceAboveLimit { source_ppm });
    }
    if let Some(lel) = gas_db::find_gas(component).and_then(|g| g.lel_ppm) {
        let limit_ppm = lel * LEL_FRACTION;
        if source_ppm > limit_ppm {
            warnings.push(SafetyWarning::SourceAboveHalfLel {
                source_ppm,
                limit_ppm,
            });
        }
    }
    let status = bounds.classify(target_ppm);
    if status != RangeStatus::Ok {
        warnings.push(SafetyWarning::TargetOutOfRange {
            target_ppm,
            status,
            bounds,
        });
    }
    for w in &warnings {
        log::warn!("{w}");
    }
    warnings
}

/// 저농도 H2S 출구 농도에 더할 보정값 [ppm]. 해당 없으면 0.
pub fn h2s_correction(component: &str, conc_ppm: f64) -> f64 {
    let (lo, hi) = H2S_CORRECTION_BAND_PPM;
    if component.trim().eq_ignore_ascii_case("H2S") && (lo..=hi).contains(&conc_ppm) {
        log::info!("H2S correction: {conc_ppm} + {H2S_CORRECTION_PPM}");
        H2S_CORRECTION_PPM
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        min: 10.0,
        max: 5_000.0,
    };

    #[test]
    fn methane_source_above_half_lel_is_flagged() {
        let w = check_inputs("CH4", 25_000.0, 100.0, BOUNDS);
        assert!(w.contains(&SafetyWarning::SourceAboveLimit { source_ppm: 25_000.0 }));
        assert!(w.contains(&SafetyWarning::SourceAboveHalfLel {
            source_ppm: 25_000.0,
            limit_ppm: 22_000.0
        }));
    }

    #[test]
    fn non_flammable_component_has_no_lel_check() {
        let w = check_inputs("SO2", 15_000.0, 100.0, BOUNDS);
        assert!(w.is_empty());
    }

    #[test]
    fn target_outside_bounds_warns() {
        let w = check_inputs("CO", 1_000.0, 6_000.0, BOUNDS);
        assert!(matches!(
            w.as_slice(),
            [SafetyWarning::TargetOutOfRange {
                status: RangeStatus::AboveMax,
                ..
            }]
        ));
    }

    #[test]
    fn unrated_component_is_flagged_before_other_checks() {
        let w = check_inputs("methane", 25_000.0, 100.0, BOUNDS);
        assert_eq!(
            w.first(),
            Some(&SafetyWarning::UnratedComponent {
                component: "methane".into()
            })
        );
        assert!(!w
            .iter()
            .any(|w| matches!(w, SafetyWarning::SourceAboveHalfLel { .. })));
        assert_eq!(check_component(" ch4 "), None);
    }

    #[test]
    fn h2s_correction_only_for_h2s_inside_band() {
        assert_eq!(h2s_correction("H2S", 0.007), H2S_CORRECTION_PPM);
        assert_eq!(h2s_correction("h2s", 0.01), H2S_CORRECTION_PPM);
        assert_eq!(h2s_correction("H2S", 0.02), 0.0);
        assert_eq!(h2s_correction("SO2", 0.007), 0.0);
    }
}
