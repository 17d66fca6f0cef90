use serde::Serialize;
use thiserror::Error;

use super::coefficients::{CoefficientSet, InvalidValve, ValveSubset, VALVE_COUNT};

/// 농도 입력이 계산 전제 조건을 만족하지 않을 때의 오류.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    /// 음수이거나 유한하지 않은 농도
    #[error("농도는 0 이상의 유한한 값이어야 합니다: {0}")]
    InvalidConcentration(f64),
    /// 원료 농도가 목표 농도 이하라 희석 비율을 정의할 수 없음
    #[error("원료 농도({source_conc})가 목표 농도({target_conc})보다 커야 합니다")]
    SourceNotAboveTarget { source_conc: f64, target_conc: f64 },
    /// 1..=10 범위를 벗어난 밸브 번호
    #[error("밸브 번호 {0}는 1..=10 범위를 벗어났습니다")]
    InvalidValve(u32),
}

impl From<InvalidValve> for DomainError {
    fn from(err: InvalidValve) -> Self {
        DomainError::InvalidValve(err.0)
    }
}

/// 달성 가능한 농도 구간에 대한 위치. 오류가 아니라 결과에 붙는 표시이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeStatus {
    Ok,
    BelowMin,
    AboveMax,
}

/// 원료 농도에 대해 달성 가능한 출구 농도의 최소/최대값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn classify(&self, conc: f64) -> RangeStatus {
        if conc < self.min {
            RangeStatus::BelowMin
        } else if conc > self.max {
            RangeStatus::AboveMax
        } else {
            RangeStatus::Ok
        }
    }
}

/// 목표 농도에 대한 밸브 조합 탐색 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub subset: ValveSubset,
    pub combined_ratio: f64,
    pub concentration: f64,
    /// 목표가 구간 밖이라 경계값으로 포화(clamp)된 경우 `BelowMin`/`AboveMax`.
    pub range: RangeStatus,
}

/// 수동으로 고른 밸브 조합의 평가 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubsetEvaluation {
    pub subset: ValveSubset,
    pub concentration: f64,
    pub bounds: Bounds,
    pub range: RangeStatus,
}

fn check_conc(value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DomainError::InvalidConcentration(value))
    }
}

/// 혼합 법칙: 결합 비율 `ratio`에서의 출구 농도.
fn mixed_concentration(source_conc: f64, ratio: f64) -> f64 {
    source_conc / (1.0 / ratio + 1.0)
}

/// 최소/최대 출구 농도를 계산한다.
///
/// 최소는 계수가 가장 작은 밸브 하나만 열었을 때, 최대는 10개 밸브를 모두 열었을 때이다.
/// 결합 비율에 대해 농도가 단조 증가하므로 어떤 조합도 이 구간을 벗어나지 않는다.
pub fn bounds(set: &CoefficientSet, source_conc: f64) -> Result<Bounds, DomainError> {
    let source_conc = check_conc(source_conc)?;
    Ok(Bounds {
        min: mixed_concentration(source_conc, set.min()),
        max: mixed_concentration(source_conc, set.sum()),
    })
}

/// 목표 농도에 가장 가까운 밸브 조합을 1024개 전수 탐색으로 찾는다.
///
/// 목표가 구간 밖이면 오류 대신 가까운 경계로 포화시키고 `range`에 표시한다.
/// 동일 거리 후보가 여럿이면 결합 비율이 큰 쪽(목표를 약간 넘는 쪽)을,
/// 결합 비율까지 같으면 열린 밸브가 적은 쪽을, 그래도 같으면 비트마스크가
/// 작은 쪽을 선택한다.
pub fn select_for_target(
    set: &CoefficientSet,
    source_conc: f64,
    target_conc: f64,
) -> Result<Selection, DomainError> {
    let target_conc = check_conc(target_conc)?;
    let limits = bounds(set, source_conc)?;

    if target_conc > limits.max {
        log::debug!(
            "target {target_conc} above max {}; all valves open",
            limits.max
        );
        return Ok(Selection {
            subset: ValveSubset::all(),
            combined_ratio: set.sum(),
            concentration: limits.max,
            range: RangeStatus::AboveMax,
        });
    }
    if target_conc < limits.min {
        log::debug!(
            "target {target_conc} below min {}; valve {} only",
            limits.min,
            set.min_valve()
        );
        return Ok(Selection {
            subset: ValveSubset::from_mask(1 << (set.min_valve() - 1)),
            combined_ratio: set.min(),
            concentration: limits.min,
            range: RangeStatus::BelowMin,
        });
    }

    if source_conc <= target_conc {
        return Err(DomainError::SourceNotAboveTarget {
            source_conc,
            target_conc,
        });
    }
    let k = target_conc / (source_conc - target_conc);
    let (subset, ratio) = nearest_subset(set, k);
    log::trace!("k={k} -> valves [{subset}] ratio={ratio}");

    Ok(Selection {
        subset,
        combined_ratio: ratio,
        concentration: concentration_for_subset(set, source_conc, subset),
        range: RangeStatus::Ok,
    })
}

/// 모든 부분집합(빈 집합 포함)을 평가해 결합 비율이 `k`에 가장 가까운 것을 고른다.
fn nearest_subset(set: &CoefficientSet, k: f64) -> (ValveSubset, f64) {
    let mut best = ValveSubset::empty();
    let mut best_ratio = 0.0;
    let mut best_dist = k.abs();

    for mask in 1..(1u16 << VALVE_COUNT) {
        let subset = ValveSubset::from_mask(mask);
        let ratio = set.combined_ratio(subset);
        let dist = (ratio - k).abs();
        let better = dist < best_dist
            || (dist == best_dist
                && (ratio > best_ratio || (ratio == best_ratio && subset.len() < best.len())));
        if better {
            best = subset;
            best_ratio = ratio;
            best_dist = dist;
        }
    }
    (best, best_ratio)
}

/// 밸브 조합에서 출구 농도를 계산한다(탐색의 역방향). 빈 집합이면 0.
///
/// `select_for_target`이 반환한 조합에 대해 같은 식, 같은 연산 순서를 사용하므로
/// 결과 농도가 비트 단위로 일치한다.
pub fn concentration_for_subset(set: &CoefficientSet, source_conc: f64, subset: ValveSubset) -> f64 {
    if subset.is_empty() {
        return 0.0;
    }
    mixed_concentration(source_conc, set.combined_ratio(subset))
}

/// 수동 조합의 농도와 구간 위치를 함께 반환한다. 값은 포화시키지 않는다.
pub fn evaluate_subset(
    set: &CoefficientSet,
    source_conc: f64,
    subset: ValveSubset,
) -> Result<SubsetEvaluation, DomainError> {
    let limits = bounds(set, source_conc)?;
    let concentration = concentration_for_subset(set, source_conc, subset);
    Ok(SubsetEvaluation {
        subset,
        concentration,
        bounds: limits,
        range: limits.classify(concentration),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CoefficientSet {
        CoefficientSet::load(&[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]).unwrap()
    }

    #[test]
    fn negative_or_nan_concentrations_are_domain_errors() {
        let set = sample();
        assert!(matches!(
            bounds(&set, -1.0),
            Err(DomainError::InvalidConcentration(_))
        ));
        assert!(select_for_target(&set, 10_000.0, f64::NAN).is_err());
        assert!(select_for_target(&set, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn zero_source_is_rejected_after_clamp_check() {
        let set = sample();
        let err = select_for_target(&set, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            DomainError::SourceNotAboveTarget {
                source_conc: 0.0,
                target_conc: 0.0
            }
        );
    }

    #[test]
    fn equal_ratio_prefers_fewer_valves() {
        // 9 = 9 (밸브 8 단독) = 4 + 5 = 2 + 7 = 3 + 6 = 2 + 3 + 4
        let (subset, ratio) = nearest_subset(&sample(), 9.0);
        assert_eq!(ratio, 9.0);
        assert_eq!(subset.to_vec(), vec![8]);
    }

    #[test]
    fn manual_empty_subset_is_flagged_below_min() {
        let eval = evaluate_subset(&sample(), 10_000.0, ValveSubset::empty()).unwrap();
        assert_eq!(eval.concentration, 0.0);
        assert_eq!(eval.range, RangeStatus::BelowMin);
    }

    #[test]
    fn manual_subsets_stay_within_bounds() {
        let set = sample();
        for mask in 1..1024u16 {
            let eval = evaluate_subset(&set, 10_000.0, ValveSubset::from_mask(mask)).unwrap();
            assert_eq!(eval.range, RangeStatus::Ok, "mask {mask:#b}");
        }
    }
}
