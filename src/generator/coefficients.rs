use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 발생기 밸브 개수. 조합 공간은 2^10 = 1024 이다.
pub const VALVE_COUNT: usize = 10;

/// 계수표 로드 시 발생 가능한 오류. 설정 단계에서 거부되며 재시도하지 않는다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoefficientError {
    /// 계수 개수가 10개가 아님
    #[error("계수는 정확히 {VALVE_COUNT}개여야 합니다 (입력 {0}개)")]
    WrongLength(usize),
    /// 1 이하이거나 유한하지 않은 계수
    #[error("밸브 {valve}의 계수 {value}는 1보다 큰 유한한 값이어야 합니다")]
    InvalidValue { valve: u8, value: f64 },
}

/// 밸브 번호(1..=10)로 지정할 수 없는 값이 들어왔을 때의 오류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("밸브 번호 {0}는 1..={VALVE_COUNT} 범위를 벗어났습니다")]
pub struct InvalidValve(pub u32);

/// 열린 밸브 집합. 내부적으로 비트마스크(bit i = 밸브 i+1)로 보관한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ValveSubset(u16);

impl ValveSubset {
    const FULL_MASK: u16 = (1 << VALVE_COUNT) - 1;

    /// 빈 집합(모든 밸브 닫힘).
    pub const fn empty() -> Self {
        Self(0)
    }

    /// 10개 밸브 전체.
    pub const fn all() -> Self {
        Self(Self::FULL_MASK)
    }

    /// 단일 밸브만 열린 집합.
    pub fn single(valve: u8) -> Result<Self, InvalidValve> {
        Self::from_valves([u32::from(valve)])
    }

    /// 밸브 번호 목록으로부터 집합을 만든다. 중복 번호는 한 번만 반영된다.
    pub fn from_valves<I>(valves: I) -> Result<Self, InvalidValve>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut mask = 0u16;
        for v in valves {
            if v == 0 || v as usize > VALVE_COUNT {
                return Err(InvalidValve(v));
            }
            mask |= 1 << (v - 1);
        }
        Ok(Self(mask))
    }

    pub(crate) fn from_mask(mask: u16) -> Self {
        Self(mask & Self::FULL_MASK)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, valve: u8) -> bool {
        valve >= 1 && (valve as usize) <= VALVE_COUNT && self.0 & (1 << (valve - 1)) != 0
    }

    /// 밸브 상태를 토글한 새 집합을 반환한다. 범위 밖 번호는 무시한다.
    pub fn toggled(self, valve: u8) -> Self {
        if valve == 0 || valve as usize > VALVE_COUNT {
            return self;
        }
        Self(self.0 ^ (1 << (valve - 1)))
    }

    /// 열린 밸브 번호를 오름차순으로 순회한다.
    pub fn valves(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=VALVE_COUNT as u8).filter(move |v| self.contains(*v))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.valves().collect()
    }
}

impl fmt::Display for ValveSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let list: Vec<String> = self.valves().map(|v| v.to_string()).collect();
        write!(f, "{}", list.join(", "))
    }
}

impl TryFrom<Vec<u32>> for ValveSubset {
    type Error = InvalidValve;

    fn try_from(value: Vec<u32>) -> Result<Self, Self::Error> {
        Self::from_valves(value)
    }
}

impl From<ValveSubset> for Vec<u32> {
    fn from(value: ValveSubset) -> Self {
        value.valves().map(u32::from).collect()
    }
}

/// 밸브별 희석 비율 10개.
///
/// 조합 탐색은 이 값들의 합(결합 비율)을 기준으로 한다. 여러 밸브를 열면
/// 각 밸브의 비율이 더해지고, 출구 농도는 `source / (1/합 + 1)` 로 결정된다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    ratios: [f64; VALVE_COUNT],
}

impl CoefficientSet {
    /// 비율 10개를 그대로 적재한다. 각 값은 1보다 커야 한다.
    pub fn load(raw: &[f64]) -> Result<Self, CoefficientError> {
        let values = check_table(raw)?;
        Ok(Self { ratios: values })
    }

    /// 여권(passport) 희석 계수 K를 비율 L = 1/(K-1)로 변환해 적재한다.
    ///
    /// K = 1 은 변환식이 정의되지 않으므로 `load`와 동일하게 거부된다.
    pub fn from_passport(passport: &[f64]) -> Result<Self, CoefficientError> {
        let values = check_table(passport)?;
        Ok(Self {
            ratios: values.map(|k| 1.0 / (k - 1.0)),
        })
    }

    pub fn ratios(&self) -> &[f64; VALVE_COUNT] {
        &self.ratios
    }

    /// 10개 계수의 합. 밸브 순서대로 더한다(`combined_ratio(all)`과 비트 단위로 동일).
    pub fn sum(&self) -> f64 {
        self.ratios.iter().fold(0.0, |acc, r| acc + r)
    }

    /// 가장 작은 계수. 밸브 순서를 가정하지 않는다.
    pub fn min(&self) -> f64 {
        self.ratios[self.min_index()]
    }

    /// 가장 작은 계수를 가진 밸브 번호(동률이면 낮은 번호).
    pub fn min_valve(&self) -> u8 {
        self.min_index() as u8 + 1
    }

    fn min_index(&self) -> usize {
        let mut idx = 0;
        for (i, r) in self.ratios.iter().enumerate().skip(1) {
            if *r < self.ratios[idx] {
                idx = i;
            }
        }
        idx
    }

    /// 열린 밸브들의 계수 합. 빈 집합이면 0.
    pub fn combined_ratio(&self, subset: ValveSubset) -> f64 {
        subset
            .valves()
            .fold(0.0, |acc, v| acc + self.ratios[usize::from(v - 1)])
    }
}

fn check_table(raw: &[f64]) -> Result<[f64; VALVE_COUNT], CoefficientError> {
    let values: [f64; VALVE_COUNT] = raw
        .try_into()
        .map_err(|_| CoefficientError::WrongLength(raw.len()))?;
    for (i, value) in values.iter().enumerate() {
        if !value.is_finite() || *value <= 1.0 {
            return Err(CoefficientError::InvalidValue {
                valve: i as u8 + 1,
                value: *value,
            });
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 10] = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];

    #[test]
    fn load_rejects_wrong_length() {
        let err = CoefficientSet::load(&SAMPLE[..9]).unwrap_err();
        assert_eq!(err, CoefficientError::WrongLength(9));
    }

    #[test]
    fn load_rejects_unit_and_non_finite_values() {
        let mut raw = SAMPLE;
        raw[3] = 1.0;
        assert!(matches!(
            CoefficientSet::load(&raw),
            Err(CoefficientError::InvalidValue { valve: 4, .. })
        ));
        raw[3] = f64::NAN;
        assert!(CoefficientSet::load(&raw).is_err());
        assert!(CoefficientSet::from_passport(&[1.0; 10]).is_err());
    }

    #[test]
    fn derived_values_do_not_assume_ordering() {
        let mut raw = SAMPLE;
        raw.swap(0, 6);
        let set = CoefficientSet::load(&raw).unwrap();
        assert_eq!(set.sum(), 65.0);
        assert_eq!(set.min(), 2.0);
        assert_eq!(set.min_valve(), 7);
    }

    #[test]
    fn passport_transform_maps_to_reciprocal_excess() {
        let set = CoefficientSet::from_passport(&[2.0, 3.0, 5.0, 11.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0])
            .unwrap();
        assert_eq!(set.ratios()[0], 1.0);
        assert_eq!(set.ratios()[1], 0.5);
        assert_eq!(set.ratios()[2], 0.25);
        assert!((set.ratios()[3] - 0.1).abs() < 1e-15);
    }

    #[test]
    fn combined_ratio_sums_open_valves() {
        let set = CoefficientSet::load(&SAMPLE).unwrap();
        assert_eq!(set.combined_ratio(ValveSubset::empty()), 0.0);
        let subset = ValveSubset::from_valves([3, 4]).unwrap();
        assert_eq!(set.combined_ratio(subset), 9.0);
        assert_eq!(set.combined_ratio(ValveSubset::all()), set.sum());
    }

    #[test]
    fn subset_reports_ascending_without_duplicates() {
        let subset = ValveSubset::from_valves([7, 2, 7, 10]).unwrap();
        assert_eq!(subset.to_vec(), vec![2, 7, 10]);
        assert_eq!(subset.to_string(), "2, 7, 10");
        assert_eq!(ValveSubset::from_valves([11]), Err(InvalidValve(11)));
        assert_eq!(ValveSubset::from_valves([0]), Err(InvalidValve(0)));
        assert_eq!(subset.toggled(2).to_vec(), vec![7, 10]);
    }
}
