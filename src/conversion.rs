use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gas_db;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
    /// 몰질량을 모르는 성분 (mg/m³ 환산 불가)
    #[error("알 수 없는 가스: {0}")]
    UnknownGas(String),
    /// 몰부피를 모르는 희석가스
    #[error("알 수 없는 희석가스: {0}")]
    UnknownDiluent(String),
    /// 환산 조건(온도/압력)이 물리적으로 불가능함
    #[error("잘못된 환산 조건: {0}")]
    InvalidConditions(&'static str),
}

/// 질량 농도 환산에 쓰는 온도/압력 조건. 기본값은 20 °C, 101.3 kPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub temperature_c: f64,
    pub pressure_kpa: f64,
}

/// 몰부피 기준 조건(사용 설명서의 20 °C, 101.3 kPa).
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;
pub const REFERENCE_PRESSURE_KPA: f64 = 101.3;

impl Default for Conditions {
    fn default() -> Self {
        Self {
            temperature_c: REFERENCE_TEMPERATURE_C,
            pressure_kpa: REFERENCE_PRESSURE_KPA,
        }
    }
}

impl Conditions {
    /// 임의 단위의 온도/압력으로부터 조건을 만든다.
    pub fn from_units(
        temperature: f64,
        temperature_unit: TemperatureUnit,
        pressure: f64,
        pressure_unit: PressureUnit,
    ) -> Self {
        Self {
            temperature_c: temperature::to_celsius(temperature, temperature_unit),
            pressure_kpa: pressure::to_kpa(pressure, pressure_unit),
        }
    }
}

/// 농도 환산에 필요한 성분/희석가스 정보.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionContext {
    pub component: String,
    /// 성분 몰질량 [g/mol]. 모르면 ppm/% 사이 환산만 가능하다.
    pub molar_mass: Option<f64>,
    /// 희석가스의 기준 조건 몰부피 [L/mol]
    pub molar_volume_l: f64,
    pub conditions: Conditions,
}

impl ConversionContext {
    /// 가스 물성표에서 성분과 희석가스를 찾아 컨텍스트를 만든다.
    pub fn for_gas(
        component: &str,
        diluent: &str,
        conditions: Conditions,
    ) -> Result<Self, ConversionError> {
        let diluent_data = gas_db::find_diluent(diluent)
            .ok_or_else(|| ConversionError::UnknownDiluent(diluent.to_string()))?;
        Ok(Self {
            component: component.to_string(),
            molar_mass: gas_db::find_gas(component).map(|g| g.molar_mass),
            molar_volume_l: diluent_data.molar_volume_l,
            conditions,
        })
    }

    /// 운전 조건에서의 희석가스 몰부피 [L/mol].
    pub fn molar_volume_at_conditions(&self) -> Result<f64, ConversionError> {
        let c = self.conditions;
        if !(c.pressure_kpa.is_finite() && c.pressure_kpa > 0.0) {
            return Err(ConversionError::InvalidConditions("압력은 0보다 커야 합니다"));
        }
        // 사용 설명서 식은 절대온도를 273 + t 로 근사한다.
        if !(c.temperature_c.is_finite() && c.temperature_c > -273.0) {
            return Err(ConversionError::InvalidConditions(
                "온도가 절대영도 이하입니다",
            ));
        }
        Ok(self.molar_volume_l * (273.0 + c.temperature_c) / (273.0 + REFERENCE_TEMPERATURE_C)
            * REFERENCE_PRESSURE_KPA
            / c.pressure_kpa)
    }

    /// 1 단위가 몇 ppm 인지를 반환한다.
    fn ppm_factor(&self, unit: ConcentrationUnit) -> Result<f64, ConversionError> {
        match unit {
            ConcentrationUnit::Ppm => Ok(1.0),
            ConcentrationUnit::Percent => Ok(PPM_PER_PERCENT),
            ConcentrationUnit::MgPerM3 => {
                let m = self
                    .molar_mass
                    .ok_or_else(|| ConversionError::UnknownGas(self.component.clone()))?;
                Ok(self.molar_volume_at_conditions()? / m)
            }
        }
    }
}

/// 농도를 지정된 단위로 환산한다. 같은 단위면 값을 그대로 돌려준다.
pub fn convert_concentration(
    value: f64,
    from: ConcentrationUnit,
    to: ConcentrationUnit,
    ctx: &ConversionContext,
) -> Result<f64, ConversionError> {
    if from == to {
        return Ok(value);
    }
    Ok(value * ctx.ppm_factor(from)? / ctx.ppm_factor(to)?)
}

/// ppm 값으로 환산한다.
pub fn to_ppm(
    value: f64,
    unit: ConcentrationUnit,
    ctx: &ConversionContext,
) -> Result<f64, ConversionError> {
    convert_concentration(value, unit, ConcentrationUnit::Ppm, ctx)
}

/// ppm 값을 원하는 단위로 환산한다.
pub fn from_ppm(
    value_ppm: f64,
    unit: ConcentrationUnit,
    ctx: &ConversionContext,
) -> Result<f64, ConversionError> {
    convert_concentration(value_ppm, ConcentrationUnit::Ppm, unit, ctx)
}

/// 단위 문자열을 enum으로 변환한다.
pub fn parse_concentration_unit(s: &str) -> Result<ConcentrationUnit, ConversionError> {
    s.parse().map_err(ConversionError::UnknownUnit)
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `ppm`, `%`, `mg/m3`, `mg/m^3` 등을 사용할 수 있다.
pub fn convert(
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
    ctx: &ConversionContext,
) -> Result<f64, ConversionError> {
    let from = parse_concentration_unit(from_unit_str)?;
    let to = parse_concentration_unit(to_unit_str)?;
    convert_concentration(value, from, to, ctx)
}
