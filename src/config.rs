use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::conversion::{Conditions, ConversionContext, ConversionError};
use crate::gas_db;
use crate::generator::{CoefficientError, CoefficientSet};
use crate::units::*;

const DEFAULT_PATH: &str = "config.toml";

/// 희석가스 하나에 대한 설정. 여권 계수 10개는 밸브 1..10 순서이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiluentConfig {
    pub passport: Vec<f64>,
    /// 20 °C, 101.3 kPa 몰부피 [L/mol]. 없으면 내장 표를 사용한다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molar_volume_l: Option<f64>,
}

/// mg/m³ 환산 시 사용할 온도/압력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingConditions {
    pub temperature: f64,
    pub temperature_unit: TemperatureUnit,
    pub pressure: f64,
    pub pressure_unit: PressureUnit,
}

impl Default for OperatingConditions {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            temperature_unit: TemperatureUnit::Celsius,
            pressure: 101.3,
            pressure_unit: PressureUnit::KiloPascal,
        }
    }
}

impl OperatingConditions {
    pub fn to_conditions(&self) -> Conditions {
        Conditions::from_units(
            self.temperature,
            self.temperature_unit,
            self.pressure,
            self.pressure_unit,
        )
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/ko/en)
    pub language: String,
    /// 외부 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    pub default_component: String,
    pub default_diluent: String,
    pub default_source_unit: ConcentrationUnit,
    pub default_target_unit: ConcentrationUnit,
    pub conditions: OperatingConditions,
    pub diluents: BTreeMap<String, DiluentConfig>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// 공칭 여권 계수. 실제 장비의 여권 값으로 교체해야 한다.
const NOMINAL_AIR: [f64; 10] = [
    1996.0, 1004.0, 501.5, 251.2, 100.6, 50.3, 20.1, 10.05, 5.02, 2.51,
];
const NOMINAL_N2: [f64; 10] = [
    1998.0, 1001.0, 500.8, 250.4, 100.2, 50.1, 20.04, 10.02, 5.01, 2.505,
];

impl Default for Config {
    fn default() -> Self {
        let mut diluents = BTreeMap::new();
        diluents.insert(
            "air".to_string(),
            DiluentConfig {
                passport: NOMINAL_AIR.to_vec(),
                molar_volume_l: None,
            },
        );
        diluents.insert(
            "n2".to_string(),
            DiluentConfig {
                passport: NOMINAL_N2.to_vec(),
                molar_volume_l: None,
            },
        );
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            default_component: "CO".to_string(),
            default_diluent: "air".to_string(),
            default_source_unit: ConcentrationUnit::Ppm,
            default_target_unit: ConcentrationUnit::Ppm,
            conditions: OperatingConditions::default(),
            diluents,
            path: None,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 여권 계수표가 잘못됨
    #[error("희석가스 '{diluent}' 계수 오류: {source}")]
    Coefficients {
        diluent: String,
        source: CoefficientError,
    },
    /// 설정에 없는 희석가스
    #[error("설정에 없는 희석가스: {0}")]
    UnknownDiluent(String),
}

/// 현재 디렉터리의 config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_at(Path::new(DEFAULT_PATH))
}

/// 지정한 경로의 설정을 로드하거나 없으면 기본 설정을 생성해 저장한다.
pub fn load_or_default_at(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load_from(path)
    } else {
        log::info!("{} not found; writing defaults", path.display());
        let mut cfg = Config::default();
        cfg.path = Some(path.to_path_buf());
        cfg.save()?;
        Ok(cfg)
    }
}

/// 설정 파일을 읽고 계수표를 검증한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = toml::from_str(&content)?;
    cfg.validate()?;
    cfg.path = Some(path.to_path_buf());
    log::debug!(
        "loaded {} ({} diluents)",
        path.display(),
        cfg.diluents.len()
    );
    Ok(cfg)
}

/// 여권 계수 파일(희석가스 id → 계수 10개)을 읽는다. GUI 가져오기에서 사용한다.
pub fn load_passport_file(path: &Path) -> Result<BTreeMap<String, DiluentConfig>, ConfigError> {
    let content = fs::read_to_string(path)?;
    let tables: BTreeMap<String, DiluentConfig> = toml::from_str(&content)?;
    for (id, table) in &tables {
        check_diluent(id, table)?;
    }
    Ok(tables)
}

fn check_diluent(id: &str, table: &DiluentConfig) -> Result<CoefficientSet, ConfigError> {
    CoefficientSet::from_passport(&table.passport).map_err(|source| ConfigError::Coefficients {
        diluent: id.to_string(),
        source,
    })
}

impl Config {
    /// 모든 희석가스 계수표를 검증한다. 계수 오류는 여기서 거부된다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (id, table) in &self.diluents {
            check_diluent(id, table)?;
        }
        Ok(())
    }

    /// 설정을 로드한 경로(없으면 config.toml)에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn diluent_ids(&self) -> impl Iterator<Item = &str> {
        self.diluents.keys().map(String::as_str)
    }

    /// 희석가스의 계수표를 탐색용 비율로 변환해 반환한다.
    pub fn coefficient_set(&self, diluent: &str) -> Result<CoefficientSet, ConfigError> {
        let (id, table) = self
            .diluents
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(diluent.trim()))
            .ok_or_else(|| ConfigError::UnknownDiluent(diluent.to_string()))?;
        check_diluent(id, table)
    }

    /// 성분/희석가스/운전 조건으로 농도 환산 컨텍스트를 만든다.
    pub fn conversion_context(
        &self,
        component: &str,
        diluent: &str,
    ) -> Result<ConversionContext, ConversionError> {
        let override_volume = self
            .diluents
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(diluent.trim()))
            .and_then(|(_, d)| d.molar_volume_l);
        let molar_volume_l = match override_volume {
            Some(v) => v,
            None => {
                gas_db::find_diluent(diluent)
                    .ok_or_else(|| ConversionError::UnknownDiluent(diluent.to_string()))?
                    .molar_volume_l
            }
        };
        Ok(ConversionContext {
            component: component.trim().to_string(),
            molar_mass: gas_db::find_gas(component).map(|g| g.molar_mass),
            molar_volume_l,
            conditions: self.conditions.to_conditions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        let set = cfg.coefficient_set("AIR").unwrap();
        assert_eq!(set.min_valve(), 1);
    }

    #[test]
    fn unknown_diluent_is_reported() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.coefficient_set("ar"),
            Err(ConfigError::UnknownDiluent(_))
        ));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("language = \"en\"\n").unwrap();
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.default_diluent, "air");
        assert_eq!(cfg.diluents.len(), 2);
    }
}
