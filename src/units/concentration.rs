use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 1 % 에 해당하는 ppm.
pub const PPM_PER_PERCENT: f64 = 10_000.0;

/// 농도 단위. 내부 기준은 ppm(체적 기준)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcentrationUnit {
    Ppm,
    Percent,
    /// 질량 농도 mg/m³. 성분 몰질량과 희석가스 몰부피가 있어야 환산 가능하다.
    MgPerM3,
}

impl ConcentrationUnit {
    pub const ALL: [ConcentrationUnit; 3] = [
        ConcentrationUnit::Ppm,
        ConcentrationUnit::Percent,
        ConcentrationUnit::MgPerM3,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ConcentrationUnit::Ppm => "ppm",
            ConcentrationUnit::Percent => "%",
            ConcentrationUnit::MgPerM3 => "mg/m3",
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ConcentrationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ppm" => Ok(ConcentrationUnit::Ppm),
            "%" | "percent" | "vol%" | "% vol" => Ok(ConcentrationUnit::Percent),
            "mg/m3" | "mg/m^3" | "mg/m³" | "mgm3" => Ok(ConcentrationUnit::MgPerM3),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("PPM".parse(), Ok(ConcentrationUnit::Ppm));
        assert_eq!(" % ".parse(), Ok(ConcentrationUnit::Percent));
        assert_eq!("MG/M^3".parse(), Ok(ConcentrationUnit::MgPerM3));
        assert!("ppb".parse::<ConcentrationUnit>().is_err());
    }
}
