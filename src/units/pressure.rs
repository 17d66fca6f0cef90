use serde::{Deserialize, Serialize};

/// 주위 압력 단위. 내부 기준은 항상 kPa(절대압)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    KiloPascal,
    Pascal,
    HectoPascal,
    Bar,
    MmHg,
    Atm,
    Psi,
}

const KPA_PER_ATM: f64 = 101.325;
const MMHG_PER_KPA: f64 = 7.500_62;
const KPA_PER_PSI: f64 = 6.894_76;

impl PressureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::KiloPascal => "kPa",
            PressureUnit::Pascal => "Pa",
            PressureUnit::HectoPascal => "hPa",
            PressureUnit::Bar => "bar",
            PressureUnit::MmHg => "mmHg",
            PressureUnit::Atm => "atm",
            PressureUnit::Psi => "psi",
        }
    }
}

/// 주어진 압력을 kPa(abs)로 변환한다.
pub fn to_kpa(value: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::KiloPascal => value,
        PressureUnit::Pascal => value / 1000.0,
        PressureUnit::HectoPascal => value / 10.0,
        PressureUnit::Bar => value * 100.0,
        PressureUnit::MmHg => value / MMHG_PER_KPA,
        PressureUnit::Atm => value * KPA_PER_ATM,
        PressureUnit::Psi => value * KPA_PER_PSI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmhg_atmosphere_is_about_101_kpa() {
        let kpa = to_kpa(760.0, PressureUnit::MmHg);
        assert!((kpa - 101.325).abs() < 0.01, "kpa={kpa}");
        assert!((to_kpa(1.0, PressureUnit::Atm) - to_kpa(1.01325, PressureUnit::Bar)).abs() < 1e-9);
    }
}
