//! 발생기 운전에 필요한 가스 물성 표.
//! 몰질량은 GOST R 8.974-2019, 하한 폭발 농도(LEL)는 GOST R 52136-2003 값을 사용한다.

#[derive(Debug)]
pub struct GasData {
    pub formula: &'static str,
    /// 몰질량 [g/mol]
    pub molar_mass: f64,
    /// 하한 폭발 농도 [ppm]. 가연성이 아니면 `None`.
    pub lel_ppm: Option<f64>,
}

impl GasData {
    const fn new(formula: &'static str, molar_mass: f64, lel_ppm: Option<f64>) -> Self {
        Self {
            formula,
            molar_mass,
            lel_ppm,
        }
    }
}

/// 희석가스 기본값. 20 °C, 101.3 kPa에서의 몰부피 [L/mol].
#[derive(Debug)]
pub struct DiluentData {
    pub id: &'static str,
    pub molar_volume_l: f64,
}

/// 발생기 사용 설명서상 희석 가능한 성분 목록.
pub const GENERATOR_COMPONENTS: &[&str] = &[
    "NO", "NO2", "N2O", "NH3", "H2", "H2S", "SO2", "O2", "CO", "CO2", "CS2", "CH4", "C2H6",
    "C3H8", "C4H10", "C5H12", "C6H14", "CH3OH", "CH3SH", "CH3OCH3", "C2H5OH", "C2H4O",
];

const DILUENTS: &[DiluentData] = &[
    DiluentData {
        id: "air",
        molar_volume_l: 24.06,
    },
    DiluentData {
        id: "n2",
        molar_volume_l: 24.04,
    },
];

const GASES: &[GasData] = &[
    GasData::new("N2", 28.016, None),
    GasData::new("NH3", 17.031, Some(150_000.0)),
    GasData::new("Ar", 39.944, None),
    GasData::new("C2H2", 26.04, None),
    GasData::new("C3H6O", 58.08, None),
    GasData::new("C4H10", 58.12, Some(14_000.0)),
    GasData::new("C4H9OH", 74.12, None),
    GasData::new("H2O", 18.016, None),
    GasData::new("H2", 2.0156, Some(40_000.0)),
    GasData::new("air", 28.96, None),
    GasData::new("C6H14", 86.17, Some(10_000.0)),
    GasData::new("He", 4.003, None),
    GasData::new("C7H16", 100.19, None),
    GasData::new("CO2", 44.01, None),
    GasData::new("C10H22", 142.30, None),
    GasData::new("C12H10", 154.08, None),
    GasData::new("C12H10O", 168.8, None),
    GasData::new("CH2Cl2", 84.94, None),
    GasData::new("C4H10O", 74.12, None),
    GasData::new("N2O", 44.016, None),
    GasData::new("HJ", 127.93, None),
    GasData::new("O2", 32.0, None),
    GasData::new("Kr", 83.7, None),
    GasData::new("Xe", 131.3, None),
    GasData::new("CH4", 16.04, Some(44_000.0)),
    GasData::new("CH5N", 31.06, None),
    GasData::new("CH3OH", 32.04, Some(55_000.0)),
    GasData::new("Ne", 20.183, None),
    GasData::new("NOCl", 65.465, None),
    GasData::new("O3", 48.00, None),
    GasData::new("NO", 30.008, None),
    GasData::new("CO", 28.01, Some(100_000.0)),
    GasData::new("C8H18", 114.22, None),
    GasData::new("C5H12", 72.14, Some(14_000.0)),
    GasData::new("C3H8", 44.09, Some(17_000.0)),
    GasData::new("C3H6", 42.08, None),
    GasData::new("H2Se", 80.968, None),
    GasData::new("SO2", 64.06, None),
    GasData::new("SO3", 80.06, None),
    GasData::new("H2S", 34.08, Some(40_000.0)),
    GasData::new("PH3", 34.04, None),
    GasData::new("CF3Cl", 137.40, None),
    GasData::new("CF2Cl2", 120.92, None),
    GasData::new("CFCl3", 114.47, None),
    GasData::new("F2", 38.0, None),
    GasData::new("SiF4", 104.06, None),
    GasData::new("CH3F", 34.03, None),
    GasData::new("Cl2", 70.914, None),
    GasData::new("HCl", 36.465, None),
    GasData::new("CH3Cl", 50.49, None),
    GasData::new("CHCl3", 119.39, None),
    GasData::new("C2N2", 52.04, None),
    GasData::new("HCN", 27.026, None),
    GasData::new("C2H6", 30.07, Some(25_000.0)),
    GasData::new("C2H7N", 45.08, None),
    GasData::new("C2H4", 28.05, None),
    GasData::new("C2H5OH", 46.069, Some(31_000.0)),
    GasData::new("C2H5Cl", 64.52, None),
    GasData::new("CH3SH", 48.11, Some(41_000.0)),
    GasData::new("CS2", 76.1407, Some(600_000.0)),
    GasData::new("CH3OCH3", 46.069, None),
    GasData::new("C2H4O", 44.053, Some(40_000.0)),
    GasData::new("NO2", 46.0055, None),
];

/// 화학식으로 가스를 찾는다. 대소문자는 구분하지 않는다.
pub fn find_gas(formula: &str) -> Option<&'static GasData> {
    let formula = formula.trim();
    GASES
        .iter()
        .find(|g| g.formula.eq_ignore_ascii_case(formula))
}

pub fn is_generator_component(formula: &str) -> bool {
    let formula = formula.trim();
    GENERATOR_COMPONENTS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(formula))
}

pub fn find_diluent(id: &str) -> Option<&'static DiluentData> {
    let id = id.trim();
    DILUENTS.iter().find(|d| d.id.eq_ignore_ascii_case(id))
}
