use std::io::{self, Write};

use crate::app::AppError;
use crate::calculation::{self, CalculationReport, CalculationRequest, ManualRequest};
use crate::config::Config;
use crate::conversion;
use crate::gas_db;
use crate::generator::{self, InvalidValve, RangeStatus, ValveSubset};
use crate::i18n::{keys, Translator};
use crate::units::ConcentrationUnit;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SelectForTarget,
    ManualValves,
    Bounds,
    UnitConversion,
    Components,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_SELECT,
        keys::MAIN_MENU_MANUAL,
        keys::MAIN_MENU_BOUNDS,
        keys::MAIN_MENU_CONVERSION,
        keys::MAIN_MENU_COMPONENTS,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::SelectForTarget),
            "2" => return Ok(MenuChoice::ManualValves),
            "3" => return Ok(MenuChoice::Bounds),
            "4" => return Ok(MenuChoice::UnitConversion),
            "5" => return Ok(MenuChoice::Components),
            "6" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 희석가스/성분/원료 농도 입력을 모아둔다.
struct SourceInput {
    diluent: String,
    component: String,
    conc: f64,
    unit: ConcentrationUnit,
}

fn read_source(tr: &Translator, cfg: &Config) -> Result<SourceInput, AppError> {
    let diluents: Vec<&str> = cfg.diluent_ids().collect();
    let diluent = read_with_default(
        &format!("{} [{}]", tr.t(keys::PROMPT_DILUENT), diluents.join("/")),
        &cfg.default_diluent,
    )?;
    let component = read_with_default(&tr.t(keys::PROMPT_COMPONENT), &cfg.default_component)?;
    let conc = read_f64(tr, &tr.t(keys::PROMPT_SOURCE_CONC))?;
    let unit = read_unit(tr, cfg.default_source_unit)?;
    Ok(SourceInput {
        diluent,
        component,
        conc,
        unit,
    })
}

/// 목표 농도 기준 밸브 조합 계산 메뉴.
pub fn handle_select(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let src = read_source(tr, cfg)?;
    let target_conc = read_f64(tr, &tr.t(keys::PROMPT_TARGET_CONC))?;
    let target_unit = read_unit(tr, cfg.default_target_unit)?;
    let report = calculation::calculate(
        &CalculationRequest {
            diluent: src.diluent,
            component: src.component,
            source_conc: src.conc,
            source_unit: src.unit,
            target_conc,
            target_unit,
        },
        cfg,
    )?;
    print_report(tr, &report);
    Ok(())
}

/// 밸브를 직접 지정해 농도를 계산하는 메뉴.
pub fn handle_manual(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let src = read_source(tr, cfg)?;
    let valves = loop {
        let s = read_line(&tr.t(keys::PROMPT_VALVES))?;
        match parse_valves(&s) {
            Ok(v) => break v,
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_VALVES)),
        }
    };
    let result_unit = read_unit(tr, cfg.default_target_unit)?;
    let report = calculation::recalculate(
        &ManualRequest {
            diluent: src.diluent,
            component: src.component,
            source_conc: src.conc,
            source_unit: src.unit,
            valves,
            result_unit,
        },
        cfg,
    )?;
    print_report(tr, &report);
    Ok(())
}

/// 원료 농도에 대한 최소/최대 출구 농도를 보여준다.
pub fn handle_bounds(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let src = read_source(tr, cfg)?;
    let set = cfg.coefficient_set(&src.diluent)?;
    let ctx = cfg.conversion_context(&src.component, &src.diluent)?;
    let source_ppm = conversion::to_ppm(src.conc, src.unit, &ctx)?;
    let bounds = generator::bounds(&set, source_ppm).map_err(calculation::CalcError::from)?;
    println!(
        "{} {:.4} … {:.4} ppm (min: [{}], max: [{}])",
        tr.t(keys::RESULT_BOUNDS),
        calculation::round_for_display(bounds.min),
        calculation::round_for_display(bounds.max),
        set.min_valve(),
        ValveSubset::all()
    );
    Ok(())
}

/// 농도 단위 변환 메뉴를 처리한다.
pub fn handle_unit_conversion(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let diluent = read_with_default(&tr.t(keys::PROMPT_DILUENT), &cfg.default_diluent)?;
    let component = read_with_default(&tr.t(keys::PROMPT_COMPONENT), &cfg.default_component)?;
    let value = read_f64(tr, &tr.t(keys::PROMPT_VALUE))?;
    let from_unit = read_line(&tr.t(keys::PROMPT_FROM_UNIT))?;
    let to_unit = read_line(&tr.t(keys::PROMPT_TO_UNIT))?;
    let ctx = cfg.conversion_context(&component, &diluent)?;
    let result = conversion::convert(value, from_unit.trim(), to_unit.trim(), &ctx)?;
    println!(
        "{} {} {}",
        tr.t(keys::RESULT_CONVERTED),
        calculation::round_for_display(result),
        to_unit.trim()
    );
    Ok(())
}

/// 희석 가능한 성분 목록을 몰질량/LEL과 함께 출력한다.
pub fn print_components() {
    println!("{:<10} {:>10} {:>12}", "formula", "M [g/mol]", "LEL [ppm]");
    for formula in gas_db::GENERATOR_COMPONENTS {
        if let Some(gas) = gas_db::find_gas(formula) {
            let lel = gas
                .lel_ppm
                .map(|v| format!("{v:.0}"))
                .unwrap_or_else(|| "-".to_string());
            println!("{:<10} {:>10.4} {:>12}", gas.formula, gas.molar_mass, lel);
        }
    }
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "language={}, diluent={}, component={}, T={} {}, P={} {}",
        cfg.language,
        cfg.default_diluent,
        cfg.default_component,
        cfg.conditions.temperature,
        cfg.conditions.temperature_unit.symbol(),
        cfg.conditions.pressure,
        cfg.conditions.pressure_unit.symbol()
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.trim() {
        "" => {}
        "1" => cfg.language = read_with_default("auto/ko/en", &cfg.language)?,
        "2" => {
            let id = read_with_default(&tr.t(keys::PROMPT_DILUENT), &cfg.default_diluent)?;
            if cfg.coefficient_set(&id).is_ok() {
                cfg.default_diluent = id;
            } else {
                println!("{}", tr.t(keys::SETTINGS_INVALID));
            }
        }
        "3" => {
            let c = read_with_default(&tr.t(keys::PROMPT_COMPONENT), &cfg.default_component)?;
            if gas_db::is_generator_component(&c) {
                cfg.default_component = c;
            } else {
                println!("{}", tr.t(keys::SETTINGS_INVALID));
            }
        }
        "4" => {
            cfg.conditions.temperature = read_f64(tr, "°C: ")?;
            cfg.conditions.temperature_unit = crate::units::TemperatureUnit::Celsius;
        }
        "5" => {
            cfg.conditions.pressure = read_f64(tr, "kPa: ")?;
            cfg.conditions.pressure_unit = crate::units::PressureUnit::KiloPascal;
        }
        _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
    }
    Ok(())
}

/// 계산 보고서를 출력한다.
pub fn print_report(tr: &Translator, report: &CalculationReport) {
    println!("{} [{}]", tr.t(keys::RESULT_VALVES), report.valves);
    println!("{} {:.6}", tr.t(keys::RESULT_RATIO), report.combined_ratio);
    println!(
        "{} {} {} ({} ppm)",
        tr.t(keys::RESULT_CONC),
        report.rounded_result(),
        report.result_unit,
        calculation::round_for_display(report.corrected_ppm())
    );
    if report.correction_ppm != 0.0 {
        println!("{} +{} ppm", tr.t(keys::RESULT_CORRECTION), report.correction_ppm);
    }
    println!(
        "{} {} … {} ppm",
        tr.t(keys::RESULT_BOUNDS),
        calculation::round_for_display(report.bounds.min),
        calculation::round_for_display(report.bounds.max)
    );
    match report.range {
        RangeStatus::Ok => {}
        RangeStatus::BelowMin => println!("({})", tr.t(keys::RANGE_BELOW_MIN)),
        RangeStatus::AboveMax => println!("({})", tr.t(keys::RANGE_ABOVE_MAX)),
    }
    for w in &report.warnings {
        println!("{}: {w}", tr.t(keys::WARNING_PREFIX));
    }
}

/// "1 3 7", "1,3,7" 같은 입력을 밸브 집합으로 변환한다.
pub fn parse_valves(s: &str) -> Result<ValveSubset, InvalidValve> {
    let mut valves = Vec::new();
    for token in s.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let v = token.parse::<u32>().map_err(|_| InvalidValve(0))?;
        valves.push(v);
    }
    ValveSubset::from_valves(valves)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

fn read_with_default(prompt: &str, default: &str) -> Result<String, AppError> {
    let s = read_line(&format!("{prompt} ({default}): "))?;
    let s = s.trim();
    Ok(if s.is_empty() {
        default.to_string()
    } else {
        s.to_string()
    })
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_unit(tr: &Translator, default: ConcentrationUnit) -> Result<ConcentrationUnit, AppError> {
    loop {
        let s = read_with_default(&tr.t(keys::PROMPT_UNIT), default.symbol())?;
        match conversion::parse_concentration_unit(&s) {
            Ok(u) => return Ok(u),
            Err(_) => println!("{}", tr.t(keys::ERROR_UNKNOWN_UNIT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valves_accepts_commas_and_spaces() {
        assert_eq!(parse_valves("3, 1 7").unwrap().to_vec(), vec![1, 3, 7]);
        assert!(parse_valves("").unwrap().is_empty());
        assert!(parse_valves("1 x").is_err());
        assert_eq!(parse_valves("12"), Err(InvalidValve(12)));
    }
}
