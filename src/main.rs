use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gas_dilution_toolbox::{
    app, calculation, config, conversion, generator, i18n, logging, ui_cli,
    units::ConcentrationUnit,
};

/// 10밸브 가스 희석 발생기의 밸브 조합/농도 계산기.
#[derive(Debug, Parser)]
#[command(name = "gas_dilution_toolbox_cli", version, about)]
struct Cli {
    /// 설정 파일 경로 (기본: ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// 언어 (auto, ko, en)
    #[arg(long, short = 'L', global = true, default_value = "auto")]
    lang: String,
    /// 로그 레벨 (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Args)]
struct SourceArgs {
    /// 희석가스 id (설정의 diluents 키)
    #[arg(long, short)]
    diluent: Option<String>,
    /// 성분 화학식
    #[arg(long, short)]
    component: Option<String>,
    /// 원료 농도
    #[arg(long, short)]
    source: f64,
    /// 원료 농도 단위
    #[arg(long, value_parser = parse_unit)]
    source_unit: Option<ConcentrationUnit>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 목표 농도에 가장 가까운 밸브 조합을 계산한다.
    Select {
        #[command(flatten)]
        src: SourceArgs,
        /// 목표 농도
        #[arg(long, short)]
        target: f64,
        #[arg(long, value_parser = parse_unit)]
        target_unit: Option<ConcentrationUnit>,
    },
    /// 지정한 밸브 조합의 출구 농도를 계산한다.
    Valves {
        #[command(flatten)]
        src: SourceArgs,
        /// 열린 밸브 번호 (예: 1,3,7)
        #[arg(value_delimiter = ',')]
        valves: Vec<u32>,
        #[arg(long, value_parser = parse_unit)]
        unit: Option<ConcentrationUnit>,
    },
    /// 달성 가능한 최소/최대 출구 농도를 출력한다.
    Bounds {
        #[command(flatten)]
        src: SourceArgs,
    },
    /// 농도 단위를 변환한다.
    Convert {
        value: f64,
        #[arg(value_parser = parse_unit)]
        from: ConcentrationUnit,
        #[arg(value_parser = parse_unit)]
        to: ConcentrationUnit,
        #[arg(long, short)]
        component: Option<String>,
        #[arg(long, short)]
        diluent: Option<String>,
    },
    /// 희석 가능한 성분 목록을 출력한다.
    Components,
    /// 설정된 희석가스와 여권 계수를 출력한다.
    Diluents,
}

fn parse_unit(s: &str) -> Result<ConcentrationUnit, String> {
    conversion::parse_concentration_unit(s).map_err(|e| e.to_string())
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());
    if let Err(err) = try_run(cli) {
        log::error!("{err}");
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), app::AppError> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_or_default_at(path)?,
        None => config::load_or_default()?,
    };
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    let Some(command) = cli.command else {
        return app::run(&mut cfg, &tr);
    };
    match command {
        Command::Select {
            src,
            target,
            target_unit,
        } => {
            let req = calculation::CalculationRequest {
                diluent: src.diluent.unwrap_or_else(|| cfg.default_diluent.clone()),
                component: src.component.unwrap_or_else(|| cfg.default_component.clone()),
                source_conc: src.source,
                source_unit: src.source_unit.unwrap_or(cfg.default_source_unit),
                target_conc: target,
                target_unit: target_unit.unwrap_or(cfg.default_target_unit),
            };
            let report = calculation::calculate(&req, &cfg)?;
            ui_cli::print_report(&tr, &report);
        }
        Command::Valves { src, valves, unit } => {
            let valves = calculation::valves_from_numbers(valves)?;
            let req = calculation::ManualRequest {
                diluent: src.diluent.unwrap_or_else(|| cfg.default_diluent.clone()),
                component: src.component.unwrap_or_else(|| cfg.default_component.clone()),
                source_conc: src.source,
                source_unit: src.source_unit.unwrap_or(cfg.default_source_unit),
                valves,
                result_unit: unit.unwrap_or(cfg.default_target_unit),
            };
            let report = calculation::recalculate(&req, &cfg)?;
            ui_cli::print_report(&tr, &report);
        }
        Command::Bounds { src } => {
            let diluent = src.diluent.unwrap_or_else(|| cfg.default_diluent.clone());
            let component = src.component.unwrap_or_else(|| cfg.default_component.clone());
            let set = cfg.coefficient_set(&diluent)?;
            let ctx = cfg.conversion_context(&component, &diluent)?;
            let unit = src.source_unit.unwrap_or(cfg.default_source_unit);
            let source_ppm = conversion::to_ppm(src.source, unit, &ctx)?;
            let bounds = generator::bounds(&set, source_ppm).map_err(calculation::CalcError::from)?;
            println!(
                "min {} ppm (valve {}), max {} ppm (valves 1-10)",
                calculation::round_for_display(bounds.min),
                set.min_valve(),
                calculation::round_for_display(bounds.max)
            );
        }
        Command::Convert {
            value,
            from,
            to,
            component,
            diluent,
        } => {
            let component = component.unwrap_or_else(|| cfg.default_component.clone());
            let diluent = diluent.unwrap_or_else(|| cfg.default_diluent.clone());
            let ctx = cfg.conversion_context(&component, &diluent)?;
            let result = conversion::convert_concentration(value, from, to, &ctx)?;
            println!("{} {}", calculation::round_for_display(result), to);
        }
        Command::Components => ui_cli::print_components(),
        Command::Diluents => {
            for (id, table) in &cfg.diluents {
                let passport: Vec<String> = table.passport.iter().map(|k| k.to_string()).collect();
                println!("{id}: {}", passport.join(", "));
            }
        }
    }
    Ok(())
}
