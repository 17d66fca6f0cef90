use thiserror::Error;

use crate::calculation::CalcError;
use crate::config::Config;
use crate::conversion;
use crate::i18n::{self, Translator};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일/콘솔 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] crate::config::ConfigError),
    /// 단위 변환 오류
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] conversion::ConversionError),
    /// 밸브 조합 계산 오류
    #[error("계산 오류: {0}")]
    Calc(#[from] CalcError),
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
///
/// 계산 오류는 메뉴 하나의 실패로 보고하고 루프를 계속한다. 입출력/설정 저장 오류만 종료한다.
pub fn run(config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    loop {
        let outcome = match ui_cli::main_menu(tr)? {
            MenuChoice::SelectForTarget => ui_cli::handle_select(tr, config),
            MenuChoice::ManualValves => ui_cli::handle_manual(tr, config),
            MenuChoice::Bounds => ui_cli::handle_bounds(tr, config),
            MenuChoice::UnitConversion => ui_cli::handle_unit_conversion(tr, config),
            MenuChoice::Components => {
                ui_cli::print_components();
                Ok(())
            }
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config)?;
                config.save()?;
                println!("{}", tr.t(i18n::keys::SETTINGS_SAVED));
                Ok(())
            }
            MenuChoice::Exit => {
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        };
        match outcome {
            Ok(()) => {}
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => {
                log::error!("{e}");
                println!("{}: {e}", tr.t(i18n::keys::ERROR_PREFIX));
            }
        }
    }
    Ok(())
}
