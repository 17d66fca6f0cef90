use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// 로그 시스템을 초기화한다.
///
/// `level`이 없거나 해석할 수 없으면 `RUST_LOG`, 그것도 없으면 `warn`을 사용한다.
/// 대화형 CLI 출력과 섞이지 않도록 stderr로 기록한다.
pub fn init_logging(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Warn);

    let result = Builder::new()
        .filter_level(log_level)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if result.is_ok() {
        log::debug!("logging initialised (level: {log_level})");
    }
}
