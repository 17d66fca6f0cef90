use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const WARNING_PREFIX: &str = "general.warning_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_SELECT: &str = "main_menu.select";
    pub const MAIN_MENU_MANUAL: &str = "main_menu.manual";
    pub const MAIN_MENU_BOUNDS: &str = "main_menu.bounds";
    pub const MAIN_MENU_CONVERSION: &str = "main_menu.conversion";
    pub const MAIN_MENU_COMPONENTS: &str = "main_menu.components";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const PROMPT_DILUENT: &str = "prompt.diluent";
    pub const PROMPT_COMPONENT: &str = "prompt.component";
    pub const PROMPT_SOURCE_CONC: &str = "prompt.source_conc";
    pub const PROMPT_TARGET_CONC: &str = "prompt.target_conc";
    pub const PROMPT_UNIT: &str = "prompt.unit";
    pub const PROMPT_VALVES: &str = "prompt.valves";
    pub const PROMPT_VALUE: &str = "prompt.value";
    pub const PROMPT_FROM_UNIT: &str = "prompt.from_unit";
    pub const PROMPT_TO_UNIT: &str = "prompt.to_unit";

    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_INVALID_VALVES: &str = "error.invalid_valves";
    pub const ERROR_UNKNOWN_UNIT: &str = "error.unknown_unit";

    pub const RESULT_VALVES: &str = "result.valves";
    pub const RESULT_CONC: &str = "result.conc";
    pub const RESULT_RATIO: &str = "result.ratio";
    pub const RESULT_BOUNDS: &str = "result.bounds";
    pub const RESULT_CORRECTION: &str = "result.correction";
    pub const RESULT_CONVERTED: &str = "result.converted";
    pub const RANGE_BELOW_MIN: &str = "range.below_min";
    pub const RANGE_ABOVE_MAX: &str = "range.above_max";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const GUI_DILUENT: &str = "gui.diluent";
    pub const GUI_COMPONENT: &str = "gui.component";
    pub const GUI_SOURCE: &str = "gui.source";
    pub const GUI_TARGET: &str = "gui.target";
    pub const GUI_CALCULATE: &str = "gui.calculate";
    pub const GUI_VALVES: &str = "gui.valves";
    pub const GUI_RESULT: &str = "gui.result";
    pub const GUI_LOG: &str = "gui.log";
    pub const GUI_CLEAR_LOG: &str = "gui.clear_log";
    pub const GUI_EXPORT_LOG: &str = "gui.export_log";
    pub const GUI_IMPORT_PASSPORT: &str = "gui.import_passport";
    pub const GUI_SETTINGS: &str = "gui.settings";
    pub const GUI_LANGUAGE: &str = "gui.language";
    pub const GUI_CONDITIONS: &str = "gui.conditions";
    pub const GUI_SAVE: &str = "gui.save";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides
            .as_ref()
            .and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 순으로 찾는다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let text = match self.lang {
            Language::Ko => ko(key),
            Language::En => en(key),
        };
        text.to_string()
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content);
    if map.is_none() {
        log::warn!("language pack {} is empty or invalid", path.display());
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        WARNING_PREFIX => "경고",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 가스 희석 발생기 계산기 ===",
        MAIN_MENU_SELECT => "1) 목표 농도로 밸브 조합 계산",
        MAIN_MENU_MANUAL => "2) 밸브 조합으로 농도 계산",
        MAIN_MENU_BOUNDS => "3) 달성 가능한 농도 범위",
        MAIN_MENU_CONVERSION => "4) 농도 단위 변환",
        MAIN_MENU_COMPONENTS => "5) 성분 목록",
        MAIN_MENU_SETTINGS => "6) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        PROMPT_DILUENT => "희석가스",
        PROMPT_COMPONENT => "성분",
        PROMPT_SOURCE_CONC => "원료 농도: ",
        PROMPT_TARGET_CONC => "목표 농도: ",
        PROMPT_UNIT => "단위 (ppm, %, mg/m3)",
        PROMPT_VALVES => "열린 밸브 번호 (예: 1 3 7, 없으면 엔터): ",
        PROMPT_VALUE => "값 입력: ",
        PROMPT_FROM_UNIT => "입력 단위 (ppm, %, mg/m3): ",
        PROMPT_TO_UNIT => "변환 단위 (ppm, %, mg/m3): ",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        ERROR_INVALID_VALVES => "밸브 번호는 1~10 사이여야 합니다.",
        ERROR_UNKNOWN_UNIT => "알 수 없는 단위입니다.",
        RESULT_VALVES => "열린 밸브:",
        RESULT_CONC => "출구 농도:",
        RESULT_RATIO => "결합 비율:",
        RESULT_BOUNDS => "달성 가능 범위:",
        RESULT_CORRECTION => "H2S 보정:",
        RESULT_CONVERTED => "변환 결과:",
        RANGE_BELOW_MIN => "최소 농도 미만",
        RANGE_ABOVE_MAX => "최대 농도 초과",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_OPTIONS => "1) 언어  2) 기본 희석가스  3) 기본 성분  4) 환산 온도 [°C]  5) 환산 압력 [kPa]",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정을 저장했습니다.",
        GUI_DILUENT => "희석가스",
        GUI_COMPONENT => "성분",
        GUI_SOURCE => "원료 농도",
        GUI_TARGET => "목표 농도",
        GUI_CALCULATE => "계산",
        GUI_VALVES => "밸브",
        GUI_RESULT => "결과",
        GUI_LOG => "기록",
        GUI_CLEAR_LOG => "기록 지우기",
        GUI_EXPORT_LOG => "기록 내보내기",
        GUI_IMPORT_PASSPORT => "여권 계수 가져오기",
        GUI_SETTINGS => "설정",
        GUI_LANGUAGE => "언어",
        GUI_CONDITIONS => "환산 조건",
        GUI_SAVE => "저장",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Error",
        WARNING_PREFIX => "Warning",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Gas Dilution Generator Calculator ===",
        MAIN_MENU_SELECT => "1) Valve combination for target concentration",
        MAIN_MENU_MANUAL => "2) Concentration for valve combination",
        MAIN_MENU_BOUNDS => "3) Achievable concentration range",
        MAIN_MENU_CONVERSION => "4) Concentration unit conversion",
        MAIN_MENU_COMPONENTS => "5) Component list",
        MAIN_MENU_SETTINGS => "6) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        PROMPT_DILUENT => "Diluent",
        PROMPT_COMPONENT => "Component",
        PROMPT_SOURCE_CONC => "Source concentration: ",
        PROMPT_TARGET_CONC => "Target concentration: ",
        PROMPT_UNIT => "Unit (ppm, %, mg/m3)",
        PROMPT_VALVES => "Open valves (e.g. 1 3 7, enter for none): ",
        PROMPT_VALUE => "Value: ",
        PROMPT_FROM_UNIT => "From unit (ppm, %, mg/m3): ",
        PROMPT_TO_UNIT => "To unit (ppm, %, mg/m3): ",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        ERROR_INVALID_VALVES => "Valve numbers must be between 1 and 10.",
        ERROR_UNKNOWN_UNIT => "Unknown unit.",
        RESULT_VALVES => "Open valves:",
        RESULT_CONC => "Output concentration:",
        RESULT_RATIO => "Combined ratio:",
        RESULT_BOUNDS => "Achievable range:",
        RESULT_CORRECTION => "H2S correction:",
        RESULT_CONVERTED => "Result:",
        RANGE_BELOW_MIN => "below minimum",
        RANGE_ABOVE_MAX => "above maximum",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_OPTIONS => "1) Language  2) Default diluent  3) Default component  4) Temperature [°C]  5) Pressure [kPa]",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; nothing changed.",
        SETTINGS_SAVED => "Settings saved.",
        GUI_DILUENT => "Diluent",
        GUI_COMPONENT => "Component",
        GUI_SOURCE => "Source concentration",
        GUI_TARGET => "Target concentration",
        GUI_CALCULATE => "Calculate",
        GUI_VALVES => "Valves",
        GUI_RESULT => "Result",
        GUI_LOG => "Log",
        GUI_CLEAR_LOG => "Clear log",
        GUI_EXPORT_LOG => "Export log",
        GUI_IMPORT_PASSPORT => "Import passport",
        GUI_SETTINGS => "Settings",
        GUI_LANGUAGE => "Language",
        GUI_CONDITIONS => "Conversion conditions",
        GUI_SAVE => "Save",
        _ => "[missing translation]",
    }
}
