#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use gas_dilution_toolbox::{
    calculation::{self, CalculationReport, CalculationRequest, ManualRequest},
    config, gas_db,
    generator::{RangeStatus, ValveSubset, VALVE_COUNT},
    i18n::{self, keys},
    logging,
    units::ConcentrationUnit,
};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};

fn main() -> Result<(), eframe::Error> {
    // CLI 옵션 처리: --lang xx / --lang=xx, --log-level xx
    let mut cli_lang: Option<String> = None;
    let mut log_level: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if let Some(val) = a.strip_prefix("--log-level=") {
            log_level = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        } else if a == "--log-level" && i + 1 < args.len() {
            log_level = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }
    logging::init_logging(log_level.as_deref());

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([860.0, 680.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        log::error!("config: {e}");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Gas Dilution Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                log::warn!("Font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 한글 표시용 시스템 폰트를 찾아 기본 폰트 뒤에 폴백으로 등록한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![
        Path::new("assets/fonts/NanumGothic.ttf").to_path_buf(),
        Path::new("/usr/share/fonts/truetype/nanum/NanumGothic.ttf").to_path_buf(),
        Path::new("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc").to_path_buf(),
        Path::new("/System/Library/Fonts/AppleSDGothicNeo.ttc").to_path_buf(),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.insert(0, fonts.join("malgun.ttf"));
        candidates.insert(1, fonts.join("gulim.ttc"));
    }
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font file ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found; using default fonts.".into())
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.to_owned());
    }
    ctx.set_fonts(fonts);
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().replace(',', ".").parse::<f64>().ok()
}

fn unit_combo(ui: &mut egui::Ui, id: &str, value: &mut ConcentrationUnit) {
    egui::ComboBox::from_id_source(id)
        .selected_text(value.symbol())
        .width(80.0)
        .show_ui(ui, |ui| {
            for unit in ConcentrationUnit::ALL {
                ui.selectable_value(value, unit, unit.symbol());
            }
        });
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    diluent: String,
    component: String,
    source_input: String,
    source_unit: ConcentrationUnit,
    target_input: String,
    target_unit: ConcentrationUnit,
    valves: ValveSubset,
    report: Option<CalculationReport>,
    log_text: String,
    run_count: u32,
    show_settings: bool,
    lang_input: String,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        Self {
            diluent: config.default_diluent.clone(),
            component: config.default_component.clone(),
            source_input: String::new(),
            source_unit: config.default_source_unit,
            target_input: String::new(),
            target_unit: config.default_target_unit,
            valves: ValveSubset::empty(),
            report: None,
            log_text: String::new(),
            run_count: 0,
            show_settings: false,
            lang_input: config.language.clone(),
            status: None,
            tr,
            config,
        }
    }

    fn append_log(&mut self, line: &str) {
        if !self.log_text.is_empty() {
            self.log_text.push('\n');
        }
        self.log_text.push_str(line);
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
        let prefix = self.tr.t(keys::WARNING_PREFIX);
        self.append_log(&format!("{prefix}: {message}"));
    }

    fn source_conc(&mut self) -> Option<f64> {
        let v = parse_number(&self.source_input);
        if v.is_none() {
            let msg = format!("{}: '{}'", self.tr.t(keys::ERROR_INVALID_NUMBER), self.source_input);
            self.warn(&msg);
        }
        v
    }

    /// 목표 농도로 밸브 조합을 계산한다.
    fn calculate(&mut self) {
        let Some(source_conc) = self.source_conc() else {
            return;
        };
        let Some(target_conc) = parse_number(&self.target_input) else {
            let msg = format!("{}: '{}'", self.tr.t(keys::ERROR_INVALID_NUMBER), self.target_input);
            self.warn(&msg);
            return;
        };
        let req = CalculationRequest {
            diluent: self.diluent.clone(),
            component: self.component.clone(),
            source_conc,
            source_unit: self.source_unit,
            target_conc,
            target_unit: self.target_unit,
        };
        match calculation::calculate(&req, &self.config) {
            Ok(report) => self.show_report(report),
            Err(e) => self.warn(&e.to_string()),
        }
    }

    /// 밸브 토글 후 현재 조합의 농도를 다시 계산한다. 결과는 목표 입력란에도 반영한다.
    fn recalculate(&mut self) {
        let Some(source_conc) = self.source_conc() else {
            return;
        };
        let req = ManualRequest {
            diluent: self.diluent.clone(),
            component: self.component.clone(),
            source_conc,
            source_unit: self.source_unit,
            valves: self.valves,
            result_unit: self.target_unit,
        };
        match calculation::recalculate(&req, &self.config) {
            Ok(report) => {
                self.target_input = report.rounded_result().to_string();
                self.show_report(report);
            }
            Err(e) => self.warn(&e.to_string()),
        }
    }

    fn show_report(&mut self, report: CalculationReport) {
        self.run_count += 1;
        self.valves = report.valves;
        let mut lines = vec![format!("{0} #{1} {0}", "*".repeat(12), self.run_count)];
        lines.push(format!("diluent:        {}", report.diluent));
        lines.push(format!("component:      {}", report.component));
        lines.push(format!("source, ppm:    {}", report.source_ppm));
        if let Some(t) = report.target_ppm {
            lines.push(format!("target, ppm:    {t}"));
        }
        lines.push(format!("valves:         {}", report.valves));
        lines.push(format!("ratio:          {}", report.combined_ratio));
        lines.push(format!("conc, ppm:      {}", report.conc_ppm));
        if report.correction_ppm != 0.0 {
            lines.push(format!("H2S correction: +{}", report.correction_ppm));
        }
        lines.push(format!(
            "result:         {} {}",
            report.rounded_result(),
            report.result_unit
        ));
        for line in lines {
            self.append_log(&line);
        }
        for w in report.warnings.clone() {
            self.warn(&w.to_string());
        }
        self.report = Some(report);
    }

    fn import_passport(&mut self) {
        let Some(path) = FileDialog::new().add_filter("TOML", &["toml"]).pick_file() else {
            return;
        };
        match config::load_passport_file(&path) {
            Ok(tables) => {
                let ids: Vec<String> = tables.keys().cloned().collect();
                self.config.diluents.extend(tables);
                let msg = match self.config.save() {
                    Ok(()) => format!("{}: {}", path.display(), ids.join(", ")),
                    Err(e) => format!("Save error: {e}"),
                };
                log::info!("passport import: {msg}");
                self.append_log(&msg);
            }
            Err(e) => self.warn(&e.to_string()),
        }
    }

    fn export_log(&mut self) {
        let Some(path) = FileDialog::new()
            .set_file_name("gas_dilution_log.txt")
            .save_file()
        else {
            return;
        };
        if let Err(e) = fs::write(&path, &self.log_text) {
            self.warn(&format!("{}: {e}", path.display()));
        }
    }

    fn ui_form(&mut self, ui: &mut egui::Ui) {
        let diluents: Vec<String> = self.config.diluents.keys().cloned().collect();
        egui::Grid::new("form")
            .num_columns(3)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label(self.tr.t(keys::GUI_DILUENT));
                egui::ComboBox::from_id_source("diluent")
                    .selected_text(self.diluent.as_str())
                    .show_ui(ui, |ui| {
                        for id in &diluents {
                            ui.selectable_value(&mut self.diluent, id.clone(), id.as_str());
                        }
                    });
                ui.end_row();

                ui.label(self.tr.t(keys::GUI_COMPONENT));
                egui::ComboBox::from_id_source("component")
                    .selected_text(self.component.as_str())
                    .show_ui(ui, |ui| {
                        for c in gas_db::GENERATOR_COMPONENTS {
                            ui.selectable_value(&mut self.component, c.to_string(), *c);
                        }
                    });
                ui.end_row();

                ui.label(self.tr.t(keys::GUI_SOURCE));
                ui.add(egui::TextEdit::singleline(&mut self.source_input).desired_width(140.0));
                unit_combo(ui, "source_unit", &mut self.source_unit);
                ui.end_row();

                ui.label(self.tr.t(keys::GUI_TARGET));
                ui.add(egui::TextEdit::singleline(&mut self.target_input).desired_width(140.0));
                unit_combo(ui, "target_unit", &mut self.target_unit);
                ui.end_row();
            });
        ui.add_space(6.0);
        if ui.button(self.tr.t(keys::GUI_CALCULATE)).clicked() {
            self.calculate();
        }
    }

    fn ui_valves(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr.t(keys::GUI_VALVES));
        let mut toggled = None;
        ui.horizontal_wrapped(|ui| {
            for v in 1..=VALVE_COUNT as u8 {
                let mut open = self.valves.contains(v);
                if ui.checkbox(&mut open, format!("V{v}")).changed() {
                    toggled = Some(v);
                }
            }
        });
        if let Some(v) = toggled {
            self.valves = self.valves.toggled(v);
            self.recalculate();
        }
    }

    fn ui_result(&self, ui: &mut egui::Ui) {
        ui.heading(self.tr.t(keys::GUI_RESULT));
        let Some(report) = &self.report else {
            ui.label("-");
            return;
        };
        ui.label(
            egui::RichText::new(format!(
                "{} {}",
                report.rounded_result(),
                report.result_unit
            ))
            .size(22.0)
            .strong(),
        );
        ui.label(format!("{} [{}]", self.tr.t(keys::RESULT_VALVES), report.valves));
        ui.label(format!(
            "{} {} … {} ppm",
            self.tr.t(keys::RESULT_BOUNDS),
            calculation::round_for_display(report.bounds.min),
            calculation::round_for_display(report.bounds.max)
        ));
        let warn_color = egui::Color32::from_rgb(220, 110, 40);
        match report.range {
            RangeStatus::Ok => {}
            RangeStatus::BelowMin => {
                ui.colored_label(warn_color, self.tr.t(keys::RANGE_BELOW_MIN));
            }
            RangeStatus::AboveMax => {
                ui.colored_label(warn_color, self.tr.t(keys::RANGE_ABOVE_MAX));
            }
        }
    }

    fn ui_log(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong(self.tr.t(keys::GUI_LOG));
            if ui.button(self.tr.t(keys::GUI_CLEAR_LOG)).clicked() {
                self.log_text.clear();
            }
        });
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.log_text.as_str())
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY),
                );
            });
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut save = false;
        egui::Window::new(self.tr.t(keys::GUI_SETTINGS))
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(self.tr.t(keys::GUI_LANGUAGE));
                ui.horizontal(|ui| {
                    for code in ["auto", "ko", "en"] {
                        ui.selectable_value(&mut self.lang_input, code.to_string(), code);
                    }
                });
                ui.separator();
                ui.label(self.tr.t(keys::GUI_CONDITIONS));
                let cond = &mut self.config.conditions;
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut cond.temperature).speed(0.5));
                    ui.label(cond.temperature_unit.symbol());
                    ui.add(egui::DragValue::new(&mut cond.pressure).speed(0.1));
                    ui.label(cond.pressure_unit.symbol());
                });
                ui.separator();
                if ui.button(self.tr.t(keys::GUI_SAVE)).clicked() {
                    save = true;
                }
                if let Some(msg) = &self.status {
                    ui.label(msg.as_str());
                }
            });
        self.show_settings = open;
        if save {
            self.config.language = self.lang_input.clone();
            self.config.default_diluent = self.diluent.clone();
            self.config.default_component = self.component.clone();
            let resolved = i18n::resolve_language(&self.config.language, None);
            self.tr = i18n::Translator::new_with_pack(
                &resolved,
                self.config.language_pack_dir.as_deref(),
            );
            self.status = Some(match self.config.save() {
                Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
                Err(e) => format!("Save error: {e}"),
            });
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Gas Dilution Toolbox");
                ui.separator();
                if ui.button(self.tr.t(keys::GUI_IMPORT_PASSPORT)).clicked() {
                    self.import_passport();
                }
                if ui.button(self.tr.t(keys::GUI_EXPORT_LOG)).clicked() {
                    self.export_log();
                }
                if ui.button(self.tr.t(keys::GUI_SETTINGS)).clicked() {
                    self.show_settings = true;
                }
            });
        });

        if self.show_settings {
            self.ui_settings(ctx);
        }

        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(200.0)
            .show(ctx, |ui| self.ui_log(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |cols| {
                self.ui_form(&mut cols[0]);
                self.ui_result(&mut cols[1]);
            });
            ui.separator();
            self.ui_valves(ui);
        });
    }
}
