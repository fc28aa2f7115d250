#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::Local;
use eframe::egui;
use egui_extras::{Size, StripBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const API_BASE: &str = "http://localhost:8000";
const PREDICT_PATH: &str = "/predict";
const HEALTH_PATH: &str = "/health";

const SUMMARY_PLACEHOLDER: &str = "No requests sent yet. Configure the payload and press submit.";
const LATENCY_PLACEHOLDER: &str = "–";
const COPIED_HINT_DURATION: Duration = Duration::from_millis(1500);

const POSITIVE: egui::Color32 = egui::Color32::from_rgb(82, 186, 125);
const NEGATIVE: egui::Color32 = egui::Color32::from_rgb(224, 92, 92);

/// PaySim-style transaction categories accepted by the prediction service.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TxType {
    Transfer,
    CashOut,
    CashIn,
    Debit,
    Payment,
}

impl TxType {
    const ALL: [TxType; 5] = [
        TxType::Transfer,
        TxType::CashOut,
        TxType::CashIn,
        TxType::Debit,
        TxType::Payment,
    ];

    fn as_str(self) -> &'static str {
        match self {
            TxType::Transfer => "TRANSFER",
            TxType::CashOut => "CASH_OUT",
            TxType::CashIn => "CASH_IN",
            TxType::Debit => "DEBIT",
            TxType::Payment => "PAYMENT",
        }
    }
}

/// The record POSTed to `/predict`. Field names follow the service schema,
/// not Rust convention. Blank numeric fields serialize as `null`; so does
/// malformed text, because serde_json renders non-finite floats as `null`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
struct TransactionPayload {
    step: Option<f64>,
    #[serde(rename = "type")]
    tx_type: TxType,
    amount: Option<f64>,
    #[serde(rename = "oldbalanceOrg")]
    oldbalance_org: Option<f64>,
    #[serde(rename = "newbalanceOrig")]
    newbalance_orig: Option<f64>,
    #[serde(rename = "oldbalanceDest")]
    oldbalance_dest: Option<f64>,
    #[serde(rename = "newbalanceDest")]
    newbalance_dest: Option<f64>,
    #[serde(rename = "nameOrig")]
    name_orig: Option<String>,
    #[serde(rename = "nameDest")]
    name_dest: Option<String>,
    #[serde(rename = "isFlaggedFraud")]
    is_flagged_fraud: u8,
}

/// Successful response body from `/predict`.
#[derive(Debug, Deserialize)]
struct Prediction {
    is_fraud: bool,
    fraud_probability: f64,
}

#[derive(Debug, Error)]
enum SubmitError {
    /// Non-2xx status; the message comes from the body's `detail` field when
    /// present, otherwise the HTTP reason phrase.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// One finished submission. Kept as a tagged enum so the success and failure
/// shapes stay exhaustively checkable instead of a pile of nullable fields.
#[derive(Clone, PartialEq, Debug)]
enum Outcome {
    Success { is_fraud: bool, probability: f64 },
    Failed { message: String },
}

impl Outcome {
    fn summary(&self) -> String {
        match self {
            Outcome::Success {
                is_fraud,
                probability,
            } => format!(
                "Prediction: {} • Probability {}",
                if *is_fraud { "Fraudulent" } else { "Legitimate" },
                format_percent(*probability)
            ),
            Outcome::Failed { message } => format!("Request failed: {message}"),
        }
    }
}

struct HistoryEntry {
    payload: TransactionPayload,
    outcome: Outcome,
    time: String,
}

/// Messages sent back from worker threads to the UI thread.
enum NetEvent {
    Prediction {
        payload: TransactionPayload,
        outcome: Outcome,
        elapsed_ms: u64,
    },
    Health {
        status: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Preset {
    Custom,
    Legit,
    Fraud,
    Small,
}

impl Preset {
    const ALL: [Preset; 4] = [Preset::Custom, Preset::Legit, Preset::Fraud, Preset::Small];

    fn label(self) -> &'static str {
        match self {
            Preset::Custom => "Custom",
            Preset::Legit => "Legit transfer",
            Preset::Fraud => "Fraud pattern",
            Preset::Small => "Small payment",
        }
    }

    fn payload(self) -> TransactionPayload {
        match self {
            Preset::Custom => TransactionPayload {
                step: Some(1.0),
                tx_type: TxType::Transfer,
                amount: Some(1500.0),
                oldbalance_org: Some(2000.0),
                newbalance_orig: Some(500.0),
                oldbalance_dest: Some(0.0),
                newbalance_dest: Some(1500.0),
                name_orig: None,
                name_dest: None,
                is_flagged_fraud: 0,
            },
            Preset::Legit => TransactionPayload {
                step: Some(4.0),
                tx_type: TxType::Transfer,
                amount: Some(850.75),
                oldbalance_org: Some(4500.2),
                newbalance_orig: Some(3649.45),
                oldbalance_dest: Some(1200.0),
                newbalance_dest: Some(2050.75),
                name_orig: Some("C123456789".to_string()),
                name_dest: Some("M99887766".to_string()),
                is_flagged_fraud: 0,
            },
            Preset::Fraud => TransactionPayload {
                step: Some(1.0),
                tx_type: TxType::Transfer,
                amount: Some(9850.0),
                oldbalance_org: Some(9850.0),
                newbalance_orig: Some(0.0),
                oldbalance_dest: Some(0.0),
                newbalance_dest: Some(0.0),
                name_orig: Some("C882200339".to_string()),
                name_dest: Some("C332200882".to_string()),
                is_flagged_fraud: 1,
            },
            Preset::Small => TransactionPayload {
                step: Some(12.0),
                tx_type: TxType::Payment,
                amount: Some(49.99),
                oldbalance_org: Some(350.0),
                newbalance_orig: Some(300.01),
                oldbalance_dest: Some(1020.0),
                newbalance_dest: Some(1069.99),
                name_orig: Some("C78221".to_string()),
                name_dest: Some("M00345".to_string()),
                is_flagged_fraud: 0,
            },
        }
    }
}

/// Raw widget buffers backing the form. Numeric fields stay text until the
/// payload is derived so the user can type freely.
struct FormState {
    step: String,
    tx_type: TxType,
    amount: String,
    oldbalance_org: String,
    newbalance_orig: String,
    oldbalance_dest: String,
    newbalance_dest: String,
    name_orig: String,
    name_dest: String,
    is_flagged_fraud: bool,
}

impl Default for FormState {
    fn default() -> Self {
        let mut form = Self {
            step: String::new(),
            tx_type: TxType::Transfer,
            amount: String::new(),
            oldbalance_org: String::new(),
            newbalance_orig: String::new(),
            oldbalance_dest: String::new(),
            newbalance_dest: String::new(),
            name_orig: String::new(),
            name_dest: String::new(),
            is_flagged_fraud: false,
        };
        form.apply(&Preset::Custom.payload());
        form
    }
}

impl FormState {
    fn payload(&self) -> TransactionPayload {
        TransactionPayload {
            step: coerce_number(&self.step),
            tx_type: self.tx_type,
            amount: coerce_number(&self.amount),
            oldbalance_org: coerce_number(&self.oldbalance_org),
            newbalance_orig: coerce_number(&self.newbalance_orig),
            oldbalance_dest: coerce_number(&self.oldbalance_dest),
            newbalance_dest: coerce_number(&self.newbalance_dest),
            name_orig: coerce_name(&self.name_orig),
            name_dest: coerce_name(&self.name_dest),
            is_flagged_fraud: u8::from(self.is_flagged_fraud),
        }
    }

    fn apply(&mut self, payload: &TransactionPayload) {
        self.step = payload.step.map(format_field).unwrap_or_default();
        self.tx_type = payload.tx_type;
        self.amount = payload.amount.map(format_field).unwrap_or_default();
        self.oldbalance_org = payload.oldbalance_org.map(format_field).unwrap_or_default();
        self.newbalance_orig = payload.newbalance_orig.map(format_field).unwrap_or_default();
        self.oldbalance_dest = payload.oldbalance_dest.map(format_field).unwrap_or_default();
        self.newbalance_dest = payload.newbalance_dest.map(format_field).unwrap_or_default();
        self.name_orig = payload.name_orig.clone().unwrap_or_default();
        self.name_dest = payload.name_dest.clone().unwrap_or_default();
        self.is_flagged_fraud = payload.is_flagged_fraud != 0;
    }
}

/// Empty text is an absent value; text that fails to parse becomes NaN, which
/// serializes as `null` rather than raising an error.
fn coerce_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.parse::<f64>().unwrap_or(f64::NAN))
}

fn coerce_name(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Whole-valued floats render without the trailing `.0` when written back
/// into a form field.
fn format_field(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn format_json(payload: &TransactionPayload) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_default()
}

fn compact_json(payload: &TransactionPayload) -> String {
    serde_json::to_string(payload).unwrap_or_default()
}

/// A shell command equivalent to the submission, with quotes and newlines
/// escaped so the JSON survives inside a double-quoted string.
fn build_curl(payload: &TransactionPayload) -> String {
    let escaped = format_json(payload)
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!(
        "curl -X POST '{API_BASE}{PREDICT_PATH}'\n  -H 'Content-Type: application/json'\n  -d \"{escaped}\""
    )
}

fn error_detail(body: &serde_json::Value) -> Option<String> {
    body.get("detail")
        .and_then(|d| d.as_str())
        .map(str::to_string)
}

async fn request_prediction(payload: &TransactionPayload) -> Result<Prediction, SubmitError> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{API_BASE}{PREDICT_PATH}"))
        .header("Content-Type", "application/json")
        .json(payload)
        .send()
        .await?;

    if !response.status().is_success() {
        let fallback = response
            .status()
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string();
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .as_ref()
            .and_then(error_detail)
            .unwrap_or(fallback);
        return Err(SubmitError::Rejected(message));
    }

    Ok(response.json::<Prediction>().await?)
}

async fn request_health() -> Result<String, SubmitError> {
    let client = reqwest::Client::new();
    let body = client
        .get(format!("{API_BASE}{HEALTH_PATH}"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    Ok(body
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("unknown")
        .to_string())
}

struct FraudLensApp {
    form: FormState,
    preset: Preset,

    // Derived previews, refreshed whenever the form changes
    json_preview: String,
    curl_preview: String,

    // Last submission outcome; None renders the placeholder text
    summary: Option<Outcome>,
    latency_ms: Option<u64>,
    history: Vec<HistoryEntry>,

    // UI state
    loading: bool,
    health_pending: bool,
    health: Option<String>,
    dark_mode: bool,
    copied_at: Option<Instant>,

    // Communication channel for worker threads
    tx: Sender<NetEvent>,
    rx: Receiver<NetEvent>,
}

impl Default for FraudLensApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        let mut app = Self {
            form: FormState::default(),
            preset: Preset::Custom,
            json_preview: String::new(),
            curl_preview: String::new(),
            summary: None,
            latency_ms: None,
            history: Vec::new(),
            loading: false,
            health_pending: false,
            health: None,
            dark_mode: true,
            copied_at: None,
            tx,
            rx,
        };
        app.refresh_previews();
        app
    }
}

impl FraudLensApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::default()
    }

    fn name() -> &'static str {
        "FraudLens"
    }

    fn refresh_previews(&mut self) {
        let payload = self.form.payload();
        self.json_preview = format_json(&payload);
        self.curl_preview = build_curl(&payload);
    }

    fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.form.apply(&preset.payload());
        self.refresh_previews();
    }

    fn clear_history(&mut self) {
        self.history.clear();
        self.summary = None;
        self.latency_ms = None;
    }

    fn record_prediction(
        &mut self,
        payload: TransactionPayload,
        outcome: Outcome,
        elapsed_ms: u64,
    ) {
        match &outcome {
            Outcome::Success {
                is_fraud,
                probability,
            } => {
                info!(
                    elapsed_ms,
                    is_fraud = *is_fraud,
                    probability = *probability,
                    "prediction received"
                );
            }
            Outcome::Failed { message } => {
                warn!(elapsed_ms, message = %message, "prediction request failed");
            }
        }
        self.latency_ms = Some(elapsed_ms);
        self.history.insert(
            0,
            HistoryEntry {
                payload,
                outcome: outcome.clone(),
                time: Local::now().format("%H:%M:%S").to_string(),
            },
        );
        self.summary = Some(outcome);
    }

    fn spawn_predict(&mut self) {
        let payload = self.form.payload();
        self.loading = true;
        let tx = self.tx.clone();
        info!("submitting transaction payload");

        std::thread::spawn(move || {
            let started = Instant::now();
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result = rt.block_on(request_prediction(&payload));
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let outcome = match result {
                Ok(prediction) => Outcome::Success {
                    is_fraud: prediction.is_fraud,
                    probability: prediction.fraud_probability,
                },
                Err(error) => Outcome::Failed {
                    message: error.to_string(),
                },
            };
            let _ = tx.send(NetEvent::Prediction {
                payload,
                outcome,
                elapsed_ms,
            });
        });
    }

    fn spawn_health_check(&mut self) {
        self.health_pending = true;
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let status = match rt.block_on(request_health()) {
                Ok(status) => status,
                Err(error) => format!("unreachable ({error})"),
            };
            let _ = tx.send(NetEvent::Health { status });
        });
    }

    fn render_form_section(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        egui::Frame::NONE
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(60)))
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                ui.strong("Transaction");
                ui.add_space(6.0);

                changed |= form_row(ui, "step", &mut self.form.step);

                ui.horizontal(|ui| {
                    ui.label("type");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        egui::ComboBox::from_id_salt("tx_type")
                            .selected_text(self.form.tx_type.as_str())
                            .width(140.0)
                            .show_ui(ui, |ui| {
                                for tx_type in TxType::ALL {
                                    changed |= ui
                                        .selectable_value(
                                            &mut self.form.tx_type,
                                            tx_type,
                                            tx_type.as_str(),
                                        )
                                        .changed();
                                }
                            });
                    });
                });

                changed |= form_row(ui, "amount", &mut self.form.amount);
                changed |= form_row(ui, "oldbalanceOrg", &mut self.form.oldbalance_org);
                changed |= form_row(ui, "newbalanceOrig", &mut self.form.newbalance_orig);
                changed |= form_row(ui, "oldbalanceDest", &mut self.form.oldbalance_dest);
                changed |= form_row(ui, "newbalanceDest", &mut self.form.newbalance_dest);
                changed |= form_row(ui, "nameOrig", &mut self.form.name_orig);
                changed |= form_row(ui, "nameDest", &mut self.form.name_dest);

                ui.add_space(4.0);
                changed |= ui
                    .checkbox(&mut self.form.is_flagged_fraud, "isFlaggedFraud")
                    .changed();
            });

        if changed {
            self.refresh_previews();
        }
    }

    fn render_preview_section(&mut self, ui: &mut egui::Ui) {
        egui::Frame::NONE
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(60)))
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                ui.strong("Payload JSON");
                ui.add_space(4.0);
                ui.add(
                    egui::TextEdit::multiline(&mut self.json_preview.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(13),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.strong("curl");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let copy_label = if self.copied_at.is_some() {
                            "Copied!"
                        } else {
                            "Copy curl"
                        };
                        if ui.button(copy_label).clicked() {
                            ui.ctx().copy_text(self.curl_preview.clone());
                            self.copied_at = Some(Instant::now());
                        }
                    });
                });
                ui.add_space(4.0);
                ui.add(
                    egui::TextEdit::multiline(&mut self.curl_preview.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(4),
                );
            });
    }

    fn render_outcome_section(&mut self, ui: &mut egui::Ui) {
        let mut clear_requested = false;
        egui::Frame::NONE
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(60)))
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.strong("Response");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.loading {
                            ui.spinner();
                        }
                        ui.label(match self.latency_ms {
                            Some(ms) => format!("{ms} ms"),
                            None => LATENCY_PLACEHOLDER.to_string(),
                        });
                        ui.weak("latency:");
                    });
                });
                ui.add_space(4.0);

                match &self.summary {
                    Some(outcome) => {
                        let color = match outcome {
                            Outcome::Success { .. } => POSITIVE,
                            Outcome::Failed { .. } => NEGATIVE,
                        };
                        ui.colored_label(color, outcome.summary());
                    }
                    None => {
                        ui.weak(SUMMARY_PLACEHOLDER);
                    }
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.strong("History");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Clear history").clicked() {
                            clear_requested = true;
                        }
                    });
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("history_scroll")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        for entry in &self.history {
                            ui.horizontal(|ui| {
                                match &entry.outcome {
                                    Outcome::Success {
                                        is_fraud,
                                        probability,
                                    } => {
                                        let (pill, color) = if *is_fraud {
                                            ("Fraud", NEGATIVE)
                                        } else {
                                            ("Legitimate", POSITIVE)
                                        };
                                        ui.colored_label(color, pill);
                                        ui.colored_label(color, format_percent(*probability));
                                    }
                                    Outcome::Failed { message } => {
                                        ui.colored_label(NEGATIVE, "Error");
                                        ui.label(egui::RichText::new(message.as_str()).weak());
                                    }
                                }
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        ui.weak(entry.time.as_str());
                                    },
                                );
                            });
                            ui.label(
                                egui::RichText::new(compact_json(&entry.payload))
                                    .monospace()
                                    .small()
                                    .weak(),
                            );
                            ui.separator();
                        }
                    });
            });

        if clear_requested {
            self.clear_history();
        }
    }
}

fn form_row(ui: &mut egui::Ui, label: &str, buf: &mut String) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            changed = ui
                .add(egui::TextEdit::singleline(buf).desired_width(180.0))
                .changed();
        });
    });
    changed
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("fraudlens=debug".parse().unwrap()),
        )
        .with_target(true)
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size((1200.0, 820.0))
            .with_min_inner_size((720.0, 520.0)),
        ..eframe::NativeOptions::default()
    };

    eframe::run_native(
        FraudLensApp::name(),
        native_options,
        Box::new(|cc| Ok(Box::new(FraudLensApp::new(cc)))),
    )
}

impl eframe::App for FraudLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for worker results
        while let Ok(event) = self.rx.try_recv() {
            match event {
                NetEvent::Prediction {
                    payload,
                    outcome,
                    elapsed_ms,
                } => {
                    self.record_prediction(payload, outcome, elapsed_ms);
                    self.loading = false;
                }
                NetEvent::Health { status } => {
                    self.health = Some(status);
                    self.health_pending = false;
                }
            }
        }

        // Revert the copy button label once the hint window passes
        if let Some(copied_at) = self.copied_at {
            let elapsed = copied_at.elapsed();
            if elapsed >= COPIED_HINT_DURATION {
                self.copied_at = None;
            } else {
                ctx.request_repaint_after(COPIED_HINT_DURATION - elapsed);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("FraudLens");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = if self.dark_mode { "Light" } else { "Dark" };
                    if ui
                        .button(theme_label)
                        .on_hover_text("Toggle theme")
                        .clicked()
                    {
                        self.dark_mode = !self.dark_mode;
                        ui.ctx().set_visuals(if self.dark_mode {
                            egui::Visuals::dark()
                        } else {
                            egui::Visuals::light()
                        });
                    }
                    if ui.button("Health check").clicked() {
                        self.spawn_health_check();
                    }
                    if let Some(status) = &self.health {
                        ui.weak(format!("health: {status}"));
                    }
                });
            });

            ui.add_space(8.0);

            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.style_mut().spacing.interact_size.y = 30.0;

                    ui.label("Preset:");
                    let mut selected = self.preset;
                    egui::ComboBox::from_id_salt("preset")
                        .selected_text(selected.label())
                        .width(150.0)
                        .show_ui(ui, |ui| {
                            for preset in Preset::ALL {
                                ui.selectable_value(&mut selected, preset, preset.label());
                            }
                        });
                    if selected != self.preset {
                        self.apply_preset(selected);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let submit = ui.add_enabled(
                            !self.loading,
                            egui::Button::new("Submit").min_size(egui::vec2(100.0, 30.0)),
                        );
                        if submit.clicked() {
                            self.spawn_predict();
                        }
                    });
                });
            });

            ui.add_space(8.0);

            StripBuilder::new(ui)
                .size(Size::relative(0.5))
                .size(Size::remainder())
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        self.render_form_section(ui);
                        ui.add_space(8.0);
                        self.render_preview_section(ui);
                    });
                    strip.cell(|ui| {
                        self.render_outcome_section(ui);
                    });
                });
        });

        // Keep repainting while a worker is outstanding
        if self.loading || self.health_pending {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_numeric_text_is_absent() {
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("   "), None);
    }

    #[test]
    fn valid_numeric_text_parses() {
        assert_eq!(coerce_number("850.75"), Some(850.75));
        assert_eq!(coerce_number("0"), Some(0.0));
    }

    #[test]
    fn malformed_numeric_text_becomes_nan() {
        let value = coerce_number("12x").unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn nan_serializes_as_null() {
        let mut payload = Preset::Custom.payload();
        payload.amount = Some(f64::NAN);
        let value: serde_json::Value = serde_json::from_str(&format_json(&payload)).unwrap();
        assert!(value["amount"].is_null());
    }

    #[test]
    fn checkbox_maps_to_zero_or_one() {
        let mut form = FormState::default();
        form.is_flagged_fraud = true;
        assert_eq!(form.payload().is_flagged_fraud, 1);
        form.is_flagged_fraud = false;
        assert_eq!(form.payload().is_flagged_fraud, 0);
    }

    #[test]
    fn empty_names_become_null() {
        let mut form = FormState::default();
        form.name_orig.clear();
        form.name_dest = "M00345".to_string();
        let payload = form.payload();
        assert_eq!(payload.name_orig, None);
        assert_eq!(payload.name_dest, Some("M00345".to_string()));
    }

    #[test]
    fn tx_type_serializes_as_service_literal() {
        assert_eq!(
            serde_json::to_string(&TxType::CashOut).unwrap(),
            "\"CASH_OUT\""
        );
        assert_eq!(
            serde_json::from_str::<TxType>("\"TRANSFER\"").unwrap(),
            TxType::Transfer
        );
    }

    #[test]
    fn json_preview_round_trips() {
        let payload = Preset::Legit.payload();
        let parsed: TransactionPayload = serde_json::from_str(&format_json(&payload)).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn curl_preview_embeds_same_payload() {
        let payload = Preset::Fraud.payload();
        let curl = build_curl(&payload);
        assert!(curl.starts_with("curl -X POST 'http://localhost:8000/predict'"));
        assert!(curl.contains("-H 'Content-Type: application/json'"));
        let escaped = format_json(&payload)
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        assert!(curl.contains(&escaped));
    }

    #[test]
    fn fraud_preset_fills_every_field() {
        let mut form = FormState::default();
        form.apply(&Preset::Fraud.payload());
        assert_eq!(form.step, "1");
        assert_eq!(form.tx_type, TxType::Transfer);
        assert_eq!(form.amount, "9850");
        assert_eq!(form.oldbalance_org, "9850");
        assert_eq!(form.newbalance_orig, "0");
        assert_eq!(form.oldbalance_dest, "0");
        assert_eq!(form.newbalance_dest, "0");
        assert_eq!(form.name_orig, "C882200339");
        assert_eq!(form.name_dest, "C332200882");
        assert!(form.is_flagged_fraud);
        assert_eq!(form.payload(), Preset::Fraud.payload());
    }

    #[test]
    fn field_formatting_trims_integral_floats() {
        assert_eq!(format_field(1200.0), "1200");
        assert_eq!(format_field(850.75), "850.75");
    }

    #[test]
    fn success_summary_line() {
        let outcome = Outcome::Success {
            is_fraud: true,
            probability: 0.87,
        };
        assert_eq!(
            outcome.summary(),
            "Prediction: Fraudulent • Probability 87.00%"
        );
    }

    #[test]
    fn legitimate_summary_line() {
        let outcome = Outcome::Success {
            is_fraud: false,
            probability: 0.1234,
        };
        assert_eq!(
            outcome.summary(),
            "Prediction: Legitimate • Probability 12.34%"
        );
    }

    #[test]
    fn failure_summary_line() {
        let outcome = Outcome::Failed {
            message: "model unavailable".to_string(),
        };
        assert_eq!(outcome.summary(), "Request failed: model unavailable");
    }

    #[test]
    fn error_detail_prefers_detail_field() {
        let body = serde_json::json!({ "detail": "model unavailable" });
        assert_eq!(error_detail(&body).as_deref(), Some("model unavailable"));
        assert_eq!(error_detail(&serde_json::json!({})), None);
    }

    #[test]
    fn prediction_response_decodes() {
        let prediction: Prediction =
            serde_json::from_str(r#"{"is_fraud": true, "fraud_probability": 0.87}"#).unwrap();
        assert!(prediction.is_fraud);
        assert_eq!(prediction.fraud_probability, 0.87);
    }

    #[test]
    fn history_prepends_and_clears() {
        let mut app = FraudLensApp::default();
        app.record_prediction(
            Preset::Legit.payload(),
            Outcome::Success {
                is_fraud: false,
                probability: 0.01,
            },
            12,
        );
        app.record_prediction(
            Preset::Fraud.payload(),
            Outcome::Success {
                is_fraud: true,
                probability: 0.87,
            },
            15,
        );
        assert_eq!(app.history.len(), 2);
        assert!(matches!(
            app.history[0].outcome,
            Outcome::Success { is_fraud: true, .. }
        ));
        assert_eq!(app.latency_ms, Some(15));

        app.clear_history();
        assert!(app.history.is_empty());
        assert!(app.summary.is_none());
        assert!(app.latency_ms.is_none());
    }

    #[test]
    fn failed_outcome_recorded_in_history() {
        let mut app = FraudLensApp::default();
        app.record_prediction(
            Preset::Custom.payload(),
            Outcome::Failed {
                message: "model unavailable".to_string(),
            },
            8,
        );
        assert_eq!(app.history.len(), 1);
        assert!(matches!(app.history[0].outcome, Outcome::Failed { .. }));
        assert_eq!(
            app.summary.as_ref().map(Outcome::summary),
            Some("Request failed: model unavailable".to_string())
        );
    }

    #[test]
    fn previews_track_form_edits() {
        let mut app = FraudLensApp::default();
        app.form.amount = "9850".to_string();
        app.refresh_previews();
        let parsed: TransactionPayload = serde_json::from_str(&app.json_preview).unwrap();
        assert_eq!(parsed.amount, Some(9850.0));
        assert_eq!(app.curl_preview, build_curl(&parsed));
    }
}
