//! Crosstab workbench application
//!
//! Wires the three workflow coordinators to egui panels: a data file upload
//! panel, a crosstab builder over the variable catalog, and a chat panel for
//! natural-language analysis questions. The variable catalog is supplied at
//! construction; the app never fetches or paginates it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{self, Color32, Context, RichText, ScrollArea, Ui};
use tracing::info;

use xt_client::BackendClient;
use xt_core::{Role, UploadCandidate, ValidationRules, Variable, VariableType};
use xt_workflow::{ChatInterface, CrosstabBuilder, FileUpload};

mod catalog;

/// Variables selectable per axis before the oldest pick is displaced
const MAX_AXIS_SELECTION: Option<usize> = Some(4);

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 80, 80);
const OK_COLOR: Color32 = Color32::from_rgb(110, 190, 110);

/// Main application state
struct WorkbenchApp {
    /// Variable catalog from the loaded dataset
    catalog: Vec<Variable>,

    /// File upload coordinator
    upload: FileUpload,

    /// Crosstab configuration coordinator
    crosstab: CrosstabBuilder,

    /// Chat coordinator
    chat: ChatInterface,

    /// Tokio runtime driving all dispatched actions
    _runtime: tokio::runtime::Runtime,
}

impl WorkbenchApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");

        let base_url = std::env::var("WORKBENCH_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        info!(%base_url, "connecting workbench to backend");
        let client = Arc::new(BackendClient::new(base_url));

        let handle = runtime.handle().clone();
        Self {
            catalog: catalog::sample_catalog(),
            upload: FileUpload::new(client.clone(), ValidationRules::default(), handle.clone()),
            crosstab: CrosstabBuilder::new(client.clone(), MAX_AXIS_SELECTION, handle.clone()),
            chat: ChatInterface::new(client, handle),
            _runtime: runtime,
        }
    }

    /// Feed files dropped anywhere in the window into the upload coordinator
    fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                match UploadCandidate::from_path(&path) {
                    Ok(candidate) => files.push(candidate),
                    Err(err) => info!(?path, %err, "ignoring unreadable dropped file"),
                }
            }
        }
        self.upload.submit(files);
    }

    fn upload_panel(&mut self, ui: &mut Ui) {
        ui.heading("Data File");
        ui.add_space(4.0);

        let accepted = self.upload.rules().accepted_list();
        ui.label(
            RichText::new(format!("Drop a {accepted} file here, or"))
                .color(Color32::from_gray(180)),
        );

        let picking_enabled = !self.upload.is_uploading();
        if ui
            .add_enabled(picking_enabled, egui::Button::new("📁 Choose file…"))
            .clicked()
        {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("SPSS data files", &["sav"])
                .pick_file()
            {
                match UploadCandidate::from_path(&path) {
                    Ok(candidate) => {
                        self.upload.submit(vec![candidate]);
                    }
                    Err(err) => info!(?path, %err, "could not read picked file"),
                }
            }
        }

        if self.upload.is_uploading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Uploading…");
            });
        }

        if let Some(reason) = self.upload.validation_error() {
            ui.colored_label(ERROR_COLOR, reason.to_string());
        }
        if let Some(message) = self.upload.upload_error() {
            ui.colored_label(ERROR_COLOR, message);
        }
        if let Some(receipt) = self.upload.receipt() {
            ui.colored_label(
                OK_COLOR,
                format!("✔ {} ({} bytes)", receipt.file_name, receipt.size_bytes),
            );
        }
    }

    fn crosstab_panel(&mut self, ui: &mut Ui) {
        ui.heading("Cross-tabulation");
        ui.add_space(4.0);

        ui.columns(2, |columns| {
            columns[0].label(RichText::new("Rows").strong());
            let row_toggle = Self::axis_list(
                &mut columns[0],
                "rows",
                &self.catalog,
                self.crosstab.row_selection().ids(),
            );
            if let Some(id) = row_toggle {
                self.crosstab.toggle_row(&id);
            }

            columns[1].label(RichText::new("Columns").strong());
            let column_toggle = Self::axis_list(
                &mut columns[1],
                "columns",
                &self.catalog,
                self.crosstab.column_selection().ids(),
            );
            if let Some(id) = column_toggle {
                self.crosstab.toggle_column(&id);
            }
        });

        ui.add_space(6.0);

        let can_run = self.crosstab.can_run() && !self.crosstab.is_running();
        if ui
            .add_enabled(can_run, egui::Button::new("▶ Run analysis"))
            .clicked()
        {
            self.crosstab.run();
        }

        if self.crosstab.is_running() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Running…");
            });
        }
        if let Some(message) = self.crosstab.run_error() {
            ui.colored_label(ERROR_COLOR, message);
        }
        if self.crosstab.finished() {
            ui.colored_label(OK_COLOR, "✔ Analysis submitted");
        }
    }

    /// One selectable variable list; returns the id toggled this frame
    fn axis_list(
        ui: &mut Ui,
        id_source: &str,
        catalog: &[Variable],
        selected: &[String],
    ) -> Option<String> {
        let mut toggled = None;
        ScrollArea::vertical()
            .id_source(id_source)
            .max_height(180.0)
            .show(ui, |ui| {
                for variable in catalog {
                    let is_selected = selected.iter().any(|id| id == &variable.id);
                    let label = match variable.var_type {
                        VariableType::Numeric => format!("🔢 {}", variable.display_label()),
                        VariableType::Categorical => format!("🏷 {}", variable.display_label()),
                        VariableType::Text => format!("🔤 {}", variable.display_label()),
                    };
                    if ui.selectable_label(is_selected, label).clicked() {
                        toggled = Some(variable.id.clone());
                    }
                }
            });
        toggled
    }

    fn chat_panel(&mut self, ui: &mut Ui) {
        ui.heading("Ask about your data");
        ui.add_space(4.0);

        let input_height = 64.0;
        let log_height = (ui.available_height() - input_height).max(100.0);

        ScrollArea::vertical()
            .id_source("chat_log")
            .max_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in self.chat.messages() {
                    let (who, color) = match message.role {
                        Role::User => ("You", Color32::from_gray(220)),
                        Role::Assistant => ("Assistant", Color32::from_rgb(140, 180, 240)),
                    };
                    ui.label(RichText::new(who).strong().color(color));
                    ui.label(&message.content);
                    ui.add_space(6.0);
                }
            });

        ui.separator();

        if let Some(message) = self.chat.send_error() {
            ui.horizontal(|ui| {
                ui.colored_label(ERROR_COLOR, message);
                if ui.small_button("✖").clicked() {
                    self.chat.clear_error();
                }
            });
        }

        let mut send_now = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(self.chat.draft_mut())
                    .desired_width(ui.available_width() - 70.0)
                    .hint_text("e.g. Is gender associated with satisfaction?"),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }

            if ui
                .add_enabled(self.chat.can_submit(), egui::Button::new("Send"))
                .clicked()
            {
                send_now = true;
            }

            if self.chat.is_sending() {
                ui.spinner();
            }
        });

        if send_now {
            self.chat.submit();
        }
    }

    fn anything_pending(&self) -> bool {
        self.upload.is_uploading() || self.crosstab.is_running() || self.chat.is_sending()
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Fold settled chat replies into the log before rendering
        self.chat.poll();
        self.handle_dropped_files(ctx);

        egui::SidePanel::left("configuration_panel")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.upload_panel(ui);
                ui.separator();
                self.crosstab_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chat_panel(ui);
        });

        // Background completions don't wake egui on their own
        if self.anything_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting crosstab workbench");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 560.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Crosstab Workbench",
        options,
        Box::new(|cc| Box::new(WorkbenchApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
