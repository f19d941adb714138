//! Standalone [`IvPlotApp`] (eframe) and its background fetch wiring.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use eframe::egui;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, WARNING};

use crate::chart::DrawType;
use crate::color_scheme::{BorderMode, CandlePalette};
use crate::config::IvPlotConfig;
use crate::controllers::{ChartStatus, ControlValues, FetchCompletion, FetchTicket, ReconfigController};
use crate::data::axis_format::TickFormatter;
use crate::data::variant::ChartVariant;
use crate::fetch::{FetchClient, HttpTransport, LookbackWindow};

use super::plot::ChartView;

/// Viewer for one chart variant.
///
/// Requests run on a private tokio runtime; their completions come back over
/// a channel and are handed to the controller on the UI thread, so the chart
/// is only ever touched from `update`.
pub struct IvPlotApp {
    controller: ReconfigController,
    client: Arc<FetchClient<HttpTransport>>,
    runtime: tokio::runtime::Runtime,
    completions_tx: Sender<FetchCompletion>,
    completions_rx: Receiver<FetchCompletion>,
    status_rx: Receiver<ChartStatus>,
    controls: ControlValues,
    /// Last rejection or failure shown under the control bar.
    message: Option<String>,
    formatter: TickFormatter,
    view: ChartView,
}

impl IvPlotApp {
    pub fn new(cfg: &IvPlotConfig, variant: ChartVariant, ctx: egui::Context) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let formatter = cfg.tick_formatter();
        let mut controller = ReconfigController::new(variant, formatter);
        let status_rx = controller.subscribe();
        let (completions_tx, completions_rx) = std::sync::mpsc::channel();

        let mut app = Self {
            controls: ControlValues::new(
                controller.presentation(),
                LookbackWindow::default_for(variant).days(),
            ),
            controller,
            client: Arc::new(FetchClient::from_config(cfg)),
            runtime,
            completions_tx,
            completions_rx,
            status_rx,
            message: None,
            formatter,
            view: ChartView::default(),
        };
        log::info!("{variant}: fetching from {}", cfg.base_url);
        let ticket = app.controller.start();
        app.spawn_fetch(ticket, ctx);
        Ok(app)
    }

    fn spawn_fetch(&self, ticket: FetchTicket, ctx: egui::Context) {
        let client = Arc::clone(&self.client);
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let completion = ticket.run(client.as_ref()).await;
            // the window may already be closed
            let _ = tx.send(completion);
            ctx.request_repaint();
        });
    }

    fn drain(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.controller.complete(completion);
        }
        while let Ok(status) = self.status_rx.try_recv() {
            match status {
                ChartStatus::Ready { .. } => self.message = None,
                ChartStatus::Rejected(msg) | ChartStatus::Failed(msg) => self.message = Some(msg),
                ChartStatus::Loading { .. } | ChartStatus::Restyled { .. } => {}
            }
        }
    }

    fn control_bar(&mut self, ui: &mut egui::Ui) -> bool {
        let mut requested = false;
        ui.horizontal(|ui| {
            if self.controller.variant().is_candles() {
                ui.label("Type:");
                egui::ComboBox::from_id_salt("draw_type")
                    .selected_text(self.controls.draw_type.label())
                    .show_ui(ui, |ui| {
                        for t in DrawType::ALL {
                            ui.selectable_value(&mut self.controls.draw_type, t, t.label());
                        }
                    });
                ui.label("Colors:");
                egui::ComboBox::from_id_salt("palette")
                    .selected_text(self.controls.palette.label())
                    .show_ui(ui, |ui| {
                        for p in CandlePalette::ALL {
                            ui.selectable_value(&mut self.controls.palette, p, p.label());
                        }
                    });
                egui::ComboBox::from_id_salt("border")
                    .selected_text(self.controls.border.label())
                    .show_ui(ui, |ui| {
                        for b in BorderMode::ALL {
                            ui.selectable_value(&mut self.controls.border, b, b.label());
                        }
                    });
                ui.separator();
            }

            ui.label("Days:");
            let days = ui.add(egui::TextEdit::singleline(&mut self.controls.lookback).desired_width(48.0));
            let submitted = days.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .button(format!("{ARROWS_CLOCKWISE} Update"))
                .on_hover_text("Apply the settings and reload the data")
                .clicked();
            requested = clicked || submitted;

            if self.controller.is_loading() {
                ui.add(egui::Spinner::new());
            }
        });
        if let Some(msg) = &self.message {
            ui.colored_label(ui.visuals().warn_fg_color, format!("{WARNING} {msg}"));
        }
        requested
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// eframe integration
// ─────────────────────────────────────────────────────────────────────────────

impl eframe::App for IvPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain();

        let mut requested = false;
        egui::TopBottomPanel::top("ivplot_controls").show(ctx, |ui| {
            requested = self.control_bar(ui);
        });

        if requested {
            if let Ok(ticket) = self.controller.begin_update(&self.controls) {
                self.spawn_fetch(ticket, ctx.clone());
            }
            // rejections arrive as a status event
            self.drain();
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.controller.descriptor() {
            Some(desc) => self.view.show(ui, desc, &self.formatter),
            None => {
                ui.centered_and_justified(|ui| {
                    if self.controller.is_loading() {
                        ui.add(egui::Spinner::new().size(32.0));
                    } else {
                        ui.label("No data");
                    }
                });
            }
        });
    }
}
