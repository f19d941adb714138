//! Top-level entry point for running the viewer as a native window.

use eframe::egui;

use crate::config::IvPlotConfig;
use crate::data::variant::ChartVariant;

use super::ivplot_app::IvPlotApp;

/// Open a window showing `variant` and block until it is closed.
///
/// The initial fetch at the variant's default lookback is issued as soon as
/// the app is created.
pub fn run_ivplot(mut cfg: IvPlotConfig, variant: ChartVariant) -> eframe::Result<()> {
    let title = format!("{} - {}", cfg.window_title, variant.label());
    let mut opts = cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1200.0, 720.0));
    }

    eframe::run_native(
        &title,
        opts,
        Box::new(move |cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            let app = IvPlotApp::new(&cfg, variant, cc.egui_ctx.clone())?;
            Ok(Box::new(app))
        }),
    )
}
