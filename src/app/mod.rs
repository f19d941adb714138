//! The eframe viewer.
//!
//! | Sub-module      | Responsibility |
//! | --------------- | -------------- |
//! | [`ivplot_app`]  | [`IvPlotApp`]: control bar, loading indicator and background fetches |
//! | [`plot`]        | Drawing a chart descriptor with egui_plot |
//! | [`run`]         | Top-level [`run_ivplot()`] entry point |

mod ivplot_app;
pub mod plot;
mod run;

pub use ivplot_app::IvPlotApp;
pub use run::run_ivplot;
