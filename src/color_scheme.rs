//! Candle palettes and outline styling for the OHLC chart.
//!
//! This module contains the [`CandlePalette`] and [`BorderMode`] enums and the
//! colour sets they resolve to.

use egui::Color32;

/// Body colours per candle direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleColors {
    pub up: Color32,
    pub down: Color32,
    pub unchanged: Color32,
}

impl CandleColors {
    /// Colour for a candle moving from `open` to `close`.
    pub fn for_move(&self, open: f64, close: f64) -> Color32 {
        if close > open {
            self.up
        } else if close < open {
            self.down
        } else {
            self.unchanged
        }
    }
}

pub const DEFAULT_CANDLE_COLORS: CandleColors = CandleColors {
    up: Color32::from_rgb(80, 160, 115),
    down: Color32::from_rgb(215, 85, 65),
    unchanged: Color32::from_rgb(90, 90, 90),
};

pub const NEON_CANDLE_COLORS: CandleColors = CandleColors {
    up: Color32::from_rgb(0x01, 0xff, 0x01),
    down: Color32::from_rgb(0xfe, 0x00, 0x00),
    unchanged: Color32::from_rgb(0x99, 0x99, 0x99),
};

/// Outline colour used when borders are shown.
pub const DEFAULT_BORDER_COLOR: Color32 = Color32::from_rgb(90, 90, 90);

/// Candle body palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandlePalette {
    #[default]
    Default,
    /// High-saturation green/red.
    Neon,
}

impl CandlePalette {
    pub const ALL: [CandlePalette; 2] = [CandlePalette::Default, CandlePalette::Neon];

    pub fn label(&self) -> &'static str {
        match self {
            CandlePalette::Default => "Default",
            CandlePalette::Neon => "Neon",
        }
    }

    pub fn colors(&self) -> CandleColors {
        match self {
            CandlePalette::Default => DEFAULT_CANDLE_COLORS,
            CandlePalette::Neon => NEON_CANDLE_COLORS,
        }
    }

    /// Read a colour-scheme control value; anything but `neon` is the default palette.
    pub fn from_control(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("neon") {
            CandlePalette::Neon
        } else {
            CandlePalette::Default
        }
    }
}

/// Whether candles get a distinct outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// One neutral outline colour for every candle.
    #[default]
    Outlined,
    /// Outline takes the default body colour of its direction, so it blends in.
    Hidden,
}

/// Resolved outline colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleOutline {
    Single(Color32),
    PerDirection(CandleColors),
}

impl CandleOutline {
    pub fn for_move(&self, open: f64, close: f64) -> Color32 {
        match self {
            CandleOutline::Single(c) => *c,
            CandleOutline::PerDirection(colors) => colors.for_move(open, close),
        }
    }
}

impl BorderMode {
    pub const ALL: [BorderMode; 2] = [BorderMode::Outlined, BorderMode::Hidden];

    pub fn label(&self) -> &'static str {
        match self {
            BorderMode::Outlined => "Border",
            BorderMode::Hidden => "No border",
        }
    }

    /// Outline colours. The hidden mode always derives from the default
    /// palette and paints unchanged candles with the up colour.
    pub fn outline(&self) -> CandleOutline {
        match self {
            BorderMode::Outlined => CandleOutline::Single(DEFAULT_BORDER_COLOR),
            BorderMode::Hidden => CandleOutline::PerDirection(CandleColors {
                unchanged: DEFAULT_CANDLE_COLORS.up,
                ..DEFAULT_CANDLE_COLORS
            }),
        }
    }

    /// Read a border control value (`"true"` shows borders).
    pub fn from_control(value: &str) -> Self {
        if value.trim() == "true" {
            BorderMode::Outlined
        } else {
            BorderMode::Hidden
        }
    }
}
