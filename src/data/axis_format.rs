//! Tick label formatters for the time and value axes.
//!
//! All timestamp inputs are seconds since the UNIX epoch, rendered in the
//! formatter's fixed UTC offset (the market's wall clock, not the viewer's).

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

/// Strike labels are shown only on multiples of this value.
pub const STRIKE_TICK_STEP: f64 = 250.0;

// ─────────────────────────────────────────────────────────────────────────────
// TickFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Stateless label formatting bound to one UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickFormatter {
    pub offset: FixedOffset,
}

impl Default for TickFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl TickFormatter {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Offset east of UTC in minutes. Out-of-range offsets fall back to UTC.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        match FixedOffset::east_opt(minutes.saturating_mul(60)) {
            Some(offset) => Self { offset },
            None => {
                log::warn!("ignoring out-of-range UTC offset of {minutes} minutes");
                Self::utc()
            }
        }
    }

    /// `MM/DD HH:MM`, blanked unless it falls on an even hour.
    ///
    /// Dense hourly axes would otherwise print a label on every tick.
    pub fn format_hour_tick(&self, epoch_seconds: f64) -> String {
        let dt = self.zoned(epoch_seconds);
        let label = dt.format("%m/%d %H:%M").to_string();
        if is_even_hour_label(&label) {
            label
        } else {
            String::new()
        }
    }

    /// `DD日 HH:MM` for timestamps plotted as values on a secondary axis.
    pub fn format_date_tick(&self, epoch_seconds: f64) -> String {
        self.zoned(epoch_seconds).format("%d日 %H:%M").to_string()
    }

    /// `M/D H:00` for the hour-unit time scale of the candle chart.
    pub fn format_time_tick(&self, epoch_seconds: f64) -> String {
        let dt = self.zoned(epoch_seconds);
        format!("{}/{} {}:00", dt.format("%-m"), dt.format("%-d"), dt.hour())
    }

    /// `M/D H:MM` used in chart titles; only the minutes are padded.
    pub fn updated_at(&self, epoch_seconds: i64) -> String {
        let dt = self.zoned(epoch_seconds as f64);
        format!(
            "{}/{} {}:{:02}",
            dt.format("%-m"),
            dt.format("%-d"),
            dt.hour(),
            dt.minute()
        )
    }

    fn zoned(&self, secs: f64) -> DateTime<FixedOffset> {
        secs_to_utc(secs).with_timezone(&self.offset)
    }
}

/// Value label shown only when `value` is a multiple of [`STRIKE_TICK_STEP`].
pub fn format_value_tick(value: f64) -> String {
    if value.is_finite() && value % STRIKE_TICK_STEP == 0.0 {
        format_plain(value)
    } else {
        String::new()
    }
}

/// Plain number without a trailing `.0` for integral values.
pub fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Checks a formatted `MM/DD HH:MM` label for ` HH:00` with an even `HH`.
///
/// Works on the text so the rule matches exactly what is displayed.
pub fn is_even_hour_label(label: &str) -> bool {
    let Some((_, time)) = label.split_once(' ') else {
        return false;
    };
    let Some((hour, minute)) = time.split_once(':') else {
        return false;
    };
    if minute != "00" {
        return false;
    }
    hour.parse::<u32>().map(|h| h % 2 == 0).unwrap_or(false)
}

/// Seconds since epoch to UTC. Non-finite and out-of-range inputs fall back to the epoch.
fn secs_to_utc(secs: f64) -> DateTime<Utc> {
    if !secs.is_finite() {
        return DateTime::UNIX_EPOCH;
    }
    let s = secs.floor() as i64;
    let ns_frac = (((secs - s as f64) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(s, ns_frac).unwrap_or(DateTime::UNIX_EPOCH)
}
