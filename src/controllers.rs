//! The reconfiguration controller.
//!
//! [`ReconfigController`] owns the live [`ChartDescriptor`] and drives the
//! Idle/Fetching state machine: control values come in, presentation is
//! applied at once, a sequence-numbered fetch goes out and only the newest
//! response is applied. Observers subscribe to [`ChartStatus`] events.

use std::sync::mpsc::{Receiver, Sender};

use crate::chart::{self, ChartDescriptor, DrawType, Presentation};
use crate::color_scheme::{BorderMode, CandlePalette};
use crate::data::axis_format::TickFormatter;
use crate::data::variant::{ChartVariant, FetchedData};
use crate::error::FetchError;
use crate::fetch::{FetchClient, LookbackWindow, Transport};

// ─────────────────────────────────────────────────────────────────────────────
// Control values
// ─────────────────────────────────────────────────────────────────────────────

/// A snapshot of the control bar at the moment the user asks for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlValues {
    pub draw_type: DrawType,
    pub palette: CandlePalette,
    pub border: BorderMode,
    /// Raw text of the days field; validated by [`LookbackWindow::parse`].
    pub lookback: String,
}

impl ControlValues {
    pub fn new(presentation: Presentation, lookback_days: u32) -> Self {
        Self {
            draw_type: presentation.draw_type,
            palette: presentation.palette,
            border: presentation.border,
            lookback: lookback_days.to_string(),
        }
    }

    /// Build from the string values of the selectors (`candlestick`/`ohlc`,
    /// `neon`/other, `true`/other). An unknown draw type keeps the default.
    pub fn from_controls(draw_type: &str, palette: &str, border: &str, lookback: &str) -> Self {
        Self {
            draw_type: DrawType::from_control(draw_type).unwrap_or_default(),
            palette: CandlePalette::from_control(palette),
            border: BorderMode::from_control(border),
            lookback: lookback.to_string(),
        }
    }

    pub fn presentation(&self) -> Presentation {
        Presentation {
            draw_type: self.draw_type,
            palette: self.palette,
            border: self.border,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State and events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    /// Waiting for the response of request `seq`; older requests are superseded.
    Fetching { seq: u64 },
}

/// Events published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartStatus {
    /// A request went out; the loading indicator is shown.
    Loading { seq: u64 },
    /// New data was applied to the chart.
    Ready { revision: u64 },
    /// Presentation changed without new data.
    Restyled { revision: u64 },
    /// The update was refused before any request was sent.
    Rejected(String),
    /// The latest request failed; the previous data stays on screen.
    Failed(String),
}

/// A request the controller wants executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub variant: ChartVariant,
    pub lookback: LookbackWindow,
}

impl FetchTicket {
    /// Perform the request and tag the result with this ticket's sequence number.
    pub async fn run<T: Transport>(self, client: &FetchClient<T>) -> FetchCompletion {
        log::debug!("fetch #{} {} {}", self.seq, self.variant, self.lookback);
        FetchCompletion {
            seq: self.seq,
            result: client.fetch_window(self.variant, self.lookback).await,
        }
    }
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub seq: u64,
    pub result: Result<FetchedData, FetchError>,
}

/// What [`ReconfigController::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied { revision: u64 },
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    Failed(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// ReconfigController
// ─────────────────────────────────────────────────────────────────────────────

pub struct ReconfigController {
    variant: ChartVariant,
    formatter: TickFormatter,
    descriptor: Option<ChartDescriptor>,
    presentation: Presentation,
    state: ControllerState,
    next_seq: u64,
    listeners: Vec<Sender<ChartStatus>>,
}

impl ReconfigController {
    pub fn new(variant: ChartVariant, formatter: TickFormatter) -> Self {
        Self {
            variant,
            formatter,
            descriptor: None,
            presentation: Presentation::default(),
            state: ControllerState::Idle,
            next_seq: 1,
            listeners: Vec::new(),
        }
    }

    pub fn variant(&self) -> ChartVariant {
        self.variant
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Whether the loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ControllerState::Fetching { .. })
    }

    /// The live chart, once the first response has been applied.
    pub fn descriptor(&self) -> Option<&ChartDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// Subscribe to status events.
    pub fn subscribe(&mut self) -> Receiver<ChartStatus> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Initial load at the variant's default lookback.
    pub fn start(&mut self) -> FetchTicket {
        self.issue(LookbackWindow::default_for(self.variant))
    }

    /// React to an update action.
    ///
    /// Presentation is applied to the live chart before the lookback is
    /// validated. An invalid lookback returns the error without touching the
    /// loading state and publishes [`ChartStatus::Rejected`].
    pub fn begin_update(&mut self, controls: &ControlValues) -> Result<FetchTicket, FetchError> {
        self.restyle(controls.presentation());

        match LookbackWindow::parse(&controls.lookback) {
            Ok(lookback) => Ok(self.issue(lookback)),
            Err(err) => {
                let msg = err.to_user_message();
                self.publish(ChartStatus::Rejected(msg));
                Err(err)
            }
        }
    }

    /// Apply a finished request. Only the most recently issued request is applied.
    pub fn complete(&mut self, completion: FetchCompletion) -> CompletionOutcome {
        let current = match self.state {
            ControllerState::Fetching { seq } if seq == completion.seq => seq,
            _ => {
                log::debug!("discarding stale response #{}", completion.seq);
                return CompletionOutcome::Stale;
            }
        };
        self.state = ControllerState::Idle;

        match completion.result {
            Ok(data) => {
                let revision = self.apply(data);
                log::debug!("applied response #{current}, revision {revision}");
                self.publish(ChartStatus::Ready { revision });
                CompletionOutcome::Applied { revision }
            }
            Err(err) => {
                let msg = err.to_user_message();
                self.publish(ChartStatus::Failed(msg.clone()));
                CompletionOutcome::Failed(msg)
            }
        }
    }

    /// `begin_update`, fetch and `complete` in one step.
    pub async fn update<T: Transport>(
        &mut self,
        client: &FetchClient<T>,
        controls: &ControlValues,
    ) -> Result<CompletionOutcome, FetchError> {
        let ticket = self.begin_update(controls)?;
        let completion = ticket.run(client).await;
        Ok(self.complete(completion))
    }

    fn issue(&mut self, lookback: LookbackWindow) -> FetchTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let ControllerState::Fetching { seq: prev } = self.state {
            log::debug!("request #{seq} supersedes #{prev}");
        }
        self.state = ControllerState::Fetching { seq };
        self.publish(ChartStatus::Loading { seq });
        FetchTicket {
            seq,
            variant: self.variant,
            lookback,
        }
    }

    fn restyle(&mut self, presentation: Presentation) {
        self.presentation = presentation;
        if let Some(desc) = self.descriptor.as_mut() {
            let before = desc.revision;
            desc.apply_presentation(presentation);
            if desc.revision != before {
                let revision = desc.revision;
                self.publish(ChartStatus::Restyled { revision });
            }
        }
    }

    fn apply(&mut self, data: FetchedData) -> u64 {
        match self.descriptor.as_mut() {
            Some(desc) => {
                chart::update(desc, data);
                desc.revision
            }
            None => {
                let desc = chart::render(self.variant, data, self.presentation, &self.formatter);
                let revision = desc.revision;
                self.descriptor = Some(desc);
                revision
            }
        }
    }

    fn publish(&mut self, status: ChartStatus) {
        self.listeners.retain(|tx| tx.send(status.clone()).is_ok());
    }
}
