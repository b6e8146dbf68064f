//! View state: selection, credits, countdown, hover, animation and transient messages,
//! plus the purchase flow. All mutation goes through the methods here.

use crate::LotteryConfig;
use crate::countdown::{Countdown, Tick, encouragement};
use crate::records::{Draw, Ticket};
use crate::selection::{SELECTION_CAP, Selection, SelectionError, Toggle};
use crate::timers::{FrameLoop, TimerKind, TimerToken, Timers};
use chrono::{DateTime, Local};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("Hold on, your last ticket is still being confirmed!")]
    AwaitingConfirmation,
    #[error("Please select exactly 10 numbers!")]
    IncompleteSelection { selected: usize },
    #[error("Not enough credits!")]
    InsufficientCredits { balance: u32, price: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Warning,
    Success,
}

/// Short-lived text shown over the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    /// Increases with every posted message; the UI restarts its fade-in when it changes.
    pub serial: u64,
    /// Timer allowed to clear this message. A timer from an older message is ignored.
    clear_on: Option<TimerToken>,
}

pub struct LotteryState {
    config: LotteryConfig,
    selection: Selection,
    credits: u32,
    countdown: Countdown<Local>,
    message: Option<Message>,
    message_serial: u64,
    hover: Option<usize>,
    animating: bool,
    frames: FrameLoop,
    timers: Timers,
    rng: Pcg32,
    tickets: Vec<Ticket>,
}

impl LotteryState {
    pub fn new(config: LotteryConfig, wall_clock: DateTime<Local>) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, "Quick-pick generator seeded");
        Self {
            selection: Selection::new(),
            credits: config.starting_credits,
            countdown: Countdown::new(&wall_clock, config.draw_time),
            message: None,
            message_serial: 0,
            hover: None,
            animating: false,
            frames: FrameLoop::default(),
            timers: Timers::new(),
            rng: Pcg32::seed_from_u64(seed),
            tickets: Vec::new(),
            config,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn ticket_price(&self) -> u32 {
        self.config.ticket_price
    }

    pub fn countdown(&self) -> &Countdown<Local> {
        &self.countdown
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Pulse phase while the confirmation animation runs.
    pub fn animation_phase(&self, now: Instant) -> Option<f32> {
        if self.animating {
            self.frames.phase(now)
        } else {
            None
        }
    }

    /// True while the per-frame loop needs the screen redrawn every frame.
    pub fn wants_frames(&self) -> bool {
        self.frames.is_running()
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Quick-pick buttons are disabled once the cap is reached.
    pub fn can_quick_select(&self) -> bool {
        !self.selection.is_full()
    }

    pub fn can_buy(&self) -> bool {
        self.selection.len() == SELECTION_CAP && !self.animating
    }

    /// When the next one-shot timer is due, if any.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    /// Returns true when the hovered cell changed.
    pub fn set_hover(&mut self, hover: Option<usize>) -> bool {
        let changed = self.hover != hover;
        self.hover = hover;
        changed
    }

    fn post(&mut self, text: String, kind: MessageKind, clear_on: Option<TimerToken>) {
        self.message_serial += 1;
        self.message = Some(Message {
            text,
            kind,
            serial: self.message_serial,
            clear_on,
        });
    }

    /// Validation message that clears itself after the configured delay.
    fn warn(&mut self, text: String, now: Instant) {
        let token = self
            .timers
            .schedule_in(TimerKind::ClearMessage, now, self.config.message_ttl);
        self.post(text, MessageKind::Warning, Some(token));
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.timers.cancel(TimerKind::ClearMessage);
    }

    pub fn toggle_number(&mut self, index: usize, now: Instant) -> Result<Toggle, SelectionError> {
        match self.selection.toggle(index) {
            Ok(toggle) => {
                tracing::debug!(?toggle, picked = self.selection.len(), "Number toggled");
                self.clear_message();
                Ok(toggle)
            }
            Err(err) => {
                if err == SelectionError::SelectionFull {
                    tracing::debug!(index, "Selection full, pick rejected");
                    self.warn(err.to_string(), now);
                }
                Err(err)
            }
        }
    }

    /// Random pick of up to `count` more numbers. No-op at the cap.
    pub fn quick_select(&mut self, count: usize) -> Vec<u8> {
        if !self.can_quick_select() {
            return Vec::new();
        }
        let added = self.selection.quick_fill(count, &mut self.rng);
        tracing::debug!(count, ?added, "Quick pick");
        added
    }

    pub fn buy_ticket(
        &mut self,
        now: Instant,
        wall_clock: DateTime<Local>,
    ) -> Result<Ticket, PurchaseError> {
        if let Err(err) = self.check_purchase() {
            tracing::info!(%err, credits = self.credits, picked = self.selection.len(), "Purchase rejected");
            self.warn(err.to_string(), now);
            return Err(err);
        }
        self.credits -= self.config.ticket_price;
        let draw = Draw::scheduled(self.countdown.deadline().naive_local());
        let serial = self.tickets.len() as u32 + 1;
        let ticket = Ticket::new(
            serial,
            self.selection.picked(),
            &draw,
            wall_clock.naive_local(),
        );
        self.tickets.push(ticket.clone());

        self.animating = true;
        self.frames.start(now);
        let finish = self.timers.schedule_in(
            TimerKind::FinishPurchase,
            now,
            self.config.confirmation_window,
        );
        self.timers.cancel(TimerKind::ClearMessage);
        let hours = self.countdown.hours_until(&wall_clock);
        self.post(
            encouragement(hours).to_string(),
            MessageKind::Success,
            Some(finish),
        );
        tracing::info!(
            ticket = %ticket.id,
            draw = %ticket.draw_id,
            draw_at = %draw.date,
            numbers = ?ticket.numbers,
            credits = self.credits,
            "Ticket purchased"
        );
        Ok(ticket)
    }

    fn check_purchase(&self) -> Result<(), PurchaseError> {
        if self.animating {
            return Err(PurchaseError::AwaitingConfirmation);
        }
        if self.selection.len() != SELECTION_CAP {
            return Err(PurchaseError::IncompleteSelection {
                selected: self.selection.len(),
            });
        }
        if self.credits < self.config.ticket_price {
            return Err(PurchaseError::InsufficientCredits {
                balance: self.credits,
                price: self.config.ticket_price,
            });
        }
        Ok(())
    }

    /// Manual reset: clears the selection and any message.
    pub fn reset_ticket(&mut self) {
        self.selection.reset();
        self.clear_message();
    }

    /// Fire due timers. Returns true if anything changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let fired = self.timers.take_due(now);
        let changed = !fired.is_empty();
        for token in fired {
            match token.kind {
                TimerKind::ClearMessage => self.clear_message_if(token),
                TimerKind::FinishPurchase => {
                    self.animating = false;
                    self.frames.cancel();
                    self.selection.reset();
                    self.clear_message_if(token);
                    tracing::debug!("Purchase confirmation finished");
                }
            }
        }
        changed
    }

    fn clear_message_if(&mut self, token: TimerToken) {
        if self.message.as_ref().is_some_and(|m| m.clear_on == Some(token)) {
            self.message = None;
        }
    }

    /// One-second countdown tick.
    pub fn tick_clock(&mut self, wall_clock: DateTime<Local>) -> Tick {
        self.countdown.tick(&wall_clock)
    }

    /// Teardown: nothing scheduled survives the view.
    pub fn shutdown(&mut self) {
        self.timers.cancel_all();
        self.frames.cancel();
        self.animating = false;
        tracing::debug!(tickets = self.tickets.len(), "Lottery state shut down");
    }
}
