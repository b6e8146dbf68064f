//! Countdown to the daily draw: deadline computation, `HHh MMm SSs` display, encouragement text.
//!
//! The deadline is an absolute instant in a time zone, so the time left stays exact across
//! daylight-saving changes.

use chrono::{DateTime, Days, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

/// Default daily draw time (17:00 local).
pub const DEFAULT_DRAW_TIME: NaiveTime = match NaiveTime::from_hms_opt(17, 0, 0) {
    Some(t) => t,
    None => panic!("17:00 is a valid time"),
};

/// Pin a local wall-clock time to an instant. Ambiguous times (clocks going back) take the
/// earlier instant; times skipped by clocks going forward move on by the skipped hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}

/// Next draw strictly after `now`: today at `draw_time`, or tomorrow once that has passed.
pub fn next_deadline<Tz: TimeZone>(now: &DateTime<Tz>, draw_time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.naive_local().date();
    (0..=2)
        .filter_map(|days| today.checked_add_days(Days::new(days)))
        .map(|date| resolve_local(&tz, date.and_time(draw_time)))
        .find(|deadline| deadline > now)
        .unwrap_or_else(|| now.clone() + TimeDelta::days(1))
}

/// `HHh MMm SSs`, zero-padded; hours are not wrapped at 24.
pub fn format_remaining(remaining: TimeDelta) -> String {
    let secs = remaining.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Message shown after a purchase, chosen by whole hours left before the draw.
pub fn encouragement(hours_until_draw: i64) -> &'static str {
    match hours_until_draw {
        h if h > 12 => "Ticket confirmed!",
        h if h > 6 => "You're entered! The draw is getting closer!",
        h if h > 3 => "Almost there! Your microwave awaits!",
        h if h > 1 => "Just a little longer! Good luck!",
        _ => "Get ready! The draw is happening soon!",
    }
}

/// Outcome of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Display refreshed.
    Updated,
    /// Deadline passed; a new one was computed and the display left as is.
    Rolled,
}

#[derive(Debug, Clone)]
pub struct Countdown<Tz: TimeZone> {
    draw_time: NaiveTime,
    deadline: DateTime<Tz>,
    display: String,
}

impl<Tz: TimeZone> Countdown<Tz> {
    pub fn new(now: &DateTime<Tz>, draw_time: NaiveTime) -> Self {
        let mut countdown = Self {
            draw_time,
            deadline: next_deadline(now, draw_time),
            display: String::new(),
        };
        countdown.tick(now);
        countdown
    }

    pub fn deadline(&self) -> &DateTime<Tz> {
        &self.deadline
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Elapsed real time until the draw.
    pub fn remaining(&self, now: &DateTime<Tz>) -> TimeDelta {
        self.deadline.clone() - now.clone()
    }

    /// Whole hours until the draw (floored; negative once passed).
    pub fn hours_until(&self, now: &DateTime<Tz>) -> i64 {
        self.remaining(now).num_milliseconds().div_euclid(3_600_000)
    }

    pub fn tick(&mut self, now: &DateTime<Tz>) -> Tick {
        let remaining = self.remaining(now);
        if remaining <= TimeDelta::zero() {
            self.deadline = next_deadline(now, self.draw_time);
            tracing::info!(deadline = %self.deadline.naive_local(), "Draw deadline rolled over");
            return Tick::Rolled;
        }
        self.display = format_remaining(remaining);
        Tick::Updated
    }

    /// Deadline as `dd/mm/yyyy, HH:MM` local time.
    pub fn draw_label(&self) -> String {
        self.deadline.naive_local().format("%d/%m/%Y, %H:%M").to_string()
    }
}
