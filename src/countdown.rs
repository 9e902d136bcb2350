//! Countdowns to special dates.
//!
//! A [`CountdownBoard`] tracks any number of countdowns. The host polls it
//! with the current time; once per second it reports a [`CountdownEvent::Tick`]
//! per countdown with the zero-padded remaining time, and a single
//! [`CountdownEvent::Completed`] when a countdown reaches its target. The
//! completion carries the celebration [`Sequence`] to play, which
//! [`play_completions`] hands to a [`ParticleAnimator`].
//!
//! The board only polls while it holds at least one countdown.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::animator::{DEFAULT_FIREWORK_COUNT, DEFAULT_HEART_COUNT, ParticleAnimator};
use crate::events::effect::{Anchor, Effect};
use crate::sequence::Sequence;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
/// Progress bars assume a countdown spans at most one year.
const MS_PER_YEAR: i64 = 365 * MS_PER_DAY;

pub const UPDATE_INTERVAL_MS: i64 = 1000;
/// Delay between completion and automatic removal.
pub const AUTO_REMOVE_DELAY_MS: i64 = 5000;

/// Remaining time split into display units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeLeft {
    pub total_ms: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    pub fn from_millis(total_ms: i64) -> Self {
        TimeLeft {
            total_ms,
            days: total_ms / MS_PER_DAY,
            hours: (total_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (total_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (total_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn units(&self) -> UnitStrings {
        UnitStrings {
            days: format!("{:02}", self.days),
            hours: format!("{:02}", self.hours),
            minutes: format!("{:02}", self.minutes),
            seconds: format!("{:02}", self.seconds),
        }
    }
}

/// Time left until `target`, or `None` once it has been reached.
pub fn time_left(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<TimeLeft> {
    let diff = (target - now).num_milliseconds();
    (diff > 0).then(|| TimeLeft::from_millis(diff))
}

/// Share of a year already elapsed, as a percentage in `[0, 100]`.
pub fn progress(left: &TimeLeft) -> f64 {
    let pct = (MS_PER_YEAR - left.total_ms) as f64 / MS_PER_YEAR as f64 * 100.0;
    pct.clamp(0.0, 100.0)
}

fn on_year(date: NaiveDate, year: i32) -> NaiveDate {
    // Feb 29 rolls over to Mar 1 outside leap years.
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

/// Next midnight (UTC) falling on the month and day of `date`.
///
/// Today's date counts as upcoming only while its midnight is not past.
pub fn next_occurrence(date: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
    let this_year = on_year(date, now.year())
        .and_time(NaiveTime::MIN)
        .and_utc();
    if this_year < now {
        on_year(date, now.year() + 1)
            .and_time(NaiveTime::MIN)
            .and_utc()
    } else {
        this_year
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownStyle {
    #[default]
    Elegant,
    Modern,
    Romantic,
    Minimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownColor {
    #[default]
    Pink,
    Red,
    Purple,
    Blue,
    Gold,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountdownOptions {
    /// Explicit id; generated when `None`.
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub show_days: bool,
    pub show_hours: bool,
    pub show_minutes: bool,
    pub show_seconds: bool,
    pub style: CountdownStyle,
    pub color: CountdownColor,
    /// Drop the countdown a few seconds after it completes.
    pub auto_remove: bool,
    /// Played when the countdown completes.
    pub celebration: Sequence,
}

impl Default for CountdownOptions {
    fn default() -> Self {
        CountdownOptions {
            id: None,
            title: "Special Day".to_string(),
            description: "Something amazing is coming!".to_string(),
            show_days: true,
            show_hours: true,
            show_minutes: true,
            show_seconds: true,
            style: CountdownStyle::default(),
            color: CountdownColor::default(),
            auto_remove: true,
            celebration: Sequence::success_celebration(),
        }
    }
}

impl CountdownOptions {
    pub fn anniversary(years: u32) -> Self {
        CountdownOptions {
            title: format!("{years} Year Anniversary! 💕"),
            description: "Celebrating your beautiful journey together".to_string(),
            style: CountdownStyle::Romantic,
            color: CountdownColor::Pink,
            celebration: Sequence::success_celebration().then(
                0,
                Effect::HeartBurst {
                    at: Anchor::Center,
                    count: DEFAULT_HEART_COUNT,
                },
            ),
            ..Self::default()
        }
    }

    pub fn birthday(name: &str) -> Self {
        CountdownOptions {
            title: format!("{name}'s Birthday! 🎂"),
            description: "Get ready to celebrate!".to_string(),
            style: CountdownStyle::Modern,
            color: CountdownColor::Gold,
            celebration: Sequence::success_celebration().then(
                0,
                Effect::Firework {
                    at: Anchor::relative(0.5, 0.3),
                    count: DEFAULT_FIREWORK_COUNT,
                },
            ),
            ..Self::default()
        }
    }
}

/// Zero-padded display strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitStrings {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

/// Which display units changed since the previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangedUnits {
    pub days: bool,
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl ChangedUnits {
    fn between(prev: Option<&UnitStrings>, next: &UnitStrings) -> Self {
        match prev {
            None => ChangedUnits {
                days: true,
                hours: true,
                minutes: true,
                seconds: true,
            },
            Some(p) => ChangedUnits {
                days: p.days != next.days,
                hours: p.hours != next.hours,
                minutes: p.minutes != next.minutes,
                seconds: p.seconds != next.seconds,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CountdownEvent {
    Tick {
        id: String,
        units: UnitStrings,
        changed: ChangedUnits,
        progress: f64,
    },
    Completed {
        id: String,
        title: String,
        celebration: Sequence,
    },
    Removed {
        id: String,
    },
}

#[derive(Clone, Debug)]
pub struct Countdown {
    pub id: String,
    pub target: DateTime<Utc>,
    pub options: CountdownOptions,
    pub time_left: Option<TimeLeft>,
    last_units: Option<UnitStrings>,
    completed_at: Option<DateTime<Utc>>,
}

impl Countdown {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Default)]
pub struct CountdownBoard {
    countdowns: BTreeMap<String, Countdown>,
    next_id: u64,
    last_update: Option<DateTime<Utc>>,
}

impl CountdownBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a countdown; returns its id. An existing countdown with the same
    /// id is replaced.
    pub fn create(&mut self, target: DateTime<Utc>, options: CountdownOptions) -> String {
        let id = options.id.clone().unwrap_or_else(|| {
            self.next_id += 1;
            format!("countdown_{}", self.next_id)
        });
        info!("countdown {id} \"{}\" targets {target}", options.title);
        self.countdowns.insert(
            id.clone(),
            Countdown {
                id: id.clone(),
                target,
                options,
                time_left: None,
                last_units: None,
                completed_at: None,
            },
        );
        id
    }

    /// Countdown to the next anniversary of `date`.
    pub fn create_anniversary(&mut self, date: NaiveDate, years: u32, now: DateTime<Utc>) -> String {
        self.create(next_occurrence(date, now), CountdownOptions::anniversary(years))
    }

    /// Countdown to the next birthday on `date`.
    pub fn create_birthday(&mut self, date: NaiveDate, name: &str, now: DateTime<Utc>) -> String {
        self.create(next_occurrence(date, now), CountdownOptions::birthday(name))
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.countdowns.remove(id).is_some();
        if removed && self.countdowns.is_empty() {
            debug!("countdown update loop stopped");
            self.last_update = None;
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Countdown> {
        self.countdowns.get(id)
    }

    pub fn len(&self) -> usize {
        self.countdowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countdowns.is_empty()
    }

    /// The 1 s update loop runs exactly while there are countdowns.
    pub fn is_loop_running(&self) -> bool {
        !self.countdowns.is_empty()
    }

    /// Update once a full interval has passed since the last update.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<CountdownEvent> {
        if !self.is_loop_running() {
            return Vec::new();
        }
        match self.last_update {
            Some(last) if (now - last).num_milliseconds() < UPDATE_INTERVAL_MS => Vec::new(),
            _ => self.update(now),
        }
    }

    /// Update every countdown at `now`.
    pub fn update(&mut self, now: DateTime<Utc>) -> Vec<CountdownEvent> {
        self.last_update = Some(now);
        let mut events = Vec::new();
        let mut expired = Vec::new();

        for countdown in self.countdowns.values_mut() {
            if let Some(done) = countdown.completed_at {
                if countdown.options.auto_remove && (now - done).num_milliseconds() >= AUTO_REMOVE_DELAY_MS {
                    expired.push(countdown.id.clone());
                }
                continue;
            }

            match time_left(countdown.target, now) {
                Some(left) => {
                    let units = left.units();
                    let changed = ChangedUnits::between(countdown.last_units.as_ref(), &units);
                    countdown.time_left = Some(left);
                    countdown.last_units = Some(units.clone());
                    events.push(CountdownEvent::Tick {
                        id: countdown.id.clone(),
                        units,
                        changed,
                        progress: progress(&left),
                    });
                }
                None => {
                    info!("{} has arrived!", countdown.options.title);
                    countdown.time_left = None;
                    countdown.completed_at = Some(now);
                    events.push(CountdownEvent::Completed {
                        id: countdown.id.clone(),
                        title: countdown.options.title.clone(),
                        celebration: countdown.options.celebration.clone(),
                    });
                }
            }
        }

        for id in expired {
            self.remove(&id);
            events.push(CountdownEvent::Removed { id });
        }
        events
    }
}

/// Play the celebration of every completed countdown in `events`.
pub fn play_completions(animator: &mut ParticleAnimator, events: &[CountdownEvent]) -> usize {
    events
        .iter()
        .filter_map(|event| match event {
            CountdownEvent::Completed { celebration, .. } => {
                animator.play_sequence(celebration.clone())
            }
            _ => None,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_time_left_breakdown() {
        let now = at(2026, 1, 1, 0, 0, 0);
        let target = at(2026, 1, 3, 4, 5, 6);
        let left = time_left(target, now).unwrap();
        assert_eq!(left.days, 2);
        assert_eq!(left.hours, 4);
        assert_eq!(left.minutes, 5);
        assert_eq!(left.seconds, 6);
        assert_eq!(left.units().hours, "04");
    }

    #[test]
    fn test_time_left_none_when_reached() {
        let now = at(2026, 1, 1, 0, 0, 0);
        assert!(time_left(now, now).is_none());
        assert!(time_left(now - TimeDelta::seconds(1), now).is_none());
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(progress(&TimeLeft::from_millis(MS_PER_YEAR * 2)), 0.0);
        assert!((progress(&TimeLeft::from_millis(MS_PER_YEAR / 2)) - 50.0).abs() < 1e-9);
        assert!((progress(&TimeLeft::from_millis(1)) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_next_occurrence_rolls_to_next_year() {
        let now = at(2026, 6, 1, 12, 0, 0);
        let date = NaiveDate::from_ymd_opt(2019, 3, 14).unwrap();
        assert_eq!(next_occurrence(date, now), at(2027, 3, 14, 0, 0, 0));
        let later = NaiveDate::from_ymd_opt(2019, 9, 1).unwrap();
        assert_eq!(next_occurrence(later, now), at(2026, 9, 1, 0, 0, 0));
    }

    #[test]
    fn test_leap_day_rolls_to_march_first() {
        let now = at(2026, 1, 10, 0, 0, 0);
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(next_occurrence(date, now), at(2026, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut board = CountdownBoard::new();
        let now = at(2026, 1, 1, 0, 0, 0);
        let a = board.create(now, CountdownOptions::default());
        let b = board.create(now, CountdownOptions::default());
        assert_ne!(a, b);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_changed_units_tracks_differences() {
        let mut board = CountdownBoard::new();
        let now = at(2026, 1, 1, 0, 0, 0);
        board.create(now + TimeDelta::seconds(90), CountdownOptions::default());

        let first = board.update(now);
        let CountdownEvent::Tick { changed, .. } = &first[0] else {
            panic!("expected tick");
        };
        assert!(changed.days && changed.seconds);

        let second = board.update(now + TimeDelta::seconds(1));
        let CountdownEvent::Tick { changed, units, .. } = &second[0] else {
            panic!("expected tick");
        };
        assert_eq!(units.minutes, "01");
        assert_eq!(units.seconds, "29");
        assert!(changed.seconds);
        assert!(!changed.minutes && !changed.days);
    }

    #[test]
    fn test_poll_respects_interval() {
        let mut board = CountdownBoard::new();
        let now = at(2026, 1, 1, 0, 0, 0);
        assert!(board.poll(now).is_empty());
        board.create(now + TimeDelta::hours(1), CountdownOptions::default());
        assert_eq!(board.poll(now).len(), 1);
        assert!(board.poll(now + TimeDelta::milliseconds(500)).is_empty());
        assert_eq!(board.poll(now + TimeDelta::seconds(1)).len(), 1);
    }

    #[test]
    fn test_special_countdown_titles() {
        let a = CountdownOptions::anniversary(3);
        assert_eq!(a.title, "3 Year Anniversary! 💕");
        assert_eq!(a.style, CountdownStyle::Romantic);
        let b = CountdownOptions::birthday("Sam");
        assert_eq!(b.title, "Sam's Birthday! 🎂");
        assert_eq!(b.color, CountdownColor::Gold);
        assert_eq!(b.celebration.steps.last().unwrap().effect.name(), "firework");
    }
}
