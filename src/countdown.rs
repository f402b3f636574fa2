//! Countdown widget for bubbletea-rs applications.
//!
//! A `Model` binds one on-screen countdown to a wall-clock target and keeps
//! the display synchronized until the target is reached. Remaining time is
//! always re-derived from a fixed anchor and the live clock, so slow or
//! delayed ticks never accumulate drift.
//!
//! Two time sources are supported, mutually exclusive:
//!
//! - **relative**: a duration from now (`with_seconds_left`, or fractional
//!   `with_minutes_left`), displayed as `HH:MM:SS`;
//! - **absolute**: a fixed epoch instant (`with_zero_date`), displayed as
//!   `D:HH:MM` with rounded minutes.
//!
//! # Basic usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::{new, with_seconds_left, with_styles};
//! use bubbletea_countdown::display::UnitStyles;
//!
//! let timer = new(&[with_seconds_left(90), with_styles(UnitStyles::plain())]).unwrap();
//! assert_eq!(timer.view(), "00:01:30");
//! assert!(timer.running());
//! ```
//!
//! # bubbletea-rs integration
//!
//! ```rust,ignore
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use bubbletea_countdown::countdown::{new, Model, CompletedMsg, with_seconds_left};
//!
//! struct App {
//!     timer: Model,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let timer = new(&[with_seconds_left(300)]).unwrap();
//!         let cmd = timer.init();
//!         (Self { timer }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(done) = msg.downcast_ref::<CompletedMsg>() {
//!             if done.id == self.timer.id() {
//!                 // countdown finished
//!             }
//!         }
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.timer.view()
//!     }
//! }
//! ```

use crate::clock::{Anchor, SystemClock, TimeSource};
use crate::display::{apply_update, DisplayOutcome, FlipBoard, Layout, Renderer, UnitStyles};
use crate::format::{format_absolute, format_relative};
use crate::key::KeyMap;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

// Internal ID management for countdown instances.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default tick period in relative mode.
pub const DEFAULT_REFRESH_RELATIVE: Duration = Duration::from_millis(1_000);

/// Default tick period in absolute-deadline mode, where only days, hours and
/// minutes are shown and second-level redraws would be wasted.
pub const DEFAULT_REFRESH_ABSOLUTE: Duration = Duration::from_millis(10_000);

/// Fatal configuration error: the countdown was started with neither a
/// relative duration nor an absolute target instant.
///
/// Raised synchronously from [`new`]; a misconfigured countdown fails loudly
/// at build time instead of silently rendering nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("countdown has no time source: supply seconds_left, minutes_left, or zero_date")]
pub struct MissingTimeSourceError;

/// Lifecycle phase of a countdown instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ticking; the display tracks the wall clock.
    Running,
    /// Frozen at the last computed remaining time; no tick is pending.
    Paused,
    /// Reached zero. Terminal unless looping is enabled, in which case a
    /// re-arm is pending.
    Completed,
}

/// Completion callback, invoked exactly once per completion with the
/// countdown's id.
pub type CompleteFn = Arc<dyn Fn(i64) + Send + Sync>;

/// Periodic tick driving one recomputation-and-redraw cycle.
///
/// Carries the owning countdown's id plus a generation tag; pausing,
/// completing or resetting bumps the generation so an already-scheduled tick
/// is rejected on arrival. A cancelled tick therefore never mutates state.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Id of the countdown this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// One-shot message that re-arms a completed, looping countdown after the
/// configured loop interval.
#[derive(Debug, Clone)]
pub struct RearmMsg {
    /// Id of the countdown to re-arm.
    pub id: i64,
    tag: i64,
}

/// Sent once when a non-looping countdown completes, for hosts that route by
/// message instead of (or in addition to) the `on_complete` callback.
#[derive(Debug, Clone)]
pub struct CompletedMsg {
    /// Id of the countdown that completed.
    pub id: i64,
}

/// Configuration option for [`new`].
pub enum CountdownOption {
    /// Relative mode: seconds until the countdown reaches zero.
    WithSecondsLeft(i64),
    /// Relative mode: fractional minutes until zero, converted to seconds.
    /// Ignored when seconds are also supplied.
    WithMinutesLeft(f64),
    /// Absolute mode: target epoch second. Takes precedence over a relative
    /// duration when both are supplied.
    WithZeroDate(i64),
    /// Overrides the mode-dependent default tick period.
    WithRefreshRate(Duration),
    /// Re-arms the countdown after each completion.
    WithLoop(bool),
    /// Delay between a completion and its loop re-arm. Zero by default.
    WithLoopInterval(Duration),
    /// Enables the pause/resume transitions and the toggle key binding.
    WithAllowPause(bool),
    /// Callback invoked once per completion.
    WithOnComplete(CompleteFn),
    /// Display styles for the digit units.
    WithStyles(Box<UnitStyles>),
    /// Key bindings used when pausing is allowed.
    WithKeyMap(KeyMap),
    /// Substitute wall clock, used by tests and demos.
    WithTimeSource(Arc<dyn TimeSource>),
}

/// Seconds until zero (relative mode).
pub fn with_seconds_left(secs: i64) -> CountdownOption {
    CountdownOption::WithSecondsLeft(secs)
}

/// Fractional minutes until zero (relative mode).
pub fn with_minutes_left(minutes: f64) -> CountdownOption {
    CountdownOption::WithMinutesLeft(minutes)
}

/// Target epoch second (absolute mode).
pub fn with_zero_date(target: i64) -> CountdownOption {
    CountdownOption::WithZeroDate(target)
}

/// Overrides the tick period.
pub fn with_refresh_rate(rate: Duration) -> CountdownOption {
    CountdownOption::WithRefreshRate(rate)
}

/// Enables loop re-arming after completion.
pub fn with_loop(enabled: bool) -> CountdownOption {
    CountdownOption::WithLoop(enabled)
}

/// Sets the delay before a loop re-arm.
pub fn with_loop_interval(interval: Duration) -> CountdownOption {
    CountdownOption::WithLoopInterval(interval)
}

/// Allows pausing, and with it the toggle key binding.
pub fn with_allow_pause(allowed: bool) -> CountdownOption {
    CountdownOption::WithAllowPause(allowed)
}

/// Registers the completion callback.
pub fn with_on_complete(callback: CompleteFn) -> CountdownOption {
    CountdownOption::WithOnComplete(callback)
}

/// Sets the display styles.
pub fn with_styles(styles: UnitStyles) -> CountdownOption {
    CountdownOption::WithStyles(Box::new(styles))
}

/// Replaces the pause key bindings.
pub fn with_key_map(keymap: KeyMap) -> CountdownOption {
    CountdownOption::WithKeyMap(keymap)
}

/// Substitutes the wall clock.
pub fn with_time_source(clock: Arc<dyn TimeSource>) -> CountdownOption {
    CountdownOption::WithTimeSource(clock)
}

struct Config {
    seconds_left: Option<i64>,
    minutes_left: Option<f64>,
    zero_date: Option<i64>,
    refresh_rate: Option<Duration>,
    loop_enabled: bool,
    loop_interval: Duration,
    allow_pause: bool,
    on_complete: Option<CompleteFn>,
    styles: UnitStyles,
    keymap: KeyMap,
    clock: Arc<dyn TimeSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seconds_left: None,
            minutes_left: None,
            zero_date: None,
            refresh_rate: None,
            loop_enabled: false,
            loop_interval: Duration::ZERO,
            allow_pause: false,
            on_complete: None,
            styles: UnitStyles::default(),
            keymap: KeyMap::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl CountdownOption {
    fn apply(&self, cfg: &mut Config) {
        match self {
            CountdownOption::WithSecondsLeft(secs) => cfg.seconds_left = Some(*secs),
            CountdownOption::WithMinutesLeft(minutes) => cfg.minutes_left = Some(*minutes),
            CountdownOption::WithZeroDate(target) => cfg.zero_date = Some(*target),
            CountdownOption::WithRefreshRate(rate) => cfg.refresh_rate = Some(*rate),
            CountdownOption::WithLoop(enabled) => cfg.loop_enabled = *enabled,
            CountdownOption::WithLoopInterval(interval) => cfg.loop_interval = *interval,
            CountdownOption::WithAllowPause(allowed) => cfg.allow_pause = *allowed,
            CountdownOption::WithOnComplete(callback) => {
                cfg.on_complete = Some(callback.clone())
            }
            CountdownOption::WithStyles(styles) => cfg.styles = styles.as_ref().clone(),
            CountdownOption::WithKeyMap(keymap) => cfg.keymap = keymap.clone(),
            CountdownOption::WithTimeSource(clock) => cfg.clock = clock.clone(),
        }
    }
}

/// Creates a countdown model from configuration options.
///
/// Exactly one time source must be resolvable: an absolute `zero_date`, or a
/// relative duration from `seconds_left`/`minutes_left` (seconds win when
/// both relative forms are given; an absolute instant wins over either).
/// With no resolvable source this fails with [`MissingTimeSourceError`] —
/// other countdowns in the host are unaffected.
///
/// The anchor is fixed here: relative mode computes `end_time = now +
/// duration` once, and every later tick re-derives the remaining time from
/// that anchor. The initial digits are painted immediately; a countdown
/// started at zero leaves the display at zeros and completes on its first
/// tick.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::countdown::{new, with_minutes_left, with_styles, MissingTimeSourceError};
/// use bubbletea_countdown::display::UnitStyles;
///
/// let timer = new(&[with_minutes_left(1.5), with_styles(UnitStyles::plain())]).unwrap();
/// assert_eq!(timer.view(), "00:01:30");
///
/// assert_eq!(new(&[]).unwrap_err(), MissingTimeSourceError);
/// ```
pub fn new(opts: &[CountdownOption]) -> Result<Model, MissingTimeSourceError> {
    let mut cfg = Config::default();
    for opt in opts {
        opt.apply(&mut cfg);
    }
    Model::from_config(cfg)
}

/// Countdown widget model: one bound display element and its timer state.
///
/// Each model owns its state exclusively; hosts showing several countdowns
/// create several models, and the id/tag guards keep their messages from
/// interfering.
#[derive(Clone)]
pub struct Model {
    id: i64,
    // Scheduler generation: bumping it cancels whatever tick or re-arm is
    // still in flight, so at most one live handle exists per instance.
    tag: i64,
    clock: Arc<dyn TimeSource>,
    anchor: Anchor,
    duration_secs: Option<i64>,
    refresh_rate: Duration,
    loop_enabled: bool,
    loop_interval: Duration,
    allow_pause: bool,
    on_complete: Option<CompleteFn>,
    keymap: KeyMap,
    phase: Phase,
    remaining: i64,
    last_displayed: Vec<String>,
    board: FlipBoard,
}

impl Model {
    fn from_config(cfg: Config) -> Result<Self, MissingTimeSourceError> {
        let now = cfg.clock.now();

        let (anchor, duration_secs, layout, default_rate) = if let Some(target) = cfg.zero_date
        {
            (
                Anchor::Absolute { target },
                None,
                Layout::DaysHoursMinutes,
                DEFAULT_REFRESH_ABSOLUTE,
            )
        } else {
            let secs = cfg
                .seconds_left
                .or_else(|| cfg.minutes_left.map(|m| (m * 60.0).round() as i64))
                .ok_or(MissingTimeSourceError)?;
            (
                Anchor::Relative {
                    end_time: now + secs,
                },
                Some(secs),
                Layout::HoursMinutesSeconds,
                DEFAULT_REFRESH_RELATIVE,
            )
        };

        let mut model = Self {
            id: next_id(),
            tag: 0,
            clock: cfg.clock,
            anchor,
            duration_secs,
            refresh_rate: cfg.refresh_rate.unwrap_or(default_rate),
            loop_enabled: cfg.loop_enabled,
            loop_interval: cfg.loop_interval,
            allow_pause: cfg.allow_pause,
            on_complete: cfg.on_complete,
            keymap: cfg.keymap,
            phase: Phase::Running,
            remaining: 0,
            last_displayed: Vec::new(),
            board: FlipBoard::new(layout, cfg.styles),
        };
        model.remaining = model.anchor.remaining(now);
        model.paint();
        Ok(model)
    }

    /// Unique identifier of this countdown, used to route messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the countdown is actively ticking.
    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Whether the countdown is paused.
    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Whether the countdown has reached zero.
    pub fn completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Effective tick period.
    pub fn refresh_rate(&self) -> Duration {
        self.refresh_rate
    }

    /// Seconds left: live while running, frozen while paused, zero once
    /// completed. Never negative.
    pub fn remaining(&self) -> i64 {
        match self.phase {
            Phase::Running => self.anchor.remaining(self.clock.now()),
            Phase::Paused => self.remaining,
            Phase::Completed => 0,
        }
    }

    /// The display board, exposing per-unit active/before digits.
    pub fn display(&self) -> &FlipBoard {
        &self.board
    }

    /// Key bindings in effect, for help views.
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Returns the command that starts the tick cycle.
    pub fn init(&self) -> Cmd {
        self.tick_cmd()
    }

    fn tick_cmd(&self) -> Cmd {
        let (id, tag) = (self.id, self.tag);
        bubbletea_tick(self.refresh_rate, move |_| {
            Box::new(TickMsg { id, tag }) as Msg
        })
    }

    fn rearm_cmd(&self) -> Cmd {
        let (id, tag) = (self.id, self.tag);
        bubbletea_tick(self.loop_interval, move |_| {
            Box::new(RearmMsg { id, tag }) as Msg
        })
    }

    fn completed_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(CompletedMsg { id }) as Msg
        })
    }

    fn format_units(&self, remaining_secs: i64) -> Vec<String> {
        if self.anchor.is_absolute() {
            format_absolute(remaining_secs * 1_000)
        } else {
            format_relative(remaining_secs)
        }
    }

    // Redraws the current remaining time without running the completion
    // path; completion is only ever triggered by a tick recomputation.
    fn paint(&mut self) {
        let units = self.format_units(self.anchor.remaining(self.clock.now()));
        if !units.is_empty() {
            apply_update(&units, &mut self.last_displayed, &mut self.board);
        }
    }

    /// Pauses a running countdown: the pending tick is cancelled and the
    /// remaining time freezes at its current value.
    ///
    /// No-op unless pausing was allowed at build time and the countdown is
    /// running.
    pub fn pause(&mut self) {
        if !self.allow_pause || self.phase != Phase::Running {
            return;
        }
        self.remaining = self.anchor.remaining(self.clock.now());
        self.phase = Phase::Paused;
        self.tag += 1;
    }

    /// Resumes a paused countdown, returning the command for its next tick.
    ///
    /// In relative mode the anchor is re-derived as `now + frozen`, so
    /// wall-clock time spent paused is excluded from the elapsed time. In
    /// absolute mode the deadline is a fixed instant, so resuming recomputes
    /// from the original target instead. A countdown whose duration fully
    /// elapsed while paused reads zero and completes on the next tick.
    pub fn resume(&mut self) -> Option<Cmd> {
        if self.phase != Phase::Paused {
            return None;
        }
        if !self.anchor.is_absolute() {
            self.anchor = Anchor::Relative {
                end_time: self.clock.now() + self.remaining,
            };
        }
        self.phase = Phase::Running;
        self.tag += 1;
        self.paint();
        Some(self.tick_cmd())
    }

    /// Alternates pause and resume, the click-toggle behavior.
    ///
    /// No-op unless pausing was allowed at build time.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if !self.allow_pause {
            return None;
        }
        match self.phase {
            Phase::Running => {
                self.pause();
                None
            }
            Phase::Paused => self.resume(),
            Phase::Completed => None,
        }
    }

    /// Restarts the countdown with a fresh anchor and pristine styling,
    /// returning the command for its first tick.
    ///
    /// Relative mode re-anchors to the originally configured duration;
    /// absolute mode keeps its fixed target. Any pending tick or loop re-arm
    /// is cancelled.
    pub fn reset(&mut self) -> Cmd {
        self.tag += 1;
        self.rebuild_anchor();
        self.board.restore();
        self.phase = Phase::Running;
        self.remaining = self.anchor.remaining(self.clock.now());
        self.last_displayed.clear();
        self.paint();
        self.tick_cmd()
    }

    fn rebuild_anchor(&mut self) {
        if let Some(secs) = self.duration_secs {
            self.anchor = Anchor::Relative {
                end_time: self.clock.now() + secs,
            };
        }
    }

    fn rearm(&mut self) -> Cmd {
        let cmd = self.reset();
        self.board.mark_loop();
        cmd
    }

    fn complete(&mut self) -> Option<Cmd> {
        self.phase = Phase::Completed;
        self.remaining = 0;
        self.tag += 1;
        if let Some(callback) = &self.on_complete {
            callback(self.id);
        }
        self.board.mark_timeout();
        if self.loop_enabled {
            Some(self.rearm_cmd())
        } else {
            Some(self.completed_cmd())
        }
    }

    /// Processes tick, re-arm and key messages.
    ///
    /// Messages for other instances (id mismatch) and cancelled callbacks
    /// (generation-tag mismatch) are rejected without touching state, which
    /// is what guarantees that a pause or reset takes effect synchronously
    /// even though the scheduled callback is already in flight.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if self.allow_pause && self.keymap.toggle.matches(key) {
                return self.toggle();
            }
            return None;
        }

        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            if tick.id != self.id || tick.tag != self.tag || self.phase != Phase::Running {
                return None;
            }
            let remaining = self.anchor.remaining(self.clock.now());
            self.remaining = remaining;
            let units = self.format_units(remaining);
            return match apply_update(&units, &mut self.last_displayed, &mut self.board) {
                DisplayOutcome::Completed => self.complete(),
                DisplayOutcome::Updated => Some(self.tick_cmd()),
            };
        }

        if let Some(rearm) = msg.downcast_ref::<RearmMsg>() {
            // A stale re-arm (instance was reset or re-armed already) must
            // not resurrect timer state.
            if rearm.id != self.id || rearm.tag != self.tag || self.phase != Phase::Completed {
                return None;
            }
            return Some(self.rearm());
        }

        None
    }

    /// Renders the countdown digits.
    pub fn view(&self) -> String {
        self.board.view()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("anchor", &self.anchor)
            .field("phase", &self.phase)
            .field("remaining", &self.remaining)
            .field("refresh_rate", &self.refresh_rate)
            .field("loop_enabled", &self.loop_enabled)
            .field("allow_pause", &self.allow_pause)
            .finish()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let model =
            new(&[with_seconds_left(60)]).expect("a relative duration was supplied");
        let cmd = model.init();
        (model, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::atomic::AtomicUsize;

    const NOW: i64 = 1_700_000_000;

    fn manual_model(opts: Vec<CountdownOption>) -> (Model, ManualClock) {
        let clock = ManualClock::new(NOW);
        let mut all = vec![
            with_time_source(Arc::new(clock.clone())),
            with_styles(UnitStyles::plain()),
        ];
        all.extend(opts);
        (new(&all).expect("valid options"), clock)
    }

    fn tick(model: &Model) -> Msg {
        Box::new(TickMsg {
            id: model.id,
            tag: model.tag,
        })
    }

    fn rearm(model: &Model) -> Msg {
        Box::new(RearmMsg {
            id: model.id,
            tag: model.tag,
        })
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn missing_time_source_is_a_build_error() {
        assert_eq!(new(&[]).unwrap_err(), MissingTimeSourceError);
        assert_eq!(
            new(&[with_allow_pause(true)]).unwrap_err(),
            MissingTimeSourceError
        );
    }

    #[test]
    fn unique_ids() {
        let (a, _) = manual_model(vec![with_seconds_left(5)]);
        let (b, _) = manual_model(vec![with_seconds_left(5)]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn initial_paint_and_decomposition() {
        let (model, _) = manual_model(vec![with_seconds_left(3_661)]);
        assert!(model.running());
        assert_eq!(model.remaining(), 3_661);
        assert_eq!(model.view(), "01:01:01");
    }

    #[test]
    fn zero_date_wins_over_seconds_left() {
        let (model, _) = manual_model(vec![
            with_seconds_left(5),
            with_zero_date(NOW + 90_061),
        ]);
        assert_eq!(model.view(), "1:01:01");
        assert_eq!(model.refresh_rate(), DEFAULT_REFRESH_ABSOLUTE);
    }

    #[test]
    fn seconds_win_over_minutes() {
        let (model, _) = manual_model(vec![with_minutes_left(2.0), with_seconds_left(30)]);
        assert_eq!(model.remaining(), 30);
    }

    #[test]
    fn minutes_left_converts_to_seconds() {
        let (model, _) = manual_model(vec![with_minutes_left(1.5)]);
        assert_eq!(model.remaining(), 90);
    }

    #[test]
    fn default_refresh_rates_by_mode() {
        let (relative, _) = manual_model(vec![with_seconds_left(5)]);
        assert_eq!(relative.refresh_rate(), DEFAULT_REFRESH_RELATIVE);
        let (absolute, _) = manual_model(vec![with_zero_date(NOW + 60)]);
        assert_eq!(absolute.refresh_rate(), DEFAULT_REFRESH_ABSOLUTE);
    }

    #[test]
    fn ticks_track_the_clock_not_a_decrement() {
        let (mut model, clock) = manual_model(vec![with_seconds_left(60)]);
        // A stalled scheduler delivers the next tick 13 seconds late; the
        // display still lands on the anchor-derived value.
        clock.advance(13);
        assert!(model.update(tick(&model)).is_some());
        assert_eq!(model.view(), "00:00:47");
        assert_eq!(model.remaining(), 47);
    }

    #[test]
    fn remaining_is_monotonic_while_running() {
        let (mut model, clock) = manual_model(vec![with_seconds_left(10)]);
        let mut previous = model.remaining();
        for _ in 0..12 {
            clock.advance(1);
            model.update(tick(&model));
            let current = model.remaining();
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn five_second_scenario_completes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let (mut model, clock) = manual_model(vec![
            with_seconds_left(5),
            with_on_complete(Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        ]);

        for _ in 0..4 {
            clock.advance(1);
            assert!(model.update(tick(&model)).is_some());
            assert!(model.running());
        }
        assert_eq!(model.view(), "00:00:01");

        clock.advance(1);
        let cmd = model.update(tick(&model));
        assert!(cmd.is_some()); // CompletedMsg notification
        assert!(model.completed());
        assert_eq!(model.view(), "00:00:00");
        assert!(model.display().timed_out());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // No further tick mutates the display or re-fires the callback.
        let stale = tick(&model);
        clock.advance(10);
        assert!(model.update(stale).is_none());
        assert_eq!(model.view(), "00:00:00");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn starting_at_zero_completes_on_first_tick() {
        let (mut model, _clock) = manual_model(vec![with_seconds_left(0)]);
        assert!(model.running());
        assert_eq!(model.view(), "00:00:00");
        assert!(model.update(tick(&model)).is_some());
        assert!(model.completed());
    }

    #[test]
    fn pause_excludes_idle_time() {
        let (mut model, clock) = manual_model(vec![
            with_seconds_left(10),
            with_allow_pause(true),
        ]);
        clock.advance(3);
        model.update(tick(&model));
        assert_eq!(model.remaining(), 7);

        model.pause();
        assert!(model.paused());
        clock.advance(1_000);
        assert_eq!(model.remaining(), 7);

        let cmd = model.resume();
        assert!(cmd.is_some());
        assert!(model.running());
        assert_eq!(model.remaining(), 7);

        clock.advance(1);
        model.update(tick(&model));
        assert_eq!(model.view(), "00:00:06");
    }

    #[test]
    fn pause_cancels_the_pending_tick() {
        let (mut model, clock) = manual_model(vec![
            with_seconds_left(10),
            with_allow_pause(true),
        ]);
        let in_flight = tick(&model);
        model.pause();
        clock.advance(5);
        // The already-scheduled tick arrives after the pause: rejected.
        assert!(model.update(in_flight).is_none());
        assert!(model.paused());
        assert_eq!(model.remaining(), 10);
    }

    #[test]
    fn pause_requires_allow_pause() {
        let (mut model, _clock) = manual_model(vec![with_seconds_left(10)]);
        model.pause();
        assert!(model.running());
        assert!(model.toggle().is_none());
        assert!(model.running());
    }

    #[test]
    fn resume_past_deadline_completes_on_next_tick() {
        let (mut model, clock) = manual_model(vec![
            with_seconds_left(5),
            with_allow_pause(true),
        ]);
        model.pause();
        clock.advance(60);
        model.resume();
        // Re-anchored to the frozen 5 seconds; let them all elapse.
        clock.advance(60);
        assert_eq!(model.remaining(), 0);
        assert!(model.update(tick(&model)).is_some());
        assert!(model.completed());
    }

    #[test]
    fn key_toggle_alternates_pause_and_resume() {
        let (mut model, _clock) = manual_model(vec![
            with_seconds_left(10),
            with_allow_pause(true),
        ]);
        assert!(model.update(key(KeyCode::Char(' '))).is_none());
        assert!(model.paused());
        assert!(model.update(key(KeyCode::Char(' '))).is_some());
        assert!(model.running());
    }

    #[test]
    fn keys_are_ignored_without_allow_pause() {
        let (mut model, _clock) = manual_model(vec![with_seconds_left(10)]);
        assert!(model.update(key(KeyCode::Char(' '))).is_none());
        assert!(model.running());
    }

    #[test]
    fn loop_rearms_with_a_fresh_anchor() {
        let (mut model, clock) = manual_model(vec![
            with_seconds_left(5),
            with_loop(true),
            with_loop_interval(Duration::from_secs(2)),
        ]);
        clock.advance(5);
        assert!(model.update(tick(&model)).is_some()); // re-arm scheduled
        assert!(model.completed());

        clock.advance(2);
        let cmd = model.update(rearm(&model));
        assert!(cmd.is_some());
        assert!(model.running());
        assert_eq!(model.remaining(), 5); // original duration, not 0
        assert!(model.display().looping());
        assert!(!model.display().timed_out());
        assert_eq!(model.view(), "00:00:05");
    }

    #[test]
    fn stale_rearm_does_not_resurrect_state() {
        let (mut model, clock) = manual_model(vec![
            with_seconds_left(5),
            with_loop(true),
        ]);
        clock.advance(5);
        model.update(tick(&model));
        assert!(model.completed());
        let pending = rearm(&model);

        // The caller resets before the re-arm fires; the stale re-arm must
        // be dropped instead of double-scheduling.
        model.reset();
        assert!(model.running());
        assert_eq!(model.remaining(), 5);
        assert!(model.update(pending).is_none());
        assert!(model.running());
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let (mut model, clock) = manual_model(vec![with_seconds_left(10)]);
        clock.advance(1);
        let foreign = Box::new(TickMsg {
            id: model.id + 999,
            tag: model.tag,
        }) as Msg;
        assert!(model.update(foreign).is_none());
        assert_eq!(model.view(), "00:00:10");
    }

    #[test]
    fn reset_restores_pristine_display() {
        let (mut model, clock) = manual_model(vec![with_seconds_left(3)]);
        clock.advance(3);
        model.update(tick(&model));
        assert!(model.display().timed_out());

        model.reset();
        assert!(!model.display().timed_out());
        assert_eq!(model.view(), "00:00:03");
        assert_eq!(model.remaining(), 3);
    }

    #[test]
    fn absolute_mode_formats_with_minute_carry() {
        let (model, _) = manual_model(vec![with_zero_date(NOW + 90_061)]);
        assert_eq!(model.view(), "1:01:01");
        assert_eq!(model.display().active_value(0), "1");
        assert_eq!(model.display().active_value(1), "01");
        assert_eq!(model.display().active_value(2), "01");
    }

    #[test]
    fn absolute_mode_completes_at_target() {
        let (mut model, clock) = manual_model(vec![with_zero_date(NOW + 30)]);
        clock.advance(30);
        assert!(model.update(tick(&model)).is_some());
        assert!(model.completed());
        assert_eq!(model.view(), "0:00:00");
    }

    #[test]
    fn absolute_resume_keeps_the_fixed_target() {
        let (mut model, clock) = manual_model(vec![
            with_zero_date(NOW + 100),
            with_allow_pause(true),
        ]);
        model.pause();
        clock.advance(40);
        model.resume();
        // The deadline is wall-clock-fixed; paused time is not excluded.
        assert_eq!(model.remaining(), 60);
    }

    #[test]
    fn only_changed_units_advance_on_tick() {
        let (mut model, clock) = manual_model(vec![with_seconds_left(65)]);
        assert_eq!(model.view(), "00:01:05");
        clock.advance(1);
        model.update(tick(&model));
        // Hours and minutes were untouched: their before-slots still hold
        // the initial zero digits, while seconds flipped.
        assert_eq!(model.display().active_value(2), "04");
        assert_eq!(model.display().before_value(2), "05");
        assert_eq!(model.display().active_value(1), "01");
    }

    #[test]
    fn completion_is_triggered_by_recomputation_not_formatting() {
        let (mut model, clock) = manual_model(vec![with_seconds_left(2)]);
        clock.advance(1);
        model.update(tick(&model));
        assert!(model.running());
        // Painting the same value again does not complete anything.
        clock.advance(0);
        model.update(tick(&model));
        assert!(model.running());
        clock.advance(1);
        model.update(tick(&model));
        assert!(model.completed());
    }
}
