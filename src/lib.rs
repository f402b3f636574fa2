#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-countdown/")]

//! # bubbletea-countdown
//!
//! A flip-style countdown widget for terminal applications built with
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs). The widget binds a
//! live `HH:MM:SS` (or `D:HH:MM`) display to a wall-clock target and keeps it
//! synchronized until the target is reached, following the Elm Architecture
//! pattern with `init()`, `update()`, and `view()` methods.
//!
//! ## Overview
//!
//! The crate is organized around a small timer engine:
//!
//! - [`clock`] — wall-clock access and the fixed anchor remaining time is
//!   recomputed from (never decremented, so tick jitter cannot drift).
//! - [`format`] — pure conversion of remaining time into zero-padded unit
//!   strings; an empty result signals completion.
//! - [`display`] — a diff layer that advances only changed units, each
//!   keeping an active/before slot pair for flip transitions, plus the
//!   lipgloss-styled [`FlipBoard`](display::FlipBoard) renderer.
//! - [`countdown`] — the widget [`Model`](countdown::Model): lifecycle
//!   (running, paused, completed, looping), tick scheduling with stale-tick
//!   guards, and the public control surface (`pause`, `resume`, `toggle`,
//!   `reset`).
//! - [`key`] — the pause/resume key bindings used when pausing is allowed.
//!
//! ## Quick start
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//! use bubbletea_countdown::display::UnitStyles;
//!
//! let timer = countdown_new(&[
//!     with_seconds_left(90),
//!     with_styles(UnitStyles::plain()),
//! ])
//! .unwrap();
//!
//! assert_eq!(timer.view(), "00:01:30");
//! ```
//!
//! In a bubbletea-rs application, return `timer.init()` from your `init()`
//! and forward messages to `timer.update(msg)`; the widget schedules its own
//! ticks and stops them when it pauses or completes. Completion is observable
//! three ways: the `on_complete` callback, the
//! [`CompletedMsg`](countdown::CompletedMsg) message, and the
//! [`Phase`](countdown::Phase) accessor.

pub mod clock;
pub mod countdown;
pub mod display;
pub mod format;
pub mod key;

pub use clock::{Anchor, ManualClock, SystemClock, TimeSource};
pub use countdown::{
    new as countdown_new, with_allow_pause, with_key_map, with_loop, with_loop_interval,
    with_minutes_left, with_on_complete, with_refresh_rate, with_seconds_left, with_styles,
    with_time_source, with_zero_date, CompleteFn, CompletedMsg, CountdownOption,
    MissingTimeSourceError, Model as Countdown, Phase, RearmMsg, TickMsg,
};
pub use display::{DisplayOutcome, FlipBoard, Layout, Renderer, UnitStyles};
pub use key::{Binding, KeyMap};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// let timer = countdown_new(&[with_seconds_left(30)]).unwrap();
/// assert!(timer.running());
/// ```
pub mod prelude {
    pub use crate::clock::{ManualClock, SystemClock, TimeSource};
    pub use crate::countdown::{
        new as countdown_new, with_allow_pause, with_key_map, with_loop, with_loop_interval,
        with_minutes_left, with_on_complete, with_refresh_rate, with_seconds_left, with_styles,
        with_time_source, with_zero_date, CompletedMsg, CountdownOption, MissingTimeSourceError,
        Model as Countdown, Phase,
    };
    pub use crate::display::{FlipBoard, UnitStyles};
    pub use crate::key::{Binding, KeyMap};
}
