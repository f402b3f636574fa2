//! Display diffing and the flip-board renderer.
//!
//! The engine never rewrites the whole display on a tick. It formats the
//! remaining time into unit strings, diffs them against the last painted
//! values, and advances only the units that changed. Each unit keeps two
//! slots — the outgoing "before" digit and the incoming "active" digit — so
//! a renderer can show a flip/slide transition without touching unchanged
//! units.

use lipgloss_extras::prelude::*;

/// Unit arrangement of a countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `HH:MM:SS`, the relative-duration mode.
    HoursMinutesSeconds,
    /// `D:HH:MM`, the absolute-deadline mode (days unpadded).
    DaysHoursMinutes,
}

impl Layout {
    /// Number of display units in this layout.
    pub const UNITS: usize = 3;

    fn zero_text(self, position: usize) -> &'static str {
        match (self, position) {
            (Layout::DaysHoursMinutes, 0) => "0",
            _ => "00",
        }
    }
}

/// Surface the display differ writes to.
///
/// The crate ships [`FlipBoard`] for terminal output; tests substitute a
/// recording implementation to assert on the exact update sequence.
pub trait Renderer {
    /// Advances one unit to a new digit string: the currently active slot
    /// becomes the outgoing "before" slot and its sibling takes the new text.
    fn advance(&mut self, position: usize, value: &str);

    /// Clears every unit back to zero digits. Runs on completion, before any
    /// completion callback fires.
    fn clear(&mut self);

    /// Applies the timeout style marker to the whole display.
    fn mark_timeout(&mut self);

    /// Restores pristine styling, removing the timeout marker. Runs on
    /// reset and on loop re-arm.
    fn restore(&mut self);
}

/// Result of pushing freshly formatted units at the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// Changed units were advanced; unchanged ones were left untouched.
    Updated,
    /// The unit list was empty: the display was cleared and the caller must
    /// run the completion path.
    Completed,
}

/// Diffs `units` against `last_displayed` and advances only the positions
/// that changed.
///
/// An empty `units` slice is the completion signal from the formatter: the
/// display is cleared, `last_displayed` is reset, and no digit is written.
pub fn apply_update(
    units: &[String],
    last_displayed: &mut Vec<String>,
    renderer: &mut dyn Renderer,
) -> DisplayOutcome {
    if units.is_empty() {
        renderer.clear();
        last_displayed.clear();
        return DisplayOutcome::Completed;
    }

    for (position, value) in units.iter().enumerate() {
        if last_displayed.get(position) != Some(value) {
            renderer.advance(position, value);
        }
    }
    last_displayed.clear();
    last_displayed.extend_from_slice(units);
    DisplayOutcome::Updated
}

/// Per-unit styles, the analog of the original widget's class names.
///
/// Defaults follow the original scheme: red hours, blue minutes, green
/// seconds. The timeout style is layered over the whole display once the
/// countdown completes.
#[derive(Debug, Clone)]
pub struct UnitStyles {
    /// Style for the days unit (absolute mode only).
    pub days: Style,
    /// Style for the hours unit.
    pub hours: Style,
    /// Style for the minutes unit.
    pub minutes: Style,
    /// Style for the seconds unit.
    pub seconds: Style,
    /// Style applied to the whole display after completion.
    pub timeout: Style,
    /// Style for the `:` separators.
    pub separator: Style,
}

impl Default for UnitStyles {
    fn default() -> Self {
        Self {
            days: Style::new(),
            hours: Style::new().foreground(Color::from("red")),
            minutes: Style::new().foreground(Color::from("blue")),
            seconds: Style::new().foreground(Color::from("green")),
            timeout: Style::new().foreground(Color::from("240")),
            separator: Style::new(),
        }
    }
}

impl UnitStyles {
    /// Unstyled digits, for plain or snapshot-tested output.
    pub fn plain() -> Self {
        Self {
            days: Style::new(),
            hours: Style::new(),
            minutes: Style::new(),
            seconds: Style::new(),
            timeout: Style::new(),
            separator: Style::new(),
        }
    }

    fn for_position(&self, layout: Layout, position: usize) -> &Style {
        match (layout, position) {
            (Layout::HoursMinutesSeconds, 0) => &self.hours,
            (Layout::HoursMinutesSeconds, 1) => &self.minutes,
            (Layout::DaysHoursMinutes, 0) => &self.days,
            (Layout::DaysHoursMinutes, 1) => &self.hours,
            (Layout::DaysHoursMinutes, _) => &self.minutes,
            (Layout::HoursMinutesSeconds, _) => &self.seconds,
        }
    }
}

/// One display unit: two digit slots with one marked active.
#[derive(Debug, Clone)]
struct UnitCell {
    slots: [String; 2],
    active: usize,
}

impl UnitCell {
    fn new(zero: &str) -> Self {
        Self {
            slots: [zero.to_string(), String::new()],
            active: 0,
        }
    }
}

/// Terminal renderer keeping an active/before slot pair per unit.
///
/// `view()` renders the active digits joined by separators; the before slots
/// hold the outgoing digits for hosts that animate transitions.
#[derive(Debug, Clone)]
pub struct FlipBoard {
    layout: Layout,
    styles: UnitStyles,
    units: Vec<UnitCell>,
    timed_out: bool,
    looping: bool,
}

impl FlipBoard {
    /// Creates a board with every unit showing zero digits.
    pub fn new(layout: Layout, styles: UnitStyles) -> Self {
        let units = (0..Layout::UNITS)
            .map(|position| UnitCell::new(layout.zero_text(position)))
            .collect();
        Self {
            layout,
            styles,
            units,
            timed_out: false,
            looping: false,
        }
    }

    /// The digit currently shown at `position`.
    pub fn active_value(&self, position: usize) -> &str {
        let cell = &self.units[position];
        &cell.slots[cell.active]
    }

    /// The outgoing digit at `position`, for transition effects.
    pub fn before_value(&self, position: usize) -> &str {
        let cell = &self.units[position];
        &cell.slots[1 - cell.active]
    }

    /// Whether the timeout marker is set.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Whether the board has been re-armed by a loop at least once.
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Marks the board as driven by a looping countdown, the analog of the
    /// original widget's `loop` class added on re-arm.
    pub fn mark_loop(&mut self) {
        self.looping = true;
    }

    /// Renders the active digits as a styled `H:M:S`-style string.
    pub fn view(&self) -> String {
        let sep = self.styles.separator.render(":");
        let rendered: Vec<String> = self
            .units
            .iter()
            .enumerate()
            .map(|(position, cell)| {
                self.styles
                    .for_position(self.layout, position)
                    .render(&cell.slots[cell.active])
            })
            .collect();
        let joined = rendered.join(&sep);
        if self.timed_out {
            self.styles.timeout.render(&joined)
        } else {
            joined
        }
    }
}

impl Renderer for FlipBoard {
    fn advance(&mut self, position: usize, value: &str) {
        if position >= self.units.len() {
            return;
        }
        let cell = &mut self.units[position];
        cell.active = 1 - cell.active;
        cell.slots[cell.active].clear();
        cell.slots[cell.active].push_str(value);
    }

    fn clear(&mut self) {
        for position in 0..self.units.len() {
            let zero = self.layout.zero_text(position);
            let cell = &mut self.units[position];
            cell.slots[cell.active].clear();
            cell.slots[cell.active].push_str(zero);
        }
    }

    fn mark_timeout(&mut self) {
        self.timed_out = true;
    }

    fn restore(&mut self) {
        self.timed_out = false;
    }
}
