use std::io::{self, Write};
use std::time::Duration;

use console::Style;

const BAR_WIDTH: usize = 30;

/// Bar color bands by integer percent elapsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BarColor {
    Red,
    Yellow,
    Green,
}

impl BarColor {
    /// Picks the band for a percentage: red below 33, yellow through 66,
    /// green above.
    pub fn for_percent(percent: u64) -> Self {
        if percent < 33 {
            Self::Red
        } else if percent <= 66 {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Red => Style::new().red(),
            Self::Yellow => Style::new().yellow(),
            Self::Green => Style::new().green(),
        }
    }
}

/// Formats whole seconds as `MM:SS`.
fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Renders one progress line as styled segments (clock, bar, clock).
///
/// `console` drops the escape sequences itself when the stream is not a
/// terminal, so non-interactive output degrades to plain text.
fn render_line(elapsed: u64, total: u64) -> String {
    let percent = if total == 0 {
        100
    } else {
        elapsed * 100 / total
    };
    let filled = BAR_WIDTH * percent as usize / 100;
    let bar: String = std::iter::repeat('█')
        .take(filled)
        .chain(std::iter::repeat('░').take(BAR_WIDTH - filled))
        .collect();
    let styled = BarColor::for_percent(percent).style().apply_to(bar);
    format!(
        "{} [{}] {} remaining",
        format_clock(elapsed),
        styled,
        format_clock(total.saturating_sub(elapsed)),
    )
}

/// Blocking visual wait used to respect rate-limit backoff.
///
/// Emits one progress line per tick, overwriting the previous line. The tick
/// is one wall-clock second in production; tests shrink it to avoid real
/// delays and render into a buffer instead of stdout.
#[derive(Clone, Debug)]
pub struct Countdown {
    tick: Duration,
    enabled: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            tick: Duration::from_secs(1),
            enabled: true,
        }
    }

    /// Waits without drawing anything. The sleep still happens.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Overrides the tick duration.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Waits `seconds` ticks, drawing the progress line to stdout.
    pub async fn run(&self, seconds: u64) {
        let mut out = io::stdout();
        self.run_to(seconds, &mut out).await;
    }

    /// Waits `seconds` ticks, drawing into the given writer.
    pub(crate) async fn run_to<W: Write>(&self, seconds: u64, out: &mut W) {
        for elapsed in 0..seconds {
            self.draw(out, render_line(elapsed, seconds), false);
            tokio::time::sleep(self.tick).await;
        }
        self.draw(out, render_line(seconds, seconds), true);
    }

    fn draw<W: Write>(&self, out: &mut W, line: String, last: bool) {
        if !self.enabled {
            return;
        }
        // Display is best effort; a broken pipe must not fail the wait.
        if last {
            let _ = writeln!(out, "\r{line}");
        } else {
            let _ = write!(out, "\r{line}");
        }
        let _ = out.flush();
    }
}
