//! Gantt chart geometry.
//!
//! Everything is expressed as percentages of a view window so that the
//! client can render at any pixel width. The zoom factor stretches bars
//! (zoomed out widens them, down to a floor) and picks the spacing of the
//! time-axis labels.

use chrono::{Duration, Months};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Bars never render narrower than this, so zero-length tasks stay visible.
pub const MIN_WIDTH_PERCENT: f64 = 2.0;
/// Bars never cover the whole chart.
pub const MAX_WIDTH_PERCENT: f64 = 95.0;
/// Lower bound of the `1 / zoom` width multiplier.
pub const MIN_ZOOM_ADJUSTMENT: f64 = 0.3;

/// Pixel budget auto-fit aims for.
pub const FIT_WIDTH_PX: f64 = 1200.0;
/// Nominal pixels per day at zoom 1.0.
pub const PX_PER_DAY: f64 = 80.0;

/// Most labels one axis carries; long windows switch to a wider interval.
pub const MAX_AXIS_LABELS: usize = 2000;

/// Window used when there is nothing to chart.
pub const EMPTY_WINDOW_DAYS: i64 = 30;

const MS_PER_DAY: f64 = 86_400_000.0;

// ---------------------------------------------------------------------------
// View window
// ---------------------------------------------------------------------------

/// The `[start, end]` range the chart spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ViewWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::Validation(
                "view_end must be after view_start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Smallest window covering `dates`, or `None` when there are none.
    ///
    /// A single instant is widened to one day.
    pub fn covering<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Timestamp>,
    {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, mut end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        if end <= start {
            end = start + Duration::days(1);
        }
        Some(Self { start, end })
    }

    /// Fallback window starting at `now`.
    pub fn empty_from(now: Timestamp) -> Self {
        Self {
            start: now,
            end: now + Duration::days(EMPTY_WINDOW_DAYS),
        }
    }

    pub fn total_ms(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64
    }

    pub fn total_days(&self) -> f64 {
        self.total_ms() / MS_PER_DAY
    }

    /// Offset of `at` from the window start as a percentage, floored at 0.
    pub fn offset_percent(&self, at: Timestamp) -> f64 {
        let ms = (at - self.start).num_milliseconds() as f64;
        (ms / self.total_ms() * 100.0).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Bars and markers
// ---------------------------------------------------------------------------

/// Horizontal placement of a task bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarPosition {
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]`; non-finite input falls
/// back to [`DEFAULT_ZOOM`].
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        DEFAULT_ZOOM
    }
}

/// Place a task spanning `[start, end]`.
pub fn task_position(window: &ViewWindow, start: Timestamp, end: Timestamp, zoom: f64) -> BarPosition {
    let total = window.total_ms();
    let left_percent = window.offset_percent(start);

    let zoom_adjustment = (1.0 / clamp_zoom(zoom)).max(MIN_ZOOM_ADJUSTMENT);
    let span_ms = (end - start).num_milliseconds() as f64;
    let width_percent = (span_ms / total * 100.0 * zoom_adjustment)
        .min(MAX_WIDTH_PERCENT)
        .max(MIN_WIDTH_PERCENT);

    BarPosition {
        left_percent,
        width_percent,
    }
}

/// Place a milestone diamond. Milestones are points in time, so only the
/// left offset exists.
pub fn milestone_position(window: &ViewWindow, due: Timestamp) -> f64 {
    window.offset_percent(due)
}

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Spacing between time-axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisInterval {
    Day,
    ThreeDays,
    Week,
    Month,
    Quarter,
    Year,
}

impl AxisInterval {
    /// Zoomed in shows finer labels.
    pub fn for_zoom(zoom: f64) -> Self {
        let zoom = clamp_zoom(zoom);
        if zoom >= 2.0 {
            Self::Day
        } else if zoom >= 1.0 {
            Self::ThreeDays
        } else if zoom >= 0.5 {
            Self::Week
        } else {
            Self::Month
        }
    }

    /// The next wider interval, if any.
    pub fn coarser(self) -> Option<Self> {
        match self {
            Self::Day => Some(Self::ThreeDays),
            Self::ThreeDays => Some(Self::Week),
            Self::Week => Some(Self::Month),
            Self::Month => Some(Self::Quarter),
            Self::Quarter => Some(Self::Year),
            Self::Year => None,
        }
    }

    /// Shortest possible length in days. Dividing a window by this gives an
    /// upper bound on its label count.
    fn min_days(self) -> f64 {
        match self {
            Self::Day => 1.0,
            Self::ThreeDays => 3.0,
            Self::Week => 7.0,
            Self::Month => 28.0,
            Self::Quarter => 89.0,
            Self::Year => 365.0,
        }
    }

    /// The `n`th tick counted from `origin`.
    ///
    /// Calendar intervals are measured from the origin, so a series starting
    /// on the 31st lands on each month's last day instead of drifting.
    pub fn nth(self, origin: Timestamp, n: u32) -> Option<Timestamp> {
        match self {
            Self::Day => origin.checked_add_signed(Duration::days(i64::from(n))),
            Self::ThreeDays => origin.checked_add_signed(Duration::days(3 * i64::from(n))),
            Self::Week => origin.checked_add_signed(Duration::weeks(i64::from(n))),
            Self::Month => origin.checked_add_months(Months::new(n)),
            Self::Quarter => origin.checked_add_months(Months::new(n.checked_mul(3)?)),
            Self::Year => origin.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    fn label_format(self) -> &'static str {
        match self {
            Self::Month | Self::Quarter => "%b %Y",
            Self::Year => "%Y",
            _ => "%b %d",
        }
    }
}

/// Interval for `zoom`, widened until the whole window fits in
/// [`MAX_AXIS_LABELS`] ticks.
pub fn axis_interval(window: &ViewWindow, zoom: f64) -> AxisInterval {
    let mut interval = AxisInterval::for_zoom(zoom);
    while window.total_days() / interval.min_days() + 1.0 > MAX_AXIS_LABELS as f64 {
        match interval.coarser() {
            Some(wider) => interval = wider,
            None => break,
        }
    }
    interval
}

/// One tick on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub at: Timestamp,
    pub label: String,
    pub left_percent: f64,
}

/// Ticks from the window start to its end, one interval apart.
pub fn axis_labels(window: &ViewWindow, zoom: f64) -> Vec<AxisLabel> {
    let interval = axis_interval(window, zoom);
    (0u32..)
        .map_while(|n| interval.nth(window.start, n))
        .take_while(|at| *at <= window.end)
        .take(MAX_AXIS_LABELS)
        .map(|at| AxisLabel {
            at,
            label: at.format(interval.label_format()).to_string(),
            left_percent: window.offset_percent(at),
        })
        .collect()
}

/// Zoom that makes the whole window fit the fixed pixel budget.
pub fn auto_fit_zoom(window: &ViewWindow) -> f64 {
    let days = window.total_days().max(1.0);
    clamp_zoom(FIT_WIDTH_PX / (days * PX_PER_DAY))
}
