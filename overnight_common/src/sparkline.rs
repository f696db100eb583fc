//! Sparkline geometry.
//!
//! Reduces a `HistorySeries` to a polyline in a fixed logical viewport with a
//! top-left origin: the oldest sample sits at `x = 0`, the newest at `x = width`,
//! and higher prices map to smaller `y`. Only geometry is produced here; turning it
//! into SVG, canvas or terminal glyphs is left to the caller.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::raw::HistorySeries;

/// Trend tag attached to a path.
///
/// A series that ends exactly where it started is tagged `Up`. `Flat` is reserved
/// for paths with nothing to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Last sample at or above the first.
    Up,
    /// Last sample below the first.
    Down,
    /// Fewer than two samples.
    Flat,
}

/// Logical drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Vertical padding kept free above the highest and below the lowest point.
    pub margin: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 100.0,
            height: 30.0,
            margin: 0.0,
        }
    }
}

/// Connected polyline plus its direction tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparklinePath {
    /// Points in draw order, oldest first.
    pub points: Vec<(f64, f64)>,
    /// Overall trend of the series.
    pub direction: Direction,
}

impl SparklinePath {
    /// Path with no points.
    pub fn empty() -> Self {
        SparklinePath {
            points: Vec::new(),
            direction: Direction::Flat,
        }
    }

    /// `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Map `history` into `viewport`.
///
/// Never fails: fewer than two samples give an empty path, and a series with no
/// movement gives a horizontal line at mid-height.
pub fn render(history: &HistorySeries, viewport: Viewport) -> SparklinePath {
    let samples = history.samples();
    let n = samples.len();
    if n < 2 {
        return SparklinePath::empty();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let flat = max == min;
    let range = if flat { 1.0 } else { max - min };
    let span = viewport.height - 2.0 * viewport.margin;
    let last_index = (n - 1) as f64;

    let points = samples
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = i as f64 / last_index * viewport.width;
            let y = if flat {
                viewport.height / 2.0
            } else {
                (viewport.height - viewport.margin) - ((value - min) / range) * span
            };
            (x, y)
        })
        .collect();

    let direction = if samples[n - 1] >= samples[0] {
        Direction::Up
    } else {
        Direction::Down
    };

    SparklinePath { points, direction }
}

/// Inline trend line for a bare percent change.
///
/// Draws the change as a two-sample series starting from 100. A non-finite change
/// or one at or below -100% has no drawable series and yields an empty path.
pub fn render_change(percent_change: f64, viewport: Viewport) -> SparklinePath {
    if !percent_change.is_finite() {
        return SparklinePath::empty();
    }
    let series = HistorySeries::new([100.0, 100.0 * (1.0 + percent_change / 100.0)]);
    render(&series, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> HistorySeries {
        HistorySeries::new(values.iter().copied())
    }

    #[test]
    fn test_flat_series_is_mid_height_and_up() {
        let path = render(&series(&[5.0, 5.0, 5.0]), Viewport::default());
        assert_eq!(path.points.len(), 3);
        assert!(path.points.iter().all(|&(_, y)| y == 15.0));
        assert_eq!(path.direction, Direction::Up);
    }

    #[test]
    fn test_rising_prices_move_up_the_screen() {
        let path = render(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), Viewport::default());
        let ys: Vec<f64> = path.points.iter().map(|p| p.1).collect();
        assert!(ys.windows(2).all(|w| w[1] < w[0]), "{ys:?}");
        assert_eq!(path.direction, Direction::Up);
    }

    #[test]
    fn test_short_histories_render_nothing() {
        let empty = render(&series(&[]), Viewport::default());
        assert!(empty.is_empty());
        assert_eq!(empty.direction, Direction::Flat);

        let single = render(&series(&[42.0]), Viewport::default());
        assert!(single.is_empty());
    }

    #[test]
    fn test_points_span_the_viewport() {
        let viewport = Viewport {
            width: 200.0,
            height: 40.0,
            margin: 4.0,
        };
        let path = render(&series(&[10.0, 30.0, 20.0]), viewport);
        assert_eq!(path.points[0], (0.0, 36.0));
        assert_eq!(path.points[1], (100.0, 4.0));
        assert_eq!(path.points[2], (200.0, 20.0));
        assert_eq!(path.direction, Direction::Up);
    }

    #[test]
    fn test_falling_series_is_down() {
        let path = render(&series(&[3.0, 1.0]), Viewport::default());
        assert_eq!(path.direction, Direction::Down);
        assert_eq!(path.points, vec![(0.0, 0.0), (100.0, 30.0)]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let history = series(&[3.2, 3.5, 3.1, 3.9]);
        assert_eq!(
            render(&history, Viewport::default()),
            render(&history, Viewport::default())
        );
    }

    #[test]
    fn test_render_change() {
        let up = render_change(2.5, Viewport::default());
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(up.points, vec![(0.0, 30.0), (100.0, 0.0)]);

        let down = render_change(-1.0, Viewport::default());
        assert_eq!(down.direction, Direction::Down);

        let zero = render_change(0.0, Viewport::default());
        assert_eq!(zero.direction, Direction::Up);

        assert!(render_change(f64::NAN, Viewport::default()).is_empty());
        assert!(render_change(-100.0, Viewport::default()).is_empty());
    }

    #[test]
    fn test_direction_text() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
    }
}
