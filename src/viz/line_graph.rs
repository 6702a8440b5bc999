use std::fmt::Write;

use tracing::warn;

use crate::viz::colour::SET2;
use crate::viz::layout::{ChartLayout, LinearScale};
use crate::viz::{SeriesKey, SeriesPoint, TimeSeriesView};

const TICKS: usize = 5;
const TITLE_FONT: f64 = 14.0;
const LEGEND_FONT: f64 = 10.0;

#[derive(Debug, Clone)]
struct Series {
    key: SeriesKey,
    colour: &'static str,
    points: Vec<(f64, f64)>,
}

/// Multi-series line chart with axes that grow to fit every point seen so far.
///
/// `x_max` and `y_max` are running maxima over all appended points, starting
/// at zero; they never decrease. The y axis is drawn up to `y_max` rounded up
/// to the next 0.1.
#[derive(Debug, Clone)]
pub struct LineGraph {
    title: String,
    layout: ChartLayout,
    series: Vec<Series>,
    x_max: f64,
    y_max: f64,
    svg: String,
}

impl LineGraph {
    pub fn new(title: impl Into<String>, keys: &[SeriesKey], layout: ChartLayout) -> Self {
        let mut graph = LineGraph {
            title: title.into(),
            layout,
            series: Vec::new(),
            x_max: 0.0,
            y_max: 0.0,
            svg: String::new(),
        };
        for &key in keys {
            graph.series_mut(key);
        }
        graph
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Upper bound of the drawn y axis.
    pub fn y_axis_max(&self) -> f64 {
        (self.y_max * 10.0).ceil() / 10.0
    }

    /// Points stored for `key`, in append order.
    pub fn points(&self, key: SeriesKey) -> &[(f64, f64)] {
        self.series
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.points.as_slice())
            .unwrap_or(&[])
    }

    fn series_mut(&mut self, key: SeriesKey) -> &mut Series {
        let pos = match self.series.iter().position(|s| s.key == key) {
            Some(pos) => pos,
            None => {
                let colour = SET2[self.series.len() % SET2.len()];
                self.series.push(Series { key, colour, points: Vec::new() });
                self.series.len() - 1
            }
        };
        &mut self.series[pos]
    }

    fn render(&self) -> String {
        let l = &self.layout;
        let x = LinearScale::new(self.x_max, 0.0, l.width);
        let y = LinearScale::new(self.y_axis_max(), l.height, 0.0);
        let mut out = String::new();

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" class="line-graph">"#,
            w = l.outer_width(),
            h = l.outer_height(),
        );
        let _ = write!(
            out,
            r#"<text font-size="{fs}" transform="translate({tx}, {ty})">{title}:</text>"#,
            fs = TITLE_FONT,
            tx = l.margin.left,
            ty = l.margin.top - TITLE_FONT,
            title = escape(&self.title),
        );
        let _ = write!(out, r#"<g transform="translate({}, {})">"#, l.margin.left, l.margin.top);

        // x axis along the bottom
        let _ = write!(
            out,
            r#"<g class="axis x" transform="translate(0, {h})"><line x1="0" y1="0" x2="{w}" y2="0" stroke="currentColor"/>"#,
            h = l.height,
            w = l.width,
        );
        for t in x.ticks(TICKS) {
            let px = x.map(t);
            let _ = write!(
                out,
                r#"<line x1="{px:.1}" y1="0" x2="{px:.1}" y2="6" stroke="currentColor"/><text x="{px:.1}" y="18" font-size="10" text-anchor="middle">{}</text>"#,
                format_tick(t),
            );
        }
        out.push_str("</g>");

        // y axis along the left
        let _ = write!(
            out,
            r#"<g class="axis y"><line x1="0" y1="0" x2="0" y2="{h}" stroke="currentColor"/>"#,
            h = l.height,
        );
        for t in y.ticks(TICKS) {
            let py = y.map(t);
            let _ = write!(
                out,
                r#"<line x1="-6" y1="{py:.1}" x2="0" y2="{py:.1}" stroke="currentColor"/><text x="-9" y="{ty:.1}" font-size="10" text-anchor="end">{}</text>"#,
                format_tick(t),
                ty = py + 3.0,
            );
        }
        out.push_str("</g>");

        // one path per series
        out.push_str("<g class=\"lines\">");
        for s in &self.series {
            let coords: Vec<String> = s
                .points
                .iter()
                .map(|&(px, py)| format!("{:.1},{:.1}", x.map(px), y.map(py)))
                .collect();
            let _ = write!(
                out,
                r#"<polyline data-series="{}" points="{}" stroke="{}" stroke-width="2" fill="none"/>"#,
                s.key.label(),
                coords.join(" "),
                s.colour,
            );
        }
        out.push_str("</g>");

        // legend
        let r = LEGEND_FONT / 2.0 - 2.0;
        let _ = write!(out, r#"<g class="legend" transform="translate({}, 0)">"#, l.margin.left + 10.0);
        for (i, s) in self.series.iter().enumerate() {
            let _ = write!(
                out,
                r#"<g transform="translate(0, {dy})"><circle r="{r}" fill="{c}"/><text transform="translate({fs}, 0)" font-size="{fs}" fill="{c}">{name}</text></g>"#,
                dy = i as f64 * LEGEND_FONT + 10.0,
                c = s.colour,
                fs = LEGEND_FONT,
                name = s.key.label(),
            );
        }
        out.push_str("</g></g></svg>");
        out
    }
}

impl TimeSeriesView for LineGraph {
    fn append(&mut self, points: &[SeriesPoint]) {
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                warn!(chart = %self.title, x = p.x, y = p.y, "dropping non-finite point");
                continue;
            }
            self.x_max = self.x_max.max(p.x);
            self.y_max = self.y_max.max(p.y);
            self.series_mut(p.series).points.push((p.x, p.y));
        }
    }

    fn redraw(&mut self) {
        self.svg = self.render();
    }

    fn svg(&self) -> &str {
        &self.svg
    }
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Escapes text for use inside SVG/HTML markup and attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> LineGraph {
        LineGraph::new(
            "Loss",
            &[SeriesKey::Validation, SeriesKey::Training],
            ChartLayout::metric_chart(),
        )
    }

    #[test]
    fn maxima_are_running_and_monotonic() {
        let mut g = graph();
        let ys = [0.9, 1.3, 0.4, 0.2, 1.1];
        let mut prev = (0.0, 0.0);
        for (i, &y) in ys.iter().enumerate() {
            g.append(&[SeriesPoint::new(SeriesKey::Training, i as f64 + 1.0, y)]);
            assert!(g.x_max() >= prev.0 && g.y_max() >= prev.1);
            prev = (g.x_max(), g.y_max());
        }
        assert_eq!(g.x_max(), 5.0);
        assert_eq!(g.y_max(), 1.3);
        assert!((g.y_axis_max() - 1.3).abs() < 1e-12);
    }

    #[test]
    fn y_axis_rounds_up_to_tenth() {
        let mut g = graph();
        g.append(&[SeriesPoint::new(SeriesKey::Validation, 1.0, 0.8312)]);
        assert!((g.y_axis_max() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn points_are_stored_per_series() {
        let mut g = graph();
        g.append(&[
            SeriesPoint::new(SeriesKey::Validation, 1.0, 0.5),
            SeriesPoint::new(SeriesKey::Training, 1.0, 0.6),
        ]);
        g.append(&[SeriesPoint::new(SeriesKey::Validation, 2.0, 0.4)]);
        assert_eq!(g.points(SeriesKey::Validation), &[(1.0, 0.5), (2.0, 0.4)]);
        assert_eq!(g.points(SeriesKey::Training), &[(1.0, 0.6)]);
    }

    #[test]
    fn non_finite_points_are_dropped() {
        let mut g = graph();
        g.append(&[SeriesPoint::new(SeriesKey::Training, 1.0, f64::NAN)]);
        assert!(g.points(SeriesKey::Training).is_empty());
        assert_eq!(g.y_max(), 0.0);
    }

    #[test]
    fn redraw_emits_one_polyline_per_series() {
        let mut g = graph();
        assert!(g.svg().is_empty());
        g.append(&[
            SeriesPoint::new(SeriesKey::Validation, 1.0, 0.5),
            SeriesPoint::new(SeriesKey::Training, 1.0, 0.6),
        ]);
        g.redraw();
        let svg = g.svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Loss:"));
        assert!(svg.contains("data-series=\"validation\""));
    }
}
