//! Chart panels drawn with plotters.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::analysis::Pivot;
use crate::error::Result;
use crate::output::config::{RenderConfig, Rgb};

/// One cell of a 2×2 figure.
pub type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const CAPTION_SIZE: u32 = 22;
const ANNOTATION_SIZE: u32 = 14;
const COLOUR_BAR_STEPS: usize = 64;

/// A chart ready to be drawn into one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Distribution of one numeric column.
    Histogram { values: Vec<f64>, color: Rgb },
    /// One box per group.
    BoxPlot {
        groups: Vec<(String, Vec<f64>)>,
        color: Rgb,
    },
    /// Annotated mean per (row, column) key pair with a labelled colour bar.
    Heatmap {
        pivot: Pivot,
        gradient: (Rgb, Rgb),
        legend: String,
    },
    /// One cluster per row key, one bar per column key.
    GroupedBars { pivot: Pivot },
}

/// A chart with its caption and axis descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub chart: Chart,
}

impl Panel {
    pub fn new(title: &str, x_desc: &str, y_desc: &str, chart: Chart) -> Self {
        Self {
            title: title.to_string(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
            chart,
        }
    }

    /// Draw into `area`. With `labelled` false no text is rendered, so no
    /// font is needed.
    pub fn draw(&self, area: &Area<'_>, config: &RenderConfig, labelled: bool) -> Result<()> {
        match &self.chart {
            Chart::Histogram { values, color } => draw_histogram(self, area, config, labelled, values, *color),
            Chart::BoxPlot { groups, color } => draw_box_plot(self, area, config, labelled, groups, *color),
            Chart::Heatmap {
                pivot,
                gradient,
                legend,
            } => draw_heatmap(self, area, config, labelled, pivot, *gradient, legend),
            Chart::GroupedBars { pivot } => draw_grouped_bars(self, area, config, labelled, pivot),
        }
    }
}

impl Chart {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Chart::Histogram { .. } => "histogram",
            Chart::BoxPlot { .. } => "box_plot",
            Chart::Heatmap { .. } => "heatmap",
            Chart::GroupedBars { .. } => "grouped_bars",
        }
    }
}

fn rgb([r, g, b]: Rgb) -> RGBColor {
    RGBColor(r, g, b)
}

/// Linear blend between two colours, `t` clamped to `[0, 1]`.
fn lerp_color(from: Rgb, to: Rgb, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| (from[i] as f64 + (to[i] as f64 - from[i] as f64) * t).round() as u8;
    RGBColor(channel(0), channel(1), channel(2))
}

/// Smallest and largest value, widened when they coincide.
fn span(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut values = values.into_iter();
    let first = values.next()?;
    let (lo, hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(widen(lo, hi))
}

fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 0.5, lo + 0.5) }
}

/// Tick label for a category axis whose categories sit at integer positions.
fn category_label(keys: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    keys.get(index as usize).cloned().unwrap_or_default()
}

fn builder<'a, 'b>(
    panel: &Panel,
    area: &'a Area<'b>,
    config: &RenderConfig,
    labelled: bool,
) -> ChartBuilder<'a, 'static, BitMapBackend<'b>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(config.panel_padding);
    if labelled {
        builder
            .caption(&panel.title, (FONT, CAPTION_SIZE))
            .x_label_area_size(40)
            .y_label_area_size(60);
    }
    builder
}

fn draw_histogram(
    panel: &Panel,
    area: &Area<'_>,
    config: &RenderConfig,
    labelled: bool,
    values: &[f64],
    color: Rgb,
) -> Result<()> {
    let Some((lo, hi)) = span(values.iter().copied()) else {
        return Ok(());
    };
    let bins = config.histogram_bins.max(1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = ((v - lo) / width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }
    let tallest = counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut chart = builder(panel, area, config, labelled).build_cartesian_2d(lo..hi, 0f64..tallest * 1.05)?;
    if labelled {
        chart
            .configure_mesh()
            .light_line_style(&rgb(config.grid))
            .x_desc(&panel.x_desc)
            .y_desc(&panel.y_desc)
            .draw()?;
    }

    let fill = rgb(color);
    let edge = rgb(config.axis);
    chart.draw_series(counts.iter().enumerate().filter(|(_, count)| **count > 0).map(|(i, &count)| {
        let x0 = lo + i as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, count as f64)], fill.filled())
    }))?;
    chart.draw_series(counts.iter().enumerate().filter(|(_, count)| **count > 0).map(|(i, &count)| {
        let x0 = lo + i as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, count as f64)], edge.stroke_width(1))
    }))?;
    Ok(())
}

fn draw_box_plot(
    panel: &Panel,
    area: &Area<'_>,
    config: &RenderConfig,
    labelled: bool,
    groups: &[(String, Vec<f64>)],
    color: Rgb,
) -> Result<()> {
    let Some((lo, hi)) = span(groups.iter().flat_map(|(_, samples)| samples.iter().copied())) else {
        return Ok(());
    };
    let pad = (hi - lo) * 0.05;
    let keys: Vec<String> = groups.iter().map(|(key, _)| key.clone()).collect();

    let mut chart = builder(panel, area, config, labelled)
        .build_cartesian_2d(keys[..].into_segmented(), (lo - pad) as f32..(hi + pad) as f32)?;
    if labelled {
        chart
            .configure_mesh()
            .light_line_style(&rgb(config.grid))
            .x_desc(&panel.x_desc)
            .y_desc(&panel.y_desc)
            .draw()?;
    }

    let (width, _) = area.dim_in_pixel();
    let box_width = (width / (3 * keys.len() as u32).max(1)).max(4);
    let stroke = rgb(color).stroke_width(2);
    let outlier = rgb(config.axis).filled();

    for (key, (_, samples)) in keys.iter().zip(groups) {
        if samples.is_empty() {
            continue;
        }
        let quartiles = Quartiles::new(samples.as_slice());
        let [low_fence, _, _, _, high_fence] = quartiles.values();
        chart.draw_series(std::iter::once(
            Boxplot::new_vertical(SegmentValue::CenterOf(key), &quartiles)
                .width(box_width)
                .whisker_width(0.5)
                .style(stroke),
        ))?;
        chart.draw_series(
            samples
                .iter()
                .map(|&v| v as f32)
                .filter(|&v| v < low_fence || v > high_fence)
                .map(|v| Circle::new((SegmentValue::CenterOf(key), v), 3, outlier)),
        )?;
    }
    Ok(())
}

fn draw_heatmap(
    panel: &Panel,
    area: &Area<'_>,
    config: &RenderConfig,
    labelled: bool,
    pivot: &Pivot,
    gradient: (Rgb, Rgb),
    legend: &str,
) -> Result<()> {
    let Some((lo, hi)) = pivot.range() else {
        return Ok(());
    };
    let (lo, hi) = widen(lo, hi);
    let rows = pivot.row_keys.len();
    let cols = pivot.column_keys.len();
    let fraction = |v: f64| (v - lo) / (hi - lo);

    let (width, _) = area.dim_in_pixel();
    let bar_width = if labelled { 110 } else { 40 };
    let (cells_area, bar_area) = area.split_horizontally((width as i32 - bar_width).max(1));

    // Row 0 is drawn at the top.
    let row_keys: Vec<String> = pivot.row_keys.iter().rev().cloned().collect();
    let y_of = |r: usize| (rows - 1 - r) as f64;

    let mut chart = builder(panel, &cells_area, config, labelled)
        .build_cartesian_2d(-0.5..cols as f64 - 0.5, -0.5..rows as f64 - 0.5)?;
    if labelled {
        let column_label = |x: &f64| category_label(&pivot.column_keys, *x);
        let row_label = |y: &f64| category_label(&row_keys, *y);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(cols)
            .y_labels(rows)
            .x_label_formatter(&column_label)
            .y_label_formatter(&row_label)
            .x_desc(&panel.x_desc)
            .y_desc(&panel.y_desc)
            .draw()?;
    }

    let cells = || {
        pivot
            .cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, value)| (r, c, *value)))
    };
    chart.draw_series(cells().map(|(r, c, value)| {
        let (x, y) = (c as f64, y_of(r));
        let fill = value.map_or(rgb(config.grid), |v| lerp_color(gradient.0, gradient.1, fraction(v)));
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill.filled())
    }))?;

    if labelled {
        let dark = TextStyle::from((FONT, ANNOTATION_SIZE).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        let light = dark.color(&WHITE);
        chart.draw_series(cells().filter_map(|(r, c, value)| {
            let v = value?;
            let style = if fraction(v) > 0.6 { light.clone() } else { dark.clone() };
            Some(Text::new(format!("{v:.1}"), (c as f64, y_of(r)), style))
        }))?;
    }

    let mut bar = ChartBuilder::on(&bar_area);
    bar.margin(config.panel_padding).margin_left(8);
    if labelled {
        bar.margin_top(config.panel_padding + CAPTION_SIZE + 10)
            .margin_bottom(config.panel_padding + 40)
            .right_y_label_area_size(70);
    }
    let mut bar = bar.build_cartesian_2d(0f64..1f64, lo..hi)?;
    if labelled {
        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_desc(legend)
            .draw()?;
    }
    let step = (hi - lo) / COLOUR_BAR_STEPS as f64;
    bar.draw_series((0..COLOUR_BAR_STEPS).map(|i| {
        let y0 = lo + i as f64 * step;
        let color = lerp_color(gradient.0, gradient.1, (i as f64 + 0.5) / COLOUR_BAR_STEPS as f64);
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], color.filled())
    }))?;
    Ok(())
}

fn draw_grouped_bars(
    panel: &Panel,
    area: &Area<'_>,
    config: &RenderConfig,
    labelled: bool,
    pivot: &Pivot,
) -> Result<()> {
    let Some((lo, hi)) = pivot.range() else {
        return Ok(());
    };
    let (lo, hi) = widen(lo.min(0.0), hi.max(0.0));
    let clusters = pivot.row_keys.len();
    let series = pivot.column_keys.len().max(1);
    let bar_width = 0.8 / series as f64;

    let mut chart = builder(panel, area, config, labelled)
        .build_cartesian_2d(-0.5..clusters as f64 - 0.5, lo..hi * 1.1)?;
    if labelled {
        let cluster_label = |x: &f64| category_label(&pivot.row_keys, *x);
        chart
            .configure_mesh()
            .light_line_style(&rgb(config.grid))
            .x_labels(clusters)
            .x_label_formatter(&cluster_label)
            .x_desc(&panel.x_desc)
            .y_desc(&panel.y_desc)
            .draw()?;
    }

    for (c, key) in pivot.column_keys.iter().enumerate() {
        let color = config
            .series_colors
            .get(c % config.series_colors.len().max(1))
            .copied()
            .map_or(rgb(config.axis), rgb);
        let bars = pivot.cells.iter().enumerate().filter_map(move |(r, row)| {
            let v = row.get(c).copied().flatten()?;
            let x0 = r as f64 - 0.4 + bar_width * c as f64;
            Some(Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled()))
        });
        chart
            .draw_series(bars)?
            .label(key.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if labelled && !pivot.column_keys.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&rgb(config.axis))
            .label_font((FONT, ANNOTATION_SIZE))
            .draw()?;
    }
    Ok(())
}
