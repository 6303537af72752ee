use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::color::CategoryColors;
use crate::data::model::Dataset;
use crate::data::stats::{
    five_number_summary, group_values, histogram, kde_curve, FiveNumberSummary, ValueCount,
};

const SECTION_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Pure builders
// ---------------------------------------------------------------------------

/// One wedge of a pie chart. Angles are radians, counter-clockwise from
/// 3 o'clock (matplotlib's default orientation).
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Turn value counts into pie wedges. Fractions are relative to the counts
/// given, which the caller has already reduced to the top 10.
pub fn pie_slices(counts: &[ValueCount]) -> Vec<PieSlice> {
    let total: usize = counts.iter().map(|vc| vc.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = 0.0;
    counts
        .iter()
        .map(|vc| {
            let fraction = vc.count as f64 / total as f64;
            let start_angle = angle;
            angle += fraction * std::f64::consts::TAU;
            PieSlice {
                label: vc.label.clone(),
                count: vc.count,
                fraction,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

/// Diverging colour for a correlation coefficient in [-1, 1]:
/// blue for -1, near-white for 0, red for +1. NaN maps to grey.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::DARK_GRAY;
    }
    let r = r.clamp(-1.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t) as u8;
    let (low, high): ([u8; 3], [u8; 3]) = if r < 0.0 {
        ([221, 221, 221], [59, 76, 192])
    } else {
        ([221, 221, 221], [180, 4, 38])
    };
    let t = r.abs();
    Color32::from_rgb(
        lerp(low[0], high[0], t),
        lerp(low[1], high[1], t),
        lerp(low[2], high[2], t),
    )
}

/// Finite (x, y) pairs, in row order.
fn xy_points(x: &[f64], y: &[f64]) -> Vec<[f64; 2]> {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| [a, b])
        .collect()
}

/// A box-plot element at the given slot.
fn box_elem(slot: f64, summary: &FiveNumberSummary) -> BoxElem {
    BoxElem::new(
        slot,
        BoxSpread::new(
            summary.lower_whisker,
            summary.q1,
            summary.median,
            summary.q3,
            summary.upper_whisker,
        ),
    )
    .box_width(0.5)
}

/// Axis formatter that labels integer slots with category names.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let slot = mark.value.round();
        if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
            return String::new();
        }
        labels.get(slot as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Univariate charts
// ---------------------------------------------------------------------------

/// Histogram of a numeric column with a KDE overlay.
pub fn render_histogram(ui: &mut Ui, column: &str, values: &[f64]) {
    let bins = histogram(values);
    if bins.is_empty() {
        ui.label("No finite values to bin.");
        return;
    }
    // A constant column collapses to a single zero-width bin; give its bar
    // a visible width.
    let bin_width = match bins[0].end - bins[0].start {
        w if w > 0.0 => w,
        _ => 1.0,
    };

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(bin_width)
                .fill(Color32::from_rgb(100, 143, 255).gamma_multiply(0.7))
        })
        .collect();
    let kde = kde_curve(values, bin_width, 200);

    Plot::new(("histogram_plot", column))
        .height(SECTION_HEIGHT)
        .x_axis_label(column.to_string())
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(column));
            if !kde.is_empty() {
                let points: PlotPoints = kde.into_iter().collect();
                plot_ui.line(Line::new(points).name("kde").width(1.5));
            }
        });
}

/// Count plot: one bar per category, in first-occurrence order.
pub fn render_count_plot(ui: &mut Ui, column: &str, counts: &[ValueCount]) {
    let labels: Vec<String> = counts.iter().map(|vc| vc.label.clone()).collect();
    let colors = CategoryColors::new(&labels);

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, vc)| {
            Bar::new(i as f64, vc.count as f64)
                .width(0.7)
                .fill(colors.color_for(&vc.label))
                .name(&vc.label)
        })
        .collect();

    Plot::new(("count_plot", column))
        .height(SECTION_HEIGHT)
        .x_axis_label(column.to_string())
        .y_axis_label("Count")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Pie chart of the top-10 categories by frequency.
pub fn render_pie_chart(ui: &mut Ui, column: &str, slices: &[PieSlice]) {
    if slices.is_empty() {
        ui.label("No values to chart.");
        return;
    }
    let labels: Vec<String> = slices.iter().map(|s| s.label.clone()).collect();
    let colors = CategoryColors::new(&labels);

    Plot::new(("pie_chart", column))
        .height(SECTION_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for slice in slices {
                let color = colors.color_for(&slice.label);

                // Wedge outline: center, then the arc sampled every ~4°.
                let steps = ((slice.end_angle - slice.start_angle).to_degrees() / 4.0)
                    .ceil()
                    .max(2.0) as usize;
                let mut outline = vec![[0.0, 0.0]];
                for s in 0..=steps {
                    let t = slice.start_angle
                        + (slice.end_angle - slice.start_angle) * s as f64 / steps as f64;
                    outline.push([t.cos(), t.sin()]);
                }
                let points: PlotPoints = outline.into_iter().collect();
                plot_ui.polygon(
                    Polygon::new(points)
                        .fill_color(color.gamma_multiply(0.85))
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(&slice.label),
                );

                let mid = (slice.start_angle + slice.end_angle) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    RichText::new(format!("{:.1}%", slice.fraction * 100.0)).strong(),
                ));
            }
        });
}

/// Box plot over a lone categorical column: a single box summarizing the
/// per-category frequency distribution.
pub fn render_box_univariate(ui: &mut Ui, column: &str, counts: &[ValueCount]) {
    let frequencies: Vec<f64> = counts.iter().map(|vc| vc.count as f64).collect();
    let Some(summary) = five_number_summary(&frequencies) else {
        ui.label("No values to chart.");
        return;
    };

    Plot::new(("box_plot_uni", column))
        .height(SECTION_HEIGHT)
        .x_axis_label(column.to_string())
        .y_axis_label("Category frequency")
        .x_axis_formatter(category_formatter(vec![column.to_string()]))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![box_elem(0.0, &summary)]).name(column));
        });
}

// ---------------------------------------------------------------------------
// Bivariate charts
// ---------------------------------------------------------------------------

/// Line plot of two numeric columns, points sorted by x.
pub fn render_line_plot(ui: &mut Ui, x_name: &str, y_name: &str, x: &[f64], y: &[f64]) {
    let mut pairs = xy_points(x, y);
    pairs.sort_by(|a, b| a[0].total_cmp(&b[0]));
    let points: PlotPoints = pairs.into_iter().collect();

    Plot::new(("line_plot", x_name, y_name))
        .height(SECTION_HEIGHT)
        .x_axis_label(x_name.to_string())
        .y_axis_label(y_name.to_string())
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).width(1.5));
        });
}

/// Scatter plot of two numeric columns.
pub fn render_scatter_plot(ui: &mut Ui, x_name: &str, y_name: &str, x: &[f64], y: &[f64]) {
    let points: PlotPoints = xy_points(x, y).into_iter().collect();

    Plot::new(("scatter_plot", x_name, y_name))
        .height(SECTION_HEIGHT)
        .x_axis_label(x_name.to_string())
        .y_axis_label(y_name.to_string())
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(points).radius(2.5));
        });
}

/// Bar plot: mean of the numeric column per category.
pub fn render_bar_plot(ui: &mut Ui, x_name: &str, y_name: &str, means: &[(String, f64)]) {
    let labels: Vec<String> = means.iter().map(|(l, _)| l.clone()).collect();
    let colors = CategoryColors::new(&labels);

    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(i, (label, mean))| {
            Bar::new(i as f64, *mean)
                .width(0.7)
                .fill(colors.color_for(label))
                .name(label)
        })
        .collect();

    Plot::new(("bar_plot", x_name, y_name))
        .height(SECTION_HEIGHT)
        .x_axis_label(x_name.to_string())
        .y_axis_label(format!("mean({y_name})"))
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Box plot of a numeric column split by category.
pub fn render_box_bivariate(
    ui: &mut Ui,
    x_name: &str,
    y_name: &str,
    labels: &[Option<String>],
    values: &[f64],
) {
    let groups = group_values(labels, values);
    let names: Vec<String> = groups.iter().map(|(l, _)| l.clone()).collect();

    let elems: Vec<BoxElem> = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (_, vs))| five_number_summary(vs).map(|s| box_elem(i as f64, &s)))
        .collect();

    Plot::new(("box_plot_bi", x_name, y_name))
        .height(SECTION_HEIGHT)
        .x_axis_label(x_name.to_string())
        .y_axis_label(y_name.to_string())
        .x_axis_formatter(category_formatter(names))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}

// ---------------------------------------------------------------------------
// Multivariate charts
// ---------------------------------------------------------------------------

/// Pair plot: k×k grid with histograms on the diagonal and scatter plots
/// off it.
pub fn render_pair_plot(ui: &mut Ui, dataset: &Dataset, columns: &[String]) {
    let k = columns.len();
    let cell = (ui.available_width() / (k as f32 + 0.4)).clamp(80.0, 220.0);

    eframe::egui::Grid::new("pair_plot_grid")
        .spacing([4.0, 4.0])
        .show(ui, |ui| {
            // Header row with column names.
            ui.label("");
            for col in columns {
                ui.label(RichText::new(col.as_str()).strong());
            }
            ui.end_row();

            for (i, row_col) in columns.iter().enumerate() {
                ui.label(RichText::new(row_col.as_str()).strong());
                for (j, col_col) in columns.iter().enumerate() {
                    let plot = Plot::new(("pair_cell", i, j))
                        .width(cell)
                        .height(cell)
                        .show_axes(false);

                    if i == j {
                        let values = dataset.numeric(row_col).unwrap_or(&[]);
                        let bins = histogram(values);
                        let width = bins
                            .first()
                            .map(|b| (b.end - b.start).max(f64::EPSILON))
                            .unwrap_or(1.0);
                        let bars: Vec<Bar> = bins
                            .iter()
                            .map(|b| {
                                Bar::new((b.start + b.end) / 2.0, b.count as f64).width(width)
                            })
                            .collect();
                        plot.show(ui, |plot_ui| {
                            plot_ui.bar_chart(BarChart::new(bars));
                        });
                    } else {
                        let x = dataset.numeric(col_col).unwrap_or(&[]);
                        let y = dataset.numeric(row_col).unwrap_or(&[]);
                        let points: PlotPoints = xy_points(x, y).into_iter().collect();
                        plot.show(ui, |plot_ui| {
                            plot_ui.points(Points::new(points).radius(1.5));
                        });
                    }
                }
                ui.end_row();
            }
        });
}

/// Correlation heatmap over all numeric columns, annotated per cell.
pub fn render_heatmap(ui: &mut Ui, names: &[String], matrix: &[Vec<f64>]) {
    let k = names.len();
    let x_labels = names.to_vec();
    // Row 0 sits at the top of the plot.
    let y_labels: Vec<String> = names.iter().rev().cloned().collect();

    Plot::new("correlation_heatmap")
        .height((SECTION_HEIGHT * 1.4).max(40.0 * k as f32))
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(cell_center_formatter(x_labels))
        .y_axis_formatter(cell_center_formatter(y_labels))
        .show(ui, |plot_ui| {
            for (i, row) in matrix.iter().enumerate() {
                for (j, &r) in row.iter().enumerate() {
                    let x0 = j as f64;
                    let y0 = (k - 1 - i) as f64;
                    let square: PlotPoints = vec![
                        [x0, y0],
                        [x0 + 1.0, y0],
                        [x0 + 1.0, y0 + 1.0],
                        [x0, y0 + 1.0],
                    ]
                    .into_iter()
                    .collect();
                    plot_ui.polygon(
                        Polygon::new(square)
                            .fill_color(correlation_color(r))
                            .stroke(Stroke::new(1.0, Color32::from_gray(40))),
                    );

                    let text = if r.is_nan() {
                        "–".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    let text_color = if r.is_finite() && r.abs() > 0.5 {
                        Color32::WHITE
                    } else {
                        Color32::BLACK
                    };
                    plot_ui.text(Text::new(
                        PlotPoint::new(x0 + 0.5, y0 + 0.5),
                        RichText::new(text).color(text_color),
                    ));
                }
            }
        });
}

/// Axis formatter that labels cell centers (x.5) with column names.
fn cell_center_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let centered = mark.value - 0.5;
        let slot = centered.round();
        if (centered - slot).abs() > 1e-6 || slot < 0.0 {
            return String::new();
        }
        labels.get(slot as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(raw: &[(&str, usize)]) -> Vec<ValueCount> {
        raw.iter()
            .map(|(l, c)| ValueCount {
                label: l.to_string(),
                count: *c,
            })
            .collect()
    }

    #[test]
    fn pie_slices_cover_the_full_circle() {
        let slices = pie_slices(&counts(&[("b", 3), ("a", 2), ("c", 1)]));
        assert_eq!(slices.len(), 3);
        assert!((slices[0].start_angle).abs() < 1e-12);
        assert!((slices.last().unwrap().end_angle - std::f64::consts::TAU).abs() < 1e-9);

        let total: f64 = slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((slices[0].fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pie_slices_empty_for_no_counts() {
        assert!(pie_slices(&[]).is_empty());
        assert!(pie_slices(&counts(&[("a", 0)])).is_empty());
    }

    #[test]
    fn correlation_color_endpoints() {
        assert_eq!(correlation_color(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(correlation_color(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(correlation_color(f64::NAN), Color32::DARK_GRAY);
        // Near zero stays near-white.
        let c = correlation_color(0.0);
        assert_eq!(c, Color32::from_rgb(221, 221, 221));
    }

    #[test]
    fn xy_points_drop_non_finite_rows() {
        let x = [1.0, f64::NAN, 3.0];
        let y = [2.0, 5.0, f64::INFINITY];
        assert_eq!(xy_points(&x, &y), vec![[1.0, 2.0]]);
    }

    #[test]
    fn category_formatter_labels_integer_slots() {
        let fmt = category_formatter(vec!["a".into(), "b".into()]);
        let range = 0.0..=2.0;
        let mark = |v: f64| egui_plot::GridMark {
            value: v,
            step_size: 1.0,
        };
        assert_eq!(fmt(mark(0.0), &range), "a");
        assert_eq!(fmt(mark(1.0), &range), "b");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(5.0), &range), "");
    }
}
