use eframe::egui::{self, Color32, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use super::charts;
use crate::data::catalog::{Availability, ChartIssue, ChartKind, ColumnCatalog};
use crate::data::model::Dataset;
use crate::data::stats::{correlation_matrix, group_means, top_n, value_counts};
use crate::state::{AppState, ChartSelections, Page};

// ---------------------------------------------------------------------------
// Central panel – page dispatch
// ---------------------------------------------------------------------------

/// Render the current page into the central panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        page,
        dataset,
        catalog,
        selections,
        ..
    } = state;

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        if *page == Page::Welcome {
            welcome_page(ui, dataset.as_ref(), catalog);
            return;
        }

        // Analysis pages halt until a dataset is supplied.
        let Some(dataset) = dataset.as_ref() else {
            ui.heading(page.title());
            warning_label(ui, &ChartIssue::MissingInput);
            return;
        };

        match page {
            Page::Welcome => {}
            Page::Univariate => univariate_page(ui, dataset, catalog, selections),
            Page::Bivariate => bivariate_page(ui, dataset, catalog, selections),
            Page::Multivariate => multivariate_page(ui, dataset, catalog, selections),
        }
    });
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

fn error_label(ui: &mut Ui, issue: &ChartIssue) {
    ui.colored_label(Color32::RED, issue.to_string());
}

fn warning_label(ui: &mut Ui, issue: &ChartIssue) {
    ui.colored_label(Color32::from_rgb(222, 166, 0), issue.to_string());
}

/// A labelled dropdown over the given column names.
fn column_selector(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selection: &mut Option<String>,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        let current = selection.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.clone())
            .show_ui(ui, |ui| {
                for col in options {
                    if ui.selectable_label(current == *col, col).clicked() {
                        *selection = Some(col.clone());
                    }
                }
            });
    });
}

/// A chart section with its eligibility guard applied: suppressed sections
/// are skipped entirely, unavailable ones show only a localized error.
fn section(ui: &mut Ui, kind: ChartKind, catalog: &ColumnCatalog, body: impl FnOnce(&mut Ui)) {
    match kind.availability(catalog) {
        Availability::Suppressed(_) => {}
        Availability::Unavailable(issue) => {
            ui.add_space(12.0);
            ui.heading(kind.title());
            error_label(ui, &issue);
        }
        Availability::Ready => {
            ui.add_space(12.0);
            ui.heading(kind.title());
            body(ui);
        }
    }
}

// ---------------------------------------------------------------------------
// Welcome page
// ---------------------------------------------------------------------------

const PREVIEW_ROWS: usize = 20;

fn welcome_page(ui: &mut Ui, dataset: Option<&Dataset>, catalog: &ColumnCatalog) {
    ui.heading("Welcome to the EDA Visualiser");
    ui.add_space(6.0);
    ui.label(
        "This application is designed for dynamic data visualization and \
         analysis of your uploaded dataset. It supports:",
    );
    ui.label("  • Univariate analysis – single-variable exploration.");
    ui.label("  • Bivariate analysis – relationships between two variables.");
    ui.label("  • Multivariate analysis – pair plots and correlation heatmaps.");
    ui.add_space(6.0);
    ui.label("Open a file from the sidebar, then navigate to an analysis page.");

    let Some(dataset) = dataset else {
        return;
    };

    ui.add_space(12.0);
    ui.separator();
    ui.strong(format!(
        "{} rows · {} numeric, {} categorical columns",
        dataset.len(),
        catalog.numeric.len(),
        catalog.categorical.len(),
    ));
    ui.add_space(6.0);
    preview_table(ui, dataset);
}

/// First rows of the dataset, with each column's semantic type in the
/// header.
fn preview_table(ui: &mut Ui, dataset: &Dataset) {
    let n_rows = dataset.len().min(PREVIEW_ROWS);

    TableBuilder::new(ui)
        .striped(true)
        .columns(TableColumn::auto().at_least(60.0), dataset.columns.len())
        .header(22.0, |mut header| {
            for col in &dataset.columns {
                header.col(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(&col.name);
                        ui.weak(col.semantic_type().to_string());
                    });
                });
            }
        })
        .body(|mut body| {
            for row in 0..n_rows {
                body.row(18.0, |mut table_row| {
                    for col in &dataset.columns {
                        table_row.col(|ui| {
                            ui.label(col.cell_text(row));
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Univariate page
// ---------------------------------------------------------------------------

fn univariate_page(
    ui: &mut Ui,
    dataset: &Dataset,
    catalog: &ColumnCatalog,
    selections: &mut ChartSelections,
) {
    ui.heading("Univariate Analysis");
    ui.label("Explore single-variable trends with dynamic column selection.");

    section(ui, ChartKind::Histogram, catalog, |ui| {
        column_selector(
            ui,
            "histogram_col",
            "Column:",
            &catalog.numeric,
            &mut selections.histogram,
        );
        if let Some(col) = selections.histogram.as_deref() {
            if let Some(values) = dataset.numeric(col) {
                charts::render_histogram(ui, col, values);
            }
        }
    });

    section(ui, ChartKind::CountPlot, catalog, |ui| {
        column_selector(
            ui,
            "count_col",
            "Column:",
            &catalog.categorical,
            &mut selections.count,
        );
        if let Some(col) = selections.count.as_deref() {
            if let Some(labels) = dataset.categorical(col) {
                charts::render_count_plot(ui, col, &value_counts(labels));
            }
        }
    });

    section(ui, ChartKind::PieChart, catalog, |ui| {
        column_selector(
            ui,
            "pie_col",
            "Column:",
            &catalog.categorical,
            &mut selections.pie,
        );
        if let Some(col) = selections.pie.as_deref() {
            if let Some(labels) = dataset.categorical(col) {
                // Top 10 categories by frequency; the rest are dropped.
                let counts = top_n(value_counts(labels), 10);
                charts::render_pie_chart(ui, col, &charts::pie_slices(&counts));
            }
        }
    });

    section(ui, ChartKind::BoxPlotUnivariate, catalog, |ui| {
        column_selector(
            ui,
            "box_uni_col",
            "Column:",
            &catalog.categorical,
            &mut selections.box_univariate,
        );
        if let Some(col) = selections.box_univariate.as_deref() {
            if let Some(labels) = dataset.categorical(col) {
                charts::render_box_univariate(ui, col, &value_counts(labels));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Bivariate page
// ---------------------------------------------------------------------------

fn bivariate_page(
    ui: &mut Ui,
    dataset: &Dataset,
    catalog: &ColumnCatalog,
    selections: &mut ChartSelections,
) {
    ui.heading("Bivariate Analysis");
    ui.label("Explore the relationship between two variables.");

    section(ui, ChartKind::LinePlot, catalog, |ui| {
        column_selector(ui, "line_x", "X axis:", &catalog.numeric, &mut selections.line_x);
        column_selector(ui, "line_y", "Y axis:", &catalog.numeric, &mut selections.line_y);
        if let (Some(xc), Some(yc)) = (selections.line_x.as_deref(), selections.line_y.as_deref()) {
            if let (Some(x), Some(y)) = (dataset.numeric(xc), dataset.numeric(yc)) {
                charts::render_line_plot(ui, xc, yc, x, y);
            }
        }
    });

    section(ui, ChartKind::ScatterPlot, catalog, |ui| {
        column_selector(ui, "scatter_x", "X axis:", &catalog.numeric, &mut selections.scatter_x);
        column_selector(ui, "scatter_y", "Y axis:", &catalog.numeric, &mut selections.scatter_y);
        if let (Some(xc), Some(yc)) =
            (selections.scatter_x.as_deref(), selections.scatter_y.as_deref())
        {
            if let (Some(x), Some(y)) = (dataset.numeric(xc), dataset.numeric(yc)) {
                charts::render_scatter_plot(ui, xc, yc, x, y);
            }
        }
    });

    section(ui, ChartKind::BarPlot, catalog, |ui| {
        column_selector(ui, "bar_x", "X axis:", &catalog.categorical, &mut selections.bar_x);
        column_selector(ui, "bar_y", "Y axis:", &catalog.numeric, &mut selections.bar_y);
        if let (Some(xc), Some(yc)) = (selections.bar_x.as_deref(), selections.bar_y.as_deref()) {
            if let (Some(labels), Some(values)) = (dataset.categorical(xc), dataset.numeric(yc)) {
                charts::render_bar_plot(ui, xc, yc, &group_means(labels, values));
            }
        }
    });

    section(ui, ChartKind::BoxPlotBivariate, catalog, |ui| {
        column_selector(ui, "box_x", "X axis:", &catalog.categorical, &mut selections.box_x);
        column_selector(ui, "box_y", "Y axis:", &catalog.numeric, &mut selections.box_y);
        if let (Some(xc), Some(yc)) = (selections.box_x.as_deref(), selections.box_y.as_deref()) {
            if let (Some(labels), Some(values)) = (dataset.categorical(xc), dataset.numeric(yc)) {
                charts::render_box_bivariate(ui, xc, yc, labels, values);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Multivariate page
// ---------------------------------------------------------------------------

fn multivariate_page(
    ui: &mut Ui,
    dataset: &Dataset,
    catalog: &ColumnCatalog,
    selections: &mut ChartSelections,
) {
    ui.heading("Multivariate Analysis");
    ui.label("Generate a pair plot and correlation heatmap across numeric columns.");

    section(ui, ChartKind::PairPlot, catalog, |ui| {
        // Multi-select over the numeric columns; toggling keeps the
        // dataset's original column order.
        ui.horizontal_wrapped(|ui| {
            ui.label("Columns:");
            for col in &catalog.numeric {
                let mut checked = selections.pair.contains(col);
                if ui.checkbox(&mut checked, col.as_str()).changed() {
                    if checked {
                        selections.pair.push(col.clone());
                        let order = &catalog.numeric;
                        selections
                            .pair
                            .sort_by_key(|c| order.iter().position(|n| n == c));
                    } else {
                        selections.pair.retain(|c| c != col);
                    }
                }
            }
        });

        if selections.pair.is_empty() {
            warning_label(ui, &ChartIssue::EmptySelection);
        } else {
            charts::render_pair_plot(ui, dataset, &selections.pair);
        }
    });

    section(ui, ChartKind::CorrelationHeatmap, catalog, |ui| {
        let columns: Vec<&[f64]> = catalog
            .numeric
            .iter()
            .filter_map(|name| dataset.numeric(name))
            .collect();
        let matrix = correlation_matrix(&columns);
        charts::render_heatmap(ui, &catalog.numeric, &matrix);
    });
}
