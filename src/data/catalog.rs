use thiserror::Error;

use super::model::{Dataset, SemanticType};

// ---------------------------------------------------------------------------
// ColumnCatalog – the classified column sets
// ---------------------------------------------------------------------------

/// Partition of a dataset's columns by semantic type, in original column
/// order. `numeric` and `categorical` are disjoint; columns of unsupported
/// dtypes land in `ignored` and are offered by no selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCatalog {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub ignored: Vec<String>,
}

/// Classify the dataset's columns. Pure function of the declared column
/// types; yields empty sets rather than errors.
pub fn classify(dataset: &Dataset) -> ColumnCatalog {
    let mut catalog = ColumnCatalog::default();
    for col in &dataset.columns {
        let bucket = match col.semantic_type() {
            SemanticType::Numeric => &mut catalog.numeric,
            SemanticType::Categorical => &mut catalog.categorical,
            SemanticType::Unsupported => &mut catalog.ignored,
        };
        bucket.push(col.name.clone());
    }
    catalog
}

impl ColumnCatalog {
    pub fn has_numeric(&self) -> bool {
        !self.numeric.is_empty()
    }

    pub fn has_categorical(&self) -> bool {
        !self.categorical.is_empty()
    }

    /// Default pair-plot selection: the first `min(3, n)` numeric columns in
    /// dataset order, never re-sorted.
    pub fn default_pair_columns(&self) -> Vec<String> {
        let k = self.numeric.len().min(3);
        self.numeric[..k].to_vec()
    }
}

// ---------------------------------------------------------------------------
// ChartIssue – the failure taxonomy
// ---------------------------------------------------------------------------

/// Why a chart section cannot render. Every variant degrades to a localized
/// message confined to the affected section; nothing propagates to a crash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChartIssue {
    #[error("No dataset loaded. Open a file to proceed.")]
    MissingInput,
    #[error("No {0} columns in this dataset.")]
    EmptyCategory(SemanticType),
    #[error("Please select at least one column.")]
    EmptySelection,
    #[error("No numeric columns found.")]
    NoEligibleColumns,
}

// ---------------------------------------------------------------------------
// ChartKind – the eligibility policy
// ---------------------------------------------------------------------------

/// Every chart the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Histogram,
    CountPlot,
    PieChart,
    /// Box plot of a single categorical column.
    BoxPlotUnivariate,
    LinePlot,
    ScatterPlot,
    /// Categorical x, numeric y (mean per category).
    BarPlot,
    /// Categorical x, numeric y distribution.
    BoxPlotBivariate,
    PairPlot,
    CorrelationHeatmap,
}

/// What a chart section does given the current catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Selectors offered, chart rendered.
    Ready,
    /// Section skipped entirely: its required category is empty. Not an
    /// error, and never shown in a disabled state; the issue is carried
    /// for logging and tests only.
    Suppressed(ChartIssue),
    /// Section shown with a localized error, nothing rendered.
    Unavailable(ChartIssue),
}

impl ChartKind {
    /// Section heading shown above the chart.
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::CountPlot => "Count Plot",
            ChartKind::PieChart => "Pie Chart",
            ChartKind::BoxPlotUnivariate | ChartKind::BoxPlotBivariate => "Box Plot",
            ChartKind::LinePlot => "Line Plot",
            ChartKind::ScatterPlot => "Scatter Plot",
            ChartKind::BarPlot => "Bar Plot",
            ChartKind::PairPlot => "Pair Plot",
            ChartKind::CorrelationHeatmap => "Correlation Heatmap",
        }
    }

    /// The eligibility guard. Charts whose selectors draw from the
    /// categorical set are suppressed outright when that set is empty;
    /// numeric-only charts stay visible and surface `NoEligibleColumns`
    /// when no numeric column exists.
    pub fn availability(self, catalog: &ColumnCatalog) -> Availability {
        match self {
            ChartKind::CountPlot
            | ChartKind::PieChart
            | ChartKind::BoxPlotUnivariate
            | ChartKind::BarPlot
            | ChartKind::BoxPlotBivariate => {
                if catalog.has_categorical() {
                    Availability::Ready
                } else {
                    Availability::Suppressed(ChartIssue::EmptyCategory(
                        SemanticType::Categorical,
                    ))
                }
            }
            ChartKind::Histogram
            | ChartKind::LinePlot
            | ChartKind::ScatterPlot
            | ChartKind::PairPlot
            | ChartKind::CorrelationHeatmap => {
                if catalog.has_numeric() {
                    Availability::Ready
                } else {
                    Availability::Unavailable(ChartIssue::NoEligibleColumns)
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnValues, Dataset};

    fn numeric(name: &str, values: Vec<f64>) -> Column {
        Column {
            name: name.to_string(),
            values: ColumnValues::Numeric(values),
        }
    }

    fn categorical(name: &str, values: Vec<Option<&str>>) -> Column {
        Column {
            name: name.to_string(),
            values: ColumnValues::Categorical(
                values.into_iter().map(|v| v.map(str::to_string)).collect(),
            ),
        }
    }

    fn unsupported(name: &str) -> Column {
        Column {
            name: name.to_string(),
            values: ColumnValues::Unsupported,
        }
    }

    #[test]
    fn classify_partitions_disjointly() {
        let ds = Dataset::new(vec![
            numeric("a", vec![1.0]),
            categorical("b", vec![Some("x")]),
            unsupported("c"),
            numeric("d", vec![2.0]),
        ]);
        let cat = classify(&ds);
        assert_eq!(cat.numeric, vec!["a", "d"]);
        assert_eq!(cat.categorical, vec!["b"]);
        assert_eq!(cat.ignored, vec!["c"]);
        for n in &cat.numeric {
            assert!(!cat.categorical.contains(n));
            assert!(!cat.ignored.contains(n));
        }
    }

    #[test]
    fn classify_is_idempotent() {
        let ds = Dataset::new(vec![
            numeric("x", vec![1.0, 2.0]),
            categorical("y", vec![Some("a"), None]),
        ]);
        assert_eq!(classify(&ds), classify(&ds));
    }

    #[test]
    fn mixed_scenario_age_city() {
        let ds = Dataset::new(vec![
            numeric("age", vec![25.0, 30.0, f64::NAN]),
            categorical("city", vec![Some("NY"), Some("LA"), Some("NY")]),
        ]);
        let cat = classify(&ds);
        assert_eq!(cat.numeric, vec!["age"]);
        assert_eq!(cat.categorical, vec!["city"]);
        assert_eq!(ChartKind::Histogram.availability(&cat), Availability::Ready);
        assert_eq!(ChartKind::CountPlot.availability(&cat), Availability::Ready);
        assert_eq!(ChartKind::BarPlot.availability(&cat), Availability::Ready);
    }

    #[test]
    fn pair_default_is_min_three_in_order() {
        let mut cat = ColumnCatalog::default();
        cat.numeric = vec!["c".into(), "a".into(), "b".into(), "d".into()];
        assert_eq!(cat.default_pair_columns(), vec!["c", "a", "b"]);

        cat.numeric = vec!["z".into()];
        assert_eq!(cat.default_pair_columns(), vec!["z"]);

        cat.numeric.clear();
        assert!(cat.default_pair_columns().is_empty());
    }

    #[test]
    fn categorical_sections_suppressed_without_categorical_columns() {
        let ds = Dataset::new(vec![numeric("a", vec![1.0]), numeric("b", vec![2.0])]);
        let cat = classify(&ds);
        for kind in [
            ChartKind::CountPlot,
            ChartKind::PieChart,
            ChartKind::BoxPlotUnivariate,
            ChartKind::BarPlot,
            ChartKind::BoxPlotBivariate,
        ] {
            assert_eq!(
                kind.availability(&cat),
                Availability::Suppressed(ChartIssue::EmptyCategory(SemanticType::Categorical))
            );
        }
        for kind in [
            ChartKind::Histogram,
            ChartKind::LinePlot,
            ChartKind::ScatterPlot,
        ] {
            assert_eq!(kind.availability(&cat), Availability::Ready);
        }
    }

    #[test]
    fn numeric_sections_error_without_numeric_columns() {
        let ds = Dataset::new(vec![categorical("c", vec![Some("x")])]);
        let cat = classify(&ds);
        for kind in [
            ChartKind::Histogram,
            ChartKind::LinePlot,
            ChartKind::ScatterPlot,
            ChartKind::PairPlot,
            ChartKind::CorrelationHeatmap,
        ] {
            assert_eq!(
                kind.availability(&cat),
                Availability::Unavailable(ChartIssue::NoEligibleColumns)
            );
        }
        assert_eq!(ChartKind::CountPlot.availability(&cat), Availability::Ready);
        assert_eq!(ChartKind::PieChart.availability(&cat), Availability::Ready);
    }
}
