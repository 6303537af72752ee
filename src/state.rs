use crate::data::catalog::{classify, ColumnCatalog};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Page navigation
// ---------------------------------------------------------------------------

/// The pages reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Welcome,
    Univariate,
    Bivariate,
    Multivariate,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Welcome,
        Page::Univariate,
        Page::Bivariate,
        Page::Multivariate,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Welcome => "Welcome",
            Page::Univariate => "Univariate Analysis",
            Page::Bivariate => "Bivariate Analysis",
            Page::Multivariate => "Multivariate Analysis",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-chart selector state
// ---------------------------------------------------------------------------

/// The columns currently picked in each chart's dropdowns. Reset whenever a
/// new dataset is loaded.
#[derive(Debug, Clone, Default)]
pub struct ChartSelections {
    pub histogram: Option<String>,
    pub count: Option<String>,
    pub pie: Option<String>,
    pub box_univariate: Option<String>,
    pub line_x: Option<String>,
    pub line_y: Option<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
    pub bar_x: Option<String>,
    pub bar_y: Option<String>,
    pub box_x: Option<String>,
    pub box_y: Option<String>,
    /// Pair-plot multi-select.
    pub pair: Vec<String>,
}

impl ChartSelections {
    /// Defaults mirroring the selector policy: every dropdown starts on the
    /// first column of its category, the pair plot on the first
    /// `min(3, n)` numeric columns.
    fn init(catalog: &ColumnCatalog) -> Self {
        let first_numeric = catalog.numeric.first().cloned();
        let first_categorical = catalog.categorical.first().cloned();
        ChartSelections {
            histogram: first_numeric.clone(),
            count: first_categorical.clone(),
            pie: first_categorical.clone(),
            box_univariate: first_categorical.clone(),
            line_x: first_numeric.clone(),
            line_y: first_numeric.clone(),
            scatter_x: first_numeric.clone(),
            scatter_y: first_numeric.clone(),
            bar_x: first_categorical.clone(),
            bar_y: first_numeric.clone(),
            box_x: first_categorical,
            box_y: first_numeric,
            pair: catalog.default_pair_columns(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current page.
    pub page: Page,

    /// Loaded dataset (None until the user opens a file). Read-only once
    /// loaded.
    pub dataset: Option<Dataset>,

    /// Column classification, derived once per load and cached. The UI
    /// re-runs every frame but never re-derives this.
    pub catalog: ColumnCatalog,

    /// Per-chart dropdown selections.
    pub selections: ChartSelections,

    /// Status / error message shown in the sidebar.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            page: Page::Welcome,
            dataset: None,
            catalog: ColumnCatalog::default(),
            selections: ChartSelections::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: classify its columns once and reset
    /// every selector to its default.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.catalog = classify(&dataset);
        self.selections = ChartSelections::init(&self.catalog);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnValues};

    #[test]
    fn set_dataset_initialises_selectors_to_first_columns() {
        let dataset = Dataset::new(vec![
            Column {
                name: "a".into(),
                values: ColumnValues::Numeric(vec![1.0, 2.0]),
            },
            Column {
                name: "b".into(),
                values: ColumnValues::Numeric(vec![3.0, 4.0]),
            },
            Column {
                name: "c".into(),
                values: ColumnValues::Categorical(vec![Some("x".into()), Some("y".into())]),
            },
        ]);

        let mut state = AppState::default();
        state.set_dataset(dataset);

        assert_eq!(state.selections.histogram.as_deref(), Some("a"));
        assert_eq!(state.selections.count.as_deref(), Some("c"));
        assert_eq!(state.selections.bar_x.as_deref(), Some("c"));
        assert_eq!(state.selections.bar_y.as_deref(), Some("a"));
        assert_eq!(state.selections.pair, vec!["a", "b"]);
        assert!(state.status_message.is_none());
    }
}
