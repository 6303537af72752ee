use std::fmt;

// ---------------------------------------------------------------------------
// SemanticType – the declared category of a column
// ---------------------------------------------------------------------------

/// Semantic category of a column, computed once at load time and immutable
/// for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Values interpretable as real numbers.
    Numeric,
    /// Discrete text labels.
    Categorical,
    /// Everything else (booleans, dates, nested types). Excluded from all
    /// selectors.
    Unsupported,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Numeric => write!(f, "numeric"),
            SemanticType::Categorical => write!(f, "categorical"),
            SemanticType::Unsupported => write!(f, "unsupported"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed column of the dataset
// ---------------------------------------------------------------------------

/// Typed column storage. Missing numeric cells are stored as NaN, missing
/// categorical cells as `None`.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    Numeric(Vec<f64>),
    Categorical(Vec<Option<String>>),
    /// Values of unsupported dtypes are not retained.
    Unsupported,
}

/// A single named column with its declared semantic type.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn semantic_type(&self) -> SemanticType {
        match self.values {
            ColumnValues::Numeric(_) => SemanticType::Numeric,
            ColumnValues::Categorical(_) => SemanticType::Categorical,
            ColumnValues::Unsupported => SemanticType::Unsupported,
        }
    }

    /// Numeric values, if this is a numeric column.
    pub fn numeric(&self) -> Option<&[f64]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Categorical labels, if this is a categorical column.
    pub fn categorical(&self) -> Option<&[Option<String>]> {
        match &self.values {
            ColumnValues::Categorical(v) => Some(v),
            _ => None,
        }
    }

    /// Number of stored cells (0 for unsupported columns).
    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
            ColumnValues::Unsupported => 0,
        }
    }

    /// Cell rendered as text, for the preview table.
    pub fn cell_text(&self, row: usize) -> String {
        match &self.values {
            ColumnValues::Numeric(v) => match v.get(row) {
                Some(x) if x.is_nan() => String::new(),
                Some(x) => format!("{x}"),
                None => String::new(),
            },
            ColumnValues::Categorical(v) => match v.get(row) {
                Some(Some(s)) => s.clone(),
                _ => String::new(),
            },
            ColumnValues::Unsupported => "–".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset: an ordered collection of named columns.
/// Loaded once per session and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Columns in their original file order.
    pub columns: Vec<Column>,
    /// Number of rows (length of the value columns).
    pub n_rows: usize,
}

impl Dataset {
    /// Build a dataset from loaded columns, taking the row count from the
    /// longest retained column.
    pub fn new(columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(Column::len).max().unwrap_or(0);
        Dataset { columns, n_rows }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric values of a named column, if it exists and is numeric.
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::numeric)
    }

    /// Categorical labels of a named column, if it exists and is categorical.
    pub fn categorical(&self, name: &str) -> Option<&[Option<String>]> {
        self.column(name).and_then(Column::categorical)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }
}
