// Query and creation options for the spreadsheet feeds

pub const DEFAULT_NEW_WORKSHEET_TITLE: &str = "Worksheet";
pub const DEFAULT_NEW_WORKSHEET_ROWS: u32 = 50;
pub const DEFAULT_NEW_WORKSHEET_COLUMNS: u32 = 20;

/// Options for the list (rows) feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    /// 1-based index of the first row to return
    pub start: Option<u32>,
    /// Maximum number of rows
    pub num: Option<u32>,
    pub orderby: Option<String>,
    pub reverse: Option<bool>,
    /// Structured query, e.g. `age > 25`
    pub query: Option<String>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    pub fn orderby(mut self, column: impl Into<String>) -> Self {
        self.orderby = Some(column.into());
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("start-index".to_string(), start.to_string()));
        }
        if let Some(num) = self.num {
            params.push(("max-results".to_string(), num.to_string()));
        }
        if let Some(ref orderby) = self.orderby {
            params.push(("orderby".to_string(), orderby.clone()));
        }
        if let Some(reverse) = self.reverse {
            params.push(("reverse".to_string(), reverse.to_string()));
        }
        if let Some(ref query) = self.query {
            params.push(("sq".to_string(), query.clone()));
        }
        params
    }
}

/// Options for the cells feed; parameters pass through as given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellQuery {
    params: Vec<(String, String)>,
}

impl CellQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any cells-feed parameter, sent verbatim
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn min_row(self, row: u32) -> Self {
        self.param("min-row", row)
    }

    pub fn max_row(self, row: u32) -> Self {
        self.param("max-row", row)
    }

    pub fn min_col(self, col: u32) -> Self {
        self.param("min-col", col)
    }

    pub fn max_col(self, col: u32) -> Self {
        self.param("max-col", col)
    }

    pub fn return_empty(self, return_empty: bool) -> Self {
        self.param("return-empty", return_empty)
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        self.params.clone()
    }
}

/// Settings for a new worksheet; unset fields fall back to the defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWorksheet {
    pub title: Option<String>,
    pub row_count: Option<u32>,
    pub col_count: Option<u32>,
}

impl NewWorksheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn row_count(mut self, rows: u32) -> Self {
        self.row_count = Some(rows);
        self
    }

    pub fn col_count(mut self, cols: u32) -> Self {
        self.col_count = Some(cols);
        self
    }
}
