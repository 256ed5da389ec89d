use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;
pub mod report;
pub mod scatter;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DEFAULT_CSV: &str = "out/bench.csv";
pub const DEFAULT_OUTDIR: &str = "reports/output";

/// cells holding one of these strings are loaded as missing values
pub const NA_TOKENS: [&str; 8] = ["NA", "N/A", "NaN", "nan", "null", "None", "#N/A", "-nan"];

/// Why a csv input could not be read as a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("no header row, the input is empty")]
    Empty,
    #[error("record on line {line} has {found} fields, the header has {expected}")]
    LongRecord {
        line: u64,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not load table from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("could not create output directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not register the embedded font: {source}")]
    Font {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("could not render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

/// One named column of the benchmark table, `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The benchmark table, stored by column.
/// All the columns have the same length, the number of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Init a Table from a csv file with a header row.
    /// Short records are padded with missing values;
    /// fails if the file is missing, unreadable or empty,
    /// or if a record has more fields than the header.
    pub fn from_csv(fin: &Path) -> Result<Table, ReportError> {
        let load_err = |source: TableError| ReportError::Load {
            path: fin.to_path_buf(),
            source,
        };
        let reader = csv_builder()
            .from_path(fin)
            .map_err(|e| load_err(e.into()))?;
        let table = Table::from_csv_reader(reader).map_err(load_err)?;
        debug!(
            path = %fin.display(),
            rows = table.len(),
            columns = ?table.column_names(),
            "loaded table"
        );
        Ok(table)
    }

    /// Same as `from_csv`, for any reader.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Table, TableError> {
        Table::from_csv_reader(csv_builder().from_reader(rdr))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Table, TableError> {
        let headers = reader.headers()?;
        if headers.is_empty() {
            return Err(TableError::Empty);
        }
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|name| Column {
                name: name.to_string(),
                values: Vec::new(),
            })
            .collect();
        for record in reader.records() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(TableError::LongRecord {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            for (i, column) in columns.iter_mut().enumerate() {
                column.values.push(record.get(i).and_then(parse_cell));
            }
        }
        Ok(Table { columns })
    }

    /// first column with the given name, if any
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.column(n).is_some())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// header row required, records may be shorter than the header
fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

/// Parses one csv cell,
/// empty cells, NA tokens, and anything that is not a finite number are missing.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || NA_TOKENS.contains(&cell) {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

/// Widest half width of an axis range; wider ranges are not drawn by plotters.
pub const MAX_HALF_WIDTH: f64 = f64::MAX / 4.0;

/// axis range covering all the values with a 5% margin on each side;
/// a single distinct value gets a fixed margin, no values give 0..1.
/// Works on halves so values near the f64 limits saturate to a finite range
/// of width at most `2 * MAX_HALF_WIDTH`, which may then clip extreme points.
pub fn axis_range(values: &[f64]) -> Range<f64> {
    let (min, max) = match min_and_max(values) {
        Some(mm) => mm,
        None => return 0.0..1.0,
    };
    let mid = min / 2.0 + max / 2.0;
    let half_span = max / 2.0 - min / 2.0;
    let half = if half_span > 0.0 {
        half_span + half_span / 10.0
    } else {
        (min.abs() / 20.0).max(0.5)
    }
    .min(MAX_HALF_WIDTH);
    let start = (mid - half).max(f64::MIN);
    let end = (mid + half).min(f64::MAX);
    start..end
}
