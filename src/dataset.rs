//! The sample RGB dataset: generating it, writing it as CSV and reading it
//! back.

use std::{
  fmt,
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

use polars::prelude::*;
use rand::RngExt;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Column names, in file order.
pub const COLUMNS: [&str; 3] = ["red", "green", "blue"];
pub const DEFAULT_PATH: &str = "sample.csv";
pub const DEFAULT_ROWS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
  pub red:   f64,
  pub green: f64,
  pub blue:  f64,
}

impl Rgb {
  /// A random colour. Each channel is a random byte scaled into `[0, 1]`.
  pub fn random<R: RngExt + ?Sized>(rng: &mut R) -> Rgb {
    Rgb { red: channel(rng), green: channel(rng), blue: channel(rng) }
  }
}

fn channel<R: RngExt + ?Sized>(rng: &mut R) -> f64 {
  f64::from(rng.random_range(0..=u8::MAX)) / 255.0
}

pub fn generate<R: RngExt + ?Sized>(rng: &mut R, rows: usize) -> Vec<Rgb> {
  (0..rows).map(|_| Rgb::random(rng)).collect()
}

/// Writes the quoted header, then one `\n`-prefixed line per row with two
/// decimals per value. There is no trailing newline.
pub fn write_csv<W: Write>(mut writer: W, rows: &[Rgb]) -> std::io::Result<()> {
  let header = COLUMNS.map(|c| format!("\"{c}\"")).join(",");
  writer.write_all(header.as_bytes())?;

  for row in rows {
    write!(writer, "\n{:.2},{:.2},{:.2}", row.red, row.green, row.blue)?;
  }

  writer.flush()
}

/// Creates or truncates `path` and writes `rows` to it.
pub fn write_csv_file(path: impl AsRef<Path>, rows: &[Rgb]) -> Result<()> {
  let path = path.as_ref();
  let file = File::create(path)?;
  write_csv(BufWriter::new(file), rows)?;

  info!("wrote {} rows to {}", rows.len(), path.display());
  Ok(())
}

/// Loads a three-column CSV with a header, naming the columns `red`, `green`
/// and `blue` whatever the header says, as `Float64`.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
  let path = path.as_ref();
  let file = File::open(path)?;
  let mut df = CsvReader::new(file).finish()?;

  if df.width() != COLUMNS.len() {
    return Err(Error::Schema(format!(
      "{} has {} columns, expected {}",
      path.display(),
      df.width(),
      COLUMNS.len()
    )));
  }

  df.set_column_names(COLUMNS)?;
  let df = df.lazy().select(COLUMNS.map(|c| col(c).cast(DataType::Float64))).collect()?;

  debug!(rows = df.height(), "read {}", path.display());
  Ok(df)
}

/// Every value of a numeric column as `f64`, with nulls kept as `None`.
pub fn column_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
  let values = column.cast(&DataType::Float64)?;
  Ok(values.as_materialized_series().f64()?.into_iter().collect())
}

/// A column printed the way pandas prints a float series: the index, then the
/// values right-aligned with as few decimals as the column needs (at least
/// one, at most six), then the name and type.
///
/// ```text
/// 0    0.53
/// 1    0.07
/// Name: red, dtype: float64
/// ```
pub struct ColumnListing {
  name:   String,
  values: Vec<Option<f64>>,
}

impl ColumnListing {
  pub fn new(column: &Column) -> PolarsResult<Self> {
    Ok(ColumnListing { name: column.name().to_string(), values: column_values(column)? })
  }

  pub fn len(&self) -> usize { self.values.len() }
  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  /// Decimals needed so that no value loses digits at six decimals.
  fn decimals(&self) -> usize {
    self
      .values
      .iter()
      .flatten()
      .map(|v| {
        let text = format!("{v:.6}");
        text.split_once('.').map_or(0, |(_, frac)| frac.trim_end_matches('0').len())
      })
      .max()
      .unwrap_or(0)
      .max(1)
  }
}

impl fmt::Display for ColumnListing {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.values.is_empty() {
      return write!(f, "Series([], Name: {}, dtype: float64)", self.name);
    }

    let decimals = self.decimals();
    let cells = self
      .values
      .iter()
      .map(|value| match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "NaN".to_string(),
      })
      .collect::<Vec<_>>();
    let index_width = (self.values.len() - 1).to_string().len();
    let value_width = cells.iter().map(String::len).max().unwrap_or(0);

    for (i, cell) in cells.iter().enumerate() {
      writeln!(f, "{i:<index_width$}    {cell:>value_width$}")?;
    }
    write!(f, "Name: {}, dtype: float64", self.name)
  }
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};
  use tempfile::tempdir;

  use super::*;

  fn sample(seed: u64) -> Vec<Rgb> { generate(&mut StdRng::seed_from_u64(seed), DEFAULT_ROWS) }

  #[test]
  fn channels_are_scaled_bytes() {
    for row in sample(1) {
      for v in [row.red, row.green, row.blue] {
        assert!((0.0..=1.0).contains(&v));
        let byte = v * 255.0;
        assert!((byte - byte.round()).abs() < 1e-9);
      }
    }
  }

  #[test]
  fn csv_layout() {
    let rows = [
      Rgb { red: 0.0, green: 0.5, blue: 1.0 },
      Rgb { red: 0.333, green: 0.126, blue: 0.996 },
    ];
    let mut out = vec![];
    write_csv(&mut out, &rows).unwrap();

    assert_eq!(
      String::from_utf8(out).unwrap(),
      "\"red\",\"green\",\"blue\"\n0.00,0.50,1.00\n0.33,0.13,1.00"
    );
  }

  #[test]
  fn generated_file_has_header_and_ten_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_PATH);
    write_csv_file(&path, &sample(2)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), DEFAULT_ROWS + 1);
    assert_eq!(lines[0], "\"red\",\"green\",\"blue\"");
    for line in &lines[1..] {
      let values = line.split(',').map(|v| v.parse::<f64>().unwrap()).collect::<Vec<_>>();
      assert_eq!(values.len(), 3);
      assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    }
  }

  #[test]
  fn rewriting_overwrites() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_PATH);
    write_csv_file(&path, &generate(&mut StdRng::seed_from_u64(3), 50)).unwrap();
    write_csv_file(&path, &sample(4)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), DEFAULT_ROWS + 1);
  }

  #[test]
  fn read_back_matches_written_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_PATH);
    let rows = sample(5);
    write_csv_file(&path, &rows).unwrap();

    let df = read_csv(&path).unwrap();
    assert_eq!(df.shape(), (DEFAULT_ROWS, 3));
    assert_eq!(df.get_column_names_str(), COLUMNS.to_vec());

    let rounded = |v: f64| format!("{v:.2}").parse::<f64>().unwrap();
    let red = column_values(df.column("red").unwrap()).unwrap();
    let blue = column_values(df.column("blue").unwrap()).unwrap();
    for (i, row) in rows.iter().enumerate() {
      assert_eq!(red[i], Some(rounded(row.red)));
      assert_eq!(blue[i], Some(rounded(row.blue)));
    }
  }

  #[test]
  fn header_names_are_replaced() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other.csv");
    std::fs::write(&path, "a,b,c\n1,0.5,0\n0.25,0,1").unwrap();

    let df = read_csv(&path).unwrap();
    let green = column_values(df.column("green").unwrap()).unwrap();
    assert_eq!(green, vec![Some(0.5), Some(0.0)]);
  }

  #[test]
  fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(read_csv(dir.path().join("absent.csv")), Err(Error::Io(_))));
  }

  #[test]
  fn wrong_width_is_schema_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("two.csv");
    std::fs::write(&path, "red,green\n0.1,0.2").unwrap();

    assert!(matches!(read_csv(&path), Err(Error::Schema(_))));
  }

  #[test]
  fn listing_prints_each_row() {
    let column = Column::new("red".into(), [0.53, 0.07, 1.0]);
    let listing = ColumnListing::new(&column).unwrap();

    assert_eq!(listing.len(), 3);
    assert_eq!(listing.to_string(), "0    0.53\n1    0.07\n2    1.00\nName: red, dtype: float64");
  }

  #[test]
  fn listing_pads_index() {
    let column = Column::new("red".into(), vec![0.25; 11]);
    let text = ColumnListing::new(&column).unwrap().to_string();

    assert!(text.starts_with("0     0.25\n"));
    assert!(text.contains("\n10    0.25\n"));
  }

  #[test]
  fn listing_trims_shared_decimals() {
    let column = Column::new("red".into(), [0.5, 0.2, 1.0]);
    let text = ColumnListing::new(&column).unwrap().to_string();

    assert_eq!(text, "0    0.5\n1    0.2\n2    1.0\nName: red, dtype: float64");
  }

  #[test]
  fn listing_aligns_missing_values() {
    let column = Column::new("red".into(), [Some(0.25), None]);
    let text = ColumnListing::new(&column).unwrap().to_string();

    assert_eq!(text, "0    0.25\n1     NaN\nName: red, dtype: float64");
  }

  #[test]
  fn empty_listing_is_one_line() {
    let column = Column::new("red".into(), Vec::<f64>::new());
    let listing = ColumnListing::new(&column).unwrap();

    assert!(listing.is_empty());
    assert_eq!(listing.to_string(), "Series([], Name: red, dtype: float64)");
  }
}
