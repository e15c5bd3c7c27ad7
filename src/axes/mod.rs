mod line;
mod scatter;

pub use line::{LineAxes, LineOptions};
pub use scatter::{ScatterAxes, ScatterOptions};

use kurbo::Point;
use polars::prelude::*;

use crate::{Bounds, Plot, Range, dataset::column_values, format::Format};

pub(crate) enum Axes<'a> {
  Scatter(ScatterAxes<'a>),
  Line(LineAxes<'a>),
}

/// The columns behind a series. Without an `x` column, `y` is plotted
/// against its row index.
#[derive(Clone, Copy)]
pub(crate) struct SeriesData<'a> {
  x: Option<&'a Column>,
  y: &'a Column,
}

impl<'a> SeriesData<'a> {
  pub(crate) fn new(x: Option<&'a Column>, y: &'a Column) -> Self { SeriesData { x, y } }

  /// One entry per row. Rows where either value is null are `None`.
  pub(crate) fn points(&self) -> PolarsResult<Vec<Option<Point>>> {
    let ys = column_values(self.y)?;
    let xs = match self.x {
      Some(x) => column_values(x)?,
      None => (0..ys.len()).map(|i| Some(i as f64)).collect(),
    };

    if xs.len() != ys.len() {
      return Err(PolarsError::ShapeMismatch(
        format!("x has {} rows but y has {}", xs.len(), ys.len()).into(),
      ));
    }

    Ok(xs.into_iter().zip(ys).map(|(x, y)| Some(Point::new(x?, y?))).collect())
  }

  /// Bounds of the non-null points, or `None` for an empty series.
  pub(crate) fn data_bounds(&self) -> PolarsResult<Option<Bounds>> {
    let points = self.points()?.into_iter().flatten().collect::<Vec<_>>();
    let x = Range::from_values(points.iter().map(|p| p.x));
    let y = Range::from_values(points.iter().map(|p| p.y));

    Ok(x.zip(y).map(|(x, y)| Bounds::new(x, y)))
  }

  pub(crate) fn name(&self) -> String { self.y.name().to_string() }
}

impl Axes<'_> {
  pub(crate) fn data(&self) -> SeriesData<'_> {
    match self {
      Axes::Scatter(sa) => sa.data,
      Axes::Line(la) => la.data,
    }
  }
}

impl<'a> Plot<'a> {
  fn next_cycle(&mut self) -> usize {
    let cycle = self.cycle;
    self.cycle += 1;
    cycle
  }

  fn push_scatter(&mut self, axes: ScatterAxes<'a>) -> &mut ScatterAxes<'a> {
    self.axes.push(Axes::Scatter(axes));
    match self.axes.last_mut() {
      Some(Axes::Scatter(sa)) => sa,
      _ => unreachable!(),
    }
  }

  fn push_line(&mut self, axes: LineAxes<'a>) -> &mut LineAxes<'a> {
    self.axes.push(Axes::Line(axes));
    match self.axes.last_mut() {
      Some(Axes::Line(la)) => la,
      _ => unreachable!(),
    }
  }

  pub fn scatter(&mut self, x: &'a Column, y: &'a Column) -> &mut ScatterAxes<'a> {
    let cycle = self.next_cycle();
    self.push_scatter(ScatterAxes::new(SeriesData::new(Some(x), y), cycle))
  }

  /// Markers for `y` against its row index, labelled with the column name.
  pub fn scatter_indexed(&mut self, y: &'a Column) -> &mut ScatterAxes<'a> {
    let cycle = self.next_cycle();
    let data = SeriesData::new(None, y);
    let label = data.name();
    self.push_scatter(ScatterAxes::new(data, cycle)).label(&label)
  }

  pub fn line(&mut self, x: &'a Column, y: &'a Column) -> &mut LineAxes<'a> {
    let cycle = self.next_cycle();
    self.push_line(LineAxes::new(SeriesData::new(Some(x), y), cycle))
  }

  /// A line of `y` against its row index, labelled with the column name.
  pub fn line_indexed(&mut self, y: &'a Column) -> &mut LineAxes<'a> {
    let cycle = self.next_cycle();
    let data = SeriesData::new(None, y);
    let label = data.name();
    self.push_line(LineAxes::new(data, cycle)).label(&label)
  }

  /// Adds `y` against its row index, styled by a format string such as
  /// `"r-"` or `"go"`. Both the line and the markers share one colour.
  pub fn plot_fmt(&mut self, y: &'a Column, fmt: &str) -> crate::Result<&mut Self> {
    let format = fmt.parse::<Format>()?;
    let cycle = self.next_cycle();
    let data = SeriesData::new(None, y);

    if let Some(style) = format.line {
      let line = self.push_line(LineAxes::new(data, cycle)).style(style);
      if let Some(color) = format.color {
        line.color(color);
      }
    }
    if let Some(marker) = format.marker {
      let scatter = self.push_scatter(ScatterAxes::new(data, cycle)).marker(marker);
      if let Some(color) = format.color {
        scatter.color(color);
      }
    }

    Ok(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn indexed_points() {
    let y = Column::new("red".into(), [0.5, 0.25, 1.0]);
    let points = SeriesData::new(None, &y).points().unwrap();

    assert_eq!(
      points,
      vec![Some(Point::new(0.0, 0.5)), Some(Point::new(1.0, 0.25)), Some(Point::new(2.0, 1.0))]
    );
  }

  #[test]
  fn nulls_become_gaps() {
    let y = Column::new("red".into(), [Some(0.5), None, Some(1.0)]);
    let data = SeriesData::new(None, &y);

    assert_eq!(data.points().unwrap()[1], None);
    let bounds = data.data_bounds().unwrap().unwrap();
    assert_eq!(bounds, Bounds::new(Range::new(0.0, 2.0), Range::new(0.5, 1.0)));
  }

  #[test]
  fn mismatched_lengths_fail() {
    let x = Column::new("x".into(), [1.0, 2.0]);
    let y = Column::new("y".into(), [1.0, 2.0, 3.0]);

    assert!(SeriesData::new(Some(&x), &y).points().is_err());
  }

  #[test]
  fn format_adds_line_and_markers() {
    let y = Column::new("red".into(), [0.1, 0.2]);
    let mut plot = Plot::new();
    plot.plot_fmt(&y, "r-o").unwrap();
    plot.plot_fmt(&y, "bo").unwrap();

    assert_eq!(plot.axes.len(), 3);
    assert!(matches!(plot.axes[0], Axes::Line(_)));
    assert!(matches!(plot.axes[1], Axes::Scatter(_)));
    assert!(matches!(plot.axes[2], Axes::Scatter(_)));
    assert!(plot.plot_fmt(&y, "rz").is_err());
  }

  #[test]
  fn colors_cycle_in_insertion_order() {
    let red = Column::new("red".into(), [0.1, 0.2]);
    let green = Column::new("green".into(), [0.3, 0.4]);
    let mut plot = Plot::new();
    plot.line_indexed(&red);
    plot.line_indexed(&green);

    let palette = plot.style.palette;
    let colors = plot
      .axes
      .iter()
      .map(|ax| match ax {
        Axes::Line(la) => la.resolved_color(&palette),
        Axes::Scatter(sa) => sa.resolved_color(&palette),
      })
      .collect::<Vec<_>>();
    assert_eq!(colors, vec![palette.cycle(0), palette.cycle(1)]);
  }
}
