use kurbo::{Affine, Cap, Line, Point, Rect, Stroke};
use parley::FontWeight;
use tracing::{debug, warn};

use crate::{
  axes::Axes,
  render::{Align, DrawText, Render},
};

mod axes;
mod bounds;
pub mod dataset;
mod error;
mod format;
mod legend;
mod marker;
mod render;
mod theme;

pub use axes::{LineAxes, LineOptions, ScatterAxes, ScatterOptions};
pub use bounds::{Bounds, NiceTicksIter, Range};
pub use error::{Error, Result};
pub use format::{Format, LineStyle};
pub use legend::LegendPosition;
pub use marker::Marker;
pub use theme::{Palette, Style, TAB10};

/// Figure size of the original scripts: 11 x 8 inches at 100 dpi.
pub const DEFAULT_WIDTH: u32 = 1100;
pub const DEFAULT_HEIGHT: u32 = 800;

/// Fraction of the data range added on each side of the axes.
const DATA_MARGIN: f64 = 0.05;
const TICKS: u32 = 10;

pub struct Plot<'a> {
  title:   Option<String>,
  x_label: Option<String>,
  y_label: Option<String>,
  style:   Style,
  legend:  Option<LegendPosition>,
  width:   u32,
  height:  u32,

  axes:  Vec<Axes<'a>>,
  cycle: usize,
}

pub(crate) trait ResultExt<T> {
  /// Logs the error and discards it.
  fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
  fn log_err(self) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        warn!("{e}");
        None
      }
    }
  }
}

impl Default for Plot<'_> {
  fn default() -> Self {
    Plot {
      title:   None,
      x_label: None,
      y_label: None,
      style:   Style::default(),
      legend:  None,
      width:   DEFAULT_WIDTH,
      height:  DEFAULT_HEIGHT,
      axes:    vec![],
      cycle:   0,
    }
  }
}

impl<'a> Plot<'a> {
  pub fn new() -> Plot<'a> { Plot::default() }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn x_label(&mut self, label: &str) -> &mut Self {
    self.x_label = Some(label.to_string());
    self
  }

  pub fn y_label(&mut self, label: &str) -> &mut Self {
    self.y_label = Some(label.to_string());
    self
  }

  pub fn style(&mut self, style: Style) -> &mut Self {
    self.style = style;
    self
  }

  pub fn legend(&mut self, position: LegendPosition) -> &mut Self {
    self.legend = Some(position);
    self
  }

  /// Output size in pixels.
  pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
    self.width = width.max(1);
    self.height = height.max(1);
    self
  }
}

impl Plot<'_> {
  pub(crate) fn draw(&self, render: &mut Render, width: f64, height: f64) -> Result<()> {
    let style = self.style;
    let palette = style.palette;

    render.fill(&Rect::new(0.0, 0.0, width, height), Affine::IDENTITY, style.background);

    let legend = self.legend.and_then(|pos| Some((pos, self.layout_legend(render)?)));

    let left = if self.y_label.is_some() { 90.0 } else { 60.0 };
    let top = if self.title.is_some() { 60.0 } else { 30.0 };
    let bottom = height - if self.x_label.is_some() { 70.0 } else { 40.0 };
    let mut right = width - 30.0;
    if let Some((LegendPosition::Outside, layout)) = &legend {
      right -= layout.size.width + legend::BORDER_AXES_PAD;
    }
    let viewport = Bounds::new(Range::new(left, right), Range::new(bottom, top));

    let mut drawable = vec![];
    let mut data_bounds: Option<Bounds> = None;
    for ax in &self.axes {
      let Some(bounds) = ax.data().data_bounds().log_err() else { continue };
      drawable.push(ax);
      if let Some(bounds) = bounds {
        data_bounds = Some(data_bounds.map_or(bounds, |b| b.union(bounds)));
      }
    }
    let data_bounds = data_bounds.unwrap_or(Bounds::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)));
    let data_bounds =
      Bounds::new(data_bounds.x.with_margin(DATA_MARGIN), data_bounds.y.with_margin(DATA_MARGIN));
    debug!(?data_bounds, ?viewport, series = drawable.len(), "drawing plot");

    let transform = data_bounds.transform_to(viewport);

    render.fill(
      &Rect::new(viewport.x.min, viewport.y.max, viewport.x.max, viewport.y.min),
      Affine::IDENTITY,
      style.axes_background,
    );

    self.draw_ticks(render, data_bounds, viewport, transform);

    if let Some(spines) = style.spines {
      let border_stroke = Stroke::new(1.5);
      render.stroke(
        &Line::new(
          Point::new(viewport.x.min, viewport.y.min),
          Point::new(viewport.x.max, viewport.y.min),
        ),
        Affine::IDENTITY,
        spines,
        &border_stroke,
      );
      render.stroke(
        &Line::new(
          Point::new(viewport.x.min, viewport.y.min),
          Point::new(viewport.x.min, viewport.y.max),
        ),
        Affine::IDENTITY,
        spines,
        &border_stroke,
      );
    }

    for ax in drawable {
      match ax {
        Axes::Line(la) => la.draw(render, transform, &palette)?,
        Axes::Scatter(sa) => sa.draw(render, transform, &palette)?,
      }
    }

    if let Some(title) = &self.title {
      render.draw_text(DrawText {
        text: title,
        size: 22.0,
        weight: FontWeight::BOLD,
        color: style.text,
        position: Point { x: viewport.x.min.midpoint(viewport.x.max), y: top - 15.0 },
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    if let Some(x_label) = &self.x_label {
      render.draw_text(DrawText {
        text: x_label,
        size: 16.0,
        color: style.text,
        position: Point { x: viewport.x.min.midpoint(viewport.x.max), y: viewport.y.min + 35.0 },
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      });
    }

    if let Some(y_label) = &self.y_label {
      render.draw_text(DrawText {
        text: y_label,
        size: 16.0,
        color: style.text,
        position: Point { x: viewport.x.min - 55.0, y: viewport.y.min.midpoint(viewport.y.max) },
        transform: Affine::rotate(-std::f64::consts::FRAC_PI_2),
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    if let Some((position, layout)) = legend {
      self.draw_legend(render, layout, position, viewport);
    }

    Ok(())
  }

  fn draw_ticks(&self, render: &mut Render, data_bounds: Bounds, viewport: Bounds, transform: Affine) {
    let style = self.style;
    let grid_stroke = Stroke::new(1.0);
    let tick_stroke = Stroke::new(1.5).with_start_cap(Cap::Butt);

    let iter = data_bounds.y.nice_ticks(TICKS);
    let decimals = iter.decimals();
    for (y, vy) in iter
      .map(|v| (v, (transform * Point::new(0.0, v)).y))
      .filter(|(_, vy)| viewport.y.contains(vy))
    {
      if let Some(grid) = style.grid {
        render.stroke(
          &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.max, vy)),
          Affine::IDENTITY,
          grid,
          &grid_stroke,
        );
      }
      if style.spines.is_some() {
        render.stroke(
          &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.min - 6.0, vy)),
          Affine::IDENTITY,
          style.ticks,
          &tick_stroke,
        );
      }
      render.draw_text(DrawText {
        text: &format!("{y:.decimals$}"),
        size: 12.0,
        position: Point { x: viewport.x.min - 10.0, y: vy },
        color: style.text,
        horizontal_align: Align::End,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    let iter = data_bounds.x.nice_ticks(TICKS);
    let decimals = iter.decimals();
    for (x, vx) in iter
      .map(|v| (v, (transform * Point::new(v, 0.0)).x))
      .filter(|(_, vx)| viewport.x.contains(vx))
    {
      if let Some(grid) = style.grid {
        render.stroke(
          &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.max)),
          Affine::IDENTITY,
          grid,
          &grid_stroke,
        );
      }
      if style.spines.is_some() {
        render.stroke(
          &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.min + 6.0)),
          Affine::IDENTITY,
          style.ticks,
          &tick_stroke,
        );
      }
      render.draw_text(DrawText {
        text: &format!("{x:.decimals$}"),
        size: 12.0,
        position: Point { x: vx, y: viewport.y.min + 10.0 },
        color: style.text,
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      });
    }
  }
}

#[cfg(test)]
mod tests {
  use peniko::Color;
  use polars::prelude::*;
  use rand::{SeedableRng, rngs::StdRng};
  use tempfile::tempdir;

  use super::*;

  fn path_count(plot: &Plot) -> u32 {
    let mut render = Render::new(Color::WHITE);
    plot.draw(&mut render, 1100.0, 800.0).unwrap();
    render.scene.encoding().n_paths
  }

  fn generated_sample(dir: &std::path::Path) -> DataFrame {
    let path = dir.join(dataset::DEFAULT_PATH);
    let rows = dataset::generate(&mut StdRng::seed_from_u64(7), dataset::DEFAULT_ROWS);
    dataset::write_csv_file(&path, &rows).unwrap();
    dataset::read_csv(&path).unwrap()
  }

  #[test]
  fn draws_without_gpu() {
    let df = df! {
      "red" => &[0.1, 0.5, 0.9],
      "green" => &[0.2, 0.4, 0.6],
      "blue" => &[1.0, 0.0, 0.5],
    }
    .unwrap();

    let mut plot = Plot::new();
    plot.title("rgb").legend(LegendPosition::Outside);
    for column in df.get_columns() {
      plot.line_indexed(column);
    }

    let mut render = Render::new(Color::WHITE);
    plot.draw(&mut render, 1100.0, 800.0).unwrap();
    assert!(!render.scene.encoding().is_empty());
  }

  #[test]
  fn markers_plot_fills_one_path_per_row() {
    let dir = tempdir().unwrap();
    let df = generated_sample(dir.path());
    let (red, green, blue) =
      (df.column("red").unwrap(), df.column("green").unwrap(), df.column("blue").unwrap());

    let mut lines = Plot::new();
    lines.plot_fmt(red, "r-").unwrap().plot_fmt(green, "g-").unwrap().plot_fmt(blue, "b-").unwrap();

    let mut markers = Plot::new();
    markers.plot_fmt(red, "r-").unwrap().plot_fmt(green, "g-").unwrap().plot_fmt(blue, "b-").unwrap();
    markers.plot_fmt(red, "ro").unwrap().plot_fmt(green, "go").unwrap().plot_fmt(blue, "bo").unwrap();

    assert_eq!(path_count(&markers), path_count(&lines) + 3 * dataset::DEFAULT_ROWS as u32);
  }

  #[test]
  fn lines_plot_legend_has_a_sample_per_column() {
    let dir = tempdir().unwrap();
    let df = generated_sample(dir.path());

    let mut plain = Plot::new();
    let mut with_legend = Plot::new();
    with_legend.legend(LegendPosition::Outside);
    for column in df.get_columns() {
      plain.line_indexed(column);
      with_legend.line_indexed(column);
    }

    // Box fill and outline, then one line sample per column.
    assert_eq!(path_count(&with_legend), path_count(&plain) + 2 + 3);
  }

  #[test]
  fn white_style_draws_spines_instead_of_grid() {
    let red = Column::new("red".into(), [0.1, 0.5, 0.9]);
    let green = Column::new("green".into(), [0.2, 0.4, 0.6]);

    let mut darkgrid = Plot::new();
    darkgrid.style(Style::DARKGRID);
    darkgrid.scatter_indexed(&red);
    darkgrid.line_indexed(&green);

    let mut white = Plot::new();
    white.style(Style::WHITE);
    white.scatter_indexed(&red);
    white.line_indexed(&green);

    // Each grid line becomes a tick mark, plus the two spines.
    assert_eq!(path_count(&white), path_count(&darkgrid) + 2);
  }

  #[test]
  fn upper_right_legend_labels_indexed_markers() {
    let red = Column::new("red".into(), [0.1, 0.5, 0.9]);
    let green = Column::new("green".into(), [0.2, 0.4, 0.6]);

    let mut plain = Plot::new();
    plain.style(Style::WHITE);
    plain.scatter_indexed(&red);
    plain.line_indexed(&green);

    let mut with_legend = Plot::new();
    with_legend.style(Style::WHITE).legend(LegendPosition::UpperRight);
    with_legend.scatter_indexed(&red);
    with_legend.line_indexed(&green);

    assert_eq!(with_legend.legend_items().len(), 2);
    assert_eq!(with_legend.legend_items()[0].label, "red");
    // Box fill and outline, a marker sample and a line sample.
    assert_eq!(path_count(&with_legend), path_count(&plain) + 4);
  }

  #[test]
  fn unreadable_series_is_skipped() {
    let x = Column::new("x".into(), [1.0, 2.0]);
    let y = Column::new("y".into(), [1.0, 2.0, 3.0]);
    let ok = Column::new("ok".into(), [0.5, 0.6]);

    let mut only_ok = Plot::new();
    only_ok.line_indexed(&ok);

    let mut plot = Plot::new();
    plot.scatter(&x, &y);
    plot.line_indexed(&ok);

    assert_eq!(path_count(&plot), path_count(&only_ok));
    assert!(path_count(&only_ok) > path_count(&Plot::new()));
  }

  #[test]
  fn empty_plot_draws_axes() {
    let plot = Plot::new();
    let mut render = Render::new(Color::WHITE);
    assert!(plot.draw(&mut render, 400.0, 300.0).is_ok());
  }

  #[test]
  fn size_is_at_least_one_pixel() {
    let mut plot = Plot::new();
    plot.size(0, 10);
    assert_eq!((plot.width, plot.height), (1, 10));
  }
}
