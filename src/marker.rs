use kurbo::{BezPath, Circle, Point, Rect, Shape};

/// Marker shapes, each drawn centred on the origin inside a unit box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
  Point,
  Circle,
  Plus,
  Cross,
  Star,

  Square,
  Triangle,
  TriangleDown,
  Diamond,
  ThinDiamond,
  Hexagon,
}

// sqrt(3) / 4.0, using the unstable SQRT_3 constant.
const SQRT_3_4: f64 = 1.732050807568877293527446341505872367_f64 / 4.0;

impl Marker {
  /// The marker for a matplotlib format character.
  pub fn from_char(c: char) -> Option<Marker> {
    Some(match c {
      '.' => Marker::Point,
      'o' => Marker::Circle,
      '+' => Marker::Plus,
      'x' => Marker::Cross,
      '*' => Marker::Star,
      's' => Marker::Square,
      '^' => Marker::Triangle,
      'v' => Marker::TriangleDown,
      'D' => Marker::Diamond,
      'd' => Marker::ThinDiamond,
      'h' => Marker::Hexagon,
      _ => return None,
    })
  }

  pub(crate) fn to_path(self, tolerance: f64) -> BezPath {
    match self {
      Marker::Point => Circle::new(Point::new(0.0, 0.0), 0.25).to_path(tolerance),
      Marker::Circle => Circle::new(Point::new(0.0, 0.0), 0.5).to_path(tolerance),
      Marker::Plus => {
        const INSET: f64 = 0.15;

        let mut path = BezPath::new();
        path.move_to(Point::new(-INSET, -0.5));
        path.line_to(Point::new(INSET, -0.5));
        path.line_to(Point::new(INSET, -INSET));
        path.line_to(Point::new(0.5, -INSET));
        path.line_to(Point::new(0.5, INSET));
        path.line_to(Point::new(INSET, INSET));
        path.line_to(Point::new(INSET, 0.5));
        path.line_to(Point::new(-INSET, 0.5));
        path.line_to(Point::new(-INSET, INSET));
        path.line_to(Point::new(-0.5, INSET));
        path.line_to(Point::new(-0.5, -INSET));
        path.line_to(Point::new(-INSET, -INSET));
        path.close_path();
        path
      }
      Marker::Cross => {
        const INSET: f64 = 0.15;

        let mut path = BezPath::new();
        path.move_to(Point::new(-0.5 + INSET, -0.5));
        path.line_to(Point::new(0.0, -INSET));
        path.line_to(Point::new(0.5 - INSET, -0.5));
        path.line_to(Point::new(0.5, -0.5 + INSET));
        path.line_to(Point::new(INSET, 0.0));
        path.line_to(Point::new(0.5, 0.5 - INSET));
        path.line_to(Point::new(0.5 - INSET, 0.5));
        path.line_to(Point::new(0.0, INSET));
        path.line_to(Point::new(-0.5 + INSET, 0.5));
        path.line_to(Point::new(-0.5, 0.5 - INSET));
        path.line_to(Point::new(-INSET, 0.0));
        path.line_to(Point::new(-0.5, -0.5 + INSET));
        path.close_path();
        path
      }
      Marker::Star => {
        const INNER: f64 = 0.2;

        let mut path = BezPath::new();
        for i in 0..10 {
          let radius = if i % 2 == 0 { 0.5 } else { INNER };
          let angle = std::f64::consts::PI * f64::from(i) / 5.0 - std::f64::consts::FRAC_PI_2;
          let point = Point::new(radius * angle.cos(), radius * angle.sin());
          if i == 0 {
            path.move_to(point);
          } else {
            path.line_to(point);
          }
        }
        path.close_path();
        path
      }
      Marker::Square => Rect::new(-0.5, -0.5, 0.5, 0.5).to_path(tolerance),
      Marker::Triangle => {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, -SQRT_3_4));
        path.line_to(Point::new(0.5, SQRT_3_4));
        path.line_to(Point::new(-0.5, SQRT_3_4));
        path.close_path();
        path
      }
      Marker::TriangleDown => {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, SQRT_3_4));
        path.line_to(Point::new(0.5, -SQRT_3_4));
        path.line_to(Point::new(-0.5, -SQRT_3_4));
        path.close_path();
        path
      }
      Marker::Diamond | Marker::ThinDiamond => {
        let half_width = if self == Marker::Diamond { 0.5 } else { 0.3 };

        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, -0.5));
        path.line_to(Point::new(half_width, 0.0));
        path.line_to(Point::new(0.0, 0.5));
        path.line_to(Point::new(-half_width, 0.0));
        path.close_path();
        path
      }
      Marker::Hexagon => {
        let mut path = BezPath::new();
        path.move_to(Point::new(-0.25, -SQRT_3_4));
        path.line_to(Point::new(0.25, -SQRT_3_4));
        path.line_to(Point::new(0.5, 0.0));
        path.line_to(Point::new(0.25, SQRT_3_4));
        path.line_to(Point::new(-0.25, SQRT_3_4));
        path.line_to(Point::new(-0.5, 0.0));
        path.close_path();
        path
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [Marker; 11] = [
    Marker::Point,
    Marker::Circle,
    Marker::Plus,
    Marker::Cross,
    Marker::Star,
    Marker::Square,
    Marker::Triangle,
    Marker::TriangleDown,
    Marker::Diamond,
    Marker::ThinDiamond,
    Marker::Hexagon,
  ];

  #[test]
  fn markers_fit_unit_box() {
    for marker in ALL {
      let bbox = marker.to_path(0.01).bounding_box();
      assert!(bbox.x0 >= -0.5 - 1e-3 && bbox.x1 <= 0.5 + 1e-3, "{marker:?} {bbox:?}");
      assert!(bbox.y0 >= -0.5 - 1e-3 && bbox.y1 <= 0.5 + 1e-3, "{marker:?} {bbox:?}");
    }
  }

  #[test]
  fn format_chars() {
    assert_eq!(Marker::from_char('o'), Some(Marker::Circle));
    assert_eq!(Marker::from_char('^'), Some(Marker::Triangle));
    assert_eq!(Marker::from_char('-'), None);
  }
}
