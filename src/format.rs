//! matplotlib-style format strings: `"r-"`, `"go"`, `"b--"`, `"k^:"`.

use std::str::FromStr;

use peniko::Color;

use crate::{error::Error, marker::Marker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
  Solid,
  Dashed,
  DashDot,
  Dotted,
}

/// A parsed format string. A `None` colour means "next colour in the cycle".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Format {
  pub color:  Option<Color>,
  pub line:   Option<LineStyle>,
  pub marker: Option<Marker>,
}

impl LineStyle {
  /// Dash pattern in multiples of the line width.
  pub(crate) fn dashes(self) -> Option<&'static [f64]> {
    match self {
      LineStyle::Solid => None,
      LineStyle::Dashed => Some(&[3.7, 1.6]),
      LineStyle::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
      LineStyle::Dotted => Some(&[1.0, 1.65]),
    }
  }
}

pub fn color_from_char(c: char) -> Option<Color> {
  Some(match c {
    'b' => Color::from_rgb8(0, 0, 255),
    'g' => Color::from_rgb8(0, 128, 0),
    'r' => Color::from_rgb8(255, 0, 0),
    'c' => Color::from_rgb8(0, 191, 191),
    'm' => Color::from_rgb8(191, 0, 191),
    'y' => Color::from_rgb8(191, 191, 0),
    'k' => Color::BLACK,
    'w' => Color::WHITE,
    _ => return None,
  })
}

impl FromStr for Format {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut color = None;
    let mut line = None;
    let mut marker = None;

    fn set<T>(slot: &mut Option<T>, value: T, what: &str, s: &str) -> Result<(), Error> {
      if slot.is_some() {
        return Err(Error::Format(format!("{s:?} has more than one {what}")));
      }
      *slot = Some(value);
      Ok(())
    }

    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
      if c == '-' {
        let style = match chars.peek() {
          Some('-') => {
            chars.next();
            LineStyle::Dashed
          }
          Some('.') => {
            chars.next();
            LineStyle::DashDot
          }
          _ => LineStyle::Solid,
        };
        set(&mut line, style, "line style", s)?;
      } else if c == ':' {
        set(&mut line, LineStyle::Dotted, "line style", s)?;
      } else if let Some(m) = Marker::from_char(c) {
        set(&mut marker, m, "marker", s)?;
      } else if let Some(col) = color_from_char(c) {
        set(&mut color, col, "color", s)?;
      } else {
        return Err(Error::Format(format!("{s:?} has an unknown character {c:?}")));
      }
    }

    // A lone marker means no connecting line.
    if line.is_none() && marker.is_none() {
      line = Some(LineStyle::Solid);
    }

    Ok(Format { color, line, marker })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(s: &str) -> Format { s.parse().unwrap() }

  #[test]
  fn color_and_line() {
    let f = parse("r-");
    assert_eq!(f.color, Some(Color::from_rgb8(255, 0, 0)));
    assert_eq!(f.line, Some(LineStyle::Solid));
    assert_eq!(f.marker, None);
  }

  #[test]
  fn marker_only_has_no_line() {
    let f = parse("go");
    assert_eq!(f.color, Some(Color::from_rgb8(0, 128, 0)));
    assert_eq!(f.line, None);
    assert_eq!(f.marker, Some(Marker::Circle));
  }

  #[test]
  fn order_does_not_matter() {
    assert_eq!(parse("o--b"), parse("b--o"));
    assert_eq!(parse("b--o").line, Some(LineStyle::Dashed));
    assert_eq!(parse("-.k").line, Some(LineStyle::DashDot));
    assert_eq!(parse("k:").line, Some(LineStyle::Dotted));
  }

  #[test]
  fn empty_is_solid_cycled_line() {
    assert_eq!(parse(""), Format { color: None, line: Some(LineStyle::Solid), marker: None });
  }

  #[test]
  fn rejects_bad_strings() {
    assert!(matches!("rq".parse::<Format>(), Err(Error::Format(_))));
    assert!(matches!("rg".parse::<Format>(), Err(Error::Format(_))));
    assert!(matches!("-:".parse::<Format>(), Err(Error::Format(_))));
    assert!(matches!("oo".parse::<Format>(), Err(Error::Format(_))));
  }
}
