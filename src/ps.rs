//! Parser of PostScript path operators
//!
//! Accepts the subset of PostScript emitted by [`Path`]'s `Display`: numbers are
//! pushed onto an operand stack and consumed by path construction operators,
//! `%` starts a comment which runs to the end of the line.
use crate::{Error, Path, PathElement, Point, Scalar};
use std::str::FromStr;

pub(crate) struct PathParser<'a> {
    // text containing unparsed path
    text: &'a [u8],
    // current offset in the text
    offset: usize,
    // operands waiting for an operator
    operands: Vec<Scalar>,
}

impl<'a> PathParser<'a> {
    pub(crate) fn new(text: &'a [u8]) -> PathParser<'a> {
        Self {
            text,
            offset: 0,
            operands: Vec::new(),
        }
    }

    /// Error construction helper
    fn error<S: Into<String>>(&self, reason: S) -> Error {
        Error::Parse {
            offset: self.offset,
            reason: reason.into(),
        }
    }

    /// Byte at the current position
    fn current(&self) -> Option<u8> {
        self.text.get(self.offset).copied()
    }

    fn advance(&mut self, count: usize) {
        self.offset += count;
    }

    fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Consume white space and comments
    fn parse_separators(&mut self) {
        while let Some(byte) = self.current() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' => self.advance(1),
                b'%' => {
                    while !matches!(self.current(), None | Some(b'\n')) {
                        self.advance(1);
                    }
                }
                _ => break,
            }
        }
    }

    /// Consume digits, returns true if at least one was found
    fn parse_digits(&mut self) -> bool {
        let mut found = false;
        while let Some(b'0'..=b'9') = self.current() {
            self.advance(1);
            found = true;
        }
        found
    }

    /// Consume `+|-` sign
    fn parse_sign(&mut self) {
        if let Some(b'-' | b'+') = self.current() {
            self.advance(1);
        }
    }

    /// Parse single scalar
    fn parse_scalar(&mut self) -> Result<Scalar, Error> {
        let start = self.offset;
        self.parse_sign();
        let whole = self.parse_digits();
        let fraction = match self.current() {
            Some(b'.') => {
                self.advance(1);
                self.parse_digits()
            }
            _ => false,
        };
        if !whole && !fraction {
            return Err(self.error("failed to parse scalar"));
        }
        if let Some(b'e' | b'E') = self.current() {
            self.advance(1);
            self.parse_sign();
            if !self.parse_digits() {
                return Err(self.error("failed to parse scalar exponent"));
            }
        }
        std::str::from_utf8(&self.text[start..self.offset])
            .ok()
            .and_then(|text| Scalar::from_str(text).ok())
            .ok_or_else(|| self.error("failed to parse scalar"))
    }

    /// Parse operator name
    fn parse_name(&mut self) -> Result<&'a str, Error> {
        let start = self.offset;
        while let Some(b'a'..=b'z' | b'A'..=b'Z') = self.current() {
            self.advance(1);
        }
        if start == self.offset {
            return Err(self.error("unexpected character"));
        }
        // name only contains ascii letters
        std::str::from_utf8(&self.text[start..self.offset])
            .map_err(|_| self.error("invalid operator name"))
    }

    /// Take exactly `N` operands from the stack
    fn take<const N: usize>(&mut self, name: &str, start: usize) -> Result<[Scalar; N], Error> {
        if self.operands.len() != N {
            return Err(Error::Parse {
                offset: start,
                reason: format!(
                    "`{}` expects {} operands, found {}",
                    name,
                    N,
                    self.operands.len()
                ),
            });
        }
        let mut values = [0.0; N];
        values.copy_from_slice(&self.operands);
        self.operands.clear();
        Ok(values)
    }

    /// Convert operator with its operands into a path element
    fn parse_element(&mut self, name: &str, start: usize) -> Result<PathElement, Error> {
        let element = match name {
            "moveto" => {
                let [x, y] = self.take(name, start)?;
                PathElement::MoveTo(Point::new(x, y))
            }
            "lineto" => {
                let [x, y] = self.take(name, start)?;
                PathElement::LineTo(Point::new(x, y))
            }
            "rmoveto" => {
                let [x, y] = self.take(name, start)?;
                PathElement::RMoveTo(Point::new(x, y))
            }
            "rlineto" => {
                let [x, y] = self.take(name, start)?;
                PathElement::RLineTo(Point::new(x, y))
            }
            "curveto" => {
                let [x1, y1, x2, y2, x3, y3] = self.take(name, start)?;
                PathElement::CurveTo(Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3))
            }
            "rcurveto" => {
                let [x1, y1, x2, y2, x3, y3] = self.take(name, start)?;
                PathElement::RCurveTo(Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3))
            }
            "arc" | "arcn" => {
                let [x, y, radius, angle1, angle2] = self.take(name, start)?;
                PathElement::Arc {
                    center: Point::new(x, y),
                    radius,
                    angle1,
                    angle2,
                    ccw: name == "arc",
                }
            }
            "arct" => {
                let [x1, y1, x2, y2, radius] = self.take(name, start)?;
                PathElement::TangentArc {
                    p1: Point::new(x1, y1),
                    p2: Point::new(x2, y2),
                    radius,
                }
            }
            "closepath" => {
                self.take::<0>(name, start)?;
                PathElement::Close
            }
            _ => {
                return Err(Error::Parse {
                    offset: start,
                    reason: format!("unknown operator `{}`", name),
                });
            }
        };
        Ok(element)
    }

    /// Parse text and append elements to the path
    pub(crate) fn parse(mut self, path: &mut Path) -> Result<(), Error> {
        loop {
            self.parse_separators();
            let Some(byte) = self.current() else {
                break;
            };
            match byte {
                b'0'..=b'9' | b'-' | b'+' | b'.' => {
                    let value = self.parse_scalar()?;
                    self.operands.push(value);
                }
                _ => {
                    let start = self.offset;
                    let name = self.parse_name()?;
                    let element = self.parse_element(name, start)?;
                    path.push(element);
                }
            }
        }
        if !self.operands.is_empty() {
            return Err(self.error(format!(
                "{} operands left without an operator",
                self.operands.len()
            )));
        }
        debug_assert!(self.is_eof());
        Ok(())
    }
}
