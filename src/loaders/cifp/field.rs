use std::str::FromStr;

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate},
};

pub const RECORD_LENGTH: usize = 132;

/// A single validated 132 column CIFP line with column accessors.
///
/// Every accessor reports failures as [`Error::Format`] pointing at the first
/// column of the offending field.
#[derive(Debug, Clone, Copy)]
pub struct RecordLine<'a> {
    line: &'a str,
}

impl<'a> RecordLine<'a> {
    pub fn new(line: &'a str) -> CifpResult<Self> {
        if !line.is_ascii() {
            return Err(Error::format(0));
        }
        if line.len() < RECORD_LENGTH {
            return Err(Error::format(line.len()));
        }
        Ok(Self { line })
    }

    pub fn as_str(&self) -> &'a str {
        self.line
    }

    pub fn char_at(&self, column: usize) -> char {
        self.line.as_bytes()[column] as char
    }

    pub fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.line[from..to]
    }

    /// Trimmed text of a field.
    pub fn text(&self, from: usize, to: usize) -> String {
        self.slice(from, to).trim().to_owned()
    }

    pub fn optional_text(&self, from: usize, to: usize) -> Option<String> {
        Some(self.text(from, to)).filter(|text| !text.is_empty())
    }

    pub fn is_blank(&self, from: usize, to: usize) -> bool {
        self.slice(from, to).bytes().all(|b| b == b' ')
    }

    pub fn check(&self, from: usize, to: usize, expected: &[&str]) -> CifpResult<()> {
        let field = self.slice(from, to);
        if expected.iter().any(|candidate| *candidate == field) {
            Ok(())
        } else {
            Err(Error::format(from))
        }
    }

    pub fn check_char(&self, column: usize, expected: &[char]) -> CifpResult<()> {
        if expected.contains(&self.char_at(column)) {
            Ok(())
        } else {
            Err(Error::format(column))
        }
    }

    pub fn check_empty(&self, from: usize, to: usize) -> CifpResult<()> {
        match self.slice(from, to).bytes().position(|b| b != b' ') {
            None => Ok(()),
            Some(offset) => Err(Error::format(from + offset)),
        }
    }

    pub fn number<T: FromStr>(&self, from: usize, to: usize) -> CifpResult<T> {
        self.slice(from, to)
            .trim()
            .parse()
            .map_err(|_| Error::format(from))
    }

    pub fn optional_number<T: FromStr>(&self, from: usize, to: usize) -> CifpResult<Option<T>> {
        if self.is_blank(from, to) {
            Ok(None)
        } else {
            self.number(from, to).map(Some)
        }
    }

    /// Numeric field with an implied decimal point, e.g. tenths of a degree.
    pub fn scaled(&self, from: usize, to: usize, divisor: f64) -> CifpResult<f64> {
        Ok(self.number::<f64>(from, to)? / divisor)
    }

    pub fn optional_scaled(&self, from: usize, to: usize, divisor: f64) -> CifpResult<Option<f64>> {
        Ok(self.optional_number::<f64>(from, to)?.map(|value| value / divisor))
    }

    pub fn coordinate(&self, from: usize, to: usize) -> CifpResult<Coordinate> {
        self.slice(from, to)
            .parse()
            .map_err(|_| Error::format(from))
    }

    pub fn optional_coordinate(&self, from: usize, to: usize) -> CifpResult<Option<Coordinate>> {
        if self.is_blank(from, to) {
            Ok(None)
        } else {
            self.coordinate(from, to).map(Some)
        }
    }

    /// Magnetic variation with its hemisphere letter at `hemisphere`, in tenths
    /// of a degree. East is negative.
    pub fn magnetic_variation(&self, hemisphere: usize, from: usize, to: usize) -> CifpResult<Option<f64>> {
        let Some(variation) = self.optional_scaled(from, to, 10.0)? else {
            return Ok(None);
        };
        match self.char_at(hemisphere) {
            'E' => Ok(Some(-variation)),
            'W' | 'T' => Ok(Some(variation)),
            _ => Err(Error::format(hemisphere)),
        }
    }

    /// Procedure and airway altitudes: blank, `UNKNN`, `FL###` or MSL feet.
    pub fn altitude(&self, from: usize, to: usize) -> CifpResult<Option<Altitude>> {
        let field = self.slice(from, to).trim();
        if field.is_empty() || field == "UNKNN" {
            return Ok(None);
        }
        if let Some(level) = field.strip_prefix("FL") {
            return level
                .parse()
                .map(|level| Some(Altitude::flight_level(level)))
                .map_err(|_| Error::format(from));
        }
        field
            .parse()
            .map(|feet| Some(Altitude::msl(feet)))
            .map_err(|_| Error::format(from))
    }

    pub fn file_record_number(&self) -> CifpResult<u32> {
        self.number(123, 128)
    }

    pub fn cycle(&self) -> CifpResult<u16> {
        self.number(128, 132)
    }
}
