//! Reading and writing buildings and contours as CSV.
//!
//! Buildings are stored one per line as `x1,x2,h`, under a `x1,x2,h` header
//! line. Contours are stored one point per line as `x,y`, under a `x,y`
//! header line.
//!
//! Reading stops at the first malformed record, but everything parsed up to
//! that point is still handed back: see [`Records`] and [`PartialRead`].

use std::io::{BufRead, Write};
use std::marker::PhantomData;

use arrayvec::ArrayVec;

use crate::{Building, Point};

/// The most fields any record type has.
pub const MAX_FIELDS: usize = 3;

/// Something that is stored as a line of comma-separated integers.
pub trait Record: Sized {
    /// The header line that precedes the records.
    const HEADER: &'static str;
    /// The names of the fields, in order. There are at most [`MAX_FIELDS`] of them.
    const FIELDS: &'static [&'static str];

    /// Builds a record from one integer per field.
    fn from_fields(fields: &[i64]) -> Self;

    /// The integers to write, one per field.
    fn to_fields(&self) -> ArrayVec<i64, MAX_FIELDS>;
}

impl Record for Building {
    const HEADER: &'static str = "x1,x2,h";
    const FIELDS: &'static [&'static str] = &["x1", "x2", "h"];

    fn from_fields(fields: &[i64]) -> Self {
        Building {
            x1: fields[0],
            x2: fields[1],
            height: fields[2],
        }
    }

    fn to_fields(&self) -> ArrayVec<i64, MAX_FIELDS> {
        [self.x1, self.x2, self.height].into()
    }
}

impl Record for Point {
    const HEADER: &'static str = "x,y";
    const FIELDS: &'static [&'static str] = &["x", "y"];

    fn from_fields(fields: &[i64]) -> Self {
        Point::new(fields[0], fields[1])
    }

    fn to_fields(&self) -> ArrayVec<i64, MAX_FIELDS> {
        let mut fields = ArrayVec::new();
        fields.push(self.x);
        fields.push(self.y);
        fields
    }
}

/// What was wrong with a malformed line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The first line wasn't the expected header.
    HeaderMismatch {
        /// The header we wanted.
        expected: &'static str,
    },
    /// The line had too few fields.
    ShortRecord {
        /// How many fields a record has.
        expected: usize,
        /// How many fields we found.
        found: usize,
    },
    /// A field wasn't an integer.
    InvalidInteger {
        /// The name of the field.
        field: &'static str,
        /// The text of the field.
        value: String,
    },
}

/// A malformed line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// The line number, starting from 1 for the header.
    pub line: usize,
    /// The text of the line.
    pub record: String,
    /// What was wrong with it.
    pub kind: ParseErrorKind,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ParseError { line, record, kind } = self;
        match kind {
            ParseErrorKind::HeaderMismatch { expected } => {
                write!(f, "line {line}: expected header {expected:?}, got {record:?}")
            }
            ParseErrorKind::ShortRecord { expected, found } => write!(
                f,
                "line {line}: short line {record:?} ({found} of {expected} fields)"
            ),
            ParseErrorKind::InvalidInteger { field, value } => {
                write!(f, "line {line}: invalid {field}={value:?} in {record:?}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// An error encountered while reading records.
#[derive(Debug)]
pub enum ReadError {
    /// The underlying reader failed.
    Io(std::io::Error),
    /// A line was malformed.
    Parse(ParseError),
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

impl From<ParseError> for ReadError {
    fn from(e: ParseError) -> Self {
        ReadError::Parse(e)
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "read failed: {e}"),
            ReadError::Parse(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            ReadError::Parse(e) => Some(e),
        }
    }
}

/// The records that were read successfully before reading failed.
#[derive(Debug)]
pub struct PartialRead<T> {
    /// Every record before the failure, in order.
    pub parsed: Vec<T>,
    /// The failure.
    pub error: ReadError,
}

impl<T> std::fmt::Display for PartialRead<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (after {} good records)", self.error, self.parsed.len())
    }
}

impl<T: std::fmt::Debug> std::error::Error for PartialRead<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// An iterator over the records in a reader.
///
/// The header is checked if there is one; an empty reader has no records.
/// After the first error, the iterator is exhausted.
pub struct Records<R, T> {
    lines: std::io::Lines<R>,
    line: usize,
    failed: bool,
    _record: PhantomData<fn() -> T>,
}

/// Iterates over the records in `reader`.
pub fn records<R: BufRead, T: Record>(reader: R) -> Records<R, T> {
    Records {
        lines: reader.lines(),
        line: 0,
        failed: false,
        _record: PhantomData,
    }
}

impl<R: BufRead, T: Record> Records<R, T> {
    fn parse_line(&self, text: String) -> Result<Option<T>, ParseError> {
        let error = |kind| ParseError {
            line: self.line,
            record: text.clone(),
            kind,
        };

        if self.line == 1 {
            return if text == T::HEADER {
                Ok(None)
            } else {
                Err(error(ParseErrorKind::HeaderMismatch {
                    expected: T::HEADER,
                }))
            };
        }

        let expected = T::FIELDS.len();
        debug_assert!(expected <= MAX_FIELDS);
        // Any extra commas end up in the last field, which then fails to parse.
        let parts: ArrayVec<&str, MAX_FIELDS> = text.splitn(expected, ',').collect();
        if parts.len() < expected {
            return Err(error(ParseErrorKind::ShortRecord {
                expected,
                found: parts.len(),
            }));
        }

        let mut fields = ArrayVec::<i64, MAX_FIELDS>::new();
        for (&field, part) in T::FIELDS.iter().zip(&parts) {
            let value = part.parse().map_err(|_| {
                error(ParseErrorKind::InvalidInteger {
                    field,
                    value: (*part).to_owned(),
                })
            })?;
            fields.push(value);
        }
        Ok(Some(T::from_fields(&fields)))
    }
}

impl<R: BufRead, T: Record> Iterator for Records<R, T> {
    type Item = Result<T, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            };
            self.line += 1;
            match self.parse_line(text) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}

/// Reads all the records in `reader`.
pub fn read_all<R: BufRead, T: Record>(reader: R) -> Result<Vec<T>, PartialRead<T>> {
    let mut parsed = Vec::new();
    for record in records(reader) {
        match record {
            Ok(record) => parsed.push(record),
            Err(error) => return Err(PartialRead { parsed, error }),
        }
    }
    Ok(parsed)
}

/// Reads buildings in `x1,x2,h` format.
pub fn read_buildings<R: BufRead>(reader: R) -> Result<Vec<Building>, PartialRead<Building>> {
    read_all(reader)
}

/// Reads contour points in `x,y` format.
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Point>, PartialRead<Point>> {
    read_all(reader)
}

/// Writes a header line followed by one line per record.
pub fn write_all<W: Write, T: Record>(mut writer: W, records: &[T]) -> std::io::Result<()> {
    writeln!(writer, "{}", T::HEADER)?;
    for record in records {
        let mut sep = "";
        for value in record.to_fields() {
            write!(writer, "{sep}{value}")?;
            sep = ",";
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes buildings in `x1,x2,h` format.
pub fn write_buildings<W: Write>(writer: W, buildings: &[Building]) -> std::io::Result<()> {
    write_all(writer, buildings)
}

/// Writes contour points in `x,y` format.
pub fn write_points<W: Write>(writer: W, points: &[Point]) -> std::io::Result<()> {
    write_all(writer, points)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse_error<T: std::fmt::Debug>(result: Result<Vec<T>, PartialRead<T>>) -> (Vec<T>, ParseError) {
        match result {
            Err(PartialRead {
                parsed,
                error: ReadError::Parse(e),
            }) => (parsed, e),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn reads_buildings() {
        let input = "x1,x2,h\n2,6,5\n8,12,5\r\n4,10,3\n";
        let buildings = read_buildings(input.as_bytes()).unwrap();
        assert_eq!(
            buildings,
            vec![
                Building::from((2, 6, 5)),
                Building::from((8, 12, 5)),
                Building::from((4, 10, 3)),
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(read_buildings("".as_bytes()).unwrap().is_empty());
        assert!(read_points("x,y\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn header_mismatch() {
        let (parsed, e) = parse_error(read_buildings("x,y\n1,2\n".as_bytes()));
        assert!(parsed.is_empty());
        assert_eq!(e.line, 1);
        assert_eq!(e.record, "x,y");
        assert_eq!(e.kind, ParseErrorKind::HeaderMismatch { expected: "x1,x2,h" });
    }

    #[test]
    fn short_record_keeps_prefix() {
        let (parsed, e) = parse_error(read_buildings("x1,x2,h\n1,2,3\n4,5\n6,7,8\n".as_bytes()));
        assert_eq!(parsed, vec![Building::from((1, 2, 3))]);
        assert_eq!(e.line, 3);
        assert_eq!(e.record, "4,5");
        assert_eq!(e.kind, ParseErrorKind::ShortRecord { expected: 3, found: 2 });
        assert_eq!(e.to_string(), r#"line 3: short line "4,5" (2 of 3 fields)"#);
    }

    #[test]
    fn invalid_integer_names_field() {
        let (parsed, e) = parse_error(read_points("x,y\n1,2\n3,four\n".as_bytes()));
        assert_eq!(parsed, vec![Point::new(1, 2)]);
        assert_matches!(
            e.kind,
            ParseErrorKind::InvalidInteger { field: "y", ref value } if value == "four"
        );
        assert_eq!(e.to_string(), r#"line 3: invalid y="four" in "3,four""#);
    }

    #[test]
    fn extra_fields_spill_into_last() {
        let (_, e) = parse_error(read_buildings("x1,x2,h\n1,2,3,4\n".as_bytes()));
        assert_eq!(
            e.kind,
            ParseErrorKind::InvalidInteger {
                field: "h",
                value: "3,4".to_owned()
            }
        );
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut recs = records::<_, Point>("x,y\nnope\n1,2\n".as_bytes());
        assert_matches!(recs.next(), Some(Err(ReadError::Parse(_))));
        assert!(recs.next().is_none());
    }

    #[test]
    fn writes_csv() {
        let mut out = Vec::new();
        write_points(&mut out, &[Point::new(2, 0), Point::new(2, 3)]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x,y\n2,0\n2,3\n");

        let mut out = Vec::new();
        write_buildings(&mut out, &[Building::from((2, 4, 3))]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x1,x2,h\n2,4,3\n");
    }

    #[test]
    fn partial_read_message() {
        let err = read_buildings("x1,x2,h\n1,2,3\n1,x,3\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"line 3: invalid x2="x" in "1,x,3" (after 1 good records)"#
        );
    }
}
