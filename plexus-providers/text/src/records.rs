//! Line-oriented record reading shared by every loader.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    str::{FromStr, SplitWhitespace},
};

use crate::TextProviderError;

/// Opens `path` for buffered reading, reporting a missing file as
/// [`TextProviderError::NotFound`].
pub(crate) fn open(path: &Path) -> Result<BufReader<File>, TextProviderError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => TextProviderError::NotFound {
                path: path.to_path_buf(),
            },
            _ => TextProviderError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
}

/// Non-blank, non-comment lines of a source, numbered from one.
pub(crate) struct Records<R> {
    reader: R,
    origin: PathBuf,
    comments: &'static [char],
    line: usize,
    buffer: String,
}

impl<R: BufRead> Records<R> {
    pub(crate) fn new(origin: impl Into<PathBuf>, reader: R, comments: &'static [char]) -> Self {
        Self {
            reader,
            origin: origin.into(),
            comments,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Advances to the next data line; `None` at end of input.
    pub(crate) fn next_record(&mut self) -> Result<Option<Record<'_>>, TextProviderError> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|source| TextProviderError::Io {
                    path: self.origin.clone(),
                    source,
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buffer.trim();
            if text.is_empty() || text.starts_with(self.comments) {
                continue;
            }
            return Ok(Some(Record {
                origin: &self.origin,
                line: self.line,
                tokens: self.buffer.split_whitespace(),
            }));
        }
    }

    /// Consumes the remaining data lines and returns how many there were.
    pub(crate) fn count_remaining(&mut self) -> Result<usize, TextProviderError> {
        let mut remaining = 0;
        while self.next_record()?.is_some() {
            remaining += 1;
        }
        Ok(remaining)
    }
}

/// One data line split on whitespace.
pub(crate) struct Record<'a> {
    origin: &'a Path,
    line: usize,
    tokens: SplitWhitespace<'a>,
}

impl Record<'_> {
    /// Parses the next whitespace-separated field.
    pub(crate) fn field<T: FromStr>(&mut self, field: &'static str) -> Result<T, TextProviderError> {
        self.optional_field(field)?
            .ok_or_else(|| TextProviderError::MissingField {
                path: self.origin.to_path_buf(),
                line: self.line,
                field,
            })
    }

    /// Parses the next field when one is present.
    pub(crate) fn optional_field<T: FromStr>(
        &mut self,
        field: &'static str,
    ) -> Result<Option<T>, TextProviderError> {
        let Some(token) = self.tokens.next() else {
            return Ok(None);
        };
        token
            .parse()
            .map(Some)
            .map_err(|_| TextProviderError::Parse {
                path: self.origin.to_path_buf(),
                line: self.line,
                field,
                value: token.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn only_configured_comment_markers_are_skipped() {
        let mut records = Records::new("demo", Cursor::new("% header\n\n  \n# other\n1 2\n"), &['%']);
        let mut record = records
            .next_record()
            .expect("read succeeds")
            .expect("one data line");
        assert_eq!(record.line, 4);
        assert!(matches!(
            record.field::<u64>("node"),
            Err(TextProviderError::Parse { line: 4, .. })
        ));
    }

    #[rstest]
    fn optional_field_is_absent_at_end_of_line() {
        let mut records = Records::new("demo", Cursor::new("7 8\n"), &['%']);
        let mut record = records
            .next_record()
            .expect("read succeeds")
            .expect("one data line");
        assert_eq!(record.field::<u64>("from").ok(), Some(7));
        assert_eq!(record.field::<u64>("to").ok(), Some(8));
        assert!(matches!(record.optional_field::<f64>("weight"), Ok(None)));
    }

    #[rstest]
    fn missing_field_names_the_line() {
        let mut records = Records::new("demo", Cursor::new("1\n"), &['%']);
        let mut record = records
            .next_record()
            .expect("read succeeds")
            .expect("one data line");
        let _from = record.field::<u64>("from");
        assert!(matches!(
            record.field::<u64>("to"),
            Err(TextProviderError::MissingField { line: 1, field: "to", .. })
        ));
    }

    #[rstest]
    fn remaining_lines_are_counted() {
        let mut records = Records::new("demo", Cursor::new("1\n% note\n2\n3\n"), &['%']);
        assert_eq!(records.count_remaining().ok(), Some(3));
    }

    #[rstest]
    fn open_reports_missing_files() {
        let err = open(Path::new("/definitely/not/here.txt")).expect_err("file is missing");
        assert!(matches!(err, TextProviderError::NotFound { .. }));
    }
}
