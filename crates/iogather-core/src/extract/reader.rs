// Dweve IOGather - Parallel I/O benchmark log aggregation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Line reader for log extraction.
//!
//! Provides buffered line-by-line reading with line number tracking and the
//! size limits from [`Limits`].

use crate::error::{ExtractError, ExtractResult};
use crate::limits::Limits;
use std::io::{BufRead, BufReader, Read};

/// Buffered line reader with line number tracking.
///
/// Strips `\n` and `\r\n` terminators. Any I/O failure, including invalid
/// UTF-8, is reported as [`ExtractError::Read`] carrying the line number.
///
/// # Examples
///
/// ```rust
/// use iogather_core::LineReader;
/// use std::io::Cursor;
///
/// let mut reader = LineReader::new(Cursor::new("a\r\nb\n"));
/// assert_eq!(reader.next_line().unwrap(), Some((1, "a".to_string())));
/// assert_eq!(reader.next_line().unwrap(), Some((2, "b".to_string())));
/// assert_eq!(reader.next_line().unwrap(), None);
/// ```
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    bytes_read: usize,
    buffer: Vec<u8>,
    limits: Limits,
}

impl<R: Read> LineReader<R> {
    /// Create a new line reader with default limits.
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, Limits::default())
    }

    /// Create a reader enforcing the given limits.
    pub fn with_limits(reader: R, limits: Limits) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            bytes_read: 0,
            buffer: Vec::new(),
            limits,
        }
    }

    /// Get the current line number.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line.
    ///
    /// At most `max_line_length` bytes plus terminator are buffered per
    /// line, and never more than one byte past `max_file_size` in total.
    pub fn next_line(&mut self) -> ExtractResult<Option<(usize, String)>> {
        self.buffer.clear();

        let remaining = self.limits.max_file_size.saturating_sub(self.bytes_read);
        let cap = self
            .limits
            .max_line_length
            .saturating_add(2)
            .min(remaining.saturating_add(1));

        let n = match (&mut self.reader)
            .take(cap as u64)
            .read_until(b'\n', &mut self.buffer)
        {
            Ok(0) => return Ok(None), // EOF
            Ok(n) => n,
            Err(e) => {
                return Err(ExtractError::Read {
                    line: self.line_number + 1,
                    message: e.to_string(),
                })
            }
        };

        self.line_number += 1;
        self.bytes_read = self.bytes_read.saturating_add(n);

        if self.bytes_read > self.limits.max_file_size {
            return Err(ExtractError::TooLarge {
                line: self.line_number,
                limit: self.limits.max_file_size,
            });
        }

        if self.buffer.ends_with(b"\n") {
            self.buffer.pop();
            if self.buffer.ends_with(b"\r") {
                self.buffer.pop();
            }
        }

        if self.buffer.len() > self.limits.max_line_length {
            return Err(ExtractError::LineTooLong {
                line: self.line_number,
                length: self.buffer.len(),
                limit: self.limits.max_line_length,
            });
        }

        match std::str::from_utf8(&self.buffer) {
            Ok(line) => Ok(Some((self.line_number, line.to_string()))),
            Err(e) => Err(ExtractError::Read {
                line: self.line_number,
                message: e.to_string(),
            }),
        }
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = ExtractResult<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_reads_lines_with_numbers() {
        let reader = LineReader::new(Cursor::new("one\ntwo\nthree"));
        let lines: Vec<_> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(
            lines,
            vec![
                (1, "one".to_string()),
                (2, "two".to_string()),
                (3, "three".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let mut reader = LineReader::new(Cursor::new(""));
        assert_eq!(reader.next_line().unwrap(), None);
        assert_eq!(reader.line_number(), 0);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let reader = LineReader::new(Cursor::new("\n\nx\n"));
        let lines: Vec<_> = reader.map(|r| r.unwrap().1).collect();
        assert_eq!(lines, vec!["", "", "x"]);
    }

    #[test]
    fn test_io_failure() {
        let mut reader = LineReader::new(FailingReader);
        let err = reader.next_line().unwrap_err();
        assert!(matches!(err, ExtractError::Read { line: 1, .. }));
        assert!(err.to_string().contains("device gone"));
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let mut reader = LineReader::new(bytes);
        assert!(reader.next_line().unwrap().is_some());
        let err = reader.next_line().unwrap_err();
        assert!(matches!(err, ExtractError::Read { line: 2, .. }));
    }

    #[test]
    fn test_line_too_long() {
        let limits = Limits {
            max_line_length: 4,
            ..Limits::default()
        };
        let mut reader = LineReader::with_limits(Cursor::new("abcd\nabcde\n"), limits);
        assert!(reader.next_line().unwrap().is_some());
        let err = reader.next_line().unwrap_err();
        assert_eq!(
            err,
            ExtractError::LineTooLong {
                line: 2,
                length: 5,
                limit: 4
            }
        );
    }

    /// Yields `len` bytes of `b'x'` with no newline, counting what is pulled.
    struct Unterminated {
        len: usize,
        pulled: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl Read for Unterminated {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.len - self.pulled.get());
            buf[..n].fill(b'x');
            self.pulled.set(self.pulled.get() + n);
            Ok(n)
        }
    }

    #[test]
    fn test_line_limit_bounds_buffering() {
        let pulled = std::rc::Rc::new(std::cell::Cell::new(0));
        let source = Unterminated {
            len: 1 << 20,
            pulled: pulled.clone(),
        };
        let limits = Limits {
            max_line_length: 16,
            ..Limits::default()
        };
        let mut reader = LineReader::with_limits(source, limits);
        let err = reader.next_line().unwrap_err();
        assert!(matches!(
            err,
            ExtractError::LineTooLong {
                line: 1,
                length: 18,
                limit: 16
            }
        ));
        assert!(reader.buffer.len() <= 18);
        // only the BufReader's own block was pulled, not the whole stream
        assert!(pulled.get() < 1 << 20);
    }

    #[test]
    fn test_line_at_limit_with_crlf() {
        let limits = Limits {
            max_line_length: 3,
            ..Limits::default()
        };
        let mut reader = LineReader::with_limits(Cursor::new("abc\r\nde\n"), limits);
        assert_eq!(reader.next_line().unwrap(), Some((1, "abc".to_string())));
        assert_eq!(reader.next_line().unwrap(), Some((2, "de".to_string())));
    }

    #[test]
    fn test_file_too_large() {
        let limits = Limits {
            max_file_size: 6,
            ..Limits::default()
        };
        let mut reader = LineReader::with_limits(Cursor::new("abc\ndef\n"), limits);
        assert!(reader.next_line().unwrap().is_some());
        assert!(matches!(
            reader.next_line(),
            Err(ExtractError::TooLarge { line: 2, limit: 6 })
        ));
    }
}
