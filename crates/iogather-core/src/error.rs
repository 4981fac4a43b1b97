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

//! Error types for extraction and derived-field expressions.

use thiserror::Error;

/// An error that stops extraction of one log stream.
///
/// Trial errors reported inside the log are not represented here: they are
/// part of normal extraction and only exclude the affected trial.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The underlying stream failed (I/O error or invalid UTF-8).
    #[error("read error at line {line}: {message}")]
    Read {
        /// Line number being read when the failure happened (1-based).
        line: usize,
        /// The error message.
        message: String,
    },

    /// A single line exceeded [`Limits::max_line_length`](crate::Limits).
    #[error("line {line} is too long (at least {length} bytes). Maximum allowed: {limit} bytes")]
    LineTooLong {
        /// Line number (1-based).
        line: usize,
        /// Bytes read from the line. Reading stops just past the limit, so
        /// this is a lower bound for longer lines.
        length: usize,
        /// Configured limit.
        limit: usize,
    },

    /// The stream exceeded [`Limits::max_file_size`](crate::Limits).
    #[error("stream exceeds {limit} bytes (stopped at line {line})")]
    TooLarge {
        /// Line number at which the limit was crossed.
        line: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// An error in a derived-field expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExprError {
    /// The expression text was empty.
    #[error("empty expression")]
    Empty,

    /// A character or token that cannot appear at this position.
    #[error("unexpected '{token}' at offset {offset}")]
    UnexpectedToken {
        /// The offending token text.
        token: String,
        /// Byte offset into the expression.
        offset: usize,
    },

    /// The expression ended where an operand or `)` was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A complete expression was followed by more input.
    #[error("trailing input at offset {offset}")]
    TrailingInput {
        /// Byte offset of the first unconsumed token.
        offset: usize,
    },
}
