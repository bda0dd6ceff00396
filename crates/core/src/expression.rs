//! Placed tokens, lines, and the expression being assembled.
//!
//! An `Expression` owns an ordered sequence of lines, each an ordered
//! sequence of placed tokens. Every placement allocates a fresh instance
//! id from a monotonic counter; ids are never reused and never change,
//! including across moves between lines.

use std::fmt;

use crate::catalog::{Category, TokenSpec};

/// A catalog entry instantiated onto a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedToken {
    pub spec: TokenSpec,
    pub instance_id: u64,
}

impl PlacedToken {
    pub fn label(&self) -> &str {
        &self.spec.label
    }

    pub fn category(&self) -> Category {
        self.spec.category
    }

    pub fn is_terminal(&self) -> bool {
        self.spec.is_terminal
    }
}

/// An ordered sequence of placed tokens, serialized left-to-right.
pub type Line = Vec<PlacedToken>;

/// Errors raised by expression editing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// The line index does not exist.
    LineOutOfRange(usize),
    /// Removing the last remaining line is disallowed.
    LastLine,
    /// No placed token carries the given instance id.
    TokenNotFound(u64),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::LineOutOfRange(i) => write!(f, "line index {} out of range", i),
            ExpressionError::LastLine => {
                write!(f, "an expression must keep at least one line")
            }
            ExpressionError::TokenNotFound(id) => {
                write!(f, "no placed token with instance id {}", id)
            }
        }
    }
}

impl std::error::Error for ExpressionError {}

/// An ordered collection of lines under construction.
#[derive(Debug, Clone)]
pub struct Expression {
    lines: Vec<Line>,
    next_instance: u64,
}

impl Default for Expression {
    fn default() -> Self {
        Self::new()
    }
}

impl Expression {
    /// A fresh expression with one empty line.
    pub fn new() -> Self {
        Expression {
            lines: vec![Vec::new()],
            next_instance: 0,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Append a new empty line and return its index.
    pub fn push_line(&mut self) -> usize {
        self.lines.push(Vec::new());
        self.lines.len() - 1
    }

    /// Remove a line and its tokens. The last remaining line cannot be
    /// removed.
    pub fn remove_line(&mut self, index: usize) -> Result<Line, ExpressionError> {
        if index >= self.lines.len() {
            return Err(ExpressionError::LineOutOfRange(index));
        }
        if self.lines.len() == 1 {
            return Err(ExpressionError::LastLine);
        }
        Ok(self.lines.remove(index))
    }

    /// Drop all tokens from a line, keeping the line itself.
    pub fn clear_line(&mut self, index: usize) -> Result<(), ExpressionError> {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.clear();
                Ok(())
            }
            None => Err(ExpressionError::LineOutOfRange(index)),
        }
    }

    /// Instantiate a catalog entry at the end of a line. Returns the
    /// fresh instance id.
    pub fn place(&mut self, spec: &TokenSpec, line: usize) -> Result<u64, ExpressionError> {
        let at = self
            .lines
            .get(line)
            .map(|l| l.len())
            .ok_or(ExpressionError::LineOutOfRange(line))?;
        self.place_at(spec, line, at)
    }

    /// Instantiate a catalog entry at a position within a line
    /// (positions past the end clamp to the end).
    pub fn place_at(
        &mut self,
        spec: &TokenSpec,
        line: usize,
        position: usize,
    ) -> Result<u64, ExpressionError> {
        if line >= self.lines.len() {
            return Err(ExpressionError::LineOutOfRange(line));
        }
        let instance_id = self.next_instance;
        self.next_instance += 1;
        let target = &mut self.lines[line];
        let at = position.min(target.len());
        target.insert(
            at,
            PlacedToken {
                spec: spec.clone(),
                instance_id,
            },
        );
        Ok(instance_id)
    }

    /// Locate a placed token: `(line index, position)`.
    pub fn find(&self, instance_id: u64) -> Option<(usize, usize)> {
        self.lines.iter().enumerate().find_map(|(li, line)| {
            line.iter()
                .position(|t| t.instance_id == instance_id)
                .map(|pos| (li, pos))
        })
    }

    /// Remove a placed token, returning it.
    pub fn remove_token(&mut self, instance_id: u64) -> Result<PlacedToken, ExpressionError> {
        let (li, pos) = self
            .find(instance_id)
            .ok_or(ExpressionError::TokenNotFound(instance_id))?;
        Ok(self.lines[li].remove(pos))
    }

    /// Move a placed token to the end of another line.
    ///
    /// Ownership transfers atomically: the target line is checked before
    /// the token leaves its source line, so a failed move changes
    /// nothing. The instance id is unchanged.
    pub fn move_token(&mut self, instance_id: u64, to_line: usize) -> Result<(), ExpressionError> {
        let at = self
            .lines
            .get(to_line)
            .map(|l| l.len())
            .ok_or(ExpressionError::LineOutOfRange(to_line))?;
        self.move_token_to(instance_id, to_line, at)
    }

    /// Move a placed token to a position within another line.
    pub fn move_token_to(
        &mut self,
        instance_id: u64,
        to_line: usize,
        position: usize,
    ) -> Result<(), ExpressionError> {
        if to_line >= self.lines.len() {
            return Err(ExpressionError::LineOutOfRange(to_line));
        }
        let (from_line, from_pos) = self
            .find(instance_id)
            .ok_or(ExpressionError::TokenNotFound(instance_id))?;
        let token = self.lines[from_line].remove(from_pos);
        let target = &mut self.lines[to_line];
        let at = position.min(target.len());
        target.insert(at, token);
        Ok(())
    }

    /// Total number of placed tokens across all lines.
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|l| l.len()).sum()
    }
}
