//! Line cursor over the current code chunk.

use crate::script::CodeChunk;

/// Which chunk is current and how many of its lines are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Typist {
    chunk: Option<usize>,
    cursor: usize,
}

impl Typist {
    /// A typist positioned at the start of chunk `index`.
    pub(crate) fn at(index: usize) -> Self {
        Self {
            chunk: Some(index),
            cursor: 0,
        }
    }

    pub(crate) fn chunk(self) -> Option<usize> {
        self.chunk
    }

    pub(crate) fn cursor(self) -> usize {
        self.cursor
    }

    /// Follow a chunk selection.
    ///
    /// Switches (and rewinds) only when the selected chunk has a different
    /// file name from the current one.
    pub(crate) fn follow(self, chunks: &[CodeChunk], selected: Option<usize>) -> Self {
        let Some(next) = selected else {
            return self;
        };
        let current_name = self
            .chunk
            .and_then(|i| chunks.get(i))
            .map(|c| c.file_name.as_str());
        let next_name = chunks.get(next).map(|c| c.file_name.as_str());
        if current_name == next_name {
            self
        } else {
            Self::at(next)
        }
    }

    /// Reveal one more line, if any are left.
    pub(crate) fn advance(self, chunks: &[CodeChunk]) -> Self {
        if self.has_pending(chunks) {
            Self {
                cursor: self.cursor.saturating_add(1),
                ..self
            }
        } else {
            self
        }
    }

    pub(crate) fn has_pending(self, chunks: &[CodeChunk]) -> bool {
        self.chunk
            .and_then(|i| chunks.get(i))
            .is_some_and(|c| self.cursor < c.lines.len())
    }

    pub(crate) fn visible<'a>(self, chunks: &'a [CodeChunk]) -> &'a [String] {
        self.chunk
            .and_then(|i| chunks.get(i))
            .and_then(|c| c.lines.get(..self.cursor))
            .unwrap_or_default()
    }
}
