use serde::Serialize;

use crate::chunk::Chunk;

/// A named, ordered list of rooms. Order matches the game's selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelTemplate {
    pub name: String,
    /// Raw text after the `//` marker on the header line.
    pub comment: String,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template {template}: no room at index {index} (it has {len})")]
    NoSuchChunk {
        template: String,
        index: usize,
        len: usize,
    },
    #[error("invalid template name {0:?}")]
    InvalidName(String),
}

impl LevelTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            chunks: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    fn no_such_chunk(&self, index: usize) -> TemplateError {
        TemplateError::NoSuchChunk {
            template: self.name.clone(),
            index,
            len: self.chunks.len(),
        }
    }

    /// Insert `chunk` at `index`; an index past the end appends.
    pub fn add_chunk(&mut self, index: usize, chunk: Chunk) -> usize {
        let index = index.min(self.chunks.len());
        self.chunks.insert(index, chunk);
        index
    }

    pub fn push_chunk(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }

    pub fn remove_chunk(&mut self, index: usize) -> Result<Chunk, TemplateError> {
        if index >= self.chunks.len() {
            return Err(self.no_such_chunk(index));
        }
        Ok(self.chunks.remove(index))
    }

    /// Names must be a single non-empty token.
    pub fn rename(&mut self, new_name: &str) -> Result<(), TemplateError> {
        if new_name.is_empty() || new_name.contains(char::is_whitespace) {
            return Err(TemplateError::InvalidName(new_name.to_string()));
        }
        self.name = new_name.to_string();
        Ok(())
    }

    /// Append a copy of the room at `index` to the end of the template.
    /// Returns the copy's index.
    pub fn duplicate_chunk(&mut self, index: usize) -> Result<usize, TemplateError> {
        let copy = self
            .chunks
            .get(index)
            .ok_or_else(|| self.no_such_chunk(index))?
            .duplicate();
        self.chunks.push(copy);
        Ok(self.chunks.len() - 1)
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn chunk_mut(&mut self, index: usize) -> Option<&mut Chunk> {
        self.chunks.get_mut(index)
    }
}
