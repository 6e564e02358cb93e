use std::path::Path;

use crate::span::Span;

pub trait Sources {
    type SourceId: Copy + Eq;
    type Source: Source;

    fn get_source(&self, id: Self::SourceId) -> Option<&Cached<Self::Source>>;
}

pub trait Source {
    fn name_str(&self) -> &str;
    fn path(&self) -> Option<&Path>;

    fn source_str(&self) -> &str;
}

impl Source for (String, String) {
    fn name_str(&self) -> &str {
        &self.0
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn source_str(&self) -> &str {
        &self.1
    }
}

impl<S: Source> Sources for Vec<Cached<S>> {
    type SourceId = usize;
    type Source = S;

    fn get_source(&self, id: Self::SourceId) -> Option<&Cached<Self::Source>> {
        self.get(id)
    }
}

/// A source together with the byte offsets of its line breaks.
#[derive(Debug, Clone)]
pub struct Cached<S: Source> {
    source: S,
    line_breaks: Vec<usize>,
}

impl<S: Source> Cached<S> {
    pub fn new(source: S) -> Self {
        let line_breaks = source
            .source_str()
            .char_indices()
            .filter_map(|(i, ch)| (ch == '\n').then_some(i))
            .collect();

        Self {
            source,
            line_breaks,
        }
    }

    pub fn as_source(&self) -> &S {
        &self.source
    }

    pub fn num_lines(&self) -> usize {
        self.line_breaks.len() + 1
    }

    /// Zero-based line index containing `byte`.
    pub fn byte_to_line_index(&self, byte: usize) -> Option<usize> {
        if byte > self.source.source_str().len() {
            return None;
        }

        Some(self.line_breaks.partition_point(|&lb| lb < byte))
    }

    /// One-based line and column of `byte`, column counted in chars.
    pub fn byte_to_line_col(&self, byte: usize) -> Option<(usize, usize)> {
        let line = self.byte_to_line_index(byte)?;
        let line_start = self.line_span(line)?.start;

        let col = self.source.source_str()[line_start..byte].chars().count();

        Some((line + 1, col + 1))
    }

    /// Byte span of a zero-based line, excluding its line break.
    pub fn line_span(&self, line: usize) -> Option<Span> {
        if line >= self.num_lines() {
            return None;
        }

        let start = match line {
            0 => 0,
            n => self.line_breaks[n - 1] + 1,
        };

        let end = self
            .line_breaks
            .get(line)
            .copied()
            .unwrap_or(self.source.source_str().len());

        Some(Span::new(start, end))
    }

    pub fn line_str(&self, line: usize) -> Option<&str> {
        let span = self.line_span(line)?;
        Some(self.source.source_str()[span.range()].trim_end_matches('\r'))
    }
}

impl<S: Source> std::ops::Deref for Cached<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.source
    }
}
