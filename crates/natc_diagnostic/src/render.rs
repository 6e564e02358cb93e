use std::io;

use termcolor::{ColorSpec, WriteColor};
use unicode_width::UnicodeWidthStr;

use super::sources::{Cached, Source, Sources};
use super::{Config, Diagnostic, Severity, Snippet, SnippetKind};

impl<S: Sources> Diagnostic<S> {
    pub fn write_to_stream(
        &self,
        sources: &S,
        config: &Config,
        stream: &mut impl WriteColor,
    ) -> io::Result<()> {
        DiagnosticWriter {
            diagnostic: self,
            sources,
            stream,
            config,
        }
        .draw_all()
    }
}

struct DiagnosticWriter<'stream, 'a, W: WriteColor, S: Sources> {
    diagnostic: &'a Diagnostic<S>,
    sources: &'a S,

    stream: &'stream mut W,
    config: &'a Config,
}

impl<W: WriteColor, S: Sources> DiagnosticWriter<'_, '_, W, S> {
    fn draw_all(mut self) -> io::Result<()> {
        self.draw_header()?;

        let (diagnostic, sources) = (self.diagnostic, self.sources);

        for snippet in &diagnostic.snippets {
            // snippets pointing at unknown sources are skipped
            if let Some(source) = sources.get_source(snippet.source_id) {
                self.draw_snippet(source, snippet)?;
            }
        }

        Ok(())
    }

    fn draw_header(&mut self) -> io::Result<()> {
        let color = self.severity_color().clone();
        self.stream.set_color(&color)?;

        let kind_str = match self.diagnostic.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(self.stream, "{kind_str}:")?;

        self.stream.reset()?;

        match &self.diagnostic.message {
            Some(message) => writeln!(self.stream, " {message}"),
            None => writeln!(self.stream),
        }
    }

    fn draw_snippet(&mut self, source: &Cached<S::Source>, snippet: &Snippet<S>) -> io::Result<()> {
        let Some((line_num, col_num)) = source.byte_to_line_col(snippet.span.start) else {
            return Ok(());
        };

        let line_index = line_num - 1;
        let line_str = source.line_str(line_index).unwrap_or_default();
        let line_start = source.line_span(line_index).map_or(0, |span| span.start);

        let gutter_width = line_num.to_string().len();

        self.stream.set_color(&self.config.subtle)?;
        writeln!(
            self.stream,
            "{:gutter_width$} In {}:{line_num}:{col_num}",
            "",
            source.name_str()
        )?;
        self.stream.reset()?;

        self.draw_gutter(None, gutter_width)?;
        writeln!(self.stream)?;

        self.draw_gutter(Some(line_num), gutter_width)?;
        writeln!(self.stream, " {line_str}")?;

        // clamp the underline to the first line of the snippet
        let start = snippet.span.start - line_start;
        let end = (snippet.span.end.max(snippet.span.start + 1) - line_start).min(line_str.len());
        let padding = line_str.get(..start).map_or(0, UnicodeWidthStr::width);
        let width = line_str
            .get(start..end)
            .map_or(1, UnicodeWidthStr::width)
            .max(1);

        let (underline, color) = match snippet.kind {
            SnippetKind::Primary => (self.config.primary_underline, self.severity_color().clone()),
            SnippetKind::Secondary => (
                self.config.secondary_underline,
                self.config.secondary_color.clone(),
            ),
        };

        self.draw_gutter(None, gutter_width)?;
        write!(self.stream, " {:padding$}", "")?;
        self.stream.set_color(&color)?;
        write!(self.stream, "{}", underline.repeat(width))?;
        if !snippet.label.is_empty() {
            write!(self.stream, " {}", snippet.label)?;
        }
        self.stream.reset()?;
        writeln!(self.stream)
    }

    fn draw_gutter(&mut self, line_num: Option<usize>, width: usize) -> io::Result<()> {
        self.stream.set_color(&self.config.subtle)?;
        match line_num {
            Some(n) => write!(self.stream, "{n:>width$} {}", self.config.gutter)?,
            None => write!(self.stream, "{:width$} {}", "", self.config.gutter)?,
        }
        self.stream.reset()
    }

    fn severity_color(&self) -> &ColorSpec {
        match self.diagnostic.severity {
            Severity::Warning => &self.config.warning_color,
            Severity::Error => &self.config.error_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use termcolor::NoColor;

    use crate::sources::Cached;
    use crate::span::Span;
    use crate::{Config, Diagnostic, Snippet};

    type Srcs = Vec<Cached<(String, String)>>;

    #[test]
    fn renders_underlined_snippet() {
        let sources: Srcs = vec![Cached::new((
            "input".to_owned(),
            "a = 1;\nb = c + a;\n".to_owned(),
        ))];

        let diagnostic = Diagnostic::<Srcs>::error()
            .with_message("unknown variable `c`")
            .with_snippet(Snippet::primary("not defined", 0, Span::new(11, 12)));

        let mut out = NoColor::new(vec![]);
        diagnostic
            .write_to_stream(&sources, &Config::default(), &mut out)
            .unwrap();

        let rendered = String::from_utf8(out.into_inner()).unwrap();
        insta::assert_snapshot!(rendered, @r###"
        error: unknown variable `c`
          In input:2:5
          │
        2 │ b = c + a;
          │     ^ not defined
        "###);
    }

    #[test]
    fn renders_warning_header() {
        let sources: Srcs = vec![Cached::new((
            "input".to_owned(),
            "a = 0x1_0000_0000_0000_0000;\n".to_owned(),
        ))];

        let diagnostic = Diagnostic::<Srcs>::warning()
            .with_message("integer literal wider than 64 bits")
            .with_snippet(Snippet::primary("too wide", 0, Span::new(4, 27)));

        let mut out = NoColor::new(vec![]);
        diagnostic
            .write_to_stream(&sources, &Config::default(), &mut out)
            .unwrap();

        let rendered = String::from_utf8(out.into_inner()).unwrap();
        insta::assert_snapshot!(rendered, @r###"
        warning: integer literal wider than 64 bits
          In input:1:5
          │
        1 │ a = 0x1_0000_0000_0000_0000;
          │     ^^^^^^^^^^^^^^^^^^^^^^^ too wide
        "###);
    }
}
