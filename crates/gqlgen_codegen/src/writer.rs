//! Indented source text output.

/// Spaces per indentation level.
const INDENT: &str = "    ";

/// Accumulates generated Rust source line by line.
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: String,
    indent: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.push_indent();
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    /// Writes an empty line unless the output is empty or already ends with one.
    pub fn blank(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.output.push('\n');
        }
    }

    /// Writes a line and indents what follows.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedents and writes a line.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Indents what follows without writing a line.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes `text` as `///` doc comment lines.
    ///
    /// Descriptions are markdown written for GraphQL clients, so code in them
    /// must never become a doctest: bare fences are tagged `text`, unclosed
    /// fences are closed and indented code blocks are flattened.
    pub fn doc(&mut self, text: &str) {
        let mut in_fence = false;
        for line in text.split('\n') {
            let line = line.trim_end_matches('\r').trim_end();
            let trimmed = line.trim_start();
            let line = if let Some(info) = trimmed.strip_prefix("```") {
                let tagged = !in_fence && info.trim().is_empty();
                in_fence = !in_fence;
                if tagged {
                    "```text".to_string()
                } else {
                    trimmed.to_string()
                }
            } else if in_fence {
                line.to_string()
            } else {
                flatten_indent(line)
            };
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {line}"));
            }
        }
        if in_fence {
            self.line("/// ```");
        }
    }

    /// Returns the accumulated source.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
    }
}

/// Caps leading indentation at three spaces so no line starts a code block.
fn flatten_indent(line: &str) -> String {
    let trimmed = line.trim_start();
    let width = line.len() - trimmed.len();
    if width < 4 && !line.starts_with('\t') {
        return line.to_string();
    }
    format!("   {trimmed}")
}
