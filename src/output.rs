use std::io::{IsTerminal, Write};

/// ANSI color helpers, only emitting escape codes when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colors only when stderr is a terminal
    #[must_use]
    pub fn for_stderr() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }

    fn style(self, code: &str, s: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    #[must_use]
    pub fn bold(self, s: &str) -> String {
        self.style("1", s)
    }

    #[must_use]
    pub fn red(self, s: &str) -> String {
        self.style("31", s)
    }

    #[must_use]
    pub fn yellow(self, s: &str) -> String {
        self.style("33", s)
    }
}

/// User-facing warning and error lines, written to one stream
pub struct Console<W> {
    writer: W,
    style: Style,
}

impl Console<std::io::Stderr> {
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr(), Style::for_stderr())
    }
}

impl<W: Write> Console<W> {
    pub fn new(writer: W, style: Style) -> Self {
        Self { writer, style }
    }

    pub fn warning(&mut self, message: &str) {
        let _ = writeln!(self.writer, "{}", self.style.yellow(message));
    }

    pub fn error(&mut self, message: &str) {
        let _ = writeln!(
            self.writer,
            "{} {}",
            self.style.bold(&self.style.red("error:")),
            message
        );
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_without_color() {
        let mut console = Console::new(Vec::new(), Style::new(false));
        console.warning("careful");
        console.error("boom");
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(text, "careful\nerror: boom\n");
    }

    #[test]
    fn test_colored_output() {
        let style = Style::new(true);
        assert_eq!(style.yellow("x"), "\x1b[33mx\x1b[0m");
    }
}
