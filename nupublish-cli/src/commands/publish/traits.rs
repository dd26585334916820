//! Output abstraction for command handlers.
//!
//! Handlers write through [`Output`] so their formatting can be checked in
//! tests without capturing stdout.

use console::style;

/// Line-oriented output sink.
pub trait Output {
    /// Print a line.
    fn println(&self, text: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print an underlined section header.
    fn header(&self, text: &str);

    /// Print a smaller header.
    fn subheader(&self, text: &str);

    /// Print a line indented by two spaces.
    fn indented(&self, text: &str) {
        self.println(&format!("  {}", text));
    }

    /// Print a success line.
    fn success(&self, text: &str);

    /// Print a warning line.
    fn warning(&self, text: &str);

    /// Print an error line (to stderr for terminal output).
    fn error(&self, text: &str);
}

/// Terminal output with `console` styling.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn println(&self, text: &str) {
        println!("{}", text);
    }

    fn header(&self, text: &str) {
        println!("{}", style(text).bold());
        println!("{}", "=".repeat(text.chars().count()));
    }

    fn subheader(&self, text: &str) {
        println!("{}", style(text).bold().cyan());
    }

    fn success(&self, text: &str) {
        println!("{} {}", style("✓").green().bold(), text);
    }

    fn warning(&self, text: &str) {
        println!("{} {}", style("!").yellow().bold(), style(text).yellow());
    }

    fn error(&self, text: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(text).red());
    }
}

/// Collects output in memory, without styling.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct BufferOutput {
    buffer: std::cell::RefCell<String>,
}

#[cfg(test)]
impl BufferOutput {
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

#[cfg(test)]
impl Output for BufferOutput {
    fn println(&self, text: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(text);
        buffer.push('\n');
    }

    fn header(&self, text: &str) {
        self.println(text);
    }

    fn subheader(&self, text: &str) {
        self.println(text);
    }

    fn success(&self, text: &str) {
        self.println(&format!("OK {}", text));
    }

    fn warning(&self, text: &str) {
        self.println(&format!("WARN {}", text));
    }

    fn error(&self, text: &str) {
        self.println(&format!("ERROR {}", text));
    }
}
