//! Terminal build report printer
//!
//! This module provides terminal output for a [`BuildOutput`]: one line
//! per task that touched files, followed by the recorded diagnostics.
//!
//! # Example
//!
//! ```no_run
//! use propdoc::builder::{PackageBuilder, Task};
//! use propdoc::printer::ReportPrinter;
//!
//! let builder = PackageBuilder::new("packages/reakit");
//! let output = builder.build(&Task::ALL).unwrap();
//! ReportPrinter::new(&output, &builder.root, true).print_to_stdout();
//! ```

use crate::builder::BuildOutput;
use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::{Path, PathBuf};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Terminal build report printer
pub struct ReportPrinter<'a> {
    /// Report to print
    output: &'a BuildOutput,
    /// Paths are printed relative to this directory
    root: &'a Path,
    /// Whether to use colored output
    use_color: bool,
}

impl<'a> ReportPrinter<'a> {
    /// Create a new printer
    pub fn new(output: &'a BuildOutput, root: &'a Path, use_color: bool) -> Self {
        Self {
            output,
            root,
            use_color,
        }
    }

    /// `(verb, paths)` lines of the report, empty ones left out
    fn sections(&self) -> Vec<(&'static str, Vec<String>)> {
        let output = self.output;
        let sections = [
            ("Cleaned", self.relative_all(&output.removed)),
            ("Generated proxies", self.relative_all(&output.proxy_files)),
            ("Generated gitignore", self.relative_all(output.gitignore.as_slice())),
            ("Generated keys", self.relative_all(&output.keys_files)),
            ("Injected prop types", self.relative_all(&output.readmes)),
        ];
        sections
            .into_iter()
            .filter(|(_, paths)| !paths.is_empty())
            .collect()
    }

    fn relative_all(&self, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(self.root)
                    .unwrap_or(p)
                    .display()
                    .to_string()
                    .replace('\\', "/")
            })
            .collect()
    }

    /// Format the report for Display trait
    pub fn format(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (verb, paths) in self.sections() {
            writeln!(
                f,
                "{} in {}: {}",
                self.styled_green(verb),
                self.styled_bold(&self.output.package_name),
                paths.join(", ")
            )?;
        }

        for diagnostic in self.output.diagnostics.diagnostics() {
            writeln!(f, "{}", self.styled_diagnostic(diagnostic))?;
        }

        Ok(())
    }

    /// Print directly to stdout with colors
    pub fn print_to_stdout(&self) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        if let Err(e) = self.write_colored(&mut stdout) {
            eprintln!("Error printing report: {}", e);
        }
    }

    /// Write with colors to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        for (verb, paths) in self.sections() {
            self.write_color(w, verb, ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(w, " in ")?;
            self.write_color(w, &self.output.package_name, ColorSpec::new().set_bold(true))?;
            writeln!(w, ": {}", paths.join(", "))?;
        }

        for diagnostic in self.output.diagnostics.diagnostics() {
            let color = severity_color(diagnostic.severity);
            self.write_color(w, &diagnostic.format(), ColorSpec::new().set_fg(Some(color)))?;
            writeln!(w)?;
        }

        Ok(())
    }

    fn write_color<W: WriteColor>(&self, w: &mut W, s: &str, spec: &ColorSpec) -> io::Result<()> {
        w.set_color(spec)?;
        write!(w, "{}", s)?;
        w.reset()
    }

    // === Style helpers for Display trait ===

    fn styled_green(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[32m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn styled_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn styled_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let text = diagnostic.format();
        if !self.use_color {
            return text;
        }
        let code = match diagnostic.severity {
            DiagnosticSeverity::Error => 31,
            DiagnosticSeverity::Warning => 33,
            DiagnosticSeverity::Info => 90,
        };
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

fn severity_color(severity: DiagnosticSeverity) -> Color {
    match severity {
        DiagnosticSeverity::Error => Color::Red,
        DiagnosticSeverity::Warning => Color::Yellow,
        DiagnosticSeverity::Info => Color::White,
    }
}

impl Display for ReportPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.format(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use pretty_assertions::assert_eq;
    use termcolor::Buffer;

    fn output() -> BuildOutput {
        let mut output = BuildOutput {
            package_name: "reakit".to_string(),
            readmes: vec![
                PathBuf::from("/pkg/src/Button/README.md"),
                PathBuf::from("/pkg/src/Dialog/README.md"),
            ],
            gitignore: Some(PathBuf::from("/pkg/.gitignore")),
            ..BuildOutput::default()
        };
        output
            .diagnostics
            .add(Diagnostic::warning("heading is level 3").in_file("/pkg/src/Tab/README.md"));
        output
    }

    #[test]
    fn test_printer_display() {
        let output = output();
        let printer = ReportPrinter::new(&output, Path::new("/pkg"), false);
        assert_eq!(
            printer.to_string(),
            "Generated gitignore in reakit: .gitignore\n\
             Injected prop types in reakit: src/Button/README.md, src/Dialog/README.md\n\
             /pkg/src/Tab/README.md: warning: heading is level 3\n"
        );
    }

    #[test]
    fn test_write_colored_without_color() {
        let output = output();
        let printer = ReportPrinter::new(&output, Path::new("/pkg"), true);
        let mut buffer = Buffer::no_color();
        printer.write_colored(&mut buffer).unwrap();

        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.starts_with("Generated gitignore in reakit: .gitignore\n"));
        assert!(text.contains("warning: heading is level 3"));
    }

    #[test]
    fn test_empty_report() {
        let output = BuildOutput::default();
        let printer = ReportPrinter::new(&output, Path::new("/pkg"), false);
        assert_eq!(printer.to_string(), "");
    }
}
