use colored::Colorize;
use lazyres_common::{Diagnostic, DiagnosticCategory};

use super::driver::{DeclarationReport, ResolveReport};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Packages with their indented declaration trees, then diagnostics.
    pub fn render(&self, report: &ResolveReport) -> String {
        let mut out = String::new();
        for package in &report.packages {
            out.push_str(&self.format_package(&package.name));
            out.push('\n');
            for declaration in &package.declarations {
                self.write_declaration(&mut out, declaration, 1);
            }
        }
        if !report.diagnostics.is_empty() {
            out.push('\n');
            out.push_str(&self.render_diagnostics(&report.diagnostics));
            out.push('\n');
        }
        out
    }

    pub fn render_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    /// `file:start - error LR1001: message`
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let location = if diagnostic.file.is_empty() {
            "<unknown>".to_string()
        } else {
            format!("{}:{}", diagnostic.file, diagnostic.start)
        };
        format!(
            "{} - {} {}: {}",
            location,
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        )
    }

    fn write_declaration(&self, out: &mut String, declaration: &DeclarationReport, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&declaration.signature);
        out.push('\n');
        for member in &declaration.members {
            self.write_declaration(out, member, depth + 1);
        }
    }

    fn format_package(&self, name: &str) -> String {
        let label = format!("package {name}");
        if self.color {
            label.bold().to_string()
        } else {
            label
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("LR{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
