//! Diagnostics report - the modifier-by-modifier trace of a check
//!
//! Append-only. Does nothing at all when disabled.

use crate::panic::saving_throw::AppliedModifier;

const RULE_WIDTH: usize = 46;

#[derive(Debug, Clone, Default)]
pub struct PanicReport {
    enabled: bool,
    lines: Vec<String>,
}

impl PanicReport {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Hand the collected lines to the caller and start fresh
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn push(&mut self, line: String) {
        tracing::debug!("{}", line);
        self.lines.push(line);
    }

    /// Column header, opened once per check
    pub fn header(&mut self, health: f32) {
        if !self.enabled {
            return;
        }
        self.rule();
        self.push(format!("{:<20} | {:>10} | {:>10}", "Factor", "Change", "Total"));
        self.rule();
        let health_label = format!("Unit health {:.2}%", health * 100.0);
        self.push(format!("{:<20} | {:>10} |", health_label, ""));
    }

    /// One modifier line: name, delta, running total
    pub fn modifier(&mut self, name: &str, delta: f32, total: f32) {
        if !self.enabled {
            return;
        }
        self.push(format!("{:<20} | {:>10.3} | {:>10.3}", name, delta, total));
    }

    pub fn modifiers(&mut self, applied: &[AppliedModifier]) {
        for m in applied {
            self.modifier(&m.name, m.delta, m.total);
        }
    }

    /// Final difficulty beside the roll that was made against it
    pub fn roll(&mut self, difficulty: f32, roll: i32) {
        if !self.enabled {
            return;
        }
        self.rule();
        self.push(format!("{:<20} | {:<5}{:>5} | {:>10}", "Saving throw", difficulty, roll, "Roll"));
        self.rule();
    }

    pub fn note(&mut self, text: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.push(text.into());
    }

    pub fn rule(&mut self) {
        if !self.enabled {
            return;
        }
        self.push("-".repeat(RULE_WIDTH));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_report_records_nothing() {
        let mut report = PanicReport::disabled();
        report.header(0.5);
        report.modifier("Alone", 10.0, 10.0);
        report.roll(30.0, 12);
        report.note("Failed panic save");
        assert!(report.lines().is_empty());
    }

    #[test]
    fn test_modifier_line_layout() {
        let mut report = PanicReport::new(true);
        report.modifier("CT", 22.5, 40.25);

        let line = &report.lines()[0];
        assert!(line.starts_with("CT "));
        assert!(line.contains("22.500"));
        assert!(line.ends_with("40.250"));
        assert_eq!(line.matches('|').count(), 2);
    }

    #[test]
    fn test_take_lines_drains() {
        let mut report = PanicReport::new(true);
        report.note("one");
        report.note("two");

        assert_eq!(report.take_lines(), vec!["one".to_string(), "two".to_string()]);
        assert!(report.lines().is_empty());
    }
}
