//! Build outcome counters with a bounded message list

use std::fmt;

/// Counters and messages for one build
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub placed: usize,
    pub failed: usize,
    pub warnings: usize,
    messages: Vec<String>,
    max_messages: usize,
    suppressed: usize,
}

impl BuildReport {
    pub fn new(max_messages: usize) -> Self {
        Self { max_messages, ..Default::default() }
    }

    pub fn record_placed(&mut self) {
        self.placed += 1;
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failed += 1;
        self.push_message(message.into());
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings += 1;
        self.push_message(message.into());
    }

    /// Distinct messages are kept up to the limit; the rest are only counted
    fn push_message(&mut self, message: String) {
        if self.messages.len() < self.max_messages && !self.messages.contains(&message) {
            self.messages.push(message);
        } else {
            self.suppressed += 1;
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Problems counted but not kept verbatim
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// At least one cell was placed
    pub fn is_success(&self) -> bool {
        self.placed > 0
    }

    /// No failures and no warnings
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.warnings == 0
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} placed, {} failed, {} warnings", self.placed, self.failed, self.warnings)?;
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        if self.suppressed > 0 {
            write!(f, " ... and {} more", self.suppressed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_bounded() {
        let mut report = BuildReport::new(5);
        for i in 0..8 {
            report.record_failure(format!("Unknown block: mod:thing_{i}"));
        }
        assert_eq!(report.failed, 8);
        assert_eq!(report.messages().len(), 5);
        assert_eq!(report.suppressed(), 3);
        assert!(report.to_string().ends_with("... and 3 more"));
    }

    #[test]
    fn test_duplicate_messages_collapse() {
        let mut report = BuildReport::new(5);
        report.record_warning("oak_door: ignored color=red");
        report.record_warning("oak_door: ignored color=red");
        report.record_placed();
        assert_eq!(report.messages().len(), 1);
        assert_eq!(report.warnings, 2);
        assert!(report.is_success());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_report() {
        let mut report = BuildReport::new(5);
        report.record_placed();
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "1 placed, 0 failed, 0 warnings");
    }
}
