//! Run summary.

use serde::Serialize;

/// Totals and diagnostics of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub models_total: usize,
    pub models_processed: usize,
    pub models_failed: usize,
    pub enums_total: usize,
    pub enums_rendered: usize,
    pub fields_total: usize,
    pub fallback_fields: usize,
    pub warnings: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub missing_dependencies: Vec<String>,
}

impl GenerationSummary {
    /// Number of models and enums that produced no module.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.models_failed + self.enums_total.saturating_sub(self.enums_rendered)
    }

    /// Every entity rendered and no diagnostics were raised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
            && self.warnings.is_empty()
            && self.cycles.is_empty()
            && self.missing_dependencies.is_empty()
    }

    /// Record a model that produced no module.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.models_failed += 1;
        self.warnings.push(message.into());
    }

    /// Plain-text report.
    pub fn render_plain(&self) -> String {
        let title = "SCHEMA GENERATION";
        let mut lines = vec![title.to_string(), "=".repeat(title.len())];

        lines.push(format!(
            "Models: {} processed, {} failed, {} total",
            self.models_processed, self.models_failed, self.models_total
        ));
        lines.push(format!(
            "Enums: {} rendered, {} total",
            self.enums_rendered, self.enums_total
        ));
        lines.push(format!(
            "Fields: {} total, {} fallback",
            self.fields_total, self.fallback_fields
        ));

        if !self.cycles.is_empty() {
            lines.push(String::new());
            lines.push(format!("Cycles ({}):", self.cycles.len()));
            for cycle in &self.cycles {
                lines.push(format!("  {}", cycle.join(" -> ")));
            }
        }

        if !self.missing_dependencies.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "Missing dependencies ({}):",
                self.missing_dependencies.len()
            ));
            for missing in &self.missing_dependencies {
                lines.push(format!("  {missing}"));
            }
        }

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push(format!("Warnings ({}):", self.warnings.len()));
            for warning in &self.warnings {
                lines.push(format!("  - {warning}"));
            }
        }

        lines.join("\n")
    }
}
