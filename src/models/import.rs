use serde::Deserialize;

/// How many per-record failures an import report lists before eliding.
pub const MAX_LISTED_FAILURES: usize = 5;

/// Response of `POST /projects/import`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub details: ImportDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDetails {
    #[serde(default)]
    pub failed: Vec<ImportFailure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportFailure {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Aggregate counts first, then up to [`MAX_LISTED_FAILURES`] failures and
    /// a note about the rest.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Import Complete!".to_string(),
            format!("Total projects: {}", self.total),
            format!("Successfully imported: {}", self.successful),
            format!("Failed: {}", self.failed),
        ];

        let failures = &self.details.failed;
        if self.failed > 0 && !failures.is_empty() {
            lines.push("Failed Imports:".to_string());
            for failure in failures.iter().take(MAX_LISTED_FAILURES) {
                lines.push(format!("{}: {}", failure.project, failure.errors.join(", ")));
            }
            if failures.len() > MAX_LISTED_FAILURES {
                lines.push(format!("...and {} more errors", failures.len() - MAX_LISTED_FAILURES));
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_failures(count: usize) -> ImportReport {
        let failed = (0..count)
            .map(|i| ImportFailure {
                project: format!("Row {}", i + 1),
                errors: vec!["budget is required".into(), "city is required".into()],
            })
            .collect::<Vec<_>>();
        ImportReport {
            total: 10,
            successful: 10 - count as u64,
            failed: count as u64,
            details: ImportDetails { failed },
        }
    }

    #[test]
    fn clean_import_lists_only_counts() {
        let lines = report_with_failures(0).summary_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "Successfully imported: 10");
    }

    #[test]
    fn lists_at_most_five_failures_and_notes_the_rest() {
        let lines = report_with_failures(8).summary_lines();

        let listed = lines.iter().filter(|l| l.starts_with("Row ")).count();
        assert_eq!(listed, MAX_LISTED_FAILURES);
        assert_eq!(lines[5], "Row 1: budget is required, city is required");
        assert_eq!(lines.last().unwrap(), "...and 3 more errors");
    }

    #[test]
    fn exactly_five_failures_has_no_elision_note() {
        let lines = report_with_failures(5).summary_lines();
        assert!(!lines.iter().any(|l| l.contains("more errors")));
    }

    #[test]
    fn decodes_partial_response() {
        let report: ImportReport =
            serde_json::from_str(r#"{"total":2,"successful":2,"failed":0}"#).unwrap();
        assert!(report.details.failed.is_empty());
    }
}
