use console::style;
use serde::{Deserialize, Serialize};

/// How a bundle report is rendered for the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    pub colors: bool,
    pub chunks: bool,
    pub error_details: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            colors: true,
            chunks: false,
            error_details: true,
        }
    }
}

/// Diagnostic report of one bundler run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleReport {
    pub assets: Vec<String>,
    pub chunks: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// Free-form bundler output that was not structured
    pub log: String,
}

impl BundleReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn render(&self, package: &str, options: &ReportOptions) -> String {
        let paint = |text: String| style(text).force_styling(options.colors);

        let mut lines = vec![paint(format!("Service build: {}", package)).bold().to_string()];

        for asset in &self.assets {
            lines.push(format!("  {}", paint(asset.clone()).green()));
        }

        if options.chunks {
            for chunk in &self.chunks {
                lines.push(format!("  chunk {}", chunk));
            }
        }

        let log = self.log.trim_end();
        if !log.is_empty() {
            lines.push(log.to_string());
        }

        for warning in &self.warnings {
            lines.push(paint(format!("WARNING {}", warning)).yellow().to_string());
        }

        for error in &self.errors {
            let text = if options.error_details {
                error.clone()
            } else {
                error.lines().next().unwrap_or_default().to_string()
            };
            lines.push(paint(format!("ERROR {}", text)).red().to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> ReportOptions {
        ReportOptions {
            colors: false,
            ..Default::default()
        }
    }

    fn sample() -> BundleReport {
        BundleReport {
            assets: vec!["foo.service.js".to_string(), "foo.service.min.js".to_string()],
            chunks: vec!["{0} foo.service.js".to_string()],
            warnings: vec!["large bundle".to_string()],
            errors: vec![],
            log: String::new(),
        }
    }

    #[test]
    fn test_default_options() {
        let options = ReportOptions::default();
        assert!(options.colors);
        assert!(!options.chunks);
        assert!(options.error_details);
    }

    #[test]
    fn test_render_hides_chunks_by_default() {
        let rendered = sample().render("universal-foo", &plain());
        assert_eq!(
            rendered,
            "Service build: universal-foo\n  foo.service.js\n  foo.service.min.js\nWARNING large bundle"
        );
    }

    #[test]
    fn test_render_chunks_when_enabled() {
        let options = ReportOptions {
            chunks: true,
            ..plain()
        };
        let rendered = sample().render("universal-foo", &options);
        assert!(rendered.contains("  chunk {0} foo.service.js"));
    }

    #[test]
    fn test_render_error_details() {
        let report = BundleReport {
            errors: vec!["Module not found: rax-x\n  at src/index.js:3".to_string()],
            ..Default::default()
        };
        assert!(report.has_errors());

        let detailed = report.render("rax-view", &plain());
        assert!(detailed.contains("at src/index.js:3"));

        let brief = report.render(
            "rax-view",
            &ReportOptions {
                error_details: false,
                ..plain()
            },
        );
        assert!(brief.contains("ERROR Module not found: rax-x"));
        assert!(!brief.contains("at src/index.js:3"));
    }

    #[test]
    fn test_render_colors() {
        let report = BundleReport {
            errors: vec!["boom".to_string()],
            ..Default::default()
        };
        let colored = report.render("rax-view", &ReportOptions::default());
        assert!(colored.contains("\u{1b}["));
        assert!(!report.render("rax-view", &plain()).contains("\u{1b}["));
    }

    #[test]
    fn test_deserialize_partial_report() {
        let report: BundleReport = serde_json::from_str(r#"{"errors": ["bad"]}"#).unwrap();
        assert_eq!(report.errors, vec!["bad"]);
        assert!(report.assets.is_empty());
    }
}
