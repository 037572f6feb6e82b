//! Output renderers for command results
//!
//! Every command result implements [`Render`]; a [`Formatter`] chosen from
//! `--output` turns it into the text printed on stdout.

use anyhow::Result;
use lmmc_core::OutputFormat;
use lmmc_update::UpdateOutcome;
use serde_json::{json, Value};
use tabled::{settings::Style, Table, Tabled};

use crate::version::VersionInfo;

/// A command result that any formatter can print
pub trait Render {
    /// Ordered `(field, value)` pairs for table and plain output
    fn fields(&self) -> Vec<(&'static str, String)>;

    /// Structured form for JSON output
    fn to_json(&self) -> Result<Value>;
}

/// Turns a [`Render`] value into printable text
pub trait Formatter {
    fn format(&self, item: &dyn Render) -> Result<String>;
}

/// Bordered two-column table
pub struct TableFormatter;

/// Pretty-printed JSON
pub struct JsonFormatter;

/// `field: value` lines
pub struct PlainFormatter;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "field")]
    field: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

impl Formatter for TableFormatter {
    fn format(&self, item: &dyn Render) -> Result<String> {
        let rows = item
            .fields()
            .into_iter()
            .map(|(field, value)| FieldRow { field, value });
        Ok(Table::new(rows).with(Style::rounded()).to_string())
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, item: &dyn Render) -> Result<String> {
        Ok(serde_json::to_string_pretty(&item.to_json()?)?)
    }
}

impl Formatter for PlainFormatter {
    fn format(&self, item: &dyn Render) -> Result<String> {
        Ok(item
            .fields()
            .into_iter()
            .map(|(field, value)| format!("{}: {}", field, value))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Formatter for `format`
pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Plain => Box::new(PlainFormatter),
    }
}

impl Render for VersionInfo {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("version", self.version.clone())];
        if let Some(commit) = &self.commit {
            fields.push(("commit", commit.clone()));
        }
        if let Some(date) = &self.build_date {
            fields.push(("build date", date.clone()));
        }
        if let Some(target) = &self.target {
            fields.push(("target", target.clone()));
        }
        fields
    }

    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Result of `lmmc update` as shown to the user
pub struct UpdateReport {
    pub outcome: UpdateOutcome,
}

impl UpdateReport {
    pub fn new(outcome: UpdateOutcome) -> Self {
        Self { outcome }
    }

    fn status(&self) -> &'static str {
        match self.outcome {
            UpdateOutcome::DevBuildSkipped => "skipped",
            UpdateOutcome::AlreadyLatest { .. } => "up-to-date",
            UpdateOutcome::Available { .. } => "available",
            UpdateOutcome::Updated { .. } => "updated",
        }
    }

    /// Human-readable summary line
    pub fn message(&self) -> String {
        match &self.outcome {
            UpdateOutcome::DevBuildSkipped => {
                "Development build, use --force to update anyway".to_string()
            }
            UpdateOutcome::AlreadyLatest { version, .. } => {
                format!("Already on the latest version ({})", version)
            }
            UpdateOutcome::Available {
                current, latest, ..
            } => {
                format!("Update available: {} -> {}", current, latest)
            }
            UpdateOutcome::Updated { to, .. } => {
                format!("Updated to {}. Restart lmmc to use the new version", to)
            }
        }
    }
}

impl Render for UpdateReport {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("status", self.status().to_string())];
        let published = match &self.outcome {
            UpdateOutcome::DevBuildSkipped => None,
            UpdateOutcome::AlreadyLatest { version, published } => {
                fields.push(("version", version.clone()));
                published.as_ref()
            }
            UpdateOutcome::Available {
                current,
                latest,
                published,
            } => {
                fields.push(("current", current.clone()));
                fields.push(("latest", latest.clone()));
                published.as_ref()
            }
            UpdateOutcome::Updated {
                from,
                to,
                published,
                binary,
            } => {
                fields.push(("from", from.clone()));
                fields.push(("to", to.clone()));
                fields.push(("binary", binary.display().to_string()));
                published.as_ref()
            }
        };
        if let Some(date) = published {
            fields.push(("published", date.clone()));
        }
        fields.push(("message", self.message()));
        fields
    }

    fn to_json(&self) -> Result<Value> {
        let mut value = serde_json::to_value(&self.outcome)?;
        value["message"] = json!(self.message());
        Ok(value)
    }
}
