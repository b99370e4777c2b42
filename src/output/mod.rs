//! Output formatting and management

use crate::engine::DeviceReport;
use crate::{FactError, Result};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file: Option<String>,
    pub colored: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            file: None,
            colored: true,
        }
    }
}

/// CSV header, one row per interface
pub const CSV_HEADER: [&str; 10] = [
    "host",
    "if_index",
    "name",
    "descr",
    "alias",
    "mac",
    "admin",
    "oper",
    "speed_mbps",
    "ips",
];

/// Main output manager
pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write reports to the configured file, or stdout
    pub fn write_reports(&self, reports: &[DeviceReport]) -> Result<()> {
        let output = self.render(reports)?;

        match &self.config.file {
            Some(filename) => {
                let mut file = File::create(filename)?;
                file.write_all(output.as_bytes())?;
            }
            None => {
                print!("{}", output);
            }
        }

        Ok(())
    }

    pub fn render(&self, reports: &[DeviceReport]) -> Result<String> {
        match self.config.format {
            OutputFormat::Text => Ok(self.format_text(reports)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
            OutputFormat::Csv => format_csv(reports),
        }
    }

    /// Human summary with one line per interface
    fn format_text(&self, reports: &[DeviceReport]) -> String {
        let mut output = String::new();

        for report in reports {
            let signals = &report.signals;
            let title = if signals.sys_name.is_empty() {
                report.host.clone()
            } else {
                format!("{} ({})", report.host, signals.sys_name)
            };
            output.push_str(&self.paint(&title, |t| t.bright_cyan().bold()));
            output.push('\n');

            output.push_str(&format!(
                "  vendor: {}  role: {}  model: {}  serial: {}\n",
                report.vendor,
                self.paint(report.classification.role.as_str(), |t| t.bright_green()),
                or_dash(&signals.model_name),
                or_dash(&signals.serial_number)
            ));
            if !signals.sys_location.is_empty() {
                output.push_str(&format!("  location: {}\n", signals.sys_location));
            }
            if let Some(platform) = report.platform {
                let source = if report.platform_probe_output.is_some() { "ssh" } else { "sysDescr" };
                output.push_str(&format!("  platform: {} (from {})\n", platform, source));
            }
            if let Some(error) = &report.platform_error {
                output.push_str(&self.paint(&format!("  platform: {}\n", error), |t| t.yellow()));
            }
            for reason in &report.classification.reasons {
                output.push_str(&self.paint(&format!("  - {}\n", reason), |t| t.dimmed()));
            }

            output.push_str(&format!(
                "  interfaces: {}  fingerprint: {}\n",
                report.interfaces.len(),
                report.interfaces.fingerprint
            ));
            for interface in &report.interfaces.interfaces {
                let ips = interface.ips.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
                let line = format!(
                    "    {:>6} {:<24} {:<17} {:>4}/{:<14} {:>7} Mb/s {}\n",
                    interface.if_index,
                    interface.label(),
                    or_dash(&interface.mac),
                    or_dash(interface.admin_status.as_str()),
                    or_dash(interface.oper_status.as_str()),
                    interface.speed_mbps,
                    ips
                );
                output.push_str(&line);
            }
            for root in &report.interfaces.failed_subtrees {
                output.push_str(&self.paint(&format!("  ! no data for {}\n", root), |t| t.red()));
            }
            output.push('\n');
        }

        output
    }

    /// Apply color formatting if enabled
    fn paint<F>(&self, text: &str, style: F) -> String
    where
        F: Fn(&str) -> ColoredString,
    {
        if self.config.colored {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// One CSV row per interface of every report
pub fn format_csv(reports: &[DeviceReport]) -> Result<String> {
    let csv_error = |e: csv::Error| FactError::OutputError(e.to_string());
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for report in reports {
        for interface in &report.interfaces.interfaces {
            let ips = interface.ips.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
            writer
                .write_record([
                    report.host.as_str(),
                    &interface.if_index.to_string(),
                    &interface.name,
                    &interface.descr,
                    &interface.alias,
                    &interface.mac,
                    interface.admin_status.as_str(),
                    interface.oper_status.as_str(),
                    &interface.speed_mbps.to_string(),
                    &ips,
                ])
                .map_err(csv_error)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FactError::OutputError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FactError::OutputError(e.to_string()))
}
