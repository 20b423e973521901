//! Table output for the tabular formats
//!
//! Commands build a [`Table`] of display strings once and render it in
//! whichever of `auto`, `tsv`, `csv` or `md` was asked for. JSON and YAML
//! are serialized from the underlying values instead.

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Headers plus rows of already-formatted cells
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Render for a tabular format; `Auto` draws a boxed terminal table
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Tsv => Ok(self.render_tsv()),
            OutputFormat::Csv => self.render_csv(),
            OutputFormat::Md => Ok(self.render_tabled(true)),
            _ => Ok(self.render_tabled(false)),
        }
    }

    fn render_tabled(&self, markdown: bool) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        let mut table = builder.build();
        if markdown {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        format!("{}\n", table)
    }

    fn render_tsv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.headers.join("\t"));
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.replace(['\t', '\n'], " ")).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            writer.write_record(row).into_diagnostic()?;
        }
        let bytes = writer.into_inner().into_diagnostic()?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["name", "total"]);
        table.push_row(["Granite, polished", "4210"]);
        table.push_row(["Marble", "500"]);
        table
    }

    #[test]
    fn test_render_tsv() {
        let out = sample().render(OutputFormat::Tsv).unwrap();
        assert_eq!(out, "name\ttotal\nGranite, polished\t4210\nMarble\t500\n");
    }

    #[test]
    fn test_render_csv_quotes_commas() {
        let out = sample().render(OutputFormat::Csv).unwrap();
        assert!(out.starts_with("name,total\n"));
        assert!(out.contains("\"Granite, polished\",4210"));
    }

    #[test]
    fn test_render_markdown() {
        let out = sample().render(OutputFormat::Md).unwrap();
        assert!(out.contains("| name "));
        assert!(out.contains("|---"));
    }
}
