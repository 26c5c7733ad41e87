//
//  bitbucket-checkout
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Output formatting for `bb-checkout`, in two formats:
//!
//! - **Table format**: Human-readable tabular output for interactive terminal use
//! - **JSON format**: Machine-readable JSON output for scripting and automation
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: Enum representing the available output formats
//! - [`OutputWriter`]: Main entry point for writing formatted output
//! - [`TableOutput`]: Trait for types that can be rendered as tables
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_checkout::output::OutputWriter;
//! use bitbucket_checkout::scm::{
//!     BackendType, BranchHead, Deployment, GitCheckoutBuilder, SourceContext,
//! };
//!
//! let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
//! let head = BranchHead::new("main", BackendType::Git);
//! let config = GitCheckoutBuilder::new(context, head, None)?
//!     .with_fallback_clone_links()?
//!     .build()?;
//!
//! OutputWriter::json().write(&config)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod checkout;
mod table;

pub use checkout::*;
pub use table::*;

use serde::Serialize;

/// Represents the available output formats for CLI output.
///
/// # Notes
///
/// The default output format is [`OutputFormat::Table`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    /// Human-readable table format with optional color support.
    #[default]
    Table,
    /// Pretty-printed JSON for scripting and automation.
    Json,
}

/// A unified output writer that handles both output formats.
///
/// # Notes
///
/// Color output is detected from the terminal. Colors are disabled when
/// output is piped or redirected.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Creates a new output writer configured for JSON output.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    /// Writes a value to stdout using the configured output format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails (only applicable for JSON format).
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(value)?;
                println!("{}", json);
            }
            OutputFormat::Table => {
                value.print_table(self.color);
            }
        }
        Ok(())
    }

    /// Writes a bare line to stdout, or a JSON string in JSON mode.
    ///
    /// Used for single-value results such as a resolved URL.
    pub fn write_line(&self, line: &str) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(line)?),
            OutputFormat::Table => println!("{}", line),
        }
        Ok(())
    }

    /// Writes an error message to stderr.
    ///
    /// The message is prefixed with "error:" and styled in red when
    /// color output is enabled.
    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }
}

/// A trait for types that can be rendered as table output.
///
/// For JSON output, types must also implement [`Serialize`].
pub trait TableOutput {
    /// Renders the type as a table or section.
    ///
    /// # Parameters
    ///
    /// * `color` - Whether color output is enabled
    fn print_table(&self, color: bool);
}

/// Prints a styled header with an underline.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.len()));
}

/// Prints a key-value pair, dimming the key when color is enabled.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_table() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
        assert_eq!(OutputWriter::new(OutputFormat::default()).format, OutputFormat::Table);
    }

    #[test]
    fn test_json_writer() {
        let writer = OutputWriter::json();
        assert_eq!(writer.format, OutputFormat::Json);
        assert!(writer.write_line("https://bitbucket.org/tester/test-repo.git").is_ok());
    }
}
