//! Structured output printers
//!
//! Dumps that produce records (such as function offsets) hand a
//! [`serde_json::Value`] to a [`StructuredPrinter`], which renders it either
//! as indented `key: value` text or as pretty JSON.

use std::io::{self, Write};

use serde_json::Value;

/// Output format for structured records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented `key: value` lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Pick the format requested by a `-json` flag
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Sink for structured records
pub trait StructuredPrinter {
    /// Render one value
    fn emit(&mut self, value: &Value) -> io::Result<()>;
}

/// Renders records as indented `key: value` lines
pub struct TextPrinter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> TextPrinter<'a> {
    /// Create a text printer over a sink
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    fn write_value(&mut self, value: &Value, indent: usize) -> io::Result<()> {
        match value {
            Value::Object(map) => {
                for (key, field) in map {
                    if is_scalar(field) {
                        writeln!(self.out, "{:indent$}{}: {}", "", key, scalar(field))?;
                    } else {
                        writeln!(self.out, "{:indent$}{}:", "", key)?;
                        self.write_value(field, indent + 2)?;
                    }
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if is_scalar(item) {
                        writeln!(self.out, "{:indent$}- {}", "", scalar(item))?;
                    } else {
                        if idx > 0 {
                            writeln!(self.out)?;
                        }
                        self.write_value(item, indent)?;
                    }
                }
                Ok(())
            }
            other => writeln!(self.out, "{:indent$}{}", "", scalar(other)),
        }
    }
}

impl StructuredPrinter for TextPrinter<'_> {
    fn emit(&mut self, value: &Value) -> io::Result<()> {
        self.write_value(value, 0)
    }
}

/// Renders records as pretty JSON, one document per call
pub struct JsonPrinter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> JsonPrinter<'a> {
    /// Create a JSON printer over a sink
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }
}

impl StructuredPrinter for JsonPrinter<'_> {
    fn emit(&mut self, value: &Value) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *self.out, value)?;
        writeln!(self.out)
    }
}

/// Create a printer for the requested format
pub fn create_printer<'a>(
    out: &'a mut dyn Write,
    format: OutputFormat,
) -> Box<dyn StructuredPrinter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextPrinter::new(out)),
        OutputFormat::Json => Box::new(JsonPrinter::new(out)),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
