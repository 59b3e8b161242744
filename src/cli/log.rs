//! Log command implementation

use crate::fields::value;
use crate::level::Level;
use crate::logger::Log;
use clap::Args;
use serde_json::Value;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Severity of the entry
    #[arg(short, long, default_value = "info")]
    pub level: Level,

    /// Entry message
    pub message: String,

    /// Structured fields as key=value; values that parse as JSON keep their type
    pub fields: Vec<String>,
}

impl LogArgs {
    pub fn execute(&self, logger: &dyn Log) -> anyhow::Result<()> {
        let key_values = parse_fields(&self.fields)?;
        match self.level {
            Level::Fatal => logger.fatalw(&self.message, &key_values),
            Level::Panic => logger.panicw(&self.message, &key_values),
            level => logger.logw(level, &self.message, &key_values),
        }
        Ok(())
    }
}

fn parse_fields(fields: &[String]) -> anyhow::Result<Vec<Value>> {
    let mut key_values = Vec::with_capacity(fields.len() * 2);
    for field in fields {
        let (key, raw) = field
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("field {field:?} is not key=value"))?;
        key_values.push(value(key));
        key_values.push(serde_json::from_str(raw).unwrap_or_else(|_| value(raw)));
    }
    Ok(key_values)
}
