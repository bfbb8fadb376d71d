use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use co2watch_session::{Measurement, Reading};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ppm: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    celsius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    timestamp: u64,
}

pub fn print_reading(reading: &Reading, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = match &reading.measurement {
                Measurement::Co2 { ppm } => ReadingOutput {
                    kind: "co2",
                    ppm: Some(*ppm),
                    celsius: None,
                    message: None,
                    timestamp: reading.unix_timestamp(),
                },
                Measurement::Temperature { celsius } => ReadingOutput {
                    kind: "temperature",
                    ppm: None,
                    celsius: Some(*celsius),
                    message: None,
                    timestamp: reading.unix_timestamp(),
                },
                Measurement::Malformed { message } => ReadingOutput {
                    kind: "malformed",
                    ppm: None,
                    celsius: None,
                    message: Some(message),
                    timestamp: reading.unix_timestamp(),
                },
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TIME", "KIND", "VALUE"])
                .add_row(vec![
                    reading.unix_timestamp().to_string(),
                    kind_name(&reading.measurement).to_string(),
                    value_text(&reading.measurement),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{reading}");
        }
    }
}

pub fn kind_name(measurement: &Measurement) -> &'static str {
    match measurement {
        Measurement::Co2 { .. } => "CO2",
        Measurement::Temperature { .. } => "TEMPERATURE",
        Measurement::Malformed { .. } => "MALFORMED",
    }
}

fn value_text(measurement: &Measurement) -> String {
    match measurement {
        Measurement::Co2 { ppm } => format!("{ppm} ppm"),
        Measurement::Temperature { celsius } => format!("{celsius:.1}"),
        Measurement::Malformed { message } => message.clone(),
    }
}
