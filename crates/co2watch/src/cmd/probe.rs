use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use co2watch_hid::SensorDevice;
use co2watch_session::{handshake, SessionConfig};
use serde::Serialize;

use crate::cmd::ProbeArgs;
use crate::exit::{hid_error, session_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct ProbeOutput {
    vendor_id: String,
    product_id: String,
    manufacturer: Option<String>,
    product: Option<String>,
    handshake: &'static str,
}

pub fn run(_args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SessionConfig::default();

    let mut device = SensorDevice::open_first(config.vendor_id, config.product_id)
        .map_err(|err| hid_error("open failed", err))?;

    let manufacturer = device.manufacturer_string();
    let product = device.product_string();

    handshake(&mut device).map_err(|err| session_error("handshake failed", err))?;

    let out = ProbeOutput {
        vendor_id: format!("{:04x}", config.vendor_id),
        product_id: format!("{:04x}", config.product_id),
        manufacturer,
        product,
        handshake: "ok",
    };

    print_probe(&out, format);
    Ok(SUCCESS)
}

fn print_probe(out: &ProbeOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["vendor_id", out.vendor_id.as_str()])
                .add_row(vec!["product_id", out.product_id.as_str()])
                .add_row(vec![
                    "manufacturer",
                    out.manufacturer.as_deref().unwrap_or("-"),
                ])
                .add_row(vec!["product", out.product.as_deref().unwrap_or("-")])
                .add_row(vec!["handshake", out.handshake]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "device={}:{} manufacturer={} product={} handshake={}",
                out.vendor_id,
                out.product_id,
                out.manufacturer.as_deref().unwrap_or("-"),
                out.product.as_deref().unwrap_or("-"),
                out.handshake
            );
        }
    }
}
