use std::time::Duration;

use co2watch_session::{CancelToken, Session, SessionConfig};

use crate::cmd::WatchArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_reading, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;

    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let config = SessionConfig {
        poll_interval: interval,
        ..SessionConfig::default()
    };
    let session =
        Session::start(cancel, config).map_err(|err| session_error("start failed", err))?;

    let mut printed = 0usize;

    for reading in session {
        print_reading(&reading, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                // Dropping the session cancels the polling loop.
                break;
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(cancel: CancelToken) -> CliResult<()> {
    ctrlc::set_handler(move || {
        cancel.cancel();
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let trimmed = input.trim();

    let parsed = if let Some(millis) = trimmed.strip_suffix("ms") {
        millis.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = trimmed.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else {
        trimmed.parse::<u64>().ok().map(Duration::from_secs)
    };

    match parsed {
        Some(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(CliError::new(
            USAGE,
            format!("invalid interval '{input}' (expected e.g. 2s, 500ms)"),
        )),
    }
}
