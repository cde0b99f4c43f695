//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the store described by `HOTEL_*` environment variables.
//! - Print deterministic `key=value` lines for quick local sanity checks.

use hotel_core::{init_logging, HotelStore, LoggingConfig, ServiceError, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("hotel_core ping={}", hotel_core::ping());
    println!("hotel_core version={}", hotel_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error={message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    if let Some(logging) = LoggingConfig::from_env() {
        init_logging(&logging)?;
    }

    let config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    let store = HotelStore::open(&config).map_err(|err| err.to_string())?;
    println!("backend={}", config.backend.as_str());
    println!("data_dir={}", config.data_dir.display());

    let guests = store.guests().map_err(|err| err.to_string())?;
    let rooms = store.rooms().map_err(|err| err.to_string())?;
    let bookings = store.bookings().map_err(|err| err.to_string())?;

    println!("guests={}", count(guests.list())?);
    println!("rooms={}", count(rooms.list())?);
    println!("bookings={}", count(bookings.list())?);

    log::info!(
        "event=cli_probe module=cli status=ok backend={}",
        config.backend.as_str()
    );
    Ok(())
}

fn count<T>(result: Result<Vec<T>, ServiceError>) -> Result<usize, String> {
    result.map(|items| items.len()).map_err(|err| err.to_string())
}
