//! Runtime Configuration Options
//!
//! Codecs in this crate can be tuned at runtime using environment variables or
//! by using functions in this module. Options set by calling functions in this
//! module override options set in environment variables, and thread-local
//! options override process-wide ones.
//!
//! ```
//! use geokit::config::*;
//!
//! // Decode DBF character fields as ISO-8859-15
//! set_config_option("SHAPE_ENCODING", "ISO-8859-15").unwrap();
//!
//! assert_eq!(get_config_option("SHAPE_ENCODING", "").unwrap(), "ISO-8859-15");
//!
//! // Back to the default
//! clear_config_option("SHAPE_ENCODING").unwrap();
//!
//! // Check the option has been cleared
//! assert_eq!(get_config_option("SHAPE_ENCODING", "XXX").unwrap(), "XXX");
//! ```
//!
//! Recognised options:
//!
//! * `SHAPE_ENCODING`: code page label for DBF character fields (default `windows-1252`).
//! * `SHAPE_REWIND_ON_WRITE`: re-orient polygon rings when writing shapefiles (default `YES`).
//! * `DBF_DATE_LAST_UPDATE`: `YYYY-MM-DD` stamp written into DBF headers (default: today).

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;

use crate::errors::{GeokitError, Result};

pub const SHAPE_ENCODING: &str = "SHAPE_ENCODING";
pub const SHAPE_REWIND_ON_WRITE: &str = "SHAPE_REWIND_ON_WRITE";
pub const DBF_DATE_LAST_UPDATE: &str = "DBF_DATE_LAST_UPDATE";

static GLOBAL_OPTIONS: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(Default::default);

thread_local! {
    static THREAD_LOCAL_OPTIONS: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

fn validate(key: &str, value: Option<&str>) -> Result<()> {
    if key.is_empty() || key.contains('\0') || key.contains('=') {
        return Err(GeokitError::InvalidArgument {
            argument: "key",
            msg: format!("'{}' is not a valid option name", key.escape_debug()),
        });
    }
    if let Some(value) = value {
        if value.contains('\0') {
            return Err(GeokitError::InvalidArgument {
                argument: "value",
                msg: "option values cannot contain NUL".to_string(),
            });
        }
    }
    Ok(())
}

fn with_global<T>(f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
    let mut options = match GLOBAL_OPTIONS.lock() {
        Ok(guard) => guard,
        // a panic while holding the lock cannot leave the map half-written
        Err(poison_error) => poison_error.into_inner(),
    };
    f(&mut options)
}

/// Set a configuration option
pub fn set_config_option(key: &str, value: &str) -> Result<()> {
    validate(key, Some(value))?;
    with_global(|options| options.insert(key.to_string(), value.to_string()));
    Ok(())
}

/// Get the value of a configuration option
///
/// Thread-local options win over process-wide ones, which win over the
/// environment. If the option is not found anywhere, `default` is returned.
pub fn get_config_option(key: &str, default: &str) -> Result<String> {
    validate(key, None)?;
    if let Some(value) = THREAD_LOCAL_OPTIONS.with(|options| options.borrow().get(key).cloned()) {
        return Ok(value);
    }
    if let Some(value) = with_global(|options| options.get(key).cloned()) {
        return Ok(value);
    }
    Ok(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

/// Clear the value of a configuration option
pub fn clear_config_option(key: &str) -> Result<()> {
    validate(key, None)?;
    with_global(|options| options.remove(key));
    Ok(())
}

/// Set a configuration option with **thread local** scope
pub fn set_thread_local_config_option(key: &str, value: &str) -> Result<()> {
    validate(key, Some(value))?;
    THREAD_LOCAL_OPTIONS.with(|options| {
        options
            .borrow_mut()
            .insert(key.to_string(), value.to_string())
    });
    Ok(())
}

/// Get the value of a configuration option with **thread local** scope
///
/// If the option is not set on the current thread, `default` is returned.
pub fn get_thread_local_config_option(key: &str, default: &str) -> Result<String> {
    validate(key, None)?;
    Ok(THREAD_LOCAL_OPTIONS
        .with(|options| options.borrow().get(key).cloned())
        .unwrap_or_else(|| default.to_string()))
}

/// Clear the value of a configuration option with **thread local** scope
pub fn clear_thread_local_config_option(key: &str) -> Result<()> {
    validate(key, None)?;
    THREAD_LOCAL_OPTIONS.with(|options| options.borrow_mut().remove(key));
    Ok(())
}

/// Interpret an option as a boolean (`YES`/`NO`, `TRUE`/`FALSE`, `ON`/`OFF`, `1`/`0`).
pub fn get_config_option_bool(key: &str, default: bool) -> Result<bool> {
    let value = get_config_option(key, "")?;
    Ok(match value.trim().to_ascii_uppercase().as_str() {
        "" => default,
        "YES" | "TRUE" | "ON" | "1" => true,
        "NO" | "FALSE" | "OFF" | "0" => false,
        other => {
            return Err(GeokitError::InvalidArgument {
                argument: "value",
                msg: format!("'{other}' is not a boolean value for {key}"),
            })
        }
    })
}

/// The code page used for DBF character fields.
pub fn shape_encoding() -> Result<&'static Encoding> {
    let label = get_config_option(SHAPE_ENCODING, "windows-1252")?;
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| GeokitError::InvalidArgument {
        argument: SHAPE_ENCODING,
        msg: format!("unknown encoding label '{label}'"),
    })
}

/// The date stamped into DBF headers when they are written.
pub fn dbf_date_last_update() -> Result<NaiveDate> {
    let value = get_config_option(DBF_DATE_LAST_UPDATE, "")?;
    if value.trim().is_empty() {
        return Ok(chrono::Local::now().date_naive());
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        GeokitError::InvalidArgument {
            argument: DBF_DATE_LAST_UPDATE,
            msg: format!("'{value}' is not a YYYY-MM-DD date"),
        }
    })
}
