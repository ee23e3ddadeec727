//! Typed capture of single properties into record fields.
//!
//! Failures are local to one field: the destination is left untouched and the
//! caller decides whether to care.

use super::bounded::TextField;
use super::store::PropertyStore;
use crate::error::CaptureError;
use tracing::{debug, error};

/// Copy the string property `key` into `dest`.
///
/// Nothing is written unless the whole value fits.
pub fn capture_string(
    store: &PropertyStore,
    key: &str,
    dest: &mut dyn TextField,
) -> Result<(), CaptureError> {
    if key.is_empty() {
        return Err(CaptureError::InvalidInput {
            reason: "empty key",
        });
    }
    if dest.capacity() == 0 {
        return Err(CaptureError::InvalidInput {
            reason: "zero-capacity destination",
        });
    }

    let value = match store.get_string(key) {
        Ok(value) => value,
        Err(err) => return Err(report(err.into())),
    };

    dest.assign_text(value).map_err(|source| {
        debug!(key, %source, "property would be truncated, leaving field unchanged");
        CaptureError::WouldTruncate {
            key: key.to_string(),
            source,
        }
    })
}

/// Copy the integer property `key` into `dest`.
pub fn capture_integer(
    store: &PropertyStore,
    key: &str,
    dest: &mut i32,
) -> Result<(), CaptureError> {
    if key.is_empty() {
        return Err(CaptureError::InvalidInput {
            reason: "empty key",
        });
    }

    match store.get_int(key) {
        Ok(value) => {
            *dest = value;
            Ok(())
        }
        Err(err) => Err(report(err.into())),
    }
}

fn report(err: CaptureError) -> CaptureError {
    match &err {
        CaptureError::NotFound { key } => debug!(key = %key, "property is not defined"),
        other => error!(code = ?other.code(), "{}", other),
    }
    err
}
