//! Workspace identifier validation

use uuid::{Uuid, Variant};

use crate::error::{CoreError, CoreResult};

const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Whether `identifier` is a canonical UUID v4: `8-4-4-4-12` hex digits,
/// version nibble `4`, variant nibble in `{8, 9, a, b}`.
///
/// Braced, URN and hyphenless forms are rejected even though `uuid` would
/// parse them.
#[must_use]
pub fn is_valid_identifier(identifier: &str) -> bool {
    if identifier.len() != 36 {
        return false;
    }
    let shape_ok = identifier.bytes().enumerate().all(|(i, b)| {
        if HYPHEN_POSITIONS.contains(&i) {
            b == b'-'
        } else {
            b.is_ascii_hexdigit()
        }
    });
    if !shape_ok {
        return false;
    }

    Uuid::parse_str(identifier)
        .is_ok_and(|uuid| uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122)
}

/// [`is_valid_identifier`] as a `Result`.
pub fn validate_identifier(identifier: &str) -> CoreResult<&str> {
    if is_valid_identifier(identifier) {
        Ok(identifier)
    } else {
        Err(CoreError::InvalidIdentifier(identifier.to_string()))
    }
}
