//! Build-time constants handed to firmware.

use std::collections::BTreeMap;

use crate::error::ComposeError;

/// System clock frequency in Hz.
pub const CONFIG_CLOCK_FREQUENCY: &str = "CONFIG_CLOCK_FREQUENCY";

/// Prefix of the local address octet constants (`LOCAL_1`..`LOCAL_4`).
pub const LOCAL_IP_PREFIX: &str = "LOCAL";

/// Prefix of the remote address octet constants (`REMOTE_1`..`REMOTE_4`).
pub const REMOTE_IP_PREFIX: &str = "REMOTE";

/// Splits a dotted-quad address into its four octets.
///
/// `field` names the configuration field in errors.
pub fn parse_dotted_quad(field: &str, value: &str) -> Result<[u8; 4], ComposeError> {
    let parts: Vec<&str> = value.trim().split('.').collect();
    if parts.len() != 4 {
        return Err(ComposeError::configuration(
            field,
            value,
            format!("expected 4 octets, found {}", parts.len()),
        ));
    }
    let mut octets = [0u8; 4];
    for (index, (slot, part)) in octets.iter_mut().zip(&parts).enumerate() {
        *slot = part.parse::<u8>().map_err(|_| {
            ComposeError::configuration(
                field,
                value,
                format!(
                    "octet {} ('{part}') must be an integer in 0..=255",
                    index + 1
                ),
            )
        })?;
    }
    Ok(octets)
}

/// Inserts `<PREFIX>_1`..`<PREFIX>_4` for a dotted-quad address.
pub fn insert_address(
    constants: &mut BTreeMap<String, u64>,
    prefix: &str,
    field: &str,
    value: &str,
) -> Result<(), ComposeError> {
    let octets = parse_dotted_quad(field, value)?;
    for (index, octet) in octets.iter().enumerate() {
        constants.insert(format!("{prefix}_{}", index + 1), u64::from(*octet));
    }
    Ok(())
}
