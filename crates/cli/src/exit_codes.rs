//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | store            | Record store codes                       |
//! | 10-19   | config           | Rule configuration codes                 |
//! | 50-59   | registry         | GST registry gateway codes               |

use gstscore_registry::RegistryError;
use gstscore_store::StoreError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Store (3-9)
// =============================================================================

/// Rejected input: invalid turnover/status value, or a duplicate
/// record. Maps to the 400 class of the wire contract.
pub const EXIT_STORE_INPUT: u8 = 3;

/// No records for the requested taxpayer. Maps to the 404 class.
pub const EXIT_STORE_NOT_FOUND: u8 = 4;

/// Database failure or an unreadable stored row.
pub const EXIT_STORE_INTERNAL: u8 = 5;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Rule configuration file unreadable or failed validation.
pub const EXIT_CONFIG: u8 = 10;

// =============================================================================
// Registry (50-59)
// =============================================================================

/// Network error reaching the registry gateway.
pub const EXIT_REGISTRY_NETWORK: u8 = 50;

/// Gateway answered with a non-success HTTP status.
pub const EXIT_REGISTRY_HTTP: u8 = 51;

/// Gateway answered 200 but the payload is unusable.
pub const EXIT_REGISTRY_PAYLOAD: u8 = 52;

/// Map a store error onto its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err.http_status() {
        400 => EXIT_STORE_INPUT,
        404 => EXIT_STORE_NOT_FOUND,
        _ => EXIT_STORE_INTERNAL,
    }
}

/// Map a registry error onto its exit code.
pub fn registry_exit_code(err: &RegistryError) -> u8 {
    match err {
        RegistryError::Network(_) => EXIT_REGISTRY_NETWORK,
        RegistryError::Http(_, _) => EXIT_REGISTRY_HTTP,
        RegistryError::Parse(_) | RegistryError::Upstream(_) => EXIT_REGISTRY_PAYLOAD,
    }
}
