//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 2    | CLI usage error (bad arguments, unsupported format)  |
//! | 3    | A required dataset is missing or has no sheets       |
//! | 4    | No candidate title/identifier column found           |
//! | 5    | Duplicate title key (only with `duplicates = "reject"`) |
//! | 6    | Invalid config file                                  |
//! | 7    | Cannot read or parse an input file                   |
//! | 8    | Cannot write an output file                          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the relevant command

use titlemap_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unsupported output extension.
pub const EXIT_USAGE: u8 = 2;

/// A required dataset was not supplied, or supplied without any data sheet.
pub const EXIT_INPUT_MISSING: u8 = 3;

/// None of the candidate columns exist in a dataset.
pub const EXIT_COLUMN_NOT_FOUND: u8 = 4;

/// Two catalog rows share a title key and the config rejects duplicates.
pub const EXIT_DUPLICATE_KEY: u8 = 5;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 6;

/// Input file could not be read or decoded.
pub const EXIT_READ: u8 = 7;

/// Output file could not be written.
pub const EXIT_WRITE: u8 = 8;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::InputMissing { .. } => EXIT_INPUT_MISSING,
        ReconError::ColumnNotFound { .. } => EXIT_COLUMN_NOT_FOUND,
        ReconError::DuplicateKey { .. } => EXIT_DUPLICATE_KEY,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
    }
}
