// src/constants.rs

/// Number of attempts a typed accessor makes before giving up on a parameter.
pub const MAX_TRIES: usize = 5;

/// Deepest nesting accepted for array values.
pub const MAX_DIMS: usize = 7;

/// Value path used when a parameter's configuration does not give one.
pub const DEFAULT_VALUE_PATH: &str = "prompt";

/// Suggestion path used when a parameter's configuration does not give one.
pub const DEFAULT_SUGGESTION_PATH: &str = "dynamic,default";

/// Environment variable that overrides the directory holding value files.
pub const STORE_DIR_ENV: &str = "PARSOLVE_USER";

/// The name of the application directory inside the system config directory.
pub const APP_DIR_NAME: &str = "parsolve";

/// Sub-directory of the store directory holding per-task current values.
pub const CURRENT_STORE_DIR: &str = "current";

/// Sub-directory of the store directory holding global values.
pub const GLOBAL_STORE_DIR: &str = "global";

/// Extension of the value files written by the file store.
pub const STORE_FILE_EXTENSION: &str = "par";
