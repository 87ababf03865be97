/// Log destination used when neither `--log` nor the settings file names one.
pub const DEFAULT_LOG_PATH: &str = "faceswap_qa_log.csv";

/// Settings file location, relative to `$HOME`.
pub const SETTINGS_RELATIVE_PATH: &str = ".config/swapqa/config.toml";

/// Metadata columns that precede the check columns in every log row.
pub const METADATA_COLUMNS: [&str; 6] = [
    "timestamp",
    "job_id",
    "reviewer",
    "result",
    "primary_fail_reason",
    "notes",
];

pub const PASS_LINE: &str =
    "PASS — natural blend, Source identity preserved, Target expression/pose/mouth matched.";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
