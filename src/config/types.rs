//! Default values for the Config struct.

use std::path::PathBuf;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "scaffold.yaml";

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

pub(crate) fn default_base_package() -> String {
    "github.com/user/app".to_string()
}

pub(crate) fn default_worker_count() -> usize {
    crate::dispatch::DEFAULT_WORKER_COUNT
}

pub(crate) fn default_queue_capacity() -> usize {
    crate::dispatch::DEFAULT_QUEUE_CAPACITY
}

pub(crate) fn default_template() -> String {
    crate::template::DEFAULT_NAME.to_string()
}

pub(crate) fn default_language() -> String {
    "go".to_string()
}

pub(crate) fn default_templates_dir() -> PathBuf {
    PathBuf::from("./templates")
}

pub(crate) fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

pub(crate) fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

pub(crate) fn default_timeout_seconds() -> u64 {
    120
}

pub(crate) fn default_api_key_env() -> String {
    "OPENAI_KEY".to_string()
}
