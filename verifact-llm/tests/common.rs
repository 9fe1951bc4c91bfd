use std::sync::OnceLock;

use verifact_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "verifact-llm-tests".to_string(),
            log_dir: Some(std::env::temp_dir().join("verifact-tests")),
            emit_stderr: true,
            format: if std::env::var("VERIFACT_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        verifact_common::observability::init_logging(config).unwrap_or_default()
    });
}
