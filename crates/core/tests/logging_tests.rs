// ═══════════════════════════════════════════════════════════════════
// Logging Tests — LoggingConfig, init_logging
// ═══════════════════════════════════════════════════════════════════

use apex_wealth_core::errors::CoreError;
use apex_wealth_core::logging::{init_logging, LoggingConfig};

#[test]
fn default_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.log_level, "info");
    assert!(config.ansi);
}

// One test installs the global subscriber, so the "already installed"
// path is checked in the same test.
#[test]
fn init_once_then_rejects_second_subscriber() {
    let bad = LoggingConfig {
        log_level: "apex=notalevel".into(),
        ansi: false,
    };
    assert!(matches!(init_logging(&bad), Err(CoreError::ValidationError(_))));

    let config = LoggingConfig {
        log_level: "debug".into(),
        ansi: false,
    };
    init_logging(&config).unwrap();
    assert!(init_logging(&config).is_err());
}
