use super::load_config;
use super::settings::{PartialNotifierSettings, PartialServerSettings, PartialSettings, Settings};
use config::ConfigError;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const REQUIRED: [(&str, Option<&str>); 3] = [
    ("RELAY__NOTIFIER__OPERATOR_EMAIL", Some("owner@example.com")),
    ("RELAY__NOTIFIER__API_TOKEN", Some("mail-token")),
    ("RELAY__GENERATOR__API_KEY", Some("gen-key")),
];

/// Runs `f` with the current directory switched to an empty temp dir.
fn in_temp_dir<T>(f: impl FnOnce(&TempDir) -> T) -> T {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");
    let out = f(&tmp);
    env::set_current_dir(orig).expect("restore cwd");
    out
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.ws_port, 8080);
    assert_eq!(settings.server.http_port, 5001);
    assert_eq!(settings.chat.human_tag, "User");
    assert_eq!(settings.chat.bot_tag, "AI");
    assert_eq!(settings.store.path, "chat_db");
    assert_eq!(settings.ws_addr(), "127.0.0.1:8080");
}

#[test]
fn defaults_are_missing_credentials() {
    let settings = Settings::default();
    assert_eq!(settings.missing_required(), Some("notifier.operator_email"));
}

#[test]
fn merge_only_overrides_given_fields() {
    let partial = PartialSettings {
        server: Some(PartialServerSettings {
            ws_port: Some(9999),
            ..Default::default()
        }),
        notifier: Some(PartialNotifierSettings {
            operator_email: Some("ops@example.com".into()),
            api_token: Some("t".into()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let merged = Settings::default().merge(partial);
    assert_eq!(merged.server.ws_port, 9999);
    assert_eq!(merged.server.http_port, 5001);
    assert_eq!(merged.notifier.operator_email, "ops@example.com");
    assert_eq!(merged.notifier.from_address, "noreply@localhost");
    assert_eq!(merged.missing_required(), Some("generator.api_key"));
}

#[test]
#[serial]
fn load_config_refuses_without_credentials() {
    in_temp_dir(|_| {
        temp_env::with_vars_unset(REQUIRED.map(|(k, _)| k), || {
            match load_config() {
                Err(ConfigError::NotFound(key)) => assert_eq!(key, "notifier.operator_email"),
                other => panic!("expected NotFound, got {other:?}"),
            }
        });
    });
}

#[test]
#[serial]
fn load_config_reads_environment() {
    in_temp_dir(|_| {
        let mut vars = REQUIRED.to_vec();
        vars.push(("RELAY__SERVER__HTTP_PORT", Some("7001")));
        vars.push(("RELAY__CHAT__BOT_TAG", Some("Bot")));

        temp_env::with_vars(vars, || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.http_port, 7001);
            assert_eq!(cfg.chat.bot_tag, "Bot");
            assert_eq!(cfg.notifier.operator_email, "owner@example.com");
            assert_eq!(cfg.generator.api_key, "gen-key");
        });
    });
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    in_temp_dir(|_| {
        fs::create_dir_all("config").expect("create config dir");
        let toml = r#"
            [server]
            host = "0.0.0.0"
            ws_port = 9000

            [store]
            path = "/var/lib/relay"

            [notifier]
            operator_email = "file@example.com"
            api_token = "file-token"

            [generator]
            api_key = "file-key"
        "#;
        fs::write("config/default.toml", toml).expect("write config file");

        temp_env::with_vars_unset(REQUIRED.map(|(k, _)| k), || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.host, "0.0.0.0");
            assert_eq!(cfg.server.ws_port, 9000);
            assert_eq!(cfg.server.http_port, 5001);
            assert_eq!(cfg.store.path, "/var/lib/relay");
            assert_eq!(cfg.notifier.operator_email, "file@example.com");
        });
    });
}
