use std::env;

use pretty_assertions::assert_eq;
use serial_test::serial;

use ems_be::Config;

const VARS: &[&str] = &[
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRATION_DAYS",
    "HOST",
    "PORT",
    "ENVIRONMENT",
];

fn snapshot() -> Vec<(&'static str, Option<String>)> {
    VARS.iter().map(|&key| (key, env::var(key).ok())).collect()
}

fn restore(saved: Vec<(&'static str, Option<String>)>) {
    for (key, value) in saved {
        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }
    }
}

#[test]
#[serial]
fn defaults_apply_when_nothing_is_set() {
    let saved = snapshot();
    for key in VARS {
        unsafe { env::remove_var(key) };
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.database_url, "postgres://@localhost:5432/ems");
    assert_eq!(config.jwt_expiration_days, 30);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.environment, "development");
    assert!(config.is_development());
    assert!(!config.is_production());

    restore(saved);
}

#[test]
#[serial]
fn environment_overrides_win() {
    let saved = snapshot();

    unsafe {
        env::set_var("DATABASE_URL", "postgres://ems:secret@db:5432/ems_prod");
        env::set_var("JWT_SECRET", "another-secret");
        env::set_var("JWT_EXPIRATION_DAYS", "7");
        env::set_var("HOST", "0.0.0.0");
        env::set_var("PORT", "9000");
        env::set_var("ENVIRONMENT", "production");
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.database_url, "postgres://ems:secret@db:5432/ems_prod");
    assert_eq!(config.jwt_secret, "another-secret");
    assert_eq!(config.jwt_expiration_days, 7);
    assert_eq!(config.server_address(), "0.0.0.0:9000");
    assert!(config.is_production());

    restore(saved);
}

#[test]
#[serial]
fn unparsable_numbers_fall_back_to_defaults() {
    let saved = snapshot();

    unsafe {
        env::set_var("JWT_EXPIRATION_DAYS", "soon");
        env::set_var("PORT", "not-a-port");
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.jwt_expiration_days, 30);
    assert_eq!(config.port, 8080);

    restore(saved);
}
