use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use ems_be::database::models::UserRole;
use ems_be::services::Claims;
use ems_be::Config;

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://@localhost:5432/ems_test".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_days: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    }
}

/// Mint a bearer token for an arbitrary user with the given role, signed
/// with the test config's secret.
pub fn mint_token(config: &Config, role: UserRole) -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        role,
        exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .expect("token encoding")
}
