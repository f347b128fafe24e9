use std::fs;
use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

pub const TOKEN_URI: &str = "https://accounts.google.com/o/oauth2/token";
pub const SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const TOKEN_TTL_SECS: i64 = 3600;

/// Service-account identity used to sign the token request.
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key_pem: Vec<u8>,
}

impl ServiceAccountKey {
    pub fn load(client_email: &str, key_file: &Path) -> Result<Self> {
        let private_key_pem = fs::read(key_file)?;
        Ok(Self {
            client_email: client_email.to_string(),
            private_key_pem,
        })
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a signed JWT assertion for a bearer token. Called once at client
/// construction; the token is cached for the client's lifetime.
pub(crate) fn fetch_access_token(
    http: &reqwest::blocking::Client,
    key: &ServiceAccountKey,
) -> Result<String> {
    let signing_key = EncodingKey::from_rsa_pem(&key.private_key_pem)
        .map_err(|err| ClientError::Auth(format!("invalid private key: {err}")))?;
    let now = Utc::now().timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPE,
        aud: TOKEN_URI,
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };
    let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
        .map_err(|err| ClientError::Auth(format!("sign token request: {err}")))?;

    let response = http
        .post(TOKEN_URI)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ])
        .send()?;
    if !response.status().is_success() {
        return Err(ClientError::Auth(format!(
            "token endpoint returned {}",
            response.status()
        )));
    }
    let token: TokenResponse = response
        .json()
        .map_err(|err| ClientError::Auth(format!("malformed token response: {err}")))?;
    Ok(token.access_token)
}
