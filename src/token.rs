// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, Header};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{Result, Signing},
    key::PrivateKey,
    metadata,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) iss: String,
    pub(crate) iat: i64,
    pub(crate) nbf: i64,
    pub(crate) exp: i64,
    pub(crate) jti: Uuid,
    pub(crate) scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) aud: Option<String>,
}

/// A serialized token. Kept out of `Debug` output.
#[derive(Debug)]
pub(crate) struct Credential(SecretString);

impl Credential {
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Builds a token bound to one key. Nothing is signed until [`serialize`].
///
/// [`serialize`]: Token::serialize
#[derive(Debug)]
pub(crate) struct Token<'key> {
    key: &'key PrivateKey,
    kid: String,
    algorithm: Option<Algorithm>,
    scope: String,
    audience: Option<String>,
    lifetime: Duration,
}

impl<'key> Token<'key> {
    pub(crate) fn new(key: &'key PrivateKey, kid: String) -> Self {
        Self {
            key,
            kid,
            algorithm: None,
            scope: metadata::DEFAULT_SCOPE.to_owned(),
            audience: None,
            lifetime: Duration::seconds(i64::from(metadata::DEFAULT_LIFETIME_SECS)),
        }
    }

    pub(crate) fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// `None` leaves the `aud` claim out entirely, which is not the same as an
    /// empty audience.
    pub(crate) fn audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }

    pub(crate) fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Overrides the algorithm that would otherwise be derived from the key.
    pub(crate) fn algorithm(mut self, algorithm: Option<Algorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    fn claims(&self, issuer: &str) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            iss: issuer.to_owned(),
            iat: now,
            nbf: now,
            exp: now + self.lifetime.num_seconds(),
            jti: Uuid::new_v4(),
            scope: self.scope.clone(),
            aud: self.audience.clone(),
        }
    }

    pub(crate) fn serialize(&self, issuer: &str) -> Result<Credential, Signing> {
        let algorithm = match self.algorithm {
            Some(requested) if requested != self.key.algorithm() => {
                return Err(Signing::AlgorithmMismatch {
                    requested,
                    key: self.key.algorithm(),
                })
            }
            Some(requested) => requested,
            None => self.key.algorithm(),
        };

        let mut header = Header::new(algorithm);
        header.kid = Some(self.kid.clone());

        let token = jsonwebtoken::encode(&header, &self.claims(issuer), self.key.encoding_key())?;
        Ok(Credential(SecretString::new(token)))
    }
}
