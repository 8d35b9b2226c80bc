// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, fs, path::Path, str};

use jsonwebtoken::{Algorithm, EncodingKey};
use log::debug;
use p256::pkcs8::EncodePrivateKey as _;
use secrecy::{ExposeSecret as _, SecretVec};
use serde::Deserialize;

use crate::error::{KeyLoad, Result};

/// An unencrypted private key together with the algorithm it signs with.
pub(crate) struct PrivateKey {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
}

impl PrivateKey {
    pub(crate) fn from_pem_file<P: AsRef<Path>>(path: P) -> Result<Self, KeyLoad> {
        let path = path.as_ref();
        let pem = SecretVec::new(fs::read(path).map_err(|source| KeyLoad::PrivateKeyRead {
            path: path.to_owned(),
            source,
        })?);

        Self::from_pem(pem.expose_secret()).ok_or_else(|| KeyLoad::PrivateKeyFormat {
            path: path.to_owned(),
        })
    }

    fn from_pem(pem: &[u8]) -> Option<Self> {
        // The PEM decoder only checks the key's type; signing an empty message
        // makes ring parse the key itself.
        let candidates = [
            (EncodingKey::from_rsa_pem(pem), Algorithm::RS256),
            (EncodingKey::from_ec_pem(pem), Algorithm::ES256),
            (EncodingKey::from_ec_pem(pem), Algorithm::ES384),
        ];
        candidates
            .into_iter()
            .filter_map(|(key, algorithm)| key.ok().map(|key| (key, algorithm)))
            .chain(Self::from_sec1_pem(pem))
            .find(|(key, algorithm)| jsonwebtoken::crypto::sign(&[], key, *algorithm).is_ok())
            .map(|(encoding_key, algorithm)| {
                debug!("Loaded a private key that signs with {:?}", algorithm);
                Self {
                    encoding_key,
                    algorithm,
                }
            })
    }

    /// Rewraps a SEC1 (`EC PRIVATE KEY`) key as PKCS#8, the only EC encoding
    /// the signer reads.
    fn from_sec1_pem(pem: &[u8]) -> Option<(EncodingKey, Algorithm)> {
        let pem = str::from_utf8(pem).ok()?;
        if let Ok(key) = p256::SecretKey::from_sec1_pem(pem) {
            let der = key.to_pkcs8_der().ok()?;
            return Some((EncodingKey::from_ec_der(der.as_bytes()), Algorithm::ES256));
        }
        let key = p384::SecretKey::from_sec1_pem(pem).ok()?;
        let der = key.to_pkcs8_der().ok()?;
        Some((EncodingKey::from_ec_der(der.as_bytes()), Algorithm::ES384))
    }

    pub(crate) fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct KeyRecord {
    kid: Option<String>,
}

/// A JWK set. Only the key identifiers are of interest here.
#[derive(Debug, Deserialize)]
struct PublicKeyDocument {
    keys: Vec<KeyRecord>,
}

/// Reads the key identifier of the first key in the JWK set at `path`.
pub(crate) fn key_id_from_file<P: AsRef<Path>>(path: P) -> Result<String, KeyLoad> {
    let path = path.as_ref();
    let contents = fs::read(path).map_err(|source| KeyLoad::DocumentRead {
        path: path.to_owned(),
        source,
    })?;
    key_id(path, &contents)
}

fn key_id(path: &Path, contents: &[u8]) -> Result<String, KeyLoad> {
    let document: PublicKeyDocument =
        serde_json::from_slice(contents).map_err(|source| KeyLoad::DocumentFormat {
            path: path.to_owned(),
            source,
        })?;

    let first = document
        .keys
        .into_iter()
        .next()
        .ok_or_else(|| KeyLoad::NoKeys {
            path: path.to_owned(),
        })?;
    first.kid.ok_or_else(|| KeyLoad::MissingKeyId {
        path: path.to_owned(),
    })
}

/// Loads the signing key and the identifier a verifier will use to find its
/// public half.
pub(crate) fn load(private_key: &Path, document: &Path) -> Result<(PrivateKey, String), KeyLoad> {
    let key = PrivateKey::from_pem_file(private_key)?;
    let kid = key_id_from_file(document)?;
    Ok((key, kid))
}

#[cfg(test)]
pub(crate) fn testdata<P: AsRef<Path>>(name: P) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}
