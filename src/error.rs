// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, path::PathBuf, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("key loading error: {0}")]
    KeyLoad(#[from] KeyLoad),
    #[error("token signing error: {0}")]
    Signing(#[from] Signing),
    #[error("probe failed: {0}")]
    Probe(#[from] Probe),
}

#[derive(Error, Debug)]
pub(crate) enum KeyLoad {
    #[error("could not read private key {}: {source}", .path.display())]
    PrivateKeyRead { path: PathBuf, source: io::Error },
    #[error("{} is not an unencrypted RSA or EC private key in PEM format", .path.display())]
    PrivateKeyFormat { path: PathBuf },
    #[error("could not read public key document {}: {source}", .path.display())]
    DocumentRead { path: PathBuf, source: io::Error },
    #[error("public key document {} is not a valid JWK set: {source}", .path.display())]
    DocumentFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("public key document {} does not contain any keys", .path.display())]
    NoKeys { path: PathBuf },
    #[error(r#"the first key in public key document {} has no "kid""#, .path.display())]
    MissingKeyId { path: PathBuf },
}

#[derive(Error, Debug)]
pub(crate) enum Signing {
    #[error("requested signing algorithm {requested:?} cannot be used with a {key:?} key")]
    AlgorithmMismatch {
        requested: jsonwebtoken::Algorithm,
        key: jsonwebtoken::Algorithm,
    },
    #[error("could not encode token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Error, Debug)]
pub(crate) enum Probe {
    #[error("endpoint rejected the request with status {status}: {}", String::from_utf8_lossy(.body).trim_end())]
    EndpointRejected {
        status: reqwest::StatusCode,
        body: Vec<u8>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
