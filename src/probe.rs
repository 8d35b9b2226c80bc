// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, info};
use url::Url;

use crate::{error::Probe as ProbeError, token::Credential};

/// Sends a single authenticated GET. There are no retries.
#[derive(Debug)]
pub(crate) struct Probe {
    client: reqwest::Client,
    url: Url,
}

impl Probe {
    pub(crate) fn new(url: Url) -> Result<Self, ProbeError> {
        // Proxy settings from the environment are ignored.
        Ok(Self {
            client: reqwest::Client::builder().no_proxy().build()?,
            url,
        })
    }

    pub(crate) async fn fetch(&self, credential: &Credential) -> Result<Vec<u8>, ProbeError> {
        debug!("Requesting {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .bearer_auth(credential.expose())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        info!("{} answered with status {}", self.url, status);

        if status.is_success() {
            Ok(body)
        } else {
            Err(ProbeError::EndpointRejected { status, body })
        }
    }
}
