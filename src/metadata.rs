// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) const DEFAULT_PRIVATE_KEY: &str = "private.pem";
pub(crate) const DEFAULT_URL: &str = "http://localhost:8080/tmp/random.txt";
pub(crate) const DEFAULT_ISSUER: &str = "https://localhost";
pub(crate) const DEFAULT_SCOPE: &str = "read:/";
pub(crate) const DEFAULT_LIFETIME_SECS: u32 = 600;

/// Where the HTTP server and the XRootD HTTP plugin write their logs, in the
/// order they are searched.
pub(crate) const DEFAULT_LOG_DIRS: [&str; 2] = ["/var/log/httpd", "/var/log/xrootd/http"];
pub(crate) const DEFAULT_TAIL_LINES: usize = 50;
