// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod diagnostics;
mod error;
mod key;
mod metadata;
mod probe;
#[cfg(test)]
mod testutil;
mod token;

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
    str::FromStr as _,
};

use clap::{ArgAction, Parser};
use error::Result;
use jsonwebtoken::Algorithm;
use log::{error, info};
use url::Url;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The JWK set holding the public key that verifies the token. The "kid"
    /// of its first key is placed in the token header.
    #[arg(value_name = "PUBJWK", value_hint = clap::ValueHint::FilePath)]
    pubjwk: PathBuf,

    /// Insert an audience claim. Without this option the token has no "aud"
    /// claim at all.
    #[arg(long)]
    aud: Option<String>,

    /// Do not print logs, the token, or server log excerpts.
    #[arg(long = "nolog", action = ArgAction::SetFalse)]
    log: bool,

    /// The unencrypted PEM private key to sign the token with.
    #[arg(long, env = "TOKENPROBE_PRIVATE_KEY", default_value = metadata::DEFAULT_PRIVATE_KEY, value_hint = clap::ValueHint::FilePath)]
    private_key: PathBuf,

    /// The protected resource to request.
    #[arg(long, env = "TOKENPROBE_URL", default_value = metadata::DEFAULT_URL, value_parser = Url::parse)]
    url: Url,

    /// The issuer claim.
    #[arg(long, default_value = metadata::DEFAULT_ISSUER)]
    issuer: String,

    /// The scope claim.
    #[arg(long, default_value = metadata::DEFAULT_SCOPE)]
    scope: String,

    /// The signing algorithm. Defaults to the one the private key supports.
    #[arg(long, value_parser = Algorithm::from_str)]
    alg: Option<Algorithm>,

    /// How long the token stays valid, in seconds.
    #[arg(long, default_value_t = metadata::DEFAULT_LIFETIME_SECS)]
    lifetime: u32,

    /// A directory to search for server logs when the request fails. May be
    /// given more than once; directories are searched in order.
    #[arg(long = "log-dir", value_name = "DIR", default_values = metadata::DEFAULT_LOG_DIRS, value_hint = clap::ValueHint::DirPath)]
    log_dirs: Vec<PathBuf>,

    /// How many trailing lines of each log file to print.
    #[arg(long, default_value_t = metadata::DEFAULT_TAIL_LINES)]
    tail_lines: usize,
}

impl Args {
    fn diagnostics(&self) -> diagnostics::Config {
        diagnostics::Config {
            enabled: self.log,
            directories: self.log_dirs.clone(),
            tail_lines: self.tail_lines,
        }
    }
}

/// Requests the resource and writes the body to `stdout`. A failed request
/// has its server logs written to `stderr` before the failure is returned.
async fn deliver<F, O, E>(
    probe: &probe::Probe,
    credential: &token::Credential,
    harvester: &diagnostics::Harvester<F>,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<()>
where
    F: diagnostics::FileSystem,
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let body = probe
        .fetch(credential)
        .await
        .map_err(|e| harvester.observe(e, stderr))?;
    stdout.write_all(&body)?;
    stdout.flush()?;
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let (key, kid) = key::load(&args.private_key, &args.pubjwk)?;
    let credential = token::Token::new(&key, kid)
        .scope(args.scope.as_str())
        .audience(args.aud.clone())
        .algorithm(args.alg)
        .lifetime(chrono::Duration::seconds(i64::from(args.lifetime)))
        .serialize(&args.issuer)?;
    info!("Serialized token: {}", credential.expose());

    let probe = probe::Probe::new(args.url.clone())?;
    let harvester = diagnostics::Harvester::new(args.diagnostics(), diagnostics::Local);
    deliver(
        &probe,
        &credential,
        &harvester,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let logger_env = env_logger::Env::new()
        .filter_or("TOKENPROBE_LOG", if args.log { "info" } else { "error" })
        .write_style("TOKENPROBE_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(args).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
