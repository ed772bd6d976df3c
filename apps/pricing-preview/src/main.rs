//! # resello-preview
//!
//! ```text
//! $ echo '{"command":"order_totals","items":[...]}' | resello-preview
//! ```
//!
//! Exit code 0 with the response on stdout, or exit code 1 with an
//! `{ "code", "message" }` document on stdout.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

use resello_preview::error::ApiError;
use resello_preview::{config, init_tracing, run};

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;

    let result = config::load().map_err(ApiError::from).and_then(|config| {
        info!(currency = %config.currency, proration = ?config.proration, "Configuration loaded");
        run(&input, &config, Utc::now())
    });

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(code = ?err.code, "{}", err.message);
            println!("{}", serde_json::to_string(&err)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
