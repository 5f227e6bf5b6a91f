//! Driver for the external forced-inclusion submission tool.
//!
//! The tool is an opaque container image; its only contract with the
//! harness is printing the L1 transaction hash of the submission on its
//! output stream.

use crate::HarnessError;
use alloy_primitives::B256;
use regex::Regex;
use std::{process::Command, sync::LazyLock};

/// The forced inclusion toolbox image.
pub const TOOLBOX_IMAGE: &str = "nethswitchboard/taiko-forced-inclusion-toolbox";

static TX_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"hash=(0x[a-fA-F0-9]{64})").expect("valid regex"));

/// Submits one forced inclusion through the toolbox, at `nonce_delta` above
/// the sender's current nonce, and returns the L1 transaction hash reported
/// on its output.
pub fn send_forced_inclusion(nonce_delta: u64) -> Result<B256, HarnessError> {
    let output = Command::new("docker")
        .args([
            "run",
            "--network",
            "host",
            "--env-file",
            ".env",
            "--rm",
            TOOLBOX_IMAGE,
            "send",
            "--nonce-delta",
            &nonce_delta.to_string(),
        ])
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(HarnessError::Toolbox(stderr.trim().to_string()));
    }
    if !stderr.trim().is_empty() {
        tracing::debug!(target: "preconf::harness", %stderr, "toolbox stderr");
    }

    let hash = extract_tx_hash(&stdout).ok_or(HarnessError::ToolboxOutput)?;
    tracing::info!(target: "preconf::harness", %hash, nonce_delta, "forced inclusion submitted");
    Ok(hash)
}

/// Extracts the first `hash=0x…` transaction hash from the toolbox output.
pub(crate) fn extract_tx_hash(output: &str) -> Option<B256> {
    let captured = TX_HASH_RE.captures(output)?.get(1)?;
    captured.as_str().parse().ok()
}
