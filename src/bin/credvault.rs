// src/bin/credvault.rs
//! Operator tool for credential tokens
//!
//! Usage:
//!   credvault status
//!   credvault encrypt [VALUE]            (prompts when VALUE is omitted)
//!   credvault decrypt [--recovery] TOKEN
//!   credvault tier TOKEN
//!   credvault reset-key --confirm

use anyhow::{bail, Context, Result};
use credential_vault::{load_config, logging, token, TieredEncryptor};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = load_config();
    logging::init(config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let encryptor = TieredEncryptor::from_config(config)
        .context("Failed to initialise the encryptor; check keystore settings")?;

    match args.first().map(String::as_str) {
        Some("status") => {
            println!("keystore backend : {}", encryptor.primary().backend_name());
            println!("primary key      : {}", availability(encryptor.is_primary_key_available()));
            println!("recovery mode    : {}", on_off(encryptor.is_recovery_mode_active()));
        }
        Some("encrypt") => {
            let value = match args.get(1) {
                Some(v) => v.clone(),
                None => {
                    eprint!("Value to encrypt: ");
                    rpassword::read_password().context("Failed to read value")?
                }
            };
            let token = encryptor.encrypt(&value);
            if token::is_emergency(&token) {
                warn!("no encryption tier was available, output is NOT encrypted");
            }
            println!("{token}");
        }
        Some("decrypt") => {
            let (recovery, token) = match (args.get(1).map(String::as_str), args.get(2)) {
                (Some("--recovery"), Some(token)) => (true, token),
                (Some(token), None) if token != "--recovery" => (false, &args[1]),
                _ => bail!("usage: credvault decrypt [--recovery] TOKEN"),
            };
            encryptor.set_recovery_mode(recovery || encryptor.is_recovery_mode_active());
            let plaintext = encryptor
                .decrypt(token)
                .context("Could not unlock this value; try --recovery")?;
            println!("{plaintext}");
        }
        Some("tier") => {
            let token = args.get(1).context("usage: credvault tier TOKEN")?;
            match encryptor.token_tier(token) {
                Some(tier) if tier.is_protected() => println!("{tier}"),
                Some(tier) => println!("{tier} (NOT encrypted)"),
                None => bail!("not a recognised token"),
            }
        }
        Some("reset-key") => {
            if args.get(1).map(String::as_str) != Some("--confirm") {
                bail!("reset-key destroys the primary key; re-run with --confirm");
            }
            if encryptor.reset_encryption_key() {
                info!("primary key deleted; primary-tier tokens are no longer readable by it");
            } else {
                println!("no primary key to delete");
            }
        }
        _ => {
            eprintln!("usage: credvault <status|encrypt|decrypt|tier|reset-key> ...");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable"
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
