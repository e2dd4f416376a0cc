//! Account management command.

use crate::config::Config;
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::{json, Value};
use vsys_core::crypto::{KEY_LENGTH, SIGNATURE_LENGTH};
use vsys_core::{Account, Address, Chain, ChainId, Offline, PublicKey, Signature};

#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    command: AccountCommand,
}

/// Inputs that select one account.
#[derive(Args)]
struct SeedArgs {
    /// Seed phrase
    #[arg(long, env = "VSYS_SEED", hide_env_values = true)]
    seed: String,

    /// Account nonce (defaults to the config file's nonce)
    #[arg(short, long)]
    nonce: Option<u64>,

    /// Chain: mainnet, testnet or a single-character tag
    #[arg(short, long)]
    chain: Option<ChainId>,
}

impl SeedArgs {
    fn chain_id(&self, config: &Config) -> ChainId {
        self.chain.unwrap_or(config.chain)
    }

    fn nonce(&self, config: &Config) -> u64 {
        self.nonce.unwrap_or(config.nonce)
    }
}

#[derive(Subcommand)]
enum AccountCommand {
    /// Derive the key pair and address for a seed and nonce
    Derive {
        #[command(flatten)]
        account: SeedArgs,

        /// Also print the private key
        #[arg(long)]
        show_private: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode and validate an address
    Inspect {
        /// Base-58 address
        address: String,

        /// Require the address to belong to this chain
        #[arg(short, long)]
        chain: Option<ChainId>,
    },
    /// Sign a message with a derived account
    Sign {
        #[command(flatten)]
        account: SeedArgs,

        /// Message to sign
        #[arg(short, long)]
        message: String,

        /// Treat the message as hex
        #[arg(long)]
        hex: bool,
    },
    /// Verify a signature against a public key
    Verify {
        /// Public key (base58 or hex)
        #[arg(short, long)]
        public_key: String,

        /// Signed message
        #[arg(short, long)]
        message: String,

        /// Signature (base58 or hex)
        #[arg(short, long)]
        signature: String,

        /// Treat the message as hex
        #[arg(long)]
        hex: bool,
    },
}

pub fn run(args: AccountArgs, config: &Config) -> Result<()> {
    match args.command {
        AccountCommand::Derive {
            account,
            show_private,
            json,
        } => derive(&account, config, show_private, json),
        AccountCommand::Inspect { address, chain } => inspect(&address, chain),
        AccountCommand::Sign {
            account,
            message,
            hex,
        } => sign(&account, config, &message, hex),
        AccountCommand::Verify {
            public_key,
            message,
            signature,
            hex,
        } => verify(&public_key, &message, &signature, hex),
    }
}

fn message_bytes(message: &str, is_hex: bool) -> Result<Vec<u8>> {
    if is_hex {
        hex::decode(message).context("Invalid hex message")
    } else {
        Ok(message.as_bytes().to_vec())
    }
}

/// Decode key material given as hex or base58.
///
/// Hex wins when it decodes to exactly `len` bytes; anything else is read as
/// base58, which is how `derive` and `sign` print keys and signatures.
fn decode_key_text(text: &str, len: usize, what: &str) -> Result<Vec<u8>> {
    if let Ok(bytes) = hex::decode(text) {
        if bytes.len() == len {
            return Ok(bytes);
        }
    }
    bs58::decode(text)
        .into_vec()
        .with_context(|| format!("Invalid {}: expected base58 or hex", what))
}

fn derive_account<'c>(
    args: &SeedArgs,
    chain: &'c Chain<Offline>,
    nonce: u64,
) -> Result<Account<'c, Offline>> {
    Account::new(chain, args.seed.as_str(), nonce).context("Invalid seed")
}

fn derive_json<C>(account: &Account<'_, C>, show_private: bool) -> Value {
    let key_pair = account.key_pair();
    let mut out = json!({
        "chain": account.chain_id(),
        "nonce": account.nonce(),
        "address": account.address(),
        "public_key": key_pair.public_key().to_base58(),
        "seed_hash": account.seed_hash().to_hex(),
    });
    if show_private {
        out["private_key"] = hex::encode(key_pair.private_key().to_bytes()).into();
    }
    out
}

fn derive(args: &SeedArgs, config: &Config, show_private: bool, json: bool) -> Result<()> {
    let chain = Chain::offline(args.chain_id(config));
    let account = derive_account(args, &chain, args.nonce(config))?;
    let key_pair = account.key_pair();

    if json {
        let out = derive_json(&account, show_private);
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "Derived account:".bold().cyan());
    println!();
    println!("  Chain:       {}", chain.id().to_string().bright_cyan());
    println!("  Nonce:       {}", account.nonce().to_string().bright_cyan());
    println!("  Address:     {}", account.address_base58().bright_yellow());
    println!(
        "  Public Key:  {}",
        key_pair.public_key().to_base58().bright_black()
    );
    println!(
        "  Seed Hash:   {}",
        account.seed_hash().to_hex().bright_black()
    );
    if show_private {
        println!(
            "  Private Key: {}",
            hex::encode(key_pair.private_key().to_bytes()).bright_black()
        );
        println!();
        println!("{}", "Keep your private key safe!".yellow().bold());
    }
    println!();

    Ok(())
}

fn inspect(address_str: &str, chain: Option<ChainId>) -> Result<()> {
    let address = Address::from_base58(address_str)
        .with_context(|| format!("Invalid address: {}", address_str))?;

    if let Some(expected) = chain {
        address.ensure_chain(expected)?;
    }

    let network = address
        .chain_id()
        .name()
        .map(|name| format!(" ({})", name))
        .unwrap_or_default();

    println!();
    println!("{}", "Address Information:".bold().cyan());
    println!();
    println!("  Address:   {}", address.to_base58().bright_yellow());
    println!("  Version:   {}", address.version().to_string().bright_cyan());
    println!(
        "  Chain:     {}{}",
        address.chain_id().to_string().bright_cyan(),
        network
    );
    println!(
        "  Key Hash:  {}",
        hex::encode(address.key_hash()).bright_black()
    );
    println!(
        "  Checksum:  {} {}",
        hex::encode(address.checksum()).bright_black(),
        "✓".green().bold()
    );
    println!();

    Ok(())
}

fn sign(args: &SeedArgs, config: &Config, message: &str, is_hex: bool) -> Result<()> {
    let message = message_bytes(message, is_hex)?;
    let chain = Chain::offline(args.chain_id(config));
    let account = derive_account(args, &chain, args.nonce(config))?;
    let signature = account.sign(&message);

    println!();
    println!("  Address:    {}", account.address_base58().bright_yellow());
    println!(
        "  Public Key: {}",
        account.key_pair().public_key().to_base58().bright_black()
    );
    println!("  Signature:  {}", signature.to_base58().bright_cyan());
    println!("  (hex)       {}", signature.to_hex().bright_black());
    println!();

    Ok(())
}

fn verify(public_key: &str, message: &str, signature: &str, is_hex: bool) -> Result<()> {
    let message = message_bytes(message, is_hex)?;

    let public_key = decode_key_text(public_key, KEY_LENGTH, "public key")?;
    let public_key = PublicKey::from_slice(&public_key).context("Invalid public key")?;

    let signature = decode_key_text(signature, SIGNATURE_LENGTH, "signature")?;
    let signature = Signature::from_slice(&signature).context("Invalid signature")?;

    if public_key.verify(&message, &signature).is_err() {
        bail!("Signature does not match message and public key");
    }

    println!("{}  Signature is valid", "✓".green().bold());
    Ok(())
}
