// Command-line front end for bcrypt_kit: generate salts, hash and verify passwords.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::io::{self, Write};

use bcrypt_kit::{SaltSource, DEFAULT_COST};
use clap::{Parser, Subcommand};
use rpassword::read_password;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "bcrypt-kit", version, about = "bcrypt password hashing")]
struct Cli {
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a salt
    Salt {
        #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_COST)]
        cost: u32,
    },
    /// Hash a password
    Hash {
        #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_COST)]
        cost: u32,
        /// Existing salt (or hash) to reuse; takes precedence over --cost
        #[arg(long)]
        salt: Option<String>,
        /// Password to hash; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Report progress on stderr
        #[arg(long)]
        progress: bool,
    },
    /// Check a password against a hash
    Verify {
        hash: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Print the cost recorded in a hash
    Rounds { hash: String },
    /// Print the salt prefix of a hash
    GetSalt { hash: String },
    /// Report whether a password is longer than 72 bytes
    Truncates {
        #[arg(long)]
        password: Option<String>,
    },
    /// Encode hex bytes with the bcrypt base64 alphabet
    Encode64 {
        hex: String,
        /// Number of bytes to encode (defaults to all)
        #[arg(long)]
        len: Option<usize>,
    },
    /// Decode bcrypt base64 into hex bytes
    Decode64 {
        text: String,
        #[arg(long)]
        len: usize,
    },
}

fn init_tracing(log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "bcrypt_kit=warn".into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

// Read password securely (without displaying it) unless given on the command line
fn password_or_prompt(password: Option<String>, prompt: &str) -> io::Result<Zeroizing<String>> {
    if let Some(password) = password {
        return Ok(Zeroizing::new(password));
    }
    eprint!("{prompt}");
    io::stderr().flush()?;
    Ok(Zeroizing::new(read_password()?))
}

fn parse_hex(hex: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if hex.len() % 2 != 0 {
        return Err("hex input must have an even number of digits".into());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| -> Result<u8, Box<dyn std::error::Error>> {
            hex.get(i..i + 2)
                .ok_or_else(|| "hex input must be ASCII".into())
                .and_then(|pair| u8::from_str_radix(pair, 16).map_err(Into::into))
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Salt { cost } => {
            println!("{}", bcrypt_kit::generate_salt(cost)?);
        }
        Command::Hash {
            cost,
            salt,
            password,
            progress,
        } => {
            let password = password_or_prompt(password, "Enter password to hash: ")?;
            let source = match salt.as_deref() {
                Some(text) => SaltSource::Text(text),
                None => SaltSource::Cost(cost),
            };
            let hashed = if progress {
                let hashed = bcrypt_kit::hash_with_progress(&password, source, |p| {
                    eprint!("\r{:>5.1}%", p * 100.0);
                })?;
                eprintln!();
                hashed
            } else {
                bcrypt_kit::hash(&password, source)?
            };
            println!("{hashed}");
        }
        Command::Verify { hash, password } => {
            let password = password_or_prompt(password, "Enter password to verify: ")?;
            let is_valid = bcrypt_kit::compare(&password, &hash)?;
            println!("{}", if is_valid { "success" } else { "failed" });
            if !is_valid {
                std::process::exit(1);
            }
        }
        Command::Rounds { hash } => {
            println!("{}", bcrypt_kit::get_rounds(&hash)?);
        }
        Command::GetSalt { hash } => {
            println!("{}", bcrypt_kit::get_salt(&hash)?);
        }
        Command::Truncates { password } => {
            let password = password_or_prompt(password, "Enter password: ")?;
            println!("{}", bcrypt_kit::truncates(&password));
        }
        Command::Encode64 { hex, len } => {
            let bytes = parse_hex(&hex)?;
            println!(
                "{}",
                bcrypt_kit::encode_base64(&bytes, len.unwrap_or(bytes.len()))?
            );
        }
        Command::Decode64 { text, len } => {
            let bytes = bcrypt_kit::decode_base64(&text, len)?;
            let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            println!("{hex}");
        }
    }

    Ok(())
}
