// ============================================
// File: crates/datachan-cli/src/main.rs
// ============================================
//! # datachan Entry Point
//!
//! ## Creation Reason
//! Command-line front end for the data-channel codec: generate a matched
//! pair of channel configs, then seal, open and inspect frames with them.
//!
//! ## Usage
//! ```bash
//! # Generate configs for both endpoints
//! datachan keygen --cipher AES-256-GCM --peer-id 7 --out a.toml --peer-out b.toml
//!
//! # Seal on one side, open on the other
//! FRAME=$(datachan seal --config a.toml --packet-id 1 --text ping)
//! datachan open --config b.toml "$FRAME"
//!
//! # Other commands
//! datachan validate --config a.toml   # Check a config file
//! datachan inspect "$FRAME"           # Parse the header, no keys needed
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Results go to stdout, logs and errors to stderr
//! - A packet id must never be reused with the same config; this tool
//!   does not track counters
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use datachan_cli::{ChannelConfig, CliError};
use datachan_common::types::PACKET_ID_SIZE;
use datachan_common::{KeyId, PacketId, PeerId};
use datachan_core::crypto::CipherSuite;
use datachan_core::protocol::{compression, Header, PlainRecord};
use datachan_core::CoreError;

// ============================================
// CLI Definition
// ============================================

/// Data-channel AEAD codec tool
#[derive(Parser, Debug)]
#[command(name = "datachan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate random keys for both endpoints of a channel
    ///
    /// Writes this endpoint's config to --out and the other endpoint's
    /// (directions swapped) to --peer-out.
    Keygen {
        /// AEAD suite (AES-128-GCM, AES-192-GCM, AES-256-GCM)
        #[arg(long, default_value = "AES-256-GCM")]
        cipher: CipherSuite,

        /// Key id written into headers (0-31)
        #[arg(long, default_value_t = 0)]
        key_id: u8,

        /// Peer id (0-16777214, 16777215 is reserved); enables 4-byte headers
        #[arg(long)]
        peer_id: Option<u32>,

        /// Path for this endpoint's config
        #[arg(short, long)]
        out: PathBuf,

        /// Path for the other endpoint's config
        #[arg(long)]
        peer_out: PathBuf,
    },

    /// Validate a channel config file
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Seal a payload and print the frame as hex
    #[command(group(ArgGroup::new("payload").required(true).args(["text", "hex"])))]
    Seal {
        /// Path to configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Packet id (must be unique per key)
        #[arg(long)]
        packet_id: u32,

        /// Compression tag byte (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0", value_parser = parse_byte)]
        compression: u8,

        /// Payload as UTF-8 text
        #[arg(long)]
        text: Option<String>,

        /// Payload as hex
        #[arg(long)]
        hex: Option<String>,
    },

    /// Authenticate and decrypt a hex frame
    Open {
        /// Path to configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Frame as hex
        frame: String,
    },

    /// Print the header of a hex frame without keys
    Inspect {
        /// Frame as hex
        frame: String,
    },
}

// ============================================
// Main
// ============================================

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = match cli.command {
        Commands::Keygen {
            cipher,
            key_id,
            peer_id,
            out,
            peer_out,
        } => cmd_keygen(cipher, key_id, peer_id, &out, &peer_out),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Seal {
            config,
            packet_id,
            compression,
            text,
            hex,
        } => cmd_seal(&config, packet_id, compression, text, hex),
        Commands::Open { config, frame } => cmd_open(&config, &frame),
        Commands::Inspect { frame } => cmd_inspect(&frame),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("error [{}]: {:#}", error_kind(&e), e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Generates a matched pair of configs.
fn cmd_keygen(
    cipher: CipherSuite,
    key_id: u8,
    peer_id: Option<u32>,
    out: &Path,
    peer_out: &Path,
) -> anyhow::Result<()> {
    init_logging("warn");

    let key_id = KeyId::new(key_id).map_err(CliError::from)?;
    let peer_id = peer_id.map(PeerId::new).transpose().map_err(CliError::from)?;
    if peer_id.is_some_and(|id| id.is_undefined()) {
        return Err(CliError::invalid_input(format!(
            "peer id {} is reserved; omit --peer-id for 1-byte headers",
            PeerId::UNDEFINED
        ))
        .into());
    }

    let local = ChannelConfig::generate(cipher, key_id, peer_id);
    let remote = local.mirrored();

    local
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    remote
        .save(peer_out)
        .with_context(|| format!("writing {}", peer_out.display()))?;

    info!(%cipher, %key_id, ?peer_id, "Generated channel keys");

    println!("cipher:    {cipher}");
    println!("key_id:    {key_id}");
    println!("header:    {}", describe_variant(&local));
    println!("local:     {}", out.display());
    println!("peer:      {}", peer_out.display());
    Ok(())
}

/// Validates a config file.
fn cmd_validate(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let codec = config.build_codec()?;

    println!("Configuration is valid");
    println!("cipher:    {}", config.cipher);
    println!("key_id:    {}", config.key_id);
    println!("header:    {}", describe_variant(&config));
    println!("overhead:  {} bytes", codec.overhead());
    Ok(())
}

/// Seals a payload.
fn cmd_seal(
    config_path: &Path,
    packet_id: u32,
    compression_tag: u8,
    text: Option<String>,
    hex_payload: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let codec = config.build_codec()?;

    let payload = match (text, hex_payload) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(h)) => decode_hex("payload", &h)?,
        (None, None) => return Err(CliError::invalid_input("one of --text or --hex is required").into()),
    };

    let record = PlainRecord::new(compression_tag, payload);
    let frame = codec.encode_record(config.key_id, PacketId::new(packet_id), &record)?;

    debug!(packet_id, len = frame.len(), "Sealed frame");
    println!("{}", hex::encode(frame));
    Ok(())
}

/// Opens a frame.
fn cmd_open(config_path: &Path, frame_hex: &str) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let codec = config.build_codec()?;
    let frame = decode_hex("frame", frame_hex)?;

    let packet = codec.decode_packet(&frame)?;
    let record = PlainRecord::unwrap(&packet.payload)?;

    println!("packet_id:    {}", packet.packet_id);
    println!("key_id:       {}", packet.key_id);
    println!("compression:  {}", describe_compression(record.compression));
    println!("payload_hex:  {}", hex::encode(&record.payload));
    if let Ok(text) = std::str::from_utf8(&record.payload) {
        println!("payload_text: {text}");
    }
    Ok(())
}

/// Prints a frame's header.
fn cmd_inspect(frame_hex: &str) -> anyhow::Result<()> {
    init_logging("warn");

    let frame = decode_hex("frame", frame_hex)?;
    let header = Header::peek(&frame)?;
    let header_len = header.encoded_len();

    println!("packet_type:  {}", header.packet_type);
    println!("key_id:       {}", header.key_id);
    match header.peer_id {
        Some(peer_id) => println!("peer_id:      {peer_id}"),
        None => println!("peer_id:      -"),
    }
    println!("header_len:   {header_len}");

    if let Some(id_bytes) = frame.get(header_len..header_len + PACKET_ID_SIZE) {
        let mut buf = [0u8; PACKET_ID_SIZE];
        buf.copy_from_slice(id_bytes);
        println!("packet_id:    {}", PacketId::from_be_bytes(buf));
        println!("sealed_len:   {}", frame.len() - header_len - PACKET_ID_SIZE);
    }
    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

/// Loads a config and starts logging at its level.
fn load_config(path: &Path) -> anyhow::Result<ChannelConfig> {
    let config = ChannelConfig::load(path)?;
    init_logging(&config.logging.level);
    debug!(path = %path.display(), cipher = %config.cipher, "Configuration loaded");
    Ok(config)
}

fn decode_hex(what: &str, input: &str) -> Result<Vec<u8>, CliError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(cleaned).map_err(|e| CliError::invalid_input(format!("{what} is not valid hex: {e}")))
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("'{s}' is not a byte value: {e}"))
}

fn describe_variant(config: &ChannelConfig) -> String {
    match config.peer_id.filter(|id| !id.is_undefined()) {
        Some(peer_id) => format!("V2 (4-byte, peer_id {peer_id})"),
        None => "V1 (1-byte, no peer id)".to_string(),
    }
}

fn describe_compression(tag: u8) -> String {
    match tag {
        compression::NONE => "0x00 (none)".to_string(),
        compression::STUB => "0xfb (stub)".to_string(),
        other => format!("{other:#04x}"),
    }
}

/// Finds the codec error category anywhere in the error chain.
fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return core.kind();
        }
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.kind();
        }
    }
    "Error"
}
