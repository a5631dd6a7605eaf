use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use omni_qr::{
    ContentPayload, DotStyle, EmailPayload, ErrorCorrectionLevel, ExportFormat, SmsPayload,
    TelPayload, VCardPayload, WifiAuth, WifiPayload,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "omnitools",
    about = "QR codes, passwords and IP info from the command line",
    version = env!("CARGO_PKG_VERSION"),
    long_about = "A small tool suite: a QR code generator with styling and export, \
                  a secure password generator, and a public IP / network info viewer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (overrides the configured default)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Encode content into a styled QR code
    Qr(QrArgs),

    /// Generate secure random passwords
    Password(PasswordArgs),

    /// Show public IP, location and provider information
    IpInfo(IpInfoArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
pub struct QrArgs {
    #[command(subcommand)]
    pub content: QrContent,

    /// Output file (defaults to fancy-qr.<format>)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Image format; inferred from --output when omitted
    #[arg(long, value_name = "png|svg")]
    pub image_format: Option<ExportFormat>,

    /// Export size in pixels (128-2048)
    #[arg(long)]
    pub size: Option<u32>,

    /// Quiet zone around the code in pixels
    #[arg(long)]
    pub margin: Option<u32>,

    /// Error correction level (L, M, Q, H)
    #[arg(long, value_name = "LEVEL")]
    pub ec_level: Option<ErrorCorrectionLevel>,

    /// Pick the error correction level from logo and size
    #[arg(long, conflicts_with = "ec_level")]
    pub recommended_ec: bool,

    /// Module shape (square, dots, rounded, extra-rounded, classy, classy-rounded)
    #[arg(long)]
    pub dots: Option<DotStyle>,

    /// Module color (#rrggbb)
    #[arg(long, value_name = "COLOR")]
    pub dots_color: Option<String>,

    /// Finder pattern ring color (#rrggbb)
    #[arg(long, value_name = "COLOR")]
    pub corner_square_color: Option<String>,

    /// Finder pattern center color (#rrggbb)
    #[arg(long, value_name = "COLOR")]
    pub corner_dot_color: Option<String>,

    /// Background color (#rrggbb)
    #[arg(long, value_name = "COLOR")]
    pub bg_color: Option<String>,

    /// Logo image placed in the center of the code, a file or an http(s) URL
    #[arg(long, value_name = "FILE|URL")]
    pub logo: Option<String>,

    /// Also print the code to the terminal
    #[arg(long)]
    pub terminal: bool,

    /// Print the encoded payload and skip image export
    #[arg(long)]
    pub payload_only: bool,
}

#[derive(Subcommand, Clone)]
pub enum QrContent {
    /// Plain text or URL
    Text {
        text: String,
    },

    /// WiFi network credentials
    Wifi {
        #[arg(long)]
        ssid: String,

        /// WPA, WEP or nopass
        #[arg(long, default_value = "WPA")]
        auth: WifiAuth,

        #[arg(long)]
        password: Option<String>,

        /// Network does not broadcast its SSID
        #[arg(long)]
        hidden: bool,
    },

    /// E-mail draft (mailto:)
    Email {
        #[arg(long)]
        to: String,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        body: Option<String>,
    },

    /// Text message (SMSTO:)
    Sms {
        #[arg(long)]
        to: String,

        #[arg(long)]
        body: Option<String>,
    },

    /// Phone number (tel:)
    Tel {
        number: String,
    },

    /// Contact card (vCard 3.0)
    Vcard {
        #[arg(long)]
        first: Option<String>,

        #[arg(long)]
        last: Option<String>,

        #[arg(long)]
        org: Option<String>,

        #[arg(long)]
        tel: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

impl From<QrContent> for ContentPayload {
    fn from(content: QrContent) -> Self {
        match content {
            QrContent::Text { text } => ContentPayload::text(text),
            QrContent::Wifi { ssid, auth, password, hidden } => ContentPayload::Wifi(WifiPayload {
                ssid,
                auth,
                password: password.unwrap_or_default(),
                hidden,
            }),
            QrContent::Email { to, subject, body } => ContentPayload::Email(EmailPayload {
                to,
                subject: subject.unwrap_or_default(),
                body: body.unwrap_or_default(),
            }),
            QrContent::Sms { to, body } => ContentPayload::Sms(SmsPayload {
                to,
                body: body.unwrap_or_default(),
            }),
            QrContent::Tel { number } => ContentPayload::Tel(TelPayload { number }),
            QrContent::Vcard { first, last, org, tel, email } => {
                ContentPayload::Vcard(VCardPayload {
                    first: first.unwrap_or_default(),
                    last: last.unwrap_or_default(),
                    org: org.unwrap_or_default(),
                    tel: tel.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                })
            }
        }
    }
}

#[derive(Args, Clone)]
pub struct PasswordArgs {
    /// Password length (8-128)
    #[arg(short = 'L', long, value_parser = clap::value_parser!(u16).range(8..=128))]
    pub length: Option<u16>,

    /// Exclude lowercase letters
    #[arg(short = 'l', long)]
    pub no_lowercase: bool,

    /// Exclude uppercase letters
    #[arg(short = 'u', long)]
    pub no_uppercase: bool,

    /// Exclude digits
    #[arg(short = 'n', long)]
    pub no_digits: bool,

    /// Exclude symbols
    #[arg(short = 's', long)]
    pub no_symbols: bool,

    /// Number of passwords to generate
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Args, Clone)]
pub struct IpInfoArgs {
    /// Look up this address instead of your own
    #[arg(long)]
    pub ip: Option<String>,

    /// GeoIP endpoint (overrides the configured one)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Copy the IP address to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Check configuration for problems
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Plain,
}
