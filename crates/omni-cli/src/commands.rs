use std::path::{Path, PathBuf};
use std::time::Duration;
use clap::CommandFactory;
use clap_complete::Shell;
use omni_crypto::{PasswordGenerator, PasswordSpec};
use omni_network::{fetch_bytes, is_remote, GeoIpClient, GeoIpInfo, GeoIpReport, IpDetector};
use omni_qr::{
    render_data, ContentPayload, ErrorCorrectionLevel, ExportFormat, QrCodeGenerator, QrStyle,
    Rgb,
};
use serde_json::json;
use tracing::{debug, warn};
use crate::{cli::*, clipboard, config::ConfigManager, utils::display, CliError, Result};

pub struct CommandHandler {
    config_manager: ConfigManager,
    output_format: OutputFormat,
}

impl CommandHandler {
    pub fn new(config_manager: ConfigManager) -> Self {
        let output_format = config_manager.get_config().ui.default_output_format;
        Self {
            config_manager,
            output_format,
        }
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    // QR Commands
    pub async fn generate_qr(&self, args: QrArgs) -> Result<()> {
        let style = self.build_qr_style(&args)?;
        let format = self.resolve_export_format(&args);
        let payload: ContentPayload = args.content.clone().into();
        let encoded = payload.encode();

        if let Some(notice) = blank_payload_notice(&encoded, args.payload_only) {
            display::warning(notice);
        }

        if args.payload_only {
            println!("{}", encoded);
            return Ok(());
        }

        let mut generator = QrCodeGenerator::new(style.clone());
        if let Some(url) = args.logo.as_deref().filter(|logo| is_remote(logo)) {
            let bytes = fetch_bytes(url, self.network_timeout()?).await?;
            generator = generator.with_logo_bytes(&bytes)?;
        }

        let data = render_data(&encoded);
        if args.terminal {
            qr2term::print_qr(data)
                .map_err(|e| CliError::CommandError(format!("Terminal preview failed: {}", e)))?;
        }

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format.default_file_name()));
        generator.save_to_file(data, &output, format)?;

        match self.output_format {
            OutputFormat::Json => {
                let summary = json!({
                    "type": payload.content_type().as_str(),
                    "payload": encoded,
                    "file": output.display().to_string(),
                    "format": format.extension(),
                    "size": style.size,
                    "margin": style.margin,
                    "dots": style.dots.as_str(),
                    "error_correction": style.error_correction.as_str(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Plain => {
                println!("{}", encoded);
            }
            OutputFormat::Table => {
                display::header("QR Code");
                display::field("Type", payload.content_type().as_str());
                display::field("Payload", &encoded);
                display::field("Size", &format!("{} px", style.size));
                display::field("Correction", style.error_correction.as_str());
                display::field("Dots", style.dots.as_str());
                display::success(&format!(
                    "Saved {} to {}",
                    format.extension().to_uppercase(),
                    output.display()
                ));
            }
        }

        Ok(())
    }

    /// Configured defaults with any style flags from `args` applied on top.
    pub fn build_qr_style(&self, args: &QrArgs) -> Result<QrStyle> {
        let mut style = self.config_manager.get_config().qr.to_style();

        let requested = args.size.unwrap_or(style.size);
        style = style.with_size(requested);
        if style.size != requested {
            display::warning(&format!(
                "Size {} px is out of range, using {} px",
                requested, style.size
            ));
        }

        if let Some(margin) = args.margin {
            style.margin = margin;
        }
        if let Some(dots) = args.dots {
            style.dots = dots;
        }

        style.dots_color = parse_color(args.dots_color.as_deref(), style.dots_color)?;
        style.corner_square_color =
            parse_color(args.corner_square_color.as_deref(), style.corner_square_color)?;
        style.corner_dot_color =
            parse_color(args.corner_dot_color.as_deref(), style.corner_dot_color)?;
        style.background_color = parse_color(args.bg_color.as_deref(), style.background_color)?;

        // Remote logos are downloaded at render time.
        if let Some(logo) = args.logo.as_deref().filter(|logo| !is_remote(logo)) {
            let path = PathBuf::from(logo);
            if !path.is_file() {
                return Err(CliError::InvalidInput(format!(
                    "Logo file not found: {}",
                    path.display()
                )));
            }
            style.logo = Some(path);
        }

        if let Some(level) = args.ec_level {
            style.error_correction = level;
        } else if args.recommended_ec {
            style.error_correction =
                ErrorCorrectionLevel::recommended(args.logo.is_some(), style.size);
            debug!(level = style.error_correction.as_str(), "Using recommended error correction");
        }

        Ok(style)
    }

    /// `--image-format`, else the output file extension, else the configured format.
    pub fn resolve_export_format(&self, args: &QrArgs) -> ExportFormat {
        args.image_format
            .or_else(|| args.output.as_deref().and_then(format_from_extension))
            .unwrap_or(self.config_manager.get_config().qr.format)
    }

    // Password Commands
    pub fn generate_passwords(&self, args: PasswordArgs) -> Result<()> {
        if args.count == 0 {
            return Err(CliError::InvalidInput("--count must be at least 1".to_string()));
        }

        let spec = self.build_password_spec(&args);
        let passwords = PasswordGenerator::new().generate_many(&spec, args.count)?;

        match self.output_format {
            OutputFormat::Json => {
                let summary = json!({
                    "passwords": passwords,
                    "length": spec.length,
                    "entropy_bits": spec.entropy_bits(),
                    "strength": spec.strength().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Plain => {
                for password in &passwords {
                    println!("{}", password);
                }
            }
            OutputFormat::Table => {
                for password in &passwords {
                    println!("{}", password);
                }
                display::info(&format!(
                    "{} characters, {:.1} bits of entropy ({})",
                    spec.length,
                    spec.entropy_bits(),
                    spec.strength()
                ));
            }
        }

        if args.copy {
            let what = if passwords.len() == 1 { "Password" } else { "Passwords" };
            self.copy_or_warn(&passwords.join("\n"), what);
        }

        Ok(())
    }

    /// Configured defaults narrowed by the `--no-*` flags.
    pub fn build_password_spec(&self, args: &PasswordArgs) -> PasswordSpec {
        let defaults = self.config_manager.get_config().password;
        PasswordSpec {
            length: args.length.map(usize::from).unwrap_or(defaults.length),
            lowercase: defaults.lowercase && !args.no_lowercase,
            uppercase: defaults.uppercase && !args.no_uppercase,
            digits: defaults.digits && !args.no_digits,
            symbols: defaults.symbols && !args.no_symbols,
        }
    }

    // Network Commands
    pub async fn show_ip_info(&self, args: IpInfoArgs) -> Result<()> {
        let info = self.lookup_ip_info(&args).await?;
        let report = GeoIpReport::from(&info);

        match self.output_format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
            OutputFormat::Plain => {
                for row in &report.rows {
                    println!("{}: {}", row.label, row.value);
                }
            }
            OutputFormat::Table => {
                self.display_report_table(&report);
            }
        }

        if args.copy {
            match info.ip.as_deref() {
                Some(ip) => self.copy_or_warn(ip, "IP address"),
                None => display::warning("The lookup returned no IP address to copy"),
            }
        }

        Ok(())
    }

    pub async fn lookup_ip_info(&self, args: &IpInfoArgs) -> Result<GeoIpInfo> {
        let network = &self.config_manager.get_config().network;
        let endpoint = args.endpoint.clone().unwrap_or_else(|| network.endpoint.clone());
        let client = GeoIpClient::with_endpoint(endpoint, self.network_timeout()?)?;

        let info = match args.ip.as_deref() {
            Some(ip) => {
                let address = IpDetector::parse_ip(ip)?;
                if IpDetector::is_private_ip(&address) {
                    display::warning(&format!(
                        "{} is a private address; the lookup service will likely reject it",
                        address
                    ));
                }
                client.lookup_ip(address).await?
            }
            None => client.lookup().await?,
        };

        Ok(info)
    }

    /// Configured request timeout; zero would fail every request.
    fn network_timeout(&self) -> Result<Duration> {
        let network = &self.config_manager.get_config().network;
        if network.timeout_seconds == 0 {
            return Err(CliError::ConfigError(format!(
                "network.timeout_seconds must be at least 1 (see {})",
                self.config_manager.config_path().display()
            )));
        }
        Ok(network.timeout())
    }

    fn display_report_table(&self, report: &GeoIpReport) {
        use tabled::{settings::Style, Table, Tabled};

        #[derive(Tabled)]
        struct InfoRow {
            section: &'static str,
            field: &'static str,
            value: String,
        }

        let mut last_section = "";
        let rows: Vec<InfoRow> = report
            .rows
            .iter()
            .map(|row| {
                let section = if row.section == last_section { "" } else { row.section };
                last_section = row.section;
                InfoRow {
                    section,
                    field: row.label,
                    value: row.value.clone(),
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    // Configuration Commands
    pub fn handle_config_command(&mut self, command: ConfigCommands) -> Result<()> {
        match command {
            ConfigCommands::Show => {
                let config = self.config_manager.get_config();
                match self.output_format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
                    _ => {
                        let content = toml::to_string_pretty(config).map_err(|e| {
                            CliError::ConfigError(format!("Failed to serialize config: {}", e))
                        })?;
                        print!("{}", content);
                    }
                }
            }
            ConfigCommands::Path => {
                println!("{}", self.config_manager.config_path().display());
            }
            ConfigCommands::Reset => {
                self.config_manager.reset_to_defaults()?;
                self.output_format = self.config_manager.get_config().ui.default_output_format;
                display::success("Configuration reset to defaults");
            }
            ConfigCommands::Validate => {
                let warnings = self.config_manager.validate_config()?;
                if warnings.is_empty() {
                    display::success("Configuration is valid");
                } else {
                    for warning in &warnings {
                        display::warning(warning);
                    }
                    return Err(CliError::ConfigError(format!(
                        "{} problem(s) found in {}",
                        warnings.len(),
                        self.config_manager.config_path().display()
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn generate_completions(&self, shell: Shell, output: Option<PathBuf>) -> Result<()> {
        let mut command = Cli::command();
        let name = command.get_name().to_string();

        match output {
            Some(path) => {
                let mut file = std::fs::File::create(&path)?;
                clap_complete::generate(shell, &mut command, name, &mut file);
                display::success(&format!("Completions written to {}", path.display()));
            }
            None => {
                clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            }
        }

        Ok(())
    }

    fn copy_or_warn(&self, text: &str, what: &str) {
        match clipboard::copy_to_clipboard(text) {
            Ok(()) => display::success(&format!("{} copied to clipboard", what)),
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                display::warning(&e.to_string());
            }
        }
    }
}

/// Warning for an empty payload; the renderer substitutes a space, a bare payload does not.
fn blank_payload_notice(encoded: &str, payload_only: bool) -> Option<&'static str> {
    if !encoded.is_empty() {
        None
    } else if payload_only {
        Some("Nothing to encode yet; the payload is empty")
    } else {
        Some("Nothing to encode yet; the code will contain a single space")
    }
}

fn parse_color(value: Option<&str>, fallback: Rgb) -> Result<Rgb> {
    match value {
        Some(value) => Ok(value.parse::<Rgb>()?),
        None => Ok(fallback),
    }
}

fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_payload_notice() {
        assert_eq!(blank_payload_notice("hello", false), None);
        assert_eq!(blank_payload_notice("hello", true), None);

        let render = blank_payload_notice("", false).unwrap();
        assert!(render.contains("single space"));

        let bare = blank_payload_notice("", true).unwrap();
        assert!(!bare.contains("single space"));
    }
}
