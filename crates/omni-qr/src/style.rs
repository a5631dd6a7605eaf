use crate::error::{QrError, Result};
use qrcode::EcLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const PREVIEW_SIZE: u32 = 320;
pub const MIN_EXPORT_SIZE: u32 = 128;
pub const MAX_EXPORT_SIZE: u32 = 2048;
pub const DEFAULT_EXPORT_SIZE: u32 = 1024;
pub const DEFAULT_MARGIN: u32 = 12;
pub const DEFAULT_FILE_STEM: &str = "fancy-qr";

/// Logo edge length relative to the drawable area.
pub const LOGO_SIZE_RATIO: f64 = 0.28;
/// Background padding around an embedded logo, in pixels.
pub const LOGO_MARGIN: u32 = 4;

pub fn clamp_export_size(size: u32) -> u32 {
    size.clamp(MIN_EXPORT_SIZE, MAX_EXPORT_SIZE)
}

/// QR redundancy tier, trading data capacity for damage tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "Q")]
    Quartile,
    #[default]
    #[serde(rename = "H")]
    High,
}

impl ErrorCorrectionLevel {
    /// With a logo we need H; big exports without one scan fine at M; small ones get Q.
    pub fn recommended(has_logo: bool, export_size: u32) -> Self {
        if has_logo {
            ErrorCorrectionLevel::High
        } else if export_size >= DEFAULT_EXPORT_SIZE {
            ErrorCorrectionLevel::Medium
        } else {
            ErrorCorrectionLevel::Quartile
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCorrectionLevel::Low => "L",
            ErrorCorrectionLevel::Medium => "M",
            ErrorCorrectionLevel::Quartile => "Q",
            ErrorCorrectionLevel::High => "H",
        }
    }
}

impl From<ErrorCorrectionLevel> for EcLevel {
    fn from(level: ErrorCorrectionLevel) -> Self {
        match level {
            ErrorCorrectionLevel::Low => EcLevel::L,
            ErrorCorrectionLevel::Medium => EcLevel::M,
            ErrorCorrectionLevel::Quartile => EcLevel::Q,
            ErrorCorrectionLevel::High => EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrectionLevel::Low),
            "m" | "medium" => Ok(ErrorCorrectionLevel::Medium),
            "q" | "quartile" => Ok(ErrorCorrectionLevel::Quartile),
            "h" | "high" => Ok(ErrorCorrectionLevel::High),
            other => Err(format!(
                "Unknown error correction level '{}' (expected L, M, Q or H)",
                other
            )),
        }
    }
}

/// Shape used for data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    Square,
    Dots,
    #[default]
    Rounded,
    ExtraRounded,
    Classy,
    ClassyRounded,
}

impl DotStyle {
    pub const ALL: [DotStyle; 6] = [
        DotStyle::Square,
        DotStyle::Dots,
        DotStyle::Rounded,
        DotStyle::ExtraRounded,
        DotStyle::Classy,
        DotStyle::ClassyRounded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DotStyle::Square => "square",
            DotStyle::Dots => "dots",
            DotStyle::Rounded => "rounded",
            DotStyle::ExtraRounded => "extra-rounded",
            DotStyle::Classy => "classy",
            DotStyle::ClassyRounded => "classy-rounded",
        }
    }

    /// Corner radii in module units, clockwise from top-left. A module with
    /// every radius at 0.5 is a circle.
    pub fn corner_radii(&self) -> [f64; 4] {
        match self {
            DotStyle::Square => [0.0; 4],
            DotStyle::Dots => [0.5; 4],
            DotStyle::Rounded => [ROUNDED_CORNER_RADIUS; 4],
            DotStyle::ExtraRounded => [EXTRA_ROUNDED_CORNER_RADIUS; 4],
            DotStyle::Classy => [0.5, 0.0, 0.5, 0.0],
            DotStyle::ClassyRounded => [0.5, CLASSY_SOFT_RADIUS, 0.5, CLASSY_SOFT_RADIUS],
        }
    }

    /// Whether the point `(fx, fy)`, relative to a module's top-left corner in
    /// module units, lies inside the drawn shape.
    pub fn covers(&self, fx: f64, fy: f64) -> bool {
        let [tl, tr, br, bl] = self.corner_radii();
        let (r, dx, dy) = match (fx < 0.5, fy < 0.5) {
            (true, true) => (tl, tl - fx, tl - fy),
            (false, true) => (tr, fx - (1.0 - tr), tr - fy),
            (false, false) => (br, fx - (1.0 - br), fy - (1.0 - br)),
            (true, false) => (bl, bl - fx, fy - (1.0 - bl)),
        };
        dx <= 0.0 || dy <= 0.0 || dx * dx + dy * dy <= r * r
    }
}

const ROUNDED_CORNER_RADIUS: f64 = 0.3;
const EXTRA_ROUNDED_CORNER_RADIUS: f64 = 0.42;
const CLASSY_SOFT_RADIUS: f64 = 0.15;

impl fmt::Display for DotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DotStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "square" => Ok(DotStyle::Square),
            "dots" | "dot" => Ok(DotStyle::Dots),
            "rounded" => Ok(DotStyle::Rounded),
            "extra-rounded" => Ok(DotStyle::ExtraRounded),
            "classy" => Ok(DotStyle::Classy),
            "classy-rounded" => Ok(DotStyle::ClassyRounded),
            other => Err(format!(
                "Unknown dot style '{}' (expected square, dots, rounded, extra-rounded, classy \
                 or classy-rounded)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("{}.{}", DEFAULT_FILE_STEM, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!("Unknown export format '{}' (expected png or svg)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for Rgb {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || QrError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.hex()
    }
}

/// Everything the renderer needs besides the payload itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrStyle {
    pub size: u32,
    pub margin: u32,
    pub dots: DotStyle,
    pub dots_color: Rgb,
    pub corner_square_color: Rgb,
    pub corner_dot_color: Rgb,
    pub background_color: Rgb,
    pub error_correction: ErrorCorrectionLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_EXPORT_SIZE,
            margin: DEFAULT_MARGIN,
            dots: DotStyle::Rounded,
            dots_color: Rgb::new(0x11, 0x11, 0x11),
            corner_square_color: Rgb::new(0x11, 0x11, 0x11),
            corner_dot_color: Rgb::new(0x4f, 0x46, 0xe5),
            background_color: Rgb::new(0xff, 0xff, 0xff),
            error_correction: ErrorCorrectionLevel::High,
            logo: None,
        }
    }
}

impl QrStyle {
    pub fn preview() -> Self {
        Self {
            size: PREVIEW_SIZE,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = clamp_export_size(size);
        self
    }

    pub fn apply_recommended_error_correction(&mut self) {
        self.error_correction = ErrorCorrectionLevel::recommended(self.logo.is_some(), self.size);
    }
}
