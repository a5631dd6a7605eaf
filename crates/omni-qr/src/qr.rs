use crate::error::{QrError, Result};
use crate::style::{DotStyle, ExportFormat, QrStyle, Rgb, LOGO_MARGIN, LOGO_SIZE_RATIO};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use qrcode::{Color, QrCode};
use std::fmt::Write as _;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const FINDER_SIZE: usize = 7;
/// Outer corner radius of the finder ring, in modules. The hole uses one less.
const FINDER_RING_RADIUS: f64 = 2.5;
const FINDER_DOT_RADIUS: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleRole {
    Data,
    CornerSquare,
    CornerDot,
}

/// Dark/light module grid of an encoded symbol.
struct ModuleGrid {
    width: usize,
    colors: Vec<Color>,
}

impl ModuleGrid {
    fn encode(data: &str, style: &QrStyle) -> Result<Self> {
        let level = style.error_correction.into();
        let code = QrCode::with_error_correction_level(data.as_bytes(), level)
            .map_err(|e| QrError::EncodeError(e.to_string()))?;
        Ok(Self {
            width: code.width(),
            colors: code.to_colors(),
        })
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        self.colors[row * self.width + col] == Color::Dark
    }

    /// Top-left module of each finder pattern.
    fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width.saturating_sub(FINDER_SIZE);
        [(0, 0), (0, far), (far, 0)]
    }

    fn role(&self, row: usize, col: usize) -> ModuleRole {
        for (r0, c0) in self.finder_origins() {
            if (r0..r0 + FINDER_SIZE).contains(&row) && (c0..c0 + FINDER_SIZE).contains(&col) {
                let (r, c) = (row - r0, col - c0);
                return if (2..=4).contains(&r) && (2..=4).contains(&c) {
                    ModuleRole::CornerDot
                } else {
                    ModuleRole::CornerSquare
                };
            }
        }
        ModuleRole::Data
    }

    /// Dark modules outside the finder patterns, which are drawn whole.
    fn data_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.width)
            .flat_map(move |row| (0..self.width).map(move |col| (row, col)))
            .filter(move |&(row, col)| {
                self.is_dark(row, col) && self.role(row, col) == ModuleRole::Data
            })
    }
}

/// Pixel geometry of the symbol inside the exported canvas.
#[derive(Debug, Clone, Copy)]
struct Layout {
    size: u32,
    margin: f64,
    module: f64,
}

impl Layout {
    fn new(style: &QrStyle, modules: usize) -> Self {
        let size = style.size.max(modules as u32);
        let margin = if style.margin.saturating_mul(2) >= size {
            0
        } else {
            style.margin
        };
        let drawable = (size - 2 * margin) as f64;
        Self {
            size,
            margin: margin as f64,
            module: drawable / modules as f64,
        }
    }

    fn drawable(&self) -> f64 {
        self.size as f64 - 2.0 * self.margin
    }

    fn origin(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.margin + col as f64 * self.module,
            self.margin + row as f64 * self.module,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinderPart {
    Ring,
    Dot,
}

fn in_rounded_square(u: f64, v: f64, offset: f64, edge: f64, radius: f64) -> bool {
    let (lo, hi) = (offset, offset + edge);
    if u < lo || u > hi || v < lo || v > hi {
        return false;
    }
    let dx = (lo + radius - u).max(u - (hi - radius)).max(0.0);
    let dy = (lo + radius - v).max(v - (hi - radius)).max(0.0);
    dx * dx + dy * dy <= radius * radius
}

/// Part of a finder pattern under `(u, v)`, in modules from its top-left corner.
fn finder_part(u: f64, v: f64) -> Option<FinderPart> {
    let size = FINDER_SIZE as f64;
    let in_outer = in_rounded_square(u, v, 0.0, size, FINDER_RING_RADIUS);
    let in_hole = in_rounded_square(u, v, 1.0, size - 2.0, FINDER_RING_RADIUS - 1.0);
    if in_outer && !in_hole {
        return Some(FinderPart::Ring);
    }

    let (dx, dy) = (u - size / 2.0, v - size / 2.0);
    (dx * dx + dy * dy <= FINDER_DOT_RADIUS * FINDER_DOT_RADIUS).then_some(FinderPart::Dot)
}

/// Paints the `modules`-wide cell at `origin` wherever `shade` returns a color.
fn paint<F>(canvas: &mut RgbaImage, layout: &Layout, origin: (f64, f64), modules: f64, shade: F)
where
    F: Fn(f64, f64) -> Option<image::Rgba<u8>>,
{
    let (x, y) = origin;
    let edge = layout.module * modules;
    let x_end = ((x + edge).ceil() as u32).min(layout.size);
    let y_end = ((y + edge).ceil() as u32).min(layout.size);

    for py in (y.floor() as u32)..y_end {
        for px in (x.floor() as u32)..x_end {
            let u = (px as f64 + 0.5 - x) / layout.module;
            let v = (py as f64 + 0.5 - y) / layout.module;
            if !(0.0..modules).contains(&u) || !(0.0..modules).contains(&v) {
                continue;
            }
            if let Some(pixel) = shade(u, v) {
                canvas.put_pixel(px, py, pixel);
            }
        }
    }
}

/// SVG path for a `w`-wide square at `(x, y)` with corner radii clockwise from top-left.
fn rounded_square_path(x: f64, y: f64, w: f64, radii: [f64; 4]) -> String {
    let [tl, tr, br, bl] = radii;
    format!(
        "M{:.2},{:.2} H{:.2} A{:.2},{:.2} 0 0 1 {:.2},{:.2} V{:.2} A{:.2},{:.2} 0 0 1 {:.2},{:.2} \
         H{:.2} A{:.2},{:.2} 0 0 1 {:.2},{:.2} V{:.2} A{:.2},{:.2} 0 0 1 {:.2},{:.2} Z",
        x + tl, y,
        x + w - tr, tr, tr, x + w, y + tr,
        y + w - br, br, br, x + w - br, y + w,
        x + bl, bl, bl, x, y + w - bl,
        y + tl, tl, tl, x + tl, y
    )
}

fn write_svg_module(svg: &mut String, x: f64, y: f64, m: f64, dots: DotStyle, fill: Rgb) {
    let radii = dots.corner_radii();
    let uniform = radii.iter().all(|&r| r == radii[0]);

    let _ = if uniform && radii[0] == 0.0 {
        writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            x, y, m, m, fill
        )
    } else if uniform && radii[0] >= 0.5 {
        writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            x + m / 2.0,
            y + m / 2.0,
            m / 2.0,
            fill
        )
    } else if uniform {
        writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="{}"/>"#,
            x,
            y,
            m,
            m,
            m * radii[0],
            fill
        )
    } else {
        let path = rounded_square_path(x, y, m, radii.map(|r| r * m));
        writeln!(svg, r#"<path d="{}" fill="{}"/>"#, path, fill)
    };
}

fn write_svg_finder(svg: &mut String, x: f64, y: f64, m: f64, style: &QrStyle) {
    let size = FINDER_SIZE as f64;
    let outer = rounded_square_path(x, y, size * m, [FINDER_RING_RADIUS * m; 4]);
    let hole = rounded_square_path(
        x + m,
        y + m,
        (size - 2.0) * m,
        [(FINDER_RING_RADIUS - 1.0) * m; 4],
    );
    let _ = writeln!(
        svg,
        r#"<path d="{} {}" fill="{}" fill-rule="evenodd"/>"#,
        outer, hole, style.corner_square_color
    );
    let _ = writeln!(
        svg,
        r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
        x + size * m / 2.0,
        y + size * m / 2.0,
        FINDER_DOT_RADIUS * m,
        style.corner_dot_color
    );
}

/// Scales the logo to fit its slot, preserving aspect ratio.
fn fit_logo(logo: &DynamicImage, layout: &Layout) -> RgbaImage {
    let edge = (layout.drawable() * LOGO_SIZE_RATIO).round().max(1.0) as u32;
    logo.resize(edge, edge, FilterType::Lanczos3).to_rgba8()
}

fn logo_placement(layout: &Layout, logo: &RgbaImage) -> (u32, u32) {
    (
        (layout.size - logo.width()) / 2,
        (layout.size - logo.height()) / 2,
    )
}

pub struct QrCodeGenerator {
    style: QrStyle,
    logo: Option<DynamicImage>,
}

impl QrCodeGenerator {
    pub fn new(style: QrStyle) -> Self {
        Self { style, logo: None }
    }

    /// Uses an already downloaded logo; takes precedence over `style.logo`.
    pub fn with_logo_bytes(mut self, bytes: &[u8]) -> Result<Self> {
        let logo = image::load_from_memory(bytes)
            .map_err(|e| QrError::LogoError(format!("remote image: {}", e)))?;
        self.logo = Some(logo);
        Ok(self)
    }

    pub fn style(&self) -> &QrStyle {
        &self.style
    }

    fn scaled_logo(&self, layout: &Layout) -> Result<Option<RgbaImage>> {
        if let Some(logo) = &self.logo {
            return Ok(Some(fit_logo(logo, layout)));
        }
        match &self.style.logo {
            Some(path) => {
                let logo = image::open(path)
                    .map_err(|e| QrError::LogoError(format!("{}: {}", path.display(), e)))?;
                Ok(Some(fit_logo(&logo, layout)))
            }
            None => Ok(None),
        }
    }

    pub fn render(&self, data: &str, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_png(data),
            ExportFormat::Svg => self.render_svg(data).map(String::into_bytes),
        }
    }

    pub fn render_svg(&self, data: &str) -> Result<String> {
        let grid = ModuleGrid::encode(data, &self.style)?;
        let layout = Layout::new(&self.style, grid.width);
        let style = &self.style;
        let m = layout.module;

        let mut svg = String::new();
        let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            svg,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" "#,
                r#"width="{0}" height="{0}" viewBox="0 0 {0} {0}" "#,
                r#"shape-rendering="geometricPrecision">"#
            ),
            layout.size
        );
        let _ = writeln!(
            svg,
            r#"<rect width="{0}" height="{0}" fill="{1}"/>"#,
            layout.size, style.background_color
        );

        for (row, col) in grid.data_modules() {
            let (x, y) = layout.origin(row, col);
            write_svg_module(&mut svg, x, y, m, style.dots, style.dots_color);
        }

        for (row, col) in grid.finder_origins() {
            let (x, y) = layout.origin(row, col);
            write_svg_finder(&mut svg, x, y, m, style);
        }

        if let Some(logo) = self.scaled_logo(&layout)? {
            let (lx, ly) = logo_placement(&layout, &logo);
            let mut png = Vec::new();
            DynamicImage::ImageRgba8(logo.clone())
                .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;

            let _ = writeln!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                lx.saturating_sub(LOGO_MARGIN),
                ly.saturating_sub(LOGO_MARGIN),
                logo.width() + 2 * LOGO_MARGIN,
                logo.height() + 2 * LOGO_MARGIN,
                style.background_color
            );
            let _ = writeln!(
                svg,
                r#"<image x="{}" y="{}" width="{}" height="{}" href="data:image/png;base64,{}"/>"#,
                lx,
                ly,
                logo.width(),
                logo.height(),
                BASE64.encode(&png)
            );
        }

        svg.push_str("</svg>\n");
        debug!(modules = grid.width, size = layout.size, "Rendered SVG QR code");
        Ok(svg)
    }

    pub fn render_image(&self, data: &str) -> Result<RgbaImage> {
        let grid = ModuleGrid::encode(data, &self.style)?;
        let layout = Layout::new(&self.style, grid.width);
        let style = &self.style;
        let mut canvas =
            RgbaImage::from_pixel(layout.size, layout.size, style.background_color.to_rgba());

        let dots_pixel = style.dots_color.to_rgba();
        for (row, col) in grid.data_modules() {
            paint(&mut canvas, &layout, layout.origin(row, col), 1.0, |u, v| {
                style.dots.covers(u, v).then_some(dots_pixel)
            });
        }

        let ring_pixel = style.corner_square_color.to_rgba();
        let dot_pixel = style.corner_dot_color.to_rgba();
        for (row, col) in grid.finder_origins() {
            let origin = layout.origin(row, col);
            paint(&mut canvas, &layout, origin, FINDER_SIZE as f64, |u, v| {
                finder_part(u, v).map(|part| match part {
                    FinderPart::Ring => ring_pixel,
                    FinderPart::Dot => dot_pixel,
                })
            });
        }

        if let Some(logo) = self.scaled_logo(&layout)? {
            let (lx, ly) = logo_placement(&layout, &logo);
            let backdrop = RgbaImage::from_pixel(
                logo.width() + 2 * LOGO_MARGIN,
                logo.height() + 2 * LOGO_MARGIN,
                style.background_color.to_rgba(),
            );
            imageops::overlay(
                &mut canvas,
                &backdrop,
                lx.saturating_sub(LOGO_MARGIN) as i64,
                ly.saturating_sub(LOGO_MARGIN) as i64,
            );
            imageops::overlay(&mut canvas, &logo, lx as i64, ly as i64);
        }

        debug!(modules = grid.width, size = layout.size, "Rendered raster QR code");
        Ok(canvas)
    }

    pub fn render_png(&self, data: &str) -> Result<Vec<u8>> {
        let canvas = self.render_image(data)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
        Ok(bytes)
    }

    pub fn save_to_file(&self, data: &str, path: &Path, format: ExportFormat) -> Result<()> {
        let bytes = self.render(data, format)?;
        fs::write(path, bytes)?;
        debug!(path = %path.display(), format = %format, "Saved QR code");
        Ok(())
    }
}

impl Default for QrCodeGenerator {
    fn default() -> Self {
        Self::new(QrStyle::default())
    }
}
