//! Renderer configuration from the environment
//!
//! Font paths and the agency logo URL come from environment variables,
//! with filesystem discovery as the fallback: an assets/fonts directory
//! is searched upward from the working directory and the executable, then
//! a list of common system font locations.

use std::path::{Path, PathBuf};

use crate::font_utils::load_font_file;

pub const ENV_ARABIC_FONT: &str = "BROCHURE_ARABIC_FONT";
pub const ENV_BODY_FONT: &str = "BROCHURE_BODY_FONT";
pub const ENV_LOGO_URL: &str = "BROCHURE_LOGO_URL";

const ARABIC_FONT_FILENAMES: [&str; 3] = [
    "NotoNaskhArabic-Regular.ttf",
    "Amiri-Regular.ttf",
    "NotoSansArabic-Regular.ttf",
];

const ARABIC_SYSTEM_PATHS: [&str; 6] = [
    "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Regular.ttf",
    "/usr/share/fonts/noto/NotoNaskhArabic-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/fonts-hosny-amiri/Amiri-Regular.ttf",
    "/usr/share/fonts/TTF/Amiri-Regular.ttf",
    // DejaVu carries basic Arabic coverage, better than question marks
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

const BODY_FONT_FILENAMES: [&str; 1] = ["DejaVuSans.ttf"];

const BODY_SYSTEM_PATHS: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/DejaVu Sans.ttf",
    "C:/Windows/Fonts/DejaVuSans.ttf",
];

/// Renderer settings, resolved once at startup
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    pub arabic_font_path: Option<PathBuf>,
    pub body_font_path: Option<PathBuf>,
    pub logo_url: Option<String>,
}

impl RendererConfig {
    pub fn from_env() -> Self {
        Self {
            arabic_font_path: env_path(ENV_ARABIC_FONT),
            body_font_path: env_path(ENV_BODY_FONT),
            logo_url: std::env::var(ENV_LOGO_URL)
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Load the font files this configuration points at. Missing or broken
    /// fonts leave their slot empty and rendering degrades to the builtin
    /// faces.
    pub fn resolve_fonts(&self) -> FontSet {
        FontSet {
            arabic: resolve_one(
                "arabic",
                self.arabic_font_path.as_deref(),
                &ARABIC_FONT_FILENAMES,
                &ARABIC_SYSTEM_PATHS,
            ),
            body: resolve_one(
                "body",
                self.body_font_path.as_deref(),
                &BODY_FONT_FILENAMES,
                &BODY_SYSTEM_PATHS,
            ),
        }
    }
}

/// Font bytes available to a renderer. Either slot may be empty.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    pub arabic: Option<Vec<u8>>,
    pub body: Option<Vec<u8>>,
}

impl FontSet {
    /// No embedded fonts at all, builtin faces only
    pub fn empty() -> Self {
        Self::default()
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn resolve_one(
    role: &str,
    explicit: Option<&Path>,
    asset_filenames: &[&str],
    system_paths: &[&str],
) -> Option<Vec<u8>> {
    if let Some(path) = explicit {
        match load_font_file(path) {
            Ok(data) => {
                log::info!("loaded {} font from {}", role, path.display());
                return Some(data);
            }
            Err(e) => {
                log::warn!("configured {} font unusable: {}", role, e);
                return None;
            }
        }
    }

    for filename in asset_filenames {
        if let Some(path) = find_font_in_assets(filename) {
            if let Ok(data) = load_font_file(&path) {
                log::info!("loaded {} font from {}", role, path.display());
                return Some(data);
            }
        }
    }

    for candidate in system_paths {
        let path = Path::new(candidate);
        if path.exists() {
            if let Ok(data) = load_font_file(path) {
                log::info!("loaded {} font from {}", role, path.display());
                return Some(data);
            }
        }
    }

    log::warn!("no {} font found, builtin faces will be used", role);
    None
}

/// Search assets/fonts from the working directory and the executable
/// location, walking up to ten parent levels
fn find_font_in_assets(font_filename: &str) -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    for root in roots {
        let mut dir = Some(root.as_path());
        for _ in 0..10 {
            let Some(d) = dir else { break };
            let candidate = d.join("assets").join("fonts").join(font_filename);
            if candidate.exists() {
                return Some(candidate);
            }
            dir = d.parent();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_font_degrades() {
        let config = RendererConfig {
            arabic_font_path: Some(PathBuf::from("/nonexistent/arabic.ttf")),
            body_font_path: Some(PathBuf::from("/nonexistent/body.ttf")),
            logo_url: None,
        };
        let fonts = config.resolve_fonts();
        assert!(fonts.arabic.is_none());
        assert!(fonts.body.is_none());
    }

    #[test]
    fn test_empty_font_set() {
        let fonts = FontSet::empty();
        assert!(fonts.arabic.is_none());
        assert!(fonts.body.is_none());
    }

    #[test]
    fn test_env_round_trip() {
        std::env::set_var(ENV_LOGO_URL, "https://example.com/logo.png");
        std::env::set_var(ENV_ARABIC_FONT, "");
        let config = RendererConfig::from_env();
        assert_eq!(
            config.logo_url.as_deref(),
            Some("https://example.com/logo.png")
        );
        // Blank values count as unset
        assert!(config.arabic_font_path.is_none());
        std::env::remove_var(ENV_LOGO_URL);
        std::env::remove_var(ENV_ARABIC_FONT);
    }
}
