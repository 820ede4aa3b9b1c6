//! Named size and background presets.

use crate::foundation::core::TargetSpec;
use crate::foundation::error::ResizeResult;
use crate::paint::background::{Background, BackgroundParseError, parse_background};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizePreset {
    pub category: &'static str,
    pub slug: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

impl SizePreset {
    pub fn target(&self) -> ResizeResult<TargetSpec> {
        TargetSpec::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundPreset {
    pub category: &'static str,
    pub slug: &'static str,
    pub label: &'static str,
    /// Background text, see [`parse_background`].
    pub text: &'static str,
}

impl BackgroundPreset {
    pub fn background(&self) -> Result<Background, BackgroundParseError> {
        parse_background(self.text)
    }
}

const fn size(
    category: &'static str,
    slug: &'static str,
    label: &'static str,
    width: u32,
    height: u32,
) -> SizePreset {
    SizePreset {
        category,
        slug,
        label,
        width,
        height,
    }
}

const fn bg(
    category: &'static str,
    slug: &'static str,
    label: &'static str,
    text: &'static str,
) -> BackgroundPreset {
    BackgroundPreset {
        category,
        slug,
        label,
        text,
    }
}

const HEADSHOTS: &str = "Headshots & Avatars";
const PROFILES: &str = "Social Media Profiles";
const POSTS: &str = "Social Media Posts";
const BANNERS: &str = "Banners & Headers";
const ADS: &str = "Digital Ads (IAB)";
const WEB: &str = "Email & Web";

pub const SIZE_PRESETS: &[SizePreset] = &[
    size(HEADSHOTS, "headshot-200", "200 x 200", 200, 200),
    size(HEADSHOTS, "headshot-300", "300 x 300", 300, 300),
    size(HEADSHOTS, "headshot-400", "400 x 400", 400, 400),
    size(HEADSHOTS, "headshot-500", "500 x 500", 500, 500),
    size(HEADSHOTS, "headshot-800", "800 x 800", 800, 800),
    size(PROFILES, "facebook-profile", "Facebook 170x170", 170, 170),
    size(PROFILES, "instagram-profile", "Instagram 320x320", 320, 320),
    size(PROFILES, "linkedin-profile", "LinkedIn 400x400", 400, 400),
    size(PROFILES, "x-profile", "X (Twitter) 400x400", 400, 400),
    size(PROFILES, "youtube-profile", "YouTube 800x800", 800, 800),
    size(PROFILES, "tiktok-profile", "TikTok 200x200", 200, 200),
    size(POSTS, "instagram-square", "Instagram Square 1080x1080", 1080, 1080),
    size(POSTS, "instagram-portrait", "Instagram Portrait 1080x1350", 1080, 1350),
    size(POSTS, "instagram-story", "Instagram Story 1080x1920", 1080, 1920),
    size(POSTS, "instagram-landscape", "Instagram Landscape 1080x566", 1080, 566),
    size(POSTS, "facebook-post", "Facebook Post 1200x630", 1200, 630),
    size(POSTS, "x-post", "X Post 1200x675", 1200, 675),
    size(POSTS, "pinterest-pin", "Pinterest Pin 1000x1500", 1000, 1500),
    size(POSTS, "linkedin-post", "LinkedIn Post 1200x627", 1200, 627),
    size(BANNERS, "facebook-cover", "Facebook Cover 820x312", 820, 312),
    size(BANNERS, "x-header", "X Header 1500x500", 1500, 500),
    size(BANNERS, "linkedin-banner", "LinkedIn Banner 1584x396", 1584, 396),
    size(BANNERS, "youtube-banner", "YouTube Banner 2560x1440", 2560, 1440),
    size(BANNERS, "youtube-thumbnail", "YouTube Thumbnail 1280x720", 1280, 720),
    size(BANNERS, "twitch-banner", "Twitch Banner 1200x480", 1200, 480),
    size(ADS, "medium-rectangle", "Medium Rectangle 300x250", 300, 250),
    size(ADS, "leaderboard", "Leaderboard 728x90", 728, 90),
    size(ADS, "wide-skyscraper", "Wide Skyscraper 160x600", 160, 600),
    size(ADS, "billboard", "Billboard 970x250", 970, 250),
    size(ADS, "large-leaderboard", "Large Leaderboard 970x90", 970, 90),
    size(ADS, "large-rectangle", "Large Rectangle 336x280", 336, 280),
    size(ADS, "half-page", "Half Page 300x600", 300, 600),
    size(ADS, "mobile-banner", "Mobile Banner 320x50", 320, 50),
    size(ADS, "mobile-interstitial", "Mobile Interstitial 320x480", 320, 480),
    size(WEB, "email-header", "Email Header 600x200", 600, 200),
    size(WEB, "email-square", "Email Square 600x600", 600, 600),
    size(WEB, "hero-banner", "Hero Banner 1200x400", 1200, 400),
    size(WEB, "full-hd", "Full HD 1920x1080", 1920, 1080),
    size(WEB, "4k-uhd", "4K UHD 3840x2160", 3840, 2160),
    size(WEB, "og-image", "OG Image 1200x630", 1200, 630),
    size(WEB, "favicon", "Favicon 512x512", 512, 512),
];

const SOLIDS: &str = "Solid Colors";
const GRADIENTS: &str = "Gradients";
const SPECIAL: &str = "Special";

pub const BACKGROUND_PRESETS: &[BackgroundPreset] = &[
    bg(SOLIDS, "white", "White", "#FFFFFF"),
    bg(SOLIDS, "light-gray", "Light Gray", "#E0E0E0"),
    bg(SOLIDS, "professional-gray", "Professional Gray", "#808080"),
    bg(SOLIDS, "black", "Black", "#000000"),
    bg(SOLIDS, "teal", "Teal", "#49A3A1"),
    bg(SOLIDS, "graphite", "Graphite", "#32374A"),
    bg(SOLIDS, "purple", "Purple", "#663399"),
    bg(SOLIDS, "orange", "Orange", "#F77E2D"),
    bg(GRADIENTS, "corporate-blue", "Corporate Blue", "#4A7AB5:#E8EEF5:down"),
    bg(GRADIENTS, "brand-blue", "Brand Blue", "#1D4BB7:#DFE7EF:down"),
    bg(GRADIENTS, "brand-blue-full", "Brand Blue Full", "#1D4BB7:#DFE7EF:#1D4BB7:down"),
    bg(GRADIENTS, "teal-summit", "Teal Summit", "#49A3A1:#FFFFFF:down"),
    bg(GRADIENTS, "graphite-sunset", "Graphite Sunset", "#32374A:#663399:#F77E2D:down"),
    bg(GRADIENTS, "purple-radial", "Purple Radial", "#663399:#32374A:radial"),
    bg(GRADIENTS, "sunset-diagonal", "Sunset Diagonal", "#F77E2D:#663399:diagonal"),
    bg(GRADIENTS, "purple-horizon", "Purple Horizon", "#663399:#F77E2D:right"),
    bg(SPECIAL, "transparent", "Transparent (PNG)", "transparent"),
];

fn matches(slug: &str, label: &str, key: &str) -> bool {
    let key = key.trim();
    slug.eq_ignore_ascii_case(key) || label.eq_ignore_ascii_case(key)
}

/// Look up a size preset by slug or label, case-insensitively.
pub fn find_size_preset(key: &str) -> Option<&'static SizePreset> {
    SIZE_PRESETS.iter().find(|p| matches(p.slug, p.label, key))
}

/// Look up a background preset by slug or label, case-insensitively.
pub fn find_background_preset(key: &str) -> Option<&'static BackgroundPreset> {
    BACKGROUND_PRESETS.iter().find(|p| matches(p.slug, p.label, key))
}

/// Resolve a background selection: a preset name, or custom background text.
pub fn resolve_background(selection: &str) -> Result<Background, BackgroundParseError> {
    match find_background_preset(selection) {
        Some(preset) => preset.background(),
        None => parse_background(selection),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::paint::background::GradientDirection;

    #[test]
    fn every_preset_is_valid() {
        for p in SIZE_PRESETS {
            assert!(p.target().is_ok(), "{}", p.slug);
        }
        for p in BACKGROUND_PRESETS {
            assert!(p.background().is_ok(), "{}", p.slug);
        }
    }

    #[test]
    fn slugs_are_unique() {
        let sizes: HashSet<_> = SIZE_PRESETS.iter().map(|p| p.slug).collect();
        assert_eq!(sizes.len(), SIZE_PRESETS.len());
        let bgs: HashSet<_> = BACKGROUND_PRESETS.iter().map(|p| p.slug).collect();
        assert_eq!(bgs.len(), BACKGROUND_PRESETS.len());
    }

    #[test]
    fn lookup_by_slug_or_label() {
        let p = find_size_preset("INSTAGRAM-STORY").unwrap();
        assert_eq!((p.width, p.height), (1080, 1920));
        assert_eq!(find_size_preset("Favicon 512x512").unwrap().width, 512);
        assert!(find_size_preset("nope").is_none());
        assert_eq!(find_background_preset("Purple Radial").unwrap().slug, "purple-radial");
    }

    #[test]
    fn preset_and_custom_text_share_one_equality() {
        let preset = resolve_background("corporate-blue").unwrap();
        let custom = resolve_background("#4a7ab5:#e8eef5").unwrap();
        assert_eq!(preset, custom);

        let radial = resolve_background("purple-radial").unwrap();
        match &radial {
            Background::Gradient(g) => assert_eq!(g.direction(), GradientDirection::Radial),
            other => panic!("expected gradient, got {other:?}"),
        }
        assert_ne!(radial, resolve_background("#663399:#32374A").unwrap());
        assert_eq!(resolve_background("transparent").unwrap(), Background::Transparent);
    }
}
