//! Display labels for the link keys a post may carry in `urls`

use crate::AssetError;
use hexweave_core::post::PostData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlLabel {
    Github,
    Demo,
    Homepage,
    Npm,
    Bower,
    GooglePlay,
    AppStore,
    ChromeWebStore,
    Published,
    Video,
}

impl UrlLabel {
    pub const ALL: [UrlLabel; 10] = [
        UrlLabel::Github,
        UrlLabel::Demo,
        UrlLabel::Homepage,
        UrlLabel::Npm,
        UrlLabel::Bower,
        UrlLabel::GooglePlay,
        UrlLabel::AppStore,
        UrlLabel::ChromeWebStore,
        UrlLabel::Published,
        UrlLabel::Video,
    ];

    pub fn key(self) -> &'static str {
        match self {
            UrlLabel::Github => "github",
            UrlLabel::Demo => "demo",
            UrlLabel::Homepage => "homepage",
            UrlLabel::Npm => "npm",
            UrlLabel::Bower => "bower",
            UrlLabel::GooglePlay => "googlePlay",
            UrlLabel::AppStore => "appStore",
            UrlLabel::ChromeWebStore => "chromeWebStore",
            UrlLabel::Published => "published",
            UrlLabel::Video => "video",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UrlLabel::Github => "Source code",
            UrlLabel::Demo => "Demo",
            UrlLabel::Homepage => "Homepage",
            UrlLabel::Npm => "npm package",
            UrlLabel::Bower => "Bower package",
            UrlLabel::GooglePlay => "Google Play",
            UrlLabel::AppStore => "App Store",
            UrlLabel::ChromeWebStore => "Chrome Web Store",
            UrlLabel::Published => "Publication",
            UrlLabel::Video => "Video",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.key() == key)
    }

    /// Labelled links of `post` in key order. Fails on the first unknown key.
    pub fn links(post: &PostData) -> Result<Vec<(UrlLabel, &str)>, AssetError> {
        post.urls
            .iter()
            .map(|(key, url)| {
                Self::from_key(key)
                    .map(|label| (label, url.as_str()))
                    .ok_or_else(|| AssetError::UnknownUrlLabel {
                        post: post.id.clone(),
                        key: key.clone(),
                    })
            })
            .collect()
    }
}
