//! Share-intent links for achievements.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::storage::ShareConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Twitter,
    Facebook,
    LinkedIn,
    WhatsApp,
}

impl SharePlatform {
    fn base_url(self) -> &'static str {
        match self {
            SharePlatform::Twitter => "https://twitter.com/intent/tweet",
            SharePlatform::Facebook => "https://www.facebook.com/sharer/sharer.php",
            SharePlatform::LinkedIn => "https://www.linkedin.com/sharing/share-offsite/",
            SharePlatform::WhatsApp => "https://wa.me/",
        }
    }
}

impl std::str::FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(SharePlatform::Twitter),
            "facebook" => Ok(SharePlatform::Facebook),
            "linkedin" => Ok(SharePlatform::LinkedIn),
            "whatsapp" => Ok(SharePlatform::WhatsApp),
            other => Err(format!("unknown share platform: {other}")),
        }
    }
}

/// Build a share-intent URL for `text`.
///
/// Twitter takes hashtags as their own parameter; WhatsApp gets everything
/// in one message; Facebook and LinkedIn only accept the link.
pub fn share_url(platform: SharePlatform, text: &str, config: &ShareConfig) -> Result<Url> {
    let app_url = Url::parse(&config.app_url)?;
    let hashtags: Vec<&str> = config
        .hashtags
        .iter()
        .map(|h| h.trim().trim_start_matches('#'))
        .filter(|h| !h.is_empty())
        .collect();

    let mut url = Url::parse(platform.base_url())?;
    {
        let mut query = url.query_pairs_mut();
        match platform {
            SharePlatform::Twitter => {
                query.append_pair("text", text);
                query.append_pair("url", app_url.as_str());
                if !hashtags.is_empty() {
                    query.append_pair("hashtags", &hashtags.join(","));
                }
            }
            SharePlatform::Facebook => {
                query.append_pair("u", app_url.as_str());
                query.append_pair("quote", text);
            }
            SharePlatform::LinkedIn => {
                query.append_pair("url", app_url.as_str());
            }
            SharePlatform::WhatsApp => {
                let tags: String = hashtags.iter().map(|h| format!(" #{h}")).collect();
                query.append_pair("text", &format!("{text}{tags} {app_url}"));
            }
        }
    }
    Ok(url)
}
