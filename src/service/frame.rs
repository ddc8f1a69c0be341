//! Farcaster Frame documents and the OG image URL they point at.

use reqwest::Url;

use crate::models::date_context::DateContext;

pub const HISTORY_PATH: &str = "/api/history";
pub const SPLASH_PATH: &str = "/splash.png";
pub const REFRESH_LABEL: &str = "🔄 More History!";
pub const SHARE_LABEL: &str = "Share";
pub const RETRY_LABEL: &str = "Try Again";

const IMAGE_THEME: &str = "light";
const IMAGE_FONT_SIZE: &str = "75px";
const IMAGE_LOGO: &str =
    "https://assets.vercel.com/image/upload/front/assets/design/vercel-triangle-black.svg";
const IMAGE_LOGO_SIZE: &str = "250";

/// Templated image URL on the OG rendering service; nothing is fetched.
pub fn history_image_url(base: &Url, date: &DateContext) -> String {
    let title = format!("{} {} in History", date.month_name(), date.day);
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&format!("{title}.png"));
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("theme", IMAGE_THEME)
        .append_pair("md", "1")
        .append_pair("fontSize", IMAGE_FONT_SIZE)
        .append_pair("images", IMAGE_LOGO)
        .append_pair("widths", IMAGE_LOGO_SIZE)
        .append_pair("heights", IMAGE_LOGO_SIZE);
    url.to_string()
}

pub fn success_frame(host: &str, image_url: &str) -> String {
    let origin = format!("https://{host}");
    render(&[
        ("fc:frame", "vNext"),
        ("fc:frame:image", image_url),
        ("fc:frame:button:1", REFRESH_LABEL),
        ("fc:frame:button:2", SHARE_LABEL),
        ("fc:frame:button:2:action", "link"),
        ("fc:frame:button:2:target", &origin),
        ("fc:frame:post_url", &format!("{origin}{HISTORY_PATH}")),
    ])
}

pub fn fallback_frame(host: &str) -> String {
    let origin = format!("https://{host}");
    render(&[
        ("fc:frame", "vNext"),
        ("fc:frame:image", &format!("{origin}{SPLASH_PATH}")),
        ("fc:frame:button:1", RETRY_LABEL),
        ("fc:frame:post_url", &format!("{origin}{HISTORY_PATH}")),
    ])
}

fn render(tags: &[(&str, &str)]) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    for (property, content) in tags {
        html.push_str(&format!(
            "  <meta property=\"{}\" content=\"{}\" />\n",
            property,
            escape_attr(content)
        ));
    }
    html.push_str("</head>\n<body></body>\n</html>\n");
    html
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
