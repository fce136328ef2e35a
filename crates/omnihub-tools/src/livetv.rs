//! Live TV channel catalog and stream resolution.
//!
//! The catalog is static data shipped with the service. Browsing it is free;
//! resolving a playable stream URL is the charged operation.

use serde::Serialize;

use crate::AdapterError;

/// One live TV channel.
#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    /// Stable channel identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Logo URL.
    pub logo: &'static str,
    /// HLS playlist URL.
    pub stream_url: &'static str,
    /// Category ("News", "Sports", ...).
    pub category: &'static str,
    /// Upstream provider.
    pub provider: &'static str,
    /// Whether the channel is currently streamable.
    pub active: bool,
}

/// A resolved, playable stream.
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    /// The resolved channel id.
    pub channel_id: &'static str,
    /// Channel display name.
    pub channel_name: &'static str,
    /// HLS playlist URL to hand to the player.
    pub stream_url: &'static str,
    /// Channel category.
    pub category: &'static str,
}

macro_rules! jazztv {
    ($id:literal, $name:literal, $logo:literal, $stream:literal, $category:literal) => {
        Channel {
            id: $id,
            name: $name,
            logo: concat!("https://jazztv.com.pk/images/channels/", $logo),
            stream_url: $stream,
            category: $category,
            provider: "JazzTV",
            active: true,
        }
    };
}

/// The JazzTV / Tamasha channel lineup.
const CHANNELS: &[Channel] = &[
    // News
    jazztv!("geo_news", "Geo News", "geo-news.webp",
        "https://jfrsgeo.cdn.jfrstvdemo.com/geonews/jfrstv_geo_news_720p/playlist.m3u8", "News"),
    jazztv!("ary_news", "ARY News", "ary-news.webp",
        "https://jfrsary.cdn.jfrstvdemo.com/arynews/jfrstv_ary_news_720p/playlist.m3u8", "News"),
    jazztv!("express_news", "Express News", "express-news.webp",
        "https://jfrsexp.cdn.jfrstvdemo.com/expressnews/jfrstv_express_news_720p/playlist.m3u8", "News"),
    jazztv!("samaa_tv", "Samaa TV", "samaa.webp",
        "https://jfrssamaa.cdn.jfrstvdemo.com/samaa/jfrstv_samaa_720p/playlist.m3u8", "News"),
    jazztv!("dunya_news", "Dunya News", "dunya-news.webp",
        "https://jfrsdunya.cdn.jfrstvdemo.com/dunyanews/jfrstv_dunya_news_720p/playlist.m3u8", "News"),
    jazztv!("92_news", "92 News", "92-news.webp",
        "https://jfrs92.cdn.jfrstvdemo.com/92news/jfrstv_92_news_720p/playlist.m3u8", "News"),
    jazztv!("bol_news", "BOL News", "bol-news.webp",
        "https://jfrsbol.cdn.jfrstvdemo.com/bolnews/jfrstv_bol_news_720p/playlist.m3u8", "News"),
    jazztv!("hum_news", "HUM News", "hum-news.webp",
        "https://jfrshum.cdn.jfrstvdemo.com/humnews/jfrstv_hum_news_720p/playlist.m3u8", "News"),
    // Entertainment
    jazztv!("hum_tv", "HUM TV", "hum-tv.webp",
        "https://jfrshum.cdn.jfrstvdemo.com/humtv/jfrstv_hum_tv_720p/playlist.m3u8", "Entertainment"),
    jazztv!("ary_digital", "ARY Digital", "ary-digital.webp",
        "https://jfrsary.cdn.jfrstvdemo.com/arydigital/jfrstv_ary_digital_720p/playlist.m3u8", "Entertainment"),
    jazztv!("geo_entertainment", "Geo Entertainment", "geo-entertainment.webp",
        "https://jfrsgeo.cdn.jfrstvdemo.com/geoent/jfrstv_geo_ent_720p/playlist.m3u8", "Entertainment"),
    jazztv!("express_ent", "Express Entertainment", "express-ent.webp",
        "https://jfrsexp.cdn.jfrstvdemo.com/expressent/jfrstv_express_ent_720p/playlist.m3u8", "Entertainment"),
    // Sports
    jazztv!("ptv_sports", "PTV Sports", "ptv-sports.webp",
        "https://jfrsptv.cdn.jfrstvdemo.com/ptvsports/jfrstv_ptv_sports_720p/playlist.m3u8", "Sports"),
    jazztv!("ten_sports", "Ten Sports", "ten-sports.webp",
        "https://jfrsten.cdn.jfrstvdemo.com/tensports/jfrstv_ten_sports_720p/playlist.m3u8", "Sports"),
    // Religious
    jazztv!("madani_channel", "Madani Channel", "madani.webp",
        "https://jfrsmadani.cdn.jfrstvdemo.com/madani/jfrstv_madani_720p/playlist.m3u8", "Religious"),
    jazztv!("qtv", "QTV", "qtv.webp",
        "https://jfrsqtv.cdn.jfrstvdemo.com/qtv/jfrstv_qtv_720p/playlist.m3u8", "Religious"),
    // Kids
    jazztv!("cartoon_network", "Cartoon Network", "cartoon-network.webp",
        "https://jfrscn.cdn.jfrstvdemo.com/cn/jfrstv_cn_720p/playlist.m3u8", "Kids"),
    jazztv!("nick", "Nickelodeon", "nick.webp",
        "https://jfrsnick.cdn.jfrstvdemo.com/nick/jfrstv_nick_720p/playlist.m3u8", "Kids"),
];

/// Adapter for the live TV catalog.
#[derive(Debug, Clone, Default)]
pub struct LiveTv;

impl LiveTv {
    /// Create a new live TV adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The full channel lineup.
    #[must_use]
    pub fn channels(&self) -> &'static [Channel] {
        CHANNELS
    }

    /// Channels in one category (case-insensitive).
    #[must_use]
    pub fn channels_by_category(&self, category: &str) -> Vec<&'static Channel> {
        CHANNELS
            .iter()
            .filter(|ch| ch.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Resolve the playable stream for a channel.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown channel ids and `Unavailable` for
    /// channels that are currently inactive.
    pub fn resolve_stream(&self, channel_id: &str) -> Result<StreamReport, AdapterError> {
        let channel = CHANNELS
            .iter()
            .find(|ch| ch.id == channel_id)
            .ok_or_else(|| AdapterError::NotFound(format!("channel: {channel_id}")))?;

        if !channel.active {
            return Err(AdapterError::Unavailable(format!(
                "channel temporarily unavailable: {channel_id}"
            )));
        }

        Ok(StreamReport {
            channel_id: channel.id,
            channel_name: channel.name,
            stream_url: channel.stream_url,
            category: channel.category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_populated() {
        let tv = LiveTv::new();
        assert_eq!(tv.channels().len(), 18);

        // Channel ids are unique.
        let mut ids: Vec<_> = tv.channels().iter().map(|ch| ch.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 18);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let tv = LiveTv::new();
        assert_eq!(tv.channels_by_category("news").len(), 8);
        assert_eq!(tv.channels_by_category("SPORTS").len(), 2);
        assert!(tv.channels_by_category("cooking").is_empty());
    }

    #[test]
    fn resolve_known_channel() {
        let tv = LiveTv::new();
        let report = tv.resolve_stream("geo_news").unwrap();
        assert_eq!(report.channel_name, "Geo News");
        assert!(report.stream_url.ends_with(".m3u8"));
    }

    #[test]
    fn resolve_unknown_channel() {
        let tv = LiveTv::new();
        assert!(matches!(
            tv.resolve_stream("does_not_exist"),
            Err(AdapterError::NotFound(_))
        ));
    }
}
