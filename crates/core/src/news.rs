// News items, categorisation and upcoming calendar events

use crate::info::{unwrap_raw, TickerInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NEWS_LIMIT: usize = 10;

/// News item as returned by the Yahoo search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNewsItem {
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub link: Option<String>,
    pub provider_publish_time: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub resolutions: Vec<ThumbnailResolution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThumbnailResolution {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
    pub link: String,
    /// `YYYY-MM-DD HH:MM` in UTC, empty when unknown
    pub published: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail: String,
}

impl From<RawNewsItem> for NewsItem {
    fn from(raw: RawNewsItem) -> Self {
        let published = raw
            .provider_publish_time
            .filter(|secs| *secs > 0)
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        let thumbnail = raw
            .thumbnail
            .and_then(|t| t.resolutions.into_iter().next())
            .map(|r| r.url)
            .unwrap_or_default();

        Self {
            title: raw.title.unwrap_or_else(|| "No title".to_string()),
            publisher: raw.publisher.unwrap_or_else(|| "Unknown".to_string()),
            link: raw.link.unwrap_or_default(),
            published,
            kind: raw.kind.unwrap_or_else(|| "article".to_string()),
            thumbnail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalendarEvents {
    pub earnings_date: Option<String>,
    pub dividend_date: Option<String>,
    pub ex_dividend_date: Option<String>,
}

impl CalendarEvents {
    pub fn from_info(info: &TickerInfo) -> Self {
        let day = |key: &str| info.timestamp(key).map(|ts| ts.format("%Y-%m-%d").to_string());

        // quoteSummary nests the next earnings date under calendarEvents.earnings
        let earnings_date = day("earningsTimestamp").or_else(|| {
            let secs = info
                .raw("earnings")?
                .get("earningsDate")?
                .as_array()?
                .first()
                .map(unwrap_raw)?
                .as_i64()?;
            DateTime::<Utc>::from_timestamp(secs, 0).map(|ts| ts.format("%Y-%m-%d").to_string())
        });

        Self {
            earnings_date,
            dividend_date: day("dividendDate"),
            ex_dividend_date: day("exDividendDate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Earnings,
    Analyst,
    Product,
    Market,
    Other,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 5] = [
        Self::Earnings,
        Self::Analyst,
        Self::Product,
        Self::Market,
        Self::Other,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Earnings => &["earnings", "quarter", "revenue", "profit", "eps", "guidance", "beat", "miss"],
            Self::Analyst => &["analyst", "upgrade", "downgrade", "rating", "price target", "buy", "sell", "hold"],
            Self::Product => &["launch", "product", "release", "announce", "new", "innovation"],
            Self::Market => &["market", "stock", "shares", "trading", "investor", "rally", "drop", "surge"],
            Self::Other => &[],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Earnings => "Earnings",
            Self::Analyst => "Analyst",
            Self::Product => "Product",
            Self::Market => "Market",
            Self::Other => "Other",
        }
    }

    /// First category with a keyword in the title (substring match)
    pub fn classify(title: &str) -> Self {
        let title = title.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.keywords().iter().any(|kw| title.contains(kw)))
            .unwrap_or(Self::Other)
    }
}

/// News grouped by category in display order; every category is present
pub fn categorize_news(news: &[NewsItem]) -> Vec<(NewsCategory, Vec<&NewsItem>)> {
    let mut groups: Vec<(NewsCategory, Vec<&NewsItem>)> =
        NewsCategory::ALL.into_iter().map(|c| (c, Vec::new())).collect();

    for item in news {
        let category = NewsCategory::classify(&item.title);
        if let Some((_, items)) = groups.iter_mut().find(|(c, _)| *c == category) {
            items.push(item);
        }
    }
    groups
}

pub fn format_news_markdown(ticker: &str, news: &[NewsItem], calendar: Option<&CalendarEvents>) -> String {
    let mut lines = Vec::new();
    lines.push(format!("# News: {}", ticker));
    lines.push(format!("\n**Generated:** {}", Utc::now().to_rfc3339()));
    lines.push(String::new());

    if let Some(calendar) = calendar {
        lines.push("## Upcoming Events".to_string());
        lines.push("| Event | Date |".to_string());
        lines.push("|-------|------|".to_string());
        if let Some(date) = &calendar.earnings_date {
            lines.push(format!("| Earnings | {} |", date));
        }
        if let Some(date) = &calendar.ex_dividend_date {
            lines.push(format!("| Ex-Dividend | {} |", date));
        }
        if let Some(date) = &calendar.dividend_date {
            lines.push(format!("| Dividend Payment | {} |", date));
        }
        lines.push(String::new());
    }

    if news.is_empty() {
        lines.push("## Recent News".to_string());
        lines.push("No recent news found.".to_string());
        return lines.join("\n");
    }

    for (category, items) in categorize_news(news) {
        if items.is_empty() {
            continue;
        }
        lines.push(format!("## {} News", category.title()));
        lines.push(String::new());

        for item in items {
            lines.push(format!("### {}", item.title));
            lines.push(format!("*{} - {}*", item.publisher, item.published));
            if !item.link.is_empty() {
                lines.push(format!("[Read more]({})", item.link));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            publisher: "Reuters".to_string(),
            link: "https://example.com/a".to_string(),
            published: "2024-05-01 12:30".to_string(),
            kind: "STORY".to_string(),
            thumbnail: String::new(),
        }
    }

    #[test]
    fn test_raw_item_defaults() {
        let raw: RawNewsItem = serde_json::from_value(json!({
            "providerPublishTime": 1_714_566_600_i64,
            "thumbnail": {"resolutions": [{"url": "https://img/1.jpg"}, {"url": "https://img/2.jpg"}]}
        }))
        .unwrap();
        let news = NewsItem::from(raw);

        assert_eq!(news.title, "No title");
        assert_eq!(news.publisher, "Unknown");
        assert_eq!(news.kind, "article");
        assert_eq!(news.published, "2024-05-01 12:30");
        assert_eq!(news.thumbnail, "https://img/1.jpg");
    }

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(NewsCategory::classify("Acushnet beats Q1 EARNINGS"), NewsCategory::Earnings);
        assert_eq!(NewsCategory::classify("Analyst upgrade for golf maker"), NewsCategory::Analyst);
        // "revenue" (earnings) is checked before "upgrade" (analyst)
        assert_eq!(NewsCategory::classify("Upgrade after revenue jump"), NewsCategory::Earnings);
        assert_eq!(NewsCategory::classify("Company unveils new driver"), NewsCategory::Product);
        assert_eq!(NewsCategory::classify("Shares rally on Friday"), NewsCategory::Market);
        assert_eq!(NewsCategory::classify("CEO interview"), NewsCategory::Other);
    }

    #[test]
    fn test_categorize_keeps_order() {
        let news = vec![item("CEO interview"), item("Q2 profit"), item("Quarter preview")];
        let groups = categorize_news(&news);

        assert_eq!(groups.len(), 5);
        assert_eq!(groups[0].0, NewsCategory::Earnings);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].title, "Q2 profit");
        assert_eq!(groups[4].1.len(), 1);
    }

    #[test]
    fn test_calendar_from_info() {
        let mut info = TickerInfo::new();
        info.insert("exDividendDate", 1_700_000_000_i64);
        info.insert(
            "earnings",
            json!({"earningsDate": [{"raw": 1_714_566_600_i64, "fmt": "2024-05-01"}]}),
        );

        let calendar = CalendarEvents::from_info(&info);
        assert_eq!(calendar.earnings_date.as_deref(), Some("2024-05-01"));
        assert_eq!(calendar.ex_dividend_date.as_deref(), Some("2023-11-14"));
        assert!(calendar.dividend_date.is_none());
    }

    #[test]
    fn test_markdown_with_calendar() {
        let calendar = CalendarEvents {
            earnings_date: Some("2024-05-01".to_string()),
            ..Default::default()
        };
        let md = format_news_markdown("GOLF", &[item("Q1 earnings beat")], Some(&calendar));

        assert!(md.starts_with("# News: GOLF"));
        assert!(md.contains("## Upcoming Events\n| Event | Date |\n|-------|------|\n| Earnings | 2024-05-01 |"));
        assert!(!md.contains("Ex-Dividend"));
        assert!(md.contains("## Earnings News\n\n### Q1 earnings beat\n*Reuters - 2024-05-01 12:30*\n[Read more](https://example.com/a)"));
        assert!(!md.contains("## Other News"));
    }

    #[test]
    fn test_markdown_without_news() {
        let md = format_news_markdown("GOLF", &[], None);
        assert!(md.ends_with("## Recent News\nNo recent news found."));
        assert!(!md.contains("Upcoming Events"));
    }
}
