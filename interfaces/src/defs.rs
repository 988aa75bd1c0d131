use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Separator placed between an article's title and description when the two
/// are joined into a single text sample.
pub const TEXT_SEPARATOR: &str = " ";

/// A news article as delivered by the search endpoint.
///
/// Only the fields the pipeline reads are typed; everything else the endpoint
/// sends is kept in `extra` so a persisted batch round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Kept as sent; a malformed timestamp must not reject the batch.
    #[serde(rename = "publishedAt", default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            published_at: None,
            extra: Map::new(),
        }
    }

    /// Parsed publication time, or `None` when absent or not RFC 3339.
    pub fn published_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Title and description joined by [`TEXT_SEPARATOR`]. A missing
    /// description contributes an empty string, never drops the article.
    pub fn training_text(&self) -> String {
        format!(
            "{}{}{}",
            self.title,
            TEXT_SEPARATOR,
            self.description.as_deref().unwrap_or("")
        )
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered articles from one fetch. Overwritten wholesale on every fetch.
pub type RawArticleBatch = Vec<Article>;

/// Binary training label, stored as 0/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn as_f64(self) -> f64 {
        match self {
            Label::Negative => 0.0,
            Label::Positive => 1.0,
        }
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        match label {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub text: String,
    pub label: Label,
}

/// Rows derived 1:1 from a raw batch.
pub type TrainingTable = Vec<TrainingRow>;

/// Outcome of scoring the latest articles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inference {
    /// Mean positive-class probability, always within [0, 1].
    Likelihood(f64),
    /// Nothing was available to score. Not an error.
    Unavailable,
}

impl Inference {
    pub fn likelihood(&self) -> Option<f64> {
        match self {
            Inference::Likelihood(value) => Some(*value),
            Inference::Unavailable => None,
        }
    }
}

// Labeling note:
// No real ground truth exists for these articles. Any type implementing
// `LabelPolicy` decides the label of each row; the shipped policy is a coin
// flip (see `baseline.rs`). Swap in a real label source here.

pub trait LabelPolicy: Send + Sync {
    fn assign(&self, article: &Article) -> Label;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_text_joins_title_and_description() {
        let article = Article::new("A wins debate", Some("Polls shift".to_string()));
        assert_eq!(article.training_text(), "A wins debate Polls shift");
    }

    #[test]
    fn missing_description_yields_empty_suffix() {
        let article = Article::new("C ties", None);
        assert_eq!(article.training_text(), "C ties ");
    }

    #[test]
    fn article_keeps_unknown_fields() {
        let raw = r#"{
            "source": {"id": null, "name": "Wire"},
            "author": "Staff",
            "title": null,
            "description": "Details",
            "url": "https://example.com/a",
            "publishedAt": "2024-10-01T12:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(raw).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.description.as_deref(), Some("Details"));
        assert!(article.published_time().is_some());
        assert_eq!(article.extra.get("author"), Some(&Value::from("Staff")));

        let written = serde_json::to_value(&article).unwrap();
        assert_eq!(written["url"], "https://example.com/a");
        assert_eq!(written["source"]["name"], "Wire");
    }

    #[test]
    fn malformed_timestamp_does_not_reject_batch() {
        let raw = r#"[
            {"title": "Rally draws crowd", "publishedAt": "2024-10-01 12:00"},
            {"title": "Polls tighten", "publishedAt": "2024-10-01T12:00:00+02:00"}
        ]"#;
        let batch: RawArticleBatch = serde_json::from_str(raw).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].published_at.as_deref(), Some("2024-10-01 12:00"));
        assert_eq!(batch[0].published_time(), None);
        assert_eq!(
            batch[1].published_time().map(|t| t.to_rfc3339()),
            Some("2024-10-01T10:00:00+00:00".to_string())
        );

        let written = serde_json::to_value(&batch).unwrap();
        assert_eq!(written[0]["publishedAt"], "2024-10-01 12:00");
    }

    #[test]
    fn label_rejects_values_other_than_zero_and_one() {
        assert_eq!(Label::try_from(1).unwrap(), Label::Positive);
        assert!(Label::try_from(2).is_err());
        assert_eq!(u8::from(Label::Negative), 0);
    }
}
