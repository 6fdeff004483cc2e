use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A feed post that survived filtering and is ready for annotation.
/// Pipeline-local; never persisted itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Source-unique post id.
    pub id: String,
    pub title: String,
    pub body: String,
    /// Title and body joined with a blank line; the annotation input.
    pub combined_text: String,
    /// Source timestamp shifted to the configured fixed offset.
    pub created_at: NaiveDateTime,
    /// None for deleted accounts.
    pub author: Option<String>,
    pub source_url: String,
    pub flair: Option<String>,
}

/// The (score, summary) pair parsed from the annotation service's response.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// 0-10 scale, as defined by the instruction prompt.
    pub score: f64,
    pub summary: String,
}

/// One finalized digest row. Append-only; the curated flag is owned by the
/// downstream curation process and never mutated here.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestEntry {
    pub summary: String,
    pub created_at: NaiveDateTime,
    pub author: Option<String>,
    pub rating: Option<f64>,
    pub source_url: String,
    pub curated: bool,
}

impl DigestEntry {
    /// Build the persisted row for a freshly annotated candidate.
    pub fn from_annotation(candidate: &Candidate, annotation: &Annotation) -> Self {
        Self {
            summary: annotation.summary.clone(),
            created_at: candidate.created_at,
            author: candidate.author.clone(),
            rating: Some(annotation.score),
            source_url: candidate.source_url.clone(),
            curated: false,
        }
    }
}

/// Render a timestamp the way digest rows and diagnostics show it.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn digest_entry_starts_uncurated() {
        let candidate = Candidate {
            id: "abc123".into(),
            title: "New 7B model".into(),
            body: "Weights released.".into(),
            combined_text: "New 7B model\n\nWeights released.".into(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc(),
            author: Some("llama_fan".into()),
            source_url: "https://www.reddit.com/r/LocalLlama/comments/abc123".into(),
            flair: None,
        };
        let annotation = Annotation {
            score: 7.0,
            summary: "模型权重发布".into(),
        };

        let entry = DigestEntry::from_annotation(&candidate, &annotation);
        assert!(!entry.curated);
        assert_eq!(entry.rating, Some(7.0));
        assert_eq!(entry.author.as_deref(), Some("llama_fan"));
        assert_eq!(entry.created_at, candidate.created_at);
    }

    #[test]
    fn timestamp_formats_as_date_time() {
        let ts = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        assert_eq!(format_timestamp(ts), "1970-01-01 00:00:00");
    }
}
