use async_trait::async_trait;
use serde::Deserialize;

use ai_client::{ChatClient, ChatError, WireMessage};
use redbrief_common::{Annotation, PipelineError, Result};

use crate::traits::Annotate;

/// Instruction prompt sent with every scoring request. It defines the
/// response contract: a JSON object with `score` and `content_Summary`
/// keys and a Chinese-language summary.
const SCORING_PROMPT: &str = r#"
# 字符串
你是RedditAIAnalystan，一名擅长分析和评估Reddit上与人工智能相关内容的AI专家。你的目标是解剖任何AI内容，批评和评估其质量、信息量以及对于AI日报写作的相关性。

## 技能
### 技能1：内容分析和评估
- 分解所提供的AI相关内容。
- 经过彻底分析后，按照0-10的等级对内容进行评分，其中10表示最重要。
- 对于6分或以上的内容评级，突出主要思想和关键数据。

### 技能2：数据提取和总结
- 以易懂的格式组织提取的信息。
- 使用简明扼要的中文概括内容，避免不必要的信息。
- 遵循中文“json”格式，包括字段：“score”和“content_Summary”。例如，
{
"score": "",
"content_Summary": "中文内容摘要"
}
## 约束条件：
- 仅分析和评估来自Reddit的与人工智能相关的内容。
- 评分遵守传播性、信息量和相关性的标准。
- 严格遵守提供的输出格式。
- 保持摘要的简洁和清晰。
- 仅使用中文进行提取和摘要。
"#;

/// What the scoring service is asked to return. Both keys are required;
/// a reply missing either one is malformed, not a null annotation.
#[derive(Debug, Deserialize)]
struct WireAnnotation {
    score: serde_json::Value,
    #[serde(rename = "content_Summary")]
    content_summary: String,
}

/// Scores and summarizes one candidate's combined text via the
/// chat-completions service.
pub struct Annotator {
    client: ChatClient,
}

impl Annotator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Annotate for Annotator {
    async fn annotate(&self, content: &str) -> Result<Annotation> {
        // User message first, system prompt second: the order the scoring
        // endpoint expects.
        let result = self
            .client
            .chat(vec![
                WireMessage::user(content),
                WireMessage::system(SCORING_PROMPT),
            ])
            .await;

        // Any deviation from the expected response shape is malformed, not
        // fatal: a service that answered with garbage is still answering.
        let raw = match result {
            Ok(raw) => raw,
            Err(ChatError::Envelope { raw }) => {
                return Err(PipelineError::MalformedResponse { raw });
            }
            Err(e) => return Err(PipelineError::Remote(e.to_string())),
        };

        parse_annotation(&raw)
    }
}

/// Parse the first-choice content as the structured annotation payload.
/// An LLM's free-text output is not guaranteed structured, so every exit
/// from this function short of success is `MalformedResponse` carrying the
/// raw text for diagnosis.
fn parse_annotation(raw: &str) -> Result<Annotation> {
    let malformed = || PipelineError::MalformedResponse {
        raw: raw.to_string(),
    };

    let wire: WireAnnotation = serde_json::from_str(raw).map_err(|_| malformed())?;

    let score = match &wire.score {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(malformed)?;

    Ok(Annotation {
        score,
        summary: wire.content_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn non_json_reply_body_is_malformed_not_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).body("Sorry, plain text today.");
        });

        let annotator =
            Annotator::new(ChatClient::new("sk-test", "gpt-4o").with_base_url(server.base_url()));
        let err = annotator.annotate("some post").await.unwrap_err();

        match err {
            PipelineError::MalformedResponse { raw } => {
                assert_eq!(raw, "Sorry, plain text today.");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_choices_content_is_malformed_not_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(serde_json::json!({"choices": []}));
        });

        let annotator =
            Annotator::new(ChatClient::new("sk-test", "gpt-4o").with_base_url(server.base_url()));
        let err = annotator.annotate("some post").await.unwrap_err();

        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn api_error_status_stays_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(502).body("bad gateway");
        });

        let annotator =
            Annotator::new(ChatClient::new("sk-test", "gpt-4o").with_base_url(server.base_url()));
        let err = annotator.annotate("some post").await.unwrap_err();

        assert!(matches!(err, PipelineError::Remote(_)));
    }

    #[test]
    fn numeric_score_parses() {
        let annotation =
            parse_annotation(r#"{"score": 7, "content_Summary": "模型权重发布"}"#).unwrap();
        assert_eq!(annotation.score, 7.0);
        assert_eq!(annotation.summary, "模型权重发布");
    }

    #[test]
    fn string_score_parses() {
        let annotation =
            parse_annotation(r#"{"score": "3", "content_Summary": "小更新"}"#).unwrap();
        assert_eq!(annotation.score, 3.0);
    }

    #[test]
    fn free_text_reply_is_malformed() {
        let raw = "I'm sorry, I can't produce JSON today.";
        let err = parse_annotation(raw).unwrap_err();
        match err {
            PipelineError::MalformedResponse { raw: got } => assert_eq!(got, raw),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn missing_summary_key_is_malformed() {
        let err = parse_annotation(r#"{"score": 7}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_score_key_is_malformed() {
        let err = parse_annotation(r#"{"content_Summary": "摘要"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn non_numeric_score_is_malformed() {
        let err =
            parse_annotation(r#"{"score": "very high", "content_Summary": "摘要"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn lowercase_summary_key_is_malformed() {
        // The contract key is content_Summary, capital S. Anything else is
        // a deviation from the agreed shape.
        let err =
            parse_annotation(r#"{"score": 7, "content_summary": "摘要"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }
}
