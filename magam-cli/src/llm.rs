use anyhow::{Context, Result, bail};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmSection;

/// Assignment-analysis system prompt, carried over from the hosted chatbot
/// backend this command replaces. The model is asked for structured JSON,
/// but we never rely on that: the reply text goes back through the local
/// extractor regardless.
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"당신은 학생들의 과제 정보를 분석하고 일정을 관리하는 전문 도우미입니다.

다음 정보를 정확히 추출하여 JSON 형식으로 응답해주세요:
1. 과제 제목 (title)
2. 마감일 (deadline) - YYYY-MM-DD 형식
3. 배점 (points) - 숫자만
4. 제출 장소 (location)
5. 과제 설명 (description)
6. 중요도 (priority) - high/medium/low
7. 예상 소요 시간 (estimatedHours) - 숫자만

추가 기능:
- 마감일이 가까우면 경고 메시지를 포함해주세요
- 과제 난이도를 1-5 사이로 평가해주세요
- 성공적인 과제 수행을 위한 팁을 제공해주세요

응답 형식:
{
  "analysis": {
    "title": "과제명",
    "deadline": "YYYY-MM-DD",
    "points": 100,
    "location": "제출 장소",
    "description": "과제 설명",
    "priority": "high/medium/low",
    "estimatedHours": 5
  },
  "warnings": ["경고 메시지"],
  "difficulty": 3,
  "tips": ["팁1", "팁2"]
}"#;

const MAX_TOKENS: u32 = 800;

/// Send the notice text to the configured chat-completions endpoint and
/// return the reply text. One retry on failure before giving up.
pub async fn analyze_text(cfg: &LlmSection, message: &str) -> Result<String> {
    if cfg.provider != "openai" {
        bail!(
            "unsupported llm provider: {} (only openai-compatible endpoints)",
            cfg.provider
        );
    }

    let key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .context("build http client")?;

    match chat_complete(&client, cfg, &key, message).await {
        Ok(reply) => Ok(reply),
        Err(err) => {
            tracing::warn!("llm request failed, retrying once: {err:#}");
            chat_complete(&client, cfg, &key, message).await
        }
    }
}

async fn chat_complete(
    client: &reqwest::Client,
    cfg: &LlmSection,
    key: &str,
    message: &str,
) -> Result<String> {
    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        messages: Vec<Msg>,
        temperature: f32,
        max_tokens: u32,
    }

    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: MsgOut,
    }

    #[derive(Deserialize)]
    struct MsgOut {
        content: Option<String>,
    }

    let body = Req {
        model: cfg.model.clone(),
        messages: vec![
            Msg {
                role: "system".to_string(),
                content: ANALYSIS_SYSTEM_PROMPT.to_string(),
            },
            Msg {
                role: "user".to_string(),
                content: message.to_string(),
            },
        ],
        temperature: cfg.temperature,
        max_tokens: MAX_TOKENS,
    };

    let url = format!(
        "{}/v1/chat/completions",
        cfg.base_url.trim_end_matches('/')
    );

    let resp = client
        .post(&url)
        .header(AUTHORIZATION, format!("Bearer {key}"))
        .json(&body)
        .send()
        .await
        .context("chat completions request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("chat completions error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse chat completions response")?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    Ok(content.trim().to_string())
}
