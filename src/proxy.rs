use crate::config::ProxyConfig;
use crate::logging::{Exchange, SharedJournal};
use crate::translate::anthropic_types::{ErrorResponse, MessagesRequest, MessagesResponse};
use crate::translate::errors::GatewayFailure;
use crate::translate::openai_types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::translate::request::anthropic_to_openai;
use crate::translate::response::openai_to_anthropic;

use std::error::Error as _;
use std::time::Instant;

/// Outcome of proxying one Messages request
#[derive(Debug)]
pub enum ProxyResult {
    Success(MessagesResponse),
    Error(ErrorResponse, u16),
}

impl From<GatewayFailure> for ProxyResult {
    fn from(failure: GatewayFailure) -> Self {
        let (err, status) = failure.to_response();
        Self::Error(err, status)
    }
}

/// Forward an Anthropic request to the backend as a single non-streaming
/// chat completion. Every failure is folded into `ProxyResult::Error`.
pub async fn proxy_messages(
    req: &MessagesRequest,
    config: &ProxyConfig,
    client: &reqwest::Client,
    journal: &SharedJournal,
) -> ProxyResult {
    let started = Instant::now();
    let openai_req = anthropic_to_openai(req, &config.models);
    let url = config.backend.chat_completions_url();

    if req.stream {
        tracing::warn!(model = %req.model, "Streaming requested but not supported; answering in one piece");
    }

    tracing::info!(
        url = %url,
        model = %req.model,
        backend_model = %openai_req.model,
        messages = openai_req.messages.len(),
        "Forwarding chat completion"
    );

    let outcome = call_backend(&openai_req, &url, config, client).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut exchange = Exchange {
        message_id: None,
        requested_model: req.model.clone(),
        backend_model: openai_req.model.clone(),
        status: 200,
        input_tokens: 0,
        output_tokens: 0,
        latency_ms,
        error: None,
    };

    let result = match outcome {
        Ok(backend_resp) => {
            if let Some(reason) = backend_resp.first_finish_reason() {
                tracing::debug!(finish_reason = reason, "Backend finish reason (reported as end_turn)");
            }
            let resp = openai_to_anthropic(&backend_resp, &req.model);
            tracing::info!(
                id = %resp.id,
                input_tokens = resp.usage.input_tokens,
                output_tokens = resp.usage.output_tokens,
                latency_ms,
                "Completed"
            );
            exchange.message_id = Some(resp.id.clone());
            exchange.input_tokens = resp.usage.input_tokens;
            exchange.output_tokens = resp.usage.output_tokens;
            ProxyResult::Success(resp)
        }
        Err(failure) => {
            tracing::warn!(error = %failure, latency_ms, "Backend call failed");
            exchange.status = failure.status_code();
            exchange.error = Some(failure.to_string());
            ProxyResult::from(failure)
        }
    };

    journal.exchange(&exchange);
    result
}

/// Single attempt, no retry. The client's timeout bounds the whole call.
async fn call_backend(
    openai_req: &ChatCompletionRequest,
    url: &str,
    config: &ProxyConfig,
    client: &reqwest::Client,
) -> std::result::Result<ChatCompletionResponse, GatewayFailure> {
    let api_key = config.backend.resolve_api_key();

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(openai_req)
        .send()
        .await
        .map_err(transport_failure)?;

    let status = response.status();
    let body = response.text().await.map_err(transport_failure)?;

    tracing::debug!(status = status.as_u16(), body_len = body.len(), "Backend responded");

    if !status.is_success() {
        return Err(GatewayFailure::BackendStatus {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        GatewayFailure::transport(format!(
            "invalid backend response: {}. Body: {}",
            e,
            truncate(&body, 300)
        ))
    })
}

/// reqwest's top-level message hides the cause (refused, DNS, ...), so the
/// whole source chain is included.
fn transport_failure(err: reqwest::Error) -> GatewayFailure {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }

    if err.is_timeout() {
        GatewayFailure::timeout(detail)
    } else {
        GatewayFailure::transport(detail)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate("aé", 2), "a");
    }

    #[test]
    fn test_gateway_failure_into_result() {
        let result = ProxyResult::from(GatewayFailure::BackendStatus {
            status: 500,
            body: "oops".to_string(),
        });
        match result {
            ProxyResult::Error(err, status) => {
                assert_eq!(status, 500);
                assert_eq!(err.error.message, "Backend error: 500 - oops");
            }
            ProxyResult::Success(_) => panic!("Expected error"),
        }
    }
}
