//! Narrative report generation through a text-generation provider

use crate::error::{Result, StockError};
use crate::fundamentals::FundamentalsSnapshot;
use crate::indicators::IndicatorSet;
use crate::prompts::ReportPrompt;
use brief_llm::{CompletionRequest, LLMError, LLMProvider, Message, StopReason};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const MAX_REPORT_TOKENS: usize = 2048;

/// Turns computed metrics into a Markdown report
///
/// Each report is a single user message sent with temperature 0. The
/// response text is returned as-is.
#[derive(Clone)]
pub struct NarrativeWriter {
    llm: Arc<dyn LLMProvider>,
    model: String,
    prompt: Arc<ReportPrompt>,
}

impl NarrativeWriter {
    pub fn new(llm: Arc<dyn LLMProvider>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            llm,
            model: model.into(),
            prompt: Arc::new(ReportPrompt::new()?),
        })
    }

    #[instrument(skip(self, indicators, fundamentals))]
    pub async fn write(
        &self,
        ticker: &str,
        indicators: &IndicatorSet,
        fundamentals: &FundamentalsSnapshot,
    ) -> Result<String> {
        let prompt = self.prompt.render(ticker, indicators, fundamentals)?;

        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(MAX_REPORT_TOKENS)
            .temperature(0.0)
            .build();

        let response = self.llm.complete(request).await?;
        debug!("Report generated ({} tokens)", response.usage.total());
        if response.stop_reason == StopReason::MaxTokens {
            warn!("Report for {} hit the {} token limit", ticker, MAX_REPORT_TOKENS);
        }

        response
            .message
            .text()
            .map(str::to_string)
            .ok_or_else(|| {
                StockError::Generation(LLMError::UnexpectedResponse(
                    "model returned no report text".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brief_llm::{CompletionResponse, StopReason, TokenUsage};
    use std::sync::Mutex;

    /// Records the last request and replies with fixed content
    struct StubLlm {
        reply: Option<String>,
        last: Mutex<Option<CompletionRequest>>,
    }

    impl StubLlm {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for StubLlm {
        async fn complete(&self, request: CompletionRequest) -> brief_llm::Result<CompletionResponse> {
            *self.last.lock().unwrap() = Some(request);
            Ok(CompletionResponse {
                message: brief_llm::Message {
                    role: brief_llm::Role::Assistant,
                    content: self.reply.clone(),
                },
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn indicators() -> IndicatorSet {
        IndicatorSet {
            window: 14,
            price: 189.1,
            sma: 185.42,
            ema: 186.03,
            rsi: 61.7,
            macd_line: 1.23,
            signal_line: 0.98,
            macd_histogram: 0.25,
        }
    }

    #[tokio::test]
    async fn test_write_sends_single_deterministic_message() {
        let llm = Arc::new(StubLlm::new(Some("### AAPL Stock Analysis\n...")));
        let writer = NarrativeWriter::new(llm.clone(), "gpt-4o-mini").unwrap();

        let report = writer
            .write("AAPL", &indicators(), &FundamentalsSnapshot::unavailable())
            .await
            .unwrap();
        assert_eq!(report, "### AAPL Stock Analysis\n...");

        let request = llm.last.lock().unwrap().take().unwrap();
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages.len(), 1);
        assert!(request.messages[0].text().unwrap().contains("RSI: 61.7"));
    }

    #[tokio::test]
    async fn test_empty_response_is_generation_error() {
        let writer = NarrativeWriter::new(Arc::new(StubLlm::new(None)), "gpt-4o-mini").unwrap();

        let result = writer
            .write("AAPL", &indicators(), &FundamentalsSnapshot::unavailable())
            .await;
        assert!(matches!(result, Err(StockError::Generation(_))));
    }
}
