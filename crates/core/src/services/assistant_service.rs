use crate::errors::CoreError;
use crate::models::chat::{
    ChatContext, ChatMessage, ChatProfile, ChatTransaction, CompletionRequest, ContentPart, ImageUrl,
};
use crate::models::ledger::Ledger;
use crate::models::plan::{AiFeature, Plan, CHAT_USAGE_LIMIT};
use crate::models::receipt::{ReceiptImage, ReceiptScan};
use crate::providers::completion::CompletionProvider;

/// Number of recent transactions shared with the chat assistant.
pub const CHAT_CONTEXT_TRANSACTIONS: usize = 10;

const OCR_SYSTEM_PROMPT: &str =
    "You are an OCR assistant that extracts transaction details from shopping receipts. Respond in JSON.";
const OCR_USER_PROMPT: &str = "Extract line items with description and amount, the total amount (in numbers) and purchase date (yyyy-mm-dd) from this receipt image. Reply with JSON {\"items\":[{\"description\":string,\"amount\":number}],\"total\":number,\"date\":string|null}.";
const CHAT_SYSTEM_PROMPT: &str =
    "You are a helpful financial assistant. Use the provided user data to answer questions.";

/// Receipt OCR and the finance chat assistant, on top of any
/// [`CompletionProvider`].
///
/// Plan gating and the chat usage limit are checked here; recording usage
/// is left to the caller.
pub struct AssistantService {
    provider: Box<dyn CompletionProvider>,
    model: String,
}

impl AssistantService {
    pub fn new(provider: Box<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Read a receipt photo into line items, a total and a date.
    ///
    /// Pro plan only. The reply is parsed leniently, so an unreadable
    /// answer yields an empty scan rather than an error.
    pub async fn scan_receipt(&self, plan: Plan, image: &ReceiptImage) -> Result<ReceiptScan, CoreError> {
        if !plan.limits().receipt_ocr {
            return Err(CoreError::PlanRestricted("Receipt OCR".into()));
        }
        if image.bytes.is_empty() {
            return Err(CoreError::ValidationError("Image file is required".into()));
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(OCR_SYSTEM_PROMPT),
                ChatMessage::user_parts(vec![
                    ContentPart::Text {
                        text: OCR_USER_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_data_url(),
                        },
                    },
                ]),
            ],
            temperature: 0.0,
            max_tokens: 500,
        };

        tracing::info!(
            feature = %AiFeature::Ocr,
            provider = self.provider.name(),
            bytes = image.bytes.len(),
            "sending receipt for OCR"
        );
        let reply = self.provider.complete(&request).await?;
        Ok(ReceiptScan::from_reply(&reply))
    }

    /// Answer a question about the user's finances.
    ///
    /// `usage_count` is the number of chat requests already logged for the
    /// user; at [`CHAT_USAGE_LIMIT`] or above the request is refused.
    pub async fn chat(&self, message: &str, usage_count: u32, context: &ChatContext) -> Result<String, CoreError> {
        if message.trim().is_empty() {
            return Err(CoreError::ValidationError("Message is required".into()));
        }
        if usage_count >= CHAT_USAGE_LIMIT {
            return Err(CoreError::UsageLimitReached {
                feature: AiFeature::Chat.to_string(),
                limit: CHAT_USAGE_LIMIT,
            });
        }

        let user_data = serde_json::to_string(context)
            .map_err(CoreError::serialization)?;

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(CHAT_SYSTEM_PROMPT),
                ChatMessage::user(format!("User data: {user_data}\n\n{message}")),
            ],
            temperature: 0.7,
            max_tokens: 300,
        };

        tracing::info!(
            feature = %AiFeature::Chat,
            provider = self.provider.name(),
            usage_count,
            "sending chat request"
        );
        self.provider.complete(&request).await
    }

    /// Profile plus the most recent transactions (newest first), as shared
    /// with the chat assistant.
    pub fn chat_context(ledger: &Ledger, profile_name: &str) -> ChatContext {
        // later insertions first among same-day transactions
        let mut recent: Vec<_> = ledger.transactions.iter().rev().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));

        ChatContext {
            profile: ChatProfile {
                name: profile_name.to_string(),
                default_currency: ledger.settings.default_currency.clone(),
            },
            transactions: recent
                .into_iter()
                .take(CHAT_CONTEXT_TRANSACTIONS)
                .map(|t| ChatTransaction {
                    date: t.date,
                    amount: t.amount,
                    note: t.note.clone(),
                })
                .collect(),
        }
    }
}
