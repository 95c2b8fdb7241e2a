use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::Transaction;
use crate::services::ledger_calculator;

/// An uploaded receipt photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    /// e.g. "image/jpeg"
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ReceiptImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Inline `data:` URL accepted by vision-capable completion models.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// A single line read off a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub description: String,
    pub amount: f64,
}

/// What the OCR model extracted from a receipt. The user reviews this
/// before anything is posted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptScan {
    pub items: Vec<ReceiptItem>,
    pub total: f64,
    pub date: Option<NaiveDate>,
}

impl ReceiptScan {
    /// Parse a model reply leniently.
    ///
    /// Replies that are not JSON yield an empty scan; missing or mistyped
    /// fields fall back to `""`, `0` and `None`. A surrounding markdown
    /// code fence is tolerated.
    pub fn from_reply(reply: &str) -> Self {
        let body = strip_code_fence(reply);
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("OCR reply is not valid JSON: {e}");
                return Self::default();
            }
        };

        let items = value
            .get("items")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .map(|it| ReceiptItem {
                        description: it
                            .get("description")
                            .and_then(|d| d.as_str())
                            .unwrap_or_default()
                            .to_string(),
                        amount: it.get("amount").map(lenient_number).unwrap_or(0.0),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let total = value.get("total").map(lenient_number).unwrap_or(0.0);

        let date = value
            .get("date")
            .and_then(|d| d.as_str())
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

        Self { items, total, date }
    }

    /// Sum of the line amounts.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// The amount to post: the printed total, or the line sum when the
    /// model could not read one.
    pub fn effective_total(&self) -> f64 {
        if self.total > 0.0 {
            self.total
        } else {
            self.items_total()
        }
    }

    /// Draft an expense from this scan for the user to confirm.
    ///
    /// The receipt date wins over `fallback_date`. The note lists the item
    /// descriptions and the budget month follows `cutoff_day`.
    pub fn to_expense(
        &self,
        account_id: Uuid,
        category_id: Option<Uuid>,
        fallback_date: NaiveDate,
        cutoff_day: u32,
    ) -> Transaction {
        let date = self.date.unwrap_or(fallback_date);
        let note = self
            .items
            .iter()
            .map(|i| i.description.trim())
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let draft = Transaction::expense(account_id, self.effective_total(), date)
            .with_budget_month(ledger_calculator::budget_month(date, cutoff_day))
            .with_note(note);
        match category_id {
            Some(category) => draft.with_category(category),
            None => draft,
        }
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop an optional language tag on the opening fence
    let rest = rest.split_once('\n').map_or(rest, |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn lenient_number(value: &serde_json::Value) -> f64 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}
