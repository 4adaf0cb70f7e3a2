//! Thin outbound client for the remote ledger endpoint. The ledger is an
//! opaque request/response API multiplexed on the `action` field; the save
//! path is best-effort and its response body is never inspected.

use shared::protocol::{
    DateTotalResponse, LedgerRequest, StatsResponse, LEDGER_RESULT_SUCCESS,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid ledger endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ledger rejected request: {msg}")]
    Rejected { msg: String },
}

/// Revenue figures returned by a successful `get_stats` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub today: i64,
    pub month: i64,
    pub year: i64,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl LedgerClient {
    pub fn new(endpoint: &str) -> Result<Self, LedgerError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Record a completed sale. The write is fire-and-forget: the response
    /// is not read beyond transport completion.
    pub async fn submit_order(
        &self,
        order_details: &str,
        total_money: i64,
    ) -> Result<(), LedgerError> {
        let payload = LedgerRequest::Save {
            order_details: order_details.to_string(),
            total_money,
        };
        self.http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;
        debug!(total_money, "order submitted to ledger");
        Ok(())
    }

    /// Password-gated revenue summary: today / this month / this year plus
    /// the count of printed orders.
    pub async fn fetch_stats(&self, password: &str) -> Result<LedgerStats, LedgerError> {
        let payload = LedgerRequest::GetStats {
            password: password.to_string(),
        };
        let body: StatsResponse = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;
        if body.result != LEDGER_RESULT_SUCCESS {
            return Err(LedgerError::Rejected { msg: body.result });
        }
        Ok(LedgerStats {
            today: body.today,
            month: body.month,
            year: body.year,
            count: body.count,
        })
    }

    /// Revenue total for one calendar day, `target_date` as "YYYY-MM-DD".
    pub async fn check_date(
        &self,
        password: &str,
        target_date: &str,
    ) -> Result<i64, LedgerError> {
        let payload = LedgerRequest::CheckDate {
            password: password.to_string(),
            target_date: target_date.to_string(),
        };
        let body: DateTotalResponse = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;
        if body.result != LEDGER_RESULT_SUCCESS {
            return Err(LedgerError::Rejected {
                msg: body.msg.unwrap_or_else(|| body.result.clone()),
            });
        }
        Ok(body.total)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
