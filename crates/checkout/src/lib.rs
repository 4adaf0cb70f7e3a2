//! Checkout coordinator: ties the physical print action and the irreversible
//! remote ledger write into one human-confirmed transaction.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use cart::CartEngine;
use ledger_client::LedgerClient;
use shared::{
    domain::{OrderLine, Sticker},
    error::CheckoutError,
    protocol::format_order_details,
};
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    AwaitingConfirmation,
    Printing,
    AwaitingPrintAck,
    Persisting,
    Done,
    Cancelled,
}

impl CheckoutState {
    pub fn name(self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::AwaitingConfirmation => "awaiting confirmation",
            CheckoutState::Printing => "printing",
            CheckoutState::AwaitingPrintAck => "awaiting print ack",
            CheckoutState::Persisting => "persisting",
            CheckoutState::Done => "done",
            CheckoutState::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Completed,
    Cancelled,
}

/// The platform print call gives no completion signal, so both suspensions
/// around it are fixed-delay waits: one for the artifact to render, one for
/// the platform print UI to dismiss.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutDelays {
    pub print_render: Duration,
    pub print_dismiss: Duration,
}

impl Default for CheckoutDelays {
    fn default() -> Self {
        Self {
            print_render: Duration::from_millis(500),
            print_dismiss: Duration::from_millis(500),
        }
    }
}

impl CheckoutDelays {
    pub fn none() -> Self {
        Self {
            print_render: Duration::ZERO,
            print_dismiss: Duration::ZERO,
        }
    }
}

/// Read-only copy of the cart taken at `request_checkout`. Stickers, the
/// serialized order and the persisted total all come from this snapshot,
/// never from the live cart, which may already be cleared by then.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    pub lines: Vec<OrderLine>,
    pub total: i64,
}

/// Seam to the platform's native print facility.
#[async_trait]
pub trait StickerPrinter: Send + Sync {
    async fn print(&self, stickers: &[Sticker]) -> anyhow::Result<()>;
}

pub struct CheckoutCoordinator {
    state: CheckoutState,
    snapshot: Option<OrderSnapshot>,
    artifact: Vec<Sticker>,
    printer: Arc<dyn StickerPrinter>,
    ledger: LedgerClient,
    delays: CheckoutDelays,
}

impl CheckoutCoordinator {
    pub fn new(printer: Arc<dyn StickerPrinter>, ledger: LedgerClient, delays: CheckoutDelays) -> Self {
        Self {
            state: CheckoutState::Idle,
            snapshot: None,
            artifact: Vec::new(),
            printer,
            ledger,
            delays,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn artifact(&self) -> &[Sticker] {
        &self.artifact
    }

    pub fn snapshot(&self) -> Option<&OrderSnapshot> {
        self.snapshot.as_ref()
    }

    /// Begin a checkout attempt. Refuses on an empty cart; otherwise snapshots
    /// the lines and total for human review.
    pub fn request_checkout(
        &mut self,
        cart: &CartEngine,
    ) -> Result<&OrderSnapshot, CheckoutError> {
        match self.state {
            CheckoutState::Idle | CheckoutState::Done | CheckoutState::Cancelled => {}
            state => {
                return Err(CheckoutError::InvalidState {
                    action: "request checkout",
                    state: state.name(),
                })
            }
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let snapshot = OrderSnapshot {
            lines: cart.lines().to_vec(),
            total: cart.total(),
        };
        debug!(total = snapshot.total, lines = snapshot.lines.len(), "checkout requested");
        self.state = CheckoutState::AwaitingConfirmation;
        Ok(self.snapshot.insert(snapshot))
    }

    /// Back out before printing. The cart is untouched.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::AwaitingConfirmation {
            return Err(CheckoutError::InvalidState {
                action: "cancel",
                state: self.state.name(),
            });
        }
        self.finish(CheckoutState::Cancelled);
        Ok(())
    }

    /// Build the sticker artifact and invoke the platform print action.
    /// Printer failure cancels the attempt: cart untouched, nothing persisted.
    pub async fn confirm_and_print(&mut self) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::AwaitingConfirmation {
            return Err(CheckoutError::InvalidState {
                action: "confirm",
                state: self.state.name(),
            });
        }
        let snapshot = self.snapshot.as_ref().ok_or(CheckoutError::InvalidState {
            action: "confirm",
            state: "missing snapshot",
        })?;
        self.state = CheckoutState::Printing;
        self.artifact = build_stickers(&snapshot.lines);
        debug!(stickers = self.artifact.len(), "print artifact built");

        sleep(self.delays.print_render).await;
        if let Err(err) = self.printer.print(&self.artifact).await {
            warn!(error = %err, "print action failed; checkout attempt cancelled");
            self.finish(CheckoutState::Cancelled);
            return Err(CheckoutError::PrintFailed(err.to_string()));
        }
        sleep(self.delays.print_dismiss).await;

        self.state = CheckoutState::AwaitingPrintAck;
        Ok(())
    }

    /// The human attests whether the physical print succeeded; the platform
    /// call gives no reliable signal of its own.
    ///
    /// Positive: serialize the snapshot, submit to the ledger (best-effort,
    /// never retried, never blocking) and clear the cart unconditionally.
    /// Negative: cancel, leaving the cart exactly as it was.
    pub async fn attest_printed(
        &mut self,
        printed: bool,
        cart: &mut CartEngine,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if self.state != CheckoutState::AwaitingPrintAck {
            return Err(CheckoutError::InvalidState {
                action: "attest print",
                state: self.state.name(),
            });
        }
        if !printed {
            self.finish(CheckoutState::Cancelled);
            return Ok(CheckoutOutcome::Cancelled);
        }

        self.state = CheckoutState::Persisting;
        let snapshot = self.snapshot.take().ok_or(CheckoutError::InvalidState {
            action: "attest print",
            state: "missing snapshot",
        })?;
        let order_details = format_order_details(&snapshot.lines);
        let ledger = self.ledger.clone();
        let total = snapshot.total;
        // Fire-and-forget: the cashier's flow never waits on the wire.
        tokio::spawn(async move {
            match ledger.submit_order(&order_details, total).await {
                Ok(()) => debug!(total, "order recorded in ledger"),
                Err(err) => warn!(error = %err, "ledger save failed; order not recorded"),
            }
        });

        cart.clear();
        self.finish(CheckoutState::Done);
        Ok(CheckoutOutcome::Completed)
    }

    /// Every attempt ends here so a stale artifact never leaks into the next
    /// print.
    fn finish(&mut self, state: CheckoutState) {
        self.artifact.clear();
        self.snapshot = None;
        self.state = state;
    }
}

/// One sticker per unit of quantity, cart line order first, repetition order
/// within a line second. Whitespace-only notes print as no note.
fn build_stickers(lines: &[OrderLine]) -> Vec<Sticker> {
    let mut stickers = Vec::new();
    for line in lines {
        let note = if line.note.trim().is_empty() {
            None
        } else {
            Some(line.note.clone())
        };
        for _ in 0..line.quantity.settled().max(0) {
            stickers.push(Sticker {
                name: line.name.clone(),
                note: note.clone(),
            });
        }
    }
    stickers
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
