use thiserror::Error;

/// Failures of a checkout attempt. None of these are fatal: the cashier keeps
/// using the cart after any of them.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was requested with zero lines in the cart. Surfaced as a
    /// blocking alert; no state changes.
    #[error("cart is empty")]
    EmptyCart,
    /// A coordinator method was called outside the state that permits it.
    #[error("cannot {action} while checkout is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    /// The platform print action reported failure. The attempt is treated as
    /// cancelled: cart untouched, nothing persisted.
    #[error("print action failed: {0}")]
    PrintFailed(String),
}
