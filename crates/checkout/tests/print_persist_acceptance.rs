use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use cart::CartEngine;
use checkout::{CheckoutCoordinator, CheckoutDelays, CheckoutOutcome, StickerPrinter};
use ledger_client::LedgerClient;
use serde_json::Value;
use shared::domain::{MenuEntry, Sticker};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

struct AcceptancePrinter {
    printed: Mutex<Vec<Sticker>>,
}

#[async_trait]
impl StickerPrinter for AcceptancePrinter {
    async fn print(&self, stickers: &[Sticker]) -> anyhow::Result<()> {
        self.printed.lock().await.extend_from_slice(stickers);
        Ok(())
    }
}

#[derive(Clone)]
struct LedgerStubState {
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

async fn handle_save(
    State(state): State<LedgerStubState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    Json(Value::Null)
}

#[tokio::test]
async fn full_order_build_print_attest_persist_acceptance() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, payload_rx) = oneshot::channel();
    let app = Router::new()
        .route("/", post(handle_save))
        .with_state(LedgerStubState {
            tx: Arc::new(Mutex::new(Some(tx))),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let ledger = LedgerClient::new(&format!("http://{addr}/")).expect("ledger client");

    // Build an order the way a cashier would: merge on re-add, then split one
    // unit off for a custom note.
    let mut cart = CartEngine::new();
    let che_buoi = MenuEntry::new("Chè Bưởi", 15_000);
    let sua_chua_mit = MenuEntry::new("Sữa Chua Mít", 20_000);
    cart.add_item(&che_buoi);
    cart.add_item(&che_buoi);
    cart.add_item(&che_buoi);
    cart.add_item(&sua_chua_mit);

    let focus = cart.toggle_note_editor(0, true).expect("focus index");
    cart.set_note(focus, "ít đá");
    assert_eq!(cart.len(), 3);
    assert_eq!(cart.total(), 65_000);

    let printer = Arc::new(AcceptancePrinter {
        printed: Mutex::new(Vec::new()),
    });
    let mut coordinator =
        CheckoutCoordinator::new(printer.clone(), ledger, CheckoutDelays::none());

    let snapshot = coordinator.request_checkout(&cart).expect("request");
    assert_eq!(snapshot.total, 65_000);
    assert_eq!(snapshot.lines.len(), 3);

    coordinator.confirm_and_print().await.expect("print");
    let outcome = coordinator
        .attest_printed(true, &mut cart)
        .await
        .expect("attest");
    assert_eq!(outcome, CheckoutOutcome::Completed);
    assert!(cart.is_empty());

    let payload = payload_rx.await.expect("save payload");
    assert_eq!(payload["action"], "save");
    assert_eq!(
        payload["order_details"],
        "(2) Chè Bưởi, (1) Chè Bưởi [ít đá], (1) Sữa Chua Mít"
    );
    assert_eq!(payload["total_money"], 65_000);

    let printed = printer.printed.lock().await;
    assert_eq!(printed.len(), 4);
    assert_eq!(printed[0].name, "Chè Bưởi");
    assert_eq!(printed[0].note, None);
    assert_eq!(printed[2].note.as_deref(), Some("ít đá"));
    assert_eq!(printed[3].name, "Sữa Chua Mít");
}
