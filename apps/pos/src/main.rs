use std::{
    io::{self, BufRead, Write as _},
    sync::Arc,
};

use anyhow::Result;
use cart::CartEngine;
use checkout::{CheckoutCoordinator, CheckoutOutcome, CheckoutState, OrderSnapshot};
use clap::Parser;
use ledger_client::LedgerClient;
use shared::{
    domain::{format_k, MenuEntry, OrderLine, Quantity},
    error::CheckoutError,
};

mod catalog;
mod commands;
mod config;
mod printer;

use commands::PosCommand;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the ledger endpoint from pos.toml / environment.
    #[arg(long)]
    ledger_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let mut settings = config::load_settings();
    if let Some(url) = args.ledger_url {
        settings.ledger_url = url;
    }

    let ledger = LedgerClient::new(&settings.ledger_url)?;
    let menu = catalog::menu();
    let mut cart = CartEngine::new();
    let mut cart_events = cart.subscribe();
    let mut coordinator = CheckoutCoordinator::new(
        Arc::new(printer::TerminalPrinter),
        ledger.clone(),
        settings.delays(),
    );

    println!("Dessert stand POS — type `help` for commands.");
    let stdin = io::stdin();
    loop {
        print!("pos> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let command = match commands::parse(&input) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        tracing::debug!(?command, "dispatching cashier command");

        match command {
            PosCommand::Quit => break,
            PosCommand::Help => print_help(),
            PosCommand::Menu(term) => print!("{}", render_menu(&menu, term.as_deref())),
            PosCommand::Show => print!("{}", render_cart(&cart)),
            PosCommand::Add(term) => match catalog::search(&menu, &term).first() {
                Some(entry) => cart.add_item(entry),
                None => println!("no menu entry matches `{term}`"),
            },
            PosCommand::Increment(n) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                cart.change_quantity(index, 1);
            }
            PosCommand::Decrement(n) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                cart.change_quantity(index, -1);
            }
            PosCommand::QuantityText(n, text) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                // Entering the value is the edit and the blur in one step.
                cart.set_quantity_text(index, &text);
                cart.settle_quantity(index);
            }
            PosCommand::NoteOpen(n) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                if let Some(focus) = cart.toggle_note_editor(index, true) {
                    println!("editing note on line {}", focus + 1);
                }
            }
            PosCommand::NoteSet(n, text) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                if cart.lines()[index].note_editor_open {
                    cart.set_note(index, &text);
                } else {
                    println!("open the note editor first: note {n}");
                }
            }
            PosCommand::NoteClose(n) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                cart.toggle_note_editor(index, false);
            }
            PosCommand::Remove(n) => {
                let Some(index) = line_index(&cart, n) else {
                    println!("no line {n}");
                    continue;
                };
                cart.remove_line(index);
            }
            PosCommand::Clear => cart.clear(),
            PosCommand::Checkout => run_checkout(&mut coordinator, &mut cart).await,
            PosCommand::Stats(date) => run_stats(&ledger, date.as_deref()).await,
        }

        let mut changed = false;
        while cart_events.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            print!("{}", render_cart(&cart));
        }
    }

    Ok(())
}

/// The print-confirm-persist protocol, driven as one interaction.
async fn run_checkout(coordinator: &mut CheckoutCoordinator, cart: &mut CartEngine) {
    match coordinator.request_checkout(cart) {
        Ok(snapshot) => print!("{}", render_snapshot(snapshot)),
        Err(CheckoutError::EmptyCart) => {
            println!("Nothing selected yet!");
            return;
        }
        Err(err) => {
            println!("{err}");
            return;
        }
    }

    if prompt_yes("Print this order?") {
        if let Err(err) = coordinator.confirm_and_print().await {
            println!("{err}");
        }
    } else if let Err(err) = coordinator.cancel() {
        println!("{err}");
    } else {
        println!("checkout cancelled; order kept");
    }

    if coordinator.state() == CheckoutState::AwaitingPrintAck {
        // The platform print call gives no success signal; the cashier is the
        // authority on whether stickers actually came out.
        let printed = prompt_yes("Did the stickers print? (y = save revenue & clear order)");
        match coordinator.attest_printed(printed, cart).await {
            Ok(CheckoutOutcome::Completed) => println!("Order saved to ledger; cart cleared."),
            Ok(CheckoutOutcome::Cancelled) => println!("Print not confirmed; order kept."),
            Err(err) => println!("{err}"),
        }
    }
}

/// Password-gated reporting. Failures are messages, never fatal.
async fn run_stats(ledger: &LedgerClient, date: Option<&str>) {
    let Some(password) = prompt_line("Password: ") else {
        return;
    };
    let password = password.trim().to_string();
    if password.is_empty() {
        println!("password required");
        return;
    }

    match date {
        None => match ledger.fetch_stats(&password).await {
            Ok(stats) => {
                println!("revenue today:      {}", format_k(stats.today));
                println!("revenue this month: {}", format_k(stats.month));
                println!("revenue this year:  {}", format_k(stats.year));
                println!("printed orders:     {}", stats.count);
            }
            Err(err) => println!("stats unavailable: {err}"),
        },
        Some(date) => {
            let Ok(parsed) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                println!("date must be YYYY-MM-DD");
                return;
            };
            match ledger.check_date(&password, date).await {
                Ok(total) => println!(
                    "revenue on {}: {}",
                    parsed.format("%d/%m/%Y"),
                    format_k(total)
                ),
                Err(err) => println!("lookup failed: {err}"),
            }
        }
    }
}

/// 1-based prompt index to cart index; out-of-bounds stops here so the engine
/// never sees a bad index.
fn line_index(cart: &CartEngine, n: usize) -> Option<usize> {
    (n >= 1 && n <= cart.len()).then(|| n - 1)
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim_end().to_string()),
    }
}

fn prompt_yes(prompt: &str) -> bool {
    match prompt_line(&format!("{prompt} [y/N] ")) {
        Some(answer) => answer.trim().eq_ignore_ascii_case("y"),
        None => false,
    }
}

fn render_menu(menu: &[MenuEntry], term: Option<&str>) -> String {
    let hits: Vec<&MenuEntry> = match term {
        Some(term) => catalog::search(menu, term),
        None => menu.iter().collect(),
    };
    if hits.is_empty() {
        return "no matches\n".to_string();
    }
    let mut out = String::new();
    let mut current_tier = "";
    for entry in hits {
        let tier = catalog::tier_title(entry.unit_price);
        if tier != current_tier {
            out.push_str(&format!("== {tier} ==\n"));
            current_tier = tier;
        }
        out.push_str(&format!(
            "  {}  {}\n",
            entry.name,
            format_k(entry.unit_price)
        ));
    }
    out
}

fn render_line(index: usize, line: &OrderLine) -> String {
    let quantity = match line.quantity {
        Quantity::Unset => "-".to_string(),
        Quantity::Set(n) => n.to_string(),
    };
    let mut out = format!(
        "{:>2}. x{} {} ({}) = {}",
        index + 1,
        quantity,
        line.name,
        format_k(line.unit_price),
        format_k(line.line_total()),
    );
    if line.note_editor_open {
        out.push_str(&format!("  [note*: {}]", line.note));
    } else if !line.note.is_empty() {
        out.push_str(&format!("  [note: {}]", line.note));
    }
    out.push('\n');
    out
}

fn render_cart(cart: &CartEngine) -> String {
    if cart.is_empty() {
        return "cart is empty\n".to_string();
    }
    let mut out = String::new();
    for (index, line) in cart.lines().iter().enumerate() {
        out.push_str(&render_line(index, line));
    }
    out.push_str(&format!(
        "total: {} ({} items)\n",
        format_k(cart.total()),
        cart.count()
    ));
    out
}

fn render_snapshot(snapshot: &OrderSnapshot) -> String {
    let mut out = String::from("=== confirm order ===\n");
    for (index, line) in snapshot.lines.iter().enumerate() {
        out.push_str(&render_line(index, line));
    }
    out.push_str(&format!("total: {}\n", format_k(snapshot.total)));
    out
}

fn print_help() {
    println!("menu [term]        list menu (optionally filtered)");
    println!("add <term>         add first matching item to the cart");
    println!("+ <line> / - <line>  bump quantity (zero removes the line)");
    println!("qty <line> [value]   type a quantity directly (blank clears, settles to 1)");
    println!("note <line>        open the note editor (splits one unit off qty > 1)");
    println!("note <line> <text> write the note");
    println!("nonote <line>      close the editor and discard the note");
    println!("rm <line>          remove a line");
    println!("clear              empty the cart");
    println!("show               show the cart");
    println!("checkout           review, print stickers, save to ledger");
    println!("stats [YYYY-MM-DD] password-gated revenue report");
    println!("quit               exit");
}
