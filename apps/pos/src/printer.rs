//! Terminal stand-in for the platform's native print facility: each sticker
//! becomes one block on stdout.

use async_trait::async_trait;
use checkout::StickerPrinter;
use shared::domain::Sticker;

pub struct TerminalPrinter;

#[async_trait]
impl StickerPrinter for TerminalPrinter {
    async fn print(&self, stickers: &[Sticker]) -> anyhow::Result<()> {
        for sticker in stickers {
            println!("{}", render_sticker(sticker));
        }
        Ok(())
    }
}

fn render_sticker(sticker: &Sticker) -> String {
    match &sticker.note {
        Some(note) => format!("┌── sticker ──┐\n {}\n {}\n└─────────────┘", sticker.name, note),
        None => format!("┌── sticker ──┐\n {}\n└─────────────┘", sticker.name),
    }
}
