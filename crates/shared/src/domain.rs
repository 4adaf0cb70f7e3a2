use serde::{Deserialize, Serialize};

/// One entry of the fixed menu catalog. Prices are integers in the smallest
/// currency unit and never change after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub name: String,
    pub unit_price: i64,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, unit_price: i64) -> Self {
        Self {
            name: name.into(),
            unit_price,
        }
    }
}

/// Quantity of an order line. `Unset` is the transient state while the
/// cashier has cleared the quantity field; it settles to 1 on blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Unset,
    Set(i64),
}

impl Quantity {
    /// Value used for aggregation: `Unset` counts as zero.
    pub fn settled(self) -> i64 {
        match self {
            Quantity::Unset => 0,
            Quantity::Set(n) => n,
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Set(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub unit_price: i64,
    pub note: String,
    pub quantity: Quantity,
    pub note_editor_open: bool,
}

impl OrderLine {
    pub fn new(entry: &MenuEntry) -> Self {
        Self {
            name: entry.name.clone(),
            unit_price: entry.unit_price,
            note: String::new(),
            quantity: Quantity::Set(1),
            note_editor_open: false,
        }
    }

    /// Bare lines carry no note and no open note editor; only bare lines are
    /// eligible for quantity-merging when the same item is added again.
    pub fn is_bare(&self) -> bool {
        self.note.is_empty() && !self.note_editor_open
    }

    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity.settled()
    }
}

/// One printable unit: a line with quantity 3 yields 3 stickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sticker {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Display formatting only: divide by 1000 and append "k".
pub fn format_k(amount: i64) -> String {
    if amount % 1000 == 0 {
        format!("{}k", amount / 1000)
    } else {
        format!("{}k", amount as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_line_requires_empty_note_and_closed_editor() {
        let entry = MenuEntry::new("Chè Bưởi", 15_000);
        let mut line = OrderLine::new(&entry);
        assert!(line.is_bare());

        line.note_editor_open = true;
        assert!(!line.is_bare());

        line.note_editor_open = false;
        line.note = "ít đá".to_string();
        assert!(!line.is_bare());
    }

    #[test]
    fn unset_quantity_counts_as_zero() {
        let entry = MenuEntry::new("Chè Sầu", 25_000);
        let mut line = OrderLine::new(&entry);
        line.quantity = Quantity::Unset;
        assert_eq!(line.line_total(), 0);
    }

    #[test]
    fn formats_whole_thousands_without_fraction() {
        assert_eq!(format_k(15_000), "15k");
        assert_eq!(format_k(55_000), "55k");
        assert_eq!(format_k(15_500), "15.5k");
        assert_eq!(format_k(0), "0k");
    }
}
