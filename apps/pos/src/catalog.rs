//! The fixed dessert menu. Catalog data never changes at runtime; order lines
//! copy the price at add time and never read back.

use shared::domain::MenuEntry;

pub fn menu() -> Vec<MenuEntry> {
    [
        ("Chè Bưởi", 15_000),
        ("Chè Đậu Đỏ", 15_000),
        ("Chè Đậu Đen", 15_000),
        ("Chè Đậu Xanh", 15_000),
        ("Chè Thập Cẩm", 15_000),
        ("Chè Ngô Cốt Dừa", 15_000),
        ("Chè Cốm Dừa Non", 15_000),
        ("Chè Dừa Dầm", 15_000),
        ("Chè Khoai Dẻo", 15_000),
        ("Chè Tuổi Thơ", 15_000),
        ("Sương Sa Hạt Lựu", 15_000),
        ("SC Trân Châu", 15_000),
        ("Thập Cẩm ĐB", 20_000),
        ("Sữa Chua Mít", 20_000),
        ("SC Dừa Non", 20_000),
        ("SC Cốm Dừa Non", 20_000),
        ("Chè Sầu", 25_000),
        ("Sầu Riêng Đ.Xanh", 25_000),
        ("Chè Hạt Đác", 25_000),
        ("SC Mít Hạt Đác", 25_000),
        ("Chè Thốt Nốt", 25_000),
        ("SC Mít Sầu Riêng", 35_000),
    ]
    .into_iter()
    .map(|(name, price)| MenuEntry::new(name, price))
    .collect()
}

/// Case-insensitive substring search over entry names.
pub fn search<'a>(entries: &'a [MenuEntry], term: &str) -> Vec<&'a MenuEntry> {
    let needle = term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

/// Section title for the grouped menu display.
pub fn tier_title(unit_price: i64) -> &'static str {
    if unit_price >= 25_000 {
        "25K+"
    } else if unit_price >= 20_000 {
        "20K"
    } else {
        "15K"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_names_are_unique() {
        let entries = menu();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let entries = menu();
        let hits = search(&entries, "sc ");
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|entry| entry.name.starts_with("SC ")));

        let hits = search(&entries, "chè sầu");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].unit_price, 25_000);
    }

    #[test]
    fn tiers_cover_all_prices() {
        assert_eq!(tier_title(15_000), "15K");
        assert_eq!(tier_title(20_000), "20K");
        assert_eq!(tier_title(25_000), "25K+");
        assert_eq!(tier_title(35_000), "25K+");
    }
}
