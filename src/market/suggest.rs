//! Static ticker suggestions for the add form

/// A known ticker with its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionEntry {
    pub ticker: &'static str,
    pub name: &'static str,
}

/// Well-known MOEX tickers offered by the add-form autocomplete
pub const SUGGESTIONS: &[SuggestionEntry] = &[
    SuggestionEntry { ticker: "SBER", name: "Sberbank" },
    SuggestionEntry { ticker: "SBERP", name: "Sberbank preferred" },
    SuggestionEntry { ticker: "GAZP", name: "Gazprom" },
    SuggestionEntry { ticker: "LKOH", name: "Lukoil" },
    SuggestionEntry { ticker: "YNDX", name: "Yandex" },
    SuggestionEntry { ticker: "TCSG", name: "TCS Group" },
    SuggestionEntry { ticker: "ROSN", name: "Rosneft" },
    SuggestionEntry { ticker: "NVTK", name: "Novatek" },
    SuggestionEntry { ticker: "ALRS", name: "Alrosa" },
    SuggestionEntry { ticker: "POLY", name: "Polymetal" },
    SuggestionEntry { ticker: "VTBR", name: "VTB" },
    SuggestionEntry { ticker: "PHOR", name: "PhosAgro" },
    SuggestionEntry { ticker: "PLZL", name: "Polyus" },
    SuggestionEntry { ticker: "TATN", name: "Tatneft" },
    SuggestionEntry { ticker: "RUAL", name: "Rusal" },
];

/// Entries whose ticker starts with the query or whose name contains it,
/// case-insensitively. List order is preserved; an empty query matches all.
pub fn filter_suggestions(input: &str) -> Vec<SuggestionEntry> {
    let query = input.trim().to_uppercase();
    SUGGESTIONS
        .iter()
        .copied()
        .filter(|entry| {
            entry.ticker.starts_with(&query) || entry.name.to_uppercase().contains(&query)
        })
        .collect()
}
