use crate::dictionary::{ColorPalette, ColorShades, ModifierMap, SpacingScale, ValueDictionary};
use std::sync::OnceLock;

pub fn spacing() -> &'static SpacingScale {
    static TABLE: OnceLock<SpacingScale> = OnceLock::new();
    TABLE.get_or_init(|| {
        SpacingScale::from_pairs(&[
            ("0", "0px"),
            ("px", "1px"),
            ("1", "4px"),
            ("2", "8px"),
            ("3", "12px"),
            ("4", "16px"),
            ("5", "20px"),
            ("6", "24px"),
            ("8", "32px"),
            ("10", "40px"),
            ("12", "48px"),
            ("16", "64px"),
            ("20", "80px"),
            ("24", "96px"),
            ("32", "128px"),
            ("full", "100%"),
            ("auto", "auto"),
        ])
    })
}

pub fn colors() -> &'static ColorPalette {
    static TABLE: OnceLock<ColorPalette> = OnceLock::new();
    TABLE.get_or_init(|| {
        let families: [(&str, &[(&str, &str)]); 8] = [
            ("transparent", &[("DEFAULT", "rgba(0, 0, 0, 0)")]),
            ("white", &[("DEFAULT", "#ffffff")]),
            ("black", &[("DEFAULT", "#000000")]),
            (
                "gray",
                &[
                    ("100", "#f3f4f6"),
                    ("300", "#d1d5db"),
                    ("500", "#6b7280"),
                    ("700", "#374151"),
                    ("900", "#111827"),
                ],
            ),
            (
                "red",
                &[
                    ("100", "#fee2e2"),
                    ("300", "#fca5a5"),
                    ("500", "#ef4444"),
                    ("700", "#b91c1c"),
                    ("900", "#7f1d1d"),
                ],
            ),
            (
                "green",
                &[
                    ("100", "#dcfce7"),
                    ("300", "#86efac"),
                    ("500", "#22c55e"),
                    ("700", "#15803d"),
                    ("900", "#14532d"),
                ],
            ),
            (
                "blue",
                &[
                    ("100", "#dbeafe"),
                    ("300", "#93c5fd"),
                    ("500", "#3b82f6"),
                    ("700", "#1d4ed8"),
                    ("900", "#1e3a8a"),
                ],
            ),
            (
                "yellow",
                &[
                    ("100", "#fef9c3"),
                    ("300", "#fde047"),
                    ("500", "#eab308"),
                    ("700", "#a16207"),
                    ("900", "#713f12"),
                ],
            ),
        ];
        families
            .into_iter()
            .map(|(family, shades)| (family.to_string(), ColorShades::from_pairs(shades)))
            .collect()
    })
}

pub fn modifiers() -> &'static ModifierMap {
    static TABLE: OnceLock<ModifierMap> = OnceLock::new();
    TABLE.get_or_init(|| {
        ModifierMap::from_pairs(&[
            ("hover", "{class}:hover"),
            ("focus", "{class}:focus"),
            ("active", "{class}:active"),
            ("disabled", "{class}:disabled"),
            ("checked", "{class}:checked"),
        ])
    })
}

pub fn border_radius() -> &'static ValueDictionary<String, String> {
    static TABLE: OnceLock<ValueDictionary<String, String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ValueDictionary::from_pairs(&[
            ("none", "0px"),
            ("sm", "2px"),
            ("DEFAULT", "4px"),
            ("md", "6px"),
            ("lg", "8px"),
            ("xl", "12px"),
            ("full", "9999px"),
        ])
    })
}

pub fn border_width() -> &'static ValueDictionary<String, String> {
    static TABLE: OnceLock<ValueDictionary<String, String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ValueDictionary::from_pairs(&[
            ("DEFAULT", "1px"),
            ("0", "0px"),
            ("2", "2px"),
            ("4", "4px"),
            ("8", "8px"),
        ])
    })
}

pub fn font_size() -> &'static ValueDictionary<String, String> {
    static TABLE: OnceLock<ValueDictionary<String, String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ValueDictionary::from_pairs(&[
            ("xs", "12px"),
            ("sm", "14px"),
            ("base", "16px"),
            ("lg", "18px"),
            ("xl", "20px"),
            ("2xl", "24px"),
            ("3xl", "30px"),
        ])
    })
}

pub fn opacity() -> &'static ValueDictionary<String, String> {
    static TABLE: OnceLock<ValueDictionary<String, String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ValueDictionary::from_pairs(&[
            ("0", "0"),
            ("25", "0.25"),
            ("50", "0.5"),
            ("75", "0.75"),
            ("100", "1"),
        ])
    })
}
