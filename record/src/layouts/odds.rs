//! The six odds families. One row per combination; the vacant tail slots
//! of short fields are skipped at parse time.

use once_cell::sync::Lazy;

use crate::k_type::RecordKind;
use crate::layout::{FieldDef, LayoutBuilder, RecordLayout};

fn odds_head(kind: RecordKind) -> LayoutBuilder {
    RecordLayout::builder(kind)
        .head()
        .race_key()
        .text("HappyoTime", 8)
        .int("TorokuTosu", 2)
        .int("SyussoTosu", 2)
        .int("HatubaiFlag", 1)
}

/// オッズ（単複）。馬番ごとに1行。
pub static O1: Lazy<RecordLayout> = Lazy::new(|| {
    odds_head(RecordKind::O1)
        .expand(
            28,
            &[
                FieldDef::text("Umaban", 2),
                FieldDef::real("TanOdds", 4, 1),
                FieldDef::int("TanNinki", 2),
                FieldDef::real("FukuOddsLow", 4, 1),
                FieldDef::real("FukuOddsHigh", 4, 1),
                FieldDef::int("FukuNinki", 2),
            ],
        )
        .int("TotalHyoTansyo", 11)
        .int("TotalHyoFukusyo", 11)
        .build()
});

/// オッズ（馬連）
pub static O2: Lazy<RecordLayout> = Lazy::new(|| {
    odds_head(RecordKind::O2)
        .expand(
            153,
            &[
                FieldDef::text("Kumi", 4),
                FieldDef::real("Odds", 5, 1),
                FieldDef::int("Ninki", 3),
            ],
        )
        .int("TotalHyoUmaren", 11)
        .build()
});

/// オッズ（ワイド）
pub static O3: Lazy<RecordLayout> = Lazy::new(|| {
    odds_head(RecordKind::O3)
        .expand(
            153,
            &[
                FieldDef::text("Kumi", 4),
                FieldDef::real("OddsLow", 5, 1),
                FieldDef::real("OddsHigh", 5, 1),
                FieldDef::int("Ninki", 3),
            ],
        )
        .int("TotalHyoWide", 11)
        .build()
});

/// オッズ（馬単）
pub static O4: Lazy<RecordLayout> = Lazy::new(|| {
    odds_head(RecordKind::O4)
        .expand(
            306,
            &[
                FieldDef::text("Kumi", 4),
                FieldDef::real("Odds", 6, 1),
                FieldDef::int("Ninki", 3),
            ],
        )
        .int("TotalHyoUmatan", 11)
        .build()
});

/// オッズ（3連複）
pub static O5: Lazy<RecordLayout> = Lazy::new(|| {
    odds_head(RecordKind::O5)
        .expand(
            816,
            &[
                FieldDef::text("Kumi", 6),
                FieldDef::real("Odds", 6, 1),
                FieldDef::int("Ninki", 3),
            ],
        )
        .int("TotalHyoSanrenpuku", 11)
        .build()
});

/// オッズ（3連単）
pub static O6: Lazy<RecordLayout> = Lazy::new(|| {
    odds_head(RecordKind::O6)
        .expand(
            4896,
            &[
                FieldDef::text("Kumi", 6),
                FieldDef::real("Odds", 7, 1),
                FieldDef::int("Ninki", 4),
            ],
        )
        .int("TotalHyoSanrentan", 11)
        .build()
});
