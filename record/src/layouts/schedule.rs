//! Schedule, training and mining kinds.

use once_cell::sync::Lazy;

use crate::k_type::RecordKind;
use crate::layout::{FieldDef, RecordLayout};

/// 開催スケジュール
pub static YS: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Ys)
        .head()
        .int("Year", 4)
        .text("MonthDay", 4)
        .text("JyoCD", 2)
        .int("Kaiji", 2)
        .int("Nichiji", 2)
        .text("YoubiCD", 1)
        .flatten(
            3,
            &[
                FieldDef::int("JyusyoTokuNum", 4),
                FieldDef::text("JyusyoHondai", 60),
                FieldDef::text("JyusyoRyakusyo10", 20),
                FieldDef::text("JyusyoRyakusyo6", 12),
                FieldDef::text("JyusyoRyakusyo3", 6),
                FieldDef::int("JyusyoNkai", 3),
                FieldDef::text("JyusyoGradeCD", 1),
                FieldDef::text("JyusyoSyubetuCD", 2),
                FieldDef::text("JyusyoKigoCD", 3),
                FieldDef::text("JyusyoJyuryoCD", 1),
                FieldDef::int("JyusyoKyori", 4),
                FieldDef::text("JyusyoTrackCD", 2),
            ],
        )
        .build()
});

/// 坂路調教
pub static HC: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Hc)
        .head()
        .text("TresenKubun", 1)
        .text("ChokyoDate", 8)
        .text("ChokyoTime", 4)
        .text("KettoNum", 10)
        .real("HaronTime4", 4, 1)
        .real("LapTime4", 3, 1)
        .real("HaronTime3", 4, 1)
        .real("LapTime3", 3, 1)
        .real("HaronTime2", 4, 1)
        .real("LapTime2", 3, 1)
        .real("LapTime1", 3, 1)
        .build()
});

/// ウッドチップ調教
pub static WC: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Wc)
        .head()
        .text("TresenKubun", 1)
        .text("ChokyoDate", 8)
        .text("ChokyoTime", 4)
        .text("KettoNum", 10)
        .text("Course", 1)
        .text("BabaMawari", 1)
        .real("HaronTime6", 4, 1)
        .real("HaronTime5", 4, 1)
        .real("HaronTime4", 4, 1)
        .real("HaronTime3", 4, 1)
        .real("HaronTime2", 4, 1)
        .real("LapTime1", 3, 1)
        .build()
});

/// タイム型データマイニング予想
pub static DM: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Dm)
        .head()
        .race_key()
        .text("MakeHM", 4)
        .flatten(
            18,
            &[
                FieldDef::text("DMUmaban", 2),
                FieldDef::real("DMTime", 5, 1),
                FieldDef::real("DMGosaP", 4, 1),
                FieldDef::real("DMGosaM", 4, 1),
            ],
        )
        .build()
});

/// 対戦型データマイニング予想
pub static TM: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Tm)
        .head()
        .race_key()
        .text("MakeHM", 4)
        .flatten(
            18,
            &[
                FieldDef::text("TMUmaban", 2),
                FieldDef::real("TMScore", 4, 1),
            ],
        )
        .build()
});
