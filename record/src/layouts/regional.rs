//! Kinds only the regional feed delivers.

use once_cell::sync::Lazy;

use crate::k_type::RecordKind;
use crate::layout::{FieldDef, RecordLayout};

/// 地方払戻詳細
pub static HB: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Hb)
        .head()
        .race_key()
        .int("SyussoTosu", 2)
        .flatten(
            2,
            &[
                FieldDef::text("PayTansyoUmaban", 2),
                FieldDef::int("PayTansyoPay", 9),
                FieldDef::int("PayTansyoNinki", 2),
            ],
        )
        .flatten(
            3,
            &[
                FieldDef::text("PayFukusyoUmaban", 2),
                FieldDef::int("PayFukusyoPay", 9),
                FieldDef::int("PayFukusyoNinki", 2),
            ],
        )
        .flatten(
            2,
            &[
                FieldDef::text("PayUmarenKumi", 4),
                FieldDef::int("PayUmarenPay", 9),
                FieldDef::int("PayUmarenNinki", 3),
            ],
        )
        .flatten(
            3,
            &[
                FieldDef::text("PayWideKumi", 4),
                FieldDef::int("PayWidePay", 9),
                FieldDef::int("PayWideNinki", 3),
            ],
        )
        .flatten(
            2,
            &[
                FieldDef::text("PayUmatanKumi", 4),
                FieldDef::int("PayUmatanPay", 9),
                FieldDef::int("PayUmatanNinki", 3),
            ],
        )
        .flatten(
            2,
            &[
                FieldDef::text("PaySanrentanKumi", 6),
                FieldDef::int("PaySanrentanPay", 9),
                FieldDef::int("PaySanrentanNinki", 4),
            ],
        )
        .build()
});

/// 地方馬毎レース追加情報
pub static RB: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Rb)
        .head()
        .race_key()
        .int("Umaban", 2)
        .text("KettoNum", 10)
        .int("NyusenJyuni", 2)
        .int("KakuteiJyuni", 2)
        .real("Time", 4, 1)
        .text("ChakusaCD", 3)
        .int("Ninki", 2)
        .real("Odds", 4, 1)
        .build()
});

/// 地方競馬場マスタ
pub static BA: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Ba)
        .head()
        .text("BabaCode", 2)
        .text("BabaName", 40)
        .text("BabaNameKana", 60)
        .text("BabaNameEng", 80)
        .text("ShozaiKenCD", 2)
        .text("MawariCD", 1)
        .int("Kyori1Syu", 4)
        .int("DirtFlag", 1)
        .text("HaishiDate", 8)
        .build()
});
