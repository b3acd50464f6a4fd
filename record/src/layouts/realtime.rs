//! Race-day change kinds. These arrive on the live path first and in the
//! accumulated deliveries later; the layout is the same either way.

use once_cell::sync::Lazy;

use crate::k_type::RecordKind;
use crate::layout::{FieldDef, RecordLayout};

/// 馬体重
pub static WH: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Wh)
        .head()
        .race_key()
        .text("HappyoTime", 8)
        .flatten(
            18,
            &[
                FieldDef::text("BataijyuUmaban", 2),
                FieldDef::text("BataijyuBamei", 36),
                FieldDef::int("Bataijyu", 3),
                FieldDef::text("ZogenFugo", 1),
                FieldDef::int("ZogenSa", 3),
            ],
        )
        .build()
});

/// 天候馬場状態
pub static WE: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::We)
        .head()
        .int("Year", 4)
        .text("MonthDay", 4)
        .text("JyoCD", 2)
        .int("Kaiji", 2)
        .int("Nichiji", 2)
        .text("HappyoTime", 8)
        .text("HenkoID", 1)
        .text("TenkoCD", 1)
        .text("SibaBabaCD", 1)
        .text("DirtBabaCD", 1)
        .text("TenkoCDBefore", 1)
        .text("SibaBabaCDBefore", 1)
        .text("DirtBabaCDBefore", 1)
        .build()
});

/// 出走取消・競走除外
pub static AV: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Av)
        .head()
        .race_key()
        .text("HappyoTime", 8)
        .text("Umaban", 2)
        .text("Bamei", 36)
        .text("JiyuKubun", 1)
        .build()
});

/// 騎手変更
pub static JC: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Jc)
        .head()
        .race_key()
        .text("HappyoTime", 8)
        .text("Umaban", 2)
        .text("Bamei", 36)
        .real("FutanAfter", 3, 1)
        .text("KisyuCodeAfter", 5)
        .text("KisyuNameAfter", 34)
        .text("MinaraiCDAfter", 1)
        .real("FutanBefore", 3, 1)
        .text("KisyuCodeBefore", 5)
        .text("KisyuNameBefore", 34)
        .text("MinaraiCDBefore", 1)
        .build()
});

/// 発走時刻変更
pub static TC: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Tc)
        .head()
        .race_key()
        .text("HappyoTime", 8)
        .text("HassoTimeAfter", 4)
        .text("HassoTimeBefore", 4)
        .build()
});

/// コース変更
pub static CC: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Cc)
        .head()
        .race_key()
        .text("HappyoTime", 8)
        .int("KyoriAfter", 4)
        .text("TrackCDAfter", 2)
        .int("KyoriBefore", 4)
        .text("TrackCDBefore", 2)
        .text("JiyuCD", 1)
        .build()
});
