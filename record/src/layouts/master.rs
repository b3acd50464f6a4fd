//! Master kinds: horses, people, breeding stock, records, bloodlines,
//! sales, courses.

use once_cell::sync::Lazy;

use crate::k_type::RecordKind;
use crate::layout::{FieldDef, RecordLayout};

/// 競走馬マスタ
pub static UM: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Um)
        .head()
        .text("KettoNum", 10)
        .text("DelKubun", 1)
        .text("RegDate", 8)
        .text("DelDate", 8)
        .text("BirthDate", 8)
        .text("Bamei", 36)
        .text("BameiKana", 36)
        .text("BameiEng", 60)
        .text("ZaikyuFlag", 1)
        .text("UmaKigoCD", 2)
        .text("SexCD", 1)
        .text("HinsyuCD", 1)
        .text("KeiroCD", 2)
        .flatten(
            14,
            &[
                FieldDef::text("Ketto3InfoHansyokuNum", 10),
                FieldDef::text("Ketto3InfoBamei", 36),
            ],
        )
        .text("TozaiCD", 1)
        .text("ChokyosiCode", 5)
        .text("ChokyosiRyakusyo", 8)
        .text("Syotai", 20)
        .text("BreederCode", 8)
        .text("BreederName", 72)
        .text("SanchiName", 20)
        .text("BanusiCode", 6)
        .text("BanusiName", 64)
        .int("RuikeiHonsyoHeichi", 9)
        .int("RuikeiHonsyoSyogai", 9)
        .int("RuikeiFukaHeichi", 9)
        .int("RuikeiFukaSyogai", 9)
        .flatten(6, &[FieldDef::int("ChakuKaisuHeichi", 3)])
        .flatten(6, &[FieldDef::int("ChakuKaisuSyogai", 3)])
        .flatten(6, &[FieldDef::int("ChakuKaisuSiba", 3)])
        .flatten(6, &[FieldDef::int("ChakuKaisuDirt", 3)])
        .flatten(4, &[FieldDef::int("Kyakusitu", 3)])
        .int("RaceCount", 3)
        .int("JyusyoCount", 3)
        .build()
});

/// 騎手マスタ
pub static KS: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Ks)
        .head()
        .text("KisyuCode", 5)
        .text("DelKubun", 1)
        .text("IssueDate", 8)
        .text("DelDate", 8)
        .text("BirthDate", 8)
        .text("KisyuName", 34)
        .text("KisyuNameKana", 30)
        .text("KisyuRyakusyo", 8)
        .text("KisyuNameEng", 80)
        .text("SexCD", 1)
        .text("SikakuCD", 1)
        .text("MinaraiCD", 1)
        .text("TozaiCD", 1)
        .text("Syotai", 20)
        .text("ChokyosiCode", 5)
        .text("ChokyosiRyakusyo", 8)
        .text("HatuKijyoDate", 8)
        .text("HatuSyoriDate", 8)
        .flatten(
            3,
            &[
                FieldDef::text("SaikinJyusyoDate", 8),
                FieldDef::text("SaikinJyusyoHondai", 60),
                FieldDef::text("SaikinJyusyoRyakusyo", 20),
                FieldDef::text("SaikinJyusyoGradeCD", 1),
                FieldDef::int("SaikinJyusyoSyussoTosu", 2),
                FieldDef::text("SaikinJyusyoKettoNum", 10),
                FieldDef::text("SaikinJyusyoBamei", 36),
            ],
        )
        .flatten(
            2,
            &[
                FieldDef::int("SetYear", 4),
                FieldDef::int("HonSyokinHeichi", 10),
                FieldDef::int("HonSyokinSyogai", 10),
                FieldDef::int("ChakuKaisu1", 5),
                FieldDef::int("ChakuKaisu2", 5),
                FieldDef::int("ChakuKaisu3", 5),
                FieldDef::int("ChakuKaisuGai", 5),
            ],
        )
        .build()
});

/// 調教師マスタ
pub static CH: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Ch)
        .head()
        .text("ChokyosiCode", 5)
        .text("DelKubun", 1)
        .text("IssueDate", 8)
        .text("DelDate", 8)
        .text("BirthDate", 8)
        .text("ChokyosiName", 34)
        .text("ChokyosiNameKana", 30)
        .text("ChokyosiRyakusyo", 8)
        .text("ChokyosiNameEng", 80)
        .text("SexCD", 1)
        .text("TozaiCD", 1)
        .text("Syotai", 20)
        .flatten(
            3,
            &[
                FieldDef::text("SaikinJyusyoDate", 8),
                FieldDef::text("SaikinJyusyoHondai", 60),
                FieldDef::text("SaikinJyusyoRyakusyo", 20),
                FieldDef::text("SaikinJyusyoGradeCD", 1),
                FieldDef::int("SaikinJyusyoSyussoTosu", 2),
                FieldDef::text("SaikinJyusyoKettoNum", 10),
                FieldDef::text("SaikinJyusyoBamei", 36),
            ],
        )
        .flatten(
            2,
            &[
                FieldDef::int("SetYear", 4),
                FieldDef::int("HonSyokinHeichi", 10),
                FieldDef::int("HonSyokinSyogai", 10),
                FieldDef::int("ChakuKaisu1", 5),
                FieldDef::int("ChakuKaisu2", 5),
                FieldDef::int("ChakuKaisu3", 5),
                FieldDef::int("ChakuKaisuGai", 5),
            ],
        )
        .build()
});

/// 生産者マスタ
pub static BR: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Br)
        .head()
        .text("BreederCode", 8)
        .text("BreederName", 72)
        .text("BreederNameKana", 72)
        .text("BreederNameEng", 168)
        .text("Address", 20)
        .flatten(
            2,
            &[
                FieldDef::int("SetYear", 4),
                FieldDef::int("HonSyokinTotal", 10),
                FieldDef::int("ChakuKaisu1", 6),
                FieldDef::int("ChakuKaisu2", 6),
                FieldDef::int("ChakuKaisu3", 6),
                FieldDef::int("ChakuKaisuGai", 6),
            ],
        )
        .build()
});

/// 馬主マスタ
pub static BN: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Bn)
        .head()
        .text("BanusiCode", 6)
        .text("BanusiName", 64)
        .text("BanusiNameKana", 50)
        .text("BanusiNameEng", 100)
        .text("Fukusyoku", 60)
        .flatten(
            2,
            &[
                FieldDef::int("SetYear", 4),
                FieldDef::int("HonSyokinTotal", 10),
                FieldDef::int("ChakuKaisu1", 6),
                FieldDef::int("ChakuKaisu2", 6),
                FieldDef::int("ChakuKaisu3", 6),
                FieldDef::int("ChakuKaisuGai", 6),
            ],
        )
        .build()
});

/// 繁殖馬マスタ
pub static HN: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Hn)
        .head()
        .text("HansyokuNum", 10)
        .text("KettoNum", 10)
        .text("DelKubun", 1)
        .text("Bamei", 36)
        .text("BameiKana", 40)
        .int("BirthYear", 4)
        .text("SexCD", 1)
        .text("HinsyuCD", 1)
        .text("KeiroCD", 2)
        .int("ImportYear", 4)
        .text("SanchiName", 20)
        .text("HansyokuFNum", 10)
        .text("HansyokuMNum", 10)
        .build()
});

/// 産駒マスタ
pub static SK: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Sk)
        .head()
        .text("KettoNum", 10)
        .text("BirthDate", 8)
        .text("SexCD", 1)
        .text("HinsyuCD", 1)
        .text("KeiroCD", 2)
        .text("SanchiName", 20)
        .text("BreederCode", 8)
        .flatten(14, &[FieldDef::text("Hansyoku3InfoNum", 10)])
        .build()
});

/// 出走別着度数
pub static CK: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Ck)
        .head()
        .int("Year", 4)
        .text("KettoNum", 10)
        .text("Bamei", 36)
        .int("RuikeiHonsyokin", 10)
        .flatten(6, &[FieldDef::int("ChakuSogo", 3)])
        .flatten(6, &[FieldDef::int("ChakuChuo", 3)])
        .flatten(6, &[FieldDef::int("ChakuBabaSiba", 3)])
        .flatten(6, &[FieldDef::int("ChakuBabaDirt", 3)])
        .flatten(6, &[FieldDef::int("ChakuKyoriSiba", 3)])
        .flatten(6, &[FieldDef::int("ChakuKyoriDirt", 3)])
        .build()
});

/// レコードマスタ
pub static RC: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Rc)
        .head()
        .text("RecordKubun", 1)
        .int("Kyori", 4)
        .text("TrackCD", 2)
        .int("Year", 4)
        .text("MonthDay", 4)
        .text("JyoCD", 2)
        .int("Kaiji", 2)
        .int("Nichiji", 2)
        .int("RaceNum", 2)
        .int("TokuNum", 4)
        .text("RaceName", 60)
        .text("GradeCD", 1)
        .text("SyubetuCD", 2)
        .real("RecordTime", 4, 1)
        .text("TenkoCD", 1)
        .text("BabaCD", 1)
        .text("KettoNum", 10)
        .text("Bamei", 36)
        .text("UmaKigoCD", 2)
        .text("SexCD", 1)
        .text("ChokyosiCode", 5)
        .real("Futan", 3, 1)
        .text("KisyuCode", 5)
        .build()
});

/// 系統情報
pub static BT: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Bt)
        .head()
        .text("HansyokuNum", 10)
        .text("KeitoId", 30)
        .text("KeitoName", 36)
        .text("KeitoEx", 800)
        .build()
});

/// 競走馬市場取引価格
pub static HS: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Hs)
        .head()
        .text("KettoNum", 10)
        .text("HansyokuFNum", 10)
        .text("HansyokuMNum", 10)
        .int("BirthYear", 4)
        .text("SaleCode", 6)
        .text("SaleHostName", 40)
        .text("SaleName", 80)
        .text("FromDate", 8)
        .text("ToDate", 8)
        .int("Barei", 1)
        .int("Price", 10)
        .build()
});

/// 馬名の意味由来
pub static HY: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Hy)
        .head()
        .text("KettoNum", 10)
        .text("Bamei", 36)
        .text("Origin", 64)
        .build()
});

/// コース情報
pub static CS: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Cs)
        .head()
        .text("JyoCD", 2)
        .int("Kyori", 4)
        .text("TrackCD", 2)
        .text("KaishuDate", 8)
        .text("CourseEx", 800)
        .build()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn um_pedigree_block_has_14_entries() {
        let names: Vec<String> = UM.columns().iter().map(|c| c.name.clone()).collect();
        assert!(names.contains(&"Ketto3InfoHansyokuNum1".to_string()));
        assert!(names.contains(&"Ketto3InfoBamei14".to_string()));
    }

    #[test]
    fn master_keys_are_present() {
        for (layout, key) in [
            (&*UM, "KettoNum"),
            (&*KS, "KisyuCode"),
            (&*CH, "ChokyosiCode"),
            (&*BR, "BreederCode"),
            (&*BN, "BanusiCode"),
            (&*HN, "HansyokuNum"),
        ] {
            let names: Vec<String> = layout.columns().iter().map(|c| c.name.clone()).collect();
            assert!(names.contains(&key.to_string()), "{} lacks {}", layout.kind(), key);
        }
    }
}
