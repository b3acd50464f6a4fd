//! Race-scoped kinds: registrations, race detail, runner results, payoffs,
//! vote counts, the multi-race bet and exclusions.

use once_cell::sync::Lazy;

use crate::k_type::RecordKind;
use crate::layout::{FieldDef, RecordLayout};

/// 特別登録馬
pub static TK: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Tk)
        .head()
        .race_key()
        .text("YoubiCD", 1)
        .int("TokuNum", 4)
        .text("Hondai", 60)
        .text("Ryakusyo10", 20)
        .text("GradeCD", 1)
        .text("SyubetuCD", 2)
        .text("KigoCD", 3)
        .text("JyuryoCD", 1)
        .int("Kyori", 4)
        .text("TrackCD", 2)
        .int("TorokuTosu", 3)
        .flatten(
            8,
            &[
                FieldDef::int("TorokuNum", 3),
                FieldDef::text("TorokuKettoNum", 10),
                FieldDef::text("TorokuBamei", 36),
                FieldDef::text("TorokuUmaKigoCD", 2),
                FieldDef::text("TorokuSexCD", 1),
                FieldDef::text("TorokuTozaiCD", 1),
                FieldDef::text("TorokuChokyosiCode", 5),
                FieldDef::real("TorokuFutan", 3, 1),
            ],
        )
        .build()
});

/// レース詳細
pub static RA: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Ra)
        .head()
        .race_key()
        .text("YoubiCD", 1)
        .int("TokuNum", 4)
        .text("Hondai", 60)
        .text("Fukudai", 60)
        .text("Ryakusyo10", 20)
        .text("GradeCD", 1)
        .text("SyubetuCD", 2)
        .text("KigoCD", 3)
        .text("JyuryoCD", 1)
        .text("JyokenCD", 3)
        .int("Kyori", 4)
        .text("TrackCD", 2)
        .text("CourseKubunCD", 2)
        .text("HassoTime", 4)
        .int("TorokuTosu", 2)
        .int("SyussoTosu", 2)
        .int("NyusenTosu", 2)
        .text("TenkoCD", 1)
        .text("SibaBabaCD", 1)
        .text("DirtBabaCD", 1)
        .flatten(25, &[FieldDef::real("LapTime", 3, 1)])
        .real("SyogaiMileTime", 4, 1)
        .real("HaronTimeS3", 3, 1)
        .real("HaronTimeL3", 3, 1)
        .flatten(
            4,
            &[
                FieldDef::int("Corner", 1),
                FieldDef::int("CornerSyukaisu", 1),
                FieldDef::text("CornerJyuni", 70),
            ],
        )
        .flatten(7, &[FieldDef::int("Honsyokin", 8)])
        .flatten(5, &[FieldDef::int("Fukasyokin", 8)])
        .text("RecordUpKubun", 1)
        .build()
});

fn se_common(builder: crate::layout::LayoutBuilder) -> crate::layout::LayoutBuilder {
    builder
        .head()
        .race_key()
        .int("Wakuban", 1)
        .int("Umaban", 2)
        .text("KettoNum", 10)
        .text("Bamei", 36)
        .text("UmaKigoCD", 2)
        .text("SexCD", 1)
        .text("HinsyuCD", 1)
        .text("KeiroCD", 2)
        .int("Barei", 2)
        .text("TozaiCD", 1)
        .text("ChokyosiCode", 5)
        .text("ChokyosiRyakusyo", 8)
        .text("BanusiCode", 6)
        .text("BanusiName", 64)
        .text("Fukusyoku", 60)
        .real("Futan", 3, 1)
        .int("BaTaijyu", 3)
        .text("ZogenFugo", 1)
        .int("ZogenSa", 3)
        .text("IJyoCD", 1)
        .int("NyusenJyuni", 2)
        .int("KakuteiJyuni", 2)
        .int("DochakuKubun", 1)
        .int("DochakuTosu", 1)
        .real("Time", 4, 1)
        .text("ChakusaCD", 3)
        .int("Jyuni1c", 2)
        .int("Jyuni2c", 2)
        .int("Jyuni3c", 2)
        .int("Jyuni4c", 2)
        .real("Odds", 4, 1)
        .int("Ninki", 2)
        .text("KisyuCode", 5)
        .text("KisyuRyakusyo", 8)
        .text("MinaraiCD", 1)
        .real("HaronTimeL3", 3, 1)
        .real("TimeDiff", 4, 1)
        .text("RecordUpKubun", 1)
        .text("DMKubun", 1)
        .real("DMTime", 4, 1)
        .real("DMGosaP", 3, 1)
        .real("DMGosaM", 3, 1)
        .int("DMJyuni", 2)
        .text("KyakusituKubun", 1)
}

/// 馬毎レース情報
pub static SE: Lazy<RecordLayout> = Lazy::new(|| {
    se_common(RecordLayout::builder(RecordKind::Se))
        .int("Honsyokin", 8)
        .int("Fukasyokin", 8)
        .build()
});

/// 馬毎レース情報（地方）。賞金ブロックが無い分だけ短い。
pub static SE_REG: Lazy<RecordLayout> =
    Lazy::new(|| se_common(RecordLayout::builder(RecordKind::Se)).build());

/// 払戻
pub static HR: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Hr)
        .head()
        .race_key()
        .int("TorokuTosu", 2)
        .int("SyussoTosu", 2)
        .flatten(9, &[FieldDef::text("FuseirituFlag", 1)])
        .flatten(
            3,
            &[
                FieldDef::text("PayTansyoUmaban", 2),
                FieldDef::int("PayTansyoPay", 9),
                FieldDef::int("PayTansyoNinki", 2),
            ],
        )
        .flatten(
            5,
            &[
                FieldDef::text("PayFukusyoUmaban", 2),
                FieldDef::int("PayFukusyoPay", 9),
                FieldDef::int("PayFukusyoNinki", 2),
            ],
        )
        .flatten(
            3,
            &[
                FieldDef::text("PayWakurenKumi", 2),
                FieldDef::int("PayWakurenPay", 9),
                FieldDef::int("PayWakurenNinki", 2),
            ],
        )
        .flatten(
            3,
            &[
                FieldDef::text("PayUmarenKumi", 4),
                FieldDef::int("PayUmarenPay", 9),
                FieldDef::int("PayUmarenNinki", 3),
            ],
        )
        .flatten(
            7,
            &[
                FieldDef::text("PayWideKumi", 4),
                FieldDef::int("PayWidePay", 9),
                FieldDef::int("PayWideNinki", 3),
            ],
        )
        .flatten(
            6,
            &[
                FieldDef::text("PayUmatanKumi", 4),
                FieldDef::int("PayUmatanPay", 9),
                FieldDef::int("PayUmatanNinki", 3),
            ],
        )
        .flatten(
            3,
            &[
                FieldDef::text("PaySanrenpukuKumi", 6),
                FieldDef::int("PaySanrenpukuPay", 9),
                FieldDef::int("PaySanrenpukuNinki", 3),
            ],
        )
        .flatten(
            6,
            &[
                FieldDef::text("PaySanrentanKumi", 6),
                FieldDef::int("PaySanrentanPay", 9),
                FieldDef::int("PaySanrentanNinki", 4),
            ],
        )
        .build()
});

/// 票数（単勝・複勝・枠連）
pub static H1: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::H1)
        .head()
        .race_key()
        .int("TorokuTosu", 2)
        .int("SyussoTosu", 2)
        .int("HatubaiFlagTansyo", 1)
        .int("HatubaiFlagFukusyo", 1)
        .int("HatubaiFlagWakuren", 1)
        .int("FukuChakuBaraiKey", 1)
        .flatten(
            28,
            &[
                FieldDef::text("HyoTansyoUmaban", 2),
                FieldDef::int("HyoTansyoHyo", 11),
                FieldDef::int("HyoTansyoJyuni", 2),
            ],
        )
        .flatten(
            28,
            &[
                FieldDef::text("HyoFukusyoUmaban", 2),
                FieldDef::int("HyoFukusyoHyo", 11),
                FieldDef::int("HyoFukusyoJyuni", 2),
            ],
        )
        .flatten(
            36,
            &[
                FieldDef::text("HyoWakurenKumi", 2),
                FieldDef::int("HyoWakurenHyo", 11),
                FieldDef::int("HyoWakurenJyuni", 2),
            ],
        )
        .int("TotalHyoTansyo", 11)
        .int("TotalHyoFukusyo", 11)
        .int("TotalHyoWakuren", 11)
        .build()
});

/// 票数（3連単）。組番がキーに入るので行展開する。
pub static H6: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::H6)
        .head()
        .race_key()
        .int("TorokuTosu", 2)
        .int("SyussoTosu", 2)
        .int("HatubaiFlag", 1)
        .int("TotalHyo", 11)
        .expand(
            60,
            &[
                FieldDef::text("Kumi", 6),
                FieldDef::int("Hyo", 11),
                FieldDef::int("Jyuni", 5),
            ],
        )
        .build()
});

/// 重勝式
pub static WF: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Wf)
        .head()
        .text("KaisaiDate", 8)
        .text("Reserved", 2)
        .flatten(
            5,
            &[
                FieldDef::text("WFJyoCD", 2),
                FieldDef::int("WFKaiji", 2),
                FieldDef::int("WFNichiji", 2),
                FieldDef::int("WFRaceNum", 2),
            ],
        )
        .int("HatubaiHyosu", 11)
        .int("YukoHyosu", 11)
        .int("HenkanFlag", 1)
        .int("TekichuHyosu", 11)
        .int("Pay", 9)
        .build()
});

/// 競走馬除外情報
pub static JG: Lazy<RecordLayout> = Lazy::new(|| {
    RecordLayout::builder(RecordKind::Jg)
        .head()
        .race_key()
        .text("KettoNum", 10)
        .text("Bamei", 36)
        .int("ShutsubaTohyoJun", 3)
        .text("ShussoKubun", 1)
        .text("JogaiJotaiKubun", 1)
        .build()
});
