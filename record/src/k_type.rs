use common::feed::Feed;

/// 蓄積系レコード種別 + 速報系レコード種別
///
/// The two ASCII bytes at the head of every record buffer. One layout per
/// kind; the regional feed reuses the central layouts where the bytes are
/// compatible and carries three kinds of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// 特別登録馬
    Tk,
    /// レース詳細
    Ra,
    /// 馬毎レース情報
    Se,
    /// 払戻
    Hr,
    /// 票数（単勝・複勝・枠連）
    H1,
    /// 票数（3連単）
    H6,
    /// オッズ（単複）
    O1,
    /// オッズ（馬連）
    O2,
    /// オッズ（ワイド）
    O3,
    /// オッズ（馬単）
    O4,
    /// オッズ（3連複）
    O5,
    /// オッズ（3連単）
    O6,
    /// 競走馬マスタ
    Um,
    /// 騎手マスタ
    Ks,
    /// 調教師マスタ
    Ch,
    /// 生産者マスタ
    Br,
    /// 馬主マスタ
    Bn,
    /// 繁殖馬マスタ
    Hn,
    /// 産駒マスタ
    Sk,
    /// 出走別着度数
    Ck,
    /// レコードマスタ
    Rc,
    /// 坂路調教
    Hc,
    /// ウッドチップ調教
    Wc,
    /// 競走馬市場取引価格
    Hs,
    /// 馬名の意味由来
    Hy,
    /// 開催スケジュール
    Ys,
    /// 系統情報
    Bt,
    /// コース情報
    Cs,
    /// タイム型データマイニング予想
    Dm,
    /// 対戦型データマイニング予想
    Tm,
    /// 重勝式
    Wf,
    /// 競走馬除外情報
    Jg,
    /// 馬体重
    Wh,
    /// 天候馬場状態
    We,
    /// 出走取消・競走除外
    Av,
    /// 騎手変更
    Jc,
    /// 発走時刻変更
    Tc,
    /// コース変更
    Cc,
    /// 地方払戻詳細
    Hb,
    /// 地方馬毎レース追加情報
    Rb,
    /// 地方競馬場マスタ
    Ba,
}

/// Every kind the central feed delivers, in catalogue order.
pub const CENTRAL_KINDS: [RecordKind; 38] = [
    RecordKind::Tk,
    RecordKind::Ra,
    RecordKind::Se,
    RecordKind::Hr,
    RecordKind::H1,
    RecordKind::H6,
    RecordKind::O1,
    RecordKind::O2,
    RecordKind::O3,
    RecordKind::O4,
    RecordKind::O5,
    RecordKind::O6,
    RecordKind::Um,
    RecordKind::Ks,
    RecordKind::Ch,
    RecordKind::Br,
    RecordKind::Bn,
    RecordKind::Hn,
    RecordKind::Sk,
    RecordKind::Ck,
    RecordKind::Rc,
    RecordKind::Hc,
    RecordKind::Wc,
    RecordKind::Hs,
    RecordKind::Hy,
    RecordKind::Ys,
    RecordKind::Bt,
    RecordKind::Cs,
    RecordKind::Dm,
    RecordKind::Tm,
    RecordKind::Wf,
    RecordKind::Jg,
    RecordKind::Wh,
    RecordKind::We,
    RecordKind::Av,
    RecordKind::Jc,
    RecordKind::Tc,
    RecordKind::Cc,
];

/// Kinds only the regional feed delivers.
pub const REGIONAL_ONLY_KINDS: [RecordKind; 3] =
    [RecordKind::Hb, RecordKind::Rb, RecordKind::Ba];

/// Kinds the live-monitor path routes to the real-time table family.
pub const REALTIME_KINDS: [RecordKind; 19] = [
    RecordKind::Ra,
    RecordKind::Se,
    RecordKind::Hr,
    RecordKind::H1,
    RecordKind::O1,
    RecordKind::O2,
    RecordKind::O3,
    RecordKind::O4,
    RecordKind::O5,
    RecordKind::O6,
    RecordKind::Dm,
    RecordKind::Tm,
    RecordKind::Wf,
    RecordKind::Wh,
    RecordKind::We,
    RecordKind::Av,
    RecordKind::Jc,
    RecordKind::Tc,
    RecordKind::Cc,
];

impl RecordKind {
    /// The two-ASCII-byte tag.
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::Tk => "TK",
            RecordKind::Ra => "RA",
            RecordKind::Se => "SE",
            RecordKind::Hr => "HR",
            RecordKind::H1 => "H1",
            RecordKind::H6 => "H6",
            RecordKind::O1 => "O1",
            RecordKind::O2 => "O2",
            RecordKind::O3 => "O3",
            RecordKind::O4 => "O4",
            RecordKind::O5 => "O5",
            RecordKind::O6 => "O6",
            RecordKind::Um => "UM",
            RecordKind::Ks => "KS",
            RecordKind::Ch => "CH",
            RecordKind::Br => "BR",
            RecordKind::Bn => "BN",
            RecordKind::Hn => "HN",
            RecordKind::Sk => "SK",
            RecordKind::Ck => "CK",
            RecordKind::Rc => "RC",
            RecordKind::Hc => "HC",
            RecordKind::Wc => "WC",
            RecordKind::Hs => "HS",
            RecordKind::Hy => "HY",
            RecordKind::Ys => "YS",
            RecordKind::Bt => "BT",
            RecordKind::Cs => "CS",
            RecordKind::Dm => "DM",
            RecordKind::Tm => "TM",
            RecordKind::Wf => "WF",
            RecordKind::Jg => "JG",
            RecordKind::Wh => "WH",
            RecordKind::We => "WE",
            RecordKind::Av => "AV",
            RecordKind::Jc => "JC",
            RecordKind::Tc => "TC",
            RecordKind::Cc => "CC",
            RecordKind::Hb => "HB",
            RecordKind::Rb => "RB",
            RecordKind::Ba => "BA",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let all = CENTRAL_KINDS
            .iter()
            .chain(REGIONAL_ONLY_KINDS.iter());
        for kind in all {
            if kind.tag() == tag {
                return Some(*kind);
            }
        }
        None
    }

    /// Whether `feed` delivers this kind at all.
    pub fn in_feed(&self, feed: Feed) -> bool {
        match feed {
            Feed::Central => CENTRAL_KINDS.contains(self),
            Feed::Regional => true,
        }
    }

    /// Whether the live-monitor path has a real-time table for this kind.
    pub fn is_realtime(&self) -> bool {
        REALTIME_KINDS.contains(self)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
