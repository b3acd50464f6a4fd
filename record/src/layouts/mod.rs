//! Static byte layouts, one per record kind.
//!
//! Each layout is declared as an ordered field table; offsets and the
//! record length fall out of the declaration. The regional feed reuses the
//! central layouts except where the bytes differ (SE carries a shorter
//! prize block there) and adds three kinds of its own.

pub mod master;
pub mod odds;
pub mod race;
pub mod realtime;
pub mod regional;
pub mod schedule;

use common::feed::Feed;
use once_cell::sync::Lazy;

use crate::k_type::{RecordKind, CENTRAL_KINDS, REGIONAL_ONLY_KINDS};
use crate::layout::RecordLayout;

/// The layout the given feed uses for `kind`, if the feed carries it.
pub fn layout_for(feed: Feed, kind: RecordKind) -> Option<&'static RecordLayout> {
    if !kind.in_feed(feed) {
        return None;
    }
    if feed == Feed::Regional {
        if let Some(layout) = regional_override(kind) {
            return Some(layout);
        }
    }
    central_layout(kind)
}

/// Every (feed, layout) pair, for catalogue construction.
pub fn all_layouts(feed: Feed) -> Vec<&'static RecordLayout> {
    let kinds: Vec<RecordKind> = match feed {
        Feed::Central => CENTRAL_KINDS.to_vec(),
        Feed::Regional => CENTRAL_KINDS
            .iter()
            .chain(REGIONAL_ONLY_KINDS.iter())
            .copied()
            .collect(),
    };
    kinds
        .into_iter()
        .filter_map(|k| layout_for(feed, k))
        .collect()
}

fn central_layout(kind: RecordKind) -> Option<&'static RecordLayout> {
    let layout: &Lazy<RecordLayout> = match kind {
        RecordKind::Tk => &race::TK,
        RecordKind::Ra => &race::RA,
        RecordKind::Se => &race::SE,
        RecordKind::Hr => &race::HR,
        RecordKind::H1 => &race::H1,
        RecordKind::H6 => &race::H6,
        RecordKind::Wf => &race::WF,
        RecordKind::Jg => &race::JG,
        RecordKind::O1 => &odds::O1,
        RecordKind::O2 => &odds::O2,
        RecordKind::O3 => &odds::O3,
        RecordKind::O4 => &odds::O4,
        RecordKind::O5 => &odds::O5,
        RecordKind::O6 => &odds::O6,
        RecordKind::Um => &master::UM,
        RecordKind::Ks => &master::KS,
        RecordKind::Ch => &master::CH,
        RecordKind::Br => &master::BR,
        RecordKind::Bn => &master::BN,
        RecordKind::Hn => &master::HN,
        RecordKind::Sk => &master::SK,
        RecordKind::Ck => &master::CK,
        RecordKind::Rc => &master::RC,
        RecordKind::Bt => &master::BT,
        RecordKind::Hs => &master::HS,
        RecordKind::Hy => &master::HY,
        RecordKind::Cs => &master::CS,
        RecordKind::Ys => &schedule::YS,
        RecordKind::Hc => &schedule::HC,
        RecordKind::Wc => &schedule::WC,
        RecordKind::Dm => &schedule::DM,
        RecordKind::Tm => &schedule::TM,
        RecordKind::Wh => &realtime::WH,
        RecordKind::We => &realtime::WE,
        RecordKind::Av => &realtime::AV,
        RecordKind::Jc => &realtime::JC,
        RecordKind::Tc => &realtime::TC,
        RecordKind::Cc => &realtime::CC,
        RecordKind::Hb => &regional::HB,
        RecordKind::Rb => &regional::RB,
        RecordKind::Ba => &regional::BA,
    };
    Some(Lazy::force(layout))
}

fn regional_override(kind: RecordKind) -> Option<&'static RecordLayout> {
    match kind {
        RecordKind::Se => Some(Lazy::force(&race::SE_REG)),
        _ => None,
    }
}
