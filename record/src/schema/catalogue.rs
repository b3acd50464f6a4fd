use std::collections::HashMap;

use once_cell::sync::Lazy;

use common::err::{LResult, LoaderError};
use common::feed::{Feed, IngestPath};

use crate::k_type::RecordKind;
use crate::layout::{FieldCodec, RecordLayout, ResolvedField};
use crate::layouts;
use crate::schema::table_def::{ColumnType, TableDef};

const RACE_KEY: &[&str] = &["Year", "MonthDay", "JyoCD", "Kaiji", "Nichiji", "RaceNum"];

/// Declared primary key per kind. Every kind has one; the catalogue build
/// fails on a layout missing any of its key columns.
fn primary_key(kind: RecordKind) -> Vec<&'static str> {
    let extra: &[&str] = match kind {
        RecordKind::Tk
        | RecordKind::Ra
        | RecordKind::Hr
        | RecordKind::H1
        | RecordKind::Dm
        | RecordKind::Tm
        | RecordKind::Wh
        | RecordKind::Hb => &[],
        RecordKind::Se | RecordKind::Rb => &["Umaban"],
        RecordKind::O1 => &["Umaban"],
        RecordKind::H6
        | RecordKind::O2
        | RecordKind::O3
        | RecordKind::O4
        | RecordKind::O5
        | RecordKind::O6 => &["Kumi"],
        RecordKind::Jg => &["KettoNum", "ShutsubaTohyoJun"],
        RecordKind::Av | RecordKind::Jc => &["Umaban", "HappyoTime"],
        RecordKind::Tc | RecordKind::Cc => &["HappyoTime"],
        // non race-scoped kinds carry their whole key here
        RecordKind::Um | RecordKind::Sk | RecordKind::Hy => {
            return vec!["KettoNum"];
        }
        RecordKind::Ks => return vec!["KisyuCode"],
        RecordKind::Ch => return vec!["ChokyosiCode"],
        RecordKind::Br => return vec!["BreederCode"],
        RecordKind::Bn => return vec!["BanusiCode"],
        RecordKind::Hn | RecordKind::Bt => return vec!["HansyokuNum"],
        RecordKind::Ck => return vec!["Year", "KettoNum"],
        RecordKind::Rc => {
            return vec!["RecordKubun", "Kyori", "TrackCD", "Year", "MonthDay", "JyoCD"];
        }
        RecordKind::Hc | RecordKind::Wc => {
            return vec!["TresenKubun", "ChokyoDate", "ChokyoTime", "KettoNum"];
        }
        RecordKind::Hs => return vec!["KettoNum", "SaleCode", "FromDate"],
        RecordKind::Ys => return vec!["Year", "MonthDay", "JyoCD"],
        RecordKind::Cs => return vec!["JyoCD", "Kyori", "TrackCD", "KaishuDate"],
        RecordKind::Wf => return vec!["KaisaiDate"],
        RecordKind::We => {
            return vec!["Year", "MonthDay", "JyoCD", "Kaiji", "Nichiji", "HappyoTime"];
        }
        RecordKind::Ba => return vec!["BabaCode"],
    };
    RACE_KEY.iter().chain(extra.iter()).copied().collect()
}

/// Declared real-time column subsets. None means the real-time table has
/// the same columns as the accumulated one; where both exist the
/// accumulated definition is authoritative.
fn realtime_columns(kind: RecordKind) -> Option<&'static [&'static str]> {
    match kind {
        RecordKind::Ra => Some(&[
            "RecordSpec",
            "DataKubun",
            "MakeDate",
            "Year",
            "MonthDay",
            "JyoCD",
            "Kaiji",
            "Nichiji",
            "RaceNum",
            "YoubiCD",
            "TokuNum",
            "Hondai",
            "GradeCD",
            "SyubetuCD",
            "JyokenCD",
            "Kyori",
            "TrackCD",
            "CourseKubunCD",
            "HassoTime",
            "TorokuTosu",
            "SyussoTosu",
            "NyusenTosu",
            "TenkoCD",
            "SibaBabaCD",
            "DirtBabaCD",
        ]),
        RecordKind::Se => Some(&[
            "RecordSpec",
            "DataKubun",
            "MakeDate",
            "Year",
            "MonthDay",
            "JyoCD",
            "Kaiji",
            "Nichiji",
            "RaceNum",
            "Wakuban",
            "Umaban",
            "KettoNum",
            "Bamei",
            "Barei",
            "Futan",
            "BaTaijyu",
            "ZogenFugo",
            "ZogenSa",
            "IJyoCD",
            "NyusenJyuni",
            "KakuteiJyuni",
            "Time",
            "ChakusaCD",
            "Odds",
            "Ninki",
            "KisyuCode",
            "KisyuRyakusyo",
            "MinaraiCD",
        ]),
        _ => None,
    }
}

/// Numeric fields wide enough to overflow 32 bits go to BIGINT.
fn column_type(field: &ResolvedField) -> ColumnType {
    match field.codec {
        FieldCodec::Int => {
            if field.len >= 9 {
                ColumnType::BigInt
            } else {
                ColumnType::Int
            }
        }
        FieldCodec::Real { .. } => ColumnType::Real,
        FieldCodec::Text => ColumnType::Text,
    }
}

/// The full set of destination tables across both feeds and both paths.
#[derive(Debug)]
pub struct Catalogue {
    tables: HashMap<String, TableDef>,
}

static GLOBAL: Lazy<Catalogue> =
    Lazy::new(|| Catalogue::build().expect("static schema catalogue must validate"));

impl Catalogue {
    pub fn global() -> &'static Catalogue {
        &GLOBAL
    }

    pub fn build() -> LResult<Catalogue> {
        let mut tables = HashMap::new();
        for feed in [Feed::Central, Feed::Regional] {
            for layout in layouts::all_layouts(feed) {
                let kind = layout.kind();

                let accumulated = Self::def_for(layout, feed, IngestPath::Accumulated, None)?;
                tables.insert(accumulated.name.clone(), accumulated);

                if kind.is_realtime() {
                    let rt = Self::def_for(
                        layout,
                        feed,
                        IngestPath::RealTime,
                        realtime_columns(kind),
                    )?;
                    tables.insert(rt.name.clone(), rt);
                }
            }
        }
        Ok(Catalogue { tables })
    }

    fn def_for(
        layout: &RecordLayout,
        feed: Feed,
        path: IngestPath,
        subset: Option<&[&str]>,
    ) -> LResult<TableDef> {
        let kind = layout.kind();
        let name = format!("{}{}{}", path.table_prefix(), kind.tag(), feed.table_suffix());

        let all = layout.columns();
        let columns: Vec<(String, ColumnType)> = match subset {
            None => all
                .iter()
                .map(|f| (f.name.clone(), column_type(f)))
                .collect(),
            Some(keep) => {
                // the subset is declared against the accumulated def;
                // a name it lists must exist there
                let mut out = Vec::with_capacity(keep.len());
                for name in keep {
                    let field = all.iter().find(|f| f.name == *name).ok_or_else(|| {
                        LoaderError::Schema(format!(
                            "real-time subset for {} names unknown column {}",
                            kind, name
                        ))
                    })?;
                    out.push((field.name.clone(), column_type(field)));
                }
                out
            }
        };

        let def = TableDef {
            name,
            columns,
            pk: primary_key(kind).iter().map(|s| s.to_string()).collect(),
            kind,
        };
        def.validate()?;
        Ok(def)
    }

    pub fn get(&self, table: &str) -> Option<&TableDef> {
        self.tables.get(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every definition, ordered by table name.
    pub fn defs(&self) -> Vec<&TableDef> {
        let mut defs: Vec<&TableDef> = self.tables.values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}
