use std::collections::HashMap;

use crate::k_type::RecordKind;

/// How a field's bytes become a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCodec {
    /// ASCII digits with leading spaces/zeroes.
    Int,
    /// ASCII digits storing value x 10^scale (odds x10, times x10, ...).
    Real { scale: u32 },
    /// Shift-JIS, trailing spaces trimmed, stored as UTF-8.
    Text,
}

/// One declared field: name, byte length, codec. Offsets are derived when
/// the layout is built, so the declared record length always equals the
/// sum of its layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub len: usize,
    pub codec: FieldCodec,
}

impl FieldDef {
    pub const fn int(name: &'static str, len: usize) -> Self {
        Self {
            name,
            len,
            codec: FieldCodec::Int,
        }
    }

    pub const fn real(name: &'static str, len: usize, scale: u32) -> Self {
        Self {
            name,
            len,
            codec: FieldCodec::Real { scale },
        }
    }

    pub const fn text(name: &'static str, len: usize) -> Self {
        Self {
            name,
            len,
            codec: FieldCodec::Text,
        }
    }
}

/// What a repeat block turns into at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    /// One output row; sub-field names get the slot number appended.
    /// Payoffs, vote counts, lap times.
    Flatten,
    /// One output row per occupied slot. The odds families, where the
    /// combination is part of the table key.
    ExpandRows,
}

/// A field with its resolved absolute (or slot-relative) offset.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub offset: usize,
    pub len: usize,
    pub codec: FieldCodec,
}

#[derive(Debug, Clone)]
pub struct ResolvedRepeat {
    pub offset: usize,
    pub count: usize,
    /// Byte width of one slot; slot i starts at `offset + i * stride`.
    pub stride: usize,
    pub mode: RepeatMode,
    /// Offsets relative to the slot start. Names unsuffixed.
    pub fields: Vec<ResolvedField>,
}

/// The fixed byte layout of one record kind.
#[derive(Debug, Clone)]
pub struct RecordLayout {
    kind: RecordKind,
    record_len: usize,
    fields: Vec<ResolvedField>,
    repeats: Vec<ResolvedRepeat>,
}

impl RecordLayout {
    pub fn builder(kind: RecordKind) -> LayoutBuilder {
        LayoutBuilder::new(kind)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Declared fixed record length. Buffers shorter than this are
    /// rejected; longer buffers are fine, the tail is ignored.
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    pub fn repeats(&self) -> &[ResolvedRepeat] {
        &self.repeats
    }

    pub fn expand_repeat(&self) -> Option<&ResolvedRepeat> {
        self.repeats
            .iter()
            .find(|r| r.mode == RepeatMode::ExpandRows)
    }

    /// Every output column of this layout, in declaration order: singles,
    /// then flattened repeat slots, then the expanded sub-fields. This is
    /// exactly the column set of the destination table.
    pub fn columns(&self) -> Vec<ResolvedField> {
        let mut out: Vec<ResolvedField> = self.fields.clone();
        for repeat in &self.repeats {
            match repeat.mode {
                RepeatMode::Flatten => {
                    for i in 0..repeat.count {
                        for f in &repeat.fields {
                            out.push(ResolvedField {
                                name: format!("{}{}", f.name, i + 1),
                                offset: repeat.offset + i * repeat.stride + f.offset,
                                len: f.len,
                                codec: f.codec,
                            });
                        }
                    }
                }
                RepeatMode::ExpandRows => {
                    for f in &repeat.fields {
                        out.push(f.clone());
                    }
                }
            }
        }
        out
    }
}

/// Cursor-style builder. Fields land back to back; the record length is
/// whatever the cursor ends at.
pub struct LayoutBuilder {
    kind: RecordKind,
    cursor: usize,
    fields: Vec<ResolvedField>,
    repeats: Vec<ResolvedRepeat>,
    seen: HashMap<String, usize>,
}

impl LayoutBuilder {
    fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            cursor: 0,
            fields: Vec::new(),
            repeats: Vec::new(),
            seen: HashMap::new(),
        }
    }

    /// RecordSpec + DataKubun + MakeDate, the head every kind shares.
    pub fn head(self) -> Self {
        self.text("RecordSpec", 2)
            .text("DataKubun", 1)
            .text("MakeDate", 8)
    }

    /// The six-column race key shared by every race-scoped kind.
    pub fn race_key(self) -> Self {
        self.int("Year", 4)
            .text("MonthDay", 4)
            .text("JyoCD", 2)
            .int("Kaiji", 2)
            .int("Nichiji", 2)
            .int("RaceNum", 2)
    }

    pub fn int(self, name: &'static str, len: usize) -> Self {
        self.push(FieldDef::int(name, len))
    }

    pub fn real(self, name: &'static str, len: usize, scale: u32) -> Self {
        self.push(FieldDef::real(name, len, scale))
    }

    pub fn text(self, name: &'static str, len: usize) -> Self {
        self.push(FieldDef::text(name, len))
    }

    pub fn push(mut self, def: FieldDef) -> Self {
        let name = self.unique_name(def.name);
        self.fields.push(ResolvedField {
            name,
            offset: self.cursor,
            len: def.len,
            codec: def.codec,
        });
        self.cursor += def.len;
        self
    }

    /// A repeat block of `count` slots, each laid out as `subs`.
    pub fn repeat(mut self, count: usize, mode: RepeatMode, subs: &[FieldDef]) -> Self {
        let mut fields = Vec::with_capacity(subs.len());
        let mut sub_cursor = 0usize;
        let mut sub_seen: HashMap<String, usize> = HashMap::new();
        for def in subs {
            let n = sub_seen.entry(def.name.to_string()).or_insert(0);
            *n += 1;
            let name = if *n == 1 {
                def.name.to_string()
            } else {
                format!("{}{}", def.name, n)
            };
            fields.push(ResolvedField {
                name,
                offset: sub_cursor,
                len: def.len,
                codec: def.codec,
            });
            sub_cursor += def.len;
        }

        let stride = sub_cursor;
        self.repeats.push(ResolvedRepeat {
            offset: self.cursor,
            count,
            stride,
            mode,
            fields,
        });
        self.cursor += stride * count;
        self
    }

    pub fn flatten(self, count: usize, subs: &[FieldDef]) -> Self {
        self.repeat(count, RepeatMode::Flatten, subs)
    }

    pub fn expand(self, count: usize, subs: &[FieldDef]) -> Self {
        self.repeat(count, RepeatMode::ExpandRows, subs)
    }

    pub fn build(self) -> RecordLayout {
        let expand_blocks = self
            .repeats
            .iter()
            .filter(|r| r.mode == RepeatMode::ExpandRows)
            .count();
        // One combinatorial key per table.
        assert!(
            expand_blocks <= 1,
            "{}: at most one ExpandRows block per layout",
            self.kind
        );

        RecordLayout {
            kind: self.kind,
            record_len: self.cursor,
            fields: self.fields,
            repeats: self.repeats,
        }
    }

    /// Duplicated source field names get a numeric suffix so every output
    /// key is unique.
    fn unique_name(&mut self, base: &'static str) -> String {
        let n = self.seen.entry(base.to_string()).or_insert(0);
        *n += 1;
        if *n == 1 {
            base.to_string()
        } else {
            format!("{}{}", base, n)
        }
    }
}
