use common::feed::Feed;

/// The vendor `open` option parameter.
///
/// Values 1-4 with feed-dependent semantics. Backfill always uses
/// `SetupDialog`, the only option that behaves the same on both feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOption {
    Normal = 1,
    ThisWeek = 2,
    SetupDialog = 3,
    SetupSplit = 4,
}

impl OpenOption {
    /// The raw value to pass for `feed`.
    ///
    /// The regional link misbehaves on options 1/2 and is driven with the
    /// setup variants instead. Confirm against current vendor
    /// documentation before touching this table.
    pub fn effective_for(self, feed: Feed) -> i32 {
        match (feed, self) {
            (Feed::Regional, OpenOption::Normal) => OpenOption::SetupDialog as i32,
            (Feed::Regional, OpenOption::ThisWeek) => OpenOption::SetupSplit as i32,
            (_, option) => option as i32,
        }
    }
}

/// Parameters of one session.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub service_key: String,
    pub data_spec: String,
    /// YYYYMMDDhhmmss. None opens the real-time session instead.
    pub from_time: Option<String>,
    pub option: OpenOption,
    /// Key handed to `real_time_open`; ignored on the historical path.
    pub realtime_key: String,
}

impl SessionRequest {
    pub fn historical(
        service_key: impl Into<String>,
        data_spec: impl Into<String>,
        from_time: impl Into<String>,
    ) -> Self {
        Self {
            service_key: service_key.into(),
            data_spec: data_spec.into(),
            from_time: Some(from_time.into()),
            option: OpenOption::SetupDialog,
            realtime_key: String::new(),
        }
    }

    pub fn realtime(
        service_key: impl Into<String>,
        data_spec: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            service_key: service_key.into(),
            data_spec: data_spec.into(),
            from_time: None,
            option: OpenOption::Normal,
            realtime_key: key.into(),
        }
    }

    pub fn is_realtime(&self) -> bool {
        self.from_time.is_none()
    }
}
