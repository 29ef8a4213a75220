//! Per-query fetch options shared by every station in a pass.

/// Rows requested per station when the caller asks for zero.
pub const DEFAULT_ROWS: u32 = 10;

/// What to ask each provider for.
///
/// Options are read-only once handed to an adapter. Zero for the offset or
/// window means "not specified" and is never sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum departures requested per station; zero means the default.
    pub rows: u32,
    /// Minutes to shift the query's reference time; zero means now.
    pub time_offset: i32,
    /// Width of the time window in minutes; zero means the provider default.
    pub time_window: u32,
}

impl FetchOptions {
    /// Create options with the default row count and no offset or window.
    pub fn new() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            time_offset: 0,
            time_window: 0,
        }
    }

    /// Set the rows per station. Zero is ignored.
    pub fn with_rows(mut self, rows: u32) -> Self {
        if rows > 0 {
            self.rows = rows;
        }
        self
    }

    /// Set the offset from now in minutes.
    pub fn with_offset(mut self, minutes: i32) -> Self {
        self.time_offset = minutes;
        self
    }

    /// Set the width of the search window in minutes.
    pub fn with_window(mut self, minutes: u32) -> Self {
        self.time_window = minutes;
        self
    }

    /// The row count to send upstream: never zero.
    pub fn effective_rows(&self) -> u32 {
        if self.rows == 0 {
            DEFAULT_ROWS
        } else {
            self.rows
        }
    }

    /// The offset, or `None` if it should be left out of the request.
    pub fn offset(&self) -> Option<i32> {
        (self.time_offset != 0).then_some(self.time_offset)
    }

    /// The window, or `None` if it should be left out of the request.
    pub fn window(&self) -> Option<u32> {
        (self.time_window != 0).then_some(self.time_window)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new()
    }
}
