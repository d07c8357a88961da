//! `last_op`: the one-slot log `InputState` leaves for the view to consume
//! (spec §3, §4.G).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOp {
    /// A character was inserted; carries the 1-based buffer position it
    /// landed at.
    Insert(usize),
    /// A character was removed from the given 1-based buffer position.
    Delete(usize),
    CursorMove,
    FullChange,
    /// Promotion happened; `true` when the whole buffer tail changed
    /// (e.g. `replace_prompt` promotion) rather than a simple append.
    CompletionPromote(bool),
    /// Ghost completion scrolled; carries the previous ghost length so the
    /// view can erase exactly that many codepoints.
    CompletionScroll(usize),
    HistoryScroll,
    PositionChange,
}
