//! Pluggable completion engine: ranked candidates merged from multiple
//! sources (spec §4.E).

pub mod completion;
pub mod meta;
pub mod sources;
pub mod tokenize;

pub use completion::{Completion, Promotion};
pub use meta::CandidateMeta;
pub use sources::{
    BuiltinsSource, CompletionSource, DirHistorySource, EnvSource, FilesystemSource,
    HistorySource, LuaKeywordsSource, PathSource, SnippetsSource,
};
