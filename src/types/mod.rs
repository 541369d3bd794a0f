pub mod error;
pub mod section;
pub mod symbol;

pub use error::{DocsiftError, Result, ResultExt};
pub use section::{ContentRef, SectionDescriptor};
pub use symbol::{
    CandidateSymbol, ExclusionReason, ExclusionRecord, FailureKind, PackageHandle, SourceOrder,
    SymbolKind, ValidatedMethod, ValidatedSymbol,
};
