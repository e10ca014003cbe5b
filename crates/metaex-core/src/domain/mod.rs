pub mod metadata;
pub mod status;
pub mod tag;

pub use metadata::{CanonicalFields, ContainerInfo, MetadataResult, StreamInfo};
pub use status::{Status, UnknownStatusCode};
pub use tag::{CanonicalField, RawTagEntry, Scope};
