mod meta;
pub use self::meta::{Metadata, SchoolsResponse};

mod record;
pub use self::record::RawRecord;
