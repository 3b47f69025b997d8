mod common;
pub use self::common::{Paging, Query};

mod school;
pub use self::school::SchoolQuery;
