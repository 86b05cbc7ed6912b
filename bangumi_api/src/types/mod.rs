mod meta;
pub use self::meta::Paged;

mod subject;
pub use self::subject::{Rating, Subject, SubjectType};
