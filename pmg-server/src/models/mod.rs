//! API resources and request types
//!
//! Row structs derive both `FromRow` and `Serialize`: the repositories
//! fill them, the handlers return them as-is. Detail structs flatten the
//! base row and add their related resources.

pub mod bill;
pub mod committee;
pub mod event;
pub mod member;
pub mod pagination;
pub mod question;
pub mod search;
pub mod user;
pub mod validation;

pub use bill::{Bill, BillDetail, BillEvent};
pub use committee::{CallForComment, Committee, CommitteeDetail, TabledReport};
pub use event::{ContentItem, EventFile, Meeting, MeetingDetail, Proceeding, ProceedingDetail};
pub use member::{Member, MemberDetail};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use question::{CommitteeQuestion, QuestionReply};
pub use search::{ContentType, SearchHit, SearchHits, SearchTerm};
pub use user::{SavedSearch, User};
pub use validation::ValidationError;
