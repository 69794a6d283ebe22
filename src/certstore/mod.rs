//! 인증서 저장소 모듈
//!
//! OS 인증서 저장소를 열고, 메모리의 인증서를 해석해 저장소에 추가합니다.
//! 인증서 파싱/검증과 저장소 영속화는 모두 OS가 담당합니다.

pub mod flags;
pub mod location;

#[cfg(windows)]
mod context;
#[cfg(windows)]
mod query;
#[cfg(windows)]
mod store;

pub use flags::{AddDisposition, ContentType, FormatType, QueryContentFlags, QueryFormatFlags};
pub use location::StoreLocation;

#[cfg(windows)]
pub use context::CertContext;
#[cfg(windows)]
pub use query::{query_object, CertQuery, CertQuerySummary};
#[cfg(windows)]
pub use store::{with_store, CertStore};
