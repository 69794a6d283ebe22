//! 데이터 보호 모듈 (Windows DPAPI)
//!
//! 현재 사용자(또는 머신) 컨텍스트에서 파생된 키로 바이트 버퍼를 암호화/복호화합니다.
//!
//! - 암호화/키 파생은 전적으로 OS가 수행 (`CryptProtectData` / `CryptUnprotectData`)
//! - 선택적 entropy는 복호화 시 동일한 값이 필요
//! - 설명(description) 문자열은 blob에 함께 저장되어 복호화 시 반환

pub mod blob;
pub mod flags;
#[cfg(windows)]
mod protect;

pub use blob::{ProtectedBlob, Unprotected};
pub use flags::{Prompt, PromptFlags, ProtectFlags};
#[cfg(windows)]
pub use protect::{protect, protect_with, unprotect, unprotect_with};
