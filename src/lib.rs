//! platform-crypt - OS 데이터 보호 및 인증서 저장소 래퍼
//!
//! 암호화, 키 파생, 인증서 파싱, 저장소 관리는 모두 OS 암호화 서브시스템이 수행하며,
//! 이 크레이트는 안전한 Rust 타입과 자원 해제 보장만 제공합니다.
//!
//! - `dpapi`: `CryptProtectData` / `CryptUnprotectData`
//! - `certstore`: `CertOpenStore`, `CryptQueryObject`, `CertAddCertificateContextToStore`
//!
//! OS 호출 자체는 Windows에서만 노출되며, 설정/플래그/에러 타입은 모든 플랫폼에서 사용할 수 있습니다.

pub mod certstore;
pub mod config;
pub mod dpapi;
pub mod error;
pub mod fixtures;
mod wide;

pub use config::Config;
pub use error::{CryptError, CryptResult, ErrorReport};
