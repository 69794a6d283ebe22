//! 시스템 인증서 저장소 핸들
//!
//! `CertStore`는 `HCERTSTORE`를 소유하며, 명시적 `close()` 또는 drop 시
//! `CertCloseStore`로 정확히 한 번 닫힙니다.
//! `?` 조기 반환이나 panic 경로에서도 핸들이 누수되지 않습니다.
//!
//! `open()`으로 연 시스템 저장소는 `CERT_CLOSE_STORE_FORCE_FLAG`로 닫습니다.
//! 이 저장소에서 얻은 `CertContext<'_>`는 저장소를 빌리므로 닫기 전에 drop 됩니다.

use std::ptr;

use windows_sys::Win32::Security::Cryptography::{
    CertAddCertificateContextToStore, CertCloseStore, CertDeleteCertificateFromStore,
    CertDuplicateCertificateContext, CertEnumCertificatesInStore, CertOpenStore,
    CERT_CLOSE_STORE_FORCE_FLAG, CERT_CONTEXT, CERT_STORE_PROV_SYSTEM_W, HCERTSTORE,
};

use crate::certstore::context::CertContext;
use crate::certstore::flags::AddDisposition;
use crate::certstore::location::StoreLocation;
use crate::error::{CryptError, CryptResult};
use crate::wide::to_wide;

/// 열린 인증서 저장소
#[derive(Debug)]
pub struct CertStore {
    handle: HCERTSTORE,
    name: String,
    location: Option<StoreLocation>,
    close_flags: u32,
}

impl CertStore {
    /// 시스템 저장소 열기 (없으면 OS가 생성)
    pub fn open(name: &str, location: StoreLocation) -> CryptResult<Self> {
        if name.trim().is_empty() {
            return Err(CryptError::EmptyInput("store name"));
        }

        log::info!("[CertStore] Opening cert store {} on {}", name, location);

        let name_w = to_wide(name);
        // SAFETY: name_w는 호출 동안 유효한 NUL 종료 문자열
        let handle = unsafe {
            CertOpenStore(
                CERT_STORE_PROV_SYSTEM_W,
                0,
                0,
                location.system_store_flag(),
                name_w.as_ptr().cast(),
            )
        };
        if handle.is_null() {
            return Err(CryptError::last_os_error("CertOpenStore"));
        }

        Ok(Self {
            handle,
            name: name.to_string(),
            location: Some(location),
            close_flags: CERT_CLOSE_STORE_FORCE_FLAG,
        })
    }

    /// OS가 만든 임시 저장소 핸들을 감싸기 (예: `CryptQueryObject` 결과)
    ///
    /// 강제 닫기를 하지 않으므로 이 저장소의 컨텍스트는 저장소보다 오래 살 수 있습니다.
    ///
    /// # Safety
    /// `handle`은 null이 아닌 열린 저장소여야 하며 소유권이 넘어옵니다.
    pub(crate) unsafe fn from_raw(handle: HCERTSTORE, name: &str) -> Self {
        Self {
            handle,
            name: name.to_string(),
            location: None,
            close_flags: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 시스템 저장소가 아니면 `None`
    pub fn location(&self) -> Option<StoreLocation> {
        self.location
    }

    /// 인증서 컨텍스트를 저장소에 추가하고, 저장소가 보관하는 새 컨텍스트 반환
    pub fn add_certificate(
        &self,
        context: &CertContext<'_>,
        disposition: AddDisposition,
    ) -> CryptResult<CertContext<'_>> {
        let mut added: *mut CERT_CONTEXT = ptr::null_mut();
        // SAFETY: handle/context 모두 소유 중인 유효 핸들
        let ok = unsafe {
            CertAddCertificateContextToStore(
                self.handle,
                context.as_ptr(),
                disposition.bits(),
                &mut added,
            )
        };
        if ok == 0 {
            return Err(CryptError::last_os_error("CertAddCertificateContextToStore"));
        }
        if added.is_null() {
            return Err(CryptError::Unexpected(
                "CertAddCertificateContextToStore returned no context".to_string(),
            ));
        }

        log::debug!(
            "[CertStore] Added certificate ({} bytes) to {}",
            context.encoded().len(),
            self.name
        );

        // SAFETY: 성공 시 참조 1개가 호출자 소유
        Ok(unsafe { CertContext::from_raw(added) })
    }

    /// 저장소의 모든 인증서
    pub fn certificates(&self) -> CryptResult<Vec<CertContext<'_>>> {
        let mut certs = Vec::new();
        let mut prev: *const CERT_CONTEXT = ptr::null();

        loop {
            // SAFETY: prev는 null이거나 직전 열거 결과 (OS가 해제)
            let next = unsafe { CertEnumCertificatesInStore(self.handle, prev) };
            if next.is_null() {
                break;
            }
            // SAFETY: 열거 중인 컨텍스트에 대해 독립된 참조 획득
            certs.push(unsafe { CertContext::from_raw(CertDuplicateCertificateContext(next)) });
            prev = next.cast_const();
        }

        Ok(certs)
    }

    /// 저장소에서 인증서 삭제
    ///
    /// `context`는 이 저장소에서 얻은 컨텍스트여야 합니다. OS가 성공/실패와
    /// 관계없이 컨텍스트를 해제합니다.
    pub fn delete_certificate(&self, context: CertContext<'_>) -> CryptResult<()> {
        let raw = context.into_raw();
        // SAFETY: 참조 소유권을 OS에 넘김
        let ok = unsafe { CertDeleteCertificateFromStore(raw) };
        if ok == 0 {
            return Err(CryptError::last_os_error("CertDeleteCertificateFromStore"));
        }

        log::debug!("[CertStore] Deleted certificate from {}", self.name);
        Ok(())
    }

    /// 저장소 닫기 (OS 결과 보고)
    pub fn close(mut self) -> CryptResult<()> {
        self.close_handle()
    }

    fn close_handle(&mut self) -> CryptResult<()> {
        if self.handle.is_null() {
            return Ok(());
        }

        // SAFETY: 열린 핸들을 한 번만 닫음
        let ok = unsafe { CertCloseStore(self.handle, self.close_flags) };
        self.handle = ptr::null_mut();
        if ok == 0 {
            return Err(CryptError::last_os_error("CertCloseStore"));
        }

        match self.location {
            Some(location) => {
                log::info!("[CertStore] Closed cert store {} on {}", self.name, location)
            }
            None => log::debug!("[CertStore] Closed cert store {}", self.name),
        }
        Ok(())
    }
}

impl Drop for CertStore {
    fn drop(&mut self) {
        if let Err(e) = self.close_handle() {
            log::warn!("[CertStore] Failed to close {}: {}", self.name, e);
        }
    }
}

/// 저장소를 열고 `f` 실행 후 모든 경로에서 닫기
pub fn with_store<T, F>(name: &str, location: StoreLocation, f: F) -> CryptResult<T>
where
    F: FnOnce(&CertStore) -> CryptResult<T>,
{
    let store = CertStore::open(name, location)?;
    let result = f(&store);
    let closed = store.close();
    let value = result?;
    closed?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Once};

    const SCRATCH_STORE: &str = "PlatformCryptUnitTest";

    static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static INIT_LOGGER: Once = Once::new();

    /// 로그 메시지를 모아두는 테스트용 logger
    struct CaptureLog;

    impl log::Log for CaptureLog {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            RECORDS
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        INIT_LOGGER.call_once(|| {
            log::set_logger(&CaptureLog).unwrap();
            log::set_max_level(log::LevelFilter::Debug);
        });
    }

    /// 테스트마다 저장소 이름을 달리해 병렬 실행 시 기록이 섞이지 않게 함
    fn closed_count(name: &str) -> usize {
        let prefix = format!("[CertStore] Closed cert store {} on ", name);
        RECORDS
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|line| line.starts_with(&prefix))
            .count()
    }

    #[test]
    fn test_open_and_close_scratch_store() {
        capture_logs();
        let name = "PlatformCryptUnitTest-Close";

        let store = CertStore::open(name, StoreLocation::CurrentUser).unwrap();
        assert_eq!(store.name(), name);
        assert_eq!(store.location(), Some(StoreLocation::CurrentUser));
        store.close().unwrap();

        // close 이후 Drop에서 다시 닫지 않음
        assert_eq!(closed_count(name), 1);
    }

    #[test]
    fn test_drop_closes_store() {
        capture_logs();
        let name = "PlatformCryptUnitTest-Drop";

        {
            let _store = CertStore::open(name, StoreLocation::CurrentUser).unwrap();
            assert_eq!(closed_count(name), 0);
        }
        assert_eq!(closed_count(name), 1);
    }

    #[test]
    fn test_early_return_closes_store() {
        capture_logs();
        let name = "PlatformCryptUnitTest-EarlyReturn";

        fn use_store(name: &str) -> CryptResult<()> {
            let store = CertStore::open(name, StoreLocation::CurrentUser)?;
            let _fallback: StoreLocation = "Temp".parse()?;
            store.close()
        }

        let err = use_store(name).unwrap_err();
        assert!(matches!(err, CryptError::InvalidLocation(ref m) if m == "Temp"));
        assert_eq!(closed_count(name), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = CertStore::open(" ", StoreLocation::CurrentUser).unwrap_err();
        assert!(matches!(err, CryptError::EmptyInput(_)));
    }

    #[test]
    fn test_with_store_propagates_closure_error() {
        capture_logs();
        let name = "PlatformCryptUnitTest-ClosureError";

        let result: CryptResult<()> = with_store(name, StoreLocation::CurrentUser, |_| {
            Err(CryptError::Unexpected("boom".to_string()))
        });
        assert!(matches!(result, Err(CryptError::Unexpected(ref m)) if m == "boom"));
        assert_eq!(closed_count(name), 1);
    }

    #[test]
    fn test_with_store_closes_on_panic() {
        capture_logs();
        let name = "PlatformCryptUnitTest-Panic";

        let outcome = std::panic::catch_unwind(|| {
            with_store(name, StoreLocation::CurrentUser, |_| -> CryptResult<()> {
                panic!("closure panicked")
            })
        });
        assert!(outcome.is_err());
        assert_eq!(closed_count(name), 1);
    }

    #[test]
    fn test_with_store_returns_value() {
        capture_logs();

        let name = with_store(SCRATCH_STORE, StoreLocation::CurrentUser, |store| {
            store.certificates()?;
            Ok(store.name().to_string())
        })
        .unwrap();
        assert_eq!(name, SCRATCH_STORE);
        assert!(closed_count(SCRATCH_STORE) >= 1);
    }
}
