//! `CryptProtectData` / `CryptUnprotectData` 호출
//!
//! OS가 `LocalAlloc`으로 돌려주는 버퍼는 모든 경로에서 `LocalFree`로 해제합니다.
//! 평문 버퍼는 해제 전에 zeroize 합니다.

use std::ptr;

use windows_sys::Win32::Foundation::LocalFree;
use windows_sys::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPTPROTECT_PROMPTSTRUCT, CRYPT_INTEGER_BLOB,
};
use zeroize::{Zeroize, Zeroizing};

use crate::dpapi::blob::{ProtectedBlob, Unprotected};
use crate::dpapi::flags::{Prompt, ProtectFlags};
use crate::error::{CryptError, CryptResult};
use crate::wide::{from_wide_ptr, to_wide};

/// 호출자 소유 버퍼를 가리키는 입력 blob
fn input_blob(bytes: &[u8]) -> CryptResult<CRYPT_INTEGER_BLOB> {
    let len = u32::try_from(bytes.len()).map_err(|_| CryptError::BufferTooLarge(bytes.len()))?;
    Ok(CRYPT_INTEGER_BLOB {
        cbData: len,
        pbData: bytes.as_ptr() as *mut u8,
    })
}

/// OS가 할당한 출력 blob (drop 시 해제)
struct LocalBlob {
    inner: CRYPT_INTEGER_BLOB,
    sensitive: bool,
}

impl LocalBlob {
    fn new(sensitive: bool) -> Self {
        Self {
            inner: CRYPT_INTEGER_BLOB {
                cbData: 0,
                pbData: ptr::null_mut(),
            },
            sensitive,
        }
    }

    fn as_slice(&self) -> &[u8] {
        if self.inner.pbData.is_null() || self.inner.cbData == 0 {
            return &[];
        }
        // SAFETY: OS가 cbData 길이로 할당한 버퍼
        unsafe { std::slice::from_raw_parts(self.inner.pbData, self.inner.cbData as usize) }
    }
}

impl Drop for LocalBlob {
    fn drop(&mut self) {
        if self.inner.pbData.is_null() {
            return;
        }
        // SAFETY: pbData는 LocalAlloc으로 할당되었고 여기서 한 번만 해제됨
        unsafe {
            if self.sensitive {
                std::slice::from_raw_parts_mut(self.inner.pbData, self.inner.cbData as usize)
                    .zeroize();
            }
            LocalFree(self.inner.pbData.cast());
        }
    }
}

/// OS가 할당한 설명 문자열 (drop 시 해제)
struct LocalWideString(*mut u16);

impl Drop for LocalWideString {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: LocalAlloc으로 할당된 PWSTR
            unsafe {
                LocalFree(self.0.cast());
            }
        }
    }
}

/// `CRYPTPROTECT_PROMPTSTRUCT`와 그 문자열 버퍼
struct PromptStruct {
    raw: CRYPTPROTECT_PROMPTSTRUCT,
    _text: Option<Vec<u16>>,
}

impl PromptStruct {
    fn new(prompt: &Prompt) -> Self {
        let text = prompt.text.as_deref().map(to_wide);
        let raw = CRYPTPROTECT_PROMPTSTRUCT {
            cbSize: std::mem::size_of::<CRYPTPROTECT_PROMPTSTRUCT>() as u32,
            dwPromptFlags: prompt.flags.bits(),
            hwndApp: ptr::null_mut(),
            szPrompt: text.as_ref().map_or(ptr::null(), |t| t.as_ptr()),
        };
        Self { raw, _text: text }
    }
}

/// 데이터 보호 (UI 금지, 프롬프트 없음)
pub fn protect(
    data: &[u8],
    description: &str,
    entropy: Option<&[u8]>,
) -> CryptResult<ProtectedBlob> {
    protect_with(data, description, entropy, None, ProtectFlags::UI_FORBIDDEN)
}

/// 데이터 보호 (플래그/프롬프트 지정)
pub fn protect_with(
    data: &[u8],
    description: &str,
    entropy: Option<&[u8]>,
    prompt: Option<&Prompt>,
    flags: ProtectFlags,
) -> CryptResult<ProtectedBlob> {
    let data_in = input_blob(data)?;
    let entropy_in = entropy.map(input_blob).transpose()?;
    let description_w = to_wide(description);
    let prompt = prompt.map(PromptStruct::new);
    let mut out = LocalBlob::new(false);

    // SAFETY: 모든 입력 포인터는 호출 동안 유효한 로컬 버퍼를 가리킴
    let ok = unsafe {
        CryptProtectData(
            &data_in,
            description_w.as_ptr(),
            entropy_in
                .as_ref()
                .map_or(ptr::null(), |e| e as *const CRYPT_INTEGER_BLOB),
            ptr::null(),
            prompt
                .as_ref()
                .map_or(ptr::null(), |p| &p.raw as *const CRYPTPROTECT_PROMPTSTRUCT),
            flags.bits(),
            &mut out.inner,
        )
    };
    if ok == 0 {
        return Err(CryptError::last_os_error("CryptProtectData"));
    }

    log::debug!(
        "[Dpapi] Protected {} bytes -> {} byte blob (entropy: {})",
        data.len(),
        out.inner.cbData,
        entropy.is_some()
    );

    Ok(ProtectedBlob::from(out.as_slice().to_vec()))
}

/// 데이터 보호 해제 (UI 금지, 프롬프트 없음)
pub fn unprotect(blob: &ProtectedBlob, entropy: Option<&[u8]>) -> CryptResult<Unprotected> {
    unprotect_with(blob, entropy, None, ProtectFlags::UI_FORBIDDEN)
}

/// 데이터 보호 해제 (플래그/프롬프트 지정)
///
/// entropy가 보호 시점과 다르면 OS 에러로 실패합니다.
pub fn unprotect_with(
    blob: &ProtectedBlob,
    entropy: Option<&[u8]>,
    prompt: Option<&Prompt>,
    flags: ProtectFlags,
) -> CryptResult<Unprotected> {
    if blob.is_empty() {
        return Err(CryptError::EmptyInput("protected blob"));
    }

    let data_in = input_blob(blob.as_bytes())?;
    let entropy_in = entropy.map(input_blob).transpose()?;
    let prompt = prompt.map(PromptStruct::new);
    let mut description = LocalWideString(ptr::null_mut());
    let mut out = LocalBlob::new(true);

    // SAFETY: 입력 포인터는 호출 동안 유효, 출력은 위 가드가 해제
    let ok = unsafe {
        CryptUnprotectData(
            &data_in,
            &mut description.0,
            entropy_in
                .as_ref()
                .map_or(ptr::null(), |e| e as *const CRYPT_INTEGER_BLOB),
            ptr::null(),
            prompt
                .as_ref()
                .map_or(ptr::null(), |p| &p.raw as *const CRYPTPROTECT_PROMPTSTRUCT),
            flags.bits(),
            &mut out.inner,
        )
    };
    if ok == 0 {
        return Err(CryptError::last_os_error("CryptUnprotectData"));
    }

    // SAFETY: 성공 시 OS가 NUL 종료 문자열(또는 null)을 반환
    let description = unsafe { from_wide_ptr(description.0, "CryptUnprotectData") }?;
    let data = Zeroizing::new(out.as_slice().to_vec());

    log::debug!("[Dpapi] Unprotected {} byte blob", blob.len());

    Ok(Unprotected { description, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_description_roundtrip() {
        let blob = protect(b"payload", "설명 – описание", None).unwrap();
        let got = unprotect(&blob, None).unwrap();
        assert_eq!(got.description, "설명 – описание");
        assert_eq!(got.data.as_slice(), b"payload");
    }

    #[test]
    fn test_empty_description_roundtrip() {
        let blob = protect(b"payload", "", None).unwrap();
        let got = unprotect(&blob, None).unwrap();
        assert!(got.description.is_empty());
        assert_eq!(got.data.as_slice(), b"payload");
    }

    #[test]
    fn test_local_machine_scope_roundtrip() {
        let flags = ProtectFlags::UI_FORBIDDEN | ProtectFlags::LOCAL_MACHINE;
        let blob = protect_with(b"machine data", "machine", None, None, flags).unwrap();
        let got = unprotect_with(&blob, None, None, ProtectFlags::UI_FORBIDDEN).unwrap();
        assert_eq!(got.data.as_slice(), b"machine data");
    }

    #[test]
    fn test_tampered_blob_fails() {
        let blob = protect(b"payload", "desc", None).unwrap();
        let mut bytes = blob.into_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;

        let err = unprotect(&ProtectedBlob::from(bytes), None).unwrap_err();
        assert!(matches!(err, CryptError::Os { call: "CryptUnprotectData", .. }));
    }

    #[test]
    fn test_empty_blob_rejected() {
        let err = unprotect(&ProtectedBlob::from(Vec::new()), None).unwrap_err();
        assert!(matches!(err, CryptError::EmptyInput(_)));
    }

    #[test]
    fn test_blob_is_not_plaintext() {
        let data = b"My test data";
        let blob = protect(data, "desc", None).unwrap();
        assert!(!blob
            .as_bytes()
            .windows(data.len())
            .any(|w| w == data.as_slice()));
    }
}
