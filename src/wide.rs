//! UTF-16 (wide) 문자열 변환

use crate::error::{CryptError, CryptResult};

/// NUL 종료 UTF-16 버퍼로 변환
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// NUL 종료 UTF-16 포인터를 `String`으로 변환 (null이면 빈 문자열)
///
/// # Safety
/// `ptr`은 null이거나 유효한 NUL 종료 UTF-16 문자열을 가리켜야 합니다.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) unsafe fn from_wide_ptr(ptr: *const u16, call: &'static str) -> CryptResult<String> {
    if ptr.is_null() {
        return Ok(String::new());
    }

    let mut len = 0usize;
    while *ptr.add(len) != 0 {
        len += 1;
    }

    let units = std::slice::from_raw_parts(ptr, len);
    String::from_utf16(units).map_err(|_| CryptError::InvalidUtf16(call))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wide_is_nul_terminated() {
        assert_eq!(to_wide("Temp"), vec![84, 101, 109, 112, 0]);
        assert_eq!(to_wide(""), vec![0]);
    }

    #[test]
    fn test_from_wide_ptr() {
        let wide = to_wide("설명 description");
        let s = unsafe { from_wide_ptr(wide.as_ptr(), "test") }.unwrap();
        assert_eq!(s, "설명 description");

        let empty = unsafe { from_wide_ptr(std::ptr::null(), "test") }.unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_from_wide_ptr_rejects_lone_surrogate() {
        let bad = [0xD800u16, 0];
        let err = unsafe { from_wide_ptr(bad.as_ptr(), "test") }.unwrap_err();
        assert!(matches!(err, CryptError::InvalidUtf16("test")));
    }
}
