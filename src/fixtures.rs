//! 테스트 fixture 탐색
//!
//! 인증서 등 테스트용 바이너리 파일을 다음 순서로 찾습니다.
//! 1. `Config::fixture_dir`
//! 2. 크레이트의 `tests/fixtures`
//! 3. CWD에서 상위로 올라가며 `tests/fixtures`

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CryptError, CryptResult};

const FIXTURE_SUBDIR: &str = "tests/fixtures";

fn candidate_dirs(config: &Config) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(dir) = &config.fixture_dir {
        dirs.push(dir.clone());
    }

    dirs.push(Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_SUBDIR));

    if let Ok(cwd) = std::env::current_dir() {
        let mut cur = cwd;
        loop {
            dirs.push(cur.join(FIXTURE_SUBDIR));
            if !cur.pop() {
                break;
            }
        }
    }

    dirs
}

/// fixture 파일 경로 찾기
pub fn find_test_fixture(config: &Config, name: &str) -> CryptResult<PathBuf> {
    if name.trim().is_empty() {
        return Err(CryptError::EmptyInput("fixture name"));
    }

    candidate_dirs(config)
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| CryptError::FixtureNotFound(name.to_string()))
}

/// fixture 파일 내용 읽기
pub fn read_fixture(config: &Config, name: &str) -> CryptResult<Vec<u8>> {
    let path = find_test_fixture(config, name)?;
    log::debug!("[Fixtures] Reading {}", path.display());
    Ok(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bundled_fixtures_are_found() {
        let config = Config::default();
        for name in ["testcert_der.cer", "testcert_pem.cer"] {
            let path = find_test_fixture(&config, name).unwrap();
            assert!(path.ends_with(Path::new(FIXTURE_SUBDIR).join(name)));
        }
    }

    #[test]
    fn test_configured_dir_takes_precedence() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("testcert_der.cer"), b"override").unwrap();

        let config = Config {
            fixture_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let bytes = read_fixture(&config, "testcert_der.cer").unwrap();
        assert_eq!(bytes, b"override");
    }

    #[test]
    fn test_missing_fixture() {
        let err = find_test_fixture(&Config::default(), "no_such_fixture.bin").unwrap_err();
        assert!(matches!(err, CryptError::FixtureNotFound(ref n) if n == "no_such_fixture.bin"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = find_test_fixture(&Config::default(), " ").unwrap_err();
        assert!(matches!(err, CryptError::EmptyInput(_)));
    }
}
