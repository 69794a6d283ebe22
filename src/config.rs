//! 런타임 설정
//!
//! `.env.local` / `.env` 파일과 환경변수에서 설정을 읽습니다.
//! - `PLATFORM_CRYPT_FIXTURE_DIR`: 추가 fixture 검색 디렉토리
//! - `PLATFORM_CRYPT_TEST_STORE`: 테스트용 인증서 저장소 이름
//! - `PLATFORM_CRYPT_STORE_LOCATION`: `CurrentUser` | `LocalMachine`

use std::path::{Path, PathBuf};

use crate::certstore::StoreLocation;
use crate::error::CryptResult;

pub const ENV_FIXTURE_DIR: &str = "PLATFORM_CRYPT_FIXTURE_DIR";
pub const ENV_TEST_STORE: &str = "PLATFORM_CRYPT_TEST_STORE";
pub const ENV_STORE_LOCATION: &str = "PLATFORM_CRYPT_STORE_LOCATION";

/// 기본 테스트 저장소 이름
pub const DEFAULT_TEST_STORE: &str = "PlatformCryptTest";

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub fixture_dir: Option<PathBuf>,
    pub test_store: String,
    pub store_location: StoreLocation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixture_dir: None,
            test_store: DEFAULT_TEST_STORE.to_string(),
            store_location: StoreLocation::CurrentUser,
        }
    }
}

impl Config {
    /// env 파일 로드 후 프로세스 환경변수에서 설정 생성
    pub fn from_env() -> CryptResult<Self> {
        load_env_files();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key 조회 함수로 설정 생성
    ///
    /// 비어있는 값은 설정되지 않은 것으로 취급합니다.
    pub fn from_lookup<F>(lookup: F) -> CryptResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        if let Some(dir) = get(ENV_FIXTURE_DIR) {
            config.fixture_dir = Some(PathBuf::from(dir));
        }
        if let Some(store) = get(ENV_TEST_STORE) {
            config.test_store = store;
        }
        if let Some(location) = get(ENV_STORE_LOCATION) {
            config.store_location = location.parse()?;
        }

        Ok(config)
    }
}

fn find_upwards(start: PathBuf, filename: &str, max_hops: usize) -> Option<PathBuf> {
    let mut cur = start;
    for _ in 0..=max_hops {
        let candidate = cur.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        if !cur.pop() {
            break;
        }
    }
    None
}

/// CWD에서 상위로 올라가며 env 파일을 찾아 로드
///
/// 이미 설정된 환경변수는 덮어쓰지 않으며, 파일이 없어도 실패하지 않습니다.
fn load_env_files() {
    let Ok(cwd) = std::env::current_dir() else {
        return;
    };

    for name in ENV_FILES {
        if let Some(path) = find_upwards(cwd.clone(), name, 6) {
            load_env_file(&path);
        }
    }
}

fn load_env_file(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => log::debug!("[Config] Loaded {}", path.display()),
        Err(e) => log::warn!("[Config] Failed to load {}: {}", path.display(), e),
    }
}
