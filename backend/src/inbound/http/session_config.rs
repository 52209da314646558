//! Environment-driven session settings, validated in one place.
//!
//! Release builds require explicit toggles and a real key file; debug builds
//! fall back to safe defaults with a warning so local runs need no setup.

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

/// Build mode governing how strictly the settings are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the mode from `cfg!(debug_assertions)`.
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session middleware settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Failures raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session settings.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = env_bool(env, COOKIE_SECURE_ENV, mode, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Boolean toggle: required and strict in release, defaulted in debug.
fn env_bool<E: Env>(
    env: &E,
    name: &'static str,
    mode: BuildMode,
    default: bool,
) -> Result<bool, SessionConfigError> {
    match env.string(name) {
        Some(value) => parse_bool(&value).map_or_else(
            || {
                if mode.is_debug() {
                    warn!(name, value = %value, "invalid boolean toggle; using default");
                    Ok(default)
                } else {
                    Err(SessionConfigError::InvalidEnv {
                        name,
                        value,
                        expected: "1|0|true|false|yes|no",
                    })
                }
            },
            Ok,
        ),
        None if mode.is_debug() => {
            warn!(name, "toggle not set; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::MissingEnv { name }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.is_debug() {
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without a secure cookie; browsers may refuse it");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_SAMESITE; using default");
            Ok(default)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: "Strict|Lax|None",
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<bool, SessionConfigError> {
    let allowed = env_bool(env, ALLOW_EPHEMERAL_ENV, mode, false)?;
    if allowed && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    Ok(allowed)
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with<F>(lookup: F) -> MockEnv
    where
        F: Fn(&str) -> Option<String> + Send + 'static,
    {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| lookup(name));
        env
    }

    fn write_key(len: usize) -> (tempfile_path::KeyFile, String) {
        tempfile_path::KeyFile::with_len(len)
    }

    mod tempfile_path {
        //! Minimal self-cleaning key file for these tests.
        use std::path::PathBuf;

        pub struct KeyFile(PathBuf);

        impl KeyFile {
            pub fn with_len(len: usize) -> (Self, String) {
                let path = std::env::temp_dir().join(format!(
                    "citypulse-session-key-{}-{len}",
                    uuid::Uuid::new_v4()
                ));
                std::fs::write(&path, vec![b'k'; len]).expect("write key file");
                let rendered = path.to_str().expect("utf8 temp path").to_owned();
                (Self(path), rendered)
            }
        }

        impl Drop for KeyFile {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.0);
            }
        }
    }

    #[rstest]
    fn release_mode_accepts_a_fully_specified_environment() {
        let (_guard, key_path) = write_key(64);
        let env = env_with(move |name| match name {
            "SESSION_KEY_FILE" => Some(key_path.clone()),
            "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
            "SESSION_SAMESITE" => Some("Strict".to_owned()),
            "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
            _ => None,
        });

        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn release_mode_rejects_short_keys() {
        let (_guard, key_path) = write_key(16);
        let env = env_with(move |name| match name {
            "SESSION_KEY_FILE" => Some(key_path.clone()),
            "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
            "SESSION_SAMESITE" => Some("Lax".to_owned()),
            "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
            _ => None,
        });

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("short key refused");
        assert!(matches!(err, SessionConfigError::KeyTooShort { .. }));
    }

    #[rstest]
    fn release_mode_requires_explicit_toggles() {
        let env = env_with(|_| None);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing toggles refused");
        assert!(matches!(err, SessionConfigError::MissingEnv { .. }));
    }

    #[rstest]
    fn release_mode_refuses_ephemeral_keys() {
        let (_guard, key_path) = write_key(64);
        let env = env_with(move |name| match name {
            "SESSION_KEY_FILE" => Some(key_path.clone()),
            "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
            "SESSION_SAMESITE" => Some("Lax".to_owned()),
            "SESSION_ALLOW_EPHEMERAL" => Some("1".to_owned()),
            _ => None,
        });

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("ephemeral refused");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn insecure_samesite_none_is_refused_in_release() {
        let (_guard, key_path) = write_key(64);
        let env = env_with(move |name| match name {
            "SESSION_KEY_FILE" => Some(key_path.clone()),
            "SESSION_COOKIE_SECURE" => Some("0".to_owned()),
            "SESSION_SAMESITE" => Some("None".to_owned()),
            "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
            _ => None,
        });

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("insecure none refused");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn debug_mode_defaults_everything() {
        let env = env_with(|_| None);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("dev defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn accepts_the_process_environment_adapter() {
        // The bootstrap path passes a DefaultEnv instance; debug mode keeps
        // the outcome deterministic whatever the process environment holds.
        let env = mockable::DefaultEnv::default();
        assert!(session_settings_from_env(&env, BuildMode::Debug).is_ok());
    }
}
