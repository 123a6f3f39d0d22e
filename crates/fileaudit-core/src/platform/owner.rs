/// Best-effort owner lookup — the identity recorded as the file's owner,
/// which is the closest portable stand-in for "last modified by".
///
/// - **Unix:** owner uid → user name via `getpwuid_r`.
/// - **Windows:** owner SID via `GetNamedSecurityInfoW` → `DOMAIN\user` via
///   `LookupAccountSidW`.
///
/// [`resolve_last_modifier`] never fails: every error collapses to an empty
/// string, which callers treat as "unknown". [`lookup_owner`] keeps the error
/// so the failure branch can be inspected.
use std::path::Path;
use thiserror::Error;

/// Why an owner could not be determined.
#[derive(Error, Debug)]
pub enum OwnerError {
    #[error("cannot read security metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("no account name for owner {0}")]
    UnknownAccount(String),

    #[error("owner lookup is not supported on this platform")]
    Unsupported,
}

/// Owner identity of `path`, or an empty string if it cannot be determined.
pub fn resolve_last_modifier(path: &Path) -> String {
    match lookup_owner(path) {
        Ok(owner) => owner,
        Err(err) => {
            tracing::debug!("owner lookup failed for {}: {err}", path.display());
            String::new()
        }
    }
}

/// Owner identity of `path`.
pub fn lookup_owner(path: &Path) -> Result<String, OwnerError> {
    imp::lookup_owner(path)
}

#[cfg(unix)]
mod imp {
    use super::OwnerError;
    use parking_lot::RwLock;
    use std::collections::HashMap;
    use std::ffi::CStr;
    use std::os::unix::fs::MetadataExt;
    use std::path::Path;
    use std::sync::OnceLock;

    /// Largest buffer `getpwuid_r` is allowed to grow to before giving up.
    const MAX_PASSWD_BUF: usize = 1 << 20;

    /// uid → name for successful lookups. Audited trees usually have a
    /// handful of owners across millions of files, and NSS lookups can be
    /// slow (LDAP, SSSD).
    fn name_cache() -> &'static RwLock<HashMap<u32, String>> {
        static CACHE: OnceLock<RwLock<HashMap<u32, String>>> = OnceLock::new();
        CACHE.get_or_init(|| RwLock::new(HashMap::new()))
    }

    pub(super) fn lookup_owner(path: &Path) -> Result<String, OwnerError> {
        let uid = std::fs::metadata(path)?.uid();
        user_name(uid)
    }

    /// Resolve a uid to its account name.
    pub(crate) fn user_name(uid: u32) -> Result<String, OwnerError> {
        if let Some(name) = name_cache().read().get(&uid) {
            return Ok(name.clone());
        }

        let mut buf: Vec<libc::c_char> = vec![0; 1024];
        loop {
            // SAFETY: `passwd` is plain old data; getpwuid_r fills it and
            // points its string fields into `buf`, which outlives every read.
            let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
            let mut result: *mut libc::passwd = std::ptr::null_mut();
            let rc = unsafe {
                libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result)
            };

            if rc == libc::ERANGE && buf.len() < MAX_PASSWD_BUF {
                buf.resize(buf.len() * 2, 0);
                continue;
            }
            if rc != 0 {
                return Err(OwnerError::Io(std::io::Error::from_raw_os_error(rc)));
            }
            if result.is_null() || pwd.pw_name.is_null() {
                return Err(OwnerError::UnknownAccount(format!("uid {uid}")));
            }

            let name = unsafe { CStr::from_ptr(pwd.pw_name) }
                .to_string_lossy()
                .into_owned();
            name_cache().write().insert(uid, name.clone());
            return Ok(name);
        }
    }
}

#[cfg(windows)]
mod imp {
    use super::OwnerError;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use windows::core::{PCWSTR, PWSTR};
    use windows::Win32::Foundation::{LocalFree, HLOCAL};
    use windows::Win32::Security::Authorization::{GetNamedSecurityInfoW, SE_FILE_OBJECT};
    use windows::Win32::Security::{
        LookupAccountSidW, OWNER_SECURITY_INFORMATION, PSECURITY_DESCRIPTOR, PSID, SID_NAME_USE,
    };

    pub(super) fn lookup_owner(path: &Path) -> Result<String, OwnerError> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let mut owner = PSID::default();
        let mut descriptor = PSECURITY_DESCRIPTOR::default();

        // SAFETY: `wide` is NUL-terminated and outlives the call. On success
        // `descriptor` owns the memory `owner` points into and is released
        // with LocalFree below.
        unsafe {
            GetNamedSecurityInfoW(
                PCWSTR(wide.as_ptr()),
                SE_FILE_OBJECT,
                OWNER_SECURITY_INFORMATION,
                Some(&mut owner),
                None,
                None,
                None,
                &mut descriptor,
            )
            .ok()
            .map_err(|e| OwnerError::Io(std::io::Error::other(e)))?;
        }

        let account = account_name(owner);
        unsafe {
            let _ = LocalFree(HLOCAL(descriptor.0));
        }
        account
    }

    /// `DOMAIN\user` for a SID, or just `user` when the domain is empty.
    fn account_name(sid: PSID) -> Result<String, OwnerError> {
        let mut name = [0u16; 256];
        let mut domain = [0u16; 256];
        let mut name_len = name.len() as u32;
        let mut domain_len = domain.len() as u32;
        let mut sid_use = SID_NAME_USE::default();

        // SAFETY: both buffers are sized by the lengths passed alongside.
        unsafe {
            LookupAccountSidW(
                PCWSTR::null(),
                sid,
                PWSTR(name.as_mut_ptr()),
                &mut name_len,
                PWSTR(domain.as_mut_ptr()),
                &mut domain_len,
                &mut sid_use,
            )
            .map_err(|e| OwnerError::UnknownAccount(e.to_string()))?;
        }

        let name = String::from_utf16_lossy(&name[..name_len as usize]);
        let domain = String::from_utf16_lossy(&domain[..domain_len as usize]);
        if domain.is_empty() {
            Ok(name)
        } else {
            Ok(format!("{domain}\\{name}"))
        }
    }
}

#[cfg(not(any(unix, windows)))]
mod imp {
    use super::OwnerError;
    use std::path::Path;

    pub(super) fn lookup_owner(_path: &Path) -> Result<String, OwnerError> {
        Err(OwnerError::Unsupported)
    }
}
