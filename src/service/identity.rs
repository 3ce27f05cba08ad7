use serde::Serialize;
use std::fmt;

/// Key a built service registers itself under at runtime
///
/// Derived as `<module>_<version>` with dots and dashes turned into
/// underscores, so `universal-foo@1.2.3` becomes `universal_foo_1_2_3`.
/// Any other character that cannot appear in a JavaScript identifier
/// (`@`, `/`, `+`) is replaced the same way. Changing either input changes
/// the key, and runtimes look bundles up by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServiceIdentity(String);

impl ServiceIdentity {
    pub fn derive(module_name: &str, version: &str) -> Self {
        let raw = format!("{}_{}", module_name, version);
        let key = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
