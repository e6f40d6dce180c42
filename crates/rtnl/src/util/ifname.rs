//! Interface index to name resolution.

use std::path::Path;

/// Directory the kernel exposes network devices under.
pub const SYSFS_NET: &str = "/sys/class/net";

/// Error type for interface lookups.
#[derive(Debug, thiserror::Error)]
pub enum IfError {
    #[error("interface not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IfError>;

/// Convert an interface index to name.
pub fn index_to_name(index: u32) -> Result<String> {
    index_to_name_in(Path::new(SYSFS_NET), index)
}

/// Convert an interface index to name by scanning `<dir>/*/ifindex`.
pub fn index_to_name_in(dir: &Path, index: u32) -> Result<String> {
    if index == 0 {
        return Err(IfError::NotFound("index 0".to_string()));
    }

    let entries = std::fs::read_dir(dir)?;

    for entry in entries.flatten() {
        let path = entry.path().join("ifindex");
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(idx) = content.trim().parse::<u32>()
            && idx == index
        {
            return Ok(entry.file_name().to_string_lossy().to_string());
        }
    }

    Err(IfError::NotFound(format!("index {}", index)))
}

/// Resolves interface indexes to names while decoding routes.
///
/// Any `Fn(u32) -> Option<String>` closure is a resolver.
pub trait NameResolver {
    /// Name of the interface with `index`, `None` if it cannot be resolved.
    fn resolve(&self, index: u32) -> Option<String>;
}

impl<F> NameResolver for F
where
    F: Fn(u32) -> Option<String>,
{
    fn resolve(&self, index: u32) -> Option<String> {
        self(index)
    }
}

/// Resolver backed by sysfs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysfsResolver;

impl NameResolver for SysfsResolver {
    fn resolve(&self, index: u32) -> Option<String> {
        match index_to_name(index) {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(index, error = %e, "cannot resolve interface index");
                None
            }
        }
    }
}
