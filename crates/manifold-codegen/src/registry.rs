//! Registry for output backends.

use crate::traits::Backend;
use std::sync::{OnceLock, RwLock};

/// Global registry of backends.
static BACKENDS: RwLock<Vec<&'static dyn Backend>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom backend.
///
/// Call this before any generation operations to add custom backends.
/// Built-in backends are registered automatically on first use.
pub fn register_backend(backend: &'static dyn Backend) {
    BACKENDS.write().unwrap().push(backend);
}

/// Initialize built-in backends (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut backends = BACKENDS.write().unwrap();

        #[cfg(feature = "backend-javascript")]
        {
            backends.push(&crate::output::javascript::JAVASCRIPT_BACKEND);
        }

        #[cfg(feature = "backend-typescript")]
        {
            backends.push(&crate::output::typescript::TYPESCRIPT_BACKEND);
        }

        #[cfg(feature = "backend-python")]
        {
            backends.push(&crate::output::python::PYTHON_BACKEND);
        }

        #[cfg(feature = "backend-java")]
        {
            backends.push(&crate::output::java::JAVA_BACKEND);
        }

        #[cfg(feature = "backend-php")]
        {
            backends.push(&crate::output::php::PHP_BACKEND);
        }

        #[cfg(feature = "backend-go")]
        {
            backends.push(&crate::output::go::GO_BACKEND);
        }

        #[cfg(feature = "backend-dart")]
        {
            backends.push(&crate::output::dart::DART_BACKEND);
        }
    });
}

/// Get a backend by language id.
pub fn get_backend(id: &str) -> Option<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap()
        .iter()
        .find(|b| b.id() == id)
        .copied()
}

/// List all registered backends.
pub fn backends() -> Vec<&'static dyn Backend> {
    init_builtin();
    BACKENDS.read().unwrap().clone()
}

/// List all registered backend language ids.
pub fn backend_ids() -> Vec<&'static str> {
    init_builtin();
    BACKENDS.read().unwrap().iter().map(|b| b.id()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_backends_cover_all_default_languages() {
        let ids = backend_ids();
        for lang in ["javascript", "typescript", "python", "java", "php", "go", "dart"] {
            assert!(ids.contains(&lang), "missing builtin backend {lang}");
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(get_backend("go").is_some());
        assert!(get_backend("cobol").is_none());
    }
}
