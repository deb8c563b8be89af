//! Storage provider adapters.
//!
//! Each backend implements `prefab_core`'s `StorageProvider` port and a
//! `create_ref` constructor minting the opaque [`StorageRef`] the engine
//! carries. [`ProviderFactory`] is the matching `StorageFactory`
//! implementation that re-opens those refs.

pub mod factory;
pub mod local;
pub mod memory;

pub use factory::ProviderFactory;
pub use local::DirStorage;
pub use memory::MemoryStorage;

use prefab_core::domain::DomainError;
use prefab_core::error::EngineResult;

/// Compile one glob pattern, mapping syntax errors to the domain error the
/// engine already knows how to present.
pub(crate) fn compile_pattern(pattern: &str) -> EngineResult<globset::GlobMatcher> {
    globset::Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| {
            DomainError::InvalidPattern {
                pattern: pattern.into(),
                reason: e.to_string(),
            }
            .into()
        })
}
