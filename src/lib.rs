//! Media sync workspace facade.
//!
//! Re-exports the workspace crates so host applications can depend on
//! `media-sync-workspace` alone: the collaborator contracts
//! (`bridge_traits`), the native adapters (`bridge_desktop`), the WordPress
//! connector (`provider_wordpress`), configuration and logging
//! (`core_runtime`) and the reconciliation engine (`core_sync`).

pub use bridge_desktop;
pub use bridge_traits;
pub use core_runtime;
pub use core_sync;
pub use provider_wordpress;
