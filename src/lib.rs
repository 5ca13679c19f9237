//! Backend for an embeddable comment widget.
//!
//! Re-exports the workspace crates behind features.

pub mod common {
    pub use remark_common::*;
}

#[cfg(feature = "store")]
pub mod store {
    pub use remark_store::*;
}

#[cfg(feature = "service")]
pub mod service {
    pub use remark_service::*;
}
