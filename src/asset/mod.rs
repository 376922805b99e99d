//! Asset loading
//!
//! - `fetch`: fire-and-poll byte loading behind the `AssetSource` trait
//! - `gltf_decode`: glTF/GLB bytes into primitives and materials
//! - `registry`: loaded parts and their material baselines

mod fetch;
pub(crate) mod gltf_decode;
mod registry;

pub use fetch::{AssetResult, AssetSource, AsyncOp, FileAssetSource};
pub use gltf_decode::{decode_gltf, DecodedMesh, GeometryAsset};
pub use registry::{
    MaterialBaseline, MaterialBaselines, PartInstall, PartRegistry, PartRuntimeState,
};

#[cfg(test)]
pub(crate) use fetch::tests::ManualSource;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {path}: {message}")]
    Fetch { path: String, message: String },
    #[error("invalid glTF: {0}")]
    Decode(#[from] gltf::Error),
    #[error("asset contains no triangle geometry")]
    NoGeometry,
    #[error("loader went away before answering")]
    Disconnected,
}
