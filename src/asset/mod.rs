//! Static metadata assets backed by local files.

mod inspect;
pub mod mime;

pub use inspect::{AssetFamily, inspect_image};

use std::path::PathBuf;

use crate::collect::{AssetProducer, producer};

/// Producer that inspects `path` off the async executor.
pub fn file_producer(
    path: PathBuf,
    url: String,
    family: AssetFamily,
    alt: Option<String>,
) -> AssetProducer {
    producer(move || {
        let path = path.clone();
        let url = url.clone();
        let alt = alt.clone();
        async move {
            let mut image =
                tokio::task::spawn_blocking(move || inspect_image(&path, url, family)).await??;
            image.alt = alt;
            anyhow::Ok(image)
        }
    })
}
