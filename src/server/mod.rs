pub mod files;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use warp::{
    http::header::CONTENT_TYPE,
    path::FullPath,
    reply::{self, Reply, Response},
    Filter,
    Rejection,
};

use self::files::load;

const NAME: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// `GET` on any path serves the matching file under `root`.
pub fn routes(
    root: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let root = Arc::new(root);

    let files = warp::get().and(warp::path::full()).then(move |path: FullPath| {
        let root = Arc::clone(&root);
        async move { serve(&root, path.as_str()).await }
    });

    files.with(warp::log(NAME))
}

async fn serve(root: &Path, url_path: &str) -> Response {
    match load(root, url_path).await {
        Ok((bytes, content_type)) => {
            reply::with_header(bytes, CONTENT_TYPE, content_type)
                .into_response()
        }
        Err(e) => {
            info!("{url_path}: {e}");
            e.into_response()
        }
    }
}
