//! `/hi/{name}`.

use axum::extract::Path;

pub(crate) async fn hi(Path(name): Path<String>) -> String {
    format!("Hello, {}!", name)
}
