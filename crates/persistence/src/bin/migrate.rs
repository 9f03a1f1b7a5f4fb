#![deny(warnings)]

use persistence::{default_sqlite_url, SaveStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = default_sqlite_url();
    // Ensure the saves directory exists; SQLite creates the file itself.
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"));
    if let Some(path) = path {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SaveStore::open(url).await?;
    let has_save = store.load().await?.is_some();
    println!("save store ready at {} | existing save: {}", url, has_save);
    Ok(())
}
