//! The combined metadata file: `{collectionMetadata, posts}`

use crate::date::sort_by_date_descending;
use crate::labels::UrlLabel;
use crate::AssetError;
use hexweave_core::post::{PostData, PostDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedMetadata {
    #[serde(default)]
    pub collection_metadata: serde_json::Value,
    pub posts: Vec<PostData>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse every `*.json` file in `dir` as one post, in file name order.
pub fn read_post_dir(dir: &Path) -> Result<Vec<PostData>, AssetError> {
    let io_error = |source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    paths.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    paths
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "reading post");
            read_json(path)
        })
        .collect()
}

/// Check every post's link labels and sort the posts most recent first.
pub fn combine_posts(
    collection_metadata: serde_json::Value,
    mut posts: Vec<PostData>,
) -> Result<CombinedMetadata, AssetError> {
    for post in &posts {
        UrlLabel::links(post)?;
    }
    sort_by_date_descending(&mut posts)?;
    Ok(CombinedMetadata {
        collection_metadata,
        posts,
    })
}

pub fn load_combined(path: &Path) -> Result<CombinedMetadata, AssetError> {
    let combined: CombinedMetadata = read_json(path)?;
    info!(path = %path.display(), posts = combined.posts.len(), "loaded post metadata");
    Ok(combined)
}

pub fn write_combined(path: &Path, combined: &CombinedMetadata) -> Result<(), AssetError> {
    let text = serde_json::to_string_pretty(combined).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), posts = combined.posts.len(), "wrote post metadata");
    Ok(())
}

/// Placeholder posts for running without a metadata file.
pub fn demo_posts(count: usize) -> Vec<PostData> {
    (0..count)
        .map(|i| PostData {
            id: format!("demo-{i}"),
            title_short: format!("Demo {}", i + 1),
            title_long: format!("Demo post {}", i + 1),
            date: PostDate::Single(format!("{}", 2024 - i)),
            categories: vec!["demo".into()],
            content: format!("Placeholder content for demo post {}.", i + 1),
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, json: &str) {
        fs::write(dir.join(name), json).unwrap();
    }

    #[test]
    fn combines_directory_most_recent_first() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"id": "a", "date": "2013"}"#);
        write(dir.path(), "b.json", r#"{"id": "b", "date": {"start": "2016", "end": "present"}}"#);
        write(dir.path(), "c.json", r#"{"id": "c", "date": "07/2018", "urls": {"demo": "https://x.test"}}"#);
        write(dir.path(), "notes.txt", "ignored");

        let posts = read_post_dir(dir.path()).unwrap();
        assert_eq!(posts.len(), 3);

        let combined = combine_posts(serde_json::json!({"title": "Work"}), posts).unwrap();
        let ids: Vec<_> = combined.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        let out = dir.path().join("combined.json");
        write_combined(&out, &combined).unwrap();
        assert_eq!(load_combined(&out).unwrap(), combined);
    }

    #[test]
    fn unknown_label_blocks_combining() {
        let mut post = demo_posts(1).remove(0);
        post.urls.insert("geocities".into(), "https://x.test".into());
        assert!(matches!(
            combine_posts(serde_json::Value::Null, vec![post]),
            Err(AssetError::UnknownUrlLabel { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_combined(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn demo_posts_are_dated_and_sortable() {
        let combined = combine_posts(serde_json::Value::Null, demo_posts(4)).unwrap();
        assert_eq!(combined.posts.len(), 4);
        assert_eq!(combined.posts[0].id, "demo-0");
    }
}
