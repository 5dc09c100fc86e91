//! JSON corpus snapshot consumed by the in-memory store.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
	#[serde(default)]
	pub tags: Vec<SnapshotTag>,
	pub posts: Vec<SnapshotPost>,
	#[serde(default)]
	pub comments: Vec<SnapshotComment>,
}
impl Snapshot {
	pub fn read(path: &Path) -> Result<Self> {
		let raw = fs::read(path)
			.map_err(|err| Error::ReadSnapshot { path: path.to_path_buf(), source: err })?;

		serde_json::from_slice(&raw)
			.map_err(|err| Error::DecodeSnapshot { path: path.to_path_buf(), source: err })
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTag {
	pub tag_id: i64,
	pub tag_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPost {
	pub post_id: i64,
	pub post_title: String,
	#[serde(default)]
	pub post_content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub post_date_gmt: OffsetDateTime,
	#[serde(default)]
	pub count_likes: i64,
	#[serde(default)]
	pub count_dislikes: i64,
	#[serde(default)]
	pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotComment {
	pub comment_id: i64,
	pub post_id: i64,
	#[serde(default)]
	pub parent_comment_id: Option<i64>,
	pub comment_author: String,
	pub comment_content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub comment_date_gmt: OffsetDateTime,
	#[serde(default)]
	pub count_likes: i64,
	#[serde(default)]
	pub count_dislikes: i64,
}
