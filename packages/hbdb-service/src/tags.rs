use serde::{Deserialize, Serialize};

use hbdb_domain::tag_index::TagSort;

use crate::{HbdbService, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagListRequest {
	/// `count` (default) or `name`.
	#[serde(default)]
	pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagListResponse {
	pub tags: Vec<TagUsageView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUsageView {
	pub tag_id: i64,
	pub tag_name: String,
	pub count: u64,
}

impl HbdbService {
	/// Every known tag with its corpus-wide usage, including unused tags.
	pub async fn tags(&self, req: TagListRequest) -> Result<TagListResponse> {
		let sort = match req.sort.as_deref().map(str::trim) {
			None | Some("") => TagSort::default(),
			Some(raw) => raw.parse::<TagSort>()?,
		};
		let mut usage = self.corpus.tag_usage().await?;

		sort.sort(&mut usage);

		tracing::info!(sort = sort.as_str(), tag_count = usage.len(), "Tag catalogue served.");

		Ok(TagListResponse {
			tags: usage
				.into_iter()
				.map(|tag| TagUsageView {
					tag_id: tag.tag_id,
					tag_name: tag.tag_name,
					count: tag.count,
				})
				.collect(),
		})
	}
}
