const INIT_SQL: &str = include_str!("../sql/init.sql");

pub fn render_schema() -> &'static str {
	INIT_SQL
}

/// Tables `render_schema` creates, in dependency order.
pub const TABLES: [&str; 5] = ["tags", "posts", "post_tags", "comments", "corpus_revision"];
