use crate::{InvalidField, PAGE_SIZE};

/// A validated, 1-based page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page(u64);
impl Page {
	pub fn new(index: i64) -> Result<Self, InvalidField> {
		if index < 1 {
			return Err(InvalidField::new("page", format!("page must be 1 or greater, got {index}.")));
		}

		Ok(Self(index as u64))
	}

	pub fn index(self) -> u64 {
		self.0
	}

	pub fn offset(self) -> u64 {
		(self.0 - 1).saturating_mul(PAGE_SIZE as u64)
	}

	/// The slice of `items` on this page; empty past the last page.
	pub fn slice<T>(self, items: &[T]) -> &[T] {
		let Ok(start) = usize::try_from(self.offset()) else {
			return &[];
		};

		if start >= items.len() {
			return &[];
		}

		let end = start.saturating_add(PAGE_SIZE).min(items.len());

		&items[start..end]
	}
}

pub fn page_count(total: u64) -> u64 {
	total.div_ceil(PAGE_SIZE as u64)
}
