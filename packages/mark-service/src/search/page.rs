use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pagination {
	pub(crate) page: u64,
	pub(crate) total_pages: u32,
	offset: usize,
	limit: usize,
}
impl Pagination {
	/// `page` follows the offset even when it points past the last page. It is widened to `u64`
	/// so the largest offset still maps to a page.
	pub(crate) fn new(filtered: usize, offset: u32, limit: u32) -> Self {
		let limit = limit.max(1);
		let total_pages = if filtered == 0 { 0 } else { filtered.div_ceil(limit as usize) };

		Self {
			page: u64::from(offset) / u64::from(limit) + 1,
			total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
			offset: offset as usize,
			limit: limit as usize,
		}
	}

	/// Index range of the current page within `len` sorted items.
	pub(crate) fn window(&self, len: usize) -> Range<usize> {
		let start = self.offset.min(len);
		let end = start.saturating_add(self.limit).min(len);

		start..end
	}
}
