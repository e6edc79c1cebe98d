//! Page numbers shown around the current history page.

/// Pages shown on each side of the current one when there is room.
const SPAN: isize = 2;

/// Visible page numbers for `page` of `count`, in increasing order.
///
/// Two pages either side; near an edge the window slides toward the open
/// side so it keeps its width. `page` is clamped into `1..=count`, and an
/// empty history has no pages at all.
pub fn window(page: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let page = page.clamp(1, count) as isize;
    let count = count as isize;

    let (mut left, mut right) = (SPAN, SPAN);
    if count - page < SPAN {
        let shift = SPAN - (count - page);
        left += shift;
        right -= shift;
    }
    if page < SPAN + 1 {
        let shift = SPAN - (page - 1);
        right += shift;
        left -= shift;
    }
    let (left, right) = (left.max(0), right.max(0));

    let first = (page - left).max(1);
    let last = (page + right).min(count);
    (first..=last).map(|p| p as usize).collect()
}
