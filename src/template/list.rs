//! List rendering helper

/// Concatenate the projection of every item, in order.
///
/// ```
/// use dataview::template::render_list;
///
/// let markup = render_list(&["a", "b"], |item, index| format!("<li>{index}:{item}</li>"));
/// assert_eq!(markup, "<li>0:a</li><li>1:b</li>");
/// ```
pub fn render_list<T, F>(items: &[T], mut project: F) -> String
where
    F: FnMut(&T, usize) -> String,
{
    items
        .iter()
        .enumerate()
        .map(|(index, item)| project(item, index))
        .collect()
}

/// Like [`render_list`] for projections that can fail, such as nested
/// [`html!`](crate::html) calls. Stops at the first error.
pub fn try_render_list<T, E, F>(items: &[T], mut project: F) -> Result<String, E>
where
    F: FnMut(&T, usize) -> Result<String, E>,
{
    let mut markup = String::new();
    for (index, item) in items.iter().enumerate() {
        markup.push_str(&project(item, index)?);
    }
    Ok(markup)
}
