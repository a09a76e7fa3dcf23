//! Markup parser for rendered component output
//!
//! Turns the string produced by a component's `render` into a
//! [`RenderTree`] using html5ever's tree builder, so markup is recovered
//! the way a browser recovers `innerHTML`: void elements never take
//! children, stray end tags are dropped, unclosed elements are closed and
//! broken attribute quoting never aborts a render.

mod sink;


pub use sink::{SinkHandle, TreeCollector};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};

use crate::dom::RenderTree;

/// Parse markup into a fresh render tree
pub fn parse_markup(input: &str) -> RenderTree {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    parse_document(TreeCollector::new(), opts).one(StrTendril::from(input))
}
