//! Structural rewrite of section blocks into disclosure widgets.
//!
//! Each direct element child of the region (a "section group") is
//! replaced in place by a `<details>` widget:
//!
//! Before:
//! ```html
//! <div class="section-group" data-index="0">
//!   <div class="section-separator"><span>Chapter 1</span></div>
//!   <p>Body content</p>
//! </div>
//! ```
//!
//! After:
//! ```html
//! <details class="section-group collapsible-section ..." data-index="0" open>
//!   <summary class="section-separator ..."><span>Chapter 1</span><i class="... collapsible-section-chevron"></i></summary>
//!   <div class="details-content p-5"><p>Body content</p></div>
//! </details>
//! ```
//!
//! The rewrite is idempotent: a block that is already a `details`
//! element, or that carries the transform marker, is left untouched.

use log::debug;

use crate::config::Config;
use crate::dom::{Attribute, Document, NodeId, qname};
use crate::error::{Error, Result};

/// Attribute set on a source block once it has been converted.
pub const TRANSFORM_MARKER: &str = "data-transformed";

/// Header label for blocks that have no separator to donate one.
const PLACEHOLDER_LABEL: &str = "Details";

/// Classes every produced widget gains.
const WIDGET_CLASSES: &[&str] = &[
    "collapsible-section",
    "!rounded-lg",
    "md:!rounded-xl",
    "overflow-hidden",
    "mb-4",
    "bg-neutral-50",
    "border",
    "border-gray-300",
    "shadow-sm",
];

/// Classes dropped from the original block's set.
const WIDGET_CLASSES_REMOVED: &[&str] = &["gap-5"];

/// Classes added to the summary header.
const HEADER_CLASSES: &[&str] = &[
    "flex",
    "items-center",
    "justify-between",
    "overflow-hidden",
    "py-5",
    "bg-white",
    "hover:bg-neutral-50",
    "!my-0",
    "px-6",
    "cursor-pointer",
];

/// Classes on the chevron icon appended to each header.
const CHEVRON_CLASSES: &[&str] = &[
    "fas",
    "fa-chevron-down",
    "text-gray-500",
    "collapsible-section-chevron",
];

/// Classes on the body wrapper.
const BODY_CLASSES: &[&str] = &["details-content", "p-5"];

/// Behavior knobs for the rewrite.
#[derive(Debug, Clone)]
pub struct FoldOptions {
    /// Class naming the separator element inside each block.
    pub separator_class: String,
    /// Whether produced widgets start expanded.
    pub default_open: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            separator_class: crate::config::SEPARATOR_CLASS.to_string(),
            default_open: true,
        }
    }
}

impl From<&Config> for FoldOptions {
    fn from(config: &Config) -> Self {
        Self {
            separator_class: config.separator_class.clone(),
            default_open: config.default_open,
        }
    }
}

/// Convert every unconverted direct child block of `region` into a
/// disclosure widget. Returns the number of blocks newly converted by
/// this call.
///
/// Fails with [`Error::StructureNotRecognized`] when the region's
/// subtree holds no separator at all, which callers treat as "content
/// not loaded yet" rather than a hard failure.
pub fn fold_region(dom: &mut Document, region: NodeId, opts: &FoldOptions) -> Result<usize> {
    if find_separator(dom, region, &opts.separator_class).is_none() {
        return Err(Error::StructureNotRecognized);
    }

    let blocks: Vec<NodeId> = dom.element_children(region).collect();
    let mut folded = 0;

    for block in blocks {
        if is_widget(dom, block) {
            debug!("block already a details widget, skipping");
            continue;
        }
        if is_marked(dom, block) {
            debug!("block carries {TRANSFORM_MARKER}, skipping");
            continue;
        }
        fold_block(dom, block, opts);
        folded += 1;
    }

    Ok(folded)
}

/// Whether the node is already a produced widget.
fn is_widget(dom: &Document, id: NodeId) -> bool {
    dom.element_name(id).is_some_and(|n| n.as_ref() == "details")
}

/// Whether the block was marked by an earlier conversion. Only the
/// exact value `"true"` counts; anything else is not a marker.
fn is_marked(dom: &Document, id: NodeId) -> bool {
    dom.get_attr(id, TRANSFORM_MARKER) == Some("true")
}

/// First element with the separator class strictly below `root`, in
/// document order.
pub(crate) fn find_separator(dom: &Document, root: NodeId, class: &str) -> Option<NodeId> {
    dom.descendants(root)
        .find(|&id| dom.is_element(id) && dom.has_class(id, class))
}

fn fold_block(dom: &mut Document, block: NodeId, opts: &FoldOptions) {
    let widget = dom.create_element(qname("details"), vec![]);

    // Generic attribute copy: everything the block carried moves over
    let attrs: Vec<Attribute> = dom.attributes(block).to_vec();
    for attr in &attrs {
        dom.set_attr(widget, attr.name.local.as_ref(), &attr.value);
    }
    if opts.default_open {
        dom.set_attr(widget, "open", "");
    }
    for class in WIDGET_CLASSES {
        dom.add_class(widget, class);
    }
    for class in WIDGET_CLASSES_REMOVED {
        dom.remove_class(widget, class);
    }
    dom.set_attr(block, TRANSFORM_MARKER, "true");

    match find_separator(dom, block, &opts.separator_class) {
        Some(separator) => {
            let header = build_header(dom, separator);
            dom.append(widget, header);

            let body = dom.create_element(qname("div"), vec![]);
            for class in BODY_CLASSES {
                dom.add_class(body, class);
            }
            // Everything except the emptied direct-child separator moves
            // into the body, text nodes included, in original order
            let rest: Vec<NodeId> = dom.children(block).collect();
            for child in rest {
                if child == separator {
                    continue;
                }
                dom.remove(child);
                dom.append(body, child);
            }
            dom.append(widget, body);
        }
        None => {
            // Degraded path: no header donor in this block
            let header = build_placeholder_header(dom);
            dom.append(widget, header);

            let rest: Vec<NodeId> = dom.children(block).collect();
            for child in rest {
                dom.remove(child);
                dom.append(widget, child);
            }
        }
    }

    dom.replace_with(block, widget);
}

/// Build the summary header from a separator: its attributes, its
/// children (order preserved), then the chevron.
fn build_header(dom: &mut Document, separator: NodeId) -> NodeId {
    let header = dom.create_element(qname("summary"), vec![]);

    let attrs: Vec<Attribute> = dom.attributes(separator).to_vec();
    for attr in &attrs {
        dom.set_attr(header, attr.name.local.as_ref(), &attr.value);
    }
    for class in HEADER_CLASSES {
        dom.add_class(header, class);
    }

    let content: Vec<NodeId> = dom.children(separator).collect();
    for child in content {
        dom.remove(child);
        dom.append(header, child);
    }

    let chevron = build_chevron(dom);
    dom.append(header, chevron);
    header
}

fn build_placeholder_header(dom: &mut Document) -> NodeId {
    let header = dom.create_element(qname("summary"), vec![]);
    for class in HEADER_CLASSES {
        dom.add_class(header, class);
    }
    dom.append_text(header, PLACEHOLDER_LABEL);
    let chevron = build_chevron(dom);
    dom.append(header, chevron);
    header
}

fn build_chevron(dom: &mut Document) -> NodeId {
    let chevron = dom.create_element(qname("i"), vec![]);
    for class in CHEVRON_CLASSES {
        dom.add_class(chevron, class);
    }
    chevron
}
