//! Page tree manipulation.
//!
//! This module handles the page-level steps of a merge:
//! - Flattening inheritable attributes onto pages before they are re-parented
//! - Finding the page tree nodes of a source document
//! - Installing a fresh, flat page tree and catalog in the output

use crate::error::MergeFailure;
use lopdf::{Document, Object, ObjectId, dictionary};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

// Guards against Parent cycles in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Copy inherited attributes from the page's ancestors onto the page itself.
///
/// Attributes already present on the page win. Needed before a page is moved
/// under a new parent, which would otherwise drop what it inherited.
pub fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<(), MergeFailure> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| MergeFailure::PageTree(format!("page {page_id:?}: {e}")))?;

    let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();

    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|e| MergeFailure::PageTree(format!("page {page_id:?}: {e}")))?;
    for (key, value) in inherited {
        page.set(key, value);
    }

    Ok(())
}

/// Ids of the catalog and every intermediate `Pages` node of `doc`.
///
/// These objects are replaced by the merged page tree and become garbage
/// once the pages are re-parented.
pub fn page_tree_nodes(doc: &Document) -> Vec<ObjectId> {
    let mut nodes = Vec::new();

    let Ok(catalog_id) = doc.trailer.get(b"Root").and_then(Object::as_reference) else {
        return nodes;
    };
    nodes.push(catalog_id);

    let Ok(root_pages) = doc
        .get_dictionary(catalog_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
    else {
        return nodes;
    };

    let mut pending = vec![(root_pages, 0usize)];
    while let Some((node_id, depth)) = pending.pop() {
        if depth > MAX_TREE_DEPTH || nodes.contains(&node_id) {
            continue;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            continue;
        };
        let is_pages_node = node
            .get(b"Type")
            .and_then(Object::as_name)
            .is_ok_and(|name| name == b"Pages");
        if !is_pages_node {
            continue;
        }

        nodes.push(node_id);
        if let Ok(kids) = node.get(b"Kids").and_then(Object::as_array) {
            pending.extend(
                kids.iter()
                    .filter_map(|kid| kid.as_reference().ok())
                    .map(|kid| (kid, depth + 1)),
            );
        }
    }

    nodes
}

/// Install a flat page tree under `pages_id` holding `page_ids` in order,
/// plus a new catalog pointing at it. Returns the catalog id.
pub fn install_page_tree(
    doc: &mut Document,
    pages_id: ObjectId,
    page_ids: &[ObjectId],
) -> Result<ObjectId, MergeFailure> {
    for &page_id in page_ids {
        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| MergeFailure::PageTree(format!("page {page_id:?}: {e}")))?;
        page.set("Parent", pages_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(catalog_id)
}
