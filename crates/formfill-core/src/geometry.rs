//! Bounding box and page of a field's first widget annotation
//!
//! Geometry only feeds the optional UI overlay and the size heuristic, so
//! every failure here degrades to `None` instead of an error.

use crate::acroform::{object_to_f64, FormDocument, NativeField};
use crate::classify::WidgetSize;
use crate::descriptor::FieldBounds;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Normalized widget rectangle `[x, y, width, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
struct WidgetRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Resolve the bounds of a field's first widget
///
/// Returns `None` when the field has no widget, the widget's `/Rect` is
/// malformed, or the widget cannot be placed on a page.
pub fn resolve(form: &FormDocument, field: &NativeField) -> Option<FieldBounds> {
    let widget_id = first_widget(form, field)?;
    let doc = form.document();
    let widget = doc.get_object(widget_id).and_then(|o| o.as_dict()).ok()?;
    let rect = parse_rect(doc, widget)?;
    let page = page_index(doc, widget_id, widget)?;

    Some(FieldBounds {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        page,
    })
}

/// Size of a field's first widget, even when its page cannot be found
pub fn widget_size(form: &FormDocument, field: &NativeField) -> Option<WidgetSize> {
    let widget_id = first_widget(form, field)?;
    let doc = form.document();
    let widget = doc.get_object(widget_id).and_then(|o| o.as_dict()).ok()?;
    let rect = parse_rect(doc, widget)?;
    Some(WidgetSize::new(rect.width, rect.height))
}

fn first_widget(form: &FormDocument, field: &NativeField) -> Option<ObjectId> {
    form.widget_ids(field).ok()?.into_iter().next()
}

/// Parse `/Rect` into origin plus non-negative width and height
fn parse_rect(doc: &Document, widget: &Dictionary) -> Option<WidgetRect> {
    let rect = match widget.get(b"Rect").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let arr = rect.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }

    let mut values = [0.0f64; 4];
    for (i, obj) in arr.iter().enumerate() {
        let obj = match obj {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            other => other,
        };
        values[i] = object_to_f64(obj)?;
    }

    // Producers do not always write lower-left before upper-right
    let (x1, x2) = (values[0].min(values[2]), values[0].max(values[2]));
    let (y1, y2) = (values[1].min(values[3]), values[1].max(values[3]));
    Some(WidgetRect {
        x: x1,
        y: y1,
        width: x2 - x1,
        height: y2 - y1,
    })
}

/// 0-based index of the page holding the widget
///
/// Uses the widget's `/P` entry, falling back to a scan of the pages'
/// `/Annots` arrays.
fn page_index(doc: &Document, widget_id: ObjectId, widget: &Dictionary) -> Option<u32> {
    let pages = doc.get_pages();

    if let Ok(page_ref) = widget.get(b"P").and_then(|p| p.as_reference()) {
        if let Some((page_num, _)) = pages.iter().find(|(_, id)| **id == page_ref) {
            return Some(page_num - 1);
        }
    }

    pages.iter().find_map(|(page_num, page_id)| {
        let page = doc.get_object(*page_id).and_then(|o| o.as_dict()).ok()?;
        let annots = match page.get(b"Annots").ok()? {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            other => other,
        };
        annots
            .as_array()
            .ok()?
            .iter()
            .any(|a| a.as_reference().ok() == Some(widget_id))
            .then(|| page_num - 1)
    })
}
