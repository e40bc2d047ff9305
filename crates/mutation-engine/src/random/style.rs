//! Style and widget-level operations

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;
use widget_dsl::{ComponentKind, Dimension, WidgetDocument};

use super::{leaf_mut, pick_leaf, MutationContext};
use crate::records::Change;
use crate::sampling::pick_different;

pub(super) fn change_font_weight(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| leaf.kind() == Some(ComponentKind::Text))?;
    let leaf = leaf_mut(document, &path)?;
    let current = leaf.font_weight();
    let next = *pick_different(&ctx.palette.font_weights, current.as_ref(), rng)?;
    let before = leaf.set_prop("fontWeight", Value::from(next));
    Some(Change::new(
        "Changed font weight",
        path.field("props.fontWeight"),
        before,
        next,
    ))
}

/// One of aspect ratio, width or height, chosen uniformly
pub(super) fn change_widget_properties(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let palette = ctx.palette;
    let widget = &mut document.widget;
    match rng.gen_range(0..3) {
        0 => {
            let current = widget.aspect_ratio;
            let next = *pick_different(&palette.aspect_ratios, current.as_ref(), rng)?;
            widget.aspect_ratio = Some(next);
            Some(Change::new(
                "Changed aspect ratio",
                "widget.aspectRatio",
                current,
                next,
            ))
        }
        1 => {
            let current = widget.width.clone();
            let pixels = current.as_ref().and_then(Dimension::pixels);
            let next = *pick_different(&palette.widget_widths, pixels.as_ref(), rng)?;
            widget.width = Some(next.into());
            Some(Change::new("Changed widget width", "widget.width", current, next))
        }
        _ => {
            let current = widget.height.clone();
            let pixels = current.as_ref().and_then(Dimension::pixels);
            let next = *pick_different(&palette.widget_heights, pixels.as_ref(), rng)?;
            widget.height = Some(next.into());
            Some(Change::new("Changed widget height", "widget.height", current, next))
        }
    }
}

pub(super) fn change_widget_padding(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let current = document.widget.padding;
    let next = *pick_different(&ctx.palette.paddings, current.as_ref(), rng)?;
    document.widget.padding = Some(next);
    Some(Change::new(
        "Changed widget padding",
        "widget.padding",
        current,
        next,
    ))
}
