//! Size operations

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;
use widget_dsl::{ComponentKind, Dimension, WidgetDocument};

use super::{leaf_mut, pick_leaf, MutationContext};
use crate::records::Change;
use crate::sampling::pick_different;

/// Leaves whose box size is meaningful to change
fn is_sizable(kind: ComponentKind) -> bool {
    kind.is_chart()
        || matches!(
            kind,
            ComponentKind::Image
                | ComponentKind::Avatar
                | ComponentKind::Button
                | ComponentKind::Input
                | ComponentKind::Slider
        )
}

pub(super) fn change_font_size(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    resize_prop(
        document,
        ComponentKind::Text,
        "fontSize",
        &ctx.palette.font_sizes,
        "Changed font size",
        rng,
    )
}

pub(super) fn change_icon_size(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    resize_prop(
        document,
        ComponentKind::Icon,
        "size",
        &ctx.palette.icon_sizes,
        "Changed icon size",
        rng,
    )
}

pub(super) fn change_component_size(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| leaf.kind().map_or(false, is_sizable))?;
    let leaf = leaf_mut(document, &path)?;
    let use_width = rng.gen_bool(0.5);
    let (field, slot) = if use_width {
        ("width", &mut leaf.width)
    } else {
        ("height", &mut leaf.height)
    };
    let current = slot.clone();
    let pixels = current.as_ref().and_then(Dimension::pixels);
    let next = *pick_different(&ctx.palette.component_sizes, pixels.as_ref(), rng)?;
    *slot = Some(next.into());
    Some(Change::new(
        format!("Changed component {}", field),
        path.field(field),
        current,
        next,
    ))
}

pub(super) fn change_border_radius(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let current = document.widget.border_radius;
    let next = *pick_different(&ctx.palette.border_radii, current.as_ref(), rng)?;
    document.widget.border_radius = Some(next);
    Some(Change::new(
        "Changed border radius",
        "widget.borderRadius",
        current,
        next,
    ))
}

fn resize_prop(
    document: &mut WidgetDocument,
    kind: ComponentKind,
    key: &str,
    pool: &[u32],
    description: &str,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| leaf.kind() == Some(kind))?;
    let leaf = leaf_mut(document, &path)?;
    let current = leaf.prop_f64(key).map(|v| v.round() as u32);
    let next = *pick_different(pool, current.as_ref(), rng)?;
    let before = leaf.set_prop(key, Value::from(next));
    Some(Change::new(
        description,
        path.field(&format!("props.{}", key)),
        before,
        next,
    ))
}
