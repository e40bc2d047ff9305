//! Color operations

use rand::rngs::StdRng;
use serde_json::Value;
use widget_dsl::{ComponentKind, WidgetDocument};

use super::{container_mut, leaf_mut, pick_container, pick_leaf, MutationContext};
use crate::records::Change;
use crate::sampling::pick_different;

pub(super) fn change_widget_background(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let current = document.widget.background_color.clone();
    let next = pick_different(&ctx.palette.colors.backgrounds, current.as_ref(), rng)?.clone();
    document.widget.background_color = Some(next.clone());
    Some(Change::new(
        "Changed background color",
        "widget.backgroundColor",
        current,
        next,
    ))
}

pub(super) fn change_container_background(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |_, _| true)?;
    let container = container_mut(document, &path)?;
    let current = container.background_color.clone();
    let next = pick_different(
        &ctx.palette.colors.container_backgrounds,
        current.as_ref(),
        rng,
    )?
    .clone();
    container.background_color = Some(next.clone());
    Some(Change::new(
        "Changed container background",
        path.field("backgroundColor"),
        current,
        next,
    ))
}

pub(super) fn change_text_color(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    recolor_leaf(
        document,
        ComponentKind::Text,
        &ctx.palette.colors.text,
        "Changed text color",
        rng,
    )
}

pub(super) fn change_icon_color(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    recolor_leaf(
        document,
        ComponentKind::Icon,
        &ctx.palette.colors.accents,
        "Changed icon color",
        rng,
    )
}

fn recolor_leaf(
    document: &mut WidgetDocument,
    kind: ComponentKind,
    pool: &[String],
    description: &str,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| leaf.kind() == Some(kind))?;
    let leaf = leaf_mut(document, &path)?;
    let current = leaf.prop_str("color").map(str::to_string);
    let next = pick_different(pool, current.as_ref(), rng)?.clone();
    let before = leaf.set_prop("color", Value::from(next.clone()));
    Some(Change::new(description, path.field("props.color"), before, next))
}
