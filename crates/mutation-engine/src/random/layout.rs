//! Layout operations

use rand::rngs::StdRng;
use rand::Rng;
use widget_dsl::{Direction, WidgetDocument};

use super::{container_mut, node_mut, pick_container, MutationContext};
use crate::records::Change;
use crate::sampling::pick_different;

pub(super) fn change_gap(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |_, _| true)?;
    let container = container_mut(document, &path)?;
    let current = container.gap;
    let next = *pick_different(&ctx.palette.gaps, current.as_ref(), rng)?;
    container.gap = Some(next);
    Some(Change::new("Changed gap", path.field("gap"), current, next))
}

pub(super) fn change_padding(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |_, _| true)?;
    let container = container_mut(document, &path)?;
    let current = container.padding;
    let next = *pick_different(&ctx.palette.paddings, current.as_ref(), rng)?;
    container.padding = Some(next);
    Some(Change::new(
        "Changed padding",
        path.field("padding"),
        current,
        next,
    ))
}

/// Flex only means something relative to siblings, so the root is excluded
pub(super) fn change_flex(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = widget_dsl::tree::random_matching(document.root(), rng, |_, p| !p.is_root())?;
    let node = node_mut(document, &path)?;
    let current = node.flex();
    let next = *pick_different(&ctx.palette.flex_values, current.as_ref(), rng)?;
    node.set_flex(Some(next));
    Some(Change::new("Changed flex", path.field("flex"), current, next))
}

pub(super) fn change_direction(
    document: &mut WidgetDocument,
    _ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |_, _| true)?;
    let container = container_mut(document, &path)?;
    let current = container.direction.unwrap_or(Direction::Col);
    let next = current.flipped();
    container.direction = Some(next);
    Some(Change::new(
        "Changed direction",
        path.field("direction"),
        current.as_str(),
        next.as_str(),
    ))
}

pub(super) fn change_alignment(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |_, _| true)?;
    let container = container_mut(document, &path)?;
    let main_axis = rng.gen_bool(0.5);
    let (field, pool, slot) = if main_axis {
        ("alignMain", &ctx.palette.alignments.main, &mut container.align_main)
    } else {
        ("alignCross", &ctx.palette.alignments.cross, &mut container.align_cross)
    };
    let current = slot.clone();
    let next = pick_different(pool, current.as_ref(), rng)?.clone();
    *slot = Some(next.clone());
    Some(Change::new(
        "Changed alignment",
        path.field(field),
        current,
        next,
    ))
}
