//! Text and icon content operations

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde_json::Value;
use widget_dsl::{ComponentKind, WidgetDocument};

use super::{leaf_mut, pick_leaf, MutationContext};
use crate::constants::mutation::PRIMARY_ICON_FAMILY_SHARE;
use crate::palette::Palette;
use crate::records::Change;
use crate::sampling::pick_different;

/// Phrase category to draw from for a text-like component
fn phrase_category<'p>(palette: &'p Palette, kind: ComponentKind, rng: &mut StdRng) -> Option<&'p [String]> {
    let preferred = match kind {
        ComponentKind::Button => Some("actions"),
        ComponentKind::Badge => Some("badges"),
        _ => None,
    };
    if let Some(phrases) = preferred.and_then(|key| palette.text_content.get(key)) {
        if !phrases.is_empty() {
            return Some(phrases);
        }
    }
    palette
        .text_content
        .iter()
        .filter(|(key, phrases)| !phrases.is_empty() && !matches!(key.as_str(), "actions" | "badges"))
        .map(|(_, phrases)| phrases.as_slice())
        .choose(rng)
}

pub(super) fn change_text_content(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| {
        leaf.kind().map_or(false, |k| k.is_text_like())
    })?;
    let leaf = leaf_mut(document, &path)?;
    let kind = leaf.kind()?;
    let phrases = phrase_category(ctx.palette, kind, rng)?;
    let current = leaf.content.clone();
    let next = pick_different(phrases, current.as_ref(), rng)?.clone();
    leaf.content = Some(next.clone());
    Some(Change::new(
        "Changed text content",
        path.field("content"),
        current,
        next,
    ))
}

/// Pick an icon name, favoring the primary family
pub(crate) fn pick_icon_name<'p>(
    palette: &'p Palette,
    current: Option<&String>,
    rng: &mut StdRng,
) -> Option<&'p String> {
    let icons = &palette.icons;
    let (first, second) = if rng.gen_bool(PRIMARY_ICON_FAMILY_SHARE) {
        (&icons.primary, &icons.secondary)
    } else {
        (&icons.secondary, &icons.primary)
    };
    pick_different(first, current, rng).or_else(|| pick_different(second, current, rng))
}

pub(super) fn change_icon_name(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| leaf.kind() == Some(ComponentKind::Icon))?;
    let leaf = leaf_mut(document, &path)?;
    let current = leaf.icon_name().map(str::to_string);
    let next = pick_icon_name(ctx.palette, current.as_ref(), rng)?.clone();
    let before = leaf.set_prop("name", Value::from(next.clone()));
    Some(Change::new(
        "Changed icon",
        path.field("props.name"),
        before,
        next,
    ))
}
