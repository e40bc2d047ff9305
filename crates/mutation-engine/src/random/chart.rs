//! Chart operations
//!
//! Each operation only targets chart leaves of the kinds it applies to and
//! never creates a chart.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde_json::{json, Value};
use widget_dsl::{ComponentKind, Leaf, WidgetDocument};

use super::generators::{chart_data, color_series, labels_of_length, random_bucket};
use super::{leaf_mut, pick_leaf, MutationContext};
use crate::records::Change;
use crate::sampling::{between, pick_different};

fn chart_kind(leaf: &Leaf) -> Option<ComponentKind> {
    leaf.kind().filter(|k| k.is_chart())
}

/// Number of points in a chart's current series
fn point_count(leaf: &Leaf) -> Option<usize> {
    match leaf.props.get("data")?.as_array()?.first() {
        Some(Value::Array(series)) => Some(series.len()),
        _ => leaf.props.get("data")?.as_array().map(Vec::len),
    }
}

pub(super) fn mutate_chart_data(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| chart_kind(leaf).is_some())?;
    let leaf = leaf_mut(document, &path)?;
    let kind = chart_kind(leaf)?;

    if kind.is_progress() {
        let current = leaf.prop_f64("value").map(|v| v.round() as u32);
        let mut next = rng.gen_range(0..=100u32);
        if Some(next) == current {
            next = (next + rng.gen_range(1..=100)) % 101;
        }
        let before = leaf.set_prop("value", json!(next));
        return Some(Change::new(
            "Changed progress value",
            path.field("props.value"),
            before,
            next,
        ));
    }

    let bucket = random_bucket(ctx.palette, rng);
    // Labelled charts keep their point count so labels stay aligned
    let points = match point_count(leaf) {
        Some(n) if kind.has_labels() && n > 0 => n,
        _ => bucket.map_or(4, |b| between(b.min_points as u32, b.max_points as u32, rng) as usize),
    };
    let series_count = match leaf.props.get("data").and_then(Value::as_array) {
        Some(outer) if kind == ComponentKind::StackedBarChart => outer.len().max(1),
        _ => 1,
    };
    let next = chart_data(kind, bucket, points, series_count, rng);
    let before = leaf.set_prop("data", next.clone());
    if before == next {
        leaf.set_prop("data", before);
        return None;
    }
    Some(Change::new(
        "Regenerated chart data",
        path.field("props.data"),
        before,
        next,
    ))
}

pub(super) fn mutate_chart_labels(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| {
        chart_kind(leaf).map_or(false, |k| k.has_labels())
    })?;
    let leaf = leaf_mut(document, &path)?;
    let points = point_count(leaf).unwrap_or(4);
    let current = leaf.props.get("labels").cloned().unwrap_or(Value::Null);
    let next = ctx
        .palette
        .chart
        .labels
        .values()
        .map(|set| labels_of_length(set, points))
        .filter(|labels| *labels != current)
        .choose(rng)?;
    let before = leaf.set_prop("labels", next.clone());
    Some(Change::new(
        "Changed chart labels",
        path.field("props.labels"),
        before,
        next,
    ))
}

pub(super) fn mutate_chart_colors(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| chart_kind(leaf).is_some())?;
    let leaf = leaf_mut(document, &path)?;
    let kind = chart_kind(leaf)?;

    if kind.has_color_series() {
        let count = leaf
            .props
            .get("colors")
            .and_then(Value::as_array)
            .map_or(1, |c| c.len().max(1));
        let current = leaf.props.get("colors").cloned().unwrap_or(Value::Null);
        let next = (0..3)
            .map(|_| color_series(ctx.palette, count, rng))
            .find(|candidate| *candidate != current)?;
        let before = leaf.set_prop("colors", next.clone());
        return Some(Change::new(
            "Changed chart colors",
            path.field("props.colors"),
            before,
            next,
        ));
    }

    let current = leaf.prop_str("color").map(str::to_string);
    let next = pick_different(&ctx.palette.colors.chart, current.as_ref(), rng)?.clone();
    let before = leaf.set_prop("color", Value::from(next.clone()));
    Some(Change::new(
        "Changed chart color",
        path.field("props.color"),
        before,
        next,
    ))
}

pub(super) fn mutate_chart_orientation(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |leaf, _| {
        chart_kind(leaf).map_or(false, |k| k.has_orientation())
    })?;
    let leaf = leaf_mut(document, &path)?;
    let current = leaf.prop_str("orientation").map(str::to_string);
    let next = pick_different(&ctx.palette.chart.orientations, current.as_ref(), rng)?.clone();
    let before = leaf.set_prop("orientation", Value::from(next.clone()));
    Some(Change::new(
        "Changed chart orientation",
        path.field("props.orientation"),
        before,
        next,
    ))
}

pub(super) fn mutate_chart_variant(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let variants = &ctx.palette.chart.variants;
    let path = pick_leaf(document, rng, |leaf, _| {
        chart_kind(leaf).is_some() && variants.get(&leaf.component).map_or(false, |v| !v.is_empty())
    })?;
    let leaf = leaf_mut(document, &path)?;
    let pool = variants.get(&leaf.component)?;
    let current = leaf.prop_str("variant").map(str::to_string);
    let next = pick_different(pool, current.as_ref(), rng)?.clone();
    let before = leaf.set_prop("variant", Value::from(next.clone()));
    Some(Change::new(
        "Changed chart variant",
        path.field("props.variant"),
        before,
        next,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::MutationOp;
    use serde_json::json;

    const BAR_PATH: &str = "root.children[2]";

    #[test]
    fn test_chart_data_keeps_label_alignment() {
        for seed in 0..20 {
            let mut document = doc(RICH_SEED);
            let record = run(MutationOp::MutateChartData, &mut document, seed).unwrap();
            if record.target_path.starts_with(BAR_PATH) {
                assert_eq!(record.after.as_array().unwrap().len(), 4);
            } else {
                assert_eq!(record.target_path, "root.children[3].props.value");
                let value = record.after.as_u64().unwrap();
                assert!(value <= 100);
                assert_ne!(record.after, record.before);
            }
        }
    }

    #[test]
    fn test_labels_and_orientation_target_bar_chart() {
        let mut document = doc(RICH_SEED);
        let record = run(MutationOp::MutateChartLabels, &mut document, 1).unwrap();
        assert_eq!(record.target_path, format!("{}.props.labels", BAR_PATH));
        assert_eq!(record.after.as_array().unwrap().len(), 4);
        assert_ne!(record.after, json!(["Q1", "Q2", "Q3", "Q4"]));

        let record = run(MutationOp::MutateChartOrientation, &mut document, 1).unwrap();
        assert_eq!(record.before, json!("vertical"));
        assert_eq!(record.after, json!("horizontal"));
    }

    #[test]
    fn test_chart_colors_keep_length() {
        for seed in 0..10 {
            let mut document = doc(RICH_SEED);
            let record = run(MutationOp::MutateChartColors, &mut document, seed).unwrap();
            if record.target_path.ends_with("colors") {
                assert_eq!(record.after.as_array().unwrap().len(), 2);
            } else {
                assert!(record.after.is_string());
            }
        }
    }

    #[test]
    fn test_chart_variant_uses_component_pool() {
        let mut document = doc(RICH_SEED);
        let record = run(MutationOp::MutateChartVariant, &mut document, 2).unwrap();
        let after = record.after.as_str().unwrap();
        if record.target_path.starts_with(BAR_PATH) {
            assert!(["rounded", "thin"].contains(&after));
        } else {
            assert!(["default", "striped", "thin"].contains(&after));
        }
    }
}
