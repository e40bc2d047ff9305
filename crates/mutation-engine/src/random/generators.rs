//! Fresh node generation
//!
//! Used when a structural mutation inserts a new node or swaps a leaf's
//! component type. Generated leaves always carry the props their component
//! needs to pass validation.

use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde_json::{json, Map, Value};
use widget_dsl::{ComponentKind, Container, Dimension, Direction, Leaf, Node};

use super::content::pick_icon_name;
use crate::constants::mutation::NESTED_INSERT_CHANCE;
use crate::palette::{DataBucket, Palette};
use crate::sampling::{between, pick};

/// A random leaf of a random catalog component
pub fn random_leaf(palette: &Palette, rng: &mut StdRng) -> Leaf {
    let kind = ComponentKind::ALL
        .choose(rng)
        .copied()
        .unwrap_or(ComponentKind::Text);
    leaf_for(kind, palette, rng)
}

/// A random node: usually a leaf, occasionally a small container of leaves
/// when `allow_container` is set
pub fn random_node(palette: &Palette, allow_container: bool, rng: &mut StdRng) -> Node {
    if allow_container && rng.gen_bool(NESTED_INSERT_CHANCE) {
        let direction = if rng.gen_bool(0.5) {
            Direction::Row
        } else {
            Direction::Col
        };
        let mut container = Container::new(direction);
        container.gap = pick(&palette.gaps, rng).copied();
        for _ in 0..rng.gen_range(1..=2) {
            container.children.push(Node::Leaf(random_leaf(palette, rng)));
        }
        Node::Container(container)
    } else {
        Node::Leaf(random_leaf(palette, rng))
    }
}

/// A leaf of `kind` with default props drawn from the palette
pub fn leaf_for(kind: ComponentKind, palette: &Palette, rng: &mut StdRng) -> Leaf {
    let mut leaf = Leaf::new(kind, default_props(kind, palette, rng));
    if kind.is_text_like() {
        let key = match kind {
            ComponentKind::Button => "actions",
            ComponentKind::Badge => "badges",
            _ => "labels",
        };
        let phrase = palette
            .text_content
            .get(key)
            .and_then(|phrases| pick(phrases, rng))
            .or_else(|| palette.text_content.values().flatten().choose(rng))
            .cloned()
            .unwrap_or_else(|| kind.name().to_string());
        leaf.content = Some(phrase);
    }
    if matches!(kind, ComponentKind::Image) {
        leaf.width = pick(&palette.component_sizes, rng).copied().map(Dimension::from);
        leaf.height = pick(&palette.component_sizes, rng).copied().map(Dimension::from);
    }
    leaf
}

/// Props a freshly created leaf of `kind` starts with
pub fn default_props(kind: ComponentKind, palette: &Palette, rng: &mut StdRng) -> Map<String, Value> {
    let color = |pool: &[String], rng: &mut StdRng| {
        pick(pool, rng).cloned().map_or(Value::Null, Value::from)
    };
    let number = |pool: &[u32], rng: &mut StdRng| pick(pool, rng).map_or(Value::Null, |v| json!(v));

    let mut props = Map::new();
    match kind {
        ComponentKind::Text => {
            props.insert("fontSize".into(), number(&palette.font_sizes, rng));
            props.insert("color".into(), color(&palette.colors.text, rng));
        }
        ComponentKind::Icon => {
            let name = pick_icon_name(palette, None, rng).cloned();
            props.insert("name".into(), name.map_or(Value::Null, Value::from));
            props.insert("size".into(), number(&palette.icon_sizes, rng));
            props.insert("color".into(), color(&palette.colors.accents, rng));
        }
        ComponentKind::Image => {
            props.insert("src".into(), json!("https://picsum.photos/200"));
            props.insert("fit".into(), json!("cover"));
        }
        ComponentKind::Button => {
            props.insert("variant".into(), json!(["primary", "secondary", "ghost"].choose(rng)));
            props.insert("color".into(), color(&palette.colors.accents, rng));
        }
        ComponentKind::Badge => {
            props.insert("color".into(), color(&palette.colors.accents, rng));
        }
        ComponentKind::Avatar => {
            props.insert("size".into(), number(&palette.icon_sizes, rng));
            props.insert("initials".into(), json!("JD"));
        }
        ComponentKind::Divider => {
            props.insert("color".into(), color(&palette.colors.text, rng));
        }
        ComponentKind::Checkbox | ComponentKind::Switch => {
            props.insert("checked".into(), json!(rng.gen_bool(0.5)));
        }
        ComponentKind::Slider => {
            props.insert("value".into(), json!(rng.gen_range(0..=100)));
            props.insert("color".into(), color(&palette.colors.accents, rng));
        }
        ComponentKind::Input => {
            props.insert("placeholder".into(), json!("Search"));
        }
        ComponentKind::Spacer => {
            let size = palette.gaps.iter().filter(|g| **g > 0).choose(rng).copied();
            props.insert("size".into(), json!(size.unwrap_or(8)));
        }
        chart => chart_props(chart, palette, rng, &mut props),
    }
    props
}

fn chart_props(kind: ComponentKind, palette: &Palette, rng: &mut StdRng, props: &mut Map<String, Value>) {
    if kind.is_progress() {
        props.insert("value".into(), json!(rng.gen_range(0..=100)));
        if let Some(c) = pick(&palette.colors.chart, rng) {
            props.insert("color".into(), json!(c));
        }
        return;
    }

    let bucket = random_bucket(palette, rng);
    let points = bucket.map_or(4, |b| between(b.min_points as u32, b.max_points as u32, rng) as usize);
    let series_count = if kind == ComponentKind::StackedBarChart { rng.gen_range(2..=3) } else { 1 };
    props.insert("data".into(), chart_data(kind, bucket, points, series_count, rng));

    if kind.has_labels() {
        if let Some(set) = palette.chart.labels.values().choose(rng) {
            props.insert("labels".into(), labels_of_length(set, points));
        }
    }
    if kind.has_color_series() {
        let count = match kind {
            ComponentKind::PieChart => points,
            ComponentKind::StackedBarChart => series_count,
            _ => 1,
        };
        props.insert("colors".into(), color_series(palette, count, rng));
    } else if let Some(c) = pick(&palette.colors.chart, rng) {
        props.insert("color".into(), json!(c));
    }
    if kind.has_orientation() {
        if let Some(o) = pick(&palette.chart.orientations, rng) {
            props.insert("orientation".into(), json!(o));
        }
    }
}

/// Any magnitude bucket
pub fn random_bucket<'p>(palette: &'p Palette, rng: &mut StdRng) -> Option<&'p DataBucket> {
    palette.chart.data.values().choose(rng)
}

/// Numeric chart data; stacked charts get one series per stack
pub fn chart_data(
    kind: ComponentKind,
    bucket: Option<&DataBucket>,
    points: usize,
    series_count: usize,
    rng: &mut StdRng,
) -> Value {
    let (min, max) = bucket.map_or((1, 20), |b| (b.min, b.max));
    let mut series = || -> Value {
        Value::Array((0..points).map(|_| json!(between(min, max, rng))).collect())
    };
    if kind == ComponentKind::StackedBarChart {
        Value::Array((0..series_count.max(1)).map(|_| series()).collect())
    } else {
        series()
    }
}

/// Labels cycled from `set` to exactly `len` entries
pub fn labels_of_length(set: &[String], len: usize) -> Value {
    if set.is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array((0..len).map(|i| json!(set[i % set.len()])).collect())
}

/// `count` chart colors, distinct while the pool allows it
pub fn color_series(palette: &Palette, count: usize, rng: &mut StdRng) -> Value {
    let pool = &palette.colors.chart;
    let mut shuffled: Vec<&String> = pool.iter().collect();
    shuffled.shuffle(rng);
    Value::Array(
        (0..count)
            .filter_map(|i| shuffled.get(i % shuffled.len().max(1)).map(|c| json!(c)))
            .collect(),
    )
}
