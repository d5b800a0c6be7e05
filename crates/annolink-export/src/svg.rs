//! SVG overlay serializer.
//!
//! Renders one frame's annotations the way the live overlay draws them:
//! detection boxes outlined in their label color, accepted connections as
//! red lines, and a `"distance, angle°"` label centered on each line on a
//! half-transparent black backing.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Description, Element, Group, Line, Rectangle, Title};
use svg::node::{Node, Text};

use annolink_graph::{AcceptedConnection, Detection, ViewSize};

use crate::palette::LabelPalette;

/// Connection line color.
const LINE_COLOR: &str = "red";
/// Connection line width in view points.
const LINE_WIDTH: f64 = 2.0;
/// Detection box outline width in view points.
const BOX_WIDTH: f64 = 2.0;
/// Label font size in view points.
const LABEL_FONT_SIZE: f64 = 12.0;
/// Approximate advance of one label character at [`LABEL_FONT_SIZE`].
const LABEL_CHAR_WIDTH: f64 = 7.0;
/// Padding around label text.
const LABEL_PADDING: f64 = 4.0;

/// Metadata to embed in the SVG document.
///
/// Text values are XML-escaped by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Emitted as `<title>`. Typically the frame file name.
    pub title: Option<&'a str>,

    /// Emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized connector configuration, emitted inside `<metadata>` in
    /// a namespaced `<annolink:config>` element so exported overlays
    /// record the thresholds they were drawn with.
    pub config_json: Option<&'a str>,
}

/// Everything drawn for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub view: ViewSize,
    pub detections: &'a [Detection],
    pub connections: &'a [AcceptedConnection],
}

/// Serialize an overlay into an SVG document string.
///
/// Colors for detection labels come from `palette`, which is updated with
/// any label it has not seen before.
///
/// # Examples
///
/// ```
/// use annolink_export::{LabelPalette, Overlay, SvgMetadata, to_svg};
/// use annolink_graph::ViewSize;
///
/// let overlay = Overlay {
///     view: ViewSize { width: 390.0, height: 844.0 },
///     detections: &[],
///     connections: &[],
/// };
/// let svg = to_svg(&overlay, &mut LabelPalette::new(), &SvgMetadata::default());
/// assert!(svg.contains(r#"viewBox="0 0 390 844""#));
/// ```
#[must_use]
pub fn to_svg(
    overlay: &Overlay<'_>,
    palette: &mut LabelPalette,
    metadata: &SvgMetadata<'_>,
) -> String {
    let ViewSize { width, height } = overlay.view;
    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0.0, 0.0, width, height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("annolink:config");
        config_el.assign("xmlns:annolink", "https://annolink.dev/ns/1");
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    let mut boxes = Group::new().set("id", "detections").set("fill", "none");
    for detection in overlay.detections {
        let rect = detection.bounding_box.to_view(overlay.view);
        let color = palette.color(detection.label.as_deref());
        let mut el = Rectangle::new()
            .set("x", rect.x)
            .set("y", rect.y)
            .set("width", rect.width)
            .set("height", rect.height)
            .set("stroke", color.to_css())
            .set("stroke-width", BOX_WIDTH);
        if let Some(label) = &detection.label {
            el = el.set("data-label", label.as_str());
        }
        boxes = boxes.add(el);
    }
    doc = doc.add(boxes);

    let mut lines = Group::new()
        .set("id", "connections")
        .set("stroke", LINE_COLOR)
        .set("stroke-width", LINE_WIDTH);
    let mut labels = Group::new().set("id", "labels");
    for connection in overlay.connections {
        lines = lines.add(
            Line::new()
                .set("x1", connection.a.x)
                .set("y1", connection.a.y)
                .set("x2", connection.b.x)
                .set("y2", connection.b.y)
                .set("data-distance-mm", connection.distance_mm),
        );
        labels = labels.add(label_group(connection));
    }
    doc = doc.add(lines).add(labels);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Backing rectangle plus centered text for one connection label.
#[allow(clippy::cast_precision_loss)]
fn label_group(connection: &AcceptedConnection) -> Group {
    let text = connection.label();
    let anchor = connection.midpoint();
    let box_width = (text.chars().count() as f64).mul_add(LABEL_CHAR_WIDTH, 2.0 * LABEL_PADDING);
    let box_height = 2.0f64.mul_add(LABEL_PADDING, LABEL_FONT_SIZE);

    let backing = Rectangle::new()
        .set("x", anchor.x - box_width / 2.0)
        .set("y", anchor.y - box_height / 2.0)
        .set("width", box_width)
        .set("height", box_height)
        .set("fill", "black")
        .set("fill-opacity", 0.5);

    let mut text_el = Element::new("text");
    text_el.assign("x", anchor.x);
    text_el.assign("y", anchor.y);
    text_el.assign("fill", "white");
    text_el.assign("font-size", LABEL_FONT_SIZE);
    text_el.assign("text-anchor", "middle");
    text_el.assign("dominant-baseline", "central");
    text_el.append(Text::new(text));

    Group::new().add(backing).add(text_el)
}
