use serde::{Deserialize, Serialize};

/// Byte range of a token within its source line.
///
/// Spans are line-relative: the editor re-splits the document, so a span
/// plus a 1-based line number locates a token exactly. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Pixel-free label placement offset, in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOffset {
    pub dx: f64,
    pub dy: f64,
}

/// How a component is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Buy,
    Build,
    Outsource,
}

/// Market-shape decorator on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentClass {
    Market,
    Ecosystem,
}

/// `component <Name> [<visibility>, <maturity>] ...` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDecl {
    pub name: String,
    pub name_span: Span,
    pub visibility: f64,
    pub maturity: f64,
    pub coords_span: Option<Span>,
    pub inertia: bool,
    pub method: Option<DeliveryMethod>,
    pub class: Option<ComponentClass>,
    pub label: Option<LabelOffset>,
    pub line: usize,
}

/// `anchor <Name> [<visibility>, <maturity>]` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorDecl {
    pub name: String,
    pub name_span: Span,
    pub visibility: f64,
    pub maturity: f64,
    pub coords_span: Option<Span>,
    pub label: Option<LabelOffset>,
    pub line: usize,
}

/// `note <Text> [<visibility>, <maturity>]` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDecl {
    pub text: String,
    pub text_span: Span,
    pub visibility: f64,
    pub maturity: f64,
    pub coords_span: Option<Span>,
    pub line: usize,
}

/// `evolve <Name>[-><Override>] <maturity>` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolveDecl {
    pub name: String,
    pub name_span: Span,
    pub override_name: Option<String>,
    pub override_span: Option<Span>,
    pub maturity: f64,
    pub label: Option<LabelOffset>,
    pub line: usize,
}

/// Arrow form of a link line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// `A->B`: plain dependency.
    Dependency,
    /// `A->>B`: flow between components.
    Flow,
    /// `A+>B`: flow carrying value.
    ValueFlow,
}

impl LinkKind {
    pub fn arrow(&self) -> &'static str {
        match self {
            LinkKind::Dependency => "->",
            LinkKind::Flow => "->>",
            LinkKind::ValueFlow => "+>",
        }
    }
}

/// `<Name>-><Name>` line, optionally `;<context>` suffixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDecl {
    pub start: String,
    pub start_span: Span,
    pub end: String,
    pub end_span: Span,
    pub kind: LinkKind,
    pub context: Option<String>,
    pub line: usize,
}

/// Sub-component of a pipeline block, positioned on the maturity axis only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineComponent {
    pub name: String,
    pub name_span: Span,
    pub maturity: f64,
    pub line: usize,
}

/// `pipeline <Name> ...`: either the legacy single-line header with a
/// maturity range, or a braced block of single-maturity components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineBlock {
    pub name: String,
    pub name_span: Span,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub components: Vec<PipelineComponent>,
    pub braced: bool,
    pub line: usize,
}

/// Which attitude a PST box declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attitude {
    Pioneers,
    Settlers,
    Townplanners,
}

impl Attitude {
    pub fn keyword(&self) -> &'static str {
        match self {
            Attitude::Pioneers => "pioneers",
            Attitude::Settlers => "settlers",
            Attitude::Townplanners => "townplanners",
        }
    }
}

/// `pioneers|settlers|townplanners [<visTop>, <matLeft>, <visBottom>,
/// <matRight>] [<Name>]` region declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttitudeDecl {
    pub attitude: Attitude,
    pub vis_top: f64,
    pub mat_left: f64,
    pub vis_bottom: f64,
    pub mat_right: f64,
    /// Covers the bracketed block including both brackets.
    pub coords_span: Span,
    pub name: Option<String>,
    pub name_span: Option<Span>,
    pub line: usize,
}

/// `title <text>` line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDecl {
    pub text: String,
    pub line: usize,
}

/// Closed set of parsed map elements. The mutator dispatches on these
/// variants exhaustively; there is no duck-typed escape hatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MapElement {
    Component(ComponentDecl),
    Anchor(AnchorDecl),
    Note(NoteDecl),
    Evolve(EvolveDecl),
    Link(LinkDecl),
    Pipeline(PipelineBlock),
    Attitude(AttitudeDecl),
    Title(TitleDecl),
}

impl MapElement {
    /// The element's logical name, where it has one. Links have two
    /// endpoints and no single name; titles expose their text.
    pub fn name(&self) -> Option<&str> {
        match self {
            MapElement::Component(c) => Some(&c.name),
            MapElement::Anchor(a) => Some(&a.name),
            MapElement::Note(n) => Some(&n.text),
            MapElement::Evolve(e) => Some(&e.name),
            MapElement::Pipeline(p) => Some(&p.name),
            MapElement::Attitude(a) => a.name.as_deref(),
            MapElement::Title(t) => Some(&t.text),
            MapElement::Link(_) => None,
        }
    }

    /// 1-based source line of the declaration.
    pub fn line(&self) -> usize {
        match self {
            MapElement::Component(c) => c.line,
            MapElement::Anchor(a) => a.line,
            MapElement::Note(n) => n.line,
            MapElement::Evolve(e) => e.line,
            MapElement::Link(l) => l.line,
            MapElement::Pipeline(p) => p.line,
            MapElement::Attitude(a) => a.line,
            MapElement::Title(t) => t.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_serializes_with_type_tag() {
        let element = MapElement::Title(TitleDecl {
            text: "Tea Shop".to_string(),
            line: 1,
        });
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"type\":\"Title\""));
    }

    #[test]
    fn link_kind_arrows_round_trip() {
        for kind in [LinkKind::Dependency, LinkKind::Flow, LinkKind::ValueFlow] {
            assert!(!kind.arrow().is_empty());
        }
        assert_eq!(LinkKind::Flow.arrow(), "->>");
    }
}
