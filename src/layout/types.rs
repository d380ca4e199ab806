pub type Point = (f64, f64);

/// Which edge of the text sits on the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
}

/// A piece of text pinned to a point in diagram coordinates, vertically
/// centered on `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnchor {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub h_align: HAlign,
}

/// Axis-aligned rectangle, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl BarRect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Vertical allocation for one label, in observation-count units.
///
/// `left_bottom`/`right_bottom` are the centered sub-bar origins; they are
/// never advanced after the band pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Band<L> {
    pub label: L,
    pub left_count: usize,
    pub right_count: usize,
    pub total_height: f64,
    pub bottom: f64,
    pub top: f64,
    pub left_bottom: f64,
    pub right_bottom: f64,
}

impl<L> Band<L> {
    pub fn left_center(&self) -> f64 {
        self.left_bottom + 0.5 * self.left_count as f64
    }

    pub fn right_center(&self) -> f64 {
        self.right_bottom + 0.5 * self.right_count as f64
    }

    /// True when the label occurs in neither sequence.
    pub fn is_unused(&self) -> bool {
        self.left_count + self.right_count == 0
    }
}

/// A band together with everything a renderer needs to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct BandGeometry<L> {
    pub band: Band<L>,
    pub left_bar: BarRect,
    pub right_bar: BarRect,
    pub left_anchor: TextAnchor,
    pub right_anchor: TextAnchor,
    pub color: Option<String>,
}

/// Flow strip for one nonzero transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon<L> {
    pub source: L,
    pub target: L,
    pub count: usize,
    pub thickness: f64,
    /// Strip bottom on the left bar.
    pub left_origin: f64,
    /// Strip bottom on the right bar.
    pub right_origin: f64,
    pub color_key: L,
    pub color: Option<String>,
    pub centerline: Vec<Point>,
}

impl<L> Ribbon<L> {
    pub fn lower_edge(&self) -> Vec<Point> {
        let half = 0.5 * self.thickness;
        self.centerline.iter().map(|&(x, y)| (x, y - half)).collect()
    }

    pub fn upper_edge(&self) -> Vec<Point> {
        let half = 0.5 * self.thickness;
        self.centerline.iter().map(|&(x, y)| (x, y + half)).collect()
    }

    /// Closed polygon: lower edge left to right, then upper edge back.
    pub fn outline(&self) -> Vec<Point> {
        let mut points = self.lower_edge();
        points.extend(self.upper_edge().into_iter().rev());
        points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideCaptions {
    pub left: TextAnchor,
    pub right: TextAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity {
    pub bar: f64,
    pub ribbon: f64,
}

impl Default for Opacity {
    fn default() -> Self {
        Self {
            bar: 0.99,
            ribbon: 0.65,
        }
    }
}

/// Complete output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramGeometry<L> {
    pub labels: Vec<L>,
    pub bands: Vec<BandGeometry<L>>,
    pub ribbons: Vec<Ribbon<L>>,
    pub total: usize,
    pub gap: f64,
    pub x_max: f64,
    pub top_edge: f64,
    pub side_captions: Option<SideCaptions>,
    pub opacity: Opacity,
}

impl<L: PartialEq> DiagramGeometry<L> {
    pub fn band(&self, label: &L) -> Option<&BandGeometry<L>> {
        self.bands.iter().find(|geom| &geom.band.label == label)
    }

    pub fn ribbons_from<'a>(&'a self, label: &'a L) -> impl Iterator<Item = &'a Ribbon<L>> + 'a {
        self.ribbons.iter().filter(move |ribbon| &ribbon.source == label)
    }

    pub fn ribbons_into<'a>(&'a self, label: &'a L) -> impl Iterator<Item = &'a Ribbon<L>> + 'a {
        self.ribbons.iter().filter(move |ribbon| &ribbon.target == label)
    }
}
