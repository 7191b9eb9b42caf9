//! Paginator: slices a [`ContinuousDocument`] into fixed-size pages.

use serde::Deserialize;

use crate::body::{Block, ContinuousDocument};
use crate::error::{Error, Result};
use crate::overlay::Overlay;

pub fn mm_to_pts(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Physical page size and reserved margins, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
    /// Reserved for the header band.
    pub margin_top: f32,
    /// Reserved for the footer band.
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

impl PageSpec {
    pub fn a4_portrait() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: 35.0,
            margin_bottom: 20.0,
            margin_left: 5.0,
            margin_right: 5.0,
        }
    }

    pub fn page_width_pts(&self) -> f32 {
        mm_to_pts(self.width)
    }

    pub fn page_height_pts(&self) -> f32 {
        mm_to_pts(self.height)
    }

    pub fn content_width_pts(&self) -> f32 {
        mm_to_pts(self.width - self.margin_left - self.margin_right)
    }

    /// Usable body height per page: page height minus top and bottom margins.
    pub fn content_height_pts(&self) -> f32 {
        mm_to_pts(self.height - self.margin_top - self.margin_bottom)
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            self.width,
            self.height,
            self.margin_top,
            self.margin_bottom,
            self.margin_left,
            self.margin_right,
        ];
        if dims.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Error::InvalidConfig(format!("page geometry must be non-negative: {self:?}")));
        }
        if self.margin_left + self.margin_right >= self.width
            || self.margin_top + self.margin_bottom >= self.height
        {
            return Err(Error::InvalidConfig(format!(
                "margins leave no room for content: {self:?}"
            )));
        }
        Ok(())
    }
}

/// Height of a block in points, as laid out at the content width.
pub trait Measure {
    fn measure(&self, block: &Block) -> f32;
}

impl<F> Measure for F
where
    F: Fn(&Block) -> f32,
{
    fn measure(&self, block: &Block) -> f32 {
        self(block)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock {
    pub block: Block,
    /// Offset from the top of the content area, in points.
    pub top: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub blocks: Vec<PlacedBlock>,
    pub(crate) overlay: Option<Overlay>,
}

impl Page {
    fn new(number: usize, blocks: Vec<PlacedBlock>) -> Self {
        Self { number, blocks, overlay: None }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn is_decorated(&self) -> bool {
        self.overlay.is_some()
    }

    /// Total body height placed on this page.
    pub fn used_height(&self) -> f32 {
        self.blocks.last().map(|b| b.top + b.height).unwrap_or(0.0)
    }
}

const FIT_TOLERANCE: f32 = 0.01;

/// Walk the blocks in order and break to a new page whenever the next block
/// would overflow the usable height. Blocks are never split; a block taller
/// than a whole page gets a page of its own and overflows it.
pub fn paginate(doc: ContinuousDocument, spec: &PageSpec, measure: &impl Measure) -> Vec<Page> {
    let usable = spec.content_height_pts();
    let mut pages: Vec<Page> = Vec::new();
    let mut current: Vec<PlacedBlock> = Vec::new();
    let mut cursor = 0.0f32;

    for block in doc.blocks {
        let height = measure.measure(&block).max(0.0);

        if !current.is_empty() && cursor + height > usable + FIT_TOLERANCE {
            log::debug!(
                "Page {} closed at {:.1}/{:.1}pt ({} blocks)",
                pages.len() + 1,
                cursor,
                usable,
                current.len()
            );
            pages.push(Page::new(pages.len() + 1, std::mem::take(&mut current)));
            cursor = 0.0;
        }

        if height > usable + FIT_TOLERANCE {
            log::warn!(
                "Block of {height:.1}pt exceeds the usable page height {usable:.1}pt; placing it alone on page {}",
                pages.len() + 1
            );
        }

        current.push(PlacedBlock { block, top: cursor, height });
        cursor += height;
    }

    if !current.is_empty() {
        pages.push(Page::new(pages.len() + 1, current));
    }

    pages
}
