//! Multi-region compositor
//!
//! Owns labelled regions and renders them into one layered, colour-indexed
//! image. Ids are slot indices: they increase monotonically from 0 and are
//! never reused, and `remove` leaves a tombstone in place.
//!
//! # Draw order
//!
//! Layers are sorted so that the most prominent comes first:
//!
//! 1. the prioritized region, if any
//! 2. a region strictly contained in another before its container
//! 3. otherwise smaller coverage before larger, insertion order on ties
//!
//! Strict containment implies a smaller cell count and equal masks have equal
//! counts, so sorting by `(prioritized, coverage, insertion)` realises all
//! three rules as one total order. Layers are painted in reverse, which leaves
//! the first-sorted layer visible on top.
//!
//! Of two regions with identical masks, the one added first is therefore the
//! one visible; the later one only shows up in the legend. Pass its id as
//! `prioritized` to bring it forward.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RegionError, Result};
use crate::grid::{GridConfig, Mask, Rasterizer};
use crate::palette::{Palette, Rgba};
use crate::region::Region;

/// A stored region with its label and id
#[derive(Debug, Clone)]
pub struct LabelledRegion {
    pub id: usize,
    pub label: String,
    pub region: Region,
}

/// Whether the compositor holds any live region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorState {
    Empty,
    Populated,
}

/// One rasterized region in the rendered stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Id returned by [`Compositor::add`]
    pub id: usize,
    pub label: String,
    /// Index into the palette; never 0
    pub palette_index: usize,
    pub colour: Rgba,
    #[serde(skip)]
    pub mask: Mask,
}

/// Label and colour shown in the legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Rgba,
}

/// Output of [`Compositor::render`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendering {
    pub title: String,
    pub resolution: usize,
    /// Layers in sort order: the first entry is drawn on top
    pub layers: Vec<Layer>,
    /// Empty when the legend is hidden
    pub legend: Vec<LegendEntry>,
    /// Row-major palette index of the visible colour; 0 where nothing is drawn
    #[serde(skip)]
    pub composite: Vec<usize>,
    #[serde(skip)]
    pub palette: Palette,
}

impl Rendering {
    /// Palette index visible at `(row, col)`
    pub fn index_at(&self, row: usize, col: usize) -> usize {
        if row >= self.resolution || col >= self.resolution {
            return 0;
        }
        self.composite[row * self.resolution + col]
    }

    /// Colour visible at `(row, col)`
    pub fn colour_at(&self, row: usize, col: usize) -> Rgba {
        self.palette.get(self.index_at(row, col))
    }

    /// Id of the top-most layer covering `(row, col)`
    pub fn top_layer_at(&self, row: usize, col: usize) -> Option<usize> {
        self.layers
            .iter()
            .find(|layer| layer.mask.get(row, col))
            .map(|layer| layer.id)
    }

    /// Layer with the given region id
    pub fn layer(&self, id: usize) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Rows of the composite, top to bottom in grid order
    pub fn composite_rows(&self) -> impl Iterator<Item = &[usize]> {
        self.composite.chunks(self.resolution.max(1))
    }
}

/// Collection of labelled regions rendered on a shared grid
#[derive(Debug, Clone)]
pub struct Compositor {
    rasterizer: Rasterizer,
    palette: Palette,
    entries: Vec<Option<LabelledRegion>>,
}

impl Compositor {
    /// Compositor with the default colour-blind palette
    pub fn new(config: GridConfig) -> Result<Self> {
        Self::with_palette(config, Palette::default())
    }

    pub fn with_palette(config: GridConfig, palette: Palette) -> Result<Self> {
        Ok(Compositor {
            rasterizer: Rasterizer::new(config)?,
            palette,
            entries: Vec::new(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        self.rasterizer.config()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Store a region and return its id
    pub fn add(&mut self, region: Region, label: impl Into<String>) -> Result<usize> {
        if region.is_empty() {
            return Err(RegionError::EmptyRegion);
        }
        let id = self.entries.len();
        self.entries.push(Some(LabelledRegion {
            id,
            label: label.into(),
            region,
        }));
        Ok(id)
    }

    /// Tombstone a region; its id is not reused
    pub fn remove(&mut self, id: usize) -> Result<LabelledRegion> {
        match self.entries.get_mut(id) {
            None => Err(RegionError::UnknownRegion(id)),
            Some(slot) => slot.take().ok_or(RegionError::RegionRemoved(id)),
        }
    }

    pub fn get(&self, id: usize) -> Option<&LabelledRegion> {
        self.entries.get(id).and_then(Option::as_ref)
    }

    /// Live regions in insertion order
    pub fn regions(&self) -> impl Iterator<Item = &LabelledRegion> {
        self.entries.iter().flatten()
    }

    /// Number of live regions
    pub fn len(&self) -> usize {
        self.regions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> CompositorState {
        if self.is_empty() {
            CompositorState::Empty
        } else {
            CompositorState::Populated
        }
    }

    /// Rasterize, sort and layer every live region
    ///
    /// `prioritized` names a region drawn on top of all others. An id that is
    /// not live is ignored.
    pub fn render(
        &self,
        title: &str,
        prioritized: Option<usize>,
        show_legend: bool,
    ) -> Result<Rendering> {
        let started = Instant::now();
        let live: Vec<&LabelledRegion> = self.regions().collect();

        if let Some(id) = prioritized {
            if self.get(id).is_none() {
                warn!(id, "prioritized region is not live; ignoring");
            }
        }

        let regions: Vec<&Region> = live.iter().map(|entry| &entry.region).collect();
        let masks = self.rasterizer.rasterize_all(&regions)?;

        let mut computed: Vec<(&LabelledRegion, Mask, usize)> = live
            .into_iter()
            .zip(masks)
            .map(|(entry, mask)| {
                let coverage = mask.count();
                (entry, mask, coverage)
            })
            .collect();
        // Stable sort keeps insertion order among equal keys
        computed.sort_by_key(|(entry, _, coverage)| (Some(entry.id) != prioritized, *coverage));

        if computed.len() > self.palette.layer_colours() {
            warn!(
                layers = computed.len(),
                colours = self.palette.layer_colours(),
                "more layers than palette colours; colours repeat"
            );
        }

        let layers: Vec<Layer> = computed
            .into_iter()
            .enumerate()
            .map(|(rank, (entry, mask, _))| {
                let palette_index = self.palette.layer_index(rank);
                Layer {
                    id: entry.id,
                    label: entry.label.clone(),
                    palette_index,
                    colour: self.palette.get(palette_index),
                    mask,
                }
            })
            .collect();

        let resolution = self.rasterizer.resolution();
        let mut composite = vec![0; resolution * resolution];
        for layer in layers.iter().rev() {
            for (pixel, &covered) in composite.iter_mut().zip(layer.mask.cells()) {
                if covered {
                    *pixel = layer.palette_index;
                }
            }
        }

        let legend = if show_legend {
            layers
                .iter()
                .map(|layer| LegendEntry {
                    label: layer.label.clone(),
                    colour: layer.colour,
                })
                .collect()
        } else {
            Vec::new()
        };

        debug!(
            title,
            layers = layers.len(),
            resolution,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered composite"
        );

        Ok(Rendering {
            title: title.to_string(),
            resolution,
            layers,
            legend,
            composite,
            palette: self.palette.clone(),
        })
    }
}
