// THEORY:
// The `regions` module is the spatial grouping stage. It turns a refined
// binary mask into a small list of axis-aligned boxes that downstream code can
// treat as "detections":
//
// 1.  **Extraction**: contours are traced over the mask (border following,
//     tree topology: outer borders and holes alike, as the original detector
//     walked the full contour hierarchy). Each contour's enclosed area is
//     computed with the shoelace formula; contours at or below the area
//     threshold are speckle and are dropped. Survivors become their tight
//     bounding box.
// 2.  **Merging**: a physical marker frequently shatters into several nearby
//     contours (glare, partial occlusion). Any two boxes that intersect,
//     including mere edge contact, belong to the same detection. Grouping is
//     computed as a transitive closure with union-find over the overlap
//     graph: if A touches B and B touches C, all three collapse into one box
//     even when A and C are disjoint. This makes merging idempotent - running
//     it on its own output changes nothing.
//
// Both steps are stateless per-frame functions; `Region` values never survive
// past the merge.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::point::Point;

use crate::core_modules::color_convert::Bgr;

/// A tight bounding box around one surviving contour. Ephemeral: created per
/// frame, consumed by the merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Enclosed area of the source contour, in px^2.
    pub area: f64,
}

/// The union box of a transitively-connected group of overlapping regions,
/// carrying the channel's rendering color.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub color: Bgr,
}

impl MergedRegion {
    /// Center of the box in frame coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }
}

/// Enclosed area of a closed contour via the shoelace formula.
fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area: i64 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice_area.abs() as f64) / 2.0
}

/// Traces contours on `mask` and returns one `Region` per contour whose
/// enclosed area exceeds `min_area` (strictly).
pub fn extract_regions(mask: &GrayImage, min_area: f64) -> Vec<Region> {
    let contours = find_contours::<i32>(mask);
    let mut regions = Vec::new();

    for contour in &contours {
        let area = contour_area(&contour.points);
        if area <= min_area {
            continue;
        }

        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for p in &contour.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        regions.push(Region {
            x: min_x as u32,
            y: min_y as u32,
            w: (max_x - min_x + 1) as u32,
            h: (max_y - min_y + 1) as u32,
            area,
        });
    }

    regions
}

/// True when the two boxes overlap or touch edge-to-edge.
fn boxes_touch(a: &Region, b: &Region) -> bool {
    a.x <= b.x + b.w && b.x <= a.x + a.w && a.y <= b.y + b.h && b.y <= a.y + a.h
}

/// Disjoint-set forest over region indices, with path compression.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Collapses every transitively-connected group of touching regions into one
/// union box. Empty and singleton inputs pass through unchanged (modulo the
/// `MergedRegion` wrapper). Idempotent: merging the output again is a no-op.
pub fn merge_regions(regions: &[Region], color: Bgr) -> Vec<MergedRegion> {
    let n = regions.len();
    let mut forest = UnionFind::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            if boxes_touch(&regions[i], &regions[j]) {
                forest.union(i, j);
            }
        }
    }

    // Emit one box per group, in order of each group's first member.
    let mut merged: Vec<MergedRegion> = Vec::new();
    let mut root_slot: Vec<Option<usize>> = vec![None; n];

    for i in 0..n {
        let root = forest.find(i);
        let r = &regions[i];
        match root_slot[root] {
            Some(slot) => {
                let m = &mut merged[slot];
                let x1 = (m.x + m.w).max(r.x + r.w);
                let y1 = (m.y + m.h).max(r.y + r.h);
                m.x = m.x.min(r.x);
                m.y = m.y.min(r.y);
                m.w = x1 - m.x;
                m.h = y1 - m.y;
            }
            None => {
                root_slot[root] = Some(merged.len());
                merged.push(MergedRegion {
                    x: r.x,
                    y: r.y,
                    w: r.w,
                    h: r.h,
                    color,
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::segmenter::MASK_SET;

    const WHITE: Bgr = (255, 255, 255);

    fn region(x: u32, y: u32, w: u32, h: u32) -> Region {
        Region {
            x,
            y,
            w,
            h,
            area: 0.0,
        }
    }

    fn filled_block(mask: &mut GrayImage, x0: u32, y0: u32, side: u32) {
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                mask.put_pixel(x, y, image::Luma([MASK_SET]));
            }
        }
    }

    #[test]
    fn area_filter_rejects_small_contours() {
        let mut mask = GrayImage::new(64, 64);
        filled_block(&mut mask, 4, 4, 10); // boundary encloses 9*9 = 81 px^2
        assert!(extract_regions(&mask, 300.0).is_empty());
    }

    #[test]
    fn area_filter_keeps_large_contours_with_tight_bbox() {
        let mut mask = GrayImage::new(64, 64);
        filled_block(&mut mask, 4, 4, 30); // boundary encloses 29*29 = 841 px^2
        let regions = extract_regions(&mask, 300.0);
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert_eq!((r.x, r.y, r.w, r.h), (4, 4, 30, 30));
        assert!(r.area > 300.0);
    }

    #[test]
    fn threshold_is_strict() {
        let mut mask = GrayImage::new(64, 64);
        filled_block(&mut mask, 4, 4, 30);
        let area = extract_regions(&mask, 0.0)[0].area;
        assert!(extract_regions(&mask, area).is_empty());
    }

    #[test]
    fn merge_on_empty_and_singleton_is_noop() {
        assert!(merge_regions(&[], WHITE).is_empty());
        let single = vec![region(10, 10, 5, 5)];
        let merged = merge_regions(&single, WHITE);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            (merged[0].x, merged[0].y, merged[0].w, merged[0].h),
            (10, 10, 5, 5)
        );
    }

    #[test]
    fn overlapping_pair_merges_into_union_box() {
        let regions = vec![region(10, 10, 20, 20), region(25, 15, 20, 20)];
        let merged = merge_regions(&regions, WHITE);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            (merged[0].x, merged[0].y, merged[0].w, merged[0].h),
            (10, 10, 35, 25)
        );
    }

    #[test]
    fn chain_merges_transitively() {
        // A touches B, B touches C, A and C are disjoint.
        let regions = vec![
            region(0, 0, 10, 10),
            region(8, 0, 10, 10),
            region(16, 0, 10, 10),
        ];
        let merged = merge_regions(&regions, WHITE);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            (merged[0].x, merged[0].y, merged[0].w, merged[0].h),
            (0, 0, 26, 10)
        );
    }

    #[test]
    fn edge_contact_counts_as_touching() {
        let regions = vec![region(0, 0, 10, 10), region(10, 0, 10, 10)];
        assert_eq!(merge_regions(&regions, WHITE).len(), 1);
    }

    #[test]
    fn disjoint_boxes_stay_separate() {
        let regions = vec![region(0, 0, 5, 5), region(20, 20, 5, 5)];
        assert_eq!(merge_regions(&regions, WHITE).len(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let regions = vec![
            region(0, 0, 10, 10),
            region(8, 0, 10, 10),
            region(16, 0, 10, 10),
            region(40, 40, 5, 5),
        ];
        let once = merge_regions(&regions, WHITE);
        let as_regions: Vec<Region> = once
            .iter()
            .map(|m| region(m.x, m.y, m.w, m.h))
            .collect();
        let twice = merge_regions(&as_regions, WHITE);
        assert_eq!(once, twice);
    }
}
