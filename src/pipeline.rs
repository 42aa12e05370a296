// THEORY:
// The `pipeline` module is the top-level API of the vision half of the crate.
// It encapsulates the per-frame stack - segment, refine, extract, merge,
// track - into one struct a frame loop can drive with a raw BGR buffer, and
// it returns a `FrameReport` per tick: one smoothed cursor plus its merged
// detections for every configured color channel.
//
// Key architectural principles:
// 1.  **Strict Stage Order**: every frame runs segment -> refine -> extract ->
//     merge -> track, per channel, synchronously on the calling thread. No
//     stage suspends mid-pipeline.
// 2.  **Anomalies Degrade**: an empty capture, a buffer of the wrong length,
//     or a zero-dimension frame all collapse to "no detections this frame";
//     the cursors hold their last positions and the session continues.
// 3.  **Encapsulation**: consumers interact with `TrackingPipeline` and the
//     report types only; the `core_modules` stages stay behind this facade.

use image::imageops;

use crate::core_modules::color_convert::Bgr;
use crate::core_modules::color_spec::ColorSpec;
use crate::core_modules::refiner;
use crate::core_modules::regions::{self, MergedRegion};
use crate::core_modules::segmenter::{self, BgrImage};
use crate::core_modules::tracked_point::{Marker, TrackedPoint};

/// Configuration for the tracking pipeline, supplied by the settings
/// collaborator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// One tracked cursor per spec.
    pub channels: Vec<ColorSpec>,
    /// Side length of the square dilation kernel.
    pub kernel_size: u32,
    /// Minimum contour area (px^2) for a detection to survive, exclusive.
    pub area_threshold: f64,
    /// Mirror the frame horizontally before processing. Cameras facing the
    /// player produce mirrored motion; the flag must stay constant within a
    /// session.
    pub mirror: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            channels: ColorSpec::default_channels(10, 100, 255, 100, 255),
            kernel_size: 5,
            area_threshold: 500.0,
            mirror: true,
        }
    }
}

/// Per-channel slice of a frame's tracking output.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    /// The channel's rendering color.
    pub color: Bgr,
    /// Merged detections for this frame.
    pub regions: Vec<MergedRegion>,
    /// Smoothed cursor position after this frame.
    pub cursor: (f64, f64),
    /// Cursor position before this frame.
    pub previous: (f64, f64),
    /// Cursor displacement this frame, px/frame.
    pub velocity: (f64, f64),
    /// Euclidean length of `velocity`.
    pub speed: f64,
    /// Live detection markers, for the fading per-channel overlay.
    pub markers: Vec<Marker>,
}

/// The primary per-tick output of the vision pipeline.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub channels: Vec<ChannelReport>,
}

/// The stateful vision pipeline: stateless per-frame stages plus one
/// persistent `TrackedPoint` per channel.
pub struct TrackingPipeline {
    config: PipelineConfig,
    cursors: Vec<TrackedPoint>,
}

impl TrackingPipeline {
    /// Creates a pipeline with every cursor resting at screen center.
    pub fn new(config: PipelineConfig) -> Self {
        let center_x = config.screen_width as f64 / 2.0;
        let center_y = config.screen_height as f64 / 2.0;
        let cursors = config
            .channels
            .iter()
            .map(|_| TrackedPoint::new(center_x, center_y))
            .collect();
        Self { config, cursors }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one raw BGR frame buffer (`screen_width * screen_height * 3`
    /// bytes, row-major). A malformed buffer is treated as an empty capture.
    pub fn process_frame(&mut self, frame_buffer: &[u8]) -> FrameReport {
        let expected = self.config.screen_width as usize * self.config.screen_height as usize * 3;
        if frame_buffer.len() != expected {
            if !frame_buffer.is_empty() {
                log::warn!(
                    "frame buffer is {} bytes, expected {}; treating as empty capture",
                    frame_buffer.len(),
                    expected
                );
            }
            return self.hold_frame();
        }

        let Some(frame) = BgrImage::from_raw(
            self.config.screen_width,
            self.config.screen_height,
            frame_buffer.to_vec(),
        ) else {
            return self.hold_frame();
        };

        self.process_image(&frame)
    }

    /// Same as `process_frame`, for callers that already hold a `BgrImage`.
    pub fn process_image(&mut self, frame: &BgrImage) -> FrameReport {
        if frame.dimensions() != (self.config.screen_width, self.config.screen_height) {
            log::warn!(
                "frame is {:?}, expected {:?}; treating as empty capture",
                frame.dimensions(),
                (self.config.screen_width, self.config.screen_height)
            );
            return self.hold_frame();
        }

        let frame = if self.config.mirror {
            imageops::flip_horizontal(frame)
        } else {
            frame.clone()
        };

        let mut channels = Vec::with_capacity(self.config.channels.len());
        for (spec, cursor) in self.config.channels.iter().zip(&mut self.cursors) {
            let mask = segmenter::segment(&frame, spec);
            let refined = refiner::dilate(&mask, self.config.kernel_size);
            let detected = regions::extract_regions(&refined, self.config.area_threshold);
            let merged = regions::merge_regions(&detected, spec.render_color());

            cursor.update(&merged);
            channels.push(Self::channel_report(spec, cursor, merged));
        }

        FrameReport { channels }
    }

    /// The "no detections" tick: every cursor holds its position.
    fn hold_frame(&mut self) -> FrameReport {
        let channels = self
            .config
            .channels
            .iter()
            .zip(&mut self.cursors)
            .map(|(spec, cursor)| {
                cursor.update(&[]);
                Self::channel_report(spec, cursor, Vec::new())
            })
            .collect();
        FrameReport { channels }
    }

    fn channel_report(
        spec: &ColorSpec,
        cursor: &TrackedPoint,
        regions: Vec<MergedRegion>,
    ) -> ChannelReport {
        ChannelReport {
            color: spec.render_color(),
            regions,
            cursor: cursor.position(),
            previous: cursor.previous(),
            velocity: cursor.velocity(),
            speed: cursor.speed(),
            markers: cursor.markers().copied().collect(),
        }
    }
}

/// Draws the tracking overlay - merged-region boxes, detection markers, and
/// the cursor - onto `frame` in each channel's color.
pub fn annotate(frame: &mut BgrImage, report: &FrameReport) {
    use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
    use imageproc::rect::Rect;

    for channel in &report.channels {
        let (b, g, r) = channel.color;
        let color = image::Rgb([b, g, r]);

        for region in &channel.regions {
            if region.w == 0 || region.h == 0 {
                continue;
            }
            draw_hollow_rect_mut(
                frame,
                Rect::at(region.x as i32, region.y as i32).of_size(region.w, region.h),
                color,
            );
        }
        for marker in &channel.markers {
            draw_hollow_circle_mut(
                frame,
                (marker.x as i32, marker.y as i32),
                marker.radius.max(1.0) as i32,
                color,
            );
        }
        let (cx, cy) = channel.cursor;
        draw_filled_circle_mut(frame, (cx as i32, cy as i32), 4, color);
    }
}
