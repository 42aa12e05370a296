// Demo runner: drives the pipeline and a game round from a synthetic frame
// source (a green marker orbiting the screen), standing in for the camera
// collaborator. Writes the final annotated frame next to the binary.

use anyhow::Result;
use image::Rgb;

use chroma_slice::core_modules::segmenter::BgrImage;
use chroma_slice::{GameConfig, GameSession, PipelineConfig, Settings, TrackingPipeline};

/// Renders a filled green disk at the marker's current orbit position.
struct SyntheticCamera {
    width: u32,
    height: u32,
    tick: u32,
}

impl SyntheticCamera {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }

    fn next_frame(&mut self) -> BgrImage {
        let mut frame = BgrImage::new(self.width, self.height);
        let t = self.tick as f64 / 40.0;
        let cx = self.width as f64 / 2.0 + (self.width as f64 / 3.0) * t.cos();
        let cy = self.height as f64 / 2.0 + (self.height as f64 / 3.0) * t.sin();

        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                if dx.hypot(dy) < 20.0 {
                    frame.put_pixel(x, y, Rgb([0, 255, 0])); // BGR green
                }
            }
        }

        self.tick += 1;
        frame
    }
}

fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let mut settings = Settings::default();
    let pipeline_config = PipelineConfig {
        channels: settings.channels(),
        ..PipelineConfig::default()
    };
    let game_config = GameConfig {
        screen_width: pipeline_config.screen_width,
        screen_height: pipeline_config.screen_height,
        round_duration_seconds: 10,
        channel_count: pipeline_config.channels.len(),
        ..GameConfig::default()
    };

    let mut camera = SyntheticCamera::new(
        pipeline_config.screen_width,
        pipeline_config.screen_height,
    );
    let mut pipeline = TrackingPipeline::new(pipeline_config);
    let mut session = GameSession::new(game_config);

    log::info!("starting a {}s demo round", session.config().round_duration_seconds);

    let mut last_frame = camera.next_frame();
    while !session.finished() {
        let frame = camera.next_frame();
        let report = pipeline.process_image(&frame);
        session.tick(&report);

        if session.finished() {
            let mut annotated = frame.clone();
            chroma_slice::pipeline::annotate(&mut annotated, &report);
            chroma_slice::game::draw_entities(&mut annotated, &session);
            last_frame = annotated;
        }
    }

    let new_high = settings.record_score(session.score());
    log::info!(
        "round over: score {} (high score {}{})",
        session.score(),
        settings.high_score,
        if new_high { ", new high" } else { "" }
    );

    // Channel order is BGR internally; swap before handing to the encoder.
    let (w, h) = last_frame.dimensions();
    let mut rgb = image::RgbImage::new(w, h);
    for (x, y, pixel) in last_frame.enumerate_pixels() {
        let Rgb([b, g, r]) = *pixel;
        rgb.put_pixel(x, y, Rgb([r, g, b]));
    }
    rgb.save("demo_round.png")?;
    log::info!("annotated final frame written to demo_round.png");

    Ok(())
}
