// What you SEE:
// • A wrapped-present card (or your --image) covering a hidden prize.
// • Hold Left Mouse and drag to scratch it away; the HUD shows how much is gone.
// • Once the threshold is crossed the rest of the card fades out on its own.
// • R reveals everything now, C puts a fresh card back. ESC quits.

mod draw;

use clap::Parser;
use draw::{Drawer, draw_ring, draw_text_5x7, text_width_5x7};
use scratch_card::{Error, FrameBuffer, ImageSubscription, Point, ScratchConfig, ScratchSurface, ScratchState};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scratch-card", about = "Scratch-off card demo")]
struct Args {
    /// TOML file with surface options (brush_size, threshold, colors, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image to use as the overlay instead of the gift-card art
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, default_value_t = 480)]
    width: usize,

    #[arg(long, default_value_t = 320)]
    height: usize,

    /// Reveal fade length; overrides the config's reveal_duration_ms
    #[arg(long)]
    reveal_ms: Option<u64>,
}

/// The prize under the card: warm gradient + big "YOU WIN!".
fn paint_prize(fb: &mut FrameBuffer) {
    let h = fb.height.max(1);
    for y in 0..fb.height {
        let t = y as f32 / h as f32;
        let r = 255;
        let g = (210.0 - 90.0 * t) as u32;
        let b = (90.0 - 60.0 * t) as u32;
        let row = y * fb.width;
        fb.pixels[row..row + fb.width].fill((r << 16) | (g << 8) | b);
    }
    let text = "YOU WIN!";
    let scale = (fb.width as i32 / 80).max(1);
    let x = (fb.width as i32 - text_width_5x7(text, scale)) / 2;
    let y = (fb.height as i32 - 7 * scale) / 2;
    draw_text_5x7(fb, x, y, text, 0x00_FF_FF_FF, scale);
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ScratchConfig::load(path)?,
        None => ScratchConfig::default(),
    };
    let reveal_after = args.reveal_ms.map(Duration::from_millis).unwrap_or_else(|| config.reveal_duration());
    let (w, h) = (args.width.max(1), args.height.max(1));

    /* --- Window + buffers ---
       Visual: `prize` never changes; `screen` is what you actually see. */
    let mut drawer = Drawer::new("Scratch Card", w, h)?;
    let mut prize = FrameBuffer::new(w, h);
    paint_prize(&mut prize);
    let mut screen = FrameBuffer::new(w, h);

    /* --- The surface ---
       Callbacks only record; the loop below reacts (the surface is busy
       while it's calling us). */
    let mut surface = ScratchSurface::new(&config);
    surface.resize(w, h);
    let scratched = Rc::new(Cell::new(0.0f32));
    let crossed = Rc::new(Cell::new(false));
    {
        let scratched = scratched.clone();
        surface.on_change(move |pct| scratched.set(pct));
        let crossed = crossed.clone();
        surface.on_threshold(move || crossed.set(true));
    }
    if let Some(path) = &args.image {
        surface.subscribe_image(ImageSubscription::load_file(path));
    }
    tracing::info!(width = w, height = h, brush = config.brush_size, threshold = config.threshold, "card ready");

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut was_down = false;
    let mut last_pos: Option<(f32, f32)> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Keys */
        if drawer.r_pressed_once() {
            surface.reveal(reveal_after); // visual: card fades out
        }
        if drawer.c_pressed_once() {
            surface.reset(); // visual: fresh card
            scratched.set(0.0);
            crossed.set(false);
        }

        /* 2) Mouse -> pointer down / move / up */
        let down = drawer.left_mouse_down();
        let pos = drawer.mouse_pos();
        match (was_down, down, pos) {
            (false, true, Some((x, y))) => surface.pointer_down(Point::new(x, y)),
            (true, true, Some((x, y))) if last_pos != Some((x, y)) => surface.pointer_move(Point::new(x, y)),
            (true, false, _) => surface.pointer_up(),
            _ => {}
        }
        was_down = down;
        last_pos = pos;

        /* 3) Threshold crossed -> finish the job */
        if crossed.replace(false) && surface.state().accepts_input() {
            surface.reveal(reveal_after);
        }

        /* 4) Clock ticks + image arrival, then build the frame */
        surface.pump();
        surface.compose(&prize, &mut screen)?;

        if surface.state().accepts_input() {
            if let Some((mx, my)) = pos {
                let r = (surface.brush_size() * 0.5).round() as i32;
                draw_ring(&mut screen, mx as i32, my as i32, r, 0x00_FF_FF_FF); // visual: brush outline
            }
        }

        let status = match surface.state() {
            ScratchState::Idle => "SCRATCH ME",
            ScratchState::Scratching => "SCRATCHING",
            ScratchState::Revealing => "REVEALING",
            ScratchState::FullyRevealed => "REVEALED",
        };
        let hud = format!("{} {:.1}% | R: REVEAL  C: RESET | {}", status, scratched.get(), hud_fps_text);
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF, 1);

        /* 5) Present */
        drawer.present(&screen)?;

        /* 6) FPS counter (terminal log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            tracing::debug!(fps, "frame rate");
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    surface.dispose();
    Ok(())
}
