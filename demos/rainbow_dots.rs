use std::env;
use std::error::Error;
use std::fs;

use rainbow::canvas::Canvas;
use rainbow::gesture::{Button, Modifiers};
use rainbow::Hyper;
use rand::thread_rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let hyper = match env::args().nth(1) {
        Some(path) => Hyper::from_json(&fs::read_to_string(path)?)?,
        None => Hyper::new(),
    };

    let mut nn = hyper.weave()?;
    let mut canvas = Canvas::new(hyper)?;

    canvas.plant(100, 100, Button::Left, Modifiers::NONE);
    canvas.plant(400, 100, Button::Right, Modifiers::NONE);
    canvas.plant(250, 250, Button::Left, Modifiers::SHIFT);
    canvas.plant(100, 400, Button::Left, Modifiers::ALT);
    canvas.plant(400, 400, Button::Left, Modifiers::CTRL);
    canvas.pointer_exited();

    let mut rng = thread_rng();
    let mut field = None;
    for _ in 0..200 {
        field = canvas.tick(&mut nn, &mut rng)?.or(field);
    }

    if let Some(field) = field {
        fs::write("rainbow.ppm", field.to_ppm(canvas.points()))?;
        info!(cols = field.cols(), rows = field.rows(), "wrote rainbow.ppm");
    }

    Ok(())
}
