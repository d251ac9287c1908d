//! The labeled point store and the tick that trains a network on it and
//! samples the resulting colour field.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::gesture::{self, Button, Modifiers};
use crate::nn::Network;
use crate::optimizers::{Hyper, OnlineGradientDescent};
use crate::palette::{self, Category, Rgb};
use crate::Dataset;

/// Side of a painted dot, its ring adds `RING` pixels on every side.
const DOT: i64 = 10;
const RING: i64 = 2;

/// A planted point in canvas pixel coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    hyper: Hyper,
    points: Vec<Point>,
    training: bool,
}

impl Canvas {
    /// An empty canvas, idle until the pointer leaves it. Fails when `hyper`
    /// describes a canvas without area or a zero render stride.
    pub fn new(hyper: Hyper) -> Result<Canvas> {
        hyper.validate()?;
        Ok(Canvas {
            hyper,
            points: vec![],
            training: false,
        })
    }

    pub fn hyper(&self) -> &Hyper {
        &self.hyper
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn push(&mut self, point: Point) -> &mut Self {
        self.points.push(point);
        self
    }

    /// Plants a point where the pointer was pressed.
    pub fn plant(&mut self, x: i32, y: i32, button: Button, modifiers: Modifiers) -> Point {
        let point = Point {
            x,
            y,
            category: gesture::classify(button, modifiers),
        };
        debug!(?point, "planted");
        self.push(point);
        point
    }

    /// The pointer is over the canvas: stop training so points can be placed.
    pub fn pointer_entered(&mut self) {
        self.training = false;
        info!("training off");
    }

    pub fn pointer_exited(&mut self) {
        self.training = true;
        info!("training on");
    }

    /// Maps canvas pixels onto the network's input range, about `[-0.5, 0.5)`.
    pub fn normalize(&self, x: f64, y: f64) -> [f64; 2] {
        [
            x / self.hyper.width as f64 - 0.5,
            y / self.hyper.height as f64 - 0.5,
        ]
    }

    pub fn dataset(&self) -> Dataset {
        self.points
            .iter()
            .map(|p| {
                let x = self.normalize(p.x as f64, p.y as f64);
                (x.to_vec(), p.category.index())
            })
            .collect()
    }

    /// One tick worth of online updates on randomly drawn points. Returns the
    /// mean squared error seen while training, `None` without points.
    pub fn train<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        rng: &mut R,
    ) -> Result<Option<f64>> {
        let data = self.dataset();
        let mut sgd = OnlineGradientDescent::new(network);
        sgd.set_samples(self.hyper.samples_per_tick);
        sgd.step(&data, rng)
    }

    /// Samples the network over the render grid.
    pub fn render(&self, network: &Network) -> Result<Field> {
        let stride = self.hyper.stride;
        let cols = self.hyper.width / stride;
        let rows = self.hyper.height / stride;
        let mut pixels = Vec::with_capacity(cols * rows);

        for j in 0..rows {
            for i in 0..cols {
                let x = self.normalize((i * stride) as f64, (j * stride) as f64);
                let y = network.predict(&x)?;
                pixels.push(palette::decode(y.view())?);
            }
        }

        Ok(Field {
            cols,
            rows,
            stride,
            pixels,
        })
    }

    /// One animation tick: while training is on, trains on the planted points
    /// and renders the field. Idle ticks do nothing.
    pub fn tick<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        rng: &mut R,
    ) -> Result<Option<Field>> {
        if !self.training {
            return Ok(None);
        }

        if let Some(loss) = self.train(network, rng)? {
            debug!(loss, points = self.points.len(), "tick");
        }

        self.render(network).map(Some)
    }
}

/// Colours of the render grid, row by row. Only [`Canvas::render`] builds
/// one, so `pixels` always holds `cols * rows` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    cols: usize,
    rows: usize,
    stride: usize,
    pixels: Vec<Rgb>,
}

impl Field {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, i: usize, j: usize) -> Option<Rgb> {
        if i >= self.cols || j >= self.rows {
            return None;
        }
        self.pixels.get(j * self.cols + i).copied()
    }

    /// Binary PPM of the field scaled back up to canvas size, with the points
    /// painted on top as ringed squares.
    pub fn to_ppm(&self, points: &[Point]) -> Vec<u8> {
        let (w, h) = (self.cols * self.stride, self.rows * self.stride);
        let mut image = Vec::with_capacity(w * h);

        for y in 0..h {
            for x in 0..w {
                image.push(self.pixels[(y / self.stride) * self.cols + x / self.stride]);
            }
        }

        let mut fill = |x0: i64, y0: i64, side: i64, c: Rgb| {
            for y in y0.max(0)..(y0 + side).min(h as i64) {
                for x in x0.max(0)..(x0 + side).min(w as i64) {
                    image[y as usize * w + x as usize] = c;
                }
            }
        };

        for p in points {
            let (x, y) = (p.x as i64, p.y as i64);
            fill(x - RING, y - RING, DOT + 2 * RING, p.category.border());
            fill(x, y, DOT, p.category.rgb());
        }

        let mut ppm = format!("P6\n{} {}\n255\n", w, h).into_bytes();
        ppm.reserve(image.len() * 3);
        for c in image {
            ppm.extend_from_slice(&[c.0, c.1, c.2]);
        }
        ppm
    }
}
