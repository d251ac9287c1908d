use rainbow::f;
use rainbow::optimizers::OnlineGradientDescent;
use rainbow::{Activation, Dataset, Network};
use rand::{prelude::*, thread_rng};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn gen_training_data() -> Dataset {
    vec![
        (vec![0., 1.], 0),
        (vec![1., 1.], 1),
        (vec![1., 0.], 0),
        (vec![0., 0.], 1),
    ]
}

fn main() -> rainbow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data = gen_training_data();
    let mut rng = thread_rng();

    let mut nn = Network::new(vec![2, 4, 2], 0.5, Activation::sigmoid())?;
    let mut sgd = OnlineGradientDescent::new(&mut nn);
    sgd.set_samples(100);

    for epoch in 0..100 {
        if let Some(loss) = sgd.step(&data, &mut rng)? {
            info!(epoch, loss);
        }
    }

    let mut correct = 0;
    let mut total = 0;

    for _ in 0..50 {
        if let Some((x, label)) = data.choose(&mut rng) {
            let y_pred = nn.predict(x)?;
            if f::argmax(y_pred.view()) == *label {
                correct += 1;
            }
            total += 1;
        }
    }

    info!("Accuracy: {}%", (correct as f64 / total as f64) * 100.);
    Ok(())
}
